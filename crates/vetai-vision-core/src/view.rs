//! View model for the review page.
//!
//! Derived from a [`ReviewState`] with no other input, so a rendering layer
//! only has to lay out what it is handed.

use serde::Serialize;

use crate::config::APP_NAME;
use crate::models::{percent, Analysis, LabStatus, PatientHistory, Severity};
use crate::session::{current_history, ReviewState, Tab};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub header: Header,
    /// Upload drop zone, only on the analysis tab
    pub upload: Option<UploadPanel>,
    /// Spinner while an analysis is in flight
    pub progress: Option<ProgressPanel>,
    /// Active tab contents, when there is anything to show
    pub body: Option<TabBody>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub title: &'static str,
    pub tabs: Vec<TabButton>,
    pub save_button: Option<SaveButton>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TabButton {
    pub tab: Tab,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SaveButton {
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UploadPanel {
    Preview { image_url: String },
    Prompt { title: &'static str, hint: &'static str },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressPanel {
    pub title: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum TabBody {
    Analysis(AnalysisView),
    History(HistoryView),
    Labs(LabsView),
}

/// A label/value pair on the patient card.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub patient: Vec<Field>,
    pub findings: Vec<FindingView>,
    pub diagnosis: String,
    pub diagnosis_confidence: String,
    pub differentials: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub treatment_plan: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FindingView {
    pub description: String,
    pub location: String,
    pub badge: String,
    /// Badge colour follows severity
    pub tone: Severity,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryView {
    pub visits: Vec<VisitView>,
    pub medications: Vec<MedicationView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VisitView {
    pub date: String,
    pub reason: String,
    pub diagnosis: String,
    pub treatment: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicationView {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub started: String,
    pub ended: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LabsView {
    pub labs: Vec<LabView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LabView {
    pub test: String,
    pub date: String,
    pub result: String,
    pub indicator: LabIndicator,
}

/// Icon shown next to a lab result.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabIndicator {
    Check,
    Alert,
    Ban,
}

impl From<LabStatus> for LabIndicator {
    fn from(status: LabStatus) -> Self {
        match status {
            LabStatus::Normal => Self::Check,
            LabStatus::Abnormal => Self::Alert,
            LabStatus::Critical => Self::Ban,
        }
    }
}

impl ViewModel {
    pub fn from_state(state: &ReviewState) -> Self {
        Self {
            header: header(state),
            upload: upload_panel(state),
            progress: state.is_analyzing.then_some(ProgressPanel {
                title: "Processing image...",
                detail: "Please wait while we analyze the results",
            }),
            body: body(state),
        }
    }
}

fn header(state: &ReviewState) -> Header {
    let tabs = Tab::ALL
        .iter()
        .map(|&tab| TabButton {
            tab,
            label: tab.label(),
            active: tab == state.active_tab,
        })
        .collect();

    let save_button = (state.analysis.is_some() && !state.is_analyzing).then(|| SaveButton {
        label: if state.is_saving {
            "Saving..."
        } else {
            "Save Diagnostic"
        },
        disabled: state.is_saving,
        busy: state.is_saving,
    });

    Header {
        title: APP_NAME,
        tabs,
        save_button,
    }
}

fn upload_panel(state: &ReviewState) -> Option<UploadPanel> {
    if state.active_tab != Tab::Analysis {
        return None;
    }

    Some(match &state.selected_image {
        Some(image) => UploadPanel::Preview {
            image_url: image.as_data_url().to_string(),
        },
        None => UploadPanel::Prompt {
            title: "Click or drag image to upload",
            hint: "Supports X-rays, ultrasounds, and other medical imaging",
        },
    })
}

fn body(state: &ReviewState) -> Option<TabBody> {
    if !state.has_results() {
        return None;
    }

    match state.active_tab {
        Tab::Analysis => state
            .analysis
            .as_ref()
            .map(|a| TabBody::Analysis(analysis_view(a))),
        Tab::History => current_history(state).map(|h| TabBody::History(history_view(h))),
        Tab::Labs => current_history(state).map(|h| TabBody::Labs(labs_view(h))),
    }
}

fn analysis_view(analysis: &Analysis) -> AnalysisView {
    let p = &analysis.patient_info;
    let s = &analysis.ai_suggestions;

    AnalysisView {
        patient: vec![
            field("Name", p.name.clone()),
            field("Species", p.species.clone()),
            field("Breed", p.breed.clone()),
            field("Age", p.age_label()),
            field("Weight", p.weight.clone()),
            field("Sex", p.sex.to_string()),
        ],
        findings: analysis
            .findings
            .iter()
            .map(|f| FindingView {
                description: f.description.clone(),
                location: format!("Location: {}", f.location),
                badge: f.confidence_label(),
                tone: f.severity,
            })
            .collect(),
        diagnosis: s.diagnosis.clone(),
        diagnosis_confidence: format!("({} confidence)", percent(s.confidence)),
        differentials: s.differentials.clone(),
        recommended_tests: s.recommended_tests.clone(),
        treatment_plan: s.treatment_plan.clone(),
    }
}

fn history_view(history: &PatientHistory) -> HistoryView {
    HistoryView {
        visits: history
            .previous_visits
            .iter()
            .map(|v| VisitView {
                date: v.date.clone(),
                reason: v.reason.clone(),
                diagnosis: format!("Diagnosis: {}", v.diagnosis),
                treatment: format!("Treatment: {}", v.treatment),
            })
            .collect(),
        medications: history
            .medications
            .iter()
            .map(|m| MedicationView {
                name: m.name.clone(),
                dosage: format!("Dosage: {}", m.dosage),
                frequency: format!("Frequency: {}", m.frequency),
                started: format!("Started: {}", m.start_date),
                ended: m.end_date.as_ref().map(|d| format!("Ended: {}", d)),
            })
            .collect(),
    }
}

fn labs_view(history: &PatientHistory) -> LabsView {
    LabsView {
        labs: history
            .lab_results
            .iter()
            .map(|l| LabView {
                test: l.test_type.clone(),
                date: l.date.clone(),
                result: l.result.clone(),
                indicator: l.status.into(),
            })
            .collect(),
    }
}

fn field(label: &'static str, value: String) -> Field {
    Field { label, value }
}
