//! Patient history models: visits, lab results and medications.

use serde::{Deserialize, Serialize};

/// Reason recorded on visits created by saving an analysis.
pub const AI_ANALYSIS_REASON: &str = "AI Analysis";

/// A past clinic visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Visit date (YYYY-MM-DD)
    pub date: String,
    pub reason: String,
    pub diagnosis: String,
    pub treatment: String,
}

/// Lab result interpretation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabStatus {
    Normal,
    Abnormal,
    Critical,
}

/// A laboratory result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResult {
    /// Collection date (YYYY-MM-DD)
    pub date: String,
    /// Test type (e.g. "Complete Blood Count")
    #[serde(rename = "type")]
    pub test_type: String,
    /// Result summary
    pub result: String,
    pub status: LabStatus,
}

/// A medication on the patient's chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    /// Absent while the medication is ongoing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Everything carried from one analysis to the next.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientHistory {
    /// Newest first
    pub previous_visits: Vec<Visit>,
    pub lab_results: Vec<LabResult>,
    pub medications: Vec<Medication>,
}

impl PatientHistory {
    /// Return a copy with `visit` placed ahead of the existing visits.
    pub fn with_visit(&self, visit: Visit) -> Self {
        let mut previous_visits = Vec::with_capacity(self.previous_visits.len() + 1);
        previous_visits.push(visit);
        previous_visits.extend(self.previous_visits.iter().cloned());
        Self {
            previous_visits,
            lab_results: self.lab_results.clone(),
            medications: self.medications.clone(),
        }
    }

    /// Most recent visit, if any.
    pub fn latest_visit(&self) -> Option<&Visit> {
        self.previous_visits.first()
    }
}
