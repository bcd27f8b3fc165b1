//! Analysis models: findings, AI suggestions and the analysis record itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::history::{PatientHistory, Visit, AI_ANALYSIS_REASON};
use super::patient::PatientInfo;
use crate::image::ImageRef;

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classify a raw detector score. Thresholds are strict.
    pub fn from_score(score: f64) -> Self {
        if score > 0.9 {
            Self::High
        } else if score > 0.7 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One detected abnormality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub description: String,
    /// Detector confidence (0.0 - 1.0)
    pub confidence: f64,
    pub severity: Severity,
    /// Anatomical label or normalized "x, y" coordinate
    pub location: String,
}

impl Finding {
    /// Build a finding from a localized detection.
    ///
    /// Severity is derived from the score and the location is the top-left
    /// normalized vertex of the bounding box, two decimals per axis.
    pub fn from_localized(description: impl Into<String>, score: f64, vertex: (f64, f64)) -> Self {
        Self {
            description: description.into(),
            confidence: score.clamp(0.0, 1.0),
            severity: Severity::from_score(score),
            location: format!("{:.2}, {:.2}", vertex.0, vertex.1),
        }
    }

    /// Confidence as shown on the finding badge, e.g. "92% confidence".
    pub fn confidence_label(&self) -> String {
        format!("{} confidence", percent(self.confidence))
    }
}

/// Diagnostic recommendation bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestions {
    pub diagnosis: String,
    pub confidence: f64,
    pub differentials: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub treatment_plan: Vec<String>,
}

impl AiSuggestions {
    /// Treatment plan as a single line for the visit record.
    pub fn treatment_summary(&self) -> String {
        self.treatment_plan.join(", ")
    }

    /// Visit recorded when an analysis carrying these suggestions is saved.
    pub fn to_visit(&self, date: String) -> Visit {
        Visit {
            date,
            reason: AI_ANALYSIS_REASON.to_string(),
            diagnosis: self.diagnosis.clone(),
            treatment: self.treatment_summary(),
        }
    }
}

/// A completed image analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Unique analysis ID
    pub id: String,
    /// When the analysis completed
    pub timestamp: DateTime<Utc>,
    /// Image the analysis was run for
    pub image_url: Option<ImageRef>,
    pub findings: Vec<Finding>,
    pub overall_confidence: f64,
    pub patient_info: PatientInfo,
    pub ai_suggestions: AiSuggestions,
    pub history: PatientHistory,
}

impl Analysis {
    /// Copy of this analysis with the save visit prepended to its history.
    pub fn with_save_visit(&self, date: String) -> Self {
        let visit = self.ai_suggestions.to_visit(date);
        Self {
            history: self.history.with_visit(visit),
            ..self.clone()
        }
    }
}

/// Render a 0-1 score as a whole percentage.
///
/// Halves round up, so 0.125 reads "13%".
pub fn percent(score: f64) -> String {
    format!("{}%", (score * 100.0).round() as i64)
}
