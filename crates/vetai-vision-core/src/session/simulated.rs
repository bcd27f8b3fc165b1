//! Canned analysis content.
//!
//! Every simulated analysis reports the same patient, findings and
//! suggestions regardless of the image. Only the history varies: it is
//! carried forward from the last saved analysis.

use chrono::{DateTime, Utc};

use crate::image::ImageRef;
use crate::models::{
    AiSuggestions, Analysis, Finding, LabResult, LabStatus, Medication, PatientHistory,
    PatientInfo, Severity, Sex, Visit,
};

/// Overall confidence reported for every simulated analysis.
pub const OVERALL_CONFIDENCE: f64 = 0.89;

/// Build a simulated analysis.
pub fn build_analysis(
    id: String,
    timestamp: DateTime<Utc>,
    image: Option<ImageRef>,
    history: PatientHistory,
) -> Analysis {
    Analysis {
        id,
        timestamp,
        image_url: image,
        findings: findings(),
        overall_confidence: OVERALL_CONFIDENCE,
        patient_info: patient(),
        ai_suggestions: suggestions(),
        history,
    }
}

pub fn findings() -> Vec<Finding> {
    vec![
        finding(
            "Early signs of arthritis in left hip joint",
            0.92,
            Severity::Medium,
            "Left hip",
        ),
        finding(
            "No significant abnormalities in spine alignment",
            0.95,
            Severity::Low,
            "Spine",
        ),
        finding(
            "Minor inflammation in knee area",
            0.88,
            Severity::Low,
            "Right knee",
        ),
    ]
}

pub fn patient() -> PatientInfo {
    PatientInfo {
        id: "PAT-2024-001".into(),
        name: "Max".into(),
        species: "Canine".into(),
        breed: "German Shepherd".into(),
        age: 5,
        weight: "32.5 kg".into(),
        sex: Sex::Male,
    }
}

pub fn suggestions() -> AiSuggestions {
    AiSuggestions {
        diagnosis: "Early-stage hip dysplasia with minor arthritic changes".into(),
        confidence: 0.87,
        differentials: strings(&[
            "Degenerative Joint Disease",
            "Traumatic Injury",
            "Growth-related Disorder",
        ]),
        recommended_tests: strings(&[
            "Complete Blood Count",
            "Serum Chemistry Panel",
            "Synovial Fluid Analysis",
        ]),
        treatment_plan: strings(&[
            "Anti-inflammatory medication",
            "Physical therapy",
            "Weight management",
            "Regular exercise modification",
        ]),
    }
}

/// History used when nothing has been saved yet.
pub fn default_history() -> PatientHistory {
    PatientHistory {
        previous_visits: vec![
            Visit {
                date: "2024-01-15".into(),
                reason: "Annual checkup".into(),
                diagnosis: "Healthy, mild joint stiffness noted".into(),
                treatment: "Recommended joint supplements".into(),
            },
            Visit {
                date: "2023-08-22".into(),
                reason: "Limping".into(),
                diagnosis: "Muscle strain".into(),
                treatment: "Rest and anti-inflammatory medication".into(),
            },
        ],
        lab_results: vec![
            LabResult {
                date: "2024-01-15".into(),
                test_type: "Complete Blood Count".into(),
                result: "Within normal ranges".into(),
                status: LabStatus::Normal,
            },
            LabResult {
                date: "2023-08-22".into(),
                test_type: "Joint Fluid Analysis".into(),
                result: "Elevated inflammatory markers".into(),
                status: LabStatus::Abnormal,
            },
        ],
        medications: vec![Medication {
            name: "Glucosamine/Chondroitin".into(),
            dosage: "1500mg/1200mg".into(),
            frequency: "Daily".into(),
            start_date: "2024-01-15".into(),
            end_date: None,
        }],
    }
}

fn finding(description: &str, confidence: f64, severity: Severity, location: &str) -> Finding {
    Finding {
        description: description.into(),
        confidence,
        severity,
        location: location.into(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
