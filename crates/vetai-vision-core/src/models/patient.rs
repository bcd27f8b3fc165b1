//! Patient models.

use serde::{Deserialize, Serialize};

/// Patient sex as recorded on the chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

/// Snapshot of the patient an analysis was run for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInfo {
    /// Clinic patient ID (e.g. "PAT-2024-001")
    pub id: String,
    /// Patient name
    pub name: String,
    /// Species (e.g., "Canine", "Feline")
    pub species: String,
    /// Breed
    pub breed: String,
    /// Age in whole years
    pub age: u32,
    /// Weight label including unit (e.g. "32.5 kg")
    pub weight: String,
    /// Sex
    pub sex: Sex,
}

impl PatientInfo {
    /// Age as shown on the patient card.
    pub fn age_label(&self) -> String {
        format!("{} years", self.age)
    }
}
