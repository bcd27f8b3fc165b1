//! Object detection behind the analysis endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vetai_vision_core::Finding;

/// Detection errors.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Detection failed: {0}")]
    Inference(String),

    #[error("Invalid detector output: {0}")]
    InvalidOutput(String),
}

pub type DetectorResult<T> = Result<T, DetectorError>;

/// An object located in the image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalizedObject {
    pub name: String,
    /// Detector score (0.0 - 1.0)
    pub score: f64,
    /// Top-left vertex of the bounding box, normalized to the image size
    pub vertex: (f64, f64),
}

/// Source of localized objects for an image.
pub trait Detector: Send + Sync {
    fn detect(&self) -> DetectorResult<Vec<LocalizedObject>>;
}

/// Convert detections to findings.
pub fn to_findings(objects: &[LocalizedObject]) -> DetectorResult<Vec<Finding>> {
    objects
        .iter()
        .map(|o| {
            if !o.score.is_finite() {
                return Err(DetectorError::InvalidOutput(format!(
                    "non-finite score for {}",
                    o.name
                )));
            }
            Ok(Finding::from_localized(o.name.clone(), o.score, o.vertex))
        })
        .collect()
}

/// Detector that reports the same two objects for every image.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDetector;

impl Detector for SimulatedDetector {
    fn detect(&self) -> DetectorResult<Vec<LocalizedObject>> {
        Ok(vec![
            LocalizedObject {
                name: "Joint abnormality detected".into(),
                score: 0.95,
                vertex: (0.45, 0.32),
            },
            LocalizedObject {
                name: "Bone density variation".into(),
                score: 0.87,
                vertex: (0.62, 0.58),
            },
        ])
    }
}
