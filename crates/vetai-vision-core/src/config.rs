//! Session configuration.

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "VetAI Vision";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default time an analysis takes to come back.
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;
/// Default time a save takes to complete.
pub const DEFAULT_SAVE_DELAY_MS: u64 = 1000;

/// Timing of the simulated work in a review session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub analysis_delay_ms: u64,
    pub save_delay_ms: u64,
}

impl SessionConfig {
    /// No delays: scheduled work completes on the next poll.
    pub fn immediate() -> Self {
        Self {
            analysis_delay_ms: 0,
            save_delay_ms: 0,
        }
    }

    pub(crate) fn analysis_delay(&self) -> chrono::Duration {
        millis(self.analysis_delay_ms)
    }

    pub(crate) fn save_delay(&self) -> chrono::Duration {
        millis(self.save_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            save_delay_ms: DEFAULT_SAVE_DELAY_MS,
        }
    }
}

fn millis(ms: u64) -> chrono::Duration {
    chrono::Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX / 1_000_000))
}
