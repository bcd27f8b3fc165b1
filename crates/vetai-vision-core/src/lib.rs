//! VetAI Vision Core Library
//!
//! Review-session engine for veterinary imaging: upload a study, get
//! findings and diagnostic suggestions back, save the result into the
//! patient's history.
//!
//! # Architecture
//!
//! ```text
//!   upload_image ──► [selected_image] ──► run_analysis
//!                                             │
//!                                   TimerQueue (analysis delay)
//!                                             │
//!                                             ▼
//!                               [analysis]  ◄── carried history
//!                                             │
//!                                       save_analysis
//!                                             │
//!                                   TimerQueue (save delay)
//!                                             │
//!                                             ▼
//!                       [saved_analyses] + "AI Analysis" visit
//! ```
//!
//! State lives in [`ReviewState`] and only changes through its transition
//! methods. [`ReviewSession`] adds the clock and the timer queue; nothing
//! happens until it is polled, so tests run every transition synchronously.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Analysis, Finding, PatientInfo, PatientHistory, etc.)
//! - [`image`]: Data-URL image references
//! - [`clock`]: Injectable time source
//! - [`session`]: State, transitions and the session driver
//! - [`view`]: View model for the three tabs
//! - [`config`]: Session timing and app constants

pub mod clock;
pub mod config;
pub mod image;
pub mod models;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use image::{ImageError, ImageRef};
pub use models::{
    AiSuggestions, Analysis, Finding, LabResult, LabStatus, Medication, PatientHistory,
    PatientInfo, Severity, Sex, Visit,
};
pub use session::{current_history, ReviewSession, ReviewState, Tab};
pub use view::ViewModel;
