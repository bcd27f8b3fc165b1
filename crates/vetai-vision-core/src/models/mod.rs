//! Domain models for the imaging review system.

mod analysis;
mod history;
mod patient;

pub use analysis::*;
pub use history::*;
pub use patient::*;
