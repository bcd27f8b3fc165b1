//! Image analysis endpoint for VetAI Vision.
//!
//! A stateless HTTP service: every request gets the detector's findings as
//! `{"findings": [...]}`, CORS preflights get a bare `ok`. The shipped
//! detector is simulated and ignores the uploaded image.

pub mod config;
pub mod detector;
pub mod error;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use detector::{Detector, DetectorError, LocalizedObject, SimulatedDetector};
pub use error::ApiError;
pub use router::{analysis_router, FindingsResponse};
pub use server::{start_server, AnalysisServer, ServerError};
