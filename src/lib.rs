//! Single-target radar tracking core: a constant-velocity Kalman filter
//! with measurement gating, JPDA-reduced association, and track lifecycle
//! management.

pub mod associator;
pub mod config;
pub mod coords;
pub mod error;
pub mod filter;
pub mod grouper;
pub mod pipeline;
pub mod track;
pub mod types;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use pipeline::FilteredRecord;
pub use types::Detection;
