//! Command-line front end for the costrisk analysis engine
//!
//! Loads YAML scenario files, runs them on a background worker and renders
//! text or JSON reports, optionally persisting replayable audit records.

// ============================================================================
// Modules
// ============================================================================

pub mod logging;
pub mod report;
pub mod scenario;
pub mod util;
pub mod worker;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use logging::init_logging;
pub use report::{ScenarioReport, render_text, render_tornado};
pub use scenario::{Scenario, ScenarioError};
pub use worker::{AnalysisWorker, WorkerRequest, WorkerResponse};
