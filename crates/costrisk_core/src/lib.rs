//! Construction cost-risk analysis library
//!
//! This crate provides a Monte Carlo engine that turns a deterministic base
//! cost and a set of uncertain risk factors into a probabilistic cost
//! estimate. It supports:
//! - Triangular, normal, uniform, lognormal and PERT risk factors
//! - Latin Hypercube sampling with a reproducible seed
//! - Iman-Conover rank correlation between factors
//! - Percentile costs (P50/P80/P95 by default) and Spearman sensitivities
//! - Estimate contingency and replayable audit records
//!
//! # Builder DSL
//!
//! ```ignore
//! use costrisk_core::{AnalyzerConfig, RiskAnalyzer, RiskFactorBuilder};
//!
//! let factors = vec![
//!     RiskFactorBuilder::triangular("weather").three_point(-0.05, 0.0, 0.15).build()?,
//!     RiskFactorBuilder::normal("labor_rates").mean(0.02).std_dev(0.01).build()?,
//! ];
//! let result = RiskAnalyzer::new(AnalyzerConfig::default())
//!     .run_analysis(1_000_000.0, &factors, None)?;
//! println!("P80: {:?}", result.percentile(0.80));
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analyzer;
pub mod contingency;
pub mod error;
pub mod request;
pub mod stats;

mod aggregate;
mod correlation;
mod sampling;
mod sensitivity;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analyzer::{RiskAnalyzer, run_analysis};
pub use config::{AnalyzerConfig, RiskFactorBuilder};
pub use contingency::EstimateSummary;
pub use error::{CorrelationMatrixError, ParameterError, Result, RiskAnalysisError};
pub use model::{
    AnalysisWarning, CorrelationMatrix, CorrelationOutcome, Distribution, DistributionKind,
    RiskFactor, SimulationResult,
};
pub use request::{AnalysisRequest, AuditRecord, RiskFactorInput, build_risk_factors};
