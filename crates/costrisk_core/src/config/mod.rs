//! Analyzer configuration and the risk factor builder DSL
//!
//! ```ignore
//! use costrisk_core::config::{AnalyzerConfig, RiskFactorBuilder};
//! use costrisk_core::RiskAnalyzer;
//!
//! let analyzer = RiskAnalyzer::new(AnalyzerConfig::default().iterations(50_000).seed(7));
//! let factors = vec![
//!     RiskFactorBuilder::triangular("weather").three_point(-0.05, 0.0, 0.15).build()?,
//!     RiskFactorBuilder::pert("permitting").three_point(0.0, 0.02, 0.10).build()?,
//! ];
//! let result = analyzer.run_analysis(1_000_000.0, &factors, None)?;
//! ```

mod analyzer_config;
mod factor_builder;

pub use analyzer_config::{
    AnalyzerConfig, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_CONFIDENCE_LEVELS,
    DEFAULT_MONTE_CARLO_ITERATIONS, DEFAULT_RANDOM_SEED, MAX_REQUEST_ITERATIONS,
    MIN_REQUEST_ITERATIONS, confidence_levels_for_target,
};
pub use factor_builder::RiskFactorBuilder;
