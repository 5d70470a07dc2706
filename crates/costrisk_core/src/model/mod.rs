mod correlation;
mod results;
mod risk_factor;

pub use correlation::CorrelationMatrix;
pub use results::{AnalysisWarning, CorrelationOutcome, SimulationResult, percentile_key};
pub use risk_factor::{Distribution, DistributionKind, PERT_LAMBDA, RiskFactor};
