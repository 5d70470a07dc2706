//! Plain-text and JSON rendering of analysis results.

use std::fmt::Write;

use costrisk_core::{CorrelationOutcome, EstimateSummary, SimulationResult};
use serde::Serialize;

use crate::util::format::{format_currency, format_percentage};

/// Width of the longest tornado bar, in characters
const TORNADO_WIDTH: usize = 30;

/// Machine-readable output for one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport<'a> {
    pub scenario: &'a str,
    pub result: &'a SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<&'a EstimateSummary>,
}

/// Human-readable report for one scenario
pub fn render_text(
    name: &str,
    result: &SimulationResult,
    summary: Option<&EstimateSummary>,
) -> String {
    let mut out = String::new();
    let rule = "=".repeat(44 + name.len());

    // writeln! into a String cannot fail
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Cost risk analysis: {name} ({} iterations)", result.iterations);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{:<18}{:>18}", "Base cost", format_currency(result.base_cost));
    let _ = writeln!(out, "{:<18}{:>18}", "Mean cost", format_currency(result.mean_cost));
    let _ = writeln!(out, "{:<18}{:>18}", "Std deviation", format_currency(result.std_dev));
    let _ = writeln!(out, "{:<18}{:>18}", "Minimum", format_currency(result.min_cost));
    let _ = writeln!(out, "{:<18}{:>18}", "Maximum", format_currency(result.max_cost));

    if !result.percentiles.is_empty() {
        let _ = writeln!(out, "\nPercentiles");
        let mut percentiles: Vec<_> = result.percentiles.iter().collect();
        percentiles.sort_by(|a, b| a.1.total_cmp(b.1));
        for (key, value) in percentiles {
            let _ = writeln!(out, "  {:<16}{:>18}", key.to_uppercase(), format_currency(*value));
        }
    }

    if let Some(summary) = summary {
        let _ = writeln!(
            out,
            "\nContingency at P{:.0}: {} ({})",
            summary.confidence_level * 100.0,
            format_currency(summary.contingency_amount()),
            format_percentage(summary.contingency_percentage)
        );
    }

    match result.correlation {
        CorrelationOutcome::NotRequested => {}
        CorrelationOutcome::Applied => {
            let _ = writeln!(out, "\nCorrelation: applied");
        }
        CorrelationOutcome::FallbackNotPositiveDefinite => {
            let _ = writeln!(
                out,
                "\nCorrelation: matrix not positive definite, factors sampled independently"
            );
        }
    }

    for warning in &result.warnings {
        let _ = writeln!(out, "Warning: {warning}");
    }

    let tornado = render_tornado(result);
    if !tornado.is_empty() {
        let _ = writeln!(out, "\nSensitivity (Spearman rank correlation)");
        out.push_str(&tornado);
    }
    out
}

/// One bar per factor, largest |rho| first
pub fn render_tornado(result: &SimulationResult) -> String {
    let ranked = result.ranked_sensitivities();
    let label_width = ranked.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, rho) in ranked {
        let len = (rho.abs() * TORNADO_WIDTH as f64).round() as usize;
        let bar = (if rho < 0.0 { "-" } else { "+" }).repeat(len);
        let _ = writeln!(out, "  {name:<label_width$}  {rho:>7.4}  {bar}");
    }
    out
}
