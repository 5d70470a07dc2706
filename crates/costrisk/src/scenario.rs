//! Scenario files: one YAML [`AnalysisRequest`] per file.
//!
//! ```yaml
//! base_cost: 1000000.0
//! iterations: 20000
//! risk_factors:
//!   - name: weather
//!     distribution: triangular
//!     min_value: -0.05
//!     most_likely: 0.0
//!     max_value: 0.15
//! correlation_matrix:
//!   - [1.0]
//! ```

use std::path::{Path, PathBuf};

use costrisk_core::AnalysisRequest;

/// Error types for scenario loading
#[derive(Debug)]
pub enum ScenarioError {
    /// File could not be read
    Io { path: PathBuf, message: String },
    /// File is not a valid analysis request
    Parse { path: PathBuf, message: String },
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io { path, message } => {
                write!(f, "IO error reading {}: {}", path.display(), message)
            }
            ScenarioError::Parse { path, message } => {
                write!(f, "Parse error in {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

/// A named analysis request
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub request: AnalysisRequest,
}

impl Scenario {
    /// Parse a scenario from YAML
    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, serde_saphyr::Error> {
        Ok(Self {
            name: name.into(),
            request: serde_saphyr::from_str(yaml)?,
        })
    }

    /// Load a scenario file; the scenario is named after the file stem
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let yaml = std::fs::read_to_string(path).map_err(|e| ScenarioError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "scenario".to_string());

        let scenario = Self::from_yaml(name, &yaml).map_err(|e| ScenarioError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(
            "Loaded scenario '{}' with {} risk factors from {}",
            scenario.name,
            scenario.request.risk_factors.len(),
            path.display()
        );
        Ok(scenario)
    }

    /// Apply command-line overrides.
    ///
    /// `target_level` is added to the requested confidence levels when
    /// missing so the contingency summary has a percentile to read.
    pub fn apply_overrides(&mut self, iterations: Option<usize>, seed: Option<u64>, target_level: f64) {
        if let Some(iterations) = iterations {
            self.request.iterations = iterations;
        }
        if let Some(seed) = seed {
            self.request.random_seed = seed;
        }

        let levels = &mut self.request.confidence_levels;
        if !levels.iter().any(|level| (level - target_level).abs() < 1e-9) {
            levels.push(target_level);
            levels.sort_by(f64::total_cmp);
        }
    }

    /// File name of this scenario's audit record
    #[must_use]
    pub fn audit_file_name(&self) -> String {
        format!("{}.audit.json", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const BRIDGE_YAML: &str = r#"
base_cost: 2500000.0
iterations: 5000
random_seed: 7
risk_factors:
  - name: weather
    distribution: triangular
    min_value: -0.05
    most_likely: 0.0
    max_value: 0.15
  - name: steel_prices
    distribution: lognormal
    mean: 0.04
    std_dev: 0.02
correlation_matrix:
  - [1.0, 0.3]
  - [0.3, 1.0]
"#;

    #[test]
    fn test_from_yaml() {
        let scenario = Scenario::from_yaml("bridge", BRIDGE_YAML).unwrap();
        let request = &scenario.request;
        assert_eq!(request.base_cost, 2_500_000.0);
        assert_eq!(request.iterations, 5_000);
        assert_eq!(request.random_seed, 7);
        assert_eq!(request.risk_factors.len(), 2);
        assert_eq!(request.risk_factors[1].mean, Some(0.04));
        assert_eq!(request.risk_factors[1].min_value, None);
        assert_eq!(
            request.correlation_matrix,
            Some(vec![vec![1.0, 0.3], vec![0.3, 1.0]])
        );
        // defaults fill what the file leaves out
        assert_eq!(request.confidence_levels, vec![0.50, 0.80, 0.95]);
    }

    #[test]
    fn test_load_names_scenario_after_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bridge_deck.yaml");
        std::fs::write(&path, BRIDGE_YAML).unwrap();

        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.name, "bridge_deck");
        assert_eq!(scenario.audit_file_name(), "bridge_deck.audit.json");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Scenario::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "risk_factors: []\n").unwrap();

        let err = Scenario::load(&path).unwrap_err();
        assert!(matches!(err, ScenarioError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_overrides() {
        let mut scenario = Scenario::from_yaml("bridge", BRIDGE_YAML).unwrap();
        scenario.apply_overrides(Some(20_000), None, 0.90);

        assert_eq!(scenario.request.iterations, 20_000);
        assert_eq!(scenario.request.random_seed, 7);
        assert_eq!(scenario.request.confidence_levels, vec![0.50, 0.80, 0.90, 0.95]);

        scenario.apply_overrides(None, Some(1), 0.80);
        assert_eq!(scenario.request.random_seed, 1);
        assert_eq!(scenario.request.confidence_levels.len(), 4);
    }
}
