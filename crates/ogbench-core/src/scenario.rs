// Scenario model
//
// A scenario is one named set of image parameters sent identically to both
// targets. Scenario files are JSON with a top-level `scenarios` array.

use crate::error::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One benchmark scenario: a named parameter set for the image endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Short identifier used in reports (e.g., "simple_title")
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Query parameters sent to the image endpoint. Ordered map so request
    /// URLs are deterministic across runs.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Scenario {
    /// Create a scenario with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            params: BTreeMap::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add one query parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Top-level shape of a scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

/// Load scenarios from a JSON file.
///
/// A missing, unreadable, or malformed file is fatal: there is nothing to
/// benchmark without scenarios.
pub fn load_scenarios(path: impl AsRef<Path>) -> Result<Vec<Scenario>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| BenchError::scenario(format!("failed to read {}: {e}", path.display())))?;
    let file: ScenarioFile = serde_json::from_str(&raw)
        .map_err(|e| BenchError::scenario(format!("failed to parse {}: {e}", path.display())))?;
    if file.scenarios.is_empty() {
        return Err(BenchError::scenario(format!(
            "{} contains no scenarios",
            path.display()
        )));
    }
    Ok(file.scenarios)
}
