//! Build manifest parsing (YAML or JSON)
//!
//! A manifest lists named targets with optional shell commands and their
//! dependencies. It carries no graph logic of its own; `to_graph` feeds the
//! declarations into a [`Graph`] and the sort does the rest.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::StrataError;
use crate::graph::Graph;

/// A manifest parsed from YAML or JSON
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    pub targets: Vec<Target>,
}

/// One buildable target
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub name: String,
    /// Shell command to run for this target; omit for ordering-only targets
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Manifest {
    /// Load a manifest file, picking the parser by extension
    /// (`.json` for JSON, anything else for YAML).
    pub fn from_path(path: &Path) -> Result<Self, StrataError> {
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, StrataError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_json(contents: &str) -> Result<Self, StrataError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the dependency graph from the declared targets.
    ///
    /// Dependencies on names with no target entry are legal; they show up as
    /// implicit nodes in the first layer.
    pub fn to_graph(&self) -> Graph<String> {
        let mut graph = Graph::new();
        for target in &self.targets {
            graph.add_node(target.name.clone(), target.dependencies.clone());
        }
        graph
    }

    /// Look up a target by name
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}
