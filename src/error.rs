//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum StrataError {
    /// The graph is not a DAG; no layering exists.
    #[error("cyclic dependency detected")]
    CyclicDependency,

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("target '{name}' has no entry in the manifest")]
    UnknownTarget { name: String },

    #[error("execution error: {0}")]
    Execution(String),
}

impl FixSuggestion for StrataError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            StrataError::CyclicDependency => {
                Some("Remove one edge of the cycle so every dependency chain terminates")
            }
            StrataError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            StrataError::JsonParse(_) => Some("Check JSON syntax (try parsing with jq)"),
            StrataError::Io(_) => Some("Check file path and permissions"),
            StrataError::UnknownTarget { .. } => {
                Some("Declare the target in the manifest or drop the dependency on it")
            }
            StrataError::Execution(_) => Some("Check the target's command is valid"),
        }
    }
}
