//! Strata - layered topological sorting for dependency-driven execution
//!
//! [`Graph`] partitions a dependency graph into ordered layers: everything in
//! a layer can run in parallel once the previous layers are done. The
//! manifest loader and layer executor are collaborators around that core.

pub mod error;
pub mod executor;
pub mod graph;
pub mod manifest;

pub use error::{FixSuggestion, StrataError};
pub use executor::{ExecutionReport, ItemResult, LayerExecutor, ShellWorker, Worker};
pub use graph::Graph;
pub use manifest::{Manifest, Target};
