//! Layer executor: fan-out within a layer, fan-in before the next
//!
//! Consumes the layer sequence produced by [`Graph::sort_by_layers`]: every
//! element of a layer runs concurrently, the whole layer is awaited, and a
//! failed layer halts execution before the next one starts. The graph itself
//! knows nothing about this module.
//!
//! [`Graph::sort_by_layers`]: crate::graph::Graph::sort_by_layers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::StrataError;
use crate::manifest::Manifest;

/// Default timeout for target commands (60 seconds)
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs one element of a layer
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self, id: &str) -> Result<String, StrataError>;
}

/// Worker that runs each target's manifest command through `sh -c`
pub struct ShellWorker {
    /// target name -> command (None for ordering-only targets)
    commands: HashMap<String, Option<String>>,
    timeout: Duration,
}

impl ShellWorker {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let commands = manifest
            .targets
            .iter()
            .map(|t| (t.name.clone(), t.command.clone()))
            .collect();
        Self {
            commands,
            timeout: COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Worker for ShellWorker {
    async fn run(&self, id: &str) -> Result<String, StrataError> {
        let command = match self.commands.get(id) {
            None => {
                return Err(StrataError::UnknownTarget {
                    name: id.to_string(),
                })
            }
            // declared without a command: nothing to do
            Some(None) => return Ok(String::new()),
            Some(Some(command)) => command,
        };

        debug!(target_id = id, %command, "running target command");

        let output = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new("sh")
                .arg("-c")
                .arg(command)
                .output(),
        )
        .await
        .map_err(|_| {
            StrataError::Execution(format!(
                "'{}' timed out after {}s",
                id,
                self.timeout.as_secs()
            ))
        })?
        .map_err(|e| StrataError::Execution(format!("failed to run '{}': {}", id, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StrataError::Execution(format!(
                "'{}' failed: {}",
                id,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Outcome of one element
#[derive(Debug, Clone)]
pub struct ItemResult {
    pub id: String,
    pub layer: usize,
    pub success: bool,
    pub output: String,
}

/// Execution summary across layers
#[derive(Debug)]
pub struct ExecutionReport {
    /// Layers fully completed without failure
    pub layers_completed: usize,
    pub results: Vec<ItemResult>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// Executes a layer sequence against a [`Worker`]
pub struct LayerExecutor {
    worker: Arc<dyn Worker>,
}

impl LayerExecutor {
    pub fn new(worker: Arc<dyn Worker>) -> Self {
        Self { worker }
    }

    /// Run every layer in order, one concurrent task per element.
    ///
    /// The next layer starts only after the entire current layer finished.
    /// If any element fails, the remaining layers are skipped and the report
    /// carries the per-element failures.
    pub async fn execute(&self, layers: &[Vec<String>]) -> Result<ExecutionReport, StrataError> {
        let mut results = Vec::new();
        let mut layers_completed = 0;

        for (index, layer) in layers.iter().enumerate() {
            info!(layer = index, size = layer.len(), "starting layer");

            let handles: Vec<_> = layer
                .iter()
                .cloned()
                .map(|id| {
                    let worker = Arc::clone(&self.worker);
                    tokio::spawn(async move {
                        let outcome = worker.run(&id).await;
                        (id, outcome)
                    })
                })
                .collect();

            let mut layer_failed = false;
            for handle in handles {
                let (id, outcome) = handle
                    .await
                    .map_err(|e| StrataError::Execution(format!("worker panicked: {}", e)))?;

                match outcome {
                    Ok(output) => results.push(ItemResult {
                        id,
                        layer: index,
                        success: true,
                        output,
                    }),
                    Err(e) => {
                        warn!(target_id = %id, error = %e, "target failed");
                        layer_failed = true;
                        results.push(ItemResult {
                            id,
                            layer: index,
                            success: false,
                            output: e.to_string(),
                        });
                    }
                }
            }

            if layer_failed {
                return Ok(ExecutionReport {
                    layers_completed,
                    results,
                });
            }
            layers_completed += 1;
        }

        Ok(ExecutionReport {
            layers_completed,
            results,
        })
    }
}
