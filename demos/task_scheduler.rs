//! Task scheduler demo: layered sort driving a timed simulation.
//!
//! Builds a service startup graph, prints the execution plan, then "runs"
//! each layer concurrently with sleep-based workers and compares the elapsed
//! time against sequential execution.
//!
//! Run with: cargo run --example task_scheduler

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;

use strata::{Graph, LayerExecutor, StrataError, Worker};

struct Task {
    description: &'static str,
    duration: Duration,
}

/// Worker that simulates a task by sleeping for its duration
struct SleepWorker {
    tasks: HashMap<&'static str, Task>,
}

#[async_trait]
impl Worker for SleepWorker {
    async fn run(&self, id: &str) -> Result<String, StrataError> {
        let task = self
            .tasks
            .get(id)
            .ok_or_else(|| StrataError::UnknownTarget {
                name: id.to_string(),
            })?;
        println!("Starting task: {} - {}", id, task.description);
        tokio::time::sleep(task.duration).await;
        Ok(format!("took {:?}", task.duration))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("Task Scheduler with Layered Topological Sort");
    println!("===========================================");

    let ms = Duration::from_millis;
    let tasks: HashMap<&'static str, Task> = [
        ("setup-db", Task { description: "Initialize database schema", duration: ms(200) }),
        ("load-data", Task { description: "Load initial data", duration: ms(300) }),
        ("api-server", Task { description: "Start API server", duration: ms(100) }),
        ("worker", Task { description: "Start background worker", duration: ms(100) }),
        ("cache", Task { description: "Initialize cache", duration: ms(100) }),
        ("notifications", Task { description: "Setup notification service", duration: ms(200) }),
        ("frontend", Task { description: "Start frontend server", duration: ms(100) }),
        ("monitoring", Task { description: "Start monitoring service", duration: ms(100) }),
        ("load-balancer", Task { description: "Configure load balancer", duration: ms(200) }),
        ("final-checks", Task { description: "Run system checks", duration: ms(100) }),
    ]
    .into_iter()
    .collect();

    let mut graph = Graph::new();
    graph.add_node("setup-db", vec![]);
    graph.add_node("load-data", vec!["setup-db"]);
    graph.add_node("api-server", vec!["load-data"]);
    graph.add_node("worker", vec!["load-data"]);
    graph.add_node("cache", vec!["setup-db"]);
    graph.add_node("notifications", vec!["worker"]);
    graph.add_node("frontend", vec!["api-server", "cache"]);
    graph.add_node("monitoring", vec!["api-server", "worker", "cache"]);
    graph.add_node("load-balancer", vec!["api-server", "frontend"]);
    graph.add_node("final-checks", vec!["frontend", "monitoring", "load-balancer", "notifications"]);

    let layers = graph.sort_by_layers()?;

    println!("\nTask Execution Plan:");
    for (i, layer) in layers.iter().enumerate() {
        println!("Layer {}: {:?}", i + 1, layer);
    }

    // LayerExecutor works on owned strings; the graph is generic
    let layers: Vec<Vec<String>> = layers
        .into_iter()
        .map(|layer| layer.into_iter().map(String::from).collect())
        .collect();

    let sequential: Duration = tasks.values().map(|t| t.duration).sum();

    println!("\nExecuting tasks:");
    let start = Instant::now();

    let executor = LayerExecutor::new(Arc::new(SleepWorker { tasks }));
    let report = executor.execute(&layers).await?;

    let elapsed = start.elapsed();

    for result in &report.results {
        println!("Completed task: {} ({})", result.id, result.output);
    }

    println!("\nAll tasks completed in {:?}", elapsed);
    println!("Sequential execution would take: {:?}", sequential);
    println!(
        "Parallel execution saved: {:?}",
        sequential.saturating_sub(elapsed)
    );

    Ok(())
}
