//! Strata CLI - plan and run dependency layers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use strata::{FixSuggestion, LayerExecutor, Manifest, ShellWorker, StrataError, Worker};

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Strata - layered topological sort for dependency-driven builds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layer-by-layer execution plan for a manifest
    Plan {
        /// Path to a YAML or JSON manifest
        file: PathBuf,
    },

    /// Execute a manifest layer by layer (targets within a layer run in parallel)
    Run {
        /// Path to a YAML or JSON manifest
        file: PathBuf,

        /// Print the plan without running any commands
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a manifest (parse and check for dependency cycles)
    Validate {
        /// Path to a YAML or JSON manifest
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { file } => plan_manifest(&file),
        Commands::Run { file, dry_run } => run_manifest(&file, dry_run).await,
        Commands::Validate { file } => validate_manifest(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn plan_manifest(file: &Path) -> Result<(), StrataError> {
    let manifest = Manifest::from_path(file)?;
    let layers = manifest.to_graph().sort_by_layers()?;

    print_plan(&manifest, &layers);
    Ok(())
}

async fn run_manifest(file: &Path, dry_run: bool) -> Result<(), StrataError> {
    let manifest = Manifest::from_path(file)?;
    let layers = manifest.to_graph().sort_by_layers()?;

    if dry_run {
        print_plan(&manifest, &layers);
        return Ok(());
    }

    let worker: Arc<dyn Worker> = Arc::new(ShellWorker::from_manifest(&manifest));
    let executor = LayerExecutor::new(worker);

    let report = executor.execute(&layers).await?;

    for result in &report.results {
        let mark = if result.success {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("{} [layer {}] {}", mark, result.layer + 1, result.id);
        if !result.output.is_empty() {
            println!("  {}", result.output);
        }
    }

    if !report.is_success() {
        let failed = report.failures().count();
        return Err(StrataError::Execution(format!(
            "{} target(s) failed; stopped after {} completed layer(s)",
            failed, report.layers_completed
        )));
    }

    println!(
        "{} {} layer(s) completed",
        "✓".green(),
        report.layers_completed
    );
    Ok(())
}

fn validate_manifest(file: &Path) -> Result<(), StrataError> {
    let manifest = Manifest::from_path(file)?;
    let layers = manifest.to_graph().sort_by_layers()?;

    let edges: usize = manifest.targets.iter().map(|t| t.dependencies.len()).sum();

    println!("{} Manifest '{}' is valid", "✓".green(), file.display());
    println!("  Targets: {}", manifest.targets.len());
    println!("  Edges: {}", edges);
    println!("  Layers: {}", layers.len());

    Ok(())
}

fn print_plan(manifest: &Manifest, layers: &[Vec<String>]) {
    if let Some(name) = &manifest.name {
        println!("{} {}", "Plan for".cyan(), name.cyan().bold());
    }
    for (i, layer) in layers.iter().enumerate() {
        println!("{} {}", format!("Layer {}:", i + 1).cyan().bold(), layer.join(", "));
    }
}
