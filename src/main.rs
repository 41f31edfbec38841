use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use devlog::cli::CliArgs;
use devlog::config::Repositories;
use devlog::git::SystemGit;
use std::fs;
use tracing::info;

const FEATURES: [&str; 5] = [
    "Navigation bar with repository filters",
    "Collapsible sections for better organization",
    "Per-repository filtered views",
    "Enhanced statistics with tables",
    "File change details in expandable sections",
];

fn run(args: &CliArgs) -> Result<()> {
    let repos = Repositories::load(args.config.clone());
    info!("Processing {} repositories", repos.len());

    let git = SystemGit::new(args.debug);
    let content = devlog::generate(&repos, &git, Local::now().naive_local())
        .context("Failed to render devlog")?;

    fs::write(&args.output, content)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(args.log_filter()))
        .with_target(false)
        .init();

    println!("Generating enhanced DEVLOG with navigation...");

    if let Err(err) = run(&args) {
        println!("❌ Error generating DEVLOG: {:#}", err);
        if args.debug {
            println!("{:?}", err);
        }
        std::process::exit(1);
    }

    println!("✅ {} generated successfully!", args.output.display());
    println!("📊 Features included:");
    for feature in FEATURES {
        println!("   - {feature}");
    }
}
