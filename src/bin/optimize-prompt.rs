use anyhow::{Context, Result};
use clap::Parser;
use devlog::prompt::{self, DEFAULT_LIMIT};
use devlog::format::thousands;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "optimize-prompt")]
#[command(about = "Shrink a Markdown prompt below a character limit")]
struct Args {
    /// Markdown prompt to optimize
    input: PathBuf,

    /// Where to write the optimized prompt (defaults to <input>-optimized.md)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum number of characters allowed
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
}

fn run(args: Args) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let original = prompt::char_count(&content);
    println!("Original file: {} characters", thousands(original as u64));

    let sections = prompt::analyze_sections(&content);
    println!();
    print!("{}", prompt::section_report(&sections, original)?);

    println!();
    println!("Current: {} characters", thousands(original as u64));
    println!("Target:  {} characters", thousands(args.limit as u64));

    println!("\nApplying optimizations...");
    let optimized = prompt::apply_reductions(&content);
    let count = prompt::char_count(&optimized);
    debug!(sections = sections.len(), "Reductions applied");

    println!("\nOptimized: {} characters", thousands(count as u64));
    println!(
        "Reduced by: {} characters",
        thousands(original.saturating_sub(count) as u64)
    );

    if count > args.limit {
        println!(
            "\n❌ Still over limit by {} characters",
            thousands((count - args.limit) as u64)
        );
        println!("Need more aggressive optimization");
        return Ok(());
    }

    println!(
        "\n✅ SUCCESS: Content fits within {} character limit!",
        thousands(args.limit as u64)
    );
    let output = args
        .output
        .unwrap_or_else(|| prompt::default_output_path(&args.input));
    fs::write(&output, optimized)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("\nOptimized prompt saved to: {}", output.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
        .with_target(false)
        .init();

    if let Err(err) = run(Args::parse()) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
