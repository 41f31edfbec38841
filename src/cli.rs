use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "devlog")]
#[command(about = "Generate enhanced multi-repository DEVLOG.md")]
pub struct CliArgs {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Output filename
    #[arg(long, default_value = "DEVLOG.md")]
    pub output: PathBuf,

    /// Path to configuration file. Without it, .devlog/config.json is looked up
    /// under the parent of the executable's directory, then the working directory
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Log filter directive derived from `--debug`
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "warn" }
    }
}
