use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the devlog pipeline
#[derive(Error, Debug)]
pub enum DevlogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("`repositories` must be an object, found null in {path}")]
    NullRepositories { path: PathBuf },

    #[error("Cannot locate project root from executable {exe}")]
    ProjectRoot { exe: PathBuf },

    #[error("Failed to spawn git {command}: {source}")]
    GitSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to format Markdown: {0}")]
    Render(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, DevlogError>;
