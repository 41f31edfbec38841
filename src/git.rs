use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::DevlogError;

/// Arguments for `git log --pretty=format:"%H|%ad|%s|%an" --date=iso --reverse`
pub const LOG_ARGS: [&str; 4] = ["log", "--pretty=format:%H|%ad|%s|%an", "--date=iso", "--reverse"];

/// Arguments for `git show --numstat --format="" <hash>`, minus the hash
pub const NUMSTAT_ARGS: [&str; 3] = ["show", "--numstat", "--format="];

/// Port for running git inside a working tree
pub trait GitRunner {
    /// Run git with `args` in `cwd` and return stdout with trailing
    /// whitespace stripped, or an empty string if the command failed
    fn run(&self, args: &[&str], cwd: &Path) -> String;
}

/// Runs the `git` executable found on `PATH`
#[derive(Debug, Default, Clone)]
pub struct SystemGit {
    debug: bool,
}

impl SystemGit {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn report(&self, command: &str, cwd: &Path, stderr: &str) {
        if self.debug {
            debug!(cwd = %cwd.display(), "Git command failed: {}", command);
            debug!("Error: {}", stderr.trim_end());
        }
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str], cwd: &Path) -> String {
        let command = format!("git {}", args.join(" "));
        let output = match Command::new("git").args(args).current_dir(cwd).output() {
            Ok(output) => output,
            Err(source) => {
                let err = DevlogError::GitSpawn {
                    command: command.clone(),
                    source,
                };
                self.report(&command, cwd, &err.to_string());
                return String::new();
            }
        };

        if !output.status.success() {
            self.report(&command, cwd, &String::from_utf8_lossy(&output.stderr));
            return String::new();
        }

        String::from_utf8_lossy(&output.stdout).trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn has_git() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    #[test]
    fn test_failed_command_yields_empty_string() {
        if !has_git() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        // Not a repository, so `git log` exits non-zero
        let out = SystemGit::new(true).run(&LOG_ARGS, temp_dir.path());
        assert_eq!(out, "");
    }

    #[test]
    fn test_missing_cwd_yields_empty_string() {
        let out = SystemGit::default().run(&["--version"], Path::new("/definitely/not/here"));
        assert_eq!(out, "");
    }

    #[test]
    fn test_output_is_trimmed() {
        if !has_git() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let out = SystemGit::default().run(&["--version"], temp_dir.path());
        assert!(out.starts_with("git version"));
        assert!(!out.ends_with('\n'));
    }
}
