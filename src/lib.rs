//! devlog - consolidated Markdown development log for several Git repositories
//!
//! Pipeline: config -> git -> extract -> aggregate -> render. Each stage is
//! permissive: a repository, commit or file that cannot be read degrades to
//! an empty or zero-filled value instead of aborting the run.

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod git;
pub mod prompt;
pub mod render;

use chrono::NaiveDateTime;

use crate::config::Repositories;
use crate::extract::Extractor;
use crate::git::GitRunner;
use crate::render::Renderer;

/// Run the whole pipeline and return the Markdown document
pub fn generate<G: GitRunner>(repos: &Repositories, git: &G, now: NaiveDateTime) -> error::Result<String> {
    let commits = Extractor::new(git).collect(repos);
    tracing::info!("Rendering {} commits from {} repositories", commits.len(), repos.len());
    Renderer::new(repos, &commits, now).render()
}
