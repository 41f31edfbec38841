use chrono::Local;
use tracing::debug;

use crate::commit::{Commit, CommitStats, LogLine, parse_commit_date};
use crate::config::{Repositories, Repository};
use crate::git::{GitRunner, LOG_ARGS, NUMSTAT_ARGS};

/// Walks configured repositories and turns their history into commit records
pub struct Extractor<'a, G: GitRunner> {
    git: &'a G,
}

impl<'a, G: GitRunner> Extractor<'a, G> {
    pub fn new(git: &'a G) -> Self {
        Self { git }
    }

    /// Commits of every repository, stably sorted by date ascending.
    /// Ties keep per-repo order, which follows descriptor order.
    pub fn collect(&self, repos: &Repositories) -> Vec<Commit> {
        let mut commits = Vec::new();
        for repo in repos {
            commits.extend(self.repository(repo));
        }
        commits.sort_by_key(|c| c.date);
        commits
    }

    /// Commits of one repository, oldest first. Missing paths and failed
    /// git invocations produce an empty list.
    pub fn repository(&self, repo: &Repository) -> Vec<Commit> {
        if !repo.path.is_dir() {
            debug!("Repository path not found: {}", repo.path.display());
            return Vec::new();
        }

        let log = self.git.run(&LOG_ARGS, &repo.path);
        if log.is_empty() {
            debug!("No commits found in {}", repo);
            return Vec::new();
        }

        let mut commits = Vec::new();
        for raw in log.lines() {
            let Some(line) = LogLine::parse(raw) else {
                debug!("Skipping unparseable log line in {}: {:?}", repo.name, raw);
                continue;
            };

            let date = parse_commit_date(line.date).unwrap_or_else(|| {
                debug!("Unparseable date {:?} on {}, using current time", line.date, line.hash);
                Local::now().naive_local()
            });

            let stats = self.stats(repo, line.hash);
            commits.push(Commit::new(line, date, repo, stats));
        }

        debug!("Extracted {} commits from {}", commits.len(), repo.name);
        commits
    }

    fn stats(&self, repo: &Repository, hash: &str) -> CommitStats {
        let mut args = NUMSTAT_ARGS.to_vec();
        args.push(hash);
        CommitStats::parse_numstat(&self.git.run(&args, &repo.path))
    }
}
