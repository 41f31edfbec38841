use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};

use crate::commit::Commit;

/// Running totals over a set of commits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub commits: usize,
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub authors: HashSet<String>,
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
}

impl Totals {
    pub fn add(&mut self, commit: &Commit) {
        self.commits += 1;
        self.files_changed += commit.stats.files_changed as u64;
        self.insertions += commit.stats.total_insertions;
        self.deletions += commit.stats.total_deletions;
        self.authors.insert(commit.author.clone());
        self.earliest = Some(self.earliest.map_or(commit.date, |d| d.min(commit.date)));
        self.latest = Some(self.latest.map_or(commit.date, |d| d.max(commit.date)));
    }

    pub fn contributors(&self) -> usize {
        self.authors.len()
    }

    pub fn net_change(&self) -> i64 {
        self.insertions as i64 - self.deletions as i64
    }
}

impl<'a> FromIterator<&'a Commit> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a Commit>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for commit in iter {
            totals.add(commit);
        }
        totals
    }
}

/// Totals scoped to a single repository
#[derive(Debug, Clone, PartialEq)]
pub struct RepoTotals {
    pub repo: String,
    pub totals: Totals,
}

/// Commits bucketed by `YYYY-MM-DD`, each bucket in ascending order
pub type DayGroups<'a> = BTreeMap<String, Vec<&'a Commit>>;

pub fn group_by_day<'a, I>(commits: I) -> DayGroups<'a>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut days: DayGroups<'a> = BTreeMap::new();
    for commit in commits {
        days.entry(commit.day()).or_default().push(commit);
    }
    days
}

/// Groupings and statistics over the globally sorted commit list
#[derive(Debug)]
pub struct Aggregate<'a> {
    pub by_date: DayGroups<'a>,
    /// Per-repo commit lists, in order of each repo's first commit
    pub by_repo: Vec<(String, Vec<&'a Commit>)>,
    pub totals: Totals,
}

impl<'a> Aggregate<'a> {
    pub fn new(commits: &'a [Commit]) -> Self {
        let mut by_repo: Vec<(String, Vec<&'a Commit>)> = Vec::new();
        for commit in commits {
            match by_repo.iter_mut().find(|(name, _)| *name == commit.repo) {
                Some((_, list)) => list.push(commit),
                None => by_repo.push((commit.repo.clone(), vec![commit])),
            }
        }

        Self {
            by_date: group_by_day(commits),
            by_repo,
            totals: commits.iter().collect(),
        }
    }

    /// Commits of `repo` in ascending order; empty when it has none
    pub fn repo_commits(&self, repo: &str) -> &[&'a Commit] {
        self.by_repo
            .iter()
            .find(|(name, _)| name == repo)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// Repositories with at least one commit
    pub fn active_repositories(&self) -> usize {
        self.by_repo.len()
    }

    /// Per-repo totals sorted by commit count, most active first
    pub fn breakdown(&self) -> Vec<RepoTotals> {
        let mut rows: Vec<RepoTotals> = self
            .by_repo
            .iter()
            .map(|(repo, list)| RepoTotals {
                repo: repo.clone(),
                totals: list.iter().copied().collect(),
            })
            .collect();
        rows.sort_by(|a, b| b.totals.commits.cmp(&a.totals.commits));
        rows
    }
}
