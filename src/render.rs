//! Markdown rendering of the devlog document.
//!
//! Layout, top to bottom: header, navigation bar, project overview, the
//! "All Repositories" recent-activity slice, one collapsible section per
//! repository, statistics tables and a footer. Wall-clock time is passed in
//! so two renders of the same history differ only in their timestamps.

use chrono::NaiveDateTime;
use std::fmt::{self, Write};

use crate::aggregate::{Aggregate, Totals, group_by_day};
use crate::classify::classify;
use crate::commit::{Commit, FileChange};
use crate::config::{DEFAULT_EMOJI, Repositories};
use crate::error::Result;
use crate::format::{signed_thousands, thousands};

/// Number of most recent dates shown in the "All Repositories" section
pub const RECENT_DAYS: usize = 10;

/// Files listed per commit before the remainder is summarized
pub const FILES_SHOWN: usize = 3;

pub const OLDER_COMMITS_NOTE: &str = "*For older commits, see the per-repository sections below.*";

pub struct Renderer<'a> {
    repos: &'a Repositories,
    agg: Aggregate<'a>,
    now: NaiveDateTime,
}

impl<'a> Renderer<'a> {
    /// `commits` must already be sorted ascending by date
    pub fn new(repos: &'a Repositories, commits: &'a [Commit], now: NaiveDateTime) -> Self {
        Self {
            repos,
            agg: Aggregate::new(commits),
            now,
        }
    }

    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        self.header(&mut out)?;
        self.navigation(&mut out)?;
        self.overview(&mut out)?;
        self.recent_activity(&mut out)?;
        self.per_repository(&mut out)?;
        self.statistics(&mut out)?;
        Ok(out)
    }

    fn header(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "# Development Log - Multi-Repository View")?;
        writeln!(out)?;
        writeln!(
            out,
            "> **Auto-Generated**: This file is programmatically updated from git history.  "
        )?;
        writeln!(out, "> Last updated: {}", self.now.format("%Y-%m-%d at %H:%M:%S PST"))?;
        writeln!(out)
    }

    fn navigation(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "## 🔍 Quick Navigation")?;
        writeln!(out)?;
        writeln!(out, "<div align=\"center\">")?;
        writeln!(out)?;
        writeln!(out, "### Filter by Repository")?;
        writeln!(out)?;
        write!(out, "| [**📋 All Repositories**](#all-repositories) ")?;
        for repo in self.repos {
            write!(out, "| [**{} {}**](#{}) ", repo.emoji(), repo.name, repo.anchor())?;
        }
        writeln!(out, "|")?;
        writeln!(out)?;
        writeln!(out, "### Quick Links")?;
        writeln!(out)?;
        writeln!(
            out,
            "| [**📊 Statistics**](#statistics) | [**📈 Repository Breakdown**](#repository-breakdown) | [**🗓️ Recent Activity**](#recent-activity) |"
        )?;
        writeln!(out)?;
        writeln!(out, "</div>")?;
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(out)
    }

    fn overview(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "## Project Overview")?;
        writeln!(out)?;
        writeln!(out, "This development log provides multiple views of your project's commit history:")?;
        writeln!(out, "- **All Repositories**: Complete chronological view across all repos")?;
        writeln!(out, "- **Per-Repository**: Filtered view showing only commits from specific repositories")?;
        writeln!(
            out,
            "- **Collapsible Sections**: Click on \"Files Modified\" to expand/collapse file details"
        )?;
        writeln!(out)?;
        writeln!(out, "### Repository Structure")?;
        for repo in self.repos {
            writeln!(
                out,
                "- {} **[{}]({})**: {}",
                repo.emoji(),
                repo.name,
                repo.github_url,
                repo.description
            )?;
        }
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)
    }

    fn recent_activity(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "<a name=\"all-repositories\"></a>")?;
        writeln!(out, "## 📋 All Repositories")?;
        writeln!(out)?;
        writeln!(out, "<a name=\"recent-activity\"></a>")?;
        writeln!(out, "### Recent Activity")?;
        writeln!(out)?;
        writeln!(out, "Showing all commits from all repositories in chronological order.")?;
        writeln!(out)?;

        for (day, commits) in self.agg.by_date.iter().rev().take(RECENT_DAYS) {
            writeln!(out, "#### {day}")?;
            writeln!(out)?;
            for commit in commits.iter().rev() {
                commit_entry(out, commit, true)?;
            }
            writeln!(out, "---")?;
            writeln!(out)?;
        }

        if self.agg.by_date.len() > RECENT_DAYS {
            writeln!(out)?;
            writeln!(out, "{OLDER_COMMITS_NOTE}")?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn per_repository(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "## 📁 Per-Repository Views")?;
        writeln!(out)?;
        writeln!(
            out,
            "Click on any repository section below to see commits filtered by that repository only."
        )?;
        writeln!(out)?;

        for repo in self.repos {
            let commits = self.agg.repo_commits(&repo.name);

            writeln!(out, "---")?;
            writeln!(out)?;
            writeln!(out, "<a name=\"{}\"></a>", repo.anchor())?;
            writeln!(out, "### {} {} Repository Only", repo.emoji(), repo.name)?;
            writeln!(out)?;
            writeln!(out, "<details>")?;
            writeln!(
                out,
                "<summary>Click to expand {} commits from {}</summary>",
                commits.len(),
                repo.name
            )?;
            writeln!(out)?;

            for (day, day_commits) in group_by_day(commits.iter().copied()).iter().rev() {
                writeln!(out)?;
                writeln!(out, "#### {day}")?;
                writeln!(out)?;
                for commit in day_commits.iter().rev() {
                    commit_entry(out, commit, false)?;
                }
            }

            writeln!(out)?;
            writeln!(out, "</details>")?;
            writeln!(out)?;
        }
        Ok(())
    }

    fn statistics(&self, out: &mut String) -> fmt::Result {
        let totals = &self.agg.totals;

        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(out, "<a name=\"statistics\"></a>")?;
        writeln!(out, "## 📊 Statistics")?;
        writeln!(out)?;
        writeln!(out, "### Overall Summary")?;
        writeln!(out)?;
        writeln!(out, "| Metric | Value |")?;
        writeln!(out, "|--------|-------|")?;
        writeln!(out, "| **Total Commits** | {} |", totals.commits)?;
        writeln!(out, "| **Contributors** | {} |", totals.contributors())?;
        writeln!(out, "| **Files Changed** | {} |", thousands(totals.files_changed))?;
        writeln!(out, "| **Lines Added** | +{} |", thousands(totals.insertions))?;
        writeln!(out, "| **Lines Removed** | -{} |", thousands(totals.deletions))?;
        writeln!(out, "| **Net Change** | {} |", signed_thousands(totals.net_change()))?;
        writeln!(out, "| **Development Period** | {} |", development_period(totals))?;
        writeln!(out, "| **Active Repositories** | {} |", self.agg.active_repositories())?;
        writeln!(out)?;
        writeln!(out, "<a name=\"repository-breakdown\"></a>")?;
        writeln!(out, "### 📈 Repository Breakdown")?;
        writeln!(out)?;
        writeln!(out, "| Repository | Commits | Contributors | Files Changed | Lines Changed |")?;
        writeln!(out, "|------------|---------|--------------|---------------|--------------|")?;

        for row in self.agg.breakdown() {
            let emoji = self.repos.get(&row.repo).map_or(DEFAULT_EMOJI, |r| r.emoji());
            writeln!(
                out,
                "| {} **{}** | {} | {} | {} | +{} -{} |",
                emoji,
                row.repo,
                row.totals.commits,
                row.totals.contributors(),
                thousands(row.totals.files_changed),
                thousands(row.totals.insertions),
                thousands(row.totals.deletions)
            )?;
        }

        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "---")?;
        writeln!(out)?;
        writeln!(out, "*This file is automatically generated from git history across all repositories.*  ")?;
        writeln!(
            out,
            "*Use the navigation links at the top to filter by repository or jump to specific sections.*  "
        )?;
        writeln!(out, "*Last updated: {}*", self.now.format("%Y-%m-%d %H:%M:%S PST"))
    }
}

/// Render one commit as an H3 entry with its bullets and file list
pub fn commit_entry(out: &mut String, commit: &Commit, show_repo_badge: bool) -> fmt::Result {
    let status = classify(&commit.subject);
    let stats = &commit.stats;

    writeln!(out, "### [{}] {}", commit.hash_short, commit.subject)?;
    if show_repo_badge {
        writeln!(
            out,
            "- **Repository**: {} **[{}]({})** - {}",
            commit.emoji, commit.repo, commit.github_url, commit.repo_description
        )?;
    }
    writeln!(out, "- **Date**: {}  ", commit.date.format("%Y-%m-%d %H:%M:%S PST"))?;
    writeln!(out, "- **Author**: {}", commit.author)?;
    writeln!(out, "- **Status**: {status}")?;
    writeln!(
        out,
        "- **Changes**: {} files changed ({})",
        stats.files_changed,
        change_summary(stats.total_insertions, stats.total_deletions).unwrap_or_else(|| "No changes".into())
    )?;
    writeln!(out, "- **Commit**: [`{}`]({})", commit.hash_short, commit.permalink())?;
    writeln!(out)?;
    writeln!(out, "<details>")?;
    writeln!(out, "<summary>Files Modified</summary>")?;
    writeln!(out)?;

    if stats.files_list.is_empty() {
        writeln!(out, "  - *No files modified*")?;
    }
    for file in stats.files_list.iter().take(FILES_SHOWN) {
        writeln!(out, "  - {}", file_line(file))?;
    }
    if stats.files_list.len() > FILES_SHOWN {
        writeln!(out, "  - *...and {} more files*", stats.files_list.len() - FILES_SHOWN)?;
    }

    writeln!(out)?;
    writeln!(out, "</details>")?;
    writeln!(out)
}

fn file_line(file: &FileChange) -> String {
    if file.binary {
        return format!("`{}` *(binary)*", file.filename);
    }
    let changes = change_summary(file.insertions, file.deletions).unwrap_or_else(|| "no changes".into());
    format!("`{}` ({})", file.filename, changes)
}

/// `+X -Y` with zero parts omitted; `None` when both are zero
fn change_summary(insertions: u64, deletions: u64) -> Option<String> {
    let parts: Vec<String> = [(insertions, '+'), (deletions, '-')]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, sign)| format!("{sign}{n}"))
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

fn development_period(totals: &Totals) -> String {
    match (totals.earliest, totals.latest) {
        (Some(first), Some(last)) => format!("{}-{}", first.format("%B %d"), last.format("%d, %Y")),
        _ => "No commits found".to_string(),
    }
}
