use chrono::{DateTime, NaiveDateTime};

use crate::config::Repository;

/// Per-file tally from `git show --numstat`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileChange {
    pub filename: String,
    pub insertions: u64,
    pub deletions: u64,
    pub total_changes: u64,
    pub binary: bool,
}

impl FileChange {
    pub fn text(filename: &str, insertions: u64, deletions: u64) -> Self {
        Self {
            filename: filename.to_string(),
            insertions,
            deletions,
            total_changes: insertions + deletions,
            binary: false,
        }
    }

    pub fn binary(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            binary: true,
            ..Self::default()
        }
    }

    /// Parse one `<ins>\t<del>\t<filename>` line. A `-` or any other
    /// non-numeric count marks the entry binary with zero counts.
    pub fn parse_numstat_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            return None;
        }
        let filename = parts[2..].join("\t");

        match (parts[0].parse::<u64>(), parts[1].parse::<u64>()) {
            (Ok(ins), Ok(del)) if is_count(parts[0]) && is_count(parts[1]) => {
                Some(Self::text(&filename, ins, del))
            }
            _ => Some(Self::binary(&filename)),
        }
    }
}

fn is_count(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// File list and line totals for one commit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitStats {
    pub files_changed: usize,
    pub files_list: Vec<FileChange>,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub total_changes: u64,
}

impl CommitStats {
    pub fn from_files(files_list: Vec<FileChange>) -> Self {
        let (total_insertions, total_deletions) = files_list
            .iter()
            .filter(|f| !f.binary)
            .fold((0, 0), |(ins, del), f| (ins + f.insertions, del + f.deletions));

        Self {
            files_changed: files_list.len(),
            files_list,
            total_insertions,
            total_deletions,
            total_changes: total_insertions + total_deletions,
        }
    }

    pub fn parse_numstat(output: &str) -> Self {
        let files = output
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(FileChange::parse_numstat_line)
            .collect();
        Self::from_files(files)
    }
}

/// Fields of one `%H|%ad|%s|%an` log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub hash: &'a str,
    pub date: &'a str,
    pub subject: &'a str,
    pub author: &'a str,
}

impl<'a> LogLine<'a> {
    /// Split on `|` into at most four fields; the author keeps any extra `|`
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut parts = line.splitn(4, '|');
        Some(Self {
            hash: parts.next()?,
            date: parts.next()?,
            subject: parts.next()?,
            author: parts.next()?,
        })
    }
}

/// Parse a `--date=iso` timestamp, keeping the authored wall-clock time.
/// Falls back to offset-free forms before giving up.
///
/// The offset is validated and then dropped, so commits authored in
/// different zones order by local wall clock, not by absolute instant.
pub fn parse_commit_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// One normalized commit, immutable after extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub hash: String,
    pub hash_short: String,
    pub date: NaiveDateTime,
    pub subject: String,
    pub author: String,
    pub repo: String,
    pub repo_description: String,
    pub github_url: String,
    pub emoji: String,
    pub stats: CommitStats,
}

impl Commit {
    pub fn new(line: LogLine<'_>, date: NaiveDateTime, repo: &Repository, stats: CommitStats) -> Self {
        Self {
            hash: line.hash.to_string(),
            hash_short: line.hash.chars().take(7).collect(),
            date,
            subject: line.subject.to_string(),
            author: line.author.to_string(),
            repo: repo.name.clone(),
            repo_description: repo.description.clone(),
            github_url: repo.github_url.clone(),
            emoji: repo.emoji().to_string(),
            stats,
        }
    }

    /// `YYYY-MM-DD` grouping key
    pub fn day(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn permalink(&self) -> String {
        format!("{}/commit/{}", self.github_url, self.hash)
    }
}
