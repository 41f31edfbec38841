use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, TimeZone};
use devlog::config::{Repositories, Repository};
use devlog::extract::Extractor;
use devlog::git::SystemGit;
use devlog::render::OLDER_COMMITS_NOTE;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

/// Commit the given files with a Pacific-time author date
fn commit_files(
    repo_path: &Path,
    files: &[(&str, &str)],
    message: &str,
    author: &str,
    (day, hour): (u32, u32),
) -> Result<String> {
    let git_repo = match git2::Repository::open(repo_path) {
        Ok(repo) => repo,
        Err(_) => git2::Repository::init(repo_path)?,
    };

    for (name, content) in files {
        fs::write(repo_path.join(name), content)?;
    }

    let mut index = git_repo.index()?;
    for (name, _) in files {
        index.add_path(Path::new(name))?;
    }
    index.write()?;
    let tree = git_repo.find_tree(index.write_tree()?)?;

    let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
    let local = NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .unwrap();
    let when = pacific.from_local_datetime(&local).unwrap().timestamp();
    let signature = git2::Signature::new(author, "dev@example.com", &git2::Time::new(when, -480))?;

    let parent = git_repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    let oid = git_repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
    Ok(oid.to_string())
}

fn descriptor(base: &Path, name: &str) -> Repository {
    Repository::new(
        name,
        base.join(name),
        &format!("{name} description"),
        &format!("https://github.com/example/{name}"),
    )
}

fn now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// Text between `start` and the next occurrence of `end` after it
fn between<'a>(doc: &'a str, start: &str, end: &str) -> &'a str {
    let from = doc.find(start).expect("start marker") + start.len();
    let to = doc[from..].find(end).map_or(doc.len(), |i| from + i);
    &doc[from..to]
}

#[test]
fn test_two_repos_interleaved_dates() -> Result<()> {
    if !has_git() {
        return Ok(());
    }
    let temp_dir = TempDir::new()?;
    let base = temp_dir.path();
    fs::create_dir_all(base.join("repo-a"))?;
    fs::create_dir_all(base.join("repo-b"))?;

    let a1 = commit_files(&base.join("repo-a"), &[("a.txt", "one\n")], "feat: first", "Ann", (1, 9))?;
    let b1 = commit_files(&base.join("repo-b"), &[("b.txt", "two\n")], "fix: second", "Bob", (2, 9))?;
    let a2 = commit_files(&base.join("repo-a"), &[("a.txt", "one\nthree\n")], "third", "Ann", (3, 9))?;

    let repos: Repositories = vec![descriptor(base, "repo-a"), descriptor(base, "repo-b")]
        .into_iter()
        .collect();
    let git = SystemGit::new(true);

    let commits = Extractor::new(&git).collect(&repos);
    let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(hashes, vec![a1.as_str(), b1.as_str(), a2.as_str()]);
    assert!(commits.windows(2).all(|w| w[0].date <= w[1].date));
    assert_eq!(commits[0].date.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-01 09:00:00");

    let doc = devlog::generate(&repos, &git, now())?;

    let jan2 = between(&doc, "#### 2024-01-02\n", "#### ");
    assert!(jan2.contains(&format!("### [{}] fix: second", &b1[..7])));
    assert!(!jan2.contains(&a1[..7]));
    assert!(!jan2.contains(&a2[..7]));

    let repo_a = between(&doc, "<a name=\"repo_a_only\"></a>", "<a name=\"repo_b_only\">");
    assert!(repo_a.contains("Click to expand 2 commits from repo-a"));
    let pos_a2 = repo_a.find(&format!("[{}]", &a2[..7])).expect("a2 listed");
    let pos_a1 = repo_a.find(&format!("[{}]", &a1[..7])).expect("a1 listed");
    assert!(pos_a2 < pos_a1, "per-repo view lists newest date first");
    assert!(!repo_a.contains("**Repository**"));

    assert!(doc.contains("| **Total Commits** | 3 |"));
    assert!(doc.contains("| **Contributors** | 2 |"));
    assert!(doc.contains("| **Development Period** | January 01-03, 2024 |"));
    assert!(doc.contains("| **Active Repositories** | 2 |"));
    Ok(())
}

#[test]
fn test_commit_stats_from_numstat() -> Result<()> {
    if !has_git() {
        return Ok(());
    }
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().join("stats");
    fs::create_dir_all(&repo_path)?;

    commit_files(&repo_path, &[("a.txt", "1\n2\n3\n4\n5\n")], "chore: seed", "Ann", (1, 8))?;
    let hash = commit_files(
        &repo_path,
        &[
            ("a.txt", "1\n2\nn1\nn2\nn3\nn4\nn5\nn6\nn7\nn8\n"),
            ("b.txt", "x\ny\n"),
        ],
        "feat: initial",
        "Ann",
        (1, 9),
    )?;

    let repos: Repositories = vec![Repository::new(
        "stats",
        &repo_path,
        "Stats",
        "https://github.com/example/stats",
    )]
    .into_iter()
    .collect();
    let git = SystemGit::default();
    let commits = Extractor::new(&git).collect(&repos);
    let commit = commits.iter().find(|c| c.hash == hash).expect("commit extracted");

    assert_eq!(commit.hash_short, &hash[..7]);
    assert_eq!(commit.stats.files_changed, 2);
    assert_eq!(commit.stats.files_changed, commit.stats.files_list.len());
    assert_eq!(commit.stats.total_insertions, 10);
    assert_eq!(commit.stats.total_deletions, 3);

    let doc = devlog::generate(&repos, &git, now())?;
    assert!(doc.contains(&format!("### [{}] feat: initial", &hash[..7])));
    assert!(doc.contains("- **Status**: 🟢 Feature"));
    assert!(doc.contains("- **Changes**: 2 files changed (+10 -3)"));
    assert!(doc.contains(&format!("/commit/{hash})")));
    Ok(())
}

#[test]
fn test_binary_file_is_marked() -> Result<()> {
    if !has_git() {
        return Ok(());
    }
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().join("assets");
    fs::create_dir_all(&repo_path)?;
    commit_files(&repo_path, &[("logo.png", "PNG\0\0\u{1}\u{2}")], "Add logo", "Ann", (5, 10))?;

    let repos: Repositories = vec![Repository::new("assets", &repo_path, "Assets", "https://example.com")]
        .into_iter()
        .collect();
    let git = SystemGit::default();
    let commits = Extractor::new(&git).collect(&repos);

    assert_eq!(commits.len(), 1);
    assert!(commits[0].stats.files_list[0].binary);
    assert_eq!(commits[0].stats.total_insertions, 0);

    let doc = devlog::generate(&repos, &git, now())?;
    assert!(doc.contains("  - `logo.png` *(binary)*"));
    assert!(doc.contains("- **Changes**: 1 files changed (No changes)"));
    Ok(())
}

#[test]
fn test_more_than_ten_dates() -> Result<()> {
    if !has_git() {
        return Ok(());
    }
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().join("busy");
    fs::create_dir_all(&repo_path)?;
    for day in 1..=12u32 {
        let content = format!("day {day}\n");
        commit_files(&repo_path, &[("log.txt", content.as_str())], &format!("update day {day}"), "Ann", (day, 9))?;
    }

    let repos: Repositories = vec![Repository::new("busy", &repo_path, "Busy", "https://example.com")]
        .into_iter()
        .collect();
    let doc = devlog::generate(&repos, &SystemGit::default(), now())?;

    let recent = between(&doc, "### Recent Activity", "## 📁 Per-Repository Views");
    assert_eq!(recent.matches("\n#### ").count(), 10);
    assert!(recent.contains("#### 2024-01-12"));
    assert!(recent.contains("#### 2024-01-03"));
    assert!(!recent.contains("#### 2024-01-02"));
    assert!(recent.contains(OLDER_COMMITS_NOTE));

    let per_repo = between(&doc, "## 📁 Per-Repository Views", "<a name=\"statistics\">");
    assert_eq!(per_repo.matches("\n#### ").count(), 12);
    Ok(())
}

#[test]
fn test_missing_repository_is_skipped() -> Result<()> {
    if !has_git() {
        return Ok(());
    }
    let temp_dir = TempDir::new()?;
    let real = temp_dir.path().join("real");
    fs::create_dir_all(&real)?;
    commit_files(&real, &[("x.txt", "x\n")], "docs: readme", "Ann", (4, 9))?;

    let repos: Repositories = vec![
        Repository::new("ghost", temp_dir.path().join("ghost"), "Gone", "https://example.com/ghost"),
        Repository::new("real", &real, "Real", "https://example.com/real"),
    ]
    .into_iter()
    .collect();
    let doc = devlog::generate(&repos, &SystemGit::new(true), now())?;

    assert!(doc.contains("Click to expand 0 commits from ghost"));
    assert!(doc.contains("Click to expand 1 commits from real"));
    assert!(doc.contains("| **Active Repositories** | 1 |"));
    assert!(!doc.contains("| 📦 **ghost** |"));
    Ok(())
}

#[test]
fn test_non_git_directory_yields_no_commits() -> Result<()> {
    if !has_git() {
        return Ok(());
    }
    let temp_dir = TempDir::new()?;
    let plain = temp_dir.path().join("plain");
    fs::create_dir_all(&plain)?;

    let repo = Repository::new("plain", &plain, "Not a repo", "https://example.com");
    assert!(Extractor::new(&SystemGit::new(true)).repository(&repo).is_empty());
    Ok(())
}
