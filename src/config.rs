use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{DevlogError, Result};

/// Glyph shown for repositories that do not configure one
pub const DEFAULT_EMOJI: &str = "📦";

/// Static metadata for one repository, independent of its commits
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
    pub description: String,
    pub github_url: String,
    pub emoji: Option<String>,
}

impl Repository {
    pub fn new(name: &str, path: impl Into<PathBuf>, description: &str, github_url: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            description: description.to_string(),
            github_url: github_url.to_string(),
            emoji: None,
        }
    }

    pub fn with_emoji(mut self, emoji: &str) -> Self {
        self.emoji = Some(emoji.to_string());
        self
    }

    pub fn emoji(&self) -> &str {
        self.emoji.as_deref().unwrap_or(DEFAULT_EMOJI)
    }

    /// Anchor name of the per-repository section, e.g. `gpt_parser_only`
    pub fn anchor(&self) -> String {
        format!("{}_only", self.name.to_lowercase().replace('-', "_"))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Insertion-ordered set of repository descriptors keyed by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Repositories(Vec<Repository>);

impl Repositories {
    /// Built-in descriptor set used when no config file overrides it
    pub fn defaults() -> Self {
        let mut repos = Self::default();
        repos.insert(
            Repository::new(
                "markdown-brain-bot",
                "/Users/colinaulds/Desktop/projects/markdown-brain-bot",
                "Main backend system with Smart Rails routing",
                "https://github.com/auldsyababua/markdown-brain-bot",
            )
            .with_emoji("🤖"),
        );
        repos.insert(
            Repository::new(
                "gpt-parser",
                "/Users/colinaulds/Desktop/projects/gpt-parser",
                "Early backend attempt with GPT parsing",
                "https://github.com/auldsyababua/gpt-parser",
            )
            .with_emoji("🧠"),
        );
        repos.insert(
            Repository::new(
                "bbui",
                "/Users/colinaulds/Desktop/projects/bbui",
                "Frontend interface for FLRTS system",
                "https://github.com/auldsyababua/bbui",
            )
            .with_emoji("🎨"),
        );
        repos
    }

    /// Insert a descriptor, replacing any existing one with the same name in place
    pub fn insert(&mut self, repo: Repository) {
        match self.0.iter_mut().find(|r| r.name == repo.name) {
            Some(existing) => *existing = repo,
            None => self.0.push(repo),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Repository> {
        self.0.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Repository> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy the default emoji onto every entry whose name also exists in `defaults`
    pub fn with_default_emojis(mut self, defaults: &Repositories) -> Self {
        for repo in &mut self.0 {
            if let Some(default) = defaults.get(&repo.name) {
                repo.emoji = Some(default.emoji().to_string());
            }
        }
        self
    }

    /// Read a config file and return its `repositories` mapping, if present
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Repositories>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DevlogError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config: ConfigFile = serde_json::from_str(&contents)?;
        match config.repositories {
            Some(None) => Err(DevlogError::NullRepositories {
                path: path.to_path_buf(),
            }),
            Some(repos) => Ok(repos),
            None => Ok(None),
        }
    }

    /// Resolve the descriptor set for a run. Never fails: config problems
    /// are reported and the defaults are used instead.
    pub fn load(config_path: Option<PathBuf>) -> Repositories {
        let defaults = Self::defaults();

        let path = match config_path {
            Some(p) => p,
            None => match default_config_paths().into_iter().find(|p| p.exists()) {
                Some(p) => p,
                None => {
                    debug!("No config file in the default locations");
                    return defaults;
                }
            },
        };

        match Self::from_file(&path) {
            Ok(Some(repos)) => {
                debug!("Loaded {} repositories from {}", repos.len(), path.display());
                repos.with_default_emojis(&defaults)
            }
            Ok(None) => defaults,
            Err(e) => {
                warn!("Could not load config from {}: {}", path.display(), e);
                defaults
            }
        }
    }
}

impl<'a> IntoIterator for &'a Repositories {
    type Item = &'a Repository;
    type IntoIter = std::slice::Iter<'a, Repository>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Repository> for Repositories {
    fn from_iter<I: IntoIterator<Item = Repository>>(iter: I) -> Self {
        let mut repos = Repositories::default();
        for repo in iter {
            repos.insert(repo);
        }
        repos
    }
}

/// `<project_root>/.devlog/config.json`, where the project root is the
/// parent of the directory holding the running executable
pub fn default_config_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let root = exe
        .parent()
        .and_then(Path::parent)
        .ok_or_else(|| DevlogError::ProjectRoot { exe: exe.clone() })?;
    Ok(root.join(".devlog").join("config.json"))
}

/// Default lookup order: beside the executable's project root, then
/// `.devlog/config.json` under the working directory. Cargo builds put the
/// executable in `target/<profile>/`, so the second entry is the one that
/// finds a checkout's config during development.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    match default_config_path() {
        Ok(path) => paths.push(path),
        Err(e) => debug!("No executable-relative config location: {}", e),
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(".devlog").join("config.json");
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    /// Outer `None`: key absent. `Some(None)`: key present but `null`.
    #[serde(default, deserialize_with = "present")]
    repositories: Option<Option<Repositories>>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    path: String,
    description: String,
    github_url: String,
    #[serde(default)]
    emoji: Option<String>,
}

impl<'de> Deserialize<'de> for Repositories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Repositories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from repository name to descriptor")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut repos = Repositories::default();
                while let Some((name, entry)) = map.next_entry::<String, RepositoryEntry>()? {
                    repos.insert(Repository {
                        path: expand_home(&entry.path),
                        name,
                        description: entry.description,
                        github_url: entry.github_url,
                        emoji: entry.emoji,
                    });
                }
                Ok(repos)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
