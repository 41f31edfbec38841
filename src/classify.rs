use std::fmt;

/// Status glyph and category label for a commit subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub emoji: &'static str,
    pub label: &'static str,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji, self.label)
    }
}

const DONE: &str = "🟢";
const IN_PROGRESS: &str = "🟡";

// First match wins; merges are checked separately as a prefix
const RULES: &[(&[&str], &str, &str)] = &[
    (&["feat:", "feature:", "add "], DONE, "Feature"),
    (&["fix:", "bug:"], DONE, "Bug fix"),
    (&["docs:", "documentation"], DONE, "Documentation"),
    (&["test:", "testing"], DONE, "Testing"),
    (&["refactor:", "cleanup"], DONE, "Refactor"),
    (&["wip:", "work in progress"], IN_PROGRESS, "WIP"),
];

pub fn classify(subject: &str) -> Classification {
    let subject = subject.to_lowercase();

    if subject.starts_with("merge") {
        return Classification { emoji: DONE, label: "PR merge" };
    }

    RULES
        .iter()
        .find(|(needles, _, _)| needles.iter().any(|n| subject.contains(n)))
        .map(|&(_, emoji, label)| Classification { emoji, label })
        .unwrap_or(Classification { emoji: DONE, label: "Update" })
}
