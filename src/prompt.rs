//! Prompt optimizer: shrinks a Markdown prompt below a character budget by
//! dropping or condensing a few known verbose sections.

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use crate::format::thousands;

/// Character budget the optimized prompt must fit in
pub const DEFAULT_LIMIT: usize = 50_000;

const REMOVED_SECTION: &str = "## shadcn/ui Component Usage Guide";
const EDIT_MODAL_MARKER: &str = "TaskParser_EditModal - shadcn Form implementation";
const MOBILE_MARKERS: [&str; 2] = ["Mobile Optimizations", "Mobile-First Considerations"];
const CHAT_RESPONSE_PREFIX: &str = "**ChatResponse_";

const EDIT_MODAL_SUMMARY: [&str; 9] = [
    "```tsx",
    "// Comprehensive edit form with:",
    "// - Assignee selector with avatars",
    "// - Date/time pickers",
    "// - Priority radio group",
    "// - Location selector",
    "// - Full validation",
    "// See shadcn Form docs for implementation",
    "```",
];

const MOBILE_SUMMARY: [&str; 4] = [
    "- Thumb-friendly actions, voice-first input",
    "- Offline mode with sync queue",
    "- Bottom sheet modals, swipe gestures",
    "- 48px minimum touch targets",
];

/// A top-level (`## `) section of the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub text: String,
}

impl Section {
    pub fn chars(&self) -> usize {
        char_count(&self.text)
    }
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Split on `## ` headings; anything before the first one is `Header`
pub fn analyze_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut name = "Header".to_string();
    let mut current: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if let Some(heading) = line.strip_prefix("## ") {
            if !current.is_empty() {
                sections.push(Section {
                    name,
                    text: current.join("\n"),
                });
            }
            name = heading.to_string();
            current = vec![line];
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(Section {
            name,
            text: current.join("\n"),
        });
    }
    sections
}

/// Table of per-section character counts and their share of the document
pub fn section_report(sections: &[Section], total_chars: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let rule = "-".repeat(60);
    writeln!(out, "Section Analysis:")?;
    writeln!(out, "{rule}")?;

    let mut total = 0;
    for section in sections {
        let chars = section.chars();
        total += chars;
        let share = if total_chars == 0 {
            0.0
        } else {
            chars as f64 / total_chars as f64 * 100.0
        };
        let name: String = section.name.chars().take(40).collect();
        writeln!(
            out,
            "{:<40} {:>7} chars ({:>5.1}%)",
            name,
            thousands(chars as u64),
            share
        )?;
    }

    writeln!(out, "{rule}")?;
    writeln!(out, "{:<40} {:>7} chars", "TOTAL", thousands(total as u64))?;
    Ok(out)
}

/// Apply every reduction in a single pass over the lines
pub fn apply_reductions(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut skipping_section = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.contains(REMOVED_SECTION) {
            skipping_section = true;
            i += 1;
            continue;
        }
        if skipping_section {
            if line.starts_with("## ") {
                skipping_section = false;
            } else {
                i += 1;
                continue;
            }
        }

        if line.contains(EDIT_MODAL_MARKER) {
            kept.push(line);
            kept.extend(EDIT_MODAL_SUMMARY);
            i = next_matching(&lines, i + 1, |l| l.starts_with("**") || l.starts_with("###"));
            continue;
        }

        if MOBILE_MARKERS.iter().any(|m| line.contains(m)) {
            kept.push(line);
            kept.extend(MOBILE_SUMMARY);
            i = next_matching(&lines, i + 1, |l| l.starts_with("##"));
            continue;
        }

        if line.starts_with(CHAT_RESPONSE_PREFIX) {
            kept.push(line);
            if let Some(&description) = lines.get(i + 1) {
                kept.push(description);
            }
            i = next_matching(&lines, i + 2, |l| l.starts_with("**"));
            continue;
        }

        kept.push(line);
        i += 1;
    }

    kept.join("\n")
}

/// Index of the first line at or after `from` matching `stop`, or the end
fn next_matching(lines: &[&str], from: usize, stop: impl Fn(&str) -> bool) -> usize {
    lines
        .iter()
        .skip(from)
        .position(|l| stop(*l))
        .map_or(lines.len(), |offset| from + offset)
}

/// `<dir>/<stem>-optimized.md` next to the input file
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "prompt".to_string());
    input.with_file_name(format!("{stem}-optimized.md"))
}
