//! Problem/solution segmentation of free-text descriptions
//!
//! Work item descriptions are free text, but the content generation flows
//! need a "problem" half and a "solution" half to fill prompt templates.
//! This module classifies lines by heading keywords, with a
//! sentence-splitting fallback for unstructured text.
//!
//! The algorithm is total and deterministic: both output fields are always
//! non-empty after the configured defaults are applied, for any input
//! string.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Generic filler used when no problem text can be recovered at all.
pub const DEFAULT_PROBLEM_FALLBACK: &str =
    "This work item addresses a key need identified by the product team.";

/// Generic filler used when no solution text can be recovered.
pub const DEFAULT_SOLUTION_FALLBACK: &str =
    "The implementation of this work item will address the identified requirements.";

const PROBLEM_KEYWORDS: [&str; 3] = ["problem description", "problem statement", "the problem"];
const SOLUTION_KEYWORDS: [&str; 4] = [
    "solution description",
    "solution statement",
    "the solution",
    "proposed solution",
];

/// The two halves of a segmented description. Both are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentedDescription {
    pub problem_description: String,
    pub solution_description: String,
}

/// Fallback strings substituted when a section stays empty.
///
/// The original call sites diverged only in these two strings; the
/// canonical policy is [`SegmentDefaults::from_source`], which falls back
/// to the raw source text for the problem half and a generic filler for
/// the solution half.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDefaults {
    pub problem_fallback: String,
    pub solution_fallback: String,
}

impl SegmentDefaults {
    /// Canonical defaults for segmenting `source` itself: the raw text
    /// stands in for a missing problem section, a generic filler for a
    /// missing solution section.
    pub fn from_source(source: &str) -> Self {
        let trimmed = source.trim();
        let problem_fallback = if trimmed.is_empty() {
            DEFAULT_PROBLEM_FALLBACK.to_string()
        } else {
            trimmed.to_string()
        };

        Self {
            problem_fallback,
            solution_fallback: DEFAULT_SOLUTION_FALLBACK.to_string(),
        }
    }

    /// Generic fillers for call sites with no usable source text.
    pub fn generic() -> Self {
        Self {
            problem_fallback: DEFAULT_PROBLEM_FALLBACK.to_string(),
            solution_fallback: DEFAULT_SOLUTION_FALLBACK.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    Problem,
    Solution,
}

fn problem_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Known quirk: also matches lines like "problem-solving approach: ...".
    RE.get_or_init(|| Regex::new(r"^problem.*:").unwrap())
}

fn solution_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^solution.*:").unwrap())
}

fn sentence_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").unwrap())
}

/// Split description text into a problem half and a solution half.
///
/// Lines are classified against heading keywords ("problem description",
/// "the solution", `solution.*:` and friends); heading lines switch the
/// current section and are excluded from content. Lines longer than 10
/// bytes accumulate into the active section. Short lines containing `#`
/// are treated as markdown heading fragments and skipped.
///
/// When no section headings matched and the text is longer than 50 bytes,
/// the text is split into sentences on `[.!?]+` and partitioned at the
/// ceiling of half the sentence count. Whatever is still empty after that
/// is substituted from `defaults`.
///
/// # Arguments
/// * `text` - Normalized description text (see [`crate::adf`])
/// * `defaults` - Fallback strings for sections that stay empty
///
/// # Returns
/// * `SegmentedDescription` - Both fields non-empty
pub fn segment_description(text: &str, defaults: &SegmentDefaults) -> SegmentedDescription {
    let mut section = Section::None;
    let mut problem_lines: Vec<&str> = Vec::new();
    let mut solution_lines: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();

        if PROBLEM_KEYWORDS.iter().any(|k| lower.contains(k))
            || problem_heading_re().is_match(&lower)
        {
            section = Section::Problem;
            continue;
        }

        if SOLUTION_KEYWORDS.iter().any(|k| lower.contains(k))
            || solution_heading_re().is_match(&lower)
        {
            section = Section::Solution;
            continue;
        }

        // Markdown heading fragments ("###", "## x") carry no content.
        if line.len() < 10 && line.contains('#') {
            continue;
        }

        match section {
            Section::Problem if line.len() > 10 => problem_lines.push(line),
            Section::Solution if line.len() > 10 => solution_lines.push(line),
            _ => {}
        }
    }

    let mut problem = problem_lines.join(" ").trim().to_string();
    let mut solution = solution_lines.join(" ").trim().to_string();

    if problem.is_empty() && solution.is_empty() && text.len() > 50 {
        let sentences: Vec<&str> = sentence_split_re()
            .split(text)
            .map(str::trim)
            .filter(|sentence| sentence.len() > 10)
            .collect();

        if sentences.len() >= 2 {
            let mid = (sentences.len() + 1) / 2;
            problem = format!("{}.", sentences[..mid].join(". "));
            solution = format!("{}.", sentences[mid..].join(". "));
        } else {
            problem = text.trim().to_string();
        }
    }

    if problem.is_empty() {
        problem = defaults.problem_fallback.clone();
    }
    if solution.is_empty() {
        solution = defaults.solution_fallback.clone();
    }

    SegmentedDescription {
        problem_description: problem,
        solution_description: solution,
    }
}
