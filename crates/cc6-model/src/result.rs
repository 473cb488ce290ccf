use std::fmt;

use serde::{Deserialize, Serialize};

/// Check importance, ordered like the host's three-level scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl CheckLevel {
    /// Numeric weight expected by the host.
    pub fn weight(self) -> u8 {
        self as u8
    }

    /// Header the host prints for this level.
    pub fn display_header(self) -> &'static str {
        match self {
            CheckLevel::High => "Required",
            CheckLevel::Medium => "Recommended",
            CheckLevel::Low => "Suggested",
        }
    }
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_header())
    }
}

/// Outcome of one check function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub level: CheckLevel,
    pub score: u32,
    pub out_of: u32,
    /// Short description of the check, e.g. "File format".
    pub name: String,
    pub messages: Vec<String>,
}

impl CheckResult {
    /// Build a result; the score is capped at `out_of`.
    pub fn new(
        level: CheckLevel,
        score: u32,
        out_of: u32,
        name: impl Into<String>,
        messages: Vec<String>,
    ) -> Self {
        debug_assert!(score <= out_of, "score {score} exceeds out_of {out_of}");
        Self {
            level,
            score: score.min(out_of),
            out_of,
            name: name.into(),
            messages,
        }
    }

    /// Full score with no diagnostics.
    pub fn pass(level: CheckLevel, out_of: u32, name: impl Into<String>) -> Self {
        Self::new(level, out_of, out_of, name, Vec::new())
    }

    /// Zero score with the given diagnostics.
    pub fn fail(level: CheckLevel, out_of: u32, name: impl Into<String>, messages: Vec<String>) -> Self {
        Self::new(level, 0, out_of, name, messages)
    }

    pub fn is_full_score(&self) -> bool {
        self.score == self.out_of
    }
}

/// All check results for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_name: String,
    pub results: Vec<CheckResult>,
}

impl FileReport {
    pub fn score(&self) -> u32 {
        self.results.iter().map(|result| result.score).sum()
    }

    pub fn out_of(&self) -> u32 {
        self.results.iter().map(|result| result.out_of).sum()
    }

    /// Results that lost points, at or above `level`.
    pub fn failures_at_least(&self, level: CheckLevel) -> impl Iterator<Item = &CheckResult> {
        self.results
            .iter()
            .filter(move |result| result.level >= level && !result.is_full_score())
    }

    pub fn has_failures(&self) -> bool {
        self.failures_at_least(CheckLevel::Low).next().is_some()
    }
}
