//! Specificity gate and search-radius heuristics.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

const GENERIC_KEYWORDS: &[&str] = &["else", "try", "catch", "finally", "do", "then"];
const BRACKET_PUNCTUATION: &[char] = &['{', '}', '(', ')', ';', ',', '[', ']'];
const PUNCTUATION_ONLY_MAX_CHARS: usize = 2;
const SHORT_SNAPSHOT_CHARS: usize = 5;

static BARE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d+(?:\.\d+)?$").expect("valid bare number regex"));
static TRIVIAL_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\s*=\s*[-+]?\d+(?:\.\d+)?\s*;?$")
        .expect("valid trivial assignment regex")
});

/// Why a snapshot was judged too generic to anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    Empty,
    PunctuationOnly,
    GenericKeyword,
    BareNumber,
    TrivialAssignment,
    NoIdentifierContent,
}

impl GateRejection {
    /// Stable id used in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::PunctuationOnly => "punctuation_only",
            Self::GenericKeyword => "generic_keyword",
            Self::BareNumber => "bare_number",
            Self::TrivialAssignment => "trivial_assignment",
            Self::NoIdentifierContent => "no_identifier_content",
        }
    }
}

impl Display for GateRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Checks whether `snapshot` is specific enough to anchor on.
pub fn check_specificity(snapshot: &str) -> Result<(), GateRejection> {
    let text = snapshot.trim();
    if text.is_empty() {
        return Err(GateRejection::Empty);
    }

    let char_count = text.chars().count();
    if char_count <= PUNCTUATION_ONLY_MAX_CHARS
        && text.chars().all(|ch| BRACKET_PUNCTUATION.contains(&ch))
    {
        return Err(GateRejection::PunctuationOnly);
    }
    if GENERIC_KEYWORDS.contains(&text) {
        return Err(GateRejection::GenericKeyword);
    }
    if BARE_NUMBER_RE.is_match(text) {
        return Err(GateRejection::BareNumber);
    }
    if TRIVIAL_ASSIGNMENT_RE.is_match(text) {
        return Err(GateRejection::TrivialAssignment);
    }
    if char_count < SHORT_SNAPSHOT_CHARS && !text.chars().any(is_identifier_char) {
        return Err(GateRejection::NoIdentifierContent);
    }

    Ok(())
}

/// Boolean form of [`check_specificity`].
pub fn passes_specificity_gate(snapshot: &str) -> bool {
    check_specificity(snapshot).is_ok()
}

/// Scores how distinctive a snapshot is, in `[0, 1]`.
///
/// Weighted sum of:
/// - length / 50, capped at 0.3
/// - alphanumeric ratio * 0.3
/// - distinct special characters / 10, capped at 0.2
/// - word count / 10, capped at 0.2
pub fn snapshot_complexity(snapshot: &str) -> f64 {
    let text = snapshot.trim();
    let char_count = text.chars().count();
    if char_count == 0 {
        return 0.0;
    }

    let alphanumeric = text.chars().filter(|ch| ch.is_alphanumeric()).count();
    let specials = text
        .chars()
        .filter(|ch| !ch.is_alphanumeric() && !ch.is_whitespace())
        .collect::<BTreeSet<char>>();
    let words = text.split_whitespace().count();

    let length_score = (char_count as f64 / 50.0).min(0.3);
    let alphanumeric_score = alphanumeric as f64 / char_count as f64 * 0.3;
    let special_score = (specials.len() as f64 / 10.0).min(0.2);
    let word_score = (words as f64 / 10.0).min(0.2);

    (length_score + alphanumeric_score + special_score + word_score).clamp(0.0, 1.0)
}

/// Window radius earned by snapshot complexity alone.
pub fn complexity_radius(complexity: f64) -> usize {
    if complexity > 0.8 {
        10
    } else if complexity > 0.5 {
        5
    } else {
        2
    }
}

/// Upper bound on the window radius by document size.
pub fn file_size_cap(line_count: usize) -> usize {
    match line_count {
        0..=100 => 3,
        101..=500 => 8,
        _ => 15,
    }
}

/// Symmetric search radius for `snapshot` inside a document of `line_count` lines.
pub fn search_radius(snapshot: &str, line_count: usize) -> usize {
    complexity_radius(snapshot_complexity(snapshot)).min(file_size_cap(line_count))
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
