//! Line classification
//!
//! Every script line falls into one kind, decided from its own text alone.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Prefix that opens a section header
pub const SECTION_PREFIX: &str = "***";

/// Prefix of a comment line
pub const COMMENT_PREFIX: &str = "//";

/// Prefix of an externalized speaker name
pub const NAME_KEY_PREFIX: &str = "@N";

/// Prefix of an externalized dialogue line
pub const LINE_KEY_PREFIX: &str = "@L";

/// Text written into continuation lines while externalized
pub const CONTINUATION_MARKER: &str = "@--";

/// `***SS_a01_01_...` / `***SC_b12_3_...`
pub static SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*\*S[SC]_(?P<section>\w\d+_\d+)_").expect("valid section pattern")
});

/// Display name followed by a four digit full-width id in full-width parentheses,
/// e.g. `天城（０１２３）`
pub static SPEAKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.*?)\s*\x{FF08}(?P<id>[\x{FF10}-\x{FF19}]{4})\x{FF09}")
        .expect("valid speaker pattern")
});

/// Kind of a script line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LineKind {
    /// Blank or comment
    None,
    /// First line of a dialogue command
    Text,
    /// Further line of a dialogue command
    TextContinuation,
    /// Speaker name preceding dialogue
    Speaker,
    /// Non-dialogue instruction
    Command,
    /// Scene header
    SectionHeader,
}

impl LineKind {
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::TextContinuation)
    }
}

/// Classify a single line of script text
///
/// Never returns [`LineKind::TextContinuation`]; whether a text line continues
/// the previous one is decided by the parser from context.
#[must_use]
pub fn classify(text: &str) -> LineKind {
    if text.starts_with(SECTION_PREFIX) {
        return LineKind::SectionHeader;
    }

    if text.trim().is_empty() || text.trim_start().starts_with(COMMENT_PREFIX) {
        return LineKind::None;
    }

    if text.contains('_') || text.contains(COMMENT_PREFIX) {
        return LineKind::Command;
    }

    if text.starts_with(NAME_KEY_PREFIX) || SPEAKER_PATTERN.is_match(text) {
        return LineKind::Speaker;
    }

    LineKind::Text
}

/// Extract the scene identifier from a section header
#[must_use]
pub fn section_name(text: &str) -> Option<&str> {
    SECTION_PATTERN
        .captures(text)
        .and_then(|caps| caps.name("section"))
        .map(|m| m.as_str())
}

/// Extract the name portion of a speaker line
///
/// The rest of the line (spacing and the parenthesized id) starts at
/// `name.len()`.
#[must_use]
pub fn speaker_name(text: &str) -> Option<&str> {
    SPEAKER_PATTERN
        .captures(text)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_header_wins() {
        assert_eq!(classify("***SS_a01_01_start"), LineKind::SectionHeader);
        assert_eq!(classify("***"), LineKind::SectionHeader);
    }

    #[test]
    fn test_blank_and_comments() {
        assert_eq!(classify(""), LineKind::None);
        assert_eq!(classify("   \t"), LineKind::None);
        assert_eq!(classify("  // EF_WAIT_30"), LineKind::None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(classify("SE_012"), LineKind::Command);
        assert_eq!(classify("BG_BGM03_FIN"), LineKind::Command);
        assert_eq!(classify("EF_SKIP // skip"), LineKind::Command);
        assert_eq!(classify("EF_SKIP// trailing comment"), LineKind::Command);
    }

    #[test]
    fn test_speakers() {
        assert_eq!(classify("天城（０１２３）"), LineKind::Speaker);
        assert_eq!(classify("天城　（０１２３）"), LineKind::Speaker);
        assert_eq!(classify("@N3（０１２３）"), LineKind::Speaker);
        assert_eq!(classify("@N3"), LineKind::Speaker);
        // Half-width digits are dialogue, not a speaker tag
        assert_eq!(classify("天城(0123)"), LineKind::Text);
    }

    #[test]
    fn test_text() {
        assert_eq!(classify("「おはよう」"), LineKind::Text);
        assert_eq!(classify("@L1"), LineKind::Text);
        assert_eq!(classify(CONTINUATION_MARKER), LineKind::Text);
    }

    #[test]
    fn test_section_name() {
        assert_eq!(section_name("***SS_a01_01_morning"), Some("a01_01"));
        assert_eq!(section_name("***SC_b12_3_"), Some("b12_3"));
        assert_eq!(section_name("***XX_a01_01_"), None);
        assert_eq!(section_name("***SS_a01_01"), None);
    }

    #[test]
    fn test_speaker_name() {
        assert_eq!(speaker_name("天城　（０１２３）"), Some("天城"));
        assert_eq!(speaker_name("@N12（０００１）"), Some("@N12"));
        assert_eq!(speaker_name("@N12"), None);
    }
}
