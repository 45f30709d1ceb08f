//! Translation tables attached to an externalized document

use indexmap::IndexMap;

/// Text removed from the script, keyed by placeholder id
///
/// Ids are dense and start at 1. Maps keep insertion order, which is also
/// the order rows are exported in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTables {
    /// `@L{id}` → dialogue text, lines joined with `\n`
    pub lines: IndexMap<u32, String>,
    /// `@L{id}` → speaker display name, for the translator's reference
    pub speakers: IndexMap<u32, String>,
    /// `@N{id}` → speaker name
    pub names: IndexMap<u32, String>,
}

impl TranslationTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn line(&self, id: u32) -> Option<&str> {
        self.lines.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn speaker(&self, id: u32) -> Option<&str> {
        self.speakers.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.names.is_empty()
    }
}

/// Parse the numeric id of a placeholder such as `@L12`
#[must_use]
pub fn placeholder_id(text: &str, prefix: &str) -> Option<u32> {
    text.strip_prefix(prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_id() {
        assert_eq!(placeholder_id("@L12", "@L"), Some(12));
        assert_eq!(placeholder_id("@N3", "@N"), Some(3));
        assert_eq!(placeholder_id("@N3", "@L"), None);
        assert_eq!(placeholder_id("@L", "@L"), None);
        assert_eq!(placeholder_id("@Lx", "@L"), None);
    }

    #[test]
    fn test_lookup() {
        let mut tables = TranslationTables::new();
        assert!(tables.is_empty());
        tables.lines.insert(1, "「おはよう」".to_string());
        tables.names.insert(1, "天城".to_string());
        assert_eq!(tables.line(1), Some("「おはよう」"));
        assert_eq!(tables.name(1), Some("天城"));
        assert_eq!(tables.speaker(1), None);
    }
}
