//! Conversion options

use crate::formats::TableFormat;
use crate::formats::script::SECTION_EXTENSION;

/// Default extension of the externalized placeholder script
pub const META_EXTENSION: &str = "meta";

/// Options shared by every conversion pipeline
///
/// # Example
///
/// ```
/// use tenkiconv::converter::ConvertOptions;
/// use tenkiconv::formats::TableFormat;
///
/// let options = ConvertOptions::new()
///     .with_table_format(TableFormat::Tsv)
///     .with_backup(true);
/// assert_eq!(options.table_format.extension(), "tsv");
/// ```
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Sheet flavour written on export and preferred on import
    pub table_format: TableFormat,

    /// Extension of the per-section record files, without the dot
    pub section_extension: String,

    /// Extension of the placeholder script, without the dot
    pub meta_extension: String,

    /// Copy files to `<name>.bak` before overwriting them
    pub backup: bool,

    /// Run the whole pipeline but write nothing
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            table_format: TableFormat::Csv,
            section_extension: SECTION_EXTENSION.to_string(),
            meta_extension: META_EXTENSION.to_string(),
            backup: false,
            dry_run: false,
        }
    }
}

impl ConvertOptions {
    /// Create options with the defaults: CSV sheets, `.spt` records, `.meta` scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table_format(mut self, format: TableFormat) -> Self {
        self.table_format = format;
        self
    }

    #[must_use]
    pub fn with_section_extension(mut self, ext: impl Into<String>) -> Self {
        self.section_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn with_meta_extension(mut self, ext: impl Into<String>) -> Self {
        self.meta_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::new();
        assert_eq!(options.table_format, TableFormat::Csv);
        assert_eq!(options.section_extension, "spt");
        assert_eq!(options.meta_extension, "meta");
        assert!(!options.backup);
        assert!(!options.dry_run);
    }

    #[test]
    fn test_extensions_drop_leading_dot() {
        let options = ConvertOptions::new()
            .with_section_extension(".SPT")
            .with_meta_extension("ph");
        assert_eq!(options.section_extension, "SPT");
        assert_eq!(options.meta_extension, "ph");
    }
}
