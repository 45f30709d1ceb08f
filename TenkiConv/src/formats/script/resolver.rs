//! Section record lookup
//!
//! The parser only knows scene identifiers; a resolver turns them into loaded
//! record files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formats::spt::{SptFile, SptRecord, read_spt};

/// Default extension of section record files
pub const SECTION_EXTENSION: &str = "spt";

/// Loads the record file of a scene
pub trait SectionResolver {
    /// Load the records of the scene named `section`
    ///
    /// # Errors
    /// Returns [`Error::MissingCompanionFile`] if the scene has no record file.
    fn resolve(&mut self, section: &str) -> Result<SptFile>;
}

/// Reads `{dir}/{section}.spt` from disk
#[derive(Debug, Clone)]
pub struct DirectorySectionResolver {
    dir: PathBuf,
    extension: String,
}

impl DirectorySectionResolver {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: SECTION_EXTENSION.to_string(),
        }
    }

    /// Resolver for the directory containing `script`
    #[must_use]
    pub fn for_script<P: AsRef<Path>>(script: P) -> Self {
        let dir = script
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(dir)
    }

    /// Use a different record file extension
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Path the records of `section` are read from
    #[must_use]
    pub fn section_path(&self, section: &str) -> PathBuf {
        self.dir.join(format!("{section}.{}", self.extension))
    }
}

impl SectionResolver for DirectorySectionResolver {
    fn resolve(&mut self, section: &str) -> Result<SptFile> {
        read_spt(self.section_path(section))
    }
}

/// Serves records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySectionResolver {
    sections: HashMap<String, Vec<SptRecord>>,
}

impl MemorySectionResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the records of a scene
    pub fn insert(&mut self, section: impl Into<String>, records: Vec<SptRecord>) {
        self.sections.insert(section.into(), records);
    }
}

impl SectionResolver for MemorySectionResolver {
    fn resolve(&mut self, section: &str) -> Result<SptFile> {
        let path = PathBuf::from(format!("{section}.{SECTION_EXTENSION}"));
        match self.sections.get(section) {
            Some(records) => Ok(SptFile::new(path, records.clone())),
            None => Err(Error::MissingCompanionFile { path }),
        }
    }
}
