//! Script conversion pipelines
//!
//! Each input file runs one pipeline:
//! load → parse → validate → transform → validate → save.
//!
//! - Externalize: `name.txt` → `name.meta` (placeholder script) + `name.csv`
//! - Internalize: `name.csv` / `name.meta` → `name.txt` + updated `.spt` records
//!
//! Every output is rendered in memory before anything is written, so a
//! failing file leaves the disk untouched.

mod batch;
mod options;
mod script;

pub use batch::{
    BatchConvertResult, ConvertDirection, batch_convert, collect_inputs, convert_file,
    find_spt_files, survey_record_types,
};
pub use options::{ConvertOptions, META_EXTENSION};
pub use script::{
    ConvertOutcome, SCRIPT_EXTENSION, check_script, export_script, export_script_with_progress,
    import_script, import_script_with_progress,
};

/// Progress callback type for conversion operations
pub type ConvertProgressCallback<'a> = &'a dyn Fn(&ConvertProgress);

/// Progress information during conversion
#[derive(Debug, Clone)]
pub struct ConvertProgress {
    /// Current pipeline phase
    pub phase: ConvertPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl ConvertProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: ConvertPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file name
    #[must_use]
    pub fn with_file(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        file: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of a conversion pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    /// Reading the script and its section records
    Reading,
    /// Checking structural consistency
    Validating,
    /// Externalizing or internalizing text
    Transforming,
    /// Writing output files
    Writing,
    /// Converting files of a batch
    Converting,
    /// Operation complete
    Complete,
}

impl ConvertPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reading => "Reading script",
            Self::Validating => "Validating",
            Self::Transforming => "Transforming text",
            Self::Writing => "Writing files",
            Self::Converting => "Converting",
            Self::Complete => "Complete",
        }
    }
}
