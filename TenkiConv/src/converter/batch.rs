//! Batch conversion and record surveys
//!
//! Files are converted one after another; a failing file is reported and the
//! batch moves on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::script::{SCRIPT_EXTENSION, export_script, import_script};
use super::{ConvertOptions, ConvertOutcome, ConvertPhase, ConvertProgress, ConvertProgressCallback};
use crate::error::{Error, Result};
use crate::formats::TableFormat;
use crate::formats::spt::{RecordType, read_spt};
use crate::utils::extension_lowercase;

/// Which way a file is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertDirection {
    /// Script → placeholder script + sheet
    Externalize,
    /// Sheet + placeholder script → script + records
    Internalize,
}

impl ConvertDirection {
    /// Direction for a path, decided by its extension
    #[must_use]
    pub fn for_path(path: &Path, options: &ConvertOptions) -> Option<Self> {
        let ext = extension_lowercase(path)?;
        if ext == SCRIPT_EXTENSION {
            Some(Self::Externalize)
        } else if TableFormat::from_extension(&ext).is_some()
            || ext.eq_ignore_ascii_case(&options.meta_extension)
        {
            Some(Self::Internalize)
        } else {
            None
        }
    }

    /// Get a human-readable description of this direction
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Externalize => "Externalized",
            Self::Internalize => "Internalized",
        }
    }
}

/// Result of a batch conversion
#[derive(Debug, Clone, Default)]
pub struct BatchConvertResult {
    /// Number of successful conversions
    pub success_count: usize,
    /// Number of failed conversions
    pub fail_count: usize,
    /// Number of files skipped for their extension
    pub skipped_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

impl BatchConvertResult {
    /// Whether every convertible file succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fail_count == 0
    }
}

/// Convert one file, choosing the direction from its extension
///
/// # Errors
/// Returns [`Error::UnsupportedFileType`] for extensions with no direction,
/// otherwise any error of the pipeline.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<ConvertOutcome> {
    match ConvertDirection::for_path(path, options) {
        Some(ConvertDirection::Externalize) => export_script(path, options),
        Some(ConvertDirection::Internalize) => import_script(path, options),
        None => Err(Error::UnsupportedFileType {
            path: path.to_path_buf(),
        }),
    }
}

/// Expand the command-line inputs into files
///
/// Files are kept as given. Directories contribute every `.txt` script found
/// below them, sorted.
#[must_use]
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<_> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| {
                    e.path().is_file()
                        && e.path()
                            .extension()
                            .is_some_and(|ext| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
                })
                .map(|e| e.path().to_path_buf())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Convert files one by one
///
/// Unsupported extensions are skipped with a message; failures are recorded
/// and do not stop the batch.
pub fn batch_convert(
    files: &[PathBuf],
    options: &ConvertOptions,
    progress: ConvertProgressCallback,
) -> BatchConvertResult {
    let mut result = BatchConvertResult::default();
    let total = files.len();

    for (i, path) in files.iter().enumerate() {
        let display_path = path.display().to_string();
        progress(&ConvertProgress::with_file(
            ConvertPhase::Converting,
            i + 1,
            total,
            &display_path,
        ));

        let Some(direction) = ConvertDirection::for_path(path, options) else {
            result.skipped_count += 1;
            result
                .results
                .push(format!("Skipped {display_path}: unsupported file type"));
            continue;
        };

        match convert_file(path, options) {
            Ok(outcome) => {
                result.success_count += 1;
                result.results.push(format!(
                    "{} {display_path}: {} dialogue blocks, {} files",
                    direction.as_str(),
                    outcome.lines,
                    outcome.outputs.len()
                ));
            }
            Err(e) => {
                tracing::warn!("Failed to convert {:?}: {}", path, e);
                result.fail_count += 1;
                result.results.push(format!("Failed {display_path}: {e}"));
            }
        }
    }

    progress(&ConvertProgress::new(ConvertPhase::Complete, total, total));
    result
}

/// Find all record files in a directory recursively
pub fn find_spt_files<P: AsRef<Path>>(dir: P, extension: &str) -> Vec<PathBuf> {
    let mut spt_files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    spt_files.sort();
    spt_files
}

/// Count record type tags across every record file under `dir`
///
/// # Errors
/// Returns an error if a record file cannot be read.
pub fn survey_record_types<P: AsRef<Path>>(
    dir: P,
    extension: &str,
) -> Result<BTreeMap<RecordType, usize>> {
    let mut counts = BTreeMap::new();
    let files = find_spt_files(dir, extension);

    for path in &files {
        let file = read_spt(path)?;
        for record in &file.records {
            *counts.entry(record.kind).or_insert(0) += 1;
        }
    }

    tracing::info!(
        "Surveyed {} record files, {} distinct types",
        files.len(),
        counts.len()
    );
    Ok(counts)
}
