//! # TenkiConv
//!
//! A pure-Rust library for translating visual-novel scene scripts.
//!
//! Scene scripts are Shift-JIS text files split into sections. Each section is
//! paired with a binary `.spt` record file describing its commands, including
//! where each dialogue block starts and how many lines it spans. TenkiConv
//! moves dialogue out into a translation sheet and back in, keeping the
//! records consistent when a translation changes a block's line count.
//!
//! ## Supported Formats
//!
//! - **Scene scripts** (`.txt`) - Shift-JIS, CRLF or LF
//! - **Placeholder scripts** (`.meta`) - scripts with dialogue replaced by keys
//! - **SPT records** (`.spt`) - fixed 32-byte per-command records
//! - **Translation sheets** (`.csv` / `.tsv`) - UTF-8 delimited tables
//!
//! ## Quick Start
//!
//! ### Converting Files
//!
//! ```no_run
//! use std::path::Path;
//! use tenkiconv::converter::{ConvertOptions, export_script, import_script};
//!
//! let options = ConvertOptions::new();
//!
//! // a01.txt → a01.meta + a01.csv
//! export_script(Path::new("a01.txt"), &options)?;
//!
//! // a01.csv + a01.meta → a01.txt + a01_*.spt
//! import_script(Path::new("a01.csv"), &options)?;
//! # Ok::<(), tenkiconv::Error>(())
//! ```
//!
//! ### Working with Documents
//!
//! ```
//! use tenkiconv::prelude::*;
//!
//! let mut resolver = MemorySectionResolver::new();
//! resolver.insert("a01_01", vec![SptRecord::new(RecordType::Text).with_lines(1, 1)]);
//!
//! let mut doc = ScriptDocument::parse(&["***SS_a01_01_", "「おはよう」"], &mut resolver)?;
//! doc.externalize()?;
//! assert_eq!(doc.to_lines(), vec!["***SS_a01_01_", "@L1"]);
//! # Ok::<(), tenkiconv::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `tenkiconv` command-line binary

pub mod converter;
pub mod error;
pub mod formats;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::script::{
        DirectorySectionResolver, LineKind, MemorySectionResolver, ScriptDocument,
        SectionResolver, TranslationTables, Violation,
    };
    pub use crate::formats::spt::{RecordType, SptFile, SptRecord, read_spt, write_spt};
    pub use crate::formats::translation::{TableFormat, read_sheet, write_sheet};

    pub use crate::converter::{
        BatchConvertResult, ConvertOptions, ConvertOutcome, ConvertPhase, ConvertProgress,
        batch_convert, convert_file, export_script, import_script,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
