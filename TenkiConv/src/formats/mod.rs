//! File format handlers
//!
//! - [`spt`]: binary per-scene record files
//! - [`script`]: Shift-JIS scene scripts and their document model
//! - [`translation`]: delimited translation sheets

pub mod script;
pub mod spt;
pub mod translation;

// Re-export main document types
pub use script::{ScriptDocument, TranslationTables, Violation};
pub use spt::{RecordType, SptFile, SptRecord, read_spt, write_spt};
pub use translation::{TableFormat, read_sheet, write_sheet};
