//! Translation sheet support
//!
//! Export externalized text to a delimited sheet for translators, read the
//! edited sheet back into [`TranslationTables`].
//!
//! # Sheet Layout
//!
//! The sheet opens spreadsheet-friendly: a header row, then a `Names` group
//! and a `Lines` group separated by blank rows.
//!
//! ```csv
//! ID,Speaker,Original,Translation
//! ,,,
//! Names,,,
//! @N1,,天城,
//! ,,,
//! Lines,,,
//! @L1,天城,"「おはよう」
//! 「今日は早いね」",
//! ```
//!
//! Only rows whose ID starts with `@L` or `@N` are read back. Columns are
//! located by header name, so translators may reorder or add columns.

use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::script::{LINE_KEY_PREFIX, NAME_KEY_PREFIX, TranslationTables};
use crate::utils::extension_lowercase;

/// Delimited sheet flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Tab-separated values
    Tsv,
}

impl TableFormat {
    /// Get the file extension for this format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }

    /// Get the delimiter character
    #[must_use]
    pub fn delimiter(&self) -> char {
        match self {
            Self::Csv => ',',
            Self::Tsv => '\t',
        }
    }

    /// Format matching a file extension, if any
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            _ => None,
        }
    }

    /// Format matching a path's extension, if any
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        extension_lowercase(path).and_then(|ext| Self::from_extension(&ext))
    }
}

const HEADER: [&str; 4] = ["ID", "Speaker", "Original", "Translation"];
const NAMES_GROUP: &str = "Names";
const LINES_GROUP: &str = "Lines";

/// Render the tables as a sheet
#[must_use]
pub fn write_sheet(tables: &TranslationTables, format: TableFormat) -> String {
    let delimiter = format.delimiter();
    let mut out = String::new();
    let mut row = |cells: [&str; 4]| {
        let escaped: Vec<String> = cells
            .iter()
            .map(|cell| escape_for_delimited(cell, delimiter))
            .collect();
        out.push_str(&escaped.join(&delimiter.to_string()));
        out.push('\n');
    };

    row(HEADER);
    row(["", "", "", ""]);
    row([NAMES_GROUP, "", "", ""]);
    for (id, name) in &tables.names {
        row([format!("{NAME_KEY_PREFIX}{id}").as_str(), "", name.as_str(), ""]);
    }
    row(["", "", "", ""]);
    row([LINES_GROUP, "", "", ""]);
    for (id, text) in &tables.lines {
        let speaker = tables.speaker(*id).unwrap_or_default();
        row([format!("{LINE_KEY_PREFIX}{id}").as_str(), speaker, text.as_str(), ""]);
    }

    out
}

/// Column positions found in the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    speaker: Option<usize>,
    original: Option<usize>,
    translation: Option<usize>,
}

impl Columns {
    fn locate(header: &[String]) -> Option<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell.trim().eq_ignore_ascii_case(name))
        };
        Some(Self {
            id: find(HEADER[0])?,
            speaker: find(HEADER[1]),
            original: find(HEADER[2]),
            translation: find(HEADER[3]),
        })
    }
}

/// Read a sheet back into tables
///
/// The value of a row is its `Translation` cell, or its `Original` cell when
/// the translation is left empty.
///
/// # Errors
/// Returns [`Error::InvalidTranslationSheet`] if the `ID` header is missing, an
/// id is not numeric, or a quoted field is never closed.
pub fn read_sheet(text: &str, format: TableFormat) -> Result<TranslationTables> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let records = parse_records(text, format.delimiter())?;

    let columns = records
        .first()
        .and_then(|header| Columns::locate(header))
        .ok_or_else(|| Error::InvalidTranslationSheet {
            row: 1,
            message: "missing ID column header".to_string(),
        })?;

    let mut tables = TranslationTables::new();
    for (i, record) in records.iter().enumerate().skip(1) {
        let cell = |column: Option<usize>| {
            column
                .and_then(|c| record.get(c))
                .map_or("", String::as_str)
        };
        let key = cell(Some(columns.id)).trim();
        let value = [cell(columns.translation), cell(columns.original)]
            .into_iter()
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string();

        if let Some(digits) = key.strip_prefix(LINE_KEY_PREFIX) {
            let id = parse_id(digits, key, i + 1)?;
            let speaker = cell(columns.speaker);
            if !speaker.trim().is_empty() {
                tables.speakers.insert(id, speaker.to_string());
            }
            tables.lines.insert(id, value);
        } else if let Some(digits) = key.strip_prefix(NAME_KEY_PREFIX) {
            let id = parse_id(digits, key, i + 1)?;
            tables.names.insert(id, value);
        }
    }

    tracing::debug!(
        "Read sheet: {} lines, {} names",
        tables.lines.len(),
        tables.names.len()
    );
    Ok(tables)
}

/// Read a sheet file, picking the format from its extension
///
/// # Errors
/// - [`Error::UnsupportedFileType`] if the extension is neither `csv` nor `tsv`
/// - [`Error::Io`] if the file cannot be read as UTF-8
/// - see [`read_sheet`]
pub fn read_sheet_file(path: &Path) -> Result<TranslationTables> {
    let format = TableFormat::from_path(path).ok_or_else(|| Error::UnsupportedFileType {
        path: path.to_path_buf(),
    })?;
    let text = std::fs::read_to_string(path)?;
    read_sheet(&text, format)
}

fn parse_id(digits: &str, key: &str, row: usize) -> Result<u32> {
    digits.parse().map_err(|_| Error::InvalidTranslationSheet {
        row,
        message: format!("non-numeric id {key:?}"),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Split sheet text into records of fields
///
/// Quoted fields may span lines and hold the delimiter; `""` is a literal quote.
fn parse_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut quoted_from = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted_from.is_some() {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted_from = None,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => quoted_from = Some(records.len() + 1),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if let Some(row) = quoted_from {
        return Err(Error::InvalidTranslationSheet {
            row,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Escape text for TSV/CSV output
fn escape_for_delimited(text: &str, delimiter: char) -> String {
    // If text contains delimiter, newlines, or quotes, wrap in quotes and escape quotes
    if text.contains(delimiter) || text.contains('\n') || text.contains('\r') || text.contains('"')
    {
        let escaped = text.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        text.to_string()
    }
}
