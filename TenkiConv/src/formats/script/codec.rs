//! Shift-JIS script text codec
//!
//! Scripts are stored as Shift-JIS (code page 932) text. The line ending used
//! by the source file is remembered so a rewritten file keeps it.

use std::path::Path;

use encoding_rs::SHIFT_JIS;

use crate::error::{Error, Result};

/// Line terminator of a script file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n`, as written by the game's own tools
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    /// Guess the terminator from raw file bytes
    ///
    /// Any `\r\n` pair means CRLF; files without one are treated as LF unless
    /// empty.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.windows(2).any(|pair| pair == b"\r\n") || bytes.is_empty() {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

/// Decoded script text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptSource {
    /// Lines without terminators
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
}

impl ScriptSource {
    /// Encode the lines back into Shift-JIS bytes
    ///
    /// `path` only names the destination in the error.
    ///
    /// # Errors
    /// Returns [`Error::Encoding`] if a line holds characters Shift-JIS cannot represent.
    pub fn encode(&self, path: &Path) -> Result<Vec<u8>> {
        encode_script(&self.lines, self.line_ending).ok_or_else(|| Error::Encoding {
            path: path.to_path_buf(),
        })
    }
}

/// Decode Shift-JIS bytes into lines
///
/// Returns `None` if the bytes are not valid Shift-JIS.
#[must_use]
pub fn decode_script(bytes: &[u8]) -> Option<ScriptSource> {
    let text = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)?;
    let line_ending = LineEnding::detect(bytes);

    let body = text.strip_suffix('\n').unwrap_or(&text);
    let lines = if text.is_empty() {
        Vec::new()
    } else {
        body.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    };

    Some(ScriptSource { lines, line_ending })
}

/// Encode lines as Shift-JIS, terminating every line with `ending`
///
/// Returns `None` if any character has no Shift-JIS mapping.
#[must_use]
pub fn encode_script<S: AsRef<str>>(lines: &[S], ending: LineEnding) -> Option<Vec<u8>> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push_str(ending.as_str());
    }

    let (bytes, _, unmappable) = SHIFT_JIS.encode(&text);
    if unmappable {
        return None;
    }
    Some(bytes.into_owned())
}

/// Read and decode a script file
///
/// # Errors
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::Encoding`] if it is not valid Shift-JIS
pub fn read_script(path: impl AsRef<Path>) -> Result<ScriptSource> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    decode_script(&bytes).ok_or_else(|| Error::Encoding {
        path: path.to_path_buf(),
    })
}
