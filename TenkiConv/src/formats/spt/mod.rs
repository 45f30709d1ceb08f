//! .spt scene record file format
//!
//! Binary per-scene metadata: a `u32` record count followed by fixed 32-byte
//! records, all little-endian. Each record describes one command of the
//! matching script section. Only the type tag, the line offset and the line
//! count are interpreted; every other field is carried through untouched.

mod reader;
mod writer;

use std::path::PathBuf;

pub use reader::{parse_spt_bytes, read_spt};
pub use writer::{spt_to_bytes, write_spt};

/// Size of one record in bytes (8 × `i32`)
pub const RECORD_SIZE: usize = 32;

/// Size of the leading record count
pub const HEADER_SIZE: usize = 4;

/// Command kind stored in the first field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    /// Dialogue text
    Text,
    /// `BG_BGM{id}_FIN`
    BgIn,
    /// `BG_BGM{id}_FOUT`
    BgOut,
    /// `SE_{id}`
    Se,
    /// `EF_B{id}_{file}`
    EfB,
    /// `EF_C{id}_{file}`
    EfC,
    /// `EF_WAIT_{delay}`
    EfWait,
    /// `EF_FLAG_{id}_{value}`
    EfFlag,
    /// `EF_SKIP`
    EfSkip,
    /// `BGCV_{OFF|id}`
    BgCv,
    /// Any tag without a known meaning, kept verbatim
    Unknown(u32),
}

impl RecordType {
    #[must_use]
    pub fn from_u32(value: u32) -> Self {
        match value {
            0x01 => Self::Text,
            0x07 => Self::BgIn,
            0x08 => Self::BgOut,
            0x0A => Self::Se,
            0x13 => Self::EfB,
            0x14 => Self::EfC,
            0x1D => Self::EfWait,
            0x21 => Self::EfFlag,
            0x24 => Self::EfSkip,
            0x29 => Self::BgCv,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Text => 0x01,
            Self::BgIn => 0x07,
            Self::BgOut => 0x08,
            Self::Se => 0x0A,
            Self::EfB => 0x13,
            Self::EfC => 0x14,
            Self::EfWait => 0x1D,
            Self::EfFlag => 0x21,
            Self::EfSkip => 0x24,
            Self::BgCv => 0x29,
            Self::Unknown(other) => other,
        }
    }

    /// Whether this record belongs to a dialogue command
    #[must_use]
    pub fn is_text(self) -> bool {
        self == Self::Text
    }

    /// Short display name
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Text => "Text".to_string(),
            Self::BgIn => "BgIn".to_string(),
            Self::BgOut => "BgOut".to_string(),
            Self::Se => "Se".to_string(),
            Self::EfB => "EfB".to_string(),
            Self::EfC => "EfC".to_string(),
            Self::EfWait => "EfWait".to_string(),
            Self::EfFlag => "EfFlag".to_string(),
            Self::EfSkip => "EfSkip".to_string(),
            Self::BgCv => "BgCv".to_string(),
            Self::Unknown(tag) => format!("0x{tag:02X}"),
        }
    }
}

/// One fixed-layout command record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SptRecord {
    /// Record type tag (offset 0x00)
    pub kind: RecordType,
    pub field_04: i32,
    pub field_08: i32,
    pub field_0c: i32,
    /// Position of the command's first script line (offset 0x10)
    pub line_offset: i32,
    /// Number of script lines the command occupies (offset 0x14)
    pub line_count: i32,
    pub field_18: i32,
    pub field_1c: i32,
}

impl SptRecord {
    /// Create a record with all opaque fields zeroed
    #[must_use]
    pub fn new(kind: RecordType) -> Self {
        Self {
            kind,
            field_04: 0,
            field_08: 0,
            field_0c: 0,
            line_offset: 0,
            line_count: 0,
            field_18: 0,
            field_1c: 0,
        }
    }

    /// Set the line offset and count
    #[must_use]
    pub fn with_lines(mut self, offset: i32, count: i32) -> Self {
        self.line_offset = offset;
        self.line_count = count;
        self
    }
}

/// The record array of one scene, together with where it lives on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SptFile {
    /// Source path, also the save target
    pub path: PathBuf,
    pub records: Vec<SptRecord>,
}

impl SptFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, records: Vec<SptRecord>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_round_trips_unknown_tags() {
        for tag in [0x01, 0x07, 0x0A, 0x29, 0x0D, 0x02, 0xFF] {
            assert_eq!(RecordType::from_u32(tag).as_u32(), tag);
        }
        assert_eq!(RecordType::from_u32(0x0D), RecordType::Unknown(0x0D));
        assert_eq!(RecordType::Unknown(0x0D).name(), "0x0D");
    }

    #[test]
    fn test_only_text_is_text() {
        assert!(RecordType::Text.is_text());
        assert!(!RecordType::Se.is_text());
        assert!(!RecordType::Unknown(1 << 8).is_text());
    }
}
