//! `.spt` file reading and parsing

use super::{HEADER_SIZE, RECORD_SIZE, RecordType, SptFile, SptRecord};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, ErrorKind};
use std::path::Path;

/// Read a .spt file from disk
///
/// # Errors
///
/// Returns [`Error::MissingCompanionFile`] if the file does not exist.
/// Returns [`Error::Io`] if the file cannot be read or is truncated.
///
/// [`Error::MissingCompanionFile`]: crate::Error::MissingCompanionFile
/// [`Error::Io`]: crate::Error::Io
pub fn read_spt<P: AsRef<Path>>(path: P) -> Result<SptFile> {
    let path = path.as_ref();
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::MissingCompanionFile {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let records = parse_spt_bytes(&data)?;
    tracing::debug!("Loaded {} records from {:?}", records.len(), path);
    Ok(SptFile::new(path, records))
}

/// Parse .spt records from bytes
///
/// # Errors
///
/// Returns [`Error::Io`] with `UnexpectedEof` if the data holds fewer records
/// than its header announces.
///
/// [`Error::Io`]: crate::Error::Io
pub fn parse_spt_bytes(data: &[u8]) -> Result<Vec<SptRecord>> {
    let mut cursor = Cursor::new(data);

    let count = cursor.read_u32::<LittleEndian>()? as usize;

    // Capacity is capped by what the buffer can actually hold
    let available = data.len().saturating_sub(HEADER_SIZE) / RECORD_SIZE;
    let mut records = Vec::with_capacity(count.min(available));

    for _ in 0..count {
        let kind = RecordType::from_u32(cursor.read_u32::<LittleEndian>()?);
        records.push(SptRecord {
            kind,
            field_04: cursor.read_i32::<LittleEndian>()?,
            field_08: cursor.read_i32::<LittleEndian>()?,
            field_0c: cursor.read_i32::<LittleEndian>()?,
            line_offset: cursor.read_i32::<LittleEndian>()?,
            line_count: cursor.read_i32::<LittleEndian>()?,
            field_18: cursor.read_i32::<LittleEndian>()?,
            field_1c: cursor.read_i32::<LittleEndian>()?,
        });
    }

    let trailing = data.len() - cursor.position() as usize;
    if trailing > 0 {
        tracing::warn!("Ignoring {} trailing bytes after {} records", trailing, count);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::spt::spt_to_bytes;
    use pretty_assertions::assert_eq;

    fn sample_bytes() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        // SE record, opaque fields from a real scene file
        for value in [0x0Au32, 0, 0, 0xFFFF_FFFF, 0xFFFF_FFFF, 0, 2, 0x3E] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        for value in [0x01u32, 0, 0, 0, 5, 2, 0, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_records() {
        let records = parse_spt_bytes(&sample_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, RecordType::Se);
        assert_eq!(records[0].field_0c, -1);
        assert_eq!(records[0].line_offset, -1);
        assert_eq!(records[0].field_1c, 0x3E);
        assert_eq!(records[1].kind, RecordType::Text);
        assert_eq!(records[1].line_offset, 5);
        assert_eq!(records[1].line_count, 2);
    }

    #[test]
    fn test_bytes_survive_reencoding() {
        let data = sample_bytes();
        let records = parse_spt_bytes(&data).unwrap();
        assert_eq!(spt_to_bytes(&records), data);
    }

    #[test]
    fn test_truncated_data_is_an_error() {
        let mut data = sample_bytes();
        data.truncate(data.len() - 4);
        assert!(matches!(
            parse_spt_bytes(&data),
            Err(Error::Io(err)) if err.kind() == ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn test_missing_file_is_reported_as_companion() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("a01_01.spt");
        assert!(matches!(
            read_spt(&missing),
            Err(Error::MissingCompanionFile { path }) if path == missing
        ));
    }
}
