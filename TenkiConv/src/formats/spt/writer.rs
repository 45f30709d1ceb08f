//! `.spt` file writing

use super::{HEADER_SIZE, RECORD_SIZE, SptFile, SptRecord};
use crate::error::Result;
use crate::utils::fs::write_atomic;

/// Write a .spt file back to its own path
///
/// The file is replaced in one step, a failed write leaves the old
/// records in place.
///
/// # Errors
/// Returns an error if file writing fails.
pub fn write_spt(file: &SptFile) -> Result<()> {
    write_atomic(&file.path, &spt_to_bytes(&file.records))?;
    tracing::debug!("Saved {} records to {:?}", file.records.len(), file.path);
    Ok(())
}

/// Serialize records to the on-disk layout
#[must_use]
pub fn spt_to_bytes(records: &[SptRecord]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(HEADER_SIZE + records.len() * RECORD_SIZE);
    buffer.extend_from_slice(&(records.len() as u32).to_le_bytes());

    for record in records {
        buffer.extend_from_slice(&record.kind.as_u32().to_le_bytes());
        for field in [
            record.field_04,
            record.field_08,
            record.field_0c,
            record.line_offset,
            record.line_count,
            record.field_18,
            record.field_1c,
        ] {
            buffer.extend_from_slice(&field.to_le_bytes());
        }
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::spt::{RecordType, read_spt};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout() {
        let bytes = spt_to_bytes(&[SptRecord::new(RecordType::Text).with_lines(3, 2)]);
        assert_eq!(bytes.len(), HEADER_SIZE + RECORD_SIZE);
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &3i32.to_le_bytes());
        assert_eq!(&bytes[24..28], &2i32.to_le_bytes());
    }

    #[test]
    fn test_field_order() {
        let mut record = SptRecord::new(RecordType::Se).with_lines(-1, 0);
        record.field_04 = 4;
        record.field_08 = 8;
        record.field_0c = 12;
        record.field_18 = 24;
        record.field_1c = -28;

        let bytes = spt_to_bytes(&[record]);
        let fields: Vec<i32> = bytes[HEADER_SIZE..]
            .chunks_exact(4)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        assert_eq!(fields, vec![0x0A, 4, 8, 12, -1, 0, 24, -28]);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = SptFile::new(
            dir.path().join("a01_01.spt"),
            vec![
                SptRecord::new(RecordType::Unknown(0x0D)),
                SptRecord::new(RecordType::Text).with_lines(1, 3),
            ],
        );

        write_spt(&file).unwrap();
        assert_eq!(read_spt(&file.path).unwrap(), file);
    }
}
