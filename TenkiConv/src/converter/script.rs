//! Per-file externalize / internalize pipelines

use std::path::{Path, PathBuf};

use super::{ConvertOptions, ConvertPhase, ConvertProgress, ConvertProgressCallback};
use crate::error::{Error, Result};
use crate::formats::script::{
    DirectorySectionResolver, ScriptDocument, ScriptSource, Violation, read_script,
};
use crate::formats::spt::spt_to_bytes;
use crate::formats::translation::{TableFormat, read_sheet_file, write_sheet};
use crate::utils::{backup_file, companion_path, write_atomic};

/// Extension of a plain scene script
pub const SCRIPT_EXTENSION: &str = "txt";

const STEPS: usize = 4;

/// What a pipeline produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOutcome {
    /// Files written, or that would have been written in a dry run
    pub outputs: Vec<PathBuf>,
    /// Dialogue blocks moved between script and sheet
    pub lines: usize,
    /// Distinct speaker names moved between script and sheet
    pub names: usize,
}

/// Rendered output waiting to be written
#[derive(Debug)]
struct PendingWrite {
    path: PathBuf,
    data: Vec<u8>,
}

/// Externalize `name.txt` into `name.meta` and a translation sheet
///
/// # Errors
/// Returns an error if the script or its records cannot be read, the script
/// is malformed, or the document fails validation before or after the
/// transform. Nothing is written in that case.
pub fn export_script(path: &Path, options: &ConvertOptions) -> Result<ConvertOutcome> {
    export_script_with_progress(path, options, &|_| {})
}

/// Externalize a script with progress callback
///
/// # Errors
/// See [`export_script`].
pub fn export_script_with_progress(
    path: &Path,
    options: &ConvertOptions,
    progress: ConvertProgressCallback,
) -> Result<ConvertOutcome> {
    tracing::info!("Externalizing {:?}", path);
    let file_name = path.display().to_string();

    progress(&ConvertProgress::with_file(ConvertPhase::Reading, 1, STEPS, &file_name));
    let (source, mut doc) = load_document(path, options)?;

    progress(&ConvertProgress::with_file(ConvertPhase::Transforming, 2, STEPS, &file_name));
    doc.externalize()?;

    progress(&ConvertProgress::with_file(ConvertPhase::Validating, 3, STEPS, &file_name));
    doc.validate()?;

    let tables = doc.take_tables().unwrap_or_default();
    let meta_path = companion_path(path, &options.meta_extension);
    let sheet_path = companion_path(path, options.table_format.extension());
    let meta = ScriptSource {
        lines: doc.to_lines(),
        line_ending: source.line_ending,
    }
    .encode(&meta_path)?;

    let writes = vec![
        PendingWrite {
            path: meta_path,
            data: meta,
        },
        PendingWrite {
            path: sheet_path,
            data: write_sheet(&tables, options.table_format).into_bytes(),
        },
    ];

    progress(&ConvertProgress::with_file(ConvertPhase::Writing, 4, STEPS, &file_name));
    let outputs = commit(writes, options)?;

    tracing::info!(
        "Externalized {:?}: {} dialogue blocks, {} speakers",
        path,
        tables.lines.len(),
        tables.names.len()
    );
    progress(&ConvertProgress::new(ConvertPhase::Complete, STEPS, STEPS));
    Ok(ConvertOutcome {
        outputs,
        lines: tables.lines.len(),
        names: tables.names.len(),
    })
}

/// Internalize a translation sheet back into `name.txt` and its `.spt` records
///
/// `path` may name either the sheet or the `.meta` script; the other one is
/// looked up next to it.
///
/// # Errors
/// - [`Error::MissingCompanionFile`] if the `.meta` script or the sheet is absent
/// - any error of reading, parsing, validating or internalizing
///
/// Nothing is written when an error is returned.
pub fn import_script(path: &Path, options: &ConvertOptions) -> Result<ConvertOutcome> {
    import_script_with_progress(path, options, &|_| {})
}

/// Internalize a sheet with progress callback
///
/// # Errors
/// See [`import_script`].
pub fn import_script_with_progress(
    path: &Path,
    options: &ConvertOptions,
    progress: ConvertProgressCallback,
) -> Result<ConvertOutcome> {
    tracing::info!("Internalizing {:?}", path);
    let file_name = path.display().to_string();

    progress(&ConvertProgress::with_file(ConvertPhase::Reading, 1, STEPS, &file_name));
    let meta_path = companion_path(path, &options.meta_extension);
    if !meta_path.is_file() {
        return Err(Error::MissingCompanionFile { path: meta_path });
    }
    let sheet_path = find_sheet(path, options)?;
    let (source, mut doc) = load_document(&meta_path, options)?;
    let tables = read_sheet_file(&sheet_path)?;
    let (lines, names) = (tables.lines.len(), tables.names.len());

    progress(&ConvertProgress::with_file(ConvertPhase::Transforming, 2, STEPS, &file_name));
    doc.set_tables(tables);
    doc.internalize()?;

    progress(&ConvertProgress::with_file(ConvertPhase::Validating, 3, STEPS, &file_name));
    doc.validate()?;

    let script_path = companion_path(path, SCRIPT_EXTENSION);
    let script = ScriptSource {
        lines: doc.to_lines(),
        line_ending: source.line_ending,
    }
    .encode(&script_path)?;

    let mut writes = vec![PendingWrite {
        path: script_path,
        data: script,
    }];
    writes.extend(doc.spt_files().into_iter().map(|file| PendingWrite {
        path: file.path.clone(),
        data: spt_to_bytes(&file.records),
    }));

    progress(&ConvertProgress::with_file(ConvertPhase::Writing, 4, STEPS, &file_name));
    let outputs = commit(writes, options)?;

    tracing::info!(
        "Internalized {:?}: {} dialogue blocks, {} files written",
        path,
        lines,
        outputs.len()
    );
    progress(&ConvertProgress::new(ConvertPhase::Complete, STEPS, STEPS));
    Ok(ConvertOutcome {
        outputs,
        lines,
        names,
    })
}

/// Parse a script against its section records and list every violation
///
/// An empty list means the script and its records agree.
///
/// # Errors
/// Returns an error if the script or its records cannot be read or parsed.
pub fn check_script(path: &Path, options: &ConvertOptions) -> Result<Vec<Violation>> {
    let (_, doc) = parse_script(path, options)?;
    Ok(doc.violations())
}

/// Read a script and its section records, and check they agree
fn load_document(script: &Path, options: &ConvertOptions) -> Result<(ScriptSource, ScriptDocument)> {
    let (source, doc) = parse_script(script, options)?;
    doc.validate()?;
    Ok((source, doc))
}

fn parse_script(script: &Path, options: &ConvertOptions) -> Result<(ScriptSource, ScriptDocument)> {
    let source = read_script(script)?;
    let mut resolver =
        DirectorySectionResolver::for_script(script).with_extension(&options.section_extension);
    let doc = ScriptDocument::parse(&source.lines, &mut resolver)?;
    Ok((source, doc))
}

/// Sheet to import: `path` itself, or the sibling in the configured format,
/// or the sibling in the other format
fn find_sheet(path: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    if TableFormat::from_path(path).is_some() {
        return Ok(path.to_path_buf());
    }

    let preferred = companion_path(path, options.table_format.extension());
    if preferred.is_file() {
        return Ok(preferred);
    }
    let other = match options.table_format {
        TableFormat::Csv => TableFormat::Tsv,
        TableFormat::Tsv => TableFormat::Csv,
    };
    let fallback = companion_path(path, other.extension());
    if fallback.is_file() {
        Ok(fallback)
    } else {
        Err(Error::MissingCompanionFile { path: preferred })
    }
}

/// Write every rendered output, backing up all targets first when asked
fn commit(writes: Vec<PendingWrite>, options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    if options.dry_run {
        for write in &writes {
            tracing::info!("Dry run: would write {:?} ({} bytes)", write.path, write.data.len());
        }
        return Ok(writes.into_iter().map(|write| write.path).collect());
    }

    if options.backup {
        for write in &writes {
            backup_file(&write.path)?;
        }
    }

    let mut outputs = Vec::with_capacity(writes.len());
    for write in writes {
        write_atomic(&write.path, &write.data)?;
        tracing::debug!("Wrote {:?} ({} bytes)", write.path, write.data.len());
        outputs.push(write.path);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::script::{LineEnding, encode_script};
    use crate::formats::spt::{RecordType, SptFile, SptRecord, read_spt, write_spt};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const SCRIPT: &[&str] = &[
        "***SS_a01_01_morning",
        "SE_012",
        "天城　（０１２３）",
        "「おはよう」",
        "「今日は早いね」",
        "",
        "朝の光が差し込む。",
        "SE_013",
    ];

    fn scene_records() -> Vec<SptRecord> {
        [
            (RecordType::Se, -1, 0),
            (RecordType::Text, 2, 3),
            (RecordType::Text, 6, 1),
            (RecordType::Se, -1, 0),
        ]
        .iter()
        .map(|&(kind, offset, count)| SptRecord::new(kind).with_lines(offset, count))
        .collect()
    }

    fn setup(records: Vec<SptRecord>) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("a01.txt");
        std::fs::write(&script, encode_script(SCRIPT, LineEnding::Crlf).unwrap()).unwrap();
        write_spt(&SptFile::new(dir.path().join("a01_01.spt"), records)).unwrap();
        (dir, script)
    }

    #[test]
    fn test_export_writes_meta_and_sheet() {
        let (dir, script) = setup(scene_records());
        let outcome = export_script(&script, &ConvertOptions::new()).unwrap();

        assert_eq!(
            outcome,
            ConvertOutcome {
                outputs: vec![dir.path().join("a01.meta"), dir.path().join("a01.csv")],
                lines: 2,
                names: 1,
            }
        );

        let meta = read_script(dir.path().join("a01.meta")).unwrap();
        assert_eq!(meta.line_ending, LineEnding::Crlf);
        assert_eq!(meta.lines[3], "@L1");
        assert_eq!(meta.lines[4], "@--");

        let sheet = std::fs::read_to_string(dir.path().join("a01.csv")).unwrap();
        assert!(sheet.starts_with("ID,Speaker,Original,Translation\n"));
        assert!(sheet.contains("@N1,,天城,\n"));
    }

    #[test]
    fn test_export_import_round_trip() {
        let (dir, script) = setup(scene_records());
        let original = std::fs::read(&script).unwrap();
        let options = ConvertOptions::new();

        export_script(&script, &options).unwrap();
        std::fs::remove_file(&script).unwrap();
        import_script(&dir.path().join("a01.csv"), &options).unwrap();

        assert_eq!(std::fs::read(&script).unwrap(), original);
        let records = read_spt(dir.path().join("a01_01.spt")).unwrap().records;
        assert_eq!(records, scene_records());
    }

    #[test]
    fn test_import_resizes_block() {
        let (dir, script) = setup(scene_records());
        let options = ConvertOptions::new();
        export_script(&script, &options).unwrap();

        let sheet_path = dir.path().join("a01.csv");
        let sheet = std::fs::read_to_string(&sheet_path).unwrap();
        let edited = sheet.replace("@L2,,朝の光が差し込む。,", "@L2,,朝の光が差し込む。,\"Light.\nBirds.\nWind.\"");
        std::fs::write(&sheet_path, edited).unwrap();

        let outcome = import_script(&dir.path().join("a01.meta"), &options).unwrap();
        assert_eq!(outcome.outputs.len(), 2);

        let text = read_script(&script).unwrap();
        assert_eq!(&text.lines[6..], &["Light.", "Birds.", "Wind.", "SE_013"]);
        let records = read_spt(dir.path().join("a01_01.spt")).unwrap().records;
        assert_eq!(records[2].line_offset, 6);
        assert_eq!(records[2].line_count, 3);
    }

    #[test]
    fn test_import_without_meta() {
        let (dir, _) = setup(scene_records());
        std::fs::write(dir.path().join("a01.csv"), "ID,Original\n@L1,a\n").unwrap();

        let err = import_script(&dir.path().join("a01.csv"), &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, Error::MissingCompanionFile { path } if path.ends_with("a01.meta")));
    }

    #[test]
    fn test_import_finds_tsv_sheet() {
        let (dir, script) = setup(scene_records());
        let tsv = ConvertOptions::new().with_table_format(TableFormat::Tsv);
        export_script(&script, &tsv).unwrap();

        let outcome = import_script(&dir.path().join("a01.meta"), &ConvertOptions::new()).unwrap();
        assert_eq!(outcome.lines, 2);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (dir, script) = setup(scene_records());
        let options = ConvertOptions::new().with_dry_run(true);

        let outcome = export_script(&script, &options).unwrap();
        assert_eq!(outcome.outputs.len(), 2);
        assert!(!dir.path().join("a01.meta").exists());
        assert!(!dir.path().join("a01.csv").exists());
    }

    #[test]
    fn test_backup_before_overwrite() {
        let (dir, script) = setup(scene_records());
        let options = ConvertOptions::new().with_backup(true);
        export_script(&script, &options).unwrap();
        import_script(&dir.path().join("a01.csv"), &options).unwrap();

        assert!(dir.path().join("a01.txt.bak").exists());
        assert!(dir.path().join("a01_01.spt.bak").exists());
    }

    #[test]
    fn test_mismatch_leaves_disk_untouched() {
        let mut records = scene_records();
        records.pop();
        let (dir, script) = setup(records);

        let err = export_script(&script, &ConvertOptions::new()).unwrap_err();
        assert!(matches!(err, Error::StructuralMismatch { .. }));
        assert!(!dir.path().join("a01.meta").exists());
        assert!(!dir.path().join("a01.csv").exists());
    }

    #[test]
    fn test_check_script() {
        let (_dir, script) = setup(scene_records());
        assert!(check_script(&script, &ConvertOptions::new()).unwrap().is_empty());

        let mut records = scene_records();
        records[0] = SptRecord::new(RecordType::Text);
        let (_dir, script) = setup(records);
        let violations = check_script(&script, &ConvertOptions::new()).unwrap();
        assert!(matches!(
            violations.as_slice(),
            [Violation::RecordKindMismatch { index: 0, .. }]
        ));
    }

    #[test]
    fn test_progress_phases() {
        let (_dir, script) = setup(scene_records());
        let phases = RefCell::new(Vec::new());
        export_script_with_progress(&script, &ConvertOptions::new(), &|p| {
            phases.borrow_mut().push(p.phase);
        })
        .unwrap();

        assert_eq!(
            phases.into_inner(),
            vec![
                ConvertPhase::Reading,
                ConvertPhase::Transforming,
                ConvertPhase::Validating,
                ConvertPhase::Writing,
                ConvertPhase::Complete,
            ]
        );
    }
}
