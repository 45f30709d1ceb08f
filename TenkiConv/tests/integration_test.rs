use std::path::Path;

use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tenkiconv::formats::spt::spt_to_bytes;
use tenkiconv::prelude::*;

const SCRIPT: &str = "***SS_a01_01_morning\r\n\
                      SE_012\r\n\
                      天城　（０１２３）\r\n\
                      「おはよう」\r\n\
                      「今日は早いね」\r\n\
                      \r\n\
                      朝の光が差し込む。\r\n\
                      BG_BGM03_FIN\r\n\
                      ***SC_a01_02_noon\r\n\
                      天城（０１２３）\r\n\
                      「お昼だよ」\r\n";

fn section_one() -> Vec<SptRecord> {
    vec![
        SptRecord::new(RecordType::Se).with_lines(-1, 0),
        SptRecord::new(RecordType::Text).with_lines(2, 3),
        SptRecord::new(RecordType::Text).with_lines(6, 1),
        SptRecord::new(RecordType::BgIn).with_lines(-1, 0),
    ]
}

fn section_two() -> Vec<SptRecord> {
    // Opaque fields must survive untouched
    let mut record = SptRecord::new(RecordType::Text).with_lines(9, 2);
    record.field_04 = 7;
    record.field_1c = -3;
    vec![record]
}

fn write_fixture(dir: &Path) {
    std::fs::write(dir.join("a01.txt"), SHIFT_JIS.encode(SCRIPT).0).unwrap();
    std::fs::write(dir.join("a01_01.spt"), spt_to_bytes(&section_one())).unwrap();
    std::fs::write(dir.join("a01_02.spt"), spt_to_bytes(&section_two())).unwrap();
}

fn read_text(path: &Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    SHIFT_JIS.decode(&bytes).0.into_owned()
}

#[test]
fn test_export_edit_import() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let options = ConvertOptions::new();

    let outcome = export_script(&dir.path().join("a01.txt"), &options).unwrap();
    assert_eq!(outcome.lines, 3);
    assert_eq!(outcome.names, 1);

    let meta = read_text(&dir.path().join("a01.meta"));
    assert_eq!(
        meta,
        "***SS_a01_01_morning\r\n\
         SE_012\r\n\
         @N1　（０１２３）\r\n\
         @L1\r\n\
         @--\r\n\
         \r\n\
         @L2\r\n\
         BG_BGM03_FIN\r\n\
         ***SC_a01_02_noon\r\n\
         @N1（０１２３）\r\n\
         @L3\r\n"
    );

    // Translate: first block shrinks to one line, last block grows to three
    let sheet_path = dir.path().join("a01.csv");
    let sheet = std::fs::read_to_string(&sheet_path).unwrap();
    let edited = sheet
        .replace("@N1,,天城,", "@N1,,天城,Amagi")
        .replace(
            "@L1,天城,\"「おはよう」\n「今日は早いね」\",",
            "@L1,天城,\"「おはよう」\n「今日は早いね」\",\"\"\"Morning, you're early.\"\"\"",
        )
        .replace(
            "@L3,天城,「お昼だよ」,",
            "@L3,天城,「お昼だよ」,\"\"\"Lunch!\"\"\nShe waves.\\n(Smiles)\"",
        );
    std::fs::write(&sheet_path, edited).unwrap();

    import_script(&sheet_path, &options).unwrap();

    assert_eq!(
        read_text(&dir.path().join("a01.txt")),
        "***SS_a01_01_morning\r\n\
         SE_012\r\n\
         Amagi　（０１２３）\r\n\
         \"Morning, you're early.\"\r\n\
         \r\n\
         朝の光が差し込む。\r\n\
         BG_BGM03_FIN\r\n\
         ***SC_a01_02_noon\r\n\
         Amagi（０１２３）\r\n\
         \"Lunch!\"\r\n\
         She waves.\r\n\
         (Smiles)\r\n"
    );

    let first = read_spt(dir.path().join("a01_01.spt")).unwrap().records;
    assert_eq!(
        first,
        vec![
            SptRecord::new(RecordType::Se).with_lines(-1, 0),
            SptRecord::new(RecordType::Text).with_lines(2, 2),
            SptRecord::new(RecordType::Text).with_lines(5, 1),
            SptRecord::new(RecordType::BgIn).with_lines(-1, 0),
        ]
    );

    let second = read_spt(dir.path().join("a01_02.spt")).unwrap().records;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].line_offset, 8);
    assert_eq!(second[0].line_count, 4);
    assert_eq!(second[0].field_04, 7);
    assert_eq!(second[0].field_1c, -3);
}

#[test]
fn test_untouched_sheet_round_trips() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let options = ConvertOptions::new().with_table_format(TableFormat::Tsv);
    let original = std::fs::read(dir.path().join("a01.txt")).unwrap();

    let result = batch_convert(&[dir.path().join("a01.txt")], &options, &|_| {});
    assert_eq!(result.success_count, 1);
    std::fs::remove_file(dir.path().join("a01.txt")).unwrap();

    let result = batch_convert(&[dir.path().join("a01.tsv")], &options, &|_| {});
    assert_eq!(result.success_count, 1);

    assert_eq!(std::fs::read(dir.path().join("a01.txt")).unwrap(), original);
    assert_eq!(read_spt(dir.path().join("a01_01.spt")).unwrap().records, section_one());
    assert_eq!(read_spt(dir.path().join("a01_02.spt")).unwrap().records, section_two());
}

#[test]
fn test_missing_meta_is_reported() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    export_script(&dir.path().join("a01.txt"), &ConvertOptions::new()).unwrap();
    std::fs::remove_file(dir.path().join("a01.meta")).unwrap();

    let err = convert_file(&dir.path().join("a01.csv"), &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::MissingCompanionFile { .. }));
}

#[test]
fn test_missing_section_records() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    std::fs::remove_file(dir.path().join("a01_02.spt")).unwrap();

    let err = export_script(&dir.path().join("a01.txt"), &ConvertOptions::new()).unwrap_err();
    assert!(matches!(err, Error::MissingCompanionFile { path } if path.ends_with("a01_02.spt")));
    assert!(!dir.path().join("a01.meta").exists());
}

#[test]
fn test_document_api() {
    let mut resolver = MemorySectionResolver::new();
    resolver.insert("a01_01", section_one());
    resolver.insert("a01_02", section_two());

    let lines: Vec<&str> = SCRIPT.lines().collect();
    let mut doc = ScriptDocument::parse(&lines, &mut resolver).unwrap();
    assert!(doc.validate().is_ok());
    assert_eq!(doc.sections().len(), 2);

    doc.externalize().unwrap();
    let tables = doc.tables().unwrap().clone();
    assert_eq!(tables.names.len(), 1);
    assert_eq!(tables.speaker(3), Some("天城"));

    let sheet = write_sheet(&tables, TableFormat::Csv);
    assert_eq!(read_sheet(&sheet, TableFormat::Csv).unwrap(), tables);

    doc.internalize().unwrap();
    assert_eq!(doc.to_lines(), lines);
}
