//! Re-layout after a dialogue command changes its line count
//!
//! Inserting or removing continuation lines shifts every later line. Shifts
//! are applied eagerly so positions always match file order; record offsets
//! are written in a separate pass once every command has been resized.

use super::classify::CONTINUATION_MARKER;
use super::{CommandBody, CommandId, Line, LineId, LineKind, ScriptDocument};
use crate::error::{Error, Result};

/// Resize a dialogue command to exactly `texts.len()` lines and write the texts
///
/// Updates the command's record `line_count`. The record `line_offset` is left
/// alone; call [`update_line_offsets`] after all commands are resized.
///
/// # Errors
///
/// - [`Error::CorruptPlaceholder`] if `texts` is empty
/// - [`Error::StructuralMismatch`] if the command has no record
/// - [`Error::MalformedInput`] if `command` is not a dialogue command
pub fn relayout<S: AsRef<str>>(
    doc: &mut ScriptDocument,
    command: CommandId,
    texts: &[S],
) -> Result<()> {
    let source = doc.commands[command.0].source;
    let start = doc.lines[source.0].position;

    let CommandBody::Text(body) = &doc.commands[command.0].body else {
        return Err(Error::MalformedInput {
            line: start,
            message: "re-layout of a non-text command".to_string(),
        });
    };
    let has_name = body.name_line.is_some();
    let old_count = 1 + body.continuations.len();
    let new_count = texts.len();

    if new_count == 0 {
        return Err(Error::CorruptPlaceholder {
            line: start,
            message: "translation resolves to no lines".to_string(),
        });
    }
    if doc.record(command).is_none() {
        return Err(Error::StructuralMismatch {
            violations: super::validate(doc),
        });
    }

    if old_count > new_count {
        remove_tail(doc, command, start, old_count - new_count);
    } else if old_count < new_count {
        insert_tail(doc, command, start, old_count, new_count - old_count);
    }

    doc.lines[source.0].text = texts[0].as_ref().to_string();
    let continuations = match &doc.commands[command.0].body {
        CommandBody::Text(body) => body.continuations.clone(),
        CommandBody::Plain => Vec::new(),
    };
    for (id, text) in continuations.iter().zip(&texts[1..]) {
        doc.lines[id.0].text = text.as_ref().to_string();
    }

    if let Some(record) = doc.record_mut(command) {
        record.line_count = (new_count + usize::from(has_name)) as i32;
    }
    Ok(())
}

/// Drop the last `count` continuation lines of a command
fn remove_tail(doc: &mut ScriptDocument, command: CommandId, start: usize, count: usize) {
    let CommandBody::Text(body) = &mut doc.commands[command.0].body else {
        return;
    };
    let keep = body.continuations.len() - count;
    let removed = body.continuations.split_off(keep);

    // Source line and kept continuations stay put, the removed span follows them
    let span_start = start + 1 + keep;
    doc.order.drain(span_start..span_start + count);
    for id in removed {
        doc.lines[id.0].owner = None;
    }
    shift_positions(doc, span_start, |position| position - count);

    tracing::debug!(
        "Removed {} continuation lines at {}, later lines shifted up",
        count,
        span_start
    );
}

/// Append `count` continuation lines after the command's current `old_count` lines
fn insert_tail(
    doc: &mut ScriptDocument,
    command: CommandId,
    start: usize,
    old_count: usize,
    count: usize,
) {
    let span_start = start + old_count;
    let mut inserted = Vec::with_capacity(count);
    for i in 0..count {
        let id = LineId(doc.lines.len());
        let mut line = Line::new(LineKind::TextContinuation, CONTINUATION_MARKER, span_start + i);
        line.owner = Some(command);
        doc.lines.push(line);
        inserted.push(id);
    }

    doc.order
        .splice(span_start..span_start, inserted.iter().copied());
    if let CommandBody::Text(body) = &mut doc.commands[command.0].body {
        body.continuations.extend(inserted);
    }
    shift_positions(doc, span_start + count, |position| position + count);

    tracing::debug!(
        "Inserted {} continuation lines at {}, later lines shifted down",
        count,
        span_start
    );
}

/// Rewrite the position of every line from `from` onwards
fn shift_positions(doc: &mut ScriptDocument, from: usize, shift: impl Fn(usize) -> usize) {
    for &id in &doc.order[from..] {
        let line = &mut doc.lines[id.0];
        line.position = shift(line.position);
    }
}

/// Point every dialogue record at its first line
///
/// The first line is the name line when there is one, the source line
/// otherwise. Must run after every [`relayout`] of a pass.
pub fn update_line_offsets(doc: &mut ScriptDocument) {
    for command in doc.text_command_ids() {
        let first = match &doc.commands[command.0].body {
            CommandBody::Text(body) => body.name_line.unwrap_or(doc.commands[command.0].source),
            CommandBody::Plain => continue,
        };
        let position = doc.lines[first.0].position as i32;
        if let Some(record) = doc.record_mut(command) {
            record.line_offset = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::script::test_support::scene;
    use pretty_assertions::assert_eq;

    fn positions_are_dense(doc: &ScriptDocument) -> bool {
        doc.lines().enumerate().all(|(i, line)| line.position() == i)
    }

    #[test]
    fn test_grow_shifts_later_lines() {
        let mut doc = scene();
        let first = doc.text_command_ids()[0];

        relayout(&mut doc, first, &["一", "二", "三"]).unwrap();

        assert_eq!(
            doc.to_lines(),
            vec![
                "***SS_a01_01_morning",
                "SE_012",
                "天城　（０１２３）",
                "一",
                "二",
                "三",
                "",
                "朝の光が差し込む。",
                "SE_013",
            ]
        );
        assert!(positions_are_dense(&doc));
        assert_eq!(doc.line_at(5).unwrap().kind(), LineKind::TextContinuation);
        assert_eq!(doc.line_at(5).unwrap().owner(), Some(first));
        // Name line counts too
        assert_eq!(doc.record(first).unwrap().line_count, 4);
        // Offsets untouched until the offset pass
        assert_eq!(doc.record(first).unwrap().line_offset, 2);
    }

    #[test]
    fn test_shrink_detaches_lines() {
        let mut doc = scene();
        let first = doc.text_command_ids()[0];
        let dropped = doc.command(first).text_body().unwrap().continuations[0];

        relayout(&mut doc, first, &["「おはよう、今日は早いね」"]).unwrap();

        assert_eq!(doc.line_count(), 7);
        assert!(positions_are_dense(&doc));
        assert_eq!(doc.line(dropped).owner(), None);
        assert!(doc.command(first).text_body().unwrap().continuations.is_empty());
        assert_eq!(doc.record(first).unwrap().line_count, 2);
        assert_eq!(doc.line_at(5).unwrap().text(), "朝の光が差し込む。");
    }

    #[test]
    fn test_offsets_follow_shifts() {
        let mut doc = scene();
        let texts = doc.text_command_ids();

        relayout(&mut doc, texts[0], &["一", "二", "三"]).unwrap();
        update_line_offsets(&mut doc);

        assert_eq!(doc.record(texts[0]).unwrap().line_offset, 2);
        assert_eq!(doc.record(texts[1]).unwrap().line_offset, 7);
    }

    #[test]
    fn test_empty_texts_rejected() {
        let mut doc = scene();
        let first = doc.text_command_ids()[0];
        let empty: [&str; 0] = [];
        assert!(matches!(
            relayout(&mut doc, first, &empty),
            Err(Error::CorruptPlaceholder { .. })
        ));
    }

    #[test]
    fn test_plain_command_rejected() {
        let mut doc = scene();
        assert!(matches!(
            relayout(&mut doc, CommandId(0), &["SE_999"]),
            Err(Error::MalformedInput { .. })
        ));
    }
}
