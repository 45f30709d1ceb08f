//! Externalize / internalize
//!
//! Externalizing swaps every dialogue block for placeholder keys and moves the
//! text into [`TranslationTables`]. Internalizing puts (possibly translated)
//! text back, resizing blocks and fixing the section records to match.

use std::collections::HashMap;

use super::classify::{CONTINUATION_MARKER, LINE_KEY_PREFIX, NAME_KEY_PREFIX, speaker_name};
use super::layout::{relayout, update_line_offsets};
use super::tables::{TranslationTables, placeholder_id};
use super::{CommandBody, ScriptDocument};
use crate::error::{Error, Result};

/// Replace dialogue and speaker names with `@L{id}` / `@N{id}` keys
///
/// Does nothing when the document already carries tables.
///
/// # Errors
///
/// - [`Error::MalformedInput`] if a dialogue line already holds a placeholder
/// - [`Error::MalformedSpeaker`] if a name line does not match the speaker pattern
pub fn externalize(doc: &mut ScriptDocument) -> Result<()> {
    if doc.tables.is_some() {
        return Ok(());
    }

    let mut tables = TranslationTables::new();
    let mut name_ids: HashMap<String, u32> = HashMap::new();
    let mut next_line_id = 1u32;
    let mut next_name_id = 1u32;

    for command in doc.text_command_ids() {
        let CommandBody::Text(body) = &doc.commands[command.0].body else {
            continue;
        };
        let body = body.clone();
        let source = doc.commands[command.0].source;
        let line_id = next_line_id;
        next_line_id += 1;

        let source_line = &mut doc.lines[source.0];
        if source_line.text.starts_with('@') {
            return Err(Error::MalformedInput {
                line: source_line.position,
                message: format!("dialogue already externalized: {:?}", source_line.text),
            });
        }
        let mut text = std::mem::replace(&mut source_line.text, format!("{LINE_KEY_PREFIX}{line_id}"));
        for continuation in &body.continuations {
            let line = &mut doc.lines[continuation.0];
            text.push('\n');
            text.push_str(&std::mem::replace(&mut line.text, CONTINUATION_MARKER.to_string()));
        }
        tables.lines.insert(line_id, text);

        if let Some(name_line) = body.name_line {
            let line = &mut doc.lines[name_line.0];
            let Some(name) = speaker_name(&line.text).map(str::to_string) else {
                return Err(Error::MalformedSpeaker {
                    line: line.position,
                    text: line.text.clone(),
                });
            };
            if name.starts_with('@') {
                return Err(Error::MalformedInput {
                    line: line.position,
                    message: format!("speaker already externalized: {:?}", line.text),
                });
            }

            let name_id = *name_ids.entry(name.clone()).or_insert_with(|| {
                let id = next_name_id;
                next_name_id += 1;
                tables.names.insert(id, name.clone());
                id
            });

            line.text = format!("{NAME_KEY_PREFIX}{name_id}{}", &line.text[name.len()..]);
            tables.speakers.insert(line_id, name);
        }
    }

    tracing::debug!(
        "Externalized {} dialogue blocks, {} distinct speakers",
        tables.lines.len(),
        tables.names.len()
    );
    doc.tables = Some(tables);
    Ok(())
}

/// Replace placeholder keys with the text held in the tables
///
/// Each block is resized to the line count of its text, then every dialogue
/// record's line offset is recomputed. The tables are dropped afterwards.
/// Does nothing when the document carries no tables.
///
/// The two-character sequence `\n` in a text counts as a line break, so
/// translators can write breaks inside a single spreadsheet cell.
///
/// # Errors
///
/// Returns [`Error::CorruptPlaceholder`] if a key is missing or unknown, or a
/// continuation marker was edited.
pub fn internalize(doc: &mut ScriptDocument) -> Result<()> {
    let Some(tables) = doc.tables.as_ref() else {
        return Ok(());
    };
    let tables = tables.clone();

    for command in doc.text_command_ids() {
        let CommandBody::Text(body) = &doc.commands[command.0].body else {
            continue;
        };
        let body = body.clone();
        let source = doc.line(doc.commands[command.0].source);

        let Some(line_id) = placeholder_id(&source.text, LINE_KEY_PREFIX) else {
            return Err(Error::CorruptPlaceholder {
                line: source.position,
                message: format!("expected a {LINE_KEY_PREFIX} key, found {:?}", source.text),
            });
        };
        let Some(text) = tables.line(line_id) else {
            return Err(Error::CorruptPlaceholder {
                line: source.position,
                message: format!("no text for {LINE_KEY_PREFIX}{line_id}"),
            });
        };

        for continuation in &body.continuations {
            let line = doc.line(*continuation);
            if line.text != CONTINUATION_MARKER {
                return Err(Error::CorruptPlaceholder {
                    line: line.position,
                    message: format!("continuation marker changed to {:?}", line.text),
                });
            }
        }

        let texts = split_text(text);
        relayout(doc, command, &texts)?;

        if let Some(name_line) = body.name_line {
            let line = &mut doc.lines[name_line.0];
            let key = speaker_name(&line.text).unwrap_or(&line.text);
            let Some(name) = placeholder_id(key, NAME_KEY_PREFIX).and_then(|id| tables.name(id)) else {
                return Err(Error::CorruptPlaceholder {
                    line: line.position,
                    message: format!("unknown speaker key in {:?}", line.text),
                });
            };
            line.text = format!("{name}{}", &line.text[key.len()..]);
        }
    }

    update_line_offsets(doc);
    doc.tables = None;
    Ok(())
}

/// Split table text into script lines
fn split_text(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
