//! Structural consistency checks
//!
//! Run after parsing and again after every transform. The checks only read
//! the document; every violation found is collected.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use super::{CommandBody, CommandId, LineKind, ScriptDocument};

/// One broken invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A line's owner does not list the line as its source or continuation
    #[error("line {line} names command #{command} as owner, which does not hold it")]
    DanglingOwner { line: usize, command: usize },

    /// A line's stored position disagrees with its place in the file
    #[error("line at index {index} records position {position}")]
    PositionDrift { index: usize, position: usize },

    /// A speaker line not directly followed by a text line
    #[error("speaker line {line} is not followed by a text line")]
    SpeakerWithoutText { line: usize },

    /// A continuation line not reachable from the text line above it
    #[error("continuation line {line} is not attached to the text block above it")]
    OrphanContinuation { line: usize },

    /// A section holds a different number of commands than records
    #[error(
        "section {section} has {commands} commands but {records} records (first mismatch at index {first_mismatch})"
    )]
    CountMismatch {
        section: String,
        commands: usize,
        records: usize,
        first_mismatch: usize,
    },

    /// A command's dialogue-ness disagrees with its record type
    #[error("section {section} index {index}: command is {command_kind} but record is {record_kind}")]
    RecordKindMismatch {
        section: String,
        index: usize,
        command_kind: String,
        record_kind: String,
    },

    /// A command is not at its own index in its section
    #[error("command #{command} claims index {index} in section {section}")]
    IndexDrift {
        command: usize,
        section: String,
        index: usize,
    },

    /// A command's source line points elsewhere
    #[error("source line {line} of command #{command} does not point back to it")]
    SourceLinkBroken { command: usize, line: usize },

    /// A name line that is not a speaker, or is claimed twice
    #[error("name line {line} of command #{command} is not an unclaimed speaker line")]
    NameLineConflict { command: usize, line: usize },
}

/// Collect every violation in `doc`
#[must_use]
pub fn validate(doc: &ScriptDocument) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_lines(doc, &mut violations);
    check_sections(doc, &mut violations);
    check_commands(doc, &mut violations);
    violations
}

fn check_lines(doc: &ScriptDocument, violations: &mut Vec<Violation>) {
    let lines: Vec<_> = doc.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if line.position != i {
            violations.push(Violation::PositionDrift {
                index: i,
                position: line.position,
            });
        }

        if let Some(owner) = line.owner {
            let command = &doc.commands[owner.0];
            let id = doc.order[i];
            let held = command.source == id
                || matches!(&command.body, CommandBody::Text(body) if body.continuations.contains(&id));
            if !held {
                violations.push(Violation::DanglingOwner {
                    line: i,
                    command: owner.0,
                });
            }
        }

        match line.kind {
            LineKind::Speaker => {
                if lines.get(i + 1).is_none_or(|next| next.kind != LineKind::Text) {
                    violations.push(Violation::SpeakerWithoutText { line: i });
                }
            }
            LineKind::TextContinuation => {
                if !continuation_attached(doc, &lines, i) {
                    violations.push(Violation::OrphanContinuation { line: i });
                }
            }
            _ => {}
        }
    }
}

/// Walk up to the text line that opens the block and check the continuation
/// sits at the matching offset of its command
fn continuation_attached(doc: &ScriptDocument, lines: &[&super::Line], i: usize) -> bool {
    let mut j = i;
    while j > 0 && lines[j - 1].kind == LineKind::TextContinuation {
        j -= 1;
    }
    let Some(text_index) = j.checked_sub(1) else {
        return false;
    };
    let text_line = lines[text_index];
    if text_line.kind != LineKind::Text {
        return false;
    }

    let Some(owner) = text_line.owner else {
        return false;
    };
    match &doc.commands[owner.0].body {
        CommandBody::Text(body) => body.continuations.get(i - text_index - 1) == Some(&doc.order[i]),
        CommandBody::Plain => false,
    }
}

fn check_sections(doc: &ScriptDocument, violations: &mut Vec<Violation>) {
    for section in &doc.sections {
        let records = &section.file.records;
        let shared = section.commands.len().min(records.len());
        let mut first_mismatch = None;

        for (index, (&command, record)) in section.commands.iter().zip(records).enumerate() {
            let is_text = doc.commands[command.0].is_text();
            if is_text != record.kind.is_text() {
                first_mismatch.get_or_insert(index);
                violations.push(Violation::RecordKindMismatch {
                    section: section.name.clone(),
                    index,
                    command_kind: if is_text { "text" } else { "plain" }.to_string(),
                    record_kind: record.kind.name(),
                });
            }
        }

        if section.commands.len() != records.len() {
            dump_pairing(doc, section);
            violations.push(Violation::CountMismatch {
                section: section.name.clone(),
                commands: section.commands.len(),
                records: records.len(),
                first_mismatch: first_mismatch.unwrap_or(shared),
            });
        }
    }
}

/// Record/command pairing, for finding where the script and the records diverge
fn dump_pairing(doc: &ScriptDocument, section: &super::Section) {
    for (index, (&command, record)) in section.commands.iter().zip(&section.file.records).enumerate()
    {
        let source = doc.line(doc.commands[command.0].source);
        tracing::debug!(
            "{} [{index:4}] {:>8} ({}) {}",
            section.name,
            record.kind.name(),
            source.position,
            source.text
        );
    }
}

fn check_commands(doc: &ScriptDocument, violations: &mut Vec<Violation>) {
    let mut name_claims: HashMap<usize, usize> = HashMap::new();

    for (i, command) in doc.commands.iter().enumerate() {
        let id = CommandId(i);
        let section = &doc.sections[command.section];

        if section.commands.get(command.index) != Some(&id) {
            violations.push(Violation::IndexDrift {
                command: i,
                section: section.name.clone(),
                index: command.index,
            });
        }

        let source = doc.line(command.source);
        if source.owner != Some(id) {
            violations.push(Violation::SourceLinkBroken {
                command: i,
                line: source.position,
            });
        }

        if let CommandBody::Text(body) = &command.body
            && let Some(name) = body.name_line
        {
            let line = doc.line(name);
            let claimed_before = name_claims.insert(name.0, i).is_some();
            if line.kind != LineKind::Speaker || claimed_before {
                violations.push(Violation::NameLineConflict {
                    command: i,
                    line: line.position,
                });
            }
        }
    }
}
