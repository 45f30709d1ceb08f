//! Script parsing
//!
//! A single pass over the classified lines. Section headers load their record
//! file and restart the command counter; text lines open a dialogue command
//! or extend the one that is open; command lines open a plain command.

use super::classify::{classify, section_name};
use super::resolver::SectionResolver;
use super::{
    Command, CommandBody, CommandId, Line, LineId, LineKind, ScriptDocument, Section, TextBody,
};
use crate::error::{Error, Result};

/// Per-parse accumulator
#[derive(Debug, Default)]
struct ParseState {
    /// Section that new commands are bound to
    section: Option<usize>,
    /// Index the next command of the current section receives
    next_index: usize,
    /// Kind of the line emitted just before the current one
    previous: Option<LineKind>,
    /// Most recently created dialogue command
    open_text: Option<CommandId>,
}

impl ParseState {
    fn current_section(&self, position: usize) -> Result<usize> {
        self.section.ok_or_else(|| Error::MalformedInput {
            line: position,
            message: "command before section start".to_string(),
        })
    }

    fn start_command(
        &mut self,
        doc: &mut ScriptDocument,
        section: usize,
        source: LineId,
        body: CommandBody,
    ) -> CommandId {
        let id = CommandId(doc.commands.len());
        doc.commands.push(Command {
            section,
            index: self.next_index,
            source,
            body,
        });
        doc.sections[section].commands.push(id);
        self.next_index += 1;
        id
    }
}

/// Build a document from raw script lines
///
/// # Errors
///
/// - [`Error::MalformedInput`] if a command or text line precedes the first section header
/// - [`Error::MalformedHeader`] if a section header carries no scene identifier
/// - any error of the resolver, typically [`Error::MissingCompanionFile`]
pub fn parse<S: AsRef<str>>(
    input: &[S],
    resolver: &mut dyn SectionResolver,
) -> Result<ScriptDocument> {
    let mut doc = ScriptDocument {
        lines: Vec::with_capacity(input.len()),
        order: Vec::with_capacity(input.len()),
        commands: Vec::new(),
        sections: Vec::new(),
        tables: None,
    };
    let mut state = ParseState::default();

    for (position, text) in input.iter().enumerate() {
        let text = text.as_ref();
        let id = LineId(doc.lines.len());
        let kind = classify(text);
        let mut line = Line::new(kind, text, position);

        match kind {
            LineKind::Text | LineKind::TextContinuation
                if state.previous.is_some_and(LineKind::is_text) =>
            {
                let Some(command) = state.open_text else {
                    return Err(Error::MalformedInput {
                        line: position,
                        message: "continuation without an open text command".to_string(),
                    });
                };
                line.kind = LineKind::TextContinuation;
                line.owner = Some(command);
                if let CommandBody::Text(body) = &mut doc.commands[command.0].body {
                    body.continuations.push(id);
                }
            }
            LineKind::Text | LineKind::TextContinuation => {
                let section = state.current_section(position)?;
                let name_line = (state.previous == Some(LineKind::Speaker))
                    .then(|| LineId(id.0 - 1));
                let body = CommandBody::Text(TextBody {
                    name_line,
                    continuations: Vec::new(),
                });
                let command = state.start_command(&mut doc, section, id, body);
                line.kind = LineKind::Text;
                line.owner = Some(command);
                state.open_text = Some(command);
            }
            LineKind::Command => {
                let section = state.current_section(position)?;
                let command = state.start_command(&mut doc, section, id, CommandBody::Plain);
                line.owner = Some(command);
            }
            LineKind::SectionHeader => {
                let name = section_name(text).ok_or_else(|| Error::MalformedHeader {
                    line: position,
                    text: text.to_string(),
                })?;
                let file = resolver.resolve(name)?;
                tracing::debug!(
                    "Section {} at line {}: {} records from {:?}",
                    name,
                    position,
                    file.records.len(),
                    file.path
                );
                doc.sections.push(Section {
                    name: name.to_string(),
                    file,
                    commands: Vec::new(),
                });
                state.section = Some(doc.sections.len() - 1);
                state.next_index = 0;
            }
            LineKind::None | LineKind::Speaker => {}
        }

        state.previous = Some(line.kind);
        doc.lines.push(line);
        doc.order.push(id);
    }

    tracing::debug!(
        "Parsed {} lines, {} commands, {} sections",
        doc.order.len(),
        doc.commands.len(),
        doc.sections.len()
    );
    Ok(doc)
}
