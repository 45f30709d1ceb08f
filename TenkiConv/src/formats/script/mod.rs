//! Scene script document model
//!
//! A script is a Shift-JIS text file split into sections, one per scene. Each
//! section is paired with a `.spt` record file holding one record per command
//! line or dialogue block. The document keeps both views in sync:
//!
//! - [`Line`]s in file order, each with its current position
//! - [`Command`]s in creation order, each bound to one record of its section
//! - [`Section`]s owning their record arrays
//!
//! Cross references are plain indices ([`LineId`], [`CommandId`], section
//! index) into arenas owned by [`ScriptDocument`].
//!
//! # Pipeline
//!
//! ```no_run
//! use tenkiconv::formats::script::{DirectorySectionResolver, ScriptDocument, read_script};
//!
//! let source = read_script("a01.txt")?;
//! let mut resolver = DirectorySectionResolver::for_script("a01.txt");
//! let mut doc = ScriptDocument::parse(&source.lines, &mut resolver)?;
//! doc.validate()?;
//! doc.externalize()?;
//! doc.validate()?;
//! # Ok::<(), tenkiconv::Error>(())
//! ```

mod classify;
mod codec;
mod layout;
mod parser;
mod resolver;
mod tables;
mod transform;
mod validate;

use crate::error::Result;
use crate::formats::spt::{SptFile, SptRecord};

pub use classify::{
    CONTINUATION_MARKER, LINE_KEY_PREFIX, LineKind, NAME_KEY_PREFIX, classify, section_name,
    speaker_name,
};
pub use codec::{LineEnding, ScriptSource, decode_script, encode_script, read_script};
pub use parser::parse;
pub use resolver::{
    DirectorySectionResolver, MemorySectionResolver, SECTION_EXTENSION, SectionResolver,
};
pub use tables::TranslationTables;
pub use transform::{externalize, internalize};
pub use validate::{Violation, validate};

/// Stable handle of a line inside its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub(crate) usize);

/// Stable handle of a command inside its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

/// One row of the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub(crate) text: String,
    pub(crate) position: usize,
    pub(crate) kind: LineKind,
    pub(crate) owner: Option<CommandId>,
}

impl Line {
    pub(crate) fn new(kind: LineKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
            kind,
            owner: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Zero-based position in the document
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Command whose source or continuation this line is
    #[must_use]
    pub fn owner(&self) -> Option<CommandId> {
        self.owner
    }
}

/// Lines attached to a dialogue command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBody {
    /// Speaker line directly above the first text line
    pub name_line: Option<LineId>,
    /// Lines after the first, in order
    pub continuations: Vec<LineId>,
}

/// What a command carries besides its source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandBody {
    /// Any non-dialogue instruction, kept verbatim
    Plain,
    /// Dialogue
    Text(TextBody),
}

/// One instruction slot of a section, paired with one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub(crate) section: usize,
    pub(crate) index: usize,
    pub(crate) source: LineId,
    pub(crate) body: CommandBody,
}

impl Command {
    /// Index of the owning section in [`ScriptDocument::sections`]
    #[must_use]
    pub fn section(&self) -> usize {
        self.section
    }

    /// Index within the owning section, also the record index
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Line carrying the command's primary text
    #[must_use]
    pub fn source(&self) -> LineId {
        self.source
    }

    #[must_use]
    pub fn body(&self) -> &CommandBody {
        &self.body
    }

    #[must_use]
    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.body {
            CommandBody::Text(body) => Some(body),
            CommandBody::Plain => None,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.body, CommandBody::Text(_))
    }
}

/// One scene: its record file and the commands parsed against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Scene identifier from the header, e.g. `a01_01`
    pub name: String,
    pub(crate) file: SptFile,
    pub(crate) commands: Vec<CommandId>,
}

impl Section {
    #[must_use]
    pub fn file(&self) -> &SptFile {
        &self.file
    }

    #[must_use]
    pub fn records(&self) -> &[SptRecord] {
        &self.file.records
    }

    #[must_use]
    pub fn commands(&self) -> &[CommandId] {
        &self.commands
    }
}

/// A parsed script with its section records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDocument {
    /// Every line ever created; detached lines stay here but leave `order`
    pub(crate) lines: Vec<Line>,
    /// Lines in file order
    pub(crate) order: Vec<LineId>,
    pub(crate) commands: Vec<Command>,
    pub(crate) sections: Vec<Section>,
    pub(crate) tables: Option<TranslationTables>,
}

impl ScriptDocument {
    /// Parse raw script lines, loading section records through `resolver`
    ///
    /// # Errors
    /// See [`parse`].
    pub fn parse<S: AsRef<str>>(
        lines: &[S],
        resolver: &mut dyn SectionResolver,
    ) -> Result<Self> {
        parse(lines, resolver)
    }

    /// Number of lines currently in the document
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.order.len()
    }

    /// Lines in file order
    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.order.iter().map(|&id| &self.lines[id.0])
    }

    #[must_use]
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    /// Line at a file position
    #[must_use]
    pub fn line_at(&self, position: usize) -> Option<&Line> {
        self.order.get(position).map(|&id| &self.lines[id.0])
    }

    /// Line texts in file order, as written to disk
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.lines().map(|line| line.text.clone()).collect()
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Handles of all dialogue commands in creation order
    #[must_use]
    pub fn text_command_ids(&self) -> Vec<CommandId> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, command)| command.is_text())
            .map(|(i, _)| CommandId(i))
            .collect()
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Record bound to a command: `sections[section].records[index]`
    ///
    /// `None` when the section holds fewer records than commands.
    #[must_use]
    pub fn record(&self, id: CommandId) -> Option<&SptRecord> {
        let command = &self.commands[id.0];
        self.sections[command.section].file.records.get(command.index)
    }

    pub(crate) fn record_mut(&mut self, id: CommandId) -> Option<&mut SptRecord> {
        let command = &self.commands[id.0];
        self.sections[command.section]
            .file
            .records
            .get_mut(command.index)
    }

    /// Section record files, ready to be saved
    #[must_use]
    pub fn spt_files(&self) -> Vec<&SptFile> {
        self.sections.iter().map(|section| &section.file).collect()
    }

    /// Whether translation tables are attached
    #[must_use]
    pub fn is_externalized(&self) -> bool {
        self.tables.is_some()
    }

    #[must_use]
    pub fn tables(&self) -> Option<&TranslationTables> {
        self.tables.as_ref()
    }

    /// Attach tables read from a translation sheet, replacing any present
    pub fn set_tables(&mut self, tables: TranslationTables) {
        self.tables = Some(tables);
    }

    /// Detach and return the tables
    pub fn take_tables(&mut self) -> Option<TranslationTables> {
        self.tables.take()
    }

    /// Every consistency violation, empty when the document is sound
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        validate(self)
    }

    /// Check all structural invariants
    ///
    /// # Errors
    /// Returns [`Error::StructuralMismatch`] listing every violation found.
    ///
    /// [`Error::StructuralMismatch`]: crate::Error::StructuralMismatch
    pub fn validate(&self) -> Result<()> {
        let violations = validate(self);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::StructuralMismatch { violations })
        }
    }

    /// Replace dialogue with placeholder keys, see [`externalize`]
    ///
    /// # Errors
    /// See [`externalize`].
    pub fn externalize(&mut self) -> Result<()> {
        externalize(self)
    }

    /// Re-inject dialogue from the tables, see [`internalize`]
    ///
    /// # Errors
    /// See [`internalize`].
    pub fn internalize(&mut self) -> Result<()> {
        internalize(self)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{MemorySectionResolver, ScriptDocument};
    use crate::formats::spt::{RecordType, SptRecord};

    /// Records matching a list of command kinds, with offsets and counts filled in
    /// the way the game's tools write them
    pub fn records(kinds: &[(RecordType, i32, i32)]) -> Vec<SptRecord> {
        kinds
            .iter()
            .map(|&(kind, offset, count)| SptRecord::new(kind).with_lines(offset, count))
            .collect()
    }

    pub fn parse_with(lines: &[&str], sections: &[(&str, Vec<SptRecord>)]) -> ScriptDocument {
        let mut resolver = MemorySectionResolver::new();
        for (name, records) in sections {
            resolver.insert(*name, records.clone());
        }
        ScriptDocument::parse(lines, &mut resolver).unwrap()
    }

    /// One section: a sound command, a speaker with two lines of dialogue,
    /// a narration line, another sound command
    pub const SCENE: &[&str] = &[
        "***SS_a01_01_morning",
        "SE_012",
        "天城　（０１２３）",
        "「おはよう」",
        "「今日は早いね」",
        "",
        "朝の光が差し込む。",
        "SE_013",
    ];

    pub fn scene_records() -> Vec<SptRecord> {
        records(&[
            (RecordType::Se, -1, 0),
            (RecordType::Text, 2, 3),
            (RecordType::Text, 6, 1),
            (RecordType::Se, -1, 0),
        ])
    }

    pub fn scene() -> ScriptDocument {
        parse_with(SCENE, &[("a01_01", scene_records())])
    }
}
