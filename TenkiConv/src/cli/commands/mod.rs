use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::formats::TableFormat;

pub mod check;
pub mod convert;
pub mod types;

/// Translation sheet format argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

impl From<FormatArg> for TableFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => TableFormat::Csv,
            FormatArg::Tsv => TableFormat::Tsv,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert scripts to translation sheets and back
    ///
    /// `.txt` scripts are externalized into `.meta` + sheet; `.csv`, `.tsv`
    /// and `.meta` files are internalized back into `.txt` + `.spt`.
    /// Directories are searched for `.txt` scripts.
    Convert {
        /// Files or directories to convert
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Translation sheet format to write
        #[arg(short, long, value_enum, default_value = "csv")]
        format: FormatArg,

        /// Copy files to `<name>.bak` before overwriting
        #[arg(long)]
        backup: bool,

        /// Run every step but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Extension of the section record files
        #[arg(long, default_value = "spt")]
        section_ext: String,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse and validate scripts against their section records
    Check {
        /// Script files (`.txt` or `.meta`)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print violations as JSON
        #[arg(long)]
        json: bool,

        /// Extension of the section record files
        #[arg(long, default_value = "spt")]
        section_ext: String,
    },

    /// Count record types across every section record file in a directory
    Types {
        /// Directory to search
        dir: PathBuf,

        /// Extension of the section record files
        #[arg(long, default_value = "spt")]
        section_ext: String,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Convert {
                paths,
                format,
                backup,
                dry_run,
                section_ext,
                quiet,
            } => convert::execute(
                paths,
                (*format).into(),
                *backup,
                *dry_run,
                section_ext,
                *quiet,
            ),
            Commands::Check {
                paths,
                json,
                section_ext,
            } => check::execute(paths, *json, section_ext),
            Commands::Types { dir, section_ext } => types::execute(dir, section_ext),
        }
    }
}
