//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Scan Arma sources and write a PO template
//! - `check-format`: Validate the placeholders of a translation against its template
//! - `init`: Initialize armatext configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.verbose,
            Some(Command::CheckFormat(_)) | Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ExtractCommand {
    /// Files or directories to scan (overrides `includes` in the config file)
    pub paths: Vec<PathBuf>,

    /// Additional keyword spec, e.g. `tr:1c,2`. An empty spec disables the default keywords.
    #[arg(short, long = "keyword", value_name = "SPEC")]
    pub keywords: Vec<String>,

    /// Do not look for the default `localize` keyword
    #[arg(long)]
    pub no_default_keywords: bool,

    /// Extract every string literal
    #[arg(short = 'a', long)]
    pub extract_all: bool,

    /// Additional flag spec, e.g. `myFormat:1:arma-format`
    #[arg(long = "flag", value_name = "SPEC")]
    pub flags: Vec<String>,

    /// Keep comments preceding messages, starting at a line beginning with TAG
    /// (all comments when TAG is omitted)
    #[arg(
        short = 'c',
        long,
        value_name = "TAG",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub add_comments: Option<String>,

    /// Output file, `-` for stdout (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Write the catalog as JSON instead of a PO template
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckFormatCommand {
    /// The original message
    pub template: String,
    /// Its translation
    pub translation: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract translatable messages into a PO template
    Extract(ExtractCommand),
    /// Check that a translation uses the same %N placeholders as its template
    CheckFormat(CheckFormatCommand),
    /// Initialize a new .armatextrc.json configuration file
    Init,
}
