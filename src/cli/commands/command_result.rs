use std::path::PathBuf;

use super::super::exit_status::ExitStatus;
use crate::format::FormatCheckError;
use crate::scan::ScanWarning;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    CheckFormat(CheckFormatSummary),
    Init(InitSummary),
}

/// Where the catalog was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub files_scanned: usize,
    /// Paths that could not be read during discovery.
    pub skipped_count: usize,
    pub message_count: usize,
    pub output: OutputTarget,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug)]
pub struct CheckFormatSummary {
    pub result: Result<(), FormatCheckError>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running an armatext command
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub status: ExitStatus,
}
