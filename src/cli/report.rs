//! Report formatting and printing utilities.
//!
//! Separate from the scanning logic so that armatext can be used as a
//! library without printing side effects.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    CheckFormatSummary, CommandResult, CommandSummary, ExtractSummary, InitSummary, OutputTarget,
};
use crate::config::CONFIG_FILE_NAME;
use crate::format::FormatCheckError;
use crate::scan::ScanWarning;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Extract(summary) => print_extract(summary, verbose),
        CommandSummary::CheckFormat(summary) => {
            print_check_format_to(summary, &mut io::stdout().lock())
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

/// Print scan warnings as `file:line: warning: message`.
pub fn print_warnings_to<W: Write>(warnings: &[ScanWarning], writer: &mut W) {
    for warning in warnings {
        let _ = writeln!(
            writer,
            "{}: {} {}",
            warning.position,
            "warning:".bold().yellow(),
            warning.kind
        );
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

fn print_extract(summary: &ExtractSummary, verbose: bool) {
    print_warnings_to(&summary.warnings, &mut io::stderr().lock());
    if summary.skipped_count > 0 && !verbose {
        eprintln!(
            "{} {} path(s) could not be accessed (use {} for details)",
            "warning:".bold().yellow(),
            summary.skipped_count,
            "-v".cyan()
        );
    }

    // The catalog itself may be on stdout.
    match &summary.output {
        OutputTarget::Stdout => print_extract_summary_to(summary, &mut io::stderr().lock()),
        OutputTarget::File(_) => print_extract_summary_to(summary, &mut io::stdout().lock()),
    }
}

pub fn print_extract_summary_to<W: Write>(summary: &ExtractSummary, writer: &mut W) {
    let mut msg = format!(
        "Extracted {} {} from {} source {}",
        summary.message_count,
        plural(summary.message_count, "message", "messages"),
        summary.files_scanned,
        plural(summary.files_scanned, "file", "files"),
    );
    if let OutputTarget::File(path) = &summary.output {
        msg.push_str(&format!(" into {}", path.display()));
    }
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());

    if !summary.warnings.is_empty() {
        let count = summary.warnings.len();
        let _ = writeln!(
            writer,
            "{} {} {}",
            FAILURE_MARK.yellow(),
            count,
            plural(count, "warning", "warnings").yellow()
        );
    }
}

pub fn print_check_format_to<W: Write>(summary: &CheckFormatSummary, writer: &mut W) {
    let _ = match &summary.result {
        Ok(()) => writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "Format strings are compatible".green()
        ),
        Err(FormatCheckError::Mismatch { message, .. }) => {
            writeln!(writer, "{} {}", FAILURE_MARK.red(), message)
        }
        Err(err) => writeln!(writer, "{} {}", FAILURE_MARK.red(), err),
    };
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
    }
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, sync::Arc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::format::check_pair;
    use crate::scan::{Position, WarningKind};

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_warning_lines() {
        let warnings = vec![ScanWarning::new(
            Position {
                file: Arc::from("addons/fn_a.sqf"),
                line: 12,
            },
            WarningKind::UnterminatedString,
        )];
        let out = render(|w| print_warnings_to(&warnings, w));
        assert_eq!(
            out,
            "addons/fn_a.sqf:12: warning: unterminated string literal\n"
        );
    }

    #[test]
    fn test_extract_summary() {
        let summary = ExtractSummary {
            files_scanned: 3,
            skipped_count: 0,
            message_count: 1,
            output: OutputTarget::File(PathBuf::from("messages.pot")),
            warnings: Vec::new(),
        };
        let out = render(|w| print_extract_summary_to(&summary, w));
        assert_eq!(
            out,
            "\u{2713} Extracted 1 message from 3 source files into messages.pot\n"
        );
    }

    #[test]
    fn test_check_format_messages() {
        let ok = CheckFormatSummary {
            result: check_pair("%1", "%1"),
        };
        assert_eq!(
            render(|w| print_check_format_to(&ok, w)),
            "\u{2713} Format strings are compatible\n"
        );

        let mismatch = CheckFormatSummary {
            result: check_pair("%1 %2", "%1"),
        };
        assert_eq!(
            render(|w| print_check_format_to(&mismatch, w)),
            "\u{2718} a format specification for argument 2 doesn't exist in '%1'\n"
        );
    }
}
