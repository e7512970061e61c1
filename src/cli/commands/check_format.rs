use super::super::{args::CheckFormatCommand, exit_status::ExitStatus};
use super::{CheckFormatSummary, CommandResult, CommandSummary};
use crate::format::check_pair;

pub fn check_format(cmd: CheckFormatCommand) -> CommandResult {
    let result = check_pair(&cmd.template, &cmd.translation);
    let status = if result.is_ok() {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    };
    CommandResult {
        summary: CommandSummary::CheckFormat(CheckFormatSummary { result }),
        status,
    }
}
