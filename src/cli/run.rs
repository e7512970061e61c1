use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, check_format::check_format, extract::extract, init::init},
};

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::CheckFormat(cmd)) => Ok(check_format(cmd)),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
