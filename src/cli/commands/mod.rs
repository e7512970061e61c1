pub mod check_format;
mod command_result;
pub mod extract;
pub mod init;

pub use command_result::*;
