//! armatext - gettext message extraction for Arma
//!
//! armatext scans Arma script and config sources (SQF, SQS, FSM, SQM and the
//! preprocessed `cpp`/`hpp` configs) for translatable strings and writes them
//! as a PO template. It also validates the `%1`-style placeholders of Arma
//! format strings.
//!
//! ## Module Structure
//!
//! - `scan`: The layered source scanner and call extractor
//! - `keywords`: Which calls carry messages, and in which arguments
//! - `flags`: Which arguments are Arma format strings
//! - `format`: Format string parsing and validation
//! - `catalog`: Message merging and PO template output
//! - `config`: Configuration file loading and parsing
//! - `files`: Source file discovery
//! - `cli`: Command-line interface layer

pub mod catalog;
pub mod cli;
pub mod config;
pub mod files;
pub mod flags;
pub mod format;
pub mod keywords;
pub mod scan;
