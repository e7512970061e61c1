//! Message extraction from Arma sources.
//!
//! The scan is a stack of layers, each owning the one beneath it:
//!
//! ```text
//! RawReader -> LineSplicer -> CommentFilter -> Tokenizer -> DirectiveFilter
//!     -> LiteralConcatenator -> Classifier -> Extractor -> MessageSink
//! ```
//!
//! Nothing is shared between scans, so files can be processed in parallel,
//! each with its own pipeline and sink.

mod arglist;
mod classify;
mod comments;
mod concat;
mod directive;
mod extract;
mod stream;
mod token;
mod tokenizer;

use std::{
    fmt,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use thiserror::Error;

pub use comments::CommentSnapshot;

use classify::{Classifier, Literal};
use comments::CommentFilter;
use concat::LiteralConcatenator;
use directive::DirectiveFilter;
use extract::Extractor;
use stream::{LineSplicer, RawReader};
use tokenizer::Tokenizer;

use crate::flags::{FlagContext, FlagTable};
use crate::keywords::KeywordTable;

/// File extensions of Arma script and config sources.
pub const ARMA_EXTENSIONS: &[&str] = &["cpp", "ext", "fsm", "hpp", "inc", "sqf", "sqm", "sqs"];

/// Logical source position. Line markers in the input can change both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub file: Arc<str>,
    pub line: usize,
}

impl Position {
    /// Line 1 of `file`.
    pub fn new(file: impl Into<Arc<str>>) -> Self {
        Self {
            file: file.into(),
            line: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    UnterminatedString,
    AmbiguousKeyword { keyword: String },
    InvalidUtf8,
    InvalidFormat { msgid: String, reason: String },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnterminatedString => f.write_str("unterminated string literal"),
            WarningKind::AmbiguousKeyword { keyword } => {
                write!(f, "ambiguous argument specification for keyword '{keyword}'")
            }
            WarningKind::InvalidUtf8 => {
                f.write_str("invalid UTF-8 in source, replaced with U+FFFD")
            }
            WarningKind::InvalidFormat { msgid, reason } => {
                write!(f, "'{msgid}' is not a valid Arma format string: {reason}")
            }
        }
    }
}

/// A recoverable problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub position: Position,
    pub kind: WarningKind,
}

impl ScanWarning {
    pub fn new(position: Position, kind: WarningKind) -> Self {
        Self { position, kind }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A message candidate as found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub plural: Option<String>,
    pub position: Position,
    /// Comments directly preceding the literal.
    pub comment: CommentSnapshot,
    /// Comments attached by the keyword declaration.
    pub extracted_comments: Vec<String>,
    pub context: FlagContext,
}

impl ExtractedMessage {
    fn from_literal(literal: Literal, context: FlagContext) -> Self {
        Self {
            msgctxt: None,
            msgid: literal.text,
            plural: None,
            position: literal.position,
            comment: literal.comment,
            extracted_comments: Vec::new(),
            context,
        }
    }
}

/// Receiver of everything a scan produces.
pub trait MessageSink {
    fn remember(&mut self, message: ExtractedMessage);
    fn warn(&mut self, warning: ScanWarning);
}

/// Messages and warnings of one file, in source order.
#[derive(Debug, Default)]
pub struct FileExtraction {
    pub messages: Vec<ExtractedMessage>,
    pub warnings: Vec<ScanWarning>,
}

impl MessageSink for FileExtraction {
    fn remember(&mut self, message: ExtractedMessage) {
        self.messages.push(message);
    }

    fn warn(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }
}

/// Keywords, flags and mode of a scan. Shared read-only between files.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub keywords: KeywordTable,
    pub flags: FlagTable,
    /// Extract every string literal, not only keyword arguments.
    pub extract_all: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordTable::with_defaults(),
            flags: FlagTable::with_defaults(),
            extract_all: false,
        }
    }
}

/// Scan `source`, reporting positions in `logical_path`.
pub fn extract_str(
    source: &str,
    logical_path: &str,
    config: &ExtractorConfig,
    sink: &mut dyn MessageSink,
) {
    tracing::debug!(file = logical_path, "scanning");
    let chars = CommentFilter::new(LineSplicer::new(
        RawReader::new(source),
        Position::new(logical_path),
    ));
    let tokens = Classifier::new(
        LiteralConcatenator::new(DirectiveFilter::new(Tokenizer::new(chars))),
        &config.keywords,
    );
    Extractor::new(tokens, &config.flags, config.extract_all).run(sink);
}

/// Line breaks as the scanner counts them: CR, LF and CR/LF each end a line.
fn count_line_breaks(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut after_cr = false;
    for &b in bytes {
        match b {
            b'\r' => count += 1,
            b'\n' if !after_cr => count += 1,
            _ => {}
        }
        after_cr = b == b'\r';
    }
    count
}

/// Read all of `reader` and scan it. Invalid UTF-8 is replaced and reported.
pub fn extract_reader(
    mut reader: impl Read,
    real_path: &Path,
    logical_path: &str,
    config: &ExtractorConfig,
    sink: &mut dyn MessageSink,
) -> Result<(), ScanError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| ScanError::Io {
            path: real_path.to_path_buf(),
            source,
        })?;

    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(err) => {
            let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
            let line = count_line_breaks(valid) + 1;
            sink.warn(ScanWarning::new(
                Position {
                    file: Arc::from(logical_path),
                    line,
                },
                WarningKind::InvalidUtf8,
            ));
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };
    extract_str(&source, logical_path, config, sink);
    Ok(())
}

/// Scan the file at `path`.
pub fn extract_file(
    path: &Path,
    logical_path: &str,
    config: &ExtractorConfig,
    sink: &mut dyn MessageSink,
) -> Result<(), ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_reader(BufReader::new(file), path, logical_path, config, sink)
}

/// True if `path` has one of the [`ARMA_EXTENSIONS`].
pub fn is_arma_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ARMA_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}
