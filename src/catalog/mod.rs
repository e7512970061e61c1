//! The message catalog: extracted messages merged by msgctxt and msgid.
//!
//! Comments preceding a message are kept only from the first line starting
//! with the add-comments tag onwards (all of them for an empty tag, none
//! without a tag). A comment line containing `xgettext:` followed by
//! `arma-format` or `no-arma-format` sets the format flag of the message
//! instead of being kept.

mod pot;

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

pub use pot::PotHeader;

use crate::flags::FormatFlag;
use crate::format::FormatSpec;
use crate::scan::{ExtractedMessage, FileExtraction, MessageSink, Position, ScanWarning, WarningKind};

static SPECIAL_FORMAT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s,])(no-)?arma-format(?:[\s,]|$)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msgctxt: Option<String>,
    pub msgid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msgid_plural: Option<String>,
    pub references: Vec<Position>,
    /// Translator comments taken from the source.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Comments attached by the keyword declaration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extracted_comments: Vec<String>,
    pub format: FormatFlag,
}

impl Message {
    fn new(msgctxt: Option<String>, msgid: String) -> Self {
        Self {
            msgctxt,
            msgid,
            msgid_plural: None,
            references: Vec::new(),
            comments: Vec::new(),
            extracted_comments: Vec::new(),
            format: FormatFlag::Undecided,
        }
    }

    /// True for the POT header entry, which has an empty msgid.
    pub fn is_header(&self) -> bool {
        self.msgctxt.is_none() && self.msgid.is_empty()
    }
}

/// Find a forced format flag in an `xgettext:` special comment.
fn special_format_flag(line: &str) -> Option<FormatFlag> {
    let (_, rest) = line.split_once("xgettext:")?;
    SPECIAL_FORMAT_REGEX
        .captures_iter(rest)
        .last()
        .map(|caps| match caps.get(1) {
            Some(_) => FormatFlag::No,
            None => FormatFlag::Yes,
        })
}

#[derive(Debug, Default)]
pub struct Catalog {
    messages: Vec<Message>,
    index: HashMap<(Option<String>, String), usize>,
    /// Tag selecting translator comments; `Some("")` keeps all of them.
    add_comments: Option<String>,
    warnings: Vec<ScanWarning>,
}

impl Catalog {
    pub fn new(add_comments: Option<String>) -> Self {
        Self {
            add_comments,
            ..Self::default()
        }
    }

    /// Messages in first-seen order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Add the results of one file scan, keeping their order.
    pub fn merge(&mut self, extraction: FileExtraction) {
        for warning in extraction.warnings {
            self.warn(warning);
        }
        for message in extraction.messages {
            self.remember(message);
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.messages)
    }

    /// Split source comment lines into kept translator comments and a
    /// forced format flag.
    fn select_comments(&self, lines: &[String]) -> (Vec<String>, Option<FormatFlag>) {
        let mut kept = Vec::new();
        let mut forced = None;
        let mut tagged = false;
        for line in lines {
            let line = line.trim_start_matches([' ', '\t']);
            if let Some(flag) = special_format_flag(line) {
                forced = Some(flag);
                continue;
            }
            if let Some(tag) = &self.add_comments {
                tagged = tagged || line.starts_with(tag.as_str());
            }
            if tagged {
                kept.push(line.to_string());
            }
        }
        (kept, forced)
    }

    /// Decide the format flag of one occurrence.
    fn decide_format(&mut self, message: &ExtractedMessage, forced: Option<FormatFlag>) -> FormatFlag {
        let flag = forced.unwrap_or(message.context.format);
        match (flag, FormatSpec::parse(&message.msgid)) {
            (FormatFlag::Undecided, Ok(spec)) if spec.directives() > 0 => FormatFlag::Yes,
            (FormatFlag::Yes, Err(err)) => {
                self.warnings.push(ScanWarning::new(
                    message.position.clone(),
                    WarningKind::InvalidFormat {
                        msgid: message.msgid.clone(),
                        reason: err.to_string(),
                    },
                ));
                flag
            }
            _ => flag,
        }
    }
}

impl MessageSink for Catalog {
    fn remember(&mut self, message: ExtractedMessage) {
        let (comments, forced) = self.select_comments(message.comment.fragments());
        let format = self.decide_format(&message, forced);

        let key = (message.msgctxt.clone(), message.msgid.clone());
        let slot = match self.index.get(&key) {
            Some(slot) => *slot,
            None => {
                self.messages
                    .push(Message::new(message.msgctxt.clone(), message.msgid.clone()));
                self.index.insert(key, self.messages.len() - 1);
                self.messages.len() - 1
            }
        };
        let entry = &mut self.messages[slot];

        if entry.msgid_plural.is_none() {
            entry.msgid_plural = message.plural;
        }
        if !entry.references.contains(&message.position) {
            entry.references.push(message.position);
        }
        for comment in comments {
            if !entry.comments.contains(&comment) {
                entry.comments.push(comment);
            }
        }
        for comment in message.extracted_comments {
            if !entry.extracted_comments.contains(&comment) {
                entry.extracted_comments.push(comment);
            }
        }
        if entry.format == FormatFlag::Undecided {
            entry.format = format;
        }
    }

    fn warn(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }
}
