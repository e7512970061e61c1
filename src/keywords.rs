//! Keyword table: which calls carry translatable strings, and where.
//!
//! A keyword is registered from a spec string in xgettext's notation:
//!
//! - `localize` - the first argument is the message
//! - `name:2` - the second argument is the message
//! - `name:1,2` - singular and plural forms
//! - `name:1c,2` - message context in argument 1, message in argument 2
//! - `name:1,3t` - only calls with exactly three arguments match
//! - `name:1,"note for translators"` - extracted comment added to the message

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

/// Keywords registered unless disabled.
pub const DEFAULT_KEYWORDS: &[&str] = &["localize"];

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordSpecError {
    #[error("keyword name is empty in '{0}'")]
    EmptyName(String),
    #[error("'{name}' is not a valid keyword name")]
    InvalidName { name: String },
    #[error("invalid argument specification '{arg}' in '{spec}'")]
    InvalidArgument { spec: String, arg: String },
    #[error("too many message arguments in '{0}'")]
    TooManyArguments(String),
    #[error("'{0}' names a context but no message argument")]
    MissingMessage(String),
    #[error("unterminated comment in '{0}'")]
    UnterminatedComment(String),
}

/// Positions (1-based) of the message-bearing arguments of a keyword call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallShape {
    pub singular: usize,
    pub plural: Option<usize>,
    pub context: Option<usize>,
    /// Required total argument count, if any.
    pub total: Option<usize>,
    /// Comments added to every message extracted through this shape.
    pub comments: Vec<String>,
}

impl Default for CallShape {
    fn default() -> Self {
        Self {
            singular: 1,
            plural: None,
            context: None,
            total: None,
            comments: Vec::new(),
        }
    }
}

/// Parse `name[:argspec[,argspec...]]` into the keyword name and its shape.
pub fn parse_keyword_spec(spec: &str) -> Result<(String, CallShape), KeywordSpecError> {
    let (name, args) = match spec.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (spec, None),
    };
    if name.is_empty() {
        return Err(KeywordSpecError::EmptyName(spec.to_string()));
    }
    if !IDENTIFIER_REGEX.is_match(name) {
        return Err(KeywordSpecError::InvalidName {
            name: name.to_string(),
        });
    }
    let Some(args) = args else {
        return Ok((name.to_string(), CallShape::default()));
    };

    let mut numbers = Vec::new();
    let mut context = None;
    let mut total = None;
    let mut comments = Vec::new();
    let invalid = |arg: &str| KeywordSpecError::InvalidArgument {
        spec: spec.to_string(),
        arg: arg.to_string(),
    };

    let mut rest = args;
    loop {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted
                .find('"')
                .ok_or_else(|| KeywordSpecError::UnterminatedComment(spec.to_string()))?;
            comments.push(quoted[..end].to_string());
            rest = &quoted[end + 1..];
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            let arg = &rest[..end];
            let (digits, suffix) = arg.split_at(arg.find(|c: char| !c.is_ascii_digit()).unwrap_or(arg.len()));
            let number: usize = digits.parse().map_err(|_| invalid(arg))?;
            if number == 0 {
                return Err(invalid(arg));
            }
            match suffix {
                "" => numbers.push(number),
                "c" if context.is_none() => context = Some(number),
                "t" if total.is_none() => total = Some(number),
                _ => return Err(invalid(arg)),
            }
            rest = &rest[end..];
        }
        match rest.strip_prefix(',') {
            Some(next) => rest = next,
            None if rest.is_empty() => break,
            None => return Err(invalid(rest)),
        }
    }

    let (singular, plural) = match numbers.as_slice() {
        [] if context.is_some() => return Err(KeywordSpecError::MissingMessage(spec.to_string())),
        [] => (1, None),
        [singular] => (*singular, None),
        [singular, plural] => (*singular, Some(*plural)),
        _ => return Err(KeywordSpecError::TooManyArguments(spec.to_string())),
    };
    Ok((
        name.to_string(),
        CallShape {
            singular,
            plural,
            context,
            total,
            comments,
        },
    ))
}

/// Read-only keyword lookup used during a scan.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    entries: HashMap<String, Vec<CallShape>>,
}

impl KeywordTable {
    /// Table with only the default keywords.
    pub fn with_defaults() -> Self {
        KeywordTableBuilder::new().build()
    }

    pub fn get(&self, name: &str) -> Option<&[CallShape]> {
        self.entries.get(name).map(Vec::as_slice)
    }
}

/// Collects keyword registrations before a scan.
#[derive(Debug, Clone)]
pub struct KeywordTableBuilder {
    entries: HashMap<String, Vec<CallShape>>,
    default_keywords: bool,
}

impl Default for KeywordTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordTableBuilder {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            default_keywords: true,
        }
    }

    /// Register one keyword spec. An empty spec disables the default keywords.
    pub fn register(&mut self, spec: &str) -> Result<&mut Self, KeywordSpecError> {
        if spec.is_empty() {
            self.default_keywords = false;
            return Ok(self);
        }
        let (name, shape) = parse_keyword_spec(spec)?;
        let shapes = self.entries.entry(name).or_default();
        if !shapes.contains(&shape) {
            shapes.push(shape);
        }
        Ok(self)
    }

    pub fn disable_defaults(&mut self) -> &mut Self {
        self.default_keywords = false;
        self
    }

    pub fn build(mut self) -> KeywordTable {
        if self.default_keywords {
            for spec in DEFAULT_KEYWORDS {
                let (name, shape) =
                    parse_keyword_spec(spec).expect("built-in keyword spec is valid");
                let shapes = self.entries.entry(name).or_default();
                if !shapes.contains(&shape) {
                    shapes.push(shape);
                }
            }
        }
        KeywordTable {
            entries: self.entries,
        }
    }
}
