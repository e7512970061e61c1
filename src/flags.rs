//! Flag contexts: which arguments are (or pass through) Arma format strings.
//!
//! `format ["%1 of %2", _a, _b]` makes its first argument an `arma-format`
//! string. `localize` passes the format-ness of its surroundings on to its
//! own first argument, so `format [localize "STR_x", _a]` marks `STR_x`.
//!
//! Flags are declared as `name:arg:flag` where flag is `arma-format`,
//! `no-arma-format` or `pass-arma-format`.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;

/// Flags declared for the built-in Arma commands.
pub const DEFAULT_FLAGS: &[&str] = &[
    "localize:1:pass-arma-format",
    "format:1:arma-format",
    "formatText:1:arma-format",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagSpecError {
    #[error("flag specification '{0}' must have the form name:arg:flag")]
    Malformed(String),
    #[error("invalid argument number in flag specification '{0}'")]
    InvalidArgument(String),
    #[error("unsupported flag '{flag}' in '{spec}'")]
    UnsupportedFlag { spec: String, flag: String },
}

/// Whether a string is an Arma format string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatFlag {
    #[default]
    Undecided,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagContext {
    pub format: FormatFlag,
    /// Take `format` from the enclosing context instead.
    pub pass_format: bool,
}

impl FlagContext {
    pub const NULL: FlagContext = FlagContext {
        format: FormatFlag::Undecided,
        pass_format: false,
    };

    pub const PASSTHROUGH: FlagContext = FlagContext {
        format: FormatFlag::Undecided,
        pass_format: true,
    };

    /// Apply `modifier` inside `outer`.
    pub fn inherited(outer: FlagContext, modifier: FlagContext) -> FlagContext {
        if modifier.pass_format {
            FlagContext {
                format: outer.format,
                pass_format: false,
            }
        } else {
            modifier
        }
    }
}

/// Per-argument contexts for one call name, walked argument by argument.
#[derive(Debug, Clone)]
pub enum ContextIter<'a> {
    /// Every argument gets the null context.
    Null,
    /// Every argument inherits the enclosing context.
    Passthrough,
    Table {
        entries: &'a BTreeMap<usize, FlagContext>,
        arg: usize,
    },
}

impl ContextIter<'_> {
    /// Context of the next argument (the first call yields argument 1).
    pub fn advance(&mut self) -> FlagContext {
        match self {
            ContextIter::Null => FlagContext::NULL,
            ContextIter::Passthrough => FlagContext::PASSTHROUGH,
            ContextIter::Table { entries, arg } => {
                *arg += 1;
                entries.get(&*arg).copied().unwrap_or(FlagContext::NULL)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    entries: HashMap<String, BTreeMap<usize, FlagContext>>,
}

impl FlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for spec in DEFAULT_FLAGS {
            table
                .add_spec(spec)
                .expect("built-in flag spec is valid");
        }
        table
    }

    pub fn add_spec(&mut self, spec: &str) -> Result<(), FlagSpecError> {
        let mut parts = spec.rsplitn(3, ':');
        let (Some(flag), Some(arg), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(FlagSpecError::Malformed(spec.to_string()));
        };
        if name.is_empty() {
            return Err(FlagSpecError::Malformed(spec.to_string()));
        }
        let arg: usize = arg
            .parse()
            .ok()
            .filter(|arg| *arg > 0)
            .ok_or_else(|| FlagSpecError::InvalidArgument(spec.to_string()))?;

        let (format, pass_format) = match flag {
            "arma-format" => (Some(FormatFlag::Yes), false),
            "no-arma-format" => (Some(FormatFlag::No), false),
            "pass-arma-format" => (None, true),
            _ => {
                return Err(FlagSpecError::UnsupportedFlag {
                    spec: spec.to_string(),
                    flag: flag.to_string(),
                });
            }
        };

        let context = self
            .entries
            .entry(name.to_string())
            .or_default()
            .entry(arg)
            .or_default();
        if let Some(format) = format {
            context.format = format;
        }
        context.pass_format |= pass_format;
        Ok(())
    }

    /// Iterator over the argument contexts of `name`; null if unknown.
    pub fn iter(&self, name: &str) -> ContextIter<'_> {
        match self.entries.get(name) {
            Some(entries) => ContextIter::Table { entries, arg: 0 },
            None => ContextIter::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_flags() {
        let table = FlagTable::with_defaults();

        let mut format = table.iter("format");
        assert_eq!(format.advance().format, FormatFlag::Yes);
        assert_eq!(format.advance(), FlagContext::NULL);

        let mut localize = table.iter("localize");
        assert_eq!(localize.advance(), FlagContext::PASSTHROUGH);

        assert_eq!(table.iter("hint").advance(), FlagContext::NULL);
    }

    #[test]
    fn test_default_specs_are_valid() {
        for spec in DEFAULT_FLAGS {
            assert_eq!(FlagTable::new().add_spec(spec), Ok(()), "{spec}");
        }
    }

    #[test]
    fn test_inherited_passes_format() {
        let outer = FlagContext {
            format: FormatFlag::Yes,
            pass_format: false,
        };
        assert_eq!(
            FlagContext::inherited(outer, FlagContext::PASSTHROUGH),
            outer
        );
        assert_eq!(
            FlagContext::inherited(outer, FlagContext::NULL),
            FlagContext::NULL
        );
    }

    #[test]
    fn test_later_arguments() {
        let mut table = FlagTable::new();
        table.add_spec("fmt:3:no-arma-format").unwrap();
        let mut iter = table.iter("fmt");
        assert_eq!(iter.advance(), FlagContext::NULL);
        assert_eq!(iter.advance(), FlagContext::NULL);
        assert_eq!(iter.advance().format, FormatFlag::No);
    }

    #[test]
    fn test_invalid_specs() {
        let mut table = FlagTable::new();
        assert_eq!(
            table.add_spec("format"),
            Err(FlagSpecError::Malformed("format".to_string()))
        );
        assert_eq!(
            table.add_spec("format:x:arma-format"),
            Err(FlagSpecError::InvalidArgument(
                "format:x:arma-format".to_string()
            ))
        );
        assert!(matches!(
            table.add_spec("printf:1:c-format"),
            Err(FlagSpecError::UnsupportedFlag { .. })
        ));
    }
}
