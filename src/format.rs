//! Arma format strings, as used by the `format` and `formatText` commands.
//!
//! A directive is `%` followed by the number of the argument to insert.
//! Numbers are 0-based argument positions of the format array, counting the
//! format string itself, so the first value is `%1`. There is no `%%`; a
//! literal percent sign has to be passed as an argument:
//!
//! ```text
//! format ["146%1", "%"]
//! ```

use std::collections::BTreeSet;

use thiserror::Error;

/// Argument numbers at or above this are rejected.
pub const MAX_ARGUMENT_NUMBER: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("The string ends in the middle of a directive.")]
    UnterminatedDirective,
    #[error(
        "In the directive number {directive}, the character '{character}' is not a valid conversion specifier."
    )]
    InvalidConversionSpecifier { directive: usize, character: char },
    #[error(
        "In the directive number {directive}, the argument number {number} is too large (the maximum is {max}).",
        max = MAX_ARGUMENT_NUMBER - 1
    )]
    ArgumentTooLarge { directive: usize, number: String },
}

/// The first argument number referenced by only one side of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// Used in the template, absent from the translation.
    MissingInTranslation(usize),
    /// Used in the translation, absent from the template.
    MissingInTemplate(usize),
}

impl Mismatch {
    /// Human-readable diagnostic for this mismatch.
    pub fn describe(&self, template: &str, translation: &str) -> String {
        match self {
            Mismatch::MissingInTranslation(arg) => format!(
                "a format specification for argument {arg} doesn't exist in '{translation}'"
            ),
            Mismatch::MissingInTemplate(arg) => format!(
                "a format specification for argument {arg}, as in '{translation}', doesn't exist in '{template}'"
            ),
        }
    }
}

/// Parsed directives of one format string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    directives: usize,
    used: BTreeSet<usize>,
}

impl FormatSpec {
    pub fn parse(format: &str) -> Result<Self, FormatError> {
        let mut spec = FormatSpec::default();
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                continue;
            }
            match chars.peek() {
                None => return Err(FormatError::UnterminatedDirective),
                Some(&next) if !next.is_ascii_digit() => {
                    return Err(FormatError::InvalidConversionSpecifier {
                        directive: spec.directives + 1,
                        character: next,
                    });
                }
                Some(_) => {}
            }
            spec.directives += 1;

            let mut digits = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                digits.push(d);
            }
            let number = digits
                .parse::<usize>()
                .ok()
                .filter(|n| *n < MAX_ARGUMENT_NUMBER)
                .ok_or_else(|| FormatError::ArgumentTooLarge {
                    directive: spec.directives,
                    number: digits.clone(),
                })?;
            spec.used.insert(number);
        }
        Ok(spec)
    }

    /// Number of directives, counting repeated references.
    pub fn directives(&self) -> usize {
        self.directives
    }

    /// Highest referenced argument number plus one.
    pub fn arg_count(&self) -> usize {
        self.used.last().map_or(0, |max| max + 1)
    }

    #[cfg(test)]
    fn uses(&self, arg: usize) -> bool {
        self.used.contains(&arg)
    }

    #[cfg(test)]
    fn used_arguments(&self) -> impl Iterator<Item = usize> + '_ {
        self.used.iter().copied()
    }

    /// First argument number, scanning from 0, used by exactly one side.
    pub fn first_mismatch(template: &FormatSpec, translation: &FormatSpec) -> Option<Mismatch> {
        let (in_template, in_translation) = (&template.used, &translation.used);
        let first = in_template
            .symmetric_difference(in_translation)
            .next()
            .copied()?;
        if in_template.contains(&first) {
            Some(Mismatch::MissingInTranslation(first))
        } else {
            Some(Mismatch::MissingInTemplate(first))
        }
    }
}

/// Compare a template with its translation. Returns true when the pair is
/// invalid. At most one diagnostic is passed to `logger`.
pub fn check(
    template: &FormatSpec,
    translation: &FormatSpec,
    pretty_template: &str,
    pretty_translation: &str,
    logger: Option<&mut dyn FnMut(String)>,
) -> bool {
    let Some(mismatch) = FormatSpec::first_mismatch(template, translation) else {
        return false;
    };
    if let Some(logger) = logger {
        logger(mismatch.describe(pretty_template, pretty_translation));
    }
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatCheckError {
    #[error("invalid template: {0}")]
    Template(FormatError),
    #[error("invalid translation: {0}")]
    Translation(FormatError),
    #[error("{message}")]
    Mismatch { mismatch: Mismatch, message: String },
}

/// Parse and compare a template and its translation.
pub fn check_pair(template: &str, translation: &str) -> Result<(), FormatCheckError> {
    let template_spec = FormatSpec::parse(template).map_err(FormatCheckError::Template)?;
    let translation_spec = FormatSpec::parse(translation).map_err(FormatCheckError::Translation)?;
    match FormatSpec::first_mismatch(&template_spec, &translation_spec) {
        None => Ok(()),
        Some(mismatch) => Err(FormatCheckError::Mismatch {
            mismatch,
            message: mismatch.describe(template, translation),
        }),
    }
}
