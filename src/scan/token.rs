//! Token types shared by the tokenizer and the layers built on it.

use super::comments::CommentSnapshot;

/// Text of a string-like token together with the comments that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralText {
    pub text: String,
    pub comment: CommentSnapshot,
}

impl LiteralText {
    pub fn new(text: impl Into<String>, comment: CommentSnapshot) -> Self {
        Self {
            text: text.into(),
            comment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    /// A line break.
    Eol,
    /// `\n` outside of a string, which the language accepts where a string is
    /// expected.
    ExplicitEol(LiteralText),
    Hash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Name(String),
    /// Preprocessing number. `value` is the leading decimal integer.
    Number {
        text: String,
        value: i64,
    },
    /// `"..."` or `'...'`, already decoded.
    StringLiteral(LiteralText),
    /// `$STR_tag_name`, stored without the `$`.
    TaggedLiteral(LiteralText),
    /// Any operator or character of no interest.
    Symbol,
    Whitespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Logical line on which the token started.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self { kind, line }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
