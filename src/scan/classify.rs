//! Stage 9: the reduced token alphabet seen by the call extractor.

use std::sync::Arc;

use super::comments::CommentSnapshot;
use super::concat::LiteralConcatenator;
use super::token::{LiteralText, TokenKind};
use super::{Position, ScanWarning};
use crate::keywords::{CallShape, KeywordTable};

/// A string or tagged literal with the place it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub text: String,
    pub comment: CommentSnapshot,
    pub position: Position,
}

impl Literal {
    fn new(LiteralText { text, comment }: LiteralText, position: Position) -> Self {
        Self {
            text,
            comment,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighToken<'k> {
    Eof,
    Keyword {
        name: String,
        shapes: &'k [CallShape],
        position: Position,
    },
    /// A name that is not a keyword.
    Symbol {
        name: String,
    },
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,
    StringLiteral(Literal),
    TaggedLiteral(Literal),
    Other,
}

#[derive(Debug)]
pub struct Classifier<'k> {
    inner: LiteralConcatenator,
    keywords: &'k KeywordTable,
}

impl<'k> Classifier<'k> {
    pub fn new(inner: LiteralConcatenator, keywords: &'k KeywordTable) -> Self {
        Self { inner, keywords }
    }

    pub fn next_token(&mut self) -> HighToken<'k> {
        let token = self.inner.next_token();
        if token.is_eof() {
            return HighToken::Eof;
        }
        self.inner.comments_mut().mark_code();

        let file = Arc::clone(&self.inner.position().file);
        let position = Position {
            file,
            line: token.line,
        };
        match token.kind {
            TokenKind::Name(name) => match self.keywords.get(&name) {
                Some(shapes) => HighToken::Keyword {
                    name,
                    shapes,
                    position,
                },
                None => HighToken::Symbol { name },
            },
            TokenKind::LParen => HighToken::LParen,
            TokenKind::RParen => HighToken::RParen,
            TokenKind::LBracket => HighToken::LBracket,
            TokenKind::RBracket => HighToken::RBracket,
            TokenKind::Comma => HighToken::Comma,
            TokenKind::Colon => HighToken::Colon,
            TokenKind::StringLiteral(text) => HighToken::StringLiteral(Literal::new(text, position)),
            TokenKind::TaggedLiteral(text) => HighToken::TaggedLiteral(Literal::new(text, position)),
            _ => HighToken::Other,
        }
    }

    pub fn take_warnings(&mut self) -> Vec<ScanWarning> {
        self.inner.take_warnings()
    }
}
