//! Stage 8: blank removal and adjacent string literal concatenation.

use super::comments::CommentBuffer;
use super::directive::DirectiveFilter;
use super::token::{Token, TokenKind};
use super::{Position, ScanWarning};

#[derive(Debug)]
pub struct LiteralConcatenator {
    inner: DirectiveFilter,
}

impl LiteralConcatenator {
    pub fn new(inner: DirectiveFilter) -> Self {
        Self { inner }
    }

    /// `"a" "b" \n "c"` becomes the single literal `"ab\nc"`. A lone `\n`
    /// becomes an ordinary string literal.
    pub fn next_token(&mut self) -> Token {
        let token = self.next_significant();
        let line = token.line;
        let mut literal = match token.kind {
            TokenKind::StringLiteral(literal) | TokenKind::ExplicitEol(literal) => literal,
            kind => return Token::new(kind, line),
        };
        loop {
            let next = self.next_significant();
            match next.kind {
                TokenKind::StringLiteral(piece) | TokenKind::ExplicitEol(piece) => {
                    literal.text.push_str(&piece.text);
                }
                _ => {
                    self.inner.unget(next);
                    break;
                }
            }
        }
        Token::new(TokenKind::StringLiteral(literal), line)
    }

    /// Skip whitespace and line ends, keeping comment adjacency up to date.
    fn next_significant(&mut self) -> Token {
        loop {
            let token = self.inner.next_token();
            match token.kind {
                TokenKind::Whitespace => continue,
                TokenKind::Eol => self.inner.comments_mut().end_of_line(),
                _ => return token,
            }
        }
    }

    pub fn take_warnings(&mut self) -> Vec<ScanWarning> {
        self.inner.take_warnings()
    }

    pub fn comments_mut(&mut self) -> &mut CommentBuffer {
        self.inner.comments_mut()
    }

    pub fn position(&self) -> &Position {
        self.inner.position()
    }
}
