//! Stage 6: preprocessor directives.
//!
//! Only line markers are acted upon (`#line 12 "file.sqf"` or the bare
//! `# 12 "file.sqf"` emitted by cpp). `#define` bodies are scanned as ordinary
//! input so that strings inside macros are still found; macros are never
//! expanded. Every other directive is dropped.

use std::sync::Arc;

use tracing::debug;

use super::comments::CommentBuffer;
use super::stream::Pushback;
use super::token::{Token, TokenKind};
use super::tokenizer::Tokenizer;
use super::{Position, ScanWarning};

#[derive(Debug)]
pub struct DirectiveFilter {
    tokenizer: Tokenizer,
    /// False at the start of a line, true once a token has been seen on it.
    mid_line: bool,
    pushback: Pushback<Token, 2>,
}

impl DirectiveFilter {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            mid_line: false,
            pushback: Pushback::new(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pushback.pop() {
            return token;
        }
        loop {
            let token = self.next_with_leading_hash();
            if !matches!(token.kind, TokenKind::Hash) {
                return token;
            }

            let mut directive = Vec::new();
            loop {
                let token = self.next_with_leading_hash();
                match token.kind {
                    TokenKind::Eol | TokenKind::Eof => break,
                    TokenKind::Whitespace => continue,
                    TokenKind::Name(ref name) if directive.is_empty() && name == "define" => {
                        return token;
                    }
                    _ => directive.push(token),
                }
            }
            self.apply_line_marker(&directive);
            // A directive line separates a comment from the code below it.
            self.tokenizer.comments_mut().reset();
        }
    }

    pub fn unget(&mut self, token: Token) {
        if !token.is_eof() {
            self.pushback.push(token);
        }
    }

    /// Keep a `#` only when it starts a line, dropping the whitespace before
    /// it. A `#` in the middle of a line is a plain symbol.
    fn next_with_leading_hash(&mut self) -> Token {
        let mut token = self.tokenizer.next_token();
        match token.kind {
            TokenKind::Eol | TokenKind::Eof => self.mid_line = false,
            TokenKind::Hash if self.mid_line => token.kind = TokenKind::Symbol,
            _ if self.mid_line => {}
            _ => {
                if matches!(token.kind, TokenKind::Whitespace) {
                    let next = self.tokenizer.next_token();
                    if matches!(next.kind, TokenKind::Hash) {
                        token = next;
                    } else {
                        self.tokenizer.unget(next);
                    }
                }
                self.mid_line = true;
            }
        }
        token
    }

    fn apply_line_marker(&mut self, directive: &[Token]) {
        let (value, file) = match directive {
            [
                Token {
                    kind: TokenKind::Name(name),
                    ..
                },
                Token {
                    kind: TokenKind::Number { value, .. },
                    ..
                },
                Token {
                    kind: TokenKind::StringLiteral(file),
                    ..
                },
                ..,
            ] if name == "line" => (*value, file),
            [
                Token {
                    kind: TokenKind::Number { value, .. },
                    ..
                },
                Token {
                    kind: TokenKind::StringLiteral(file),
                    ..
                },
                ..,
            ] => (*value, file),
            _ => return,
        };
        let line = usize::try_from(value).unwrap_or(0);
        debug!(file = %file.text, line, "line marker");
        *self.tokenizer.position_mut() = Position {
            file: Arc::from(file.text.as_str()),
            line,
        };
    }

    pub fn take_warnings(&mut self) -> Vec<ScanWarning> {
        self.tokenizer.take_warnings()
    }

    pub fn comments_mut(&mut self) -> &mut CommentBuffer {
        self.tokenizer.comments_mut()
    }

    pub fn position(&self) -> &Position {
        self.tokenizer.position()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::scan::comments::CommentFilter;
    use crate::scan::stream::{LineSplicer, RawReader};

    fn filter(source: &str) -> DirectiveFilter {
        DirectiveFilter::new(Tokenizer::new(CommentFilter::new(LineSplicer::new(
            RawReader::new(source),
            Position::new("test.sqf"),
        ))))
    }

    /// Names with the logical position at which each was returned.
    fn names(source: &str) -> Vec<(String, String, usize)> {
        let mut f = filter(source);
        let mut out = Vec::new();
        loop {
            let token = f.next_token();
            match token.kind {
                TokenKind::Eof => return out,
                TokenKind::Name(name) => {
                    out.push((name, f.position().file.to_string(), token.line))
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_line_directive_sets_position() {
        let found = names("a\n#line 10 \"other.sqf\"\nb\nc");
        assert_eq!(
            found,
            vec![
                ("a".to_string(), "test.sqf".to_string(), 1),
                ("b".to_string(), "other.sqf".to_string(), 10),
                ("c".to_string(), "other.sqf".to_string(), 11),
            ]
        );
    }

    #[test]
    fn test_bare_line_marker() {
        let found = names("  # 42 \"gen.hpp\" 2\nx");
        assert_eq!(found, vec![("x".to_string(), "gen.hpp".to_string(), 42)]);
    }

    #[test]
    fn test_other_directives_are_dropped() {
        let found = names("#include \"x.hpp\"\n#ifdef FOO\ny\n#endif\n");
        assert_eq!(found, vec![("y".to_string(), "test.sqf".to_string(), 3)]);
    }

    #[test]
    fn test_define_body_is_scanned() {
        let found = names("#define MSG localize");
        let found: Vec<_> = found.into_iter().map(|(name, ..)| name).collect();
        assert_eq!(found, vec!["define", "MSG", "localize"]);
    }

    #[test]
    fn test_hash_mid_line_is_symbol() {
        let mut f = filter("a # b");
        let kinds: Vec<_> = std::iter::from_fn(|| {
            let token = f.next_token();
            (!token.is_eof()).then_some(token.kind)
        })
        .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name("a".into()),
                TokenKind::Whitespace,
                TokenKind::Symbol,
                TokenKind::Whitespace,
                TokenKind::Name("b".into()),
            ]
        );
    }

    #[test]
    fn test_directive_resets_comments() {
        let mut f = filter("// doc\n#pragma x\n");
        while !f.next_token().is_eof() {}
        assert!(f.comments_mut().snapshot().is_empty());
    }
}
