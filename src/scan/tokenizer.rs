//! Stage 5: characters to preprocessing tokens.

use super::comments::{CommentBuffer, CommentFilter};
use super::stream::Pushback;
use super::token::{LiteralText, Token, TokenKind};
use super::{Position, ScanWarning, WarningKind};

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Leading decimal integer of a preprocessing number, `atol` style.
fn leading_integer(text: &str) -> i64 {
    text.chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d)))
}

#[derive(Debug)]
pub struct Tokenizer {
    chars: CommentFilter,
    pushback: Pushback<Token, 1>,
    warnings: Vec<ScanWarning>,
}

impl Tokenizer {
    pub fn new(chars: CommentFilter) -> Self {
        Self {
            chars,
            pushback: Pushback::new(),
            warnings: Vec::new(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(token) = self.pushback.pop() {
            return token;
        }
        let line = self.chars.position().line;
        let kind = match self.chars.next() {
            None => TokenKind::Eof,
            Some('\n') => TokenKind::Eol,
            Some(' ' | '\t' | '\x0c') => {
                self.skip_blanks();
                TokenKind::Whitespace
            }
            Some(c) if is_identifier_start(c) => TokenKind::Name(self.read_identifier(c)),
            Some('$') => self.read_tagged_literal(),
            Some('.') => {
                let next = self.chars.next();
                self.chars.unget(next);
                match next {
                    Some(d) if d.is_ascii_digit() => self.read_number('.'),
                    _ => TokenKind::Symbol,
                }
            }
            Some(c) if c.is_ascii_digit() => self.read_number(c),
            Some(quote @ ('"' | '\'')) => self.read_string(quote),
            Some('(') => TokenKind::LParen,
            Some(')') => TokenKind::RParen,
            Some('[') => TokenKind::LBracket,
            Some(']') => TokenKind::RBracket,
            Some(',') => TokenKind::Comma,
            Some('#') => TokenKind::Hash,
            Some(':') => TokenKind::Colon,
            Some('\\') => match self.chars.next() {
                Some('n') => TokenKind::ExplicitEol(LiteralText::new(
                    "\n",
                    self.chars.comments_mut().snapshot(),
                )),
                other => {
                    self.chars.unget(other);
                    TokenKind::Symbol
                }
            },
            Some(_) => TokenKind::Symbol,
        };
        Token::new(kind, line)
    }

    /// Push back one token. End of file is never stored.
    pub fn unget(&mut self, token: Token) {
        if !token.is_eof() {
            self.pushback.push(token);
        }
    }

    fn skip_blanks(&mut self) {
        loop {
            match self.chars.next() {
                Some(' ' | '\t' | '\x0c') => continue,
                other => {
                    self.chars.unget(other);
                    return;
                }
            }
        }
    }

    fn read_identifier(&mut self, first: char) -> String {
        let mut name = String::from(first);
        loop {
            match self.chars.next() {
                Some(c) if is_identifier_char(c) => name.push(c),
                other => {
                    self.chars.unget(other);
                    return name;
                }
            }
        }
    }

    fn read_tagged_literal(&mut self) -> TokenKind {
        match self.chars.next() {
            Some(c) if is_identifier_start(c) => {
                let mut name = self.read_identifier(c);
                // `$STR_`, `$Str_` and `$str_` all name the same stringtable key.
                if name.len() > 2 && name[..3].eq_ignore_ascii_case("str") {
                    name.replace_range(..3, "str");
                }
                TokenKind::TaggedLiteral(LiteralText::new(
                    name,
                    self.chars.comments_mut().snapshot(),
                ))
            }
            other => {
                self.chars.unget(other);
                TokenKind::Symbol
            }
        }
    }

    /// Preprocessing numbers are generous: `1.5e+3f`, `0x1F` and `2abc` are
    /// single tokens.
    fn read_number(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        loop {
            match self.chars.next() {
                Some(e @ ('e' | 'E')) => {
                    text.push(e);
                    match self.chars.next() {
                        Some(sign @ ('+' | '-')) => text.push(sign),
                        other => self.chars.unget(other),
                    }
                }
                Some(c) if c.is_ascii_alphanumeric() || c == '.' => text.push(c),
                other => {
                    self.chars.unget(other);
                    break;
                }
            }
        }
        let value = leading_integer(&text);
        TokenKind::Number { text, value }
    }

    /// Strings have no escapes: a doubled quote stands for one quote.
    fn read_string(&mut self, quote: char) -> TokenKind {
        let mut text = String::new();
        loop {
            match self.chars.next_raw() {
                Some(c) if c == quote => {
                    let next = self.chars.next_raw();
                    if next == Some(quote) {
                        text.push(quote);
                        continue;
                    }
                    self.chars.unget(next);
                    break;
                }
                Some('\n') => {
                    let position = self.chars.position();
                    self.warnings.push(ScanWarning::new(
                        Position {
                            file: position.file.clone(),
                            line: position.line - 1,
                        },
                        WarningKind::UnterminatedString,
                    ));
                    self.chars.unget(Some('\n'));
                    break;
                }
                Some(c) => text.push(c),
                None => break,
            }
        }
        TokenKind::StringLiteral(LiteralText::new(
            text,
            self.chars.comments_mut().snapshot(),
        ))
    }

    pub fn take_warnings(&mut self) -> Vec<ScanWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn comments_mut(&mut self) -> &mut CommentBuffer {
        self.chars.comments_mut()
    }

    pub fn position(&self) -> &Position {
        self.chars.position()
    }

    pub fn position_mut(&mut self) -> &mut Position {
        self.chars.position_mut()
    }
}
