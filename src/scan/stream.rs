//! Character-level normalization: the two lowest layers of the scan pipeline.
//!
//! - [`RawReader`] turns `\r` and `\r\n` into a single `\n`.
//! - [`LineSplicer`] removes backslash-newline pairs and counts logical lines.
//!
//! Every layer owns the layer beneath it and keeps its own bounded pushback
//! buffer. Pushing back more characters than a layer was built for is a bug in
//! the layer above, so [`Pushback`] panics instead of growing.

use super::Position;

/// Fixed-capacity pushback buffer used by every stream layer.
#[derive(Debug)]
pub(crate) struct Pushback<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> Pushback<T, N> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::with_capacity(N),
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        assert!(
            self.items.len() < N,
            "pushback capacity of {N} exceeded; the lexer grammar needs more lookahead than this layer provides"
        );
        self.items.push(item);
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }
}

impl<T, const N: usize> Default for Pushback<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stage 1: raw characters with line endings unified to `\n`.
#[derive(Debug)]
pub struct RawReader {
    chars: Vec<char>,
    offset: usize,
    pushback: Pushback<char, 1>,
}

impl RawReader {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            offset: 0,
            pushback: Pushback::new(),
        }
    }

    pub fn next(&mut self) -> Option<char> {
        if let Some(c) = self.pushback.pop() {
            return Some(c);
        }
        let c = *self.chars.get(self.offset)?;
        self.offset += 1;
        if c == '\r' {
            // CR and CR/LF both end a line.
            if self.chars.get(self.offset) == Some(&'\n') {
                self.offset += 1;
            }
            return Some('\n');
        }
        Some(c)
    }

    /// Push back one character. Pushing back end-of-input is a no-op.
    pub fn unget(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.pushback.push(c);
        }
    }
}

/// Stages 2 and 3: backslash-newline splicing and logical line counting.
///
/// Owns the logical [`Position`] of the scan. The directive layer overrides it
/// through [`LineSplicer::position_mut`] when it sees a line marker.
#[derive(Debug)]
pub struct LineSplicer {
    inner: RawReader,
    position: Position,
    pushback: Pushback<char, 2>,
}

impl LineSplicer {
    pub fn new(inner: RawReader, position: Position) -> Self {
        Self {
            inner,
            position,
            pushback: Pushback::new(),
        }
    }

    pub fn next(&mut self) -> Option<char> {
        if let Some(c) = self.pushback.pop() {
            if c == '\n' {
                self.position.line += 1;
            }
            return Some(c);
        }
        loop {
            match self.inner.next() {
                Some('\n') => {
                    self.position.line += 1;
                    return Some('\n');
                }
                Some('\\') => match self.inner.next() {
                    Some('\n') => {
                        // Spliced: the line advances but no break is emitted.
                        self.position.line += 1;
                    }
                    other => {
                        self.inner.unget(other);
                        return Some('\\');
                    }
                },
                other => return other,
            }
        }
    }

    /// Push back a character. A pushed back newline un-counts its line.
    pub fn unget(&mut self, c: Option<char>) {
        if let Some(c) = c {
            if c == '\n' {
                self.position.line -= 1;
            }
            self.pushback.push(c);
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }
}
