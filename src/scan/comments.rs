//! Comment stripping and comment-to-message association.
//!
//! [`CommentFilter`] replaces every `/* ... */` with a single space and every
//! `// ...` with the newline that ends it. The comment text is split into
//! per-line fragments and kept in a [`CommentBuffer`] so that it can be handed
//! to the next extracted message.
//!
//! # Adjacency
//!
//! A comment only documents a message when it immediately precedes it:
//!
//! ```text
//! // Shown on the main menu      <- attached
//! _text = localize "STR_menu";
//!
//! // Unrelated note
//! _x = 1;                        <- code line, buffer is reset at its end
//! _y = localize "STR_other";     <- nothing attached
//! ```
//!
//! The buffer counts significant newlines and remembers on which of them the
//! last comment ended and the last code token was seen. At every newline the
//! buffer is dropped if code came after the last comment.

use std::sync::Arc;

use super::stream::{LineSplicer, Pushback};
use super::Position;

/// Immutable, shareable list of comment fragments attached to a literal.
///
/// Consecutive literals taken from the same buffer state share one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSnapshot {
    fragments: Arc<[String]>,
}

impl CommentSnapshot {
    pub fn empty() -> Self {
        Self {
            fragments: Arc::from(Vec::new()),
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// True if both snapshots point to the same shared list.
    #[cfg(test)]
    fn shares_with(&self, other: &CommentSnapshot) -> bool {
        Arc::ptr_eq(&self.fragments, &other.fragments)
    }
}

impl Default for CommentSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<String>> for CommentSnapshot {
    fn from(fragments: Vec<String>) -> Self {
        Self {
            fragments: Arc::from(fragments),
        }
    }
}

/// Comments accumulated since the last reset, plus adjacency bookkeeping.
#[derive(Debug, Default)]
pub struct CommentBuffer {
    fragments: Vec<String>,
    snapshot: Option<CommentSnapshot>,
    newline_count: usize,
    last_comment_line: Option<usize>,
    last_non_comment_line: Option<usize>,
}

impl CommentBuffer {
    pub fn add(&mut self, fragment: String) {
        self.fragments.push(fragment);
        self.snapshot = None;
    }

    pub fn reset(&mut self) {
        self.fragments.clear();
        self.snapshot = None;
    }

    /// Freeze the current fragments into a shareable snapshot.
    pub fn snapshot(&mut self) -> CommentSnapshot {
        self.snapshot
            .get_or_insert_with(|| CommentSnapshot::from(self.fragments.clone()))
            .clone()
    }

    /// Record that a comment just ended.
    pub fn mark_comment_end(&mut self) {
        self.last_comment_line = Some(self.newline_count);
    }

    /// Record that a code token was seen on the current line.
    pub fn mark_code(&mut self) {
        self.last_non_comment_line = Some(self.newline_count);
    }

    /// Count a significant newline and drop comments that no longer precede
    /// the next code line.
    pub fn end_of_line(&mut self) {
        self.newline_count += 1;
        if self.last_non_comment_line > self.last_comment_line {
            self.reset();
        }
    }
}

/// Stage 4: comment replacement. Pushback 2.
#[derive(Debug)]
pub struct CommentFilter {
    inner: LineSplicer,
    pushback: Pushback<char, 2>,
    comments: CommentBuffer,
    line_buffer: String,
}

impl CommentFilter {
    pub fn new(inner: LineSplicer) -> Self {
        Self {
            inner,
            pushback: Pushback::new(),
            comments: CommentBuffer::default(),
            line_buffer: String::new(),
        }
    }

    /// Next character without comment recognition. Used inside string
    /// literals, where `//` and `/*` are plain text.
    pub fn next_raw(&mut self) -> Option<char> {
        match self.pushback.pop() {
            Some(c) => Some(c),
            None => self.inner.next(),
        }
    }

    pub fn next(&mut self) -> Option<char> {
        let c = self.next_raw();
        if c != Some('/') {
            return c;
        }
        match self.next_raw() {
            Some('*') => {
                self.skip_block_comment();
                Some(' ')
            }
            Some('/') => {
                self.skip_line_comment();
                Some('\n')
            }
            other => {
                self.inner.unget(other);
                Some('/')
            }
        }
    }

    pub fn unget(&mut self, c: Option<char>) {
        if let Some(c) = c {
            self.pushback.push(c);
        }
    }

    fn skip_block_comment(&mut self) {
        self.line_buffer.clear();
        let mut last_was_star = false;
        while let Some(c) = self.next_raw() {
            if !(self.line_buffer.is_empty() && (c == ' ' || c == '\t')) {
                self.line_buffer.push(c);
            }
            match c {
                '\n' => {
                    self.flush_line(1);
                    last_was_star = false;
                }
                '*' => last_was_star = true,
                '/' if last_was_star => {
                    self.flush_line(2);
                    break;
                }
                _ => last_was_star = false,
            }
        }
        self.comments.mark_comment_end();
    }

    fn skip_line_comment(&mut self) {
        self.line_buffer.clear();
        while let Some(c) = self.next_raw() {
            if c == '\n' {
                break;
            }
            if !(self.line_buffer.is_empty() && (c == ' ' || c == '\t')) {
                self.line_buffer.push(c);
            }
        }
        self.flush_line(0);
        self.comments.mark_comment_end();
    }

    /// Drop `strip` trailing characters (the newline or the `*/`), trim
    /// trailing blanks and save the fragment.
    fn flush_line(&mut self, strip: usize) {
        for _ in 0..strip {
            self.line_buffer.pop();
        }
        let fragment = self.line_buffer.trim_end_matches([' ', '\t']).to_string();
        self.comments.add(fragment);
        self.line_buffer.clear();
    }

    pub fn comments_mut(&mut self) -> &mut CommentBuffer {
        &mut self.comments
    }

    pub fn position(&self) -> &Position {
        self.inner.position()
    }

    pub fn position_mut(&mut self) -> &mut Position {
        self.inner.position_mut()
    }
}
