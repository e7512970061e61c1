//! Stage 10: recursive walk over balanced groups, binding keyword calls.
//!
//! Only a little of the grammar matters here:
//!
//! ```text
//! keyword "msgid"
//! keyword ( ... msgid ... )
//! keyword [ ... msgid ... ]
//! ```
//!
//! Parentheses and square brackets are treated alike. Recursion handles
//! arguments that are themselves calls.

use super::arglist::{ArgBinder, PendingKeyword};
use super::classify::{Classifier, HighToken};
use super::{ExtractedMessage, MessageSink};
use crate::flags::{ContextIter, FlagContext, FlagTable};

#[derive(Debug)]
enum State<'k> {
    Seeking,
    /// A keyword was just seen; a following group or literal is its call.
    AfterKeyword(PendingKeyword<'k>),
}

pub struct Extractor<'k> {
    tokens: Classifier<'k>,
    flags: &'k FlagTable,
    extract_all: bool,
}

impl<'k> Extractor<'k> {
    pub fn new(tokens: Classifier<'k>, flags: &'k FlagTable, extract_all: bool) -> Self {
        Self {
            tokens,
            flags,
            extract_all,
        }
    }

    /// Extract until EOF, restarting after every unbalanced closer.
    pub fn run(mut self, sink: &mut dyn MessageSink) {
        while !self.extract_parenthesized(
            FlagContext::NULL,
            ContextIter::Null,
            ArgBinder::new(None),
            sink,
        ) {
            tracing::trace!("unbalanced closing bracket, restarting");
        }
    }

    fn next_token(&mut self, sink: &mut dyn MessageSink) -> HighToken<'k> {
        let token = self.tokens.next_token();
        for warning in self.tokens.take_warnings() {
            sink.warn(warning);
        }
        token
    }

    /// Extract messages up to the matching closer. Returns true on EOF.
    pub fn extract_parenthesized(
        &mut self,
        outer_context: FlagContext,
        mut context_iter: ContextIter<'k>,
        mut binder: ArgBinder<'k>,
        sink: &mut dyn MessageSink,
    ) -> bool {
        let mut arg = 1;
        let mut state = State::Seeking;
        let mut next_context_iter = ContextIter::Passthrough;
        let mut inner_context = FlagContext::inherited(outer_context, context_iter.advance());

        loop {
            match self.next_token(sink) {
                HighToken::Keyword {
                    name,
                    shapes,
                    position,
                } => {
                    tracing::trace!(keyword = %name, line = position.line, "keyword");
                    next_context_iter = self.flags.iter(&name);
                    state = State::AfterKeyword(PendingKeyword { name, shapes });
                }
                HighToken::Symbol { name } => {
                    next_context_iter = self.flags.iter(&name);
                    state = State::Seeking;
                }
                HighToken::LParen | HighToken::LBracket => {
                    let pending = match &state {
                        State::AfterKeyword(keyword) => Some(keyword),
                        State::Seeking => None,
                    };
                    let inner_binder = ArgBinder::new(pending);
                    let iter = std::mem::replace(&mut next_context_iter, ContextIter::Null);
                    if self.extract_parenthesized(inner_context, iter, inner_binder, sink) {
                        binder.finish(arg, sink);
                        return true;
                    }
                    state = State::Seeking;
                }
                HighToken::RParen | HighToken::RBracket => {
                    binder.finish(arg, sink);
                    return false;
                }
                HighToken::Comma => {
                    arg += 1;
                    inner_context = FlagContext::inherited(outer_context, context_iter.advance());
                    next_context_iter = ContextIter::Passthrough;
                    state = State::Seeking;
                }
                HighToken::Colon | HighToken::Other => {
                    next_context_iter = ContextIter::Null;
                    state = State::Seeking;
                }
                HighToken::StringLiteral(literal) => {
                    if self.extract_all {
                        sink.remember(ExtractedMessage::from_literal(literal, inner_context));
                    } else if let State::AfterKeyword(keyword) = &state {
                        // A literal right after a keyword is a one-argument call.
                        let mut call = ArgBinder::new(Some(keyword));
                        call.remember(1, literal, inner_context);
                        call.finish(1, sink);
                    } else {
                        binder.remember(arg, literal, inner_context);
                    }
                    next_context_iter = ContextIter::Null;
                    state = State::Seeking;
                }
                HighToken::TaggedLiteral(literal) => {
                    sink.remember(ExtractedMessage::from_literal(literal, inner_context));
                    next_context_iter = ContextIter::Null;
                    state = State::Seeking;
                }
                HighToken::Eof => {
                    binder.finish(arg, sink);
                    return true;
                }
            }
        }
    }
}
