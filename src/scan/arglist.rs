//! Binding of call arguments to the message roles of a keyword.

use super::classify::Literal;
use super::{ExtractedMessage, MessageSink, ScanWarning, WarningKind};
use crate::flags::FlagContext;
use crate::keywords::CallShape;

/// A keyword seen right before a call, with its alternative shapes.
#[derive(Debug, Clone)]
pub struct PendingKeyword<'k> {
    pub name: String,
    pub shapes: &'k [CallShape],
}

/// Arguments collected so far for one shape alternative.
#[derive(Debug)]
struct PartialCall<'k> {
    shape: &'k CallShape,
    msgctxt: Option<Literal>,
    msgid: Option<(Literal, FlagContext)>,
    plural: Option<Literal>,
}

impl<'k> PartialCall<'k> {
    fn new(shape: &'k CallShape) -> Self {
        Self {
            shape,
            msgctxt: None,
            msgid: None,
            plural: None,
        }
    }

    fn remember(&mut self, arg: usize, literal: &Literal, context: FlagContext) {
        if self.shape.context == Some(arg) && self.msgctxt.is_none() {
            self.msgctxt = Some(literal.clone());
        }
        if self.shape.singular == arg && self.msgid.is_none() {
            self.msgid = Some((literal.clone(), context));
        }
        if self.shape.plural == Some(arg) && self.plural.is_none() {
            self.plural = Some(literal.clone());
        }
    }

    fn is_complete(&self, arg_count: usize) -> bool {
        self.msgid.is_some()
            && (self.shape.context.is_none() || self.msgctxt.is_some())
            && (self.shape.plural.is_none() || self.plural.is_some())
            && self.shape.total.is_none_or(|total| total == arg_count)
    }

    fn roles(&self) -> usize {
        usize::from(self.msgctxt.is_some())
            + usize::from(self.msgid.is_some())
            + usize::from(self.plural.is_some())
    }

    fn same_message(&self, other: &PartialCall<'_>) -> bool {
        fn text(literal: Option<&Literal>) -> Option<&str> {
            literal.map(|lit| lit.text.as_str())
        }
        text(self.msgctxt.as_ref()) == text(other.msgctxt.as_ref())
            && text(self.msgid.as_ref().map(|(lit, _)| lit))
                == text(other.msgid.as_ref().map(|(lit, _)| lit))
            && text(self.plural.as_ref()) == text(other.plural.as_ref())
    }

    fn into_message(self) -> Option<ExtractedMessage> {
        let (msgid, context) = self.msgid?;
        Some(ExtractedMessage {
            msgctxt: self.msgctxt.map(|lit| lit.text),
            msgid: msgid.text,
            plural: self.plural.map(|lit| lit.text),
            position: msgid.position,
            comment: msgid.comment,
            extracted_comments: self.shape.comments.clone(),
            context,
        })
    }
}

/// Collects the literal arguments of one call and emits the message of the
/// best matching shape when the call ends.
#[derive(Debug, Default)]
pub struct ArgBinder<'k> {
    keyword: String,
    alternatives: Vec<PartialCall<'k>>,
}

impl<'k> ArgBinder<'k> {
    /// A binder for a call to `keyword`, or one that binds nothing.
    pub fn new(keyword: Option<&PendingKeyword<'k>>) -> Self {
        match keyword {
            Some(keyword) => Self {
                keyword: keyword.name.clone(),
                alternatives: keyword.shapes.iter().map(PartialCall::new).collect(),
            },
            None => Self::default(),
        }
    }

    pub fn remember(&mut self, arg: usize, literal: Literal, context: FlagContext) {
        for call in &mut self.alternatives {
            call.remember(arg, &literal, context);
        }
    }

    /// End the call after `arg_count` arguments.
    pub fn finish(self, arg_count: usize, sink: &mut dyn MessageSink) {
        let mut best: Option<PartialCall<'k>> = None;
        let mut ambiguous = false;
        for call in self.alternatives {
            if !call.is_complete(arg_count) {
                continue;
            }
            let replace = match &best {
                None => true,
                Some(current) => {
                    if call.roles() == current.roles() && !call.same_message(current) {
                        ambiguous = true;
                    }
                    call.roles() > current.roles()
                }
            };
            if replace {
                ambiguous = false;
                best = Some(call);
            }
        }

        let Some(message) = best.and_then(PartialCall::into_message) else {
            return;
        };
        if ambiguous {
            sink.warn(ScanWarning::new(
                message.position.clone(),
                WarningKind::AmbiguousKeyword {
                    keyword: self.keyword,
                },
            ));
        }
        tracing::trace!(msgid = %message.msgid, "bound call arguments");
        sink.remember(message);
    }
}
