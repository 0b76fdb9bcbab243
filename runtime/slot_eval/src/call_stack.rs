//! Dispatch call stack.
//!
//! Every invocation of a callable slot or fallback pushes a frame; the depth
//! check is part of `push`. When a callable fails, the innermost frame
//! snapshots the stack into an `ObjBacktrace` on the error.

use slot_ir::{Name, StringInterner};
use slot_object::{
    recursion_limit_exceeded, BacktraceFrame, ClassId, FrameOrigin, ObjBacktrace, ObjError,
};

/// Where the running code came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FrameSource {
    Slot,
    Fallback(ClassId),
}

/// A single live frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CallFrame {
    pub name: Name,
    pub source: FrameSource,
}

/// Live frames of one top-level dispatch.
#[derive(Debug)]
pub(crate) struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), ObjError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Snapshot the stack, most recent call first.
    ///
    /// `class_name` renders the defining class of fallback frames.
    pub fn capture(
        &self,
        interner: &StringInterner,
        class_name: impl Fn(ClassId) -> String,
    ) -> ObjBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|frame| BacktraceFrame {
                name: interner.lookup(frame.name).to_string(),
                origin: match frame.source {
                    FrameSource::Slot => FrameOrigin::Slot,
                    FrameSource::Fallback(class) => FrameOrigin::Fallback {
                        class: class_name(class),
                    },
                },
            })
            .collect();
        ObjBacktrace::new(frames)
    }
}
