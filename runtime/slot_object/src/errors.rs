//! Error types for dispatch and class registration.
//!
//! A miss on a public name is not an error (resolution returns `Ok(None)`).
//! Everything here is a broken contract: an explicit fallback call with no
//! fallback to land on, an unknown class, runaway recursion, or a failure a
//! callable raised itself.
//!
//! `ObjErrorKind` carries the structured data; the `#[cold]` factory
//! functions below are the construction API.

use std::fmt;

/// Result of a dispatch or registry operation.
pub type ObjResult<T> = Result<T, ObjError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ObjErrorKind {
    /// Explicit fallback or ancestor call found no fallback in the chain.
    #[error("no fallback `{name}` in class {class} or its ancestors")]
    MissingFallback { name: String, class: String },

    /// Ancestor dispatch requested while no fallback is running.
    #[error("ancestor call to `{name}` made outside a fallback")]
    SuperOutsideFallback { name: String },

    #[error("unknown class id {id}")]
    UnknownClass { id: u32 },

    #[error("unknown class: {name}")]
    UnknownClassName { name: String },

    #[error("class {name} is already defined")]
    DuplicateClass { name: String },

    /// Slot names may not start with the reserved prefix.
    #[error("slot name `{name}` uses the reserved prefix")]
    ReservedName { name: String },

    /// Dispatch recursion exceeded the configured depth.
    #[error("maximum dispatch depth exceeded ({depth} nested calls)")]
    StackOverflow { depth: usize },

    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Raised by user callables.
    #[error("{message}")]
    Custom { message: String },
}

/// Where a dispatch frame's code came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOrigin {
    /// A callable stored on the instance.
    Slot,
    /// A fallback defined by the named class.
    Fallback { class: String },
}

/// A single frame in a dispatch backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    pub origin: FrameOrigin,
}

impl fmt::Display for BacktraceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            FrameOrigin::Slot => write!(f, "{} (slot)", self.name),
            FrameOrigin::Fallback { class } => write!(f, "{} (fallback in {class})", self.name),
        }
    }
}

/// Snapshot of the dispatch frames active when an error was raised,
/// most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl ObjBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for ObjBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "dispatch backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {frame}")?;
        }
        Ok(())
    }
}

/// Dispatch error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ObjError {
    pub kind: ObjErrorKind,
    /// Dispatch frames at the error site, if captured.
    ///
    /// Filled in by the innermost frame that sees the error; outer frames
    /// leave it alone.
    pub trace: Option<ObjBacktrace>,
}

impl ObjError {
    /// Create a `Custom` error. Intended for user callables.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(ObjErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: ObjErrorKind) -> Self {
        ObjError {
            kind,
            trace: None,
        }
    }

    /// Attach a backtrace unless one is already present.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: ObjBacktrace) -> Self {
        if self.trace.is_none() {
            self.trace = Some(backtrace);
        }
        self
    }
}

impl From<ObjErrorKind> for ObjError {
    fn from(kind: ObjErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

// Factory functions

/// No fallback for an explicit internal or ancestor call.
#[cold]
pub fn missing_fallback(name: &str, class: &str) -> ObjError {
    ObjError::from_kind(ObjErrorKind::MissingFallback {
        name: name.to_string(),
        class: class.to_string(),
    })
}

#[cold]
pub fn super_outside_fallback(name: &str) -> ObjError {
    ObjError::from_kind(ObjErrorKind::SuperOutsideFallback {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_class(id: u32) -> ObjError {
    ObjError::from_kind(ObjErrorKind::UnknownClass { id })
}

#[cold]
pub fn unknown_class_name(name: &str) -> ObjError {
    ObjError::from_kind(ObjErrorKind::UnknownClassName {
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_class(name: &str) -> ObjError {
    ObjError::from_kind(ObjErrorKind::DuplicateClass {
        name: name.to_string(),
    })
}

#[cold]
pub fn reserved_name(name: &str) -> ObjError {
    ObjError::from_kind(ObjErrorKind::ReservedName {
        name: name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> ObjError {
    ObjError::from_kind(ObjErrorKind::StackOverflow { depth })
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> ObjError {
    ObjError::from_kind(ObjErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> ObjError {
    ObjError::from_kind(ObjErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}
