use alloc::string::String;
use core::fmt;

use thiserror::Error;
use vc_yaml_event::Span;

use crate::info::ShapeKind;

// -----------------------------------------------------------------------------
// StructuralKind

/// Which grammar rule a [`Error::Structural`] broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StructuralKind {
    /// An event of the wrong kind at the current position.
    UnexpectedEvent,
    /// The stream ended inside an open container.
    UnexpectedEnd,
    /// More elements than a pre-sized array can hold.
    CapacityExceeded,
    /// A scalar that cannot be converted to the expected primitive.
    InvalidScalar,
    /// A mapping key that is not a member of the record.
    UnknownMember,
    /// An anchor defined twice in one document.
    DuplicateAnchor,
    /// Events left after the root node.
    TrailingEvent,
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEvent => f.pad("unexpected event"),
            Self::UnexpectedEnd => f.pad("unexpected end of events"),
            Self::CapacityExceeded => f.pad("capacity exceeded"),
            Self::InvalidScalar => f.pad("invalid scalar"),
            Self::UnknownMember => f.pad("unknown member"),
            Self::DuplicateAnchor => f.pad("duplicate anchor"),
            Self::TrailingEvent => f.pad("trailing event"),
        }
    }
}

// -----------------------------------------------------------------------------
// Error

/// Errors raised while reading or writing a document.
///
/// All of them abort the current document, serializers never recover
/// locally.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("{kind}: {message} (at {span})")]
    Structural {
        kind: StructuralKind,
        message: String,
        span: Span,
    },

    #[error("alias `*{anchor}` refers to an anchor that is never defined (at {span}, {pending} pending binding(s))")]
    UnresolvedAlias {
        anchor: String,
        span: Span,
        pending: usize,
    },

    #[error("no serializer registered for `{type_path}` ({kind} shape)")]
    NoSerializer {
        type_path: &'static str,
        kind: ShapeKind,
    },

    #[error("type `{0}` has no registered descriptor")]
    UnsupportedShape(String),

    #[error("tag `{tag}` does not resolve to a known type (at {span})")]
    UnknownTag { tag: String, span: Span },

    #[error("object of type `{type_path}` is part of a cycle, enable `emit_alias` to write it")]
    CyclicGraph { type_path: &'static str },

    #[error("nesting deeper than {limit} levels (at {span})")]
    DepthLimit { limit: usize, span: Span },
}

impl Error {
    #[cold]
    pub(crate) fn structural(kind: StructuralKind, span: Span, message: impl Into<String>) -> Self {
        Self::Structural {
            kind,
            message: message.into(),
            span,
        }
    }

    /// Returns the [`StructuralKind`] if this is a structural error.
    pub fn structural_kind(&self) -> Option<StructuralKind> {
        match self {
            Self::Structural { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
