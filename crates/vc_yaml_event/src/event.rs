use alloc::string::String;
use core::fmt;

use crate::Span;

// -----------------------------------------------------------------------------
// Styles

/// Presentation style of a scalar.
///
/// Only `Plain` scalars take part in implicit type resolution,
/// a quoted scalar is always a string unless it carries a tag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    #[inline]
    pub const fn is_plain(self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Presentation style of a sequence or mapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionStyle {
    #[default]
    Any,
    Block,
    Flow,
}

// -----------------------------------------------------------------------------
// Event payloads

/// Payload of [`Event::Scalar`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub value: String,
    pub tag: Option<String>,
    pub anchor: Option<String>,
    pub style: ScalarStyle,
    pub span: Span,
}

/// Payload of [`Event::SequenceStart`] and [`Event::MappingStart`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectionStart {
    pub tag: Option<String>,
    pub anchor: Option<String>,
    pub style: CollectionStyle,
    pub span: Span,
}

// -----------------------------------------------------------------------------
// Event

/// A structural event of a YAML document.
///
/// This is the only interface between the serialization engine and the
/// text level: a parser produces these events, an emitter consumes them.
///
/// # Examples
///
/// ```
/// use vc_yaml_event::{CollectionStyle, Event};
///
/// let events = [
///     Event::sequence_start().with_style(CollectionStyle::Flow),
///     Event::scalar("1").with_anchor("one"),
///     Event::alias("one"),
///     Event::sequence_end(),
/// ];
///
/// assert_eq!(events[1].anchor(), Some("one"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Scalar(Scalar),
    SequenceStart(CollectionStart),
    SequenceEnd { span: Span },
    MappingStart(CollectionStart),
    MappingEnd { span: Span },
    Alias { anchor: String, span: Span },
}

/// The kind of an [`Event`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
    Alias,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.pad("scalar"),
            Self::SequenceStart => f.pad("sequence start"),
            Self::SequenceEnd => f.pad("sequence end"),
            Self::MappingStart => f.pad("mapping start"),
            Self::MappingEnd => f.pad("mapping end"),
            Self::Alias => f.pad("alias"),
        }
    }
}

impl Event {
    /// A plain scalar without tag or anchor.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar {
            value: value.into(),
            ..Scalar::default()
        })
    }

    #[inline]
    pub fn sequence_start() -> Self {
        Self::SequenceStart(CollectionStart::default())
    }

    #[inline]
    pub const fn sequence_end() -> Self {
        Self::SequenceEnd {
            span: Span::at(crate::Mark::new(0, 0, 0)),
        }
    }

    #[inline]
    pub fn mapping_start() -> Self {
        Self::MappingStart(CollectionStart::default())
    }

    #[inline]
    pub const fn mapping_end() -> Self {
        Self::MappingEnd {
            span: Span::at(crate::Mark::new(0, 0, 0)),
        }
    }

    pub fn alias(anchor: impl Into<String>) -> Self {
        Self::Alias {
            anchor: anchor.into(),
            span: Span::default(),
        }
    }

    /// Returns the kind of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Scalar(_) => EventKind::Scalar,
            Self::SequenceStart(_) => EventKind::SequenceStart,
            Self::SequenceEnd { .. } => EventKind::SequenceEnd,
            Self::MappingStart(_) => EventKind::MappingStart,
            Self::MappingEnd { .. } => EventKind::MappingEnd,
            Self::Alias { .. } => EventKind::Alias,
        }
    }

    /// Returns the source span of this event.
    pub const fn span(&self) -> Span {
        match self {
            Self::Scalar(scalar) => scalar.span,
            Self::SequenceStart(start) | Self::MappingStart(start) => start.span,
            Self::SequenceEnd { span } | Self::MappingEnd { span } | Self::Alias { span, .. } => {
                *span
            }
        }
    }

    /// Returns the tag of a node event.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.tag.as_deref(),
            Self::SequenceStart(start) | Self::MappingStart(start) => start.tag.as_deref(),
            _ => None,
        }
    }

    /// Returns the anchor defined by a node event.
    ///
    /// For [`Event::Alias`] this is `None`, the alias only refers to an anchor.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => scalar.anchor.as_deref(),
            Self::SequenceStart(start) | Self::MappingStart(start) => start.anchor.as_deref(),
            _ => None,
        }
    }

    /// Sets the tag of a node event, other events are returned unchanged.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        match &mut self {
            Self::Scalar(scalar) => scalar.tag = Some(tag.into()),
            Self::SequenceStart(start) | Self::MappingStart(start) => start.tag = Some(tag.into()),
            _ => {}
        }
        self
    }

    /// Sets the anchor of a node event, other events are returned unchanged.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        match &mut self {
            Self::Scalar(scalar) => scalar.anchor = Some(anchor.into()),
            Self::SequenceStart(start) | Self::MappingStart(start) => {
                start.anchor = Some(anchor.into());
            }
            _ => {}
        }
        self
    }

    /// Sets the style of a collection start event.
    pub fn with_style(mut self, style: CollectionStyle) -> Self {
        if let Self::SequenceStart(start) | Self::MappingStart(start) = &mut self {
            start.style = style;
        }
        self
    }

    /// Sets the style of a scalar event.
    pub fn with_scalar_style(mut self, style: ScalarStyle) -> Self {
        if let Self::Scalar(scalar) = &mut self {
            scalar.style = style;
        }
        self
    }

    /// Sets the span of any event.
    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Self::Scalar(scalar) => scalar.span = new_span,
            Self::SequenceStart(start) | Self::MappingStart(start) => start.span = new_span,
            Self::SequenceEnd { span } | Self::MappingEnd { span } | Self::Alias { span, .. } => {
                *span = new_span;
            }
        }
        self
    }
}
