use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::{Event, Span};

// -----------------------------------------------------------------------------
// EventReader

/// The pull side of an event stream.
///
/// Implemented by parsers. `peek` must return the same event as the
/// following `next` call.
pub trait EventReader {
    /// Returns the next event without consuming it.
    fn peek(&mut self) -> Option<&Event>;

    /// Consumes and returns the next event.
    fn next(&mut self) -> Option<Event>;

    /// The span right after the last consumed event, used for
    /// "unexpected end of stream" diagnostics.
    fn end_span(&self) -> Span {
        Span::default()
    }
}

/// A reader over an already materialized list of events.
///
/// # Examples
///
/// ```
/// use vc_yaml_event::{Event, EventReader, EventStream};
///
/// let mut stream = EventStream::new(vec![Event::scalar("a"), Event::scalar("b")]);
/// assert_eq!(stream.peek(), Some(&Event::scalar("a")));
/// assert_eq!(stream.next(), Some(Event::scalar("a")));
/// assert_eq!(stream.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct EventStream {
    events: VecDeque<Event>,
    last: Span,
}

impl EventStream {
    #[inline]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into(),
            last: Span::default(),
        }
    }

    /// Number of events not consumed yet.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<Event>> for EventStream {
    #[inline]
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<Event> for EventStream {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
            last: Span::default(),
        }
    }
}

impl EventReader for EventStream {
    #[inline]
    fn peek(&mut self) -> Option<&Event> {
        self.events.front()
    }

    fn next(&mut self) -> Option<Event> {
        let event = self.events.pop_front()?;
        self.last = Span::at(event.span().end);
        Some(event)
    }

    #[inline]
    fn end_span(&self) -> Span {
        self.last
    }
}

// -----------------------------------------------------------------------------
// EventWriter

/// The push side of an event stream, implemented by emitters.
pub trait EventWriter {
    fn emit(&mut self, event: Event);
}

impl EventWriter for Vec<Event> {
    #[inline]
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl<W: EventWriter + ?Sized> EventWriter for &mut W {
    #[inline]
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{EventReader, EventStream, EventWriter};
    use crate::{Event, Mark, Span};
    use alloc::vec::Vec;

    #[test]
    fn end_span_follows_consumed_events() {
        let span = Span::new(Mark::new(0, 0, 0), Mark::new(5, 0, 5));
        let mut stream: EventStream = [Event::scalar("hello").with_span(span)]
            .into_iter()
            .collect();

        assert_eq!(stream.end_span(), Span::default());
        assert!(stream.next().is_some());
        assert_eq!(stream.end_span(), Span::at(Mark::new(5, 0, 5)));
        assert!(stream.peek().is_none());
        assert!(stream.is_empty());
    }

    #[test]
    fn vec_writer_round_trip() {
        let mut out: Vec<Event> = Vec::new();
        {
            let writer = &mut out;
            writer.emit(Event::sequence_start());
            writer.emit(Event::sequence_end());
        }
        let mut stream = EventStream::from(out);
        assert_eq!(stream.next(), Some(Event::sequence_start()));
        assert_eq!(stream.next(), Some(Event::sequence_end()));
        assert_eq!(stream.next(), None);
    }
}
