use core::fmt;

// -----------------------------------------------------------------------------
// Mark

/// A position in the source text.
///
/// `line` and `column` are zero-based, `Display` prints them one-based
/// the way editors do.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mark {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Mark {
    #[inline]
    pub const fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

// -----------------------------------------------------------------------------
// Span

/// The start and end [`Mark`] of an event.
///
/// Events created in memory (for example by a writer) carry the default,
/// empty span.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Mark,
    pub end: Mark,
}

impl Span {
    #[inline]
    pub const fn new(start: Mark, end: Mark) -> Self {
        Self { start, end }
    }

    /// A zero-width span located at `mark`.
    #[inline]
    pub const fn at(mark: Mark) -> Self {
        Self {
            start: mark,
            end: mark,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            fmt::Display::fmt(&self.start, f)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Mark, Span};
    use alloc::string::ToString;

    #[test]
    fn display_is_one_based() {
        let mark = Mark::new(12, 2, 4);
        assert_eq!(mark.to_string(), "line 3, column 5");

        let span = Span::new(Mark::new(0, 0, 0), Mark::new(3, 0, 3));
        assert_eq!(span.to_string(), "line 1, column 1 to line 1, column 4");
        assert_eq!(Span::at(mark).to_string(), "line 3, column 5");
    }
}
