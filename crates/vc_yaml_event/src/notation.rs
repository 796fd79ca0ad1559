//! The yaml-test-suite event notation.
//!
//! One event per line:
//!
//! ```text
//! +MAP {} &anchor <!tag>
//! =VAL :plain
//! =VAL "double quoted
//! =ALI *anchor
//! -MAP
//! ```
//!
//! `+STR`, `-STR`, `+DOC` and `-DOC` lines are accepted and skipped, the
//! engine works on a single document. Parsed events carry a span whose line
//! is the line of the notation text, so diagnostics point back into fixtures.
//!
//! # Examples
//!
//! ```
//! use vc_yaml_event::{Event, notation};
//!
//! let events = notation::parse("
//!     +SEQ []
//!     =VAL &a :1
//!     =ALI *a
//!     -SEQ
//! ").unwrap();
//!
//! assert_eq!(events.len(), 4);
//! assert_eq!(events[1].anchor(), Some("a"));
//! assert_eq!(notation::render(&events), "+SEQ []\n=VAL &a :1\n=ALI *a\n-SEQ\n");
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write};

use thiserror::Error;

use crate::{CollectionStart, CollectionStyle, Event, Mark, Scalar, ScalarStyle, Span};

// -----------------------------------------------------------------------------
// Error

/// A malformed notation line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("event notation line {line}: {message}")]
pub struct NotationError {
    pub line: usize,
    pub message: String,
}

// -----------------------------------------------------------------------------
// Render

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => {
                f.write_str("=VAL")?;
                write_props(f, scalar.anchor.as_deref(), scalar.tag.as_deref())?;
                let indicator = match scalar.style {
                    ScalarStyle::Plain => ':',
                    ScalarStyle::SingleQuoted => '\'',
                    ScalarStyle::DoubleQuoted => '"',
                    ScalarStyle::Literal => '|',
                    ScalarStyle::Folded => '>',
                };
                f.write_char(' ')?;
                f.write_char(indicator)?;
                for c in scalar.value.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        c => f.write_char(c)?,
                    }
                }
                Ok(())
            }
            Self::SequenceStart(start) => {
                f.write_str("+SEQ")?;
                if start.style == CollectionStyle::Flow {
                    f.write_str(" []")?;
                }
                write_props(f, start.anchor.as_deref(), start.tag.as_deref())
            }
            Self::MappingStart(start) => {
                f.write_str("+MAP")?;
                if start.style == CollectionStyle::Flow {
                    f.write_str(" {}")?;
                }
                write_props(f, start.anchor.as_deref(), start.tag.as_deref())
            }
            Self::SequenceEnd { .. } => f.write_str("-SEQ"),
            Self::MappingEnd { .. } => f.write_str("-MAP"),
            Self::Alias { anchor, .. } => write!(f, "=ALI *{anchor}"),
        }
    }
}

fn write_props(f: &mut fmt::Formatter<'_>, anchor: Option<&str>, tag: Option<&str>) -> fmt::Result {
    if let Some(anchor) = anchor {
        write!(f, " &{anchor}")?;
    }
    if let Some(tag) = tag {
        write!(f, " <{tag}>")?;
    }
    Ok(())
}

/// Renders events one per line, each line terminated by `\n`.
pub fn render(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        // Writing into a `String` cannot fail.
        let _ = writeln!(out, "{event}");
    }
    out
}

// -----------------------------------------------------------------------------
// Parse

/// Parses notation text into events.
///
/// Leading whitespace on every line is ignored, as are empty lines.
pub fn parse(text: &str) -> Result<Vec<Event>, NotationError> {
    let mut events = Vec::new();
    let mut index = 0;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim_start();
        let column = raw.len() - line.len();
        let line = line.trim_end_matches('\r');
        let start = Mark::new(index + column, line_no, column);
        let span = Span::new(start, Mark::new(index + raw.len(), line_no, raw.len()));
        index += raw.len() + 1;

        if line.is_empty() {
            continue;
        }

        let error = |message: &str| NotationError {
            line: line_no + 1,
            message: message.to_string(),
        };

        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        let event = match head {
            "+STR" | "-STR" | "+DOC" | "-DOC" => continue,
            "+SEQ" => Event::SequenceStart(parse_start(rest, "[]", span).map_err(error)?),
            "+MAP" => Event::MappingStart(parse_start(rest, "{}", span).map_err(error)?),
            "-SEQ" => Event::SequenceEnd { span },
            "-MAP" => Event::MappingEnd { span },
            "=ALI" => {
                let anchor = rest
                    .trim()
                    .strip_prefix('*')
                    .filter(|anchor| !anchor.is_empty())
                    .ok_or_else(|| error("alias requires `*name`"))?;
                Event::Alias {
                    anchor: anchor.to_string(),
                    span,
                }
            }
            "=VAL" => Event::Scalar(parse_scalar(rest, span).map_err(error)?),
            _ => return Err(error("unknown event")),
        };
        events.push(event);
    }

    Ok(events)
}

fn parse_start(rest: &str, flow: &str, span: Span) -> Result<CollectionStart, &'static str> {
    let mut start = CollectionStart {
        span,
        ..CollectionStart::default()
    };
    for token in rest.split_whitespace() {
        if token == flow {
            start.style = CollectionStyle::Flow;
        } else if let Some(anchor) = token.strip_prefix('&') {
            start.anchor = Some(anchor.to_string());
        } else if let Some(tag) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            start.tag = Some(tag.to_string());
        } else {
            return Err("unexpected collection property");
        }
    }
    Ok(start)
}

fn parse_scalar(mut rest: &str, span: Span) -> Result<Scalar, &'static str> {
    let mut scalar = Scalar {
        span,
        ..Scalar::default()
    };

    // Properties come first, the value indicator starts the rest of the line.
    loop {
        if let Some(after) = rest.strip_prefix('&') {
            let (anchor, tail) = after.split_once(' ').ok_or("scalar value is missing")?;
            scalar.anchor = Some(anchor.to_string());
            rest = tail;
        } else if let Some(after) = rest.strip_prefix('<') {
            let (tag, tail) = after.split_once("> ").ok_or("scalar value is missing")?;
            scalar.tag = Some(tag.to_string());
            rest = tail;
        } else {
            break;
        }
    }

    let mut chars = rest.chars();
    scalar.style = match chars.next() {
        Some(':') => ScalarStyle::Plain,
        Some('\'') => ScalarStyle::SingleQuoted,
        Some('"') => ScalarStyle::DoubleQuoted,
        Some('|') => ScalarStyle::Literal,
        Some('>') => ScalarStyle::Folded,
        _ => return Err("scalar value requires a style indicator"),
    };

    let mut value = String::with_capacity(rest.len());
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => value.push('\\'),
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            _ => return Err("invalid escape sequence"),
        }
    }
    scalar.value = value;
    Ok(scalar)
}

#[cfg(test)]
mod tests {
    use super::{parse, render};
    use crate::{CollectionStyle, Event, ScalarStyle};

    #[test]
    fn parse_properties() {
        let events = parse(
            "
            +STR
            +DOC
            +MAP {} &m <!game::Player>
            =VAL :name
            =VAL &n <tag:yaml.org,2002:str> \"Ada\\nLovelace
            -MAP
            -DOC
            -STR
            ",
        )
        .unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].tag(), Some("!game::Player"));
        assert_eq!(events[0].anchor(), Some("m"));
        let Event::MappingStart(start) = &events[0] else {
            panic!("expected mapping start");
        };
        assert_eq!(start.style, CollectionStyle::Flow);

        let Event::Scalar(scalar) = &events[2] else {
            panic!("expected scalar");
        };
        assert_eq!(scalar.value, "Ada\nLovelace");
        assert_eq!(scalar.style, ScalarStyle::DoubleQuoted);
        assert_eq!(scalar.anchor.as_deref(), Some("n"));
        assert_eq!(scalar.tag.as_deref(), Some("tag:yaml.org,2002:str"));

        // Spans point at the fixture line.
        assert_eq!(events[1].span().start.line, 4);
    }

    #[test]
    fn render_then_parse() {
        let events = [
            Event::sequence_start().with_style(CollectionStyle::Flow),
            Event::scalar("a b").with_anchor("x"),
            Event::scalar("").with_scalar_style(ScalarStyle::SingleQuoted),
            Event::alias("x"),
            Event::sequence_end(),
        ];
        let text = render(&events);
        assert_eq!(text, "+SEQ []\n=VAL &x :a b\n=VAL '\n=ALI *x\n-SEQ\n");

        let parsed = parse(&text).unwrap();
        assert_eq!(render(&parsed), text);
    }

    #[test]
    fn reject_malformed_lines() {
        assert_eq!(parse("=ALI x").unwrap_err().line, 1);
        assert!(parse("+SEQ\n=VAL 1").is_err());
        assert!(parse("\n\n+FOO").unwrap_err().message.contains("unknown"));
    }
}
