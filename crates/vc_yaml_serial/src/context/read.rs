use alloc::format;
use alloc::string::String;

use log::{trace, warn};
use vc_yaml_event::{CollectionStart, Event, EventKind, EventReader, Scalar, Span};

use crate::context::alias::AliasTable;
use crate::context::{Alias, BindingSlot, Session, ValueResult};
use crate::error::{Error, Result, StructuralKind};
use crate::info::{ScalarKind, paths};
use crate::registry::TagResolver;
use crate::schema;
use crate::settings::{Settings, UnknownTagPolicy};
use crate::value::{ObjectRef, Value};

// -----------------------------------------------------------------------------
// ReadContext

/// The read side of one document.
///
/// Owns the event reader, the tag cache and the alias table. A context
/// reads exactly one root node, see [`Serializer::deserialize`].
///
/// [`Serializer::deserialize`]: crate::Serializer::deserialize
pub struct ReadContext<'a> {
    session: Session<'a>,
    reader: &'a mut dyn EventReader,
    tags: TagResolver<'a>,
    aliases: AliasTable,
    depth: usize,
}

impl<'a> ReadContext<'a> {
    pub fn new(session: Session<'a>, reader: &'a mut dyn EventReader) -> Self {
        Self {
            session,
            reader,
            tags: TagResolver::new(session.tags),
            aliases: AliasTable::new(),
            depth: 0,
        }
    }

    #[inline]
    pub fn session(&self) -> Session<'a> {
        self.session
    }

    #[inline]
    pub fn settings(&self) -> &'a Settings {
        self.session.settings
    }

    // -------------------------------------------------------------------------
    // Event access

    /// Returns the next event without consuming it.
    #[inline]
    pub fn peek(&mut self) -> Option<&Event> {
        self.reader.peek()
    }

    /// The span of the next event, or the end of the stream.
    pub fn peek_span(&mut self) -> Span {
        match self.reader.peek() {
            Some(event) => event.span(),
            None => self.reader.end_span(),
        }
    }

    fn unexpected_end(&self, expected: &str) -> Error {
        Error::structural(
            StructuralKind::UnexpectedEnd,
            self.reader.end_span(),
            format!("expected {expected}"),
        )
    }

    fn unexpected_event(expected: &str, found: &Event) -> Error {
        Error::structural(
            StructuralKind::UnexpectedEvent,
            found.span(),
            format!("expected {expected}, found {}", found.kind()),
        )
    }

    /// Consumes the next event, whatever it is.
    #[inline]
    pub fn next_event(&mut self) -> Result<Event> {
        self.next_or("an event")
    }

    fn next_or(&mut self, expected: &str) -> Result<Event> {
        self.reader
            .next()
            .ok_or_else(|| self.unexpected_end(expected))
    }

    /// Consumes a sequence start.
    pub fn expect_sequence_start(&mut self) -> Result<CollectionStart> {
        match self.next_or("sequence start")? {
            Event::SequenceStart(start) => Ok(start),
            event => Err(Self::unexpected_event("sequence start", &event)),
        }
    }

    /// Consumes a mapping start.
    pub fn expect_mapping_start(&mut self) -> Result<CollectionStart> {
        match self.next_or("mapping start")? {
            Event::MappingStart(start) => Ok(start),
            event => Err(Self::unexpected_event("mapping start", &event)),
        }
    }

    /// Consumes a scalar.
    pub fn expect_scalar(&mut self) -> Result<Scalar> {
        match self.next_or("scalar")? {
            Event::Scalar(scalar) => Ok(scalar),
            event => Err(Self::unexpected_event("scalar", &event)),
        }
    }

    fn accept(&mut self, kind: EventKind) -> Result<bool> {
        match self.reader.peek() {
            Some(event) if event.kind() == kind => {
                self.reader.next();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(self.unexpected_end(&format!("{kind}"))),
        }
    }

    /// Consumes a sequence end if it is next.
    ///
    /// The end of the stream is an error, the sequence is unterminated.
    pub fn accept_sequence_end(&mut self) -> Result<bool> {
        self.accept(EventKind::SequenceEnd)
    }

    /// Consumes a mapping end if it is next.
    ///
    /// The end of the stream is an error, the mapping is unterminated.
    pub fn accept_mapping_end(&mut self) -> Result<bool> {
        self.accept(EventKind::MappingEnd)
    }

    // -------------------------------------------------------------------------
    // Nodes

    /// Reads one node.
    ///
    /// `expected` is the static type of the slot, `None` (or
    /// [`paths::ANY`]) for untyped slots. A tag on the node overrides it.
    /// `existing` is the current value of the slot, containers of the
    /// same type are read into instead of being replaced.
    pub fn read_value(
        &mut self,
        existing: Option<Value>,
        expected: Option<&'static str>,
    ) -> Result<ValueResult> {
        let (kind, span, tag, anchor, plain) = match self.reader.peek() {
            None => return Err(self.unexpected_end("a node")),
            Some(Event::Alias { .. }) => return self.read_alias(),
            Some(event @ (Event::SequenceEnd { .. } | Event::MappingEnd { .. })) => {
                return Err(Self::unexpected_event("a node", event));
            }
            Some(event) => {
                let plain = match event {
                    Event::Scalar(scalar) if scalar.style.is_plain() => {
                        Some(self.session.schema.resolve_plain(&scalar.value))
                    }
                    Event::Scalar(_) => Some(ScalarKind::Str),
                    _ => None,
                };
                (
                    event.kind(),
                    event.span(),
                    event.tag().map(String::from),
                    event.anchor().map(String::from),
                    plain,
                )
            }
        };

        if self.depth >= self.settings().max_depth {
            return Err(Error::DepthLimit {
                limit: self.settings().max_depth,
                span,
            });
        }

        let value = if tag.is_none() && plain == Some(ScalarKind::Null) {
            self.next_event()?;
            Value::Null
        } else {
            let Session {
                registry, factories, ..
            } = self.session;
            let ty = self.resolve_type(tag.as_deref(), expected, kind, plain, span)?;
            let info = registry.describe(ty)?;
            let serializer = factories.resolve(info)?;
            let existing = existing.filter(|value| {
                value
                    .as_object()
                    .is_some_and(|object| object.type_path() == ty)
            });

            self.depth += 1;
            let value = serializer.read(self, existing, info);
            self.depth -= 1;
            value?
        };

        self.define_anchor(anchor, value.clone(), span)?;
        Ok(ValueResult::Value(value))
    }

    fn read_alias(&mut self) -> Result<ValueResult> {
        let (anchor, span) = match self.next_or("alias")? {
            Event::Alias { anchor, span } => (anchor, span),
            event => return Err(Self::unexpected_event("alias", &event)),
        };
        match self.aliases.get(&anchor) {
            Some(value) => Ok(ValueResult::Value(value.clone())),
            None => {
                trace!("alias `*{anchor}` refers forward");
                Ok(ValueResult::Alias(Alias { anchor, span }))
            }
        }
    }

    fn resolve_type(
        &mut self,
        tag: Option<&str>,
        expected: Option<&'static str>,
        kind: EventKind,
        plain: Option<ScalarKind>,
        span: Span,
    ) -> Result<&'static str> {
        let Session {
            registry, schema, ..
        } = self.session;

        if let Some(tag) = tag {
            if let Some(ty) = self.tags.resolve(schema, registry, tag) {
                return Ok(ty);
            }
            match self.settings().unknown_tag {
                UnknownTagPolicy::Error => {
                    return Err(Error::UnknownTag {
                        tag: tag.into(),
                        span,
                    });
                }
                UnknownTagPolicy::Ignore => {
                    warn!("unknown tag `{tag}` at {span}, reading the node as its expected type");
                }
            }
        }

        Ok(match expected {
            Some(ty) if ty != paths::ANY => ty,
            _ => match (kind, plain) {
                (EventKind::SequenceStart, _) => paths::SEQUENCE,
                (EventKind::MappingStart, _) => paths::MAPPING,
                (_, Some(scalar)) => scalar.type_path(),
                _ => paths::STRING,
            },
        })
    }

    // -------------------------------------------------------------------------
    // Bindings

    /// Defines the anchor of a node a serializer consumed itself, such as
    /// a member name, instead of reading it through [`read_value`].
    ///
    /// Does nothing without an anchor.
    ///
    /// [`read_value`]: Self::read_value
    pub fn define_anchor(
        &mut self,
        anchor: Option<String>,
        value: Value,
        span: Span,
    ) -> Result<()> {
        match anchor {
            Some(anchor) => self.aliases.define(anchor, value, span),
            None => Ok(()),
        }
    }

    /// Installs `alias` into `slot` once its anchor is defined.
    ///
    /// Applied right away if the anchor was defined in the meantime.
    pub fn bind(&mut self, alias: Alias, slot: BindingSlot) {
        self.aliases.bind(alias, slot);
    }

    /// Inserts a pair into `dictionary`, deferring the parts that are aliases.
    ///
    /// A known key with an alias value is inserted right away with a `Null`
    /// placeholder, so the entry keeps its position. A pair with an alias
    /// key is inserted when both parts are known.
    pub fn insert_pair(&mut self, dictionary: &ObjectRef, key: ValueResult, value: ValueResult) {
        match (key, value) {
            (ValueResult::Value(key), ValueResult::Value(value)) => {
                if let Some(entries) = dictionary.borrow_mut().as_dictionary_mut() {
                    entries.insert(key, value);
                }
            }
            (ValueResult::Value(key), ValueResult::Alias(alias)) => {
                if let Some(entries) = dictionary.borrow_mut().as_dictionary_mut() {
                    entries.insert(key.clone(), Value::Null);
                }
                let slot = BindingSlot::DictionaryValue {
                    dictionary: dictionary.clone(),
                    key,
                };
                self.aliases.bind(alias, slot);
            }
            (ValueResult::Alias(key), value) => {
                let (value, value_alias) = match value {
                    ValueResult::Value(value) => (Some(value), None),
                    ValueResult::Alias(alias) => (None, Some(alias)),
                };
                let pair = self.aliases.open_pair(dictionary.clone(), None, value);
                self.aliases.bind(key, BindingSlot::PairKey(pair));
                if let Some(alias) = value_alias {
                    self.aliases.bind(alias, BindingSlot::PairValue(pair));
                }
            }
        }
    }

    /// Number of bindings still waiting for their anchor.
    #[inline]
    pub fn pending_bindings(&self) -> usize {
        self.aliases.pending_len()
    }

    /// Ends the document.
    ///
    /// Fails if a binding is still waiting, or if events are left after
    /// the root node.
    pub fn finish(self, root: ValueResult) -> Result<Value> {
        let root = match root {
            ValueResult::Value(value) => value,
            ValueResult::Alias(Alias { anchor, span }) => {
                return Err(Error::UnresolvedAlias {
                    anchor,
                    span,
                    pending: self.aliases.pending_len() + 1,
                });
            }
        };

        self.aliases.finish()?;

        if let Some(event) = self.reader.peek() {
            return Err(Error::structural(
                StructuralKind::TrailingEvent,
                event.span(),
                format!("{} after the root node", event.kind()),
            ));
        }
        Ok(root)
    }
}

/// Shorthand for scalar checks in serializers.
pub(crate) fn is_plain_null(scalar: &Scalar) -> bool {
    scalar.tag.is_none() && scalar.style.is_plain() && schema::is_null(&scalar.value)
}
