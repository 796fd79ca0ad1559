use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::trace;
use vc_yaml_event::Span;

use crate::error::{Error, Result, StructuralKind};
use crate::hash::{Entry, FixedHashState, HashMap};
use crate::value::{ObjectRef, Value};

// -----------------------------------------------------------------------------
// ValueResult

/// A reference to an anchor that was not defined yet when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub anchor: String,
    pub span: Span,
}

/// The result of reading one node.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueResult {
    Value(Value),
    /// The node was an alias to an anchor defined later in the document,
    /// the value must be bound with [`ReadContext::bind`].
    ///
    /// [`ReadContext::bind`]: crate::context::ReadContext::bind
    Alias(Alias),
}

impl ValueResult {
    /// Returns the value, if it is known.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Alias(_) => None,
        }
    }

    #[inline]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Alias(_) => None,
        }
    }

    #[inline]
    pub const fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(_))
    }
}

impl From<Value> for ValueResult {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

// -----------------------------------------------------------------------------
// BindingSlot

/// Index of a pair waiting in the pending pair arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairId(usize);

/// Where a deferred value goes once its anchor is defined.
#[derive(Debug, Clone)]
pub enum BindingSlot {
    /// Positional write into a [`FixedArray`](crate::value::FixedArray).
    ArrayIndex { array: ObjectRef, index: usize },
    /// Write into a member field of a record or mixed dictionary.
    RecordField { object: ObjectRef, index: usize },
    /// Replace the value of an already inserted key.
    DictionaryValue { dictionary: ObjectRef, key: Value },
    /// The key of a pair that is inserted once both parts are known.
    PairKey(PairId),
    /// The value of a pair that is inserted once both parts are known.
    PairValue(PairId),
}

#[derive(Debug)]
struct PendingBinding {
    slot: BindingSlot,
    span: Span,
    order: usize,
}

#[derive(Debug)]
struct PendingPair {
    dictionary: ObjectRef,
    key: Option<Value>,
    value: Option<Value>,
}

// -----------------------------------------------------------------------------
// AliasTable

/// Anchors defined so far and bindings waiting for anchors.
pub(crate) struct AliasTable {
    anchors: HashMap<String, Value>,
    pending: HashMap<String, Vec<PendingBinding>>,
    pairs: Vec<Option<PendingPair>>,
    registered: usize,
}

impl AliasTable {
    pub const fn new() -> Self {
        Self {
            anchors: HashMap::with_hasher(FixedHashState),
            pending: HashMap::with_hasher(FixedHashState),
            pairs: Vec::new(),
            registered: 0,
        }
    }

    #[inline]
    pub fn get(&self, anchor: &str) -> Option<&Value> {
        self.anchors.get(anchor)
    }

    /// Number of bindings still waiting.
    pub fn pending_len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Defines `anchor` and applies every binding waiting for it, oldest first.
    pub fn define(&mut self, anchor: String, value: Value, span: Span) -> Result<()> {
        let bindings = self.pending.remove(&anchor);
        match self.anchors.entry(anchor) {
            Entry::Occupied(entry) => {
                return Err(Error::structural(
                    StructuralKind::DuplicateAnchor,
                    span,
                    format!("anchor `&{}` is already defined", entry.key()),
                ));
            }
            Entry::Vacant(entry) => {
                trace!("anchor `&{}` defined as {:?}", entry.key(), value.type_path());
                entry.insert(value.clone());
            }
        }

        for binding in bindings.into_iter().flatten() {
            self.apply(binding.slot, value.clone());
        }
        Ok(())
    }

    /// Registers a binding, or applies it right away if the anchor is known.
    pub fn bind(&mut self, alias: Alias, slot: BindingSlot) {
        if let Some(value) = self.anchors.get(&alias.anchor) {
            let value = value.clone();
            self.apply(slot, value);
            return;
        }

        trace!("binding {slot:?} waits for anchor `&{}`", alias.anchor);
        let order = self.registered;
        self.registered += 1;
        self.pending.entry(alias.anchor).or_default().push(PendingBinding {
            slot,
            span: alias.span,
            order,
        });
    }

    /// Starts a pair with at least one unknown part, returns its id.
    pub fn open_pair(
        &mut self,
        dictionary: ObjectRef,
        key: Option<Value>,
        value: Option<Value>,
    ) -> PairId {
        let id = PairId(self.pairs.len());
        self.pairs.push(Some(PendingPair {
            dictionary,
            key,
            value,
        }));
        id
    }

    fn apply(&mut self, slot: BindingSlot, value: Value) {
        trace!("applying binding {slot:?}");
        match slot {
            BindingSlot::ArrayIndex { array, index } => {
                if let Some(items) = array.borrow_mut().as_array_mut() {
                    items.set(index, value);
                }
            }
            BindingSlot::RecordField { object, index } => {
                if let Some(field) = object
                    .borrow_mut()
                    .fields_mut()
                    .and_then(|fields| fields.get_mut(index))
                {
                    *field = value;
                }
            }
            BindingSlot::DictionaryValue { dictionary, key } => {
                if let Some(entries) = dictionary.borrow_mut().as_dictionary_mut() {
                    entries.insert(key, value);
                }
            }
            BindingSlot::PairKey(PairId(id)) => self.fill_pair(id, Some(value), None),
            BindingSlot::PairValue(PairId(id)) => self.fill_pair(id, None, Some(value)),
        }
    }

    fn fill_pair(&mut self, id: usize, key: Option<Value>, value: Option<Value>) {
        let Some(Some(pair)) = self.pairs.get_mut(id) else {
            return;
        };
        if key.is_some() {
            pair.key = key;
        }
        if value.is_some() {
            pair.value = value;
        }
        if pair.key.is_none() || pair.value.is_none() {
            return;
        }

        let Some(PendingPair {
            dictionary,
            key: Some(key),
            value: Some(value),
        }) = self.pairs[id].take()
        else {
            return;
        };
        if let Some(entries) = dictionary.borrow_mut().as_dictionary_mut() {
            entries.insert(key, value);
        }
    }

    /// Fails with [`Error::UnresolvedAlias`] if any binding is still waiting.
    ///
    /// The reported anchor is the one of the oldest waiting binding.
    pub fn finish(&self) -> Result<()> {
        let oldest = self
            .pending
            .iter()
            .flat_map(|(anchor, bindings)| bindings.iter().map(move |b| (anchor, b)))
            .min_by_key(|(_, binding)| binding.order);

        match oldest {
            Some((anchor, binding)) => Err(Error::UnresolvedAlias {
                anchor: anchor.clone(),
                span: binding.span,
                pending: self.pending_len(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Alias, AliasTable, BindingSlot};
    use crate::error::{Error, StructuralKind};
    use crate::value::{Dictionary, FixedArray, Object, ObjectRef, Value};
    use alloc::string::String;
    use alloc::vec;
    use vc_yaml_event::Span;

    fn alias(anchor: &str) -> Alias {
        Alias {
            anchor: anchor.into(),
            span: Span::default(),
        }
    }

    #[test]
    fn bindings_apply_in_registration_order() {
        let array = ObjectRef::new(Object::array("[i64]", FixedArray::with_len(2)));
        let mut table = AliasTable::new();

        table.bind(alias("a"), BindingSlot::ArrayIndex { array: array.clone(), index: 1 });
        table.bind(alias("a"), BindingSlot::ArrayIndex { array: array.clone(), index: 0 });
        assert_eq!(table.pending_len(), 2);

        table.define(String::from("a"), Value::from(7), Span::default()).unwrap();
        assert_eq!(table.pending_len(), 0);
        assert!(table.finish().is_ok());

        let object = array.borrow();
        assert_eq!(object.as_array().unwrap().as_slice(), &[Value::from(7), Value::from(7)]);
    }

    #[test]
    fn known_anchor_binds_immediately() {
        let record = ObjectRef::new(Object::record("game::Box", vec![Value::Null].into()));
        let mut table = AliasTable::new();
        table.define(String::from("a"), Value::from("x"), Span::default()).unwrap();

        table.bind(alias("a"), BindingSlot::RecordField { object: record.clone(), index: 0 });
        assert_eq!(table.pending_len(), 0);
        assert_eq!(record.borrow().fields().unwrap().get(0), Some(&Value::from("x")));
    }

    #[test]
    fn pairs_wait_for_both_parts() {
        let dictionary = ObjectRef::new(Object::dictionary("Mapping", Dictionary::new()));
        let mut table = AliasTable::new();

        let pair = table.open_pair(dictionary.clone(), None, None);
        table.bind(alias("k"), BindingSlot::PairKey(pair));
        table.bind(alias("v"), BindingSlot::PairValue(pair));

        table.define(String::from("v"), Value::from(2), Span::default()).unwrap();
        assert!(dictionary.borrow().as_dictionary().unwrap().is_empty());

        table.define(String::from("k"), Value::from("key"), Span::default()).unwrap();
        let object = dictionary.borrow();
        let entries = object.as_dictionary().unwrap();
        assert_eq!(entries.get(&Value::from("key")), Some(&Value::from(2)));
    }

    #[test]
    fn duplicate_anchor() {
        let mut table = AliasTable::new();
        table.define(String::from("a"), Value::Null, Span::default()).unwrap();
        let err = table.define(String::from("a"), Value::Null, Span::default()).unwrap_err();
        assert_eq!(err.structural_kind(), Some(StructuralKind::DuplicateAnchor));
    }

    #[test]
    fn unresolved_reports_oldest_binding() {
        let array = ObjectRef::new(Object::array("[i64]", FixedArray::with_len(2)));
        let mut table = AliasTable::new();
        table.bind(alias("first"), BindingSlot::ArrayIndex { array: array.clone(), index: 0 });
        table.bind(alias("second"), BindingSlot::ArrayIndex { array, index: 1 });

        assert_eq!(
            table.finish(),
            Err(Error::UnresolvedAlias {
                anchor: String::from("first"),
                span: Span::default(),
                pending: 2,
            })
        );
    }
}
