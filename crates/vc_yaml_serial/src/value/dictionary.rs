use alloc::vec::Vec;

use crate::hash::HashTable;
use crate::value::{Record, Value};

/// A key/value association plus optional named member fields.
///
/// Entries keep insertion order, lookups go through a hash table of
/// entry indices. Keys compare with [`Value::key_eq`]: scalars by value,
/// objects by identity.
///
/// The member fields are empty for a pure dictionary and hold the named
/// members of a mixed one.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::value::{Dictionary, Value};
///
/// let mut dictionary = Dictionary::new();
/// dictionary.insert("b".into(), 1.into());
/// dictionary.insert("a".into(), 2.into());
/// let old = dictionary.insert("b".into(), 3.into());
///
/// assert_eq!(old, Some(Value::from(1)));
/// assert_eq!(dictionary.get(&"b".into()), Some(&Value::from(3)));
///
/// let keys: Vec<_> = dictionary.keys().cloned().collect();
/// assert_eq!(keys, [Value::from("b"), Value::from("a")]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    fields: Record,
    entries: Vec<(Value, Value)>,
    indices: HashTable<usize>,
}

impl Dictionary {
    /// Creates an empty pure dictionary.
    #[inline]
    pub const fn new() -> Self {
        Self {
            fields: Record::new(),
            entries: Vec::new(),
            indices: HashTable::new(),
        }
    }

    /// Creates an empty dictionary with the given member fields.
    #[inline]
    pub const fn with_fields(fields: Record) -> Self {
        Self {
            fields,
            entries: Vec::new(),
            indices: HashTable::new(),
        }
    }

    #[inline]
    pub const fn fields(&self) -> &Record {
        &self.fields
    }

    #[inline]
    pub const fn fields_mut(&mut self) -> &mut Record {
        &mut self.fields
    }

    /// Number of key/value entries, member fields are not counted.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, key: &Value) -> Option<usize> {
        let entries = &self.entries;
        self.indices
            .find(key.key_hash(), |&index| entries[index].0.key_eq(key))
            .copied()
    }

    /// Inserts an entry, returning the previous value of an equal key.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        if let Some(index) = self.find(&key) {
            return Some(core::mem::replace(&mut self.entries[index].1, value));
        }

        let index = self.entries.len();
        let entries = &self.entries;
        self.indices
            .insert_unique(key.key_hash(), index, |&i| entries[i].0.key_hash());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.find(key).map(|index| &self.entries[index].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.find(key).is_some()
    }

    /// Iterates entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use super::Dictionary;
    use crate::value::{FixedArray, Object, ObjectRef, Value};

    #[test]
    fn object_keys_use_identity() {
        let a = ObjectRef::new(Object::array("[i64]", FixedArray::with_len(0)));
        let b = ObjectRef::new(Object::array("[i64]", FixedArray::with_len(0)));

        let mut dictionary = Dictionary::new();
        dictionary.insert(a.clone().into(), 1.into());
        dictionary.insert(b.into(), 2.into());

        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.get(&a.into()), Some(&Value::from(1)));
    }

    #[test]
    fn many_entries() {
        let mut dictionary = Dictionary::new();
        for i in 0..100 {
            dictionary.insert(i.into(), (i * 2).into());
        }
        for i in 0..100 {
            assert_eq!(dictionary.get(&i.into()), Some(&Value::from(i * 2)));
        }
        assert!(!dictionary.contains_key(&100.into()));
        assert!(dictionary.fields().len() == 0);
    }
}
