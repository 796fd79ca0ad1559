use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::value::Value;

/// A fixed-size indexable store.
///
/// The length is decided at construction and never changes, writes past
/// the end are rejected.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::value::{FixedArray, Value};
///
/// let mut array = FixedArray::with_len(2);
/// *array.get_mut(1).unwrap() = Value::from(7);
///
/// assert_eq!(array.as_slice(), &[Value::Null, Value::from(7)]);
/// assert!(array.get_mut(2).is_none());
/// assert!(!array.set(2, Value::from(8)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct FixedArray {
    items: Box<[Value]>,
}

impl FixedArray {
    /// Creates an array of `len` null slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            items: (0..len).map(|_| Value::Null).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Replaces the value at `index`.
    ///
    /// Returns `false`, leaving the array unchanged, if `index` is past the end.
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl From<Vec<Value>> for FixedArray {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self {
            items: items.into_boxed_slice(),
        }
    }
}

impl FromIterator<Value> for FixedArray {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
