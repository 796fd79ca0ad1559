//! The in-memory object graph.
//!
//! Scalars are stored inline, containers live behind a shared [`ObjectRef`]
//! so one object can be referenced from several places (and from itself),
//! which is what anchors and aliases describe in the document.
//!
//! ## Menu
//!
//! - [`Value`]: a node of the graph.
//! - [`ObjectRef`]: a shared, mutable handle to an [`Object`].
//! - [`Object`]: the runtime type path plus an [`ObjectBody`].
//! - [`FixedArray`], [`Dictionary`], [`Record`]: container bodies.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod dictionary;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use array::FixedArray;
pub use dictionary::Dictionary;
pub use object::{Object, ObjectBody, ObjectRef, Record};

// -----------------------------------------------------------------------------
// Value

use alloc::string::String;
use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash, Hasher};

use crate::hash::FixedHashState;
use crate::info::paths;

/// A node of the object graph.
///
/// Equality compares scalars by value and objects by identity.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::value::Value;
///
/// let value = Value::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// assert_eq!(value.type_path(), "String");
/// assert_eq!(Value::from(3_i64).type_path(), "i64");
/// ```
#[derive(Debug, Default, Clone)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(ObjectRef),
}

impl Value {
    /// The runtime type path of this value.
    ///
    /// Scalars report the built-in primitive types, objects their own type.
    pub fn type_path(&self) -> &'static str {
        match self {
            Self::Null => paths::NULL,
            Self::Bool(_) => paths::BOOL,
            Self::Int(_) => paths::INT,
            Self::Float(_) => paths::FLOAT,
            Self::Str(_) => paths::STRING,
            Self::Object(object) => object.type_path(),
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Compares two keys by their natural ordering.
    ///
    /// Booleans, numbers (integers and floats mixed) and strings are ordered,
    /// everything else returns `None`.
    pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => Some(a.total_cmp(b)),
            (Self::Int(a), Self::Float(b)) => Some((*a as f64).total_cmp(b)),
            (Self::Float(a), Self::Int(b)) => Some(a.total_cmp(&(*b as f64))),
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Key equality used by [`Dictionary`].
    ///
    /// Unlike `==`, floats compare by bit pattern so that `NaN` can be a key.
    pub fn key_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    /// Hash consistent with [`Value::key_eq`].
    pub fn key_hash(&self) -> u64 {
        let mut hasher = FixedHashState.build_hasher();
        core::mem::discriminant(self).hash(&mut hasher);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(&mut hasher),
            Self::Int(v) => v.hash(&mut hasher),
            Self::Float(v) => v.to_bits().hash(&mut hasher),
            Self::Str(v) => v.hash(&mut hasher),
            Self::Object(v) => v.addr().hash(&mut hasher),
        }
        hasher.finish()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from {
    ($ty:ty => $variant:ident $(as $cast:ty)?) => {
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value $(as $cast)?)
            }
        }
    };
}

impl_from!(bool => Bool);
impl_from!(i64 => Int);
impl_from!(i32 => Int as i64);
impl_from!(u32 => Int as i64);
impl_from!(f64 => Float);
impl_from!(f32 => Float as f64);
impl_from!(String => Str);
impl_from!(ObjectRef => Object);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<()> for Value {
    #[inline]
    fn from((): ()) -> Self {
        Self::Null
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedArray, Object, ObjectRef, Value};
    use core::cmp::Ordering;

    #[test]
    fn natural_ordering() {
        assert_eq!(
            Value::from(1).natural_cmp(&Value::from(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("b").natural_cmp(&Value::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::from("b").natural_cmp(&Value::from(1)), None);
        assert_eq!(Value::Null.natural_cmp(&Value::Null), None);
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = ObjectRef::new(Object::array("[i64]", FixedArray::with_len(1)));
        let b = ObjectRef::new(Object::array("[i64]", FixedArray::with_len(1)));

        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn nan_is_a_usable_key() {
        let nan = Value::from(f64::NAN);
        assert_ne!(nan, nan.clone());
        assert!(nan.key_eq(&nan.clone()));
        assert_eq!(nan.key_hash(), Value::from(f64::NAN).key_hash());
        assert_ne!(Value::from(1).key_hash(), Value::from(1.0).key_hash());
    }
}
