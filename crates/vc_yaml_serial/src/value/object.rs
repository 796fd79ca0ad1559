use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use crate::value::{Dictionary, FixedArray, Value};

// -----------------------------------------------------------------------------
// Record

/// Member fields of a record, in declaration order.
///
/// Fields are addressed by the index stored in [`MemberInfo`].
///
/// [`MemberInfo`]: crate::info::MemberInfo
#[derive(Debug, Default, Clone)]
pub struct Record {
    fields: Vec<Value>,
}

impl Record {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.fields.get_mut(index)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.fields.iter()
    }
}

impl From<Vec<Value>> for Record {
    #[inline]
    fn from(fields: Vec<Value>) -> Self {
        Self { fields }
    }
}

// -----------------------------------------------------------------------------
// Object

/// The body of an [`Object`], one variant per container shape.
#[derive(Debug, Clone)]
pub enum ObjectBody {
    Array(FixedArray),
    Dictionary(Dictionary),
    Record(Record),
}

/// A container value together with its runtime type path.
#[derive(Debug, Clone)]
pub struct Object {
    ty: &'static str,
    body: ObjectBody,
}

impl Object {
    #[inline]
    pub const fn new(ty: &'static str, body: ObjectBody) -> Self {
        Self { ty, body }
    }

    #[inline]
    pub const fn array(ty: &'static str, array: FixedArray) -> Self {
        Self::new(ty, ObjectBody::Array(array))
    }

    #[inline]
    pub const fn dictionary(ty: &'static str, dictionary: Dictionary) -> Self {
        Self::new(ty, ObjectBody::Dictionary(dictionary))
    }

    #[inline]
    pub const fn record(ty: &'static str, record: Record) -> Self {
        Self::new(ty, ObjectBody::Record(record))
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty
    }

    #[inline]
    pub const fn body(&self) -> &ObjectBody {
        &self.body
    }

    #[inline]
    pub const fn body_mut(&mut self) -> &mut ObjectBody {
        &mut self.body
    }

    pub const fn as_array(&self) -> Option<&FixedArray> {
        match &self.body {
            ObjectBody::Array(array) => Some(array),
            _ => None,
        }
    }

    pub const fn as_array_mut(&mut self) -> Option<&mut FixedArray> {
        match &mut self.body {
            ObjectBody::Array(array) => Some(array),
            _ => None,
        }
    }

    pub const fn as_dictionary(&self) -> Option<&Dictionary> {
        match &self.body {
            ObjectBody::Dictionary(dictionary) => Some(dictionary),
            _ => None,
        }
    }

    pub const fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match &mut self.body {
            ObjectBody::Dictionary(dictionary) => Some(dictionary),
            _ => None,
        }
    }

    /// Named member fields: a record's fields, or the members of a
    /// dictionary that has any.
    pub const fn fields(&self) -> Option<&Record> {
        match &self.body {
            ObjectBody::Record(record) => Some(record),
            ObjectBody::Dictionary(dictionary) => Some(dictionary.fields()),
            ObjectBody::Array(_) => None,
        }
    }

    pub const fn fields_mut(&mut self) -> Option<&mut Record> {
        match &mut self.body {
            ObjectBody::Record(record) => Some(record),
            ObjectBody::Dictionary(dictionary) => Some(dictionary.fields_mut()),
            ObjectBody::Array(_) => None,
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

/// A shared handle to an [`Object`].
///
/// Cloning the handle shares the object, identity is the allocation
/// address. Cyclic graphs are plain reference cycles and are not freed
/// until broken by the owner.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    #[inline]
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Returns `true` if both handles point at the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The allocation address, stable while any handle is alive.
    #[inline]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// # Panics
    ///
    /// Panics if the object is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// # Panics
    ///
    /// Panics if the object is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.0.borrow().type_path()
    }
}

impl fmt::Debug for ObjectRef {
    // Never recurse, the graph may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "ObjectRef({} @ {:#x})", object.type_path(), self.addr()),
            Err(_) => write!(f, "ObjectRef(<borrowed> @ {:#x})", self.addr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Object, ObjectRef, Record};
    use crate::value::{FixedArray, Value};
    use alloc::format;
    use alloc::vec;

    #[test]
    fn cyclic_debug_terminates() {
        let node = ObjectRef::new(Object::array("[node]", FixedArray::with_len(1)));
        *node.borrow_mut().as_array_mut().unwrap().get_mut(0).unwrap() = Value::from(node.clone());

        let text = format!("{:?}", Value::from(node.clone()));
        assert!(text.starts_with("Object(ObjectRef([node] @ 0x"));
    }

    #[test]
    fn fields_of_records() {
        let object = Object::record("game::Point", Record::from(vec![Value::from(1), Value::from(2)]));
        assert_eq!(object.fields().unwrap().get(1), Some(&Value::from(2)));
        assert!(object.as_array().is_none());
    }
}
