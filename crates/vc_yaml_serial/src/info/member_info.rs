use alloc::boxed::Box;

use crate::hash::{FixedHashState, HashMap};
use crate::value::{Object, Value};

// -----------------------------------------------------------------------------
// MemberInfo

/// A named member of a record or mixed dictionary.
///
/// The member addresses its slot in the object's [`Record`] by index,
/// which is assigned from the declaration order by [`Members::new`].
///
/// [`Record`]: crate::value::Record
#[derive(Debug, Clone)]
pub struct MemberInfo {
    name: &'static str,
    ty: &'static str,
    index: usize,
}

impl MemberInfo {
    /// Creates a member, the index is assigned when it is added to [`Members`].
    #[inline]
    pub const fn new(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty, index: 0 }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type path of the member.
    #[inline]
    pub const fn ty(&self) -> &'static str {
        self.ty
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Reads the member from `object`, `Null` if the object has no such slot.
    pub fn get(&self, object: &Object) -> Value {
        object
            .fields()
            .and_then(|fields| fields.get(self.index))
            .cloned()
            .unwrap_or_default()
    }

    /// Writes the member into `object`.
    ///
    /// Returns `false` if the object has no such slot.
    pub fn set(&self, object: &mut Object, value: Value) -> bool {
        match object.fields_mut().and_then(|fields| fields.get_mut(self.index)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Members

/// Named members in declaration order, with lookup by name.
#[derive(Debug, Clone, Default)]
pub struct Members {
    list: Box<[MemberInfo]>,
    by_name: HashMap<&'static str, usize>,
}

impl Members {
    /// Creates the member list, indices follow the input order.
    pub fn new(members: &[MemberInfo]) -> Self {
        let list: Box<[MemberInfo]> = members
            .iter()
            .enumerate()
            .map(|(index, member)| MemberInfo { index, ..member.clone() })
            .collect();

        let mut by_name = HashMap::with_capacity_and_hasher(list.len(), FixedHashState);
        for member in &list {
            by_name.insert(member.name, member.index);
        }

        Self { list, by_name }
    }

    /// Returns the member with the given `name`, if present.
    pub fn get(&self, name: &str) -> Option<&MemberInfo> {
        self.by_name.get(name).map(|&index| &self.list[index])
    }

    #[inline]
    pub fn at(&self, index: usize) -> Option<&MemberInfo> {
        self.list.get(index)
    }

    /// Returns an iterator over the members in **declaration order**.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, MemberInfo> {
        self.list.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{MemberInfo, Members};
    use crate::info::paths;
    use crate::value::{Object, Record, Value};
    use alloc::vec;

    #[test]
    fn indices_follow_declaration_order() {
        let members = Members::new(&[
            MemberInfo::new("x", paths::INT),
            MemberInfo::new("y", paths::INT),
        ]);

        assert_eq!(members.get("y").map(MemberInfo::index), Some(1));
        assert!(members.get("z").is_none());

        let names: vec::Vec<_> = members.iter().map(MemberInfo::name).collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn get_and_set() {
        let members = Members::new(&[MemberInfo::new("x", paths::INT)]);
        let member = members.get("x").unwrap();

        let mut object = Object::record("game::Point", Record::from(vec![Value::Null]));
        assert!(member.set(&mut object, Value::from(5)));
        assert_eq!(member.get(&object), Value::from(5));

        let mut empty = Object::record("game::Unit", Record::new());
        assert!(!member.set(&mut empty, Value::from(5)));
        assert_eq!(member.get(&empty), Value::Null);
    }
}
