use alloc::vec;
use alloc::vec::Vec;

use crate::hash::{FixedHashState, HashSet};
use crate::value::{ObjectBody, ObjectRef, Value};

/// Finds the objects reachable more than once from `root`, by address.
///
/// Iterative, so deep or cyclic graphs do not grow the call stack.
pub(crate) fn shared_objects(root: &Value) -> HashSet<usize> {
    let mut seen = HashSet::with_hasher(FixedHashState);
    let mut shared = HashSet::with_hasher(FixedHashState);

    let Value::Object(root) = root else {
        return shared;
    };
    let mut stack = vec![root.clone()];

    while let Some(object) = stack.pop() {
        let addr = object.addr();
        if !seen.insert(addr) {
            shared.insert(addr);
            continue;
        }

        let object = object.borrow();
        let found = match object.body() {
            ObjectBody::Array(array) => objects(array.iter()),
            ObjectBody::Record(record) => objects(record.iter()),
            ObjectBody::Dictionary(dictionary) => objects(
                dictionary
                    .fields()
                    .iter()
                    .chain(dictionary.iter().flat_map(|(k, v)| [k, v])),
            ),
        };
        // Reversed so that children are visited in document order.
        stack.extend(found.into_iter().rev());
    }

    shared
}

fn objects<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<ObjectRef> {
    values.filter_map(Value::as_object).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::shared_objects;
    use crate::value::{FixedArray, Object, ObjectRef, Value};
    use alloc::vec;

    fn array(items: vec::Vec<Value>) -> ObjectRef {
        ObjectRef::new(Object::array("vc_yaml::Sequence", FixedArray::from(items)))
    }

    #[test]
    fn tree_has_no_shared_objects() {
        let root = array(vec![array(vec![]).into(), array(vec![]).into(), Value::from(1)]);
        assert!(shared_objects(&root.into()).is_empty());
    }

    #[test]
    fn shared_and_cyclic() {
        let leaf = array(vec![]);
        let root = array(vec![leaf.clone().into(), leaf.clone().into(), Value::Null]);
        *root.borrow_mut().as_array_mut().unwrap().get_mut(2).unwrap() = root.clone().into();

        let shared = shared_objects(&root.clone().into());
        assert_eq!(shared.len(), 2);
        assert!(shared.contains(&leaf.addr()));
        assert!(shared.contains(&root.addr()));
    }
}
