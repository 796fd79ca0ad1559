use alloc::format;
use core::fmt::Display;

use serde_core::ser::{self, SerializeMap, SerializeSeq, SerializeStruct};
use serde_core::{Serialize, Serializer};

use crate::info::{Members, TypeInfo};
use crate::registry::TypeRegistry;
use crate::value::{ObjectBody, Value};

// -----------------------------------------------------------------------------
// ExportDriver

/// Exports an object graph to any serde data format.
///
/// Objects are exported by shape:
///
/// - arrays as sequences,
/// - records as structs named after the type, in member order,
/// - dictionaries as maps, members first (keyed by name) then the pairs.
///
/// There are no anchors in serde data formats: an object reachable twice
/// is exported twice, and a cycle is an error.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::ExportDriver;
/// use vc_yaml_serial::info::paths;
/// use vc_yaml_serial::registry::TypeRegistry;
/// use vc_yaml_serial::value::{FixedArray, Object, ObjectRef, Value};
///
/// let registry = TypeRegistry::new();
/// let items: FixedArray = [Value::from(1), Value::from("two")].into_iter().collect();
/// let value = Value::from(ObjectRef::new(Object::array(paths::SEQUENCE, items)));
///
/// let json = serde_json::to_string(&ExportDriver::new(&value, &registry)).unwrap();
/// assert_eq!(json, r#"[1,"two"]"#);
/// ```
pub struct ExportDriver<'a> {
    value: &'a Value,
    registry: &'a TypeRegistry,
}

impl<'a> ExportDriver<'a> {
    #[inline]
    pub const fn new(value: &'a Value, registry: &'a TypeRegistry) -> Self {
        Self { value, registry }
    }
}

impl Serialize for ExportDriver<'_> {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Node {
            value: self.value,
            registry: self.registry,
            ancestors: None,
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Node

/// Addresses of the objects currently being exported, innermost first.
struct Ancestors<'a> {
    addr: usize,
    parent: Option<&'a Ancestors<'a>>,
}

impl Ancestors<'_> {
    fn contains(&self, addr: usize) -> bool {
        let mut current = Some(self);
        while let Some(node) = current {
            if node.addr == addr {
                return true;
            }
            current = node.parent;
        }
        false
    }
}

struct Node<'a> {
    value: &'a Value,
    registry: &'a TypeRegistry,
    ancestors: Option<&'a Ancestors<'a>>,
}

impl<'a> Node<'a> {
    #[inline]
    fn child<'b>(&'b self, value: &'b Value, ancestors: &'b Ancestors<'b>) -> Node<'b> {
        Node {
            value,
            registry: self.registry,
            ancestors: Some(ancestors),
        }
    }
}

#[inline]
fn custom_error<E: ser::Error>(msg: impl Display) -> E {
    E::custom(msg)
}

impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let object = match self.value {
            Value::Null => return serializer.serialize_unit(),
            Value::Bool(v) => return serializer.serialize_bool(*v),
            Value::Int(v) => return serializer.serialize_i64(*v),
            Value::Float(v) => return serializer.serialize_f64(*v),
            Value::Str(v) => return serializer.serialize_str(v),
            Value::Object(object) => object,
        };

        let addr = object.addr();
        if self.ancestors.is_some_and(|ancestors| ancestors.contains(addr)) {
            return Err(custom_error(format!(
                "object of type `{}` is part of a cycle and cannot be exported",
                object.type_path()
            )));
        }
        let ancestors = Ancestors {
            addr,
            parent: self.ancestors,
        };
        let object = object.borrow();
        let info = self.registry.get(object.type_path());

        match object.body() {
            ObjectBody::Array(array) => {
                let mut state = serializer.serialize_seq(Some(array.len()))?;
                for item in array.iter() {
                    state.serialize_element(&self.child(item, &ancestors))?;
                }
                state.end()
            }
            ObjectBody::Record(record) => {
                let Some(TypeInfo::Record(record_info)) = info else {
                    return Err(custom_error(format!(
                        "record type `{}` has no registered descriptor",
                        object.type_path()
                    )));
                };
                let members = record_info.members();
                let mut state = serializer.serialize_struct(record_info.ty().name(), members.len())?;
                for member in members.iter() {
                    match record.get(member.index()) {
                        Some(value) => {
                            state.serialize_field(member.name(), &self.child(value, &ancestors))?;
                        }
                        None => state.serialize_field(member.name(), &())?,
                    }
                }
                state.end()
            }
            ObjectBody::Dictionary(dictionary) => {
                let empty = Members::default();
                let members = match info {
                    Some(TypeInfo::Dictionary(dictionary_info)) => dictionary_info.members(),
                    _ => &empty,
                };
                let mut state = serializer.serialize_map(Some(members.len() + dictionary.len()))?;
                for member in members.iter() {
                    match dictionary.fields().get(member.index()) {
                        Some(value) => {
                            state.serialize_entry(member.name(), &self.child(value, &ancestors))?;
                        }
                        None => state.serialize_entry(member.name(), &())?,
                    }
                }
                for (key, value) in dictionary.iter() {
                    state.serialize_entry(&self.child(key, &ancestors), &self.child(value, &ancestors))?;
                }
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use serde_json::json;

    use super::ExportDriver;
    use crate::info::{DictionaryInfo, MemberInfo, RecordInfo, paths};
    use crate::registry::TypeRegistry;
    use crate::value::{Dictionary, FixedArray, Object, ObjectRef, Record, Value};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(RecordInfo::new(
            "game::Point",
            &[MemberInfo::new("x", paths::INT), MemberInfo::new("y", paths::FLOAT)],
        ));
        registry.register(
            DictionaryInfo::new("game::Inventory", paths::STRING, paths::INT)
                .with_members(&[MemberInfo::new("owner", paths::STRING)]),
        );
        registry
    }

    #[test]
    fn records_and_dictionaries() {
        let registry = registry();
        let point = ObjectRef::new(Object::record(
            "game::Point",
            Record::from(vec![Value::from(1), Value::from(2.5)]),
        ));
        let mut items = Dictionary::with_fields(Record::from(vec![Value::from("Ada")]));
        items.insert(Value::from("bow"), Value::from(2));
        let inventory = ObjectRef::new(Object::dictionary("game::Inventory", items));
        let root = FixedArray::from(vec![Value::from(point), Value::from(inventory), Value::Null]);
        let root = Value::from(ObjectRef::new(Object::array(paths::SEQUENCE, root)));

        let json = serde_json::to_value(ExportDriver::new(&root, &registry)).unwrap();
        assert_eq!(
            json,
            json!([
                { "x": 1, "y": 2.5 },
                { "owner": "Ada", "bow": 2 },
                null
            ])
        );
    }

    #[test]
    fn cycles_are_errors() {
        let registry = registry();
        let node = ObjectRef::new(Object::array(paths::SEQUENCE, FixedArray::with_len(1)));
        *node.borrow_mut().as_array_mut().unwrap().get_mut(0).unwrap() = Value::from(node.clone());

        let error = serde_json::to_string(&ExportDriver::new(&node.into(), &registry)).unwrap_err();
        assert!(error.to_string().contains("part of a cycle"));
    }

    #[test]
    fn shared_objects_are_repeated() {
        let registry = registry();
        let leaf = ObjectRef::new(Object::array(
            paths::SEQUENCE,
            FixedArray::from(vec![Value::from(true)]),
        ));
        let root = FixedArray::from(vec![Value::from(leaf.clone()), Value::from(leaf)]);
        let root = Value::from(ObjectRef::new(Object::array(paths::SEQUENCE, root)));

        let json = serde_json::to_string(&ExportDriver::new(&root, &registry)).unwrap();
        assert_eq!(json, "[[true],[true]]");
    }
}
