use crate::info::{MemberInfo, Members, Type};
use crate::registry::TypeRegistry;
use crate::value::{Object, Record};

/// A container for keyed record information.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, MemberInfo, RecordInfo};
/// use vc_yaml_serial::registry::TypeRegistry;
/// use vc_yaml_serial::value::Value;
///
/// let info = RecordInfo::new("game::Point", &[
///     MemberInfo::new("x", paths::INT),
///     MemberInfo::new("y", paths::FLOAT),
/// ]);
///
/// let object = info.create(&TypeRegistry::new());
/// let y = info.members().get("y").unwrap();
/// assert_eq!(y.get(&object), Value::from(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct RecordInfo {
    ty: Type,
    members: Members,
}

impl RecordInfo {
    pub fn new(path: &'static str, members: &[MemberInfo]) -> Self {
        Self {
            ty: Type::new(path),
            members: Members::new(members),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn members(&self) -> &Members {
        &self.members
    }

    /// Creates a record with every member at its default value.
    pub fn create(&self, registry: &TypeRegistry) -> Object {
        Object::record(self.ty.path(), default_fields(&self.members, registry))
    }
}

pub(super) fn default_fields(members: &Members, registry: &TypeRegistry) -> Record {
    members
        .iter()
        .map(|member| registry.default_value(member.ty()))
        .collect::<alloc::vec::Vec<_>>()
        .into()
}
