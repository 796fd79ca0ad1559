use crate::info::record_info::default_fields;
use crate::info::{MemberInfo, Members, Type};
use crate::registry::TypeRegistry;
use crate::value::{Dictionary, Object};

/// A container for key/value association information.
///
/// A dictionary without members is *pure*: it is written as a mapping of
/// its pairs only. With members it is *mixed*: the members are written as
/// keys of the mapping and the pairs go under a reserved key, see
/// [`Settings::special_collection_member`].
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, DictionaryInfo, MemberInfo};
///
/// let pure = DictionaryInfo::new("game::Scores", paths::STRING, paths::INT);
/// assert!(pure.is_pure());
///
/// let mixed = pure.clone().with_members(&[MemberInfo::new("owner", paths::STRING)]);
/// assert!(!mixed.is_pure());
/// ```
///
/// [`Settings::special_collection_member`]: crate::settings::Settings::special_collection_member
#[derive(Debug, Clone)]
pub struct DictionaryInfo {
    ty: Type,
    key: &'static str,
    value: &'static str,
    members: Members,
}

impl DictionaryInfo {
    #[inline]
    pub fn new(path: &'static str, key: &'static str, value: &'static str) -> Self {
        Self {
            ty: Type::new(path),
            key,
            value,
            members: Members::default(),
        }
    }

    /// Declares the named members, making the dictionary mixed.
    pub fn with_members(mut self, members: &[MemberInfo]) -> Self {
        self.members = Members::new(members);
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Type path of the keys.
    #[inline]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Type path of the values.
    #[inline]
    pub const fn value(&self) -> &'static str {
        self.value
    }

    #[inline]
    pub const fn members(&self) -> &Members {
        &self.members
    }

    /// `true` when the dictionary has no named members.
    #[inline]
    pub fn is_pure(&self) -> bool {
        self.members.is_empty()
    }

    /// Creates an empty dictionary with every member at its default value.
    pub fn create(&self, registry: &TypeRegistry) -> Object {
        let fields = default_fields(&self.members, registry);
        Object::dictionary(self.ty.path(), Dictionary::with_fields(fields))
    }
}
