use log::debug;

use crate::error::{Error, Result};
use crate::hash::{FixedHashState, HashMap, HashSet};
use crate::info::{ArrayInfo, DictionaryInfo, PrimitiveInfo, ScalarKind, TypeInfo, paths};
use crate::value::Value;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of described types.
///
/// This struct is the central store of [`TypeInfo`]. Descriptors are keyed
/// by their full type path, a second index maps the short [type name]
/// to the path as long as the name is unambiguous.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, MemberInfo, RecordInfo, ShapeKind};
/// use vc_yaml_serial::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(RecordInfo::new("game::Point", &[
///     MemberInfo::new("x", paths::INT),
///     MemberInfo::new("y", paths::INT),
/// ]));
///
/// let info = registry.describe("game::Point").unwrap();
/// assert_eq!(info.kind(), ShapeKind::Record);
/// assert_eq!(registry.get_with_type_name("Point").unwrap().type_path(), "game::Point");
/// assert!(registry.describe("game::Line").is_err());
/// ```
///
/// [type name]: crate::info::Type::name
pub struct TypeRegistry {
    type_infos: HashMap<&'static str, TypeInfo>,
    type_name_to_path: HashMap<&'static str, &'static str>,
    ambiguous_names: HashSet<&'static str>,
    #[cfg(feature = "auto_register")]
    auto_registered: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a empty [`TypeRegistry`].
    #[inline]
    pub const fn empty() -> Self {
        Self {
            type_infos: HashMap::with_hasher(FixedHashState),
            type_name_to_path: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
            #[cfg(feature = "auto_register")]
            auto_registered: false,
        }
    }

    /// Create a type registry with the built-in types.
    ///
    /// - `()` `bool` `i64` `f64` `String`
    /// - `vc_yaml::Sequence`: array of untyped items.
    /// - `vc_yaml::Mapping`: pure dictionary of untyped keys and values.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(PrimitiveInfo::new(paths::NULL, ScalarKind::Null));
        registry.register(PrimitiveInfo::new(paths::BOOL, ScalarKind::Bool));
        registry.register(PrimitiveInfo::new(paths::INT, ScalarKind::Int));
        registry.register(PrimitiveInfo::new(paths::FLOAT, ScalarKind::Float));
        registry.register(PrimitiveInfo::new(paths::STRING, ScalarKind::Str));
        registry.register(ArrayInfo::new(paths::SEQUENCE, paths::ANY));
        registry.register(DictionaryInfo::new(paths::MAPPING, paths::ANY, paths::ANY));
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_name_index(
        type_path: &'static str,
        type_name: &'static str,
        type_name_to_path: &mut HashMap<&'static str, &'static str>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        if ambiguous_names.contains(type_name) {
            return;
        }
        if type_name_to_path.contains_key(type_name) {
            debug!("type name `{type_name}` is ambiguous, `{type_path}` shares it");
            type_name_to_path.remove(type_name);
            ambiguous_names.insert(type_name);
        } else {
            type_name_to_path.insert(type_name, type_path);
        }
    }

    /// Try add or do nothing.
    ///
    /// - If the type path has already been registered, the function will do nothing and return `false`.
    /// - If the type path does not exist, the function will insert the descriptor and return `true`.
    pub fn register(&mut self, info: impl Into<TypeInfo>) -> bool {
        let info = info.into();
        let type_path = info.type_path();
        if self.type_infos.contains_key(type_path) {
            return false;
        }
        Self::add_name_index(
            type_path,
            info.type_name(),
            &mut self.type_name_to_path,
            &mut self.ambiguous_names,
        );
        self.type_infos.insert(type_path, info);
        true
    }

    /// Insert or **Overwrite** a descriptor.
    ///
    /// The short-name index is only updated for new types.
    pub fn insert(&mut self, info: impl Into<TypeInfo>) {
        let info = info.into();
        let type_path = info.type_path();
        if !self.type_infos.contains_key(type_path) {
            Self::add_name_index(
                type_path,
                info.type_name(),
                &mut self.type_name_to_path,
                &mut self.ambiguous_names,
            );
        }
        self.type_infos.insert(type_path, info);
    }

    /// Registers every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration ran on the current platform; otherwise, `false`.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it always do nothing and
    /// returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if !self.auto_registered {
                crate::registry::auto_register::register_all(self);
            }
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[cfg(feature = "auto_register")]
    pub(super) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    /// Whether the type with given path has been registered in this registry.
    #[inline]
    pub fn contains(&self, type_path: &str) -> bool {
        self.type_infos.contains_key(type_path)
    }

    /// Returns the [`TypeInfo`] of the type with the given path.
    #[inline]
    pub fn get(&self, type_path: &str) -> Option<&TypeInfo> {
        self.type_infos.get(type_path)
    }

    /// Same as [`get`](Self::get), but an unknown path is an [`Error::UnsupportedShape`].
    pub fn describe(&self, type_path: &str) -> Result<&TypeInfo> {
        self.type_infos
            .get(type_path)
            .ok_or_else(|| Error::UnsupportedShape(type_path.into()))
    }

    /// Returns the [`TypeInfo`] of the type with the given short name.
    ///
    /// If the name is ambiguous, or if no type has it, returns `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeInfo> {
        match self.type_name_to_path.get(type_name) {
            Some(path) => self.get(path),
            None => None,
        }
    }

    /// Returns `true` if the given type name matches multiple registered types.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// The value a fresh slot of the given type holds.
    ///
    /// Primitives default to their zero value, everything else to `Null`.
    pub fn default_value(&self, type_path: &str) -> Value {
        match self.get(type_path) {
            Some(TypeInfo::Primitive(info)) => info.kind().default_value(),
            _ => Value::Null,
        }
    }

    /// Returns an iterator over the registered descriptors.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeInfo> {
        self.type_infos.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_infos.len()
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.type_infos.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::error::Error;
    use crate::info::{paths, MemberInfo, RecordInfo, ShapeKind};
    use crate::value::Value;

    #[test]
    fn builtins() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.describe(paths::INT).unwrap().kind(), ShapeKind::Primitive);
        assert_eq!(registry.describe(paths::SEQUENCE).unwrap().kind(), ShapeKind::Array);
        assert!(registry.describe(paths::MAPPING).unwrap().as_dictionary().unwrap().is_pure());
        assert!(!registry.contains(paths::ANY));
        assert_eq!(registry.default_value(paths::STRING), Value::from(""));
        assert_eq!(registry.default_value("game::Missing"), Value::Null);
    }

    #[test]
    fn register_does_not_overwrite() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.register(RecordInfo::new("game::Point", &[])));
        assert!(!registry.register(RecordInfo::new(
            "game::Point",
            &[MemberInfo::new("x", paths::INT)]
        )));
        let members = registry.get("game::Point").unwrap().as_record().unwrap().members().len();
        assert_eq!(members, 0);

        registry.insert(RecordInfo::new("game::Point", &[MemberInfo::new("x", paths::INT)]));
        let members = registry.get("game::Point").unwrap().as_record().unwrap().members().len();
        assert_eq!(members, 1);
    }

    #[test]
    fn ambiguous_names() {
        let mut registry = TypeRegistry::empty();
        registry.register(RecordInfo::new("foo::MyType", &[]));
        assert!(registry.get_with_type_name("MyType").is_some());

        registry.register(RecordInfo::new("bar::MyType", &[]));
        registry.register(RecordInfo::new("baz::MyType<i64>", &[]));
        assert!(registry.is_ambiguous("MyType"));
        assert!(registry.get_with_type_name("MyType").is_none());
        assert!(registry.get("bar::MyType").is_some());
    }

    #[test]
    fn unknown_types_are_unsupported() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.describe("game::Missing").unwrap_err(),
            Error::UnsupportedShape("game::Missing".into())
        );
    }
}
