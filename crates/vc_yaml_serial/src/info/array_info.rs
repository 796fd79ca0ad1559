use crate::info::Type;
use crate::value::{FixedArray, Object};

/// A container for fixed-size array information.
///
/// The length is not part of the type, it is decided when a store is
/// created by [`create`](Self::create).
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, ArrayInfo};
///
/// let info = ArrayInfo::new("[i64]", paths::INT);
/// let object = info.create(3);
///
/// assert_eq!(object.type_path(), "[i64]");
/// assert_eq!(object.as_array().unwrap().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayInfo {
    ty: Type,
    item: &'static str,
}

impl ArrayInfo {
    #[inline]
    pub fn new(path: &'static str, item: &'static str) -> Self {
        Self {
            ty: Type::new(path),
            item,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Type path of the items.
    #[inline]
    pub const fn item(&self) -> &'static str {
        self.item
    }

    /// Creates a store of `len` null slots.
    pub fn create(&self, len: usize) -> Object {
        Object::array(self.ty.path(), FixedArray::with_len(len))
    }
}
