use core::{error, fmt};

use crate::info::{ArrayInfo, DictionaryInfo, PrimitiveInfo, RecordInfo, Type};

// -----------------------------------------------------------------------------
// ShapeKind

/// The shape of a described type.
///
/// The set is closed, new container kinds are added by registering a
/// [`SerializerFactory`] for an existing shape rather than a new kind.
///
/// [`SerializerFactory`]: crate::serializers::SerializerFactory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Primitive,
    Array,
    Dictionary,
    Record,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Array => f.pad("Array"),
            Self::Dictionary => f.pad("Dictionary"),
            Self::Record => f.pad("Record"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ShapeKind`.
#[derive(Debug)]
pub struct ShapeKindError {
    pub expected: ShapeKind,
    pub received: ShapeKind,
}

impl fmt::Display for ShapeKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ShapeKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// The descriptor of a runtime type.
///
/// A `TypeInfo` is obtained from [`TypeRegistry::describe`] and is what
/// serializer factories inspect to decide whether they handle a type.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, ArrayInfo, ShapeKind, TypeInfo};
///
/// let info = TypeInfo::from(ArrayInfo::new("[i64]", paths::INT));
/// assert_eq!(info.kind(), ShapeKind::Array);
/// assert_eq!(info.as_array().unwrap().item(), "i64");
/// assert!(info.as_record().is_err());
/// ```
///
/// [`TypeRegistry::describe`]: crate::registry::TypeRegistry::describe
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Primitive(PrimitiveInfo),
    Array(ArrayInfo),
    Dictionary(DictionaryInfo),
    Record(RecordInfo),
}

// Helper macro that implements type-safe accessor methods like `as_array`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeInfo`] to the shape specific descriptor.
        pub const fn $name(&self) -> Result<&$info, ShapeKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ShapeKindError {
                    expected: ShapeKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

macro_rules! impl_is_method {
    ($name:ident : $kind:ident) => {
        #[inline]
        pub const fn $name(&self) -> bool {
            matches!(self, Self::$kind(..))
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_dictionary: Dictionary => DictionaryInfo);
    impl_cast_method!(as_record: Record => RecordInfo);

    impl_is_method!(is_primitive: Primitive);
    impl_is_method!(is_array: Array);
    impl_is_method!(is_dictionary: Dictionary);
    impl_is_method!(is_record: Record);

    /// Returns the underlying [`Type`] of this descriptor.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Primitive(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Dictionary(info) => info.ty(),
            Self::Record(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Primitive(_) => ShapeKind::Primitive,
            Self::Array(_) => ShapeKind::Array,
            Self::Dictionary(_) => ShapeKind::Dictionary,
            Self::Record(_) => ShapeKind::Record,
        }
    }
}

macro_rules! impl_from_info {
    ($info:ident => $kind:ident) => {
        impl From<$info> for TypeInfo {
            #[inline]
            fn from(info: $info) -> Self {
                Self::$kind(info)
            }
        }
    };
}

impl_from_info!(PrimitiveInfo => Primitive);
impl_from_info!(ArrayInfo => Array);
impl_from_info!(DictionaryInfo => Dictionary);
impl_from_info!(RecordInfo => Record);
