//! Per-shape serializers and the factory list that selects them.
//!
//! ## Menu
//!
//! - [`ValueSerializer`]: reads and writes values of one shape.
//! - [`SerializerFactory`]: inspects a [`TypeInfo`] and optionally returns a serializer for it.
//! - [`SerializerFactories`]: an ordered list of factories, first match wins.
//! - Built-in serializers, each its own factory:
//!     - [`PrimitiveSerializer`]: scalars.
//!     - [`ArraySerializer`]: fixed-size stores, as sequences.
//!     - [`PureDictionarySerializer`]: dictionaries without members, as mappings of pairs.
//!     - [`DictionarySerializer`]: dictionaries with members, pairs under the reserved key.
//!     - [`RecordSerializer`]: named members, as mappings.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod dictionary;
mod primitive;
mod record;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArraySerializer;
pub use dictionary::{DictionarySerializer, PureDictionarySerializer};
pub use primitive::PrimitiveSerializer;
pub use record::RecordSerializer;

// -----------------------------------------------------------------------------
// Traits

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::context::{NodeProps, ReadContext, WriteContext};
use crate::error::{Error, Result};
use crate::info::TypeInfo;
use crate::value::Value;

/// Reads and writes values of the shapes it was created for.
///
/// `read` starts at the first event of the node (which it must consume),
/// `write` attaches `props` to the first event it writes. Nested values
/// always go back through the context.
pub trait ValueSerializer: Send + Sync {
    fn read(
        &self,
        ctx: &mut ReadContext<'_>,
        existing: Option<Value>,
        info: &TypeInfo,
    ) -> Result<Value>;

    fn write(
        &self,
        ctx: &mut WriteContext<'_>,
        value: &Value,
        info: &TypeInfo,
        props: NodeProps,
    ) -> Result<()>;
}

/// Recognizes descriptors and provides serializers for them.
///
/// # Examples
///
/// A factory claiming the arrays of `game::Tile`, asked before the defaults:
///
/// ```
/// use vc_yaml_serial::info::TypeInfo;
/// use vc_yaml_serial::serializers::{
///     ArraySerializer, SerializerFactories, SerializerFactory, ValueSerializer,
/// };
///
/// struct TileRows;
///
/// impl SerializerFactory for TileRows {
///     fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer> {
///         let array = info.as_array().ok()?;
///         (array.item() == "game::Tile").then_some(&ArraySerializer as &dyn ValueSerializer)
///     }
/// }
///
/// let mut factories = SerializerFactories::new();
/// factories.register_front(TileRows);
/// assert_eq!(factories.len(), 6);
/// ```
pub trait SerializerFactory: Send + Sync {
    fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer>;
}

// -----------------------------------------------------------------------------
// SerializerFactories

/// An ordered list of [`SerializerFactory`].
///
/// [`resolve`](Self::resolve) asks the factories in order, so more
/// specific factories must come before generic ones.
pub struct SerializerFactories {
    factories: Vec<Box<dyn SerializerFactory>>,
}

impl Default for SerializerFactories {
    /// See [`SerializerFactories::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerFactories {
    /// Create a empty list, nothing can be serialized with it.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Create the default list:
    ///
    /// 1. [`PrimitiveSerializer`]
    /// 2. [`ArraySerializer`]
    /// 3. [`PureDictionarySerializer`]
    /// 4. [`DictionarySerializer`]
    /// 5. [`RecordSerializer`]
    pub fn new() -> Self {
        let mut factories = Self::empty();
        factories.register(PrimitiveSerializer);
        factories.register(ArraySerializer);
        factories.register(PureDictionarySerializer);
        factories.register(DictionarySerializer);
        factories.register(RecordSerializer);
        factories
    }

    /// Appends a factory, it is asked after every registered one.
    pub fn register(&mut self, factory: impl SerializerFactory + 'static) {
        self.factories.push(Box::new(factory));
    }

    /// Prepends a factory, it is asked before every registered one.
    pub fn register_front(&mut self, factory: impl SerializerFactory + 'static) {
        self.factories.insert(0, Box::new(factory));
    }

    /// The serializer of the first factory recognizing `info`.
    pub fn resolve(&self, info: &TypeInfo) -> Result<&dyn ValueSerializer> {
        self.factories
            .iter()
            .find_map(|factory| factory.try_create(info))
            .ok_or_else(|| shape_mismatch(info))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.factories.len()
    }
}

/// The error of a serializer handed a descriptor it does not handle.
#[cold]
pub fn shape_mismatch(info: &TypeInfo) -> Error {
    Error::NoSerializer {
        type_path: info.type_path(),
        kind: info.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::{SerializerFactories, SerializerFactory, ValueSerializer};
    use crate::error::Error;
    use crate::info::{paths, ArrayInfo, RecordInfo, ShapeKind, TypeInfo};

    struct Never;

    impl SerializerFactory for Never {
        fn try_create(&self, _: &TypeInfo) -> Option<&dyn ValueSerializer> {
            None
        }
    }

    #[test]
    fn empty_list_has_no_serializer() {
        let factories = SerializerFactories::empty();
        let info = TypeInfo::from(RecordInfo::new("game::Point", &[]));
        assert!(matches!(
            factories.resolve(&info),
            Err(Error::NoSerializer {
                type_path: "game::Point",
                kind: ShapeKind::Record,
            })
        ));
    }

    #[test]
    fn factories_are_asked_in_order() {
        let mut factories = SerializerFactories::empty();
        factories.register(Never);
        factories.register(super::ArraySerializer);

        let info = TypeInfo::from(ArrayInfo::new("[i64]", paths::INT));
        assert!(factories.resolve(&info).is_ok());
        let record = TypeInfo::from(RecordInfo::new("game::Point", &[]));
        assert!(factories.resolve(&record).is_err());
    }
}
