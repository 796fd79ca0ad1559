//! Type descriptors.
//!
//! Every runtime type the engine can read or write is described by a
//! [`TypeInfo`], registered under its type path in a
//! [`TypeRegistry`](crate::registry::TypeRegistry). Descriptors are plain
//! data and never change once registered.
//!
//! ## Menu
//!
//! - [`Type`]: the full type path and the short name derived from it.
//! - [`ShapeKind`]: the closed set of shapes, `Primitive`, `Array`, `Dictionary` and `Record`.
//! - [`TypeInfo`]: an enum over the shape specific descriptors:
//!     - [`PrimitiveInfo`]: a scalar type, carrying its [`ScalarKind`].
//!     - [`ArrayInfo`]: a fixed-size store, carrying the item type.
//!     - [`DictionaryInfo`]: a key/value association, optionally with named members.
//!     - [`RecordInfo`]: named members only.
//! - [`MemberInfo`] and [`Members`]: named members in declaration order.
//! - [`paths`]: type paths of the built-in types.

// -----------------------------------------------------------------------------
// Modules

mod array_info;
mod dictionary_info;
mod member_info;
mod primitive_info;
mod record_info;
mod type_info;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use array_info::ArrayInfo;
pub use dictionary_info::DictionaryInfo;
pub use member_info::{MemberInfo, Members};
pub use primitive_info::{PrimitiveInfo, ScalarKind};
pub use record_info::RecordInfo;
pub use type_info::{ShapeKind, ShapeKindError, TypeInfo};
pub use type_path::Type;

/// Type paths of the types registered by [`TypeRegistry::new`].
///
/// [`TypeRegistry::new`]: crate::registry::TypeRegistry::new
pub mod paths {
    pub const NULL: &str = "()";
    pub const BOOL: &str = "bool";
    pub const INT: &str = "i64";
    pub const FLOAT: &str = "f64";
    pub const STRING: &str = "String";

    /// Marker for "no static type". Never registered, a node expected as
    /// `ANY` is typed by its tag or by the kind of its first event.
    pub const ANY: &str = "vc_yaml::Any";
    /// Array of `ANY`, the type of an untyped sequence.
    pub const SEQUENCE: &str = "vc_yaml::Sequence";
    /// Pure dictionary `ANY -> ANY`, the type of an untyped mapping.
    pub const MAPPING: &str = "vc_yaml::Mapping";
}
