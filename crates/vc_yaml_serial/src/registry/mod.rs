//! Registries consulted while reading and writing.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: type path to [`TypeInfo`], with a short-name index.
//! - [`TagTypeRegistry`]: tag to type path and back.
//! - [`TagResolver`]: a per-document cache in front of [`TagTypeRegistry::type_from_tag`].
//! - [`escape_tag`] and [`unescape_tag`]: percent escaping of tag text.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration, a
//! registration function submitted with [`auto_register!`](crate::auto_register)
//! is called by every registry that asks for it.
//!
//! [`TypeInfo`]: crate::info::TypeInfo
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod tag_registry;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use auto_register::AutoRegistration;
pub use tag_registry::{TagResolver, TagTypeRegistry, escape_tag, unescape_tag};
pub use type_registry::TypeRegistry;
