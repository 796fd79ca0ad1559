#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod export;
mod serializer;

pub mod context;
pub mod hash;
pub mod info;
pub mod registry;
pub mod schema;
pub mod serializers;
pub mod settings;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{Error, Result, StructuralKind};
pub use export::ExportDriver;
pub use serializer::Serializer;

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}
