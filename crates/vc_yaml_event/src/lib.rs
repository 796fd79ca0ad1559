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

mod event;
mod mark;
mod stream;

pub mod notation;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use event::{CollectionStart, CollectionStyle, Event, EventKind, Scalar, ScalarStyle};
pub use mark::{Mark, Span};
pub use stream::{EventReader, EventStream, EventWriter};
