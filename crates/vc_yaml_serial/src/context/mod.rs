//! Per-document state and the recursive read/write entry points.
//!
//! Serializers never talk to the event stream or the registries directly,
//! they go through a [`ReadContext`] or [`WriteContext`]. Both borrow one
//! [`Session`], the immutable part shared by every document.
//!
//! ## Reading
//!
//! [`ReadContext::read_value`] reads one node. An alias to an anchor that
//! is already defined yields the anchored value; an alias to an anchor not
//! defined yet yields [`ValueResult::Alias`], and the serializer owning the
//! slot registers a [`BindingSlot`] with [`ReadContext::bind`]. When the
//! anchored node is complete, every binding waiting for it is applied in
//! registration order. Bindings left at the end of the document are an
//! [`Error::UnresolvedAlias`](crate::Error::UnresolvedAlias).
//!
//! ## Writing
//!
//! [`WriteContext::write_value`] writes one value. Objects reachable more
//! than once are found before the first event is written; with
//! [`Settings::emit_alias`] they get an anchor on their first visit and are
//! written as aliases afterwards.

// -----------------------------------------------------------------------------
// Modules

mod alias;
mod read;
mod reference_scan;
mod write;

// -----------------------------------------------------------------------------
// Exports

pub use alias::{Alias, BindingSlot, PairId, ValueResult};
pub use read::ReadContext;
pub(crate) use read::is_plain_null;
pub use write::WriteContext;

// -----------------------------------------------------------------------------
// Session

use alloc::string::String;

use crate::registry::{TagTypeRegistry, TypeRegistry};
use crate::schema::Schema;
use crate::serializers::SerializerFactories;
use crate::settings::Settings;

/// The immutable state shared by every document of a [`Serializer`].
///
/// [`Serializer`]: crate::Serializer
#[derive(Clone, Copy)]
pub struct Session<'a> {
    pub registry: &'a TypeRegistry,
    pub tags: &'a TagTypeRegistry,
    pub factories: &'a SerializerFactories,
    pub settings: &'a Settings,
    pub schema: &'a dyn Schema,
}

/// Node properties decided by the context, attached by the serializer to
/// the first event it writes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeProps {
    pub tag: Option<String>,
    pub anchor: Option<String>,
}
