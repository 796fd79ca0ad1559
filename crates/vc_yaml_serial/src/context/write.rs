use alloc::format;
use alloc::string::String;

use log::trace;
use vc_yaml_event::{Event, EventWriter, Span};

use crate::context::reference_scan::shared_objects;
use crate::context::{NodeProps, Session};
use crate::error::{Error, Result};
use crate::hash::{FixedHashState, HashMap, HashSet};
use crate::info::paths;
use crate::settings::Settings;
use crate::value::Value;

// -----------------------------------------------------------------------------
// WriteContext

/// The write side of one document.
///
/// Created for one root value, which is scanned for shared objects
/// before anything is written.
pub struct WriteContext<'a> {
    session: Session<'a>,
    writer: &'a mut dyn EventWriter,
    shared: HashSet<usize>,
    anchors: HashMap<usize, String>,
    in_progress: HashSet<usize>,
    next_anchor: usize,
    depth: usize,
}

impl<'a> WriteContext<'a> {
    pub fn new(session: Session<'a>, writer: &'a mut dyn EventWriter, root: &Value) -> Self {
        Self {
            session,
            writer,
            shared: shared_objects(root),
            anchors: HashMap::with_hasher(FixedHashState),
            in_progress: HashSet::with_hasher(FixedHashState),
            next_anchor: 1,
            depth: 0,
        }
    }

    #[inline]
    pub fn session(&self) -> Session<'a> {
        self.session
    }

    #[inline]
    pub fn settings(&self) -> &'a Settings {
        self.session.settings
    }

    /// Pushes an event to the writer.
    #[inline]
    pub fn emit(&mut self, event: Event) {
        self.writer.emit(event);
    }

    /// Writes one value.
    ///
    /// `expected` is the static type of the slot, `None` (or
    /// [`paths::ANY`]) for untyped slots. The value is tagged when its
    /// runtime type cannot be inferred from the slot.
    pub fn write_value(&mut self, value: &Value, expected: Option<&'static str>) -> Result<()> {
        let addr = value.as_object().map(|object| object.addr());

        if let Some(addr) = addr {
            if let Some(anchor) = self.anchors.get(&addr) {
                let event = Event::alias(anchor.clone());
                self.emit(event);
                return Ok(());
            }
            if self.in_progress.contains(&addr) {
                return Err(Error::CyclicGraph {
                    type_path: value.type_path(),
                });
            }
        }

        let max_depth = self.settings().max_depth;
        if self.depth >= max_depth {
            return Err(Error::DepthLimit {
                limit: max_depth,
                span: Span::default(),
            });
        }

        let Session {
            registry,
            factories,
            tags,
            schema,
            settings,
        } = self.session;

        let runtime = value.type_path();
        let info = registry.describe(runtime)?;
        let serializer = factories.resolve(info)?;

        let mut props = NodeProps::default();
        if needs_tag(value, runtime, expected) {
            props.tag = Some(tags.tag_from_type(schema, runtime));
        }
        if let Some(addr) = addr
            && settings.emit_alias
            && self.shared.contains(&addr)
        {
            let anchor = format!("id{:03}", self.next_anchor);
            self.next_anchor += 1;
            trace!("object `{runtime}` at {addr:#x} written with anchor `&{anchor}`");
            self.anchors.insert(addr, anchor.clone());
            props.anchor = Some(anchor);
        }

        if let Some(addr) = addr {
            self.in_progress.insert(addr);
        }
        self.depth += 1;
        let result = serializer.write(self, value, info, props);
        self.depth -= 1;
        if let Some(addr) = addr {
            self.in_progress.remove(&addr);
        }
        result
    }
}

fn needs_tag(value: &Value, runtime: &str, expected: Option<&'static str>) -> bool {
    if value.is_null() {
        return false;
    }
    match expected {
        Some(expected) if expected != paths::ANY => runtime != expected,
        // Untyped: whatever an untagged node reads back as needs no tag.
        _ => !matches!(
            runtime,
            paths::BOOL | paths::INT | paths::FLOAT | paths::STRING | paths::SEQUENCE | paths::MAPPING
        ),
    }
}
