use alloc::boxed::Box;
use alloc::vec::Vec;

use log::debug;
use vc_yaml_event::{Event, EventReader, EventWriter};

use crate::context::{ReadContext, Session, WriteContext};
use crate::error::Result;
use crate::export::ExportDriver;
use crate::registry::{TagTypeRegistry, TypeRegistry};
use crate::schema::{CoreSchema, Schema};
use crate::serializers::SerializerFactories;
use crate::settings::Settings;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Serializer

/// The entry point: converts between event streams and object graphs.
///
/// Holds everything that outlives a single document: the type registry,
/// the tag registry, the serializer factories, the settings and the
/// schema. Each call to [`serialize`](Self::serialize) or
/// [`deserialize`](Self::deserialize) creates a fresh context, so anchors
/// and tag caches never leak from one document to the next.
///
/// # Examples
///
/// ```
/// use vc_yaml_event::{EventStream, notation};
/// use vc_yaml_serial::Serializer;
/// use vc_yaml_serial::info::{paths, MemberInfo, RecordInfo};
///
/// let mut serializer = Serializer::new();
/// serializer.registry_mut().register(RecordInfo::new("game::Point", &[
///     MemberInfo::new("x", paths::INT),
///     MemberInfo::new("y", paths::INT),
/// ]));
///
/// let mut stream = EventStream::from(notation::parse("
///     +MAP
///     =VAL :x
///     =VAL :3
///     -MAP
/// ").unwrap());
/// let point = serializer.deserialize(&mut stream, Some("game::Point")).unwrap();
///
/// let events = serializer.serialize_to_vec(&point, Some("game::Point")).unwrap();
/// assert_eq!(
///     notation::render(&events),
///     "+MAP\n=VAL :x\n=VAL :3\n=VAL :y\n=VAL :0\n-MAP\n",
/// );
/// ```
pub struct Serializer {
    registry: TypeRegistry,
    tags: TagTypeRegistry,
    factories: SerializerFactories,
    settings: Settings,
    schema: Box<dyn Schema>,
}

impl Default for Serializer {
    /// See [`Serializer::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer {
    /// Create a serializer with default settings.
    ///
    /// The registry holds the built-in types and every type submitted
    /// with [`auto_register!`](crate::auto_register), the factories are
    /// [`SerializerFactories::new`] and the schema is [`CoreSchema`].
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create a serializer with the given settings, see [`Serializer::new`].
    pub fn with_settings(settings: Settings) -> Self {
        let mut registry = TypeRegistry::new();
        if !registry.auto_register() {
            debug!("automatic type registration is unavailable");
        }
        Self {
            registry,
            tags: TagTypeRegistry::new(),
            factories: SerializerFactories::new(),
            settings,
            schema: Box::new(CoreSchema),
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    #[inline]
    pub fn tags(&self) -> &TagTypeRegistry {
        &self.tags
    }

    #[inline]
    pub fn tags_mut(&mut self) -> &mut TagTypeRegistry {
        &mut self.tags
    }

    #[inline]
    pub fn factories(&self) -> &SerializerFactories {
        &self.factories
    }

    #[inline]
    pub fn factories_mut(&mut self) -> &mut SerializerFactories {
        &mut self.factories
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    #[inline]
    pub fn schema(&self) -> &dyn Schema {
        &*self.schema
    }

    pub fn set_schema(&mut self, schema: impl Schema + 'static) {
        self.schema = Box::new(schema);
    }

    /// The state borrowed by the contexts of one document.
    pub fn session(&self) -> Session<'_> {
        Session {
            registry: &self.registry,
            tags: &self.tags,
            factories: &self.factories,
            settings: &self.settings,
            schema: &*self.schema,
        }
    }

    // -------------------------------------------------------------------------
    // Write

    /// Writes `value` as one document.
    ///
    /// `expected` is the type the reader will expect for the root, the
    /// root is tagged if its runtime type differs.
    pub fn serialize(
        &self,
        value: &Value,
        expected: Option<&'static str>,
        writer: &mut dyn EventWriter,
    ) -> Result<()> {
        let mut ctx = WriteContext::new(self.session(), writer, value);
        ctx.write_value(value, expected)
    }

    /// [`serialize`](Self::serialize) into a new event list.
    pub fn serialize_to_vec(
        &self,
        value: &Value,
        expected: Option<&'static str>,
    ) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        self.serialize(value, expected, &mut events)?;
        Ok(events)
    }

    // -------------------------------------------------------------------------
    // Read

    /// Reads one document.
    ///
    /// Fails if an alias is still unresolved at the end of the root node,
    /// or if events are left after it.
    pub fn deserialize(
        &self,
        reader: &mut dyn EventReader,
        expected: Option<&'static str>,
    ) -> Result<Value> {
        let mut ctx = ReadContext::new(self.session(), reader);
        let root = ctx.read_value(None, expected)?;
        ctx.finish(root)
    }

    /// Reads one document into `existing`.
    ///
    /// Containers of the read type are filled in place, see the
    /// serializers for what that means per shape. Returns the root, which
    /// is `existing` itself when it could be reused.
    pub fn deserialize_into(
        &self,
        reader: &mut dyn EventReader,
        existing: Value,
        expected: Option<&'static str>,
    ) -> Result<Value> {
        let mut ctx = ReadContext::new(self.session(), reader);
        let root = ctx.read_value(Some(existing), expected)?;
        ctx.finish(root)
    }

    // -------------------------------------------------------------------------
    // Export

    /// A [`serde_core::Serialize`] view of `value`, for data formats other
    /// than YAML events.
    #[inline]
    pub fn export<'a>(&'a self, value: &'a Value) -> ExportDriver<'a> {
        ExportDriver::new(value, &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use vc_yaml_event::{EventStream, notation};

    use super::Serializer;
    use crate::error::{Error, Result, StructuralKind};
    use crate::info::{MemberInfo, RecordInfo, paths};
    use crate::settings::UnknownTagPolicy;
    use crate::value::{FixedArray, Object, ObjectRef, Record, Value};

    const POINT: &str = "game::Point";
    const NODE: &str = "game::Node";

    fn serializer() -> Serializer {
        let mut serializer = Serializer::new();
        let registry = serializer.registry_mut();
        registry.register(RecordInfo::new(
            POINT,
            &[MemberInfo::new("x", paths::INT), MemberInfo::new("y", paths::INT)],
        ));
        registry.register(RecordInfo::new(
            NODE,
            &[MemberInfo::new("name", paths::STRING), MemberInfo::new("next", NODE)],
        ));
        serializer
    }

    fn read(serializer: &Serializer, text: &str, expected: Option<&'static str>) -> Result<Value> {
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        serializer.deserialize(&mut stream, expected)
    }

    fn write(
        serializer: &Serializer,
        value: &Value,
        expected: Option<&'static str>,
    ) -> Result<String> {
        serializer
            .serialize_to_vec(value, expected)
            .map(|events| notation::render(&events))
    }

    fn node(name: &str) -> ObjectRef {
        ObjectRef::new(Object::record(
            NODE,
            Record::from(alloc::vec![Value::from(name), Value::Null]),
        ))
    }

    fn link(from: &ObjectRef, to: &ObjectRef) {
        *from.borrow_mut().fields_mut().unwrap().get_mut(1).unwrap() = to.clone().into();
    }

    fn next(value: &Value) -> Value {
        value.as_object().unwrap().borrow().fields().unwrap().get(1).unwrap().clone()
    }

    // -------------------------------------------------------------------------
    // Aliases

    #[test]
    fn cycle_written_with_anchor() {
        let serializer = serializer();
        let (a, b) = (node("a"), node("b"));
        link(&a, &b);
        link(&b, &a);

        let text = write(&serializer, &a.clone().into(), Some(NODE)).unwrap();
        assert_eq!(
            text,
            "+MAP &id001\n=VAL :name\n=VAL :a\n=VAL :next\n\
             +MAP\n=VAL :name\n=VAL :b\n=VAL :next\n=ALI *id001\n-MAP\n-MAP\n"
        );

        let back = read(&serializer, &text, Some(NODE)).unwrap();
        assert_eq!(next(&next(&back)), back);
    }

    #[test]
    fn cycle_without_aliases_is_an_error() {
        let mut serializer = serializer();
        serializer.settings_mut().emit_alias = false;
        let a = node("a");
        link(&a, &a);

        let error = write(&serializer, &a.into(), Some(NODE)).unwrap_err();
        assert_eq!(error, Error::CyclicGraph { type_path: NODE });
    }

    #[test]
    fn shared_object_without_aliases_is_duplicated() {
        let mut serializer = serializer();
        serializer.settings_mut().emit_alias = false;
        let leaf = node("leaf");
        let root = ObjectRef::new(Object::array(
            paths::SEQUENCE,
            FixedArray::from(alloc::vec![Value::from(leaf.clone()), Value::from(leaf)]),
        ));

        let text = write(&serializer, &root.into(), None).unwrap();
        assert!(!text.contains('&'));

        let back = read(&serializer, &text, None).unwrap();
        let items = back.as_object().unwrap().borrow().as_array().unwrap().as_slice().to_vec();
        assert_eq!(items.len(), 2);
        assert_ne!(items[0], items[1]);
        assert_eq!(items[0].type_path(), NODE);
    }

    #[test]
    fn backward_alias_shares_the_object() {
        let text = "
            +SEQ
            +MAP &p <!point>
            =VAL :x
            =VAL :1
            -MAP
            =ALI *p
            -SEQ
        ";
        let mut serializer = serializer();
        serializer.tags_mut().add_tag_alias("!point", POINT);

        let back = read(&serializer, text, None).unwrap();
        let items = back.as_object().unwrap().borrow().as_array().unwrap().as_slice().to_vec();
        assert_eq!(items[0], items[1]);
        assert_eq!(items[0].type_path(), POINT);
    }

    #[test]
    fn alias_never_defined() {
        let error = read(&serializer(), "+SEQ\n=ALI *nowhere\n=ALI *nowhere\n-SEQ", None).unwrap_err();
        let Error::UnresolvedAlias { anchor, pending, span } = error else {
            panic!("expected an unresolved alias");
        };
        assert_eq!(anchor, "nowhere");
        assert_eq!(pending, 2);
        assert_eq!(span.start.line, 1);

        let root = read(&serializer(), "=ALI *root", None).unwrap_err();
        assert!(matches!(root, Error::UnresolvedAlias { pending: 1, .. }));
    }

    #[test]
    fn duplicate_anchor() {
        let text = "+SEQ\n=VAL &a :1\n=VAL &a :2\n-SEQ";
        let error = read(&serializer(), text, None).unwrap_err();
        assert_eq!(error.structural_kind(), Some(StructuralKind::DuplicateAnchor));
    }

    // -------------------------------------------------------------------------
    // Tags

    #[test]
    fn untyped_slots_are_tagged() {
        let serializer = serializer();
        let text = "+SEQ []\n+MAP <!game::Point>\n=VAL :x\n=VAL :1\n=VAL :y\n=VAL :2\n-MAP\n=VAL :plain\n-SEQ\n";
        let sequence = read(&serializer, text, None).unwrap();

        assert_eq!(write(&serializer, &sequence, None).unwrap(), text);
    }

    #[test]
    fn tag_overrides_expected_type() {
        let serializer = serializer();
        let point = ObjectRef::new(Object::record(
            POINT,
            Record::from(alloc::vec![Value::from("one"), Value::from(2)]),
        ));

        let text = write(&serializer, &point.into(), Some(POINT)).unwrap();
        assert_eq!(text, "+MAP\n=VAL :x\n=VAL <!!str> :one\n=VAL :y\n=VAL :2\n-MAP\n");

        let back = read(&serializer, &text, Some(POINT)).unwrap();
        let object = back.as_object().unwrap().borrow();
        assert_eq!(object.fields().unwrap().get(0), Some(&Value::from("one")));
    }

    #[test]
    fn unknown_tag_policy() {
        let text = "+MAP <!game::Missing>\n=VAL :x\n=VAL :1\n-MAP";
        let mut serializer = serializer();

        let point = read(&serializer, text, Some(POINT)).unwrap();
        assert_eq!(point.type_path(), POINT);

        serializer.settings_mut().unknown_tag = UnknownTagPolicy::Error;
        let error = read(&serializer, text, Some(POINT)).unwrap_err();
        assert!(matches!(error, Error::UnknownTag { ref tag, .. } if tag == "!game::Missing"));
    }

    // -------------------------------------------------------------------------
    // Structure

    #[test]
    fn trailing_event() {
        let error = read(&serializer(), "=VAL :1\n=VAL :2", None).unwrap_err();
        assert_eq!(error.structural_kind(), Some(StructuralKind::TrailingEvent));
    }

    #[test]
    fn unterminated_sequence() {
        let error = read(&serializer(), "+SEQ\n=VAL :1", None).unwrap_err();
        assert_eq!(error.structural_kind(), Some(StructuralKind::UnexpectedEnd));
    }

    #[test]
    fn depth_limit() {
        let mut serializer = serializer();
        serializer.settings_mut().max_depth = 2;

        let error = read(&serializer, "+SEQ\n+SEQ\n+SEQ\n-SEQ\n-SEQ\n-SEQ", None).unwrap_err();
        assert!(matches!(error, Error::DepthLimit { limit: 2, .. }));
        assert!(read(&serializer, "+SEQ\n+SEQ\n-SEQ\n-SEQ", None).is_ok());
    }

    #[test]
    fn unregistered_type() {
        let error = read(&serializer(), "+MAP\n-MAP", Some("game::Missing")).unwrap_err();
        assert_eq!(error, Error::UnsupportedShape("game::Missing".to_string()));
    }

    #[test]
    fn plain_null_in_typed_slot() {
        let back = read(&serializer(), "+MAP\n=VAL :name\n=VAL :~\n-MAP", Some(NODE)).unwrap();
        let object = back.as_object().unwrap().borrow();
        assert_eq!(object.fields().unwrap().get(0), Some(&Value::Null));
    }
}
