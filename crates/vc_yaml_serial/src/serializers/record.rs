use alloc::format;

use vc_yaml_event::{CollectionStyle, Event};

use crate::context::{BindingSlot, NodeProps, ReadContext, ValueResult, WriteContext};
use crate::error::{Error, Result, StructuralKind};
use crate::info::{Members, TypeInfo};
use crate::serializers::{SerializerFactory, ValueSerializer, shape_mismatch};
use crate::value::{ObjectRef, Value};

/// Serializer of [`RecordInfo`] types, written as a block mapping of
/// member names to member values in declaration order.
///
/// Members missing from the document keep their current (or default)
/// value. A key that names no member is an error.
///
/// [`RecordInfo`]: crate::info::RecordInfo
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordSerializer;

impl RecordSerializer {
    /// Reads one `name: value` pair into `object`.
    pub fn read_member(
        ctx: &mut ReadContext<'_>,
        object: &ObjectRef,
        members: &Members,
        type_path: &str,
    ) -> Result<()> {
        let key = ctx.expect_scalar()?;
        let Some(member) = members.get(&key.value) else {
            return Err(Error::structural(
                StructuralKind::UnknownMember,
                key.span,
                format!("`{type_path}` has no member `{}`", key.value),
            ));
        };
        ctx.define_anchor(key.anchor, Value::Str(key.value), key.span)?;

        let current = member.get(&object.borrow());
        let current = (!current.is_null()).then_some(current);

        match ctx.read_value(current, Some(member.ty()))? {
            ValueResult::Value(value) => {
                member.set(&mut object.borrow_mut(), value);
            }
            ValueResult::Alias(alias) => {
                let slot = BindingSlot::RecordField {
                    object: object.clone(),
                    index: member.index(),
                };
                ctx.bind(alias, slot);
            }
        }
        Ok(())
    }

    /// Writes every member of `object` as `name: value` pairs.
    pub fn write_members(
        ctx: &mut WriteContext<'_>,
        object: &ObjectRef,
        members: &Members,
    ) -> Result<()> {
        for member in members.iter() {
            let value = member.get(&object.borrow());
            ctx.emit(Event::scalar(member.name()));
            ctx.write_value(&value, Some(member.ty()))?;
        }
        Ok(())
    }
}

impl SerializerFactory for RecordSerializer {
    fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer> {
        info.is_record().then_some(self as &dyn ValueSerializer)
    }
}

impl ValueSerializer for RecordSerializer {
    fn read(
        &self,
        ctx: &mut ReadContext<'_>,
        existing: Option<Value>,
        info: &TypeInfo,
    ) -> Result<Value> {
        let record_info = info.as_record().map_err(|_| shape_mismatch(info))?;
        ctx.expect_mapping_start()?;

        let members = record_info.members();
        let reusable = |object: &ObjectRef| {
            object
                .borrow()
                .fields()
                .is_some_and(|fields| fields.len() == members.len())
        };
        let object = match existing.as_ref().and_then(Value::as_object) {
            Some(object) if reusable(object) => object.clone(),
            _ => ObjectRef::new(record_info.create(ctx.session().registry)),
        };

        while !ctx.accept_mapping_end()? {
            Self::read_member(ctx, &object, members, info.type_path())?;
        }
        Ok(Value::Object(object))
    }

    fn write(
        &self,
        ctx: &mut WriteContext<'_>,
        value: &Value,
        info: &TypeInfo,
        props: NodeProps,
    ) -> Result<()> {
        let record_info = info.as_record().map_err(|_| shape_mismatch(info))?;
        let object = value.as_object().ok_or_else(|| shape_mismatch(info))?;

        let mut start = Event::mapping_start().with_style(CollectionStyle::Block);
        if let Some(tag) = props.tag {
            start = start.with_tag(tag);
        }
        if let Some(anchor) = props.anchor {
            start = start.with_anchor(anchor);
        }
        ctx.emit(start);
        Self::write_members(ctx, object, record_info.members())?;
        ctx.emit(Event::mapping_end());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use vc_yaml_event::{EventStream, notation};

    use crate::error::{Error, StructuralKind};
    use crate::info::{MemberInfo, RecordInfo, paths};
    use crate::value::{Object, ObjectRef, Record, Value};
    use crate::Serializer;

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

    fn field(value: &Value, index: usize) -> Value {
        let object = value.as_object().unwrap().borrow();
        object.fields().unwrap().get(index).unwrap().clone()
    }

    #[test]
    fn missing_members_keep_defaults() {
        let mut stream =
            EventStream::from(notation::parse("+MAP\n=VAL :y\n=VAL :4\n-MAP").unwrap());
        let point = serializer().deserialize(&mut stream, Some(POINT)).unwrap();

        assert_eq!(point.type_path(), POINT);
        assert_eq!(field(&point, 0), Value::from(0));
        assert_eq!(field(&point, 1), Value::from(4));
    }

    #[test]
    fn unknown_member() {
        let mut stream =
            EventStream::from(notation::parse("+MAP\n=VAL :z\n=VAL :4\n-MAP").unwrap());
        let error = serializer().deserialize(&mut stream, Some(POINT)).unwrap_err();

        assert_eq!(error.structural_kind(), Some(StructuralKind::UnknownMember));
        assert!(error.to_string().contains("`game::Point` has no member `z`"));
        let Error::Structural { span, .. } = error else {
            panic!("expected a structural error");
        };
        assert_eq!(span.start.line, 1);
    }

    #[test]
    fn self_reference_through_forward_alias() {
        let text = "
            +MAP &n
            =VAL :name
            =VAL :loop
            =VAL :next
            =ALI *n
            -MAP
        ";
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        let node = serializer().deserialize(&mut stream, Some(NODE)).unwrap();

        assert_eq!(field(&node, 0), Value::from("loop"));
        assert_eq!(field(&node, 1), node);
    }

    #[test]
    fn write_in_declaration_order() {
        let mut stream = EventStream::from(
            notation::parse("+MAP {}\n=VAL :y\n=VAL :2\n=VAL :x\n=VAL :1\n-MAP").unwrap(),
        );
        let serializer = serializer();
        let point = serializer.deserialize(&mut stream, Some(POINT)).unwrap();

        let events = serializer.serialize_to_vec(&point, None).unwrap();
        assert_eq!(
            notation::render(&events),
            "+MAP <!game::Point>\n=VAL :x\n=VAL :1\n=VAL :y\n=VAL :2\n-MAP\n"
        );
    }

    #[test]
    fn read_into_existing_record() {
        let serializer = serializer();
        let text = "+MAP\n=VAL :x\n=VAL :1\n=VAL :y\n=VAL :2\n-MAP";

        let full = ObjectRef::new(Object::record(POINT, Record::from(vec![Value::from(0); 2])));
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        let point = serializer
            .deserialize_into(&mut stream, full.clone().into(), Some(POINT))
            .unwrap();
        assert_eq!(point, Value::from(full));
        assert_eq!(field(&point, 1), Value::from(2));

        // An object missing fields is replaced, not written partially.
        let short = ObjectRef::new(Object::record(POINT, Record::from(vec![Value::from(0)])));
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        let point = serializer
            .deserialize_into(&mut stream, short.clone().into(), Some(POINT))
            .unwrap();
        assert_ne!(point, Value::from(short));
        assert_eq!(field(&point, 0), Value::from(1));
        assert_eq!(field(&point, 1), Value::from(2));
    }

    #[test]
    fn anchored_member_name() {
        let text = "
            +SEQ
            +MAP <!game::Point>
            =VAL &k :x
            =VAL :1
            -MAP
            =ALI *k
            -SEQ
        ";
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        let sequence = serializer().deserialize(&mut stream, None).unwrap();

        let object = sequence.as_object().unwrap().borrow();
        let items = object.as_array().unwrap();
        assert_eq!(field(items.get(0).unwrap(), 0), Value::from(1));
        assert_eq!(items.get(1), Some(&Value::from("x")));
    }
}
