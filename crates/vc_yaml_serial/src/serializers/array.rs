use alloc::format;
use alloc::vec::Vec;

use vc_yaml_event::{CollectionStyle, Event};

use crate::context::{BindingSlot, NodeProps, ReadContext, ValueResult, WriteContext};
use crate::error::{Error, Result, StructuralKind};
use crate::info::{ArrayInfo, TypeInfo};
use crate::serializers::{SerializerFactory, ValueSerializer, shape_mismatch};
use crate::value::{ObjectRef, Value};

/// Serializer of [`ArrayInfo`] types, written as sequences.
///
/// Reading into an existing array writes its slots in place: slots past
/// the last element keep their value and more elements than slots is an
/// error. Otherwise the elements are buffered and the array is created
/// with their count.
///
/// Sequences shorter than [`Settings::limit_flow_sequence`] are written
/// in flow style.
///
/// [`Settings::limit_flow_sequence`]: crate::settings::Settings::limit_flow_sequence
#[derive(Debug, Default, Clone, Copy)]
pub struct ArraySerializer;

impl SerializerFactory for ArraySerializer {
    fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer> {
        info.is_array().then_some(self as &dyn ValueSerializer)
    }
}

impl ValueSerializer for ArraySerializer {
    fn read(
        &self,
        ctx: &mut ReadContext<'_>,
        existing: Option<Value>,
        info: &TypeInfo,
    ) -> Result<Value> {
        let array_info = info.as_array().map_err(|_| shape_mismatch(info))?;
        ctx.expect_sequence_start()?;

        let target = existing
            .as_ref()
            .and_then(Value::as_object)
            .filter(|object| object.borrow().as_array().is_some())
            .cloned();

        let array = match target {
            Some(array) => {
                read_in_place(ctx, &array, array_info)?;
                array
            }
            None => read_new(ctx, array_info)?,
        };
        Ok(Value::Object(array))
    }

    fn write(
        &self,
        ctx: &mut WriteContext<'_>,
        value: &Value,
        info: &TypeInfo,
        props: NodeProps,
    ) -> Result<()> {
        let array_info = info.as_array().map_err(|_| shape_mismatch(info))?;
        let items: Vec<Value> = value
            .as_object()
            .and_then(|object| object.borrow().as_array().map(|array| array.as_slice().to_vec()))
            .ok_or_else(|| shape_mismatch(info))?;

        let style = if items.len() < ctx.settings().limit_flow_sequence {
            CollectionStyle::Flow
        } else {
            CollectionStyle::Block
        };

        let mut start = Event::sequence_start().with_style(style);
        if let Some(tag) = props.tag {
            start = start.with_tag(tag);
        }
        if let Some(anchor) = props.anchor {
            start = start.with_anchor(anchor);
        }
        ctx.emit(start);

        for item in &items {
            ctx.write_value(item, Some(array_info.item()))?;
        }

        ctx.emit(Event::sequence_end());
        Ok(())
    }
}

fn read_in_place(ctx: &mut ReadContext<'_>, array: &ObjectRef, info: &ArrayInfo) -> Result<()> {
    let len = array.borrow().as_array().map_or(0, |items| items.len());
    let mut index = 0;

    while !ctx.accept_sequence_end()? {
        if index >= len {
            return Err(Error::structural(
                StructuralKind::CapacityExceeded,
                ctx.peek_span(),
                format!(
                    "unable to deserialize array, current number of elements [{}] exceeds array size [{len}]",
                    index + 1
                ),
            ));
        }

        let current = array
            .borrow()
            .as_array()
            .and_then(|items| items.get(index))
            .cloned();

        match ctx.read_value(current, Some(info.item()))? {
            ValueResult::Value(value) => {
                if let Some(items) = array.borrow_mut().as_array_mut() {
                    items.set(index, value);
                }
            }
            ValueResult::Alias(alias) => {
                let slot = BindingSlot::ArrayIndex {
                    array: array.clone(),
                    index,
                };
                ctx.bind(alias, slot);
            }
        }
        index += 1;
    }
    Ok(())
}

fn read_new(ctx: &mut ReadContext<'_>, info: &ArrayInfo) -> Result<ObjectRef> {
    let mut results = Vec::new();
    while !ctx.accept_sequence_end()? {
        results.push(ctx.read_value(None, Some(info.item()))?);
    }

    let array = ObjectRef::new(info.create(results.len()));
    let mut aliases = Vec::new();
    {
        let mut object = array.borrow_mut();
        if let Some(items) = object.as_array_mut() {
            for (index, result) in results.into_iter().enumerate() {
                match result {
                    ValueResult::Value(value) => {
                        items.set(index, value);
                    }
                    ValueResult::Alias(alias) => aliases.push((index, alias)),
                }
            }
        }
    }

    // Bindings to anchors defined later in this sequence apply at once,
    // so the array must not be borrowed here.
    for (index, alias) in aliases {
        let slot = BindingSlot::ArrayIndex {
            array: array.clone(),
            index,
        };
        ctx.bind(alias, slot);
    }
    Ok(array)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use vc_yaml_event::{EventStream, notation};

    use crate::error::{Result, StructuralKind};
    use crate::info::{ArrayInfo, paths};
    use crate::value::{FixedArray, Object, ObjectRef, Value};
    use crate::Serializer;

    const ROW: &str = "game::Row";

    fn serializer() -> Serializer {
        let mut serializer = Serializer::new();
        serializer.registry_mut().register(ArrayInfo::new(ROW, paths::INT));
        serializer
    }

    fn read_into(serializer: &Serializer, text: &str, existing: &ObjectRef) -> Result<Value> {
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        serializer.deserialize_into(&mut stream, existing.clone().into(), Some(ROW))
    }

    fn row(items: &[i64]) -> ObjectRef {
        let items: FixedArray = items.iter().copied().map(Value::from).collect();
        ObjectRef::new(Object::array(ROW, items))
    }

    fn items(value: &Value) -> vec::Vec<Value> {
        value.as_object().unwrap().borrow().as_array().unwrap().as_slice().to_vec()
    }

    #[test]
    fn read_creates_array_of_read_length() {
        let mut stream = EventStream::from(
            notation::parse("+SEQ []\n=VAL :1\n=VAL :2\n=VAL :3\n-SEQ").unwrap(),
        );
        let value = serializer().deserialize(&mut stream, Some(ROW)).unwrap();
        assert_eq!(value.type_path(), ROW);
        assert_eq!(items(&value), vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn read_into_keeps_trailing_slots() {
        let serializer = serializer();
        let existing = row(&[7, 8, 9]);

        let value = read_into(&serializer, "+SEQ\n=VAL :1\n=VAL :2\n-SEQ", &existing).unwrap();
        assert_eq!(value, Value::from(existing.clone()));
        assert_eq!(items(&value), vec![Value::from(1), Value::from(2), Value::from(9)]);

        read_into(&serializer, "+SEQ\n=VAL :4\n=VAL :5\n=VAL :6\n-SEQ", &existing).unwrap();
        assert_eq!(items(&existing.into()), vec![Value::from(4), Value::from(5), Value::from(6)]);
    }

    #[test]
    fn read_into_capacity_exceeded() {
        let existing = row(&[0, 0]);
        let error = read_into(
            &serializer(),
            "+SEQ\n=VAL :1\n=VAL :2\n=VAL :3\n-SEQ",
            &existing,
        )
        .unwrap_err();

        assert_eq!(error.structural_kind(), Some(StructuralKind::CapacityExceeded));
        assert!(error.to_string().contains(
            "unable to deserialize array, current number of elements [3] exceeds array size [2]"
        ));
    }

    #[test]
    fn alias_before_anchor_in_one_sequence() {
        let mut stream = EventStream::from(
            notation::parse("+SEQ\n=ALI *a\n=VAL &a :5\n-SEQ").unwrap(),
        );
        let value = serializer().deserialize(&mut stream, Some(ROW)).unwrap();
        assert_eq!(items(&value), vec![Value::from(5), Value::from(5)]);
    }

    #[test]
    fn flow_below_limit() {
        let mut serializer = serializer();
        serializer.settings_mut().limit_flow_sequence = 3;

        let short = serializer.serialize_to_vec(&row(&[1, 2]).into(), Some(ROW)).unwrap();
        assert_eq!(notation::render(&short), "+SEQ []\n=VAL :1\n=VAL :2\n-SEQ\n");

        let long = serializer.serialize_to_vec(&row(&[1, 2, 3]).into(), Some(ROW)).unwrap();
        assert_eq!(
            notation::render(&long),
            "+SEQ\n=VAL :1\n=VAL :2\n=VAL :3\n-SEQ\n"
        );
    }

    #[test]
    fn round_trip_in_both_styles() {
        let mut serializer = serializer();
        let original = row(&[3, 1, 4, 1, 5]);

        for limit in [2, 10] {
            serializer.settings_mut().limit_flow_sequence = limit;
            let events = serializer.serialize_to_vec(&original.clone().into(), Some(ROW)).unwrap();
            assert_eq!(notation::render(&events).starts_with("+SEQ []"), limit > 5);

            let mut stream = EventStream::new(events);
            let copy = serializer.deserialize(&mut stream, Some(ROW)).unwrap();
            assert_ne!(copy, Value::from(original.clone()));
            assert_eq!(items(&copy), items(&original.clone().into()));
        }
    }

    #[test]
    fn alias_into_sibling_sequence() {
        let text = "
            +SEQ
            +SEQ []
            =VAL :A
            =ALI *a1
            -SEQ
            +SEQ []
            =VAL &a1 :B
            -SEQ
            -SEQ
        ";
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        let outer = serializer().deserialize(&mut stream, None).unwrap();

        let rows = items(&outer);
        assert_eq!(items(&rows[0]), vec![Value::from("A"), Value::from("B")]);
        assert_eq!(items(&rows[1]), vec![Value::from("B")]);
    }
}
