use alloc::format;
use alloc::string::{String, ToString};

use vc_yaml_event::{Event, ScalarStyle};

use crate::context::{NodeProps, ReadContext, WriteContext};
use crate::error::{Error, Result, StructuralKind};
use crate::info::{ScalarKind, TypeInfo};
use crate::schema;
use crate::serializers::{SerializerFactory, ValueSerializer, shape_mismatch};
use crate::value::Value;

/// Serializer of [`PrimitiveInfo`] types, one scalar event per value.
///
/// Strings that would read back as another kind when plain (`"true"`,
/// `"12"`, the empty string...) are written double quoted.
///
/// [`PrimitiveInfo`]: crate::info::PrimitiveInfo
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimitiveSerializer;

impl SerializerFactory for PrimitiveSerializer {
    fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer> {
        info.is_primitive().then_some(self as &dyn ValueSerializer)
    }
}

impl ValueSerializer for PrimitiveSerializer {
    fn read(
        &self,
        ctx: &mut ReadContext<'_>,
        _existing: Option<Value>,
        info: &TypeInfo,
    ) -> Result<Value> {
        let primitive = info.as_primitive().map_err(|_| shape_mismatch(info))?;
        let scalar = ctx.expect_scalar()?;
        let text = scalar.value.as_str();

        let value = match primitive.kind() {
            ScalarKind::Null => schema::is_null(text).then_some(Value::Null),
            ScalarKind::Bool => schema::parse_bool(text).map(Value::Bool),
            ScalarKind::Int => schema::parse_int(text).map(Value::Int),
            ScalarKind::Float => schema::parse_float(text).map(Value::Float),
            ScalarKind::Str => Some(Value::Str(scalar.value.clone())),
        };

        value.ok_or_else(|| {
            Error::structural(
                StructuralKind::InvalidScalar,
                scalar.span,
                format!("cannot read `{text}` as {}", primitive.kind()),
            )
        })
    }

    fn write(
        &self,
        ctx: &mut WriteContext<'_>,
        value: &Value,
        info: &TypeInfo,
        props: NodeProps,
    ) -> Result<()> {
        let mut style = ScalarStyle::Plain;
        let text = match value {
            Value::Null => String::from("~"),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => schema::format_float(*v),
            Value::Str(v) => {
                if ctx.session().schema.resolve_plain(v) != ScalarKind::Str {
                    style = ScalarStyle::DoubleQuoted;
                }
                v.clone()
            }
            Value::Object(_) => return Err(shape_mismatch(info)),
        };

        let mut event = Event::scalar(text).with_scalar_style(style);
        if let Some(tag) = props.tag {
            event = event.with_tag(tag);
        }
        if let Some(anchor) = props.anchor {
            event = event.with_anchor(anchor);
        }
        ctx.emit(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use vc_yaml_event::{Event, EventStream, ScalarStyle, notation};

    use crate::error::{Result, StructuralKind};
    use crate::info::paths;
    use crate::value::Value;
    use crate::Serializer;

    fn read(text: &str, expected: &'static str) -> Result<Value> {
        let mut stream = EventStream::from(notation::parse(text).unwrap());
        Serializer::new().deserialize(&mut stream, Some(expected))
    }

    fn write(value: impl Into<Value>) -> Vec<Event> {
        Serializer::new().serialize_to_vec(&value.into(), None).unwrap()
    }

    #[test]
    fn read_by_expected_kind() {
        assert_eq!(read("=VAL :12", paths::INT).unwrap(), Value::from(12));
        assert_eq!(read("=VAL :0x1F", paths::INT).unwrap(), Value::from(31));
        assert_eq!(read("=VAL :2", paths::FLOAT).unwrap(), Value::from(2.0));
        assert_eq!(read("=VAL :True", paths::BOOL).unwrap(), Value::from(true));
        assert_eq!(read("=VAL :12", paths::STRING).unwrap(), Value::from("12"));
        assert_eq!(read("=VAL \"true", paths::BOOL).unwrap(), Value::from(true));
    }

    #[test]
    fn invalid_scalar() {
        let error = read("=VAL :twelve", paths::INT).unwrap_err();
        assert_eq!(error.structural_kind(), Some(StructuralKind::InvalidScalar));
        assert!(error.to_string().contains("cannot read `twelve` as int"));
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        let plain = write("hello");
        let quoted = write("42");
        let empty = write("");

        let style = |events: &[Event]| match &events[0] {
            Event::Scalar(scalar) => scalar.style,
            _ => panic!("expected a scalar"),
        };
        assert_eq!(style(&plain), ScalarStyle::Plain);
        assert_eq!(style(&quoted), ScalarStyle::DoubleQuoted);
        assert_eq!(style(&empty), ScalarStyle::DoubleQuoted);
    }

    #[test]
    fn write_scalars() {
        assert_eq!(notation::render(&write(Value::Null)), "=VAL :~\n");
        assert_eq!(notation::render(&write(false)), "=VAL :false\n");
        assert_eq!(notation::render(&write(-7)), "=VAL :-7\n");
        assert_eq!(notation::render(&write(1.0)), "=VAL :1.0\n");
    }
}
