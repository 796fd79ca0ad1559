use alloc::vec::Vec;
use core::cmp::Ordering;

use vc_yaml_event::{CollectionStyle, Event};

use crate::context::{NodeProps, ReadContext, WriteContext, is_plain_null};
use crate::error::Result;
use crate::info::{DictionaryInfo, TypeInfo};
use crate::serializers::{RecordSerializer, SerializerFactory, ValueSerializer, shape_mismatch};
use crate::value::{Dictionary, ObjectRef, Value};

// -----------------------------------------------------------------------------
// Helpers

fn mapping_start(props: NodeProps) -> Event {
    let mut start = Event::mapping_start().with_style(CollectionStyle::Block);
    if let Some(tag) = props.tag {
        start = start.with_tag(tag);
    }
    if let Some(anchor) = props.anchor {
        start = start.with_anchor(anchor);
    }
    start
}

/// The dictionary object to read into: `existing` if it is one with a
/// field per member, else a new one.
fn target(ctx: &ReadContext<'_>, existing: Option<Value>, info: &DictionaryInfo) -> ObjectRef {
    let reusable = |object: &ObjectRef| {
        object
            .borrow()
            .as_dictionary()
            .is_some_and(|entries| entries.fields().len() == info.members().len())
    };
    match existing {
        Some(Value::Object(object)) if reusable(&object) => object,
        _ => ObjectRef::new(info.create(ctx.session().registry)),
    }
}

fn key_rank(key: &Value) -> u8 {
    match key {
        Value::Bool(_) => 0,
        Value::Int(_) | Value::Float(_) => 1,
        Value::Str(_) => 2,
        _ => 3,
    }
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    a.natural_cmp(b)
        .unwrap_or_else(|| key_rank(a).cmp(&key_rank(b)))
}

// -----------------------------------------------------------------------------
// PureDictionarySerializer

/// Serializer of dictionaries without named members.
///
/// Written as a block mapping of the pairs. With
/// [`Settings::sort_key_for_mapping`] the keys are written in their
/// natural order: booleans, then numbers, then strings; other keys keep
/// their insertion order after them.
///
/// Reading into an existing dictionary merges the pairs into it.
///
/// [`Settings::sort_key_for_mapping`]: crate::settings::Settings::sort_key_for_mapping
#[derive(Debug, Default, Clone, Copy)]
pub struct PureDictionarySerializer;

impl PureDictionarySerializer {
    /// Reads `key: value` pairs into `dictionary` up to and including the
    /// mapping end.
    pub fn read_pairs(
        ctx: &mut ReadContext<'_>,
        dictionary: &ObjectRef,
        info: &DictionaryInfo,
    ) -> Result<()> {
        while !ctx.accept_mapping_end()? {
            let key = ctx.read_value(None, Some(info.key()))?;
            let current = key.as_value().and_then(|key| {
                dictionary
                    .borrow()
                    .as_dictionary()
                    .and_then(|entries| entries.get(key))
                    .cloned()
            });
            let value = ctx.read_value(current, Some(info.value()))?;
            ctx.insert_pair(dictionary, key, value);
        }
        Ok(())
    }

    /// Writes the pairs of `dictionary`, sorted if the settings ask for it.
    pub fn write_pairs(
        ctx: &mut WriteContext<'_>,
        dictionary: &ObjectRef,
        info: &DictionaryInfo,
    ) -> Result<()> {
        let mut entries: Vec<(Value, Value)> = dictionary
            .borrow()
            .as_dictionary()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if ctx.settings().sort_key_for_mapping {
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
        }

        for (key, value) in &entries {
            ctx.write_value(key, Some(info.key()))?;
            ctx.write_value(value, Some(info.value()))?;
        }
        Ok(())
    }
}

impl SerializerFactory for PureDictionarySerializer {
    fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer> {
        let dictionary = info.as_dictionary().ok()?;
        dictionary.is_pure().then_some(self as &dyn ValueSerializer)
    }
}

impl ValueSerializer for PureDictionarySerializer {
    fn read(
        &self,
        ctx: &mut ReadContext<'_>,
        existing: Option<Value>,
        info: &TypeInfo,
    ) -> Result<Value> {
        let dictionary_info = info.as_dictionary().map_err(|_| shape_mismatch(info))?;
        ctx.expect_mapping_start()?;

        let dictionary = target(ctx, existing, dictionary_info);
        Self::read_pairs(ctx, &dictionary, dictionary_info)?;
        Ok(Value::Object(dictionary))
    }

    fn write(
        &self,
        ctx: &mut WriteContext<'_>,
        value: &Value,
        info: &TypeInfo,
        props: NodeProps,
    ) -> Result<()> {
        let dictionary_info = info.as_dictionary().map_err(|_| shape_mismatch(info))?;
        let dictionary = value.as_object().ok_or_else(|| shape_mismatch(info))?;

        ctx.emit(mapping_start(props));
        Self::write_pairs(ctx, dictionary, dictionary_info)?;
        ctx.emit(Event::mapping_end());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// DictionarySerializer

/// Serializer of dictionaries with named members.
///
/// The members are written like a record's, followed by the pairs as a
/// nested mapping under [`Settings::special_collection_member`]:
///
/// ```text
/// owner: Ada
/// ~Items:
///   bow: 2
///   sword: 1
/// ```
///
/// The reserved key is always written, with an empty flow mapping if
/// there are no pairs. On read it may also hold a null. Dictionaries without
/// members are handed to [`PureDictionarySerializer`].
///
/// [`Settings::special_collection_member`]: crate::settings::Settings::special_collection_member
#[derive(Debug, Default, Clone, Copy)]
pub struct DictionarySerializer;

impl SerializerFactory for DictionarySerializer {
    fn try_create(&self, info: &TypeInfo) -> Option<&dyn ValueSerializer> {
        info.is_dictionary().then_some(self as &dyn ValueSerializer)
    }
}

impl ValueSerializer for DictionarySerializer {
    fn read(
        &self,
        ctx: &mut ReadContext<'_>,
        existing: Option<Value>,
        info: &TypeInfo,
    ) -> Result<Value> {
        let dictionary_info = info.as_dictionary().map_err(|_| shape_mismatch(info))?;
        if dictionary_info.is_pure() {
            return PureDictionarySerializer.read(ctx, existing, info);
        }
        ctx.expect_mapping_start()?;

        let dictionary = target(ctx, existing, dictionary_info);
        let reserved = ctx.settings().special_collection_member.as_str();

        while !ctx.accept_mapping_end()? {
            let is_reserved = matches!(
                ctx.peek(),
                Some(Event::Scalar(key))
                    if key.tag.is_none() && key.style.is_plain() && key.value == reserved
            );
            if !is_reserved {
                RecordSerializer::read_member(
                    ctx,
                    &dictionary,
                    dictionary_info.members(),
                    info.type_path(),
                )?;
                continue;
            }

            let key = ctx.expect_scalar()?;
            ctx.define_anchor(key.anchor, Value::Str(key.value), key.span)?;

            let no_pairs = matches!(ctx.peek(), Some(Event::Scalar(value)) if is_plain_null(value));
            if no_pairs {
                let null = ctx.expect_scalar()?;
                ctx.define_anchor(null.anchor, Value::Null, null.span)?;
            } else {
                let start = ctx.expect_mapping_start()?;
                PureDictionarySerializer::read_pairs(ctx, &dictionary, dictionary_info)?;
                ctx.define_anchor(start.anchor, Value::Object(dictionary.clone()), start.span)?;
            }
        }
        Ok(Value::Object(dictionary))
    }

    fn write(
        &self,
        ctx: &mut WriteContext<'_>,
        value: &Value,
        info: &TypeInfo,
        props: NodeProps,
    ) -> Result<()> {
        let dictionary_info = info.as_dictionary().map_err(|_| shape_mismatch(info))?;
        if dictionary_info.is_pure() {
            return PureDictionarySerializer.write(ctx, value, info, props);
        }
        let dictionary = value.as_object().ok_or_else(|| shape_mismatch(info))?;

        ctx.emit(mapping_start(props));
        RecordSerializer::write_members(ctx, dictionary, dictionary_info.members())?;

        let reserved = ctx.settings().special_collection_member.clone();
        ctx.emit(Event::scalar(reserved));
        let is_empty = dictionary
            .borrow()
            .as_dictionary()
            .is_none_or(Dictionary::is_empty);
        let style = if is_empty {
            CollectionStyle::Flow
        } else {
            CollectionStyle::Block
        };
        ctx.emit(Event::mapping_start().with_style(style));
        PureDictionarySerializer::write_pairs(ctx, dictionary, dictionary_info)?;
        ctx.emit(Event::mapping_end());

        ctx.emit(Event::mapping_end());
        Ok(())
    }
}
