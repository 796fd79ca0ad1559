//! Serialization settings.

use alloc::string::String;

use serde::{Deserialize, Serialize};

/// What to do with a tag that resolves to no known type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnknownTagPolicy {
    /// Log a warning and read the node as its expected type.
    #[default]
    Ignore,
    /// Fail with [`Error::UnknownTag`](crate::Error::UnknownTag).
    Error,
}

/// Settings shared by every read and write of a [`Serializer`].
///
/// Missing fields take their default value when deserialized, so a
/// settings file only needs the fields it changes.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::settings::Settings;
///
/// let settings: Settings = serde_json::from_str(r#"{ "limit_flow_sequence": 4 }"#).unwrap();
/// assert_eq!(settings.limit_flow_sequence, 4);
/// assert!(settings.sort_key_for_mapping);
/// assert_eq!(settings.special_collection_member, "~Items");
/// ```
///
/// [`Serializer`]: crate::Serializer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sequences shorter than this are written in flow style.
    pub limit_flow_sequence: usize,
    /// Sort dictionary keys that have a natural order before writing.
    pub sort_key_for_mapping: bool,
    /// Reserved key holding the pairs of a mixed dictionary.
    pub special_collection_member: String,
    /// Write shared objects once with an anchor, then as aliases.
    ///
    /// When disabled shared objects are written every time they are
    /// reached and a cycle is an error.
    pub emit_alias: bool,
    pub unknown_tag: UnknownTagPolicy,
    /// Maximum nesting of containers, on both read and write.
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            limit_flow_sequence: 20,
            sort_key_for_mapping: true,
            special_collection_member: String::from("~Items"),
            emit_alias: true,
            unknown_tag: UnknownTagPolicy::Ignore,
            max_depth: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, UnknownTagPolicy};

    #[test]
    fn ron_round_trip() {
        let settings = Settings {
            limit_flow_sequence: 8,
            unknown_tag: UnknownTagPolicy::Error,
            ..Settings::default()
        };

        let text = ron::to_string(&settings).unwrap();
        let back: Settings = ron::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn partial_ron() {
        let settings: Settings = ron::from_str("(emit_alias: false, max_depth: 4)").unwrap();
        assert!(!settings.emit_alias);
        assert_eq!(settings.max_depth, 4);
        assert_eq!(settings.limit_flow_sequence, 20);
        assert_eq!(settings.unknown_tag, UnknownTagPolicy::Ignore);
    }
}
