use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use log::{debug, warn};

use crate::hash::{FixedHashState, HashMap};
use crate::registry::TypeRegistry;
use crate::schema::Schema;

// -----------------------------------------------------------------------------
// Escaping

// Characters kept as-is besides ASCII alphanumerics.
const UNRESERVED: &[u8] = b"-#;/?:@&=+$_.~*'()";

fn split_handle(tag: &str) -> (&str, &str) {
    if let Some(rest) = tag.strip_prefix("!!") {
        ("!!", rest)
    } else if let Some(rest) = tag.strip_prefix('!') {
        ("!", rest)
    } else {
        ("", tag)
    }
}

/// Percent-escapes a tag the way URIs are escaped.
///
/// A leading `!` or `!!` handle is kept, every byte of the remainder that
/// is not alphanumeric or one of `-#;/?:@&=+$_.~*'()` becomes `%XX`.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::registry::escape_tag;
///
/// assert_eq!(escape_tag("!game::Point"), "!game::Point");
/// assert_eq!(escape_tag("![i64]"), "!%5Bi64%5D");
/// assert_eq!(escape_tag("!game::Pair<i64, String>"), "!game::Pair%3Ci64%2C%20String%3E");
/// ```
pub fn escape_tag(tag: &str) -> String {
    let (handle, rest) = split_handle(tag);
    let mut escaped = String::with_capacity(tag.len());
    escaped.push_str(handle);
    for &byte in rest.as_bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED.contains(&byte) {
            escaped.push(byte as char);
        } else {
            // Writing into a `String` cannot fail.
            let _ = write!(escaped, "%{byte:02X}");
        }
    }
    escaped
}

/// Decodes `%XX` sequences, malformed sequences are kept as-is.
///
/// ```
/// use vc_yaml_serial::registry::unescape_tag;
///
/// assert_eq!(unescape_tag("!%5Bi64%5D"), "![i64]");
/// assert_eq!(unescape_tag("!100%"), "!100%");
/// ```
pub fn unescape_tag(tag: &str) -> Cow<'_, str> {
    if !tag.contains('%') {
        return Cow::Borrowed(tag);
    }

    let bytes = tag.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%'
            && let Some(byte) = bytes
                .get(index + 1..index + 3)
                .and_then(|hex| core::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        {
            decoded.push(byte);
            index += 3;
        } else {
            decoded.push(bytes[index]);
            index += 1;
        }
    }

    match String::from_utf8(decoded) {
        Ok(text) => Cow::Owned(text),
        Err(err) => Cow::Owned(String::from_utf8_lossy(err.as_bytes()).into_owned()),
    }
}

// -----------------------------------------------------------------------------
// TagTypeRegistry

/// Two-way mapping between tags and type paths.
///
/// Explicit aliases registered with [`add_tag_alias`](Self::add_tag_alias)
/// take precedence over everything but the schema's built-in tags. Other
/// local tags (`!path`) are resolved against the [`TypeRegistry`]: first
/// as a full type path, then under each lookup scope, and finally as an
/// unambiguous short name.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::{paths, RecordInfo};
/// use vc_yaml_serial::registry::{TagTypeRegistry, TypeRegistry};
/// use vc_yaml_serial::schema::CoreSchema;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(RecordInfo::new("game::Point", &[]));
///
/// let mut tags = TagTypeRegistry::new();
/// tags.add_tag_alias("!point", "game::Point");
///
/// let schema = CoreSchema;
/// assert_eq!(tags.type_from_tag(&schema, &registry, "!point"), Some("game::Point"));
/// assert_eq!(tags.type_from_tag(&schema, &registry, "!game::Point"), Some("game::Point"));
/// assert_eq!(tags.type_from_tag(&schema, &registry, "!!int"), Some(paths::INT));
/// assert_eq!(tags.type_from_tag(&schema, &registry, "!nothing"), None);
///
/// assert_eq!(tags.tag_from_type(&schema, "game::Point"), "!point");
/// assert_eq!(tags.tag_from_type(&schema, paths::FLOAT), "!!float");
/// assert_eq!(tags.tag_from_type(&schema, "game::Line"), "!game::Line");
/// ```
#[derive(Debug, Default, Clone)]
pub struct TagTypeRegistry {
    tag_to_type: HashMap<String, &'static str>,
    type_to_tag: HashMap<&'static str, String>,
    lookup_scopes: Vec<String>,
}

impl TagTypeRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            tag_to_type: HashMap::with_hasher(FixedHashState),
            type_to_tag: HashMap::with_hasher(FixedHashState),
            lookup_scopes: Vec::new(),
        }
    }

    /// Registers `tag` as the tag of `type_path`, in both directions.
    ///
    /// A previous mapping of the same tag is overwritten, a previous tag
    /// of the same type still reads but is no longer written.
    pub fn add_tag_alias(&mut self, tag: &str, type_path: &'static str) {
        let escaped = escape_tag(tag);
        let key = unescape_tag(&escaped).into_owned();

        if let Some(previous) = self.tag_to_type.insert(key, type_path)
            && previous != type_path
            && self.type_to_tag.get(previous) == Some(&escaped)
        {
            self.type_to_tag.remove(previous);
        }
        self.type_to_tag.insert(type_path, escaped);
    }

    /// Adds a module path prefix tried for local tags that are not a full type path.
    ///
    /// With the scope `game` the tag `!Point` also tries `game::Point`.
    pub fn add_lookup_scope(&mut self, scope: impl Into<String>) {
        self.lookup_scopes.push(scope.into());
    }

    #[inline]
    pub fn lookup_scopes(&self) -> &[String] {
        &self.lookup_scopes
    }

    /// Resolves a tag to a registered type path.
    ///
    /// A tag that resolves to nothing is not an error, the caller decides.
    pub fn type_from_tag(
        &self,
        schema: &dyn Schema,
        registry: &TypeRegistry,
        tag: &str,
    ) -> Option<&'static str> {
        let long_tag = schema.expand_tag(tag);
        if long_tag != tag
            && let Some(ty) = schema.type_for_default_tag(&long_tag)
        {
            return Some(ty);
        }

        let long_tag = unescape_tag(&long_tag).into_owned();
        if let Some(&ty) = self.tag_to_type.get(long_tag.as_str()) {
            return Some(ty);
        }

        // Only local tags name types.
        let name = long_tag.strip_prefix('!')?;
        if name.is_empty() || name.starts_with('!') {
            return None;
        }

        if let Some(info) = registry.get(name) {
            return Some(info.type_path());
        }
        for scope in &self.lookup_scopes {
            if let Some(info) = registry.get(&format!("{scope}::{name}")) {
                return Some(info.type_path());
            }
        }
        if registry.is_ambiguous(name) {
            warn!("tag `{tag}` names an ambiguous type, use the full type path");
            return None;
        }
        registry.get_with_type_name(name).map(|info| info.type_path())
    }

    /// The tag written for a type.
    ///
    /// The registered alias if any, else the schema's short tag for
    /// built-in types, else `!` followed by the escaped type path.
    pub fn tag_from_type(&self, schema: &dyn Schema, type_path: &str) -> String {
        if let Some(tag) = self.type_to_tag.get(type_path) {
            return tag.clone();
        }
        if let Some(tag) = schema.tag_for_default_type(type_path) {
            return tag.into();
        }
        escape_tag(&format!("!{type_path}"))
    }
}

// -----------------------------------------------------------------------------
// TagResolver

/// A cache in front of [`TagTypeRegistry::type_from_tag`].
///
/// Lives as long as one read context, negative results are cached too.
/// Registries are immutable while it exists, so cached entries never go stale.
pub struct TagResolver<'a> {
    tags: &'a TagTypeRegistry,
    cache: HashMap<String, Option<&'static str>>,
}

impl<'a> TagResolver<'a> {
    #[inline]
    pub const fn new(tags: &'a TagTypeRegistry) -> Self {
        Self {
            tags,
            cache: HashMap::with_hasher(FixedHashState),
        }
    }

    pub fn resolve(
        &mut self,
        schema: &dyn Schema,
        registry: &TypeRegistry,
        tag: &str,
    ) -> Option<&'static str> {
        if let Some(&cached) = self.cache.get(tag) {
            return cached;
        }
        let resolved = self.tags.type_from_tag(schema, registry, tag);
        debug!("tag `{tag}` resolved to {resolved:?}");
        self.cache.insert(tag.into(), resolved);
        resolved
    }

    /// Number of cached tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }
}
