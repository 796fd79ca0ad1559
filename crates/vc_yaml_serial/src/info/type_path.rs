use core::fmt;

/// The identity of a described type.
///
/// `path` is the full, unique type path. `name` is the last path segment
/// without generic arguments and may be shared by several types.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::Type;
///
/// let ty = Type::new("game::inventory::Slot<game::Item>");
/// assert_eq!(ty.path(), "game::inventory::Slot<game::Item>");
/// assert_eq!(ty.name(), "Slot");
///
/// assert_eq!(Type::new("[i64]").name(), "[i64]");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Type {
    path: &'static str,
    name: &'static str,
}

impl Type {
    pub fn new(path: &'static str) -> Self {
        let head = match path.find('<') {
            Some(index) => &path[..index],
            None => path,
        };
        let name = match head.rfind("::") {
            Some(index) => &head[index + 2..],
            None => head,
        };
        Self { path, name }
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this is the type with the given path.
    #[inline]
    pub fn is(&self, path: &str) -> bool {
        self.path == path
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path)
    }
}
