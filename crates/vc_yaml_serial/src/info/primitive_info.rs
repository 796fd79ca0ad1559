use core::fmt;

use crate::info::{Type, paths};
use crate::value::Value;

/// What a scalar converts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

impl ScalarKind {
    /// The built-in type path of this kind.
    pub const fn type_path(self) -> &'static str {
        match self {
            Self::Null => paths::NULL,
            Self::Bool => paths::BOOL,
            Self::Int => paths::INT,
            Self::Float => paths::FLOAT,
            Self::Str => paths::STRING,
        }
    }

    /// The value a fresh slot of this kind holds.
    pub fn default_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Str => Value::Str(Default::default()),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Bool => f.pad("bool"),
            Self::Int => f.pad("int"),
            Self::Float => f.pad("float"),
            Self::Str => f.pad("str"),
        }
    }
}

/// A container for scalar type information.
#[derive(Debug, Clone)]
pub struct PrimitiveInfo {
    ty: Type,
    kind: ScalarKind,
}

impl PrimitiveInfo {
    #[inline]
    pub fn new(path: &'static str, kind: ScalarKind) -> Self {
        Self {
            ty: Type::new(path),
            kind,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }
}
