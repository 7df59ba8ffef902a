use std::fmt;

/// Java primitive types, plus `void` which only appears as a return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn is_primitive_name(name: &str) -> bool {
        Self::from_name(name).is_some()
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean | PrimitiveType::Void)
    }

    /// Simple name of the `java.lang` wrapper class.
    pub fn boxed_class(self) -> Option<&'static str> {
        match self {
            PrimitiveType::Boolean => Some("Boolean"),
            PrimitiveType::Byte => Some("Byte"),
            PrimitiveType::Short => Some("Short"),
            PrimitiveType::Char => Some("Character"),
            PrimitiveType::Int => Some("Integer"),
            PrimitiveType::Long => Some("Long"),
            PrimitiveType::Float => Some("Float"),
            PrimitiveType::Double => Some("Double"),
            PrimitiveType::Void => None,
        }
    }

    /// Inverse of [`boxed_class`](Self::boxed_class) for a `java.lang` qualified name.
    pub fn from_boxed_class(qualified_name: &[&str]) -> Option<Self> {
        let [java, lang, simple] = qualified_name else {
            return None;
        };
        if *java != "java" || *lang != "lang" {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|p| p.boxed_class() == Some(*simple))
    }

    /// Identity or primitive widening conversion (JLS 5.1.2).
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short => matches!(target, Int | Long | Float | Double),
            Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            _ => false,
        }
    }

    /// Binary numeric promotion (JLS 5.6.2). `None` if either side is not numeric.
    pub fn promote(self, other: PrimitiveType) -> Option<PrimitiveType> {
        use PrimitiveType::*;
        if !self.is_numeric() || !other.is_numeric() {
            return None;
        }
        Some(if self == Double || other == Double {
            Double
        } else if self == Float || other == Float {
            Float
        } else if self == Long || other == Long {
            Long
        } else {
            Int
        })
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
