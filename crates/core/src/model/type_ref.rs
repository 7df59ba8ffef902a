//! Unresolved, syntactic type mentions.

use super::PrimitiveType;
use crate::error::SemanticError;
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

/// A type as written at a use site: `java.util.Map<K, ? extends V>[]`.
///
/// Nothing here is resolved; the type solver turns it into a solved type against a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeReference {
    full_name: Vec<SmolStr>,
    primitive: bool,
    array_dimensions: usize,
    type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    Type(TypeReference),
    Wildcard(Option<WildcardBound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardBound {
    pub kind: BoundKind,
    pub bound: TypeReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Extends,
    Super,
}

impl TypeReference {
    /// The reference with no name: constructor return types and un-inferred lambdas.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn named<I, S>(full_name: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let full_name: Vec<SmolStr> = full_name.into_iter().map(Into::into).collect();
        let primitive = matches!(full_name.as_slice(), [single] if PrimitiveType::is_primitive_name(single));
        Self {
            full_name,
            primitive,
            array_dimensions: 0,
            type_arguments: Vec::new(),
        }
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::named([primitive.name()])
    }

    pub fn with_type_arguments(mut self, type_arguments: Vec<TypeArgument>) -> Self {
        self.type_arguments = type_arguments;
        self
    }

    pub fn with_array_dimensions(mut self, dimensions: usize) -> Self {
        self.array_dimensions = dimensions;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty()
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    pub fn is_array(&self) -> bool {
        self.array_dimensions > 0
    }

    pub fn array_dimensions(&self) -> usize {
        self.array_dimensions
    }

    pub fn full_name(&self) -> &[SmolStr] {
        &self.full_name
    }

    pub fn simple_name(&self) -> Option<&str> {
        self.full_name.last().map(SmolStr::as_str)
    }

    pub fn qualifiers(&self) -> &[SmolStr] {
        match self.full_name.split_last() {
            Some((_, qualifiers)) => qualifiers,
            None => &[],
        }
    }

    pub fn type_arguments(&self) -> &[TypeArgument] {
        &self.type_arguments
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        if !self.primitive {
            return None;
        }
        self.simple_name().and_then(PrimitiveType::from_name)
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.full_name.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        if !self.type_arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_dimensions {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Type(ty) => write!(f, "{}", ty),
            TypeArgument::Wildcard(None) => f.write_str("?"),
            TypeArgument::Wildcard(Some(WildcardBound { kind, bound })) => {
                let keyword = match kind {
                    BoundKind::Extends => "extends",
                    BoundKind::Super => "super",
                };
                write!(f, "? {} {}", keyword, bound)
            }
        }
    }
}

impl FromStr for TypeReference {
    type Err = SemanticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeTextParser { text: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(parser.error("trailing input"));
        }
        Ok(ty)
    }
}

/// Recursive-descent reader for the textual form produced by `Display`.
struct TypeTextParser<'a> {
    text: &'a str,
    pos: usize,
}

impl TypeTextParser<'_> {
    fn parse_type(&mut self) -> Result<TypeReference, SemanticError> {
        let mut full_name = vec![self.parse_identifier()?];
        while self.eat('.') {
            full_name.push(self.parse_identifier()?);
        }

        let mut type_arguments = Vec::new();
        if self.eat('<') {
            loop {
                type_arguments.push(self.parse_argument()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        let mut dimensions = 0;
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            dimensions += 1;
        }

        Ok(TypeReference::named(full_name)
            .with_type_arguments(type_arguments)
            .with_array_dimensions(dimensions))
    }

    fn parse_argument(&mut self) -> Result<TypeArgument, SemanticError> {
        if !self.eat('?') {
            return Ok(TypeArgument::Type(self.parse_type()?));
        }
        let kind = if self.eat_keyword("extends") {
            BoundKind::Extends
        } else if self.eat_keyword("super") {
            BoundKind::Super
        } else {
            return Ok(TypeArgument::Wildcard(None));
        };
        let bound = self.parse_type()?;
        Ok(TypeArgument::Wildcard(Some(WildcardBound { kind, bound })))
    }

    fn parse_identifier(&mut self) -> Result<SmolStr, SemanticError> {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(SmolStr::new(&rest[..len]))
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.text[self.pos..].starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let rest = &self.text[self.pos..];
        if !rest.starts_with(keyword) {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
        if boundary {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: &str) -> SemanticError {
        SemanticError::InvalidTypeSyntax(format!(
            "{} at offset {} in `{}`",
            message, self.pos, self.text
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generic_array() {
        let ty: TypeReference = "java.util.Map<String, ? extends Number>[][]".parse().unwrap();
        assert_eq!(ty.simple_name(), Some("Map"));
        assert_eq!(ty.qualifiers(), &["java", "util"]);
        assert_eq!(ty.array_dimensions(), 2);
        assert_eq!(ty.type_arguments().len(), 2);
        match &ty.type_arguments()[1] {
            TypeArgument::Wildcard(Some(bound)) => {
                assert_eq!(bound.kind, BoundKind::Extends);
                assert_eq!(bound.bound.simple_name(), Some("Number"));
            }
            other => panic!("unexpected argument {:?}", other),
        }
        assert_eq!(ty.to_string(), "java.util.Map<String, ? extends Number>[][]");
    }

    #[test]
    fn test_parse_primitive_and_wildcards() {
        let ty: TypeReference = "int[]".parse().unwrap();
        assert!(ty.is_primitive());
        assert_eq!(ty.as_primitive(), Some(PrimitiveType::Int));

        let ty: TypeReference = "List<?>".parse().unwrap();
        assert_eq!(ty.type_arguments(), &[TypeArgument::Wildcard(None)]);

        let ty: TypeReference = "Comparator<? super superType>".parse().unwrap();
        assert!(matches!(
            &ty.type_arguments()[0],
            TypeArgument::Wildcard(Some(WildcardBound { kind: BoundKind::Super, .. }))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("List<".parse::<TypeReference>().is_err());
        assert!("a..b".parse::<TypeReference>().is_err());
        assert!("int[".parse::<TypeReference>().is_err());
        assert!("".parse::<TypeReference>().is_err());
    }
}
