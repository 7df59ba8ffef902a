//! Process-wide declarations every module can fall back on.
//!
//! Class hierarchies must end in `java.lang.Object` even when no JDK module is loaded,
//! so a minimal `Object` and `Enum` are always available here.

use crate::error::Result;
use crate::model::{
    EntityKind, EntityRef, FileScope, FileScopeBuilder, Range, ScopeId, TypeParameter,
    TypeReference,
};
use once_cell::sync::Lazy;
use smol_str::SmolStr;
use tracing::warn;

static BUILTIN: Lazy<FileScope> = Lazy::new(build_builtin_file);

pub fn builtin_file() -> &'static FileScope {
    &BUILTIN
}

/// Builtin class with the given fully qualified name.
pub fn find_builtin_class(qualified_name: &[SmolStr]) -> Option<EntityRef<'static>> {
    let file = builtin_file();
    let (name, package) = qualified_name.split_last()?;
    if package != file.package_qualifiers() {
        return None;
    }
    file.top_level_class(name)
        .map(|id| EntityRef::declared(file, id))
}

fn build_builtin_file() -> FileScope {
    let mut builder = FileScopeBuilder::new("<builtin>/java/lang", &["java", "lang"]);
    if let Err(err) = declare_builtins(&mut builder) {
        warn!("failed to declare builtin classes: {}", err);
    }
    builder.build()
}

fn declare_builtins(builder: &mut FileScopeBuilder) -> Result<()> {
    let string = || TypeReference::named(["java", "lang", "String"]);
    let range = Range::default();

    let object = builder.add_class(ScopeId::FILE, "Object", EntityKind::Class, range)?;
    builder.add_method(object, "toString", string(), range)?;
    builder.add_method(object, "hashCode", TypeReference::named(["int"]), range)?;
    let equals = builder.add_method(object, "equals", TypeReference::named(["boolean"]), range)?;
    builder.add_parameter(equals, "other", TypeReference::named(["Object"]), range)?;

    let enum_class = builder.add_class(ScopeId::FILE, "Enum", EntityKind::Class, range)?;
    builder.add_type_parameter(enum_class, TypeParameter::new("E"))?;
    builder.add_method(enum_class, "name", string(), range)?;
    builder.add_method(enum_class, "ordinal", TypeReference::named(["int"]), range)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_object_and_enum() {
        let object = find_builtin_class(&["java".into(), "lang".into(), "Object".into()]);
        assert_eq!(object.map(|e| e.name()), Some("Object"));
        let enum_class = find_builtin_class(&["java".into(), "lang".into(), "Enum".into()]).unwrap();
        assert_eq!(enum_class.type_parameters().len(), 1);
        assert!(find_builtin_class(&["java".into(), "util".into(), "List".into()]).is_none());
    }
}
