mod common;

use common::{app_files, module_with, type_ref, IN_RUN, MAIN_PATH};
use javalens_core::model::Expr;
use javalens_core::{ModuleHandle, SemanticError};
use javalens_solver::JavaSemantics;
use std::path::Path;

#[test]
fn test_unknown_file_is_rejected() {
    let module = module_with(app_files());
    let semantics = JavaSemantics::default();
    let err = semantics
        .scope_at(&module, Path::new("app/Nope.java"), 0)
        .unwrap_err();
    assert!(matches!(err, SemanticError::InvalidOperation(_)));
}

#[test]
fn test_visible_entities_merge_scopes_and_inherited_members() {
    let module = module_with(app_files());
    let visible = JavaSemantics::default()
        .visible_entities_at(&module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap();
    let names: Vec<_> = visible.iter().map(|entity| entity.name()).collect();

    for expected in ["a", "s", "total", "count", "names", "run", "Main", "Base", "label", "size", "toString"] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
    assert!(!names.contains(&"later"));
    assert_eq!(names.iter().filter(|name| **name == "size").count(), 2);
    assert_eq!(names.iter().filter(|name| **name == "run").count(), 1);
    assert_eq!(names.iter().filter(|name| **name == "count").count(), 1);
}

#[test]
fn test_type_mention_sees_imports() {
    let module = module_with(app_files());
    let solved = JavaSemantics::default()
        .solve_type_at(&type_ref("List<String>"), &module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap()
        .unwrap();
    assert_eq!(solved.to_string(), "java.util.List<E=java.lang.String>");
}

#[test]
fn test_queries_read_a_stable_snapshot() {
    let handle = ModuleHandle::new(module_with(app_files()));
    let before = handle.snapshot().unwrap();
    handle.remove_file(Path::new(MAIN_PATH)).unwrap();
    let after = handle.snapshot().unwrap();

    let semantics = JavaSemantics::default();
    let count = Expr::ident("count");
    let solved = semantics
        .solve_expression_at(&count, &before, Path::new(MAIN_PATH), IN_RUN)
        .unwrap()
        .unwrap();
    assert_eq!(solved.to_string(), "int");
    assert!(semantics
        .solve_expression_at(&count, &after, Path::new(MAIN_PATH), IN_RUN)
        .is_err());
}
