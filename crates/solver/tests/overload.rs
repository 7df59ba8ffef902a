mod common;

use common::{module_with, solve, span, type_ref};
use javalens_core::model::{EntityKind, FileScope, FileScopeBuilder, PrimitiveType, ScopeId};
use javalens_core::{Module, SemanticError};
use javalens_solver::{MatchLevel, MemberMatch, MemberSolver, OverloadSolver, SolvedType};
use pretty_assertions::assert_eq;

fn calls_file() -> FileScope {
    let mut builder = FileScopeBuilder::new("app/Calls.java", &["app"]);
    builder
        .add_class(ScopeId::FILE, "Foo", EntityKind::Class, span(0, 10))
        .unwrap();
    let calls = builder
        .add_class(ScopeId::FILE, "Calls", EntityKind::Class, span(20, 900))
        .unwrap();

    let overloads: &[(&str, &[&str])] = &[
        ("f", &[]),
        ("f", &["Foo"]),
        ("f", &["Foo", "Foo"]),
        ("f", &["Foo[]"]),
        ("g", &["long", "long"]),
        ("g", &["float", "float"]),
        ("g", &["double", "double"]),
        ("h", &["Object"]),
        ("h", &["Integer"]),
        ("k", &["String"]),
        ("k", &["Number"]),
    ];
    for (index, (name, parameters)) in overloads.iter().enumerate() {
        let start = 30 + index * 50;
        let method = builder
            .add_method(calls, name, type_ref("void"), span(start, start + 40))
            .unwrap();
        for (position, parameter) in parameters.iter().enumerate() {
            builder
                .add_parameter(
                    method,
                    &format!("p{position}"),
                    type_ref(parameter),
                    span(start + 1, start + 2),
                )
                .unwrap();
        }
    }
    builder.build()
}

fn parameter_types(method: &MemberMatch<'_>) -> Vec<String> {
    method
        .entity()
        .parameters()
        .iter()
        .map(|parameter| parameter.variable_type().unwrap().to_string())
        .collect()
}

fn candidates<'m>(module: &'m Module, name: &str) -> Vec<MemberMatch<'m>> {
    let calls = solve(module, "app.Calls").unwrap();
    MemberSolver::default()
        .find_methods(name, &calls, module)
        .unwrap()
}

fn select<'m>(module: &'m Module, name: &str, arguments: Vec<SolvedType<'m>>) -> Vec<String> {
    let arguments: Vec<_> = arguments.into_iter().map(Some).collect();
    select_partial(module, name, &arguments)
}

fn select_partial<'m>(
    module: &'m Module,
    name: &str,
    arguments: &[Option<SolvedType<'m>>],
) -> Vec<String> {
    let chosen = OverloadSolver::default()
        .solve(&candidates(module, name), arguments, module)
        .unwrap();
    parameter_types(&chosen)
}

fn primitive(primitive: PrimitiveType) -> SolvedType<'static> {
    SolvedType::Primitive(primitive)
}

#[test]
fn test_arity_selects_matching_fixed_overload() {
    let module = module_with([calls_file()]);
    let foo = || solve(&module, "app.Foo").unwrap();

    assert_eq!(select(&module, "f", vec![]), Vec::<String>::new());
    assert_eq!(select(&module, "f", vec![foo()]), vec!["Foo"]);
    assert_eq!(select(&module, "f", vec![foo(), foo()]), vec!["Foo", "Foo"]);
}

#[test]
fn test_variable_arity_used_when_no_fixed_overload_applies() {
    let module = module_with([calls_file()]);
    let foo = || solve(&module, "app.Foo").unwrap();

    assert_eq!(
        select(&module, "f", vec![foo(), foo(), foo()]),
        vec!["Foo[]"]
    );

    let variadic = candidates(&module, "f")
        .into_iter()
        .find(|method| parameter_types(method) == ["Foo[]"])
        .unwrap();
    let level = OverloadSolver::default().match_level(
        &variadic,
        &[Some(foo()), Some(foo()), Some(foo())],
        &module,
    );
    assert_eq!(level, MatchLevel::VarArityWithBoxing);
}

#[test]
fn test_narrowest_widening_preferred() {
    let module = module_with([calls_file()]);
    assert_eq!(
        select(
            &module,
            "g",
            vec![primitive(PrimitiveType::Byte), primitive(PrimitiveType::Byte)]
        ),
        vec!["long", "long"]
    );
}

#[test]
fn test_exact_beats_widening() {
    let module = module_with([calls_file()]);
    assert_eq!(
        select(
            &module,
            "g",
            vec![primitive(PrimitiveType::Float), primitive(PrimitiveType::Float)]
        ),
        vec!["float", "float"]
    );
    assert_eq!(
        select(
            &module,
            "g",
            vec![primitive(PrimitiveType::Int), primitive(PrimitiveType::Double)]
        ),
        vec!["double", "double"]
    );
}

#[test]
fn test_boxing_prefers_the_wrapper_over_object() {
    let module = module_with([calls_file()]);
    assert_eq!(
        select(&module, "h", vec![primitive(PrimitiveType::Int)]),
        vec!["Integer"]
    );
    let foo = solve(&module, "app.Foo").unwrap();
    assert_eq!(select(&module, "h", vec![foo]), vec!["Object"]);
}

#[test]
fn test_boxing_then_widening_reference() {
    let module = module_with([calls_file()]);
    assert_eq!(
        select(&module, "k", vec![primitive(PrimitiveType::Int)]),
        vec!["Number"]
    );
}

#[test]
fn test_unknown_argument_matches_any_parameter() {
    let module = module_with([calls_file()]);
    assert_eq!(select_partial(&module, "f", &[None]), vec!["Foo"]);
    assert_eq!(select_partial(&module, "g", &[None, None]), vec!["long", "long"]);

    let foo = solve(&module, "app.Foo").unwrap();
    assert_eq!(
        select_partial(&module, "f", &[Some(foo), None]),
        vec!["Foo", "Foo"]
    );
}

#[test]
fn test_array_argument_matches_object_parameter() {
    let module = module_with([calls_file()]);
    let foos = solve(&module, "app.Foo").unwrap().array_of(1);
    assert_eq!(select(&module, "h", vec![foos.clone()]), vec!["Object"]);

    let object = candidates(&module, "h")
        .into_iter()
        .find(|method| parameter_types(method) == ["Object"])
        .unwrap();
    assert_eq!(
        OverloadSolver::default().match_level(&object, &[Some(foos)], &module),
        MatchLevel::Exact
    );
}

#[test]
fn test_reorder_puts_best_first() {
    let module = module_with([calls_file()]);
    let foo = solve(&module, "app.Foo").unwrap();
    let ordered = OverloadSolver::default()
        .reorder(candidates(&module, "f"), &[Some(foo)], &module)
        .unwrap();
    let signatures: Vec<_> = ordered.iter().map(parameter_types).collect();
    assert_eq!(
        signatures,
        vec![
            vec!["Foo".to_string()],
            vec![],
            vec!["Foo".to_string(), "Foo".to_string()],
            vec!["Foo[]".to_string()],
        ]
    );
}

#[test]
fn test_no_candidates_is_an_error() {
    let module = module_with([calls_file()]);
    assert!(candidates(&module, "missing").is_empty());
    assert!(matches!(
        OverloadSolver::default().solve(&[], &[], &module),
        Err(SemanticError::EmptyCandidates)
    ));
}
