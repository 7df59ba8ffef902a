mod common;

use common::{app_files, module_with, type_ref, IN_RUN, MAIN_PATH};
use javalens_core::model::{BinaryOp, Expr, Literal, UnaryOp};
use javalens_core::{EngineConfig, Module};
use javalens_solver::JavaSemantics;
use pretty_assertions::assert_eq;
use std::path::Path;

fn solve_with(semantics: &JavaSemantics, module: &Module, expr: &Expr) -> Option<String> {
    semantics
        .solve_expression_at(expr, module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap()
        .map(|solved| common::qualified(&solved))
}

fn solve_in_run(module: &Module, expr: &Expr) -> Option<String> {
    solve_with(&JavaSemantics::default(), module, expr)
}

fn int() -> Expr {
    Expr::Literal(Literal::Int)
}

#[test]
fn test_fields_locals_and_parameters() {
    let module = module_with(app_files());
    assert_eq!(solve_in_run(&module, &Expr::ident("count")).as_deref(), Some("int"));
    assert_eq!(solve_in_run(&module, &Expr::ident("total")).as_deref(), Some("long"));
    assert_eq!(
        solve_in_run(&module, &Expr::ident("s")).as_deref(),
        Some("java.lang.String")
    );
    // Inherited from Base.
    assert_eq!(
        solve_in_run(&module, &Expr::ident("label")).as_deref(),
        Some("java.lang.String")
    );
}

#[test]
fn test_local_declared_after_position_is_hidden() {
    let module = module_with(app_files());
    assert_eq!(solve_in_run(&module, &Expr::ident("later")), None);

    let mut config = EngineConfig::default();
    config.solver.filter_locals_by_position = false;
    let unfiltered = JavaSemantics::new(&config);
    assert_eq!(
        solve_with(&unfiltered, &module, &Expr::ident("later")).as_deref(),
        Some("java.lang.String")
    );
}

#[test]
fn test_this_and_super() {
    let module = module_with(app_files());
    assert_eq!(solve_in_run(&module, &Expr::ident("this")).as_deref(), Some("app.Main"));
    assert_eq!(solve_in_run(&module, &Expr::ident("super")).as_deref(), Some("app.Base"));
    assert_eq!(
        solve_in_run(&module, &Expr::path("this.count")).as_deref(),
        Some("int")
    );
}

#[test]
fn test_method_return_type_uses_receiver_bindings() {
    let module = module_with(app_files());
    let get = Expr::call(Expr::path("names.get"), vec![int()]);
    assert_eq!(solve_in_run(&module, &get).as_deref(), Some("java.lang.String"));

    let length = Expr::call(Expr::path("s.length"), vec![]);
    assert_eq!(solve_in_run(&module, &length).as_deref(), Some("int"));
    let char_at = Expr::call(Expr::path("s.charAt"), vec![int()]);
    assert_eq!(solve_in_run(&module, &char_at).as_deref(), Some("char"));
}

#[test]
fn test_raw_generic_uses_type_parameter_bound() {
    let module = module_with(app_files());
    assert_eq!(
        solve_in_run(&module, &Expr::path("raw.value")).as_deref(),
        Some("java.lang.Number")
    );
    let get = Expr::call(Expr::path("raw.get"), vec![]);
    assert_eq!(solve_in_run(&module, &get).as_deref(), Some("java.lang.Number"));
}

#[test]
fn test_unqualified_call_picks_inherited_overload() {
    let module = module_with(app_files());
    let call = Expr::call(Expr::ident("size"), vec![Expr::ident("a")]);
    assert_eq!(solve_in_run(&module, &call).as_deref(), Some("int"));

    let definitions = JavaSemantics::default()
        .definitions_at(&call, &module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap();
    let arities: Vec<_> = definitions
        .iter()
        .map(|method| method.parameters().len())
        .collect();
    assert_eq!(arities, vec![1, 0]);
}

#[test]
fn test_static_imports() {
    let module = module_with(app_files());
    assert_eq!(solve_in_run(&module, &Expr::ident("MAX")).as_deref(), Some("int"));
    let twice = Expr::call(Expr::ident("twice"), vec![int()]);
    assert_eq!(solve_in_run(&module, &twice).as_deref(), Some("int"));
}

#[test]
fn test_arrays() {
    let module = module_with(app_files());
    let row = Expr::index(Expr::ident("matrix"), int());
    let cell = Expr::index(row.clone(), int());
    let semantics = JavaSemantics::default();
    let solved = semantics
        .solve_expression_at(&row, &module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap()
        .unwrap();
    assert_eq!(solved.to_string(), "int[]");
    assert_eq!(solve_in_run(&module, &cell).as_deref(), Some("int"));
    assert_eq!(
        solve_in_run(&module, &Expr::path("matrix.length")).as_deref(),
        Some("int")
    );

    let created = Expr::NewArray {
        element: type_ref("String"),
        dimensions: 2,
    };
    let solved = semantics
        .solve_expression_at(&created, &module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap()
        .unwrap();
    assert_eq!(solved.to_string(), "java.lang.String[][]");
}

#[test]
fn test_operators_and_literals() {
    let module = module_with(app_files());
    let size_plus_long = Expr::binary(
        BinaryOp::Add,
        Expr::call(Expr::path("names.size"), vec![]),
        Expr::Literal(Literal::Long),
    );
    assert_eq!(solve_in_run(&module, &size_plus_long).as_deref(), Some("long"));

    let concat = Expr::binary(BinaryOp::Add, Expr::ident("a"), Expr::ident("s"));
    assert_eq!(
        solve_in_run(&module, &concat).as_deref(),
        Some("java.lang.String")
    );

    let less = Expr::binary(BinaryOp::Lt, Expr::ident("a"), int());
    assert_eq!(solve_in_run(&module, &less).as_deref(), Some("boolean"));

    let shift = Expr::binary(BinaryOp::Shl, Expr::ident("a"), Expr::ident("total"));
    assert_eq!(solve_in_run(&module, &shift).as_deref(), Some("int"));

    let negated = Expr::Unary {
        op: UnaryOp::Minus,
        operand: Box::new(Expr::Literal(Literal::Char)),
    };
    assert_eq!(solve_in_run(&module, &negated).as_deref(), Some("int"));

    assert_eq!(
        solve_in_run(&module, &Expr::Literal(Literal::String)).as_deref(),
        Some("java.lang.String")
    );
    assert_eq!(
        solve_in_run(&module, &Expr::Literal(Literal::Null)).as_deref(),
        Some("null")
    );
}

#[test]
fn test_conditional_skips_null_branch() {
    let module = module_with(app_files());
    let conditional = Expr::Conditional {
        condition: Box::new(Expr::Literal(Literal::Boolean)),
        then_branch: Box::new(Expr::Literal(Literal::Null)),
        else_branch: Box::new(Expr::ident("s")),
    };
    assert_eq!(
        solve_in_run(&module, &conditional).as_deref(),
        Some("java.lang.String")
    );
}

#[test]
fn test_qualified_name_through_packages() {
    let module = module_with(app_files());
    let list = Expr::path("java.util.List");
    assert_eq!(solve_in_run(&module, &list).as_deref(), Some("java.util.List"));

    let definitions = JavaSemantics::default()
        .definitions_at(&list, &module, Path::new(MAIN_PATH), IN_RUN)
        .unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].name(), "List");
}

#[test]
fn test_unresolved_names_degrade_to_none() {
    let module = module_with(app_files());
    // `thing` is declared with an unknown type.
    assert_eq!(solve_in_run(&module, &Expr::path("thing.field")), None);
    assert_eq!(solve_in_run(&module, &Expr::ident("nowhere")), None);

    let cast = Expr::Cast {
        ty: type_ref("com.missing.Thing"),
        expr: Box::new(Expr::ident("a")),
    };
    assert_eq!(solve_in_run(&module, &cast), None);
    assert_eq!(solve_in_run(&module, &Expr::select(cast, "field")), None);
    assert_eq!(
        solve_in_run(&module, &Expr::call(Expr::path("thing.run"), vec![])),
        None
    );
    assert_eq!(solve_in_run(&module, &Expr::Erroneous), None);
}
