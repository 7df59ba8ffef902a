//! Shared fixtures: a miniature JDK module and helpers to build user code against it.

#![allow(dead_code)]

use javalens_core::model::{
    EntityId, EntityKind, FileScope, FileScopeBuilder, Range, ScopeId, ScopeRef, TypeParameter,
    TypeReference,
};
use javalens_core::Module;
use javalens_solver::{SolvedType, SolvedTypeParameters, TypeSolver};
use std::sync::Arc;

pub fn type_ref(text: &str) -> TypeReference {
    text.parse().unwrap()
}

pub fn span(start: usize, end: usize) -> Range {
    Range::new(start, end)
}

/// One top-level type per file, the way javac lays out a JDK.
pub fn jdk_file(
    package: &[&str],
    name: &str,
    kind: EntityKind,
    declare: impl FnOnce(&mut FileScopeBuilder, EntityId),
) -> FileScope {
    let path = format!("{}/{}.java", package.join("/"), name);
    let mut builder = FileScopeBuilder::new(path, package);
    let class = builder
        .add_class(ScopeId::FILE, name, kind, span(0, 1000))
        .unwrap();
    declare(&mut builder, class);
    builder.build()
}

fn method(
    builder: &mut FileScopeBuilder,
    class: EntityId,
    name: &str,
    returns: &str,
    parameters: &[(&str, &str)],
) -> EntityId {
    let method = builder
        .add_method(class, name, type_ref(returns), span(10, 20))
        .unwrap();
    for (parameter, ty) in parameters {
        builder
            .add_parameter(method, parameter, type_ref(ty), span(10, 11))
            .unwrap();
    }
    method
}

fn number_subclass(name: &str) -> FileScope {
    jdk_file(&["java", "lang"], name, EntityKind::Class, |b, class| {
        b.set_superclass(class, type_ref("Number")).unwrap();
    })
}

/// `java.lang` and `java.util` essentials.
pub fn jdk() -> Arc<Module> {
    let lang = ["java", "lang"];
    let mut module = Module::new("jdk");

    module.add_or_replace_file_scope(jdk_file(&lang, "Object", EntityKind::Class, |b, class| {
        method(b, class, "toString", "String", &[]);
        method(b, class, "hashCode", "int", &[]);
        method(b, class, "equals", "boolean", &[("other", "Object")]);
    }));
    module.add_or_replace_file_scope(jdk_file(&lang, "String", EntityKind::Class, |b, class| {
        method(b, class, "length", "int", &[]);
        method(b, class, "charAt", "char", &[("index", "int")]);
    }));
    module.add_or_replace_file_scope(jdk_file(&lang, "Number", EntityKind::Class, |b, class| {
        method(b, class, "intValue", "int", &[]);
    }));
    for wrapper in ["Byte", "Short", "Integer", "Long", "Float", "Double"] {
        module.add_or_replace_file_scope(number_subclass(wrapper));
    }
    module.add_or_replace_file_scope(jdk_file(&lang, "Character", EntityKind::Class, |_, _| {}));
    module.add_or_replace_file_scope(jdk_file(&lang, "Boolean", EntityKind::Class, |_, _| {}));
    module.add_or_replace_file_scope(jdk_file(&lang, "Enum", EntityKind::Class, |b, class| {
        b.add_type_parameter(class, TypeParameter::new("E").with_bound(type_ref("Enum<E>")))
            .unwrap();
        method(b, class, "name", "String", &[]);
        method(b, class, "ordinal", "int", &[]);
    }));
    module.add_or_replace_file_scope(jdk_file(
        &["java", "util"],
        "List",
        EntityKind::Interface,
        |b, class| {
            b.add_type_parameter(class, TypeParameter::new("E")).unwrap();
            method(b, class, "get", "E", &[("index", "int")]);
            method(b, class, "add", "boolean", &[("element", "E")]);
            method(b, class, "size", "int", &[]);
        },
    ));
    Arc::new(module)
}

/// User module depending on the miniature JDK.
pub fn module_with(files: impl IntoIterator<Item = FileScope>) -> Module {
    let mut module = Module::new("app");
    module.add_depending_module(jdk());
    for file in files {
        module.add_or_replace_file_scope(file);
    }
    module
}

/// Solve a fully qualified type name from outside any file.
pub fn solve<'m>(module: &'m Module, text: &str) -> Option<SolvedType<'m>> {
    TypeSolver::default().solve(
        &type_ref(text),
        &SolvedTypeParameters::new(),
        ScopeRef::Empty,
        module,
    )
}

pub fn qualified(solved: &SolvedType<'_>) -> String {
    solved
        .qualified_name()
        .map(|name| name.join("."))
        .unwrap_or_else(|| solved.to_string())
}

pub const MAIN_PATH: &str = "app/Main.java";
/// Inside `Main.run`, after `total` and `thing` but before `later`.
pub const IN_RUN: usize = 400;

/// `app` sources exercising fields, locals, generics and static imports.
///
/// ```java
/// // app/Main.java
/// import java.util.List;
/// import static app.Util.MAX;
/// import static app.Util.twice;
/// class Base { String label; int size(); int size(int factor); }
/// class Main extends Base {
///     int count; List<String> names; Box raw; int[][] matrix;
///     void run(int a, String s) { long total; Missing thing; /* 400 */ String later; }
/// }
/// // app/Box.java
/// class Box<X extends Number> { X value; X get(); }
/// // app/Util.java
/// class Util { static int MAX; static int twice(int n); }
/// ```
pub fn app_files() -> Vec<FileScope> {
    let mut main = FileScopeBuilder::new(MAIN_PATH, &["app"]);
    main.import(&["java", "util", "List"])
        .import_static(&["app", "Util", "MAX"])
        .import_static(&["app", "Util", "twice"]);
    let base = main
        .add_class(ScopeId::FILE, "Base", EntityKind::Class, span(0, 90))
        .unwrap();
    main.add_field(base, "label", type_ref("String"), span(10, 20))
        .unwrap();
    method(&mut main, base, "size", "int", &[]);
    method(&mut main, base, "size", "int", &[("factor", "int")]);

    let class = main
        .add_class(ScopeId::FILE, "Main", EntityKind::Class, span(100, 1000))
        .unwrap();
    main.set_superclass(class, type_ref("Base")).unwrap();
    for (index, (name, ty)) in [
        ("count", "int"),
        ("names", "List<String>"),
        ("raw", "Box"),
        ("matrix", "int[][]"),
    ]
    .into_iter()
    .enumerate()
    {
        let start = 110 + index * 20;
        main.add_field(class, name, type_ref(ty), span(start, start + 10))
            .unwrap();
    }
    let run = main
        .add_method(class, "run", type_ref("void"), span(200, 600))
        .unwrap();
    main.add_parameter(run, "a", type_ref("int"), span(205, 210))
        .unwrap();
    main.add_parameter(run, "s", type_ref("String"), span(211, 220))
        .unwrap();
    let body = main.scope_of(run).unwrap();
    for (name, ty, start) in [
        ("total", "long", 300),
        ("thing", "Missing", 310),
        ("later", "String", 500),
    ] {
        main.add_variable(body, name, type_ref(ty), span(start, start + 5))
            .unwrap();
    }

    let mut boxed = FileScopeBuilder::new("app/Box.java", &["app"]);
    let class = boxed
        .add_class(ScopeId::FILE, "Box", EntityKind::Class, span(0, 100))
        .unwrap();
    boxed
        .add_type_parameter(class, TypeParameter::new("X").with_bound(type_ref("Number")))
        .unwrap();
    boxed
        .add_field(class, "value", type_ref("X"), span(10, 20))
        .unwrap();
    method(&mut boxed, class, "get", "X", &[]);

    let mut util = FileScopeBuilder::new("app/Util.java", &["app"]);
    let class = util
        .add_class(ScopeId::FILE, "Util", EntityKind::Class, span(0, 100))
        .unwrap();
    let max = util
        .add_field(class, "MAX", type_ref("int"), span(10, 20))
        .unwrap();
    util.set_static(max, true).unwrap();
    let twice = method(&mut util, class, "twice", "int", &[("n", "int")]);
    util.set_static(twice, true).unwrap();

    vec![main.build(), boxed.build(), util.build()]
}
