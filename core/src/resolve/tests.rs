use super::*;
use crate::api::Severity;
use crate::ast::{AstBuilder, BinaryOp, LValue};
use pretty_assertions::assert_eq;

fn value_type_at<'ast>(table: &ScopeTable<'ast>, node: NodeId, id: &str) -> Option<&'ast str> {
    table.get(node)?.lookup_value(id)?.value_type()
}

fn function_body(decl: &Declaration) -> &Expression {
    match decl {
        Declaration::Function { body, .. } => body,
        _ => panic!("not a function: {decl}"),
    }
}

fn lvalue_of(expr: &Expression) -> &LValue {
    match &expr.kind {
        ExpressionKind::LValue(value) => value,
        _ => panic!("not an l-value: {expr}"),
    }
}

// === Builtin scopes ===

#[test]
fn test_root_sees_builtins() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let root = b.call("print", vec![b.string("hello")]);

    let table = resolve(&root, &builtins);
    let scopes = table.get(root.node_id).expect("root resolved");
    assert!(scopes.lookup_value("print").is_some());
    assert!(scopes.lookup_type("string").is_some());
    assert!(table.diagnostics().is_empty());
}

#[test]
fn test_every_expression_is_resolved() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let arg = b.binary(b.int(1), BinaryOp::Add, b.int(2));
    let root = b.block(vec![b.call("f", vec![arg.clone()]), b.nil()]);

    let table = resolve(&root, &builtins);
    // block, call, binary, two ints, nil
    assert_eq!(table.len(), 6);
    assert!(table.get(arg.node_id).is_some());
}

// === Let blocks ===

#[test]
fn test_let_declarations_visible_in_body() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let body = b.var_ref("x");
    let root = b.let_in(
        vec![Rc::new(Declaration::variable("x", Some("string"), b.string("s")))],
        vec![body.clone()],
    );

    let table = resolve(&root, &builtins);
    assert_eq!(value_type_at(&table, body.node_id, "x"), Some("string"));
    assert_eq!(value_type_at(&table, root.node_id, "x"), None);
}

#[test]
fn test_mutually_recursive_functions() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let even = Rc::new(Declaration::function(
        "even",
        &[("n", "int")],
        Some("int"),
        b.call("odd", vec![b.var_ref("n")]),
    ));
    let odd = Rc::new(Declaration::function(
        "odd",
        &[("n", "int")],
        Some("int"),
        b.call("even", vec![b.var_ref("n")]),
    ));
    let root = b.let_in(vec![even.clone(), odd.clone()], vec![b.call("even", vec![b.int(4)])]);

    let table = resolve(&root, &builtins);

    // 'even' sees 'odd', declared after it, and vice versa
    let even_body = function_body(&even).node_id;
    let odd_body = function_body(&odd).node_id;
    assert_eq!(value_type_at(&table, even_body, "odd"), Some("int"));
    assert_eq!(value_type_at(&table, odd_body, "even"), Some("int"));
    assert_eq!(value_type_at(&table, even_body, "n"), Some("int"));
}

#[test]
fn test_recursive_type_declaration() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let list = Rc::new(Declaration::type_declaration(
        "list",
        Type::record(&[("head", "int"), ("tail", "list")]),
    ));
    let body = b.record("list", vec![("head", b.int(1)), ("tail", b.nil())]);
    let root = b.let_in(vec![list], vec![body.clone()]);

    let table = resolve(&root, &builtins);
    let scopes = table.get(body.node_id).expect("body resolved");
    let ty = scopes.lookup_type("list").and_then(Declaration::ty);
    assert_eq!(ty.and_then(|ty| ty.field_type("tail")), Some("list"));
    // The value name space is untouched by a type-only block
    assert!(Rc::ptr_eq(&scopes.values, &builtins_values(&table, root.node_id)));
}

fn builtins_values<'ast>(table: &ScopeTable<'ast>, node: NodeId) -> Rc<NameSpace<'ast>> {
    Rc::clone(&table.get(node).expect("resolved").values)
}

#[test]
fn test_inner_let_shadows_outer() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let inner_ref = b.var_ref("x");
    let outer_ref = b.var_ref("x");
    let inner = b.let_in(
        vec![Rc::new(Declaration::variable("x", Some("string"), b.string("s")))],
        vec![inner_ref.clone()],
    );
    let root = b.let_in(
        vec![Rc::new(Declaration::variable("x", Some("int"), b.int(1)))],
        vec![inner, outer_ref.clone()],
    );

    let table = resolve(&root, &builtins);
    assert_eq!(value_type_at(&table, inner_ref.node_id, "x"), Some("string"));
    assert_eq!(value_type_at(&table, outer_ref.node_id, "x"), Some("int"));
}

#[test]
fn test_duplicate_declaration_last_wins() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let body = b.var_ref("x");
    let root = b.let_in(
        vec![
            Rc::new(Declaration::variable("x", Some("int"), b.int(1))),
            Rc::new(Declaration::variable("x", Some("string"), b.string("s"))),
        ],
        vec![body.clone()],
    );

    let table = resolve(&root, &builtins);
    assert_eq!(value_type_at(&table, body.node_id, "x"), Some("string"));
    assert_eq!(table.diagnostics().len(), 1);
    assert_eq!(table.diagnostics()[0].severity, Severity::Warning);
    assert!(table.diagnostics()[0].message.contains("'x'"));
}

// === Functions and loops ===

#[test]
fn test_parameters_visible_only_in_body() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let f = Rc::new(Declaration::function(
        "f",
        &[("a", "string")],
        None,
        b.call("print", vec![b.var_ref("a")]),
    ));
    let after = b.var_ref("a");
    let root = b.let_in(vec![f.clone()], vec![after.clone()]);

    let table = resolve(&root, &builtins);
    assert_eq!(value_type_at(&table, function_body(&f).node_id, "a"), Some("string"));
    assert!(table.get(after.node_id).expect("resolved").lookup_value("a").is_none());
}

#[test]
fn test_for_variable_visible_in_body() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let first = b.var_ref("i");
    let body = b.var_ref("i");
    let root = b.for_loop("i", first.clone(), b.int(10), body.clone());

    let table = resolve(&root, &builtins);
    assert_eq!(value_type_at(&table, body.node_id, "i"), Some("int"));
    assert_eq!(value_type_at(&table, first.node_id, "i"), None);
}

#[test]
fn test_nested_lvalues_are_resolved() {
    let b = AstBuilder::new();
    let builtins = Builtins::new();
    let index = b.var_ref("i");
    let place = b.lvalue(b.field(b.index(b.id("rows"), index.clone()), "name"));
    let root = b.let_in(
        vec![Rc::new(Declaration::variable("i", None, b.int(0)))],
        vec![place.clone()],
    );

    let table = resolve(&root, &builtins);
    let base = lvalue_of(&place).base().expect("field base");
    assert!(table.get(base.node_id).is_some());
    assert_eq!(value_type_at(&table, index.node_id, "i"), None);
    assert!(table.get(index.node_id).expect("resolved").lookup_value("i").is_some());
}
