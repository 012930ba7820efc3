//! Builtin declarations of the Tiger standard environment.
//!
//! The builtins are ordinary [`Declaration`]s owned by a [`Builtins`] value.
//! Their function bodies are [`ExpressionKind::BuiltinBody`] placeholders: the
//! body only marks the function as intrinsic.

use std::rc::Rc;

use crate::ast::{Declaration, Expression, ExpressionKind, NodeId, Type};
use crate::namespace::{NameSpace, Scopes};

/// Type id of the builtin integer type.
pub const INT_TYPE: &str = "int";

/// Type id of the builtin string type.
pub const STRING_TYPE: &str = "string";

/// Builtin procedures and functions: `(id, params, return type)`.
///
/// `print` is registered twice; the global name space keeps the last one.
const FUNCTIONS: &[(&str, &[(&str, &str)], Option<&str>)] = &[
    ("print", &[("s", STRING_TYPE)], None),
    ("print", &[("i", INT_TYPE)], None),
    ("flush", &[], None),
    ("getchar", &[], Some(STRING_TYPE)),
    ("ord", &[("s", STRING_TYPE)], Some(INT_TYPE)),
    ("chr", &[("i", INT_TYPE)], Some(STRING_TYPE)),
    ("size", &[("s", STRING_TYPE)], Some(INT_TYPE)),
    (
        "substring",
        &[("s", STRING_TYPE), ("first", INT_TYPE), ("n", INT_TYPE)],
        Some(STRING_TYPE),
    ),
    (
        "concat",
        &[("s1", STRING_TYPE), ("s2", STRING_TYPE)],
        Some(STRING_TYPE),
    ),
    ("not", &[("i", INT_TYPE)], Some(INT_TYPE)),
    ("exit", &[("i", INT_TYPE)], None),
];

/// Owner of the builtin declarations.
///
/// Scopes borrow declarations, so a `Builtins` value must outlive every
/// scope table built on top of it.
#[derive(Debug)]
pub struct Builtins {
    types: Vec<Declaration>,
    functions: Vec<Declaration>,
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

impl Builtins {
    pub fn new() -> Self {
        let types = vec![
            Declaration::type_declaration(INT_TYPE, Type::Int),
            Declaration::type_declaration(STRING_TYPE, Type::String),
        ];

        let functions = FUNCTIONS
            .iter()
            .map(|(id, params, return_type)| {
                Declaration::function(*id, params, *return_type, builtin_body())
            })
            .collect();

        Self { types, functions }
    }

    /// The global type and value name spaces.
    pub fn scopes(&self) -> Scopes<'_> {
        let mut types = NameSpace::new();
        for decl in &self.types {
            types.define(decl);
        }

        let mut values = NameSpace::new();
        for decl in &self.functions {
            values.define(decl);
        }

        Scopes::new(types, values)
    }

    /// Every builtin function named `id`, in registration order.
    pub fn overloads<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Declaration> + 'a {
        self.functions.iter().filter(move |decl| decl.id() == id)
    }

    /// All builtin declarations, types first.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.types.iter().chain(&self.functions)
    }
}

fn builtin_body() -> Rc<Expression> {
    Rc::new(Expression {
        node_id: NodeId::BUILTIN,
        kind: ExpressionKind::BuiltinBody,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_types() {
        let builtins = Builtins::new();
        let scopes = builtins.scopes();

        assert_eq!(scopes.lookup_type("int").and_then(Declaration::ty), Some(&Type::Int));
        assert_eq!(
            scopes.lookup_type("string").and_then(Declaration::ty),
            Some(&Type::String)
        );
        assert!(scopes.lookup_value("int").is_none());
    }

    #[test]
    fn test_builtin_functions() {
        let builtins = Builtins::new();
        let scopes = builtins.scopes();

        let substring = scopes.lookup_value("substring").map(|d| d.params().collect::<Vec<_>>());
        assert_eq!(
            substring,
            Some(vec![("s", "string"), ("first", "int"), ("n", "int")])
        );
        assert_eq!(
            scopes.lookup_value("ord").and_then(Declaration::value_type),
            Some("int")
        );
        // Procedures have no value type
        assert_eq!(scopes.lookup_value("flush").and_then(Declaration::value_type), None);
        assert_eq!(scopes.lookup_value("exit").and_then(Declaration::value_type), None);
    }

    #[test]
    fn test_print_overloads() {
        let builtins = Builtins::new();

        let overloads: Vec<Vec<_>> = builtins
            .overloads("print")
            .map(|d| d.params().map(|(_, ty)| ty).collect())
            .collect();
        assert_eq!(overloads, vec![vec!["string"], vec!["int"]]);

        // The name space keeps the last registration
        let scopes = builtins.scopes();
        let print = scopes.lookup_value("print").map(|d| d.params().collect::<Vec<_>>());
        assert_eq!(print, Some(vec![("i", "int")]));
    }

    #[test]
    fn test_bodies_are_intrinsic() {
        let builtins = Builtins::new();
        for decl in builtins.declarations() {
            if let Declaration::Function { body, .. } = decl {
                assert_eq!(body.kind, ExpressionKind::BuiltinBody);
                assert_eq!(body.node_id, NodeId::BUILTIN);
            }
        }
        assert_eq!(builtins.declarations().count(), 13);
    }
}
