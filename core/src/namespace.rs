//! Name spaces: identifier to declaration lookup.
//!
//! A [`NameSpace`] borrows the declarations it maps to, so it can never
//! outlive them. Name spaces are layered: a block that introduces new
//! declarations gets a name space holding only those declarations, chained
//! to its parent. Lookups search from the innermost layer outwards.
//!
//! Tiger keeps types and values (variables, functions, parameters) in
//! separate name spaces; [`Scopes`] bundles the pair visible at one node.

use core::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::ast::Declaration;

/// One layer of identifier bindings, chained to its enclosing layer.
#[derive(Default)]
pub struct NameSpace<'ast> {
    parent: Option<Rc<NameSpace<'ast>>>,
    entries: HashMap<&'ast str, &'ast Declaration>,
}

impl<'ast> NameSpace<'ast> {
    /// Create an empty, outermost name space.
    pub fn new() -> Self {
        Self {
            parent: None,
            entries: HashMap::new(),
        }
    }

    /// Create an empty layer over `parent`.
    pub fn layered(parent: Rc<NameSpace<'ast>>) -> Self {
        Self {
            parent: Some(parent),
            entries: HashMap::new(),
        }
    }

    /// Bind the declaration's id in this layer.
    ///
    /// Returns the declaration previously bound to the same id in this
    /// layer, which the new one replaces. Bindings of enclosing layers are
    /// shadowed, not replaced.
    pub fn define(&mut self, decl: &'ast Declaration) -> Option<&'ast Declaration> {
        self.entries.insert(decl.id(), decl)
    }

    /// Look up an id, searching layers from innermost to outermost.
    pub fn lookup(&self, id: &str) -> Option<&'ast Declaration> {
        let mut layer = Some(self);
        while let Some(current) = layer {
            if let Some(decl) = current.entries.get(id) {
                return Some(*decl);
            }
            layer = current.parent.as_deref();
        }
        None
    }

    /// Number of bindings in this layer.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of layers, counting this one.
    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |parent| parent.depth())
    }
}

/// Lists the ids of every layer, innermost first: `{x, y} < {print, ...}`.
impl fmt::Display for NameSpace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        write!(f, "{{{}}}", ids.join(", "))?;
        if let Some(parent) = &self.parent {
            write!(f, " < {parent}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NameSpace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameSpace({self})")
    }
}

/// The type and value name spaces visible at one node.
#[derive(Debug, Clone)]
pub struct Scopes<'ast> {
    pub types: Rc<NameSpace<'ast>>,
    pub values: Rc<NameSpace<'ast>>,
}

impl<'ast> Scopes<'ast> {
    pub fn new(types: NameSpace<'ast>, values: NameSpace<'ast>) -> Self {
        Self {
            types: Rc::new(types),
            values: Rc::new(values),
        }
    }

    /// Same scopes with a different value name space.
    pub fn with_values(&self, values: NameSpace<'ast>) -> Self {
        Self {
            types: Rc::clone(&self.types),
            values: Rc::new(values),
        }
    }

    /// Look up a type declaration.
    pub fn lookup_type(&self, id: &str) -> Option<&'ast Declaration> {
        self.types.lookup(id)
    }

    /// Look up a variable, parameter or function declaration.
    pub fn lookup_value(&self, id: &str) -> Option<&'ast Declaration> {
        self.values.lookup(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, Type};

    #[test]
    fn test_lookup_in_single_layer() {
        let b = AstBuilder::new();
        let x = Declaration::variable("x", Some("int"), b.int(1));
        let y = Declaration::variable("y", Some("string"), b.string("a"));

        let mut ns = NameSpace::new();
        ns.define(&x);
        ns.define(&y);

        assert_eq!(ns.lookup("x").map(Declaration::id), Some("x"));
        assert_eq!(ns.lookup("y").and_then(Declaration::value_type), Some("string"));
        assert!(ns.lookup("z").is_none());
        assert_eq!(ns.len(), 2);
    }

    #[test]
    fn test_shadowing() {
        let b = AstBuilder::new();
        let outer_x = Declaration::variable("x", Some("int"), b.int(1));
        let outer_y = Declaration::variable("y", Some("int"), b.int(2));
        let inner_x = Declaration::variable("x", Some("string"), b.string("s"));

        let mut outer = NameSpace::new();
        outer.define(&outer_x);
        outer.define(&outer_y);
        let outer = Rc::new(outer);

        let mut inner = NameSpace::layered(Rc::clone(&outer));
        inner.define(&inner_x);

        // 'x' is shadowed, 'y' is not
        assert_eq!(inner.lookup("x").and_then(Declaration::value_type), Some("string"));
        assert_eq!(inner.lookup("y").and_then(Declaration::value_type), Some("int"));
        assert_eq!(inner.depth(), 2);

        // The outer layer is untouched
        assert_eq!(outer.lookup("x").and_then(Declaration::value_type), Some("int"));
    }

    #[test]
    fn test_define_replaces_in_same_layer() {
        let b = AstBuilder::new();
        let first = Declaration::variable("x", Some("int"), b.int(1));
        let second = Declaration::variable("x", Some("string"), b.string("s"));

        let mut ns = NameSpace::new();
        assert!(ns.define(&first).is_none());
        let previous = ns.define(&second);

        assert_eq!(previous.and_then(Declaration::value_type), Some("int"));
        assert_eq!(ns.lookup("x").and_then(Declaration::value_type), Some("string"));
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_display_lists_layers() {
        let int = Declaration::type_declaration("int", Type::Int);
        let point = Declaration::type_declaration("point", Type::record(&[("x", "int")]));

        let mut outer = NameSpace::new();
        outer.define(&int);
        let mut inner = NameSpace::layered(Rc::new(outer));
        inner.define(&point);

        assert_eq!(inner.to_string(), "{point} < {int}");
    }

    #[test]
    fn test_scopes_keep_types_and_values_apart() {
        let b = AstBuilder::new();
        let ty = Declaration::type_declaration("t", Type::Int);
        let value = Declaration::variable("t", Some("int"), b.int(0));

        let mut types = NameSpace::new();
        types.define(&ty);
        let mut values = NameSpace::new();
        values.define(&value);
        let scopes = Scopes::new(types, values);

        assert!(scopes.lookup_type("t").is_some_and(Declaration::is_type));
        assert!(scopes.lookup_value("t").is_some_and(|d| !d.is_type()));
    }
}
