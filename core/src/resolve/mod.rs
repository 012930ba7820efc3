//! Scope resolution.
//!
//! Walks a program tree top-down and records, for every expression and
//! l-value, the pair of name spaces visible at that node. The pair is handed
//! down unchanged except where declarations are introduced:
//!
//! - a `let` block layers all of its declarations over the enclosing scopes,
//!   before any declaration body is resolved, so the declarations of a block
//!   see each other (recursive and mutually recursive functions and types);
//! - a function body sees its parameters;
//! - a `for` body sees the loop variable.
//!
//! Resolution never fails. A block that declares the same id twice keeps the
//! later declaration and reports a warning.

use std::rc::Rc;

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::api::Diagnostic;
use crate::ast::{Declaration, Expression, ExpressionKind, NodeId, Type};
use crate::builtins::Builtins;
use crate::namespace::{NameSpace, Scopes};
use crate::visitor::{CONTINUE, DeclarationVisitor, Flow, Node};

/// Scopes visible at each node of a resolved tree.
#[derive(Debug, Default)]
pub struct ScopeTable<'ast> {
    scopes: HashMap<NodeId, Scopes<'ast>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'ast> ScopeTable<'ast> {
    /// Scopes visible at the node, if the node was resolved.
    pub fn get(&self, node: NodeId) -> Option<&Scopes<'ast>> {
        self.scopes.get(&node)
    }

    /// Number of resolved nodes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Problems found while building the scopes.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Resolve the scopes of every node of `root`, starting from the builtin
/// scopes.
pub fn resolve<'ast>(root: &'ast Expression, builtins: &'ast Builtins) -> ScopeTable<'ast> {
    let mut resolver = Resolver::default();
    resolver.resolve_node(Node::Expression(root), &builtins.scopes());
    debug!("Resolved scopes of {} nodes", resolver.table.len());
    resolver.table
}

#[derive(Default)]
struct Resolver<'ast> {
    table: ScopeTable<'ast>,
}

impl<'ast> Resolver<'ast> {
    fn resolve_node(&mut self, node: Node<'ast>, scopes: &Scopes<'ast>) {
        if let Some(id) = node.node_id() {
            self.table.scopes.insert(id, scopes.clone());
        }

        match node {
            Node::Expression(expr) => match &expr.kind {
                ExpressionKind::Let { declarations, .. } => {
                    let inner = self.block_scopes(declarations, scopes);
                    self.resolve_children(node, &inner);
                }
                ExpressionKind::For {
                    var,
                    first,
                    last,
                    body,
                } => {
                    self.resolve_node(Node::Expression(first), scopes);
                    self.resolve_node(Node::Expression(last), scopes);

                    let mut values = NameSpace::layered(Rc::clone(&scopes.values));
                    values.define(var);
                    self.resolve_node(Node::Expression(body), &scopes.with_values(values));
                }
                _ => self.resolve_children(node, scopes),
            },
            Node::Declaration(Declaration::Function { params, body, .. }) => {
                let mut builder = BlockScope::new(scopes);
                for param in params {
                    builder.add(param);
                }
                let inner = builder.finish(&mut self.table.diagnostics);
                self.resolve_node(Node::Expression(body), &inner);
            }
            _ => self.resolve_children(node, scopes),
        }
    }

    fn resolve_children(&mut self, node: Node<'ast>, scopes: &Scopes<'ast>) {
        let _ = node.try_for_each_child(|child| {
            self.resolve_node(child, scopes);
            CONTINUE
        });
    }

    fn block_scopes(&mut self, declarations: &'ast [Rc<Declaration>], scopes: &Scopes<'ast>) -> Scopes<'ast> {
        let mut builder = BlockScope::new(scopes);
        for decl in declarations {
            builder.add(decl);
        }
        builder.finish(&mut self.table.diagnostics)
    }
}

/// Collects the declarations of one block into name spaces layered over the
/// enclosing scopes.
struct BlockScope<'ast> {
    parent: Scopes<'ast>,
    types: NameSpace<'ast>,
    values: NameSpace<'ast>,
    current: Option<&'ast Declaration>,
    duplicates: Vec<&'ast str>,
}

impl<'ast> BlockScope<'ast> {
    fn new(parent: &Scopes<'ast>) -> Self {
        Self {
            parent: parent.clone(),
            types: NameSpace::layered(Rc::clone(&parent.types)),
            values: NameSpace::layered(Rc::clone(&parent.values)),
            current: None,
            duplicates: Vec::new(),
        }
    }

    fn add(&mut self, decl: &'ast Declaration) {
        self.current = Some(decl);
        let _ = decl.accept(self);
        self.current = None;
    }

    fn define(&mut self, into_types: bool) {
        let Some(decl) = self.current else {
            return;
        };
        let names = if into_types {
            &mut self.types
        } else {
            &mut self.values
        };
        if names.define(decl).is_some() {
            warn!("Duplicate declaration of '{}' in one block", decl.id());
            self.duplicates.push(decl.id());
        }
    }

    /// Derived scopes. A name space of the parent is reused when the block
    /// adds nothing to it.
    fn finish(self, diagnostics: &mut Vec<Diagnostic>) -> Scopes<'ast> {
        diagnostics.extend(self.duplicates.iter().map(|id| {
            Diagnostic::warning(
                format!("'{id}' is declared more than once; the last declaration is used"),
                None,
            )
        }));

        let types = if self.types.is_empty() {
            self.parent.types
        } else {
            Rc::new(self.types)
        };
        let values = if self.values.is_empty() {
            self.parent.values
        } else {
            Rc::new(self.values)
        };
        Scopes { types, values }
    }
}

impl<'ast> DeclarationVisitor<'ast> for BlockScope<'ast> {
    fn visit_type_declaration(&mut self, _id: &'ast str, _ty: &'ast Type) -> Flow {
        self.define(true);
        CONTINUE
    }

    fn visit_function_declaration(
        &mut self,
        _id: &'ast str,
        _params: &'ast [Declaration],
        _return_type: Option<&'ast str>,
        _body: &'ast Expression,
    ) -> Flow {
        self.define(false);
        CONTINUE
    }

    fn visit_variable_declaration(
        &mut self,
        _id: &'ast str,
        _type_id: Option<&'ast str>,
        _init: &'ast Expression,
    ) -> Flow {
        self.define(false);
        CONTINUE
    }

    fn visit_parameter_declaration(&mut self, _id: &'ast str, _type_id: &'ast str) -> Flow {
        self.define(false);
        CONTINUE
    }
}

#[cfg(test)]
mod tests;
