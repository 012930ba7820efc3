//! Bottom-up type inference driver and per-node rules.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::api::Diagnostic;
use crate::ast::{
    BinaryOp, Declaration, Expression, ExpressionKind, FieldValue, LValue, NodeId, Type,
};
use crate::builtins::{INT_TYPE, STRING_TYPE};
use crate::namespace::Scopes;
use crate::resolve::ScopeTable;
use crate::visitor::{
    CONTINUE, ExpressionVisitor, Flow, LValueVisitor, Node, STOP, SyntaxTreeVisitor,
};

use super::{Analysis, NONE_TYPE, TypeTable, UNKNOWN_TYPE, UNSET_TYPE, nil, resolve_type};

/// Infer the type of every expression of `root`.
///
/// `scopes` must come from resolving the same tree.
pub fn infer_types<'ast>(root: &'ast Expression, scopes: &ScopeTable<'ast>) -> Analysis {
    let mut setter = TreeTypeSetter {
        scopes,
        analysis: Analysis::default(),
    };

    let root_node = Node::Expression(root);
    let _ = setter.walk_children(root_node);

    // The walk covers the descendants only; the root gets one extra step.
    if root.is_nil() {
        setter.analysis.types.set(root.node_id, UNKNOWN_TYPE);
    }
    let _ = setter.after_children(root_node);

    debug!(
        "Inferred types of {} nodes, {} diagnostics",
        setter.analysis.types.len(),
        setter.analysis.diagnostics.len()
    );
    setter.analysis
}

/// Types a node once all of its descendants are typed.
struct TreeTypeSetter<'ast, 't> {
    scopes: &'t ScopeTable<'ast>,
    analysis: Analysis,
}

impl<'ast> TreeTypeSetter<'ast, '_> {
    /// Types every descendant of `node`.
    ///
    /// In a `let`, variable initializers go first: function bodies of the
    /// block may refer to variables declared after them.
    fn walk_children(&mut self, node: Node<'ast>) -> Flow {
        let is_let = matches!(
            node,
            Node::Expression(Expression {
                kind: ExpressionKind::Let { .. },
                ..
            })
        );
        if !is_let {
            return node.try_for_each_child(|child| self.visit_child(child));
        }

        let is_variable = |child: Node<'ast>| matches!(child, Node::Declaration(Declaration::Variable { .. }));
        node.try_for_each_child(|child| match is_variable(child) {
            true => self.visit_child(child),
            false => CONTINUE,
        })?;
        node.try_for_each_child(|child| match is_variable(child) {
            true => CONTINUE,
            false => self.visit_child(child),
        })
    }
}

impl<'ast> SyntaxTreeVisitor<'ast> for TreeTypeSetter<'ast, '_> {
    fn visit_child(&mut self, child: Node<'ast>) -> Flow {
        self.walk_children(child)?;
        self.after_children(child)
    }

    fn after_children(&mut self, parent: Node<'ast>) -> Flow {
        let table = self.scopes;
        let scopes = parent.node_id().and_then(|node| table.get(node));

        for (node, ty) in nil::nil_child_types(parent, scopes, &self.analysis.types) {
            trace!(node = %node, ty = %ty, "Typed nil");
            self.analysis.types.set(node, ty);
        }

        let Some(node) = parent.node_id() else {
            return CONTINUE;
        };
        let mut typer = NodeTyper {
            node,
            scopes,
            types: &mut self.analysis.types,
            diagnostics: &mut self.analysis.diagnostics,
        };
        let _ = match parent {
            Node::Expression(expr) => expr.accept(&mut typer),
            Node::LValue(value) => value.accept(&mut typer),
            Node::Declaration(_) => CONTINUE,
        };
        CONTINUE
    }
}

/// Applies the rule of a single node. Every visit method types `node` from
/// its children's types and stops; children are never re-entered.
struct NodeTyper<'ast, 'a> {
    node: NodeId,
    scopes: Option<&'a Scopes<'ast>>,
    types: &'a mut TypeTable,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'ast> NodeTyper<'ast, '_> {
    fn set(&mut self, ty: &str) -> Flow {
        trace!(node = %self.node, ty, "Inferred type");
        self.types.set(self.node, ty);
        STOP
    }

    fn same_as(&mut self, node: NodeId) -> Flow {
        let ty = self.types.get(node).to_string();
        self.set(&ty)
    }

    fn last_or_none(&mut self, exprs: &[Rc<Expression>]) -> Flow {
        match exprs.last() {
            Some(last) => self.same_as(last.node_id),
            None => self.set(NONE_TYPE),
        }
    }

    fn unresolved(&mut self, message: String) -> Flow {
        debug!(node = %self.node, "{message}");
        self.diagnostics.push(Diagnostic::warning(message, Some(self.node)));
        self.set(UNKNOWN_TYPE)
    }

    fn lookup_value(&self, id: &str) -> Option<&'ast Declaration> {
        self.scopes?.lookup_value(id)
    }

    fn lookup_type(&self, type_id: &str) -> Option<&'ast Type> {
        resolve_type(self.scopes?, type_id)
    }
}

impl<'ast> ExpressionVisitor<'ast> for NodeTyper<'ast, '_> {
    fn visit_string_constant(&mut self, _text: &'ast str) -> Flow {
        self.set(STRING_TYPE)
    }

    fn visit_integer_constant(&mut self, _value: i32) -> Flow {
        self.set(INT_TYPE)
    }

    /// Typed by the parent, see [`nil`].
    fn visit_nil(&mut self) -> Flow {
        STOP
    }

    fn visit_lvalue(&mut self, value: &'ast LValue) -> Flow {
        value.accept(self)
    }

    fn visit_negated(&mut self, value: &'ast Expression) -> Flow {
        self.same_as(value.node_id)
    }

    /// The right operand decides, whatever the operator.
    fn visit_binary(&mut self, _left: &'ast Expression, _op: BinaryOp, right: &'ast Expression) -> Flow {
        self.same_as(right.node_id)
    }

    fn visit_assignment(&mut self, _target: &'ast LValue, _value: &'ast Expression) -> Flow {
        self.set(NONE_TYPE)
    }

    fn visit_function_call(&mut self, id: &'ast str, _args: &'ast [Rc<Expression>]) -> Flow {
        match self.lookup_value(id) {
            Some(Declaration::Function {
                return_type: Some(ty),
                ..
            }) => self.set(ty),
            // Procedures produce no value
            Some(Declaration::Function { .. }) => self.set(UNKNOWN_TYPE),
            Some(_) => self.unresolved(format!("'{id}' is not a function")),
            None => self.unresolved(format!("unresolved function '{id}'")),
        }
    }

    fn visit_block(&mut self, exprs: &'ast [Rc<Expression>]) -> Flow {
        self.last_or_none(exprs)
    }

    fn visit_record(&mut self, type_id: &'ast str, _fields: &'ast [FieldValue]) -> Flow {
        self.set(type_id)
    }

    fn visit_array(&mut self, type_id: &'ast str, _size: &'ast Expression, _value: &'ast Expression) -> Flow {
        self.set(type_id)
    }

    fn visit_if_then(&mut self, _condition: &'ast Expression, _then_expr: &'ast Expression) -> Flow {
        self.set(NONE_TYPE)
    }

    fn visit_if_then_else(
        &mut self,
        _condition: &'ast Expression,
        then_expr: &'ast Expression,
        _else_expr: &'ast Expression,
    ) -> Flow {
        self.same_as(then_expr.node_id)
    }

    fn visit_while(&mut self, _condition: &'ast Expression, _body: &'ast Expression) -> Flow {
        self.set(NONE_TYPE)
    }

    fn visit_for(
        &mut self,
        _id: &'ast str,
        _first: &'ast Expression,
        _last: &'ast Expression,
        _body: &'ast Expression,
    ) -> Flow {
        self.set(NONE_TYPE)
    }

    fn visit_break(&mut self) -> Flow {
        self.set(NONE_TYPE)
    }

    fn visit_let(&mut self, _declarations: &'ast [Rc<Declaration>], body: &'ast [Rc<Expression>]) -> Flow {
        self.last_or_none(body)
    }

    fn visit_builtin_body(&mut self) -> Flow {
        self.set(NONE_TYPE)
    }
}

impl<'ast> LValueVisitor<'ast> for NodeTyper<'ast, '_> {
    fn visit_id(&mut self, id: &'ast str) -> Flow {
        let Some(decl) = self.lookup_value(id) else {
            return self.unresolved(format!("unresolved identifier '{id}'"));
        };

        match decl {
            // Unannotated variables take the type of their initializer
            Declaration::Variable {
                type_id: None,
                init,
                ..
            } => {
                let ty = self.types.get(init.node_id);
                if ty == UNSET_TYPE {
                    return self.unresolved(format!("type of '{id}' depends on itself"));
                }
                let ty = ty.to_string();
                self.set(&ty)
            }
            _ => match decl.value_type() {
                Some(ty) => self.set(ty),
                None => self.unresolved(format!("'{id}' has no value")),
            },
        }
    }

    fn visit_field(&mut self, base: &'ast LValue, field: &'ast str) -> Flow {
        let base_ty = self.types.get(base.node_id).to_string();
        match self.lookup_type(&base_ty).and_then(|ty| ty.field_type(field)) {
            Some(ty) => self.set(ty),
            None => self.unresolved(format!("no field '{field}' in type '{base_ty}'")),
        }
    }

    fn visit_index(&mut self, base: &'ast LValue, _index: &'ast Expression) -> Flow {
        let base_ty = self.types.get(base.node_id).to_string();
        match self.lookup_type(&base_ty).and_then(Type::element_type) {
            Some(ty) => self.set(ty),
            None => self.unresolved(format!("type '{base_ty}' is not an array")),
        }
    }
}
