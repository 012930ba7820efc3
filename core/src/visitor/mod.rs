//! Visitor protocols for traversing syntax trees.
//!
//! Every node family has its own visitor trait. A node's `accept` method
//! dispatches to exactly one visit method of the matching trait. The default
//! implementations of the visit methods perform the full traversal of the
//! node's children, so a visitor only overrides the nodes it cares about.
//!
//! Visit methods return a [`Flow`]:
//! - `Flow::Continue(())` keeps traversing,
//! - `Flow::Break(())` stops the traversal of the current branch and, through
//!   `?`, of every enclosing default traversal.
//!
//! Stopping is not an error, it is how a visitor says "I am done here".
//!
//! [`SyntaxTreeVisitor`] is a separate, family-agnostic protocol: it walks any
//! [`Node`] in post-order and is what the whole-tree passes build on.

use core::ops::ControlFlow;
use std::rc::Rc;

use crate::ast::{
    BinaryOp, Declaration, Expression, ExpressionKind, FieldValue, LValue, LValueKind, NodeId,
    Type, TypeField,
};

/// Result of a visit: continue or stop traversing.
pub type Flow = ControlFlow<()>;

/// Shorthand for `Flow::Continue(())`.
pub const CONTINUE: Flow = ControlFlow::Continue(());

/// Shorthand for `Flow::Break(())`.
pub const STOP: Flow = ControlFlow::Break(());

fn accept_all<'ast, V>(visitor: &mut V, exprs: &'ast [Rc<Expression>]) -> Flow
where
    V: ExpressionVisitor<'ast> + ?Sized,
{
    exprs.iter().try_for_each(|expr| expr.accept(visitor))
}

// ============================================================================
// Family visitors
// ============================================================================

/// Visitor for [`Expression`] nodes.
pub trait ExpressionVisitor<'ast> {
    fn visit_string_constant(&mut self, _text: &'ast str) -> Flow {
        CONTINUE
    }

    fn visit_integer_constant(&mut self, _value: i32) -> Flow {
        CONTINUE
    }

    fn visit_nil(&mut self) -> Flow {
        CONTINUE
    }

    /// Entry point for l-values used as values. The default visits the index
    /// expressions nested in the l-value.
    fn visit_lvalue(&mut self, value: &'ast LValue) -> Flow {
        walk_lvalue_expressions(self, value)
    }

    fn visit_negated(&mut self, value: &'ast Expression) -> Flow {
        value.accept(self)
    }

    fn visit_binary(&mut self, left: &'ast Expression, _op: BinaryOp, right: &'ast Expression) -> Flow {
        left.accept(self)?;
        right.accept(self)
    }

    fn visit_assignment(&mut self, target: &'ast LValue, value: &'ast Expression) -> Flow {
        walk_lvalue_expressions(self, target)?;
        value.accept(self)
    }

    fn visit_function_call(&mut self, _id: &'ast str, args: &'ast [Rc<Expression>]) -> Flow {
        accept_all(self, args)
    }

    fn visit_block(&mut self, exprs: &'ast [Rc<Expression>]) -> Flow {
        accept_all(self, exprs)
    }

    fn visit_record(&mut self, _type_id: &'ast str, fields: &'ast [FieldValue]) -> Flow {
        fields.iter().try_for_each(|field| field.expr.accept(self))
    }

    fn visit_array(&mut self, _type_id: &'ast str, size: &'ast Expression, value: &'ast Expression) -> Flow {
        size.accept(self)?;
        value.accept(self)
    }

    fn visit_if_then(&mut self, condition: &'ast Expression, then_expr: &'ast Expression) -> Flow {
        condition.accept(self)?;
        then_expr.accept(self)
    }

    fn visit_if_then_else(
        &mut self,
        condition: &'ast Expression,
        then_expr: &'ast Expression,
        else_expr: &'ast Expression,
    ) -> Flow {
        condition.accept(self)?;
        then_expr.accept(self)?;
        else_expr.accept(self)
    }

    fn visit_while(&mut self, condition: &'ast Expression, body: &'ast Expression) -> Flow {
        condition.accept(self)?;
        body.accept(self)
    }

    fn visit_for(
        &mut self,
        _id: &'ast str,
        first: &'ast Expression,
        last: &'ast Expression,
        body: &'ast Expression,
    ) -> Flow {
        first.accept(self)?;
        last.accept(self)?;
        body.accept(self)
    }

    fn visit_break(&mut self) -> Flow {
        CONTINUE
    }

    /// Declarations belong to [`DeclarationVisitor`]; the default only visits
    /// the body.
    fn visit_let(&mut self, _declarations: &'ast [Rc<Declaration>], body: &'ast [Rc<Expression>]) -> Flow {
        accept_all(self, body)
    }

    fn visit_builtin_body(&mut self) -> Flow {
        CONTINUE
    }
}

/// Visits the expressions nested inside an l-value (index expressions), from
/// the innermost base outwards.
pub fn walk_lvalue_expressions<'ast, V>(visitor: &mut V, value: &'ast LValue) -> Flow
where
    V: ExpressionVisitor<'ast> + ?Sized,
{
    match &value.kind {
        LValueKind::Id(_) => CONTINUE,
        LValueKind::Field { base, .. } => walk_lvalue_expressions(visitor, base),
        LValueKind::Index { base, index } => {
            walk_lvalue_expressions(visitor, base)?;
            index.accept(visitor)
        }
    }
}

/// Visitor for [`LValue`] nodes.
pub trait LValueVisitor<'ast> {
    fn visit_id(&mut self, _id: &'ast str) -> Flow {
        CONTINUE
    }

    fn visit_field(&mut self, base: &'ast LValue, _field: &'ast str) -> Flow {
        base.accept(self)
    }

    fn visit_index(&mut self, base: &'ast LValue, _index: &'ast Expression) -> Flow {
        base.accept(self)
    }
}

/// Visitor for [`Declaration`] nodes.
pub trait DeclarationVisitor<'ast> {
    fn visit_type_declaration(&mut self, _id: &'ast str, _ty: &'ast Type) -> Flow {
        CONTINUE
    }

    fn visit_function_declaration(
        &mut self,
        _id: &'ast str,
        params: &'ast [Declaration],
        _return_type: Option<&'ast str>,
        _body: &'ast Expression,
    ) -> Flow {
        params.iter().try_for_each(|param| param.accept(self))
    }

    fn visit_variable_declaration(
        &mut self,
        _id: &'ast str,
        _type_id: Option<&'ast str>,
        _init: &'ast Expression,
    ) -> Flow {
        CONTINUE
    }

    fn visit_parameter_declaration(&mut self, _id: &'ast str, _type_id: &'ast str) -> Flow {
        CONTINUE
    }
}

/// Visitor for [`Type`] nodes.
pub trait TypeVisitor<'ast> {
    fn visit_int(&mut self) -> Flow {
        CONTINUE
    }

    fn visit_string(&mut self) -> Flow {
        CONTINUE
    }

    fn visit_name(&mut self, _type_id: &'ast str) -> Flow {
        CONTINUE
    }

    fn visit_record(&mut self, _fields: &'ast [TypeField]) -> Flow {
        CONTINUE
    }

    fn visit_array(&mut self, _element_type: &'ast str) -> Flow {
        CONTINUE
    }
}

// ============================================================================
// Whole-tree traversal
// ============================================================================

/// Borrowed view of any node that can appear in a program tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'ast> {
    Expression(&'ast Expression),
    LValue(&'ast LValue),
    Declaration(&'ast Declaration),
}

impl<'ast> Node<'ast> {
    /// Id of the node; declarations have none.
    pub fn node_id(self) -> Option<NodeId> {
        match self {
            Node::Expression(expr) => Some(expr.node_id),
            Node::LValue(value) => Some(value.node_id),
            Node::Declaration(_) => None,
        }
    }

    /// Calls `f` on every direct child, in source order, until it breaks.
    ///
    /// An expression wrapping an l-value shares the l-value's id, so the
    /// wrapper's children are the l-value's children. The loop variable of a
    /// `for` shares its initializer with the loop and is not a child of its
    /// own.
    pub fn try_for_each_child<F>(self, mut f: F) -> Flow
    where
        F: FnMut(Node<'ast>) -> Flow,
    {
        let each_expr = |exprs: &'ast [Rc<Expression>], f: &mut F| {
            exprs.iter().try_for_each(|e| f(Node::Expression(e)))
        };

        match self {
            Node::Expression(expr) => match &expr.kind {
                ExpressionKind::StringConstant(_)
                | ExpressionKind::IntegerConstant(_)
                | ExpressionKind::Nil
                | ExpressionKind::Break
                | ExpressionKind::BuiltinBody => CONTINUE,
                ExpressionKind::LValue(value) => Node::LValue(value).try_for_each_child(f),
                ExpressionKind::Negated(value) => f(Node::Expression(value)),
                ExpressionKind::Binary { left, right, .. } => {
                    f(Node::Expression(left))?;
                    f(Node::Expression(right))
                }
                ExpressionKind::Assignment { target, value } => {
                    f(Node::LValue(target))?;
                    f(Node::Expression(value))
                }
                ExpressionKind::FunctionCall { args, .. } => each_expr(args, &mut f),
                ExpressionKind::Block(exprs) => each_expr(exprs, &mut f),
                ExpressionKind::Record { fields, .. } => fields
                    .iter()
                    .try_for_each(|field| f(Node::Expression(&field.expr))),
                ExpressionKind::Array { size, value, .. } => {
                    f(Node::Expression(size))?;
                    f(Node::Expression(value))
                }
                ExpressionKind::IfThen {
                    condition,
                    then_expr,
                } => {
                    f(Node::Expression(condition))?;
                    f(Node::Expression(then_expr))
                }
                ExpressionKind::IfThenElse {
                    condition,
                    then_expr,
                    else_expr,
                } => {
                    f(Node::Expression(condition))?;
                    f(Node::Expression(then_expr))?;
                    f(Node::Expression(else_expr))
                }
                ExpressionKind::While { condition, body } => {
                    f(Node::Expression(condition))?;
                    f(Node::Expression(body))
                }
                ExpressionKind::For {
                    first, last, body, ..
                } => {
                    f(Node::Expression(first))?;
                    f(Node::Expression(last))?;
                    f(Node::Expression(body))
                }
                ExpressionKind::Let { declarations, body } => {
                    declarations
                        .iter()
                        .try_for_each(|decl| f(Node::Declaration(decl)))?;
                    each_expr(body, &mut f)
                }
            },
            Node::LValue(value) => match &value.kind {
                LValueKind::Id(_) => CONTINUE,
                LValueKind::Field { base, .. } => f(Node::LValue(base)),
                LValueKind::Index { base, index } => {
                    f(Node::LValue(base))?;
                    f(Node::Expression(index))
                }
            },
            Node::Declaration(decl) => match decl {
                Declaration::Function { body, .. } => f(Node::Expression(body)),
                Declaration::Variable { init, .. } => f(Node::Expression(init)),
                Declaration::Type { .. } | Declaration::Parameter { .. } => CONTINUE,
            },
        }
    }
}

/// Post-order visitor over whole trees, regardless of node family.
///
/// [`walk_tree`] offers every child to `visit_child`, whose default recurses
/// into the child, and then calls `after_children` on the node itself. A
/// node's `after_children` therefore runs only once all its descendants are
/// done.
pub trait SyntaxTreeVisitor<'ast> {
    fn visit_child(&mut self, child: Node<'ast>) -> Flow {
        walk_tree(self, child)
    }

    fn after_children(&mut self, _parent: Node<'ast>) -> Flow {
        CONTINUE
    }
}

pub fn walk_tree<'ast, V>(visitor: &mut V, node: Node<'ast>) -> Flow
where
    V: SyntaxTreeVisitor<'ast> + ?Sized,
{
    node.try_for_each_child(|child| visitor.visit_child(child))?;
    visitor.after_children(node)
}
