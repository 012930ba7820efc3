//! Typing of `nil`.
//!
//! `nil` has no type of its own: it takes the type its parent expects at its
//! position. The parent assigns it, right before the parent's own rule runs.

use crate::ast::{Declaration, Expression, ExpressionKind, NodeId, Type};
use crate::namespace::Scopes;
use crate::visitor::{CONTINUE, Node};

use super::{TypeTable, UNKNOWN_TYPE, UNSET_TYPE, resolve_type};

/// Types of the `nil` children of `parent`.
///
/// Every `nil` child gets an entry; those without a typed context get
/// [`UNKNOWN_TYPE`].
pub(super) fn nil_child_types(
    parent: Node<'_>,
    scopes: Option<&Scopes<'_>>,
    types: &TypeTable,
) -> Vec<(NodeId, String)> {
    let mut typed: Vec<(NodeId, String)> = Vec::new();
    let mut expect = |child: &Expression, ty: Option<&str>| {
        if child.is_nil() {
            let ty = ty.filter(|ty| *ty != UNSET_TYPE).unwrap_or(UNKNOWN_TYPE);
            typed.push((child.node_id, ty.to_string()));
        }
    };
    let lookup = |type_id: &str| scopes.and_then(|scopes| resolve_type(scopes, type_id));

    match parent {
        Node::Expression(expr) => match &expr.kind {
            ExpressionKind::Assignment { target, value } => {
                expect(value, Some(types.get(target.node_id)));
            }
            ExpressionKind::Binary { left, right, .. } => {
                expect(left, Some(types.type_of(right)));
                expect(right, Some(types.type_of(left)));
            }
            ExpressionKind::IfThenElse {
                then_expr,
                else_expr,
                ..
            } => {
                expect(then_expr, Some(types.type_of(else_expr)));
                expect(else_expr, Some(types.type_of(then_expr)));
            }
            ExpressionKind::Record { type_id, fields } => {
                let record = lookup(type_id);
                for field in fields {
                    expect(&field.expr, record.and_then(|ty| ty.field_type(&field.id)));
                }
            }
            ExpressionKind::Array { type_id, value, .. } => {
                expect(value, lookup(type_id).and_then(Type::element_type));
            }
            ExpressionKind::FunctionCall { id, args } => {
                let callee = scopes.and_then(|scopes| scopes.lookup_value(id));
                for (i, arg) in args.iter().enumerate() {
                    let param = callee.and_then(|decl| decl.params().nth(i).map(|(_, ty)| ty));
                    expect(arg, param);
                }
            }
            _ => {}
        },
        Node::Declaration(Declaration::Variable { type_id, init, .. }) => {
            expect(init, type_id.as_deref());
        }
        _ => {}
    }

    // Any other position gives no context
    let _ = parent.try_for_each_child(|child| {
        if let Node::Expression(expr) = child {
            if expr.is_nil() && !typed.iter().any(|(node, _)| *node == expr.node_id) {
                typed.push((expr.node_id, UNKNOWN_TYPE.to_string()));
            }
        }
        CONTINUE
    });

    typed
}
