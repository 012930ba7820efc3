//! Construction of syntax trees with fresh node ids.

use core::cell::Cell;
use std::rc::Rc;

use super::{
    BinaryOp, Declaration, Expression, ExpressionKind, FieldValue, LValue, LValueKind, NodeId,
};
use crate::builtins::INT_TYPE;

/// Builder for syntax tree nodes.
///
/// Every expression and l-value created through the same builder gets a
/// distinct [`NodeId`]. Trees that are analyzed together must come from the
/// same builder.
///
/// # Example
///
/// ```
/// use tigerc_core::ast::AstBuilder;
///
/// let b = AstBuilder::new();
/// let program = b.call("print", vec![b.string("hello")]);
/// assert_ne!(program.node_id, b.string("x").node_id);
/// ```
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: Cell<u32>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    fn expr(&self, kind: ExpressionKind) -> Rc<Expression> {
        Rc::new(Expression {
            node_id: self.next_id(),
            kind,
        })
    }

    fn place(&self, kind: LValueKind) -> Rc<LValue> {
        Rc::new(LValue {
            node_id: self.next_id(),
            kind,
        })
    }

    // === Constants ===

    pub fn string(&self, text: impl Into<String>) -> Rc<Expression> {
        self.expr(ExpressionKind::StringConstant(text.into()))
    }

    pub fn int(&self, value: i32) -> Rc<Expression> {
        self.expr(ExpressionKind::IntegerConstant(value))
    }

    pub fn nil(&self) -> Rc<Expression> {
        self.expr(ExpressionKind::Nil)
    }

    // === L-values ===

    pub fn id(&self, id: impl Into<String>) -> Rc<LValue> {
        self.place(LValueKind::Id(id.into()))
    }

    pub fn field(&self, base: Rc<LValue>, field: impl Into<String>) -> Rc<LValue> {
        self.place(LValueKind::Field {
            base,
            field: field.into(),
        })
    }

    pub fn index(&self, base: Rc<LValue>, index: Rc<Expression>) -> Rc<LValue> {
        self.place(LValueKind::Index { base, index })
    }

    /// Wraps an l-value so it can be used as a value. The expression shares
    /// the l-value's node id.
    pub fn lvalue(&self, value: Rc<LValue>) -> Rc<Expression> {
        Rc::new(Expression {
            node_id: value.node_id,
            kind: ExpressionKind::LValue(value),
        })
    }

    /// Shorthand for a variable reference used as a value.
    pub fn var_ref(&self, id: impl Into<String>) -> Rc<Expression> {
        self.lvalue(self.id(id))
    }

    // === Operators ===

    pub fn negated(&self, value: Rc<Expression>) -> Rc<Expression> {
        self.expr(ExpressionKind::Negated(value))
    }

    pub fn binary(
        &self,
        left: Rc<Expression>,
        op: BinaryOp,
        right: Rc<Expression>,
    ) -> Rc<Expression> {
        self.expr(ExpressionKind::Binary { left, op, right })
    }

    pub fn assign(&self, target: Rc<LValue>, value: Rc<Expression>) -> Rc<Expression> {
        self.expr(ExpressionKind::Assignment { target, value })
    }

    pub fn call(&self, id: impl Into<String>, args: Vec<Rc<Expression>>) -> Rc<Expression> {
        self.expr(ExpressionKind::FunctionCall {
            id: id.into(),
            args,
        })
    }

    // === Aggregates ===

    pub fn block(&self, exprs: Vec<Rc<Expression>>) -> Rc<Expression> {
        self.expr(ExpressionKind::Block(exprs))
    }

    pub fn record(
        &self,
        type_id: impl Into<String>,
        fields: Vec<(&str, Rc<Expression>)>,
    ) -> Rc<Expression> {
        self.expr(ExpressionKind::Record {
            type_id: type_id.into(),
            fields: fields
                .into_iter()
                .map(|(id, expr)| FieldValue {
                    id: id.to_string(),
                    expr,
                })
                .collect(),
        })
    }

    pub fn array(
        &self,
        type_id: impl Into<String>,
        size: Rc<Expression>,
        value: Rc<Expression>,
    ) -> Rc<Expression> {
        self.expr(ExpressionKind::Array {
            type_id: type_id.into(),
            size,
            value,
        })
    }

    // === Control flow ===

    pub fn if_then(&self, condition: Rc<Expression>, then_expr: Rc<Expression>) -> Rc<Expression> {
        self.expr(ExpressionKind::IfThen {
            condition,
            then_expr,
        })
    }

    pub fn if_then_else(
        &self,
        condition: Rc<Expression>,
        then_expr: Rc<Expression>,
        else_expr: Rc<Expression>,
    ) -> Rc<Expression> {
        self.expr(ExpressionKind::IfThenElse {
            condition,
            then_expr,
            else_expr,
        })
    }

    pub fn while_loop(&self, condition: Rc<Expression>, body: Rc<Expression>) -> Rc<Expression> {
        self.expr(ExpressionKind::While { condition, body })
    }

    /// `for id := first to last do body`. The loop variable is declared as an
    /// `int` variable initialized by `first`.
    pub fn for_loop(
        &self,
        id: impl Into<String>,
        first: Rc<Expression>,
        last: Rc<Expression>,
        body: Rc<Expression>,
    ) -> Rc<Expression> {
        let var = Rc::new(Declaration::variable(id, Some(INT_TYPE), first.clone()));
        self.expr(ExpressionKind::For {
            var,
            first,
            last,
            body,
        })
    }

    pub fn break_expr(&self) -> Rc<Expression> {
        self.expr(ExpressionKind::Break)
    }

    pub fn let_in(
        &self,
        declarations: Vec<Rc<Declaration>>,
        body: Vec<Rc<Expression>>,
    ) -> Rc<Expression> {
        self.expr(ExpressionKind::Let { declarations, body })
    }
}
