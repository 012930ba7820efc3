//! Abstract syntax tree for Tiger programs.
//!
//! The tree is made of four node families: [`Type`], [`Declaration`],
//! [`Expression`] and [`LValue`]. Nodes are plain data shared through `Rc`;
//! a node may be held by more than one container (e.g. a `for` loop variable
//! shares its initializer with the loop itself).
//!
//! Nodes never store results of the compiler passes. Scopes and inferred
//! types live in side tables keyed by [`NodeId`], see
//! [`crate::resolve::ScopeTable`] and [`crate::analyzer::TypeTable`].
//!
//! Trees are normally produced by the external parser through
//! [`AstBuilder`], which hands out fresh node ids.

mod builder;
mod display;

pub use builder::AstBuilder;

use core::fmt;
use std::rc::Rc;

use crate::visitor::{DeclarationVisitor, ExpressionVisitor, Flow, LValueVisitor, TypeVisitor};

/// Identity of an expression node, used as key of the pass side tables.
///
/// An [`LValue`] wrapped in an expression shares the id of its wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Id of the placeholder bodies of builtin functions.
    ///
    /// Builtin bodies are never part of a user tree, so they never reach a
    /// side table.
    pub const BUILTIN: NodeId = NodeId(u32::MAX);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Types
// ============================================================================

/// A `name: type-id` pair, used by record types and function parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeField {
    pub name: String,
    pub type_id: String,
}

impl TypeField {
    pub fn new(name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
        }
    }
}

/// A type introduced by a type declaration.
///
/// Types refer to other types by identifier only, so recursive types such as
/// `type list = {head: int, tail: list}` need no ownership cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    String,
    /// Alias of another type, `type a = b`.
    Name(String),
    Record(Vec<TypeField>),
    /// Array type, holding the element type id.
    Array(String),
}

impl Type {
    pub fn name(type_id: impl Into<String>) -> Self {
        Type::Name(type_id.into())
    }

    pub fn record(fields: &[(&str, &str)]) -> Self {
        Type::Record(
            fields
                .iter()
                .map(|(name, type_id)| TypeField::new(*name, *type_id))
                .collect(),
        )
    }

    pub fn array(element_type: impl Into<String>) -> Self {
        Type::Array(element_type.into())
    }

    /// Returns the element type id of an array type.
    pub fn element_type(&self) -> Option<&str> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the type id of field `field` of a record type.
    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.as_record()?
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.type_id.as_str())
    }

    /// Returns the fields, if this is a record type.
    pub fn as_record(&self) -> Option<&[TypeField]> {
        match self {
            Type::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns the aliased type id, if this is a type alias.
    pub fn alias_of(&self) -> Option<&str> {
        match self {
            Type::Name(type_id) => Some(type_id),
            _ => None,
        }
    }

    pub fn accept<'ast, V>(&'ast self, visitor: &mut V) -> Flow
    where
        V: TypeVisitor<'ast> + ?Sized,
    {
        match self {
            Type::Int => visitor.visit_int(),
            Type::String => visitor.visit_string(),
            Type::Name(type_id) => visitor.visit_name(type_id),
            Type::Record(fields) => visitor.visit_record(fields),
            Type::Array(element) => visitor.visit_array(element),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `type id = ty`
    Type { id: String, ty: Type },
    /// `function id(params): return_type = body`
    ///
    /// `params` only holds [`Declaration::Parameter`] entries. A function
    /// without return type is a procedure.
    Function {
        id: String,
        params: Vec<Declaration>,
        return_type: Option<String>,
        body: Rc<Expression>,
    },
    /// `var id: type_id := init`
    Variable {
        id: String,
        type_id: Option<String>,
        init: Rc<Expression>,
    },
    Parameter { id: String, type_id: String },
}

impl Declaration {
    pub fn type_declaration(id: impl Into<String>, ty: Type) -> Self {
        Declaration::Type { id: id.into(), ty }
    }

    pub fn function(
        id: impl Into<String>,
        params: &[(&str, &str)],
        return_type: Option<&str>,
        body: Rc<Expression>,
    ) -> Self {
        Declaration::Function {
            id: id.into(),
            params: params
                .iter()
                .map(|(name, type_id)| Declaration::parameter(*name, *type_id))
                .collect(),
            return_type: return_type.map(str::to_string),
            body,
        }
    }

    pub fn variable(id: impl Into<String>, type_id: Option<&str>, init: Rc<Expression>) -> Self {
        Declaration::Variable {
            id: id.into(),
            type_id: type_id.map(str::to_string),
            init,
        }
    }

    pub fn parameter(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Declaration::Parameter {
            id: id.into(),
            type_id: type_id.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Declaration::Type { id, .. }
            | Declaration::Function { id, .. }
            | Declaration::Variable { id, .. }
            | Declaration::Parameter { id, .. } => id,
        }
    }

    /// Returns the type introduced by a type declaration.
    pub fn ty(&self) -> Option<&Type> {
        match self {
            Declaration::Type { ty, .. } => Some(ty),
            _ => None,
        }
    }

    /// Returns the declared type of a variable or parameter, or the return
    /// type of a function.
    ///
    /// Variables without annotation and procedures have no declared value
    /// type.
    pub fn value_type(&self) -> Option<&str> {
        match self {
            Declaration::Type { .. } => None,
            Declaration::Function { return_type, .. } => return_type.as_deref(),
            Declaration::Variable { type_id, .. } => type_id.as_deref(),
            Declaration::Parameter { type_id, .. } => Some(type_id),
        }
    }

    /// Whether this declaration lives in the type name space.
    pub fn is_type(&self) -> bool {
        matches!(self, Declaration::Type { .. })
    }

    /// Parameter `(name, type-id)` pairs of a function declaration.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        let params: &[Declaration] = match self {
            Declaration::Function { params, .. } => params,
            _ => &[],
        };
        params
            .iter()
            .filter_map(|p| Some((p.id(), p.value_type()?)))
    }

    pub fn accept<'ast, V>(&'ast self, visitor: &mut V) -> Flow
    where
        V: DeclarationVisitor<'ast> + ?Sized,
    {
        match self {
            Declaration::Type { id, ty } => visitor.visit_type_declaration(id, ty),
            Declaration::Function {
                id,
                params,
                return_type,
                body,
            } => visitor.visit_function_declaration(id, params, return_type.as_deref(), body),
            Declaration::Variable { id, type_id, init } => {
                visitor.visit_variable_declaration(id, type_id.as_deref(), init)
            }
            Declaration::Parameter { id, type_id } => {
                visitor.visit_parameter_declaration(id, type_id)
            }
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `id = expr` inside a record literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub id: String,
    pub expr: Rc<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub node_id: NodeId,
    pub kind: ExpressionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    StringConstant(String),
    IntegerConstant(i32),
    Nil,
    LValue(Rc<LValue>),
    Negated(Rc<Expression>),
    Binary {
        left: Rc<Expression>,
        op: BinaryOp,
        right: Rc<Expression>,
    },
    Assignment {
        target: Rc<LValue>,
        value: Rc<Expression>,
    },
    FunctionCall {
        id: String,
        args: Vec<Rc<Expression>>,
    },
    Block(Vec<Rc<Expression>>),
    Record {
        type_id: String,
        fields: Vec<FieldValue>,
    },
    Array {
        type_id: String,
        size: Rc<Expression>,
        value: Rc<Expression>,
    },
    IfThen {
        condition: Rc<Expression>,
        then_expr: Rc<Expression>,
    },
    IfThenElse {
        condition: Rc<Expression>,
        then_expr: Rc<Expression>,
        else_expr: Rc<Expression>,
    },
    While {
        condition: Rc<Expression>,
        body: Rc<Expression>,
    },
    /// `for var := first to last do body`
    ///
    /// `var` is an `int` variable declaration whose initializer is `first`.
    For {
        var: Rc<Declaration>,
        first: Rc<Expression>,
        last: Rc<Expression>,
        body: Rc<Expression>,
    },
    Break,
    Let {
        declarations: Vec<Rc<Declaration>>,
        body: Vec<Rc<Expression>>,
    },
    /// Body of an intrinsic function. Carries no computation.
    BuiltinBody,
}

impl Expression {
    pub fn accept<'ast, V>(&'ast self, visitor: &mut V) -> Flow
    where
        V: ExpressionVisitor<'ast> + ?Sized,
    {
        use ExpressionKind as K;
        match &self.kind {
            K::StringConstant(text) => visitor.visit_string_constant(text),
            K::IntegerConstant(value) => visitor.visit_integer_constant(*value),
            K::Nil => visitor.visit_nil(),
            K::LValue(value) => visitor.visit_lvalue(value),
            K::Negated(value) => visitor.visit_negated(value),
            K::Binary { left, op, right } => visitor.visit_binary(left, *op, right),
            K::Assignment { target, value } => visitor.visit_assignment(target, value),
            K::FunctionCall { id, args } => visitor.visit_function_call(id, args),
            K::Block(exprs) => visitor.visit_block(exprs),
            K::Record { type_id, fields } => visitor.visit_record(type_id, fields),
            K::Array {
                type_id,
                size,
                value,
            } => visitor.visit_array(type_id, size, value),
            K::IfThen {
                condition,
                then_expr,
            } => visitor.visit_if_then(condition, then_expr),
            K::IfThenElse {
                condition,
                then_expr,
                else_expr,
            } => visitor.visit_if_then_else(condition, then_expr, else_expr),
            K::While { condition, body } => visitor.visit_while(condition, body),
            K::For {
                var,
                first,
                last,
                body,
            } => visitor.visit_for(var.id(), first, last, body),
            K::Break => visitor.visit_break(),
            K::Let { declarations, body } => visitor.visit_let(declarations, body),
            K::BuiltinBody => visitor.visit_builtin_body(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ExpressionKind::Nil)
    }
}

// ============================================================================
// L-values
// ============================================================================

/// An assignable location. Also usable wherever a value is expected through
/// [`ExpressionKind::LValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct LValue {
    pub node_id: NodeId,
    pub kind: LValueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LValueKind {
    Id(String),
    Field { base: Rc<LValue>, field: String },
    Index { base: Rc<LValue>, index: Rc<Expression> },
}

impl LValue {
    pub fn accept<'ast, V>(&'ast self, visitor: &mut V) -> Flow
    where
        V: LValueVisitor<'ast> + ?Sized,
    {
        match &self.kind {
            LValueKind::Id(id) => visitor.visit_id(id),
            LValueKind::Field { base, field } => visitor.visit_field(base, field),
            LValueKind::Index { base, index } => visitor.visit_index(base, index),
        }
    }

    /// Returns the base location of a field or index access.
    pub fn base(&self) -> Option<&LValue> {
        match &self.kind {
            LValueKind::Id(_) => None,
            LValueKind::Field { base, .. } | LValueKind::Index { base, .. } => Some(base),
        }
    }
}
