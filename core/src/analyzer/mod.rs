//! Type inference.
//!
//! Assigns a type id to every expression of a resolved tree, bottom-up. The
//! result is a [`TypeTable`] keyed by node id. Besides real type ids, three
//! markers can appear:
//!
//! - [`NONE_TYPE`]: the expression produces no value (assignment, loops, ...),
//! - [`UNKNOWN_TYPE`]: an identifier, field or call could not be resolved,
//! - [`UNSET_TYPE`]: the node was never typed.
//!
//! Inference records types, it does not check them. Lookup failures give
//! [`UNKNOWN_TYPE`] plus a warning diagnostic, never an error.

mod infer;
mod nil;


pub use infer::infer_types;

use hashbrown::HashMap;

use crate::api::Diagnostic;
use crate::ast::{Expression, NodeId, Type};
use crate::namespace::Scopes;

/// Type of expressions that produce no value.
pub const NONE_TYPE: &str = "none";

/// Type of expressions whose type could not be resolved.
pub const UNKNOWN_TYPE: &str = "???";

/// Type of nodes not typed yet.
pub const UNSET_TYPE: &str = "unset";

/// Bound on `type a = b` chains, which may be cyclic.
const MAX_ALIAS_DEPTH: usize = 32;

/// Inferred type id of each expression.
#[derive(Debug, Default, Clone)]
pub struct TypeTable {
    types: HashMap<NodeId, String>,
}

impl TypeTable {
    /// Type id of the node, [`UNSET_TYPE`] if it has none.
    pub fn get(&self, node: NodeId) -> &str {
        self.types.get(&node).map_or(UNSET_TYPE, String::as_str)
    }

    pub fn type_of(&self, expr: &Expression) -> &str {
        self.get(expr.node_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn set(&mut self, node: NodeId, ty: impl Into<String>) {
        self.types.insert(node, ty.into());
    }
}

/// Result of type inference.
#[derive(Debug, Default)]
pub struct Analysis {
    pub types: TypeTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Looks up `type_id` in the type scope, following aliases.
pub(crate) fn resolve_type<'ast>(scopes: &Scopes<'ast>, type_id: &str) -> Option<&'ast Type> {
    let mut ty = scopes.lookup_type(type_id)?.ty()?;
    for _ in 0..MAX_ALIAS_DEPTH {
        match ty.alias_of() {
            Some(target) => ty = scopes.lookup_type(target)?.ty()?,
            None => return Some(ty),
        }
    }
    None
}
