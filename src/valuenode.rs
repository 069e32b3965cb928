//! The value-node expression graph.
//!
//! A [`ValueNode`] is one node of an immutable expression DAG recording how
//! a value observed in a register came to be: a literal, the result of a
//! method call, or the result of some other bytecode operation. Nodes are
//! compared and hashed by identity (pointer equality), never by structural
//! equality, matching `original_source/quark/core/struct/valuenode.py`'s
//! `__eq__`/`__hash__` overrides (`self is value` / `id(self)`).

mod node;
mod resolve;
mod traverse;

#[cfg(test)]
mod tests;

pub use node::{BytecodeOps, MethodCall, Primitive, ValueNode};
pub use traverse::{iterate_prior_calls, iterate_prior_nodes, iterate_prior_primitives};
