use std::collections::{HashSet, VecDeque};

use super::node::{NodeKind, ValueNode};

/// Which variant a traversal predicate should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVariant {
    Primitive,
    MethodCall,
    BytecodeOps,
}

fn variant_of(node: &ValueNode) -> NodeVariant {
    match node.kind() {
        NodeKind::Primitive(_) => NodeVariant::Primitive,
        NodeKind::MethodCall(_) => NodeVariant::MethodCall,
        NodeKind::BytecodeOps(_) => NodeVariant::BytecodeOps,
    }
}

/// Breadth-first traversal over the DAG rooted at `node`, yielding every
/// node (including the root) whose variant matches `variant`.
///
/// Matches `iteratePriorNodes` in
/// `original_source/quark/core/struct/valuenode.py`: a `deque`-based BFS
/// with a visited set keyed by node identity, so a node reachable through
/// multiple paths is yielded only once.
#[must_use]
pub fn iterate_prior_nodes(node: &ValueNode, variant: NodeVariant) -> Vec<ValueNode> {
    let mut out = Vec::new();
    let mut visited: HashSet<usize> = HashSet::new();
    let mut queue: VecDeque<ValueNode> = VecDeque::new();

    visited.insert(node.ptr_id());
    queue.push_back(node.clone());

    while let Some(current) = queue.pop_front() {
        if variant_of(&current) == variant {
            out.push(current.clone());
        }
        for child in current.children() {
            if visited.insert(child.ptr_id()) {
                queue.push_back(child.clone());
            }
        }
    }

    out
}

/// All `MethodCall` nodes reachable from `node` (including `node` itself).
#[must_use]
pub fn iterate_prior_calls(node: &ValueNode) -> Vec<ValueNode> {
    iterate_prior_nodes(node, NodeVariant::MethodCall)
}

/// All `Primitive` nodes reachable from `node` (including `node` itself).
#[must_use]
pub fn iterate_prior_primitives(node: &ValueNode) -> Vec<ValueNode> {
    iterate_prior_nodes(node, NodeVariant::Primitive)
}
