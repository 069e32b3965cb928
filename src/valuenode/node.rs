use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::common::types::MethodSignature;

/// A literal value produced directly by a constant-loading instruction.
#[derive(Debug)]
pub(super) struct PrimitiveData {
    pub value: String,
    pub value_type: Option<String>,
}

/// The result of invoking a method, carrying the argument nodes that were
/// consumed at the call site.
#[derive(Debug)]
pub(super) struct MethodCallData {
    pub method: MethodSignature,
    pub arguments: Vec<ValueNode>,
}

/// The result of some other bytecode operation (array ops, casts,
/// arithmetic, ...), expressed as a format string plus its operand nodes.
#[derive(Debug)]
pub(super) struct BytecodeOpsData {
    pub str_format: String,
    pub operands: Vec<ValueNode>,
    pub data: String,
}

#[derive(Debug)]
pub(super) enum NodeKind {
    Primitive(PrimitiveData),
    MethodCall(MethodCallData),
    BytecodeOps(BytecodeOpsData),
}

#[derive(Debug)]
pub(super) struct Inner {
    pub kind: NodeKind,
    pub resolved_with_args: OnceLock<String>,
    pub resolved_without_args: OnceLock<String>,
}

/// A reference-counted handle to one node of the value-node graph.
///
/// Cloning a `ValueNode` clones the handle, not the node: two handles
/// produced from the same constructor call share identity
/// ([`ValueNode::is_same_node`]), exactly as two Python references to the
/// same `ValueNode` instance do in the original.
#[derive(Debug, Clone)]
pub struct ValueNode(pub(super) Rc<Inner>);

impl ValueNode {
    pub(super) fn new(kind: NodeKind) -> Self {
        ValueNode(Rc::new(Inner {
            kind,
            resolved_with_args: OnceLock::new(),
            resolved_without_args: OnceLock::new(),
        }))
    }

    /// Identity comparison — the only equality this type has, matching the
    /// original's `__eq__`/`__hash__` overrides.
    #[must_use]
    pub fn is_same_node(&self, other: &ValueNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub(super) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(super) fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    /// The direct children of this node in the DAG (arguments/operands),
    /// empty for a [`Primitive`].
    #[must_use]
    pub fn children(&self) -> &[ValueNode] {
        match &self.0.kind {
            NodeKind::Primitive(_) => &[],
            NodeKind::MethodCall(data) => &data.arguments,
            NodeKind::BytecodeOps(data) => &data.operands,
        }
    }

    /// Resolves this node to its string representation, recursing through
    /// children. When `evaluate_args` is true, [`Primitive`] leaves coerce
    /// their textual value using their type hint (matching
    /// `evaluateArgument` in the original); when false, the raw text is used
    /// verbatim.
    #[must_use]
    pub fn resolve(&self, evaluate_args: bool) -> String {
        super::resolve::iterative_resolve(self, evaluate_args)
    }
}

impl PartialEq for ValueNode {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_node(other)
    }
}

impl Eq for ValueNode {}

impl std::hash::Hash for ValueNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ptr_id().hash(state);
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolve(true))
    }
}

/// Constructor namespace for literal value nodes.
pub struct Primitive;

impl Primitive {
    /// Builds a literal node. `value_type` is a Dalvik type descriptor
    /// fragment (`"I"`, `"Z"`, `"F"`, `"D"`, ...) or `None` for an untyped
    /// literal (e.g. a string constant).
    #[must_use]
    pub fn new(value: impl Into<String>, value_type: Option<impl Into<String>>) -> ValueNode {
        ValueNode::new(NodeKind::Primitive(PrimitiveData {
            value: value.into(),
            value_type: value_type.map(Into::into),
        }))
    }
}

/// Constructor namespace for method-invocation nodes.
pub struct MethodCall;

impl MethodCall {
    #[must_use]
    pub fn new(method: MethodSignature, arguments: Vec<ValueNode>) -> ValueNode {
        ValueNode::new(NodeKind::MethodCall(MethodCallData { method, arguments }))
    }
}

/// Constructor namespace for generic bytecode-operation nodes.
pub struct BytecodeOps;

impl BytecodeOps {
    /// `str_format` uses `{src0}`, `{src1}`, ... placeholders for operands
    /// (by position) and `{data}` for the node's opaque payload, matching
    /// the original's `_assembleResolvedString` template substitution.
    #[must_use]
    pub fn new(
        str_format: impl Into<String>,
        operands: Vec<ValueNode>,
        data: impl Into<String>,
    ) -> ValueNode {
        ValueNode::new(NodeKind::BytecodeOps(BytecodeOpsData {
            str_format: str_format.into(),
            operands,
            data: data.into(),
        }))
    }
}
