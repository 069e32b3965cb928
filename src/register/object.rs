use crate::valuenode::{iterate_prior_calls, ValueNode};

/// One observation of a register's contents: the value it held, the type
/// hint attached to that write (if any), and every method-call node that
/// later consumed it as an argument.
///
/// Grounded in `original_source/quark/core/struct/registerobject.py`.
/// `called_by_func` is append-only in the original (the property setter
/// appends rather than replaces); that's modeled here as
/// [`RegisterObject::record_call`] rather than a public setter.
#[derive(Debug, Clone)]
pub struct RegisterObject {
    value: ValueNode,
    current_type: Option<String>,
    called_by_func: Vec<ValueNode>,
}

impl RegisterObject {
    #[must_use]
    pub fn new(value: ValueNode, value_type: Option<String>) -> Self {
        RegisterObject {
            value,
            current_type: value_type,
            called_by_func: Vec::new(),
        }
    }

    /// Builds a register observation that already records one consuming
    /// call, matching the original's `RegisterObject(value, called_by_func, value_type)`
    /// constructor which appends the given call immediately.
    #[must_use]
    pub fn with_initial_call(
        value: ValueNode,
        value_type: Option<String>,
        called_by_func: ValueNode,
    ) -> Self {
        let mut obj = Self::new(value, value_type);
        obj.record_call(called_by_func);
        obj
    }

    #[must_use]
    pub fn value(&self) -> &ValueNode {
        &self.value
    }

    #[must_use]
    pub fn current_type(&self) -> Option<&str> {
        self.current_type.as_deref()
    }

    #[must_use]
    pub fn called_by(&self) -> &[ValueNode] {
        &self.called_by_func
    }

    /// Appends a newly observed consuming call. Mirrors the original's
    /// `called_by_func` property setter, which appends rather than replaces.
    pub fn record_call(&mut self, call: ValueNode) {
        self.called_by_func.push(call);
    }

    /// Backfills the type hint from a consuming call's declared signature
    /// when this observation was recorded without one.
    pub fn set_type_if_missing(&mut self, value_type: impl Into<String>) {
        if self.current_type.as_deref().map_or(true, str::is_empty) {
            self.current_type = Some(value_type.into());
        }
    }

    /// Whether this register is carrying an object reference rather than a
    /// primitive value: true when there is no recorded type hint, or the
    /// hint is a reference-type descriptor (`L...;`).
    #[must_use]
    pub fn bears_object(&self) -> bool {
        match &self.current_type {
            None => true,
            Some(t) => t.starts_with('L'),
        }
    }

    /// Every `MethodCall` node reachable from any call that has consumed
    /// this register, flattened and deduplicated by identity.
    ///
    /// Mirrors `registerobject.py::iterateInvolvedCalls`, which yields from
    /// `iteratePriorCalls(call)` for every call in `called_by_func`, not
    /// just the most recent one.
    #[must_use]
    pub fn iterate_involved_calls(&self) -> Vec<ValueNode> {
        let mut out = Vec::new();
        let mut seen: std::collections::HashSet<ValueNode> = std::collections::HashSet::new();
        for call in &self.called_by_func {
            for node in iterate_prior_calls(call) {
                if seen.insert(node.clone()) {
                    out.push(node);
                }
            }
        }
        out
    }
}

impl PartialEq for RegisterObject {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.current_type == other.current_type
            && self.called_by_func.len() == other.called_by_func.len()
            && self
                .called_by_func
                .iter()
                .zip(other.called_by_func.iter())
                .all(|(a, b)| a.is_same_node(b))
    }
}
