use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

use super::method::MethodObject;
use super::ApkInfo;
use crate::common::errors::ApkInfoError;
use crate::common::types::{Instruction, MethodSignature};

/// One recorded call site: which method was called, and at what bytecode
/// offset (if the backend reported one).
#[derive(Debug, Clone, Serialize)]
struct CallSite {
    callee: MethodSignature,
    offset: Option<usize>,
}

/// A materialized method cross-reference graph: every known method plus its
/// caller/callee edges and class hierarchy, with a stable per-caller call
/// order.
///
/// Grounded in `original_source/quark/core/dextraceapkinfo.py`'s
/// `_build_graph`, including its exact tie-break rule for ordering a
/// caller's outgoing calls: known offsets sort first (ascending), offset-less
/// calls come after, and original insertion order is the final tiebreak.
#[derive(Debug, Clone, Default)]
pub struct MethodGraph {
    methods: IndexMap<MethodSignature, MethodObject>,
    callees: HashMap<MethodSignature, Vec<CallSite>>,
    callers: HashMap<MethodSignature, Vec<MethodSignature>>,
    superclass_of: HashMap<String, String>,
    subclasses_of: HashMap<String, Vec<String>>,
}

impl MethodGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_method(&mut self, method: MethodObject) {
        self.methods.insert(method.signature.clone(), method);
    }

    pub fn add_edge(&mut self, caller: MethodSignature, callee: MethodSignature, offset: Option<usize>) {
        self.callees
            .entry(caller.clone())
            .or_default()
            .push(CallSite { callee: callee.clone(), offset });
        self.callers.entry(callee).or_default().push(caller);
    }

    pub fn set_superclass(&mut self, class_name: impl Into<String>, superclass: impl Into<String>) {
        let class_name = class_name.into();
        let superclass = superclass.into();
        self.subclasses_of
            .entry(superclass.clone())
            .or_default()
            .push(class_name.clone());
        self.superclass_of.insert(class_name, superclass);
    }
}

/// Orders `sites` the way `dextraceapkinfo.py::_build_graph` orders a
/// caller's outgoing calls: `sorted(enumerate(items), key=(offset is None,
/// offset or 0, original index))`.
fn build_call_order(sites: &[CallSite]) -> Vec<(MethodSignature, usize)> {
    let mut indexed: Vec<(usize, &CallSite)> = sites.iter().enumerate().collect();
    indexed.sort_by_key(|(idx, site)| (site.offset.is_none(), site.offset.unwrap_or(0), *idx));
    indexed
        .into_iter()
        .enumerate()
        .map(|(order, (_, site))| (site.callee.clone(), order))
        .collect()
}

impl ApkInfo for MethodGraph {
    fn all_methods(&self) -> Vec<&MethodObject> {
        self.methods.values().collect()
    }

    fn find_method(
        &self,
        class_name: Option<&str>,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Vec<&MethodObject> {
        self.methods
            .values()
            .filter(|m| {
                class_name.map_or(true, |c| m.signature.class_name == c)
                    && name.map_or(true, |n| m.signature.name == n)
                    && descriptor.map_or(true, |d| m.signature.descriptor == d)
            })
            .collect()
    }

    fn upperfunc(&self, method: &MethodSignature) -> Vec<MethodSignature> {
        self.callers.get(method).cloned().unwrap_or_default()
    }

    fn lowerfunc(&self, method: &MethodSignature) -> Vec<(MethodSignature, usize)> {
        self.callees
            .get(method)
            .map(|sites| build_call_order(sites))
            .unwrap_or_default()
    }

    fn superclass(&self, class_name: &str) -> Option<String> {
        self.superclass_of.get(class_name).cloned()
    }

    fn subclasses(&self, class_name: &str) -> Vec<String> {
        self.subclasses_of.get(class_name).cloned().unwrap_or_default()
    }

    fn resolve_implementer(
        &self,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
    ) -> Result<MethodSignature, ApkInfoError> {
        let mut current = class_name.to_string();
        loop {
            let found = self.methods.values().find(|m| {
                m.signature.class_name == current
                    && m.signature.name == method_name
                    && m.signature.descriptor == descriptor
            });
            if let Some(method) = found {
                return Ok(method.signature.clone());
            }
            match self.superclass_of.get(&current) {
                Some(parent) => current = parent.clone(),
                None => {
                    return Err(ApkInfoError::MethodNotFound(format!(
                        "{class_name}->{method_name}{descriptor}"
                    )))
                }
            }
        }
    }

    fn method_bytecode(&self, _method: &MethodSignature) -> Option<&[Instruction]> {
        None
    }
}

/// An in-memory [`ApkInfo`] backend built from plain data, with no real
/// disassembler behind it.
///
/// This is test/fixture infrastructure: it plays the role
/// `original_source/tests/evaluator/test_pyeval.py`'s fixed `AndroguardImp`
/// sample plays for the original's `PyEval` tests, letting this crate (and
/// downstream crates) exercise the interpreter and graph without a real APK
/// on hand.
#[derive(Debug, Clone, Default)]
pub struct StaticApkInfo {
    graph: MethodGraph,
    bytecode: HashMap<MethodSignature, Vec<Instruction>>,
}

impl StaticApkInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_method(&mut self, method: MethodObject) {
        self.graph.add_method(method);
    }

    pub fn add_edge(&mut self, caller: MethodSignature, callee: MethodSignature, offset: Option<usize>) {
        self.graph.add_edge(caller, callee, offset);
    }

    pub fn set_superclass(&mut self, class_name: impl Into<String>, superclass: impl Into<String>) {
        self.graph.set_superclass(class_name, superclass);
    }

    pub fn set_bytecode(&mut self, method: MethodSignature, instructions: Vec<Instruction>) {
        self.bytecode.insert(method, instructions);
    }
}

impl ApkInfo for StaticApkInfo {
    fn all_methods(&self) -> Vec<&MethodObject> {
        self.graph.all_methods()
    }

    fn find_method(
        &self,
        class_name: Option<&str>,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Vec<&MethodObject> {
        self.graph.find_method(class_name, name, descriptor)
    }

    fn upperfunc(&self, method: &MethodSignature) -> Vec<MethodSignature> {
        self.graph.upperfunc(method)
    }

    fn lowerfunc(&self, method: &MethodSignature) -> Vec<(MethodSignature, usize)> {
        self.graph.lowerfunc(method)
    }

    fn superclass(&self, class_name: &str) -> Option<String> {
        self.graph.superclass(class_name)
    }

    fn subclasses(&self, class_name: &str) -> Vec<String> {
        self.graph.subclasses(class_name)
    }

    fn resolve_implementer(
        &self,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
    ) -> Result<MethodSignature, ApkInfoError> {
        self.graph.resolve_implementer(class_name, method_name, descriptor)
    }

    fn method_bytecode(&self, method: &MethodSignature) -> Option<&[Instruction]> {
        self.bytecode.get(method).map(Vec::as_slice)
    }
}
