//! Adapter over the (out-of-scope) disassembler/APK parser.
//!
//! [`ApkInfo`] is the seam between this crate and whatever backend actually
//! parses DEX bytecode out of an APK. The interpreter and any downstream
//! rule engine talk to that backend only through this trait, never through
//! a concrete parser type — mirroring how
//! `original_source/quark/core/dextraceapkinfo.py`'s `DexTraceApkInfo`
//! (one possible backend) is consumed only through `quark.core.apkinfo`'s
//! abstract interface in the original.

mod graph;
mod method;

pub use graph::{MethodGraph, StaticApkInfo};
pub use method::MethodObject;

use crate::common::errors::ApkInfoError;
use crate::common::types::{Instruction, MethodSignature};

/// The cross-reference surface a method-provenance interpreter (or any
/// downstream detection rule) needs over a disassembled APK.
///
/// All default-provided methods (`android_apis`, `custom_methods`) are
/// derived from [`ApkInfo::all_methods`] the same way the original derives
/// its `android_apis`/`custom_methods` properties from `all_methods` by
/// filtering on class-name prefix.
pub trait ApkInfo {
    /// Every method the backend knows about, internal and external alike.
    fn all_methods(&self) -> Vec<&MethodObject>;

    /// Methods matching the given filters; any `None` filter matches
    /// everything. Mirrors `find_method(class_name, method_name, descriptor)`.
    fn find_method(
        &self,
        class_name: Option<&str>,
        name: Option<&str>,
        descriptor: Option<&str>,
    ) -> Vec<&MethodObject>;

    /// Every method that calls `method`, in no particular order.
    fn upperfunc(&self, method: &MethodSignature) -> Vec<MethodSignature>;

    /// Every method `method` calls, paired with its stable call-order index
    /// among `method`'s other invocations (ties broken first on recorded
    /// invocation offset, then on original insertion order — see
    /// [`graph::build_call_order`]).
    fn lowerfunc(&self, method: &MethodSignature) -> Vec<(MethodSignature, usize)>;

    /// The direct superclass of `class_name`, if recorded.
    fn superclass(&self, class_name: &str) -> Option<String>;

    /// The direct subclasses of `class_name`.
    fn subclasses(&self, class_name: &str) -> Vec<String>;

    /// Resolves a virtual/interface/super dispatch to the signature of the
    /// class that actually implements it: the first implementer found by a
    /// depth-first walk of the hierarchy starting at `class_name`, matching
    /// `_lookup_implement`'s documented behavior in the original PyEval.
    fn resolve_implementer(
        &self,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
    ) -> Result<MethodSignature, ApkInfoError>;

    /// The disassembled instruction stream for `method`, if the backend has
    /// it available.
    fn method_bytecode(&self, method: &MethodSignature) -> Option<&[Instruction]>;

    /// Methods belonging to the Android framework or the Java/Kotlin
    /// standard library, per [`MethodSignature::is_external`].
    fn android_apis(&self) -> Vec<&MethodObject> {
        self.all_methods()
            .into_iter()
            .filter(|m| m.signature.is_external())
            .collect()
    }

    /// Methods belonging to the application itself.
    fn custom_methods(&self) -> Vec<&MethodObject> {
        self.all_methods()
            .into_iter()
            .filter(|m| !m.signature.is_external())
            .collect()
    }
}
