//! Shared, dependency-free data types used across components.

use serde::Serialize;
use std::fmt;

/// The canonical signature of a method: `Lclass/name;->methodName(desc)ret`.
///
/// This is the same textual form
/// `original_source/tests/evaluator/test_pyeval.py`'s fixtures use throughout
/// (no standalone method-signature source file is present in this pack).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodSignature {
    pub class_name: String,
    pub name: String,
    pub descriptor: String,
}

impl MethodSignature {
    #[must_use]
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        MethodSignature {
            class_name: class_name.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// True if this method belongs to a class the adapter layer treats as
    /// external (Android framework, Java/Kotlin standard library).
    #[must_use]
    pub fn is_external(&self) -> bool {
        const EXTERNAL_PREFIXES: [&str; 4] = ["Landroid/", "Ljava/", "Ljavax/", "Lkotlin/"];
        EXTERNAL_PREFIXES
            .iter()
            .any(|prefix| self.class_name.starts_with(prefix))
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{}{}",
            self.class_name, self.name, self.descriptor
        )
    }
}

impl MethodSignature {
    /// The return type fragment of `descriptor` (the part after the closing
    /// paren), e.g. `"V"` for `"(I)V"` or `"Ljava/lang/String;"` for
    /// `"()Ljava/lang/String;"`.
    #[must_use]
    pub fn return_type(&self) -> &str {
        self.descriptor
            .rsplit(')')
            .next()
            .unwrap_or(&self.descriptor)
    }

    /// The parameter type fragments of `descriptor`, split on top-level
    /// boundaries (primitives are one character, arrays keep their leading
    /// `[`s, reference types run up to and including their `;`).
    #[must_use]
    pub fn parameter_types(&self) -> Vec<&str> {
        let inner = self
            .descriptor
            .strip_prefix('(')
            .and_then(|rest| rest.split(')').next())
            .unwrap_or("");
        split_type_descriptors(inner)
    }
}

fn split_type_descriptors(inner: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        while bytes[i] == b'[' {
            i += 1;
        }
        if bytes[i] == b'L' {
            while bytes[i] != b';' {
                i += 1;
            }
            i += 1;
        } else {
            i += 1;
        }
        out.push(&inner[start..i]);
    }
    out
}

/// One instruction of a method's disassembled bytecode stream, as reported
/// by the (out-of-scope) disassembler backend through [`crate::apkinfo::ApkInfo`].
///
/// Register operands are plain indices; any trailing literal, type, or
/// method-reference operand a mnemonic needs is carried in `operand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub mnemonic: String,
    pub registers: Vec<usize>,
    pub operand: Option<String>,
}

impl Instruction {
    #[must_use]
    pub fn new(mnemonic: impl Into<String>, registers: Vec<usize>, operand: Option<String>) -> Self {
        Instruction {
            mnemonic: mnemonic.into(),
            registers,
            operand,
        }
    }
}
