//! Canonical postfix -> type-descriptor table shared by the unary, cast,
//! binary, and array-access instruction families.
//!
//! Exercised (though never defined in source form, since the module that
//! owns it isn't part of this pack's snapshot) throughout
//! `original_source/tests/evaluator/test_pyeval.py`, which asserts each
//! family's destination type against `pyeval.type_mapping[postfix]`.

/// Maps a Dalvik mnemonic's type postfix (`int`, `long`, `object`, ...) to
/// its canonical type descriptor. Returns `None` for a postfix this table
/// doesn't cover (callers fall back to their own family-specific default).
#[must_use]
pub(super) fn descriptor_for_postfix(postfix: &str) -> Option<&'static str> {
    match postfix {
        "int" => Some("I"),
        "long" => Some("J"),
        "short" => Some("S"),
        "byte" => Some("B"),
        "char" => Some("C"),
        "boolean" => Some("Z"),
        "float" => Some("F"),
        "double" => Some("D"),
        "object" => Some("Ljava/lang/Object;"),
        _ => None,
    }
}
