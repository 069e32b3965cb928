//! Error taxonomy for the analytical core.
//!
//! Each component gets its own error enum; [`AnalysisError`] aggregates them
//! with `#[from]` so callers can propagate with `?` regardless of which
//! component failed.

use thiserror::Error;

/// Errors raised while repairing a tampered APK's ZIP container.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("no End Of Central Directory record found in image")]
    NoEocd,

    #[error("central directory header at offset {offset} has an invalid signature")]
    InvalidCdhSignature { offset: usize },

    #[error("local file header at offset {offset} has an invalid signature")]
    InvalidLfhSignature { offset: usize },

    #[error("unexpected end of image while reading {field} at offset {offset}")]
    UnexpectedEof { field: &'static str, offset: usize },

    #[error("image is not mutable (memory map is read-only)")]
    ReadOnlyImage,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while symbolically interpreting a method's bytecode.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("register v{index} is out of range for a table of size {size}")]
    RegisterOutOfBounds { index: usize, size: usize },

    #[error("register v{index} has never been written")]
    RegisterUninitialized { index: usize },

    #[error("could not resolve method pattern for invocation of {descriptor}")]
    MethodLookupFailed { descriptor: String },

    #[error("instruction {mnemonic:?} requires {expected} operand registers, got {actual}")]
    OperandCountMismatch {
        mnemonic: String,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported or unrecognized mnemonic {mnemonic:?}")]
    UnsupportedMnemonic { mnemonic: String },

    #[error("value node resolution did not terminate (cycle detected at a non-shared node)")]
    UnresolvedCycle,
}

/// Errors raised by the [`crate::apkinfo`] adapter layer.
#[derive(Debug, Error)]
pub enum ApkInfoError {
    #[error("method {0} not found in the cross-reference graph")]
    MethodNotFound(String),

    #[error("class {0} has no recorded superclass relationship")]
    UnknownClass(String),
}

/// Top-level error aggregating every component's error kinds.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Interpreter(#[from] InterpreterError),

    #[error(transparent)]
    ApkInfo(#[from] ApkInfoError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Whether the outer detection pass can reasonably continue to the next
    /// method/image after this error, rather than aborting the whole run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            AnalysisError::Patch(PatchError::NoEocd) => false,
            AnalysisError::Patch(_) => true,
            AnalysisError::Interpreter(_) => true,
            AnalysisError::ApkInfo(_) => true,
            AnalysisError::Config(_) => false,
            AnalysisError::Io(_) => false,
            AnalysisError::Internal(_) => false,
        }
    }

    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AnalysisError::Patch(PatchError::NoEocd) => ErrorSeverity::Fatal,
            AnalysisError::Interpreter(InterpreterError::RegisterUninitialized { .. }) => {
                ErrorSeverity::Warning
            }
            AnalysisError::Config(_) | AnalysisError::Io(_) | AnalysisError::Internal(_) => {
                ErrorSeverity::Fatal
            }
            _ => ErrorSeverity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Fatal,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Fatal => write!(f, "fatal"),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_eocd_is_unrecoverable_and_fatal() {
        let err = AnalysisError::Patch(PatchError::NoEocd);
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn uninitialized_register_is_recoverable_warning() {
        let err = AnalysisError::Interpreter(InterpreterError::RegisterUninitialized { index: 3 });
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn bad_cdh_signature_is_recoverable() {
        let err = AnalysisError::Patch(PatchError::InvalidCdhSignature { offset: 128 });
        assert!(err.is_recoverable());
    }
}
