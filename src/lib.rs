//! # APK Analysis Core
//!
//! The analytical core of an Android malware detection engine. Given an
//! already-disassembled APK, this crate:
//!
//! 1. neutralizes common anti-analysis tampering directly in the package's
//!    ZIP container ([`patcher`]),
//! 2. exposes a cross-reference graph over an application's bytecode
//!    methods ([`apkinfo`]), and
//! 3. performs per-method symbolic interpretation of a register-based
//!    bytecode to recover the argument provenance of every method
//!    invocation ([`interpreter`], built on [`valuenode`] and [`register`]).
//!
//! ## Architecture
//!
//! ```text
//! APK image (mmap) -> patcher::patch()  -> repaired bytes
//!                                           |
//!                         ApkInfo adapter (external disassembler)
//!                                           |
//!                      per-method instruction stream
//!                                           |
//!                              interpreter::Interpreter
//!                                           |
//!                     RegisterTable of ValueNode provenance trees
//! ```
//!
//! The disassembler/APK parser that produces method lists, class
//! hierarchies, and instruction streams is out of scope for this crate; it
//! is reached only through the [`apkinfo::ApkInfo`] trait. Rule loading,
//! matching, scoring, and reporting are likewise external and out of scope.

pub mod apkinfo;
pub mod common;
pub mod interpreter;
pub mod patcher;
pub mod register;
pub mod valuenode;

pub use common::config::AnalysisConfig;
pub use common::errors::{AnalysisError, AnalysisResult};
pub use common::types::MethodSignature;

pub use apkinfo::{ApkInfo, MethodGraph, MethodObject, StaticApkInfo};
pub use interpreter::{Instruction, Interpreter};
pub use patcher::ApkPatcher;
pub use register::{RegisterObject, RegisterTable};
pub use valuenode::{BytecodeOps, MethodCall, Primitive, ValueNode};
