use serde::Serialize;

use crate::common::types::MethodSignature;

/// A method as recorded in the cross-reference graph: its signature plus
/// whatever the backend could determine about its declaring hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodObject {
    pub signature: MethodSignature,
    /// The number of registers the method's bytecode declares (locals +
    /// parameters), when known — used to size a [`crate::register::RegisterTable`]
    /// in sized mode.
    pub register_count: Option<usize>,
}

impl MethodObject {
    #[must_use]
    pub fn new(signature: MethodSignature, register_count: Option<usize>) -> Self {
        MethodObject {
            signature,
            register_count,
        }
    }
}
