use std::collections::HashMap;

use super::object::RegisterObject;

/// The per-register history of observations for one method evaluation.
///
/// Grounded in `original_source/quark/core/struct/tableobject.py`'s
/// `TableObject`, which allocates a fixed-length `hash_table` of stacks
/// (one per declared register) and silently drops writes/reads outside that
/// range. Some adapters don't report a reliable register count up front, so
/// this type also offers an auto-vivifying mode; callers pick whichever
/// matches what their [`crate::apkinfo::ApkInfo`] backend can tell them.
#[derive(Debug, Clone)]
pub enum RegisterTable {
    /// Fixed-size table: indices outside `0..size` are silently ignored on
    /// write and read as empty, matching the original's `IndexError: pass`
    /// behavior.
    Sized(Vec<Vec<RegisterObject>>),
    /// Auto-vivifying table: any register index is accepted.
    Unsized(HashMap<usize, Vec<RegisterObject>>),
}

impl RegisterTable {
    #[must_use]
    pub fn sized(register_count: usize) -> Self {
        RegisterTable::Sized((0..register_count).map(|_| Vec::new()).collect())
    }

    #[must_use]
    pub fn unsized_table() -> Self {
        RegisterTable::Unsized(HashMap::new())
    }

    /// The declared register count, if this table is in sized mode.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        match self {
            RegisterTable::Sized(rows) => Some(rows.len()),
            RegisterTable::Unsized(_) => None,
        }
    }

    /// Records a new observation for register `index`. Out-of-range writes
    /// on a sized table are silently dropped, matching the original.
    pub fn insert(&mut self, index: usize, object: RegisterObject) {
        match self {
            RegisterTable::Sized(rows) => {
                if let Some(stack) = rows.get_mut(index) {
                    stack.push(object);
                }
            }
            RegisterTable::Unsized(map) => map.entry(index).or_default().push(object),
        }
    }

    /// Every observation recorded for register `index`, oldest first.
    /// Out-of-range or never-written registers yield an empty slice rather
    /// than an error.
    #[must_use]
    pub fn get_values(&self, index: usize) -> &[RegisterObject] {
        match self {
            RegisterTable::Sized(rows) => rows.get(index).map_or(&[], Vec::as_slice),
            RegisterTable::Unsized(map) => map.get(&index).map_or(&[], Vec::as_slice),
        }
    }

    /// The most recent observation for register `index`, if any has been
    /// recorded.
    #[must_use]
    pub fn get_latest(&self, index: usize) -> Option<&RegisterObject> {
        self.get_values(index).last()
    }

    /// Records a new consuming call on the most recent observation of
    /// register `index`, if one exists. A no-op for an unwritten or
    /// out-of-range register.
    pub fn record_call_on_latest(&mut self, index: usize, call: crate::valuenode::ValueNode) {
        let stack = match self {
            RegisterTable::Sized(rows) => rows.get_mut(index),
            RegisterTable::Unsized(map) => map.get_mut(&index),
        };
        if let Some(Some(last)) = stack.map(|s| s.last_mut()) {
            last.record_call(call);
        }
    }

    /// Backfills a type hint onto the most recent observation of register
    /// `index`, only if it doesn't already carry one. A no-op for an
    /// unwritten or out-of-range register.
    pub fn set_type_on_latest_if_missing(&mut self, index: usize, value_type: impl Into<String>) {
        let stack = match self {
            RegisterTable::Sized(rows) => rows.get_mut(index),
            RegisterTable::Unsized(map) => map.get_mut(&index),
        };
        if let Some(Some(last)) = stack.map(|s| s.last_mut()) {
            last.set_type_if_missing(value_type);
        }
    }
}
