//! # Sensor registry
//!
//! Maps each distinct sensor code to a **stable dense index**, used as row/column of the
//! OD matrices.
//!
//! ## Invariants
//! -----------------
//! * Indices are assigned in **first-seen order**, starting at 0.
//! * Every code ever registered has exactly one index; indices are contiguous `[0, N)`.
//! * Nothing is ever reassigned or removed, short of a full [`SensorRegistry::clear`].
//!
//! The registry is plain owned state, mutated through `&mut self`: it belongs to one
//! [`OdSession`](crate::session::OdSession) and sees records strictly in file order, which
//! keeps the index assignment deterministic (the order is observable in the `IDS` dump).
use crate::constants::{SensorCode, SensorIndex};

pub mod bimap;

use bimap::BiMap;

#[derive(Debug, Clone, Default)]
pub struct SensorRegistry {
    codes: BiMap<SensorCode>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sensor code.
    ///
    /// Arguments
    /// ---------
    /// * `sensor_code`: the code read from a detection
    ///
    /// Return
    /// ------
    /// * the index of the code: a fresh one (`size()` before the call) for an unseen code,
    ///   the existing one otherwise
    pub fn register(&mut self, sensor_code: &str) -> SensorIndex {
        match self.codes.get_by_key(sensor_code) {
            Some(idx) => idx,
            None => self.codes.entry_or_insert_by_key(&sensor_code.to_string()),
        }
    }

    /// Index of a sensor code, `None` if it was never registered.
    pub fn lookup(&self, sensor_code: &str) -> Option<SensorIndex> {
        self.codes.get_by_key(sensor_code)
    }

    /// Sensor code assigned to `index`, `None` if out of `[0, size())`.
    pub fn code_of(&self, index: SensorIndex) -> Option<&str> {
        self.codes.get_by_value(index).map(String::as_str)
    }

    /// Number of distinct sensor codes seen.
    pub fn size(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(code, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SensorIndex)> {
        self.codes.iter().map(|(code, idx)| (code.as_str(), idx))
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }
}
