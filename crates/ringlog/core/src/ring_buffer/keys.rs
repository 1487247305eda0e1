//! Key layout for one ring buffer namespace.
//!
//! ```text
//! {prefix}:position      persisted position counter
//! {prefix}:entry:{i}     slot i, for i in 0..capacity
//! ```

/// Literal written to the position key by a clear.
pub const POSITION_RESET: &str = "-1";

/// Counter value meaning "nothing written yet".
pub const EMPTY_POSITION: i64 = -1;

/// Maps counter values and slot indices to store keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    prefix: String,
    position_key: String,
    capacity: usize,
}

impl KeyLayout {
    /// `capacity` must be non-zero; callers validate it first.
    pub(crate) fn new(prefix: impl Into<String>, capacity: usize) -> Self {
        let prefix = prefix.into();
        Self {
            position_key: format!("{}:position", prefix),
            prefix,
            capacity,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn position_key(&self) -> &str {
        &self.position_key
    }

    pub fn slot_key(&self, slot: usize) -> String {
        format!("{}:entry:{}", self.prefix, slot)
    }

    /// Slot holding the entry written with `counter`.
    ///
    /// Uses the Euclidean remainder, so a negative counter still lands in
    /// `0..capacity`.
    pub fn slot_for(&self, counter: i64) -> usize {
        counter.rem_euclid(self.capacity as i64) as usize
    }

    /// Slots in oldest-to-newest order for a buffer whose last write used
    /// `position`.
    ///
    /// Starts just past the last-written slot and ends on it.
    pub fn read_order(&self, position: i64) -> impl Iterator<Item = usize> {
        let capacity = self.capacity;
        let start = (self.slot_for(position) + 1) % capacity;
        (0..capacity).map(move |i| (start + i) % capacity)
    }

    /// Every slot key, in physical order.
    pub fn slot_keys(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.capacity).map(move |slot| self.slot_key(slot))
    }
}
