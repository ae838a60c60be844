use thiserror::Error;

/// A broken table invariant, as reported by the `validate` methods.
///
/// None of these can arise from the table's own operations. They indicate
/// that a caller supplied a hash function and equality predicate that
/// disagree with each other, or mutated a stored key in a way that changed
/// its hash or equality.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// The population counter disagrees with the number of occupied slots.
    #[error("table records {recorded} entries but {occupied} slots are occupied")]
    LengthMismatch {
        /// Value of the population counter.
        recorded: usize,
        /// Number of occupied slots found by scanning.
        occupied: usize,
    },

    /// The load factor is at or above the growth threshold.
    #[error("{len} entries in {capacity} slots is at or above the growth threshold")]
    Overloaded {
        /// Number of live entries.
        len: usize,
        /// Number of slots.
        capacity: usize,
    },

    /// A slot's recorded probe distance is not its offset from its home slot.
    #[error("slot {index} records probe distance {recorded} but sits {actual} slots from home")]
    DistanceMismatch {
        /// Slot index.
        index: usize,
        /// Distance stored in the slot.
        recorded: usize,
        /// Distance implied by the cached hash.
        actual: usize,
    },

    /// A displaced entry directly follows an unoccupied slot, so lookups
    /// stop before reaching it.
    #[error("slot {index} holds an entry displaced by {distance} behind an empty slot")]
    StrandedEntry {
        /// Slot index.
        index: usize,
        /// Probe distance of the stranded entry.
        distance: usize,
    },

    /// An entry sits more than one slot farther from home than its
    /// predecessor, which Robin Hood placement never produces.
    #[error("slot {index} has probe distance {distance} after a neighbour at {previous}")]
    DisplacementOrder {
        /// Slot index.
        index: usize,
        /// Probe distance of the entry at `index`.
        distance: usize,
        /// Probe distance of the entry at `index - 1`.
        previous: usize,
    },

    /// An entry no longer hashes to the value cached when it was inserted.
    #[error("slot {index} caches hash {cached:#018x} but its key hashes to {computed:#018x}")]
    HashMismatch {
        /// Slot index.
        index: usize,
        /// Hash cached at insertion time.
        cached: u64,
        /// Hash computed now.
        computed: u64,
    },

    /// Two slots hold keys that compare equal.
    #[error("slots {first} and {second} hold equal keys")]
    DuplicateKey {
        /// First slot index.
        first: usize,
        /// Second slot index.
        second: usize,
    },
}
