//! The raw Robin Hood table underlying [`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet).
//!
//! [`HashTable`] stores values of any type and leaves hashing and equality to
//! the caller: every operation takes a precomputed `u64` hash plus a predicate
//! selecting the value it is interested in.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;

use crate::error::ContractViolation;

/// Number of slots in a freshly created table. Must be a power of two.
const INITIAL_CAPACITY: usize = 8;

/// Whether `len` entries in `capacity` slots reach the 3/4 growth threshold.
#[inline(always)]
fn exceeds_load_factor(len: usize, capacity: usize) -> bool {
    len * 4 >= capacity * 3
}

fn empty_slots<V>(capacity: usize) -> Vec<Option<Bucket<V>>> {
    core::iter::repeat_with(|| None).take(capacity).collect()
}

/// The contents of an occupied slot.
#[derive(Clone)]
struct Bucket<V> {
    hash: u64,
    /// How many slots past its home this entry currently sits.
    distance: usize,
    value: V,
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Largest probe distance of any entry
    pub max_distance: usize,
    /// Mean probe distance over all entries
    pub mean_distance: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_distance, self.mean_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// An open-addressing hash table using Robin Hood displacement.
///
/// `HashTable<V>` stores values of type `V` in a single contiguous array of
/// slots. On a collision the slot goes to whichever entry has probed farther
/// from its home slot, which keeps probe lengths short and uniform. Deletion
/// shifts the following displaced entries back instead of leaving
/// tombstones.
///
/// Unlike standard hash maps, this type requires you to provide both the hash
/// value and an equality predicate for each operation. The hash is cached
/// alongside the value and is never recomputed by the table.
///
/// The table starts with 8 slots and doubles whenever an insertion brings the
/// load factor to 3/4. It never shrinks.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use robin_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// let alice = Person {
///     id: 123,
///     name: "Alice".to_string(),
/// };
/// assert!(table.add(hash, alice, |p: &Person| p.id == 123));
///
/// let again = Person {
///     id: 123,
///     name: "Bob".to_string(),
/// };
/// assert!(!table.add(hash, again, |p: &Person| p.id == 123));
/// assert_eq!(table.find(hash, |p| p.id == 123).unwrap().name, "Alice");
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Option<Bucket<V>>>,
    populated: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .chunks(8)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot {
                                Some(bucket) => {
                                    format!("{:02}:{:04x}", bucket.distance, bucket.hash >> 48)
                                }
                                None => "..".to_string(),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with 8 slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert_eq!(table.capacity(), 8);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            slots: empty_slots(INITIAL_CAPACITY),
            populated: 0,
        }
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    #[inline(always)]
    fn home(&self, hash: u64) -> usize {
        hash as usize & self.mask()
    }

    #[inline(always)]
    fn bucket(&self, index: usize) -> &Bucket<V> {
        match &self.slots[index] {
            Some(bucket) => bucket,
            None => unreachable!("slot {index} was located as occupied"),
        }
    }

    #[inline(always)]
    fn bucket_mut(&mut self, index: usize) -> &mut Bucket<V> {
        match &mut self.slots[index] {
            Some(bucket) => bucket,
            None => unreachable!("slot {index} was located as occupied"),
        }
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are yielded in physical slot order, which has nothing to do with
    /// insertion order and changes whenever the table grows or shifts entries
    /// during removal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.add(1, "one", |&v| v == "one");
    /// table.add(2, "two", |&v| v == "two");
    ///
    /// let mut values: Vec<_> = table.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, ["one", "two"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: &self.slots,
            index: 0,
            end: self.slots.len(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator yielding mutable references to all values in the
    /// table.
    ///
    /// Callers must not change anything that takes part in the value's hash
    /// or equality.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// After calling `drain()`, the table will be empty, even if the iterator
    /// is dropped before it is exhausted. The table keeps its capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.add(7, 7u32, |&v| v == 7);
    ///
    /// let values: Vec<u32> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values, [7]);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of slots in the table.
    ///
    /// The table always keeps its load factor below 3/4, so at most
    /// `capacity() * 3 / 4` values fit before the next growth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.capacity(), 8);
    ///
    /// for i in 0..6u64 {
    ///     table.add(i, i, |&v| v == i);
    /// }
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Removes all elements from the table, keeping its capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for i in 0..20u64 {
    ///     table.add(i, i, |&v| v == i);
    /// }
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.slots.fill_with(|| None);
        self.populated = 0;
    }

    /// Finds a value in the table by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.add(42, 42u64, |&n| n == 42);
    ///
    /// assert_eq!(table.find(42, |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(99, |&n| n == 99), None);
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.search(hash, eq)?;
        Some(&self.bucket(index).value)
    }

    /// Finds a value in the table by hash and equality predicate, returning a
    /// mutable reference.
    ///
    /// Callers must not change anything that takes part in the value's hash
    /// or equality.
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.search(hash, eq)?;
        Some(&mut self.bucket_mut(index).value)
    }

    /// Returns `true` if a value matching the hash and predicate is present.
    #[inline]
    pub fn contains(&self, hash: u64, eq: impl Fn(&V) -> bool) -> bool {
        self.search(hash, eq).is_some()
    }

    /// Inserts `value` unless an equal value is already present.
    ///
    /// Returns `true` if the value was inserted. If a match exists the table
    /// is left untouched, `value` is dropped, and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert!(table.add(3, (3, "a"), |&(k, _)| k == 3));
    /// assert!(!table.add(3, (3, "b"), |&(k, _)| k == 3));
    /// assert_eq!(table.find(3, |&(k, _)| k == 3), Some(&(3, "a")));
    /// ```
    pub fn add(&mut self, hash: u64, value: V, eq: impl Fn(&V) -> bool) -> bool {
        match self.entry(hash, eq) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Inserts `value`, replacing an equal value if one is present.
    ///
    /// Returns the replaced value, or `None` if `value` was newly placed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert(3, (3, "a"), |&(k, _)| k == 3), None);
    /// assert_eq!(table.insert(3, (3, "b"), |&(k, _)| k == 3), Some((3, "a")));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, hash: u64, value: V, eq: impl Fn(&V) -> bool) -> Option<V> {
        match self.entry(hash, eq) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Removes and returns a value from the table.
    ///
    /// The entries following the removed one are shifted back to close the
    /// gap, so no tombstones are left behind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.add(42, 42u64, |&n| n == 42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        self.search(hash, eq).map(|index| self.remove_at(index))
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// Inserting through a [`VacantEntry`] may grow the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::Entry;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(5, |s: &String| s == "hello") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("hello".to_string());
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// let value = table
    ///     .entry(5, |s: &String| s == "hello")
    ///     .or_insert("other".to_string());
    /// assert_eq!(value, "hello");
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.search(hash, eq) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Walks the probe sequence for `hash` and returns the slot holding the
    /// matching value.
    ///
    /// The walk stops at an empty slot, or at a resident closer to its home
    /// than we are to ours: Robin Hood placement would have put a match ahead
    /// of it.
    #[inline]
    fn search(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }

        let mask = self.mask();
        let mut index = self.home(hash);
        let mut distance = 0;
        while let Some(bucket) = &self.slots[index] {
            if bucket.distance < distance {
                return None;
            }
            if bucket.hash == hash && eq(&bucket.value) {
                return Some(index);
            }

            distance += 1;
            index = (index + 1) & mask;
        }

        None
    }

    /// Adds a value known to be absent, growing first if the new entry would
    /// bring the load factor to the threshold. Returns its slot.
    ///
    /// Growing before placement gives the same layout as placing, rehashing
    /// everything else, and then re-placing the newcomer last.
    fn insert_new(&mut self, hash: u64, value: V) -> usize {
        if exceeds_load_factor(self.populated + 1, self.slots.len()) {
            self.grow();
        }

        self.populated += 1;
        self.place(Bucket {
            hash,
            distance: 0,
            value,
        })
    }

    /// Places `incoming` from its home slot with Robin Hood displacement and
    /// returns the slot it ends up in.
    ///
    /// Whenever the incoming entry is farther from home than the resident,
    /// the two trade places and the evicted resident continues the walk. The
    /// caller guarantees an empty slot exists and no equal value is present.
    fn place(&mut self, mut incoming: Bucket<V>) -> usize {
        debug_assert!(self.populated < self.slots.len());

        let mask = self.mask();
        let mut index = self.home(incoming.hash);
        let mut landed = None;
        loop {
            match self.slots[index] {
                None => {
                    self.slots[index] = Some(incoming);
                    return landed.unwrap_or(index);
                }
                Some(ref mut resident) => {
                    if incoming.distance > resident.distance {
                        #[cfg(feature = "logging")]
                        log::trace!(
                            "slot {index}: displacing entry at distance {} with one at {}",
                            resident.distance,
                            incoming.distance
                        );
                        mem::swap(&mut incoming, resident);
                        landed.get_or_insert(index);
                    }
                }
            }

            incoming.distance += 1;
            index = (index + 1) & mask;
            debug_assert!(incoming.distance < self.slots.len());
        }
    }

    /// Takes the value out of an occupied slot and backward-shifts the
    /// cluster behind it.
    fn remove_at(&mut self, index: usize) -> V {
        let Some(removed) = self.slots[index].take() else {
            unreachable!("slot {index} was located as occupied");
        };
        self.populated -= 1;

        let mask = self.mask();
        let mut hole = index;
        loop {
            let next = (hole + 1) & mask;
            match self.slots[next] {
                Some(ref bucket) if bucket.distance > 0 => {}
                _ => break,
            }

            self.slots.swap(hole, next);
            self.bucket_mut(hole).distance -= 1;
            hole = next;
        }

        debug_assert!(self.slots[hole].is_none());
        removed.value
    }

    /// Doubles the slot count and re-places every entry from its cached hash.
    #[cold]
    #[inline(never)]
    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;

        #[cfg(feature = "logging")]
        log::debug!(
            "growing table from {} to {} slots with {} entries",
            self.slots.len(),
            capacity,
            self.populated
        );

        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        for mut bucket in old.into_iter().flatten() {
            bucket.distance = 0;
            self.place(bucket);
        }
    }

    /// Checks every structural invariant of the table, plus the consistency
    /// of the stored values with the caller's hash function and equality.
    ///
    /// `rehash` must compute the same hash that was supplied when each value
    /// was inserted, and `eq` must report whether two stored values are the
    /// same key. The first violation found is returned.
    ///
    /// Every pair of stored values is compared with `eq`, so this runs in
    /// quadratic time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::ContractViolation;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for i in 0..10u64 {
    ///     table.add(i * 31, i, |&v| v == i);
    /// }
    /// assert_eq!(table.validate(|&v| v * 31, |a, b| a == b), Ok(()));
    ///
    /// // A hasher that disagrees with the one used for insertion.
    /// assert!(matches!(
    ///     table.validate(|&v| v * 37, |a, b| a == b),
    ///     Err(ContractViolation::HashMismatch { .. })
    /// ));
    /// ```
    pub fn validate(
        &self,
        rehash: impl Fn(&V) -> u64,
        eq: impl Fn(&V, &V) -> bool,
    ) -> Result<(), ContractViolation> {
        let capacity = self.slots.len();
        let occupied = self.slots.iter().flatten().count();
        if occupied != self.populated {
            return Err(ContractViolation::LengthMismatch {
                recorded: self.populated,
                occupied,
            });
        }
        if exceeds_load_factor(self.populated, capacity) {
            return Err(ContractViolation::Overloaded {
                len: self.populated,
                capacity,
            });
        }

        let mask = self.mask();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(bucket) = slot else {
                continue;
            };

            let actual = index.wrapping_sub(self.home(bucket.hash)) & mask;
            if bucket.distance != actual {
                return Err(ContractViolation::DistanceMismatch {
                    index,
                    recorded: bucket.distance,
                    actual,
                });
            }

            match &self.slots[index.wrapping_sub(1) & mask] {
                None if bucket.distance > 0 => {
                    return Err(ContractViolation::StrandedEntry {
                        index,
                        distance: bucket.distance,
                    });
                }
                Some(previous) if bucket.distance > previous.distance + 1 => {
                    return Err(ContractViolation::DisplacementOrder {
                        index,
                        distance: bucket.distance,
                        previous: previous.distance,
                    });
                }
                _ => {}
            }
        }

        for (index, slot) in self.slots.iter().enumerate() {
            let Some(bucket) = slot else {
                continue;
            };

            let computed = rehash(&bucket.value);
            if computed != bucket.hash {
                return Err(ContractViolation::HashMismatch {
                    index,
                    cached: bucket.hash,
                    computed,
                });
            }
        }

        // Pairwise, so equal values stored under different hashes are caught.
        let entries = || {
            self.slots
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.as_ref().map(|bucket| (index, &bucket.value)))
        };
        for (first, value) in entries() {
            if let Some((second, _)) = entries()
                .skip_while(|&(index, _)| index <= first)
                .find(|&(_, other)| eq(value, other))
            {
                return Err(ContractViolation::DuplicateKey { first, second });
            }
        }

        Ok(())
    }

    /// Returns the largest probe distance of any entry in the table.
    #[cfg(any(test, feature = "stats"))]
    pub fn max_distance(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .map(|bucket| bucket.distance)
            .max()
            .unwrap_or(0)
    }

    /// Computes a histogram of probe distances for the current table state.
    ///
    /// Index `d` of the result holds the number of entries sitting `d` slots
    /// past their home. The vector is `max_distance() + 1` long, or empty for
    /// an empty table.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for bucket in self.slots.iter().flatten() {
            if hist.len() <= bucket.distance {
                hist.resize(bucket.distance + 1, 0);
            }
            hist[bucket.distance] += 1;
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let total_distance: usize = self
            .slots
            .iter()
            .flatten()
            .map(|bucket| bucket.distance)
            .sum();

        DebugStats {
            populated: self.populated,
            capacity: self.slots.len(),
            load_factor: self.populated as f64 / self.slots.len() as f64,
            max_distance: self.max_distance(),
            mean_distance: if self.populated == 0 {
                0.0
            } else {
                total_distance as f64 / self.populated as f64
            },
            total_bytes: self.slots.len() * mem::size_of::<Option<Bucket<V>>>(),
        }
    }

    /// Pretty-prints the probe-distance histogram horizontally using stdout.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.populated);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                0 => {}
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                _ => bar.push('▉'),
            }
            bar
        };

        for (distance, &count) in hist.iter().enumerate() {
            println!("{:>2} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the entry's value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the closure's result if the entry is vacant and returns a
    /// mutable reference to the entry's value. The closure only runs for
    /// vacant entries.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry's value and returns it. Vacant
    /// entries are left alone and yield `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// let result = table.entry(42, |&n: &u64| n == 42).and_modify(|v| *v += 1);
    /// assert_eq!(result, None);
    ///
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    /// let result = table.entry(42, |&n: &u64| n == 42).and_modify(|v| *v += 1);
    /// assert_eq!(result, Some(&mut 43));
    /// ```
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the entry's value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// Created by [`HashTable::entry`] when no value matches.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable reference to
    /// it.
    ///
    /// The table grows first if the new value would bring its load factor to
    /// the threshold; the reference points at the value's final slot.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let index = table.insert_new(self.hash, value);
        &mut table.bucket_mut(index).value
    }
}

/// A view into an occupied entry in the hash table.
///
/// Created by [`HashTable::entry`] when a value matches.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.bucket(self.index).value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.bucket_mut(self.index).value
    }

    /// Converts the entry into a mutable reference to the value with the
    /// lifetime of the entry.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        &mut table.bucket_mut(self.index).value
    }

    /// Replaces the value in place, returning the previous one. The cached
    /// hash is kept, so the new value must hash the same.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the table and returns the value.
    pub fn remove(self) -> V {
        self.table.remove_at(self.index)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. It walks
/// the slot array by index up to a fixed end bound, skipping empty slots.
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    slots: &'a [Option<Bucket<V>>],
    index: usize,
    end: usize,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            index: self.index,
            end: self.end,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let slots = self.slots;
        while self.index < self.end {
            let slot = &slots[self.index];
            self.index += 1;
            if let Some(bucket) = slot {
                self.remaining -= 1;
                return Some(&bucket.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, V> {
    slots: core::slice::IterMut<'a, Option<Bucket<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in &mut self.slots {
            if let Some(bucket) = slot {
                self.remaining -= 1;
                return Some(&mut bucket.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. Dropping
/// it removes whatever it has not yielded yet.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.slots.len() {
            let slot = self.table.slots[self.index].take();
            self.index += 1;
            if let Some(bucket) = slot {
                self.table.populated -= 1;
                return Some(bucket.value);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

/// A consuming iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Option<Bucket<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let bucket = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(bucket.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut HashTable<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = &'a mut V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
