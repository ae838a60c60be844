use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::DefaultHashBuilder;
use crate::error::ContractViolation;
use crate::hash_table;
use crate::hash_table::HashTable;

/// A hash set implemented on top of the Robin Hood [`HashTable`].
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values.
///
/// [`add`](Self::add) leaves an equal stored element in place, while
/// [`insert`](Self::insert) swaps it for the new one. The two only differ for
/// types whose equality ignores part of their contents.
///
/// # Performance Characteristics
///
/// - **Memory**: one `usize` probe distance and a `u64` hash per slot, plus
///   the size of `T`.
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<T> HashSet<T, DefaultHashBuilder> {
    /// Creates an empty set using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 8);
    /// # }
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::DefaultHashBuilder;
    /// use robin_hash::HashSet;
    ///
    /// let mut set = HashSet::with_hasher(DefaultHashBuilder::default());
    /// set.add(1);
    /// assert!(set.contains(&1));
    /// # }
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (0..100).collect();
    /// let capacity = set.capacity();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), capacity);
    /// # }
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// An iterator visiting all elements in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let set: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// let mut values: Vec<_> = set.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, [1, 2, 3]);
    /// # }
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Clears the set, returning all elements as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds a value to the set unless an equal value is already present.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain this value, `true` is returned.
    /// - If the set already contained this value, `false` is returned and the
    ///   stored value is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.add(37), true);
    /// assert_eq!(set.add(37), false);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |v| v == &value) {
            hash_table::Entry::Occupied(_) => false,
            hash_table::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Inserts a value, replacing an equal value if one is present.
    ///
    /// Returns the replaced value, or `None` if the value was newly added.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<Vec<i32>> = HashSet::new();
    /// assert_eq!(set.insert(Vec::with_capacity(10)), None);
    ///
    /// let replaced = set.insert(Vec::new()).unwrap();
    /// assert!(replaced.capacity() >= 10);
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> Option<T> {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |v| v == &value) {
            hash_table::Entry::Occupied(mut entry) => Some(entry.insert(value)),
            hash_table::Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns `true` if the set contains a value.
    ///
    /// The value may be any borrowed form of the set's value type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<String> = HashSet::new();
    /// set.add("apple".to_string());
    /// assert!(set.contains("apple"));
    /// assert!(!set.contains("pear"));
    /// # }
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.contains(hash, |v| value.eq(v.borrow()))
    }

    /// Returns a reference to the stored value equal to the given one.
    pub fn find<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| value.eq(v.borrow()))
    }

    /// Removes a value from the set. Returns whether the value was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.add(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// # }
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the value in the set equal to the given one, if
    /// any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| value.eq(v.borrow()))
    }

    /// Checks the underlying table's invariants using this set's hasher and
    /// element equality.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        self.table
            .validate(|v| self.hash_builder.hash_one(v), |a, b| a == b)
    }
}

/// An iterator over the items of a `HashSet`.
pub struct Iter<'a, T> {
    inner: hash_table::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A draining iterator over the items of a `HashSet`.
pub struct Drain<'a, T> {
    inner: hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

/// An owning iterator over the items of a `HashSet`.
pub struct IntoIter<T> {
    inner: hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}
