use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::mem;

use crate::DefaultHashBuilder;
use crate::error::ContractViolation;
use crate::hash_table;
use crate::hash_table::HashTable;

fn equivalent_key<K, Q, V>(key: &Q) -> impl Fn(&(K, V)) -> bool + '_
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    move |(k, _)| key.eq(k.borrow())
}

/// A hash map implemented on top of the Robin Hood [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Only the key
/// takes part in hashing and equality; values are carried along.
///
/// Lookups accept any borrowed form of the key, so a `HashMap<String, _>`
/// can be queried with a `&str`.
///
/// Two insertion flavours are offered: [`add`](Self::add) keeps an existing
/// value, [`insert`](Self::insert) replaces it.
///
/// # Performance Characteristics
///
/// - **Memory**: one `usize` probe distance and a `u64` hash per slot, plus
///   the size of `(K, V)`
/// - **Load factor**: kept below 3/4; the table doubles when an insertion
///   reaches it
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V> HashMap<K, V, DefaultHashBuilder> {
    /// Creates an empty map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates a new hash map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.add(1, "a"));
    /// assert_eq!(map.find(&1), Some(&"a"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    ///
    /// A new map has 8 slots; the count doubles whenever an insertion brings
    /// the load factor to 3/4.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// for i in 0..10 {
    ///     map.add(i, i * 2);
    /// }
    /// assert_eq!(map.len(), 10);
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all elements from the map.
    ///
    /// This operation preserves the map's allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// Pairs are visited in slot order, which is unrelated to insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut total = 0;
    /// for (_key, value) in map.iter() {
    ///     total += value;
    /// }
    /// assert_eq!(total, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the key-value pairs of the map with mutable
    /// references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over mutable references to the values of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// for value in map.values_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map.find("b"), Some(&20));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Removes all key-value pairs from the map, returning them as an
    /// iterator.
    ///
    /// The map keeps its capacity. Pairs not consumed by the time the
    /// iterator is dropped are removed anyway.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts a key-value pair unless the key is already present.
    ///
    /// Returns `true` if the pair was inserted. If the key exists the map is
    /// left untouched and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert!(map.add(37, "a"));
    /// assert!(!map.add(37, "b"));
    /// assert_eq!(map.find(&37), Some(&"a"));
    /// ```
    pub fn add(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            hash_table::Entry::Occupied(_) => false,
            hash_table::Entry::Vacant(entry) => {
                entry.insert((key, value));
                true
            }
        }
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key present, the value is updated and the
    /// old value is returned. The stored key is not replaced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.find(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            hash_table::Entry::Occupied(mut entry) => {
                Some(mem::replace(&mut entry.get_mut().1, value))
            }
            hash_table::Entry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("apple".to_string(), 3);
    ///
    /// assert_eq!(map.find("apple"), Some(&3));
    /// assert_eq!(map.find("pear"), None);
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, equivalent_key(key))
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, equivalent_key(key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.contains(hash, equivalent_key(key))
    }

    /// Removes a key from the map, returning `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, equivalent_key(key))
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::HashMap;
    /// #
    /// let mut letters = HashMap::new();
    /// for ch in "a short treatise on fungi".chars() {
    ///     *letters.entry(ch).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(letters.find(&'s'), Some(&2));
    /// assert_eq!(letters.find(&'t'), Some(&3));
    /// assert_eq!(letters.find(&'y'), None);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            hash_table::Entry::Occupied(inner) => Entry::Occupied(OccupiedEntry { inner }),
            hash_table::Entry::Vacant(inner) => Entry::Vacant(VacantEntry { key, inner }),
        }
    }

    /// Checks the underlying table's invariants using this map's hasher and
    /// key equality.
    ///
    /// A violation means a key was mutated through interior mutability or
    /// its `Hash` and `Eq` implementations disagree.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        self.table.validate(
            |(k, _)| self.hash_builder.hash_one(k),
            |(a, _), (b, _)| a == b,
        )
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.find(k).is_some_and(|other| v == other))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in a map, which may be vacant or occupied.
pub enum Entry<'a, K, V> {
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Ensures a value is in the entry by inserting the default if empty, and
    /// returns a mutable reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Ensures a value is in the entry by inserting the result of the default
    /// function if empty, and returns a mutable reference to the value in the
    /// entry.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts into the map.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Ensures a value is in the entry by inserting the default value if
    /// empty, and returns a mutable reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in a `HashMap`.
pub struct VacantEntry<'a, K, V> {
    key: K,
    inner: hash_table::VacantEntry<'a, (K, V)>,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Sets the value of the entry with the VacantEntry's key, and returns a
    /// mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.inner.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in a `HashMap`.
pub struct OccupiedEntry<'a, K, V> {
    inner: hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.inner.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.inner.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.inner.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.inner.into_mut().1
    }

    /// Sets the value of the entry, and returns the entry's old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Takes the value out of the entry, and returns it.
    pub fn remove(self) -> V {
        self.inner.remove().1
    }

    /// Take the ownership of the key and value from the map.
    pub fn remove_entry(self) -> (K, V) {
        self.inner.remove()
    }
}

/// An iterator over the entries of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the entries of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

/// A consuming iterator over the entries of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;
    use core::hash::BuildHasherDefault;
    use core::hash::Hash;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hashes an integer key to itself.
    #[derive(Default)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 = (self.0 << 8) | b as u64;
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    type IdentityState = BuildHasherDefault<IdentityHasher>;

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::default();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 8);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.capacity(), 8);
    }

    #[test]
    #[cfg(any(feature = "foldhash", feature = "std"))]
    fn test_default_hasher() {
        let mut map = HashMap::new();
        map.insert("key", 1);
        assert_eq!(map.find("key"), Some(&1));
    }

    #[test]
    fn test_add_keeps_existing_value() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        assert!(map.add(1, "hello".to_string()));
        assert!(!map.add(1, "world".to_string()));

        assert_eq!(map.len(), 1);
        assert_eq!(map.find(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_insert_and_find() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        assert_eq!(map.insert(1, "hello".to_string()), None);
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.find(&1), Some(&"hello".to_string()));
        assert_eq!(map.find(&2), None);

        assert_eq!(
            map.insert(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.find(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_find_mut() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.find_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.find(&1), Some(&"hello world".to_string()));
        assert_eq!(map.find_mut(&2), None);
    }

    #[test]
    fn test_contains() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        assert!(!map.contains(&1));

        map.insert(1, "value".to_string());
        assert!(map.contains(&1));
        assert!(!map.contains(&2));
    }

    #[test]
    fn test_remove() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert!(map.remove(&1));
        assert_eq!(map.len(), 1);
        assert!(!map.contains(&1));
        assert!(map.contains(&2));

        assert!(!map.remove(&1));
        assert!(!map.remove(&3));
    }

    #[test]
    fn test_remove_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        assert_eq!(map.remove_entry(&1), Some((1, "hello".to_string())));
        assert_eq!(map.len(), 0);
        assert_eq!(map.remove_entry(&1), None);
    }

    #[test]
    fn test_remove_then_reinsert() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        assert!(map.add("a".to_string(), 1));
        assert!(map.remove("a"));
        assert!(map.add("a".to_string(), 2));

        assert_eq!(map.len(), 1);
        assert_eq!(map.find("a"), Some(&2));
    }

    #[test]
    fn test_clear() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..20 {
            map.insert(i, i);
        }
        let capacity = map.capacity();

        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert!(!map.contains(&1));
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn test_growth_scenario() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        assert_eq!(map.capacity(), 8);

        for i in 0..10 {
            assert!(map.add(i, i * 2));
        }

        assert_eq!(map.len(), 10);
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.find(&5), Some(&10));
        assert_eq!(map.find(&20), None);
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_entry_api() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        let value = map.entry(1).or_insert("hello".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        let value = map.entry(1).or_insert("world".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(map.find(&2), Some(&"computed".to_string()));

        map.entry(1)
            .and_modify(|v| v.push_str(" world"))
            .or_insert("default".to_string());
        assert_eq!(map.find(&1), Some(&"hello world".to_string()));

        assert_eq!(map.entry(3).key(), &3);
        assert!(!map.contains(&3));
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: HashMap<i32, Vec<i32>, SipHashBuilder> =
            HashMap::with_hasher(SipHashBuilder::default());

        map.entry(1).or_default().push(42);
        assert_eq!(map.find(&1), Some(&vec![42]));

        map.entry(1).or_default().push(24);
        assert_eq!(map.find(&1), Some(&vec![42, 24]));
    }

    #[test]
    fn test_entry_as_index_access() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..10 {
            map.add(i, i);
        }

        assert_eq!(*map.entry(9).or_default(), 9);
        *map.entry(20).or_default() = 20;
        assert_eq!(*map.entry(20).or_default(), 20);
        assert_eq!(*map.entry(40).or_default(), 0);
        assert_eq!(map.len(), 12);
    }

    #[test]
    fn test_occupied_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"hello".to_string());

                *entry.get_mut() = "world".to_string();
                assert_eq!(entry.get(), &"world".to_string());

                let old_value = entry.insert("new".to_string());
                assert_eq!(old_value, "world".to_string());
                assert_eq!(entry.get(), &"new".to_string());

                let (key, value) = entry.remove_entry();
                assert_eq!(key, 1);
                assert_eq!(value, "new".to_string());
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }

        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);

                let value = entry.insert("hello".to_string());
                assert_eq!(value, &"hello".to_string());
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        assert_eq!(map.len(), 1);
        assert_eq!(map.find(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_entry_insert_during_growth() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..5 {
            map.insert(i, i);
        }

        *map.entry(5).or_insert(0) += 50;
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.find(&5), Some(&50));
    }

    #[test]
    fn test_iterators() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        let pairs: std::collections::HashMap<i32, String> =
            map.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.get(&1), Some(&"one".to_string()));
        assert_eq!(pairs.get(&2), Some(&"two".to_string()));
        assert_eq!(pairs.get(&3), Some(&"three".to_string()));

        let keys: std::collections::HashSet<i32> = map.keys().copied().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&1));
        assert!(keys.contains(&2));
        assert!(keys.contains(&3));

        let values: std::collections::HashSet<String> = map.values().cloned().collect();
        assert_eq!(values.len(), 3);
        assert!(values.contains("one"));
        assert!(values.contains("two"));
        assert!(values.contains("three"));

        for (_, v) in map.iter_mut() {
            v.push('!');
        }
        for v in map.values_mut() {
            v.push('?');
        }
        assert_eq!(map.find(&2), Some(&"two!?".to_string()));
        assert_eq!(map.iter().len(), 3);
    }

    #[test]
    fn test_drain() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        let drained: std::collections::HashMap<i32, String> = map.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(map.is_empty());

        assert_eq!(drained.get(&1), Some(&"one".to_string()));
        assert_eq!(drained.get(&2), Some(&"two".to_string()));
        assert_eq!(drained.get(&3), Some(&"three".to_string()));
    }

    #[test]
    fn test_into_iter_follows_slots() {
        let mut map: HashMap<u64, char, IdentityState> = HashMap::default();
        map.insert(6, 'c');
        map.insert(2, 'a');
        map.insert(4, 'b');

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 4, 6]);
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            vec![(2, 'a'), (4, 'b'), (6, 'c')]
        );
    }

    #[test]
    fn test_collision_handling() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        for i in 0..1000 {
            map.insert(i, i * 2);
        }

        assert_eq!(map.len(), 1000);

        for i in 0..1000 {
            assert_eq!(map.find(&i), Some(&(i * 2)));
        }

        for i in (0..1000).step_by(2) {
            assert!(map.remove(&i));
        }

        assert_eq!(map.len(), 500);

        for i in (1..1000).step_by(2) {
            assert_eq!(map.find(&i), Some(&(i * 2)));
        }
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_string_keys() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        for i in 0..1000 {
            map.insert(i.to_string(), i);
        }

        assert_eq!(map.len(), 1000);
        assert!(map.contains("999"));
        assert!(!map.contains("1000"));
        assert_eq!(map.find("500"), Some(&500));
        assert_eq!(map.find(&"42".to_string()), Some(&42));
    }

    #[test]
    fn test_identity_hash_probe_bound() {
        let mut map: HashMap<u64, u64, IdentityState> = HashMap::default();
        for i in 0..4096 {
            map.add(i, i);
        }

        assert_eq!(map.table.max_distance(), 0);
        assert_eq!(map.validate(), Ok(()));

        // Multiples of the final capacity all share home slot 0.
        let mut map: HashMap<u64, u64, IdentityState> = HashMap::default();
        for i in 0..64 {
            map.add(i * 1024, i);
        }
        assert_eq!(map.capacity(), 128);
        assert_eq!(map.table.max_distance(), 63);
        for i in 0..64 {
            assert_eq!(map.find(&(i * 1024)), Some(&i));
        }
        assert_eq!(map.validate(), Ok(()));
    }

    #[test]
    fn test_equality() {
        let a: HashMap<i32, i32, SipHashBuilder> = (0..50).map(|i| (i, i * i)).collect();
        let mut b: HashMap<i32, i32, SipHashBuilder> = (0..50).rev().map(|i| (i, i * i)).collect();
        assert_eq!(a, b);

        b.insert(7, 0);
        assert_ne!(a, b);

        b.insert(7, 49);
        b.add(50, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_extend_overwrites() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.add(1, "a");
        map.extend([(1, "b"), (2, "c")]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.find(&1), Some(&"b"));
    }

    #[test]
    fn test_debug_format() {
        let mut map: HashMap<u64, &str, IdentityState> = HashMap::default();
        map.insert(1, "one");
        map.insert(2, "two");
        assert_eq!(format!("{:?}", map), r#"{1: "one", 2: "two"}"#);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("a".to_string(), vec![1]);

        let cloned = map.clone();
        map.find_mut("a").unwrap().push(2);

        assert_eq!(cloned.find("a"), Some(&vec![1]));
        assert_eq!(map.find("a"), Some(&vec![1, 2]));
    }

    #[test]
    fn test_validate_detects_inconsistent_hash() {
        use core::cell::Cell;

        #[derive(PartialEq, Eq)]
        struct Shifty(Cell<u64>);

        impl Hash for Shifty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.get().hash(state);
            }
        }

        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..4 {
            map.insert(Shifty(Cell::new(i)), i);
        }
        assert_eq!(map.validate(), Ok(()));

        if let Some(key) = map.keys().next() {
            key.0.set(key.0.get() + 100);
        }
        assert!(matches!(
            map.validate(),
            Err(ContractViolation::HashMismatch { .. })
        ));
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn test_matches_hashbrown() {
        let mut rng = SmallRng::seed_from_u64(0xdecaf);
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        let mut model = hashbrown::HashMap::new();

        for _ in 0..5_000 {
            let key = rng.random_range(0..128u32);
            let value = rng.random::<u16>();
            match rng.random_range(0..5) {
                0 => {
                    assert_eq!(map.add(key, value), !model.contains_key(&key));
                    model.entry(key).or_insert(value);
                }
                1 => assert_eq!(map.insert(key, value), model.insert(key, value)),
                2 => assert_eq!(map.remove(&key), model.remove(&key).is_some()),
                3 => {
                    map.entry(key).and_modify(|v| *v = v.wrapping_add(1));
                    if let Some(v) = model.get_mut(&key) {
                        *v = v.wrapping_add(1);
                    }
                }
                _ => assert_eq!(map.find(&key), model.get(&key)),
            }

            assert_eq!(map.len(), model.len());
            assert_eq!(map.validate(), Ok(()));
        }

        let mut ours: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let mut theirs: Vec<_> = model.iter().map(|(k, v)| (*k, *v)).collect();
        ours.sort();
        theirs.sort();
        assert_eq!(ours, theirs);
        assert_eq!(map.validate(), Ok(()));
    }
}
