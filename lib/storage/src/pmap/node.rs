use std::sync::Arc;

/// The number of hash bits consumed by each level of the trie.
pub(super) const BITS: u32 = 5;

const MASK: u64 = (1 << BITS) - 1;

/// Returns the slot of `hash` in a branch located at `shift`.
#[allow(clippy::cast_possible_truncation, reason = "Masked to five bits")]
fn fragment(hash: u64, shift: u32) -> u32 {
    ((hash >> shift) & MASK) as u32
}

/// A single key-value pair, together with the full hash of its key.
pub(super) struct Leaf<K, V> {
    hash: u64,
    key: K,
    value: V,
}

impl<K, V> Leaf<K, V> {
    pub(super) fn key(&self) -> &K {
        &self.key
    }

    pub(super) fn value(&self) -> &V {
        &self.value
    }
}

/// Two or more pairs whose keys have the same full hash.
pub(super) struct Collision<K, V> {
    hash: u64,
    entries: Vec<(K, V)>,
}

impl<K, V> Collision<K, V> {
    pub(super) fn entries(&self) -> &[(K, V)] {
        &self.entries
    }
}

/// An inner node of the trie. The `bitmap` records which of the 32 slots are occupied, `entries`
/// stores the occupied slots in slot order.
pub(super) struct Branch<K, V> {
    bitmap: u32,
    entries: Vec<Entry<K, V>>,
}

/// An occupied slot of a [Branch].
///
/// Every variant is reference counted such that copying a branch along a modified path only
/// bumps reference counts of the untouched siblings.
pub(super) enum Entry<K, V> {
    Leaf(Arc<Leaf<K, V>>),
    Collision(Arc<Collision<K, V>>),
    Branch(Arc<Branch<K, V>>),
}

impl<K, V> Clone for Entry<K, V> {
    fn clone(&self) -> Self {
        match self {
            Entry::Leaf(leaf) => Entry::Leaf(Arc::clone(leaf)),
            Entry::Collision(collision) => Entry::Collision(Arc::clone(collision)),
            Entry::Branch(branch) => Entry::Branch(Arc::clone(branch)),
        }
    }
}

impl<K, V> Entry<K, V> {
    fn leaf(hash: u64, key: K, value: V) -> Self {
        Entry::Leaf(Arc::new(Leaf { hash, key, value }))
    }
}

/// The outcome of removing a key from a [Branch].
pub(super) enum Removal<K, V> {
    /// The key was not present. Nothing changed.
    Absent,
    /// The branch lost its last entry.
    Empty,
    /// The branch shrank to a single leaf or collision that the parent should inline.
    Single(Entry<K, V>),
    /// The new version of the branch.
    Branch(Branch<K, V>),
}

impl<K, V> Branch<K, V> {
    /// Creates a branch without any entries. Only used as the root of a map.
    pub(super) fn empty() -> Self {
        Self {
            bitmap: 0,
            entries: Vec::new(),
        }
    }

    pub(super) fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    fn position(&self, bit: u32) -> usize {
        (self.bitmap & (bit - 1)).count_ones() as usize
    }

    pub(super) fn get(&self, shift: u32, hash: u64, key: &K) -> Option<&V>
    where
        K: Eq,
    {
        let mut branch = self;
        let mut shift = shift;
        loop {
            let bit = 1 << fragment(hash, shift);
            if branch.bitmap & bit == 0 {
                return None;
            }

            match &branch.entries[branch.position(bit)] {
                Entry::Leaf(leaf) => {
                    return (leaf.hash == hash && leaf.key == *key).then_some(&leaf.value);
                }
                Entry::Collision(collision) => {
                    if collision.hash != hash {
                        return None;
                    }
                    return collision
                        .entries
                        .iter()
                        .find(|(candidate, _)| candidate == key)
                        .map(|(_, value)| value);
                }
                Entry::Branch(child) => {
                    branch = child.as_ref();
                    shift += BITS;
                }
            }
        }
    }

    /// Returns a copy of this branch with `key` bound to `value`, and whether the key is new.
    pub(super) fn insert(&self, shift: u32, hash: u64, key: K, value: V) -> (Self, bool)
    where
        K: Eq + Clone,
        V: Clone,
    {
        let bit = 1 << fragment(hash, shift);
        let idx = self.position(bit);

        if self.bitmap & bit == 0 {
            let mut entries = Vec::with_capacity(self.entries.len() + 1);
            entries.extend_from_slice(&self.entries[..idx]);
            entries.push(Entry::leaf(hash, key, value));
            entries.extend_from_slice(&self.entries[idx..]);
            let branch = Self {
                bitmap: self.bitmap | bit,
                entries,
            };
            return (branch, true);
        }

        let (entry, added) = match &self.entries[idx] {
            Entry::Leaf(leaf) if leaf.hash == hash && leaf.key == key => {
                (Entry::leaf(hash, key, value), false)
            }
            Entry::Leaf(leaf) if leaf.hash == hash => {
                let collision = Collision {
                    hash,
                    entries: vec![(leaf.key.clone(), leaf.value.clone()), (key, value)],
                };
                (Entry::Collision(Arc::new(collision)), true)
            }
            Entry::Leaf(leaf) => {
                let branch = Self::pair(
                    shift + BITS,
                    Entry::Leaf(Arc::clone(leaf)),
                    leaf.hash,
                    Entry::leaf(hash, key, value),
                    hash,
                );
                (Entry::Branch(Arc::new(branch)), true)
            }
            Entry::Collision(collision) if collision.hash == hash => {
                let mut entries = collision.entries.clone();
                let existing = entries.iter().position(|(candidate, _)| *candidate == key);
                let added = match existing {
                    Some(existing) => {
                        entries[existing].1 = value;
                        false
                    }
                    None => {
                        entries.push((key, value));
                        true
                    }
                };
                (Entry::Collision(Arc::new(Collision { hash, entries })), added)
            }
            Entry::Collision(collision) => {
                let branch = Self::pair(
                    shift + BITS,
                    Entry::Collision(Arc::clone(collision)),
                    collision.hash,
                    Entry::leaf(hash, key, value),
                    hash,
                );
                (Entry::Branch(Arc::new(branch)), true)
            }
            Entry::Branch(child) => {
                let (child, added) = child.insert(shift + BITS, hash, key, value);
                (Entry::Branch(Arc::new(child)), added)
            }
        };

        let mut entries = self.entries.clone();
        entries[idx] = entry;
        let branch = Self {
            bitmap: self.bitmap,
            entries,
        };
        (branch, added)
    }

    /// Creates the smallest chain of branches that separates two entries with distinct hashes.
    fn pair(
        shift: u32,
        first: Entry<K, V>,
        first_hash: u64,
        second: Entry<K, V>,
        second_hash: u64,
    ) -> Self {
        let first_fragment = fragment(first_hash, shift);
        let second_fragment = fragment(second_hash, shift);

        if first_fragment == second_fragment {
            let child = Self::pair(shift + BITS, first, first_hash, second, second_hash);
            return Self {
                bitmap: 1 << first_fragment,
                entries: vec![Entry::Branch(Arc::new(child))],
            };
        }

        let bitmap = (1 << first_fragment) | (1 << second_fragment);
        let entries = if first_fragment < second_fragment {
            vec![first, second]
        } else {
            vec![second, first]
        };
        Self { bitmap, entries }
    }

    pub(super) fn remove(&self, shift: u32, hash: u64, key: &K) -> Removal<K, V>
    where
        K: Eq + Clone,
        V: Clone,
    {
        let bit = 1 << fragment(hash, shift);
        if self.bitmap & bit == 0 {
            return Removal::Absent;
        }
        let idx = self.position(bit);

        let replacement = match &self.entries[idx] {
            Entry::Leaf(leaf) => {
                if leaf.hash != hash || leaf.key != *key {
                    return Removal::Absent;
                }
                None
            }
            Entry::Collision(collision) => {
                if collision.hash != hash {
                    return Removal::Absent;
                }
                let Some(existing) =
                    collision.entries.iter().position(|(candidate, _)| candidate == key)
                else {
                    return Removal::Absent;
                };

                let mut entries = collision.entries.clone();
                entries.remove(existing);
                if entries.len() == 1 {
                    let (key, value) = entries.remove(0);
                    Some(Entry::leaf(hash, key, value))
                } else {
                    Some(Entry::Collision(Arc::new(Collision { hash, entries })))
                }
            }
            Entry::Branch(child) => match child.remove(shift + BITS, hash, key) {
                Removal::Absent => return Removal::Absent,
                Removal::Empty => None,
                Removal::Single(entry) => Some(entry),
                Removal::Branch(child) => Some(Entry::Branch(Arc::new(child))),
            },
        };

        match replacement {
            None => {
                if self.entries.len() == 1 {
                    return Removal::Empty;
                }
                let mut entries = self.entries.clone();
                entries.remove(idx);
                let branch = Self {
                    bitmap: self.bitmap & !bit,
                    entries,
                };
                branch.compact(shift)
            }
            Some(entry) => {
                let mut entries = self.entries.clone();
                entries[idx] = entry;
                let branch = Self {
                    bitmap: self.bitmap,
                    entries,
                };
                branch.compact(shift)
            }
        }
    }

    /// Inner branches never hold a lone leaf or collision: it is handed to the parent instead.
    fn compact(self, shift: u32) -> Removal<K, V> {
        let is_lone_value =
            self.entries.len() == 1 && !matches!(self.entries[0], Entry::Branch(_));
        if shift == 0 || !is_lone_value {
            return Removal::Branch(self);
        }

        match self.entries.into_iter().next() {
            Some(entry) => Removal::Single(entry),
            None => Removal::Empty,
        }
    }
}
