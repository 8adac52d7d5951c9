use crate::index::IndexComponentsError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Represents what part of an RDF tuple is stored at the given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TupleSlot {
    /// The graph name
    GraphName,
    /// The subject
    Subject,
    /// The predicate
    Predicate,
    /// The object
    Object,
}

impl TupleSlot {
    const ALL: [TupleSlot; 4] = [
        TupleSlot::GraphName,
        TupleSlot::Subject,
        TupleSlot::Predicate,
        TupleSlot::Object,
    ];

    /// Returns the slots of a tuple with `arity` slots in canonical order (GSPO for quads, SPO for
    /// triples).
    pub fn canonical(arity: usize) -> &'static [TupleSlot] {
        &Self::ALL[Self::ALL.len().saturating_sub(arity)..]
    }

    /// Returns the index of the slot in the canonical order of a tuple with `arity` slots.
    ///
    /// Returns `None` if the slot is not part of such a tuple (the graph name of a triple).
    pub const fn canonical_index(self, arity: usize) -> Option<usize> {
        let quad_index = self as usize;
        match arity {
            4 => Some(quad_index),
            3 => quad_index.checked_sub(1),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl Display for TupleSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TupleSlot::GraphName => write!(f, "G"),
            TupleSlot::Subject => write!(f, "S"),
            TupleSlot::Predicate => write!(f, "P"),
            TupleSlot::Object => write!(f, "O"),
        }
    }
}

impl TryFrom<char> for TupleSlot {
    type Error = IndexComponentsError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'G' => Ok(TupleSlot::GraphName),
            'S' => Ok(TupleSlot::Subject),
            'P' => Ok(TupleSlot::Predicate),
            'O' => Ok(TupleSlot::Object),
            _ => Err(IndexComponentsError::UnknownSlot(value)),
        }
    }
}

/// An unordered set of [TupleSlot]s, e.g., the slots that are bound in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TupleSlots(u8);

impl TupleSlots {
    /// The empty set.
    pub const EMPTY: TupleSlots = TupleSlots(0);

    /// Returns true if `slot` is part of the set.
    pub fn contains(self, slot: TupleSlot) -> bool {
        self.0 & slot.bit() != 0
    }

    /// Returns a set that additionally contains `slot`.
    #[must_use]
    pub fn with(self, slot: TupleSlot) -> Self {
        TupleSlots(self.0 | slot.bit())
    }

    /// Returns the number of slots in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if no slot is part of the set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the slots in canonical quad order.
    pub fn iter(self) -> impl Iterator<Item = TupleSlot> {
        TupleSlot::ALL
            .into_iter()
            .filter(move |slot| self.contains(*slot))
    }

    /// Returns the slots of a canonical-order pattern that hold a value.
    pub fn bound_in<T, const N: usize>(pattern: &[Option<T>; N]) -> Self {
        TupleSlot::canonical(N)
            .iter()
            .zip(pattern)
            .filter(|(_, value)| value.is_some())
            .map(|(slot, _)| *slot)
            .collect()
    }
}

impl FromIterator<TupleSlot> for TupleSlots {
    fn from_iter<I: IntoIterator<Item = TupleSlot>>(iter: I) -> Self {
        iter.into_iter().fold(TupleSlots::EMPTY, TupleSlots::with)
    }
}

impl Display for TupleSlots {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "_");
        }
        for slot in self.iter() {
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

/// Represents a permutation of the slots of a tuple with `N` slots.
///
/// The permutation maps values from canonical order (GSPO or SPO) into the order in which an index
/// stores them, and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexComponents<const N: usize> {
    slots: [TupleSlot; N],
    /// For each internal position, the canonical index of the slot stored there.
    canonical: [usize; N],
    /// For each canonical index, the internal position of the slot.
    internal: [usize; N],
}

impl<const N: usize> IndexComponents<N> {
    /// Creates the components without validation. Every slot of a tuple with `N` slots must appear
    /// exactly once.
    const fn new_unchecked(slots: [TupleSlot; N]) -> Self {
        let mut canonical = [0; N];
        let mut internal = [0; N];
        let mut position = 0;
        while position < N {
            let index = (slots[position] as usize + N).saturating_sub(TupleSlot::ALL.len());
            canonical[position] = index;
            internal[index] = position;
            position += 1;
        }
        Self {
            slots,
            canonical,
            internal,
        }
    }

    /// Tries to create new [IndexComponents].
    ///
    /// Returns an error if a [TupleSlot] appears more than once or is not part of a tuple with `N`
    /// slots.
    pub fn try_new(slots: [TupleSlot; N]) -> Result<Self, IndexComponentsError> {
        let mut seen = TupleSlots::EMPTY;
        for slot in slots {
            if slot.canonical_index(N).is_none() {
                return Err(IndexComponentsError::InvalidSlot(slot, N));
            }
            if seen.contains(slot) {
                return Err(IndexComponentsError::Duplicate(slot));
            }
            seen = seen.with(slot);
        }
        Ok(Self::new_unchecked(slots))
    }

    /// Returns the set of the first `len` slots.
    pub fn prefix(&self, len: usize) -> TupleSlots {
        self.slots.iter().take(len).copied().collect()
    }

    /// Reorders `values` from canonical order into the internal order of this index.
    pub fn to_internal<V: Clone>(&self, values: &[V; N]) -> [V; N] {
        std::array::from_fn(|position| values[self.canonical[position]].clone())
    }

    /// Reorders `values` from the internal order of this index back into canonical order.
    ///
    /// `values` must have (at least) `N` entries.
    pub fn to_canonical<V: Clone>(&self, values: &[V]) -> [V; N] {
        std::array::from_fn(|index| values[self.internal[index]].clone())
    }
}

impl IndexComponents<4> {
    /// A GSPO index.
    pub const GSPO: IndexComponents<4> = IndexComponents::new_unchecked([
        TupleSlot::GraphName,
        TupleSlot::Subject,
        TupleSlot::Predicate,
        TupleSlot::Object,
    ]);

    /// A GOPS index.
    pub const GOPS: IndexComponents<4> = IndexComponents::new_unchecked([
        TupleSlot::GraphName,
        TupleSlot::Object,
        TupleSlot::Predicate,
        TupleSlot::Subject,
    ]);

    /// An SPOG index.
    pub const SPOG: IndexComponents<4> = IndexComponents::new_unchecked([
        TupleSlot::Subject,
        TupleSlot::Predicate,
        TupleSlot::Object,
        TupleSlot::GraphName,
    ]);

    /// An OSGP index.
    pub const OSGP: IndexComponents<4> = IndexComponents::new_unchecked([
        TupleSlot::Object,
        TupleSlot::Subject,
        TupleSlot::GraphName,
        TupleSlot::Predicate,
    ]);

    /// A PGSO index.
    pub const PGSO: IndexComponents<4> = IndexComponents::new_unchecked([
        TupleSlot::Predicate,
        TupleSlot::GraphName,
        TupleSlot::Subject,
        TupleSlot::Object,
    ]);

    /// An OPSG index.
    pub const OPSG: IndexComponents<4> = IndexComponents::new_unchecked([
        TupleSlot::Object,
        TupleSlot::Predicate,
        TupleSlot::Subject,
        TupleSlot::GraphName,
    ]);
}

impl IndexComponents<3> {
    /// An SPO index.
    pub const SPO: IndexComponents<3> = IndexComponents::new_unchecked([
        TupleSlot::Subject,
        TupleSlot::Predicate,
        TupleSlot::Object,
    ]);

    /// A POS index.
    pub const POS: IndexComponents<3> = IndexComponents::new_unchecked([
        TupleSlot::Predicate,
        TupleSlot::Object,
        TupleSlot::Subject,
    ]);

    /// An OSP index.
    pub const OSP: IndexComponents<3> = IndexComponents::new_unchecked([
        TupleSlot::Object,
        TupleSlot::Subject,
        TupleSlot::Predicate,
    ]);
}

impl<const N: usize> Display for IndexComponents<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for slot in &self.slots {
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

impl<const N: usize> FromStr for IndexComponents<N> {
    type Err = IndexComponentsError;

    /// Parses a slot-order string such as `"GSPO"` or `"OPS"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let slots = value
            .chars()
            .map(TupleSlot::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let actual = slots.len();
        let slots = <[TupleSlot; N]>::try_from(slots).map_err(|_| {
            IndexComponentsError::Length {
                expected: N,
                actual,
            }
        })?;
        Self::try_new(slots)
    }
}
