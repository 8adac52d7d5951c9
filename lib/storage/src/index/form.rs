use crate::index::{IndexComponents, IndexComponentsError, TupleSlots};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A closed set of index orderings for tuples with `N` slots.
///
/// Every dataset keeps one table per form, and [TableForm::choose_from] routes a pattern to the
/// table in which the bound slots form a prefix.
pub trait TableForm<const N: usize>:
    Copy + Eq + Debug + Display + Send + Sync + 'static
{
    /// All forms in declaration order. The order breaks ties in [TableForm::choose_from].
    const ALL: &'static [Self];

    /// The form used when no form has the bound slots as a prefix.
    const DEFAULT: Self;

    /// Returns the slot order of this form.
    fn components(self) -> IndexComponents<N>;

    /// Returns the position of this form in [TableForm::ALL].
    fn ordinal(self) -> usize;

    /// Returns true if a scan for a pattern that binds exactly `bound` never enumerates a level
    /// with a wildcard before reaching the last bound level.
    fn avoids_traversal(self, bound: TupleSlots) -> bool {
        (1..=N)
            .rev()
            .any(|len| self.components().prefix(len) == bound)
    }

    /// Picks the first form in declaration order whose prefix of length `|bound|` is `bound`.
    ///
    /// The result only depends on `bound`.
    fn choose_from(bound: TupleSlots) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|form| form.avoids_traversal(bound))
            .unwrap_or(Self::DEFAULT)
    }
}

/// The six orderings of the quad tables.
///
/// Together they provide a prefix for every combination of bound slots. [QuadTableForm::SPOG] and
/// [QuadTableForm::OPSG] store the graph name last, which keeps the copies of a triple in different
/// graphs adjacent.
#[allow(clippy::upper_case_acronyms, reason = "Variants are named after their slot order")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadTableForm {
    /// Graph name, subject, predicate, object.
    GSPO,
    /// Graph name, object, predicate, subject.
    GOPS,
    /// Subject, predicate, object, graph name.
    SPOG,
    /// Object, subject, graph name, predicate.
    OSGP,
    /// Predicate, graph name, subject, object.
    PGSO,
    /// Object, predicate, subject, graph name.
    OPSG,
}

impl TableForm<4> for QuadTableForm {
    const ALL: &'static [Self] = &[
        QuadTableForm::GSPO,
        QuadTableForm::GOPS,
        QuadTableForm::SPOG,
        QuadTableForm::OSGP,
        QuadTableForm::PGSO,
        QuadTableForm::OPSG,
    ];
    const DEFAULT: Self = QuadTableForm::GSPO;

    fn components(self) -> IndexComponents<4> {
        match self {
            QuadTableForm::GSPO => IndexComponents::GSPO,
            QuadTableForm::GOPS => IndexComponents::GOPS,
            QuadTableForm::SPOG => IndexComponents::SPOG,
            QuadTableForm::OSGP => IndexComponents::OSGP,
            QuadTableForm::PGSO => IndexComponents::PGSO,
            QuadTableForm::OPSG => IndexComponents::OPSG,
        }
    }

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// The three orderings of the triple tables.
#[allow(clippy::upper_case_acronyms, reason = "Variants are named after their slot order")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripleTableForm {
    /// Subject, predicate, object.
    SPO,
    /// Predicate, object, subject.
    POS,
    /// Object, subject, predicate.
    OSP,
}

impl TableForm<3> for TripleTableForm {
    const ALL: &'static [Self] = &[
        TripleTableForm::SPO,
        TripleTableForm::POS,
        TripleTableForm::OSP,
    ];
    const DEFAULT: Self = TripleTableForm::SPO;

    fn components(self) -> IndexComponents<3> {
        match self {
            TripleTableForm::SPO => IndexComponents::SPO,
            TripleTableForm::POS => IndexComponents::POS,
            TripleTableForm::OSP => IndexComponents::OSP,
        }
    }

    fn ordinal(self) -> usize {
        self as usize
    }
}

impl Display for QuadTableForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components())
    }
}

impl Display for TripleTableForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components())
    }
}

fn parse_form<F: TableForm<N>, const N: usize>(value: &str) -> Result<F, IndexComponentsError> {
    let components = value.parse::<IndexComponents<N>>()?;
    F::ALL
        .iter()
        .copied()
        .find(|form| form.components() == components)
        .ok_or_else(|| IndexComponentsError::UnknownForm(value.to_owned()))
}

impl FromStr for QuadTableForm {
    type Err = IndexComponentsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_form(value)
    }
}

impl FromStr for TripleTableForm {
    type Err = IndexComponentsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_form(value)
    }
}
