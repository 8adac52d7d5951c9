use rdf_mem_storage::{MemDataset, Quad, StoreTerm};
use std::cell::Cell;
use std::fmt::{Display, Formatter};

thread_local! {
    static CLONES: Cell<usize> = const { Cell::new(0) };
}

/// A term that counts how often it is cloned on the current thread.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CountingTerm {
    DefaultGraph,
    UnionGraph,
    Id(u32),
}

impl Clone for CountingTerm {
    fn clone(&self) -> Self {
        CLONES.with(|clones| clones.set(clones.get() + 1));
        match self {
            CountingTerm::DefaultGraph => CountingTerm::DefaultGraph,
            CountingTerm::UnionGraph => CountingTerm::UnionGraph,
            CountingTerm::Id(id) => CountingTerm::Id(*id),
        }
    }
}

impl Display for CountingTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CountingTerm::DefaultGraph => f.write_str("DEFAULT"),
            CountingTerm::UnionGraph => f.write_str("UNION"),
            CountingTerm::Id(id) => write!(f, "{id}"),
        }
    }
}

impl StoreTerm for CountingTerm {
    fn is_default_graph(&self) -> bool {
        matches!(self, CountingTerm::DefaultGraph)
    }

    fn is_union_graph(&self) -> bool {
        matches!(self, CountingTerm::UnionGraph)
    }

    fn default_graph() -> Self {
        CountingTerm::DefaultGraph
    }

    fn union_graph() -> Self {
        CountingTerm::UnionGraph
    }
}

fn clones() -> usize {
    CLONES.with(Cell::get)
}

#[test]
fn list_graph_nodes_touches_only_the_graphs() {
    const GRAPHS: u32 = 4;
    const QUADS_PER_GRAPH: u32 = 500;

    let dataset = MemDataset::<CountingTerm>::new();
    let mut transaction = dataset.begin(rdf_mem_storage::TxnType::Write).unwrap();
    for graph in 0..GRAPHS {
        for i in 0..QUADS_PER_GRAPH {
            let quad = Quad::new(
                CountingTerm::Id(graph),
                CountingTerm::Id(1_000 + i),
                CountingTerm::Id(10_000),
                CountingTerm::Id(20_000 + i % 7),
            );
            transaction.add(&quad).unwrap();
        }
    }
    transaction.commit().unwrap();

    let before = clones();
    let mut graphs = dataset.list_graph_nodes().unwrap().collect::<Vec<_>>();
    let touched = clones() - before;

    graphs.sort_by_key(ToString::to_string);
    assert_eq!(
        graphs,
        (0..GRAPHS).map(CountingTerm::Id).collect::<Vec<_>>()
    );
    assert_eq!(touched, GRAPHS as usize);
}
