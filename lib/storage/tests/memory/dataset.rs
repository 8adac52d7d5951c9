use crate::memory::{create_dataset, create_dataset_with_dedup, render};
use crate::{example_quad, example_quad_in_graph, node, quad};
use insta::assert_snapshot;
use rdf_mem_model::{Node, Variable};
use rdf_mem_storage::{MemDatasetOptions, StorageError, TxnType, UnionGraphDedup};

#[test]
fn insert_quad() {
    let dataset = create_dataset();

    dataset.add(&example_quad()).unwrap();

    assert_eq!(dataset.len().unwrap(), 1);
    assert!(dataset.contains(&example_quad()).unwrap());
    assert_eq!(dataset.generation(), 1);
}

#[test]
fn default_options() {
    let dataset = create_dataset();

    assert_eq!(dataset.options(), MemDatasetOptions::default());
    assert_eq!(dataset.options().union_graph_dedup, UnionGraphDedup::Adjacent);
}

#[test]
fn insert_duplicate_quad_has_no_effect() {
    let dataset = create_dataset();

    dataset.add(&example_quad_in_graph("g")).unwrap();
    dataset.add(&example_quad_in_graph("g")).unwrap();

    assert_eq!(dataset.len().unwrap(), 1);
}

#[test]
fn find_returns_the_quad_for_every_bound_subset() {
    let dataset = create_dataset();
    let quad = quad("g", "s", "p", "o");
    dataset.add(&quad).unwrap();
    dataset.add(&crate::quad("g", "s", "p", "other")).unwrap();
    dataset.add(&crate::quad("other", "s", "p", "o")).unwrap();

    let g = Some(&quad.graph_name);
    let s = Some(&quad.subject);
    let p = Some(&quad.predicate);
    let o = Some(&quad.object);
    let patterns = [
        (g, None, None, o),
        (None, s, None, o),
        (None, None, p, o),
        (g, s, p, None),
        (g, None, p, o),
        (None, s, p, o),
        (g, s, p, o),
    ];

    for (graph_name, subject, predicate, object) in patterns {
        let found = dataset
            .find(graph_name, subject, predicate, object)
            .unwrap()
            .filter(|found| *found == quad)
            .count();
        assert_eq!(found, 1);
    }

    let exact = dataset.find(g, s, p, o).unwrap().collect::<Vec<_>>();
    assert_eq!(exact, vec![quad]);
}

#[test]
fn delete_is_the_inverse_of_add() {
    let dataset = create_dataset();
    let quad = quad("g", "s", "p", "o");

    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.add(&quad).unwrap();
    transaction.add(&example_quad()).unwrap();
    transaction.delete(&quad).unwrap();
    transaction.delete(&example_quad()).unwrap();
    transaction.commit().unwrap();

    assert_eq!(dataset.find(None, None, None, None).unwrap().count(), 0);
    assert!(dataset.is_empty().unwrap());

    dataset.delete(&quad).unwrap();
    assert!(dataset.is_empty().unwrap());
}

#[test]
fn wildcard_graph_matches_default_and_named_graphs() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o1")).unwrap();
    dataset.add(&quad("g2", "s", "p", "o2")).unwrap();
    dataset
        .add_parts(&Node::DefaultGraph, &node("s"), &node("p"), &node("o1"))
        .unwrap();

    let everything = dataset.find(None, None, None, None).unwrap();

    assert_snapshot!(render(everything), @r"
    <http://example.com/s> <http://example.com/p> <http://example.com/o1> <http://example.com/g1>
    <http://example.com/s> <http://example.com/p> <http://example.com/o1> DEFAULT
    <http://example.com/s> <http://example.com/p> <http://example.com/o2> <http://example.com/g2>
    ");
}

#[test]
fn variables_and_any_are_wildcards() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o")).unwrap();
    let variable = Node::from(Variable::new_unchecked("s"));

    let found = dataset
        .find(Some(&Node::Any), Some(&variable), None, Some(&Node::Any))
        .unwrap()
        .count();

    assert_eq!(found, 1);
}

#[test]
fn find_named_skips_the_default_graph() {
    let dataset = create_dataset();
    dataset.add(&example_quad()).unwrap();
    dataset.add(&example_quad_in_graph("g")).unwrap();

    let named = dataset.find_named(None, None, None, None).unwrap();
    assert_snapshot!(render(named), @r#"<http://example.com/subject> <http://example.com/predicate> "value" <http://example.com/g>"#);

    let in_default = dataset
        .find_named(Some(&Node::DefaultGraph), None, None, None)
        .unwrap();
    assert_eq!(in_default.count(), 0);
}

#[test]
fn default_graph_is_stored_separately() {
    let dataset = create_dataset();
    dataset.add(&example_quad()).unwrap();

    let default = dataset.find_in_default_graph(None, None, None).unwrap();
    assert_eq!(default.count(), 1);
    assert_eq!(dataset.list_graph_nodes().unwrap().count(), 0);
    assert_eq!(dataset.find_in_union_graph(None, None, None).unwrap().count(), 0);
}

#[test]
fn union_graph_collapses_identical_triples() {
    for dedup in [UnionGraphDedup::Adjacent, UnionGraphDedup::SeenSet] {
        let dataset = create_dataset_with_dedup(dedup);
        assert_eq!(dataset.options().union_graph_dedup, dedup);
        dataset.add(&quad("g1", "s", "p", "o")).unwrap();
        dataset.add(&quad("g2", "s", "p", "o")).unwrap();
        dataset.add(&quad("g2", "s", "p", "other")).unwrap();

        let exact = dataset
            .find_in_union_graph(Some(&node("s")), Some(&node("p")), Some(&node("o")))
            .unwrap()
            .count();
        assert_eq!(exact, 1, "{dedup:?}");

        let by_object = dataset
            .find_in_union_graph(None, None, Some(&node("o")))
            .unwrap()
            .count();
        assert_eq!(by_object, 1, "{dedup:?}");

        let all = dataset.find_in_union_graph(None, None, None).unwrap().count();
        assert_eq!(all, 2, "{dedup:?}");
    }
}

#[test]
fn find_in_union_graph_labels_quads_with_the_union_graph() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o")).unwrap();
    dataset.add(&quad("g2", "s", "p", "o")).unwrap();

    let union = dataset
        .find(Some(&Node::UnionGraph), None, None, None)
        .unwrap();

    assert_snapshot!(render(union), @"<http://example.com/s> <http://example.com/p> <http://example.com/o> UNION");
}

#[test]
fn union_graph_is_read_only() {
    let dataset = create_dataset();

    let result = dataset.add_parts(&Node::UnionGraph, &node("s"), &node("p"), &node("o"));
    assert!(matches!(result, Err(StorageError::ReadOnlyUnionGraph)));

    let result = dataset.remove_graph(&Node::UnionGraph);
    assert!(matches!(result, Err(StorageError::ReadOnlyUnionGraph)));

    let result = dataset.delete_any(Some(&Node::UnionGraph), None, None, None);
    assert!(matches!(result, Err(StorageError::ReadOnlyUnionGraph)));
}

#[test]
fn only_concrete_terms_are_stored() {
    let dataset = create_dataset();

    let result = dataset.add_parts(&node("g"), &Node::Any, &node("p"), &node("o"));

    assert!(matches!(result, Err(StorageError::NonConcreteTerm(_))));
    assert!(dataset.is_empty().unwrap());
    assert_eq!(dataset.generation(), 0);
}

#[test]
fn contains_graph() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o")).unwrap();

    assert!(dataset.contains_graph(&node("g")).unwrap());
    assert!(!dataset.contains_graph(&node("other")).unwrap());
    assert!(dataset.contains_graph(&Node::DefaultGraph).unwrap());
    assert!(dataset.contains_graph(&Node::UnionGraph).unwrap());
}

#[test]
fn contains_with_wildcards() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o")).unwrap();

    let pattern = rdf_mem_storage::Quad::new(Node::Any, node("s"), Node::Any, node("o"));
    assert!(dataset.contains(&pattern).unwrap());

    let in_union = rdf_mem_storage::Quad::new(Node::UnionGraph, node("s"), node("p"), node("o"));
    assert!(dataset.contains(&in_union).unwrap());
}

#[test]
fn delete_any_removes_all_matches() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o1")).unwrap();
    dataset.add(&quad("g2", "s", "p", "o2")).unwrap();
    dataset
        .add_parts(&Node::DefaultGraph, &node("s"), &node("q"), &node("o1"))
        .unwrap();

    let deleted = dataset
        .delete_any(None, Some(&node("s")), None, Some(&node("o1")))
        .unwrap();

    assert_eq!(deleted, 2);
    assert_snapshot!(render(dataset.find(None, None, None, None).unwrap()), @"<http://example.com/s> <http://example.com/p> <http://example.com/o2> <http://example.com/g2>");
}

#[test]
fn add_graph_replaces_the_content() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "old")).unwrap();

    let triples = [quad("g", "s", "p", "new1"), quad("g", "s", "p", "new2")]
        .map(rdf_mem_storage::Quad::into_triple);
    dataset.add_graph(&node("g"), triples).unwrap();

    assert_snapshot!(render(dataset.find(None, None, None, None).unwrap()), @r"
    <http://example.com/s> <http://example.com/p> <http://example.com/new1> <http://example.com/g>
    <http://example.com/s> <http://example.com/p> <http://example.com/new2> <http://example.com/g>
    ");
}

#[test]
fn remove_graph_keeps_other_graphs() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o")).unwrap();
    dataset.add(&quad("g2", "s", "p", "o")).unwrap();
    dataset.add(&example_quad()).unwrap();

    dataset.remove_graph(&node("g1")).unwrap();

    assert!(!dataset.contains_graph(&node("g1")).unwrap());
    assert!(dataset.contains_graph(&node("g2")).unwrap());
    assert_eq!(dataset.len().unwrap(), 2);
}

#[test]
fn clear_removes_everything() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o")).unwrap();
    dataset.add(&example_quad()).unwrap();

    dataset.clear().unwrap();

    assert!(dataset.is_empty().unwrap());
    assert_eq!(dataset.list_graph_nodes().unwrap().count(), 0);
}

#[test]
fn results_outlive_later_commits() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o1")).unwrap();

    let results = dataset.find(None, None, None, None).unwrap();
    dataset.add(&quad("g", "s", "p", "o2")).unwrap();
    dataset.clear().unwrap();

    assert_eq!(results.count(), 1);
}
