use crate::memory::create_dataset;
use crate::{example_quad, node, quad};
use rdf_mem_model::Node;
use rdf_mem_storage::{ReadWrite, StorageError, TransactionError, TxnType};

#[test]
fn nested_transaction_is_rejected() {
    let dataset = create_dataset();
    let transaction = dataset.begin(TxnType::Read).unwrap();
    assert!(dataset.is_in_transaction());

    assert!(matches!(
        dataset.begin(TxnType::Write),
        Err(TransactionError::Nested)
    ));
    assert!(matches!(
        dataset.len(),
        Err(StorageError::Transaction(TransactionError::Nested))
    ));

    transaction.end().unwrap();
    assert!(!dataset.is_in_transaction());
    assert_eq!(dataset.len().unwrap(), 0);
}

#[test]
fn read_transaction_cannot_write() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::Read).unwrap();

    let result = transaction.add(&example_quad());
    assert!(matches!(
        result,
        Err(StorageError::Transaction(TransactionError::ReadOnly(
            TxnType::Read
        )))
    ));
    assert_eq!(
        transaction.promote(),
        Err(TransactionError::NotPromotable(TxnType::Read))
    );

    // The transaction is still usable.
    assert_eq!(transaction.mode(), ReadWrite::Read);
    assert_eq!(transaction.len().unwrap(), 0);
    transaction.end().unwrap();
}

#[test]
fn write_transaction_sees_its_own_changes() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::Write).unwrap();

    transaction.add(&quad("g", "s", "p", "o")).unwrap();

    assert!(transaction.contains(&quad("g", "s", "p", "o")).unwrap());
    assert!(transaction.contains_graph(&node("g")).unwrap());
    assert_eq!(dataset.generation(), 0);
    transaction.commit().unwrap();
    assert_eq!(dataset.generation(), 1);
}

#[test]
fn abort_discards_changes() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.add(&example_quad()).unwrap();

    transaction.abort();

    assert!(dataset.is_empty().unwrap());
    assert_eq!(dataset.generation(), 0);
}

#[test]
fn ending_a_write_transaction_aborts_it() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.add(&example_quad()).unwrap();

    assert_eq!(transaction.end(), Err(TransactionError::UnterminatedWrite));

    assert!(!dataset.contains(&example_quad()).unwrap());
    assert_eq!(dataset.generation(), 0);
}

#[test]
fn dropping_a_write_transaction_aborts_it() {
    let dataset = create_dataset();
    {
        let mut transaction = dataset.begin(TxnType::Write).unwrap();
        transaction.add(&example_quad()).unwrap();
    }

    assert!(!dataset.is_in_transaction());
    assert!(dataset.is_empty().unwrap());
}

#[test]
fn committing_a_read_transaction_does_not_advance_the_generation() {
    let dataset = create_dataset();
    let transaction = dataset.begin(TxnType::Read).unwrap();

    transaction.commit().unwrap();

    assert_eq!(dataset.generation(), 0);
}

#[test]
fn read_promote_promotes_on_first_write() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::ReadPromote).unwrap();
    assert_eq!(transaction.mode(), ReadWrite::Read);

    transaction.add(&example_quad()).unwrap();

    assert_eq!(transaction.mode(), ReadWrite::Write);
    assert_eq!(dataset.active_readers(), 0);
    transaction.commit().unwrap();
    assert!(dataset.contains(&example_quad()).unwrap());
}

#[test]
fn promoting_a_writer_has_no_effect() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::Write).unwrap();

    transaction.promote().unwrap();

    assert_eq!(transaction.mode(), ReadWrite::Write);
    transaction.abort();
}

#[test]
fn execute_write_commits_on_success() {
    let dataset = create_dataset();

    let added = dataset
        .execute_write(|transaction| {
            transaction.add(&quad("g", "s", "p", "o1"))?;
            transaction.add(&quad("g", "s", "p", "o2"))?;
            transaction.len()
        })
        .unwrap();

    assert_eq!(added, 2);
    assert_eq!(dataset.generation(), 1);
}

#[test]
fn execute_write_aborts_on_error() {
    let dataset = create_dataset();

    let result = dataset.execute_write(|transaction| {
        transaction.add(&quad("g", "s", "p", "o"))?;
        transaction.add_parts(&Node::UnionGraph, &node("s"), &node("p"), &node("o"))
    });

    assert!(matches!(result, Err(StorageError::ReadOnlyUnionGraph)));
    assert!(dataset.is_empty().unwrap());
    assert!(!dataset.is_in_transaction());
}

#[derive(Debug, thiserror::Error)]
enum ApplicationError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Missing graph")]
    MissingGraph,
}

#[test]
fn execute_read_supports_custom_errors() {
    let dataset = create_dataset();

    let result = dataset.execute_read(|transaction| {
        if transaction.contains_graph(&node("g"))? {
            Ok(())
        } else {
            Err(ApplicationError::MissingGraph)
        }
    });

    assert!(matches!(result, Err(ApplicationError::MissingGraph)));
    assert!(!dataset.is_in_transaction());
}

#[test]
fn removed_graph_loses_its_prefixes_on_commit() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o")).unwrap();
    dataset
        .prefixes()
        .set_prefix(&node("g"), "ex", "http://example.com/");

    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.remove_graph(&node("g")).unwrap();
    assert_eq!(
        dataset.prefixes().namespace(&node("g"), "ex").as_deref(),
        Some("http://example.com/")
    );
    transaction.commit().unwrap();

    assert!(dataset.prefixes().prefixes(&node("g")).is_empty());
}

#[test]
fn aborted_graph_removal_keeps_the_prefixes() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o")).unwrap();
    dataset
        .prefixes()
        .set_prefix(&node("g"), "ex", "http://example.com/");

    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.remove_graph(&node("g")).unwrap();
    transaction.abort();

    assert_eq!(dataset.prefixes().prefixes(&node("g")).len(), 1);
    assert!(dataset.contains_graph(&node("g")).unwrap());
}

#[test]
fn clear_drops_the_prefixes_of_all_named_graphs_on_commit() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o")).unwrap();
    dataset.add(&quad("g2", "s", "p", "o")).unwrap();
    dataset
        .prefixes()
        .set_prefix(&node("g1"), "ex", "http://example.com/1/");
    dataset
        .prefixes()
        .set_prefix(&node("g2"), "ex", "http://example.com/2/");

    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.clear().unwrap();
    assert_eq!(dataset.prefixes().prefixes(&node("g1")).len(), 1);
    assert_eq!(dataset.prefixes().prefixes(&node("g2")).len(), 1);
    transaction.commit().unwrap();

    assert!(dataset.prefixes().prefixes(&node("g1")).is_empty());
    assert!(dataset.prefixes().prefixes(&node("g2")).is_empty());
    assert!(dataset.is_empty().unwrap());
}

#[test]
fn aborted_clear_keeps_the_prefixes() {
    let dataset = create_dataset();
    dataset.add(&quad("g1", "s", "p", "o")).unwrap();
    dataset.add(&quad("g2", "s", "p", "o")).unwrap();
    dataset
        .prefixes()
        .set_prefix(&node("g1"), "ex", "http://example.com/1/");
    dataset
        .prefixes()
        .set_prefix(&node("g2"), "ex", "http://example.com/2/");

    let mut transaction = dataset.begin(TxnType::Write).unwrap();
    transaction.clear().unwrap();
    transaction.abort();

    assert_eq!(
        dataset.prefixes().namespace(&node("g1"), "ex").as_deref(),
        Some("http://example.com/1/")
    );
    assert_eq!(
        dataset.prefixes().namespace(&node("g2"), "ex").as_deref(),
        Some("http://example.com/2/")
    );
    assert!(dataset.contains_graph(&node("g1")).unwrap());
    assert!(dataset.contains_graph(&node("g2")).unwrap());
}
