use crate::memory::create_dataset;
use crate::quad;
use rdf_mem_storage::{ReadWrite, StorageError, TransactionError, TxnType};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[test]
fn reader_keeps_its_snapshot() {
    let dataset = create_dataset();
    dataset.add(&quad("g", "s", "p", "o1")).unwrap();

    let reader = dataset.begin(TxnType::Read).unwrap();
    thread::scope(|scope| {
        scope
            .spawn(|| dataset.add(&quad("g", "s", "p", "o2")).unwrap())
            .join()
            .unwrap();
    });

    assert_eq!(reader.find(None, None, None, None).unwrap().count(), 1);
    assert!(!reader.contains(&quad("g", "s", "p", "o2")).unwrap());
    reader.end().unwrap();

    assert_eq!(dataset.find(None, None, None, None).unwrap().count(), 2);
}

#[test]
fn readers_do_not_wait_for_a_writer() {
    let dataset = create_dataset();
    let mut writer = dataset.begin(TxnType::Write).unwrap();
    writer.add(&quad("g", "s", "p", "o")).unwrap();

    let seen = thread::scope(|scope| {
        scope
            .spawn(|| dataset.len().unwrap())
            .join()
            .unwrap()
    });

    assert_eq!(seen, 0);
    writer.commit().unwrap();
}

#[test]
fn second_writer_waits_for_the_first() {
    let dataset = create_dataset();
    let (sender, receiver) = mpsc::channel();

    thread::scope(|scope| {
        let mut first = dataset.begin(TxnType::Write).unwrap();
        first.add(&quad("g", "s", "p", "first")).unwrap();

        scope.spawn(|| {
            let mut second = dataset.begin(TxnType::Write).unwrap();
            let seen = second.len().unwrap();
            second.add(&quad("g", "s", "p", "second")).unwrap();
            second.commit().unwrap();
            sender.send(seen).unwrap();
        });

        assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());
        first.commit().unwrap();

        // The second writer starts from the state published by the first one.
        assert_eq!(receiver.recv_timeout(Duration::from_secs(10)).unwrap(), 1);
    });

    assert_eq!(dataset.len().unwrap(), 2);
    assert_eq!(dataset.generation(), 2);
}

#[test]
fn read_promote_fails_after_a_concurrent_commit() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::ReadPromote).unwrap();

    thread::scope(|scope| {
        scope
            .spawn(|| dataset.add(&quad("g", "s", "p", "o")).unwrap())
            .join()
            .unwrap();
    });

    let error = transaction.promote().unwrap_err();
    assert_eq!(error, TransactionError::Stale { version: 0 });
    assert!(error.is_retryable());

    let error = transaction.add(&quad("g", "s", "p", "other")).unwrap_err();
    assert!(matches!(
        error,
        StorageError::Transaction(TransactionError::Stale { .. })
    ));
    assert!(error.is_retryable());

    // The transaction stays a reader on its old snapshot.
    assert_eq!(transaction.mode(), ReadWrite::Read);
    assert_eq!(transaction.len().unwrap(), 0);
    transaction.end().unwrap();
}

#[test]
fn read_committed_promote_continues_on_the_latest_state() {
    let dataset = create_dataset();
    let mut transaction = dataset.begin(TxnType::ReadCommittedPromote).unwrap();

    thread::scope(|scope| {
        scope
            .spawn(|| dataset.add(&quad("g", "s", "p", "o")).unwrap())
            .join()
            .unwrap();
    });
    assert_eq!(transaction.len().unwrap(), 0);

    transaction.add(&quad("g", "s", "p", "other")).unwrap();

    assert_eq!(transaction.version(), 1);
    assert_eq!(transaction.len().unwrap(), 2);
    transaction.commit().unwrap();
    assert_eq!(dataset.len().unwrap(), 2);
    assert_eq!(dataset.generation(), 2);
}

#[test]
fn promotion_waits_for_the_active_writer() {
    let dataset = create_dataset();
    let (began_sender, began) = mpsc::channel();
    let (sender, receiver) = mpsc::channel();

    thread::scope(|scope| {
        let writer = dataset.begin(TxnType::Write).unwrap();

        scope.spawn(|| {
            let mut transaction = dataset.begin(TxnType::ReadPromote).unwrap();
            began_sender.send(transaction.version()).unwrap();
            sender.send(transaction.promote()).unwrap();
        });

        assert_eq!(began.recv_timeout(Duration::from_secs(10)).unwrap(), 0);
        assert!(receiver.recv_timeout(Duration::from_millis(100)).is_err());
        writer.commit().unwrap();

        // The writer committed while the promotion was waiting.
        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(10)).unwrap(),
            Err(TransactionError::Stale { version: 0 })
        );
    });
}

#[test]
fn concurrent_writers_serialize() {
    let dataset = create_dataset();

    thread::scope(|scope| {
        for writer in 0..8 {
            let dataset = &dataset;
            scope.spawn(move || {
                for i in 0..25 {
                    let object = format!("o{writer}-{i}");
                    dataset.add(&quad("g", "s", "p", &object)).unwrap();
                }
            });
        }
    });

    assert_eq!(dataset.len().unwrap(), 200);
    assert_eq!(dataset.generation(), 200);
}
