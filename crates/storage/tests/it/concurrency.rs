use crate::helpers::{TABLE, assert_dense, create_table, ids, list, scope, temp_dir};
use rl_core::Record;
use rl_storage::{Placement, SqliteStore, StoreConfig};

fn open(path: &std::path::Path) -> SqliteStore {
    SqliteStore::open(StoreConfig::file(path).busy_timeout_ms(50)).expect("open file store")
}

#[test]
fn writers_on_two_handles_see_one_list() {
    let dir = temp_dir("two_handles");
    let path = dir.join("lists.db");
    let mut a = open(&path);
    create_table(&a);
    let mut b = open(&path);
    let list = list();

    let mut first = Record::new().with("parent_id", 1);
    let first_id = list
        .create(&mut a, &mut first, Placement::Bottom)
        .expect("create on a");
    let mut second = Record::new().with("parent_id", 1);
    let second_id = list
        .create(&mut b, &mut second, Placement::Bottom)
        .expect("create on b");

    assert_eq!(second.position("pos"), Some(2));
    assert_eq!(ids(&a, &list, 1), vec![first_id, second_id]);
    assert_dense(&b, &list, scope(1));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn held_write_lock_surfaces_a_retryable_conflict() {
    let dir = temp_dir("held_lock");
    let path = dir.join("lists.db");
    let mut a = open(&path);
    create_table(&a);
    let mut b = open(&path);
    let list = list();

    let mut first = Record::new().with("parent_id", 1);
    list.create(&mut a, &mut first, Placement::Bottom)
        .expect("create on a");

    a.connection()
        .execute_batch("BEGIN IMMEDIATE")
        .expect("take write lock");

    let mut second = Record::new().with("parent_id", 1);
    let err = list
        .create(&mut b, &mut second, Placement::Bottom)
        .expect_err("lock is held");
    assert!(err.is_retryable(), "unexpected error: {err}");
    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(second.id(), None);

    a.connection().execute_batch("COMMIT").expect("release lock");

    let id = list
        .create(&mut b, &mut second, Placement::Bottom)
        .expect("retry after release");
    assert_eq!(second.position("pos"), Some(2));
    assert_eq!(ids(&a, &list, 1).last(), Some(&id));
    assert_eq!(
        list.count(&a, &scope(1)).expect("count"),
        2,
        "failed attempt left no partial rows in {TABLE}"
    );

    let _ = std::fs::remove_dir_all(&dir);
}
