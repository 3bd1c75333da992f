use crate::helpers::{TABLE, assert_dense, find, ids, list, scope, seed, store};
use rl_core::{Condition, FieldValue, ListConfig, Record};
use rl_storage::{ListOptions, Placement, PositionList};

fn expression_list(expression: &str) -> PositionList {
    PositionList::new(
        ListConfig::new(TABLE)
            .position_column("pos")
            .scope_expression(expression),
    )
    .expect("valid expression config")
}

#[test]
fn null_scope_is_an_ordinary_list() {
    let mut store = store();
    let list = list();
    let created = seed(&mut store, &list, FieldValue::Null, 3);
    seed(&mut store, &list, 1, 2);

    assert_dense(&store, &list, scope(FieldValue::Null));
    assert_eq!(ids(&store, &list, FieldValue::Null), created);

    let mut second = find(&store, created[1]);
    assert!(list.is_first(&find(&store, created[0])));
    assert!(list.move_higher(&mut store, &mut second).expect("move_higher"));
    assert_eq!(
        ids(&store, &list, FieldValue::Null),
        vec![created[1], created[0], created[2]]
    );
    assert_dense(&store, &list, scope(1));
}

#[test]
fn scopes_are_independent() {
    let mut store = store();
    let list = list();
    let first = seed(&mut store, &list, 1, 3);
    let second = seed(&mut store, &list, 2, 3);

    let mut record = find(&store, first[2]);
    list.move_to_top(&mut store, &mut record).expect("move_to_top");
    let mut doomed = find(&store, first[0]);
    list.destroy(&mut store, &mut doomed).expect("destroy");

    assert_eq!(ids(&store, &list, 1), vec![first[2], first[1]]);
    assert_eq!(ids(&store, &list, 2), second);
    assert_dense(&store, &list, scope(2));
}

#[test]
fn expression_scope_binds_record_fields() {
    let mut store = store();
    let list = expression_list("parent_id = :parent_id");

    let created: Vec<i64> = (0..4)
        .map(|_| {
            let mut record = Record::new().with("parent_id", 33);
            list.create(&mut store, &mut record, Placement::Bottom)
                .expect("create record")
        })
        .collect();
    let mut other = Record::new().with("parent_id", 34);
    list.create(&mut store, &mut other, Placement::Bottom)
        .expect("create other");
    assert_eq!(other.position("pos"), Some(1));

    let mut fourth = find(&store, created[3]);
    list.move_to_top(&mut store, &mut fourth).expect("move_to_top");

    let order = list
        .listed_with(&fourth)
        .ids(&store)
        .expect("listed ids");
    assert_eq!(order, vec![created[3], created[0], created[1], created[2]]);
    assert_dense(&store, &list, Condition::eq("parent_id", 33));
    assert_eq!(find(&store, other.id().expect("persisted")).position("pos"), Some(1));
}

#[test]
fn expression_scope_over_two_fields() {
    let mut store = store();
    let list = expression_list("parent_id = :parent_id AND kind = :kind");

    for kind in ["sub1", "sub2", "sub1", "sub2", "sub1"] {
        let mut record = Record::new().with("parent_id", 7).with("kind", kind);
        list.create(&mut store, &mut record, Placement::Bottom)
            .expect("create record");
    }

    let sub1 = Condition::eq("parent_id", 7).and(Condition::eq("kind", "sub1"));
    let sub2 = Condition::eq("parent_id", 7).and(Condition::eq("kind", "sub2"));
    assert_eq!(list.count(&store, &sub1).expect("count"), 3);
    assert_dense(&store, &list, sub1);
    assert_dense(&store, &list, sub2);
}

#[test]
fn unscoped_table_is_one_list() {
    let mut store = store();
    let list = PositionList::new(ListConfig::new(TABLE).position_column("pos"))
        .expect("unscoped config");

    let created: Vec<i64> = [1, 2, 3]
        .into_iter()
        .map(|parent| {
            let mut record = Record::new().with("parent_id", parent);
            list.create(&mut store, &mut record, Placement::Bottom)
                .expect("create record")
        })
        .collect();

    let mut last = find(&store, created[2]);
    assert_eq!(last.position("pos"), Some(3));
    list.move_to_top(&mut store, &mut last).expect("move_to_top");

    let order = list
        .list(Condition::All, ListOptions::default())
        .ids(&store)
        .expect("ids");
    assert_eq!(order, vec![created[2], created[0], created[1]]);
    assert_dense(&store, &list, Condition::All);
}

#[test]
fn moving_to_another_scope_compacts_the_old_one() {
    let mut store = store();
    let list = list();
    let from = seed(&mut store, &list, 1, 4);
    let to = seed(&mut store, &list, 2, 2);

    let mut record = find(&store, from[1]);
    record.set("parent_id", 2);
    assert_eq!(list.insert_at(&mut store, &mut record, 2).expect("insert_at"), 2);

    let stored = find(&store, from[1]);
    assert_eq!(stored.field("parent_id").as_i64(), Some(2));
    assert_eq!(stored.position("pos"), Some(2));
    assert_eq!(ids(&store, &list, 1), vec![from[0], from[2], from[3]]);
    assert_eq!(ids(&store, &list, 2), vec![to[0], from[1], to[1]]);
    assert_dense(&store, &list, scope(1));
    assert_dense(&store, &list, scope(2));
}

#[test]
fn add_to_bottom_after_scope_change() {
    let mut store = store();
    let list = list();
    let from = seed(&mut store, &list, 1, 3);
    seed(&mut store, &list, FieldValue::Null, 2);

    let mut record = find(&store, from[0]);
    record.set("parent_id", FieldValue::Null);
    assert_eq!(list.add_to_bottom(&mut store, &mut record).expect("add_to_bottom"), 3);

    assert_eq!(ids(&store, &list, 1), vec![from[1], from[2]]);
    assert_dense(&store, &list, scope(1));
    assert_dense(&store, &list, scope(FieldValue::Null));
    assert!(find(&store, from[0]).field("parent_id").is_null());
}

#[test]
fn projected_record_keeps_its_stored_scope() {
    let mut store = store();
    let list = list();
    let created = seed(&mut store, &list, 5, 3);

    let mut third = list
        .list(scope(5), ListOptions::default().select(["pos"]).offset(2).limit(1))
        .first(&store)
        .expect("query")
        .expect("third item");
    assert!(!third.has_field("parent_id"));

    let higher = list.higher_item(&store, &third).expect("higher_item");
    assert_eq!(higher.and_then(|record| record.id()), Some(created[1]));
    assert!(list.is_last(&store, &third).expect("is_last"));

    assert_eq!(list.move_to_top(&mut store, &mut third).expect("move_to_top"), 1);
    assert_eq!(ids(&store, &list, 5), vec![created[2], created[0], created[1]]);
    assert_eq!(find(&store, created[2]).field("parent_id").as_i64(), Some(5));
    assert_dense(&store, &list, scope(5));
}

#[test]
fn expression_scope_groups_null_values() {
    let mut store = store();
    let list = expression_list("parent_id = :parent_id");

    let created: Vec<i64> = (0..3)
        .map(|_| {
            let mut record = Record::new().with("parent_id", FieldValue::Null);
            list.create(&mut store, &mut record, Placement::Bottom)
                .expect("create record")
        })
        .collect();
    let mut other = Record::new().with("parent_id", 8);
    list.create(&mut store, &mut other, Placement::Bottom)
        .expect("create other");

    assert_dense(&store, &list, Condition::is_null("parent_id"));
    assert_eq!(ids(&store, &list, FieldValue::Null), created);

    let mut first = find(&store, created[0]);
    list.move_to_bottom(&mut store, &mut first).expect("move_to_bottom");
    let mut middle = find(&store, created[2]);
    list.destroy(&mut store, &mut middle).expect("destroy");

    assert_eq!(ids(&store, &list, FieldValue::Null), vec![created[1], created[0]]);
    assert_dense(&store, &list, Condition::is_null("parent_id"));
    assert_eq!(find(&store, other.id().expect("persisted")).position("pos"), Some(1));
}

#[test]
fn scope_values_compare_the_way_the_store_does() {
    let mut store = store();
    let list = list();
    let created = seed(&mut store, &list, 5, 3);

    let mut first = find(&store, created[0]);
    first.set("parent_id", "5");
    assert_eq!(list.move_to_bottom(&mut store, &mut first).expect("move_to_bottom"), 3);

    assert_eq!(ids(&store, &list, 5), vec![created[1], created[2], created[0]]);
    assert_dense(&store, &list, scope(5));
}

#[test]
fn association_scope_lists_by_foreign_key() {
    let mut store = store();
    let list = PositionList::new(
        ListConfig::new(TABLE)
            .position_column("pos")
            .scope_association("parent"),
    )
    .expect("association config");

    let first = seed(&mut store, &list, 1, 2);
    let second = seed(&mut store, &list, 2, 2);

    let mut record = find(&store, first[1]);
    list.move_to_top(&mut store, &mut record).expect("move_to_top");
    assert_eq!(ids(&store, &list, 1), vec![first[1], first[0]]);
    assert_eq!(ids(&store, &list, 2), second);
}
