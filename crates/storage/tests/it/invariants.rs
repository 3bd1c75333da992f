use crate::helpers::{assert_dense, find, list, scope, store};
use proptest::prelude::*;
use rl_core::{FieldValue, Record};
use rl_storage::{Placement, PositionList, SqliteStore};

#[derive(Clone, Debug)]
enum Op {
    Create(u8),
    CreateAt(u8, i64),
    CreateUnlisted(u8),
    InsertAt(usize, i64),
    Relocate(usize, u8, i64),
    Higher(usize),
    Lower(usize),
    Top(usize),
    Bottom(usize),
    Remove(usize),
    Destroy(usize),
}

fn parent(key: u8) -> FieldValue {
    match key % 3 {
        0 => FieldValue::Null,
        other => FieldValue::Integer(i64::from(other)),
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..3).prop_map(Op::Create),
        1 => (0u8..3, -2i64..8).prop_map(|(key, at)| Op::CreateAt(key, at)),
        1 => (0u8..3).prop_map(Op::CreateUnlisted),
        2 => (any::<usize>(), -2i64..10).prop_map(|(pick, at)| Op::InsertAt(pick, at)),
        1 => (any::<usize>(), 0u8..3, -1i64..8).prop_map(|(pick, key, at)| Op::Relocate(pick, key, at)),
        1 => any::<usize>().prop_map(Op::Higher),
        1 => any::<usize>().prop_map(Op::Lower),
        1 => any::<usize>().prop_map(Op::Top),
        1 => any::<usize>().prop_map(Op::Bottom),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => any::<usize>().prop_map(Op::Destroy),
    ]
}

fn apply(store: &mut SqliteStore, list: &PositionList, live: &mut Vec<i64>, op: &Op) {
    let create = |store: &mut SqliteStore, key: u8, placement: Placement| {
        let mut record = Record::new().with("parent_id", parent(key));
        list.create(store, &mut record, placement)
            .expect("create record")
    };
    if let Op::Create(key) | Op::CreateAt(key, _) | Op::CreateUnlisted(key) = op {
        let placement = match op {
            Op::CreateAt(_, at) => Placement::At(*at),
            Op::CreateUnlisted(_) => Placement::Unlisted,
            _ => Placement::Bottom,
        };
        live.push(create(store, *key, placement));
        return;
    }
    if live.is_empty() {
        return;
    }

    let pick = |index: usize| live[index % live.len()];
    match op {
        Op::InsertAt(index, at) => {
            let mut record = find(store, pick(*index));
            list.insert_at(store, &mut record, *at).expect("insert_at");
        }
        Op::Relocate(index, key, at) => {
            let mut record = find(store, pick(*index));
            record.set("parent_id", parent(*key));
            list.insert_at(store, &mut record, *at).expect("relocate");
        }
        Op::Higher(index) => {
            let mut record = find(store, pick(*index));
            list.move_higher(store, &mut record).expect("move_higher");
        }
        Op::Lower(index) => {
            let mut record = find(store, pick(*index));
            list.move_lower(store, &mut record).expect("move_lower");
        }
        Op::Top(index) => {
            let mut record = find(store, pick(*index));
            list.move_to_top(store, &mut record).expect("move_to_top");
        }
        Op::Bottom(index) => {
            let mut record = find(store, pick(*index));
            list.move_to_bottom(store, &mut record).expect("move_to_bottom");
        }
        Op::Remove(index) => {
            let mut record = find(store, pick(*index));
            list.remove_from_list(store, &mut record).expect("remove");
        }
        Op::Destroy(index) => {
            let id = pick(*index);
            let mut record = find(store, id);
            list.destroy(store, &mut record).expect("destroy");
            live.retain(|live_id| *live_id != id);
        }
        Op::Create(_) | Op::CreateAt(..) | Op::CreateUnlisted(_) => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_scope_stays_dense(ops in prop::collection::vec(op(), 1..40)) {
        let mut store = store();
        let list = list();
        let mut live = Vec::new();

        for op in &ops {
            apply(&mut store, &list, &mut live, op);
            for key in 0u8..3 {
                assert_dense(&store, &list, scope(parent(key)));
            }
        }
    }
}
