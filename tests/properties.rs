use json_mapper::errors::MapperError;
use json_mapper::{JsonMapper, Value};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(Value::from),
        "[a-zA-Z ]{0,12}".prop_map(Value::from),
    ]
}

fn mapper_with_list(items: &[Value]) -> JsonMapper {
    let mut m = JsonMapper::from_json("{}").unwrap();
    m.add("list", Value::Array(items.to_vec())).unwrap();
    m
}

proptest! {
    // Write-then-read consistency for freshly created object paths.
    #[test]
    fn add_then_find(keys in prop::collection::vec(key(), 1..5), v in leaf()) {
        let path = keys.join(".");
        let mut m = JsonMapper::from_json("{}").unwrap();
        m.add(&path, v.clone()).unwrap();
        prop_assert_eq!(m.find(&path).unwrap(), &v);
    }

    // Appending is observed at the new last index.
    #[test]
    fn append_lands_at_old_len(items in prop::collection::vec(leaf(), 0..8), v in leaf()) {
        let mut m = mapper_with_list(&items);
        m.add("list[-1]", v.clone()).unwrap();
        let at = format!("list[{}]", items.len());
        prop_assert_eq!(m.find(&at).unwrap(), &v);
    }

    #[test]
    fn remove_preserves_order(items in prop::collection::vec(leaf(), 1..10), pick in any::<prop::sample::Index>()) {
        let i = pick.index(items.len());
        let mut m = mapper_with_list(&items);
        let removed = m.remove(&format!("list.{i}")).unwrap();
        prop_assert_eq!(&removed, &items[i]);

        let mut expected = items.clone();
        expected.remove(i);
        prop_assert_eq!(m.find("list").unwrap(), &Value::Array(expected));
    }

    #[test]
    fn removed_keys_are_gone(k in key(), v in leaf()) {
        let mut m = JsonMapper::from_json("{}").unwrap();
        let p = format!("obj.{k}");
        m.add(&p, v).unwrap();
        m.remove(&p).unwrap();
        let gone = matches!(m.find(&p), Err(MapperError::KeyNotFound(_)));
        prop_assert!(gone);
    }

    #[test]
    fn bracket_and_dot_indexes_agree(items in prop::collection::vec(leaf(), 1..8), pick in any::<prop::sample::Index>()) {
        let i = pick.index(items.len());
        let m = mapper_with_list(&items);
        prop_assert_eq!(
            m.find(&format!("list[{i}]")).unwrap(),
            m.find(&format!("list.{i}")).unwrap()
        );
    }

    #[test]
    fn compact_round_trip(keys in prop::collection::vec(key(), 1..6), vals in prop::collection::vec(leaf(), 6)) {
        let mut m = JsonMapper::from_json("{}").unwrap();
        for (k, v) in keys.iter().zip(vals) {
            m.add(k, v).unwrap();
        }
        prop_assert_eq!(JsonMapper::from_json(&m.print()).unwrap(), m);
    }
}
