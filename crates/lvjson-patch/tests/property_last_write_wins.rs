use proptest::prelude::*;
use serde_json::json;

use lvjson_patch::{PatchEngine, PatchSet};

proptest! {
    #[test]
    fn later_entries_override_earlier_ones(
        path in "[a-c](\\.[a-c]){0,3}",
        values in prop::collection::vec(any::<i64>(), 1..6),
    ) {
        let mut set = PatchSet::default();
        for v in &values {
            set.push(path.clone(), json!(v));
        }

        let mut tree = json!({});
        let report = PatchEngine::literal().apply(&mut tree, &set).unwrap();
        prop_assert_eq!(report.applied, values.len());

        let pointer = format!("/{}", path.replace('.', "/"));
        prop_assert_eq!(tree.pointer(&pointer), Some(&json!(values[values.len() - 1])));
    }

    #[test]
    fn index_patch_produces_padded_array(index in 0usize..16, value in "[a-z]{1,8}") {
        let mut set = PatchSet::default();
        set.push(format!("items[{index}]"), json!(value.clone()));

        let mut tree = json!({});
        PatchEngine::literal().apply(&mut tree, &set).unwrap();

        let items = tree["items"].as_array().unwrap();
        prop_assert_eq!(items.len(), index + 1);
        let empty = json!({});
        prop_assert!(items[..index].iter().all(|i| i == &empty));
        prop_assert_eq!(&items[index], &json!(value));
    }
}
