//! Slice helpers.

use serde_json::Value;

use super::{SearchMode, search_text};
use super::obj::get_path;

/// Split into runs of `size`. The last run may be shorter. A size of zero
/// gives no runs.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

/// Concatenate two slices.
pub fn merge<T: Clone>(first: &[T], second: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(first.len() + second.len());
    out.extend_from_slice(first);
    out.extend_from_slice(second);
    out
}

/// Insert `item` at `index`, clamped to the end.
pub fn add_at<T: Clone>(items: &[T], index: usize, item: T) -> Vec<T> {
    let mut out = items.to_vec();
    out.insert(index.min(out.len()), item);
    out
}

/// Remove the item at `index`. Out-of-range indices leave a plain copy.
pub fn remove_at<T: Clone>(items: &[T], index: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

/// Drop repeats, keeping first occurrences in order.
pub fn unique<T: Clone + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Items whose text (or the text at the dot path `field`) matches `query`.
pub fn search(items: &[Value], query: &str, mode: SearchMode, field: Option<&str>) -> Vec<Value> {
    items
        .iter()
        .filter(|item| {
            let candidate = match field {
                Some(path) => get_path(item, path),
                None => Some(*item),
            };
            candidate
                .and_then(search_text)
                .is_some_and(|text| mode.matches(&text, query))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_chunk() {
        assert_eq!(chunk(&[1, 2, 3, 4, 5], 2), vec![vec![1, 2], vec![3, 4], vec![5]]);
        assert!(chunk(&[1, 2], 0).is_empty());
        assert!(chunk::<u8>(&[], 3).is_empty());
    }

    #[test]
    fn test_add_and_remove_at() {
        assert_eq!(add_at(&[1, 3], 1, 2), vec![1, 2, 3]);
        assert_eq!(add_at(&[1], 9, 2), vec![1, 2]);
        assert_eq!(remove_at(&[1, 2, 3], 0), vec![2, 3]);
        assert_eq!(remove_at(&[1, 2, 3], 7), vec![1, 2, 3]);
    }

    #[test]
    fn test_unique_keeps_first() {
        assert_eq!(unique(&["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_search_items_and_fields() {
        let items = vec![
            json!({"name": "Ada", "team": {"name": "core"}}),
            json!({"name": "Grace", "team": {"name": "compilers"}}),
            json!("adamant"),
        ];
        let by_team = search(&items, "co", SearchMode::StartsWith, Some("team.name"));
        assert_eq!(by_team.len(), 2);

        let by_name = search(&items, "ada", SearchMode::Exact, Some("name"));
        assert_eq!(by_name, vec![items[0].clone()]);

        let plain = search(&items, "ADA", SearchMode::Contains, None);
        assert_eq!(plain, vec![json!("adamant")]);
    }

    proptest! {
        #[test]
        fn prop_chunks_flatten_back(items in proptest::collection::vec(any::<u8>(), 0..64), size in 1usize..10) {
            let chunks = chunk(&items, size);
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
            let flat: Vec<u8> = chunks.concat();
            prop_assert_eq!(flat, items);
        }

        #[test]
        fn prop_merge_preserves_length_and_order(
            a in proptest::collection::vec(any::<i32>(), 0..32),
            b in proptest::collection::vec(any::<i32>(), 0..32),
        ) {
            let merged = merge(&a, &b);
            prop_assert_eq!(merged.len(), a.len() + b.len());
            prop_assert_eq!(&merged[..a.len()], &a[..]);
            prop_assert_eq!(&merged[a.len()..], &b[..]);
        }

        #[test]
        fn prop_unique_has_no_repeats(items in proptest::collection::vec(0u8..8, 0..40)) {
            let out = unique(&items);
            for (i, x) in out.iter().enumerate() {
                prop_assert!(!out[i + 1..].contains(x));
                prop_assert!(items.contains(x));
            }
        }
    }
}
