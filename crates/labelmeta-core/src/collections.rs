//! Sequence helpers

/// First item of an ordered sequence whose key reappears later on
///
/// Keys only need `PartialEq`, so float coordinates can be compared
/// directly. Runs in quadratic time, which is fine for per-document sizes.
pub fn find_duplicate_by<T, K, F>(items: &[T], key: F) -> Option<&T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let keys: Vec<K> = items.iter().map(key).collect();
    keys.iter()
        .enumerate()
        .find(|(i, k)| keys[i + 1..].iter().any(|other| other == *k))
        .map(|(i, _)| &items[i])
}

/// Check whether two items of an ordered sequence share the same key
pub fn has_duplicates_by<T, K, F>(items: &[T], key: F) -> bool
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    find_duplicate_by(items, key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates() {
        assert!(!has_duplicates_by(&["a", "b", "c"], |s| *s));
        assert!(!has_duplicates_by::<&str, &str, _>(&[], |s| *s));
    }

    #[test]
    fn test_duplicates_under_key() {
        let items = [("a", 1), ("b", 2), ("c", 1)];
        assert!(has_duplicates_by(&items, |(_, n)| *n));
        assert!(!has_duplicates_by(&items, |(s, _)| *s));
    }

    #[test]
    fn test_find_reports_first_occurrence() {
        let items = [("a", 1), ("b", 2), ("c", 2), ("d", 1)];
        assert_eq!(find_duplicate_by(&items, |(_, n)| *n), Some(&("a", 1)));
    }

    #[test]
    fn test_float_keys() {
        let boxes = [vec![0.0, 0.0, 1.0, 1.0], vec![0.5, 0.5, 1.0, 1.0], vec![0.0, 0.0, 1.0, 1.0]];
        assert!(has_duplicates_by(&boxes, |b| b.clone()));
    }
}
