use itertools::Itertools;
use std::{collections::HashMap, fmt};

/// One `(token, count)` pair emitted by the map stage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyValue {
    pub key: String,
    pub value: u64,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Shuffle output: every distinct key with the values emitted for it.
///
/// Keys iterate in the order they were first seen.
#[derive(Debug, Default, Clone)]
pub struct Groups {
    entries: Vec<(String, Vec<u64>)>,
    index: HashMap<String, usize>,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kv: KeyValue) {
        match self.index.get(&kv.key) {
            Some(&i) => self.entries[i].1.push(kv.value),
            None => {
                self.index.insert(kv.key.clone(), self.entries.len());
                self.entries.push((kv.key, vec![kv.value]));
            }
        }
    }

    /// Builds groups from already grouped entries, keeping their order.
    /// Entries sharing a key are merged into the first one.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<u64>)>) -> Self {
        let mut groups = Self::new();
        for (key, mut values) in entries {
            match groups.index.get(&key) {
                Some(&i) => groups.entries[i].1.append(&mut values),
                None => {
                    groups.index.insert(key.clone(), groups.entries.len());
                    groups.entries.push((key, values));
                }
            }
        }
        groups
    }

    pub fn get(&self, key: &str) -> Option<&[u64]> {
        self.index.get(key).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn into_entries(self) -> Vec<(String, Vec<u64>)> {
        self.entries
    }
}

impl FromIterator<KeyValue> for Groups {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        let mut groups = Self::new();
        for kv in iter {
            groups.push(kv);
        }
        groups
    }
}

impl IntoIterator for Groups {
    type Item = (String, Vec<u64>);
    type IntoIter = std::vec::IntoIter<(String, Vec<u64>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Final token -> count mapping of a pipeline run.
///
/// Keys keep the order they were first seen in; that order breaks ties in
/// [`FrequencyTable::top_n`]. Equality ignores key order.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` to `key`, inserting it at the end if it is new.
    pub fn add(&mut self, key: impl Into<String>, count: u64) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// The `n` highest counts, highest first.
    ///
    /// The sort is stable, so equal counts come out in key order.
    pub fn top_n(&self, n: usize) -> Vec<(&str, u64)> {
        self.iter()
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .take(n)
            .collect_vec()
    }
}

impl PartialEq for FrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, c)| other.get(k) == Some(c))
    }
}

impl Eq for FrequencyTable {}

impl<K: Into<String>> FromIterator<(K, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, count) in iter {
            table.add(key, count);
        }
        table
    }
}

impl IntoIterator for FrequencyTable {
    type Item = (String, u64);
    type IntoIter = std::vec::IntoIter<(String, u64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(k, c)| format!("{k:?}: {c}"))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_first_seen_order() {
        let groups: Groups = ["b", "a", "b", "c", "a", "b"]
            .into_iter()
            .map(|k| KeyValue::new(k, 1))
            .collect();

        assert_eq!(groups.keys().collect_vec(), vec!["b", "a", "c"]);
        assert_eq!(groups.get("b"), Some(&[1, 1, 1][..]));
        assert_eq!(groups.get("c"), Some(&[1][..]));
        assert_eq!(groups.get("z"), None);
    }

    #[test]
    fn groups_from_entries_merge_duplicates() {
        let groups = Groups::from_entries(vec![
            ("x".to_string(), vec![1]),
            ("y".to_string(), vec![1, 1]),
            ("x".to_string(), vec![1, 1]),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.get("x"), Some(&[1, 1, 1][..]));
    }

    #[test]
    fn table_equality_ignores_order() {
        let a: FrequencyTable = [("the", 2), ("cat", 1)].into_iter().collect();
        let b: FrequencyTable = [("cat", 1), ("the", 2)].into_iter().collect();
        let c: FrequencyTable = [("cat", 2), ("the", 2)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn table_display() {
        let table: FrequencyTable = [("the", 2), ("cat", 1)].into_iter().collect();
        assert_eq!(table.to_string(), r#"{"the": 2, "cat": 1}"#);
        assert_eq!(FrequencyTable::new().to_string(), "{}");
    }

    #[test]
    fn top_n_descending_with_stable_ties() {
        let table: FrequencyTable = [("a", 1), ("b", 3), ("c", 3), ("d", 2), ("e", 1)]
            .into_iter()
            .collect();

        assert_eq!(table.top_n(3), vec![("b", 3), ("c", 3), ("d", 2)]);
        assert_eq!(table.top_n(10).len(), 5);
        assert_eq!(table.top_n(10).last(), Some(&("e", 1)));
        assert!(table.top_n(0).is_empty());
    }

    #[test]
    fn top_n_picks_exactly_n_of_many() {
        let table: FrequencyTable = (0..25u64).map(|i| (format!("w{i}"), i % 7)).collect();

        let top = table.top_n(10);
        assert_eq!(top.len(), 10);
        let min_kept = top.iter().map(|(_, c)| *c).min().unwrap();
        let dropped_max = table
            .iter()
            .filter(|(k, _)| !top.iter().any(|(t, _)| t == k))
            .map(|(_, c)| c)
            .max()
            .unwrap();
        assert!(min_kept >= dropped_max);
        assert_eq!(top, table.top_n(10));
    }

    #[test]
    fn add_accumulates() {
        let mut table = FrequencyTable::new();
        table.add("x", 2);
        table.add("y", 1);
        table.add("x", 3);
        assert_eq!(table.get("x"), Some(5));
        assert_eq!(table.total(), 6);
        assert_eq!(table.keys().collect_vec(), vec!["x", "y"]);
    }
}
