//=========================================================================
// Active Set
//=========================================================================
//
// Ordered records of the states receiving frame steps. Always sorted
// ascending by registration index; the sort is redone after every
// insertion and removal.
//
//=========================================================================

//=== ActiveRecord ========================================================

/// Non-owning pairing of an active state's key with its registration index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRecord {
    pub index: usize,
    pub key: String,
}

//=== ActiveSet ===========================================================

/// States currently receiving frame steps, in registration order.
#[derive(Debug, Default)]
pub struct ActiveSet {
    records: Vec<ActiveRecord>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record unless `key` is already present.
    ///
    /// Returns whether the record was added.
    pub fn insert(&mut self, index: usize, key: &str) -> bool {
        if self.contains(key) {
            return false;
        }

        self.records.push(ActiveRecord {
            index,
            key: key.to_owned(),
        });
        self.sort();
        true
    }

    /// Removes the record registered at `index`.
    pub fn remove_index(&mut self, index: usize) -> Option<ActiveRecord> {
        let pos = self.records.iter().position(|r| r.index == index)?;
        let record = self.records.remove(pos);
        self.sort();
        Some(record)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Position of `key` within the set.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveRecord> {
        self.records.iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.iter().map(|r| r.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // Ascending by index. Stable, so equal indices keep relative position.
    fn sort(&mut self) {
        self.records.sort_by_key(|r| r.index);
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(set: &ActiveSet) -> Vec<String> {
        set.keys()
    }

    #[test]
    fn insertion_order_does_not_affect_ordering() {
        let mut set = ActiveSet::new();
        set.insert(2, "c");
        set.insert(0, "a");
        set.insert(1, "b");

        assert_eq!(keys(&set), vec!["a", "b", "c"]);
    }

    #[test]
    fn ordering_is_ascending_not_descending() {
        let mut set = ActiveSet::new();
        set.insert(9, "late");
        set.insert(1, "early");

        let indices: Vec<_> = set.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 9]);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut set = ActiveSet::new();
        assert!(set.insert(0, "a"));
        assert!(!set.insert(0, "a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn equal_indices_keep_relative_position() {
        let mut set = ActiveSet::new();
        set.insert(4, "first");
        set.insert(4, "second");
        set.insert(1, "low");

        assert_eq!(keys(&set), vec!["low", "first", "second"]);
    }

    #[test]
    fn remove_index_keeps_order() {
        let mut set = ActiveSet::new();
        set.insert(0, "a");
        set.insert(1, "b");
        set.insert(2, "c");

        let removed = set.remove_index(1).unwrap();

        assert_eq!(removed.key, "b");
        assert_eq!(keys(&set), vec!["a", "c"]);
        assert_eq!(set.position("c"), Some(1));
        assert!(set.remove_index(1).is_none());
    }
}
