//! Selection set: the case ids chosen for action.

/// Ordered set of selected case ids.
///
/// Membership is what matters; insertion order is kept so the persisted
/// array stays stable across writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ids, dropping duplicates.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for id in ids {
            set.insert(id.into());
        }
        set
    }

    /// Add `id`. Returns false when it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`. Returns false when it was absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Flip membership of `id` and return the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Replace the whole selection.
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::from_ids(ids);
    }

    /// "Select all" checkbox over the visible ids: clears when the selection
    /// is as large as the visible list, otherwise selects exactly the visible
    /// ids. Returns whether anything is selected afterwards.
    pub fn toggle_all(&mut self, visible: &[String]) -> bool {
        if self.len() == visible.len() {
            self.clear();
        } else {
            self.select_all(visible.iter().cloned());
        }
        !self.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn members(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }
}
