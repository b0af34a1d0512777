use serde::{Deserialize, Serialize};

/// University ids the user has bookmarked, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct BookmarkSet {
    ids: Vec<String>,
}

impl BookmarkSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Adds `id` if absent, removes it if present. Returns whether it is now bookmarked.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Returns `false` when `id` was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Returns `false` when `id` was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<String>> for BookmarkSet {
    fn from(ids: Vec<String>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.insert(&id);
        }
        set
    }
}

impl From<BookmarkSet> for Vec<String> {
    fn from(set: BookmarkSet) -> Self {
        set.ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// Scholarship ids saved for later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedScholarships {
    ids: BookmarkSet,
}

impl SavedScholarships {
    pub fn save(&mut self, id: &str) -> SaveOutcome {
        if self.ids.insert(id) {
            SaveOutcome::Saved
        } else {
            SaveOutcome::AlreadySaved
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[String] {
        self.ids.ids()
    }
}
