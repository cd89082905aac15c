//! Observable list model.
//!
//! Holds the rows shown by a list view and records what changed so the view
//! can redraw only what it needs.

/// A change to a [`ListModel`] since the view last looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChange {
    /// All rows were replaced; redraw everything.
    Reset,
    /// `count` rows were added starting at `start`.
    Inserted {
        /// Index of the first new row.
        start: usize,
        /// Number of new rows.
        count: usize,
    },
    /// One row changed in place.
    Updated(usize),
}

/// Ordered rows plus a queue of pending [`ModelChange`]s.
#[derive(Debug, Clone)]
pub struct ListModel<T> {
    items: Vec<T>,
    changes: Vec<ModelChange>,
}

impl<T> Default for ListModel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            changes: Vec::new(),
        }
    }
}

impl<T> ListModel<T> {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rows.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the model has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces every row.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.changes.push(ModelChange::Reset);
    }

    /// Appends rows after the existing ones.
    pub fn append_items(&mut self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        let start = self.items.len();
        let count = items.len();
        self.items.extend(items);
        self.changes.push(ModelChange::Inserted { start, count });
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.set_items(Vec::new());
    }

    /// Applies `f` to the row at `index`. Returns false if there is no such row.
    pub fn update(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        f(item);
        self.changes.push(ModelChange::Updated(index));
        true
    }

    /// Index of the first row matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    /// Drains the changes recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<ModelChange> {
        std::mem::take(&mut self.changes)
    }
}
