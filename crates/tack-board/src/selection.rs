//! Multi-selection of tasks for bulk actions.

use std::collections::BTreeSet;

use tack_core::task::TaskId;

/// Result of [`Selection::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    /// The id is not visible under the current filter and was not added.
    NotVisible,
}

impl Toggle {
    pub fn changed(self) -> bool {
        self != Self::NotVisible
    }
}

/// The set of selected task ids.
///
/// Ids are only added while visible. Changing the filter afterwards does not
/// touch the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<TaskId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &BTreeSet<TaskId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Adds `id` if absent and visible, removes it if present.
    pub fn toggle(&mut self, id: &str, visible_ids: &[TaskId]) -> Toggle {
        if self.ids.remove(id) {
            return Toggle::Deselected;
        }
        if !visible_ids.iter().any(|v| v == id) {
            return Toggle::NotVisible;
        }
        self.ids.insert(id.to_string());
        Toggle::Selected
    }

    /// Adds every visible id. Returns `true` if the set changed.
    pub fn select_all(&mut self, visible_ids: &[TaskId]) -> bool {
        let before = self.ids.len();
        self.ids.extend(visible_ids.iter().cloned());
        self.ids.len() != before
    }

    /// Empties the set. Returns `true` if it was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Keeps only ids for which `keep` holds and returns the dropped ones.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<TaskId> {
        let (kept, dropped): (BTreeSet<TaskId>, BTreeSet<TaskId>) =
            std::mem::take(&mut self.ids).into_iter().partition(|id| keep(id));
        self.ids = kept;
        dropped.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(ids: &[&str]) -> Vec<TaskId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut sel = Selection::new();
        let vis = visible(&["T1", "T2"]);
        assert_eq!(sel.toggle("T1", &vis), Toggle::Selected);
        assert!(sel.contains("T1"));
        assert_eq!(sel.toggle("T1", &vis), Toggle::Deselected);
        assert!(sel.is_empty());
    }

    #[test]
    fn hidden_ids_cannot_be_added_but_can_be_removed() {
        let mut sel = Selection::new();
        assert_eq!(sel.toggle("T9", &visible(&["T1"])), Toggle::NotVisible);
        assert!(sel.is_empty());

        sel.toggle("T1", &visible(&["T1"]));
        // T1 is now filtered out but still deselectable.
        assert_eq!(sel.toggle("T1", &[]), Toggle::Deselected);
    }

    #[test]
    fn select_all_and_clear_report_changes() {
        let mut sel = Selection::new();
        let vis = visible(&["T1", "T2", "T3"]);
        assert!(sel.select_all(&vis));
        assert!(!sel.select_all(&vis));
        assert_eq!(sel.len(), 3);
        assert!(sel.clear());
        assert!(!sel.clear());
    }

    #[test]
    fn retain_returns_dropped_ids() {
        let mut sel = Selection::new();
        sel.select_all(&visible(&["T1", "T2", "T3"]));
        let dropped = sel.retain(|id| id != "T2");
        assert_eq!(dropped, vec!["T2".to_string()]);
        assert_eq!(sel.len(), 2);
    }
}
