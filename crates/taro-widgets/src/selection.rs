//! Selected-set bookkeeping for listboxes.
//!
//! `Selection` tracks which indices of a collection are selected under a
//! single- or multiple-selection mode, plus the anchor used for range
//! selection. Every mutator reports whether the set changed so callers only
//! announce real changes.

use std::collections::BTreeSet;

/// How many items may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

#[derive(Debug, Clone)]
pub struct Selection {
    mode: SelectionMode,
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
    len: usize,
}

impl Selection {
    pub fn new(mode: SelectionMode, len: usize) -> Self {
        Self {
            mode,
            selected: BTreeSet::new(),
            anchor: None,
            len,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_multiple(&self) -> bool {
        self.mode == SelectionMode::Multiple
    }

    pub fn item_count(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Resize the collection, dropping selected indices past the end.
    pub fn set_len(&mut self, len: usize) -> bool {
        self.len = len;
        if self.anchor.is_some_and(|a| a >= len) {
            self.anchor = None;
        }
        let before = self.selected.len();
        self.selected.retain(|&i| i < len);
        before != self.selected.len()
    }

    fn in_range(&self, index: usize) -> bool {
        if index < self.len {
            true
        } else {
            tracing::warn!(index, len = self.len, "selection index out of bounds");
            false
        }
    }

    /// Make `index` the only selected item.
    pub fn select(&mut self, index: usize) -> bool {
        if !self.in_range(index) {
            return false;
        }
        self.anchor = Some(index);
        if self.selected.len() == 1 && self.selected.contains(&index) {
            return false;
        }
        self.selected.clear();
        self.selected.insert(index);
        true
    }

    /// Flip `index`. In single mode this selects it (a single-select list
    /// never deselects through toggling).
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.mode {
            SelectionMode::Single => self.select(index),
            SelectionMode::Multiple => {
                if !self.in_range(index) {
                    return false;
                }
                self.anchor = Some(index);
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
                true
            }
        }
    }

    /// Add `index` to the selection (multiple mode), keeping the rest.
    pub fn add(&mut self, index: usize) -> bool {
        match self.mode {
            SelectionMode::Single => self.select(index),
            SelectionMode::Multiple => {
                if !self.in_range(index) {
                    return false;
                }
                self.anchor = Some(index);
                self.selected.insert(index)
            }
        }
    }

    /// Select every item between the anchor and `to`, inclusive, keeping
    /// the rest. Without an anchor, behaves like [`select`](Self::select).
    /// The anchor does not move. Single mode selects `to` only.
    pub fn select_range(&mut self, to: usize) -> bool {
        if self.mode == SelectionMode::Single {
            return self.select(to);
        }
        if !self.in_range(to) {
            return false;
        }
        let Some(anchor) = self.anchor else {
            return self.select(to);
        };
        let (lo, hi) = if anchor <= to { (anchor, to) } else { (to, anchor) };
        let before = self.selected.len();
        self.selected.extend(lo..=hi);
        before != self.selected.len()
    }

    /// Select everything (multiple mode only).
    pub fn select_all(&mut self) -> bool {
        if self.mode == SelectionMode::Single {
            return false;
        }
        let before = self.selected.len();
        self.selected.extend(0..self.len);
        before != self.selected.len()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        self.anchor = None;
        changed
    }

    /// Replace the selection. Out-of-range indices are dropped; in single
    /// mode only the first valid index is kept.
    pub fn set(&mut self, indices: &[usize]) -> bool {
        let valid = indices.iter().copied().filter(|&i| self.in_range(i));
        let next: BTreeSet<usize> = match self.mode {
            SelectionMode::Single => valid.take(1).collect(),
            SelectionMode::Multiple => valid.collect(),
        };
        if next == self.selected {
            return false;
        }
        self.anchor = next.iter().next().copied();
        self.selected = next;
        true
    }

    /// Deselect every index for which `keep` is false.
    pub fn retain(&mut self, keep: impl Fn(usize) -> bool) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&i| keep(i));
        before != self.selected.len()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected indices in ascending order.
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }
}
