//! Focus helpers shared by the composite widgets.
//!
//! [`RovingFocus`] tracks which item of a tablist, menu, accordion or
//! listbox is active, skipping disabled items, and yields the roving
//! `tabindex` for each item. [`FocusTrap`] cycles Tab through a fixed set of
//! elements for modal dialogs.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taro_core::{ElementId, Error, Orientation, TabIndex};

/// A relative or absolute move within a group of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Next,
    Prev,
    First,
    Last,
}

impl Nav {
    /// Map arrow keys (following `orientation`) and Home/End to a move.
    ///
    /// Keys with Ctrl, Alt or Shift held are not navigation keys.
    pub fn from_key(key: &KeyEvent, orientation: Orientation) -> Option<Nav> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT)
        {
            return None;
        }
        match (key.code, orientation) {
            (KeyCode::Home, _) => Some(Nav::First),
            (KeyCode::End, _) => Some(Nav::Last),
            (KeyCode::Right, Orientation::Horizontal) | (KeyCode::Down, Orientation::Vertical) => {
                Some(Nav::Next)
            }
            (KeyCode::Left, Orientation::Horizontal) | (KeyCode::Up, Orientation::Vertical) => {
                Some(Nav::Prev)
            }
            _ => None,
        }
    }
}

/// Active-item tracking with disabled items and optional wrapping.
///
/// When at least one item is enabled, the active item is always an enabled
/// one and it is the only item reported as [`TabIndex::Tabbable`].
#[derive(Debug, Clone)]
pub struct RovingFocus {
    ids: Vec<ElementId>,
    disabled: Vec<bool>,
    active: usize,
    wrap: bool,
}

impl RovingFocus {
    /// Track `ids`, all enabled, with the first one active. Wraps by default.
    pub fn new(ids: Vec<ElementId>) -> Self {
        let disabled = vec![false; ids.len()];
        Self {
            ids,
            disabled,
            active: 0,
            wrap: true,
        }
    }

    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn id(&self, index: usize) -> Option<&ElementId> {
        self.ids.get(index)
    }

    /// Replace the items. Disabled flags reset and the active index is
    /// clamped.
    pub fn set_items(&mut self, ids: Vec<ElementId>) {
        self.disabled = vec![false; ids.len()];
        self.ids = ids;
        self.active = self.active.min(self.ids.len().saturating_sub(1));
    }

    /// Enable or disable an item. Disabling the active item moves the active
    /// index to the nearest enabled item after it, else before it.
    pub fn set_disabled(&mut self, index: usize, disabled: bool) {
        let Some(flag) = self.disabled.get_mut(index) else {
            tracing::warn!(index, len = self.ids.len(), "set_disabled out of bounds");
            return;
        };
        *flag = disabled;
        if !self.is_enabled(self.active) {
            self.active = self
                .scan(self.active, true, false)
                .or_else(|| self.scan(self.active, false, false))
                .unwrap_or(self.active);
        }
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.disabled.get(index).is_some_and(|d| !d)
    }

    /// Whether any item can take focus.
    pub fn has_enabled(&self) -> bool {
        self.disabled.iter().any(|d| !d)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// The active item's id, if any item exists.
    pub fn active_id(&self) -> Option<&ElementId> {
        self.ids.get(self.active)
    }

    /// First enabled index strictly after (or before) `from`, optionally
    /// wrapping around.
    fn scan(&self, from: usize, forward: bool, wrap: bool) -> Option<usize> {
        let n = self.ids.len();
        if n == 0 {
            return None;
        }
        let steps = if wrap { n - 1 } else { n };
        let mut i = from;
        for _ in 0..steps {
            i = if forward {
                if i + 1 >= n {
                    if !wrap {
                        return None;
                    }
                    0
                } else {
                    i + 1
                }
            } else if i == 0 {
                if !wrap {
                    return None;
                }
                n - 1
            } else {
                i - 1
            };
            if self.is_enabled(i) {
                return Some(i);
            }
        }
        None
    }

    /// Where `nav` would land, without moving.
    pub fn target(&self, nav: Nav) -> Option<usize> {
        match nav {
            Nav::Next => self.scan(self.active, true, self.wrap),
            Nav::Prev => self.scan(self.active, false, self.wrap),
            Nav::First => (0..self.ids.len()).find(|&i| self.is_enabled(i)),
            Nav::Last => (0..self.ids.len()).rev().find(|&i| self.is_enabled(i)),
        }
    }

    /// Move the active item. Returns the new index, or `None` when the
    /// active item did not change.
    pub fn navigate(&mut self, nav: Nav) -> Option<usize> {
        let target = self.target(nav)?;
        if target == self.active {
            return None;
        }
        self.active = target;
        Some(target)
    }

    /// Make `index` active. Disabled or out-of-range indices are ignored
    /// with a warning; returns whether the index is now active.
    pub fn focus(&mut self, index: usize) -> bool {
        match self.try_focus(index) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "ignoring focus request");
                false
            }
        }
    }

    /// Make `index` active, or explain why it cannot be.
    pub fn try_focus(&mut self, index: usize) -> Result<(), Error> {
        if index >= self.ids.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.ids.len(),
            });
        }
        if !self.is_enabled(index) {
            return Err(Error::Disabled(index));
        }
        self.active = index;
        Ok(())
    }

    /// The roving `tabindex` of item `index`.
    pub fn tab_index(&self, index: usize) -> TabIndex {
        if index == self.active && self.is_enabled(index) {
            TabIndex::Tabbable
        } else {
            TabIndex::Programmatic
        }
    }
}

/// Tab cycling for modal content: focus never leaves `ids`.
#[derive(Debug, Clone, Default)]
pub struct FocusTrap {
    ids: Vec<ElementId>,
}

impl FocusTrap {
    pub fn new(ids: Vec<ElementId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    pub fn first(&self) -> Option<&ElementId> {
        self.ids.first()
    }

    pub fn last(&self) -> Option<&ElementId> {
        self.ids.last()
    }

    /// The element Tab moves to from `current`. Focus outside the trap
    /// re-enters at the first element.
    pub fn next_after(&self, current: Option<&ElementId>) -> Option<&ElementId> {
        match current.and_then(|c| self.ids.iter().position(|id| id == c)) {
            Some(i) => self.ids.get((i + 1) % self.ids.len()),
            None => self.first(),
        }
    }

    /// The element Shift+Tab moves to from `current`. Focus outside the trap
    /// re-enters at the last element.
    pub fn prev_before(&self, current: Option<&ElementId>) -> Option<&ElementId> {
        match current.and_then(|c| self.ids.iter().position(|id| id == c)) {
            Some(i) => self.ids.get((i + self.ids.len() - 1) % self.ids.len()),
            None => self.last(),
        }
    }
}
