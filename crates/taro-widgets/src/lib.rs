//! Headless WAI-ARIA widgets for **taro**.
//!
//! Every widget implements [`taro_core::Component`]: it owns its state,
//! reacts to messages in `update`, asks the host for focus changes through
//! effects, and describes itself as an [`AccessNode`](taro_core::AccessNode)
//! tree carrying the roles and `aria-*` attributes assistive technology
//! expects. Drawing is left to the consumer.
//!
//! # Widgets
//!
//! | Module | Pattern |
//! |--------|---------|
//! | [`accordion`] | Stacked expandable sections |
//! | [`carousel`] | Rotating slides with a picker tablist |
//! | [`combobox`] | Editable input with list autocomplete |
//! | [`dialog`] | Modal dialog and alert dialog with a focus trap |
//! | [`disclosure`] | Show/hide button for a single panel |
//! | [`listbox`] | Single or multiple selection list |
//! | [`menu`] | Menu button with action, checkbox and radio items |
//! | [`slider`] | Numeric range input with keyboard and drag |
//! | [`tabs`] | Tablist with automatic or manual activation |
//! | [`tooltip`] | Delayed description of a hovered or focused element |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`focus`] | [`RovingFocus`](focus::RovingFocus) and [`FocusTrap`](focus::FocusTrap) |
//! | [`key`] | Key bindings and `aria-keyshortcuts` rendering |
//! | [`selection`] | Single/multiple selected-set bookkeeping |
//! | [`typeahead`] | Type-to-select search |

pub mod accordion;
pub mod carousel;
pub mod combobox;
pub mod dialog;
pub mod disclosure;
pub mod focus;
pub mod key;
pub mod listbox;
pub mod menu;
pub mod selection;
pub mod slider;
pub mod tabs;
mod text_edit;
pub mod tooltip;
pub mod typeahead;
