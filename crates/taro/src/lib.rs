//! **taro** -- headless, accessible widgets with an Elm-style component
//! contract.
//!
//! This is the umbrella crate that re-exports everything needed to embed
//! taro widgets from a single dependency:
//!
//! ```toml
//! [dependencies]
//! taro = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`taro_core`] are available at the crate root
//!   ([`Component`], [`Command`], [`Effect`], [`AccessNode`], [`Host`],
//!   [`init_logging`], etc.).
//! * The [`widgets`] module re-exports everything from [`taro_widgets`]
//!   (accordion, dialog, menu, listbox, combobox, carousel, slider, tabs,
//!   tooltip, disclosure).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use taro::widgets::tabs::{self, Tabs};
//! use taro::{Host, UiEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tabs = Tabs::new(vec!["One".into(), "Two".into()]);
//!     let (host, mut effects) = Host::new(tabs, |event| match event {
//!         UiEvent::Key(key) => Some(tabs::Message::KeyPress(key)),
//!         _ => None,
//!     });
//!     let handle = host.handle();
//!     tokio::spawn(host.run());
//!     // Forward toolkit input with `handle.dispatch(..)` and apply
//!     // focus effects from `effects.recv().await`.
//! }
//! ```

pub use taro_core::*;
pub mod widgets {
    pub use taro_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
