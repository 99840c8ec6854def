//! Core contract for **taro**, a library of headless accessible widgets.
//!
//! `taro-core` provides the traits and types every taro widget is built on.
//! Widgets follow the [Elm Architecture]: state changes only in
//! [`Component::update`], side effects are returned as [`Command`]s, and the
//! widget never draws anything. Instead, [`Component::semantics`] describes
//! the elements a consumer should render as an [`AccessNode`] tree carrying
//! roles, `tabindex` and `aria-*` attributes.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Component`] | A stateful headless widget (update / semantics / subscriptions) |
//! | [`Command`] | Side effect for the host: follow-up messages, timers, [`Effect`]s |
//! | [`Effect`] | Imperative host action: move focus, announce, scroll into view |
//! | [`AccessNode`] | Accessibility tree node: role, tabindex, ARIA attributes |
//! | [`UiEvent`] | Key, pointer, focus and hover input forwarded by a host |
//! | [`Subscription`] | Long-lived message source such as a rotation timer |
//! | [`Host`] | Headless async runtime driving a component from an event channel |
//! | [`Harness`](testing::Harness) | Synchronous driver for unit tests |
//!
//! # Cycle
//!
//! 1. **event** -- The host receives a [`UiEvent`] and maps it to the
//!    component's message type.
//! 2. **update** -- [`Component::update`] mutates state and returns a
//!    [`Command`].
//! 3. **effects** -- Immediate messages are processed next; effects go out
//!    on the host's effect channel; async commands run as tasks.
//! 4. **semantics** -- The consumer re-reads [`Component::semantics`] and
//!    updates its markup.
//!
//! # Quick example
//!
//! ```ignore
//! use taro_core::{AccessNode, Attr, Command, Component, ElementId, Role, TabIndex};
//!
//! struct Switch { id: ElementId, on: bool }
//!
//! enum Msg { Toggle }
//!
//! impl Component for Switch {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Toggle => self.on = !self.on,
//!         }
//!         Command::none()
//!     }
//!
//!     fn semantics(&self) -> AccessNode {
//!         AccessNode::new(self.id.clone())
//!             .role(Role::Button)
//!             .tab_index(TabIndex::Tabbable)
//!             .attr(Attr::Pressed, self.on)
//!     }
//! }
//! ```
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod a11y;
pub mod command;
pub mod component;
pub mod error;
pub mod event;
pub mod host;
pub mod id;
pub mod logging;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use a11y::{AccessNode, Attr, AttrValue, Orientation, Politeness, Role, TabIndex};
pub use command::{Command, Effect};
pub use component::Component;
pub use error::Error;
pub use event::{PointerEvent, PointerKind, UiEvent};
pub use host::{Host, HostError, HostHandle, HostOptions};
pub use id::ElementId;
pub use logging::{init_logging, log_to_file, LogConfig};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{After, Every};
