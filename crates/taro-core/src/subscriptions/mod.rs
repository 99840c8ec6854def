//! Built-in subscription sources.
//!
//! - **Timers** ([`Every`], [`After`]) -- repeating and one-shot timers, keyed
//!   so that several widgets can each run their own.

mod timer;

pub use timer::*;
