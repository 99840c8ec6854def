//! Element identifiers used to wire ARIA relationships between parts.
//!
//! Every widget owns a root [`ElementId`] and derives ids for its parts
//! (headers, panels, options, thumbs) with [`ElementId::child`]. Hosts use the
//! ids as DOM ids (or whatever the backing toolkit keys nodes by), and widgets
//! reference them in `aria-controls`, `aria-labelledby` and friends.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A cheap-to-clone identifier for one element of a widget.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(Arc<str>);

impl ElementId {
    /// Wrap a consumer-provided id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Allocate a process-unique id of the form `{prefix}-{n}`.
    ///
    /// ```
    /// use taro_core::ElementId;
    ///
    /// let a = ElementId::unique("tabs");
    /// let b = ElementId::unique("tabs");
    /// assert_ne!(a, b);
    /// assert!(a.as_str().starts_with("tabs-"));
    /// ```
    pub fn unique(prefix: &str) -> Self {
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self(Arc::from(format!("{prefix}-{n}")))
    }

    /// Derive the id of a sub-element: `{self}-{suffix}`.
    pub fn child(&self, suffix: impl fmt::Display) -> Self {
        Self(Arc::from(format!("{}-{}", self.0, suffix)))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}
