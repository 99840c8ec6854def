//! Type-to-select for menus and listboxes.

use std::time::{Duration, Instant};

/// Accumulates typed characters and finds the item whose label starts with
/// them.
///
/// Characters typed within `timeout` of each other extend the search
/// string; a longer pause starts a new one. Typing the same character
/// repeatedly cycles through the items starting with it.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use taro_widgets::typeahead::Typeahead;
///
/// let labels = ["Apple", "Banana", "Blueberry", "Cherry"];
/// let mut ta = Typeahead::new();
/// let now = Instant::now();
///
/// ta.push('b', now);
/// assert_eq!(ta.search(&labels, 0, |_| true), Some(1));
/// ta.push('l', now);
/// assert_eq!(ta.search(&labels, 1, |_| true), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Typeahead {
    buffer: String,
    last_input: Option<Instant>,
    timeout: Duration,
}

impl Default for Typeahead {
    fn default() -> Self {
        Self::new()
    }
}

impl Typeahead {
    /// A typeahead with the default 500 ms timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(500))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            buffer: String::new(),
            last_input: None,
            timeout,
        }
    }

    /// Append a typed character, first clearing a buffer older than the
    /// timeout.
    pub fn push(&mut self, c: char, now: Instant) {
        let expired = self
            .last_input
            .is_some_and(|t| now.saturating_duration_since(t) >= self.timeout);
        if expired {
            self.buffer.clear();
        }
        self.buffer.extend(c.to_lowercase());
        self.last_input = Some(now);
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_input = None;
    }

    /// Find the enabled item matching the buffer, case-insensitively.
    ///
    /// A buffer of one repeated character looks for the next item after
    /// `current` starting with that character. A longer search string
    /// starts at `current` itself, so refining a match keeps it. The search
    /// wraps around.
    pub fn search<S: AsRef<str>>(
        &self,
        labels: &[S],
        current: usize,
        enabled: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        let n = labels.len();
        let first = self.buffer.chars().next()?;
        if n == 0 {
            return None;
        }

        let repeated = self.buffer.chars().all(|c| c == first);
        let (needle, start) = if repeated {
            (first.to_string(), current + 1)
        } else {
            (self.buffer.clone(), current)
        };

        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&i| enabled(i) && labels[i].as_ref().to_lowercase().starts_with(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRUIT: [&str; 5] = ["Apple", "Banana", "blueberry", "Cherry", "Bilberry"];

    #[test]
    fn finds_case_insensitively() {
        let mut ta = Typeahead::new();
        ta.push('C', Instant::now());
        assert_eq!(ta.search(&FRUIT, 0, |_| true), Some(3));
    }

    #[test]
    fn repeated_char_cycles() {
        let mut ta = Typeahead::new();
        let now = Instant::now();
        ta.push('b', now);
        assert_eq!(ta.search(&FRUIT, 0, |_| true), Some(1));
        ta.push('b', now);
        assert_eq!(ta.search(&FRUIT, 1, |_| true), Some(2));
        ta.push('b', now);
        assert_eq!(ta.search(&FRUIT, 2, |_| true), Some(4));
        ta.push('b', now);
        assert_eq!(ta.search(&FRUIT, 4, |_| true), Some(1));
    }

    #[test]
    fn multi_char_refines_from_current() {
        let mut ta = Typeahead::new();
        let now = Instant::now();
        ta.push('b', now);
        ta.push('l', now);
        assert_eq!(ta.search(&FRUIT, 1, |_| true), Some(2));
        ta.push('u', now);
        assert_eq!(ta.search(&FRUIT, 2, |_| true), Some(2));
    }

    #[test]
    fn skips_disabled() {
        let mut ta = Typeahead::new();
        ta.push('b', Instant::now());
        assert_eq!(ta.search(&FRUIT, 0, |i| i != 1), Some(2));
    }

    #[test]
    fn timeout_resets_buffer() {
        let mut ta = Typeahead::with_timeout(Duration::from_millis(100));
        let t0 = Instant::now();
        ta.push('a', t0);
        ta.push('p', t0 + Duration::from_millis(50));
        assert_eq!(ta.buffer(), "ap");
        ta.push('c', t0 + Duration::from_millis(400));
        assert_eq!(ta.buffer(), "c");
    }

    #[test]
    fn no_match_and_empty() {
        let mut ta = Typeahead::new();
        assert_eq!(ta.search(&FRUIT, 0, |_| true), None);
        ta.push('z', Instant::now());
        assert_eq!(ta.search(&FRUIT, 0, |_| true), None);
        let empty: [&str; 0] = [];
        assert_eq!(ta.search(&empty, 0, |_| true), None);
    }
}
