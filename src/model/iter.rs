//! A bounded, sentinel-aware cursor over a sequence of elements.

use std::fmt::Display;

use crate::error::{Error, Result};

/// A cursor over a slice of items supporting lookahead, sentinel-bounded
/// iteration and skipping forward to a marker.
///
/// Sentinels are compared against the *textual form* of the items (their
/// `Display` output), not against identity: if two distinct items stringify
/// identically, `skip_to` and the end bound terminate at the first
/// occurrence. Useful for scanning between structural markers such as
/// `\begin{document}` and `\end{document}`.
pub struct ElementIter<'a, T> {
    /// The items to iterate.
    items: &'a [T],

    /// The current cursor position.
    index: usize,

    /// Textual form of the item to stop before, if any.
    end: Option<String>,
}

impl<'a, T: Display> ElementIter<'a, T> {
    /// Create an unbounded iterator starting at the first item.
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            index: 0,
            end: None,
        }
    }

    /// Create an iterator bounded by the given sentinels. A `start` sentinel
    /// is consumed immediately, so iteration begins right *after* it; an
    /// `end` sentinel makes [`has_next`](Self::has_next) report `false` once
    /// the cursor reaches it.
    pub fn bounded(items: &'a [T], start: Option<&str>, end: Option<&str>) -> Self {
        let mut iter = Self {
            items,
            index: 0,
            end: end.map(String::from),
        };
        if let Some(marker) = start {
            iter.skip_to(marker);
        }
        iter
    }

    /// Check whether another item is available before the bound.
    pub fn has_next(&self) -> bool {
        match self.items.get(self.index) {
            Some(item) => match &self.end {
                Some(end) => item.to_string() != *end,
                None => true,
            },
            None => false,
        }
    }

    /// Return the item at the cursor and advance. Fails if the cursor is
    /// past the sequence end or at the end sentinel.
    pub fn next(&mut self) -> Result<&'a T> {
        if !self.has_next() {
            return Err(Error::OutOfBounds(
                "iterator advanced past its bound".to_string(),
            ));
        }
        let item = &self.items[self.index];
        self.index += 1;
        Ok(item)
    }

    /// Return the item at the cursor without advancing. Same bound
    /// precondition as [`next`](Self::next).
    pub fn peek(&self) -> Result<&'a T> {
        if !self.has_next() {
            return Err(Error::OutOfBounds(
                "iterator peeked past its bound".to_string(),
            ));
        }
        Ok(&self.items[self.index])
    }

    /// Consume items until one whose textual form equals `marker` was
    /// consumed, or the bound is exhausted.
    pub fn skip_to(&mut self, marker: &str) {
        while self.has_next() {
            let item = &self.items[self.index];
            self.index += 1;
            if item.to_string() == marker {
                return;
            }
        }
    }

    /// Get the current cursor position.
    pub fn position(&self) -> usize {
        self.index
    }
}
