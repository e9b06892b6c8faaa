//! In-memory navigation history.
//!
//! Stands in for the browser history stack: guards push or replace entries
//! through the [`Navigator`] trait, and the router watches the current entry
//! to know when to mount the next route.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tracing::debug;

use crate::guard::{NavigateOptions, Navigator};

struct Entries {
    stack: Vec<String>,
    cursor: usize,
}

pub struct MemoryHistory {
    entries: Mutex<Entries>,
    current: watch::Sender<String>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        let (current, _) = watch::channel(initial.to_owned());
        Self { entries: Mutex::new(Entries { stack: vec![initial.to_owned()], cursor: 0 }), current }
    }

    /// Add an entry after the current one, discarding any forward entries.
    pub fn push(&self, to: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let keep = entries.cursor + 1;
        entries.stack.truncate(keep);
        entries.stack.push(to.to_owned());
        entries.cursor = keep;
        self.publish(to);
    }

    /// Overwrite the current entry.
    pub fn replace(&self, to: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let cursor = entries.cursor;
        entries.stack[cursor] = to.to_owned();
        self.publish(to);
    }

    /// Step back one entry. Returns false when already at the oldest entry.
    pub fn back(&self) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.cursor == 0 {
            return false;
        }
        entries.cursor -= 1;
        let to = entries.stack[entries.cursor].clone();
        self.publish(&to);
        true
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stack
            .clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    fn publish(&self, to: &str) {
        debug!(location = to, "history changed");
        self.current.send_replace(to.to_owned());
    }
}

impl Navigator for MemoryHistory {
    fn navigate(&self, to: &str, options: NavigateOptions) {
        if options.replace {
            self.replace(to);
        } else {
            self.push(to);
        }
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
