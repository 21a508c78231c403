//! Rebuilds the "currently selected airport" for a detail view that was
//! entered without one (deep link at startup). Two lookups against the
//! visit history, latched so at most one adoption ever happens:
//! an immediate scan of the raw persisted file, run before hydration has
//! finished, and a deferred scan of the in-memory log once it has.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::history::{self, HistoryItem};
use crate::model::Airport;
use crate::storage;

#[derive(Debug, Default)]
pub struct Recovery {
    adopted: bool,
}

impl Recovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_adopted(&self) -> bool {
        self.adopted
    }

    /// Called when a selection arrives through normal navigation, so the
    /// fallback scans stop running.
    pub fn mark_adopted(&mut self) {
        self.adopted = true;
    }

    /// Immediate phase: read and scan the persisted log directly, without
    /// waiting for hydration. Any read or parse failure is just "no match".
    pub fn immediate(&mut self, path: Option<&Path>, code: &str) -> Option<Airport> {
        if self.adopted {
            return None;
        }
        let path = path?;
        let content = fs::read_to_string(path).ok()?;
        let items = storage::parse_history(&content);
        let found = history::find_in(&items, code)?.airport.clone();
        debug!("immediate recovery hit for {code}");
        self.adopted = true;
        Some(found)
    }

    /// Deferred phase: scan the hydrated in-memory log. Covers persisted
    /// payloads the raw scan could not make sense of.
    pub fn deferred(&mut self, items: &[HistoryItem], code: &str) -> Option<Airport> {
        if self.adopted {
            return None;
        }
        let found = history::find_in(items, code)?.airport.clone();
        debug!("deferred recovery hit for {code}");
        self.adopted = true;
        Some(found)
    }
}
