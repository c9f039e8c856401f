//! Shared keyed cache
//!
//! Views requesting the same URL can share one payload. Each view holds a
//! reference to the key of its current request; an entry is dropped once no view
//! references it. Only the app loop touches this cache.

use crate::resource::Payload;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One cached response
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Option<Payload>,
    refs: usize,
    stored_at: Option<DateTime<Utc>>,
}

/// Payloads keyed by request URL, reference counted by view
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    entries: HashMap<String, CacheEntry>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `key`; returns the new reference count
    pub fn acquire(&mut self, key: &str) -> usize {
        let entry = self.entries.entry(key.to_string()).or_insert(CacheEntry {
            payload: None,
            refs: 0,
            stored_at: None,
        });
        entry.refs += 1;
        entry.refs
    }

    /// Drop interest in `key`; returns the remaining reference count
    pub fn release(&mut self, key: &str) -> usize {
        let Some(entry) = self.entries.get_mut(key) else {
            return 0;
        };
        entry.refs = entry.refs.saturating_sub(1);
        let remaining = entry.refs;
        if remaining == 0 {
            self.entries.remove(key);
            log::trace!("shared cache evicted {}", key);
        }
        remaining
    }

    pub fn get(&self, key: &str) -> Option<&Payload> {
        self.entries.get(key).and_then(|e| e.payload.as_ref())
    }

    /// Store a payload for a referenced key; unreferenced keys are ignored
    pub fn put(&mut self, key: &str, payload: Payload) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.payload = Some(payload);
                entry.stored_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Forget a stored payload but keep the references
    pub fn invalidate(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.payload = None;
            entry.stored_at = None;
        }
    }

    pub fn refs(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, |e| e.refs)
    }

    pub fn stored_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).and_then(|e| e.stored_at)
    }

    /// Number of referenced keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
