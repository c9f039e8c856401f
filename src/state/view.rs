//! Per-view state cache
//!
//! A view owns one request and its `ResourceState`. Every dispatch issues a
//! ticket with a strictly increasing sequence number; a result is committed only
//! when it carries the latest ticket. Late results of superseded requests are
//! dropped, so rapid locale switching never shows content in the old language.

use super::ResourceState;
use crate::error::FetchResult;
use crate::i18n::Locale;
use crate::resource::{Payload, ResourceRequest};
use uuid::Uuid;

/// Unique identifier for views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(Uuid);

impl ViewId {
    /// Create a new unique view ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one dispatched request of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub view: ViewId,
    pub seq: u64,
}

/// What happened to a result handed to [`ResourceView::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Result became the view's state
    Committed,
    /// A newer request was dispatched; result dropped
    Stale,
    /// Ticket belongs to another view, or the view is unmounted
    Rejected,
}

/// One localized resource view
#[derive(Debug, Clone)]
pub struct ResourceView {
    id: ViewId,
    request: ResourceRequest,
    state: ResourceState,
    /// Sequence number of the latest dispatched request (0 = none yet)
    latest: u64,
    mounted: bool,
}

impl ResourceView {
    /// Create an idle view
    pub fn new(request: ResourceRequest) -> Self {
        Self {
            id: ViewId::new(),
            request,
            state: ResourceState::Idle,
            latest: 0,
            mounted: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn request(&self) -> &ResourceRequest {
        &self.request
    }

    pub fn state(&self) -> &ResourceState {
        &self.state
    }

    pub fn locale(&self) -> Locale {
        self.request.locale
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether a dispatched request has not resolved yet
    pub fn is_pending(&self) -> bool {
        self.state.is_loading()
    }

    /// Mount the view and dispatch its first request.
    ///
    /// Mounting an already mounted view does nothing.
    pub fn mount(&mut self) -> Option<RequestTicket> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.begin())
    }

    /// Stop accepting results
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.state = ResourceState::Idle;
    }

    /// Switch language; re-dispatches only if the locale actually changed
    pub fn set_locale(&mut self, locale: Locale) -> Option<RequestTicket> {
        if self.request.locale == locale {
            return None;
        }
        self.request.locale = locale;
        self.redispatch()
    }

    /// Set a request param; re-dispatches only if the value changed
    pub fn set_param(&mut self, key: &str, value: &str) -> Option<RequestTicket> {
        if self.request.params.get(key).map(String::as_str) == Some(value) {
            return None;
        }
        self.request.params.insert(key.to_string(), value.to_string());
        self.redispatch()
    }

    /// Remove a request param; re-dispatches only if it was present
    pub fn remove_param(&mut self, key: &str) -> Option<RequestTicket> {
        self.request.params.remove(key)?;
        self.redispatch()
    }

    /// Re-dispatch the identical request
    pub fn retry(&mut self) -> Option<RequestTicket> {
        self.redispatch()
    }

    /// Offer a result; commits only for the latest ticket
    pub fn resolve(&mut self, ticket: RequestTicket, result: FetchResult<Payload>) -> Resolution {
        if ticket.view != self.id || !self.mounted {
            return Resolution::Rejected;
        }
        if ticket.seq != self.latest {
            log::debug!(
                "view {} dropped stale result #{} (latest #{})",
                self.id,
                ticket.seq,
                self.latest
            );
            return Resolution::Stale;
        }

        self.state = match result {
            Ok(payload) => ResourceState::Loaded(payload),
            Err(err) => {
                log::warn!("view {} request #{} failed: {}", self.id, ticket.seq, err);
                ResourceState::Failed(err)
            }
        };
        Resolution::Committed
    }

    fn redispatch(&mut self) -> Option<RequestTicket> {
        self.mounted.then(|| self.begin())
    }

    /// Clear old content and issue a new ticket
    fn begin(&mut self) -> RequestTicket {
        self.state = ResourceState::Loading;
        self.latest += 1;
        RequestTicket {
            view: self.id,
            seq: self.latest,
        }
    }
}
