//! Resource state of a single view
//!
//! Exactly one variant holds at a time. The payload of a previous locale is never
//! kept next to a new request: entering `Loading` drops it.

use crate::error::FetchError;
use crate::resource::Payload;

/// Lifecycle of one view's content
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResourceState {
    /// Created, nothing requested yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// Latest request succeeded
    Loaded(Payload),
    /// Latest request failed
    Failed(FetchError),
}

impl ResourceState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ResourceState::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            ResourceState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Loaded, but with nothing to show
    pub fn is_empty(&self) -> bool {
        self.payload().is_some_and(is_empty_payload)
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            ResourceState::Idle => "idle",
            ResourceState::Loading => "loading",
            ResourceState::Loaded(_) => "loaded",
            ResourceState::Failed(_) => "failed",
        }
    }
}

/// Null, empty string, empty array or empty object
pub fn is_empty_payload(payload: &Payload) -> bool {
    match payload {
        Payload::Null => true,
        Payload::String(s) => s.trim().is_empty(),
        Payload::Array(items) => items.is_empty(),
        Payload::Object(map) => map.is_empty(),
        _ => false,
    }
}
