//! Application message types
//!
//! Defines all messages that can be sent to the application's update function.
//! Messages are organized by category for clear handling and routing.

use crate::error::FetchResult;
use crate::i18n::Locale;
use crate::resource::Payload;
use crate::state::{RequestTicket, ViewId};

/// Main application message enum
#[derive(Debug, Clone)]
pub enum Message {
    /// Active language changed
    Locale(Locale),

    /// View operations
    View(ViewMessage),

    /// Internal async operation results
    Internal(InternalMessage),

    /// Stop the loop
    Quit,

    /// No-op message
    None,
}

/// View-related messages
#[derive(Debug, Clone)]
pub enum ViewMessage {
    /// Mount a view and dispatch its first request
    Mount(ViewId),

    /// Unmount a view and release its cache reference
    Unmount(ViewId),

    /// Set a request param
    SetParam {
        view: ViewId,
        key: String,
        value: String,
    },

    /// Remove a request param
    RemoveParam { view: ViewId, key: String },

    /// Re-dispatch the view's current request
    Retry(ViewId),
}

/// Results of spawned work
#[derive(Debug, Clone)]
pub enum InternalMessage {
    /// A fetch finished
    Fetched {
        ticket: RequestTicket,
        result: FetchResult<Payload>,
    },
}
