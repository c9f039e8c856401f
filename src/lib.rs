//! Campus Content - localized content views for a university website backend
//!
//! Fetches localized JSON resources from the REST backend, normalizes their
//! envelopes and keeps one state per view:
//! - `resource`: requests, envelope unwrapping, field aliases and the HTTP fetcher
//! - `state`: per-view state with last-request-wins, plus an optional shared cache
//! - `render`: pure rendering of a view's state into a display tree
//! - `app`: the message loop owning all views

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod message;
pub mod render;
pub mod resource;
pub mod state;
pub mod utils;
