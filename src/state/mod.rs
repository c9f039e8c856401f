//! State management module for Campus Content
//!
//! This module contains the view-side state types:
//! - `resource_state`: The Idle/Loading/Loaded/Failed lifecycle of one view
//! - `view`: Per-view cache enforcing last-request-wins
//! - `shared`: Optional keyed payload cache shared between views

mod resource_state;
mod shared;
mod view;

pub use resource_state::*;
pub use shared::*;
pub use view::*;
