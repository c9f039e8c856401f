//! Rendering of view state
//!
//! `render` is a pure function from a view's state to a display tree:
//! - `Idle` and `Loading` become a loading placeholder
//! - `Failed` becomes an error panel carrying a retry action
//! - an empty payload becomes a "no content" placeholder
//! - anything else is laid out according to the resource's layout
//!
//! It never fails; unexpected payload shapes fall back to a generic layout.

mod layout;
mod text;

pub use layout::{Card, Detail, Table, TimelineEntry};
pub use text::render_text;

use crate::catalog::Layout;
use crate::i18n::{self, Locale, UiText};
use crate::state::{is_empty_payload, ResourceState, ViewId};

/// Action offered by an error panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAction {
    /// View whose request is re-dispatched
    pub view: ViewId,
}

/// A rendered element
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    /// Shown while no result is available
    Loading { label: String },
    /// Shown after a failed request
    ErrorPanel {
        message: String,
        retry_label: String,
        retry: RetryAction,
    },
    /// Shown for a successful but empty response
    NoContent { label: String },
    /// A titled block around another node
    Section { title: String, body: Box<DisplayNode> },
    Timeline(Vec<TimelineEntry>),
    Cards(Vec<Card>),
    Detail(Detail),
    Table(Table),
}

impl DisplayNode {
    pub fn is_loading(&self) -> bool {
        matches!(self.inner(), DisplayNode::Loading { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.inner(), DisplayNode::ErrorPanel { .. })
    }

    pub fn is_no_content(&self) -> bool {
        matches!(self.inner(), DisplayNode::NoContent { .. })
    }

    /// Retry action of an error panel
    pub fn retry_action(&self) -> Option<RetryAction> {
        match self.inner() {
            DisplayNode::ErrorPanel { retry, .. } => Some(*retry),
            _ => None,
        }
    }

    /// The node inside any section wrappers
    pub fn inner(&self) -> &DisplayNode {
        match self {
            DisplayNode::Section { body, .. } => body.inner(),
            other => other,
        }
    }
}

/// Render one view's state
pub fn render(state: &ResourceState, layout: Layout, locale: Locale, retry: RetryAction) -> DisplayNode {
    match state {
        ResourceState::Idle | ResourceState::Loading => DisplayNode::Loading {
            label: i18n::text(locale, UiText::Loading).to_string(),
        },
        ResourceState::Failed(err) => DisplayNode::ErrorPanel {
            message: format!(
                "{}: {}",
                i18n::text(locale, UiText::ErrorTitle),
                err.user_message(locale)
            ),
            retry_label: i18n::text(locale, UiText::Retry).to_string(),
            retry,
        },
        ResourceState::Loaded(payload) if is_empty_payload(payload) => no_content(locale),
        ResourceState::Loaded(payload) => layout::build(payload, layout, locale).unwrap_or_else(|| no_content(locale)),
    }
}

/// Render with a section title
pub fn render_section(
    title: &str,
    state: &ResourceState,
    layout: Layout,
    locale: Locale,
    retry: RetryAction,
) -> DisplayNode {
    DisplayNode::Section {
        title: title.to_string(),
        body: Box::new(render(state, layout, locale, retry)),
    }
}

fn no_content(locale: Locale) -> DisplayNode {
    DisplayNode::NoContent {
        label: i18n::text(locale, UiText::NoContent).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;

    fn retry() -> RetryAction {
        RetryAction { view: ViewId::new() }
    }

    #[test]
    fn test_idle_and_loading_render_placeholder() {
        for state in [ResourceState::Idle, ResourceState::Loading] {
            let node = render(&state, Layout::Cards, Locale::En, retry());
            assert_eq!(node, DisplayNode::Loading { label: "Loading...".into() });
        }
    }

    #[test]
    fn test_failed_renders_error_panel_with_retry() {
        let action = retry();
        let state = ResourceState::Failed(FetchError::Http { status: 500 });
        let node = render(&state, Layout::Timeline, Locale::En, action);
        assert!(node.is_error());
        assert_eq!(node.retry_action(), Some(action));
        match node {
            DisplayNode::ErrorPanel { message, retry_label, .. } => {
                assert!(message.contains("500"));
                assert_eq!(retry_label, "Retry");
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_empty_results_render_no_content() {
        let state = ResourceState::Loaded(json!([]));
        let node = render(&state, Layout::Cards, Locale::Ru, retry());
        assert!(node.is_no_content());
        assert!(!node.is_error());
        assert!(!node.is_loading());
    }

    #[test]
    fn test_history_timeline() {
        let state = ResourceState::Loaded(json!([{"year": 1955, "title": "Founded"}]));
        let node = render(&state, Layout::Timeline, Locale::En, retry());
        match node {
            DisplayNode::Timeline(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].year, "1955");
                assert_eq!(entries[0].title, "Founded");
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_section_helpers_see_through() {
        let node = render_section("History", &ResourceState::Loading, Layout::Timeline, Locale::En, retry());
        assert!(node.is_loading());
    }

    #[test]
    fn test_unexpected_shapes_never_panic() {
        let shapes = [json!(42), json!("text"), json!([1, "two", null]), json!({"nested": {"a": [1]}})];
        for layout in [Layout::Timeline, Layout::Cards, Layout::Detail, Layout::Table] {
            for shape in &shapes {
                let state = ResourceState::Loaded(shape.clone());
                let node = render(&state, layout, Locale::Kg, retry());
                assert!(!node.is_error());
                let _ = render_text(&node);
            }
        }
    }
}
