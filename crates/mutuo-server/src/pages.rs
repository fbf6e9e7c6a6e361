//! Server-rendered pages.
//!
//! Both pages are embedded at compile time; the only dynamic piece is the
//! agent id injected into the widget element. There is no client build step.

use crate::AppState;
use axum::{extract::Extension, response::Html};
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../assets/index.html");
const WIDGET_HTML: &str = include_str!("../assets/widget.html");

fn render(template: &str, agent_id: &str) -> Html<String> {
    Html(template.replace("{{AGENT_ID}}", agent_id))
}

/// Handler for `GET /` — the interactive page: Q&A form, embedded widget,
/// transcript fetch and extraction controls.
pub async fn index_page_handler(Extension(state): Extension<Arc<AppState>>) -> Html<String> {
    render(INDEX_HTML, &state.agent_id)
}

/// Handler for `GET /widget` — the widget alone, nothing else.
pub async fn widget_page_handler(Extension(state): Extension<Arc<AppState>>) -> Html<String> {
    render(WIDGET_HTML, &state.agent_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_is_injected_into_both_pages() {
        let index = render(INDEX_HTML, "agent-abc");
        assert!(index.0.contains("agent-id=\"agent-abc\""));
        assert!(!index.0.contains("{{AGENT_ID}}"));

        let widget = render(WIDGET_HTML, "agent-abc");
        assert!(widget.0.contains("agent-id=\"agent-abc\""));
        assert!(widget.0.contains("convai-widget/index.js"));
    }
}
