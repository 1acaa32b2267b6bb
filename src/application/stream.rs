//! Server-driven datastar SSE responses for the posts page.

use std::convert::Infallible;

use async_stream::stream;
use axum::response::{
    IntoResponse, Response,
    sse::{Event, Sse},
};
use datastar::prelude::{ElementPatchMode, PatchElements};

/// Collects element patches and replays them as one SSE response.
pub struct StreamBuilder {
    events: Vec<Event>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an element patch targeting the supplied selector.
    pub fn push_patch(
        &mut self,
        html: String,
        selector: &str,
        mode: ElementPatchMode,
    ) -> &mut Self {
        let event = PatchElements::new(html)
            .selector(selector)
            .mode(mode)
            .write_as_axum_sse_event();
        self.events.push(event);
        self
    }

    /// Replace the element matched by `selector` wholesale.
    pub fn push_replace(&mut self, html: String, selector: &str) -> &mut Self {
        self.push_patch(html, selector, ElementPatchMode::Replace)
    }

    /// Hand the collected events to a caller that streams them progressively.
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn into_response(self) -> Response {
        let stream = stream! {
            for event in self.events {
                yield Ok::<Event, Infallible>(event);
            }
        };
        Sse::new(stream).into_response()
    }
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    #[test]
    fn responds_with_event_stream() {
        let mut stream = StreamBuilder::new();
        stream.push_replace("<div data-posts=\"panel\"></div>".to_string(), "[data-posts=\"panel\"]");

        let response = stream.into_response();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        assert_eq!(content_type, Some("text/event-stream"));
    }
}
