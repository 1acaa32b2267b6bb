use std::{convert::Infallible, sync::Arc};

use async_stream::stream;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::{
    application::{
        error::HttpError,
        notify::Notice,
        posts::{ManagerState, Outcome},
        stream::StreamBuilder,
    },
    domain::posts::{Draft, PostId},
    presentation::{
        posts::{
            PostModalTemplate, PostModalView, PostsPageTemplate, PostsPanelTemplate,
            PostsPanelView, ToastStackTemplate, toast_items,
        },
        views::{render_fragment, render_template_response},
    },
};

use super::selectors::{POST_MODAL, POSTS_PANEL, TOAST_STACK};
use super::sessions::{PageSession, SessionId};
use super::state::HttpState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct DraftForm {
    title: String,
    body: String,
}

/// Which fragments of the page a response should re-render.
#[derive(Clone, Copy)]
struct Patches {
    panel: bool,
    modal: bool,
}

impl Patches {
    const MODAL: Self = Self {
        panel: false,
        modal: true,
    };
    const PANEL: Self = Self {
        panel: true,
        modal: false,
    };
    const ALL: Self = Self {
        panel: true,
        modal: true,
    };
}

/// Every page load starts a fresh session seeded from the remote collection.
pub(super) async fn index(State(state): State<HttpState>) -> Response {
    let posts = state.loader.load().await;
    let (session_id, session) = state.sessions.open(state.api.clone(), posts);
    debug!(target = "postdesk::http::posts", session = %session_id, "opened page session");

    let manager = session.manager.lock().await;
    render_template_response(
        PostsPageTemplate::new(manager.state(), session_id, &[]),
        StatusCode::OK,
    )
}

pub(super) async fn begin_create(
    State(state): State<HttpState>,
    Path(session_id): Path<SessionId>,
) -> Response {
    let session = match find_session(&state, session_id) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let mut manager = session.manager.lock().await;
    manager.begin_create();
    respond(manager.state(), session_id, session.notices.drain(), Patches::MODAL)
}

pub(super) async fn begin_edit(
    State(state): State<HttpState>,
    Path((session_id, id)): Path<(SessionId, PostId)>,
) -> Response {
    let session = match find_session(&state, session_id) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let mut manager = session.manager.lock().await;
    if !manager.begin_edit_by_id(id) {
        debug!(target = "postdesk::http::posts", id, "edit requested for unknown post");
    }
    respond(manager.state(), session_id, session.notices.drain(), Patches::MODAL)
}

pub(super) async fn cancel_edit(
    State(state): State<HttpState>,
    Path(session_id): Path<SessionId>,
) -> Response {
    let session = match find_session(&state, session_id) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let mut manager = session.manager.lock().await;
    manager.cancel_edit();
    respond(manager.state(), session_id, session.notices.drain(), Patches::MODAL)
}

pub(super) async fn close_modal(
    State(state): State<HttpState>,
    Path(session_id): Path<SessionId>,
) -> Response {
    let session = match find_session(&state, session_id) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let mut manager = session.manager.lock().await;
    manager.close_modal();
    respond(manager.state(), session_id, session.notices.drain(), Patches::MODAL)
}

/// Streams a busy render before the remote call and the reconciled page after it.
pub(super) async fn submit(
    State(state): State<HttpState>,
    Path(session_id): Path<SessionId>,
    Form(form): Form<DraftForm>,
) -> Response {
    let session = match find_session(&state, session_id) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let events = stream! {
        let mut manager = session.manager.clone().lock_owned().await;
        manager.set_draft(Draft::new(form.title, form.body));

        let sent = match manager.start_submit() {
            Ok(in_flight) => {
                for event in patch_events(in_flight.state(), session_id, &[], Patches::ALL) {
                    yield Ok::<Event, Infallible>(event);
                }
                in_flight.complete().await
            }
            Err(outcome) => outcome,
        };

        // A rejected draft keeps the modal open with the user's input intact.
        let patches = match sent {
            Outcome::Rejected | Outcome::Skipped => Patches::MODAL,
            Outcome::Completed | Outcome::Failed => Patches::ALL,
        };
        let notices = session.notices.drain();
        for event in patch_events(manager.state(), session_id, &notices, patches) {
            yield Ok::<Event, Infallible>(event);
        }
    };

    Sse::new(events).into_response()
}

pub(super) async fn delete(
    State(state): State<HttpState>,
    Path((session_id, id)): Path<(SessionId, PostId)>,
) -> Response {
    let session = match find_session(&state, session_id) {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    let events = stream! {
        let mut manager = session.manager.clone().lock_owned().await;

        let in_flight = manager.start_delete(id);
        for event in patch_events(in_flight.state(), session_id, &[], Patches::PANEL) {
            yield Ok::<Event, Infallible>(event);
        }
        in_flight.complete().await;

        let notices = session.notices.drain();
        for event in patch_events(manager.state(), session_id, &notices, Patches::PANEL) {
            yield Ok::<Event, Infallible>(event);
        }
    };

    Sse::new(events).into_response()
}

pub(super) async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

fn find_session(state: &HttpState, session_id: SessionId) -> Result<Arc<PageSession>, HttpError> {
    state.sessions.get(&session_id).ok_or_else(|| {
        HttpError::new(
            "infra::http::posts::find_session",
            StatusCode::GONE,
            "This page has expired; reload to continue",
            format!("unknown page session `{session_id}`"),
        )
    })
}

fn respond(
    state: &ManagerState,
    session_id: SessionId,
    notices: Vec<Notice>,
    patches: Patches,
) -> Response {
    match build_stream(state, session_id, &notices, patches) {
        Ok(stream) => stream.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Events for a mid-stream render, where the response status is already sent.
fn patch_events(
    state: &ManagerState,
    session_id: SessionId,
    notices: &[Notice],
    patches: Patches,
) -> Vec<Event> {
    match build_stream(state, session_id, notices, patches) {
        Ok(stream) => stream.into_events(),
        Err(err) => {
            error!(target = "postdesk::http::posts", error = ?err, "failed to render patches");
            Vec::new()
        }
    }
}

fn build_stream(
    state: &ManagerState,
    session_id: SessionId,
    notices: &[Notice],
    patches: Patches,
) -> Result<StreamBuilder, HttpError> {
    let mut stream = StreamBuilder::new();

    if patches.panel {
        let html = render_fragment(
            "infra::http::posts::panel",
            PostsPanelTemplate {
                panel: PostsPanelView::from_state(state, session_id),
            },
        )?;
        stream.push_replace(html, POSTS_PANEL);
    }

    if patches.modal {
        let html = render_fragment(
            "infra::http::posts::modal",
            PostModalTemplate {
                modal: PostModalView::from_state(state, session_id),
            },
        )?;
        stream.push_replace(html, POST_MODAL);
    }

    push_toasts(&mut stream, notices)?;
    Ok(stream)
}

fn push_toasts(stream: &mut StreamBuilder, notices: &[Notice]) -> Result<(), HttpError> {
    if notices.is_empty() {
        return Ok(());
    }

    let html = render_fragment(
        "infra::http::posts::push_toasts",
        ToastStackTemplate {
            toasts: toast_items(notices),
        },
    )?;
    stream.push_replace(html, TOAST_STACK);
    Ok(())
}
