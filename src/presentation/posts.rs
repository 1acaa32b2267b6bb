//! View models and templates for the posts page.

use askama::Template;
use uuid::Uuid;

use crate::application::notify::Notice;
use crate::application::posts::ManagerState;

const TOAST_TTL_MS: u64 = 6000;

/// Prefix of every action URL rendered for the page session.
pub fn actions_path(session: Uuid) -> String {
    format!("/sessions/{session}/posts")
}

#[derive(Clone)]
pub struct PostRowView {
    pub id: u64,
    pub position: usize,
    pub title: String,
    pub body: String,
}

#[derive(Clone)]
pub struct PostsPanelView {
    pub actions: String,
    pub rows: Vec<PostRowView>,
    pub busy: bool,
}

impl PostsPanelView {
    pub fn from_state(state: &ManagerState, session: Uuid) -> Self {
        let rows = state
            .posts
            .iter()
            .enumerate()
            .map(|(index, post)| PostRowView {
                id: post.id,
                position: index + 1,
                title: post.title.clone(),
                body: post.body.clone(),
            })
            .collect();

        Self {
            actions: actions_path(session),
            rows,
            busy: state.busy,
        }
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[derive(Clone)]
pub struct PostModalView {
    pub actions: String,
    pub open: bool,
    pub editing: bool,
    pub busy: bool,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub title: String,
    pub body: String,
}

impl PostModalView {
    pub fn from_state(state: &ManagerState, session: Uuid) -> Self {
        let editing = state.is_editing();
        let (heading, submit_label) = if editing {
            ("Edit Post", "Update Post")
        } else {
            ("Add New Post", "Add Post")
        };

        Self {
            actions: actions_path(session),
            open: state.modal_open,
            editing,
            busy: state.busy,
            heading,
            submit_label,
            title: state.draft.title.clone(),
            body: state.draft.body.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ToastItemView {
    pub id: String,
    pub kind: &'static str,
    pub message: String,
    pub description: String,
    pub ttl_ms: u64,
}

impl From<&Notice> for ToastItemView {
    fn from(notice: &Notice) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: notice.kind.as_str(),
            message: notice.message.clone(),
            description: notice.description.clone(),
            ttl_ms: TOAST_TTL_MS,
        }
    }
}

pub fn toast_items(notices: &[Notice]) -> Vec<ToastItemView> {
    notices.iter().map(ToastItemView::from).collect()
}

#[derive(Template)]
#[template(path = "posts/page.html")]
pub struct PostsPageTemplate {
    pub session: String,
    pub actions: String,
    pub panel: PostsPanelView,
    pub modal: PostModalView,
    pub toasts: Vec<ToastItemView>,
}

impl PostsPageTemplate {
    pub fn new(state: &ManagerState, session: Uuid, notices: &[Notice]) -> Self {
        Self {
            session: session.to_string(),
            actions: actions_path(session),
            panel: PostsPanelView::from_state(state, session),
            modal: PostModalView::from_state(state, session),
            toasts: toast_items(notices),
        }
    }
}

#[derive(Template)]
#[template(path = "posts/panel.html")]
pub struct PostsPanelTemplate {
    pub panel: PostsPanelView,
}

#[derive(Template)]
#[template(path = "posts/modal.html")]
pub struct PostModalTemplate {
    pub modal: PostModalView,
}

#[derive(Template)]
#[template(path = "posts/toast_stack.html")]
pub struct ToastStackTemplate {
    pub toasts: Vec<ToastItemView>,
}
