use std::sync::Arc;

use crate::application::notify::{Notice, Notifier};
use crate::application::repos::PostsApi;
use crate::domain::posts::{Draft, Post, PostId};

use super::types::{ManagerState, messages};

/// Single owner of the posts page state. All mutations go through its methods.
pub struct PostManager {
    pub(crate) api: Arc<dyn PostsApi>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) state: ManagerState,
}

impl PostManager {
    pub fn new(api: Arc<dyn PostsApi>, notifier: Arc<dyn Notifier>, initial: Vec<Post>) -> Self {
        Self {
            api,
            notifier,
            state: ManagerState::seeded(initial),
        }
    }

    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    /// Discard everything and start over from a fresh load.
    pub fn reseed(&mut self, posts: Vec<Post>) {
        self.state = ManagerState::seeded(posts);
    }

    pub fn begin_create(&mut self) {
        self.cancel_edit();
        self.state.modal_open = true;
    }

    pub fn begin_edit(&mut self, post: &Post) {
        self.state.editing = Some(post.id);
        self.state.draft = Draft::from_post(post);
        self.state.modal_open = true;
    }

    /// Returns `false` and leaves state alone when `id` is not in the collection.
    pub fn begin_edit_by_id(&mut self, id: PostId) -> bool {
        match self.state.posts.get(id).cloned() {
            Some(post) => {
                self.begin_edit(&post);
                true
            }
            None => {
                self.report_error(messages::NOT_FOUND);
                false
            }
        }
    }

    /// Reset the form to create mode. The modal stays as it is.
    pub fn cancel_edit(&mut self) {
        self.state.draft.clear();
        self.state.editing = None;
    }

    pub fn close_modal(&mut self) {
        self.state.modal_open = false;
    }

    pub fn set_draft(&mut self, draft: Draft) {
        self.state.draft = draft;
    }

    pub(crate) fn report_success(&self, (message, description): (&str, &str)) {
        self.notifier.report(Notice::success(message, description));
    }

    pub(crate) fn report_error(&self, (message, description): (&str, &str)) {
        self.notifier.report(Notice::error(message, description));
    }
}
