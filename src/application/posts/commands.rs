use std::sync::Arc;

use tracing::{info, warn};

use crate::application::repos::PostsApiError;
use crate::domain::posts::{Post, PostCreateRequest, PostId, PostUpdateRequest};

use super::service::PostManager;
use super::types::{ManagerState, Outcome, messages};

/// The single remote call an operation commits to once its input is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCall {
    Create(PostCreateRequest),
    Update(PostUpdateRequest),
    Delete(PostId),
}

/// An operation between its request going out and its reply being applied.
///
/// `busy` is set while this exists. Dropping it without [`InFlight::complete`]
/// (e.g. the caller's future is cancelled) clears `busy` and leaves the
/// collection as it was.
pub struct InFlight<'a> {
    manager: &'a mut PostManager,
    call: PendingCall,
}

impl InFlight<'_> {
    pub fn state(&self) -> &ManagerState {
        &self.manager.state
    }

    pub fn call(&self) -> &PendingCall {
        &self.call
    }

    /// Send the request and reconcile local state with the reply.
    pub async fn complete(mut self) -> Outcome {
        let api = Arc::clone(&self.manager.api);
        match self.call.clone() {
            PendingCall::Create(request) => {
                let result = api.create_post(request).await;
                self.manager.finish_add(result)
            }
            PendingCall::Update(request) => {
                let id = request.id;
                let result = api.update_post(request).await;
                self.manager.finish_update(id, result)
            }
            PendingCall::Delete(id) => {
                let result = api.delete_post(id).await;
                self.manager.finish_delete(id, result)
            }
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.manager.state.busy = false;
    }
}

impl PostManager {
    /// Update when an editing marker is set, add otherwise.
    pub async fn submit(&mut self) -> Outcome {
        match self.start_submit() {
            Ok(in_flight) => in_flight.complete().await,
            Err(outcome) => outcome,
        }
    }

    pub async fn add(&mut self) -> Outcome {
        match self.start_add() {
            Ok(in_flight) => in_flight.complete().await,
            Err(outcome) => outcome,
        }
    }

    pub async fn update(&mut self) -> Outcome {
        match self.start_update() {
            Ok(in_flight) => in_flight.complete().await,
            Err(outcome) => outcome,
        }
    }

    /// Leaves the modal untouched; delete is driven from the table.
    pub async fn delete(&mut self, id: PostId) -> Outcome {
        self.start_delete(id).complete().await
    }

    /// Validate and mark busy without sending anything yet.
    ///
    /// `Err` carries the outcome of an operation that ends before any request.
    pub fn start_submit(&mut self) -> Result<InFlight<'_>, Outcome> {
        if self.state.editing.is_some() {
            self.start_update()
        } else {
            self.start_add()
        }
    }

    pub fn start_add(&mut self) -> Result<InFlight<'_>, Outcome> {
        let request = self.validated_draft(None)?;
        Ok(self.dispatch(PendingCall::Create(request)))
    }

    pub fn start_update(&mut self) -> Result<InFlight<'_>, Outcome> {
        let Some(id) = self.state.editing else {
            return Err(Outcome::Skipped);
        };
        let request = self.validated_draft(Some(id))?.into_update(id);
        Ok(self.dispatch(PendingCall::Update(request)))
    }

    pub fn start_delete(&mut self, id: PostId) -> InFlight<'_> {
        self.dispatch(PendingCall::Delete(id))
    }

    fn validated_draft(&self, editing: Option<PostId>) -> Result<PostCreateRequest, Outcome> {
        self.state.draft.validate().map_err(|err| {
            info!(target = "postdesk::posts", id = ?editing, error = %err, "draft rejected");
            self.report_error(messages::MISSING_FIELDS);
            Outcome::Rejected
        })
    }

    fn dispatch(&mut self, call: PendingCall) -> InFlight<'_> {
        self.state.busy = true;
        InFlight {
            manager: self,
            call,
        }
    }

    fn finish_add(&mut self, result: Result<Post, PostsApiError>) -> Outcome {
        self.state.busy = false;
        self.state.modal_open = false;

        match result {
            Ok(post) => {
                info!(target = "postdesk::posts", id = post.id, "post added");
                self.state.posts.append(post);
                self.state.draft.clear();
                self.report_success(messages::ADD_SUCCESS);
                Outcome::Completed
            }
            Err(err) => {
                warn!(target = "postdesk::posts", error = %err, "failed to add post");
                self.report_error(messages::ADD_FAILURE);
                Outcome::Failed
            }
        }
    }

    fn finish_update(&mut self, id: PostId, result: Result<Post, PostsApiError>) -> Outcome {
        self.state.busy = false;
        self.state.modal_open = false;

        match result {
            Ok(post) => {
                info!(target = "postdesk::posts", id = post.id, "post updated");
                self.state.posts.replace(post);
                self.state.draft.clear();
                self.state.editing = None;
                self.report_success(messages::UPDATE_SUCCESS);
                Outcome::Completed
            }
            Err(err) => {
                warn!(target = "postdesk::posts", id, error = %err, "failed to update post");
                self.report_error(messages::UPDATE_FAILURE);
                Outcome::Failed
            }
        }
    }

    fn finish_delete(&mut self, id: PostId, result: Result<(), PostsApiError>) -> Outcome {
        self.state.busy = false;

        match result {
            Ok(()) => {
                info!(target = "postdesk::posts", id, "post deleted");
                self.state.posts.remove(id);
                self.report_success(messages::DELETE_SUCCESS);
                Outcome::Completed
            }
            Err(err) => {
                warn!(target = "postdesk::posts", id, error = %err, "failed to delete post");
                self.report_error(messages::DELETE_FAILURE);
                Outcome::Failed
            }
        }
    }
}
