use crate::domain::posts::{Draft, Post, PostCollection, PostId};

/// Everything the posts page renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerState {
    pub posts: PostCollection,
    pub draft: Draft,
    pub editing: Option<PostId>,
    pub busy: bool,
    pub modal_open: bool,
}

impl ManagerState {
    pub fn seeded(posts: Vec<Post>) -> Self {
        Self {
            posts: PostCollection::new(posts),
            ..Self::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}

/// Result of a user action against the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote call succeeded and local state was reconciled.
    Completed,
    /// The draft failed validation; nothing was sent.
    Rejected,
    /// The remote call failed; the collection is untouched.
    Failed,
    /// Nothing to do, e.g. an update without an editing marker.
    Skipped,
}

/// Notification copy shown to the user.
pub mod messages {
    pub const MISSING_FIELDS: (&str, &str) =
        ("Missing fields", "Both title and body must be provided.");

    pub const ADD_SUCCESS: (&str, &str) = ("Post added successfully", "Your post has been added.");
    pub const ADD_FAILURE: (&str, &str) = (
        "Error adding post",
        "An error occurred while adding the post.",
    );

    pub const UPDATE_SUCCESS: (&str, &str) =
        ("Post updated successfully", "Your post has been updated.");
    pub const UPDATE_FAILURE: (&str, &str) = (
        "Error updating post",
        "An error occurred while updating the post.",
    );

    pub const DELETE_SUCCESS: (&str, &str) =
        ("Post deleted successfully", "The post has been removed.");
    pub const DELETE_FAILURE: (&str, &str) = (
        "Error deleting post",
        "An error occurred while deleting the post.",
    );

    pub const NOT_FOUND: (&str, &str) = ("Post not found", "The post is no longer available.");
}
