use std::sync::Arc;

use tracing::{debug, error};

use crate::application::repos::PostsApi;
use crate::domain::posts::Post;

/// Best-effort warm start for the posts page.
#[derive(Clone)]
pub struct InitialLoader {
    api: Arc<dyn PostsApi>,
}

impl InitialLoader {
    pub fn new(api: Arc<dyn PostsApi>) -> Self {
        Self { api }
    }

    /// Fetch the full collection; any failure is logged and yields an empty one.
    pub async fn load(&self) -> Vec<Post> {
        match self.api.list_posts().await {
            Ok(posts) => {
                debug!(
                    target = "postdesk::loader",
                    count = posts.len(),
                    "loaded posts"
                );
                posts
            }
            Err(err) => {
                error!(
                    target = "postdesk::loader",
                    error = %err,
                    "failed to fetch posts; starting with an empty collection"
                );
                Vec::new()
            }
        }
    }
}
