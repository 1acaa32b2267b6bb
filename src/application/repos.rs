//! Port describing the remote posts resource.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostCreateRequest, PostId, PostUpdateRequest};

#[derive(Debug, Error)]
pub enum PostsApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("invalid request url: {0}")]
    Url(String),
}

impl PostsApiError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// One call per method, one outbound request per call.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET /posts`, bypassing any intermediate cache.
    async fn list_posts(&self) -> Result<Vec<Post>, PostsApiError>;

    /// `POST /posts`.
    async fn create_post(&self, request: PostCreateRequest) -> Result<Post, PostsApiError>;

    /// `PUT /posts/{id}`.
    async fn update_post(&self, request: PostUpdateRequest) -> Result<Post, PostsApiError>;

    /// `DELETE /posts/{id}`.
    async fn delete_post(&self, id: PostId) -> Result<(), PostsApiError>;
}
