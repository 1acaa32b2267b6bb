//! Request and response shapes of the remote `/posts` resource.

use serde::{Deserialize, Serialize};

/// Server-assigned post identifier.
pub type PostId = u64;

/// A post as returned by the remote API. Extra fields such as `userId` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub body: String,
}

/// Body of `PUT /posts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    pub title: String,
    pub body: String,
    pub id: PostId,
}

impl PostCreateRequest {
    pub fn into_update(self, id: PostId) -> PostUpdateRequest {
        PostUpdateRequest {
            title: self.title,
            body: self.body,
            id,
        }
    }
}
