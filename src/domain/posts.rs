//! Posts held in memory by the front end: the draft behind the form and the
//! ordered collection mirrored from the remote API.

pub use postdesk_api_types::{Post, PostCreateRequest, PostId, PostUpdateRequest};

use super::error::DomainError;

/// Unsaved title/body pair backing the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub body: String,
}

impl Draft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self::new(post.title.clone(), post.body.clone())
    }

    /// Title and body must each contain a non-whitespace character.
    ///
    /// The payload keeps the text as typed; trimming only decides presence.
    pub fn validate(&self) -> Result<PostCreateRequest, DomainError> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.body.trim().is_empty() {
            missing.push("body");
        }
        if !missing.is_empty() {
            return Err(DomainError::missing_fields(missing));
        }

        Ok(PostCreateRequest {
            title: self.title.clone(),
            body: self.body.clone(),
        })
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.body.clear();
    }
}

/// Ordered in-memory copy of the remote collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn as_slice(&self) -> &[Post] {
        &self.posts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    pub fn append(&mut self, post: Post) {
        self.posts.push(post);
    }

    /// Swap every entry sharing `post.id` for `post`. Returns whether anything matched.
    pub fn replace(&mut self, post: Post) -> bool {
        let mut replaced = false;
        for entry in self.posts.iter_mut().filter(|entry| entry.id == post.id) {
            *entry = post.clone();
            replaced = true;
        }
        replaced
    }

    /// Drop every entry with `id`, keeping the rest in order. Returns whether anything was removed.
    pub fn remove(&mut self, id: PostId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        self.posts.len() != before
    }
}

impl From<Vec<Post>> for PostCollection {
    fn from(posts: Vec<Post>) -> Self {
        Self::new(posts)
    }
}

impl<'a> IntoIterator for &'a PostCollection {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
