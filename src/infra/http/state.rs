use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::application::{loader::InitialLoader, repos::PostsApi};

use super::sessions::{DEFAULT_SESSION_CAPACITY, SessionStore};

#[derive(Clone)]
pub struct HttpState {
    pub api: Arc<dyn PostsApi>,
    pub loader: Arc<InitialLoader>,
    pub sessions: Arc<SessionStore>,
}

impl HttpState {
    pub fn new(api: Arc<dyn PostsApi>) -> Self {
        Self::with_session_capacity(api, DEFAULT_SESSION_CAPACITY)
    }

    pub fn with_session_capacity(api: Arc<dyn PostsApi>, capacity: NonZeroUsize) -> Self {
        Self {
            loader: Arc::new(InitialLoader::new(api.clone())),
            api,
            sessions: Arc::new(SessionStore::new(capacity)),
        }
    }
}
