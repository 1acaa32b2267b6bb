//! Per-page-load state. Each `GET /` opens a session with its own manager.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::{
    notify::NoticeOutbox, posts::PostManager, repos::PostsApi,
};
use crate::domain::posts::Post;

pub type SessionId = Uuid;

pub const DEFAULT_SESSION_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

const SOURCE: &str = "infra::http::sessions";

/// The manager and notice outbox behind one rendered page.
pub struct PageSession {
    /// Held for the whole of each operation, so a page has at most one remote call in flight.
    pub manager: Arc<AsyncMutex<PostManager>>,
    pub notices: Arc<NoticeOutbox>,
}

impl PageSession {
    fn new(api: Arc<dyn PostsApi>, posts: Vec<Post>) -> Self {
        let notices = Arc::new(NoticeOutbox::new());
        let manager = PostManager::new(api, notices.clone(), posts);

        Self {
            manager: Arc::new(AsyncMutex::new(manager)),
            notices,
        }
    }
}

/// Least recently used sessions are evicted once `capacity` is reached.
pub struct SessionStore {
    sessions: Mutex<LruCache<SessionId, Arc<PageSession>>>,
}

impl SessionStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn open(&self, api: Arc<dyn PostsApi>, posts: Vec<Post>) -> (SessionId, Arc<PageSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(PageSession::new(api, posts));

        if let Some((evicted, _)) = self.lock("open").push(id, session.clone()) {
            debug!(target = "postdesk::sessions", session = %evicted, "evicted page session");
        }
        (id, session)
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<PageSession>> {
        self.lock("get").get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, LruCache<SessionId, Arc<PageSession>>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    target_module = SOURCE,
                    lock_kind = "mutex",
                    result = "poisoned_recovered",
                    "Recovered from poisoned session lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_CAPACITY)
    }
}
