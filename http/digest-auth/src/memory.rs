use crate::store::{CredentialStore, SessionRegistry, SessionState, UserId, UserRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::time::{Duration, SystemTime};

/// Session kept by the [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub sid: String,
    pub user_id: Option<UserId>,
    pub created_at: SystemTime,
}

/// In-memory users and sessions, implementing both [`CredentialStore`] and [`SessionRegistry`].
///
/// Anonymous sessions older than the anonymous TTL (one hour by default) are
/// dropped whenever a new browser session is started.
pub struct MemoryStore {
    users: Mutex<HashMap<String, UserRecord>>,
    sessions: Mutex<HashMap<String, Session>>,
    anonymous_ttl: Duration,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            users: Mutex::default(),
            sessions: Mutex::default(),
            anonymous_ttl: Duration::from_secs(3600),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long an anonymous session is kept before it can be pruned
    pub fn with_anonymous_ttl(mut self, ttl: Duration) -> Self {
        self.anonymous_ttl = ttl;
        self
    }

    /// Add or replace a user, keyed by its username
    pub fn add_user(&self, user: UserRecord) {
        self.users.lock().insert(user.username.clone(), user);
    }

    pub fn session(&self, sid: &str) -> Option<Session> {
        self.sessions.lock().get(sid).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryStore {
    type Error = Infallible;

    async fn lookup_by_username(&self, username: &str) -> Result<Option<UserRecord>, Infallible> {
        Ok(self.users.lock().get(username).cloned())
    }

    async fn lookup_by_session_id(&self, sid: &str) -> Result<Option<UserRecord>, Infallible> {
        let Some(user_id) = self.sessions.lock().get(sid).and_then(|s| s.user_id) else {
            return Ok(None);
        };

        let users = self.users.lock();

        Ok(users.values().find(|user| user.id == user_id).cloned())
    }
}

#[async_trait::async_trait]
impl SessionRegistry for MemoryStore {
    type Error = Infallible;

    async fn session_state(&self, sid: &str) -> Result<SessionState, Infallible> {
        let state = match self.sessions.lock().get(sid) {
            None => SessionState::Absent,
            Some(Session { user_id: None, .. }) => SessionState::Anonymous,
            Some(Session {
                user_id: Some(id), ..
            }) => SessionState::BoundTo(*id),
        };

        Ok(state)
    }

    async fn register(&self, user_id: UserId, sid: &str) -> Result<(), Infallible> {
        self.sessions
            .lock()
            .entry(sid.to_owned())
            .or_insert_with(|| Session {
                sid: sid.to_owned(),
                user_id: None,
                created_at: SystemTime::now(),
            })
            .user_id = Some(user_id);

        Ok(())
    }

    async fn destroy(&self, sid: &str) -> Result<(), Infallible> {
        self.sessions.lock().remove(sid);

        Ok(())
    }

    async fn start_browser_session(&self, current: Option<&str>) -> Result<String, Infallible> {
        let mut sessions = self.sessions.lock();
        let now = SystemTime::now();

        let before = sessions.len();
        sessions.retain(|_, session| {
            session.user_id.is_some()
                || now
                    .duration_since(session.created_at)
                    .unwrap_or_default()
                    < self.anonymous_ttl
        });

        if sessions.len() < before {
            log::debug!("pruned {} expired anonymous sessions", before - sessions.len());
        }

        if let Some(sid) = current.filter(|sid| sessions.contains_key(*sid)) {
            return Ok(sid.to_owned());
        }

        let sid = uuid::Uuid::new_v4().simple().to_string();

        sessions.insert(
            sid.clone(),
            Session {
                sid: sid.clone(),
                user_id: None,
                created_at: now,
            },
        );

        Ok(sid)
    }
}
