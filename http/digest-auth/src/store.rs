use std::error::Error;
use std::sync::Arc;

pub type UserId = u64;

/// User as kept by the [`CredentialStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    /// `H(username:realm:password)`, see [`ResponseValidator::hash_password`]
    ///
    /// [`ResponseValidator::hash_password`]: crate::ResponseValidator::hash_password
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    /// Serialized per user settings, not interpreted here
    pub settings: String,
    pub level: u32,
}

/// Binding of a session id as seen by the [`SessionRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Unknown session id
    Absent,
    /// Valid session without a user
    Anonymous,
    /// Session bound to a user
    BoundTo(UserId),
}

impl SessionState {
    pub fn is_valid(&self) -> bool {
        !matches!(self, SessionState::Absent)
    }
}

/// Read-only access to users
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    async fn lookup_by_username(&self, username: &str) -> Result<Option<UserRecord>, Self::Error>;

    /// Resolve the user bound to the session `sid`
    async fn lookup_by_session_id(&self, sid: &str) -> Result<Option<UserRecord>, Self::Error>;
}

/// Server side session storage.
///
/// Registration and destruction must be idempotent, concurrent requests with the
/// same session id may race on them.
#[async_trait::async_trait]
pub trait SessionRegistry: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    async fn session_state(&self, sid: &str) -> Result<SessionState, Self::Error>;

    /// Bind the session `sid` to `user_id`, creating it if necessary
    async fn register(&self, user_id: UserId, sid: &str) -> Result<(), Self::Error>;

    async fn destroy(&self, sid: &str) -> Result<(), Self::Error>;

    /// Start or refresh the browser session.
    ///
    /// Returns `current` if it names a valid session, otherwise the id of a new
    /// anonymous session.
    async fn start_browser_session(&self, current: Option<&str>) -> Result<String, Self::Error>;
}

#[async_trait::async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    type Error = T::Error;

    async fn lookup_by_username(&self, username: &str) -> Result<Option<UserRecord>, Self::Error> {
        (**self).lookup_by_username(username).await
    }

    async fn lookup_by_session_id(&self, sid: &str) -> Result<Option<UserRecord>, Self::Error> {
        (**self).lookup_by_session_id(sid).await
    }
}

#[async_trait::async_trait]
impl<T: SessionRegistry + ?Sized> SessionRegistry for Arc<T> {
    type Error = T::Error;

    async fn session_state(&self, sid: &str) -> Result<SessionState, Self::Error> {
        (**self).session_state(sid).await
    }

    async fn register(&self, user_id: UserId, sid: &str) -> Result<(), Self::Error> {
        (**self).register(user_id, sid).await
    }

    async fn destroy(&self, sid: &str) -> Result<(), Self::Error> {
        (**self).destroy(sid).await
    }

    async fn start_browser_session(&self, current: Option<&str>) -> Result<String, Self::Error> {
        (**self).start_browser_session(current).await
    }
}
