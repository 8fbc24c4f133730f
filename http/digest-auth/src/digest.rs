use crate::nonce::{NonceGenerator, NonceStatus};
use crate::response::ResponseValidator;
use crate::store::{CredentialStore, SessionRegistry, SessionState, UserRecord};
use crate::{AuthResult, Challenge, DigestConfig, Error, IncomingRequest, Rejection, Result};
use auth_types::{DigestChallenge, DigestCredentials, QopOption};
use std::fmt;
use std::time::SystemTime;

type Clock = Box<dyn Fn() -> SystemTime + Send + Sync>;

/// Authenticates requests using HTTP Digest authentication and binds
/// authenticated users to browser sessions.
///
/// Holds no per request state and can be shared between all requests.
pub struct DigestAuthenticator<C, S> {
    config: DigestConfig,
    nonces: NonceGenerator,
    validator: ResponseValidator,

    credentials: C,
    sessions: S,

    clock: Clock,
}

impl<C, S> fmt::Debug for DigestAuthenticator<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAuthenticator")
            .field("realm", &self.config.realm)
            .field("algorithm", &self.config.algorithm)
            .finish_non_exhaustive()
    }
}

impl<C, S> DigestAuthenticator<C, S>
where
    C: CredentialStore,
    S: SessionRegistry,
{
    /// Fails if the configured algorithm is not supported
    pub fn new(config: DigestConfig, credentials: C, sessions: S) -> Result<Self> {
        let validator = ResponseValidator::new(&config.algorithm)?;
        let nonces = NonceGenerator::new(&config)?;

        Ok(Self {
            config,
            nonces,
            validator,
            credentials,
            sessions,
            clock: Box::new(SystemTime::now),
        })
    }

    /// Replace the clock used to generate and verify nonces
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> SystemTime + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    pub fn nonces(&self) -> &NonceGenerator {
        &self.nonces
    }

    pub fn validator(&self) -> &ResponseValidator {
        &self.validator
    }

    /// Require the request to be authenticated.
    ///
    /// Any result other than [`AuthResult::Authenticated`] is a terminal challenge.
    pub async fn enforce(&self, request: &mut IncomingRequest) -> Result<AuthResult> {
        if let Some(outcome) = &request.outcome {
            return Ok(outcome.clone());
        }

        let outcome = self.authenticate(request).await?;
        request.outcome = Some(outcome.clone());

        Ok(outcome)
    }

    /// Like [`enforce`](Self::enforce), but only if the request carries a valid
    /// session cookie. Otherwise returns [`AuthResult::Unauthenticated`] without
    /// challenging the client.
    pub async fn enforce_lazy(&self, request: &mut IncomingRequest) -> Result<AuthResult> {
        if let Some(outcome) = &request.outcome {
            return Ok(outcome.clone());
        }

        let has_valid_session = match request.session() {
            Some(sid) => self.session_state(sid).await?.is_valid(),
            None => false,
        };

        if has_valid_session {
            return self.enforce(request).await;
        }

        request.outcome = Some(AuthResult::Unauthenticated);

        Ok(AuthResult::Unauthenticated)
    }

    /// Log out the user bound to the request's session.
    ///
    /// The client must answer with the `logout` pseudo credentials (empty password).
    /// Failures issue a non terminal challenge.
    pub async fn enforce_logout(&self, request: &mut IncomingRequest) -> Result<AuthResult> {
        if let Some(outcome) = &request.outcome {
            return Ok(outcome.clone());
        }

        let outcome = self.logout(request).await?;
        request.outcome = Some(outcome.clone());

        Ok(outcome)
    }

    /// User bound to the request's session, without any digest exchange
    pub async fn current_user(&self, request: &IncomingRequest) -> Result<Option<UserRecord>> {
        let Some(sid) = request.session() else {
            return Ok(None);
        };

        self.credentials
            .lookup_by_session_id(sid)
            .await
            .map_err(|e| Error::CredentialStore(Box::new(e)))
    }

    async fn authenticate(&self, request: &IncomingRequest) -> Result<AuthResult> {
        let credentials = match request.credentials() {
            Ok(credentials) => credentials,
            Err(e) => {
                log::debug!("failed to parse authorization header, {}", e);
                return self
                    .challenge(request, Some(Rejection::MalformedChallenge), false, true)
                    .await;
            }
        };

        // A response is only accepted together with the session its challenge was issued for
        let Some(sid) = request.session() else {
            return self
                .challenge(request, Some(Rejection::MissingSession), false, true)
                .await;
        };

        let session = self.session_state(sid).await?;

        match self.verify(request, sid, &credentials, session).await? {
            Ok(user) => self.bind_session(request, sid, user, session).await,
            Err(rejection) => {
                let stale = matches!(rejection, Rejection::StaleSession | Rejection::StaleNonce);

                self.challenge(request, Some(rejection), stale, true).await
            }
        }
    }

    /// Check the credentials against the stored password hash, the session bound
    /// opaque value and the nonce's time window
    async fn verify(
        &self,
        request: &IncomingRequest,
        sid: &str,
        credentials: &DigestCredentials,
        session: SessionState,
    ) -> Result<Result<UserRecord, Rejection>> {
        log::debug!(
            "digest response of '{}' from '{}', nonce count {:?}",
            credentials.username,
            request.remote_addr,
            credentials.nonce_count()
        );

        let user = self
            .credentials
            .lookup_by_username(&credentials.username)
            .await
            .map_err(|e| Error::CredentialStore(Box::new(e)))?;

        // Unknown users are checked against an empty hash, but can never pass
        let password_hash = user.as_ref().map_or("", |user| user.password_hash.as_str());
        let valid_response =
            self.validator
                .validate(password_hash, request.method.as_str(), credentials);

        // A failure within a known session lets the client silently retry
        let reject = |rejection| {
            if session.is_valid() {
                Rejection::StaleSession
            } else {
                rejection
            }
        };

        let Some(user) = user else {
            return Ok(Err(reject(Rejection::UnknownUser)));
        };

        if !valid_response || *credentials.opaque != *self.nonces.opaque(sid) {
            return Ok(Err(reject(Rejection::InvalidResponse)));
        }

        match self
            .nonces
            .verify(&credentials.nonce, (self.clock)(), request.remote_addr)
        {
            NonceStatus::Fresh => Ok(Ok(user)),
            NonceStatus::Stale => Ok(Err(Rejection::StaleNonce)),
            NonceStatus::Invalid => Ok(Err(reject(Rejection::InvalidResponse))),
        }
    }

    async fn bind_session(
        &self,
        request: &IncomingRequest,
        sid: &str,
        user: UserRecord,
        session: SessionState,
    ) -> Result<AuthResult> {
        let sid = match session {
            SessionState::Anonymous => {
                self.sessions
                    .register(user.id, sid)
                    .await
                    .map_err(|e| Error::SessionRegistry(Box::new(e)))?;

                log::info!(
                    "'{}' has logged in from '{}'",
                    user.username,
                    request.remote_addr
                );

                self.start_browser_session(Some(sid)).await?
            }
            SessionState::BoundTo(user_id) if user_id == user.id => {
                self.start_browser_session(Some(sid)).await?
            }
            SessionState::BoundTo(_) | SessionState::Absent => {
                log::warn!(
                    "'{}' authenticated from '{}' with a foreign session, destroying it",
                    user.username,
                    request.remote_addr
                );

                self.destroy_session(sid).await?;

                return self
                    .challenge(request, Some(Rejection::ForeignSession), false, true)
                    .await;
            }
        };

        Ok(AuthResult::Authenticated { user, session: sid })
    }

    async fn logout(&self, request: &IncomingRequest) -> Result<AuthResult> {
        let credentials = match request.credentials() {
            Ok(credentials) => credentials,
            Err(e) => {
                log::debug!("failed to parse logout authorization header, {}", e);
                return self
                    .challenge(request, Some(Rejection::MalformedChallenge), false, false)
                    .await;
            }
        };

        let logout_hash = self.validator.logout_hash(&self.config.realm);

        if !self
            .validator
            .validate(&logout_hash, request.method.as_str(), &credentials)
        {
            return self
                .challenge(
                    request,
                    Some(Rejection::LogoutCredentialInvalid),
                    false,
                    false,
                )
                .await;
        }

        if let Some(sid) = request.session() {
            if let SessionState::BoundTo(user_id) = self.session_state(sid).await? {
                let username = match self.current_user(request).await? {
                    Some(user) => user.username,
                    None => user_id.to_string(),
                };

                self.destroy_session(sid).await?;

                log::info!("'{}' has logged out from '{}'", username, request.remote_addr);

                return Ok(AuthResult::LoggedOut);
            }
        }

        // Nothing to log out of
        self.challenge(request, None, false, false).await
    }

    async fn challenge(
        &self,
        request: &IncomingRequest,
        reason: Option<Rejection>,
        stale: bool,
        terminal: bool,
    ) -> Result<AuthResult> {
        if let Some(reason) = reason {
            log::debug!("challenging request from '{}': {}", request.remote_addr, reason);
        }

        let session = self.start_browser_session(request.session()).await?;

        let header = DigestChallenge {
            realm: self.config.realm.clone().into(),
            domain: self.config.domain.clone().into(),
            qop: QopOption::Auth,
            algorithm: self.config.algorithm.clone(),
            nonce: self
                .nonces
                .nonce_at((self.clock)(), request.remote_addr)
                .into(),
            opaque: self.nonces.opaque(&session).into(),
            stale,
        };

        Ok(AuthResult::ChallengeIssued(Challenge {
            header,
            session,
            reason,
            terminal,
        }))
    }

    async fn session_state(&self, sid: &str) -> Result<SessionState> {
        self.sessions
            .session_state(sid)
            .await
            .map_err(|e| Error::SessionRegistry(Box::new(e)))
    }

    async fn start_browser_session(&self, current: Option<&str>) -> Result<String> {
        self.sessions
            .start_browser_session(current)
            .await
            .map_err(|e| Error::SessionRegistry(Box::new(e)))
    }

    async fn destroy_session(&self, sid: &str) -> Result<()> {
        self.sessions
            .destroy(sid)
            .await
            .map_err(|e| Error::SessionRegistry(Box::new(e)))
    }
}
