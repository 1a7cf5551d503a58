use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};

use super::storage::CredentialStorage;

/// The credential pair issued by the token endpoint. Opaque strings;
/// durable storage is the source of truth across restarts.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// The locally-known signed-in user. Built from the submitted username at
/// login time; the token endpoint does not echo back profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Session lifecycle states. `Loading` only exists between construction
/// and `initialize()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Authenticated(Identity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    AuthenticationFailed,
    RegistrationFailed,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login failed. Check credentials.")]
    AuthenticationFailed(#[source] ApiError),

    #[error("Signup failed. Username might be taken.")]
    RegistrationFailed(#[source] ApiError),
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::AuthenticationFailed(_) => AuthErrorKind::AuthenticationFailed,
            AuthError::RegistrationFailed(_) => AuthErrorKind::RegistrationFailed,
        }
    }
}

/// The last auth failure, kept for the login/signup form to render inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    pub kind: AuthErrorKind,
    pub message: String,
}

/// Owns the credential pair and identity, mediates all session state
/// transitions, and is the single writer of durable credential storage.
pub struct SessionStore {
    storage: CredentialStorage,
    state: SessionState,
    last_error: Option<AuthFailure>,
}

impl SessionStore {
    pub fn new(storage: CredentialStorage) -> Self {
        Self {
            storage,
            state: SessionState::Loading,
            last_error: None,
        }
    }

    /// Rehydrate a prior session from durable storage. Runs once per
    /// process start and always leaves the store in `Unauthenticated` or
    /// `Authenticated`. The stored token is not validated against the
    /// backend; an expired token surfaces later as a rejected request.
    pub fn initialize(&mut self) {
        if self.storage.access_token().is_none() {
            self.state = SessionState::Unauthenticated;
            return;
        }

        match self.storage.load_identity() {
            Ok(Some(identity)) => {
                info!(username = %identity.username, "Restored previous session");
                self.state = SessionState::Authenticated(identity);
            }
            Ok(None) => {
                self.state = SessionState::Unauthenticated;
            }
            Err(e) => {
                warn!(error = %e, "Stored identity is corrupt, purging");
                self.storage.purge_identity();
                self.state = SessionState::Unauthenticated;
            }
        }
    }

    /// Exchange credentials for a token pair and transition to
    /// `Authenticated`. On failure the state is left unchanged, the error
    /// is recorded for the form, and re-signaled to the caller so it can
    /// suppress navigation.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.last_error = None;

        match api.obtain_token(username, password).await {
            Ok(tokens) => {
                if let Err(e) = self.storage.store_tokens(&tokens) {
                    warn!(error = %e, "Failed to persist tokens");
                }

                let identity = Identity {
                    username: username.to_string(),
                    email: None,
                };
                if let Err(e) = self.storage.store_identity(&identity) {
                    warn!(error = %e, "Failed to persist identity");
                }

                info!(username, "Login successful");
                self.state = SessionState::Authenticated(identity);
                Ok(())
            }
            Err(e) => {
                let err = AuthError::AuthenticationFailed(e);
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Register a new account, then auto-login with the same credentials.
    /// A registration failure is recorded and re-signaled without
    /// attempting login.
    pub async fn signup(
        &mut self,
        api: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.last_error = None;

        match api.register(username, email, password).await {
            Ok(()) => {
                info!(username, "Registration successful, logging in");
                self.login(api, username, password).await
            }
            Err(e) => {
                let err = AuthError::RegistrationFailed(e);
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Clear the in-memory identity and all durable credential keys.
    /// Always succeeds.
    pub fn logout(&mut self) {
        info!("Logging out");
        self.state = SessionState::Unauthenticated;
        self.storage.clear();
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&AuthFailure> {
        self.last_error.as_ref()
    }

    fn record_failure(&mut self, err: &AuthError) {
        warn!(error = %err, "Auth attempt failed");
        self.last_error = Some(AuthFailure {
            kind: err.kind(),
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
        SessionStore::new(storage)
    }

    #[test]
    fn test_initialize_empty_storage_is_unauthenticated() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(*store.state(), SessionState::Loading);

        store.initialize();
        assert_eq!(*store.state(), SessionState::Unauthenticated);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_initialize_restores_stored_session() {
        let dir = tempdir().unwrap();
        let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
        storage
            .store_tokens(&TokenPair {
                access: "A1".into(),
                refresh: "R1".into(),
            })
            .unwrap();
        let identity = Identity {
            username: "alice".into(),
            email: None,
        };
        storage.store_identity(&identity).unwrap();

        let mut store = store_in(&dir);
        store.initialize();
        assert_eq!(*store.state(), SessionState::Authenticated(identity));
    }

    #[test]
    fn test_initialize_token_without_identity_is_unauthenticated() {
        let dir = tempdir().unwrap();
        let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
        storage
            .store_tokens(&TokenPair {
                access: "A1".into(),
                refresh: "R1".into(),
            })
            .unwrap();

        let mut store = store_in(&dir);
        store.initialize();
        assert_eq!(*store.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_initialize_purges_corrupt_identity() {
        let dir = tempdir().unwrap();
        let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
        storage
            .store_tokens(&TokenPair {
                access: "A1".into(),
                refresh: "R1".into(),
            })
            .unwrap();
        std::fs::write(dir.path().join("user.json"), "{definitely not json").unwrap();

        let mut store = store_in(&dir);
        store.initialize();
        assert_eq!(*store.state(), SessionState::Unauthenticated);
        assert!(!dir.path().join("user.json").exists());
    }

    #[test]
    fn test_logout_clears_state_and_storage() {
        let dir = tempdir().unwrap();
        let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
        storage
            .store_tokens(&TokenPair {
                access: "A1".into(),
                refresh: "R1".into(),
            })
            .unwrap();
        storage
            .store_identity(&Identity {
                username: "alice".into(),
                email: None,
            })
            .unwrap();

        let mut store = store_in(&dir);
        store.initialize();
        assert!(store.is_authenticated());

        store.logout();
        assert_eq!(*store.state(), SessionState::Unauthenticated);
        assert!(store.identity().is_none());
        assert!(!dir.path().join("access_token").exists());
        assert!(!dir.path().join("refresh_token").exists());
        assert!(!dir.path().join("user.json").exists());
    }

    mod lifecycle {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        async fn store_and_api(
            dir: &tempfile::TempDir,
            server: &MockServer,
        ) -> (SessionStore, ApiClient) {
            let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
            let api = ApiClient::new(&server.uri(), storage.clone()).unwrap();
            let mut store = SessionStore::new(storage);
            store.initialize();
            (store, api)
        }

        #[tokio::test]
        async fn test_login_persists_tokens_and_identity() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token/"))
                .and(body_partial_json(json!({
                    "username": "alice",
                    "password": "hunter2"
                })))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"access": "A1", "refresh": "R1"})),
                )
                .mount(&server)
                .await;

            let dir = tempdir().unwrap();
            let (mut store, api) = store_and_api(&dir, &server).await;

            store.login(&api, "alice", "hunter2").await.unwrap();

            assert_eq!(
                store.identity(),
                Some(&Identity {
                    username: "alice".into(),
                    email: None
                })
            );
            assert_eq!(
                std::fs::read_to_string(dir.path().join("access_token")).unwrap(),
                "A1"
            );
            assert_eq!(
                std::fs::read_to_string(dir.path().join("refresh_token")).unwrap(),
                "R1"
            );
        }

        #[tokio::test]
        async fn test_login_rejection_records_failure_and_stays_unauthenticated() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token/"))
                .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                    "detail": "No active account found with the given credentials"
                })))
                .mount(&server)
                .await;

            let dir = tempdir().unwrap();
            let (mut store, api) = store_and_api(&dir, &server).await;

            let err = store.login(&api, "alice", "wrong").await.unwrap_err();
            assert_eq!(err.kind(), AuthErrorKind::AuthenticationFailed);
            assert!(!store.is_authenticated());

            let failure = store.last_error().unwrap();
            assert_eq!(failure.kind, AuthErrorKind::AuthenticationFailed);
            assert!(!dir.path().join("access_token").exists());
        }

        #[tokio::test]
        async fn test_signup_registers_then_logs_in() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/register/"))
                .and(body_partial_json(json!({
                    "username": "bob",
                    "email": "bob@example.com"
                })))
                .respond_with(
                    ResponseTemplate::new(201)
                        .set_body_json(json!({"id": 7, "username": "bob"})),
                )
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/token/"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"access": "A2", "refresh": "R2"})),
                )
                .expect(1)
                .mount(&server)
                .await;

            let dir = tempdir().unwrap();
            let (mut store, api) = store_and_api(&dir, &server).await;

            store
                .signup(&api, "bob", "bob@example.com", "pw")
                .await
                .unwrap();

            assert!(store.is_authenticated());
            assert_eq!(store.identity().unwrap().username, "bob");
            assert_eq!(
                std::fs::read_to_string(dir.path().join("access_token")).unwrap(),
                "A2"
            );
        }

        #[tokio::test]
        async fn test_signup_rejection_skips_login() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/register/"))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                    "username": ["A user with that username already exists."]
                })))
                .mount(&server)
                .await;
            // The token endpoint must not be called after a failed registration
            Mock::given(method("POST"))
                .and(path("/token/"))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;

            let dir = tempdir().unwrap();
            let (mut store, api) = store_and_api(&dir, &server).await;

            let err = store.signup(&api, "bob", "", "pw").await.unwrap_err();
            assert_eq!(err.kind(), AuthErrorKind::RegistrationFailed);
            assert!(!store.is_authenticated());
            assert_eq!(
                store.last_error().unwrap().kind,
                AuthErrorKind::RegistrationFailed
            );
        }

        #[tokio::test]
        async fn test_new_attempt_clears_previous_failure() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/token/"))
                .and(body_partial_json(json!({"password": "wrong"})))
                .respond_with(ResponseTemplate::new(401))
                .mount(&server)
                .await;
            Mock::given(method("POST"))
                .and(path("/token/"))
                .and(body_partial_json(json!({"password": "right"})))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"access": "A3", "refresh": "R3"})),
                )
                .mount(&server)
                .await;

            let dir = tempdir().unwrap();
            let (mut store, api) = store_and_api(&dir, &server).await;

            assert!(store.login(&api, "alice", "wrong").await.is_err());
            assert!(store.last_error().is_some());

            store.login(&api, "alice", "right").await.unwrap();
            assert!(store.last_error().is_none());
            assert!(store.is_authenticated());
        }
    }
}
