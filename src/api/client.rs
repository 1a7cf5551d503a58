//! The authenticated request gateway.
//!
//! Every resource operation (goals, todos, journal entries) goes through
//! `ApiClient`. Before each request the client re-reads the access token
//! from durable storage and attaches it as a bearer credential; requests
//! issued with no stored token go out without credentials and the backend
//! rejects them. There is no retry and no token refresh - a request that
//! fails because the token expired is surfaced as-is.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::{CredentialStorage, TokenPair};
use crate::models::{
    Goal, GoalType, JournalEntry, JournalPatch, NewGoal, NewJournalEntry, NewTodo, Todo, TodoPatch,
};

use super::ApiError;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the dashboard backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: CredentialStorage,
}

impl ApiClient {
    pub fn new(base_url: &str, storage: CredentialStorage) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            client,
            base_url,
            storage,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer credential if one is present in durable storage.
    /// Read per request, not cached, so the freshest persisted token wins.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.storage.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Issue an authenticated request and parse the JSON response.
    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = Self::check(self.send(method, path, body).await?).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Issue an authenticated request and discard the response body
    /// (DELETE endpoints return empty responses).
    async fn request_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        Self::check(self.send(method, path, body).await?).await?;
        Ok(())
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(%method, path, "API request");
        let mut request = self.authorize(self.client.request(method, self.url(path)));
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    // ===== Authentication endpoints (no bearer credential) =====

    /// Exchange username/password for a token pair.
    pub async fn obtain_token(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            username: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access: String,
            refresh: String,
        }

        let response = self
            .client
            .post(self.url("token/"))
            .json(&TokenRequest { username, password })
            .send()
            .await?;

        let response = Self::check(response).await?;
        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(TokenPair {
            access: tokens.access,
            refresh: tokens.refresh,
        })
    }

    /// Register a new account. The created-user representation in the
    /// response is not needed; only the status matters.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct RegisterRequest<'a> {
            username: &'a str,
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .client
            .post(self.url("register/"))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    // ===== Goals =====

    pub async fn list_goals(&self) -> Result<Vec<Goal>, ApiError> {
        self.request(Method::GET, "goals/", None::<&()>).await
    }

    pub async fn create_goal(&self, title: &str, goal_type: GoalType) -> Result<Goal, ApiError> {
        self.request(Method::POST, "goals/", Some(&NewGoal { title, goal_type }))
            .await
    }

    pub async fn delete_goal(&self, id: i64) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, &format!("goals/{}/", id), None::<&()>)
            .await
    }

    // ===== Todos =====

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.request(Method::GET, "todos/", None::<&()>).await
    }

    pub async fn create_todo(&self, text: &str) -> Result<Todo, ApiError> {
        self.request(
            Method::POST,
            "todos/",
            Some(&NewTodo {
                text,
                completed: false,
            }),
        )
        .await
    }

    pub async fn set_todo_completed(&self, id: i64, completed: bool) -> Result<Todo, ApiError> {
        self.request(
            Method::PATCH,
            &format!("todos/{}/", id),
            Some(&TodoPatch { completed }),
        )
        .await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, &format!("todos/{}/", id), None::<&()>)
            .await
    }

    // ===== Journal =====

    pub async fn list_journal(&self) -> Result<Vec<JournalEntry>, ApiError> {
        self.request(Method::GET, "journal/", None::<&()>).await
    }

    pub async fn create_journal_entry(&self, content: &str) -> Result<JournalEntry, ApiError> {
        self.request(Method::POST, "journal/", Some(&NewJournalEntry { content }))
            .await
    }

    pub async fn update_journal_entry(&self, id: i64, content: &str) -> Result<JournalEntry, ApiError> {
        self.request(
            Method::PATCH,
            &format!("journal/{}/", id),
            Some(&JournalPatch { content }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_in(dir: &tempfile::TempDir, server: &MockServer) -> (ApiClient, CredentialStorage) {
        let storage = CredentialStorage::new(dir.path().to_path_buf()).unwrap();
        let client = ApiClient::new(&server.uri(), storage.clone()).unwrap();
        (client, storage)
    }

    fn seed_tokens(storage: &CredentialStorage, access: &str) {
        storage
            .store_tokens(&TokenPair {
                access: access.into(),
                refresh: "R".into(),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_requests_carry_stored_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/goals/"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Run a marathon", "type": "long-term"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, storage) = client_in(&dir, &server);
        seed_tokens(&storage, "tok-123");

        let goals = client.list_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].title, "Run a marathon");
    }

    #[tokio::test]
    async fn test_requests_without_stored_token_have_no_auth_header() {
        let server = MockServer::start().await;
        // Higher priority mock catches any request that carries credentials
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Authentication credentials were not provided."
            })))
            .with_priority(2)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, _storage) = client_in(&dir, &server);

        let err = client.list_todos().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_token_is_reread_from_storage_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .and(header("authorization", "Bearer first"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .and(header("authorization", "Bearer second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "text": "water the plants", "completed": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, storage) = client_in(&dir, &server);

        seed_tokens(&storage, "first");
        assert!(client.list_todos().await.unwrap().is_empty());

        // A later login overwrote the stored token; the same client must
        // pick it up without being rebuilt
        seed_tokens(&storage, "second");
        let todos = client.list_todos().await.unwrap();
        assert_eq!(todos[0].text, "water the plants");
    }

    #[tokio::test]
    async fn test_obtain_token_sends_no_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/"))
            .and(body_json(json!({"username": "alice", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access": "A", "refresh": "R"})),
            )
            .with_priority(2)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, storage) = client_in(&dir, &server);
        // Even with a stale token on disk, the token endpoint is credential-free
        seed_tokens(&storage, "stale");

        let tokens = client.obtain_token("alice", "pw").await.unwrap();
        assert_eq!(tokens.access, "A");
        assert_eq!(tokens.refresh, "R");
    }

    #[tokio::test]
    async fn test_create_goal_posts_type_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/goals/"))
            .and(body_json(json!({"title": "Read more", "type": "short-term"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(
                {"id": 5, "title": "Read more", "type": "short-term"}
            )))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, storage) = client_in(&dir, &server);
        seed_tokens(&storage, "tok");

        let goal = client.create_goal("Read more", GoalType::ShortTerm).await.unwrap();
        assert_eq!(goal.id, 5);
        assert_eq!(goal.goal_type, GoalType::ShortTerm);
    }

    #[tokio::test]
    async fn test_delete_tolerates_empty_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/9/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, storage) = client_in(&dir, &server);
        seed_tokens(&storage, "tok");

        client.delete_todo(9).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_surfaces_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/journal/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"content": ["This field may not be blank."]})),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let (client, storage) = client_in(&dir, &server);
        seed_tokens(&storage, "tok");

        let err = client.create_journal_entry("").await.unwrap_err();
        match err {
            ApiError::RequestFailed { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert!(body.contains("may not be blank"));
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }
}
