use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::database::models::{Todo, UserInfo};
use crate::services::{CreateTodoRequest, Credentials, TokenResponse, UpdateTodoRequest};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Not logged in (or session expired). Run `todo auth login` first.")]
    Unauthenticated,

    #[error("Invalid server URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("Todo {0} is not in the current list")]
    UnknownTodo(Uuid),

    #[error("Server returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::Unauthenticated)
    }
}

/// Confirmation body of `DELETE /api/todos/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
    pub id: Uuid,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Typed HTTP client for the tracker API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl TodoClient {
    /// A path prefix on `base_url` (e.g. `http://host/todo`) is kept for every call.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(base_url.to_string(), e))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /api/auth/register`; keeps the issued token for later calls
    pub async fn register(&mut self, username: &str, password: &str) -> Result<TokenResponse, ClientError> {
        self.authenticate_with("/api/auth/register", username, password).await
    }

    /// `POST /api/auth/login`; keeps the issued token for later calls
    pub async fn login(&mut self, username: &str, password: &str) -> Result<TokenResponse, ClientError> {
        self.authenticate_with("/api/auth/login", username, password).await
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn me(&self) -> Result<UserInfo, ClientError> {
        self.send(self.request(Method::GET, "/api/auth/me")?).await
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        self.send(self.request(Method::GET, "/api/todos")?).await
    }

    pub async fn create(&self, request: &CreateTodoRequest) -> Result<Todo, ClientError> {
        self.send(self.request(Method::POST, "/api/todos")?.json(request))
            .await
    }

    pub async fn update(&self, id: Uuid, request: &UpdateTodoRequest) -> Result<Todo, ClientError> {
        let path = format!("/api/todos/{}", id);
        self.send(self.request(Method::PUT, &path)?.json(request)).await
    }

    pub async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Todo, ClientError> {
        let request = UpdateTodoRequest {
            completed: Some(completed),
            ..Default::default()
        };
        self.update(id, &request).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteConfirmation, ClientError> {
        let path = format!("/api/todos/{}", id);
        self.send(self.request(Method::DELETE, &path)?).await
    }

    /// `GET /health`; true when the server answers 200
    pub async fn ping(&self) -> bool {
        let Ok(url) = self.url("health") else {
            return false;
        };
        matches!(
            self.http.get(url).timeout(Duration::from_secs(5)).send().await,
            Ok(response) if response.status().is_success()
        )
    }

    async fn authenticate_with(
        &mut self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ClientError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let url = self.url(path)?;
        let response = self.http.post(url).json(&credentials).send().await?;

        // Wrong credentials here, not an expired session
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let message = Self::error_message(response, status).await;
            return Err(ClientError::Api { status, message });
        }

        let response: TokenResponse = Self::decode(response).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Resolve `path` under the base URL, keeping any base path prefix.
    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(path.to_string(), e))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::Unauthenticated)?;
        Ok(self.http.request(method, self.url(path)?).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthenticated);
        }
        if !status.is_success() {
            let message = Self::error_message(response, status).await;
            return Err(ClientError::Api { status, message });
        }
        Ok(response.json::<T>().await?)
    }

    async fn error_message(response: Response, status: StatusCode) -> String {
        match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            TodoClient::new("not a url"),
            Err(ClientError::InvalidUrl(..))
        ));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = TodoClient::new("http://host.test/todo").unwrap();
        assert_eq!(client.base_url().as_str(), "http://host.test/todo/");
        assert_eq!(
            client.url("/api/todos").unwrap().as_str(),
            "http://host.test/todo/api/todos"
        );

        let client = TodoClient::new("http://host.test:5000").unwrap();
        assert_eq!(
            client.url("/api/todos").unwrap().as_str(),
            "http://host.test:5000/api/todos"
        );
    }

    #[tokio::test]
    async fn requests_without_token_are_unauthenticated() {
        let client = TodoClient::new("http://127.0.0.1:9").unwrap();
        let err = client.list().await.unwrap_err();
        assert!(err.is_unauthenticated());
    }
}
