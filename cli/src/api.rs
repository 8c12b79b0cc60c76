//! HTTP client for the leetodo server.
//!
//! The session token travels as the `session_token` cookie, exactly as a
//! browser would send it after the GitHub login.

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use todos::autosave::{SaveError, TodoSink};
use todos::{Layout, LayoutBody, Question, SaveResponse, Session, Suggestion, TodoItem};

use crate::CliError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    has_session: bool,
}

impl ApiClient {
    pub fn new(base_url: &str, session_token: Option<&str>) -> Result<Self, CliError> {
        let token = session_token.map(str::trim).filter(|t| !t.is_empty());

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(COOKIE, HeaderValue::from_str(&format!("session_token={token}"))?);
        }
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            has_session: token.is_some(),
        })
    }

    /// A session token was supplied. It may still turn out to be expired.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.has_session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Where the user starts the GitHub login in a browser.
    #[must_use]
    pub fn login_url(&self) -> String {
        self.url("/api/login/github")
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, CliError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.request(method, self.url(path));
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CliError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CliError::Server { status: status.as_u16(), message });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn session(&self) -> Result<Option<Session>, CliError> {
        self.get("/api/auth/session").await
    }

    pub async fn load_todos(&self) -> Result<Vec<TodoItem>, CliError> {
        self.get("/api/todos").await
    }

    pub async fn put_todos(&self, todos: &[TodoItem]) -> Result<SaveResponse, CliError> {
        self.request(Method::PUT, "/api/todos", Some(todos)).await
    }

    pub async fn layout(&self) -> Result<Layout, CliError> {
        let body: LayoutBody = self.get("/api/settings/layout").await?;
        Ok(body.layout)
    }

    pub async fn set_layout(&self, layout: Layout) -> Result<Layout, CliError> {
        let body: LayoutBody = self
            .request(Method::PUT, "/api/settings/layout", Some(&LayoutBody { layout }))
            .await?;
        Ok(body.layout)
    }

    pub async fn daily(&self) -> Result<Question, CliError> {
        self.get("/api/questions/daily").await
    }

    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Suggestion>, CliError> {
        let limit = limit.to_string();
        let path = reqwest::Url::parse_with_params(
            &self.url("/api/questions/search"),
            &[("q", query), ("limit", limit.as_str())],
        )
        .map_err(|_| CliError::InvalidBaseUrl(self.base_url.clone()))?;
        let response = self.http.get(path).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CliError::Server { status: status.as_u16(), message });
        }
        Ok(response.json().await?)
    }
}

pub(crate) fn save_error(err: CliError) -> SaveError {
    match err {
        CliError::Unauthorized => SaveError::Unauthorized,
        CliError::Server { status, message } => SaveError::Rejected(format!("HTTP {status}: {message}")),
        other => SaveError::Transport(other.to_string()),
    }
}

#[async_trait::async_trait]
impl TodoSink for ApiClient {
    async fn save_todos(&self, todos: &[TodoItem]) -> Result<(), SaveError> {
        self.put_todos(todos).await.map(|_| ()).map_err(save_error)
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
