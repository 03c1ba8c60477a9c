use crate::config::{ClientSettings, ConfigError};
use crate::error::ApiError;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Query string pairs. `None` values are dropped before the request is built.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn push_opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// Authorized JSON client. Non-2xx responses become [`ApiError::Backend`]
/// carrying the server's `detail` untouched.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ConfigError> {
        Self::with_timeout(base_url, token, ClientSettings::DEFAULT_TIMEOUT)
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Self::with_timeout(
            settings.base_url.clone(),
            settings.token.clone(),
            settings.timeout,
        )
    }

    fn with_timeout(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            ConfigError::Invalid(format!("failed to build HTTP client: {err}"))
        })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Same connection pool, different caller identity.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        let mut request = self.request(Method::GET, path, true);
        if !query.is_empty() {
            request = request.query(query.pairs());
        }
        self.send_json(request, Method::GET, path).await
    }

    /// GET without the bearer token, for endpoints that must work signed-out.
    pub async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path, false);
        self.send_json(request, Method::GET, path).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path, true).json(body);
        self.send_json(request, Method::POST, path).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::PUT, path, true).json(body);
        self.send_json(request, Method::PUT, path).await
    }

    /// POST with no body; used by action endpoints such as `/sync`.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path, true);
        self.send_json(request, Method::POST, path).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::PUT, path, true);
        self.send_json(request, Method::PUT, path).await
    }

    /// DELETE; the response body, if any, is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, path, true);
        self.dispatch(request, Method::DELETE, path).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str, authorized: bool) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");
        if authorized {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }
        request
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(request, method, path).await?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn dispatch(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<Response, ApiError> {
        debug!(%method, path, "sending EchoMind request");
        let response = request.send().await.map_err(|source| {
            warn!(%method, path, error = %source, "EchoMind request failed");
            ApiError::Transport {
                path: path.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(status, &body);
        warn!(
            %method,
            path,
            status = status.as_u16(),
            detail = %detail,
            "EchoMind request rejected"
        );
        Err(ApiError::Backend { status, detail })
    }
}

fn extract_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(Value::String(detail)) => detail,
        Some(Value::Null) | None => format!("Request failed with status {}", status.as_u16()),
        Some(other) => other.to_string(),
    }
}
