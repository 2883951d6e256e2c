// Backend API HTTP client.
// Handles bearer authentication, the refresh-and-replay cycle, and response decoding.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::{REFRESH_PATH, RefreshCoordinator, RefreshPolicy, TokenStore};
use crate::config::Config;
use crate::error::{MealbookError, Result};

use super::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// One API call: method, path, optional JSON body and caller headers.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// Whether an auth failure on this call may trigger a token refresh.
    pub refresh: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            query: Vec::new(),
            refresh: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a caller header; it overrides the client defaults.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Never route this call through the refresh cycle.
    pub fn without_refresh(mut self) -> Self {
        self.refresh = false;
        self
    }
}

/// Authenticated JSON client for the backend.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    base_url: String,
    policy: RefreshPolicy,
    coordinator: RefreshCoordinator,
}

impl ApiClient {
    /// Create a client over an explicit transport and token store.
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: TokenStore,
        base_url: &str,
        policy: RefreshPolicy,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let coordinator = RefreshCoordinator::new(
            transport.clone(),
            tokens.clone(),
            resolve_url(&base_url, REFRESH_PATH),
        );

        Self {
            transport,
            tokens,
            base_url,
            policy,
            coordinator,
        }
    }

    /// Create a client using `reqwest` with settings from `config`.
    pub fn from_config(config: &Config, tokens: TokenStore) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::new(
            transport,
            tokens,
            &config.api_url,
            config.refresh_policy.clone(),
        ))
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request, refreshing the access token and replaying once
    /// if the response status is one the refresh policy covers.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<Value> {
        let token = self.tokens.access_token().await;

        match self.execute(&descriptor, token.as_deref()).await {
            Err(MealbookError::Http { status, .. })
                if descriptor.refresh && self.policy.triggers(status) =>
            {
                debug!(path = %descriptor.path, %status, "auth failure, refreshing token");
                let pair = self.coordinator.refresh(token.as_deref()).await?;
                self.execute(&descriptor, Some(&pair.access_token)).await
            }
            other => other,
        }
    }

    /// Execute a request and decode the JSON result into `T`.
    pub async fn request_as<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let value = self.request(descriptor).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(RequestDescriptor::get(path)).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.request(RequestDescriptor::post(path).json(body)?).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.request(RequestDescriptor::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(RequestDescriptor::delete(path)).await
    }

    /// Send one attempt with the given access token.
    async fn execute(&self, descriptor: &RequestDescriptor, token: Option<&str>) -> Result<Value> {
        let request = self.build(descriptor, token)?;
        let response = self.transport.send(request).await?;
        decode(response)
    }

    fn build(&self, descriptor: &RequestDescriptor, token: Option<&str>) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| MealbookError::Other(e.to_string()))?,
            );
        }
        // Caller headers win over the defaults.
        for (name, value) in &descriptor.headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(HttpRequest {
            method: descriptor.method.clone(),
            url: resolve_url(&self.base_url, &descriptor.path),
            headers,
            query: descriptor.query.clone(),
            body: descriptor.body.clone(),
        })
    }
}

/// Join `path` onto `base` unless it is already an absolute URL.
pub fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Check status and turn the body into JSON.
fn decode(response: HttpResponse) -> Result<Value> {
    if !response.status.is_success() {
        return Err(MealbookError::Http {
            status: response.status,
            body: response.body,
        });
    }
    if response.status == StatusCode::NO_CONTENT || response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    // Some endpoints answer with bare text.
    Ok(serde_json::from_str(&response.body).unwrap_or(Value::String(response.body)))
}
