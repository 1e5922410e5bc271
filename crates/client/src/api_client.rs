//! HTTP API client with bearer-token authentication.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use spacedash_shared::ApiError;

/// Something that can hand out a current access token.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TokenSource: Send + Sync {
    /// A valid access token, refreshed if necessary. `None` when signed out.
    async fn access_token(&self) -> Option<String>;
}

/// A fixed token, mostly for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    pub require_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { require_auth: true }
    }
}

impl RequestOptions {
    pub fn anonymous() -> Self {
        Self {
            require_auth: false,
        }
    }
}

/// REST client for the spacedash API.
///
/// Every call fetches a fresh token; there is no retry, de-duplication or
/// timeout beyond the platform default.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs (presigned uploads, artifacts) pass through unchanged.
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Send a request and return the raw response for any 2xx status.
    pub async fn request<TReq: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TReq>,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut rb = self.client.request(method.clone(), &url);

        if options.require_auth {
            let Some(token) = self.tokens.access_token().await else {
                crate::log_warn!("{} {} refused: no access token", method, path);
                return Err(ApiError::Unauthenticated);
            };
            rb = rb.bearer_auth(token);
        }

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Deserialize(e.to_string()))?;
            rb = rb.header("Content-Type", "application/json").body(bytes);
        }

        crate::log_debug!("{} {}", method, url);
        let resp = rb.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        ensure_success(resp).await
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Response, ApiError> {
        self.request::<()>(Method::GET, path, None, options).await
    }

    pub async fn post<TReq: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&TReq>,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        self.request(Method::POST, path, body, options).await
    }

    pub async fn put<TReq: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&TReq>,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        self.request(Method::PUT, path, body, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Response, ApiError> {
        self.request::<()>(Method::DELETE, path, None, options).await
    }

    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        decode(self.get(path, RequestOptions::default()).await?).await
    }

    pub async fn post_json<TReq: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        decode(self.post(path, Some(body), RequestOptions::default()).await?).await
    }

    pub async fn put_json<TReq: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        decode(self.put(path, Some(body), RequestOptions::default()).await?).await
    }

    /// DELETE, ignoring whatever body comes back.
    pub async fn delete_json(&self, path: &str) -> Result<(), ApiError> {
        self.delete(path, RequestOptions::default()).await?;
        Ok(())
    }

    /// PUT raw bytes to a presigned URL. The URL carries its own credentials,
    /// so no bearer token is attached.
    pub async fn upload_bytes(
        &self,
        presigned_url: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ApiError> {
        let resp = self
            .client
            .put(presigned_url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// GET a plain-text document without auth (artifact URLs are presigned).
    pub async fn fetch_text(&self, url: &str) -> Result<String, ApiError> {
        let resp = self.get(url, RequestOptions::anonymous()).await?;
        resp.text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))
    }
}

async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;
    Err(ApiError::Http {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

/// Decode a JSON body. An empty body decodes as `null`.
pub async fn decode<TRes: DeserializeOwned>(resp: Response) -> Result<TRes, ApiError> {
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;
    if text.trim().is_empty() {
        serde_json::from_str("null").map_err(|e| ApiError::Deserialize(e.to_string()))
    } else {
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
    }
}
