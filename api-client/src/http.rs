use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::{header, Body, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, CommonError, Result};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::session::AppContext;

/// HTTP transport for the backend REST API
///
/// Joins paths onto the configured base URL, attaches the bearer token from
/// the application context and maps non-2xx responses onto [`CommonError`].
/// Requests are never retried.
#[derive(Clone)]
pub struct ApiTransport {
    client: Client,
    base_url: String,
    context: AppContext,
}

/// Error body shapes the backend uses for non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiTransport {
    pub fn new(config: &ApiConfig, context: AppContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CommonError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!("API transport initialized for {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            context,
        })
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET an enveloped response
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        let request = self.request(Method::GET, path).query(query);
        self.send(request).await
    }

    /// POST a JSON body, decoding an enveloped response
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        let request = self.request(Method::POST, path).json(body);
        self.send(request).await
    }

    /// POST a JSON body, decoding the response as-is
    pub async fn post_raw<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.request(Method::POST, path).json(body);
        self.send(request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        let request = self.request(Method::DELETE, path);
        self.send(request).await
    }

    /// PUT a body to an absolute URL without the bearer token.
    ///
    /// `Content-Length` is always sent; storage providers reject chunked
    /// uploads to signed URLs.
    pub async fn put_body(
        &self,
        url: &str,
        content_type: &str,
        content_length: u64,
        body: Body,
    ) -> Result<()> {
        let start = Instant::now();
        let response = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, content_length)
            .body(body)
            .send()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        debug!(
            "PUT {} -> {} ({} bytes, {:?})",
            redact_query(url),
            response.status(),
            content_length,
            start.elapsed()
        );
        Ok(())
    }

    /// GET the raw body of an absolute URL without the bearer token
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .bytes()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("API request: {} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(token) = self.context.access_token() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))?;

        let status = response.status();
        let response = check_status(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| CommonError::Network(e.to_string()))?;

        debug!("API response: {} ({:?}, {} bytes)", status, start.elapsed(), body.len());

        serde_json::from_slice(&body).map_err(|e| CommonError::Decode(e.to_string()))
    }
}

/// Turn a non-2xx response into an error carrying the backend's message
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    warn!("Backend returned {}: {}", status, message);
    Err(CommonError::from_status(status.as_u16(), message))
}

/// Signed URLs carry credentials in the query string; keep them out of logs
fn redact_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
