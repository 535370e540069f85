//! HTTP implementation of [`RegistryApi`] over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rollcall_proto::{
    NODES_PATH, NewNode, Node, NodeList, ReorderRequest, STATUS_PATH, StatusBody,
};

use crate::{ApiError, RegistryApi};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Registry client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl HttpApi {
    /// Builder with default base URL and timeout.
    pub fn builder() -> HttpApiBuilder {
        HttpApiBuilder::default()
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, path: &'static str, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| self.transport_error(path, &e))?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, %status, "registry call rejected");
            return Err(ApiError::Status { path, status: status.as_u16() });
        }
        Ok(response)
    }

    async fn body(&self, path: &'static str, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = self.send(path, request).await?;
        let bytes = response.bytes().await.map_err(|e| self.transport_error(path, &e))?;
        Ok(bytes.to_vec())
    }

    fn transport_error(&self, path: &'static str, e: &reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout { path, after: self.timeout }
        } else {
            ApiError::Network { path, message: e.to_string() }
        }
    }
}

#[async_trait]
impl RegistryApi for HttpApi {
    async fn list_nodes(&self) -> Result<NodeList, ApiError> {
        let body = self.body(NODES_PATH, self.http.get(self.url(NODES_PATH))).await?;
        Ok(Node::decode_list(&body)?)
    }

    async fn register_node(&self, name: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.url(NODES_PATH)).json(&NewNode { name: name.to_string() });
        self.send(NODES_PATH, request).await.map(drop)
    }

    async fn unregister_node(&self) -> Result<(), ApiError> {
        self.send(NODES_PATH, self.http.delete(self.url(NODES_PATH))).await.map(drop)
    }

    async fn reorder_node(&self, cur_i: usize, new_i: usize) -> Result<(), ApiError> {
        let request = self.http.put(self.url(NODES_PATH)).json(&ReorderRequest { cur_i, new_i });
        self.send(NODES_PATH, request).await.map(drop)
    }

    async fn get_status(&self) -> Result<bool, ApiError> {
        let body = self.body(STATUS_PATH, self.http.get(self.url(STATUS_PATH))).await?;
        Ok(StatusBody::decode(&body)?.on)
    }

    async fn set_status(&self, on: bool) -> Result<(), ApiError> {
        let request = self.http.post(self.url(STATUS_PATH)).json(&StatusBody { on });
        self.send(STATUS_PATH, request).await.map(drop)
    }
}

/// Builder for [`HttpApi`].
#[derive(Debug, Default)]
pub struct HttpApiBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpApiBuilder {
    /// Server base URL, e.g. `http://10.0.0.1:8080`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the TLS backend cannot be initialized.
    pub fn build(self) -> Result<HttpApi, ApiError> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network { path: "", message: e.to_string() })?;

        Ok(HttpApi { base_url, timeout, http })
    }
}
