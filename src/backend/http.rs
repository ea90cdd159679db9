//! HTTP client for the repository-analysis backend

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{
    AnalysisBackend, GenerateDocumentRequest, GenerateDocumentResponse, ListFilesRequest,
    ListFilesResponse,
};
use crate::config::Config;
use crate::error::TransportError;
use crate::{log_debug, log_warn};

/// Relative path of the list-files endpoint
pub const LIST_FILES_PATH: &str = "list-files";
/// Relative path of the generate-document endpoint
pub const GENERATE_DOCUMENT_PATH: &str = "generate-design-document";

/// `reqwest`-backed implementation of [`AnalysisBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a backend for `base_url` with explicit timeouts
    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(concat!("lingurepo/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.backend_url,
            Duration::from_secs(config.http.connect_timeout_secs),
            Duration::from_secs(config.http.request_timeout_secs),
        )
    }

    /// Absolute URL of an endpoint below the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::unreachable(format!("Invalid endpoint `{path}`: {e}")))
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        log_debug!("POST {}", url);

        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::unreachable(describe_reqwest_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log_warn!("POST {} failed with status {}: {}", url, status, text);
            return Err(TransportError::status(status.as_u16(), extract_detail(&text)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::unreachable(describe_reqwest_error(&e)))?;

        decode_body(&bytes).map_err(|e| {
            log_warn!("POST {} returned an unexpected body: {}", url, e);
            TransportError::malformed(e.to_string())
        })
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn list_files(
        &self,
        request: &ListFilesRequest,
    ) -> Result<ListFilesResponse, TransportError> {
        self.post_json(LIST_FILES_PATH, request).await
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, TransportError> {
        self.post_json(GENERATE_DOCUMENT_PATH, request).await
    }
}

/// Parse the base URL and make sure relative joins append to its path
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("Invalid backend URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Backend URL must use http or https, got `{}`", url.scheme());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Decode a success body with no nesting limit
///
/// Directory listings nest one JSON level per directory, so the parser's
/// recursion limit is lifted and deep recursion moves onto heap-allocated
/// stack segments.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Human-readable `detail` from an error body, if there is one
///
/// `FastAPI` sends a string for handled errors and a list of objects for
/// request-validation errors; the latter is rendered as compact JSON.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out ({err})")
    } else if err.is_connect() {
        format!("could not connect ({err})")
    } else {
        err.to_string()
    }
}
