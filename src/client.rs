//! Ollama API client
//!
//! One HTTP request per operation against a fixed base URL:
//! - POST /generate, /chat, /pull: single object or line-delimited stream
//! - POST /embeddings, GET /tags, GET /version: single object
//!
//! Status codes are checked before any body is parsed. 404 becomes
//! [`ClientError::ModelNotFound`], every other non-2xx status becomes
//! [`ClientError::RequestFailed`].

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::errors::{ClientError, RawResponse, Result};
use crate::models::{ModelInfo, ModelsResponse};
use crate::streaming::{ChunkStream, DecodePolicy};
use crate::types::{ChatMessage, Options, RequestBody};

/// Timeout for the availability probe (2 seconds)
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of an operation that may stream
#[derive(Debug)]
pub enum Reply {
    /// Whole body parsed as one JSON object
    Complete(Value),

    /// Lazy sequence of decoded lines
    Stream(ChunkStream),
}

impl Reply {
    pub fn is_stream(&self) -> bool {
        matches!(self, Reply::Stream(_))
    }

    /// The complete object, if the call did not stream
    pub fn into_complete(self) -> Option<Value> {
        match self {
            Reply::Complete(value) => Some(value),
            Reply::Stream(_) => None,
        }
    }

    /// The chunk stream, if the call streamed
    pub fn into_stream(self) -> Option<ChunkStream> {
        match self {
            Reply::Stream(stream) => Some(stream),
            Reply::Complete(_) => None,
        }
    }

    /// Every chunk in order; a complete reply counts as a single chunk
    pub async fn into_chunks(self) -> Result<Vec<Value>> {
        match self {
            Reply::Complete(value) => Ok(vec![value]),
            Reply::Stream(stream) => stream.collect_chunks().await,
        }
    }
}

/// Ollama HTTP client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    decode_policy: DecodePolicy,
    max_line_bytes: usize,
}

impl OllamaClient {
    /// Create new client against the default local server
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create client with a custom base URL and default settings
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::with_base_url(base_url))
    }

    /// Create client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder =
            Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            decode_policy: config.decode_policy,
            max_line_bytes: config.max_line_bytes,
        })
    }

    /// Replace the malformed-line policy for streamed replies
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the malformed-line policy
    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }

    /// Generate a completion for a prompt
    ///
    /// POST /generate with `model`, `prompt`, `stream` and the options.
    pub async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        stream: bool,
        options: Options,
    ) -> Result<Reply> {
        let body = RequestBody::new()
            .field("model", model)
            .field("prompt", prompt)
            .field("stream", stream)
            .options(options);

        self.post_reply("generate", body, stream).await
    }

    /// Generate the next message of a chat
    ///
    /// POST /chat with `model`, `messages`, `stream` and the options.
    pub async fn generate_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        stream: bool,
        options: Options,
    ) -> Result<Reply> {
        let body = RequestBody::new()
            .field("model", model)
            .serialized_field("messages", messages)?
            .field("stream", stream)
            .options(options);

        self.post_reply("chat", body, stream).await
    }

    /// Compute an embedding for a prompt
    ///
    /// POST /embeddings with `model`, `prompt` and the options.
    pub async fn get_embeddings(&self, model: &str, prompt: &str, options: Options) -> Result<Value> {
        let body = RequestBody::new()
            .field("model", model)
            .field("prompt", prompt)
            .options(options);

        let response = self.post("embeddings", body).await?;
        read_json(response).await
    }

    /// List locally available models
    ///
    /// GET /tags, returning the `models` field.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self.get("tags").await?;
        let models: ModelsResponse = serde_json::from_value(read_json(response).await?)?;
        Ok(models.models)
    }

    /// Download a model from the registry
    ///
    /// POST /pull with `name`, `insecure` and `stream`.
    pub async fn pull_model(&self, model: &str, insecure: bool, stream: bool) -> Result<Reply> {
        let body = RequestBody::new()
            .field("name", model)
            .field("insecure", insecure)
            .field("stream", stream);

        self.post_reply("pull", body, stream).await
    }

    /// Server version string
    ///
    /// GET /version, returning the `version` field.
    pub async fn version(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct VersionResponse {
            version: String,
        }

        let response = self.get("version").await?;
        let version: VersionResponse = serde_json::from_value(read_json(response).await?)?;
        Ok(version.version)
    }

    /// Check if the server answers at all
    pub async fn is_available(&self) -> bool {
        let url = self.endpoint("version");
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "server not reachable");
                false
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await?;
        check_status(response).await
    }

    async fn post(&self, path: &str, body: RequestBody) -> Result<Response> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "POST");

        let response = self.client.post(&url).json(&body.into_value()).send().await?;
        check_status(response).await
    }

    async fn post_reply(&self, path: &str, body: RequestBody, stream: bool) -> Result<Reply> {
        let response = self.post(path, body).await?;

        if stream {
            Ok(Reply::Stream(ChunkStream::from_response(
                response,
                self.decode_policy,
                self.max_line_bytes,
            )))
        } else {
            Ok(Reply::Complete(read_json(response).await?))
        }
    }
}

/// Map non-success statuses to API errors, keeping the raw response
pub async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read error body");
            String::new()
        }
    };

    tracing::debug!(status = %status, url = %url, "request failed");
    Err(ClientError::from_status(RawResponse { status, url, body }))
}

async fn read_json(response: Response) -> Result<Value> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
