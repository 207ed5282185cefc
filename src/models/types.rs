//! Model descriptor and pull progress types
//!
//! Typed views over the `/tags` listing and the chunks streamed by `/pull`.
//! Unknown fields are kept so nothing the server sends is lost.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{ClientError, Result};

/// Information about a locally available model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name (e.g., "llama3:latest")
    pub name: String,

    /// Model reference, usually equal to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Model size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Model digest/hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Last modification time, as the server wrote it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,

    /// Model details (optional, from API)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ModelDetails>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Detailed model information
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelDetails {
    /// Model format (e.g., "gguf")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Model family (e.g., "llama", "qwen2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Parameter size (e.g., "7B", "13B")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,

    /// Quantization level (e.g., "Q4_0", "Q4_K_M")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization_level: Option<String>,

    /// `families`, `parent_model` and anything newer
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from the `/tags` endpoint
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
}

/// Progress update during a model pull
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullProgress {
    /// Status message ("pulling manifest", "downloading", "success", ...)
    pub status: String,

    /// Layer digest being pulled
    #[serde(default)]
    pub digest: Option<String>,

    /// Total bytes of the layer
    #[serde(default)]
    pub total: Option<u64>,

    /// Bytes completed
    #[serde(default)]
    pub completed: Option<u64>,
}

impl ModelInfo {
    /// Format the model size in human-readable format
    pub fn formatted_size(&self) -> String {
        match self.size {
            Some(size) => format_size(size),
            None => "unknown size".to_string(),
        }
    }

    /// Modification time converted to UTC, if present and RFC 3339
    pub fn modified_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.modified_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }

    /// Short description of the model
    pub fn description(&self) -> String {
        if let Some(ref details) = self.details {
            let parts: Vec<&str> = [&details.parameter_size, &details.quantization_level]
                .into_iter()
                .filter_map(|part| part.as_deref())
                .collect();

            if !parts.is_empty() {
                return parts.join(" ");
            }
        }

        self.formatted_size()
    }
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.formatted_size())
    }
}

impl PullProgress {
    /// Read a streamed pull chunk
    ///
    /// A chunk carrying `error` fails with `ClientError::Server`.
    pub fn from_chunk(chunk: &Value) -> Result<Self> {
        if let Some(err) = ClientError::embedded(chunk) {
            return Err(err);
        }
        Ok(Self::deserialize(chunk)?)
    }

    /// Whether the pull has finished successfully
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Completed share of the current layer, if the server reported sizes
    pub fn fraction(&self) -> Option<f64> {
        match (self.completed, self.total) {
            (Some(completed), Some(total)) if total > 0 => {
                Some((completed as f64 / total as f64).min(1.0))
            }
            _ => None,
        }
    }
}

/// Format bytes into human-readable size
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base: f64 = 1024.0;
    let exponent = (bytes as f64).log(base).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    let size = bytes as f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}
