//! ollama-client - thin async client for a local Ollama server
//!
//! Wraps the generate, chat, embeddings, tags and pull endpoints. Calls
//! either return one JSON object or, when streaming, a lazy
//! [`ChunkStream`] of objects decoded line by line from the body.
//!
//! # Architecture
//!
//! - **client**: request construction and status-code error mapping
//! - **streaming**: line splitter and decoded chunk stream
//! - **types / models**: request bodies, chat messages, model descriptors
//! - **config**: TOML client settings
//!
//! ```no_run
//! use ollama_client::{OllamaClient, Options};
//!
//! # async fn demo() -> ollama_client::Result<()> {
//! let client = OllamaClient::new()?;
//! let reply = client
//!     .generate_text("llama3", "Tell me a joke.", false, Options::new())
//!     .await?;
//! if let Some(object) = reply.into_complete() {
//!     println!("{}", object["response"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod streaming;
pub mod types;

// Binary support
pub mod cli;
pub mod telemetry;

// Re-export commonly used types
pub use client::{OllamaClient, Reply};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use errors::{ClientError, RawResponse, Result};
pub use models::{ModelInfo, PullProgress};
pub use streaming::{ChunkStream, DecodePolicy};
pub use types::{ChatMessage, Options, Role};
