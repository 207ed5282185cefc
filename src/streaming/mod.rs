//! Streaming response module
//!
//! Provides the incremental line parser and the decoded chunk stream.

pub mod parser;
pub mod stream;

// Re-export commonly used types
pub use parser::{LineParser, MAX_LINE_BYTES};
pub use stream::{ChunkStream, DecodePolicy};
