//! Model listing and pull types
//!
//! This module provides typed views over model management responses:
//! - Installed model descriptors from `/tags`
//! - Progress chunks streamed by `/pull`

pub mod types;

// Re-export key types for convenience
pub use types::{format_size, ModelDetails, ModelInfo, ModelsResponse, PullProgress};
