//! Type definitions module
//!
//! Request-side types: chat messages and JSON body assembly.

pub mod messages;
pub mod request;

// Re-export commonly used types
pub use messages::{ChatMessage, Role};
pub use request::{Options, RequestBody};
