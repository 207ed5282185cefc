//! Request body assembly
//!
//! Bodies are plain JSON objects. Fixed fields go in first and free-form
//! options are merged on top without validation, so an option may
//! override a fixed field.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::Result;

/// Free-form request options merged into the body
pub type Options = Map<String, Value>;

/// JSON object body under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    fields: Map<String, Value>,
}

impl RequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed field
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Set a fixed field from any serializable value
    pub fn serialized_field<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Result<Self> {
        self.fields.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Merge options over the fixed fields
    pub fn options(mut self, options: Options) -> Self {
        self.fields.extend(options);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
