//! Serialization framework for result payloads.
//!
//! Workflow inputs and results travel as opaque bytes; this module provides
//! the converter trait and the [`EncodedValue`] wrapper callers use to
//! decode a completion payload into a typed result.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Trait for payload converters/serializers
pub trait DataConverter: Send + Sync {
    /// Encode a value to bytes
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodingError>;
    /// Decode bytes to a value
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, EncodingError>;
}

/// Default JSON payload converter
pub struct JsonDataConverter;

impl JsonDataConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonDataConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataConverter for JsonDataConverter {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodingError> {
        serde_json::to_vec(value).map_err(|e| EncodingError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, EncodingError> {
        serde_json::from_slice(data).map_err(|e| EncodingError::Deserialization(e.to_string()))
    }
}

/// Encoding errors
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingError {
    Serialization(String),
    Deserialization(String),
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            EncodingError::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for EncodingError {}

/// Raw result payload that can be decoded later
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedValue {
    data: Vec<u8>,
}

impl EncodedValue {
    /// Wrap raw payload bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Decode to a typed value
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, EncodingError> {
        JsonDataConverter::new().decode(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the completion event carried no payload
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Convenience functions
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodingError> {
    JsonDataConverter::new().encode(value)
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, EncodingError> {
    JsonDataConverter::new().decode(data)
}
