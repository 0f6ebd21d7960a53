//! Remote store contracts
//!
//! The resolvers only see these traits. Real clients live in `cloudenv-aws`;
//! in-memory implementations for tests live in [`crate::testing`].

use async_trait::async_trait;
use cloudenv_core::Result;
use std::sync::Arc;

/// One batch request against the parameter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetParametersRequest {
    /// Plain lookup names (never more than the store's batch limit)
    pub names: Vec<String>,
    /// Ask the store to decrypt encrypted values
    pub with_decryption: bool,
}

/// A parameter as returned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRecord {
    /// Canonical identifier echoed by the store (the full ARN)
    pub identifier: String,
    pub value: String,
}

/// Response to a [`GetParametersRequest`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBatch {
    pub parameters: Vec<ParameterRecord>,
    /// Requested names the store did not recognise
    pub invalid: Vec<String>,
}

/// Payload of a single secret
#[derive(Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Text(String),
    Binary(Vec<u8>),
    /// The store returned neither a text nor a binary value
    Empty,
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretPayload::Text(_) => f.write_str("Text(***)"),
            SecretPayload::Binary(bytes) => write!(f, "Binary({} bytes)", bytes.len()),
            SecretPayload::Empty => f.write_str("Empty"),
        }
    }
}

/// Batched, optionally decrypted key/value store
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch one batch of parameters
    async fn get_parameters(&self, request: GetParametersRequest) -> Result<ParameterBatch>;
}

/// One-value-per-call secret store
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the current value of a secret
    async fn get_secret_value(&self, identifier: &str) -> Result<SecretPayload>;
}

/// Client handles for both stores
#[derive(Clone)]
pub struct StoreClients {
    pub parameters: Arc<dyn ParameterStore>,
    pub secrets: Arc<dyn SecretStore>,
}

/// Produces store clients from ambient configuration.
///
/// Only invoked when the environment actually contains placeholders.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn connect(&self) -> Result<StoreClients>;
}
