//! In-memory store implementations for tests
//!
//! These record every call so tests can assert on batching, concurrency and
//! cancellation without talking to a real store.

use crate::parameters::{self, lookup_name};
use crate::secrets;
use crate::store::{
    GetParametersRequest, ParameterBatch, ParameterRecord, ParameterStore, SecretPayload,
    SecretStore, StoreClients, StoreFactory,
};
use async_trait::async_trait;
use cloudenv_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Parameter store backed by a map from lookup name to `(arn, value)`
#[derive(Default)]
pub struct MemoryParameterStore {
    records: HashMap<String, (String, String)>,
    failure: Option<String>,
    requests: Mutex<Vec<GetParametersRequest>>,
}

impl MemoryParameterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter addressed by its ARN
    #[must_use]
    pub fn with_parameter(self, arn: &str, value: impl Into<String>) -> Self {
        let name = lookup_name(arn).unwrap_or(arn).to_owned();
        self.with_record(&name, arn, value)
    }

    /// Add a parameter whose echoed identifier differs from the request
    #[must_use]
    pub fn with_record(mut self, name: &str, identifier: &str, value: impl Into<String>) -> Self {
        self.records
            .insert(name.to_owned(), (identifier.to_owned(), value.into()));
        self
    }

    /// Fail every request with a remote error
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Every request received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<GetParametersRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get_parameters(&self, request: GetParametersRequest) -> Result<ParameterBatch> {
        self.requests.lock().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(Error::remote_call(parameters::STAGE, message.clone()));
        }

        let mut batch = ParameterBatch::default();
        for name in request.names {
            match self.records.get(&name) {
                Some((identifier, value)) => batch.parameters.push(ParameterRecord {
                    identifier: identifier.clone(),
                    value: value.clone(),
                }),
                None => batch.invalid.push(name),
            }
        }
        Ok(batch)
    }
}

/// Secret store backed by a map, with optional latency and failures
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, SecretPayload>,
    failures: HashSet<String>,
    delay: Duration,
    calls: AtomicUsize,
    completed: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(mut self, identifier: &str, value: impl Into<String>) -> Self {
        self.secrets
            .insert(identifier.to_owned(), SecretPayload::Text(value.into()));
        self
    }

    #[must_use]
    pub fn with_binary(mut self, identifier: &str, value: impl Into<Vec<u8>>) -> Self {
        self.secrets
            .insert(identifier.to_owned(), SecretPayload::Binary(value.into()));
        self
    }

    /// A secret that exists but carries no payload
    #[must_use]
    pub fn with_empty(mut self, identifier: &str) -> Self {
        self.secrets
            .insert(identifier.to_owned(), SecretPayload::Empty);
        self
    }

    /// Fail immediately when this identifier is requested
    #[must_use]
    pub fn with_failure(mut self, identifier: &str) -> Self {
        self.failures.insert(identifier.to_owned());
        self
    }

    /// Latency applied to every successful call
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Calls started
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that ran to completion (not cancelled mid-flight)
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed in flight at once
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret_value(&self, identifier: &str) -> Result<SecretPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failures.contains(identifier) {
            return Err(Error::remote_call(
                secrets::STAGE,
                format!("access denied for '{identifier}'"),
            ));
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        self.secrets.get(identifier).cloned().ok_or_else(|| {
            Error::remote_call(secrets::STAGE, format!("secret '{identifier}' not found"))
        })
    }
}

/// Factory handing out fixed clients and counting connections
pub struct MemoryStoreFactory {
    clients: StoreClients,
    failure: Option<String>,
    connects: AtomicUsize,
}

impl MemoryStoreFactory {
    #[must_use]
    pub fn new(parameters: Arc<dyn ParameterStore>, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            clients: StoreClients {
                parameters,
                secrets,
            },
            failure: None,
            connects: AtomicUsize::new(0),
        }
    }

    /// Fail every connection attempt
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    #[must_use]
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    async fn connect(&self) -> Result<StoreClients> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(Error::config_load(message.clone())),
            None => Ok(self.clients.clone()),
        }
    }
}
