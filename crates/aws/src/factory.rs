//! Store clients from the ambient AWS configuration

use crate::parameters::SsmParameterStore;
use crate::secrets::SecretsManagerStore;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use cloudenv_core::{Error, Result};
use cloudenv_env::{StoreClients, StoreFactory};
use std::sync::Arc;

/// Builds Parameter Store and Secrets Manager clients from the default
/// credential and region chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsStoreFactory;

impl AwsStoreFactory {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StoreFactory for AwsStoreFactory {
    async fn connect(&self) -> Result<StoreClients> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let Some(region) = config.region() else {
            return Err(Error::config_load(
                "no AWS region configured (set AWS_REGION or a profile region)",
            ));
        };
        tracing::debug!(region = %region, "Loaded AWS configuration");

        Ok(StoreClients {
            parameters: Arc::new(SsmParameterStore::new(&config)),
            secrets: Arc::new(SecretsManagerStore::new(&config)),
        })
    }
}
