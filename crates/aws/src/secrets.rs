//! Secrets Manager `GetSecretValue`

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueOutput;
use aws_sdk_secretsmanager::Client;
use cloudenv_core::{Error, Result};
use cloudenv_env::secrets::STAGE;
use cloudenv_env::{SecretPayload, SecretStore};

/// Secret store backed by AWS Secrets Manager
#[derive(Debug, Clone)]
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn get_secret_value(&self, identifier: &str) -> Result<SecretPayload> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(identifier)
            .send()
            .await
            .map_err(|e| {
                let message = format!("'{identifier}': {}", DisplayErrorContext(&e));
                Error::remote_call_with_source(STAGE, message, aws_sdk_secretsmanager::Error::from(e))
            })?;

        Ok(payload_of(&output))
    }
}

fn payload_of(output: &GetSecretValueOutput) -> SecretPayload {
    if let Some(text) = output.secret_string() {
        SecretPayload::Text(text.to_owned())
    } else if let Some(binary) = output.secret_binary() {
        SecretPayload::Binary(binary.as_ref().to_vec())
    } else {
        SecretPayload::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::primitives::Blob;

    #[test]
    fn text_wins_over_binary() {
        let output = GetSecretValueOutput::builder()
            .secret_string("text")
            .secret_binary(Blob::new(b"bytes".to_vec()))
            .build();

        assert_eq!(payload_of(&output), SecretPayload::Text("text".to_string()));
    }

    #[test]
    fn binary_is_used_without_text() {
        let output = GetSecretValueOutput::builder()
            .secret_binary(Blob::new(b"bytes".to_vec()))
            .build();

        assert_eq!(payload_of(&output), SecretPayload::Binary(b"bytes".to_vec()));
    }

    #[test]
    fn neither_payload_is_empty() {
        let output = GetSecretValueOutput::builder().name("hollow").build();

        assert_eq!(payload_of(&output), SecretPayload::Empty);
    }
}
