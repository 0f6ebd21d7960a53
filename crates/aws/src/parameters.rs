//! Parameter Store `GetParameters`

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::operation::get_parameters::GetParametersOutput;
use aws_sdk_ssm::Client;
use cloudenv_core::{Error, Result};
use cloudenv_env::parameters::STAGE;
use cloudenv_env::{GetParametersRequest, ParameterBatch, ParameterRecord, ParameterStore};

/// Parameter store backed by AWS Systems Manager
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    #[must_use]
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameters(&self, request: GetParametersRequest) -> Result<ParameterBatch> {
        let output = self
            .client
            .get_parameters()
            .set_names(Some(request.names))
            .with_decryption(request.with_decryption)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                Error::remote_call_with_source(STAGE, message, aws_sdk_ssm::Error::from(e))
            })?;

        into_batch(&output)
    }
}

fn into_batch(output: &GetParametersOutput) -> Result<ParameterBatch> {
    let mut batch = ParameterBatch {
        parameters: Vec::with_capacity(output.parameters().len()),
        invalid: output.invalid_parameters().to_vec(),
    };

    for parameter in output.parameters() {
        let name = parameter.name().unwrap_or("<unnamed>");
        let identifier = parameter
            .arn()
            .ok_or_else(|| Error::remote_call(STAGE, format!("parameter '{name}' returned without an ARN")))?;
        let value = parameter
            .value()
            .ok_or_else(|| Error::remote_call(STAGE, format!("parameter '{identifier}' returned without a value")))?;

        batch.parameters.push(ParameterRecord {
            identifier: identifier.to_owned(),
            value: value.to_owned(),
        });
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ssm::types::Parameter;

    const ARN: &str = "arn:aws:ssm:us-east-1:123456789012:parameter/foo";

    #[test]
    fn records_are_keyed_by_arn() {
        let output = GetParametersOutput::builder()
            .parameters(Parameter::builder().name("/foo").arn(ARN).value("bar").build())
            .build();

        let batch = into_batch(&output).unwrap();

        assert_eq!(
            batch.parameters,
            vec![ParameterRecord {
                identifier: ARN.to_string(),
                value: "bar".to_string(),
            }]
        );
        assert!(batch.invalid.is_empty());
    }

    #[test]
    fn invalid_names_are_carried_over() {
        let output = GetParametersOutput::builder()
            .invalid_parameters("/missing")
            .invalid_parameters("/other")
            .build();

        let batch = into_batch(&output).unwrap();

        assert_eq!(batch.invalid, vec!["/missing", "/other"]);
    }

    #[test]
    fn records_without_values_are_errors() {
        let output = GetParametersOutput::builder()
            .parameters(Parameter::builder().name("/foo").arn(ARN).build())
            .build();

        let err = into_batch(&output).unwrap_err();

        assert!(err.to_string().contains(ARN));
    }
}
