//! Batched parameter resolution
//!
//! Identifiers are full parameter ARNs
//! (`arn:aws:ssm:us-east-1:123456789012:parameter/app/db`). The store is
//! queried with the resource path only (`/app/db`) while the result map is
//! keyed by the ARN the store echoes back.

use crate::store::{GetParametersRequest, ParameterStore};
use cloudenv_core::{
    Error, ResolvedValues, Result, SecretValue, MAX_PARAMETER_BATCH, PARAMETER_ARN_FIELDS,
    PARAMETER_RESOURCE_TYPE,
};
use std::collections::BTreeSet;

/// Stage name attached to remote failures
pub const STAGE: &str = "getting parameters";

/// Derive the plain lookup name from a parameter ARN.
///
/// Returns `None` unless the ARN has six fields and a `parameter/...` resource.
#[must_use]
pub fn lookup_name(arn: &str) -> Option<&str> {
    let resource = arn.splitn(PARAMETER_ARN_FIELDS, ':').nth(PARAMETER_ARN_FIELDS - 1)?;
    resource
        .strip_prefix(PARAMETER_RESOURCE_TYPE)
        .filter(|name| name.starts_with('/'))
}

/// Resolve every identifier through sequential batch requests.
///
/// Chunks hold at most [`MAX_PARAMETER_BATCH`] names and are sent strictly one
/// after another. The first chunk with invalid names stops the run.
pub async fn resolve_parameters(
    store: &dyn ParameterStore,
    identifiers: &BTreeSet<String>,
) -> Result<ResolvedValues> {
    let mut lookups = Vec::with_capacity(identifiers.len());
    let mut malformed = Vec::new();
    for identifier in identifiers {
        match lookup_name(identifier) {
            Some(name) => lookups.push((identifier.as_str(), name)),
            None => malformed.push(identifier.clone()),
        }
    }
    if !malformed.is_empty() {
        return Err(Error::invalid_identifiers("malformed parameter ARNs", malformed));
    }

    let mut resolved = ResolvedValues::with_capacity(lookups.len());

    for (index, chunk) in lookups.chunks(MAX_PARAMETER_BATCH).enumerate() {
        tracing::debug!(chunk = index, size = chunk.len(), "Requesting parameter batch");

        let request = GetParametersRequest {
            names: chunk.iter().map(|(_, name)| (*name).to_owned()).collect(),
            with_decryption: true,
        };
        let batch = store
            .get_parameters(request)
            .await
            .map_err(|e| e.in_stage(STAGE))?;

        if !batch.invalid.is_empty() {
            // Report the identifiers as the operator wrote them when we can
            let rejected = batch.invalid.iter().map(|name| {
                chunk
                    .iter()
                    .find(|(_, lookup)| lookup == name)
                    .map_or_else(|| name.clone(), |(identifier, _)| (*identifier).to_owned())
            });
            return Err(Error::invalid_identifiers("invalid parameters", rejected));
        }

        for record in batch.parameters {
            resolved.insert(record.identifier, SecretValue::from_text(record.value));
        }
    }

    tracing::debug!(resolved = resolved.len(), "Resolved parameters");
    Ok(resolved)
}
