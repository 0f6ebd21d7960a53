//! Turning `NAME=ARN` pairs into placeholders and the access policy they need

use cloudenv_core::{Error, PlaceholderKind, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// One IAM policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub effect: &'static str,
    pub action: &'static str,
    pub resource: Vec<String>,
}

/// Placeholder variables plus the statements that allow resolving them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaggedEnvironment {
    pub variables: IndexMap<String, String>,
    pub policies: Vec<PolicyStatement>,
}

fn action(kind: PlaceholderKind) -> &'static str {
    match kind {
        PlaceholderKind::Parameter => "ssm:GetParameters",
        PlaceholderKind::Secret => "secretsmanager:GetSecretValue",
    }
}

/// Tag each ARN with the placeholder for its service.
///
/// Fails on the first ARN that is neither a parameter nor a secret.
pub fn tag_resources<I, K, V>(resources: I) -> Result<TaggedEnvironment>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    let mut tagged = TaggedEnvironment::default();
    let mut parameters = BTreeSet::new();
    let mut secrets = BTreeSet::new();

    for (name, arn) in resources {
        let arn = arn.as_ref();
        let kind = PlaceholderKind::from_arn(arn)?;
        match kind {
            PlaceholderKind::Parameter => parameters.insert(arn.to_owned()),
            PlaceholderKind::Secret => secrets.insert(arn.to_owned()),
        };
        tagged.variables.insert(name.into(), kind.render(arn));
    }

    for (kind, arns) in [
        (PlaceholderKind::Parameter, parameters),
        (PlaceholderKind::Secret, secrets),
    ] {
        if !arns.is_empty() {
            tagged.policies.push(PolicyStatement {
                effect: "Allow",
                action: action(kind),
                resource: arns.into_iter().collect(),
            });
        }
    }

    Ok(tagged)
}

/// Parse `NAME=ARN` arguments
pub fn parse_assignments<I, S>(assignments: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    assignments
        .into_iter()
        .map(|assignment| {
            let assignment = assignment.as_ref();
            match assignment.split_once('=') {
                Some((name, arn)) if !name.is_empty() && !arn.is_empty() => {
                    Ok((name.to_owned(), arn.to_owned()))
                }
                _ => Err(Error::configuration(format!(
                    "expected NAME=ARN, got '{assignment}'"
                ))),
            }
        })
        .collect()
}
