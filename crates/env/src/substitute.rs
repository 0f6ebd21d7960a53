//! Substitution of resolved values back into the environment

use cloudenv_core::{
    EnvironmentSnapshot, Error, Placeholder, PlaceholderKind, ResolvedEnvironment, ResolvedValues,
    Result,
};

/// Build the final environment in snapshot order.
///
/// Placeholders are replaced by the value resolved for their identifier;
/// everything else is copied unchanged. The output has exactly the names of
/// the snapshot.
pub fn substitute(
    snapshot: &EnvironmentSnapshot,
    parameters: &ResolvedValues,
    secrets: &ResolvedValues,
) -> Result<ResolvedEnvironment> {
    let mut env = ResolvedEnvironment::with_capacity(snapshot.len());

    for (name, value) in snapshot.iter() {
        let Some(placeholder) = Placeholder::classify(value) else {
            env.push(name, value);
            continue;
        };

        let resolved = match placeholder.kind {
            PlaceholderKind::Parameter => parameters,
            PlaceholderKind::Secret => secrets,
        };
        let secret = resolved.get(placeholder.identifier).ok_or_else(|| {
            Error::unresolved_placeholder(name.to_string_lossy(), placeholder.identifier)
        })?;
        let value = secret.to_os_string().ok_or_else(|| {
            Error::secret_payload(
                placeholder.identifier,
                "value is not valid UTF-8 and cannot be placed in this platform's environment",
            )
        })?;

        tracing::debug!(variable = %name.to_string_lossy(), kind = %placeholder.kind, "Substituted placeholder");
        env.push(name, value);
    }

    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudenv_core::SecretValue;
    use std::ffi::OsStr;

    const PARAM_ARN: &str = "arn:aws:ssm:us-east-1:123456789012:parameter/foo";

    fn values(pairs: &[(&str, &str)]) -> ResolvedValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), SecretValue::from_text(*v)))
            .collect()
    }

    #[test]
    fn replaces_placeholders_and_keeps_the_rest() {
        let snapshot = EnvironmentSnapshot::from_entries([
            "HELLO=world".to_string(),
            "MY_SECRET={aws-sm}secret-1".to_string(),
            format!("PARAM_X={{aws-ssm}}{PARAM_ARN}"),
        ]);

        let env = substitute(
            &snapshot,
            &values(&[(PARAM_ARN, "param-value")]),
            &values(&[("secret-1", "s3cr3t")]),
        )
        .unwrap();

        assert_eq!(env.get("HELLO"), Some(OsStr::new("world")));
        assert_eq!(env.get("MY_SECRET"), Some(OsStr::new("s3cr3t")));
        assert_eq!(env.get("PARAM_X"), Some(OsStr::new("param-value")));
    }

    #[test]
    fn preserves_snapshot_order_and_names() {
        let snapshot = EnvironmentSnapshot::from_entries(["Z=1", "A={aws-sm}s", "M=3"]);

        let env = substitute(&snapshot, &ResolvedValues::new(), &values(&[("s", "v")])).unwrap();

        let names: Vec<_> = env.iter().map(|(k, _)| k.to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn one_identifier_fills_every_variable_that_references_it() {
        let snapshot = EnvironmentSnapshot::from_entries(["A={aws-sm}shared", "B={aws-sm}shared"]);

        let env = substitute(&snapshot, &ResolvedValues::new(), &values(&[("shared", "x")])).unwrap();

        assert_eq!(env.get("A"), Some(OsStr::new("x")));
        assert_eq!(env.get("B"), Some(OsStr::new("x")));
    }

    #[test]
    fn stores_are_not_confused() {
        // Same identifier text in both maps must come from the matching store
        let snapshot = EnvironmentSnapshot::from_entries(["A={aws-sm}id", "B={aws-ssm}id"]);

        let env = substitute(&snapshot, &values(&[("id", "from-ssm")]), &values(&[("id", "from-sm")]))
            .unwrap();

        assert_eq!(env.get("A"), Some(OsStr::new("from-sm")));
        assert_eq!(env.get("B"), Some(OsStr::new("from-ssm")));
    }

    #[test]
    fn missing_resolution_is_fatal() {
        let snapshot = EnvironmentSnapshot::from_entries(["DB={aws-sm}db"]);

        let err = substitute(&snapshot, &ResolvedValues::new(), &ResolvedValues::new()).unwrap_err();

        match err {
            Error::UnresolvedPlaceholder { variable, identifier } => {
                assert_eq!(variable, "DB");
                assert_eq!(identifier, "db");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
