//! Placeholder classification for environment values

use crate::constants::{PARAMETER_TAG, SECRET_TAG};
use crate::errors::{Error, Result};
use std::ffi::OsStr;
use std::fmt;

/// Which remote store a placeholder is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// Parameter store, resolved in batches
    Parameter,
    /// Secret store, resolved one value per call
    Secret,
}

impl PlaceholderKind {
    /// The literal tag that marks a value of this kind
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            PlaceholderKind::Parameter => PARAMETER_TAG,
            PlaceholderKind::Secret => SECRET_TAG,
        }
    }

    /// Pick the kind from the service field of an ARN
    /// (`arn:partition:<service>:...`).
    pub fn from_arn(arn: &str) -> Result<Self> {
        match arn.split(':').nth(2) {
            Some("ssm") => Ok(PlaceholderKind::Parameter),
            Some("secretsmanager") => Ok(PlaceholderKind::Secret),
            _ => Err(Error::invalid_identifiers(
                "unsupported resource (expected an ssm or secretsmanager ARN)",
                [arn],
            )),
        }
    }

    /// Build the placeholder value for an identifier
    #[must_use]
    pub fn render(self, identifier: &str) -> String {
        format!("{}{identifier}", self.tag())
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderKind::Parameter => f.write_str("parameter"),
            PlaceholderKind::Secret => f.write_str("secret"),
        }
    }
}

/// A tagged environment value borrowed from the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: PlaceholderKind,
    pub identifier: &'a str,
}

impl<'a> Placeholder<'a> {
    /// Classify a raw value.
    ///
    /// Matching is on the exact, case-sensitive tag at the very start of the
    /// value. The identifier is everything after the tag, untouched. Values
    /// that are not valid UTF-8 are never placeholders.
    #[must_use]
    pub fn classify(value: &'a OsStr) -> Option<Self> {
        Self::classify_str(value.to_str()?)
    }

    /// Classify a raw value that is already a `str`
    #[must_use]
    pub fn classify_str(value: &'a str) -> Option<Self> {
        if let Some(identifier) = value.strip_prefix(PARAMETER_TAG) {
            Some(Self {
                kind: PlaceholderKind::Parameter,
                identifier,
            })
        } else {
            value.strip_prefix(SECRET_TAG).map(|identifier| Self {
                kind: PlaceholderKind::Secret,
                identifier,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_parameter_tag() {
        let p = Placeholder::classify_str("{aws-ssm}arn:aws:ssm:us-east-1:1:parameter/x").unwrap();
        assert_eq!(p.kind, PlaceholderKind::Parameter);
        assert_eq!(p.identifier, "arn:aws:ssm:us-east-1:1:parameter/x");
    }

    #[test]
    fn classifies_secret_tag() {
        let p = Placeholder::classify_str("{aws-sm}secret-1").unwrap();
        assert_eq!(p.kind, PlaceholderKind::Secret);
        assert_eq!(p.identifier, "secret-1");
    }

    #[test]
    fn tags_are_exact_and_case_sensitive() {
        assert!(Placeholder::classify_str("{AWS-SM}secret").is_none());
        assert!(Placeholder::classify_str(" {aws-sm}secret").is_none());
        assert!(Placeholder::classify_str("prefix{aws-ssm}x").is_none());
        assert!(Placeholder::classify_str("plain").is_none());
    }

    #[test]
    fn identifier_is_not_trimmed() {
        let p = Placeholder::classify_str("{aws-sm} padded ").unwrap();
        assert_eq!(p.identifier, " padded ");
    }

    #[test]
    fn empty_identifier_is_still_a_placeholder() {
        let p = Placeholder::classify_str("{aws-sm}").unwrap();
        assert_eq!(p.identifier, "");
    }

    #[test]
    fn kind_from_arn_service() {
        assert_eq!(
            PlaceholderKind::from_arn("arn:aws:ssm:eu-west-1:1:parameter/db").unwrap(),
            PlaceholderKind::Parameter
        );
        assert_eq!(
            PlaceholderKind::from_arn("arn:aws:secretsmanager:eu-west-1:1:secret:db").unwrap(),
            PlaceholderKind::Secret
        );
        assert!(PlaceholderKind::from_arn("arn:aws:s3:::bucket").is_err());
        assert!(PlaceholderKind::from_arn("not-an-arn").is_err());
    }

    #[test]
    fn render_round_trips_through_classify() {
        let value = PlaceholderKind::Secret.render("db-password");
        assert_eq!(value, "{aws-sm}db-password");
        let p = Placeholder::classify_str(&value).unwrap();
        assert_eq!(p.kind, PlaceholderKind::Secret);
        assert_eq!(p.identifier, "db-password");
    }
}
