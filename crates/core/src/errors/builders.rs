//! Helper constructors for error values

use super::types::{BoxError, Error};

impl Error {
    /// Create a configuration loading error
    #[must_use]
    pub fn config_load(message: impl Into<String>) -> Self {
        Error::ConfigLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration loading error with a source error
    #[must_use]
    pub fn config_load_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::ConfigLoad {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an invalid identifier error listing every rejected identifier
    #[must_use]
    pub fn invalid_identifiers<I, S>(reason: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::InvalidIdentifier {
            reason: reason.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a remote call error for the given stage
    #[must_use]
    pub fn remote_call(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteCall {
            stage: stage.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a remote call error that keeps the underlying transport error
    #[must_use]
    pub fn remote_call_with_source(
        stage: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::RemoteCall {
            stage: stage.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a secret payload error
    #[must_use]
    pub fn secret_payload(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SecretPayload {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create an unresolved placeholder error
    #[must_use]
    pub fn unresolved_placeholder(variable: impl Into<String>, identifier: impl Into<String>) -> Self {
        Error::UnresolvedPlaceholder {
            variable: variable.into(),
            identifier: identifier.into(),
        }
    }

    /// Create a process replacement error
    #[must_use]
    pub fn process_replace(
        program: impl Into<String>,
        message: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        Error::ProcessReplace {
            program: program.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Wrap this error with the stage it occurred in, keeping the original as the source.
    ///
    /// Errors that already carry a stage are returned unchanged.
    #[must_use]
    pub fn in_stage(self, stage: impl Into<String>) -> Self {
        match self {
            Error::RemoteCall { .. } => self,
            other => Error::RemoteCall {
                stage: stage.into(),
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
