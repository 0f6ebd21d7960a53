//! Core error type definitions

/// Result type alias for cloudenv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error source carried by remote and configuration failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Core error type for cloudenv operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote store client configuration could not be obtained
    #[error("failed to load store configuration: {message}")]
    ConfigLoad {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The remote store (or local parsing) rejected one or more identifiers
    #[error("{reason}: {}", .identifiers.join(", "))]
    InvalidIdentifier {
        reason: String,
        identifiers: Vec<String>,
    },

    /// Transport or API failure talking to a remote store
    #[error("{stage}: {message}")]
    RemoteCall {
        stage: String,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A secret was fetched but could not be turned into a value
    #[error("secret '{identifier}': {message}")]
    SecretPayload { identifier: String, message: String },

    /// A placeholder survived resolution without a value
    #[error("no resolved value for '{identifier}' referenced by variable '{variable}'")]
    UnresolvedPlaceholder { variable: String, identifier: String },

    /// Locating or replacing the target program failed
    #[error("cannot exec '{program}': {message}")]
    ProcessReplace {
        program: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Broken internal invariants (worker panics, result count mismatches)
    #[error("internal error: {message}")]
    Internal { message: String },
}
