//! Placeholder resolution engine for cloudenv.
//!
//! The pipeline is split the way a launch runs:
//!
//! - [`scanner`] finds `{aws-ssm}` / `{aws-sm}` placeholders in a snapshot
//! - [`parameters`] resolves parameter ARNs in sequential batches of ten
//! - [`secrets`] resolves secrets on a bounded, fail-fast worker pool
//! - [`substitute`] writes the resolved values back in snapshot order
//! - [`exec`] replaces the current process with the target program
//!
//! [`launch::Launcher`] ties them together against the store traits in
//! [`store`].

pub mod exec;
pub mod launch;
pub mod parameters;
pub mod scanner;
pub mod secrets;
pub mod store;
pub mod substitute;
pub mod tagging;
pub mod testing;

pub use launch::{LaunchFailure, LaunchStage, Launcher};
pub use store::{
    GetParametersRequest, ParameterBatch, ParameterRecord, ParameterStore, SecretPayload,
    SecretStore, StoreClients, StoreFactory,
};
