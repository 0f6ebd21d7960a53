//! AWS implementations of the cloudenv store traits.
//!
//! [`AwsStoreFactory`] loads the ambient AWS configuration (environment,
//! profiles, container and instance credentials) and hands out clients for
//! Parameter Store and Secrets Manager.

mod factory;
mod parameters;
mod secrets;

pub use factory::AwsStoreFactory;
pub use parameters::SsmParameterStore;
pub use secrets::SecretsManagerStore;
