//! Error types for cloudenv operations

mod builders;
mod types;

pub use types::{BoxError, Error, Result};
