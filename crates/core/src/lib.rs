//! Core domain types, errors, and constants for `cloudenv`.
//!
//! - **`errors`**: The `Error` enum and `Result` alias shared by every crate
//!   in the workspace.
//! - **`types`**: The environment snapshot, placeholder classification and
//!   the redacted containers that hold resolved secret material.
//! - **`constants`**: Placeholder tags, store limits and variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{BoxError, Error, Result},
    types::*,
};
