//! Core domain types for the `cloudenv` launch pipeline.
//!
//! ## Organization
//!
//! - **`environment`**: Environment snapshot and the resolved environment
//! - **`placeholder`**: Tag classification of environment values
//! - **`security`**: Redacted, zeroizing containers for resolved material

pub mod environment;
pub mod placeholder;
pub mod security;

// Re-export all public types for convenient access
pub use environment::*;
pub use placeholder::*;
pub use security::*;
