//! The `cloudenv` command-line front end.

pub mod logging;
pub mod settings;

pub use settings::Settings;
