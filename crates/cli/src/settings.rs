//! Command-line and environment configuration

use clap::Parser;
use cloudenv_core::{
    CLOUDENV_CONCURRENCY_VAR, CLOUDENV_LOG_VAR, DEFAULT_LOG_FILTER, DEFAULT_SECRET_CONCURRENCY,
};
use std::ffi::{OsStr, OsString};

/// Resolve AWS placeholders in the environment, then exec a program
#[derive(Debug, Clone, Parser)]
#[command(name = "cloudenv", version)]
#[command(
    about = "Resolve {aws-ssm} and {aws-sm} placeholders in the environment, then exec a program",
    long_about = None
)]
pub struct Settings {
    /// Number of secrets fetched concurrently
    #[arg(
        long,
        env = CLOUDENV_CONCURRENCY_VAR,
        default_value_t = DEFAULT_SECRET_CONCURRENCY,
        value_parser = parse_concurrency
    )]
    pub concurrency: usize,

    /// Log filter directive (e.g. `debug`, `cloudenv_env=trace`)
    #[arg(long, env = CLOUDENV_LOG_VAR, default_value = DEFAULT_LOG_FILTER)]
    pub log: String,

    /// Program to run, followed by its arguments
    #[arg(
        required = true,
        value_name = "PROGRAM",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

impl Settings {
    /// The program to exec
    #[must_use]
    pub fn program(&self) -> &OsStr {
        self.command.first().map_or(OsStr::new(""), OsString::as_os_str)
    }

    /// Arguments after the program name
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        self.command.get(1..).unwrap_or_default()
    }
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
