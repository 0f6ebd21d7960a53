//! The launch pipeline
//!
//! `Scanning → Connecting → ResolvingParameters → ResolvingSecrets →
//! Substituting → Replacing`. Every failure aborts the run and is reported
//! together with the stage it happened in.

use crate::exec::replace_process;
use crate::parameters::resolve_parameters;
use crate::scanner::scan;
use crate::secrets::resolve_secrets;
use crate::store::StoreFactory;
use crate::substitute::substitute;
use cloudenv_core::{
    EnvironmentSnapshot, Error, ResolvedEnvironment, ResolvedValues, DEFAULT_SECRET_CONCURRENCY,
};
use std::convert::Infallible;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Where in the pipeline a launch is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Scanning,
    Connecting,
    ResolvingParameters,
    ResolvingSecrets,
    Substituting,
    Replacing,
}

impl fmt::Display for LaunchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchStage::Scanning => "scanning environment",
            LaunchStage::Connecting => "loading store configuration",
            LaunchStage::ResolvingParameters => "resolving parameters",
            LaunchStage::ResolvingSecrets => "resolving secrets",
            LaunchStage::Substituting => "substituting values",
            LaunchStage::Replacing => "replacing process",
        };
        f.write_str(name)
    }
}

/// A launch that was aborted
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed")]
pub struct LaunchFailure {
    pub stage: LaunchStage,
    #[source]
    pub source: Error,
}

fn at(stage: LaunchStage) -> impl FnOnce(Error) -> LaunchFailure {
    move |source| LaunchFailure { stage, source }
}

/// Resolves placeholders and hands control to the target program
pub struct Launcher {
    factory: Arc<dyn StoreFactory>,
    concurrency: usize,
}

impl Launcher {
    /// Create a launcher using the default secret worker count
    #[must_use]
    pub fn new(factory: Arc<dyn StoreFactory>) -> Self {
        Self {
            factory,
            concurrency: DEFAULT_SECRET_CONCURRENCY,
        }
    }

    /// Set the number of concurrent secret workers
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Resolve every placeholder in `snapshot`.
    ///
    /// The store factory is only consulted when there is something to resolve.
    pub async fn prepare(
        &self,
        snapshot: &EnvironmentSnapshot,
    ) -> Result<ResolvedEnvironment, LaunchFailure> {
        let found = tracing::info_span!("scanning").in_scope(|| scan(snapshot));

        let (parameters, secrets) = if found.is_empty() {
            tracing::debug!("No placeholders found, skipping store configuration");
            (ResolvedValues::new(), ResolvedValues::new())
        } else {
            let clients = self
                .factory
                .connect()
                .instrument(tracing::info_span!("connecting"))
                .await
                .map_err(at(LaunchStage::Connecting))?;

            let parameters = resolve_parameters(clients.parameters.as_ref(), &found.parameters)
                .instrument(tracing::info_span!("resolving_parameters", count = found.parameters.len()))
                .await
                .map_err(at(LaunchStage::ResolvingParameters))?;

            let secrets = resolve_secrets(Arc::clone(&clients.secrets), &found.secrets, self.concurrency)
                .instrument(tracing::info_span!(
                    "resolving_secrets",
                    count = found.secrets.len(),
                    concurrency = self.concurrency
                ))
                .await
                .map_err(at(LaunchStage::ResolvingSecrets))?;

            (parameters, secrets)
        };

        tracing::info_span!("substituting")
            .in_scope(|| substitute(snapshot, &parameters, &secrets))
            .map_err(at(LaunchStage::Substituting))
    }

    /// Resolve `snapshot` and replace the current process with `program`.
    ///
    /// Returns only on failure.
    pub async fn launch(
        &self,
        snapshot: &EnvironmentSnapshot,
        program: &OsStr,
        args: &[OsString],
    ) -> Result<Infallible, LaunchFailure> {
        let env = self.prepare(snapshot).await?;
        tracing::info_span!("replacing")
            .in_scope(|| replace_process(program, args, &env))
            .map_err(at(LaunchStage::Replacing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryParameterStore, MemorySecretStore, MemoryStoreFactory};

    #[tokio::test]
    async fn config_failures_report_the_connecting_stage() {
        let factory = MemoryStoreFactory::new(
            Arc::new(MemoryParameterStore::new()),
            Arc::new(MemorySecretStore::new()),
        )
        .failing("no region configured");
        let launcher = Launcher::new(Arc::new(factory));
        let snapshot = EnvironmentSnapshot::from_entries(["S={aws-sm}s"]);

        let failure = launcher.prepare(&snapshot).await.unwrap_err();

        assert_eq!(failure.stage, LaunchStage::Connecting);
        assert!(matches!(failure.source, Error::ConfigLoad { .. }));
        assert_eq!(failure.to_string(), "loading store configuration failed");
    }

    #[tokio::test]
    async fn parameter_failures_stop_before_secrets() {
        let secrets = Arc::new(MemorySecretStore::new().with_text("s", "v"));
        let factory = MemoryStoreFactory::new(
            Arc::new(MemoryParameterStore::new().failing("denied")),
            secrets.clone(),
        );
        let launcher = Launcher::new(Arc::new(factory));
        let snapshot = EnvironmentSnapshot::from_entries([
            "S={aws-sm}s",
            "P={aws-ssm}arn:aws:ssm:us-east-1:1:parameter/p",
        ]);

        let failure = launcher.prepare(&snapshot).await.unwrap_err();

        assert_eq!(failure.stage, LaunchStage::ResolvingParameters);
        assert_eq!(secrets.calls(), 0);
    }

    #[tokio::test]
    async fn replacement_failures_report_the_replacing_stage() {
        let factory = MemoryStoreFactory::new(
            Arc::new(MemoryParameterStore::new()),
            Arc::new(MemorySecretStore::new()),
        );
        let launcher = Launcher::new(Arc::new(factory));
        let snapshot = EnvironmentSnapshot::from_entries(["HELLO=world"]);

        let failure = launcher
            .launch(&snapshot, OsStr::new("/nonexistent-cloudenv-dir/app"), &[])
            .await
            .unwrap_err();

        assert_eq!(failure.stage, LaunchStage::Replacing);
        assert!(matches!(failure.source, Error::ProcessReplace { .. }));
    }
}
