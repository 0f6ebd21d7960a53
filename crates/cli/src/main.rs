use clap::Parser;
use cloudenv::{logging, Settings};
use cloudenv_aws::AwsStoreFactory;
use cloudenv_core::EnvironmentSnapshot;
use cloudenv_env::Launcher;
use eyre::WrapErr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let settings = Settings::parse();
    logging::init(&settings.log)?;

    let snapshot = EnvironmentSnapshot::capture();
    tracing::debug!(variables = snapshot.len(), "Captured environment");
    let launcher =
        Launcher::new(Arc::new(AwsStoreFactory::new())).with_concurrency(settings.concurrency);

    match launcher
        .launch(&snapshot, settings.program(), settings.args())
        .await
    {
        Ok(never) => match never {},
        Err(failure) => Err(failure).wrap_err_with(|| {
            format!(
                "cloudenv could not start '{}'",
                settings.program().to_string_lossy()
            )
        }),
    }
}
