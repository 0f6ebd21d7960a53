//! Concurrent secret resolution
//!
//! A fixed pool of workers drains a closed, pre-filled work queue. Each
//! identifier yields exactly one record on a results channel sized to the
//! identifier count, or an error. The first error cancels every sibling and
//! is the only thing returned.

use crate::store::{SecretPayload, SecretStore};
use cloudenv_core::{Error, ResolvedValues, Result, SecretValue};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Stage name attached to remote failures
pub const STAGE: &str = "getting secrets";

type WorkQueue = Arc<Mutex<mpsc::Receiver<String>>>;

struct SecretRecord {
    identifier: String,
    value: SecretValue,
}

/// Resolve every identifier with at most `concurrency` calls in flight.
///
/// Resolution order is unspecified. On failure nothing resolved so far is
/// returned.
pub async fn resolve_secrets(
    store: Arc<dyn SecretStore>,
    identifiers: &BTreeSet<String>,
    concurrency: usize,
) -> Result<ResolvedValues> {
    if concurrency == 0 {
        return Err(Error::configuration("secret concurrency must be at least 1"));
    }
    let total = identifiers.len();
    if total == 0 {
        return Ok(ResolvedValues::new());
    }

    let (work_tx, work_rx) = mpsc::channel(total);
    for identifier in identifiers {
        work_tx
            .try_send(identifier.clone())
            .map_err(|e| Error::internal(format!("failed to queue secret: {e}")))?;
    }
    // Closing the queue lets idle workers exit once it is drained
    drop(work_tx);
    let queue: WorkQueue = Arc::new(Mutex::new(work_rx));

    let (result_tx, mut result_rx) = mpsc::channel(total);
    let cancel = CancellationToken::new();
    let mut workers = JoinSet::new();

    let pool = concurrency.min(total);
    tracing::debug!(secrets = total, workers = pool, "Starting secret workers");

    for worker in 0..pool {
        workers.spawn(
            run_worker(
                Arc::clone(&store),
                Arc::clone(&queue),
                result_tx.clone(),
                cancel.clone(),
            )
            .instrument(tracing::debug_span!("secret_worker", worker)),
        );
    }
    drop(result_tx);

    while let Some(joined) = workers.join_next().await {
        let outcome = joined
            .map_err(|e| Error::internal(format!("secret worker failed: {e}")))
            .and_then(|result| result);
        if let Err(e) = outcome {
            cancel.cancel();
            workers.abort_all();
            return Err(e.in_stage(STAGE));
        }
    }

    let mut resolved = ResolvedValues::with_capacity(total);
    for _ in 0..total {
        let record = result_rx.recv().await.ok_or_else(|| {
            Error::internal("secret workers finished without a result for every secret")
        })?;
        resolved.insert(record.identifier, record.value);
    }

    tracing::debug!(resolved = resolved.len(), "Resolved secrets");
    Ok(resolved)
}

async fn run_worker(
    store: Arc<dyn SecretStore>,
    queue: WorkQueue,
    results: mpsc::Sender<SecretRecord>,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            next = async { queue.lock().await.recv().await } => next,
        };
        let Some(identifier) = next else {
            return Ok(());
        };

        tracing::debug!(identifier = %identifier, "Fetching secret");
        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            fetched = store.get_secret_value(&identifier) => fetched,
        };

        let value = match fetched.and_then(|payload| into_value(&identifier, payload)) {
            Ok(value) => value,
            Err(e) => {
                cancel.cancel();
                return Err(e);
            }
        };

        results
            .send(SecretRecord { identifier, value })
            .await
            .map_err(|_| Error::internal("secret result channel closed"))?;
    }
}

/// Prefer the textual payload, fall back to the binary one.
fn into_value(identifier: &str, payload: SecretPayload) -> Result<SecretValue> {
    match payload {
        SecretPayload::Text(text) => Ok(SecretValue::from_text(text)),
        SecretPayload::Binary(bytes) => Ok(SecretValue::from_bytes(bytes)),
        SecretPayload::Empty => Err(Error::secret_payload(
            identifier,
            "store returned neither a string nor a binary value",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySecretStore;
    use std::time::{Duration, Instant};

    fn identifiers(count: usize) -> BTreeSet<String> {
        (0..count).map(|i| format!("secret-{i:02}")).collect()
    }

    fn store_with(count: usize) -> MemorySecretStore {
        (0..count).fold(MemorySecretStore::new(), |store, i| {
            store.with_text(&format!("secret-{i:02}"), format!("value-{i}"))
        })
    }

    #[tokio::test]
    async fn resolves_every_identifier() {
        let store = Arc::new(store_with(12));

        let resolved = resolve_secrets(store.clone(), &identifiers(12), 5).await.unwrap();

        assert_eq!(resolved.len(), 12);
        assert_eq!(resolved["secret-03"].as_bytes(), b"value-3");
        assert_eq!(store.calls(), 12);
    }

    #[tokio::test]
    async fn worker_count_does_not_change_the_result() {
        let ids = identifiers(8);
        let mut results = Vec::new();
        for workers in [1, 2, 8] {
            let store = Arc::new(store_with(8));
            results.push(resolve_secrets(store, &ids, workers).await.unwrap());
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }

    #[tokio::test]
    async fn never_exceeds_the_worker_count() {
        let store = Arc::new(store_with(10).with_delay(Duration::from_millis(20)));

        resolve_secrets(store.clone(), &identifiers(10), 3).await.unwrap();

        assert!(store.max_in_flight() <= 3);
        assert!(store.max_in_flight() >= 2);
    }

    #[tokio::test]
    async fn binary_payload_is_used_when_there_is_no_text() {
        let store = Arc::new(MemorySecretStore::new().with_binary("bin", b"raw-bytes".to_vec()));

        let resolved = resolve_secrets(store, &["bin".to_string()].into(), 5).await.unwrap();

        assert_eq!(resolved["bin"].as_bytes(), b"raw-bytes");
    }

    #[tokio::test]
    async fn empty_payload_is_an_error_not_a_hang() {
        let store = Arc::new(store_with(3).with_empty("hollow"));
        let mut ids = identifiers(3);
        ids.insert("hollow".to_string());

        let err = tokio::time::timeout(Duration::from_secs(5), resolve_secrets(store, &ids, 2))
            .await
            .expect("resolution must not block")
            .unwrap_err();

        assert!(err.to_string().contains("hollow"));
        assert!(err.to_string().starts_with(STAGE));
    }

    #[tokio::test]
    async fn first_failure_cancels_the_rest() {
        let store = Arc::new(
            store_with(10)
                .with_failure("a-broken")
                .with_delay(Duration::from_millis(500)),
        );
        let mut ids = identifiers(10);
        ids.insert("a-broken".to_string());

        let started = Instant::now();
        let err = resolve_secrets(store.clone(), &ids, 2).await.unwrap_err();

        assert!(matches!(err, Error::RemoteCall { .. }));
        assert!(err.to_string().contains("a-broken"));
        assert!(started.elapsed() < Duration::from_millis(450));
        assert!(store.calls() < ids.len());
        assert_eq!(store.completed(), 0);
    }

    #[tokio::test]
    async fn zero_concurrency_is_rejected() {
        let store = Arc::new(store_with(1));
        let err = resolve_secrets(store, &identifiers(1), 0).await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn empty_set_makes_no_calls() {
        let store = Arc::new(MemorySecretStore::new());
        let resolved = resolve_secrets(store.clone(), &BTreeSet::new(), 5).await.unwrap();
        assert!(resolved.is_empty());
        assert_eq!(store.calls(), 0);
    }
}
