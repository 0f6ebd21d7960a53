//! Environment scanning and placeholder classification

use cloudenv_core::{EnvironmentSnapshot, Placeholder, PlaceholderKind};
use std::collections::BTreeSet;

/// Unique identifiers found in one snapshot, split by store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Parameter identifiers, in sorted order so chunking is deterministic
    pub parameters: BTreeSet<String>,
    pub secrets: BTreeSet<String>,
}

impl ScanResult {
    /// True when nothing needs remote resolution
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.secrets.is_empty()
    }
}

/// Collect the deduplicated placeholder identifiers of a snapshot.
///
/// Single read-only pass; identifiers are taken verbatim.
#[must_use]
pub fn scan(snapshot: &EnvironmentSnapshot) -> ScanResult {
    let mut result = ScanResult::default();

    for (_, value) in snapshot.iter() {
        let Some(placeholder) = Placeholder::classify(value) else {
            continue;
        };
        let set = match placeholder.kind {
            PlaceholderKind::Parameter => &mut result.parameters,
            PlaceholderKind::Secret => &mut result.secrets,
        };
        set.insert(placeholder.identifier.to_owned());
    }

    tracing::debug!(
        variables = snapshot.len(),
        parameters = result.parameters.len(),
        secrets = result.secrets.len(),
        "Scanned environment"
    );

    result
}
