//! Environment-related types for the launch pipeline

use crate::constants::PATH_VAR;
use indexmap::IndexMap;
use std::ffi::{OsStr, OsString};

/// Ordered snapshot of a process environment, captured once per launch.
///
/// Names are unique; a repeated name keeps its first position and its last
/// value. Entries are kept as OS strings so nothing is lost for variables
/// that are not valid UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot(IndexMap<OsString, OsString>);

impl EnvironmentSnapshot {
    /// Create a new empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Capture the environment of the current process
    #[must_use]
    pub fn capture() -> Self {
        Self::from_pairs(std::env::vars_os())
    }

    /// Build a snapshot from name/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut snapshot = Self::new();
        for (name, value) in pairs {
            snapshot.insert(name, value);
        }
        snapshot
    }

    /// Build a snapshot from `NAME=VALUE` entries.
    ///
    /// The entry is split at the first `=`; an entry without one is a variable
    /// with an empty value.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_pairs(entries.into_iter().map(|entry| {
            let entry = entry.as_ref();
            let (name, value) = entry.split_once('=').unwrap_or((entry, ""));
            (name.to_owned(), value.to_owned())
        }))
    }

    /// Insert a variable, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<OsString>, value: impl Into<OsString>) -> Option<OsString> {
        self.0.insert(name.into(), value.into())
    }

    /// Get a variable by name
    #[must_use]
    pub fn get(&self, name: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.0.get(name.as_ref()).map(OsString::as_os_str)
    }

    /// The `PATH` the target program will see
    #[must_use]
    pub fn path(&self) -> Option<&OsStr> {
        self.get(PATH_VAR)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the variables in capture order
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.0.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

/// The final environment handed to the target program, in snapshot order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment(Vec<(OsString, OsString)>);

impl ResolvedEnvironment {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append a variable
    pub fn push(&mut self, name: impl Into<OsString>, value: impl Into<OsString>) {
        self.0.push((name.into(), value.into()));
    }

    /// Get a variable by name
    #[must_use]
    pub fn get(&self, name: impl AsRef<OsStr>) -> Option<&OsStr> {
        let name = name.as_ref();
        self.0
            .iter()
            .find(|(k, _)| k.as_os_str() == name)
            .map(|(_, v)| v.as_os_str())
    }

    /// Get the `PATH` variable
    #[must_use]
    pub fn path(&self) -> Option<&OsStr> {
        self.get(PATH_VAR)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the variables in order
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.0.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Render as `NAME=VALUE` entries
    #[must_use]
    pub fn entries(&self) -> Vec<OsString> {
        self.0
            .iter()
            .map(|(name, value)| {
                let mut entry = OsString::with_capacity(name.len() + value.len() + 1);
                entry.push(name);
                entry.push("=");
                entry.push(value);
                entry
            })
            .collect()
    }
}
