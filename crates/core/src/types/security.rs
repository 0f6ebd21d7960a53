//! Security-related types for resolved secret material

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Resolved values keyed by remote identifier
pub type ResolvedValues = HashMap<String, SecretValue>;

/// Resolved secret or parameter material.
///
/// The bytes are wiped on drop and never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue(Vec<u8>);

impl SecretValue {
    /// Wrap a textual value
    #[must_use]
    pub fn from_text(value: impl Into<String>) -> Self {
        Self(value.into().into_bytes())
    }

    /// Wrap a binary value
    #[must_use]
    pub fn from_bytes(value: impl Into<Vec<u8>>) -> Self {
        Self(value.into())
    }

    /// Raw bytes of the value (be careful with the returned slice)
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Copy the value into an OS string for the process environment.
    ///
    /// Unix environments carry arbitrary bytes, so this always succeeds there.
    /// Elsewhere the bytes must be valid UTF-8.
    #[must_use]
    pub fn to_os_string(&self) -> Option<OsString> {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStringExt;
            Some(OsString::from_vec(self.0.clone()))
        }
        #[cfg(not(unix))]
        {
            String::from_utf8(self.0.clone()).ok().map(OsString::from)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let value = SecretValue::from_text("hunter2");
        let rendered = format!("{value:?}");
        assert!(!rendered.contains("hunter2"));
        assert_eq!(rendered, "SecretValue(***)");
    }

    #[test]
    fn text_and_bytes_agree() {
        assert_eq!(SecretValue::from_text("abc"), SecretValue::from_bytes(b"abc".to_vec()));
    }

    #[test]
    fn converts_to_os_string() {
        let value = SecretValue::from_text("s3cr3t");
        assert_eq!(value.to_os_string().unwrap(), OsString::from("s3cr3t"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_bytes_survive_on_unix() {
        use std::os::unix::ffi::OsStrExt;
        let bytes = vec![0xff, 0xfe, b'x'];
        let value = SecretValue::from_bytes(bytes.clone());
        assert_eq!(value.to_os_string().unwrap().as_bytes(), bytes.as_slice());
    }
}
