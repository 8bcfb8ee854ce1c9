//! Canonical JSON: the one byte form that feeds content hashes.
//!
//! Objects are written with keys in byte order, no whitespace anywhere, and
//! strings escaped by `serde_json`. Only integer numbers are accepted, so a
//! digest never depends on float formatting.

use std::io::Write;

use serde_json::Value;

/// Why a value has no canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// A number that is neither `i64` nor `u64`.
    NonIntegerNumber { raw: String },
    /// `serde_json` failed to escape a string.
    Serialize { detail: String },
}

impl std::fmt::Display for CanonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonIntegerNumber { raw } => {
                write!(f, "non-integer number in canonical JSON: {raw}")
            }
            Self::Serialize { detail } => write!(f, "canonical JSON write failed: {detail}"),
        }
    }
}

impl std::error::Error for CanonError {}

/// Serialize `value` to canonical JSON bytes.
///
/// # Errors
///
/// Returns [`CanonError::NonIntegerNumber`] if any number is not an integer.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonError> {
    let mut out = CanonWriter(Vec::new());
    out.value(value)?;
    Ok(out.0)
}

/// Whether `bytes` parse as JSON and are already in canonical form.
#[must_use]
pub fn is_canonical(bytes: &[u8]) -> bool {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|v| canonical_json_bytes(&v).ok())
        .is_some_and(|canon| canon == bytes)
}

struct CanonWriter(Vec<u8>);

impl CanonWriter {
    fn value(&mut self, value: &Value) -> Result<(), CanonError> {
        match value {
            Value::Null => self.0.extend_from_slice(b"null"),
            Value::Bool(b) => {
                let _ = write!(self.0, "{b}");
            }
            Value::Number(n) => self.number(n)?,
            Value::String(s) => self.string(s)?,
            Value::Array(items) => {
                self.sequence(b'[', b']', items, |w, item| w.value(item))?;
            }
            Value::Object(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
                self.sequence(b'{', b'}', &entries, |w, (key, item)| {
                    w.string(key)?;
                    w.0.push(b':');
                    w.value(item)
                })?;
            }
        }
        Ok(())
    }

    fn number(&mut self, n: &serde_json::Number) -> Result<(), CanonError> {
        match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => {
                let _ = write!(self.0, "{i}");
            }
            (None, Some(u)) => {
                let _ = write!(self.0, "{u}");
            }
            (None, None) => return Err(CanonError::NonIntegerNumber { raw: n.to_string() }),
        }
        Ok(())
    }

    fn string(&mut self, s: &str) -> Result<(), CanonError> {
        serde_json::to_writer(&mut self.0, s).map_err(|e| CanonError::Serialize {
            detail: e.to_string(),
        })
    }

    fn sequence<T>(
        &mut self,
        open: u8,
        close: u8,
        items: &[T],
        mut each: impl FnMut(&mut Self, &T) -> Result<(), CanonError>,
    ) -> Result<(), CanonError> {
        self.0.push(open);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.0.push(b',');
            }
            each(self, item)?;
        }
        self.0.push(close);
        Ok(())
    }
}
