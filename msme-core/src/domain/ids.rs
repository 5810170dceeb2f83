use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash of the rows under analysis (BLAKE3, hex).
///
/// Computed over the header and the raw cell text of every in-scope row, so
/// an exported subset re-ingested later hashes to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// First 12 hex characters, for compact display.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(12);
        &self.0[..end]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
