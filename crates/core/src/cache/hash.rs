//! Content fingerprints stored in cache metadata.
//!
//! Entry and metadata live under two keys and are not written atomically.
//! The fingerprint lets a reader notice an entry that does not belong to the
//! metadata next to it.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of an entry payload.
pub fn content_fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
