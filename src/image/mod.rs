use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::util::sha::bytes_sha256;

pub mod identity;
pub mod v1;

/// An algorithm-tagged content address, e.g. `sha256:<hex>`.
///
/// Digest values supplied by callers are treated as opaque: the hex payload is
/// carried along and incorporated into derived identities, never re-validated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Wraps a full algorithm-tagged digest string, e.g. `sha256:abc...`.
    pub fn new_with_digest(digest: impl Into<String>) -> Digest {
        Digest(digest.into())
    }

    /// Builds a digest from a bare sha256 hex string.
    pub fn new_with_sha256(sha256: &str) -> Digest {
        Digest(format!("sha256:{}", sha256))
    }

    /// Hashes `bytes` and returns the tagged digest of the result.
    pub fn from_bytes(bytes: &[u8]) -> Digest {
        Digest::new_with_sha256(&bytes_sha256(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex payload without the algorithm tag.
    pub fn sha256(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, hex)) => hex,
            None => &self.0,
        }
    }

    /// Truncated hex form for log lines.
    pub fn short_hash(&self) -> &str {
        let sha256 = self.sha256();
        &sha256[..sha256.len().min(12)]
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A layer metadata record serialized for storage: the canonical JSON text,
/// the digest it is addressed by and its size in bytes.
pub struct EncodedImage {
    pub json: String,
    pub digest: Digest,
    pub size: u64,
}

/// Failure to put a layer metadata record into canonical form.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("serialize layer metadata: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layer metadata did not encode to a json object")]
    NotAnObject,
}
