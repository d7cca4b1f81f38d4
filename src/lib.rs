//! Content-addressed identity derivation for container image layers.
//!
//! A layer's identifier is the sha256 digest of the canonical JSON form of
//! its metadata record, folded together with the digest of its filesystem
//! payload and the identifier of its parent layer. [`create_id`] is the
//! derivation; [`V1Image`] and friends are the record it operates on.

pub mod image;
pub mod util;

pub use image::identity::{canonical_bytes, create_chain_ids, create_id};
pub use image::v1::{Config, EmptyObject, HealthConfig, PortSet, StrSlice, V1Image};
pub use image::{Digest, EncodeError, EncodedImage};
