use std::collections::BTreeMap;

use log::debug;
use log::trace;
use serde_json::Value;

use crate::image::v1::V1Image;
use crate::image::{Digest, EncodeError};

/// Derives the content-addressed identifier of a layer from its metadata
/// record, the digest of its filesystem payload and the identifier of its
/// parent layer (`None` for a root layer).
///
/// The record's own `id` field is cleared on a private copy before anything is
/// hashed, so the result never depends on a previously assigned identifier.
/// Every other metadata field feeds into the result, as do the layer digest
/// and the presence and value of the parent. The function is pure and
/// deterministic: equal inputs produce byte-identical identifiers across runs
/// and platforms.
pub fn create_id(
    image: &V1Image,
    layer_digest: &Digest,
    parent: Option<&Digest>,
) -> Result<Digest, EncodeError> {
    let bytes = canonical_bytes(image, layer_digest, parent)?;
    trace!("layer identity canonical form is {} bytes", bytes.len());
    Ok(Digest::from_bytes(&bytes))
}

/// The exact byte form hashed by [`create_id`]: the record's canonical JSON
/// fields (omit-if-empty, `id` cleared) plus the injected `layer_id` and
/// optional `parent` keys, re-keyed in lexicographic order at the top level.
///
/// The top-level ordering is a compatibility constant of the identity scheme;
/// nested values keep the record's declared field order.
pub fn canonical_bytes(
    image: &V1Image,
    layer_digest: &Digest,
    parent: Option<&Digest>,
) -> Result<Vec<u8>, EncodeError> {
    let mut image = image.clone();
    image.id = String::new();

    let mut fields = match serde_json::to_value(&image)? {
        Value::Object(fields) => fields,
        _ => return Err(EncodeError::NotAnObject),
    };
    fields.insert("layer_id".to_string(), Value::String(layer_digest.as_str().to_string()));
    if let Some(parent) = parent {
        // An absent parent key and an empty one are distinct canonical forms;
        // root layers must leave the key out entirely.
        fields.insert("parent".to_string(), Value::String(parent.as_str().to_string()));
    }

    let ordered: BTreeMap<&String, &Value> = fields.iter().collect();
    Ok(serde_json::to_vec(&ordered)?)
}

/// Derives identifiers for a chain of layers given in parent-to-child order,
/// threading each derived identifier in as the parent of the next layer.
pub fn create_chain_ids(layers: &[(V1Image, Digest)]) -> Result<Vec<Digest>, EncodeError> {
    let mut ids = Vec::with_capacity(layers.len());
    let mut parent: Option<Digest> = None;
    for (image, layer_digest) in layers {
        let id = create_id(image, layer_digest, parent.as_ref())?;
        debug!("layer {} got id {}", layer_digest.short_hash(), id.short_hash());
        parent = Some(id.clone());
        ids.push(id);
    }
    Ok(ids)
}
