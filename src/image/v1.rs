use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Utc;
use serde::ser::SerializeMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::image::{Digest, EncodeError, EncodedImage};

/// An ordered command value that accepts the legacy "one or many" JSON forms:
/// a bare string deserializes as a one-element sequence, an array as-is.
/// It always serializes back as an array, so both source forms share one
/// canonical encoding.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StrSlice(Vec<String>);

impl StrSlice {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for StrSlice {
    fn from(value: &str) -> StrSlice {
        StrSlice(vec![value.to_string()])
    }
}

impl From<String> for StrSlice {
    fn from(value: String) -> StrSlice {
        StrSlice(vec![value])
    }
}

impl From<Vec<String>> for StrSlice {
    fn from(value: Vec<String>) -> StrSlice {
        StrSlice(value)
    }
}

impl FromIterator<String> for StrSlice {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> StrSlice {
        StrSlice(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for StrSlice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<StrSlice, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(value) => StrSlice(vec![value]),
            OneOrMany::Many(values) => StrSlice(values),
        })
    }
}

/// The empty JSON object used as the value side of port and volume maps.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyObject {}

/// Unordered set of protocol-qualified port specs such as `80/tcp`.
///
/// The JSON form is an object with empty values, e.g. `{"80/tcp":{}}`. Backed
/// by an ordered set, so the canonical encoding never depends on the order in
/// which the caller inserted ports.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PortSet(BTreeSet<String>);

impl PortSet {
    pub fn new() -> PortSet {
        PortSet::default()
    }

    pub fn insert(&mut self, port: impl Into<String>) {
        self.0.insert(port.into());
    }

    pub fn contains(&self, port: &str) -> bool {
        self.0.contains(port)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PortSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> PortSet {
        PortSet(iter.into_iter().collect())
    }
}

impl Serialize for PortSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for port in &self.0 {
            map.serialize_entry(port, &EmptyObject {})?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PortSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<PortSet, D::Error> {
        let entries = BTreeMap::<String, EmptyObject>::deserialize(deserializer)?;
        Ok(PortSet(entries.into_keys().collect()))
    }
}

/// Healthcheck settings baked into a layer. Durations are integer nanoseconds.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HealthConfig {
    #[serde(skip_serializing_if = "StrSlice::is_empty")]
    pub test: StrSlice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_period: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
}

/// The container runtime configuration carried by a layer record.
///
/// Field order and omit-if-empty rules are part of the canonical form and
/// must not be reordered: identity derivation hashes exactly this encoding.
/// Optional fields are absent from the JSON when unset; the remaining fields
/// are always emitted, as `null` for unset lists and maps.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    pub hostname: String,
    pub domainname: String,
    pub user: String,
    pub attach_stdin: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_ports: Option<PortSet>,
    pub tty: bool,
    pub open_stdin: bool,
    pub stdin_once: bool,
    pub env: Option<Vec<String>>,
    pub cmd: Option<StrSlice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args_escaped: Option<bool>,
    pub image: String,
    pub volumes: Option<BTreeMap<String, EmptyObject>>,
    pub working_dir: String,
    pub entrypoint: Option<StrSlice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    pub on_build: Option<Vec<String>>,
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<String>,
    /// Stop timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_timeout: Option<i64>,
    #[serde(skip_serializing_if = "StrSlice::is_empty")]
    pub shell: StrSlice,
}

/// A V1-style layer metadata record.
///
/// `id` holds whatever identifier was last assigned to the record; it is
/// excluded from identity derivation (see [`create_id`]) so that assigning an
/// id never feeds back into the value being computed. `parent` refers to the
/// parent layer's derived identifier by value and is empty for a root layer.
///
/// [`create_id`]: crate::image::identity::create_id
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct V1Image {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    pub created: Option<DateTime<Utc>>,
    /// Id of the transient container the layer was committed from.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub container: String,
    pub container_config: Config,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// The configuration to run an image built from this layer with, when it
    /// differs from the `container_config` that produced the layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub architecture: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub variant: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub os: String,
    #[serde(rename = "Size", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

impl V1Image {
    /// Serializes the record as-is for storage and returns the JSON text
    /// together with the digest it is addressed by.
    pub fn encode(&self) -> Result<EncodedImage, EncodeError> {
        let json = serde_json::to_string(self)?;
        let digest = Digest::from_bytes(json.as_bytes());
        let size = json.len() as u64;
        Ok(EncodedImage { json, digest, size })
    }
}
