//! Whole-collection persistence with a versioned JSON envelope.
//!
//! # Responsibility
//! - Encode a record sequence as `{"schema_version": N, "items": [...]}`.
//! - Decode both the envelope and the legacy bare-array layout.
//!
//! # Invariants
//! - Loading never fails: absent or corrupt data is an empty collection and a
//!   `warn` event. A single undecodable record is skipped, not the whole set.
//! - Data tagged with a newer schema version than `SCHEMA_VERSION` loads as
//!   empty and is reported through `CollectionLoad::newer_schema`, so writers
//!   can refuse to overwrite it.
//! - Saving writes the full sequence; there are no partial writes.

use super::{KeyValueStore, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Version written into every saved envelope.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema_version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
    Versioned {
        schema_version: u32,
        items: Vec<Value>,
    },
    Legacy(Vec<Value>),
}

/// Why stored text could not be turned into a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Written by a newer layout this binary does not understand.
    NewerSchema(u32),
    /// Not JSON, or not an envelope/array.
    Malformed(String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewerSchema(version) => write!(
                f,
                "schema_version {version} is newer than supported {SCHEMA_VERSION}"
            ),
            Self::Malformed(reason) => write!(f, "{reason}"),
        }
    }
}

/// Successfully decoded records plus the number of records that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCollection<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

/// Result of reading one collection key.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionLoad<T> {
    pub items: Vec<T>,
    /// Set when the stored data uses a newer schema; `items` is then empty.
    pub newer_schema: Option<u32>,
}

/// Loads the collection stored under `key`, degrading to empty on any failure.
pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    read_collection(store, key).items
}

/// Like `load_collection`, but also reports data written by a newer schema.
pub fn read_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> CollectionLoad<T> {
    let empty = CollectionLoad {
        items: Vec::new(),
        newer_schema: None,
    };
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("event=collection_load module=store status=empty key={key}");
            return empty;
        }
        Err(err) => {
            warn!(
                "event=collection_load module=store status=degraded key={key} error_code=read_failed error={err}"
            );
            return empty;
        }
    };

    match decode_collection(&raw) {
        Ok(decoded) => {
            if decoded.skipped > 0 {
                warn!(
                    "event=collection_load module=store status=partial key={key} count={} skipped={}",
                    decoded.items.len(),
                    decoded.skipped
                );
            } else {
                debug!(
                    "event=collection_load module=store status=ok key={key} count={}",
                    decoded.items.len()
                );
            }
            CollectionLoad {
                items: decoded.items,
                newer_schema: None,
            }
        }
        Err(DecodeError::NewerSchema(version)) => {
            warn!(
                "event=collection_load module=store status=read_only key={key} error_code=newer_schema schema_version={version}"
            );
            CollectionLoad {
                items: Vec::new(),
                newer_schema: Some(version),
            }
        }
        Err(err) => {
            warn!(
                "event=collection_load module=store status=degraded key={key} error_code=decode_failed reason={err} bytes={}",
                raw.len()
            );
            empty
        }
    }
}

/// Writes `items` under `key`, replacing whatever was stored before.
pub fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> StoreResult<()> {
    let encoded = encode_collection(items)?;
    store.set(key, &encoded)?;
    debug!(
        "event=collection_save module=store status=ok key={key} count={}",
        items.len()
    );
    Ok(())
}

/// Encodes `items` in the current envelope layout.
pub fn encode_collection<T: Serialize>(items: &[T]) -> StoreResult<String> {
    let envelope = EnvelopeRef {
        schema_version: SCHEMA_VERSION,
        items,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decodes envelope or legacy text; blank text is an empty collection.
///
/// Records that fail to decode individually are counted in `skipped`.
pub fn decode_collection<T: DeserializeOwned>(
    raw: &str,
) -> Result<DecodedCollection<T>, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(DecodedCollection {
            items: Vec::new(),
            skipped: 0,
        });
    }

    let values = match serde_json::from_str::<Persisted>(raw) {
        Ok(Persisted::Versioned {
            schema_version,
            items,
        }) => {
            if schema_version > SCHEMA_VERSION {
                return Err(DecodeError::NewerSchema(schema_version));
            }
            items
        }
        Ok(Persisted::Legacy(items)) => items,
        Err(err) => return Err(DecodeError::Malformed(err.to_string())),
    };

    let total = values.len();
    let items = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<T>(value).ok())
        .collect::<Vec<_>>();
    Ok(DecodedCollection {
        skipped: total - items.len(),
        items,
    })
}
