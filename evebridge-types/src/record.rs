//! Records and the abstract result shape.

use crate::Identifier;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record: field name to JSON value, in insertion order.
pub type Record = Map<String, Value>;

/// Identity field on the caller side.
pub const ABSTRACT_ID_FIELD: &str = "id";
/// Identity field on the wire.
pub const WIRE_ID_FIELD: &str = "_id";
/// Hypermedia metadata the API attaches to items. Read-only.
pub const LINKS_FIELD: &str = "_links";

/// Returns a copy of `record` without the named fields.
#[must_use]
pub fn without_fields(record: &Record, fields: &[&str]) -> Record {
    record
        .iter()
        .filter(|(key, _)| !fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// What an operation hands back to its caller.
///
/// Serializes to the bare `{ "data": ..., "total": ... }` object callers
/// expect; the variant only decides which keys are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// A page of records plus the total across all pages.
    List { data: Vec<Record>, total: u64 },
    /// Several records, no total (get-many).
    Many { data: Vec<Record> },
    /// A single record (get-one, create, update, delete).
    One { data: Record },
    /// Bare identifiers (update-many, delete-many).
    Ids { data: Vec<Identifier> },
}

impl OperationResult {
    /// Returns the single record, if this is a `One` result.
    #[must_use]
    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::One { data } => Some(data),
            _ => None,
        }
    }

    /// Returns the records of a `List` or `Many` result.
    #[must_use]
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Self::List { data, .. } | Self::Many { data } => Some(data),
            _ => None,
        }
    }

    /// Returns the identifiers of an `Ids` result.
    #[must_use]
    pub fn ids(&self) -> Option<&[Identifier]> {
        match self {
            Self::Ids { data } => Some(data),
            _ => None,
        }
    }

    /// Returns the total of a `List` result.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        match self {
            Self::List { total, .. } => Some(*total),
            _ => None,
        }
    }
}
