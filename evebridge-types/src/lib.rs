//! Core type definitions for evebridge.
//!
//! This crate defines the transport-agnostic types the data provider works
//! with:
//! - Record identifiers (string or integer)
//! - The closed set of operation kinds and their parameter records
//! - Records and the abstract result shape returned to callers
//!
//! Nothing here performs I/O. Wire-level translation lives in
//! `evebridge-provider`.

mod ids;
mod operation;
mod record;

pub use ids::Identifier;
pub use operation::{
    CreateParams, DeleteManyParams, DeleteParams, GetManyParams, GetOneParams, ListParams,
    Operation, OperationKind, Pagination, ReferenceParams, Sort, SortOrder, UpdateManyParams,
    UpdateParams,
};
pub use record::{
    ABSTRACT_ID_FIELD, LINKS_FIELD, OperationResult, Record, WIRE_ID_FIELD, without_fields,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported operation kind: {0}")]
    UnknownOperation(String),

    #[error("invalid operation params: {0}")]
    InvalidParams(#[from] serde_json::Error),
}
