//! Data-access operations.
//!
//! An [`Operation`] is one call a caller makes against a resource. Each
//! variant carries its own parameter record, so translation never has to
//! inspect the shape of the params at runtime. Parameter records deserialize
//! from the react-admin JSON shape (`perPage`, `previousData`, ...), which is
//! what [`Operation::from_kind`] consumes.

use crate::{Error, Identifier, Record, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The closed set of operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    GetList,
    GetOne,
    GetMany,
    GetManyReference,
    Create,
    Update,
    UpdateMany,
    Delete,
    DeleteMany,
}

impl OperationKind {
    pub const ALL: [OperationKind; 9] = [
        Self::GetList,
        Self::GetOne,
        Self::GetMany,
        Self::GetManyReference,
        Self::Create,
        Self::Update,
        Self::UpdateMany,
        Self::Delete,
        Self::DeleteMany,
    ];

    /// Returns the wire name of this kind (e.g. `GET_LIST`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GetList => "GET_LIST",
            Self::GetOne => "GET_ONE",
            Self::GetMany => "GET_MANY",
            Self::GetManyReference => "GET_MANY_REFERENCE",
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::UpdateMany => "UPDATE_MANY",
            Self::Delete => "DELETE",
            Self::DeleteMany => "DELETE_MANY",
        }
    }

    /// Returns whether the target API cannot express this kind in one call,
    /// so it has to be emulated with one request per id.
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self, Self::GetMany | Self::UpdateMany | Self::DeleteMany)
    }

    /// Returns whether this kind writes a record the caller supplied.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

/// Page window requested by the caller. Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::ascending("_id")
    }
}

/// Params for a paginated, sorted, filtered listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub sort: Sort,
    #[serde(default)]
    pub filter: Record,
}

/// Params for listing the records of `resource` whose `target` field
/// references `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParams {
    pub target: String,
    pub id: Identifier,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub sort: Sort,
    #[serde(default)]
    pub filter: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetOneParams {
    pub id: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetManyParams {
    pub ids: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateParams {
    pub data: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    pub id: Identifier,
    pub data: Record,
    /// The record as the caller last saw it. Not sent to the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_data: Option<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateManyParams {
    pub ids: Vec<Identifier>,
    pub data: Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    pub id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_data: Option<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteManyParams {
    pub ids: Vec<Identifier>,
}

/// One data-access call, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetList(ListParams),
    GetOne(GetOneParams),
    GetMany(GetManyParams),
    GetManyReference(ReferenceParams),
    Create(CreateParams),
    Update(UpdateParams),
    UpdateMany(UpdateManyParams),
    Delete(DeleteParams),
    DeleteMany(DeleteManyParams),
}

impl Operation {
    /// Builds an operation from a kind and its untyped JSON params.
    pub fn from_kind(kind: OperationKind, params: Value) -> Result<Self> {
        Ok(match kind {
            OperationKind::GetList => Self::GetList(serde_json::from_value(params)?),
            OperationKind::GetOne => Self::GetOne(serde_json::from_value(params)?),
            OperationKind::GetMany => Self::GetMany(serde_json::from_value(params)?),
            OperationKind::GetManyReference => {
                Self::GetManyReference(serde_json::from_value(params)?)
            }
            OperationKind::Create => Self::Create(serde_json::from_value(params)?),
            OperationKind::Update => Self::Update(serde_json::from_value(params)?),
            OperationKind::UpdateMany => Self::UpdateMany(serde_json::from_value(params)?),
            OperationKind::Delete => Self::Delete(serde_json::from_value(params)?),
            OperationKind::DeleteMany => Self::DeleteMany(serde_json::from_value(params)?),
        })
    }

    /// Parses the kind name first, then the params.
    pub fn parse(kind: &str, params: Value) -> Result<Self> {
        Self::from_kind(kind.parse()?, params)
    }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::GetList(_) => OperationKind::GetList,
            Self::GetOne(_) => OperationKind::GetOne,
            Self::GetMany(_) => OperationKind::GetMany,
            Self::GetManyReference(_) => OperationKind::GetManyReference,
            Self::Create(_) => OperationKind::Create,
            Self::Update(_) => OperationKind::Update,
            Self::UpdateMany(_) => OperationKind::UpdateMany,
            Self::Delete(_) => OperationKind::Delete,
            Self::DeleteMany(_) => OperationKind::DeleteMany,
        }
    }
}
