//! Response translation.
//!
//! Unwraps Eve's envelopes and renames the wire identity `_id` to `id`, so
//! every record the caller sees carries exactly one identity field.

use crate::error::{ProviderError, ProviderResult};
use crate::notify::{NotificationSink, SCHEMA_UPDATE_EVENT};
use crate::request::write_payload;
use crate::transport::HttpResponse;
use evebridge_types::{
    ABSTRACT_ID_FIELD, Identifier, Operation, OperationResult, Record, WIRE_ID_FIELD,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Eve's collection envelope.
#[derive(Debug, Deserialize)]
struct CollectionEnvelope {
    #[serde(rename = "_items")]
    items: Vec<Record>,
    #[serde(rename = "_meta")]
    meta: CollectionMeta,
}

#[derive(Debug, Deserialize)]
struct CollectionMeta {
    total: u64,
}

/// Translates responses for single-request operations.
pub struct ResponseTranslator<'a> {
    schema_resource: &'a str,
    notifier: &'a dyn NotificationSink,
}

impl<'a> ResponseTranslator<'a> {
    /// `schema_resource` names the resource whose create/update is announced
    /// on `notifier`.
    pub fn new(schema_resource: &'a str, notifier: &'a dyn NotificationSink) -> Self {
        Self {
            schema_resource,
            notifier,
        }
    }

    /// Converts the response to `operation` on `resource` into the abstract
    /// result. A create or update on the schema resource is announced once,
    /// before the body is looked at.
    pub fn translate(
        &self,
        response: HttpResponse,
        resource: &str,
        operation: &Operation,
    ) -> ProviderResult<OperationResult> {
        if resource == self.schema_resource && operation.kind().is_write() {
            info!("Schema resource '{}' changed", resource);
            self.notifier.notify(SCHEMA_UPDATE_EVENT);
        }

        translate_body(response.body, operation)
    }
}

fn translate_body(body: Value, operation: &Operation) -> ProviderResult<OperationResult> {
    match operation {
        Operation::GetList(_) | Operation::GetManyReference(_) => {
            let envelope: CollectionEnvelope = serde_json::from_value(body).map_err(|e| {
                ProviderError::MalformedResponse(format!(
                    "expected `_items` and `_meta.total`: {e}"
                ))
            })?;
            let data = envelope
                .items
                .into_iter()
                .map(wire_to_abstract)
                .collect::<ProviderResult<Vec<_>>>()?;
            Ok(OperationResult::List {
                data,
                total: envelope.meta.total,
            })
        }
        Operation::Create(params) => {
            let id = response_id(&body).ok_or_else(|| {
                ProviderError::MalformedResponse("created record has no `_id`".to_string())
            })?;
            Ok(OperationResult::One {
                data: with_id(write_payload(&params.data), &id),
            })
        }
        Operation::Update(params) => {
            let id = response_id(&body).unwrap_or_else(|| params.id.clone());
            Ok(OperationResult::One {
                data: with_id(write_payload(&params.data), &id),
            })
        }
        Operation::Delete(params) => Ok(OperationResult::One {
            data: with_id(Record::new(), &params.id),
        }),
        _ => Ok(OperationResult::One {
            data: wire_to_abstract(into_record(body)?)?,
        }),
    }
}

/// Moves `_id` to `id`. Fails if the record has no `_id`.
pub fn wire_to_abstract(mut record: Record) -> ProviderResult<Record> {
    let id = record.remove(WIRE_ID_FIELD).ok_or_else(|| {
        ProviderError::MalformedResponse("record has no `_id` field".to_string())
    })?;
    record.insert(ABSTRACT_ID_FIELD.to_string(), id);
    Ok(record)
}

/// Requires the body to be a JSON object.
pub(crate) fn into_record(body: Value) -> ProviderResult<Record> {
    match body {
        Value::Object(record) => Ok(record),
        other => Err(ProviderError::MalformedResponse(format!(
            "expected a record, got {other}"
        ))),
    }
}

/// The `_id` the API reported in a write response.
pub(crate) fn response_id(body: &Value) -> Option<Identifier> {
    body.get(WIRE_ID_FIELD).and_then(Identifier::from_value)
}

fn with_id(mut record: Record, id: &Identifier) -> Record {
    record.insert(ABSTRACT_ID_FIELD.to_string(), id.to_value());
    record
}
