//! Batch emulation.
//!
//! Eve cannot fetch, patch or delete an arbitrary id set in one call, so the
//! batch kinds are emulated with one request per id. Sub-requests are sent
//! concurrently and joined; results come back in input order regardless of
//! completion order, and the first failure fails the whole batch.

use crate::error::{ProviderError, ProviderResult};
use crate::request::{item_url, write_payload};
use crate::response::{into_record, response_id, wire_to_abstract};
use crate::transport::{HttpRequest, HttpTransport};
use evebridge_types::{
    DeleteManyParams, GetManyParams, Identifier, OperationResult, Record, UpdateManyParams,
};
use futures::future::{join_all, try_join_all};
use futures::{StreamExt, TryStreamExt, stream};
use std::future::Future;
use tracing::{debug, warn};

/// Fans batch operations out over a transport.
pub struct BatchEmulator<'a> {
    api_url: &'a str,
    transport: &'a dyn HttpTransport,
    max_concurrency: Option<usize>,
}

/// Per-id outcome of a settled get-many.
#[derive(Debug)]
pub struct SettledMany {
    /// Records fetched successfully, in input order.
    pub data: Vec<Record>,
    /// Ids whose fetch failed, with the reason, in input order.
    pub failures: Vec<(Identifier, ProviderError)>,
}

impl<'a> BatchEmulator<'a> {
    pub fn new(
        api_url: &'a str,
        transport: &'a dyn HttpTransport,
        max_concurrency: Option<usize>,
    ) -> Self {
        Self {
            api_url,
            transport,
            max_concurrency,
        }
    }

    /// One `GET` per id; `{data: [records]}`.
    pub async fn get_many(
        &self,
        resource: &str,
        params: &GetManyParams,
    ) -> ProviderResult<OperationResult> {
        debug!("Emulating GET_MANY on {} with {} id(s)", resource, params.ids.len());
        let data = self
            .fan_out(&params.ids, |id| self.fetch_one(resource, id))
            .await?;
        Ok(OperationResult::Many { data })
    }

    /// One `PATCH` per id with the shared body; `{data: [response ids]}`.
    pub async fn update_many(
        &self,
        resource: &str,
        params: &UpdateManyParams,
    ) -> ProviderResult<OperationResult> {
        debug!("Emulating UPDATE_MANY on {} with {} id(s)", resource, params.ids.len());
        let body = serde_json::to_string(&write_payload(&params.data))?;
        let data = self
            .fan_out(&params.ids, |id| self.patch_one(resource, id, &body))
            .await?;
        Ok(OperationResult::Ids { data })
    }

    /// One `DELETE` per id; `{data: ids}`. Response bodies are ignored.
    pub async fn delete_many(
        &self,
        resource: &str,
        params: &DeleteManyParams,
    ) -> ProviderResult<OperationResult> {
        debug!("Emulating DELETE_MANY on {} with {} id(s)", resource, params.ids.len());
        self.fan_out(&params.ids, |id| self.delete_one(resource, id)).await?;
        Ok(OperationResult::Ids {
            data: params.ids.clone(),
        })
    }

    /// Like [`get_many`](Self::get_many), but a failed id is reported
    /// instead of failing the batch.
    pub async fn get_many_settled(&self, resource: &str, params: &GetManyParams) -> SettledMany {
        let outcomes = self
            .settle_all(&params.ids, |id| self.fetch_one(resource, id))
            .await;

        let mut settled = SettledMany {
            data: Vec::with_capacity(params.ids.len()),
            failures: Vec::new(),
        };
        for (id, outcome) in params.ids.iter().zip(outcomes) {
            match outcome {
                Ok(record) => settled.data.push(record),
                Err(error) => {
                    warn!("GET_MANY on {} failed for id {}: {}", resource, id, error);
                    settled.failures.push((id.clone(), error));
                }
            }
        }
        settled
    }

    async fn fetch_one(&self, resource: &str, id: &Identifier) -> ProviderResult<Record> {
        let response = self
            .transport
            .send(HttpRequest::get(item_url(self.api_url, resource, id)))
            .await?;
        wire_to_abstract(into_record(response.body)?)
    }

    async fn patch_one(
        &self,
        resource: &str,
        id: &Identifier,
        body: &str,
    ) -> ProviderResult<Identifier> {
        let response = self
            .transport
            .send(HttpRequest::patch(
                item_url(self.api_url, resource, id),
                body.to_string(),
            ))
            .await?;
        response_id(&response.body).ok_or_else(|| {
            ProviderError::MalformedResponse(format!("patched record {id} has no `_id`"))
        })
    }

    async fn delete_one(&self, resource: &str, id: &Identifier) -> ProviderResult<()> {
        self.transport
            .send(HttpRequest::delete(item_url(self.api_url, resource, id)))
            .await?;
        Ok(())
    }

    /// Runs `call` for every id, keeping input order. Without a cap all calls
    /// are in flight at once; with one, at most `limit` are.
    async fn fan_out<'i, T, F, Fut>(
        &self,
        ids: &'i [Identifier],
        call: F,
    ) -> ProviderResult<Vec<T>>
    where
        F: FnMut(&'i Identifier) -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        match self.max_concurrency {
            Some(limit) if limit > 0 => {
                stream::iter(ids.iter().map(call))
                    .buffered(limit)
                    .try_collect()
                    .await
            }
            _ => try_join_all(ids.iter().map(call)).await,
        }
    }

    /// [`fan_out`](Self::fan_out) without the short circuit: every call runs
    /// and its outcome is kept, under the same cap.
    async fn settle_all<'i, T, F, Fut>(
        &self,
        ids: &'i [Identifier],
        call: F,
    ) -> Vec<ProviderResult<T>>
    where
        F: FnMut(&'i Identifier) -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        match self.max_concurrency {
            Some(limit) if limit > 0 => {
                stream::iter(ids.iter().map(call))
                    .buffered(limit)
                    .collect()
                    .await
            }
            _ => join_all(ids.iter().map(call)).await,
        }
    }
}
