//! The data provider entry point.

use crate::attachment::{AttachmentReader, FsAttachmentReader, inline_attachments};
use crate::batch::{BatchEmulator, SettledMany};
use crate::config::ProviderConfig;
use crate::error::ProviderResult;
use crate::http::ReqwestTransport;
use crate::notify::{NoopNotifier, NotificationSink};
use crate::request::translate_request;
use crate::response::ResponseTranslator;
use crate::transport::HttpTransport;
use evebridge_types::{GetManyParams, Operation, OperationResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Runs data-access operations against an Eve API.
///
/// Batch kinds are emulated with one request per id, updates have their
/// transient attachments inlined first, and everything else is a single
/// translated request.
#[derive(Clone)]
pub struct EveDataProvider {
    config: ProviderConfig,
    transport: Arc<dyn HttpTransport>,
    notifier: Arc<dyn NotificationSink>,
    attachments: Arc<dyn AttachmentReader>,
}

impl EveDataProvider {
    /// Creates a provider over `transport`. Notifications are dropped and
    /// attachments are read from the local filesystem until overridden.
    pub fn new(config: ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            notifier: Arc::new(NoopNotifier),
            attachments: Arc::new(FsAttachmentReader),
        }
    }

    /// Creates a provider over a [`ReqwestTransport`] built from
    /// `config.transport`.
    pub fn from_config(config: ProviderConfig) -> ProviderResult<Self> {
        let transport = ReqwestTransport::new(config.transport.clone())?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Sets the sink that receives `schema_update` notifications.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets where attachment content is read from.
    #[must_use]
    pub fn with_attachment_reader(mut self, reader: Arc<dyn AttachmentReader>) -> Self {
        self.attachments = reader;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Runs `operation` against `resource`.
    pub async fn execute(
        &self,
        resource: &str,
        operation: Operation,
    ) -> ProviderResult<OperationResult> {
        debug!("{} {}", operation.kind(), resource);
        let batch = self.batch();

        let operation = match operation {
            Operation::GetMany(params) => return batch.get_many(resource, &params).await,
            Operation::UpdateMany(params) => return batch.update_many(resource, &params).await,
            Operation::DeleteMany(params) => return batch.delete_many(resource, &params).await,
            Operation::Update(mut params) => {
                inline_attachments(&mut params.data, self.attachments.as_ref()).await?;
                Operation::Update(params)
            }
            other => other,
        };

        let request = translate_request(self.config.base_url(), resource, &operation)?;
        let response = self.transport.send(request).await?;

        ResponseTranslator::new(&self.config.schema_resource, self.notifier.as_ref())
            .translate(response, resource, &operation)
    }

    /// Runs an operation given by kind name and untyped JSON params, the way
    /// a react-admin style caller invokes a data provider.
    pub async fn dispatch(
        &self,
        kind: &str,
        resource: &str,
        params: Value,
    ) -> ProviderResult<OperationResult> {
        let operation = Operation::parse(kind, params)?;
        self.execute(resource, operation).await
    }

    /// Fetches every id like `GET_MANY`, but reports failed ids alongside
    /// the records that were fetched instead of failing the whole call.
    pub async fn get_many_settled(&self, resource: &str, params: &GetManyParams) -> SettledMany {
        self.batch().get_many_settled(resource, params).await
    }

    fn batch(&self) -> BatchEmulator<'_> {
        BatchEmulator::new(
            self.config.base_url(),
            self.transport.as_ref(),
            self.config.max_concurrency,
        )
    }
}
