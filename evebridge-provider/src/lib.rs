//! Data provider for Eve-powered REST APIs.
//!
//! Maps a fixed set of data-access operations onto Eve's REST conventions
//! and maps the responses back:
//!
//! ```text
//! GET_LIST     => GET    {api}/posts?pretty&max_results=25&page=1&sort=-title&where={}
//! GET_ONE      => GET    {api}/posts/123?pretty
//! GET_MANY     => GET    {api}/posts/123?pretty, GET {api}/posts/456?pretty, ...
//! GET_MANY_REFERENCE
//!              => GET    {api}/comments?pretty&...&where={"postId":123}
//! CREATE       => POST   {api}/posts?pretty
//! UPDATE       => PUT    {api}/posts/123?pretty
//! UPDATE_MANY  => PATCH  {api}/posts/123?pretty, PATCH {api}/posts/456?pretty, ...
//! DELETE       => DELETE {api}/posts/123?pretty
//! DELETE_MANY  => DELETE {api}/posts/123?pretty, DELETE {api}/posts/456?pretty, ...
//! ```
//!
//! ## Components
//!
//! - **Request**: pure translation of an operation into one HTTP request
//! - **Response**: envelope unwrapping and `_id` → `id` renaming
//! - **Batch**: one-request-per-id emulation for the kinds Eve cannot batch
//! - **Attachment**: inlines transient `blob:` file sources as data URIs
//! - **Transport**: the HTTP seam, with a `reqwest` implementation and a mock
//! - **Notify**: injected sink for `schema_update` notifications
//!
//! # Example
//!
//! ```no_run
//! use evebridge_provider::{EveDataProvider, ProviderConfig};
//! use evebridge_types::{GetOneParams, Operation};
//!
//! # async fn run() -> evebridge_provider::ProviderResult<()> {
//! let provider = EveDataProvider::from_config(ProviderConfig::new("http://localhost:5000"))?;
//! let result = provider
//!     .execute("posts", Operation::GetOne(GetOneParams { id: "123".into() }))
//!     .await?;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod attachment;
pub mod batch;
mod config;
mod error;
pub mod http;
pub mod notify;
mod provider;
pub mod request;
pub mod response;
pub mod transport;

pub use attachment::{Attachment, AttachmentReader, FsAttachmentReader, RawFile};
pub use batch::SettledMany;
pub use config::{DEFAULT_SCHEMA_RESOURCE, ProviderConfig, TransportConfig};
pub use error::{ProviderError, ProviderResult};
pub use http::ReqwestTransport;
pub use notify::{BroadcastNotifier, NoopNotifier, NotificationSink, SCHEMA_UPDATE_EVENT};
pub use provider::EveDataProvider;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
