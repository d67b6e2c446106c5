//! Attachment inlining for updates.
//!
//! File inputs reach the provider as a field whose value describes the file
//! on the client side:
//!
//! ```json
//! { "rawFile": { "path": "/tmp/upload/cover.png", "type": "image/png" },
//!   "src": "blob:http://localhost:3000/8c1d...",
//!   "title": "cover.png" }
//! ```
//!
//! A `blob:` source only means something to the process that created it, so
//! before an update is sent the file content is read and `src` is replaced
//! with a base64 `data:` URI the API can store.

use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use evebridge_types::Record;
use serde::Deserialize;
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// URI scheme of transient, process-local file references.
pub const TRANSIENT_SCHEME: &str = "blob:";

/// MIME type used when the file descriptor carries none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

const RAW_FILE_FIELD: &str = "rawFile";
const SRC_FIELD: &str = "src";

/// Client-side description of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawFile {
    pub path: PathBuf,
    #[serde(rename = "type", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A field value recognised as a file attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub raw_file: RawFile,
    pub src: String,
}

impl Attachment {
    /// Recognises `value` as an attachment. Anything without a well-formed
    /// `rawFile` descriptor and a `src` string is not one.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.as_object()?.contains_key(RAW_FILE_FIELD) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Whether `src` still points at a transient reference.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.src.starts_with(TRANSIENT_SCHEME)
    }

    /// `data:{mime};base64,{content}`.
    #[must_use]
    pub fn data_uri(&self, content: &[u8]) -> String {
        let mime = self
            .raw_file
            .mime_type
            .as_deref()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE);
        format!("data:{mime};base64,{}", STANDARD.encode(content))
    }
}

/// Whether `value` is an object with a `rawFile` key and a `blob:` source.
fn has_transient_source(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.contains_key(RAW_FILE_FIELD)
            && object
                .get(SRC_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|src| src.starts_with(TRANSIENT_SCHEME))
    })
}

/// Reads attachment content.
#[async_trait]
pub trait AttachmentReader: Send + Sync {
    async fn read(&self, file: &RawFile) -> io::Result<Vec<u8>>;
}

/// Reads attachments from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAttachmentReader;

#[async_trait]
impl AttachmentReader for FsAttachmentReader {
    async fn read(&self, file: &RawFile) -> io::Result<Vec<u8>> {
        tokio::fs::read(&file.path).await
    }
}

/// Replaces every transient attachment source in `data` with a data URI.
///
/// Fields are handled one at a time, in record order. The consumed `rawFile`
/// descriptor is removed from each converted field. On a read failure the
/// fields converted so far stay converted. Returns the number of fields
/// converted.
pub async fn inline_attachments(
    data: &mut Record,
    reader: &dyn AttachmentReader,
) -> ProviderResult<usize> {
    let mut converted = 0;

    for (field, value) in data.iter_mut() {
        if !has_transient_source(value) {
            continue;
        }
        // A blob: source cannot be sent as is, so a descriptor that cannot
        // be read is an error rather than a plain field.
        let attachment: Attachment = serde_json::from_value(value.clone()).map_err(|e| {
            ProviderError::AttachmentRead {
                field: field.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            }
        })?;

        debug!(
            "Inlining attachment '{}' from {}",
            field,
            attachment.raw_file.path.display()
        );
        let content = reader
            .read(&attachment.raw_file)
            .await
            .map_err(|source| ProviderError::AttachmentRead {
                field: field.clone(),
                source,
            })?;

        if let Value::Object(object) = value {
            object.insert(
                SRC_FIELD.to_string(),
                Value::String(attachment.data_uri(&content)),
            );
            object.remove(RAW_FILE_FIELD);
        }
        converted += 1;
    }

    Ok(converted)
}
