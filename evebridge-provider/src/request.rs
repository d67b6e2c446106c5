//! Request translation.
//!
//! Turns an [`Operation`] on a resource into the single HTTP request Eve
//! understands for it. Translation is pure: the same input always yields the
//! same [`HttpRequest`], byte for byte.
//!
//! | Operation | Request |
//! | --- | --- |
//! | `GetList` | `GET {base}/{resource}?pretty&max_results=..&page=..&sort=..&where=..` |
//! | `GetOne` | `GET {base}/{resource}/{id}?pretty` |
//! | `GetManyReference` | as `GetList`, `where` gains `{target: id}` |
//! | `Create` | `POST {base}/{resource}?pretty` |
//! | `Update` | `PUT {base}/{resource}/{id}?pretty` |
//! | `Delete` | `DELETE {base}/{resource}/{id}?pretty` |
//!
//! Batch kinds have no single-request form and are rejected here.

use crate::error::{ProviderError, ProviderResult};
use crate::transport::HttpRequest;
use evebridge_types::{
    ABSTRACT_ID_FIELD, Identifier, LINKS_FIELD, Operation, Pagination, Record, Sort, SortOrder,
    without_fields,
};

/// Query flag asking Eve for indented JSON.
pub const PRETTY_FLAG: &str = "pretty";

/// Translates `operation` on `resource` into an HTTP request against
/// `api_url`.
pub fn translate_request(
    api_url: &str,
    resource: &str,
    operation: &Operation,
) -> ProviderResult<HttpRequest> {
    let collection = collection_url(api_url, resource);

    match operation {
        Operation::GetList(params) => Ok(HttpRequest::get(format!(
            "{collection}?{PRETTY_FLAG}&{}",
            list_query(&params.sort, &params.pagination, &params.filter)?
        ))),
        Operation::GetOne(params) => Ok(HttpRequest::get(item_url(api_url, resource, &params.id))),
        Operation::GetManyReference(params) => {
            let mut filter = params.filter.clone();
            filter.insert(params.target.clone(), params.id.to_value());
            Ok(HttpRequest::get(format!(
                "{collection}?{PRETTY_FLAG}&{}",
                list_query(&params.sort, &params.pagination, &filter)?
            )))
        }
        Operation::Update(params) => {
            let body = serde_json::to_string(&write_payload(&params.data))?;
            Ok(HttpRequest::put(item_url(api_url, resource, &params.id), body))
        }
        Operation::Create(params) => {
            let body = serde_json::to_string(&write_payload(&params.data))?;
            Ok(HttpRequest::post(format!("{collection}?{PRETTY_FLAG}"), body))
        }
        Operation::Delete(params) => Ok(HttpRequest::delete(item_url(
            api_url,
            resource,
            &params.id,
        ))),
        Operation::GetMany(_) | Operation::UpdateMany(_) | Operation::DeleteMany(_) => Err(
            ProviderError::UnsupportedOperation(operation.kind().to_string()),
        ),
    }
}

/// The signed sort key: `field` ascending, `-field` descending.
#[must_use]
pub fn sort_key(sort: &Sort) -> String {
    match sort.order {
        SortOrder::Ascending => sort.field.clone(),
        SortOrder::Descending => format!("-{}", sort.field),
    }
}

/// Builds the encoded `max_results`, `page`, `sort`, `where` query, keys in
/// alphabetical order.
pub fn list_query(sort: &Sort, pagination: &Pagination, filter: &Record) -> ProviderResult<String> {
    let filter = serde_json::to_string(filter)?;
    Ok(format!(
        "max_results={}&page={}&sort={}&where={}",
        pagination.per_page,
        pagination.page,
        urlencoding::encode(&sort_key(sort)),
        urlencoding::encode(&filter)
    ))
}

/// Body for any write (`POST`, `PUT`, `PATCH`). The identity travels in the
/// URL or is assigned by the API, and links are read-only, so neither `id`
/// nor `_links` is ever sent.
#[must_use]
pub fn write_payload(data: &Record) -> Record {
    without_fields(data, &[ABSTRACT_ID_FIELD, LINKS_FIELD])
}

pub(crate) fn collection_url(api_url: &str, resource: &str) -> String {
    format!("{}/{}", api_url.trim_end_matches('/'), resource)
}

/// `{base}/{resource}/{id}?pretty`, shared with the batch emulator.
pub(crate) fn item_url(api_url: &str, resource: &str, id: &Identifier) -> String {
    format!(
        "{}/{}?{PRETTY_FLAG}",
        collection_url(api_url, resource),
        urlencoding::encode(&id.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_trims_trailing_slash() {
        assert_eq!(collection_url("http://api/", "posts"), "http://api/posts");
        assert_eq!(collection_url("http://api", "posts"), "http://api/posts");
    }

    #[test]
    fn item_url_encodes_id() {
        let id = Identifier::from("a b/c");
        assert_eq!(item_url("http://api", "posts", &id), "http://api/posts/a%20b%2Fc?pretty");
    }

    #[test]
    fn item_url_numeric_id() {
        assert_eq!(
            item_url("http://api", "posts", &Identifier::from(7)),
            "http://api/posts/7?pretty"
        );
    }
}
