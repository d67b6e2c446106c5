use clap::Parser;
use evebridge_cli::{Args, load_config};
use evebridge_provider::EveDataProvider;
use evebridge_types::{Identifier, Operation, SortOrder};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::io::Write;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("evebridge").chain(argv.iter().copied())).unwrap()
}

// ── Argument parsing ────────────────────────────────────────────

#[test]
fn list_defaults() {
    let (resource, operation) = parse(&["list", "posts"]).command.into_operation();
    assert_eq!(resource, "posts");
    match operation {
        Operation::GetList(params) => {
            assert_eq!(params.pagination.page, 1);
            assert_eq!(params.pagination.per_page, 25);
            assert_eq!(params.sort.field, "_id");
            assert_eq!(params.sort.order, SortOrder::Ascending);
            assert!(params.filter.is_empty());
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[test]
fn list_with_options() {
    let args = parse(&[
        "list", "posts", "--page", "3", "--per-page", "10", "--sort", "title", "--desc",
        "--filter", r#"{"published": true}"#,
    ]);
    match args.command.into_operation().1 {
        Operation::GetList(params) => {
            assert_eq!(params.pagination.page, 3);
            assert_eq!(params.pagination.per_page, 10);
            assert_eq!(params.sort.field, "title");
            assert_eq!(params.sort.order, SortOrder::Descending);
            assert_eq!(params.filter.get("published"), Some(&json!(true)));
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[test]
fn filter_must_be_an_object() {
    let result = Args::try_parse_from(["evebridge", "list", "posts", "--filter", "[1, 2]"]);
    assert!(result.is_err());
}

#[test]
fn ids_parse_as_numbers_or_text() {
    let (_, operation) = parse(&["get-many", "posts", "7", "5f1d7a"]).command.into_operation();
    match operation {
        Operation::GetMany(params) => {
            assert_eq!(params.ids, vec![Identifier::from(7), Identifier::from("5f1d7a")]);
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[test]
fn batch_commands_require_ids() {
    assert!(Args::try_parse_from(["evebridge", "delete-many", "posts"]).is_err());
    assert!(Args::try_parse_from(["evebridge", "get-many", "posts"]).is_err());
}

#[test]
fn reference_command() {
    let args = parse(&["reference", "comments", "--target", "postId", "--id", "42"]);
    match args.command.into_operation() {
        (resource, Operation::GetManyReference(params)) => {
            assert_eq!(resource, "comments");
            assert_eq!(params.target, "postId");
            assert_eq!(params.id, Identifier::from(42));
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[test]
fn write_commands_carry_data() {
    let args = parse(&["update-many", "posts", "1", "2", "--data", r#"{"title": "x"}"#]);
    match args.command.into_operation().1 {
        Operation::UpdateMany(params) => {
            assert_eq!(params.ids, vec![Identifier::from(1), Identifier::from(2)]);
            assert_eq!(Value::Object(params.data), json!({"title": "x"}));
        }
        other => panic!("unexpected operation: {other:?}"),
    }

    let args = parse(&["update", "posts", "1", "--data", r#"{"title": "y"}"#]);
    assert_eq!(args.command.into_operation().1.kind().as_str(), "UPDATE");

    assert!(Args::try_parse_from(["evebridge", "create", "posts"]).is_err());
}

#[test]
fn delete_command() {
    let (resource, operation) = parse(&["delete", "posts", "abc"]).command.into_operation();
    assert_eq!(resource, "posts");
    assert_eq!(operation.kind().as_str(), "DELETE");
}

#[test]
fn single_id_commands_keep_numeric_ids() {
    match parse(&["get", "posts", "12"]).command.into_operation().1 {
        Operation::GetOne(params) => assert_eq!(params.id, Identifier::Number(12)),
        other => panic!("unexpected operation: {other:?}"),
    }
    match parse(&["delete", "posts", "007x"]).command.into_operation().1 {
        Operation::Delete(params) => assert_eq!(params.id, Identifier::from("007x")),
        other => panic!("unexpected operation: {other:?}"),
    }
    match parse(&["update", "posts", "30", "--data", "{}"]).command.into_operation().1 {
        Operation::Update(params) => assert_eq!(params.id, Identifier::Number(30)),
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[test]
fn delete_many_echoes_numeric_ids() {
    match parse(&["delete-many", "posts", "1", "2"]).command.into_operation().1 {
        Operation::DeleteMany(params) => {
            assert_eq!(
                serde_json::to_value(&params.ids).unwrap(),
                json!([1, 2])
            );
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

// ── Config loading ──────────────────────────────────────────────

#[test]
fn config_file_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"api_url": "http://from-file", "max_concurrency": 2}}"#).unwrap();

    let args = parse(&["--config", file.path().to_str().unwrap(), "get", "posts", "1"]);
    let args = Args { api_url: None, ..args };
    let config = load_config(&args).unwrap();

    assert_eq!(config.api_url, "http://from-file");
    assert_eq!(config.max_concurrency, Some(2));
}

#[test]
fn api_url_flag_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"api_url": "http://from-file"}}"#).unwrap();

    let args = parse(&[
        "--config",
        file.path().to_str().unwrap(),
        "--api-url",
        "http://from-flag",
        "get",
        "posts",
        "1",
    ]);
    assert_eq!(load_config(&args).unwrap().api_url, "http://from-flag");
}

#[test]
fn missing_config_file_is_an_error() {
    let args = parse(&["--config", "/nonexistent/evebridge.json", "get", "posts", "1"]);
    let err = load_config(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn invalid_config_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let args = parse(&["--config", file.path().to_str().unwrap(), "get", "posts", "1"]);
    let err = load_config(&args).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

// ── End to end ──────────────────────────────────────────────────

#[tokio::test]
async fn parsed_command_runs_against_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("sort", "-title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_items": [{"_id": 1, "title": "b"}, {"_id": 2, "title": "a"}],
            "_meta": {"total": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = parse(&["--api-url", &server.uri(), "list", "posts", "--sort", "title", "--desc"]);
    let provider = EveDataProvider::from_config(load_config(&args).unwrap()).unwrap();
    let (resource, operation) = args.command.into_operation();
    let result = provider.execute(&resource, operation).await.unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"data": [{"title": "b", "id": 1}, {"title": "a", "id": 2}], "total": 2})
    );
}
