use evebridge_provider::response::{ResponseTranslator, wire_to_abstract};
use evebridge_provider::{HttpResponse, NoopNotifier, NotificationSink, ProviderError, SCHEMA_UPDATE_EVENT};
use evebridge_types::{
    CreateParams, DeleteParams, GetOneParams, ListParams, Operation, OperationResult, Record,
    ReferenceParams, UpdateParams,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Mutex;

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn translate(body: Value, resource: &str, op: &Operation) -> Result<OperationResult, ProviderError> {
    ResponseTranslator::new("schemas", &NoopNotifier).translate(HttpResponse::ok(body), resource, op)
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<String>>);

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &str) {
        self.0.lock().unwrap().push(event.to_string());
    }
}

// ── Collections ─────────────────────────────────────────────────

#[test]
fn list_unwraps_envelope() {
    let body = json!({
        "_items": [
            {"_id": "a1", "title": "First", "_links": {"self": {"href": "posts/a1"}}},
            {"_id": "b2", "title": "Second"}
        ],
        "_meta": {"total": 12, "page": 1, "max_results": 2},
        "_links": {"next": {"href": "posts?page=2"}}
    });
    let result = translate(body, "posts", &Operation::GetList(ListParams::default())).unwrap();

    assert_eq!(result.total(), Some(12));
    let data = result.records().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(
        Value::Object(data[0].clone()),
        json!({"title": "First", "_links": {"self": {"href": "posts/a1"}}, "id": "a1"})
    );
    assert_eq!(Value::Object(data[1].clone()), json!({"title": "Second", "id": "b2"}));
}

#[test]
fn reference_uses_same_envelope_handling() {
    let op = Operation::GetManyReference(ReferenceParams {
        target: "postId".to_string(),
        id: 1.into(),
        pagination: Default::default(),
        sort: Default::default(),
        filter: Record::new(),
    });
    let body = json!({"_items": [{"_id": 10, "postId": 1}], "_meta": {"total": 1}});
    let result = translate(body, "comments", &op).unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({"data": [{"postId": 1, "id": 10}], "total": 1})
    );
}

#[test]
fn list_without_envelope_is_malformed() {
    let err = translate(json!([{"_id": 1}]), "posts", &Operation::GetList(ListParams::default()))
        .unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[test]
fn list_item_without_id_is_malformed() {
    let body = json!({"_items": [{"title": "no id"}], "_meta": {"total": 1}});
    let err = translate(body, "posts", &Operation::GetList(ListParams::default())).unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

// ── Single records ──────────────────────────────────────────────

#[test]
fn get_one_renames_identity() {
    let op = Operation::GetOne(GetOneParams { id: "a1".into() });
    let result = translate(json!({"_id": "a1", "title": "T"}), "posts", &op).unwrap();
    assert_eq!(Value::Object(result.record().unwrap().clone()), json!({"title": "T", "id": "a1"}));
}

#[test]
fn get_one_non_object_is_malformed() {
    let op = Operation::GetOne(GetOneParams { id: 1.into() });
    let err = translate(json!("nope"), "posts", &op).unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[test]
fn create_echoes_payload_with_assigned_id() {
    let op = Operation::Create(CreateParams {
        data: record(json!({"title": "Hello", "_links": {}})),
    });
    let body = json!({"_id": "new1", "_status": "OK", "_updated": "Tue, 01 Jan 2030 00:00:00 GMT"});
    let result = translate(body, "posts", &op).unwrap();

    assert_eq!(serde_json::to_value(&result).unwrap(), json!({"data": {"title": "Hello", "id": "new1"}}));
}

#[test]
fn create_echo_takes_id_from_response_only() {
    let op = Operation::Create(CreateParams {
        data: record(json!({"id": "client", "title": "Hello"})),
    });
    let result = translate(json!({"_id": "server"}), "posts", &op).unwrap();

    let data = result.record().unwrap();
    assert_eq!(data.get("id"), Some(&json!("server")));
    assert!(data.get("_id").is_none());
}

#[test]
fn create_without_response_id_is_malformed() {
    let op = Operation::Create(CreateParams {
        data: record(json!({"title": "Hello"})),
    });
    let err = translate(json!({"_status": "OK"}), "posts", &op).unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[test]
fn update_echoes_payload_with_confirmed_id() {
    let op = Operation::Update(UpdateParams {
        id: "a1".into(),
        data: record(json!({"id": "a1", "title": "Edited"})),
        previous_data: None,
    });
    let result = translate(json!({"_id": "a1", "_status": "OK"}), "posts", &op).unwrap();
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({"data": {"title": "Edited", "id": "a1"}}));
}

#[test]
fn update_falls_back_to_params_id() {
    let op = Operation::Update(UpdateParams {
        id: 4.into(),
        data: record(json!({"title": "Edited"})),
        previous_data: None,
    });
    let result = translate(Value::Null, "posts", &op).unwrap();
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({"data": {"title": "Edited", "id": 4}}));
}

#[test]
fn delete_ignores_body() {
    let op = Operation::Delete(DeleteParams {
        id: "gone".into(),
        previous_data: None,
    });
    for body in [Value::Null, json!({"unexpected": [1, 2]}), json!("text")] {
        let result = translate(body, "posts", &op).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"data": {"id": "gone"}}));
    }
}

// ── Schema notifications ────────────────────────────────────────

#[test]
fn schema_writes_notify_once() {
    let sink = RecordingSink::default();
    let translator = ResponseTranslator::new("schemas", &sink);

    let create = Operation::Create(CreateParams {
        data: record(json!({"name": "post"})),
    });
    let update = Operation::Update(UpdateParams {
        id: "s1".into(),
        data: record(json!({"name": "post"})),
        previous_data: None,
    });
    translator
        .translate(HttpResponse::ok(json!({"_id": "s1"})), "schemas", &create)
        .unwrap();
    translator
        .translate(HttpResponse::ok(json!({"_id": "s1"})), "schemas", &update)
        .unwrap();

    assert_eq!(*sink.0.lock().unwrap(), vec![SCHEMA_UPDATE_EVENT, SCHEMA_UPDATE_EVENT]);
}

#[test]
fn schema_reads_and_deletes_do_not_notify() {
    let sink = RecordingSink::default();
    let translator = ResponseTranslator::new("schemas", &sink);

    translator
        .translate(
            HttpResponse::ok(json!({"_id": "s1"})),
            "schemas",
            &Operation::GetOne(GetOneParams { id: "s1".into() }),
        )
        .unwrap();
    translator
        .translate(
            HttpResponse::ok(Value::Null),
            "schemas",
            &Operation::Delete(DeleteParams {
                id: "s1".into(),
                previous_data: None,
            }),
        )
        .unwrap();

    assert!(sink.0.lock().unwrap().is_empty());
}

#[test]
fn other_resources_never_notify() {
    let sink = RecordingSink::default();
    let translator = ResponseTranslator::new("schemas", &sink);
    let create = Operation::Create(CreateParams {
        data: record(json!({"title": "x"})),
    });
    translator
        .translate(HttpResponse::ok(json!({"_id": 1})), "posts", &create)
        .unwrap();
    assert!(sink.0.lock().unwrap().is_empty());
}

#[test]
fn schema_resource_name_is_configurable() {
    let sink = RecordingSink::default();
    let translator = ResponseTranslator::new("models", &sink);
    let create = Operation::Create(CreateParams { data: Record::new() });

    translator
        .translate(HttpResponse::ok(json!({"_id": 1})), "schemas", &create)
        .unwrap();
    assert!(sink.0.lock().unwrap().is_empty());

    translator
        .translate(HttpResponse::ok(json!({"_id": 1})), "models", &create)
        .unwrap();
    assert_eq!(sink.0.lock().unwrap().len(), 1);
}

// ── Identity invariant ──────────────────────────────────────────

proptest! {
    #[test]
    fn wire_to_abstract_moves_identity(
        id in prop_oneof![any::<i64>().prop_map(Value::from), "[a-f0-9]{24}".prop_map(Value::from)],
        fields in prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..5),
    ) {
        let mut wire: Record = fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
        wire.remove("id");
        wire.insert("_id".to_string(), id.clone());

        let record = wire_to_abstract(wire).unwrap();
        prop_assert_eq!(record.get("id"), Some(&id));
        prop_assert!(record.get("_id").is_none());
    }
}
