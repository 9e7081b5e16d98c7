//! End-to-end tests against the public crate surface: build a schema,
//! fetch serializers through the register, and push payloads both ways.

use std::sync::Arc;
use wirescope::prelude::*;

fn obj(entries: Vec<(&str, Value)>) -> Value {
    Value::from_entries(entries).expect("test objects use unique keys")
}

fn schema() -> Schema {
    let user = ModelSchema::build("User")
        .field(Field::new("id", FieldKind::Uint))
        .field(Field::new("name", FieldKind::Text).validator(Validator::non_empty()))
        .field(Field::new("email", FieldKind::Text))
        .field(Field::new("joined", FieldKind::Text).read_only())
        .finish()
        .expect("user model should build");

    let post = ModelSchema::build("Post")
        .field(Field::new("id", FieldKind::Uint))
        .field(
            Field::new("title", FieldKind::Text)
                .validator(Validator::non_empty())
                .validator(Validator::max_len(64)),
        )
        .field(Field::new("author", FieldKind::nested("User")))
        .field(Field::new("draft", FieldKind::Bool).default_value(true))
        .finish()
        .expect("post model should build");

    Schema::build()
        .model(user)
        .model(post)
        .scope(Scope::new("default", "User"))
        .scope(Scope::new("default", "Post"))
        .scope(
            Scope::new("public", "User").pattern(Pattern::Chain(vec![
                Pattern::exclude(&["email"]),
                Pattern::rename("name", "display_name"),
            ])),
        )
        .finish()
        .expect("schema should build")
}

#[test]
fn register_serves_serializers_for_every_registered_pair() {
    let register = Register::new(Arc::new(schema()));

    let public = register
        .get("User", "public")
        .expect("registered pair should resolve");

    let wire = public.encode(&obj(vec![
        ("id", Value::Uint(1)),
        ("name", Value::Text("Ada".into())),
        ("email", Value::Text("ada@example.com".into())),
        ("joined", Value::Text("2024-01-01".into())),
    ]));

    let json = serde_json::to_string(&wire).expect("wire tree should serialize");
    assert_eq!(
        json,
        r#"{"id":1,"display_name":"Ada","joined":"2024-01-01"}"#,
        "excluded fields vanish and renames apply on the wire"
    );
}

#[test]
fn create_decode_applies_defaults_and_nested_scopes() {
    let register = Register::new(Arc::new(schema()));
    let posts = register
        .get("Post", "default")
        .expect("registered pair should resolve");

    let payload = obj(vec![
        ("id", Value::Uint(10)),
        ("title", Value::Text("hello".into())),
        (
            "author",
            obj(vec![
                ("id", Value::Uint(1)),
                ("name", Value::Text("Ada".into())),
                ("email", Value::Text("ada@example.com".into())),
            ]),
        ),
    ]);

    let decoded = posts
        .decode(&payload, DecodeMode::Create)
        .expect("valid payload should decode");

    assert_eq!(decoded.get("draft"), Some(&Value::Bool(true)));
    let author = decoded.get("author").expect("author should decode");
    assert_eq!(author.get("name"), Some(&Value::Text("Ada".into())));
    assert!(
        !author.contains_key("joined"),
        "nested read-only fields are not writable"
    );
}

#[test]
fn decode_failures_arrive_as_one_aggregated_report() {
    let register = Register::new(Arc::new(schema()));
    let posts = register
        .get("Post", "default")
        .expect("registered pair should resolve");

    // Missing id, empty title, author with an empty name: three issues.
    let payload = obj(vec![
        ("title", Value::Text(String::new())),
        (
            "author",
            obj(vec![
                ("id", Value::Uint(1)),
                ("name", Value::Text(String::new())),
                ("email", Value::Text("a@x".into())),
            ]),
        ),
    ]);

    let err = posts
        .decode(&payload, DecodeMode::Create)
        .expect_err("invalid payload should fail");

    assert_eq!(err.len(), 3);
    let by_path = err.by_path();
    assert!(by_path.contains_key("id"));
    assert!(by_path.contains_key("title"));
    assert!(by_path.contains_key("author.name"));

    let rendered = err.to_string();
    assert!(rendered.starts_with("decode failed with 3 issue(s)"));
}

#[test]
fn partial_decode_touches_only_present_fields() {
    let register = Register::new(Arc::new(schema()));
    let posts = register
        .get("Post", "default")
        .expect("registered pair should resolve");

    let decoded = posts
        .decode(
            &obj(vec![("title", Value::Text("renamed".into()))]),
            DecodeMode::Partial,
        )
        .expect("partial payload should decode");

    assert_eq!(decoded.get("title"), Some(&Value::Text("renamed".into())));
    assert!(!decoded.contains_key("draft"), "defaults are create-only");
    assert!(!decoded.contains_key("id"));
}

#[test]
fn json_payloads_flow_through_the_value_tree() {
    let register = Register::new(Arc::new(schema()));
    let users = register
        .get("User", "default")
        .expect("registered pair should resolve");

    let payload: Value = serde_json::from_str(
        r#"{"id":7,"name":"Grace","email":"grace@example.com"}"#,
    )
    .expect("payload should parse");

    let decoded = users
        .decode(&payload, DecodeMode::Create)
        .expect("valid payload should decode");
    assert_eq!(decoded.get("id"), Some(&Value::Uint(7)));

    let round = serde_json::to_string(&users.encode(&decoded)).expect("should serialize");
    assert_eq!(
        round,
        r#"{"id":7,"name":"Grace","email":"grace@example.com","joined":null}"#
    );
}

#[test]
fn observability_counters_track_engine_calls() {
    let register = Register::new(Arc::new(schema()));
    let users = register
        .get("User", "default")
        .expect("registered pair should resolve");

    let before = wirescope::core::obs::snapshot();

    let _ = users.encode(&obj(vec![("id", Value::Uint(1))]));
    let _ = users.decode(&obj(vec![]), DecodeMode::Partial);
    let _ = users.decode(&obj(vec![]), DecodeMode::Create);

    // Counters are process-wide and sibling tests run concurrently, so
    // assert deltas as lower bounds.
    let after = wirescope::core::obs::snapshot();
    assert!(after.encode_calls >= before.encode_calls + 1);
    assert!(after.decode_calls >= before.decode_calls + 2);
    assert!(
        after.decode_failures >= before.decode_failures + 1,
        "the create decode fails"
    );
    assert!(after.decode_issues >= before.decode_issues + 2, "missing id, name and email");
}
