use client::ApiError;
use client::transport::{RawBody, classify_body};
use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::{Map, Value, json};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn object_without_code() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-bd-z][a-z]{0,6}", scalar(), 0..6)
        .prop_map(|fields| fields.into_iter().collect())
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn plain_text_passes_through_trimmed(text in "[a-zA-Z0-9][ -~]{0,40}") {
        let padded = format!("  {text}\n");
        let envelope = classify_body(RawBody::Text(padded)).unwrap();
        prop_assert_eq!(envelope.code, 200);
        prop_assert_eq!(envelope.data, Value::String(text.trim().to_string()));
    }

    #[test]
    fn objects_without_code_become_data(object in object_without_code()) {
        let envelope = classify_body(RawBody::Json(Value::Object(object.clone()))).unwrap();
        prop_assert_eq!(envelope.message, "ok");
        prop_assert_eq!(envelope.data, Value::Object(object));
    }

    #[test]
    fn any_code_but_200_is_rejected(
        code in any::<i64>().prop_filter("success code", |c| *c != 200),
        message in "[a-z]{1,10}",
    ) {
        let result = classify_body(RawBody::Json(json!({"code": code, "message": message})));
        match result {
            Err(ApiError::RequestRejected { code: got, message: msg }) => {
                prop_assert_eq!(got, json!(code));
                prop_assert_eq!(msg, message);
            }
            other => prop_assert!(false, "expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn code_200_objects_are_returned_unchanged(extra in object_without_code(), data in scalar()) {
        let mut object = extra;
        object.insert("code".into(), json!(200));
        object.insert("message".into(), json!("ok"));
        object.insert("data".into(), data);
        let original = Value::Object(object.clone());

        let envelope = classify_body(RawBody::Json(original.clone())).unwrap();
        prop_assert_eq!(envelope.to_value(), original);
    }
}
