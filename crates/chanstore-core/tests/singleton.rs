use std::thread;

use chanstore_core::{
    ChannelStore, DataStore, FieldKey, Introspection, Payload, RoleAssignments, StoreError,
    domain::resolve, generate_introspection,
};
use serde_json::json;

// 共有インスタンスを使うので、テストごとに address を分ける

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap()
}

#[test]
fn writes_through_one_handle_are_visible_through_another() {
    let producer = DataStore::instance();
    let consumer = DataStore::instance();

    producer.update("it:handles".into(), payload(json!({ "VALUE": 7 })), None);
    assert_eq!(consumer.fetch("it:handles").unwrap().get("VALUE"), Some(&json!(7)));
}

#[test]
fn writes_from_another_thread_are_visible() {
    thread::spawn(|| {
        DataStore::instance().update("it:thread".into(), payload(json!({ "VALUE": "on" })), None);
    })
    .join()
    .unwrap();

    assert!(DataStore::instance().contains("it:thread"));
}

#[test]
fn never_updated_address_is_absent() {
    let store = DataStore::instance();
    assert_eq!(store.fetch("it:never"), None);
    assert_eq!(store.introspect("it:never"), None);
}

#[test]
fn remove_after_updates_clears_everything() {
    let store = DataStore::instance();
    let overlay = generate_introspection(&RoleAssignments::new().with(FieldKey::Value, "v"));
    store.update("it:remove".into(), payload(json!({ "v": 1 })), Some(overlay));
    store.update("it:remove".into(), payload(json!({ "v": 2 })), None);

    store.remove("it:remove");
    assert_eq!(store.fetch_with_introspection("it:remove"), (None, None));
    store.remove("it:remove");
}

#[test]
fn consumer_falls_back_to_default_overlay() {
    let store = DataStore::instance();
    store.update(
        "it:default".into(),
        payload(json!({ "VALUE": 0.5, "UNIT": "mJ" })),
        None,
    );

    let (data, overlay) = store.fetch_with_introspection("it:default");
    let data = data.unwrap();
    assert_eq!(overlay, None);
    assert_eq!(resolve(&data, overlay.as_ref(), FieldKey::Unit), Some(&json!("mJ")));
    assert_eq!(Introspection::or_default(overlay.as_ref()).len(), FieldKey::ALL.len());
}

#[test]
fn consumer_uses_custom_overlay() {
    let store = DataStore::instance();
    let overlay = generate_introspection(&RoleAssignments {
        value_key: Some("val".to_string()),
        upper_limit_key: Some("hilim".to_string()),
        ..Default::default()
    });
    store.set(
        "it:custom".into(),
        (payload(json!({ "val": 0.1, "hilim": 1.2 })), overlay).into(),
    );

    let (data, overlay) = store.fetch_with_introspection("it:custom");
    let data = data.unwrap();
    assert_eq!(resolve(&data, overlay.as_ref(), FieldKey::UpperLimit), Some(&json!(1.2)));
    assert_eq!(resolve(&data, overlay.as_ref(), FieldKey::LowerLimit), None);
}

#[test]
fn dynamic_indexed_write_rejects_scalars() {
    let err = DataStore::instance()
        .set_json("it:scalar".into(), json!("not a payload"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
    assert!(!DataStore::instance().contains("it:scalar"));
}
