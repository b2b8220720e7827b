//! StoreValue - indexed write の引数
//!
//! 受け付ける形は payload 単体か (payload, overlay) の組だけ。
//! Rust 側では型で表現するので実行時チェックは要らない。
//! 動的な JSON 値から組み立てる場合のみ `InvalidArgument` になる。

use serde_json::Value;

use super::errors::StoreError;
use super::introspection::Introspection;
use super::payload::Payload;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    PayloadOnly(Payload),
    PayloadWithIntrospection(Payload, Introspection),
}

impl StoreValue {
    pub fn into_parts(self) -> (Payload, Option<Introspection>) {
        match self {
            StoreValue::PayloadOnly(payload) => (payload, None),
            StoreValue::PayloadWithIntrospection(payload, introspection) => {
                (payload, Some(introspection))
            }
        }
    }
}

impl From<Payload> for StoreValue {
    fn from(payload: Payload) -> Self {
        StoreValue::PayloadOnly(payload)
    }
}

impl From<(Payload, Introspection)> for StoreValue {
    fn from((payload, introspection): (Payload, Introspection)) -> Self {
        StoreValue::PayloadWithIntrospection(payload, introspection)
    }
}

/// JSON object or `[object, null]` → payload only, `[object, object]` → payload with overlay.
impl TryFrom<Value> for StoreValue {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(payload) => Ok(StoreValue::PayloadOnly(payload)),
            Value::Array(items) => match <[Value; 2]>::try_from(items) {
                Ok([Value::Object(payload), Value::Object(overlay)]) => {
                    let introspection = Introspection::try_from(&overlay)?;
                    Ok(StoreValue::PayloadWithIntrospection(payload, introspection))
                }
                // overlay 省略（None）は payload 単体と同じ
                Ok([Value::Object(payload), Value::Null]) => Ok(StoreValue::PayloadOnly(payload)),
                Ok(_) => Err(StoreError::InvalidArgument(
                    "pair must be [payload object, introspection object]".to_string(),
                )),
                Err(items) => Err(StoreError::InvalidArgument(format!(
                    "expected a pair, got an array of {} elements",
                    items.len()
                ))),
            },
            other => Err(StoreError::InvalidArgument(format!(
                "expected a payload object or a pair, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKey;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn object_becomes_payload_only() {
        let value = StoreValue::try_from(json!({ "VALUE": 1 })).unwrap();
        let (payload, introspection) = value.into_parts();
        assert_eq!(payload.get("VALUE"), Some(&json!(1)));
        assert_eq!(introspection, None);
    }

    #[test]
    fn pair_becomes_payload_with_introspection() {
        let value = StoreValue::try_from(json!([{ "v": 1 }, { "VALUE": "v" }])).unwrap();
        let (payload, introspection) = value.into_parts();
        assert_eq!(payload.get("v"), Some(&json!(1)));
        assert_eq!(introspection.unwrap().key_for(FieldKey::Value), Some("v"));
    }

    #[test]
    fn pair_with_null_introspection_is_payload_only() {
        let value = StoreValue::try_from(json!([{ "v": 1 }, null])).unwrap();
        assert_eq!(value, StoreValue::PayloadOnly(json!({ "v": 1 }).as_object().cloned().unwrap()));
    }

    #[test]
    fn pair_with_unknown_role_is_invalid() {
        let err = StoreValue::try_from(json!([{ "v": 1 }, { "TIMESTAMP": "ts" }])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)), "{err:?}");
    }

    #[rstest]
    #[case::number(json!(42))]
    #[case::string(json!("VALUE"))]
    #[case::null(json!(null))]
    #[case::bool(json!(true))]
    #[case::single(json!([{ "v": 1 }]))]
    #[case::triple(json!([{}, {}, {}]))]
    #[case::pair_of_scalars(json!([1, 2]))]
    fn other_shapes_are_invalid(#[case] value: Value) {
        let err = StoreValue::try_from(value).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)), "{err:?}");
    }
}
