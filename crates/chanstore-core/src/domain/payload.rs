//! Payload - チャンネルの最新スナップショット
//!
//! キーは producer が決める。ストアは中身を解釈せず、overlay との
//! 整合性も検証しない。役割での参照は consumer 側で [`resolve`] を使う。

use serde_json::{Map, Value};

use super::field_key::FieldKey;
use super::introspection::Introspection;

/// Arbitrary source key → value mapping.
pub type Payload = Map<String, Value>;

/// Looks up the field carrying `role`.
///
/// Falls back to the default overlay only when `introspection` is `None`.
/// A recorded overlay that lacks `role` resolves to `None`.
pub fn resolve<'a>(
    payload: &'a Payload,
    introspection: Option<&Introspection>,
    role: FieldKey,
) -> Option<&'a Value> {
    let key = Introspection::or_default(introspection).key_for(role)?;
    payload.get(key)
}
