//! Introspection - 役割 → payload キーの対応表（overlay）
//!
//! # 2 種類の overlay
//! - **default**: 全役割が自分の名前にマップされる（`VALUE` → `"VALUE"`）
//! - **custom**: producer が指定した役割だけを含む。指定されなかった役割は
//!   「存在しない」のであって、既定キーが入るわけではない
//!
//! consumer は store に overlay が無いときだけ default を使う。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::errors::StoreError;
use super::field_key::FieldKey;

/// Mapping from role to the payload key carrying that role's information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Introspection(BTreeMap<FieldKey, String>);

impl Introspection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: FieldKey, source_key: impl Into<String>) {
        self.0.insert(role, source_key.into());
    }

    /// Payload key for `role`, if this overlay maps it.
    pub fn key_for(&self, role: FieldKey) -> Option<&str> {
        self.0.get(&role).map(String::as_str)
    }

    pub fn contains(&self, role: FieldKey) -> bool {
        self.0.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in role declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.0.iter().map(|(role, key)| (*role, key.as_str()))
    }

    /// The recorded overlay, or the default one when nothing was recorded.
    pub fn or_default(recorded: Option<&Introspection>) -> &Introspection {
        recorded.unwrap_or_else(|| default_introspection())
    }
}

impl FromIterator<(FieldKey, String)> for Introspection {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 動的な JSON object からの変換（indexed write の境界で使う）
impl TryFrom<&Map<String, Value>> for Introspection {
    type Error = StoreError;

    fn try_from(object: &Map<String, Value>) -> Result<Self, Self::Error> {
        object
            .iter()
            .map(|(name, key)| {
                let role = name.parse::<FieldKey>().map_err(|_| {
                    StoreError::InvalidArgument(format!("'{name}' is not a field key"))
                })?;
                match key {
                    Value::String(key) => Ok((role, key.clone())),
                    other => Err(StoreError::InvalidArgument(format!(
                        "source key for {role} must be a string, got {other}"
                    ))),
                }
            })
            .collect()
    }
}

/// Optional source key per role, consumed by [`generate_introspection`].
///
/// `None` and `Some("")` both mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignments {
    pub connection_key: Option<String>,
    pub value_key: Option<String>,
    pub severity_key: Option<String>,
    pub write_access_key: Option<String>,
    pub enum_strings_key: Option<String>,
    pub unit_key: Option<String>,
    pub precision_key: Option<String>,
    pub upper_limit_key: Option<String>,
    pub lower_limit_key: Option<String>,
}

impl RoleAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source key for `role`.
    pub fn with(mut self, role: FieldKey, source_key: impl Into<String>) -> Self {
        *self.slot_mut(role) = Some(source_key.into());
        self
    }

    pub fn get(&self, role: FieldKey) -> Option<&str> {
        let slot = match role {
            FieldKey::Connection => &self.connection_key,
            FieldKey::Value => &self.value_key,
            FieldKey::Severity => &self.severity_key,
            FieldKey::WriteAccess => &self.write_access_key,
            FieldKey::EnumStrings => &self.enum_strings_key,
            FieldKey::Unit => &self.unit_key,
            FieldKey::Precision => &self.precision_key,
            FieldKey::UpperLimit => &self.upper_limit_key,
            FieldKey::LowerLimit => &self.lower_limit_key,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, role: FieldKey) -> &mut Option<String> {
        match role {
            FieldKey::Connection => &mut self.connection_key,
            FieldKey::Value => &mut self.value_key,
            FieldKey::Severity => &mut self.severity_key,
            FieldKey::WriteAccess => &mut self.write_access_key,
            FieldKey::EnumStrings => &mut self.enum_strings_key,
            FieldKey::Unit => &mut self.unit_key,
            FieldKey::Precision => &mut self.precision_key,
            FieldKey::UpperLimit => &mut self.upper_limit_key,
            FieldKey::LowerLimit => &mut self.lower_limit_key,
        }
    }
}

/// Builds a custom overlay holding exactly the roles with a non-empty key.
pub fn generate_introspection(assignments: &RoleAssignments) -> Introspection {
    FieldKey::ALL
        .into_iter()
        .filter_map(|role| match assignments.get(role) {
            Some(key) if !key.is_empty() => Some((role, key.to_string())),
            _ => None,
        })
        .collect()
}

static DEFAULT_INTROSPECTION: LazyLock<Introspection> = LazyLock::new(|| {
    FieldKey::ALL
        .into_iter()
        .map(|role| (role, role.as_str().to_string()))
        .collect()
});

/// Overlay mapping every role to its own symbolic name.
pub fn default_introspection() -> &'static Introspection {
    &DEFAULT_INTROSPECTION
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn only_value_key_yields_single_entry() {
        let assignments = RoleAssignments {
            value_key: Some("V".to_string()),
            ..Default::default()
        };
        let overlay = generate_introspection(&assignments);

        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.key_for(FieldKey::Value), Some("V"));
        for role in FieldKey::ALL.into_iter().filter(|r| *r != FieldKey::Value) {
            assert!(!overlay.contains(role), "{role} should be absent");
        }
    }

    #[test]
    fn empty_keys_are_skipped() {
        let assignments = RoleAssignments::new()
            .with(FieldKey::Unit, "")
            .with(FieldKey::Precision, "prec");
        let overlay = generate_introspection(&assignments);

        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.key_for(FieldKey::Unit), None);
        assert_eq!(overlay.key_for(FieldKey::Precision), Some("prec"));
    }

    #[test]
    fn nothing_supplied_gives_empty_overlay() {
        assert!(generate_introspection(&RoleAssignments::new()).is_empty());
    }

    #[test]
    fn full_assignment_iterates_in_declaration_order() {
        let assignments = FieldKey::ALL
            .into_iter()
            .fold(RoleAssignments::new(), |acc, role| {
                acc.with(role, role.as_str().to_lowercase())
            });
        let overlay = generate_introspection(&assignments);

        let roles: Vec<FieldKey> = overlay.iter().map(|(role, _)| role).collect();
        assert_eq!(roles, FieldKey::ALL.to_vec());
        assert_eq!(overlay.key_for(FieldKey::WriteAccess), Some("write_access"));
    }

    #[rstest]
    #[case(FieldKey::Connection)]
    #[case(FieldKey::Severity)]
    #[case(FieldKey::EnumStrings)]
    #[case(FieldKey::LowerLimit)]
    fn default_maps_role_to_its_own_name(#[case] role: FieldKey) {
        assert_eq!(default_introspection().key_for(role), Some(role.as_str()));
    }

    #[test]
    fn default_is_computed_once() {
        assert!(std::ptr::eq(default_introspection(), default_introspection()));
        assert_eq!(default_introspection().len(), FieldKey::ALL.len());
    }

    #[test]
    fn or_default_prefers_recorded_overlay() {
        let custom = generate_introspection(&RoleAssignments::new().with(FieldKey::Value, "v"));
        assert_eq!(Introspection::or_default(Some(&custom)), &custom);
        assert_eq!(Introspection::or_default(None), default_introspection());
    }

    #[test]
    fn parses_from_json_object() {
        let object = json!({ "VALUE": "value", "UNIT": "units" });
        let overlay = Introspection::try_from(object.as_object().unwrap()).unwrap();
        assert_eq!(overlay.key_for(FieldKey::Value), Some("value"));
        assert_eq!(overlay.key_for(FieldKey::Unit), Some("units"));
    }

    #[test]
    fn json_object_with_unknown_role_is_rejected() {
        let object = json!({ "VALUE": "value", "TIMESTAMP": "ts" });
        let err = Introspection::try_from(object.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidArgument("'TIMESTAMP' is not a field key".to_string())
        );
    }

    #[test]
    fn json_object_with_non_string_key_is_rejected() {
        let object = json!({ "VALUE": 3 });
        let err = Introspection::try_from(object.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }
}
