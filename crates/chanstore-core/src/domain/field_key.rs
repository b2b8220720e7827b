//! FieldKey - payload フィールドの意味役割
//!
//! producer と consumer はこの 9 つの識別子だけを共有する。
//! 集合は閉じていて、実行時に拡張されることはない。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::StoreError;

/// Semantic role of a payload field.
///
/// The declaration order is the iteration order used everywhere
/// (`ALL`, overlay construction, `Ord`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldKey {
    /// Connection state of the channel.
    Connection,
    /// Current value.
    Value,
    /// Alarm severity.
    Severity,
    /// Whether the channel accepts writes.
    WriteAccess,
    /// Labels of an enumerated value.
    EnumStrings,
    /// Engineering unit.
    Unit,
    /// Display precision.
    Precision,
    /// Upper display/control limit.
    UpperLimit,
    /// Lower display/control limit.
    LowerLimit,
}

impl FieldKey {
    pub const ALL: [FieldKey; 9] = [
        FieldKey::Connection,
        FieldKey::Value,
        FieldKey::Severity,
        FieldKey::WriteAccess,
        FieldKey::EnumStrings,
        FieldKey::Unit,
        FieldKey::Precision,
        FieldKey::UpperLimit,
        FieldKey::LowerLimit,
    ];

    /// The symbolic name, also used as the source key of the default overlay.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKey::Connection => "CONNECTION",
            FieldKey::Value => "VALUE",
            FieldKey::Severity => "SEVERITY",
            FieldKey::WriteAccess => "WRITE_ACCESS",
            FieldKey::EnumStrings => "ENUM_STRINGS",
            FieldKey::Unit => "UNIT",
            FieldKey::Precision => "PRECISION",
            FieldKey::UpperLimit => "UPPER_LIMIT",
            FieldKey::LowerLimit => "LOWER_LIMIT",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| StoreError::UnknownFieldKey(s.to_string()))
    }
}
