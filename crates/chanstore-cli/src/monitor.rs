//! Monitor - ストアの読み取り側
//!
//! UI の代わりに、各チャンネルの VALUE / UNIT / SEVERITY を役割経由で
//! 解決してログに出す。overlay が無いチャンネルは default overlay で読む。

use chanstore_core::domain::resolve;
use chanstore_core::{Address, ChannelStore, DataStore, FieldKey};
use serde_json::Value;
use tracing::info;

/// What a display widget would show for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub address: Address,
    pub value: Option<Value>,
    pub unit: Option<String>,
    pub severity: Option<Value>,
    pub custom_introspection: bool,
}

impl Reading {
    fn summary(&self) -> String {
        match &self.value {
            Some(Value::Array(items)) => format!("[{} points]", items.len()),
            Some(value) => value.to_string(),
            None => "<none>".to_string(),
        }
    }
}

pub fn read_channel(store: &dyn ChannelStore, address: &Address) -> Option<Reading> {
    let (payload, introspection) = store.fetch_with_introspection(address.as_str());
    let payload = payload?;
    let overlay = introspection.as_ref();
    Some(Reading {
        address: address.clone(),
        value: resolve(&payload, overlay, FieldKey::Value).cloned(),
        unit: resolve(&payload, overlay, FieldKey::Unit)
            .and_then(Value::as_str)
            .map(str::to_string),
        severity: resolve(&payload, overlay, FieldKey::Severity).cloned(),
        custom_introspection: introspection.is_some(),
    })
}

/// Reads every channel under `prefix` and logs it.
pub fn scan(store: &DataStore, prefix: &str) -> Vec<Reading> {
    let readings: Vec<Reading> = store
        .addresses()
        .iter()
        .filter(|address| address.as_str().starts_with(prefix))
        .filter_map(|address| read_channel(store, address))
        .collect();

    for reading in &readings {
        info!(
            address = %reading.address,
            value = %reading.summary(),
            unit = reading.unit.as_deref().unwrap_or(""),
            severity = ?reading.severity,
            custom = reading.custom_introspection,
            "channel"
        );
    }
    readings
}
