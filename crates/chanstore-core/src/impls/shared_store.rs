//! DataStore - プロセス共有のチャンネルストア
//!
//! # 実装詳細
//! - `OnceLock` で初回アクセス時に 1 度だけ初期化する（明示的な破棄はない）
//! - payload 表と overlay 表を 1 つの `RwLock` で守る。remove は両方を同時に消す
//! - payload は `Arc` で保持し、fetch はロック中に参照カウントを増やすだけ
//!
//! # 使用例
//! ```ignore
//! let store = DataStore::instance();
//! store.update("MTEST:Float".into(), payload, Some(overlay));
//! let (data, overlay) = store.fetch_with_introspection("MTEST:Float");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::{Address, Introspection, Payload, StoreError, StoreValue};
use crate::ports::ChannelStore;

static INSTANCE: OnceLock<DataStore> = OnceLock::new();

#[derive(Default)]
struct Tables {
    data: HashMap<Address, Arc<Payload>>,
    introspection: HashMap<Address, Introspection>,
}

/// The single channel store of the process.
pub struct DataStore {
    tables: RwLock<Tables>,
}

impl DataStore {
    fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Returns the shared instance, creating it on first use.
    pub fn instance() -> &'static DataStore {
        INSTANCE.get_or_init(|| {
            debug!("initializing channel store");
            DataStore::new()
        })
    }

    // 書き込みは表のエントリを丸ごと差し替えるだけなので、
    // poison されても途中状態は残らない
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a payload is recorded for `address`.
    pub fn contains(&self, address: &str) -> bool {
        self.read().data.contains_key(address)
    }

    /// Sorted snapshot of the addresses holding a payload.
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.read().data.keys().cloned().collect();
        addresses.sort();
        addresses
    }

    /// Indexed write from a dynamically typed value.
    ///
    /// Accepts a JSON object or a `[payload, introspection]` pair, anything
    /// else is [`StoreError::InvalidArgument`].
    pub fn set_json(&self, address: Address, value: Value) -> Result<(), StoreError> {
        let value = StoreValue::try_from(value)?;
        self.set(address, value);
        Ok(())
    }
}

impl ChannelStore for DataStore {
    fn introspect(&self, address: &str) -> Option<Introspection> {
        trace!(%address, "introspect");
        self.read().introspection.get(address).cloned()
    }

    fn fetch(&self, address: &str) -> Option<Arc<Payload>> {
        trace!(%address, "fetch");
        self.read().data.get(address).cloned()
    }

    fn fetch_with_introspection(
        &self,
        address: &str,
    ) -> (Option<Arc<Payload>>, Option<Introspection>) {
        trace!(%address, "fetch with introspection");
        let tables = self.read();
        (
            tables.data.get(address).cloned(),
            tables.introspection.get(address).cloned(),
        )
    }

    fn update(&self, address: Address, payload: Payload, introspection: Option<Introspection>) {
        let payload = Arc::new(payload);
        let introspection = introspection.filter(|overlay| !overlay.is_empty());
        debug!(%address, fields = payload.len(), with_introspection = introspection.is_some(), "update");

        let mut tables = self.write();
        if let Some(introspection) = introspection {
            tables.introspection.insert(address.clone(), introspection);
        }
        tables.data.insert(address, payload);
    }

    fn remove(&self, address: &str) {
        let mut tables = self.write();
        let had_data = tables.data.remove(address).is_some();
        let had_introspection = tables.introspection.remove(address).is_some();
        debug!(%address, had_data, had_introspection, "remove");
    }
}
