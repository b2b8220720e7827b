//! Producer - ストアへの書き込み側
//!
//! 実データ源（デバイス、シミュレータなど）はこの trait を実装して
//! 周期的に `publish` される。終了時は `shutdown` で自分のチャンネルを消す。

use async_trait::async_trait;
use chanstore_core::ChannelStore;

#[async_trait]
pub trait ChannelProducer: Send {
    fn name(&self) -> &'static str;

    /// Pushes the latest snapshot of every owned channel.
    async fn publish(&mut self, store: &dyn ChannelStore) -> anyhow::Result<()>;

    /// Removes every owned channel.
    async fn shutdown(&mut self, store: &dyn ChannelStore);
}
