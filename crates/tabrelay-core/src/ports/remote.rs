//! RemoteSubmitter port - target tab 内の capability への送信
//!
//! 1 回の呼び出し = 1 attempt。タイムアウトは持たず、再試行は
//! RetryDriver 側が担当する。

use async_trait::async_trait;

use crate::domain::TabId;
use crate::protocol::{DeliveryError, RemoteRequest, SubmitResponse};

#[async_trait]
pub trait RemoteSubmitter: Send + Sync {
    /// Deliver `request` to the capability in `tab` and wait for its single
    /// response.
    async fn submit(
        &self,
        tab: TabId,
        request: RemoteRequest,
    ) -> Result<SubmitResponse, DeliveryError>;
}
