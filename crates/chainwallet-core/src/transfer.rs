//! The demonstration value transfer.

use serde::Serialize;

use crate::config::TransferConfig;
use crate::connection::ConnectionManager;
use crate::error::{report, WalletError};
use crate::request::methods;

/// Parameters of `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    pub value: String,
}

/// Sends the fixed transfer from the connected account.
pub struct DemoTransfer {
    config: TransferConfig,
}

impl DemoTransfer {
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    /// Build the transaction for `from`.
    pub fn request_for(&self, from: &str) -> TransactionRequest {
        TransactionRequest {
            from: from.to_string(),
            to: self.config.to.clone(),
            value: self.config.value.clone(),
        }
    }

    /// Submit the transfer and return the transaction hash.
    pub async fn send(&self, conn: &ConnectionManager) -> Result<String, WalletError> {
        let result = self.try_send(conn).await;
        if let Err(e) = &result {
            report("send_transaction", e);
        }
        result
    }

    async fn try_send(&self, conn: &ConnectionManager) -> Result<String, WalletError> {
        let (provider, account) = conn.require_connected()?;
        let tx = serde_json::to_value(self.request_for(&account))?;
        let hash: String = provider.call(methods::SEND_TRANSACTION, vec![tx]).await?;
        tracing::info!(
            from = %account,
            to = %self.config.to,
            value = %self.config.value,
            tx_hash = %hash,
            "transaction submitted"
        );
        Ok(hash)
    }
}

impl Default for DemoTransfer {
    fn default() -> Self {
        Self::new(TransferConfig::default())
    }
}
