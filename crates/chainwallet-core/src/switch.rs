//! Chain switching with add-then-switch recovery.
//!
//! A switch to a chain the wallet does not know fails with code 4902. The
//! orchestrator answers that by registering the chain from the
//! [`ChainRegistry`] and retrying the switch once. Every other failure is
//! returned as is.

use std::sync::Arc;

use serde_json::json;

use crate::chains::ChainRegistry;
use crate::connection::ConnectionManager;
use crate::error::{report, WalletError};
use crate::request::{methods, ProviderRequest};

/// How a switch attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The session was already on the target; nothing was requested.
    AlreadyOnChain,
    /// The wallet accepted the switch.
    Switched,
    /// The chain was added to the wallet and the switch then accepted.
    AddedAndSwitched,
}

impl std::fmt::Display for SwitchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyOnChain => write!(f, "already on chain"),
            Self::Switched => write!(f, "switched"),
            Self::AddedAndSwitched => write!(f, "added and switched"),
        }
    }
}

/// Drives `wallet_switchEthereumChain` / `wallet_addEthereumChain`.
///
/// The orchestrator never mutates the session: the new chain arrives through
/// the provider's `chainChanged` event.
pub struct ChainSwitchOrchestrator {
    registry: Arc<ChainRegistry>,
}

impl ChainSwitchOrchestrator {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self { registry }
    }

    /// Switch the wallet to `target`, adding the chain first if the wallet
    /// reports it as unrecognized. The add is attempted at most once.
    pub async fn switch_chain(
        &self,
        conn: &ConnectionManager,
        target: &str,
    ) -> Result<SwitchOutcome, WalletError> {
        let result = match self.try_switch(conn, target).await {
            Err(WalletError::ChainNotFound { chain_id }) => {
                tracing::warn!(chain_id = %chain_id, "chain not found in wallet, adding it now");
                self.add_then_switch(conn, target).await
            }
            other => other,
        };
        if let Err(e) = &result {
            report("switch_chain", e);
        }
        result
    }

    /// Register `target` with the wallet, then switch to it.
    pub async fn add_chain(
        &self,
        conn: &ConnectionManager,
        target: &str,
    ) -> Result<SwitchOutcome, WalletError> {
        let result = self.add_then_switch(conn, target).await;
        if let Err(e) = &result {
            report("add_chain", e);
        }
        result
    }

    async fn add_then_switch(
        &self,
        conn: &ConnectionManager,
        target: &str,
    ) -> Result<SwitchOutcome, WalletError> {
        self.try_add(conn, target).await?;
        // Single retry; a second 4902 is returned to the caller.
        self.try_switch(conn, target)
            .await
            .map(|_| SwitchOutcome::AddedAndSwitched)
    }

    async fn try_switch(
        &self,
        conn: &ConnectionManager,
        target: &str,
    ) -> Result<SwitchOutcome, WalletError> {
        let (provider, _) = conn.require_connected()?;
        if conn.chain_id().as_deref() == Some(target) {
            tracing::debug!(chain_id = target, "already on the target chain");
            return Ok(SwitchOutcome::AlreadyOnChain);
        }

        let req = ProviderRequest::new(methods::SWITCH_CHAIN, vec![json!({ "chainId": target })]);
        provider
            .request(req)
            .await
            .map_err(|e| WalletError::from_provider(methods::SWITCH_CHAIN, Some(target), e))?;
        tracing::info!(chain_id = target, chain = self.registry.display_name(target), "switched chain");
        Ok(SwitchOutcome::Switched)
    }

    async fn try_add(&self, conn: &ConnectionManager, target: &str) -> Result<(), WalletError> {
        let (provider, _) = conn.require_connected()?;
        let descriptor = self.registry.describe(target)?;
        let params = serde_json::to_value(descriptor)?;

        provider
            .request(ProviderRequest::new(methods::ADD_CHAIN, vec![params]))
            .await
            .map_err(|e| WalletError::from_provider(methods::ADD_CHAIN, None, e))?;
        tracing::info!(chain_id = target, chain = %descriptor.chain_name, "chain added to wallet");
        Ok(())
    }
}
