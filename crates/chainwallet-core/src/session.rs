//! `WalletSession` — the single entry point the host application drives.

use std::sync::Arc;

use crate::chains::ChainRegistry;
use crate::config::WalletConfig;
use crate::connection::ConnectionManager;
use crate::error::WalletError;
use crate::provider::Eip1193Provider;
use crate::state::ConnectionState;
use crate::switch::{ChainSwitchOrchestrator, SwitchOutcome};
use crate::transfer::DemoTransfer;

/// A wallet session: connection, chain switching and the demo transfer.
pub struct WalletSession {
    connection: ConnectionManager,
    switcher: ChainSwitchOrchestrator,
    transfer: DemoTransfer,
}

impl WalletSession {
    pub fn new(provider: Option<Arc<dyn Eip1193Provider>>, config: WalletConfig) -> Self {
        let registry = Arc::new(ChainRegistry::builtin());
        Self {
            connection: ConnectionManager::with_registry(provider, Arc::clone(&registry)),
            switcher: ChainSwitchOrchestrator::new(registry),
            transfer: DemoTransfer::new(config.transfer),
        }
    }

    pub async fn connect(&self) -> Result<ConnectionState, WalletError> {
        self.connection.connect().await
    }

    pub fn disconnect(&self) {
        self.connection.disconnect()
    }

    pub async fn switch_chain(&self, target: &str) -> Result<SwitchOutcome, WalletError> {
        self.switcher.switch_chain(&self.connection, target).await
    }

    pub async fn add_chain(&self, target: &str) -> Result<SwitchOutcome, WalletError> {
        self.switcher.add_chain(&self.connection, target).await
    }

    pub async fn send_demo_transfer(&self) -> Result<String, WalletError> {
        self.transfer.send(&self.connection).await
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }
}
