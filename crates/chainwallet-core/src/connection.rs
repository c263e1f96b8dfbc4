//! Connection manager — owns the session state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::chains::ChainRegistry;
use crate::error::{report, WalletError};
use crate::events::EventSubscriptionManager;
use crate::provider::Eip1193Provider;
use crate::request::methods;
use crate::state::{truncate_address, ConnectionState, SessionState};

/// Owns the session value and the provider listeners that mutate it.
pub struct ConnectionManager {
    provider: Option<Arc<dyn Eip1193Provider>>,
    session: Arc<watch::Sender<SessionState>>,
    subscriptions: EventSubscriptionManager,
    registry: Arc<ChainRegistry>,
}

impl ConnectionManager {
    /// `provider` is whatever the host injected, or `None` without a wallet.
    pub fn new(provider: Option<Arc<dyn Eip1193Provider>>) -> Self {
        Self::with_registry(provider, Arc::new(ChainRegistry::builtin()))
    }

    pub fn with_registry(
        provider: Option<Arc<dyn Eip1193Provider>>,
        registry: Arc<ChainRegistry>,
    ) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        let session = Arc::new(tx);
        Self {
            provider,
            subscriptions: EventSubscriptionManager::new(Arc::clone(&session)),
            session,
            registry,
        }
    }

    /// Request account access and, if granted, start tracking the wallet.
    ///
    /// Only the first returned account is used. An empty account list leaves
    /// the session disconnected. If the chain lookup fails after access was
    /// granted, the session stays connected with an unknown chain.
    pub async fn connect(&self) -> Result<ConnectionState, WalletError> {
        let provider = match self.require_provider() {
            Ok(provider) => provider,
            Err(e) => {
                report("connect", &e);
                return Err(e);
            }
        };

        let accounts: Vec<String> = match provider.call(methods::REQUEST_ACCOUNTS, vec![]).await {
            Ok(accounts) => accounts,
            Err(e) => {
                report("connect", &e);
                return Err(e);
            }
        };

        let Some(account) = accounts.first().filter(|a| !a.is_empty()) else {
            tracing::info!("wallet returned no accounts");
            return Ok(self.state());
        };
        self.session.send_if_modified(|s| s.set_accounts(&accounts));
        tracing::info!(account = %account, granted = accounts.len(), "wallet connected");
        self.subscriptions.attach(provider);

        match provider.call::<String>(methods::CHAIN_ID, vec![]).await {
            Ok(chain_id) => {
                tracing::info!(chain_id = %chain_id, chain = self.registry.display_name(&chain_id), "active chain");
                self.session.send_if_modified(|s| s.set_chain(&chain_id));
            }
            Err(e) => report("connect", &e),
        }
        Ok(self.state())
    }

    /// Stop tracking the wallet and forget the account and chain.
    ///
    /// This is local only: the wallet keeps its own authorization for this
    /// origin until the user revokes it there.
    pub fn disconnect(&self) {
        self.subscriptions.detach();
        if self.session.send_if_modified(SessionState::reset) {
            tracing::info!("disconnected; revoke access in the wallet to disconnect fully");
        }
    }

    pub fn provider(&self) -> Option<&Arc<dyn Eip1193Provider>> {
        self.provider.as_ref()
    }

    pub fn state(&self) -> ConnectionState {
        self.session.borrow().connection()
    }

    pub fn snapshot(&self) -> SessionState {
        self.session.borrow().clone()
    }

    /// A feed of session changes for presentation.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_connected()
    }

    pub fn account(&self) -> Option<String> {
        self.session.borrow().account().map(str::to_string)
    }

    pub fn chain_id(&self) -> Option<String> {
        self.session.borrow().chain_id().map(str::to_string)
    }

    /// Display name of the active chain.
    pub fn chain_name(&self) -> &'static str {
        let session = self.session.borrow();
        self.registry.display_name(session.chain_id().unwrap_or_default())
    }

    /// The connected account shortened for display, or `""`.
    pub fn display_account(&self) -> String {
        truncate_address(self.session.borrow().account().unwrap_or_default())
    }

    /// Registration status of the provider listeners. Read only: listeners
    /// are attached to this manager's own provider by `connect`.
    pub fn subscriptions(&self) -> &EventSubscriptionManager {
        &self.subscriptions
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    fn require_provider(&self) -> Result<&Arc<dyn Eip1193Provider>, WalletError> {
        self.provider.as_ref().ok_or(WalletError::ProviderUnavailable)
    }

    /// The provider and account, if a request may be issued on their behalf.
    pub(crate) fn require_connected(
        &self,
    ) -> Result<(&Arc<dyn Eip1193Provider>, String), WalletError> {
        let provider = self.require_provider()?;
        let account = self.account().ok_or(WalletError::NotConnected)?;
        Ok((provider, account))
    }
}
