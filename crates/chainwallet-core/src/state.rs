//! Session state and its transitions.

use crate::events::ProviderEvent;

/// Whether the session currently holds an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected {
        account: String,
        /// `None` until the wallet has reported its chain.
        chain_id: Option<String>,
    },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Connected { account, .. } => Some(account),
            Self::Disconnected => None,
        }
    }

    pub fn chain_id(&self) -> Option<&str> {
        match self {
            Self::Connected { chain_id, .. } => chain_id.as_deref(),
            Self::Disconnected => None,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected { account, chain_id } => write!(
                f,
                "connected {} on {}",
                truncate_address(account),
                chain_id.as_deref().unwrap_or("?")
            ),
        }
    }
}

/// The session value owned by the connection manager.
///
/// The account is present iff the session is connected. The chain is the last
/// one the wallet reported and survives an account revocation, so that a later
/// `accountsChanged` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    account: Option<String>,
    chain_id: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> ConnectionState {
        match &self.account {
            Some(account) => ConnectionState::Connected {
                account: account.clone(),
                chain_id: self.chain_id.clone(),
            },
            None => ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Last chain reported by the wallet, even while disconnected.
    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }

    /// Take the first non-empty account of `accounts`; disconnect otherwise.
    ///
    /// Returns `true` if the state changed.
    pub fn set_accounts(&mut self, accounts: &[String]) -> bool {
        let next = accounts.first().filter(|a| !a.is_empty()).cloned();
        if self.account == next {
            return false;
        }
        self.account = next;
        true
    }

    /// Returns `true` if the state changed.
    pub fn set_chain(&mut self, chain_id: &str) -> bool {
        if self.chain_id.as_deref() == Some(chain_id) {
            return false;
        }
        self.chain_id = Some(chain_id.to_string());
        true
    }

    /// Clear account and chain.
    pub fn reset(&mut self) -> bool {
        let changed = self.account.is_some() || self.chain_id.is_some();
        *self = Self::default();
        changed
    }

    /// Apply a provider event. Returns `true` if the state changed.
    pub fn apply(&mut self, event: &ProviderEvent) -> bool {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.set_accounts(accounts),
            ProviderEvent::ChainChanged(chain_id) => self.set_chain(chain_id),
        }
    }
}

/// Shorten an address for display: `0x1234...5678`.
///
/// Keeps the first six and the last four characters. The empty address
/// truncates to the empty string.
pub fn truncate_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let head: String = address.chars().take(6).collect();
    let count = address.chars().count();
    let tail: String = address.chars().skip(count.saturating_sub(4)).collect();
    format!("{head}...{tail}")
}
