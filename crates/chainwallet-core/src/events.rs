//! Provider event subscriptions.
//!
//! The provider pushes named events with a JSON payload. Each registered
//! listener parses its payload into a [`ProviderEvent`] and applies it to the
//! shared [`SessionState`]. Registration is tracked so that every `attach` is
//! balanced by exactly one removal per event name.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::watch;

use crate::error::WalletError;
use crate::provider::{Eip1193Provider, Listener, ListenerId};
use crate::request::events;
use crate::state::SessionState;

/// A state-relevant event pushed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
}

impl ProviderEvent {
    /// Parse the payload of the named event.
    pub fn parse(event: &str, payload: &Value) -> Result<Self, WalletError> {
        let invalid = |reason: &str| WalletError::InvalidEvent {
            event: event.to_string(),
            reason: reason.to_string(),
        };
        match event {
            events::ACCOUNTS_CHANGED => {
                let list = payload.as_array().ok_or_else(|| invalid("expected an address list"))?;
                let accounts = list
                    .iter()
                    .map(|a| a.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| invalid("addresses must be strings"))?;
                Ok(Self::AccountsChanged(accounts))
            }
            events::CHAIN_CHANGED => match payload {
                Value::String(s) => Ok(Self::ChainChanged(s.clone())),
                // Older wallets emitted the chain as a decimal number.
                Value::Number(n) => n
                    .as_u64()
                    .map(|id| Self::ChainChanged(format!("0x{id:x}")))
                    .ok_or_else(|| invalid("chain id out of range")),
                _ => Err(invalid("expected a chain id")),
            },
            _ => Err(invalid("unsupported event")),
        }
    }

}

struct Attachment {
    provider: Arc<dyn Eip1193Provider>,
    listeners: Vec<(&'static str, ListenerId)>,
}

/// Attaches and detaches the session's provider listeners.
///
/// Only the owning [`ConnectionManager`](crate::ConnectionManager) attaches or
/// detaches; callers outside the crate see the registration status only.
pub struct EventSubscriptionManager {
    session: Arc<watch::Sender<SessionState>>,
    attached: Mutex<Option<Attachment>>,
}

impl EventSubscriptionManager {
    pub(crate) fn new(session: Arc<watch::Sender<SessionState>>) -> Self {
        Self {
            session,
            attached: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Attachment>> {
        self.attached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one `accountsChanged` and one `chainChanged` listener.
    ///
    /// Attaching the provider that is already attached is a no-op; attaching a
    /// different provider detaches the previous one first.
    pub(crate) fn attach(&self, provider: &Arc<dyn Eip1193Provider>) {
        let mut slot = self.slot();
        if let Some(current) = slot.as_ref() {
            if same_provider(&current.provider, provider) {
                tracing::debug!(provider = provider.name(), "listeners already attached");
                return;
            }
        }
        if let Some(previous) = slot.take() {
            remove_all(previous);
        }

        let listeners = [events::ACCOUNTS_CHANGED, events::CHAIN_CHANGED]
            .into_iter()
            .map(|event| {
                let id = provider.on(event, self.listener(event));
                (event, id)
            })
            .collect();
        tracing::debug!(provider = provider.name(), "attached provider listeners");
        *slot = Some(Attachment {
            provider: Arc::clone(provider),
            listeners,
        });
    }

    /// Remove every listener registered by [`attach`](Self::attach). Idempotent.
    pub(crate) fn detach(&self) {
        match self.slot().take() {
            Some(attachment) => remove_all(attachment),
            None => tracing::debug!("no provider listeners to detach"),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.slot().is_some()
    }

    /// Number of listeners currently registered with the provider.
    pub fn listener_count(&self) -> usize {
        self.slot().as_ref().map_or(0, |a| a.listeners.len())
    }

    fn listener(&self, event: &'static str) -> Listener {
        let session = Arc::clone(&self.session);
        Arc::new(move |payload: &Value| {
            let parsed = match ProviderEvent::parse(event, payload) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed provider event");
                    return;
                }
            };
            let changed = session.send_if_modified(|state| state.apply(&parsed));
            if changed {
                let state = session.borrow();
                tracing::info!(
                    event,
                    account = state.account().unwrap_or(""),
                    chain_id = state.chain_id().unwrap_or(""),
                    "session updated from provider event"
                );
            }
        })
    }
}

impl Drop for EventSubscriptionManager {
    fn drop(&mut self) {
        self.detach();
    }
}

fn remove_all(attachment: Attachment) {
    for (event, id) in attachment.listeners {
        if !attachment.provider.remove_listener(event, id) {
            tracing::debug!(event, %id, "listener was already gone");
        }
    }
    tracing::debug!(provider = attachment.provider.name(), "detached provider listeners");
}

fn same_provider(a: &Arc<dyn Eip1193Provider>, b: &Arc<dyn Eip1193Provider>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
