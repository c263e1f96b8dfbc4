//! An in-process wallet that behaves like an injected browser extension.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::{json, Value};

use chainwallet_core::request::{codes, events, methods};
use chainwallet_core::{
    ChainDescriptor, Eip1193Provider, Listener, ListenerId, ProviderRequest, ProviderRpcError,
};

const INVALID_PARAMS: i64 = -32602;

/// Builder for [`SimulatedWallet`].
#[derive(Debug, Clone)]
pub struct WalletBuilder {
    accounts: Vec<String>,
    chain_id: String,
    known_chains: HashSet<String>,
    rejected: HashSet<String>,
    switch_on_add: bool,
}

impl Default for WalletBuilder {
    fn default() -> Self {
        Self {
            accounts: vec![],
            chain_id: "0x1".into(),
            known_chains: HashSet::from(["0x1".to_string()]),
            rejected: HashSet::new(),
            switch_on_add: false,
        }
    }
}

impl WalletBuilder {
    /// Accounts granted on `eth_requestAccounts`, first one selected.
    pub fn accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accounts = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// The active chain. It is always known to the wallet.
    pub fn chain(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self.known_chains.insert(self.chain_id.clone());
        self
    }

    /// Chains the wallet has already been configured with.
    pub fn known_chains<I, S>(mut self, chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_chains.extend(chains.into_iter().map(Into::into));
        self
    }

    /// Make the user decline every request for `method`.
    pub fn reject(mut self, method: impl Into<String>) -> Self {
        self.rejected.insert(method.into());
        self
    }

    /// Switch to a chain as part of approving `wallet_addEthereumChain`.
    pub fn switch_on_add(mut self, enabled: bool) -> Self {
        self.switch_on_add = enabled;
        self
    }

    pub fn build(self) -> Arc<SimulatedWallet> {
        Arc::new(SimulatedWallet {
            name: "simulated".into(),
            inner: Mutex::new(Inner {
                accounts: self.accounts,
                chain_id: self.chain_id,
                known_chains: self.known_chains,
                rejected: self.rejected,
                switch_on_add: self.switch_on_add,
                authorized: false,
                listeners: HashMap::new(),
                requests: vec![],
            }),
            next_listener: AtomicU64::new(1),
            next_tx: AtomicU64::new(1),
        })
    }
}

struct Inner {
    accounts: Vec<String>,
    chain_id: String,
    known_chains: HashSet<String>,
    rejected: HashSet<String>,
    switch_on_add: bool,
    authorized: bool,
    listeners: HashMap<String, Vec<(ListenerId, Listener)>>,
    requests: Vec<ProviderRequest>,
}

/// A pending event, delivered after the state lock is released.
struct Emit {
    event: &'static str,
    payload: Value,
    listeners: Vec<Listener>,
}

impl Emit {
    fn deliver(self) {
        tracing::debug!(event = self.event, listeners = self.listeners.len(), "wallet emitting event");
        for listener in self.listeners {
            listener(&self.payload);
        }
    }
}

impl Inner {
    fn emit(&self, event: &'static str, payload: Value) -> Emit {
        let listeners = self
            .listeners
            .get(event)
            .map(|l| l.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default();
        Emit {
            event,
            payload,
            listeners,
        }
    }

    fn check_rejected(&self, method: &str) -> Result<(), ProviderRpcError> {
        if self.rejected.contains(method) {
            return Err(ProviderRpcError::new(codes::USER_REJECTED, "User rejected the request."));
        }
        Ok(())
    }

    fn check_authorized(&self) -> Result<(), ProviderRpcError> {
        if !self.authorized {
            return Err(ProviderRpcError::new(
                codes::UNAUTHORIZED,
                "The requested account and/or method has not been authorized by the user.",
            ));
        }
        Ok(())
    }

    fn visible_accounts(&self) -> Value {
        if self.authorized {
            json!(self.accounts)
        } else {
            json!([])
        }
    }

    fn change_chain(&mut self, chain_id: &str) -> Option<Emit> {
        if self.chain_id == chain_id {
            return None;
        }
        self.chain_id = chain_id.to_string();
        Some(self.emit(events::CHAIN_CHANGED, json!(chain_id)))
    }
}

/// An EIP-1193 provider backed by in-memory wallet state.
///
/// Approvals are instant; a method configured with
/// [`WalletBuilder::reject`] fails with code 4001 instead.
pub struct SimulatedWallet {
    name: String,
    inner: Mutex<Inner>,
    next_listener: AtomicU64,
    next_tx: AtomicU64,
}

impl SimulatedWallet {
    pub fn builder() -> WalletBuilder {
        WalletBuilder::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.inner().requests.clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.inner().requests.iter().map(|r| r.method.clone()).collect()
    }

    pub fn chain_id(&self) -> String {
        self.inner().chain_id.clone()
    }

    pub fn knows_chain(&self, chain_id: &str) -> bool {
        self.inner().known_chains.contains(chain_id)
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.inner().listeners.get(event).map_or(0, Vec::len)
    }

    /// The user picks different accounts in the wallet.
    pub fn select_accounts<I, S>(&self, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let emit = {
            let mut inner = self.inner();
            inner.accounts = accounts.into_iter().map(Into::into).collect();
            let payload = inner.visible_accounts();
            inner.emit(events::ACCOUNTS_CHANGED, payload)
        };
        emit.deliver();
    }

    /// The user revokes this origin's access from the wallet.
    pub fn revoke(&self) {
        let emit = {
            let mut inner = self.inner();
            inner.authorized = false;
            inner.emit(events::ACCOUNTS_CHANGED, json!([]))
        };
        emit.deliver();
    }

    /// The user changes network from the wallet UI.
    pub fn select_chain(&self, chain_id: &str) {
        let emit = {
            let mut inner = self.inner();
            inner.known_chains.insert(chain_id.to_string());
            inner.change_chain(chain_id)
        };
        if let Some(emit) = emit {
            emit.deliver();
        }
    }

    fn handle(&self, req: &ProviderRequest) -> Result<(Value, Option<Emit>), ProviderRpcError> {
        let mut inner = self.inner();
        inner.requests.push(req.clone());
        match req.method.as_str() {
            methods::REQUEST_ACCOUNTS => {
                inner.check_rejected(&req.method)?;
                inner.authorized = true;
                Ok((inner.visible_accounts(), None))
            }
            methods::ACCOUNTS => Ok((inner.visible_accounts(), None)),
            methods::CHAIN_ID => Ok((json!(inner.chain_id), None)),
            methods::SWITCH_CHAIN => {
                let target = req
                    .params
                    .first()
                    .and_then(|p| p.get("chainId"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| ProviderRpcError::new(INVALID_PARAMS, "Expected chainId"))?
                    .to_string();
                inner.check_rejected(&req.method)?;
                if !inner.known_chains.contains(&target) {
                    return Err(ProviderRpcError::new(
                        codes::UNRECOGNIZED_CHAIN,
                        format!(
                            "Unrecognized chain ID \"{target}\". Try adding the chain using wallet_addEthereumChain first."
                        ),
                    ));
                }
                Ok((Value::Null, inner.change_chain(&target)))
            }
            methods::ADD_CHAIN => {
                let descriptor: ChainDescriptor = req
                    .params
                    .first()
                    .cloned()
                    .and_then(|p| serde_json::from_value(p).ok())
                    .ok_or_else(|| {
                        ProviderRpcError::new(INVALID_PARAMS, "Expected a chain descriptor")
                    })?;
                inner.check_rejected(&req.method)?;
                inner.known_chains.insert(descriptor.chain_id.clone());
                let emit = if inner.switch_on_add {
                    inner.change_chain(&descriptor.chain_id)
                } else {
                    None
                };
                Ok((Value::Null, emit))
            }
            methods::SEND_TRANSACTION => {
                inner.check_authorized()?;
                inner.check_rejected(&req.method)?;
                let n = self.next_tx.fetch_add(1, Ordering::Relaxed);
                Ok((json!(format!("0x{n:064x}")), None))
            }
            other => Err(ProviderRpcError::new(
                codes::UNSUPPORTED_METHOD,
                format!("The method \"{other}\" is not supported"),
            )),
        }
    }
}

#[async_trait]
impl Eip1193Provider for SimulatedWallet {
    async fn request(&self, req: ProviderRequest) -> Result<Value, ProviderRpcError> {
        tracing::debug!(method = %req.method, "wallet received request");
        let (result, emit) = self.handle(&req)?;
        if let Some(emit) = emit {
            emit.deliver();
        }
        Ok(result)
    }

    fn on(&self, event: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.inner()
            .listeners
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut inner = self.inner();
        let Some(list) = inner.listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        list.len() != before
    }

    fn name(&self) -> &str {
        &self.name
    }
}
