//! Scripted provider shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use chainwallet_core::{
    ConnectionManager, Eip1193Provider, Listener, ListenerId, ProviderRequest, ProviderRpcError,
};

type Reply = Result<Value, ProviderRpcError>;

/// Replies to each method from a queue and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    listeners: Mutex<HashMap<String, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful reply for `method`.
    pub fn ok(&self, method: &str, result: Value) -> &Self {
        self.push(method, Ok(result))
    }

    /// Queue a failure for `method`.
    pub fn fail(&self, method: &str, code: i64, message: &str) -> &Self {
        self.push(method, Err(ProviderRpcError::new(code, message)))
    }

    pub fn push(&self, method: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.method).collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().unwrap().get(event).map_or(0, Vec::len)
    }

    /// Deliver an event to every registered listener.
    pub fn emit(&self, event: &str, payload: Value) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap()
            .get(event)
            .map(|l| l.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(&payload);
        }
    }
}

#[async_trait]
impl Eip1193Provider for ScriptedProvider {
    async fn request(&self, req: ProviderRequest) -> Result<Value, ProviderRpcError> {
        self.requests.lock().unwrap().push(req.clone());
        self.replies
            .lock()
            .unwrap()
            .get_mut(&req.method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ProviderRpcError::new(4200, "unscripted method")))
    }

    fn on(&self, event: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap()
            .entry(event.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock().unwrap();
        let Some(list) = listeners.get_mut(event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        list.len() != before
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub const ALICE: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const BOB: &str = "0xef01ef01ef01ef01ef01ef01ef01ef01ef01ef01";

/// A manager connected as [`ALICE`] on `chain`, with the request log cleared.
pub async fn connected(chain: &str) -> (Arc<ScriptedProvider>, ConnectionManager) {
    let provider = ScriptedProvider::new();
    provider
        .ok("eth_requestAccounts", json!([ALICE]))
        .ok("eth_chainId", json!(chain));
    let dyn_provider: Arc<dyn Eip1193Provider> = provider.clone();
    let manager = ConnectionManager::new(Some(dyn_provider));
    manager.connect().await.unwrap();
    provider.clear_requests();
    (provider, manager)
}
