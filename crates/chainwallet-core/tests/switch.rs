//! Switch / add-then-switch protocol against a scripted provider.

mod common;

use std::sync::Arc;

use serde_json::json;

use chainwallet_core::{
    ChainRegistry, ChainSwitchOrchestrator, ConnectionManager, ProviderRpcError, SwitchOutcome,
    WalletError,
};
use common::connected;

fn orchestrator() -> ChainSwitchOrchestrator {
    ChainSwitchOrchestrator::new(Arc::new(ChainRegistry::builtin()))
}

#[tokio::test]
async fn switching_to_current_chain_issues_no_requests() {
    let (provider, manager) = connected("0x89").await;

    let outcome = orchestrator().switch_chain(&manager, "0x89").await.unwrap();

    assert_eq!(outcome, SwitchOutcome::AlreadyOnChain);
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn successful_switch_waits_for_chain_changed() {
    let (provider, manager) = connected("0x1").await;
    provider.ok("wallet_switchEthereumChain", json!(null));

    let outcome = orchestrator().switch_chain(&manager, "0x89").await.unwrap();

    assert_eq!(outcome, SwitchOutcome::Switched);
    let reqs = provider.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].params, vec![json!({ "chainId": "0x89" })]);
    assert_eq!(manager.chain_id().as_deref(), Some("0x1"));

    provider.emit("chainChanged", json!("0x89"));
    assert_eq!(manager.chain_id().as_deref(), Some("0x89"));
}

#[tokio::test]
async fn unrecognized_known_chain_is_added_then_switched_once() {
    let (provider, manager) = connected("0x1").await;
    provider
        .fail("wallet_switchEthereumChain", 4902, "Unrecognized chain ID \"0x138de\"")
        .ok("wallet_switchEthereumChain", json!(null))
        .ok("wallet_addEthereumChain", json!(null));

    let outcome = orchestrator().switch_chain(&manager, "0x138de").await.unwrap();

    assert_eq!(outcome, SwitchOutcome::AddedAndSwitched);
    assert_eq!(
        provider.methods(),
        vec![
            "wallet_switchEthereumChain",
            "wallet_addEthereumChain",
            "wallet_switchEthereumChain",
        ]
    );
    let add = &provider.requests()[1];
    assert_eq!(add.params[0]["chainId"], "0x138de");
    assert_eq!(add.params[0]["chainName"], "Berachain");
    assert_eq!(add.params[0]["nativeCurrency"]["symbol"], "BERA");
}

#[tokio::test]
async fn unrecognized_unknown_chain_is_terminal() {
    let (provider, manager) = connected("0x1").await;
    provider.fail("wallet_switchEthereumChain", 4902, "Unrecognized chain ID \"0xa\"");

    let err = orchestrator().switch_chain(&manager, "0xa").await.unwrap_err();

    assert!(matches!(err, WalletError::UnknownChain { ref chain_id } if chain_id == "0xa"));
    assert_eq!(provider.methods(), vec!["wallet_switchEthereumChain"]);
}

#[tokio::test]
async fn recovery_is_bounded_to_one_retry() {
    let (provider, manager) = connected("0x1").await;
    provider
        .fail("wallet_switchEthereumChain", 4902, "Unrecognized chain ID")
        .fail("wallet_switchEthereumChain", 4902, "Unrecognized chain ID")
        .ok("wallet_addEthereumChain", json!(null))
        .ok("wallet_addEthereumChain", json!(null));

    let err = orchestrator().switch_chain(&manager, "0x89").await.unwrap_err();

    assert!(matches!(err, WalletError::ChainNotFound { .. }));
    assert_eq!(
        provider.methods(),
        vec![
            "wallet_switchEthereumChain",
            "wallet_addEthereumChain",
            "wallet_switchEthereumChain",
        ]
    );
}

#[tokio::test]
async fn nested_unrecognized_chain_code_triggers_recovery() {
    let (provider, manager) = connected("0x1").await;
    provider
        .push(
            "wallet_switchEthereumChain",
            Err(ProviderRpcError::new(-32603, "Internal JSON-RPC error.")
                .with_data(json!({ "originalError": { "code": 4902 } }))),
        )
        .ok("wallet_addEthereumChain", json!(null))
        .ok("wallet_switchEthereumChain", json!(null));

    let outcome = orchestrator().switch_chain(&manager, "0x89").await.unwrap();
    assert_eq!(outcome, SwitchOutcome::AddedAndSwitched);
}

#[tokio::test]
async fn other_switch_failures_are_not_retried() {
    let (provider, manager) = connected("0x1").await;
    provider.fail("wallet_switchEthereumChain", -32002, "Request already pending");

    let err = orchestrator().switch_chain(&manager, "0x89").await.unwrap_err();

    assert!(matches!(err, WalletError::RequestFailed { .. }));
    assert_eq!(err.code(), Some(-32002));
    assert_eq!(provider.methods(), vec!["wallet_switchEthereumChain"]);
}

#[tokio::test]
async fn rejected_switch_is_reported() {
    let (provider, manager) = connected("0x1").await;
    provider.fail("wallet_switchEthereumChain", 4001, "User rejected the request.");

    let err = orchestrator().switch_chain(&manager, "0x89").await.unwrap_err();

    assert!(err.is_user_rejection());
    assert_eq!(manager.chain_id().as_deref(), Some("0x1"));
}

#[tokio::test]
async fn rejected_add_stops_before_retry() {
    let (provider, manager) = connected("0x1").await;
    provider
        .fail("wallet_switchEthereumChain", 4902, "Unrecognized chain ID")
        .fail("wallet_addEthereumChain", 4001, "User rejected the request.");

    let err = orchestrator().switch_chain(&manager, "0x138de").await.unwrap_err();

    assert!(err.is_user_rejection());
    assert_eq!(
        provider.methods(),
        vec!["wallet_switchEthereumChain", "wallet_addEthereumChain"]
    );
}

#[tokio::test]
async fn switch_requires_connection() {
    let (provider, manager) = connected("0x1").await;
    manager.disconnect();

    let err = orchestrator().switch_chain(&manager, "0x89").await.unwrap_err();
    assert!(matches!(err, WalletError::NotConnected));
    assert!(provider.requests().is_empty());

    let err = orchestrator()
        .switch_chain(&ConnectionManager::new(None), "0x89")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::ProviderUnavailable));
}

#[tokio::test]
async fn add_chain_adds_then_switches() {
    let (provider, manager) = connected("0x1").await;
    provider
        .ok("wallet_addEthereumChain", json!(null))
        .ok("wallet_switchEthereumChain", json!(null));

    let outcome = orchestrator().add_chain(&manager, "0x138de").await.unwrap();

    assert_eq!(outcome, SwitchOutcome::AddedAndSwitched);
    assert_eq!(
        provider.methods(),
        vec!["wallet_addEthereumChain", "wallet_switchEthereumChain"]
    );
}

#[tokio::test]
async fn add_unknown_chain_issues_nothing() {
    let (provider, manager) = connected("0x1").await;

    let err = orchestrator().add_chain(&manager, "0x2105").await.unwrap_err();

    assert!(matches!(err, WalletError::UnknownChain { .. }));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn add_chain_when_already_on_target_skips_switch() {
    let (provider, manager) = connected("0x89").await;
    provider.ok("wallet_addEthereumChain", json!(null));

    let outcome = orchestrator().add_chain(&manager, "0x89").await.unwrap();

    assert_eq!(outcome, SwitchOutcome::AddedAndSwitched);
    assert_eq!(provider.methods(), vec!["wallet_addEthereumChain"]);
}
