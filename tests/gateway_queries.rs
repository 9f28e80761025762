//! Balance and history queries against a mock TronGrid.

use tron_wallet::chain::ChainGateway;
use tron_wallet::config::GatewayConfig;
use tron_wallet::{ChainError, Network};

mod common;

use common::{account_json, address_of, no_account_json, SENDER_KEY, TOKEN_CONTRACT};

#[tokio::test]
async fn test_unknown_account_has_zero_balance() {
    let backend = common::start_programmable_backend(|_| (200, no_account_json())).await;
    let wallet = backend.orchestrator();

    let balance = wallet
        .get_balance(&address_of(SENDER_KEY), &Network::Mainnet)
        .await
        .unwrap();
    assert!(balance.base_units.is_zero());
    assert_eq!(balance.display_units, "0");
}

#[tokio::test]
async fn test_balance_query_carries_api_key() {
    let sender = address_of(SENDER_KEY);
    let expected_path = format!("/v1/accounts/{}", sender);
    let account = account_json(&sender, Some(5_250_000), &[]);
    let backend = common::start_programmable_backend(move |_| (200, account.clone())).await;
    let wallet = backend.orchestrator();

    let balance = wallet.get_balance(&sender, &Network::Mainnet).await.unwrap();
    assert_eq!(balance.display_units, "5.25");
    assert_eq!(balance.as_f64(), 5.25);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, expected_path);
    assert_eq!(requests[0].header("TRON-PRO-API-KEY"), Some(common::API_KEY));
}

#[tokio::test]
async fn test_account_without_balance_field_is_zero() {
    let sender = address_of(SENDER_KEY);
    let account = account_json(&sender, None, &[(TOKEN_CONTRACT, "10")]);
    let backend = common::start_programmable_backend(move |_| (200, account.clone())).await;

    let balance = backend
        .orchestrator()
        .get_balance(&sender, &Network::Mainnet)
        .await
        .unwrap();
    assert!(balance.base_units.is_zero());
}

#[tokio::test]
async fn test_token_balance_matches_contract_exactly() {
    let sender = address_of(SENDER_KEY);
    let lowercase = TOKEN_CONTRACT.to_lowercase();
    let account = account_json(
        &sender,
        Some(1),
        &[(lowercase.as_str(), "999"), ("TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf", "5")],
    );
    let backend = common::start_programmable_backend(move |_| (200, account.clone())).await;

    let balance = backend
        .orchestrator()
        .get_token_balance(&sender, TOKEN_CONTRACT, 6, &Network::Mainnet)
        .await
        .unwrap();
    assert!(balance.base_units.is_zero());
}

#[tokio::test]
async fn test_token_balance_uses_caller_decimals() {
    let sender = address_of(SENDER_KEY);
    let account = account_json(&sender, Some(1), &[(TOKEN_CONTRACT, "123450000000000000000")]);
    let backend = common::start_programmable_backend(move |_| (200, account.clone())).await;

    let balance = backend
        .orchestrator()
        .get_token_balance(&sender, TOKEN_CONTRACT, 18, &Network::Mainnet)
        .await
        .unwrap();
    assert_eq!(balance.base_units.to_string(), "123450000000000000000");
    assert_eq!(balance.display_units, "123.45");
}

#[tokio::test]
async fn test_token_balance_of_unknown_account() {
    let backend = common::start_programmable_backend(|_| (200, no_account_json())).await;
    let balance = backend
        .orchestrator()
        .get_token_balance(&address_of(SENDER_KEY), TOKEN_CONTRACT, 6, &Network::Mainnet)
        .await
        .unwrap();
    assert!(balance.base_units.is_zero());
}

#[tokio::test]
async fn test_transactions_failure_envelope() {
    let backend = common::start_programmable_backend(|_| {
        (200, r#"{"success": false, "error": "x"}"#.to_string())
    })
    .await;

    let err = backend
        .orchestrator()
        .get_transactions(&address_of(SENDER_KEY), &Network::Mainnet)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::RemoteApi(ref m) if m == "x"));
}

#[tokio::test]
async fn test_token_transactions_failure_with_error_status() {
    let backend = common::start_programmable_backend(|_| {
        (400, r#"{"success": false, "error": "invalid address"}"#.to_string())
    })
    .await;

    let err = backend
        .orchestrator()
        .get_token_transactions(&address_of(SENDER_KEY), &Network::Mainnet)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::RemoteApi(ref m) if m == "invalid address"));
}

#[tokio::test]
async fn test_token_transactions_are_passed_through() {
    let sender = address_of(SENDER_KEY);
    let expected_path = format!("/v1/accounts/{}/transactions/trc20", sender);
    let backend = common::start_programmable_backend(|_| {
        (
            200,
            r#"{"success": true, "data": [{"transaction_id": "a", "value": "1"}, {"transaction_id": "b"}]}"#
                .to_string(),
        )
    })
    .await;

    let records = backend
        .orchestrator()
        .get_token_transactions(&sender, &Network::Mainnet)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["transaction_id"], "a");
    assert_eq!(backend.requests()[0].path, expected_path);
}

#[tokio::test]
async fn test_server_error_is_remote_error() {
    let backend =
        common::start_programmable_backend(|_| (500, "upstream unavailable".to_string())).await;

    let err = backend
        .orchestrator()
        .get_balance(&address_of(SENDER_KEY), &Network::Mainnet)
        .await
        .unwrap_err();
    match err {
        ChainError::RemoteApi(message) => assert!(message.contains("upstream unavailable")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_block_is_remote_error() {
    let backend = common::start_programmable_backend(|_| (200, "{}".to_string())).await;
    let gateway = ChainGateway::new(backend.config().gateway).unwrap();

    let err = gateway.get_latest_block(&Network::Mainnet).await.unwrap_err();
    assert!(matches!(err, ChainError::RemoteApi(_)));
}

#[tokio::test]
async fn test_latest_block() {
    let backend = common::start_programmable_backend(|_| (200, common::block_json())).await;
    let gateway = ChainGateway::new(backend.config().gateway).unwrap();

    let block = gateway.get_latest_block(&Network::Testnet).await.unwrap();
    assert_eq!(block.number, 61_000_660);
    assert_eq!(block.timestamp, 1_700_000_000_000);
    assert_eq!(block.hash.len(), 64);
    assert_eq!(backend.requests()[0].method, "POST");
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = GatewayConfig {
        api_key: Some("k".to_string()),
        base_url: Some(format!("http://127.0.0.1:{}", port)),
        ..GatewayConfig::default()
    };
    let gateway = ChainGateway::new(config).unwrap();

    let err = gateway.get_latest_block(&Network::Mainnet).await.unwrap_err();
    assert!(matches!(err, ChainError::Transport(_)));
}

#[tokio::test]
async fn test_invalid_address_is_rejected_before_any_request() {
    let backend = common::start_programmable_backend(|_| (200, no_account_json())).await;
    let err = backend
        .orchestrator()
        .get_balance("not-an-address", &Network::Mainnet)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::InvalidAddress(_)));
    assert!(backend.requests().is_empty());
}
