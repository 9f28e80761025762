//! Shared utilities for integration testing against a mock TronGrid.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use prost::Message;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use tron_wallet::chain::proto::{Transaction, TransactionRaw, TransferContract, TriggerSmartContract};
use tron_wallet::config::WalletConfig;
use tron_wallet::{TransferOrchestrator, Wallet};

// Anvil's well-known development keys.
pub const SENDER_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const BACKER_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const RECIPIENT_KEY: &str = "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

/// USDT on mainnet.
pub const TOKEN_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

pub const API_KEY: &str = "test-api-key";

pub fn address_of(key: &str) -> String {
    Wallet::from_private_key(key).unwrap().address().to_base58()
}

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_broadcast(&self) -> bool {
        self.path == "/wallet/broadcasthex"
    }
}

/// Handle to a running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<MockRequest> {
        self.requests().into_iter().filter(|r| r.is_broadcast()).collect()
    }

    pub fn config(&self) -> WalletConfig {
        let mut config = WalletConfig::default();
        config.gateway.api_key = Some(API_KEY.to_string());
        config.gateway.base_url = Some(self.base_url());
        config.gateway.request_timeout_secs = 5;
        config
    }

    pub fn orchestrator(&self) -> TransferOrchestrator {
        TransferOrchestrator::new(&self.config()).unwrap()
    }
}

/// Start a programmable mock backend; `f` maps each request to `(status, json body)`.
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(&MockRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(socket);
                        let Some(request) = read_request(&mut reader).await else {
                            return;
                        };
                        log.lock().unwrap().push(request.clone());

                        let (status, body) = f(&request);
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let mut socket = reader.into_inner();
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, requests }
}

async fn read_request(reader: &mut BufReader<tokio::net::TcpStream>) -> Option<MockRequest> {
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).await.ok()?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            headers.push((name.to_string(), value));
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;

    Some(MockRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

// Response bodies

pub fn block_json() -> String {
    serde_json::json!({
        "blockID": "0000000003a2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c",
        "block_header": {
            "raw_data": { "number": 61_000_660u64, "timestamp": 1_700_000_000_000i64 }
        }
    })
    .to_string()
}

pub fn account_json(address: &str, balance: Option<u64>, trc20: &[(&str, &str)]) -> String {
    let mut account = serde_json::json!({ "address": address });
    if let Some(balance) = balance {
        account["balance"] = balance.into();
    }
    let tokens: Vec<serde_json::Value> = trc20
        .iter()
        .map(|(contract, amount)| {
            let mut entry = serde_json::Map::new();
            entry.insert(contract.to_string(), amount.to_string().into());
            serde_json::Value::Object(entry)
        })
        .collect();
    account["trc20"] = tokens.into();
    serde_json::json!({ "data": [account], "success": true, "meta": { "page_size": 1 } }).to_string()
}

pub fn no_account_json() -> String {
    serde_json::json!({ "data": [], "success": true, "meta": { "page_size": 0 } }).to_string()
}

pub fn broadcast_ok_json() -> String {
    serde_json::json!({ "result": true, "txid": "00ff" }).to_string()
}

pub fn broadcast_rejected_json() -> String {
    serde_json::json!({
        "result": false,
        "code": "CONTRACT_VALIDATE_ERROR",
        "message": hex::encode("balance is not sufficient")
    })
    .to_string()
}

// Decoding of broadcast payloads

pub fn decode_broadcast(request: &MockRequest) -> TransactionRaw {
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    let bytes = hex::decode(body["transaction"].as_str().unwrap()).unwrap();
    let tx = Transaction::decode(bytes.as_slice()).unwrap();
    assert_eq!(tx.signature.len(), 1);
    tx.raw_data.unwrap()
}

pub fn native_contract(raw: &TransactionRaw) -> TransferContract {
    let contract = &raw.contract[0];
    assert_eq!(contract.r#type, 1);
    TransferContract::decode(contract.parameter.as_ref().unwrap().value.as_slice()).unwrap()
}

pub fn token_contract(raw: &TransactionRaw) -> TriggerSmartContract {
    let contract = &raw.contract[0];
    assert_eq!(contract.r#type, 31);
    TriggerSmartContract::decode(contract.parameter.as_ref().unwrap().value.as_slice()).unwrap()
}
