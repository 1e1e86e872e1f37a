//! JSON-RPC client tests against a minimal in-process HTTP responder

use labchain_bench::chain::{Account, Transaction};
use labchain_bench::error::NetworkError;
use labchain_bench::rpc::{ClientConfig, LabchainClient, NodeRpc};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Responder = Arc<dyn Fn(&Value) -> (u16, String) + Send + Sync>;

/// Serves every POST with `respond(request_json)` and records the requests
async fn spawn_node(respond: Responder) -> (String, Arc<Mutex<Vec<Value>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let respond = respond.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                let (status, body) = respond(&request);
                log.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (url, seen)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<Value> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = socket.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            let body_start = header_end + 4;
            if buffer.len() >= body_start + length {
                return serde_json::from_slice(&buffer[body_start..body_start + length]).ok();
            }
        }
    }
}

fn client_for(url: &str) -> LabchainClient {
    LabchainClient::new(ClientConfig {
        url: url.to_string(),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn ok(result: Value) -> (u16, String) {
    (200, json!({"jsonrpc": "2.0", "id": 0, "result": result}).to_string())
}

#[tokio::test]
async fn test_envelope_and_request_ids() {
    let (url, seen) = spawn_node(Arc::new(|_: &Value| ok(json!({"10.0.0.2": {"port": 8080}})))).await;
    let client = client_for(&url);

    let peers = client.get_connected_peers().await.unwrap();
    assert_eq!(peers, json!({"10.0.0.2": {"port": 8080}}));
    client.get_connected_peers().await.unwrap();
    assert_eq!(client.next_request_id(), 2);

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests[0], json!({"method": "getPeers", "jsonrpc": "2.0", "id": 0}));
    assert_eq!(requests[1]["id"], 1);
}

#[tokio::test]
async fn test_error_object_does_not_consume_id() {
    let (url, _) = spawn_node(Arc::new(|_: &Value| {
        (200, json!({"jsonrpc": "2.0", "id": 0, "error": {"code": -32601, "message": "Method not found"}}).to_string())
    }))
    .await;
    let client = client_for(&url);

    let result = client.send_json_rpc("noSuchMethod", None).await;
    assert!(matches!(result, Err(NetworkError::Rpc { code: -32601, .. })));
    assert_eq!(client.next_request_id(), 0);
}

#[tokio::test]
async fn test_non_json_and_http_failures() {
    let (url, _) = spawn_node(Arc::new(|request: &Value| match request["method"].as_str() {
        Some("getPeers") => (200, "not json".to_string()),
        Some("requestBlock") => (200, json!({"jsonrpc": "2.0", "id": 0}).to_string()),
        _ => (500, "{}".to_string()),
    }))
    .await;
    let client = client_for(&url);

    assert!(matches!(
        client.get_connected_peers().await,
        Err(NetworkError::MalformedResponse { .. })
    ));
    assert!(matches!(client.get_block(None).await, Err(NetworkError::MalformedResponse { .. })));
    assert!(matches!(
        client.send_json_rpc("other", None).await,
        Err(NetworkError::HttpError { status: 500, .. })
    ));
    assert_eq!(client.next_request_id(), 0);
}

#[tokio::test]
async fn test_send_transaction_and_read_blocks() {
    let sender = Account::generate().unwrap();
    let receiver = Account::generate().unwrap();
    let mut tx = Transaction::new(&sender, &receiver, "over the wire");
    tx.sign(&sender).unwrap();
    let wire = serde_json::to_value(tx.to_transmittable()).unwrap();

    let mined = wire.clone();
    let (url, seen) = spawn_node(Arc::new(move |request: &Value| match request["method"].as_str() {
        Some("sendTransaction") => ok(Value::Null),
        Some("requestBlock") => ok(json!([
            {"nr": 4, "timestamp": 1_650_000_000, "creator": "n1", "transactions": [mined.clone()]},
            {"nr": 4, "timestamp": 1_650_000_001.5, "creator": "n2", "transactions": []},
        ])),
        Some("requestTransaction") => ok(json!([mined.clone(), "blockhash"])),
        _ => ok(Value::Null),
    }))
    .await;
    let client = client_for(&url);

    client.send_transaction(&tx).await.unwrap();
    let blocks = client.get_block(Some(4)).await.unwrap();
    let found = client.get_transaction(&tx.hash()).await.unwrap();

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests[0]["params"], json!([wire]));
    assert_eq!(requests[1]["params"], json!([4]));

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].transaction_hashes().collect::<Vec<_>>(), vec![tx.hash()]);
    assert_eq!(blocks[1].timestamp.timestamp_subsec_millis(), 500);

    let (rebuilt, block_hash) = found.unwrap();
    assert_eq!(rebuilt.hash(), tx.hash());
    assert_eq!(block_hash, "blockhash");
    assert_eq!(client.next_request_id(), 3);
}

#[tokio::test]
async fn test_unknown_transaction() {
    let (url, _) = spawn_node(Arc::new(|_: &Value| ok(Value::Null))).await;
    let client = client_for(&url);
    assert!(client.get_transaction("deadbeef").await.unwrap().is_none());
}

#[tokio::test]
async fn test_genesis_block_from_fresh_node() {
    let (url, seen) = spawn_node(Arc::new(|_: &Value| {
        ok(json!([{
            "nr": 0,
            "timestamp": 0,
            "creator": null,
            "difficulty": -1,
            "nonce": 0,
            "merkleHash": null,
            "predecessorBlock": null,
            "transactions": [],
        }]))
    }))
    .await;
    let client = client_for(&url);

    let blocks = client.get_block(Some(0)).await.unwrap();
    assert_eq!(seen.lock().unwrap()[0]["params"], json!([0]));
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].nr, 0);
    assert_eq!(blocks[0].difficulty, -1);
}
