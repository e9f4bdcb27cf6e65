//! Gateway integration tests over real HTTP.

use std::sync::Arc;
use std::time::Duration;

use ledger_link::config::schema::GatewayConfig;
use ledger_link::http::GatewayServer;
use ledger_link::ledger::types::HoldingsResult;
use ledger_link::lifecycle::Shutdown;
use ledger_link::store::records::WalletRecordStore;

mod common;
use common::{RecordingPlatform, ScriptedLedger, StaticDirectory};

const ADDR: &str = "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH";

async fn start_gateway(
    resolver: Arc<ScriptedLedger>,
    store: Arc<WalletRecordStore>,
) -> (std::net::SocketAddr, Shutdown) {
    let router = common::build_router(
        resolver,
        store,
        Arc::new(RecordingPlatform::default()),
        Arc::new(StaticDirectory::default()),
        vec![],
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = GatewayServer::new(&GatewayConfig::default(), router);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

#[tokio::test]
async fn test_link_wallet_over_http() {
    let resolver = ScriptedLedger::with(&[(ADDR, HoldingsResult::Amount(150.0))]);
    let store = Arc::new(WalletRecordStore::new(3, None));
    let (addr, shutdown) = start_gateway(resolver, store.clone()).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .post(format!("http://{}/events", addr))
        .json(&serde_json::json!({
            "caller": { "id": "u1", "username": "alice", "discriminator": "0001" },
            "text": format!("linkwallet {}", ADDR),
        }))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["claimed"], true);
    let reply = body["reply"].as_str().unwrap();
    assert!(reply.contains("150"), "reply: {}", reply);

    assert_eq!(store.total_points("u1"), 150.0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_event_is_unclaimed() {
    let resolver = ScriptedLedger::with(&[]);
    let store = Arc::new(WalletRecordStore::new(3, None));
    let (addr, shutdown) = start_gateway(resolver, store).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let body: serde_json::Value = client
        .post(format!("http://{}/events", addr))
        .json(&serde_json::json!({
            "caller": { "id": "u1" },
            "text": "good morning everyone",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["claimed"], false);
    assert!(body["reply"].is_null());

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_endpoint() {
    let resolver = ScriptedLedger::with(&[]);
    let store = Arc::new(WalletRecordStore::new(3, None));
    let (addr, shutdown) = start_gateway(resolver, store).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");

    shutdown.trigger();
}
