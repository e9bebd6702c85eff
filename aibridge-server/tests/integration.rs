//! Integration tests for the bridge agent HTTP service.

use axum_test::TestServer;
use serde_json::{json, Value};

use aibridge_common::{BridgeConfig, NearConfig};
use aibridge_server::{app_router, build_state, AppState};

/// 32 zero bytes in base58.
const TEST_SEED: &str = "11111111111111111111111111111111";

/// Config that never reaches a real node.
fn offline_config() -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.near.node_url = "http://127.0.0.1:9".to_string();
    config
}

fn signed_in_config() -> BridgeConfig {
    let mut config = offline_config();
    config.near = NearConfig {
        node_url: config.near.node_url.clone(),
        ..NearConfig::testnet()
    }
    .with_credentials("agent.testnet", format!("ed25519:{}", TEST_SEED));
    config
}

/// Create a test server with every service initialized.
async fn create_server(config: BridgeConfig) -> TestServer {
    let state = build_state(config).await.expect("should build state");
    TestServer::new(app_router(state)).expect("should create test server")
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_server(offline_config()).await;
    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_status_endpoints() {
    let server = create_server(offline_config()).await;

    let body: Value = server.get("/api/status").await.json();
    assert_eq!(body["message"], "NEAR AI Bridge Agent is running");
    assert_eq!(body["version"], "alpha-0.1.0");
    assert_eq!(body["aiMode"], "Simulation");

    let response = server.get("/api/status/detailed").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["bridgeStatus"], "operational");
    assert_eq!(body["zcash"]["isInitialized"], true);
    assert_eq!(body["secret"]["privacyStatus"], "active");
    assert_eq!(body["near"]["ai"]["mode"], "simulation");
    assert_eq!(body["near"]["near"]["connected"], false);
}

#[tokio::test]
async fn test_agent_query_simulated() {
    let server = create_server(offline_config()).await;
    let response = server
        .post("/agent/action")
        .json(&json!({ "action": "query", "params": { "prompt": "What is NEAR?" } }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["confidence"], 0.92);
    assert_eq!(body["result"]["model"], "simulation");
    assert!(body["result"]["raw_response"].is_null());
}

#[tokio::test]
async fn test_agent_transact_is_simulated() {
    let server = create_server(offline_config()).await;
    let body: Value = server
        .post("/agent/action")
        .json(&json!({
            "action": "transact",
            "params": { "contractId": "guest-book.testnet", "method": "add_message", "args": {} }
        }))
        .await
        .json();

    let tx_hash = body["result"]["txHash"].as_str().unwrap();
    assert!(tx_hash.starts_with("simulated_tx_"));
    assert!(body["result"]["gasUsed"].as_u64().unwrap() < 10_000_000);
}

#[tokio::test]
async fn test_agent_errors() {
    let server = create_server(offline_config()).await;

    let response = server
        .post("/agent/action")
        .json(&json!({ "action": "teleport", "params": {} }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unknown action: teleport");

    let response = server
        .post("/agent/action")
        .json(&json!({ "action": "query", "params": {} }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Prompt is required");
}

#[tokio::test]
async fn test_capabilities() {
    let server = create_server(offline_config()).await;
    let body: Value = server.get("/agent/capabilities").await.json();

    assert_eq!(body["version"], "alpha-0.1.0");
    assert_eq!(body["capabilities"].as_array().unwrap().len(), 6);
    assert_eq!(body["aiMode"], "Using simulation mode");
}

#[tokio::test]
async fn test_executors_unavailable_before_initialize() {
    let state = AppState::new(offline_config()).expect("should build state");
    let server = TestServer::new(app_router(state)).expect("should create test server");

    let response = server.post("/api/zcash/address").json(&json!({})).await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Zcash service not initialized");

    let response = server
        .post("/api/secret/query")
        .json(&json!({ "contractAddress": "secret1xyz", "query": "getBalance" }))
        .await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    // Status stays readable.
    let body: Value = server.get("/api/status/detailed").await.json();
    assert_eq!(body["zcash"]["isInitialized"], false);
}

#[tokio::test]
async fn test_zcash_flow() {
    let server = create_server(offline_config()).await;

    let body: Value = server.post("/api/zcash/address").json(&json!({})).await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "shielded");
    assert!(body["address"].as_str().unwrap().starts_with("zs1"));

    let response = server
        .post("/api/zcash/transfer")
        .json(&json!({ "fromChain": "near", "toChain": "zcash", "amount": 2.5, "toAddress": "zs1abc" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "pending");
    assert!(body["transactionId"].as_str().unwrap().starts_with("tx_"));

    let response = server
        .post("/api/zcash/transfer")
        .json(&json!({ "amount": "0", "toAddress": "zs1abc" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid amount");

    let response = server
        .post("/api/zcash/shield")
        .json(&json!({ "operationType": "deshield", "amount": "1" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = server
        .get("/api/zcash/history")
        .add_query_param("filter", "shield")
        .await
        .json();
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);

    let response = server
        .get("/api/zcash/history")
        .add_query_param("filter", "sideways")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["filterType"], "sideways");
    assert!(body["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_zcash_unknown_operation_type_is_echoed() {
    let server = create_server(offline_config()).await;
    let response = server
        .post("/api/zcash/shield")
        .json(&json!({ "operationType": "stake", "amount": "1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["operationType"], "stake");
    assert_eq!(body["status"], "confirmed");
}

#[tokio::test]
async fn test_secret_query_balance() {
    let server = create_server(offline_config()).await;
    let response = server
        .post("/api/secret/query")
        .json(&json!({ "contractAddress": "secret1xyz", "query": "getBalance" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["result"]["denom"], "SCRT");
    assert_eq!(body["executedInTEE"], true);

    let response = server
        .post("/api/secret/query")
        .json(&json!({ "query": "getBalance" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Contract address is required");
}

#[tokio::test]
async fn test_secret_history_viewing_key_gate() {
    let server = create_server(offline_config()).await;

    let response = server.get("/api/secret/history").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Address is required");

    let body: Value = server
        .get("/api/secret/history")
        .add_query_param("address", "secret1xyz")
        .await
        .json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid viewing key");
    assert!(body["publicData"].is_object());

    let key: Value = server
        .post("/api/secret/viewing-key")
        .json(&json!({ "address": "secret1xyz" }))
        .await
        .json();
    let viewing_key = key["viewingKey"].as_str().unwrap().to_string();

    let body: Value = server
        .get("/api/secret/history")
        .add_query_param("address", "secret1xyz")
        .add_query_param("viewingKey", viewing_key)
        .await
        .json();
    assert_eq!(body["success"], true);
    assert!(body["transactions"].is_array());
}

#[tokio::test]
async fn test_secret_history_unknown_filter() {
    let server = create_server(offline_config()).await;

    let body: Value = server
        .get("/api/secret/history")
        .add_query_param("address", "secret1xyz")
        .add_query_param("filter", "bogus")
        .await
        .json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid viewing key");
    assert!(body["publicData"].is_object());

    let response = server
        .get("/api/secret/history")
        .add_query_param("address", "secret1xyz")
        .add_query_param("filter", "bogus")
        .add_query_param("viewingKey", "api_key_abc")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let server = create_server(offline_config()).await;

    let response = server
        .post("/agent/action")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let response = server.post("/agent/action").text("{not json").await;
    response.assert_status(axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("application/json"));

    let response = server
        .post("/api/intents/swap")
        .content_type("application/json")
        .bytes("[1, 2".into())
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_incomplete_preconfigured_token_stays_simulated() {
    let mut config = offline_config();
    config.near_ai.use_actual_api = true;
    config.near_ai.auth_token = Some("{}".to_string());
    let server = create_server(config).await;

    let body: Value = server.get("/api/status").await.json();
    assert_eq!(body["aiMode"], "Simulation");
}

#[tokio::test]
async fn test_validate_token() {
    let server = create_server(offline_config()).await;

    let response = server.post("/api/validate-token").json(&json!({})).await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No token provided");

    let response = server
        .post("/api/validate-token")
        .json(&json!({ "token": "not json" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid token format");

    let response = server
        .post("/api/validate-token")
        .json(&json!({ "token": r#"{"account_id":"alice.near"}"# }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["valid"], false);

    let token = json!({
        "account_id": "alice.near",
        "public_key": "ed25519:abc",
        "signature": "sig",
        "message": "Welcome to NEAR AI Hub!"
    })
    .to_string();
    let body: Value = server
        .post("/api/validate-token")
        .json(&json!({ "token": token }))
        .await
        .json();
    assert_eq!(body["valid"], true);
    assert_eq!(body["account_id"], "alice.near");
}

#[tokio::test]
async fn test_bridge_intent_requires_sign_in() {
    let server = create_server(offline_config()).await;
    let response = server
        .post("/api/intents/bridge")
        .json(&json!({ "targetChain": "zcash", "amount": "1", "receiverAddress": "zs1abc" }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "User must be signed in");
}

#[tokio::test]
async fn test_bridge_intent_and_status() {
    let server = create_server(signed_in_config()).await;
    let response = server
        .post("/api/intents/bridge")
        .json(&json!({
            "targetChain": "zcash",
            "amount": 1.5,
            "receiverAddress": "zs1abc",
            "shielded": true
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "intent_created");
    assert_eq!(body["type"], "bridge_to_zcash");
    assert_eq!(body["params"]["shielded"], true);

    let intent_id = body["intentId"].as_str().unwrap().to_string();
    let body: Value = server
        .get(&format!("/api/intents/{}", intent_id))
        .await
        .json();
    assert_eq!(body["success"], true);
    assert_eq!(body["intentId"], intent_id);
    assert_eq!(body["status"], "pending");
    assert!(body["details"].is_null());

    let response = server
        .post("/api/intents/bridge")
        .json(&json!({ "targetChain": "solana", "amount": "1", "receiverAddress": "x" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_swap_intent() {
    let server = create_server(signed_in_config()).await;
    let response = server
        .post("/api/intents/swap")
        .json(&json!({ "fromToken": "NEAR", "toToken": "ZEC", "amount": "2" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["type"], "private_swap");

    let response = server
        .post("/api/intents/swap")
        .json(&json!({ "fromToken": "NEAR", "amount": "2" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "From token, to token, and amount are required");

    let response = server
        .post("/api/intents/swap")
        .json(&json!({ "fromToken": "NEAR", "toToken": "ZEC", "amount": "1", "privacyLevel": "paranoid" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["params"]["privacyLevel"], "paranoid");
}

#[tokio::test]
async fn test_swap_intent_checks_sign_in_first() {
    let server = create_server(offline_config()).await;
    let response = server
        .post("/api/intents/swap")
        .json(&json!({ "fromToken": "NEAR", "toToken": "ZEC", "amount": "1", "privacyLevel": "bogus" }))
        .await;

    response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User must be signed in");
}
