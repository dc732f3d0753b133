//! Integration tests for the relay pipeline against mock HTTP endpoints.

use std::collections::HashMap;

use mockito::Matcher;
use serde_json::json;

use trace_relay::{run_basic, run_sentinel, RelayError, Secrets, TransactionTrigger};

fn secrets_for(api_base: &str, webhook_url: &str) -> Secrets {
    let vars: HashMap<&str, String> = HashMap::from([
        ("WEBHOOK_URL", webhook_url.to_string()),
        ("BEARER", "test-bearer".to_string()),
        ("ACCOUNT_SLUG", "acct".to_string()),
        ("PROJECT_SLUG", "proj".to_string()),
        ("EVENT_NAME", "Transfer".to_string()),
        ("TRACE_API_URL", api_base.to_string()),
    ]);

    Secrets::from_source(|key| vars.get(key).cloned()).unwrap()
}

fn transfer_trigger() -> TransactionTrigger {
    TransactionTrigger::from_json(
        r#"{"hash":"0xhash","network":"1","blockHash":"0xblock","blockNumber":100}"#,
    )
    .unwrap()
}

fn trace_body() -> serde_json::Value {
    json!({
        "logs": [
            {
                "name": "Transfer",
                "raw": {"address": "0xAAA"},
                "inputs": [{"soltype": {"name": "to"}, "value": "0xBBB"}]
            },
            {
                "name": "Other",
                "raw": {"address": "0xZZZ"},
                "inputs": [{"soltype": {"name": "who"}, "value": "0xYYY"}]
            }
        ],
        "call_trace": {"from": "0x1", "to": "0xAAA"}
    })
}

#[tokio::test]
async fn test_basic_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .match_header("authorization", "test-bearer")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(trace_body().to_string())
        .create_async()
        .await;

    let contract_mock = server
        .mock("GET", "/account/acct/project/proj/contract/1/0xAAA")
        .match_header("authorization", "test-bearer")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"contract": {"contract_name": "Vault", "data": {"abi": []}}}).to_string(),
        )
        .create_async()
        .await;

    // exact body: the "Other" log is excluded from addresses and events,
    // and the raw trace is forwarded verbatim
    let webhook_mock = server
        .mock("POST", "/hook")
        .match_body(Matcher::Json(json!({
            "contractName": "Vault",
            "addresses": ["0xAAA"],
            "events": [{"name": "Transfer", "to": "0xBBB"}],
            "traceData": trace_body()
        })))
        .with_status(200)
        .create_async()
        .await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let report = run_basic(&transfer_trigger(), &secrets).await.unwrap();

    trace_mock.assert_async().await;
    contract_mock.assert_async().await;
    webhook_mock.assert_async().await;

    assert!(report.delivered);
    assert_eq!(report.addresses, vec!["0xAAA"]);
    assert_eq!(report.events_matched, 1);
}

#[tokio::test]
async fn test_sentinel_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let _trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .with_status(200)
        .with_body(trace_body().to_string())
        .create_async()
        .await;

    let _contract_mock = server
        .mock("GET", "/account/acct/project/proj/contract/1/0xAAA")
        .with_status(200)
        .with_body(
            json!({"contract": {"contract_name": "Vault", "data": {"abi": [{"type": "event"}]}}})
                .to_string(),
        )
        .create_async()
        .await;

    // the sentinel variant authorizes against the webhook and forwards the
    // call trace only
    let webhook_mock = server
        .mock("POST", "/hook")
        .match_header("authorization", "test-bearer")
        .match_body(Matcher::Json(json!({
            "hash": "0xhash",
            "transaction": {
                "hash": "0xhash",
                "network": "1",
                "blockHash": "0xblock",
                "blockNumber": 100
            },
            "blockHash": "0xblock",
            "blockNumber": 100,
            "matchReasons": [{"name": "Transfer", "to": "0xBBB"}],
            "sentinel": {"contractName": "Vault", "abi": [{"type": "event"}]},
            "traceData": {"from": "0x1", "to": "0xAAA"},
            "addresses": ["0xAAA"]
        })))
        .with_status(200)
        .create_async()
        .await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let report = run_sentinel(&transfer_trigger(), &secrets).await.unwrap();

    webhook_mock.assert_async().await;
    assert!(report.delivered);
}

#[tokio::test]
async fn test_metadata_failure_still_delivers() {
    let mut server = mockito::Server::new_async().await;

    let _trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .with_status(200)
        .with_body(trace_body().to_string())
        .create_async()
        .await;

    let contract_mock = server
        .mock("GET", "/account/acct/project/proj/contract/1/0xAAA")
        .with_status(500)
        .create_async()
        .await;

    // contractName is absent entirely, not null
    let webhook_mock = server
        .mock("POST", "/hook")
        .match_body(Matcher::Json(json!({
            "addresses": ["0xAAA"],
            "events": [{"name": "Transfer", "to": "0xBBB"}],
            "traceData": trace_body()
        })))
        .with_status(200)
        .create_async()
        .await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let report = run_basic(&transfer_trigger(), &secrets).await.unwrap();

    contract_mock.assert_async().await;
    webhook_mock.assert_async().await;
    assert!(report.delivered);
}

#[tokio::test]
async fn test_no_matching_logs_skips_metadata_lookup() {
    let mut server = mockito::Server::new_async().await;

    let _trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .with_status(200)
        .with_body(json!({"logs": [], "call_trace": null}).to_string())
        .create_async()
        .await;

    let contract_mock = server
        .mock("GET", Matcher::Regex("^/account/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let webhook_mock = server
        .mock("POST", "/hook")
        .match_body(Matcher::Json(json!({
            "addresses": [],
            "events": [],
            "traceData": {"logs": [], "call_trace": null}
        })))
        .with_status(200)
        .create_async()
        .await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let report = run_basic(&transfer_trigger(), &secrets).await.unwrap();

    contract_mock.assert_async().await;
    webhook_mock.assert_async().await;
    assert!(report.addresses.is_empty());
    assert!(report.delivered);
}

#[tokio::test]
async fn test_webhook_500_is_absorbed() {
    let mut server = mockito::Server::new_async().await;

    let _trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .with_status(200)
        .with_body(trace_body().to_string())
        .create_async()
        .await;

    let _contract_mock = server
        .mock("GET", "/account/acct/project/proj/contract/1/0xAAA")
        .with_status(200)
        .with_body(json!({"contract": {"contract_name": "Vault"}}).to_string())
        .create_async()
        .await;

    let webhook_mock = server
        .mock("POST", "/hook")
        .with_status(500)
        .create_async()
        .await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let report = run_basic(&transfer_trigger(), &secrets).await.unwrap();

    // delivery failed but the invocation completed
    webhook_mock.assert_async().await;
    assert!(!report.delivered);
    assert_eq!(report.events_matched, 1);
}

#[tokio::test]
async fn test_non_200_webhook_status_is_not_success() {
    let mut server = mockito::Server::new_async().await;

    let _trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .with_status(200)
        .with_body(trace_body().to_string())
        .create_async()
        .await;

    let _contract_mock = server
        .mock("GET", "/account/acct/project/proj/contract/1/0xAAA")
        .with_status(200)
        .with_body(json!({"contract": {"contract_name": "Vault"}}).to_string())
        .create_async()
        .await;

    // 202 is in the 2xx range but the relay accepts exactly 200
    let _webhook_mock = server
        .mock("POST", "/hook")
        .with_status(202)
        .create_async()
        .await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let report = run_basic(&transfer_trigger(), &secrets).await.unwrap();

    assert!(!report.delivered);
}

#[tokio::test]
async fn test_trace_fetch_failure_aborts() {
    let mut server = mockito::Server::new_async().await;

    let _trace_mock = server
        .mock("GET", "/public-contract/1/trace/0xhash")
        .with_status(500)
        .create_async()
        .await;

    let contract_mock = server
        .mock("GET", Matcher::Regex("^/account/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let webhook_mock = server.mock("POST", "/hook").expect(0).create_async().await;

    let secrets = secrets_for(&server.url(), &format!("{}/hook", server.url()));
    let result = run_basic(&transfer_trigger(), &secrets).await;

    match result {
        Err(RelayError::TraceFetch(_)) => {}
        other => panic!("Expected trace fetch error, got {:?}", other),
    }

    contract_mock.assert_async().await;
    webhook_mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_event_name_aborts_before_any_http() {
    let mut server = mockito::Server::new_async().await;

    let trace_mock = server
        .mock("GET", Matcher::Regex(".*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let vars: HashMap<&str, String> = HashMap::from([
        ("WEBHOOK_URL", format!("{}/hook", server.url())),
        ("BEARER", "test-bearer".to_string()),
        ("ACCOUNT_SLUG", "acct".to_string()),
        ("PROJECT_SLUG", "proj".to_string()),
        ("TRACE_API_URL", server.url()),
    ]);

    let result = Secrets::from_source(|key| vars.get(key).cloned());
    match result {
        Err(RelayError::Configuration(msg)) => assert!(msg.contains("EVENT_NAME")),
        other => panic!("Expected configuration error, got {:?}", other),
    }

    trace_mock.assert_async().await;
}
