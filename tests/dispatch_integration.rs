//! Integration tests for the execution dispatcher
//!
//! These tests run the full parse -> dispatch -> classify pipeline against a
//! local wiremock stand-in for the Piston API:
//! - Successful runs echo the original request back unchanged
//! - Service error messages become `ExecutionError`
//! - Transport failures, timeouts and garbage bodies become `Unknown`
//! - The optional credential is sent only when configured

use std::time::Duration;

use iruncode::command::parse;
use iruncode::core::config::BotConfig;
use iruncode::core::types::{RunRequest, RunResult};
use iruncode::piston::PistonClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> BotConfig {
    BotConfig {
        api_url: server.uri(),
        ..BotConfig::default()
    }
}

fn success_body(output: &str) -> serde_json::Value {
    json!({
        "language": "python",
        "version": "3.10.0",
        "run": {
            "stdout": output,
            "stderr": "",
            "code": 0,
            "signal": null,
            "output": output
        }
    })
}

// ============================================================================
// Execution
// ============================================================================

#[tokio::test]
async fn test_success_echoes_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .and(body_json(json!({
            "language": "py",
            "version": "*",
            "files": [{"content": "print(input())"}],
            "stdin": "hello"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("hello\n")))
        .expect(1)
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    let request = parse("py\nprint(input())\n/stdin\nhello").unwrap();
    let response = client.execute(request.clone()).await;

    assert_eq!(response.result, RunResult::Success);
    assert_eq!(response.output, "hello\n");
    assert_eq!(response.request, request);
    assert_eq!(response.request.language(), "py");
    assert_eq!(response.request.code(), "print(input())");
    assert_eq!(response.request.stdin(), "hello");
}

#[tokio::test]
async fn test_service_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "compile error"})))
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    let request = RunRequest::new("brainfudge", "+++", "").unwrap();
    let response = client.execute(request).await;

    assert_eq!(response.result, RunResult::ExecutionError);
    assert_eq!(response.output, "compile error");
}

#[tokio::test]
async fn test_server_error_without_message_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded: 10.0.0.3"))
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    let response = client
        .execute(RunRequest::new("python", "print(1)", "").unwrap())
        .await;

    assert_eq!(response.result, RunResult::Unknown);
    assert!(response.output.is_empty());
}

#[tokio::test]
async fn test_connection_failure_is_unknown() {
    let config = BotConfig {
        api_url: "http://127.0.0.1:1".into(),
        ..BotConfig::default()
    };
    let client = PistonClient::new(&config).unwrap();
    let response = client
        .execute(RunRequest::new("python", "print(1)", "").unwrap())
        .await;

    assert_eq!(response.result, RunResult::Unknown);
    assert!(response.output.is_empty());
    assert_eq!(response.request.code(), "print(1)");
}

#[tokio::test]
async fn test_timeout_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body("late\n"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = BotConfig {
        request_timeout_secs: 1,
        ..config_for(&server)
    };
    let client = PistonClient::new(&config).unwrap();
    let response = client
        .execute(RunRequest::new("python", "print('late')", "").unwrap())
        .await;

    assert_eq!(response.result, RunResult::Unknown);
}

#[tokio::test]
async fn test_auth_header_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .and(header("authorization", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok\n")))
        .expect(1)
        .mount(&server)
        .await;

    let config = BotConfig {
        auth_token: Some("secret-token".into()),
        ..config_for(&server)
    };
    let client = PistonClient::new(&config).unwrap();
    let response = client
        .execute(RunRequest::new("python", "print('ok')", "").unwrap())
        .await;

    assert_eq!(response.result, RunResult::Success);
}

#[tokio::test]
async fn test_no_auth_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok\n")))
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    client
        .execute(RunRequest::new("python", "print('ok')", "").unwrap())
        .await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_dispatch_is_idempotent_against_stub() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("42\n")))
        .expect(2)
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    let request = parse("python print(6 * 7)").unwrap();
    let first = client.execute(request.clone()).await;
    let second = client.execute(request).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_configured_version_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("")))
        .mount(&server)
        .await;

    let config = BotConfig {
        version: "3.10.0".into(),
        ..config_for(&server)
    };
    let client = PistonClient::new(&config).unwrap();
    let response = client
        .execute(RunRequest::new("python", "pass", "").unwrap())
        .await;
    assert_eq!(response.result, RunResult::Success);
    assert_eq!(response.output, "");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["version"], "3.10.0");
    assert_eq!(body["stdin"], "");
}

// ============================================================================
// Runtime listing
// ============================================================================

#[tokio::test]
async fn test_languages_sorted_and_unique() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtimes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"language": "python", "version": "3.10.0", "aliases": ["py", "py3"]},
            {"language": "rust", "version": "1.68.2", "aliases": ["rs"]},
            {"language": "python", "version": "2.7.18", "aliases": ["py2"]},
            {"language": "bash", "version": "5.2.0", "aliases": ["sh"]}
        ])))
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    let languages = client.languages().await.unwrap();
    assert_eq!(languages, vec!["bash", "python", "rust"]);
}

#[tokio::test]
async fn test_languages_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtimes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    assert!(client.languages().await.is_err());
}

#[tokio::test]
async fn test_languages_garbage_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/runtimes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = PistonClient::new(&config_for(&server)).unwrap();
    assert!(client.languages().await.is_err());
}
