//! # Integration Tests for the Cipher Web Server
//!
//! End-to-end checks of the HTTP contract. Most tests drive
//! [`CipherWebServer::route`] directly; the socket tests bind a real listener
//! on an ephemeral port and talk to it with a hyper client.

use cipher_web::{
    error::{CipherWebError, MISSING_ARGUMENT_MESSAGE, UNEXPECTED_ERROR_MESSAGE},
    server::{config::LogLevel, CipherWebServer, ServerConfig},
    CipherKind,
};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const PLAINTEXT: &str = "This message shall remain private";

/// Helper function to create test server configuration
fn create_test_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: LogLevel::from(tracing::Level::DEBUG),
        max_payload_size: 64 * 1024,
        request_timeout_ms: 5000,
        worker_threads: Some(2),
        enable_metrics: true,
        enable_health_check: true,
    }
}

fn create_test_server() -> CipherWebServer {
    CipherWebServer::new(create_test_config()).expect("valid test config")
}

/// POST `body` to `path` and return the status and parsed JSON body
async fn post(server: &CipherWebServer, path: &str, body: Value) -> (StatusCode, Value) {
    let response = server.route(&Method::POST, path, body.to_string().as_bytes());
    read_json(response).await
}

async fn read_json<B>(response: Response<B>) -> (StatusCode, Value)
where
    B: hyper::body::Body,
    B::Error: std::fmt::Debug,
{
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_atbash_encode_end_to_end() {
    let server = create_test_server();
    let (status, body) = post(
        &server,
        "/cipher/atbash/",
        json!({"text": PLAINTEXT, "encrypt": true}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "GSRH NVHHZTV HSZOO IVNZRM KIREZGV"}));
}

#[tokio::test]
async fn test_caesar_encode_end_to_end() {
    let server = create_test_server();
    let (status, body) = post(
        &server,
        "/cipher/caesar/",
        json!({"text": PLAINTEXT, "encrypt": true, "key": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "WKLV PHVVDJH VKDOO UHPDLQ SULYDWH"}));
}

#[tokio::test]
async fn test_affine_encode_end_to_end() {
    let server = create_test_server();
    let (status, body) = post(
        &server,
        "/cipher/affine/",
        json!({"text": PLAINTEXT, "encrypt": true, "keys": [5, 7]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "YQVT PBTTHLB TQHKK OBPHVU EOVIHYB"}));
}

#[tokio::test]
async fn test_affine_incompatible_key_is_unexpected_error() {
    let server = create_test_server();
    let (status, body) = post(
        &server,
        "/cipher/affine/",
        json!({"text": "x", "encrypt": true, "keys": [2, 2]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": UNEXPECTED_ERROR_MESSAGE}));
}

#[tokio::test]
async fn test_decode_end_to_end() {
    let server = create_test_server();

    let (_, body) = post(
        &server,
        "/cipher/atbash/",
        json!({"text": "gsrh nvhhztv", "encrypt": false}),
    )
    .await;
    assert_eq!(body["text"], "THIS MESSAGE");

    let (_, body) = post(
        &server,
        "/cipher/caesar/",
        json!({"text": "WKLV PHVVDJH", "encrypt": false, "key": 3}),
    )
    .await;
    assert_eq!(body["text"], "THIS MESSAGE");

    let (_, body) = post(
        &server,
        "/cipher/affine/",
        json!({"text": "yqvt pbtthlb", "encrypt": false, "keys": [5, 7]}),
    )
    .await;
    assert_eq!(body["text"], "THIS MESSAGE");
}

#[tokio::test]
async fn test_missing_argument() {
    let server = create_test_server();
    let cases = [
        ("/cipher/atbash/", json!({"encrypt": true})),
        ("/cipher/atbash/", json!({"text": PLAINTEXT})),
        ("/cipher/caesar/", json!({"text": PLAINTEXT, "encrypt": true})),
        ("/cipher/affine/", json!({"text": PLAINTEXT, "encrypt": true})),
        // presence is checked for every key before any type check
        ("/cipher/caesar/", json!({"text": 1, "encrypt": true})),
    ];

    for (path, request) in cases {
        let (status, body) = post(&server, path, request.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {request}");
        assert_eq!(body, json!({"error": MISSING_ARGUMENT_MESSAGE}));
    }
}

#[tokio::test]
async fn test_invalid_argument_type() {
    let server = create_test_server();
    let cases = [
        ("/cipher/atbash/", json!({"text": 1, "encrypt": true}), "text"),
        ("/cipher/atbash/", json!({"text": "a", "encrypt": "yes"}), "encrypt"),
        ("/cipher/atbash/", json!({"text": "a", "encrypt": 1}), "encrypt"),
        ("/cipher/caesar/", json!({"text": "a", "encrypt": true, "key": "3"}), "key"),
        ("/cipher/caesar/", json!({"text": "a", "encrypt": true, "key": 3.5}), "key"),
        ("/cipher/caesar/", json!({"text": "a", "encrypt": true, "key": true}), "key"),
        ("/cipher/affine/", json!({"text": "a", "encrypt": true, "keys": "5,7"}), "keys"),
        ("/cipher/affine/", json!({"text": "a", "encrypt": true, "keys": {"a": 5}}), "keys"),
        // the first mismatch in schema order wins
        ("/cipher/affine/", json!({"text": [], "encrypt": 0, "keys": 1}), "text"),
    ];

    for (path, request, argument) in cases {
        let (status, body) = post(&server, path, request.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {request}");
        assert_eq!(
            body,
            json!({"error": format!("Invalid type for body argument '{argument}'")})
        );
    }
}

#[tokio::test]
async fn test_malformed_keys_are_unexpected_errors() {
    let server = create_test_server();
    let cases = [
        json!({"text": "a", "encrypt": true, "keys": []}),
        json!({"text": "a", "encrypt": true, "keys": [5]}),
        json!({"text": "a", "encrypt": true, "keys": [5, 7, 9]}),
        json!({"text": "a", "encrypt": true, "keys": ["5", "7"]}),
        json!({"text": "a", "encrypt": true, "keys": [13, 1]}),
        json!({"text": "a", "encrypt": true, "keys": [0, 1]}),
    ];

    for request in cases {
        let (status, body) = post(&server, "/cipher/affine/", request.clone()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{request}");
        assert_eq!(body, json!({"error": UNEXPECTED_ERROR_MESSAGE}));
    }
}

#[tokio::test]
async fn test_malformed_body_is_unexpected_error() {
    let server = create_test_server();
    for raw in [&b"{not json"[..], b"[1,2]", b"[]", b"42", b""] {
        let (status, body) = read_json(server.route(&Method::POST, "/cipher/atbash/", raw)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": UNEXPECTED_ERROR_MESSAGE}));
    }
}

#[tokio::test]
async fn test_oversized_body_is_unexpected_error() {
    let config = ServerConfig {
        max_payload_size: 32,
        ..create_test_config()
    };
    let server = CipherWebServer::new(config).unwrap();
    let request = json!({"text": "a".repeat(64), "encrypt": true});

    let (status, body) = post(&server, "/cipher/atbash/", request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": UNEXPECTED_ERROR_MESSAGE}));
}

#[tokio::test]
async fn test_keys_above_i64_max() {
    let server = create_test_server();

    let (status, body) = post(
        &server,
        "/cipher/caesar/",
        json!({"text": "abc", "encrypt": true, "key": 1_u64 << 63}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "IJK"}));

    let raw = br#"{"text": "abc", "encrypt": true, "key": 9223372036854775808}"#;
    let (status, body) = read_json(server.route(&Method::POST, "/cipher/caesar/", raw)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "IJK"}));

    let (status, body) = post(
        &server,
        "/cipher/affine/",
        json!({"text": "abc", "encrypt": true, "keys": [5, 1_u64 << 63]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "INS"}));

    let (_, body) = post(
        &server,
        "/cipher/affine/",
        json!({"text": "INS", "encrypt": false, "keys": [5, 1_u64 << 63]}),
    )
    .await;
    assert_eq!(body, json!({"text": "ABC"}));
}

#[tokio::test]
async fn test_routing() {
    let server = create_test_server();

    for kind in CipherKind::ALL {
        let (status, _) = read_json(server.route(&Method::GET, kind.path(), b"")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{kind}");
    }

    for path in ["/", "/cipher/", "/cipher/atbash", "/cipher/rot13/"] {
        let (status, body) = read_json(server.route(&Method::POST, path, b"{}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body, json!({"error": "Not found"}));
    }
}

#[tokio::test]
async fn test_error_conversions() {
    let io_error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
    let err: CipherWebError = io_error.into();
    assert_eq!(err.status_code(), 500);
    assert!(err.internal_message().contains("I/O error"));

    let json_error = serde_json::from_str::<Value>("invalid json").unwrap_err();
    let err: CipherWebError = json_error.into();
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.client_message(), UNEXPECTED_ERROR_MESSAGE);
    assert!(err.internal_message().contains("JSON parsing error"));
}

/// Test concurrent requests against one shared server for thread safety
#[tokio::test]
async fn test_concurrent_requests() {
    let server = Arc::new(create_test_server());
    let mut handles = Vec::new();

    for key in 0..26_i64 {
        let server = Arc::clone(&server);
        handles.push(tokio::spawn(async move {
            let request = json!({"text": PLAINTEXT, "encrypt": true, "key": key});
            let (status, encoded) = post(&server, "/cipher/caesar/", request).await;
            assert_eq!(status, StatusCode::OK);

            let request = json!({"text": encoded["text"], "encrypt": false, "key": key});
            let (_, decoded) = post(&server, "/cipher/caesar/", request).await;
            assert_eq!(decoded["text"], PLAINTEXT.to_uppercase());
        }));
    }

    for handle in handles {
        handle.await.expect("Task should complete successfully");
    }

    let snapshot = server.metrics();
    assert_eq!(snapshot.encodes, 26);
    assert_eq!(snapshot.decodes, 26);
}

/// Bind an ephemeral port and serve on it in the background
async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = CipherWebServer::new(config).unwrap();
    tokio::spawn(server.serve(listener));
    addr
}

async fn send(addr: SocketAddr, method: Method, path: &str, body: &str) -> (StatusCode, Value) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(hyper::header::HOST, addr.to_string())
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_owned())))
        .unwrap();

    let response = sender.send_request(request).await.unwrap();
    assert_eq!(
        response.headers().get(hyper::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    read_json(response).await
}

#[tokio::test]
async fn test_socket_round_trip() {
    let addr = spawn_server(create_test_config()).await;

    let request = json!({"text": PLAINTEXT, "encrypt": true, "keys": [5, 7]}).to_string();
    let (status, body) = timeout(
        Duration::from_secs(5),
        send(addr, Method::POST, "/cipher/affine/", &request),
    )
    .await
    .expect("request should complete");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"text": "YQVT PBTTHLB TQHKK OBPHVU EOVIHYB"}));

    let request = json!({"text": "x", "encrypt": true, "keys": [2, 2]}).to_string();
    let (status, body) = send(addr, Method::POST, "/cipher/affine/", &request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": UNEXPECTED_ERROR_MESSAGE}));

    let (status, body) = send(addr, Method::GET, "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["requests"]["total"], 3);
}

#[tokio::test]
async fn test_socket_oversized_body_is_rejected() {
    let config = ServerConfig {
        max_payload_size: 32,
        ..create_test_config()
    };
    let addr = spawn_server(config).await;

    let request = json!({"text": "a".repeat(256), "encrypt": true}).to_string();
    let (status, body) = send(addr, Method::POST, "/cipher/atbash/", &request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": UNEXPECTED_ERROR_MESSAGE}));
}

/// Test that all module re-exports work correctly
#[test]
fn test_module_exports() {
    assert!(!cipher_web::VERSION.is_empty());
    assert_eq!(cipher_web::DEFAULT_PORT, 5000);
    assert_eq!(cipher_web::DEFAULT_BIND_ADDR, "0.0.0.0");
    assert_eq!(cipher_web::MAX_PAYLOAD_SIZE, 1024 * 1024);
    assert_eq!(cipher_web::REQUEST_TIMEOUT_MS, 5000);

    let _schema = cipher_web::ValidationSchema::for_cipher(CipherKind::Affine);
    let _error = CipherWebError::request_error("test");
    let _config = ServerConfig::default();
}
