//! Integration tests for the HTTP transport.
//!
//! These tests run the client against a local mock server and verify
//! retries, rate-limit waits, error mapping, signing and body decoding.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use twitter_ads::clients::{
    ErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, RequestSigner, SigningContext,
};
use twitter_ads::{ClientConfig, ClientConfigBuilder, Credentials, DomainUrl};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn builder(server: &MockServer) -> ClientConfigBuilder {
    ClientConfig::builder()
        .credentials(Credentials::new("ck", "cs", "at", "ats").unwrap())
        .api_domain(DomainUrl::new(server.uri()).unwrap())
}

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(builder(server).build().unwrap()).unwrap()
}

fn get(path: &str) -> HttpRequest {
    HttpRequest::builder(HttpMethod::Get, path).build().unwrap()
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[derive(Debug)]
struct FixedSigner;

impl RequestSigner for FixedSigner {
    fn authorization(
        &self,
        credentials: &Credentials,
        context: &SigningContext<'_>,
    ) -> Result<Option<String>, String> {
        Ok(Some(format!(
            "OAuth {} {}",
            credentials.consumer_key.as_ref(),
            context.method
        )))
    }
}

#[derive(Debug)]
struct RefusingSigner;

impl RequestSigner for RefusingSigner {
    fn authorization(
        &self,
        _credentials: &Credentials,
        _context: &SigningContext<'_>,
    ) -> Result<Option<String>, String> {
        Err("no token".to_string())
    }
}

// ============================================================================
// Success Path
// ============================================================================

#[tokio::test]
async fn test_success_response_is_decoded_with_rate_limits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .and(query_param("count", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [], "request": {}}))
                .insert_header("x-account-rate-limit-limit", "250")
                .insert_header("x-account-rate-limit-remaining", "249")
                .insert_header("x-transaction-id", "tx-1"),
        )
        .mount(&server)
        .await;

    let request = HttpRequest::builder(HttpMethod::Get, "/12/accounts")
        .query_param("count", "10")
        .build()
        .unwrap();
    let response = client(&server).perform(&request).await.unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.data(), Some(&json!([])));
    assert_eq!(response.request_id(), Some("tx-1"));
    let account = response.rate_limits.account.unwrap();
    assert_eq!(account.limit, Some(250));
    assert_eq!(account.remaining, Some(249));
    assert!(!response.raw_body.is_empty());
}

#[tokio::test]
async fn test_redirect_class_status_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let response = client(&server).perform(&get("/12/accounts")).await.unwrap();
    assert_eq!(response.code, 204);
    assert!(response.body.is_null());
}

#[tokio::test]
async fn test_non_json_body_is_kept_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let response = client(&server).perform(&get("/12/plain")).await.unwrap();
    assert_eq!(response.body, json!("OK"));
    assert_eq!(response.raw_body, b"OK".to_vec());
}

#[tokio::test]
async fn test_gzip_body_is_decompressed() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(br#"{"data": [{"id": "8u94t", "id_data": []}]}"#)
        .unwrap();
    let gzipped = encoder.finish().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/advertiser-api-async-analytics/job.json.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(gzipped.clone(), "application/gzip"))
        .mount(&server)
        .await;

    let response = client(&server)
        .perform(&get("/advertiser-api-async-analytics/job.json.gz"))
        .await
        .unwrap();

    assert_eq!(response.body["data"][0]["id"], json!("8u94t"));
    assert_eq!(response.raw_body, gzipped);
}

#[tokio::test]
async fn test_corrupt_gzip_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job.json.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"not gzip".to_vec(), "application/gzip"))
        .mount(&server)
        .await;

    let result = client(&server).perform(&get("/job.json.gz")).await;
    assert!(matches!(result, Err(HttpError::Decode(_))));
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_error_status_maps_to_kind_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts/abc/campaigns/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({
                    "errors": [{"code": "NOT_FOUND", "message": "Campaign not found"}],
                    "request": {}
                }))
                .insert_header("x-transaction-id", "tx-404"),
        )
        .mount(&server)
        .await;

    let error = client(&server)
        .perform(&get("/12/accounts/abc/campaigns/missing"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(ErrorKind::NotFound));
    let HttpError::Response(response) = error else {
        panic!("expected a response error");
    };
    assert_eq!(response.code, 404);
    assert_eq!(response.message, "Campaign not found");
    assert_eq!(response.request_id.as_deref(), Some("tx-404"));
    assert_eq!(response.details.unwrap()[0]["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_unlisted_status_maps_to_other() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let error = client(&server).perform(&get("/12/teapot")).await.unwrap_err();
    assert_eq!(error.kind(), Some(ErrorKind::Other));
}

#[tokio::test]
async fn test_rate_limit_error_without_handling_carries_reset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-reset", "1700000000")
                .insert_header("retry-after", "30"),
        )
        .mount(&server)
        .await;

    let error = client(&server).perform(&get("/12/accounts")).await.unwrap_err();
    let HttpError::Response(response) = error else {
        panic!("expected a response error");
    };
    assert_eq!(response.kind, ErrorKind::RateLimit);
    assert_eq!(response.reset_at, Some(1_700_000_000));
    assert_eq!(response.retry_after.as_deref(), Some("30"));
    assert_eq!(request_count(&server).await, 1);
}

// ============================================================================
// Retries and Rate Limits
// ============================================================================

#[tokio::test]
async fn test_server_error_then_rate_limit_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let config = builder(&server)
        .retry_max(1)
        .retry_delay(Duration::from_millis(10))
        .handle_rate_limit(true)
        .rate_limit_margin(Duration::ZERO)
        .build()
        .unwrap();
    let response = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_retry_budget_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = builder(&server)
        .retry_max(2)
        .retry_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    let error = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(ErrorKind::ServiceUnavailable));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_status_outside_retry_set_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let config = builder(&server)
        .retry_max(3)
        .retry_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    let error = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(ErrorKind::BadRequest));
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_rate_limit_waits_do_not_consume_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let config = builder(&server)
        .handle_rate_limit(true)
        .rate_limit_margin(Duration::ZERO)
        .build()
        .unwrap();
    let response = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_rate_limit_waits_until_reset_header() {
    let server = MockServer::start().await;
    let reset = (chrono::Utc::now().timestamp() + 2).to_string();
    let reset: &'static str = Box::leak(reset.into_boxed_str());
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-limit", "15")
                .insert_header("x-rate-limit-remaining", "0")
                .insert_header("x-rate-limit-reset", reset),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [7]})))
        .mount(&server)
        .await;

    let config = builder(&server)
        .handle_rate_limit(true)
        .rate_limit_margin(Duration::ZERO)
        .build()
        .unwrap();
    let started = Instant::now();
    let response = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(900));
    assert_eq!(response.data(), Some(&json!([7])));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_timeout_is_retried_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [0]}))
                .set_delay(Duration::from_millis(800)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [1]})))
        .mount(&server)
        .await;

    let config = builder(&server)
        .timeout(Duration::from_millis(200))
        .retry_max(1)
        .retry_delay(Duration::from_millis(10))
        .retry_on_timeouts(true)
        .build()
        .unwrap();
    let response = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap();

    assert_eq!(response.data(), Some(&json!([1])));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_timeout_fails_without_timeout_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [0]}))
                .set_delay(Duration::from_millis(800)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [1]})))
        .mount(&server)
        .await;

    let config = builder(&server)
        .timeout(Duration::from_millis(200))
        .retry_max(1)
        .retry_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    let error = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap_err();

    assert!(matches!(error, HttpError::Network(ref e) if e.is_timeout()));
    assert_eq!(request_count(&server).await, 1);
}

/// Serves one connection per attempt: the first sends headers and then
/// stalls before the body, later ones answer in full.
async fn stalling_body_server(connections: Arc<AtomicUsize>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let attempt = connections.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let body = br#"{"data":[1]}"#;
                let head = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.flush().await;
                if attempt == 0 {
                    tokio::time::sleep(Duration::from_millis(800)).await;
                    return;
                }
                let _ = socket.write_all(body).await;
                let _ = socket.flush().await;
            });
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_body_read_timeout_is_retried() {
    let connections = Arc::new(AtomicUsize::new(0));
    let domain = stalling_body_server(Arc::clone(&connections)).await;

    let config = ClientConfig::builder()
        .credentials(Credentials::new("ck", "cs", "at", "ats").unwrap())
        .api_domain(DomainUrl::new(domain).unwrap())
        .timeout(Duration::from_millis(200))
        .retry_max(1)
        .retry_delay(Duration::from_millis(10))
        .retry_on_timeouts(true)
        .build()
        .unwrap();
    let response = HttpClient::new(config)
        .unwrap()
        .perform(&get("/12/accounts"))
        .await
        .unwrap();

    assert_eq!(response.data(), Some(&json!([1])));
    assert_eq!(connections.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Signing and Requests
// ============================================================================

#[tokio::test]
async fn test_signer_sets_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .and(header("authorization", "OAuth ck get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let config = builder(&server).build().unwrap();
    let client = HttpClient::with_signer(config, Arc::new(FixedSigner)).unwrap();

    let response = client.perform(&get("/12/accounts")).await.unwrap();
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn test_refusing_signer_sends_nothing() {
    let server = MockServer::start().await;
    let config = builder(&server).build().unwrap();
    let client = HttpClient::with_signer(config, Arc::new(RefusingSigner)).unwrap();

    let result = client.perform(&get("/12/accounts")).await;

    assert!(matches!(result, Err(HttpError::Signing(ref reason)) if reason == "no token"));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_accept_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/12/accounts"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let response = client(&server).perform(&get("/12/accounts")).await.unwrap();
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn test_json_body_is_sent_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/12/batch/accounts/abc/campaigns"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let request = HttpRequest::builder(HttpMethod::Post, "/12/batch/accounts/abc/campaigns")
        .body(json!([{"operation_type": "Create", "params": {"name": "a"}}]))
        .body_type(twitter_ads::DataType::Json)
        .build()
        .unwrap();
    client(&server).perform(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent[0]["operation_type"], json!("Create"));
}
