//! Integration tests using wiremock to simulate the API server.

use openai_core::resources::chat::{ChatCompletionCreateParams, ChatMessage};
use openai_core::resources::embeddings::EmbeddingCreateParams;
use openai_core::retry::RetryPredicate;
use openai_core::types::DeleteResponse;
use openai_core::{Client, Error, ErrorKind, Omit, Query, RequestOptions, RetryStrategy};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .api_key("sk-test")
        .base_url(server.uri())
        .unwrap()
        .retry_strategy(RetryStrategy::Immediate)
        .build()
        .unwrap()
}

fn chat_body() -> Value {
    json!({
        "id": "1",
        "object": "chat.completion",
        "created": 100,
        "model": "m",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "hello" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
    })
}

fn error_body(message: &str) -> Value {
    json!({ "error": { "message": message, "type": "invalid_request_error" } })
}

#[tokio::test]
async fn test_chat_completion_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "model": "m",
            "messages": [{ "role": "user", "content": "hi" }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "abc123")
                .set_body_json(chat_body()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(format!("{}/v1", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap();

    let response = client
        .chat()
        .completions()
        .create_with_messages("m", vec![ChatMessage::user("hi")], RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.content(), "hello");
    assert_eq!(response.usage.total_tokens, 2);
    assert_eq!(response.request_id, "abc123");
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.attempts, 1);
    assert!(!response.was_retried());
    assert_eq!(response.created, 100);
    assert_eq!(response.raw["model"], "m");
}

#[tokio::test]
async fn test_missing_request_id_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "object": "list", "data": [] })))
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server)
        .models()
        .list(RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.request_id, "");
    assert!(response.data.data.is_empty());
}

#[tokio::test]
async fn test_rate_limit_exhausts_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body("Rate limit reached")))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(mock_server.uri())
        .unwrap()
        .max_retries(3)
        .retry_strategy(RetryStrategy::Immediate)
        .build()
        .unwrap();

    let params = ChatCompletionCreateParams::new("gpt-4o-mini", vec![ChatMessage::user("hi")]);
    let result = client.chat().completions().create(&params, RequestOptions::new()).await;

    match result {
        Err(Error::RateLimit(details)) => {
            assert_eq!(details.status.as_u16(), 429);
            assert_eq!(details.message, "Rate limit reached");
        }
        other => panic!("Expected RateLimit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_per_call_budget_overrides_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .models()
        .list(RequestOptions::new().with_max_retries(0))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InternalServer);
    assert_eq!(err.message(), "HTTP 503 error.");
}

#[tokio::test]
async fn test_success_after_transient_failures() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    // Two failures, then success on the third attempt
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            match count {
                0 => ResponseTemplate::new(500).set_body_string("upstream exploded"),
                1 => ResponseTemplate::new(429),
                _ => ResponseTemplate::new(200).set_body_json(chat_body()),
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(mock_server.uri())
        .unwrap()
        .max_retries(5)
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(10),
        })
        .build()
        .unwrap();

    let params = ChatCompletionCreateParams::new("gpt-4o-mini", vec![ChatMessage::user("hi")]);
    let response = client
        .chat()
        .completions()
        .create(&params, RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.content(), "hello");
    assert_eq!(response.attempts, 3);
    assert!(response.was_retried());
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_authentication_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("x-request-id", "req_401")
                .set_body_json(error_body("Incorrect API key provided")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .models()
        .list(RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.message(), "Incorrect API key provided");
    assert_eq!(err.request_id(), Some("req_401"));
    assert_eq!(err.body().unwrap()["error"]["type"], "invalid_request_error");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_status_classification() {
    let mock_server = MockServer::start().await;

    let table = [
        (400, ErrorKind::BadRequest),
        (401, ErrorKind::Authentication),
        (403, ErrorKind::PermissionDenied),
        (404, ErrorKind::NotFound),
        (409, ErrorKind::Conflict),
        (422, ErrorKind::UnprocessableEntity),
        (429, ErrorKind::RateLimit),
        (500, ErrorKind::InternalServer),
        (418, ErrorKind::Status),
    ];

    for (status, _) in table {
        Mock::given(method("GET"))
            .and(path(format!("/status/{}", status)))
            .respond_with(ResponseTemplate::new(status).set_body_json(error_body("boom")))
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    for (status, kind) in table {
        let err = client
            .get::<Value>(
                &format!("status/{}", status),
                &Query::new(),
                RequestOptions::new().with_max_retries(0),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), kind, "status {}", status);
        assert_eq!(err.status().map(|s| s.as_u16()), Some(status));
        assert_eq!(err.message(), "boom");
    }
}

#[tokio::test]
async fn test_message_synthesized_for_non_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/gpt-x"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>not here</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .models()
        .retrieve("gpt-x", RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.message(), "HTTP 404 error.");
    assert!(err.body().is_none());
}

#[tokio::test]
async fn test_header_precedence_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .organization("org-1")
        .project("proj-1")
        .base_url(mock_server.uri())
        .unwrap()
        .default_header("X-Custom", "1")
        .unwrap()
        .build()
        .unwrap();

    client
        .models()
        .list(RequestOptions::new().with_header("X-Custom", "2").unwrap())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;

    let custom: Vec<_> = headers.get_all("x-custom").iter().collect();
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0], "2");
    assert_eq!(headers["openai-organization"], "org-1");
    assert_eq!(headers["openai-project"], "proj-1");
    assert_eq!(headers["authorization"], "Bearer sk-test");
}

#[tokio::test]
async fn test_query_and_extra_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(query_param("api-version", "2024-06-01"))
        .and(body_json(json!({
            "model": "text-embedding-3-small",
            "input": "hello",
            "dimensions": 8,
            "user": "tester"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "index": 0, "object": "embedding", "embedding": [0.5, 0.25] }],
            "model": "text-embedding-3-small",
            "usage": { "prompt_tokens": 1, "total_tokens": 1 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(mock_server.uri())
        .unwrap()
        .default_query("api-version", "2024-06-01")
        .build()
        .unwrap();

    let params = EmbeddingCreateParams {
        dimensions: Omit::Given(8),
        ..EmbeddingCreateParams::new("text-embedding-3-small", "hello")
    };
    let response = client
        .embeddings()
        .create(&params, RequestOptions::new().with_body_field("user", "tester"))
        .await
        .unwrap();

    assert_eq!(response.embeddings(), vec![&[0.5f32, 0.25][..]]);
}

#[tokio::test]
async fn test_files_list_with_purpose() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("purpose", "fine-tune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "id": "file-1", "bytes": 120, "filename": "train.jsonl", "purpose": "fine-tune" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server)
        .files()
        .list(Some("fine-tune"), RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.data.data.len(), 1);
    assert_eq!(response.data.data[0].bytes, 120);
    assert_eq!(response.data.data[0].status, "");
}

#[tokio::test]
async fn test_delete_returns_acknowledgement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/models/ft:gpt-4o-mini:acme::abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ft:gpt-4o-mini:acme::abc",
            "object": "model",
            "deleted": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .models()
        .delete("ft:gpt-4o-mini:acme::abc", RequestOptions::new())
        .await
        .unwrap();

    assert!(response.deleted);

    let generic = client
        .delete::<DeleteResponse>("models/ft:gpt-4o-mini:acme::abc", RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(generic.id, "ft:gpt-4o-mini:acme::abc");
}

#[tokio::test]
async fn test_lenient_decoding_of_unexpected_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": "surprise" })))
        .mount(&mock_server)
        .await;

    let params = ChatCompletionCreateParams::new("m", vec![ChatMessage::user("hi")]);
    let response = client_for(&mock_server)
        .chat()
        .completions()
        .create(&params, RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.content(), "");
    assert_eq!(response.raw["choices"], "surprise");
}

#[tokio::test]
async fn test_mistyped_fields_keep_the_rest_of_the_completion() {
    let mock_server = MockServer::start().await;

    let mut body = chat_body();
    body["id"] = json!(7);
    body["created"] = json!(100.5);
    body["usage"]["total_tokens"] = json!("2");
    body["choices"].as_array_mut().unwrap().push(json!("junk"));

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let params = ChatCompletionCreateParams::new("m", vec![ChatMessage::user("hi")]);
    let response = client_for(&mock_server)
        .chat()
        .completions()
        .create(&params, RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.content(), "hello");
    assert_eq!(response.id, "");
    assert_eq!(response.created, 100);
    assert_eq!(response.model, "m");
    assert_eq!(response.usage.total_tokens, 2);
    assert_eq!(response.choices.len(), 2);
    assert_eq!(response.choices[1].finish_reason, "");
    assert_eq!(response.raw["created"], 100.5);
}

#[tokio::test]
async fn test_empty_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/files/file-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server)
        .files()
        .delete("file-1", RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 204);
    assert!(!response.deleted);
    assert_eq!(response.raw, json!({}));
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .models()
        .list(
            RequestOptions::new()
                .with_timeout(Duration::from_millis(50))
                .with_max_retries(0),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_error_is_classified() {
    // Grab a free port and release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(format!("http://127.0.0.1:{}", port))
        .unwrap()
        .max_retries(1)
        .retry_strategy(RetryStrategy::Immediate)
        .build()
        .unwrap();

    let err = client.models().list(RequestOptions::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_credential_provider_called_per_attempt() {
    let mock_server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-rotated-0"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-rotated-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key_provider(move || format!("sk-rotated-{}", counter.fetch_add(1, Ordering::SeqCst)))
        .base_url(mock_server.uri())
        .unwrap()
        .retry_strategy(RetryStrategy::Immediate)
        .build()
        .unwrap();

    let response = client.models().list(RequestOptions::new()).await.unwrap();

    assert_eq!(response.attempts, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_custom_retry_predicate() {
    let mock_server = MockServer::start().await;

    // Only 503 is worth retrying here
    struct RetryOn503;
    impl RetryPredicate for RetryOn503 {
        fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
            error.status().map(|s| s.as_u16()) == Some(503)
        }
    }

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(mock_server.uri())
        .unwrap()
        .max_retries(3)
        .retry_predicate(Box::new(RetryOn503))
        .build()
        .unwrap();

    let err = client.models().list(RequestOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::InternalServer(_)));
}

#[tokio::test]
async fn test_rate_limit_with_retry_after_ms() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(move |_req: &wiremock::Request| {
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429)
                    .insert_header("retry-after-ms", "200")
                    .set_body_json(error_body("Slow down"))
            } else {
                ResponseTemplate::new(200).set_body_json(json!({ "data": [] }))
            }
        })
        .mount(&mock_server)
        .await;

    let start = std::time::Instant::now();
    let response = client_for(&mock_server)
        .models()
        .list(RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(response.attempts, 2);
    // Immediate strategy, so the wait came from the header
    assert!(start.elapsed() >= Duration::from_millis(180));
}

#[tokio::test]
async fn test_short_rate_limit_wait_does_not_shrink_the_delay() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(move |_req: &wiremock::Request| {
            match attempt_count_clone.fetch_add(1, Ordering::SeqCst) {
                0 => ResponseTemplate::new(503),
                1 => ResponseTemplate::new(429).insert_header("retry-after-ms", "0"),
                _ => ResponseTemplate::new(200).set_body_json(json!({ "data": [] })),
            }
        })
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .api_key("sk-test")
        .base_url(mock_server.uri())
        .unwrap()
        .max_retries(2)
        .retry_strategy(RetryStrategy::Linear {
            delay: Duration::from_millis(200),
        })
        .build()
        .unwrap();

    let start = std::time::Instant::now();
    let response = client.models().list(RequestOptions::new()).await.unwrap();

    assert_eq!(response.attempts, 3);
    // The header asked for no wait, but the second delay keeps the first one's length
    assert!(start.elapsed() >= Duration::from_millis(380));
}

#[tokio::test]
async fn test_timed_out_attempt_is_retried() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(move |_req: &wiremock::Request| {
            let template = ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "m" }] }));
            if attempt_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                template.set_delay(Duration::from_millis(500))
            } else {
                template
            }
        })
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server)
        .models()
        .list(
            RequestOptions::new()
                .with_timeout(Duration::from_millis(100))
                .with_max_retries(1),
        )
        .await
        .unwrap();

    assert_eq!(response.attempts, 2);
    assert_eq!(response.data.data[0].id, "m");
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_id_rejected_before_sending() {
    let mock_server = MockServer::start().await;

    let err = client_for(&mock_server)
        .files()
        .retrieve("", RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
