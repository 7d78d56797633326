//! Tests for `WebhookClient`.

use super::sender::{IsRetryable, WebhookClient, WebhookSender};
use super::{
    AttemptError, HttpClient, HttpError, HttpRequest, HttpResponse, Importance, Payload,
    WebhookError, WebhookRequest,
};
use crate::time::{FixedClock, InstantSleeper, Sleeper};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock HTTP client that returns a scripted sequence of results.
///
/// Once the script runs out every further call times out.
#[derive(Debug)]
struct MockClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl MockClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    fn json_ok(body: &str) -> Result<HttpResponse, HttpError> {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        Ok(HttpResponse::new(
            http::StatusCode::OK,
            headers,
            body.as_bytes().to_vec(),
        ))
    }

    fn status(status: http::StatusCode, body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(
            status,
            http::HeaderMap::new(),
            body.as_bytes().to_vec(),
        ))
    }

    fn success() -> Self {
        Self::new(vec![Self::json_ok(r#"{"ok":true}"#)])
    }

    fn failing_then_success(failures: usize) -> Self {
        let mut responses: Vec<_> = (0..failures).map(|_| Err(HttpError::Timeout)).collect();
        responses.push(Self::json_ok(r#"{"ok":true}"#));
        Self::new(responses)
    }

    fn always_failing() -> Self {
        Self::new(Vec::new())
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(HttpError::Timeout)
        } else {
            responses.remove(0)
        }
    }
}

impl HttpClient for Arc<MockClient> {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).request(req).await
    }
}

/// Sleeper that records requested delays.
#[derive(Debug, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn test_url() -> url::Url {
    url::Url::parse("https://n8n.example.com/webhook/test").unwrap()
}

fn client_for(
    mock: &Arc<MockClient>,
) -> WebhookClient<Arc<MockClient>, InstantSleeper, FixedClock> {
    WebhookClient::new(Arc::clone(mock))
        .with_sleeper(InstantSleeper)
        .with_clock(FixedClock::from_millis(1_000))
}

mod builder {
    use super::*;

    #[test]
    fn new_uses_one_second_base_delay() {
        let client = WebhookClient::new(MockClient::success());
        assert_eq!(client.base_delay(), Duration::from_secs(1));
        assert!(client.headers().is_empty());
    }

    #[test]
    fn retry_policy_follows_importance_and_base_delay() {
        let client = WebhookClient::new(MockClient::success())
            .with_base_delay(Duration::from_millis(10));
        let policy = client.retry_policy(Some(Importance::Important));

        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(10));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WebhookClient<MockClient>>();
    }
}

mod send {
    use super::*;

    #[tokio::test]
    async fn success_returns_decoded_data() {
        let mock = Arc::new(MockClient::success());
        let response = client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert!(response.success);
        assert_eq!(response.data, Some(json!({"ok": true})));
        assert!(response.error.is_none());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn get_uses_clock_for_cache_buster() {
        let mock = Arc::new(MockClient::success());
        let payload = Payload::new().with("a", 1).with("b", "x");
        client_for(&mock)
            .send(WebhookRequest::get(test_url(), payload))
            .await;

        let requests = mock.captured_requests();
        assert_eq!(requests[0].url.query(), Some("a=1&b=x&_t=1000"));
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let mock = Arc::new(MockClient::success());
        client_for(&mock)
            .send(WebhookRequest::post(test_url(), Payload::new().with("a", 1)))
            .await;

        let requests = mock.captured_requests();
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(requests[0].body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[tokio::test]
    async fn configured_headers_are_sent() {
        let mock = Arc::new(MockClient::success());
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_static("Bearer token"),
        );

        client_for(&mock)
            .with_headers(headers)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        let requests = mock.captured_requests();
        assert_eq!(
            requests[0].headers.get(http::header::AUTHORIZATION).unwrap(),
            "Bearer token"
        );
    }

    #[tokio::test]
    async fn plain_text_json_is_parsed() {
        let mock = Arc::new(MockClient::new(vec![MockClient::status(
            http::StatusCode::OK,
            r#"{"x":1}"#,
        )]));
        let response = client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert_eq!(response.data, Some(json!({"x": 1})));
    }

    #[tokio::test]
    async fn plain_text_is_kept_verbatim() {
        let mock = Arc::new(MockClient::new(vec![MockClient::status(
            http::StatusCode::OK,
            "not json",
        )]));
        let response = client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert_eq!(response.data, Some(json!("not json")));
    }

    #[tokio::test]
    async fn every_attempt_reuses_the_same_request() {
        let mock = Arc::new(MockClient::failing_then_success(1));
        client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        let requests = mock.captured_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, requests[1].url);
    }
}

mod retry {
    use super::*;

    #[tokio::test]
    async fn two_failures_then_success_takes_three_attempts() {
        let mock = Arc::new(MockClient::failing_then_success(2));
        let response = client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert!(response.success);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn retries_on_non_success_status() {
        let mock = Arc::new(MockClient::new(vec![
            MockClient::status(http::StatusCode::NOT_FOUND, "missing"),
            MockClient::json_ok("[]"),
        ]));
        let response = client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert!(response.success);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn always_failing_uses_exactly_the_importance_ceiling() {
        let cases = [
            (Some(Importance::Critical), 5),
            (Some(Importance::Important), 4),
            (Some(Importance::Standard), 3),
            (Some(Importance::Low), 2),
            (None, 3),
        ];

        for (importance, expected) in cases {
            let mock = Arc::new(MockClient::always_failing());
            let mut request = WebhookRequest::get(test_url(), Payload::new());
            request.importance = importance;

            let response = client_for(&mock).send(request).await;

            assert!(!response.success);
            assert_eq!(response.error.as_deref(), Some("Request timed out"));
            assert_eq!(mock.calls(), expected, "{importance:?}");
        }
    }

    #[tokio::test]
    async fn error_reports_last_status_and_body() {
        let mock = Arc::new(MockClient::new(vec![
            Err(HttpError::Timeout),
            MockClient::status(http::StatusCode::BAD_GATEWAY, "upstream down"),
        ]));
        let request = WebhookRequest::get(test_url(), Payload::new())
            .with_importance(Importance::Low);

        let response = client_for(&mock).send(request).await;

        assert_eq!(
            response.error.as_deref(),
            Some("Server responded with status: 502 - upstream down")
        );
    }

    #[tokio::test]
    async fn invalid_url_is_not_retried() {
        let mock = Arc::new(MockClient::new(vec![Err(HttpError::InvalidUrl(
            "bad".to_string(),
        ))]));
        let response = client_for(&mock)
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Invalid URL: bad"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn sleeps_between_attempts_but_not_after_last() {
        let mock = Arc::new(MockClient::always_failing());
        let sleeper = RecordingSleeper::default();
        let delays = Arc::clone(&sleeper.delays);
        let client = WebhookClient::new(Arc::clone(&mock))
            .with_sleeper(sleeper)
            .with_clock(FixedClock::from_millis(0));

        let request =
            WebhookRequest::get(test_url(), Payload::new()).with_importance(Importance::Critical);
        client.send(request).await;

        assert_eq!(
            *delays.lock().unwrap(),
            vec![
                Duration::from_millis(4000),
                Duration::from_millis(6000),
                Duration::from_millis(9000),
                Duration::from_millis(13500),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn real_sleeper_waits_backoff_delays() {
        let mock = Arc::new(MockClient::failing_then_success(1));
        let client = WebhookClient::new(Arc::clone(&mock));
        let start = tokio::time::Instant::now();

        let response = client
            .send(WebhookRequest::get(test_url(), Payload::new()))
            .await;

        assert!(response.success);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}

mod retryable {
    use super::*;

    #[test]
    fn transport_failures_are_retryable() {
        assert!(HttpError::Timeout.is_retryable());
        assert!(HttpError::Connection("refused".into()).is_retryable());
        assert!(!HttpError::InvalidUrl("x".to_string()).is_retryable());
    }

    #[test]
    fn every_non_success_status_is_retryable() {
        for status in [
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::NOT_FOUND,
            http::StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let err = AttemptError::NonSuccessStatus { status, body: None };
            assert!(err.is_retryable(), "{status}");
        }
    }

    #[test]
    fn max_retries_error_reports_last_message() {
        let err = WebhookError::MaxRetriesExceeded {
            attempts: 3,
            last_error: AttemptError::Http(HttpError::Timeout),
        };

        assert_eq!(err.last_message(), "Request timed out");
        assert!(err.to_string().contains("3 attempts"));
    }
}
