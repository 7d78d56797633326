//! Tests for the run module.

use super::*;
use bioking_webhook::config::Cli;
use bioking_webhook::time::FixedClock;
use bioking_webhook::webhook::{Importance, WebhookMethod};
use serde_json::json;
use std::sync::Mutex;

/// 2024-04-30T09:30:00.000Z
const NOW_MILLIS: u64 = 1_714_469_400_000;

/// Sender that records requests and replies with a canned response.
#[derive(Debug)]
struct RecordingSender {
    response: WebhookResponse,
    requests: Mutex<Vec<WebhookRequest>>,
}

impl RecordingSender {
    fn new(response: WebhookResponse) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn last(&self) -> WebhookRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl WebhookSender for RecordingSender {
    async fn send(&self, request: WebhookRequest) -> WebhookResponse {
        self.requests.lock().unwrap().push(request);
        self.response.clone()
    }
}

fn parse(args: &[&str]) -> (Command, ValidatedConfig) {
    let mut full_args = vec!["bioking"];
    full_args.extend(args);
    let cli = Cli::parse_from_iter(full_args);
    let config = ValidatedConfig::from_raw(&cli, None).unwrap();
    (cli.command, config)
}

async fn run(args: &[&str], sender: &RecordingSender) -> Result<Output, RunError> {
    let (command, config) = parse(args);
    execute(command, &config, sender, FixedClock::from_millis(NOW_MILLIS)).await
}

mod requests {
    use super::*;

    #[tokio::test]
    async fn chat_renders_success_envelope() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!({"output": "hi"})));

        let output = run(&["chat", "hello"], &sender).await.unwrap();

        assert!(output.success);
        assert_eq!(output.body, json!({"success": true, "data": {"output": "hi"}}));
        let request = sender.last();
        assert_eq!(request.importance, Some(Importance::Critical));
        assert_eq!(request.payload.get("sessionId"), Some(&json!("bioking-cli")));
    }

    #[tokio::test]
    async fn failed_call_is_unsuccessful_output() {
        let sender = RecordingSender::new(WebhookResponse::failure("Request timed out"));

        let output = run(&["trending"], &sender).await.unwrap();

        assert!(!output.success);
        assert_eq!(
            output.body,
            json!({"success": false, "error": "Request timed out"})
        );
    }

    #[tokio::test]
    async fn send_resolves_target_and_fields() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!(null)));

        run(
            &["send", "webhook/custom", "-f", "a=1", "-f", "b=x", "-m", "post", "-i", "2"],
            &sender,
        )
        .await
        .unwrap();

        let request = sender.last();
        assert_eq!(request.url.as_str(), "https://n8n.bioking.kr/webhook/custom");
        assert_eq!(request.method, WebhookMethod::Post);
        assert_eq!(request.importance, Some(Importance::Important));
        assert_eq!(request.payload.get("a"), Some(&json!(1)));
        assert_eq!(request.payload.get("b"), Some(&json!("x")));
        assert!(request.payload.get("timestamp").is_none());
    }

    #[tokio::test]
    async fn send_with_bad_target_is_config_error() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!(null)));

        let result = run(&["send", "mailto:ops@example.com"], &sender).await;

        assert!(matches!(result, Err(RunError::Config(_))));
        assert!(sender.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn grade_posts_to_grade_endpoint() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!({"saved": true})));

        run(&["grade", "a-1", "critical"], &sender).await.unwrap();

        let request = sender.last();
        assert_eq!(
            request.url.as_str(),
            "https://n8n.bioking.kr/webhook/article-grade"
        );
        assert_eq!(request.method, WebhookMethod::Post);
        assert_eq!(request.importance, Some(Importance::Critical));
    }

    #[tokio::test]
    async fn article_renders_parsed_content() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!([{"title": "Phase 3 readout"}])));

        let output = run(&["article", "us", "a-9"], &sender).await.unwrap();

        assert!(output.success);
        assert_eq!(output.body["id"], "a-9");
        assert_eq!(output.body["title"], "Phase 3 readout");
        assert_eq!(output.body["grade"], "interesting");
        assert_eq!(sender.last().payload.get("type"), Some(&json!("us")));
    }

    #[tokio::test]
    async fn article_without_record_is_unsuccessful_output() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!([])));

        let output = run(&["article", "kor", "k-1"], &sender).await.unwrap();

        assert!(!output.success);
        assert_eq!(output.body["error"], "Response did not contain an article");
    }

    #[tokio::test]
    async fn init_is_not_a_request() {
        let sender = RecordingSender::new(WebhookResponse::ok(json!(null)));

        let result = run(&["init"], &sender).await;

        assert!(matches!(result, Err(RunError::NotARequest)));
    }
}

mod news {
    use super::*;

    fn feed() -> WebhookResponse {
        WebhookResponse::ok(json!([{
            "articles": [
                {"id": "a1", "title": "Gene therapy approved", "publishedAt": "2024-04-30T08:00:00Z", "grade": "critical"},
                {"id": "a2", "title": "Biotech index slips", "publishedAt": "2024-04-30T10:00:00Z"},
                {"id": "a3", "title": "Gene editing trial", "publishedAt": "2024-04-29T23:59:59Z", "grade": "critical"}
            ]
        }]))
    }

    fn ids(output: &Output) -> Vec<&str> {
        output
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn defaults_to_today_and_keeps_all_grades() {
        let sender = RecordingSender::new(feed());

        let output = run(&["news"], &sender).await.unwrap();

        assert!(output.success);
        assert_eq!(ids(&output), ["a1", "a2"]);
        assert_eq!(
            sender.last().payload.get("date"),
            Some(&json!("2024-04-30T00:00:00.000Z"))
        );
    }

    #[tokio::test]
    async fn filters_by_grade_and_query() {
        let sender = RecordingSender::new(feed());

        let output = run(&["news", "-d", "2024-04-30", "-g", "critical", "-q", "GENE"], &sender)
            .await
            .unwrap();

        assert_eq!(ids(&output), ["a1"]);
    }

    #[tokio::test]
    async fn feed_failure_is_unsuccessful_output() {
        let sender = RecordingSender::new(WebhookResponse::failure("Request timed out"));

        let output = run(&["news"], &sender).await.unwrap();

        assert!(!output.success);
        assert_eq!(output.body["error"], "Request timed out");
    }
}

mod run_error {
    use super::*;

    #[test]
    fn not_a_request_displays_message() {
        assert_eq!(
            RunError::NotARequest.to_string(),
            "The init command does not send a request"
        );
    }

    #[test]
    fn config_error_is_transparent() {
        let error = RunError::from(ConfigError::InvalidHeader {
            value: "oops".to_string(),
        });
        assert!(error.to_string().starts_with("Invalid header format 'oops'"));
    }
}
