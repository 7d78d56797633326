//! Tests for `WebhookRequest` and its HTTP translation.

use super::{Importance, Payload, WebhookMethod, WebhookRequest};
use serde_json::json;

fn endpoint() -> url::Url {
    url::Url::parse("https://n8n.example.com/webhook/abc").unwrap()
}

mod get_requests {
    use super::*;

    #[test]
    fn payload_becomes_query_with_cache_buster() {
        let payload = Payload::new().with("a", 1).with("b", "x");
        let request = WebhookRequest::get(endpoint(), payload);

        let sent = request.to_http(1_700_000_000_000).unwrap();

        assert_eq!(sent.method, http::Method::GET);
        assert_eq!(
            sent.url.as_str(),
            "https://n8n.example.com/webhook/abc?a=1&b=x&_t=1700000000000"
        );
        assert!(sent.body.is_none());
    }

    #[test]
    fn values_are_form_encoded() {
        let payload = Payload::new().with("message", "hello world & more");
        let sent = WebhookRequest::get(endpoint(), payload)
            .to_http(1)
            .unwrap();

        assert_eq!(sent.url.query(), Some("message=hello+world+%26+more&_t=1"));
    }

    #[test]
    fn null_values_are_skipped() {
        let payload = Payload::new()
            .with("date", serde_json::Value::Null)
            .with("timestamp", "t");
        let sent = WebhookRequest::get(endpoint(), payload).to_http(5).unwrap();

        assert_eq!(sent.url.query(), Some("timestamp=t&_t=5"));
    }

    #[test]
    fn existing_query_is_preserved() {
        let url = url::Url::parse("https://n8n.example.com/webhook/abc?fixed=1").unwrap();
        let sent = WebhookRequest::get(url, Payload::new().with("a", "b"))
            .to_http(9)
            .unwrap();

        assert_eq!(sent.url.query(), Some("fixed=1&a=b&_t=9"));
    }

    #[test]
    fn empty_payload_still_busts_cache() {
        let sent = WebhookRequest::get(endpoint(), Payload::new())
            .to_http(42)
            .unwrap();

        assert_eq!(sent.url.query(), Some("_t=42"));
    }

    #[test]
    fn asks_for_json_and_disables_caching() {
        let sent = WebhookRequest::get(endpoint(), Payload::new())
            .to_http(1)
            .unwrap();

        assert_eq!(
            sent.headers.get(http::header::ACCEPT).unwrap(),
            "application/json"
        );
        assert_eq!(
            sent.headers.get(http::header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert!(sent.headers.get(http::header::CONTENT_TYPE).is_none());
    }
}

mod post_requests {
    use super::*;

    #[test]
    fn payload_becomes_json_body() {
        let payload = Payload::new().with("articleId", "n-1").with("grade", "critical");
        let sent = WebhookRequest::post(endpoint(), payload)
            .to_http(1)
            .unwrap();

        assert_eq!(sent.method, http::Method::POST);
        assert_eq!(
            sent.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_slice(&sent.body.unwrap()).unwrap();
        assert_eq!(body, json!({"articleId": "n-1", "grade": "critical"}));
    }

    #[test]
    fn url_has_no_cache_buster() {
        let sent = WebhookRequest::post(endpoint(), Payload::new())
            .to_http(1)
            .unwrap();

        assert_eq!(sent.url.query(), None);
    }
}

mod importance_field {
    use super::*;

    #[test]
    fn importance_is_added_to_payload() {
        let request = WebhookRequest::get(endpoint(), Payload::new().with("message", "hi"))
            .with_importance(Importance::Critical);

        let sent = request.to_http(3).unwrap();
        assert_eq!(sent.url.query(), Some("message=hi&importance=1&_t=3"));
    }

    #[test]
    fn explicit_importance_field_wins() {
        let request = WebhookRequest::post(endpoint(), Payload::new().with("importance", "high"))
            .with_importance(Importance::Low);

        assert_eq!(request.wire_payload().get("importance"), Some(&json!("high")));
    }

    #[test]
    fn no_importance_means_no_field() {
        let request = WebhookRequest::get(endpoint(), Payload::new());
        assert!(!request.wire_payload().contains_key("importance"));
    }
}

mod method {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("get".parse::<WebhookMethod>(), Ok(WebhookMethod::Get));
        assert_eq!("Post".parse::<WebhookMethod>(), Ok(WebhookMethod::Post));
        assert!("PUT".parse::<WebhookMethod>().is_err());
    }

    #[test]
    fn default_is_get() {
        assert_eq!(WebhookMethod::default(), WebhookMethod::Get);
    }

    #[test]
    fn converts_to_http_method() {
        assert_eq!(http::Method::from(WebhookMethod::Post), http::Method::POST);
        assert_eq!(WebhookMethod::Get.to_string(), "GET");
    }
}
