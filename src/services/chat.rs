//! Chat assistant, research and report workflows.

use url::Url;

use crate::time::{Clock, SystemClock};
use crate::webhook::{Importance, Payload, WebhookRequest, WebhookResponse, WebhookSender};

use super::{Endpoints, stamped};

/// Client for the conversational workflows.
///
/// Chat messages are critical, research requests important and report
/// requests standard, so an interactive chat gets the most retries.
#[derive(Debug)]
pub struct ChatService<'a, W, C = SystemClock> {
    sender: &'a W,
    clock: C,
    chat_url: Url,
    research_url: Url,
    report_url: Url,
}

impl<'a, W: WebhookSender> ChatService<'a, W, SystemClock> {
    /// Creates the service using the system clock.
    #[must_use]
    pub fn new(sender: &'a W, endpoints: &Endpoints) -> Self {
        Self {
            sender,
            clock: SystemClock,
            chat_url: endpoints.chat.clone(),
            research_url: endpoints.research.clone(),
            report_url: endpoints.report.clone(),
        }
    }
}

impl<'a, W: WebhookSender, C: Clock> ChatService<'a, W, C> {
    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ChatService<'a, W, C2> {
        ChatService {
            sender: self.sender,
            clock,
            chat_url: self.chat_url,
            research_url: self.research_url,
            report_url: self.report_url,
        }
    }

    /// Sends a chat message within a session.
    pub async fn send_message(&self, message: &str, session_id: &str) -> WebhookResponse {
        let payload = Payload::new()
            .with("message", message)
            .with("sessionId", session_id);
        self.call(&self.chat_url, payload, Importance::Critical).await
    }

    /// Starts a research query.
    pub async fn research(&self, query: &str, session_id: &str) -> WebhookResponse {
        let payload = Payload::new()
            .with("query", query)
            .with("sessionId", session_id);
        self.call(&self.research_url, payload, Importance::Important)
            .await
    }

    /// Requests a report on a topic.
    pub async fn report(&self, topic: &str, session_id: &str) -> WebhookResponse {
        let payload = Payload::new()
            .with("topic", topic)
            .with("sessionId", session_id);
        self.call(&self.report_url, payload, Importance::Standard)
            .await
    }

    async fn call(&self, url: &Url, payload: Payload, importance: Importance) -> WebhookResponse {
        let request = WebhookRequest::get(url.clone(), stamped(payload, &self.clock))
            .with_importance(importance);
        self.sender.send(request).await
    }
}
