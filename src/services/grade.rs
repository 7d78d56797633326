//! Article grade submission.

use url::Url;

use crate::news::Grade;
use crate::time::{Clock, SystemClock};
use crate::webhook::{Payload, WebhookRequest, WebhookResponse, WebhookSender};

use super::{Endpoints, stamped};

/// Client that posts a user's article grade back to the workflows.
#[derive(Debug)]
pub struct GradeService<'a, W, C = SystemClock> {
    sender: &'a W,
    clock: C,
    url: Url,
}

impl<'a, W: WebhookSender> GradeService<'a, W, SystemClock> {
    /// Creates the service using the system clock.
    #[must_use]
    pub fn new(sender: &'a W, endpoints: &Endpoints) -> Self {
        Self {
            sender,
            clock: SystemClock,
            url: endpoints.grade.clone(),
        }
    }
}

impl<'a, W: WebhookSender, C: Clock> GradeService<'a, W, C> {
    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> GradeService<'a, W, C2> {
        GradeService {
            sender: self.sender,
            clock,
            url: self.url,
        }
    }

    /// Posts a grade; its rank decides how hard the call is retried.
    pub async fn submit(&self, article_id: &str, grade: Grade) -> WebhookResponse {
        let payload = Payload::new()
            .with("articleId", article_id)
            .with("grade", grade.as_str());
        let request = WebhookRequest::post(self.url.clone(), stamped(payload, &self.clock))
            .with_importance(grade.importance());
        self.sender.send(request).await
    }
}
