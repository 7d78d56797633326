//! Webhook layer for calling workflow-automation endpoints.
//!
//! This module provides types and traits for:
//! - Describing a webhook call ([`WebhookRequest`], [`Payload`], [`Importance`])
//! - Abstracting HTTP clients ([`HttpClient`], [`HttpRequest`], [`HttpResponse`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Sending with importance-scaled retries ([`WebhookSender`], [`WebhookClient`])
//! - The uniform result envelope ([`WebhookResponse`])

mod client;
mod error;
mod http;
mod importance;
mod payload;
mod request;
mod response;
mod retry;
mod sender;

#[cfg(test)]
mod request_tests;
#[cfg(test)]
mod sender_tests;

pub use client::ReqwestClient;
pub use error::{AttemptError, HttpError, WebhookError};
pub use self::http::{HttpClient, HttpRequest, HttpResponse};
pub use importance::{Importance, InvalidImportance, RetryProfile, retry_profile};
pub use payload::Payload;
pub use request::{CACHE_BUSTER_PARAM, IMPORTANCE_KEY, WebhookMethod, WebhookRequest};
pub use response::{WebhookResponse, decode_body};
pub use retry::RetryPolicy;
pub use sender::{IsRetryable, WebhookClient, WebhookSender};
