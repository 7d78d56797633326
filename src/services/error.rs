//! Errors of the service calls that interpret workflow output.

use thiserror::Error;

/// Failure to turn a workflow response into articles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The webhook call itself failed; carries the reported message.
    #[error("{0}")]
    Request(String),

    /// The call succeeded but carried no article record.
    #[error("Response did not contain an article")]
    NoArticle,
}
