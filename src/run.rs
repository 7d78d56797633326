//! Command execution.
//!
//! Turns a parsed [`Command`] into the matching service call and renders the
//! outcome as JSON for stdout.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use bioking_webhook::config::{Command, ConfigError, ValidatedConfig};
use bioking_webhook::news::{ArticleFilter, GradeSelection};
use bioking_webhook::services::{
    ArticleService, ChatService, DateFilterService, GradeService, StockService,
};
use bioking_webhook::time::Clock;
use bioking_webhook::webhook::{Payload, WebhookRequest, WebhookResponse, WebhookSender};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The `send` target could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The outcome could not be rendered as JSON.
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    /// `init` reached the request dispatcher.
    #[error("The init command does not send a request")]
    NotARequest,
}

/// Rendered result of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Whether the underlying call succeeded
    pub success: bool,
    /// JSON printed to stdout
    pub body: Value,
}

impl Output {
    fn render(success: bool, body: &impl Serialize) -> Result<Self, RunError> {
        Ok(Self {
            success,
            body: serde_json::to_value(body)?,
        })
    }

    fn response(response: &WebhookResponse) -> Result<Self, RunError> {
        Self::render(response.success, response)
    }
}

/// Runs a request command against the configured endpoints.
///
/// # Errors
///
/// Returns an error if a `send` target is invalid, the output cannot be
/// rendered, or the command is `init`. Failed webhook calls are not errors;
/// they come back as an unsuccessful [`Output`].
pub async fn execute<W, C>(
    command: Command,
    config: &ValidatedConfig,
    sender: &W,
    clock: C,
) -> Result<Output, RunError>
where
    W: WebhookSender,
    C: Clock + Copy,
{
    let endpoints = &config.endpoints;

    let response = match command {
        Command::Init { .. } => return Err(RunError::NotARequest),
        Command::Send {
            endpoint,
            fields,
            method,
            importance,
        } => {
            let url = config.resolve_target(&endpoint)?;
            let mut request = WebhookRequest::new(method, url, fields.into_iter().collect::<Payload>());
            request.importance = importance;
            sender.send(request).await
        }
        Command::Chat { message, session } => {
            let chat = ChatService::new(sender, endpoints).with_clock(clock);
            chat.send_message(&message, &session).await
        }
        Command::Research { query, session } => {
            let chat = ChatService::new(sender, endpoints).with_clock(clock);
            chat.research(&query, &session).await
        }
        Command::Report { topic, session } => {
            let chat = ChatService::new(sender, endpoints).with_clock(clock);
            chat.report(&topic, &session).await
        }
        Command::Stock { symbol, timeframe } => {
            let stocks = StockService::new(sender, endpoints).with_clock(clock);
            stocks.stock_data(&symbol, &timeframe).await
        }
        Command::Trending => {
            StockService::new(sender, endpoints)
                .with_clock(clock)
                .trending()
                .await
        }
        Command::Visit { user_agent } => {
            StockService::new(sender, endpoints)
                .with_clock(clock)
                .overview_visit(&user_agent)
                .await
        }
        Command::Date { date } => {
            DateFilterService::new(sender, endpoints)
                .with_clock(clock)
                .send_date(date)
                .await
        }
        Command::Article { region, id } => {
            let service = ArticleService::new(sender, endpoints).with_clock(clock);
            return match service.fetch_article(region, &id).await {
                Ok(article) => Output::render(true, &article),
                Err(error) => Output::response(&WebhookResponse::failure(error.to_string())),
            };
        }
        Command::Grade { id, grade } => {
            GradeService::new(sender, endpoints)
                .with_clock(clock)
                .submit(&id, grade)
                .await
        }
        Command::News { date, grade, query } => {
            let date = date.unwrap_or_else(|| clock.utc().date_naive());
            return news(sender, config, clock, date, grade, query).await;
        }
    };

    Output::response(&response)
}

/// Fetches the feed for `date` and keeps the articles passing the filter.
async fn news<W, C>(
    sender: &W,
    config: &ValidatedConfig,
    clock: C,
    date: NaiveDate,
    grade: GradeSelection,
    query: Option<String>,
) -> Result<Output, RunError>
where
    W: WebhookSender,
    C: Clock + Copy,
{
    let feed = DateFilterService::new(sender, &config.endpoints).with_clock(clock);
    let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();

    let articles = match feed.fetch_articles(midnight).await {
        Ok(articles) => articles,
        Err(error) => return Output::response(&WebhookResponse::failure(error.to_string())),
    };

    let mut filter = ArticleFilter::new().with_date(date).with_grade(grade);
    if let Some(query) = query {
        filter = filter.with_query(query);
    }

    let kept = filter.apply(&articles);
    tracing::info!("{} of {} articles match", kept.len(), articles.len());

    Output::render(true, &kept)
}
