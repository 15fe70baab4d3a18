//! Request machinery shared by every per-source fetcher.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use super::cooldown::Cooldown;
use super::retry_policy::RetryPolicy;
use crate::errors::{MarketDataError, RetryClass};
use crate::transport::{HttpRequest, HttpTransport};

/// Reader proxy used for sources that block direct access.
pub const READER_PROXY: &str = "https://r.jina.ai/";

const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Wraps a request so it is fetched through the reader proxy.
pub fn proxied(request: &HttpRequest) -> HttpRequest {
    HttpRequest {
        url: format!("{}{}", READER_PROXY, request.full_url()),
        query: Vec::new(),
        headers: request.headers.clone(),
    }
}

/// Decodes a JSON body, tolerating wrappers around the document.
///
/// Proxies and JSONP-style endpoints put text around the payload; the
/// outermost `{...}` span is tried when the body itself does not parse.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

/// Issues requests for one upstream source with its retry budget and
/// optional cooldown.
///
/// - 2xx: body returned.
/// - 429: cooldown triggered (when configured), no retry.
/// - timeouts, network errors, 408 and 5xx: retried with linear backoff.
/// - other statuses: given up immediately.
pub struct SourceClient {
    source_id: &'static str,
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
    cooldown: Option<Cooldown>,
}

impl SourceClient {
    pub fn new(source_id: &'static str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            source_id,
            transport,
            retry: RetryPolicy::default(),
            cooldown: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cooldown(mut self, duration: Duration) -> Self {
        self.cooldown = Some(Cooldown::new(self.source_id, duration));
        self
    }

    pub fn source_id(&self) -> &'static str {
        self.source_id
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.as_ref().is_some_and(Cooldown::is_active)
    }

    /// Fetches a body, applying the retry and cooldown rules.
    pub async fn fetch(&self, request: &HttpRequest) -> Result<String, MarketDataError> {
        if let Some(remaining) = self.cooldown.as_ref().and_then(Cooldown::remaining) {
            debug!(
                "{} still in cooldown for {:.1}s, skipping request",
                self.source_id,
                remaining.as_secs_f64()
            );
            return Err(MarketDataError::CoolingDown {
                source_id: self.source_id.to_string(),
            });
        }

        let url = request.full_url();
        let mut last_error = MarketDataError::NoData;

        for attempt in 1..=self.retry.max_attempts {
            let error = match self.transport.get(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) if response.status == HTTP_TOO_MANY_REQUESTS => {
                    MarketDataError::RateLimited {
                        source_id: self.source_id.to_string(),
                    }
                }
                Ok(response) => MarketDataError::HttpStatus {
                    source_id: self.source_id.to_string(),
                    status: response.status,
                },
                Err(error) => error,
            };

            match error.retry_class() {
                RetryClass::Cooldown => {
                    if let Some(cooldown) = &self.cooldown {
                        cooldown.trigger();
                    } else {
                        warn!("{} rate limited GET {}", self.source_id, url);
                    }
                    return Err(error);
                }
                RetryClass::Never => {
                    warn!("{} GET {} failed: {}", self.source_id, url, error);
                    return Err(error);
                }
                RetryClass::WithBackoff => {
                    warn!(
                        "{} GET {} failed (attempt {}/{}): {}",
                        self.source_id, url, attempt, self.retry.max_attempts, error
                    );
                    last_error = error;
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay_for(attempt)).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    /// Body text, or `None` when the request ultimately failed.
    pub async fn get_text(&self, request: &HttpRequest) -> Option<String> {
        self.fetch(request).await.ok()
    }

    /// Fetches and decodes a JSON body.
    pub async fn fetch_json(&self, request: &HttpRequest) -> Result<Value, MarketDataError> {
        let body = self.fetch(request).await?;
        extract_json(&body).ok_or_else(|| MarketDataError::MalformedPayload {
            source_id: self.source_id.to_string(),
            message: "body is not JSON".to_string(),
        })
    }

    /// Decoded JSON, or `None` on failure or an undecodable body.
    pub async fn get_json(&self, request: &HttpRequest) -> Option<Value> {
        match self.fetch_json(request).await {
            Ok(value) => Some(value),
            Err(error @ MarketDataError::MalformedPayload { .. }) => {
                warn!("{}", error);
                None
            }
            Err(_) => None,
        }
    }

    /// Tries the request directly, then once more through the reader proxy.
    ///
    /// A source in cooldown is not retried through the proxy.
    pub async fn get_text_or_proxy(&self, request: &HttpRequest) -> Option<String> {
        match self.fetch(request).await {
            Ok(body) if !body.trim().is_empty() => Some(body),
            Err(MarketDataError::CoolingDown { .. }) => None,
            _ => {
                debug!("{} retrying through reader proxy", self.source_id);
                self.get_text(&proxied(request)).await
            }
        }
    }

    /// JSON variant of [`get_text_or_proxy`](Self::get_text_or_proxy).
    pub async fn get_json_or_proxy(&self, request: &HttpRequest) -> Option<Value> {
        if let Some(value) = self.get_json(request).await {
            return Some(value);
        }
        if self.is_cooling_down() {
            return None;
        }
        debug!("{} retrying through reader proxy", self.source_id);
        self.get_json(&proxied(request)).await
    }
}
