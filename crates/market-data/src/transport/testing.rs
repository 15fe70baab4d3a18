//! Scripted transport used by fetcher and provider tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::errors::MarketDataError;

#[derive(Clone, Debug)]
pub(crate) enum Reply {
    Body(u16, String),
    Timeout,
    Network,
}

/// Answers requests whose full URL contains a registered needle.
///
/// Replies for a needle are consumed in order; the last one repeats.
/// Unmatched requests fail with a network error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<Vec<(String, VecDeque<Reply>)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(self, needle: &str, reply: Reply) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(n, _)| n == needle) {
                Some((_, replies)) => replies.push_back(reply),
                None => routes.push((needle.to_string(), VecDeque::from([reply]))),
            }
        }
        self
    }

    pub(crate) fn ok(self, needle: &str, body: &str) -> Self {
        self.on(needle, Reply::Body(200, body.to_string()))
    }

    pub(crate) fn status(self, needle: &str, status: u16) -> Self {
        self.on(needle, Reply::Body(status, String::new()))
    }

    /// Number of requests whose full URL contains `needle`.
    pub(crate) fn calls(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.full_url().contains(needle))
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, MarketDataError> {
        self.requests.lock().unwrap().push(request.clone());
        let url = request.full_url();

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            routes
                .iter_mut()
                .find(|(needle, _)| url.contains(needle.as_str()))
                .and_then(|(_, replies)| {
                    if replies.len() > 1 {
                        replies.pop_front()
                    } else {
                        replies.front().cloned()
                    }
                })
        };

        match reply {
            Some(Reply::Body(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::Timeout) => Err(MarketDataError::Timeout {
                source_id: "scripted".to_string(),
            }),
            Some(Reply::Network) | None => {
                Err(MarketDataError::Network(format!("no route for {}", url)))
            }
        }
    }
}
