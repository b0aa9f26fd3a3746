//! Scripted transport doubles for deterministic offline tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// One scripted transport outcome, optionally delayed to simulate latency.
pub(crate) struct Step {
    delay: Duration,
    result: Result<HttpResponse, HttpError>,
}

impl Step {
    pub(crate) fn ok(body: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(HttpResponse::ok_json(body)),
        }
    }

    pub(crate) fn ok_after(delay: Duration, body: impl Into<String>) -> Self {
        Self {
            delay,
            result: Ok(HttpResponse::ok_json(body)),
        }
    }

    pub(crate) fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(HttpResponse {
                status,
                body: body.into(),
            }),
        }
    }

    pub(crate) fn transport(error: HttpError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }
}

/// Transport double that replays scripted steps per URL and records hits.
#[derive(Default)]
pub(crate) struct ScriptedHttpClient {
    routes: Mutex<HashMap<String, Vec<Step>>>,
    hits: Mutex<HashMap<String, u32>>,
}

impl ScriptedHttpClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(self, url: impl Into<String>, steps: Vec<Step>) -> Self {
        self.routes
            .lock()
            .expect("routes lock should not be poisoned")
            .insert(url.into(), steps);
        self
    }

    pub(crate) fn hits(&self, url: &str) -> u32 {
        self.hits
            .lock()
            .expect("hits lock should not be poisoned")
            .get(url)
            .copied()
            .unwrap_or(0)
    }

    fn next_step(&self, url: &str) -> Step {
        *self
            .hits
            .lock()
            .expect("hits lock should not be poisoned")
            .entry(url.to_owned())
            .or_insert(0) += 1;

        let mut routes = self
            .routes
            .lock()
            .expect("routes lock should not be poisoned");
        let steps = routes
            .get_mut(url)
            .unwrap_or_else(|| panic!("no script registered for {url}"));
        assert!(!steps.is_empty(), "script exhausted for {url}");
        steps.remove(0)
    }
}

impl HttpClient for ScriptedHttpClient {
    fn get<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let step = self.next_step(&request.url);
        Box::pin(async move {
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            step.result
        })
    }
}
