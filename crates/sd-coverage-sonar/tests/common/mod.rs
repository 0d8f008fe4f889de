//! Shared helpers: a scripted SonarQube transport and a log counter.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sd_coverage_core::errors::HttpError;
use sd_coverage_core::SonarConfig;
use sd_coverage_sonar::{ISonarTransport, SonarRequest};
use serde_json::{json, Value};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ─── Transport ─────────────────────────────────────────────

/// Replays scripted responses per API path and records every request.
/// Unscripted paths answer `{}`.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<&'static str, VecDeque<Result<Value, HttpError>>>>,
    calls: Mutex<Vec<SonarRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &'static str, result: Result<Value, HttpError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(path)
            .or_default()
            .push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<SonarRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.path).collect()
    }

    pub fn call_to(&self, path: &str) -> Option<SonarRequest> {
        self.calls().into_iter().find(|c| c.path == path)
    }
}

impl ISonarTransport for FakeTransport {
    fn send(&self, request: &SonarRequest) -> Result<Value, HttpError> {
        self.calls.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .get_mut(request.path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Ok(json!({})))
    }
}

pub fn token_response(token: &str) -> Result<Value, HttpError> {
    Ok(json!({ "login": "user-job-1", "name": "generated", "token": token }))
}

// ─── Config ────────────────────────────────────────────────

pub fn config(enterprise: bool) -> SonarConfig {
    SonarConfig {
        sd_api_url: "https://api.screwdriver.cd".into(),
        sd_ui_url: "https://cd.screwdriver.cd".into(),
        sonar_host: "https://sonar.screwdriver.cd".into(),
        admin_token: "admin-token".into(),
        sonar_enterprise: enterprise,
        ..Default::default()
    }
}

// ─── Logging ───────────────────────────────────────────────

struct LevelCounter {
    level: Level,
    count: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == self.level {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` and count the events at exactly `level` it emitted on this thread.
pub fn count_logs<R>(level: Level, f: impl FnOnce() -> R) -> (R, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(LevelCounter {
        level,
        count: Arc::clone(&count),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}

/// Run `f` and count the ERROR events it emitted on this thread.
pub fn count_error_logs<R>(f: impl FnOnce() -> R) -> (R, usize) {
    count_logs(Level::ERROR, f)
}
