#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use pagewatch_engine::{FailureKind, FetchError, HttpClient, HttpResponse};
use tokio::sync::Notify;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// A result page with the given marker counts and every structural check passing.
pub fn result_page(cards: usize, titles: usize, images: usize) -> String {
    let css = ".note-card { padding: 12px; border-radius: 8px; }\n".repeat(30);
    let mut grid = String::new();
    for i in 0..cards {
        grid.push_str(&format!("<div class=\"note-card\" data-note-id=\"{i}\"></div>\n"));
    }
    for i in 0..titles {
        grid.push_str(&format!("<h3 class=\"note-title\">Note {i}</h3>\n"));
    }
    for i in 0..images {
        grid.push_str(&format!("<div class=\"note-image\"><img src=\"/img/{i}.jpg\"></div>\n"));
    }
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{css}</style>\n</head>\n<body>\n<div class=\"container\">\n<div class=\"results-grid\">\n{grid}</div>\n</div>\n</body>\n</html>\n"
    )
}

pub fn html(status: u16, body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status,
        final_url: String::new(),
        content_type: Some("text/html; charset=utf-8".to_string()),
        body: body.into().into_bytes(),
    }
}

pub fn json(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        final_url: String::new(),
        content_type: Some("application/json".to_string()),
        body: body.as_bytes().to_vec(),
    }
}

pub fn empty_log() -> HttpResponse {
    json(200, r#"{"debug_info": [], "last_timestamp": 0, "total_count": 0}"#)
}

pub fn network_error() -> FetchError {
    FetchError::new(FailureKind::Network, "connection refused")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

/// Responds with `(method, url, nth call to that method+url starting at 1)`.
type Responder = dyn Fn(Method, &str, usize) -> Result<HttpResponse, FetchError> + Send + Sync;

/// Holds HEAD requests until released, after announcing that one arrived.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// In-memory fetch primitive with scripted answers and a call log.
pub struct ScriptedClient {
    responder: Box<Responder>,
    calls: Mutex<Vec<(Method, String)>>,
    gate: Option<Arc<Gate>>,
}

impl ScriptedClient {
    pub fn new(
        responder: impl Fn(Method, &str, usize) -> Result<HttpResponse, FetchError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn count(&self, method: Method, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, u)| *m == method && u == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, method: Method, url: &str) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push((method, url.to_string()));
        calls
            .iter()
            .filter(|(m, u)| *m == method && u == url)
            .count()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedClient {
    async fn head(&self, url: &str) -> Result<u16, FetchError> {
        let nth = self.record(Method::Head, url);
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        (self.responder)(Method::Head, url, nth).map(|response| response.status)
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let nth = self.record(Method::Get, url);
        (self.responder)(Method::Get, url, nth)
    }
}
