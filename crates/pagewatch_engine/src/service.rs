use std::sync::Arc;

use chrono::Utc;
use engine_logging::{engine_debug, engine_info, engine_warn};
use pagewatch_core::{ArtifactCandidate, ResultItem, SearchRequest};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{FetchError, HttpClient, HttpResponse, WatchTarget};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("search keyword must not be empty")]
    EmptyKeyword,
    #[error("invalid service url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("service returned http status {0}")]
    HttpStatus(u16),
    #[error("malformed service response: {0}")]
    Malformed(String),
}

/// Resolves service routes against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    base: Url,
}

impl ServiceEndpoints {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized).map_err(|err| ServiceError::InvalidUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute form of a location the service handed out (often relative).
    pub fn resolve(&self, location: &str) -> Option<String> {
        self.base.join(location).ok().map(String::from)
    }

    pub fn search_url(&self, keyword: &str, options: &SearchOptions, session_id: &str) -> Url {
        let mut url = self.route("api/search");
        url.query_pairs_mut()
            .append_pair("keyword", keyword)
            .append_pair("max_results", &options.max_results.to_string())
            .append_pair("use_cache", if options.use_cache { "true" } else { "false" })
            .append_pair("session_id", session_id);
        url
    }

    pub fn session_log_url(&self, session_id: &str, since: f64) -> Url {
        let mut url = self.route("api/debug/");
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(session_id);
        }
        if since > 0.0 {
            url.query_pairs_mut().append_pair("since", &since.to_string());
        }
        url
    }

    pub fn health_url(&self) -> Url {
        self.base.clone()
    }

    fn route(&self, path: &str) -> Url {
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: u32,
    pub use_cache: bool,
    /// Generated when absent.
    pub session_id: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 21,
            use_cache: true,
            session_id: None,
        }
    }
}

/// Everything learned from the initial search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSubmission {
    pub request: SearchRequest,
    pub candidate: ArtifactCandidate,
    pub items: Vec<ResultItem>,
    pub generation_status: Option<String>,
}

impl SearchSubmission {
    pub fn watch_target(&self) -> WatchTarget {
        WatchTarget::new(self.request.clone(), self.candidate.clone())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    notes: Vec<NoteRecord>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    html_api_url: Option<String>,
    #[serde(default)]
    html_status_url: Option<String>,
    #[serde(default)]
    html_generation_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NoteRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    likes: Option<serde_json::Value>,
    #[serde(default)]
    comments: Option<serde_json::Value>,
}

impl From<NoteRecord> for ResultItem {
    fn from(note: NoteRecord) -> Self {
        ResultItem {
            id: note.id,
            title: note.title.unwrap_or_default(),
            description: note.desc.unwrap_or_default(),
            author: note.author.unwrap_or_default(),
            likes: note.likes.as_ref().and_then(count_value),
            comments: note.comments.as_ref().and_then(count_value),
        }
    }
}

/// Counts arrive either as numbers or as numeric strings.
fn count_value(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(number) => number.as_u64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Reply of the artifact status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "artifactUrl", alias = "artifact_url")]
    pub artifact_url: Option<String>,
    #[serde(default)]
    pub html_api_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTag {
    Ready { url: Option<String> },
    Error { message: String },
    Pending { message: Option<String> },
    /// No status tag at all: the backend only exposes its event log.
    Untagged,
}

impl StatusReply {
    pub fn location(&self) -> Option<&str> {
        self.artifact_url
            .as_deref()
            .or(self.html_api_url.as_deref())
            .or(self.html_url.as_deref())
    }

    pub fn tag(&self) -> StatusTag {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => StatusTag::Untagged,
            Some(tag) if tag.eq_ignore_ascii_case("ready") => StatusTag::Ready {
                url: self.location().map(str::to_string),
            },
            Some(tag) if tag.eq_ignore_ascii_case("error") => StatusTag::Error {
                message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| "artifact generation failed".to_string()),
            },
            Some(_) => StatusTag::Pending {
                message: self.message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    pub timestamp: f64,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub message: String,
}

/// Session event log entries newer than the requested timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionLog {
    #[serde(default, rename = "debug_info")]
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub last_timestamp: f64,
}

/// Client for the search service routes.
#[derive(Clone)]
pub struct SearchService {
    client: Arc<dyn HttpClient>,
    endpoints: ServiceEndpoints,
}

impl SearchService {
    pub fn new(client: Arc<dyn HttpClient>, endpoints: ServiceEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    /// Submits a search. The service scrapes synchronously, so this may be slow.
    pub async fn submit(
        &self,
        keyword: &str,
        options: &SearchOptions,
    ) -> Result<SearchSubmission, ServiceError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ServiceError::EmptyKeyword);
        }
        let session_id = options
            .session_id
            .clone()
            .unwrap_or_else(generate_session_id);
        let url = self.endpoints.search_url(keyword, options, &session_id);
        engine_info!("Submitting search keyword={} session_id={}", keyword, session_id);

        let response = self.client.get(url.as_str()).await?;
        if !response.is_success() {
            return Err(ServiceError::HttpStatus(response.status));
        }
        let parsed: SearchResponse = parse_json(&response)?;

        let items: Vec<ResultItem> = parsed.notes.into_iter().map(ResultItem::from).collect();
        let expected_count = parsed
            .count
            .unwrap_or_else(|| u32::try_from(items.len()).unwrap_or(u32::MAX));
        let request = SearchRequest::new(
            keyword,
            parsed.session_id.unwrap_or(session_id),
            expected_count,
        );
        let candidate = ArtifactCandidate {
            primary_url: parsed
                .html_api_url
                .or(parsed.html_url)
                .and_then(|location| self.endpoints.resolve(&location)),
            status_endpoint: parsed
                .html_status_url
                .and_then(|location| self.endpoints.resolve(&location)),
        };
        engine_debug!(
            "Search response: count={} primary={:?} status={:?}",
            request.expected_count,
            candidate.primary_url,
            candidate.status_endpoint
        );

        Ok(SearchSubmission {
            request,
            candidate,
            items,
            generation_status: parsed.html_generation_status,
        })
    }

    /// Queries a status endpoint once. Error statuses still carry a JSON body.
    pub async fn status(&self, endpoint: &str) -> Result<StatusReply, ServiceError> {
        let response = self.client.get(endpoint).await?;
        match parse_json::<StatusReply>(&response) {
            Ok(reply) => Ok(reply),
            Err(_) if !response.is_success() => Err(ServiceError::HttpStatus(response.status)),
            Err(err) => Err(err),
        }
    }

    pub async fn session_log(
        &self,
        session_id: &str,
        since: f64,
    ) -> Result<SessionLog, ServiceError> {
        let url = self.endpoints.session_log_url(session_id, since);
        let response = self.client.get(url.as_str()).await?;
        if !response.is_success() {
            return Err(ServiceError::HttpStatus(response.status));
        }
        parse_json(&response)
    }

    pub async fn is_healthy(&self) -> bool {
        match self.client.get(self.endpoints.health_url().as_str()).await {
            Ok(response) => response.is_success(),
            Err(err) => {
                engine_warn!("Health check failed: {}", err);
                false
            }
        }
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ServiceError> {
    serde_json::from_str(&response.text()).map_err(|err| ServiceError::Malformed(err.to_string()))
}

/// `search_{millis}_{9 random chars}`, the shape the service echoes back.
pub fn generate_session_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("search_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}
