// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Extraction strategies, the download proxy and the meta generator are domain
// functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseHttpClient)

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

use crate::common::text::truncate_chars;
use crate::common::{MediaResult, MediaType, Platform};

// =============================================================================
// HTTP Client Trait (Infrastructure - every outbound request)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
}

/// An outbound request. Headers keep insertion order.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
    pub follow_redirects: bool,
}

impl HttpRequest {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
            follow_redirects: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Head, url)
    }

    /// POST with an `application/x-www-form-urlencoded` body.
    pub fn post_form(url: impl Into<String>, body: impl Into<String>) -> Self {
        let mut request = Self::new(HttpMethod::Post, url)
            .header("Content-Type", "application/x-www-form-urlencoded");
        request.body = Some(body.into());
        request
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Return 3xx responses to the caller instead of following them.
    pub fn no_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Marker error for requests that exceeded their timeout.
///
/// Implementations wrap it in the returned `anyhow::Error` so callers can
/// `downcast_ref::<HttpTimeout>()` without knowing the HTTP library.
#[derive(Debug, thiserror::Error)]
#[error("request timed out after {0:?}")]
pub struct HttpTimeout(pub Duration);

#[async_trait]
pub trait BaseHttpClient: Send + Sync {
    /// Send a request. Non-2xx statuses are returned, not errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

// =============================================================================
// Audit Log Trait (Infrastructure - write-only sink)
// =============================================================================

/// One successful extraction, as written to the audit store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub platform: Platform,
    pub input_url: String,
    pub media_type: MediaType,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl AuditRecord {
    pub fn from_result(
        platform: Platform,
        input_url: &str,
        media_type: MediaType,
        media: &MediaResult,
    ) -> Self {
        Self {
            platform,
            input_url: input_url.to_string(),
            media_type,
            title: media.title.clone(),
            author: media.author.clone(),
        }
    }

    pub fn input_url_column(&self) -> &str {
        truncate_chars(&self.input_url, 500)
    }

    pub fn title_column(&self) -> String {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("{} Media", self.platform.display_name()));
        truncate_chars(&title, 255).to_string()
    }

    pub fn author_column(&self) -> &str {
        truncate_chars(self.author.as_deref().unwrap_or("Unknown"), 255)
    }
}

/// One meta-tag generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRecord {
    pub input_type: String,
    pub input_content: String,
    pub focus_keyword: Option<String>,
    pub tone: String,
    pub title: String,
    pub description: String,
}

#[async_trait]
pub trait BaseAuditLog: Send + Sync {
    async fn record_extraction(&self, record: &AuditRecord) -> Result<()>;

    async fn record_generation(&self, record: &GenerationRecord) -> Result<()>;
}

// =============================================================================
// Process Runner Trait (Infrastructure - external CLI tools)
// =============================================================================

/// Captured result of a finished child process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    pub stdout: Bytes,
    pub stderr: String,
}

#[async_trait]
pub trait BaseProcessRunner: Send + Sync {
    /// Run `program` to completion. A missing binary is an error; a non-zero
    /// exit is reported through `ProcessOutput::success`.
    async fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput>;
}

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Complete with a system prompt. Providers without system roles get
    /// both prompts concatenated.
    async fn complete_with_system(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        let combined = format!("{}\n\n{}", system_prompt, prompt);
        self.complete(&combined).await
    }
}
