// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    AuditRecord, BaseAI, BaseAuditLog, BaseHttpClient, BaseProcessRunner, GenerationRecord,
    HttpMethod, HttpRequest, HttpResponse, HttpTimeout, ProcessOutput, ServerDeps,
};

// =============================================================================
// Mock HTTP Client
// =============================================================================

#[derive(Debug, Clone)]
enum MockReply {
    Response(HttpResponse),
    Error(String),
    Timeout,
}

struct MockRoute {
    method: Option<HttpMethod>,
    prefix: String,
    replies: VecDeque<MockReply>,
}

/// Answers requests by URL prefix.
///
/// Routes are checked in registration order. A route with several queued
/// replies hands them out in order and then keeps repeating the last one.
/// Requests with no matching route fail like a network error.
pub struct MockHttpClient {
    routes: Arc<Mutex<Vec<MockRoute>>>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, method: Option<HttpMethod>, prefix: &str, reply: MockReply) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            match routes
                .iter_mut()
                .find(|r| r.method == method && r.prefix == prefix)
            {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(MockRoute {
                    method,
                    prefix: prefix.to_string(),
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    /// Respond to any method for URLs starting with `prefix`.
    pub fn on(self, prefix: &str, response: HttpResponse) -> Self {
        self.push(None, prefix, MockReply::Response(response))
    }

    pub fn on_method(self, method: HttpMethod, prefix: &str, response: HttpResponse) -> Self {
        self.push(Some(method), prefix, MockReply::Response(response))
    }

    /// Respond with a 200 JSON body.
    pub fn on_json(self, prefix: &str, body: serde_json::Value) -> Self {
        self.on(
            prefix,
            HttpResponse::ok(body.to_string()).with_header("content-type", "application/json"),
        )
    }

    /// Respond with a 200 HTML body.
    pub fn on_html(self, prefix: &str, html: &str) -> Self {
        self.on(
            prefix,
            HttpResponse::ok(html.to_string()).with_header("content-type", "text/html"),
        )
    }

    /// Fail like a connection error.
    pub fn fail(self, prefix: &str, message: &str) -> Self {
        self.push(None, prefix, MockReply::Error(message.to_string()))
    }

    pub fn fail_method(self, method: HttpMethod, prefix: &str, message: &str) -> Self {
        self.push(Some(method), prefix, MockReply::Error(message.to_string()))
    }

    /// Fail with an `HttpTimeout`.
    pub fn time_out(self, prefix: &str) -> Self {
        self.push(None, prefix, MockReply::Timeout)
    }

    /// All requests made, in order.
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// URLs requested that start with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> Vec<HttpRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.url.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// URLs requested, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.url.clone())
            .collect()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseHttpClient for MockHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(request.clone());

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            routes
                .iter_mut()
                .find(|r| {
                    request.url.starts_with(&r.prefix)
                        && r.method.map_or(true, |m| m == request.method)
                })
                .and_then(|route| {
                    if route.replies.len() > 1 {
                        route.replies.pop_front()
                    } else {
                        route.replies.front().cloned()
                    }
                })
        };

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(message)) => Err(anyhow!(message)),
            Some(MockReply::Timeout) => Err(anyhow::Error::new(HttpTimeout(
                request.timeout.unwrap_or(Duration::from_secs(30)),
            ))),
            None => Err(anyhow!("no mock response for {}", request.url)),
        }
    }
}

// =============================================================================
// Spy Audit Log
// =============================================================================

pub struct SpyAuditLog {
    extractions: Arc<Mutex<Vec<AuditRecord>>>,
    generations: Arc<Mutex<Vec<GenerationRecord>>>,
    fail: bool,
}

impl SpyAuditLog {
    pub fn new() -> Self {
        Self {
            extractions: Arc::new(Mutex::new(Vec::new())),
            generations: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Every write fails (nothing is recorded).
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn extractions(&self) -> Vec<AuditRecord> {
        self.extractions.lock().unwrap().clone()
    }

    pub fn generations(&self) -> Vec<GenerationRecord> {
        self.generations.lock().unwrap().clone()
    }
}

impl Default for SpyAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAuditLog for SpyAuditLog {
    async fn record_extraction(&self, record: &AuditRecord) -> Result<()> {
        if self.fail {
            return Err(anyhow!("audit store unavailable"));
        }
        self.extractions.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn record_generation(&self, record: &GenerationRecord) -> Result<()> {
        if self.fail {
            return Err(anyhow!("audit store unavailable"));
        }
        self.generations.lock().unwrap().push(record.clone());
        Ok(())
    }
}

// =============================================================================
// Mock AI
// =============================================================================

pub struct MockAI {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    error: Option<String>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_response(self, response: &str) -> Self {
        self.responses.lock().unwrap().push(response.to_string());
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Prompts received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(message) = &self.error {
            return Err(anyhow!(message.clone()));
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(r#"{"title": "Mock Title", "description": "Mock description"}"#.to_string())
        } else {
            Ok(responses.remove(0))
        }
    }
}

// =============================================================================
// Mock Process Runner
// =============================================================================

/// Stands in for external CLI tools. Defaults to "binary not installed".
pub struct MockProcessRunner {
    output: Option<ProcessOutput>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockProcessRunner {
    pub fn missing() -> Self {
        Self {
            output: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Exit 0 with `stdout`.
    pub fn with_stdout(stdout: &str) -> Self {
        Self {
            output: Some(ProcessOutput {
                success: true,
                stdout: stdout.to_string().into(),
                stderr: String::new(),
            }),
            ..Self::missing()
        }
    }

    /// Exit non-zero with `stderr`.
    pub fn exiting_with(stderr: &str) -> Self {
        Self {
            output: Some(ProcessOutput {
                success: false,
                stdout: Default::default(),
                stderr: stderr.to_string(),
            }),
            ..Self::missing()
        }
    }

    /// Program and arguments of every invocation.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockProcessRunner {
    fn default() -> Self {
        Self::missing()
    }
}

#[async_trait]
impl BaseProcessRunner for MockProcessRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        let mut invocation = vec![program.to_string()];
        invocation.extend(args.iter().map(|a| a.to_string()));
        self.calls.lock().unwrap().push(invocation);

        self.output
            .clone()
            .ok_or_else(|| anyhow!("{}: command not found", program))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Bundle of mocks. Keep a clone of the `Arc`s to inspect calls after a test.
pub struct TestDependencies {
    pub http: Arc<MockHttpClient>,
    pub audit: Arc<SpyAuditLog>,
    pub process: Arc<MockProcessRunner>,
    pub ai: Option<Arc<MockAI>>,
    pub rapidapi_key: Option<String>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            http: Arc::new(MockHttpClient::new()),
            audit: Arc::new(SpyAuditLog::new()),
            process: Arc::new(MockProcessRunner::missing()),
            ai: Some(Arc::new(MockAI::new())),
            rapidapi_key: None,
        }
    }

    pub fn mock_http(mut self, http: MockHttpClient) -> Self {
        self.http = Arc::new(http);
        self
    }

    pub fn mock_audit(mut self, audit: SpyAuditLog) -> Self {
        self.audit = Arc::new(audit);
        self
    }

    pub fn mock_process(mut self, process: MockProcessRunner) -> Self {
        self.process = Arc::new(process);
        self
    }

    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Some(Arc::new(ai));
        self
    }

    /// Simulate a deployment without OPENAI_API_KEY.
    pub fn without_ai(mut self) -> Self {
        self.ai = None;
        self
    }

    pub fn rapidapi_key(mut self, key: &str) -> Self {
        self.rapidapi_key = Some(key.to_string());
        self
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            None,
            self.http.clone(),
            self.audit.clone(),
            self.process.clone(),
            self.ai.clone().map(|ai| ai as Arc<dyn BaseAI>),
            self.rapidapi_key.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
