// reqwest implementation of BaseHttpClient

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::time::Duration;

use super::{BaseHttpClient, HttpMethod, HttpRequest, HttpResponse, HttpTimeout};

/// Holds two clients because redirect policy is fixed per `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    no_redirect_client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .build()
                .context("Failed to build HTTP client")?,
            no_redirect_client: Client::builder()
                .redirect(Policy::none())
                .build()
                .context("Failed to build non-redirecting HTTP client")?,
        })
    }
}

fn classify(err: reqwest::Error, timeout: Option<Duration>) -> anyhow::Error {
    match timeout {
        Some(limit) if err.is_timeout() => anyhow::Error::new(HttpTimeout(limit)),
        _ => anyhow::Error::new(err),
    }
}

#[async_trait]
impl BaseHttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| classify(e, request.timeout))?;

        tracing::debug!(url = %request.url, status, bytes = body.len(), "HTTP response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
