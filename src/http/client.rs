use crate::rate_limiter::RateLimiter;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;

/// HTTP client with built-in rate limiting and optional bearer auth
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
    bearer_token: Option<String>,
}

impl RateLimitedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, rate_limit_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        let rate_limiter = RateLimiter::new(rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
            bearer_token: None,
        })
    }

    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.bearer_token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub fn reset_rate_limit(&mut self) {
        self.rate_limiter.reset();
    }

    pub async fn get(&mut self, url: &str) -> Result<Response> {
        self.rate_limiter.wait().await;
        let request = self.authorize(self.client.get(url));
        request.send().await.context("Failed to send GET request")
    }

    pub async fn post_json<B: Serialize + ?Sized>(&mut self, url: &str, body: &B) -> Result<Response> {
        self.rate_limiter.wait().await;
        let request = self.authorize(self.client.post(url).json(body));
        request.send().await.context("Failed to send POST request")
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
