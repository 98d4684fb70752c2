//! HTTP client configuration and building logic

use std::time::Duration;

use reqwest::Client;

use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

/// Configuration for the bundle HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, always enforced
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> FetchResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(FetchError::Http)
    }
}
