use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Successful reply: `{"result": ...}`. A missing or null result decodes as `None`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
}

/// Error reply carrying an application fault: `{"fault": "..."}`.
#[derive(Debug, Deserialize)]
struct FaultBody {
    fault: String,
}

/// Which failures a call may be repeated after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryMode {
    /// Rate limits and 5xx replies. For reads and operations that set state.
    Idempotent,
    /// Rate limits only: a 429 was refused before any work was done, a 5xx
    /// may arrive after the server committed the call.
    RateLimitOnly,
}

impl RetryMode {
    fn allows(self, error: &ClientError) -> bool {
        match self {
            Self::Idempotent => error.is_retryable(),
            Self::RateLimitOnly => matches!(error, ClientError::RateLimited { .. }),
        }
    }
}

/// JSON-over-HTTP transport. Each remote operation is a `POST` of its named
/// parameters to `{base_url}/ws/services/{service}/{operation}`.
pub struct RpcClient {
    client: Client,
    config: ClientConfig,
}

impl RpcClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, service: &str, operation: &str) -> String {
        format!("{}/ws/services/{service}/{operation}", self.config.base_url.trim_end_matches('/'))
    }

    /// Invoke `service.operation`, retrying the failures `mode` allows with
    /// exponential backoff.
    pub fn call<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
        params: &Value,
        mode: RetryMode,
    ) -> Result<Option<T>, ClientError> {
        let url = self.endpoint(service, operation);
        let mut attempts = 0;
        let mut delay = self.config.retry.base_delay_ms;

        loop {
            attempts += 1;
            debug!(service, operation, attempt = attempts, "Calling tracker");
            match self.call_once(&url, params) {
                Ok(result) => return Ok(result),
                Err(e) if mode.allows(&e) => {
                    if attempts > self.config.retry.max_retries {
                        return Err(ClientError::Timeout(attempts));
                    }
                    let wait = match &e {
                        ClientError::RateLimited { retry_after: Some(secs) } => Duration::from_secs(*secs),
                        _ => Duration::from_millis(delay),
                    };
                    warn!(service, operation, attempt = attempts, error = %e, "Tracker call failed, retrying");
                    thread::sleep(wait);
                    delay = (delay * 2).min(self.config.retry.max_delay_ms);
                },
                Err(e) => return Err(e),
            }
        }
    }

    fn call_once<T: DeserializeOwned>(&self, url: &str, params: &Value) -> Result<Option<T>, ClientError> {
        let mut request = self.client.post(url).json(params);
        if !self.config.token.is_empty() {
            request = request.bearer_auth(&self.config.token);
        }
        let resp = request.send()?;

        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(ClientError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(match serde_json::from_str::<FaultBody>(&body) {
                Ok(fault) => ClientError::Fault { message: fault.fault },
                Err(_) => ClientError::ServerError { status: status.as_u16(), message: body },
            });
        }

        let envelope: Envelope<T> = resp.json().map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(envelope.result)
    }
}
