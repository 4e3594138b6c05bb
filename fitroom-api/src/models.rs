use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default operational deadline for backend calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the fitting backend client.
///
/// The base address is fixed per deployment and is not re-resolved at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittingApiConfig {
    /// Base URL of the fitting backend, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// Deadline for each backend call; elapsing it surfaces as a timeout
    /// failure.
    #[serde(default = "default_timeout", with = "timeout_secs")]
    pub request_timeout: Duration,
}

impl FittingApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn default_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

/// Serialize the deadline as whole seconds in config files.
mod timeout_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(de)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Body of the backend liveness probe (`GET /`).
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: Option<String>,
}
