use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;
use crate::models::garment::{Category, GarmentRef};

/// Locator for a synthesized try-on image returned by the backend.
///
/// Not cached beyond the current request cycle: a new successful request
/// replaces it and a new photo selection clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultImage(String);

impl ResultImage {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the synthesis endpoint needs for one composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnRequest {
    /// Raw bytes of the person photo.
    pub person_image: Vec<u8>,

    /// Original file name of the photo, forwarded in the multipart part.
    pub file_name: String,

    /// Locator of the garment to composite.
    pub cloth_url: GarmentRef,

    /// Body region to fit.
    pub category: Category,
}

/// Parsed body of a successful `POST /api/v1/try-on` response.
///
/// Only `result_image_url` is required by the contract; the backend also
/// echoes a status line and the stored garment locator, which are kept for
/// presentation but never enter the state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryOnResponse {
    pub result_image_url: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub original_image_url: Option<String>,
}

/// Classified reason carried inside [`TryOnState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The backend could not be reached.
    Network,
    /// The backend answered with a non-2xx status.
    Server(u16),
    /// No response within the operational deadline.
    Timeout,
    /// 2xx response without the expected result field.
    MalformedResponse,
}

impl FailureReason {
    /// Map a boundary error onto the reason published with the failed state.
    ///
    /// Local precondition violations (`AlreadyInFlight`,
    /// `IncompleteSelection`) are rejected calls, not failed states, and
    /// never reach this classification.
    pub fn classify(err: &Error) -> Self {
        match err {
            Error::Timeout => FailureReason::Timeout,
            Error::Server(status) => FailureReason::Server(*status),
            Error::MalformedResponse(_) => FailureReason::MalformedResponse,
            _ => FailureReason::Network,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Network => write!(f, "the fitting service could not be reached"),
            FailureReason::Server(status) => {
                write!(f, "the fitting service reported an error (HTTP {status})")
            }
            FailureReason::Timeout => write!(f, "the fitting service took too long to respond"),
            FailureReason::MalformedResponse => {
                write!(f, "the fitting service returned an unusable response")
            }
        }
    }
}

/// Lifecycle of the single try-on request slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TryOnState {
    #[default]
    Idle,
    Pending,
    Succeeded(ResultImage),
    Failed(FailureReason),
}

impl TryOnState {
    pub fn is_pending(&self) -> bool {
        matches!(self, TryOnState::Pending)
    }

    /// Terminal states can be superseded by a fresh submission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TryOnState::Succeeded(_) | TryOnState::Failed(_))
    }

    pub fn result(&self) -> Option<&ResultImage> {
        match self {
            TryOnState::Succeeded(image) => Some(image),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_boundary_errors() {
        assert_eq!(FailureReason::classify(&Error::Timeout), FailureReason::Timeout);
        assert_eq!(
            FailureReason::classify(&Error::Server(500)),
            FailureReason::Server(500)
        );
        assert_eq!(
            FailureReason::classify(&Error::MalformedResponse("no field".into())),
            FailureReason::MalformedResponse
        );
        assert_eq!(
            FailureReason::classify(&Error::Network("refused".into())),
            FailureReason::Network
        );
    }

    #[test]
    fn terminal_states() {
        assert!(!TryOnState::Idle.is_terminal());
        assert!(!TryOnState::Pending.is_terminal());
        assert!(TryOnState::Succeeded(ResultImage::new("r1")).is_terminal());
        assert!(TryOnState::Failed(FailureReason::Network).is_terminal());
    }

    #[test]
    fn try_on_response_tolerates_extra_fields() {
        let body = r#"{
            "status": "success",
            "message": "Fitting complete",
            "original_image_url": "http://x/static/c.png",
            "result_image_url": "http://x/static/r.png"
        }"#;
        let parsed: TryOnResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result_image_url.as_deref(), Some("http://x/static/r.png"));
        assert_eq!(parsed.status.as_deref(), Some("success"));
    }
}
