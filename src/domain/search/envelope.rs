//! Remote result envelope

use serde::{Deserialize, Serialize};

use crate::domain::FetchError;

/// Message used when a failure envelope carries no text of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "Search failed. Please try again.";

/// Result of a remote call: either a payload or a domain-level failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Success { data: T },
    Failure { message: String },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Success { .. } => true,
            Self::Failure { .. } => false,
        }
    }
}

/// Outcome of one fetch as observed by every subscriber of the shared result
pub type FetchOutcome<T> = Result<Envelope<T>, FetchError>;

/// Only successful envelopes may be memoized
pub fn is_cacheable<T>(outcome: &FetchOutcome<T>) -> bool {
    match outcome {
        Ok(Envelope::Success { .. }) => true,
        Ok(Envelope::Failure { .. }) | Err(_) => false,
    }
}

/// Envelope as it travels over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEnvelope<T> {
    #[serde(default)]
    pub is_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> From<WireEnvelope<T>> for Envelope<T> {
    fn from(wire: WireEnvelope<T>) -> Self {
        match (wire.is_failed, wire.data) {
            (false, Some(data)) => Envelope::Success { data },
            (false, None) => Envelope::Failure {
                message: wire
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Response carried no data".to_string()),
            },
            (true, _) => Envelope::Failure {
                message: wire.message.unwrap_or_default(),
            },
        }
    }
}

impl<T> From<Envelope<T>> for WireEnvelope<T> {
    fn from(envelope: Envelope<T>) -> Self {
        match envelope {
            Envelope::Success { data } => Self {
                is_failed: false,
                data: Some(data),
                message: None,
            },
            Envelope::Failure { message } => Self {
                is_failed: true,
                data: None,
                message: Some(message),
            },
        }
    }
}

/// Picks the message to show for a failed outcome, falling back to a generic text
pub fn failure_message(message: &str) -> String {
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_success_maps_to_success() {
        let wire: WireEnvelope<u32> =
            serde_json::from_value(json!({"isFailed": false, "data": 7})).unwrap();

        assert_eq!(Envelope::from(wire), Envelope::success(7));
    }

    #[test]
    fn test_wire_failure_maps_to_failure() {
        let wire: WireEnvelope<u32> =
            serde_json::from_value(json!({"isFailed": true, "message": "Service unavailable"}))
                .unwrap();

        assert_eq!(
            Envelope::from(wire),
            Envelope::failure("Service unavailable")
        );
    }

    #[test]
    fn test_failure_wins_over_stray_data() {
        let wire: WireEnvelope<u32> = serde_json::from_value(
            json!({"isFailed": true, "data": 1, "message": "boom"}),
        )
        .unwrap();

        assert_eq!(Envelope::from(wire), Envelope::failure("boom"));
    }

    #[test]
    fn test_missing_data_is_failure() {
        let wire: WireEnvelope<u32> = serde_json::from_value(json!({"isFailed": false})).unwrap();

        assert!(!Envelope::from(wire).is_success());
    }

    #[test]
    fn test_envelope_to_wire() {
        let wire = WireEnvelope::from(Envelope::<u32>::failure("nope"));
        let value = serde_json::to_value(&wire).unwrap();

        assert_eq!(value, json!({"isFailed": true, "message": "nope"}));
    }

    #[test]
    fn test_is_cacheable() {
        assert!(is_cacheable(&Ok(Envelope::success(1))));
        assert!(!is_cacheable::<u32>(&Ok(Envelope::failure("x"))));
        assert!(!is_cacheable::<u32>(&Err(FetchError::transport("down"))));
    }

    #[test]
    fn test_failure_message_fallback() {
        assert_eq!(failure_message("  "), GENERIC_FAILURE_MESSAGE);
        assert_eq!(failure_message("Backend down"), "Backend down");
    }
}
