// Request descriptors and per-request outcome records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{TextLength, Voice};

/// Immutable description of one request, built before dispatch.
///
/// The voice is derived from the sequence number, so a descriptor is
/// fully determined by `(sequence, text_length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSpec {
    pub sequence: u64,
    pub voice: Voice,
    pub text_length: TextLength,
}

impl RequestSpec {
    /// Descriptor for the `sequence`-th request of a run.
    pub fn new(sequence: u64, text_length: TextLength) -> Self {
        Self {
            sequence,
            voice: Voice::for_sequence(sequence),
            text_length,
        }
    }
}

/// What happened to one dispatched request.
///
/// Exactly one record exists per attempted request, including
/// transport failures; records are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub sequence: u64,
    pub voice: Voice,
    pub text_length: TextLength,
    /// HTTP status code, or 0 when the transport failed.
    pub status: u16,
    /// Wall-clock time from just before send to just after the body
    /// was fully read.
    pub duration: Duration,
    pub success: bool,
    /// When the request was dispatched.
    pub timestamp: DateTime<Utc>,
    pub content_type: Option<String>,
    pub response_bytes: u64,
    /// Transport error description; `None` for requests that produced
    /// an HTTP response.
    pub error: Option<String>,
}

impl RequestOutcome {
    /// Record for a request that produced an HTTP response.
    ///
    /// Success requires status 200 and a non-empty body.
    pub fn completed(
        spec: RequestSpec,
        status: u16,
        content_type: Option<String>,
        response_bytes: u64,
        duration: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence: spec.sequence,
            voice: spec.voice,
            text_length: spec.text_length,
            status,
            duration,
            success: status == 200 && response_bytes > 0,
            timestamp,
            content_type,
            response_bytes,
            error: None,
        }
    }

    /// Record for a request that never produced an HTTP response.
    pub fn transport_failed(
        spec: RequestSpec,
        error: String,
        duration: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence: spec.sequence,
            voice: spec.voice,
            text_length: spec.text_length,
            status: 0,
            duration,
            success: false,
            timestamp,
            content_type: None,
            response_bytes: 0,
            error: Some(error),
        }
    }

    /// Error-or-status description used in failure listings.
    pub fn failure_reason(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!("HTTP {}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(sequence: u64) -> RequestSpec {
        RequestSpec::new(sequence, TextLength::Short)
    }

    #[test]
    fn descriptor_derives_voice_from_sequence() {
        assert_eq!(spec(1).voice, Voice::Alloy);
        assert_eq!(spec(5).voice, Voice::Echo);
        assert_eq!(spec(12).voice, Voice::Alloy);
    }

    #[test]
    fn success_requires_200_and_nonempty_body() {
        let now = Utc::now();
        let d = Duration::from_millis(10);

        let ok = RequestOutcome::completed(spec(1), 200, None, 64, d, now);
        assert!(ok.success);

        let empty = RequestOutcome::completed(spec(2), 200, None, 0, d, now);
        assert!(!empty.success);

        let server_error = RequestOutcome::completed(spec(3), 500, None, 64, d, now);
        assert!(!server_error.success);

        let not_found = RequestOutcome::completed(spec(4), 404, None, 0, d, now);
        assert!(!not_found.success);
    }

    #[test]
    fn transport_failure_has_status_zero_and_error() {
        let outcome = RequestOutcome::transport_failed(
            spec(7),
            "connection refused".to_string(),
            Duration::from_millis(3),
            Utc::now(),
        );
        assert_eq!(outcome.status, 0);
        assert!(!outcome.success);
        assert_eq!(outcome.response_bytes, 0);
        assert_eq!(outcome.failure_reason(), "connection refused");
    }

    #[test]
    fn failure_reason_falls_back_to_status() {
        let outcome = RequestOutcome::completed(
            spec(1),
            503,
            None,
            0,
            Duration::from_millis(5),
            Utc::now(),
        );
        assert_eq!(outcome.failure_reason(), "HTTP 503");
    }
}
