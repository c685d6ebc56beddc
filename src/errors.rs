//! Typed error hierarchy for the gate client.
//!
//! Two enums cover the two places things go wrong:
//! - `GateError` — a call to the remote gate did not produce a usable verdict
//! - `SessionError` — a user action was not valid for the current turn

use thiserror::Error;

/// Failures of a single gate round trip.
///
/// Every variant is terminal for the current turn; none is retried.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    /// The service could not be reached (connect failure, timeout, broken body stream).
    #[error("Gate transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("Gate service error: HTTP {status}")]
    Service { status: u16 },

    /// The body did not parse, or lacked a field its declared status requires.
    #[error("Gate protocol error: {0}")]
    Protocol(String),

    /// The status is outside {STOP, RESOLVED}, or STOP arrived after a binding.
    #[error("Unexpected gate status '{status}'")]
    UnexpectedStatus { status: String },
}

impl GateError {
    /// Short taxonomy name used in logs and the transcript.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Transport(_) => "TRANSPORT_ERROR",
            GateError::Service { .. } => "SERVICE_ERROR",
            GateError::Protocol(_) => "PROTOCOL_ERROR",
            GateError::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
        }
    }
}

/// User actions rejected by the interaction state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No clarification is pending (turn is {phase})")]
    NotAwaitingClarification { phase: String },

    #[error("Binding '{binding}' was not offered by the gate")]
    UnknownBinding { binding: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_error_service_carries_status_code() {
        let err = GateError::Service { status: 502 };
        match &err {
            GateError::Service { status } => assert_eq!(*status, 502),
            _ => panic!("Expected Service"),
        }
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn gate_error_kinds_match_taxonomy() {
        assert_eq!(GateError::Transport("x".into()).kind(), "TRANSPORT_ERROR");
        assert_eq!(GateError::Service { status: 500 }.kind(), "SERVICE_ERROR");
        assert_eq!(GateError::Protocol("x".into()).kind(), "PROTOCOL_ERROR");
        assert_eq!(
            GateError::UnexpectedStatus {
                status: "UNKNOWN".into()
            }
            .kind(),
            "UNEXPECTED_STATUS"
        );
    }

    #[test]
    fn transport_error_message_is_preserved() {
        let err = GateError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn session_error_unknown_binding_names_binding() {
        let err = SessionError::UnknownBinding {
            binding: "jenny".into(),
        };
        assert!(err.to_string().contains("jenny"));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&GateError::Protocol("bad".into()));
        assert_std_error(&SessionError::NotAwaitingClarification {
            phase: "idle".into(),
        });
    }
}
