//! Call lifecycle states

use std::fmt;

/// Stage reached by one call.
///
/// ```text
/// Created → RequestBuilt → Submitted → Succeeded → Decoded → Validated → Delivered
///                                    ↘ TransportFailed   ↘ DecodeFailed ↘ ValidationFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Created,
    RequestBuilt,
    Submitted,
    Succeeded,
    TransportFailed,
    Decoded,
    DecodeFailed,
    Validated,
    ValidationFailed,
    Delivered,
}

impl CallState {
    /// Whether the call can move from `self` to `next`
    pub fn can_transition_to(&self, next: CallState) -> bool {
        use CallState::*;
        matches!(
            (self, next),
            (Created, RequestBuilt)
                | (RequestBuilt, Submitted)
                | (Submitted, Succeeded)
                | (Submitted, TransportFailed)
                | (Succeeded, Decoded)
                | (Succeeded, DecodeFailed)
                | (Decoded, Validated)
                | (Decoded, ValidationFailed)
                | (Validated, Delivered)
        )
    }

    /// No further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CallState::TransportFailed
                | CallState::DecodeFailed
                | CallState::ValidationFailed
                | CallState::Delivered
        )
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Created => "created",
            CallState::RequestBuilt => "request_built",
            CallState::Submitted => "submitted",
            CallState::Succeeded => "succeeded",
            CallState::TransportFailed => "transport_failed",
            CallState::Decoded => "decoded",
            CallState::DecodeFailed => "decode_failed",
            CallState::Validated => "validated",
            CallState::ValidationFailed => "validation_failed",
            CallState::Delivered => "delivered",
        };
        f.write_str(name)
    }
}
