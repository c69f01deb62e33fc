use std::time::Duration;

use crate::portal::{PortalError, PortalGateway};

/// How long the host keeps the success confirmation visible before closing
/// the gate.
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoucherState {
    Unverified,
    Verifying,
    Verified,
    Rejected(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VoucherError {
    #[error("{0}")]
    InvalidOrUsed(String),
    /// The code was valid but could not be consumed. The voucher is *not*
    /// treated as spent; the caller sees the failure instead.
    #[error("{0}")]
    ConsumeFailed(String),
    #[error("voucher service unreachable: {0}")]
    Transport(String),
    #[error("a verification is already in flight")]
    VerificationInFlight,
}

/// Two-phase gate in front of a paid analysis action: check the code, mark
/// it used, and only then run the gated action.
#[derive(Debug, Clone)]
pub struct VoucherGate {
    code: String,
    state: VoucherState,
}

impl VoucherGate {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            state: VoucherState::Unverified,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn state(&self) -> &VoucherState {
        &self.state
    }

    /// Whether the submit control must be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, VoucherState::Verifying)
    }

    /// Run the check/consume pair, invoking `on_success` only after both
    /// remote calls succeed. The consume call is never issued when the check
    /// rejects.
    pub fn verify_and_consume<G, F>(
        &mut self,
        gateway: &G,
        on_success: F,
    ) -> Result<(), VoucherError>
    where
        G: PortalGateway + ?Sized,
        F: FnOnce(),
    {
        if self.is_busy() {
            return Err(VoucherError::VerificationInFlight);
        }
        self.state = VoucherState::Verifying;

        if let Err(err) = gateway.check_voucher(&self.code) {
            let error = match err {
                PortalError::Server { message, .. } => VoucherError::InvalidOrUsed(message),
                other => VoucherError::Transport(other.to_string()),
            };
            self.state = VoucherState::Rejected(error.to_string());
            return Err(error);
        }

        if let Err(err) = gateway.mark_voucher_used(&self.code) {
            let error = match err {
                PortalError::Server { message, .. } => VoucherError::ConsumeFailed(message),
                other => VoucherError::Transport(other.to_string()),
            };
            self.state = VoucherState::Rejected(error.to_string());
            return Err(error);
        }

        self.state = VoucherState::Verified;
        on_success();
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn set_state_for_tests(&mut self, state: VoucherState) {
        self.state = state;
    }
}
