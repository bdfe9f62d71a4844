//! One-time-code issuance and verification, shared by the three flows.
//!
//! The code is generated and compared inside this client process; the
//! hosted collaborators never see it. That matches the deployed
//! system, but it is not a trust boundary: a deployment that needs one
//! must move generation and comparison behind a server.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use portal_domain::email::EmailAddress;
use portal_domain::otp;

use crate::domain::ports::EmailSender;
use crate::domain::types::{Challenge, FlowState};
use crate::error::PortalError;

/// Owns the flow position and the live challenge for one flow
/// instance.
///
/// At most one challenge is live at a time: re-issuing installs a
/// fresh one, so a code from an earlier issuance can never verify.
/// The gate is driven by a single caller; it is not shared.
#[derive(Debug)]
pub struct ChallengeGate {
    state: FlowState,
    challenge: Option<Challenge>,
    expires_after: Option<Duration>,
}

impl ChallengeGate {
    pub fn new() -> Self {
        Self {
            state: FlowState::CollectingCredentials,
            challenge: None,
            expires_after: None,
        }
    }

    /// Opt-in hardening: codes older than `ttl` verify as `Expired`.
    /// The default gate keeps codes valid forever, matching the
    /// deployed behavior.
    pub fn with_expiry(ttl: Duration) -> Self {
        Self {
            expires_after: Some(ttl),
            ..Self::new()
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Record a terminal failure and hand the error back. Flows call
    /// this for collaborator errors; local validation errors and OTP
    /// mismatches stay recoverable and never come through here.
    pub(crate) fn fail(&mut self, err: PortalError) -> PortalError {
        self.state = FlowState::Failed(err.kind());
        err
    }

    /// Used by the federated path, which skips the challenge entirely.
    pub(crate) fn bypass(&mut self) {
        self.challenge = None;
        self.state = FlowState::Verified;
    }

    /// Generate a fresh six-digit code and deliver it to `target`.
    ///
    /// Exactly one email send per successful call, no automatic retry.
    /// On delivery failure the state and any prior challenge are left
    /// untouched; the caller may simply invoke issuance again.
    pub async fn issue<E: EmailSender>(
        &mut self,
        sender: &E,
        target: &EmailAddress,
    ) -> Result<(), PortalError> {
        match self.state {
            FlowState::CollectingCredentials | FlowState::AwaitingOtp => {}
            FlowState::Verified | FlowState::Failed(_) => return Err(PortalError::InvalidState),
        }

        let code = otp::generate_code();
        let mut params = BTreeMap::new();
        params.insert("otp".to_owned(), code.clone());
        params.insert("subject".to_owned(), "Your OTP Code".to_owned());
        params.insert(
            "message".to_owned(),
            format!("Your OTP code is {code}. Please enter it to continue."),
        );
        sender.send(target, &params).await?;

        self.challenge = Some(Challenge {
            target: target.clone(),
            code,
            issued_at: Utc::now(),
            consumed: false,
        });
        self.state = FlowState::AwaitingOtp;
        Ok(())
    }

    /// Compare `entered` against the live challenge.
    ///
    /// Only legal in `AwaitingOtp`; anywhere else the call is a caller
    /// error and the state is not touched. A mismatch keeps the flow
    /// in `AwaitingOtp` so the user can retype or ask for a re-issue.
    pub fn verify(&mut self, entered: &str) -> Result<(), PortalError> {
        if self.state != FlowState::AwaitingOtp {
            return Err(PortalError::InvalidState);
        }
        let matches = {
            let Some(challenge) = self.challenge.as_ref() else {
                return Err(PortalError::InvalidState);
            };
            if let Some(ttl) = self.expires_after {
                if !challenge.is_live(Some(ttl)) {
                    // Recoverable: the caller can re-issue from AwaitingOtp.
                    return Err(PortalError::Expired);
                }
            }
            entered == challenge.code
        };
        if !matches {
            return Err(PortalError::OtpMismatch);
        }
        if let Some(challenge) = self.challenge.as_mut() {
            challenge.consumed = true;
        }
        self.state = FlowState::Verified;
        Ok(())
    }
}

impl Default for ChallengeGate {
    fn default() -> Self {
        Self::new()
    }
}
