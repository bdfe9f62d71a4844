//! Student login: an OTP round-trip to the entered address, then a
//! password sign-in against the identity provider. The OTP gates the
//! second call; the credential itself is only checked at the end.

use portal_domain::email::EmailAddress;
use portal_domain::field;

use crate::domain::ports::{EmailSender, IdentityProvider, RecordStore};
use crate::domain::types::{FederatedIdentity, FlowState, LoginForm, Session, USERS_COLLECTION};
use crate::error::PortalError;
use crate::usecase::challenge::ChallengeGate;

pub struct UserLoginFlow<I, R, E>
where
    I: IdentityProvider,
    R: RecordStore,
    E: EmailSender,
{
    identity: I,
    records: R,
    email: E,
    gate: ChallengeGate,
    credential: Option<(EmailAddress, String)>,
}

fn validate(form: &LoginForm) -> Result<EmailAddress, PortalError> {
    if !field::validate_aadhaar(&form.aadhaar_number) {
        return Err(PortalError::Validation("Aadhaar must be 12 digits".into()));
    }
    let address = EmailAddress::parse(&form.email)
        .map_err(|_| PortalError::Validation("Enter a valid email".into()))?;
    if !field::validate_password(&form.password) {
        return Err(PortalError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(address)
}

impl<I, R, E> UserLoginFlow<I, R, E>
where
    I: IdentityProvider,
    R: RecordStore,
    E: EmailSender,
{
    pub fn new(identity: I, records: R, email: E) -> Self {
        Self {
            identity,
            records,
            email,
            gate: ChallengeGate::new(),
            credential: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.gate.state()
    }

    /// `CollectingCredentials -> AwaitingOtp`. Local field checks,
    /// then unconditional issuance: the credential is not verified
    /// until the code has been entered.
    ///
    /// A validation or delivery error leaves the flow where it was;
    /// the user fixes the field or resubmits.
    pub async fn submit_credentials(&mut self, form: LoginForm) -> Result<(), PortalError> {
        if self.gate.state() != FlowState::CollectingCredentials {
            return Err(PortalError::InvalidState);
        }
        let address = validate(&form)?;
        self.gate.issue(&self.email, &address).await?;
        self.credential = Some((address, form.password));
        Ok(())
    }

    /// Deliver a fresh code, superseding the previous one.
    pub async fn resend_code(&mut self) -> Result<(), PortalError> {
        let Some((address, _)) = self.credential.clone() else {
            return Err(PortalError::InvalidState);
        };
        self.gate.issue(&self.email, &address).await
    }

    /// `AwaitingOtp -> Verified`. On a match, performs the provider
    /// sign-in with the original credential; a provider rejection is
    /// terminal (`Failed`) and the flow must be restarted.
    pub async fn submit_code(&mut self, entered: &str) -> Result<Session, PortalError> {
        if entered.is_empty() {
            return Err(PortalError::Validation("One-time code is required".into()));
        }
        self.gate.verify(entered)?;
        let Some((address, password)) = self.credential.clone() else {
            return Err(PortalError::InvalidState);
        };
        match self.identity.authenticate(&address, &password).await {
            Ok(session) => Ok(session),
            Err(e) => Err(self.gate.fail(e)),
        }
    }

    /// Federated bypass: the provider's own sign-in replaces the whole
    /// challenge, but the account record must already exist. A missing
    /// record fails the flow so the caller can route to registration.
    pub async fn sign_in_with_google(&mut self) -> Result<FederatedIdentity, PortalError> {
        let identity = match self.identity.sign_in_federated().await {
            Ok(identity) => identity,
            Err(e) => return Err(self.gate.fail(e)),
        };
        match self.records.get(USERS_COLLECTION, &identity.user_id).await {
            Ok(Some(_)) => {
                self.gate.bypass();
                Ok(identity)
            }
            Ok(None) => Err(self.gate.fail(PortalError::NotFound)),
            Err(e) => Err(self.gate.fail(e)),
        }
    }
}
