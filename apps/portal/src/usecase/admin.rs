//! Admin login: credential check against the admins collection first,
//! then an OTP round-trip to the record's registered address.
//!
//! No collaborator issues a session for admins; success is the
//! verified flow plus the validated record, nothing more durable.

use portal_domain::email::EmailAddress;
use portal_domain::field;

use crate::domain::ports::{EmailSender, RecordStore};
use crate::domain::types::{ADMINS_COLLECTION, AdminCredentials, AdminRecord, FlowState};
use crate::error::PortalError;
use crate::usecase::challenge::ChallengeGate;

pub struct AdminLoginFlow<R, E>
where
    R: RecordStore,
    E: EmailSender,
{
    records: R,
    email: E,
    gate: ChallengeGate,
    admin: Option<AdminRecord>,
}

impl<R, E> AdminLoginFlow<R, E>
where
    R: RecordStore,
    E: EmailSender,
{
    pub fn new(records: R, email: E) -> Self {
        Self {
            records,
            email,
            gate: ChallengeGate::new(),
            admin: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.gate.state()
    }

    /// Look up an admin by email or username alias. Exact,
    /// case-sensitive match; the first hit is canonical. Identifiers
    /// are unique by contract, so more than one hit is a
    /// data-integrity anomaly and gets logged rather than silently
    /// swallowed.
    async fn lookup(records: &R, identifier: &str) -> Result<AdminRecord, PortalError> {
        let mut matches = records
            .find_by_field(ADMINS_COLLECTION, "email", identifier)
            .await?;
        matches.extend(
            records
                .find_by_field(ADMINS_COLLECTION, "username", identifier)
                .await?,
        );
        if matches.len() > 1 {
            tracing::warn!(
                identifier,
                matches = matches.len(),
                "duplicate admin identifier, treating first match as canonical"
            );
        }
        let fields = matches.into_iter().next().ok_or(PortalError::NotFound)?;
        AdminRecord::from_fields(&fields)
            .ok_or_else(|| anyhow::anyhow!("malformed admin record for {identifier}").into())
    }

    /// `CollectingCredentials -> AwaitingOtp`. The credential check
    /// runs before any code is sent: an unknown identifier or a wrong
    /// password fails the flow without a single email going out.
    ///
    /// The code goes to the record's registered address, not to the
    /// typed identifier, so username logins still reach the inbox.
    pub async fn submit_credentials(&mut self, creds: AdminCredentials) -> Result<(), PortalError> {
        if self.gate.state() != FlowState::CollectingCredentials {
            return Err(PortalError::InvalidState);
        }
        if creds.identifier.is_empty() {
            return Err(PortalError::Validation(
                "Username or email is required".into(),
            ));
        }
        if !field::validate_password(&creds.password) {
            return Err(PortalError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }

        let admin = match Self::lookup(&self.records, &creds.identifier).await {
            Ok(admin) => admin,
            Err(e) => return Err(self.gate.fail(e)),
        };
        if admin.password != creds.password {
            return Err(self.gate.fail(PortalError::CredentialMismatch));
        }

        let target = match EmailAddress::parse(&admin.email) {
            Ok(target) => target,
            Err(_) => {
                let err = anyhow::anyhow!("admin record holds an invalid email: {}", admin.email);
                return Err(self.gate.fail(err.into()));
            }
        };
        self.gate.issue(&self.email, &target).await?;
        self.admin = Some(admin);
        Ok(())
    }

    /// `AwaitingOtp -> Verified`. Returns the validated record; there
    /// is no token to hand out.
    pub async fn submit_code(&mut self, entered: &str) -> Result<AdminRecord, PortalError> {
        if entered.is_empty() {
            return Err(PortalError::Validation("One-time code is required".into()));
        }
        self.gate.verify(entered)?;
        self.admin.clone().ok_or(PortalError::InvalidState)
    }
}
