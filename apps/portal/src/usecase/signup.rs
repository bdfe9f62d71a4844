//! Registration: local form validation gates the OTP round-trip; the
//! account itself (identity account, uploaded documents, profile
//! record) is only created after the code verifies.

use chrono::Utc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};

use portal_domain::email::EmailAddress;
use portal_domain::field;

use crate::domain::ports::{BlobStore, EmailSender, IdentityProvider, RecordStore};
use crate::domain::types::{
    AccountRecord, Attachment, FlowState, Session, SignupForm, USERS_COLLECTION,
};
use crate::error::PortalError;
use crate::usecase::challenge::ChallengeGate;

pub struct SignupFlow<I, R, B, E>
where
    I: IdentityProvider,
    R: RecordStore,
    B: BlobStore,
    E: EmailSender,
{
    identity: I,
    records: R,
    blobs: B,
    email: E,
    gate: ChallengeGate,
    form: Option<SignupForm>,
}

fn require(value: &str, message: &str) -> Result<(), PortalError> {
    if value.is_empty() {
        return Err(PortalError::Validation(message.to_owned()));
    }
    Ok(())
}

fn require_attachment(attachment: &Attachment, message: &str) -> Result<(), PortalError> {
    if attachment.file_name.is_empty() || attachment.bytes.is_empty() {
        return Err(PortalError::Validation(message.to_owned()));
    }
    Ok(())
}

fn validate(form: &SignupForm) -> Result<EmailAddress, PortalError> {
    require(&form.full_name, "Full Name is required")?;
    require(&form.dob, "Date of Birth is required")?;
    let address = EmailAddress::parse(&form.email)
        .map_err(|_| PortalError::Validation("Enter a valid email".into()))?;
    if !field::validate_mobile(&form.mobile_number) {
        return Err(PortalError::Validation(
            "Mobile number must be 10 digits".into(),
        ));
    }
    if !field::validate_password(&form.password) {
        return Err(PortalError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    if form.confirm_password != form.password {
        return Err(PortalError::Validation("Passwords do not match".into()));
    }
    if !field::validate_aadhaar(&form.aadhaar_number) {
        return Err(PortalError::Validation("Aadhaar must be 12 digits".into()));
    }
    require_attachment(&form.profile_pic, "Profile Pic is required")?;
    require_attachment(&form.id_proof, "ID Proof is required")?;
    require_attachment(&form.academic_records, "Academic Records are required")?;
    Ok(address)
}

fn hash_password(password: &str) -> Result<String, PortalError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

impl<I, R, B, E> SignupFlow<I, R, B, E>
where
    I: IdentityProvider,
    R: RecordStore,
    B: BlobStore,
    E: EmailSender,
{
    pub fn new(identity: I, records: R, blobs: B, email: E) -> Self {
        Self {
            identity,
            records,
            blobs,
            email,
            gate: ChallengeGate::new(),
            form: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.gate.state()
    }

    /// `CollectingCredentials -> AwaitingOtp`. A form that fails a
    /// local rule (including a password/confirm mismatch) is rejected
    /// here and never reaches a collaborator.
    pub async fn submit(&mut self, form: SignupForm) -> Result<(), PortalError> {
        if self.gate.state() != FlowState::CollectingCredentials {
            return Err(PortalError::InvalidState);
        }
        let address = validate(&form)?;
        self.gate.issue(&self.email, &address).await?;
        self.form = Some(form);
        Ok(())
    }

    /// Deliver a fresh code, superseding the previous one.
    pub async fn resend_code(&mut self) -> Result<(), PortalError> {
        let Some(form) = self.form.as_ref() else {
            return Err(PortalError::InvalidState);
        };
        let address = EmailAddress::parse(&form.email)
            .map_err(|e| PortalError::Internal(anyhow::anyhow!(e)))?;
        self.gate.issue(&self.email, &address).await
    }

    async fn upload(
        blobs: &B,
        gate: &mut ChallengeGate,
        prefix: &str,
        attachment: &Attachment,
    ) -> Result<String, PortalError> {
        let path = format!("{prefix}/{}", attachment.file_name);
        match blobs
            .upload(&path, &attachment.bytes, &attachment.content_type)
            .await
        {
            Ok(url) => Ok(url),
            Err(e) => Err(gate.fail(e)),
        }
    }

    /// `AwaitingOtp -> Verified`. On a match: hash the password,
    /// create the identity account, upload the three attachments, and
    /// write the profile record. Any collaborator failure past the
    /// verification is terminal; the user restarts from a fresh form.
    pub async fn submit_code(&mut self, entered: &str) -> Result<Session, PortalError> {
        if entered.is_empty() {
            return Err(PortalError::Validation("One-time code is required".into()));
        }
        self.gate.verify(entered)?;
        let Some(form) = self.form.take() else {
            return Err(PortalError::InvalidState);
        };
        let address = EmailAddress::parse(&form.email)
            .map_err(|e| PortalError::Internal(anyhow::anyhow!(e)))?;

        let password_hash = match hash_password(&form.password) {
            Ok(hash) => hash,
            Err(e) => return Err(self.gate.fail(e)),
        };

        let session = match self.identity.register(&address, &form.password).await {
            Ok(session) => session,
            Err(e) => return Err(self.gate.fail(e)),
        };

        let profile_pic_url =
            Self::upload(&self.blobs, &mut self.gate, "profilePics", &form.profile_pic).await?;
        let id_proof_url =
            Self::upload(&self.blobs, &mut self.gate, "idProofs", &form.id_proof).await?;
        let academic_records_url = Self::upload(
            &self.blobs,
            &mut self.gate,
            "academicRecords",
            &form.academic_records,
        )
        .await?;

        let record = AccountRecord {
            full_name: form.full_name,
            dob: form.dob,
            email: form.email,
            mobile_number: form.mobile_number,
            aadhaar_number: form.aadhaar_number,
            password_hash,
            profile_pic_url,
            id_proof_url,
            academic_records_url,
            created_at: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self
            .records
            .put(USERS_COLLECTION, &session.user_id, &record.to_fields())
            .await
        {
            return Err(self.gate.fail(e));
        }

        Ok(session)
    }
}
