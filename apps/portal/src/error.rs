/// Stable machine-readable tag for each error variant. Stored inside
/// `FlowState::Failed` so a failed flow remembers why it died without
/// dragging the full error (and its `anyhow` chain) along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    CredentialMismatch,
    OtpMismatch,
    DeliveryFailed,
    UploadFailed,
    ProviderFailure,
    InvalidState,
    Expired,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::CredentialMismatch => "CREDENTIAL_MISMATCH",
            Self::OtpMismatch => "OTP_MISMATCH",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::UploadFailed => "UPLOAD_FAILED",
            Self::ProviderFailure => "PROVIDER_FAILURE",
            Self::InvalidState => "INVALID_STATE",
            Self::Expired => "EXPIRED",
            Self::Internal => "INTERNAL",
        }
    }
}

/// Portal error taxonomy. Every collaborator failure is translated
/// into one of these before it reaches a caller; none are fatal to the
/// process — the user can always restart the flow.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// A local field rule failed. Never reaches a collaborator.
    #[error("{0}")]
    Validation(String),
    #[error("account not found")]
    NotFound,
    #[error("invalid credentials")]
    CredentialMismatch,
    #[error("invalid one-time code")]
    OtpMismatch,
    #[error("email delivery failed")]
    DeliveryFailed,
    #[error("file upload failed")]
    UploadFailed,
    #[error("federated sign-in failed")]
    ProviderFailure,
    /// A flow step was invoked out of sequence (caller bug).
    #[error("step invoked out of sequence")]
    InvalidState,
    #[error("one-time code expired")]
    Expired,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound => ErrorKind::NotFound,
            Self::CredentialMismatch => ErrorKind::CredentialMismatch,
            Self::OtpMismatch => ErrorKind::OtpMismatch,
            Self::DeliveryFailed => ErrorKind::DeliveryFailed,
            Self::UploadFailed => ErrorKind::UploadFailed,
            Self::ProviderFailure => ErrorKind::ProviderFailure,
            Self::InvalidState => ErrorKind::InvalidState,
            Self::Expired => ErrorKind::Expired,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
