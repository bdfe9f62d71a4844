#![allow(async_fn_in_trait)]

//! Collaborator ports. The portal depends on four hosted services and
//! implements none of them; REST adapters live in `infra`.

use std::collections::BTreeMap;

use portal_domain::email::EmailAddress;

use crate::domain::types::{FederatedIdentity, Fields, Session};
use crate::error::PortalError;

/// Hosted identity provider: credential sign-in, account creation,
/// federated sign-in, and password reset mail.
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(
        &self,
        email: &EmailAddress,
        secret: &str,
    ) -> Result<Session, PortalError>;

    async fn register(&self, email: &EmailAddress, secret: &str) -> Result<Session, PortalError>;

    /// The provider's own popup/redirect sign-in. Bypasses the OTP
    /// challenge entirely.
    async fn sign_in_federated(&self) -> Result<FederatedIdentity, PortalError>;

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), PortalError>;
}

/// Hosted document store holding user and admin records.
pub trait RecordStore: Send + Sync {
    /// Every document in `collection` whose `field` equals `value`.
    /// Exact, case-sensitive comparison.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Fields>, PortalError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, PortalError>;

    async fn put(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), PortalError>;
}

/// Hosted blob store for signup attachments.
pub trait BlobStore: Send + Sync {
    /// Upload and return a retrievable URL.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, PortalError>;
}

/// Transactional email sender used to deliver one-time codes. The
/// template and sender identity are adapter configuration; callers
/// supply only the destination and template parameters.
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        to: &EmailAddress,
        params: &BTreeMap<String, String>,
    ) -> Result<(), PortalError>;
}
