//! Password reset request. Stateless: no challenge is involved, the
//! identity provider sends its own reset email.

use portal_domain::email::EmailAddress;

use crate::domain::ports::IdentityProvider;
use crate::error::PortalError;

pub struct RequestPasswordResetUseCase<I: IdentityProvider> {
    pub identity: I,
}

impl<I: IdentityProvider> RequestPasswordResetUseCase<I> {
    pub async fn execute(&self, email: &str) -> Result<(), PortalError> {
        let address = EmailAddress::parse(email)
            .map_err(|_| PortalError::Validation("Enter a valid email".into()))?;
        self.identity.send_password_reset(&address).await
    }
}
