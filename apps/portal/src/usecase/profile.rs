//! Profile retrieval for the landing page.

use crate::domain::ports::RecordStore;
use crate::domain::types::{AccountRecord, USERS_COLLECTION};
use crate::error::PortalError;

pub struct GetProfileUseCase<R: RecordStore> {
    pub records: R,
}

impl<R: RecordStore> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: &str) -> Result<AccountRecord, PortalError> {
        let fields = self
            .records
            .get(USERS_COLLECTION, user_id)
            .await?
            .ok_or(PortalError::NotFound)?;
        AccountRecord::from_fields(&fields)
            .ok_or_else(|| anyhow::anyhow!("malformed account record for {user_id}").into())
    }
}
