//! Maintenance task that seeds the admins collection with numbered
//! accounts (`admin1`, `admin2`, ...). Secrets follow the
//! `adminN_password` convention of the deployed data set.

use uuid::Uuid;

use crate::domain::ports::RecordStore;
use crate::domain::types::{ADMINS_COLLECTION, AdminRecord};
use crate::error::PortalError;

pub struct SeedAdminsUseCase<R: RecordStore> {
    pub records: R,
}

impl<R: RecordStore> SeedAdminsUseCase<R> {
    /// Write `count` admin records under fresh document ids. Returns
    /// the number written; stops at the first store error.
    pub async fn execute(&self, domain: &str, count: u32) -> Result<u32, PortalError> {
        for i in 1..=count {
            let record = AdminRecord {
                username: format!("admin{i}"),
                email: format!("admin{i}@{domain}"),
                password: format!("admin{i}_password"),
            };
            self.records
                .put(
                    ADMINS_COLLECTION,
                    &Uuid::new_v4().to_string(),
                    &record.to_fields(),
                )
                .await?;
            tracing::debug!(admin = %record.username, "seeded admin record");
        }
        Ok(count)
    }
}
