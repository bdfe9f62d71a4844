//! Shared collaborator bundle. Adapters are built once from config and
//! cloned into each flow; the HTTP client is shared between them.

use crate::config::PortalConfig;
use crate::infra::email::RestEmailSender;
use crate::infra::identity::RestIdentityProvider;
use crate::infra::records::RestRecordStore;
use crate::infra::storage::RestBlobStore;
use crate::usecase::admin::AdminLoginFlow;
use crate::usecase::login::UserLoginFlow;
use crate::usecase::profile::GetProfileUseCase;
use crate::usecase::reset::RequestPasswordResetUseCase;
use crate::usecase::seed::SeedAdminsUseCase;
use crate::usecase::signup::SignupFlow;

#[derive(Clone)]
pub struct Portal {
    identity: RestIdentityProvider,
    records: RestRecordStore,
    blobs: RestBlobStore,
    email: RestEmailSender,
}

impl Portal {
    pub fn new(config: &PortalConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            identity: RestIdentityProvider::new(
                client.clone(),
                config.identity_base_url.clone(),
                config.identity_api_key.clone(),
                config.federated_id_token.clone(),
            ),
            records: RestRecordStore::new(
                client.clone(),
                config.records_base_url.clone(),
                config.records_project_id.clone(),
            ),
            blobs: RestBlobStore::new(
                client.clone(),
                config.storage_base_url.clone(),
                config.storage_bucket.clone(),
            ),
            email: RestEmailSender::new(
                client,
                config.email_base_url.clone(),
                config.email_service_id.clone(),
                config.email_template_id.clone(),
                config.email_public_key.clone(),
            ),
        }
    }

    pub fn user_login(
        &self,
    ) -> UserLoginFlow<RestIdentityProvider, RestRecordStore, RestEmailSender> {
        UserLoginFlow::new(
            self.identity.clone(),
            self.records.clone(),
            self.email.clone(),
        )
    }

    pub fn admin_login(&self) -> AdminLoginFlow<RestRecordStore, RestEmailSender> {
        AdminLoginFlow::new(self.records.clone(), self.email.clone())
    }

    pub fn signup(
        &self,
    ) -> SignupFlow<RestIdentityProvider, RestRecordStore, RestBlobStore, RestEmailSender> {
        SignupFlow::new(
            self.identity.clone(),
            self.records.clone(),
            self.blobs.clone(),
            self.email.clone(),
        )
    }

    pub fn password_reset(&self) -> RequestPasswordResetUseCase<RestIdentityProvider> {
        RequestPasswordResetUseCase {
            identity: self.identity.clone(),
        }
    }

    pub fn profile(&self) -> GetProfileUseCase<RestRecordStore> {
        GetProfileUseCase {
            records: self.records.clone(),
        }
    }

    pub fn seed_admins(&self) -> SeedAdminsUseCase<RestRecordStore> {
        SeedAdminsUseCase {
            records: self.records.clone(),
        }
    }
}
