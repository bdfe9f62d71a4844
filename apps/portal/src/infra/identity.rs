//! REST adapter for the hosted identity provider.

use serde::Deserialize;
use serde_json::json;

use portal_domain::email::EmailAddress;

use crate::domain::ports::IdentityProvider;
use crate::domain::types::{FederatedIdentity, Session};
use crate::error::PortalError;

#[derive(Clone)]
pub struct RestIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    federated_id_token: Option<String>,
}

#[derive(Deserialize)]
struct AccountResponse {
    #[serde(rename = "localId")]
    local_id: String,
    email: String,
    #[serde(rename = "idToken")]
    id_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Translate a provider error code into the portal taxonomy. Codes may
/// carry a suffix (`EMAIL_NOT_FOUND : ...`), so match on the prefix.
fn map_auth_error(message: &str) -> PortalError {
    let code = message.split_whitespace().next().unwrap_or(message);
    match code {
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => PortalError::NotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => PortalError::CredentialMismatch,
        "INVALID_EMAIL" => PortalError::Validation("Invalid email address".into()),
        "EMAIL_EXISTS" => PortalError::Validation("Email already registered".into()),
        _ => PortalError::Internal(anyhow::anyhow!("identity provider error: {message}")),
    }
}

impl RestIdentityProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        federated_id_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            federated_id_token,
        }
    }

    async fn account_call(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<AccountResponse, PortalError> {
        let url = format!(
            "{}/v1/accounts:{endpoint}?key={}",
            self.base_url, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("identity provider unreachable: {e}"))?;
        if response.status().is_success() {
            response
                .json::<AccountResponse>()
                .await
                .map_err(|e| anyhow::anyhow!("malformed identity response: {e}").into())
        } else {
            let err = response
                .json::<ApiError>()
                .await
                .map_err(|e| anyhow::anyhow!("malformed identity error body: {e}"))?;
            Err(map_auth_error(&err.error.message))
        }
    }
}

fn session_from(response: AccountResponse) -> Result<Session, PortalError> {
    let email = EmailAddress::parse(&response.email)
        .map_err(|_| anyhow::anyhow!("provider returned an invalid email: {}", response.email))?;
    Ok(Session {
        user_id: response.local_id,
        email,
        id_token: response.id_token,
        refresh_token: response.refresh_token,
    })
}

impl IdentityProvider for RestIdentityProvider {
    async fn authenticate(
        &self,
        email: &EmailAddress,
        secret: &str,
    ) -> Result<Session, PortalError> {
        let response = self
            .account_call(
                "signInWithPassword",
                json!({
                    "email": email.as_str(),
                    "password": secret,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        session_from(response)
    }

    async fn register(&self, email: &EmailAddress, secret: &str) -> Result<Session, PortalError> {
        let response = self
            .account_call(
                "signUp",
                json!({
                    "email": email.as_str(),
                    "password": secret,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        session_from(response)
    }

    async fn sign_in_federated(&self) -> Result<FederatedIdentity, PortalError> {
        // No pre-obtained provider token behaves like a dismissed
        // popup: the federated path is simply unavailable.
        let Some(id_token) = self.federated_id_token.as_deref() else {
            return Err(PortalError::ProviderFailure);
        };
        let response = self
            .account_call(
                "signInWithIdp",
                json!({
                    "postBody": format!("id_token={id_token}&providerId=google.com"),
                    "requestUri": "http://localhost",
                    "returnSecureToken": true,
                }),
            )
            .await
            .map_err(|e| match e {
                PortalError::Internal(_) => PortalError::ProviderFailure,
                other => other,
            })?;
        let session = session_from(response)?;
        Ok(FederatedIdentity {
            user_id: session.user_id,
            email: session.email,
        })
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), PortalError> {
        let url = format!(
            "{}/v1/accounts:sendOobCode?key={}",
            self.base_url, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "requestType": "PASSWORD_RESET",
                "email": email.as_str(),
            }))
            .send()
            .await
            .map_err(|_| PortalError::DeliveryFailed)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(PortalError::DeliveryFailed)
        }
    }
}
