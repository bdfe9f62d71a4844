//! REST adapter for the transactional email service.

use std::collections::BTreeMap;

use serde_json::json;

use portal_domain::email::EmailAddress;

use crate::domain::ports::EmailSender;
use crate::error::PortalError;

#[derive(Clone)]
pub struct RestEmailSender {
    client: reqwest::Client,
    base_url: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl RestEmailSender {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        service_id: String,
        template_id: String,
        public_key: String,
    ) -> Self {
        Self {
            client,
            base_url,
            service_id,
            template_id,
            public_key,
        }
    }
}

impl EmailSender for RestEmailSender {
    async fn send(
        &self,
        to: &EmailAddress,
        params: &BTreeMap<String, String>,
    ) -> Result<(), PortalError> {
        let mut template_params = params.clone();
        template_params.insert("to_email".into(), to.to_string());
        let body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": template_params,
        });
        let response = self
            .client
            .post(format!("{}/api/v1.0/email/send", self.base_url))
            .json(&body)
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
