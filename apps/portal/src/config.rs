use serde::Deserialize;

use portal_core::config::Config;

fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com".to_owned()
}

fn default_records_base_url() -> String {
    "https://firestore.googleapis.com".to_owned()
}

fn default_storage_base_url() -> String {
    "https://firebasestorage.googleapis.com".to_owned()
}

fn default_email_base_url() -> String {
    "https://api.emailjs.com".to_owned()
}

/// Portal configuration loaded from environment variables
/// (`IDENTITY_API_KEY`, `RECORDS_PROJECT_ID`, ...).
#[derive(Debug, Deserialize)]
pub struct PortalConfig {
    /// Identity provider REST endpoint.
    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,
    /// API key sent with every identity provider call.
    pub identity_api_key: String,
    /// Record store REST endpoint.
    #[serde(default = "default_records_base_url")]
    pub records_base_url: String,
    /// Project the user/admin document collections live under.
    pub records_project_id: String,
    /// Blob store REST endpoint.
    #[serde(default = "default_storage_base_url")]
    pub storage_base_url: String,
    /// Bucket that receives signup attachments.
    pub storage_bucket: String,
    /// Transactional email REST endpoint.
    #[serde(default = "default_email_base_url")]
    pub email_base_url: String,
    /// Email service id.
    pub email_service_id: String,
    /// Template that renders the one-time code.
    pub email_template_id: String,
    /// Public key identifying the email account.
    pub email_public_key: String,
    /// Pre-obtained federated provider token, if the caller already
    /// completed the provider's own sign-in. Absent means federated
    /// login is unavailable in this session.
    #[serde(default)]
    pub federated_id_token: Option<String>,
}

impl Config for PortalConfig {}
