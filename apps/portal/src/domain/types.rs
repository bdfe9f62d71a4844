use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use portal_domain::email::EmailAddress;

use crate::error::ErrorKind;

/// Collection holding student account records.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding admin records.
pub const ADMINS_COLLECTION: &str = "admins";

/// A stored document: flat string-valued fields.
pub type Fields = BTreeMap<String, String>;

/// The live one-time code awaiting verification. At most one exists
/// per flow instance; a re-issue replaces it.
#[derive(Debug, Clone)]
pub struct Challenge {
    pub target: EmailAddress,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub consumed: bool,
}

impl Challenge {
    /// Whether this challenge may still be verified against.
    /// `expires_after = None` means codes never age out.
    pub fn is_live(&self, expires_after: Option<Duration>) -> bool {
        if self.consumed {
            return false;
        }
        match expires_after {
            Some(ttl) => Utc::now() - self.issued_at <= ttl,
            None => true,
        }
    }
}

/// Position of one flow instance in the two-step challenge.
///
/// `Verified` and `Failed` are terminal: a failed flow is restarted by
/// constructing a fresh instance, never by reusing this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    CollectingCredentials,
    AwaitingOtp,
    Verified,
    Failed(ErrorKind),
}

/// Session issued by the identity provider on successful sign-in.
/// Tokens are opaque to the portal.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: EmailAddress,
    pub id_token: String,
    pub refresh_token: String,
}

/// Identity established by the provider's own (federated) sign-in.
#[derive(Debug, Clone)]
pub struct FederatedIdentity {
    pub user_id: String,
    pub email: EmailAddress,
}

/// Student login form fields.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub aadhaar_number: String,
    pub email: String,
    pub password: String,
}

/// Admin login form fields. The identifier is an email address or a
/// username alias.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub identifier: String,
    pub password: String,
}

/// One file attached to the signup form.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Registration form fields plus the three required attachments.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub full_name: String,
    pub dob: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub confirm_password: String,
    pub aadhaar_number: String,
    pub profile_pic: Attachment,
    pub id_proof: Attachment,
    pub academic_records: Attachment,
}

/// Student profile written once at registration, read for the landing
/// page. The secret is stored hashed; the plaintext only ever goes to
/// the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub full_name: String,
    pub dob: String,
    pub email: String,
    pub mobile_number: String,
    pub aadhaar_number: String,
    pub password_hash: String,
    pub profile_pic_url: String,
    pub id_proof_url: String,
    pub academic_records_url: String,
    pub created_at: String,
}

/// Admin credential record. The record store holds the secret in
/// plaintext, matching the deployed data; see the challenge module
/// docs for the trust-model caveat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn value_to_fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
        _ => Fields::new(),
    }
}

fn fields_to<T: serde::de::DeserializeOwned>(fields: &Fields) -> Option<T> {
    let value = serde_json::to_value(fields).ok()?;
    serde_json::from_value(value).ok()
}

impl AccountRecord {
    pub fn to_fields(&self) -> Fields {
        value_to_fields(serde_json::to_value(self).unwrap_or_default())
    }

    pub fn from_fields(fields: &Fields) -> Option<Self> {
        fields_to(fields)
    }
}

impl AdminRecord {
    pub fn to_fields(&self) -> Fields {
        value_to_fields(serde_json::to_value(self).unwrap_or_default())
    }

    pub fn from_fields(fields: &Fields) -> Option<Self> {
        fields_to(fields)
    }
}
