//! REST adapter for the hosted blob store.

use crate::domain::ports::BlobStore;
use crate::error::PortalError;

#[derive(Clone)]
pub struct RestBlobStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

/// Object names may contain `/` separators, which the API expects
/// percent-encoded in the object path segment.
fn encode_object_name(path: &str) -> String {
    path.replace('/', "%2F")
}

impl RestBlobStore {
    pub fn new(client: reqwest::Client, base_url: String, bucket: String) -> Self {
        Self {
            client,
            base_url,
            bucket,
        }
    }
}

impl BlobStore for RestBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, PortalError> {
        let name = encode_object_name(path);
        let response = self
            .client
            .post(format!(
                "{}/v0/b/{}/o?uploadType=media&name={name}",
                self.base_url, self.bucket
            ))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|_| PortalError::UploadFailed)?;
        if !response.status().is_success() {
            return Err(PortalError::UploadFailed);
        }
        Ok(format!(
            "{}/v0/b/{}/o/{name}?alt=media",
            self.base_url, self.bucket
        ))
    }
}
