//! REST adapter for the hosted document store. Documents are flat
//! string-field maps, which is all the portal ever writes.

use serde::Deserialize;
use serde_json::json;

use crate::domain::ports::RecordStore;
use crate::domain::types::Fields;
use crate::error::PortalError;

#[derive(Clone)]
pub struct RestRecordStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
}

#[derive(Deserialize)]
struct Document {
    fields: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct QueryRow {
    document: Option<Document>,
}

fn decode_fields(document: Document) -> Fields {
    let mut fields = Fields::new();
    for (name, value) in document.fields.unwrap_or_default() {
        if let Some(s) = value.get("stringValue").and_then(|v| v.as_str()) {
            fields.insert(name, s.to_owned());
        }
    }
    fields
}

fn encode_fields(fields: &Fields) -> serde_json::Value {
    let encoded: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|(name, value)| (name.clone(), json!({ "stringValue": value })))
        .collect();
    json!({ "fields": encoded })
}

impl RestRecordStore {
    pub fn new(client: reqwest::Client, base_url: String, project_id: String) -> Self {
        Self {
            client,
            base_url,
            project_id,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }
}

impl RecordStore for RestRecordStore {
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Fields>, PortalError> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value },
                    }
                },
            }
        });
        let response = self
            .client
            .post(format!("{}:runQuery", self.documents_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("record store unreachable: {e}"))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("record query failed: {e}"))?;
        let rows = response
            .json::<Vec<QueryRow>>()
            .await
            .map_err(|e| anyhow::anyhow!("malformed query response: {e}"))?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(decode_fields)
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Fields>, PortalError> {
        let response = self
            .client
            .get(format!("{}/{collection}/{id}", self.documents_url()))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("record store unreachable: {e}"))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("record fetch failed: {e}"))?;
        let document = response
            .json::<Document>()
            .await
            .map_err(|e| anyhow::anyhow!("malformed document: {e}"))?;
        Ok(Some(decode_fields(document)))
    }

    async fn put(&self, collection: &str, id: &str, fields: &Fields) -> Result<(), PortalError> {
        self.client
            .patch(format!("{}/{collection}/{id}", self.documents_url()))
            .json(&encode_fields(fields))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("record store unreachable: {e}"))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("record write failed: {e}"))?;
        Ok(())
    }
}
