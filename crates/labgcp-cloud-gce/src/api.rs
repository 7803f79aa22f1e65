//! Compute REST API client
//!
//! Direct Compute Engine API implementation for the label-update call. The
//! gcloud CLI has no flag for supplying a label fingerprint, so `setLabels`
//! is issued against the REST endpoint with a Bearer token minted by
//! `gcloud auth print-access-token`.

use crate::error::{GceError, Result};
use labgcp_cloud::OperationInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const COMPUTE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Compute REST client
pub struct ComputeApi {
    client: reqwest::Client,
}

impl ComputeApi {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Replace the full label set of an instance. The fingerprint must be the
    /// one read from the current record; the API rejects a stale fingerprint
    /// with 412 `conditionNotMet`.
    pub async fn set_labels(
        &self,
        token: &str,
        project: &str,
        zone: &str,
        instance: &str,
        labels: &HashMap<String, String>,
        fingerprint: &str,
    ) -> Result<OperationInfo> {
        let url = format!(
            "{COMPUTE_API_BASE}/projects/{project}/zones/{zone}/instances/{instance}/setLabels"
        );

        let body = SetLabelsRequest {
            labels,
            label_fingerprint: fingerprint,
        };

        tracing::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_api_error(instance, status.as_u16(), &text));
        }

        let op: OperationInfo = serde_json::from_str(&text)?;
        Ok(op)
    }
}

impl Default for ComputeApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetLabelsRequest<'a> {
    labels: &'a HashMap<String, String>,
    label_fingerprint: &'a str,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Deserialize)]
struct ApiErrorItem {
    #[serde(default)]
    reason: String,
}

/// Map an error response body to the matching error kind. A stale label
/// fingerprint comes back as 412 with reason `conditionNotMet`.
fn classify_api_error(instance: &str, status: u16, body: &str) -> GceError {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        let condition_not_met = envelope
            .error
            .errors
            .iter()
            .any(|e| e.reason == "conditionNotMet");
        if status == 412 || condition_not_met {
            return GceError::LabelConflict(instance.to_string());
        }
        if !envelope.error.message.is_empty() {
            return GceError::ApiError(envelope.error.message);
        }
    }

    if status == 412 {
        return GceError::LabelConflict(instance.to_string());
    }
    GceError::ApiError(format!("HTTP {status}: {body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_fingerprint_classifies_as_conflict() {
        let body = r#"{
            "error": {
                "code": 412,
                "message": "Labels fingerprint either invalid or resource labels have changed",
                "errors": [{"reason": "conditionNotMet", "domain": "global"}]
            }
        }"#;

        assert!(matches!(
            classify_api_error("rstudio-bob", 412, body),
            GceError::LabelConflict(name) if name == "rstudio-bob"
        ));
    }

    #[test]
    fn other_api_errors_keep_their_message() {
        let body = r#"{
            "error": {
                "code": 403,
                "message": "Required 'compute.instances.setLabels' permission",
                "errors": [{"reason": "forbidden"}]
            }
        }"#;

        assert!(matches!(
            classify_api_error("rstudio-bob", 403, body),
            GceError::ApiError(msg) if msg.contains("setLabels")
        ));
    }

    #[test]
    fn unparseable_412_still_classifies_as_conflict() {
        assert!(matches!(
            classify_api_error("rstudio-bob", 412, "<html>teapot</html>"),
            GceError::LabelConflict(_)
        ));
    }
}
