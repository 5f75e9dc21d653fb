use k8s_openapi::api::apps::v1::Deployment;
use serde_yaml::Value;
use thiserror::Error;

use crate::extensions::string::NonEmpty;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not a valid apps/v1 Deployment: {0}")]
    Invalid(#[from] serde_yaml::Error),
    #[error("expected apps/v1 Deployment, got apiVersion {api_version:?} kind {kind:?}")]
    WrongType {
        api_version: Option<String>,
        kind: Option<String>,
    },
    #[error("deployment manifest has no metadata.name")]
    MissingName,
}

const API_VERSION: &str = "apps/v1";
const KIND: &str = "Deployment";

/// Decodes rendered YAML (or JSON) into a Deployment.
///
/// `apiVersion` and `kind` must both be present and name an apps/v1 Deployment.
pub fn decode(text: &str) -> Result<Deployment, ManifestError> {
    let document: Value = serde_yaml::from_str(text)?;

    let field = |name: &str| document.get(name).and_then(Value::as_str).map(str::to_string);
    let (api_version, kind) = (field("apiVersion"), field("kind"));
    if api_version.as_deref() != Some(API_VERSION) || kind.as_deref() != Some(KIND) {
        return Err(ManifestError::WrongType { api_version, kind });
    }

    let deployment: Deployment = serde_yaml::from_value(document)?;
    if deployment.metadata.name.non_empty().is_none() {
        return Err(ManifestError::MissingName);
    }
    Ok(deployment)
}
