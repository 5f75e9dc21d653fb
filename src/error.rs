use std::error;
use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::template::RenderError;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("{0}")]
    MissingConfiguration(&'static str),
    #[error("can't create kubernetes client: certificate authority is not valid base64")]
    CredentialDecode(#[source] base64::DecodeError),
    #[error("can't create kubernetes client")]
    ClientConstruction(#[source] Box<dyn error::Error + Send + Sync>),
    #[error("can't read provided deployment template {}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("can't render provided deployment template")]
    TemplateRender(#[from] RenderError),
    #[error("can't decode provided deployment template")]
    ManifestDecode(#[from] ManifestError),
    #[error("can't read deployments in namespace {namespace}")]
    ClusterQuery {
        namespace: String,
        #[source]
        source: kube::Error,
    },
    #[error("can't {action} provided deployment")]
    ClusterWrite {
        action: WriteAction,
        #[source]
        source: kube::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
}

impl std::fmt::Display for WriteAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteAction::Create => f.write_str("create"),
            WriteAction::Update => f.write_str("update"),
        }
    }
}
