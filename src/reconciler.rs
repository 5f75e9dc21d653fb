use k8s_openapi::api::apps::v1::Deployment;
use log::{debug, info};

use crate::error::{PluginError, WriteAction};
use crate::extensions::string::NonEmpty;
use crate::kubernetes::model::DeploymentClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
}

/// Applies the namespace override, or the cluster default when the manifest names none.
pub fn resolve_namespace(
    deployment: &mut Deployment,
    namespace_override: Option<&str>,
    default_namespace: &str,
) -> String {
    if let Some(namespace) = namespace_override {
        deployment.metadata.namespace = Some(namespace.to_string());
    }
    if deployment.metadata.namespace.non_empty().is_none() {
        deployment.metadata.namespace = Some(default_namespace.to_string());
    }
    deployment
        .metadata
        .namespace
        .clone()
        .unwrap_or_else(|| default_namespace.to_string())
}

/// Linear scan over the namespace listing; fleets are small.
pub async fn find_deployment<C>(
    client: &C,
    namespace: &str,
    name: &str,
) -> Result<Option<Deployment>, PluginError>
where
    C: DeploymentClient + Sync,
{
    let deployments = client
        .list(namespace)
        .await
        .map_err(|source| PluginError::ClusterQuery {
            namespace: namespace.to_string(),
            source,
        })?;

    Ok(deployments
        .into_iter()
        .find(|d| d.metadata.name.as_deref() == Some(name)))
}

/// Creates the deployment, or replaces it wholesale when one with the same name exists.
pub async fn reconcile<C>(
    client: &C,
    mut deployment: Deployment,
    namespace_override: Option<&str>,
) -> Result<Outcome, PluginError>
where
    C: DeploymentClient + Sync,
{
    let namespace = resolve_namespace(
        &mut deployment,
        namespace_override,
        client.default_namespace(),
    );
    let name = deployment.metadata.name.clone().unwrap_or_default();
    debug!("Looking up deployment {name} in namespace {namespace}");

    match find_deployment(client, &namespace, &name).await? {
        Some(_) => {
            client
                .replace(&namespace, &name, &deployment)
                .await
                .map_err(|source| PluginError::ClusterWrite {
                    action: WriteAction::Update,
                    source,
                })?;
            info!("Updated deployment {name} in namespace {namespace}");
            Ok(Outcome::Updated)
        }
        None => {
            client
                .create(&namespace, &deployment)
                .await
                .map_err(|source| PluginError::ClusterWrite {
                    action: WriteAction::Create,
                    source,
                })?;
            info!("Created deployment {name} in namespace {namespace}");
            Ok(Outcome::Created)
        }
    }
}
