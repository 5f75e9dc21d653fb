use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;

/// Namespace used when neither the manifest nor the configuration names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// The slice of the cluster API needed to create or replace a Deployment.
#[async_trait]
pub trait DeploymentClient {
    fn default_namespace(&self) -> &str;

    async fn list(&self, namespace: &str) -> Result<Vec<Deployment>, kube::Error>;

    async fn create(&self, namespace: &str, deployment: &Deployment)
        -> Result<Deployment, kube::Error>;

    /// Full replace of the named deployment.
    async fn replace(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error>;
}
