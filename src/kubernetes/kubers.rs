use async_trait::async_trait;

use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{ListParams, PostParams};
use kube_client::{Api, Client};

use crate::kubernetes::model::DeploymentClient;

pub struct KubeRsBased {
    client: Client,
    default_namespace: String,
}

impl KubeRsBased {
    /// `default_namespace` comes from the resolved client config.
    pub fn new(client: Client, default_namespace: String) -> KubeRsBased {
        KubeRsBased {
            client,
            default_namespace,
        }
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl DeploymentClient for KubeRsBased {
    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    async fn list(&self, namespace: &str) -> Result<Vec<Deployment>, kube::Error> {
        let deployments = self
            .deployments(namespace)
            .list(&ListParams::default())
            .await?;
        Ok(deployments.items)
    }

    async fn create(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error> {
        self.deployments(namespace)
            .create(&PostParams::default(), deployment)
            .await
    }

    async fn replace(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error> {
        self.deployments(namespace)
            .replace(name, &PostParams::default(), deployment)
            .await
    }
}
