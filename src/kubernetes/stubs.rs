use std::sync::Mutex;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::core::ErrorResponse;

use crate::kubernetes::model::{DeploymentClient, DEFAULT_NAMESPACE};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    List(String),
    Create(String, Deployment),
    Replace(String, String, Deployment),
}

/// In-memory cluster that records every call it receives.
pub struct Recording {
    existing: Vec<Deployment>,
    fail_list: bool,
    fail_writes: bool,
    calls: Mutex<Vec<Call>>,
}

impl Recording {
    pub fn empty() -> Recording {
        Recording::with_existing(Vec::new())
    }

    pub fn with_existing(existing: Vec<Deployment>) -> Recording {
        Recording {
            existing,
            fail_list: false,
            fail_writes: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_list() -> Recording {
        Recording {
            fail_list: true,
            ..Recording::empty()
        }
    }

    pub fn failing_writes(existing: Vec<Deployment>) -> Recording {
        Recording {
            fail_writes: true,
            ..Recording::with_existing(existing)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn forbidden() -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: "deployments.apps is forbidden".to_string(),
        reason: "Forbidden".to_string(),
        code: 403,
    })
}

#[async_trait]
impl DeploymentClient for Recording {
    fn default_namespace(&self) -> &str {
        DEFAULT_NAMESPACE
    }

    async fn list(&self, namespace: &str) -> Result<Vec<Deployment>, kube::Error> {
        self.record(Call::List(namespace.to_string()));
        if self.fail_list {
            return Err(forbidden());
        }
        Ok(self
            .existing
            .iter()
            .filter(|d| d.metadata.namespace.as_deref() == Some(namespace))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error> {
        self.record(Call::Create(namespace.to_string(), deployment.clone()));
        if self.fail_writes {
            return Err(forbidden());
        }
        Ok(deployment.clone())
    }

    async fn replace(
        &self,
        namespace: &str,
        name: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, kube::Error> {
        self.record(Call::Replace(
            namespace.to_string(),
            name.to_string(),
            deployment.clone(),
        ));
        if self.fail_writes {
            return Err(forbidden());
        }
        Ok(deployment.clone())
    }
}

pub fn deployment(name: &str, namespace: Option<&str>) -> Deployment {
    let mut deployment = Deployment::default();
    deployment.metadata.name = Some(name.to_string());
    deployment.metadata.namespace = namespace.map(str::to_string);
    deployment
}
