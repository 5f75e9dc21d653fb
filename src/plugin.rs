use log::{debug, info};
use serde::Serialize;

use crate::configuration::{Build, Config, Job, PluginArgs, Repo};
use crate::error::PluginError;
use crate::kubernetes::credentials;
use crate::kubernetes::model::DeploymentClient;
use crate::manifest;
use crate::reconciler::{self, Outcome};
use crate::template;

/// Everything one invocation knows. Serialized as the template context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Plugin {
    pub repo: Repo,
    pub build: Build,
    pub config: Config,
    pub job: Job,
}

impl From<PluginArgs> for Plugin {
    fn from(args: PluginArgs) -> Self {
        Plugin {
            repo: args.repo,
            build: args.build,
            config: args.config,
            job: args.job,
        }
    }
}

impl Plugin {
    pub async fn exec(&self) -> Result<Outcome, PluginError> {
        self.config.validate()?;

        info!("Connecting to {}", self.config.server);
        let client = credentials::connect(&self.config).await?;

        self.deploy(&client).await
    }

    /// Render, decode and reconcile against an already authenticated client.
    pub async fn deploy<C>(&self, client: &C) -> Result<Outcome, PluginError>
    where
        C: DeploymentClient + Sync,
    {
        let path = self.config.template_path();
        info!("Rendering deployment template {}", path.display());
        let rendered = template::open_and_render(path, self)?;
        debug!("Rendered manifest:\n{rendered}");

        let deployment = manifest::decode(&rendered)?;

        reconciler::reconcile(client, deployment, self.config.namespace_override()).await
    }
}
