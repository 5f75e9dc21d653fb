use std::path::Path;

use clap::{Args, Parser};
use serde::Serialize;

use crate::error::PluginError;
use crate::extensions::string::NonEmpty;

/// Deploys a templated Kubernetes Deployment from a Drone pipeline step.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct PluginArgs {
    #[command(flatten)]
    pub repo: Repo,
    #[command(flatten)]
    pub build: Build,
    #[command(flatten)]
    pub job: Job,
    #[command(flatten)]
    pub config: Config,
}

#[derive(Args, Clone, Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Repo {
    #[arg(long = "repo-owner", env = "DRONE_REPO_OWNER", default_value = "")]
    pub owner: String,
    #[arg(long = "repo-name", env = "DRONE_REPO_NAME", default_value = "")]
    pub name: String,
}

#[derive(Args, Clone, Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Build {
    #[arg(long = "tag", env = "DRONE_TAG", default_value = "")]
    pub tag: String,
    #[arg(long = "event", env = "DRONE_BUILD_EVENT", default_value = "")]
    pub event: String,
    #[arg(long = "build-number", env = "DRONE_BUILD_NUMBER", default_value_t = 0)]
    pub number: u64,
    #[arg(long = "commit-sha", env = "DRONE_COMMIT_SHA", default_value = "")]
    pub commit: String,
    #[arg(long = "commit-ref", env = "DRONE_COMMIT_REF", default_value = "")]
    pub r#ref: String,
    #[arg(long = "commit-branch", env = "DRONE_COMMIT_BRANCH", default_value = "")]
    pub branch: String,
    #[arg(long = "commit-author", env = "DRONE_COMMIT_AUTHOR", default_value = "")]
    pub author: String,
    #[arg(long = "build-status", env = "DRONE_BUILD_STATUS", default_value = "")]
    pub status: String,
    #[arg(long = "build-link", env = "DRONE_BUILD_LINK", default_value = "")]
    pub link: String,
    #[arg(id = "build_started", long = "build-started", env = "DRONE_BUILD_STARTED", default_value_t = 0)]
    pub started: i64,
    #[arg(long = "build-created", env = "DRONE_BUILD_CREATED", default_value_t = 0)]
    pub created: i64,
}

#[derive(Args, Clone, Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    #[arg(id = "job_started", long = "job-started", env = "DRONE_JOB_STARTED", default_value_t = 0)]
    pub started: i64,
}

/// Connection parameters. Token and CA never reach templates.
#[derive(Args, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[arg(long = "ca", env = "KUBE_CA", default_value = "", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub ca: String,
    #[arg(long = "server", env = "KUBE_SERVER", default_value = "")]
    pub server: String,
    #[arg(long = "token", env = "KUBE_TOKEN", default_value = "", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub token: String,
    #[arg(long = "namespace", env = "KUBE_NAMESPACE", default_value = "")]
    pub namespace: String,
    #[arg(long = "template", env = "KUBE_TEMPLATE", default_value = "")]
    pub template: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("ca", &"<redacted>")
            .field("server", &self.server)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("template", &self.template)
            .finish()
    }
}

impl Config {
    /// Fails on the first missing required field, in server, token, CA, template order.
    pub fn validate(&self) -> Result<(), PluginError> {
        let required = [
            (&self.server, "KUBE_SERVER is not defined"),
            (&self.token, "KUBE_TOKEN is not defined"),
            (&self.ca, "KUBE_CA is not defined"),
            (&self.template, "KUBE_TEMPLATE, or template must be defined"),
        ];
        match required.into_iter().find(|(value, _)| value.non_empty().is_none()) {
            Some((_, message)) => Err(PluginError::MissingConfiguration(message)),
            None => Ok(()),
        }
    }

    pub fn namespace_override(&self) -> Option<&str> {
        self.namespace.non_empty()
    }

    pub fn template_path(&self) -> &Path {
        Path::new(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn complete() -> Config {
        Config {
            ca: "Y2E=".to_string(),
            server: "https://10.0.0.1:6443".to_string(),
            token: "secret".to_string(),
            namespace: String::new(),
            template: "deployment.yaml".to_string(),
        }
    }

    fn missing_message(config: Config) -> &'static str {
        match config.validate() {
            Err(PluginError::MissingConfiguration(message)) => message,
            other => panic!("expected missing configuration, got {other:?}"),
        }
    }

    #[test]
    fn complete_config_is_valid() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn each_required_field_is_reported() {
        let mut config = complete();
        config.server.clear();
        assert_eq!(missing_message(config), "KUBE_SERVER is not defined");

        let mut config = complete();
        config.token.clear();
        assert_eq!(missing_message(config), "KUBE_TOKEN is not defined");

        let mut config = complete();
        config.ca.clear();
        assert_eq!(missing_message(config), "KUBE_CA is not defined");

        let mut config = complete();
        config.template.clear();
        assert_eq!(
            missing_message(config),
            "KUBE_TEMPLATE, or template must be defined"
        );
    }

    #[test]
    fn server_is_checked_before_template() {
        let config = Config::default();
        assert_eq!(missing_message(config), "KUBE_SERVER is not defined");
    }

    #[test]
    fn namespace_is_optional() {
        let mut config = complete();
        assert_eq!(config.namespace_override(), None);
        config.namespace = "staging".to_string();
        assert_eq!(config.namespace_override(), Some("staging"));
    }

    #[test]
    fn flags_are_parsed() {
        let args = PluginArgs::try_parse_from([
            "drone-kube-deploy",
            "--server",
            "https://k8s.local",
            "--token",
            "t0k3n",
            "--ca",
            "Y2E=",
            "--template",
            "k8s/deployment.yaml",
            "--commit-sha",
            "abc123",
            "--build-number",
            "42",
        ])
        .unwrap();

        assert_eq!(args.config.server, "https://k8s.local");
        assert_eq!(args.config.template, "k8s/deployment.yaml");
        assert_eq!(args.build.commit, "abc123");
        assert_eq!(args.build.number, 42);
    }

    #[test]
    fn build_and_job_start_times_are_distinct() {
        PluginArgs::command().debug_assert();

        let args = PluginArgs::try_parse_from([
            "drone-kube-deploy",
            "--build-started",
            "1700000000",
            "--job-started",
            "1700000060",
        ])
        .unwrap();

        assert_eq!(args.build.started, 1700000000);
        assert_eq!(args.job.started, 1700000060);
    }

    #[test]
    fn secrets_are_not_serialized() {
        let value = serde_json::to_value(complete()).unwrap();
        assert!(value.get("Token").is_none());
        assert!(value.get("Ca").is_none());
        assert_eq!(value["Server"], "https://10.0.0.1:6443");
    }
}
