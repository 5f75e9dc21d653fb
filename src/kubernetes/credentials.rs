use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use kube_client::config::{
    AuthInfo, Cluster, Context, KubeConfigOptions, Kubeconfig, NamedAuthInfo, NamedCluster,
    NamedContext,
};
use kube_client::{Client, Config};

use crate::configuration;
use crate::error::PluginError;
use crate::kubernetes::kubers::KubeRsBased;
use crate::kubernetes::model::DEFAULT_NAMESPACE;

/// Name shared by the single cluster, user and context entries.
pub const CONTEXT_NAME: &str = "drone";

/// One cluster, one token user and the context binding them.
/// Built per invocation and never written to disk.
pub struct CredentialSet {
    server: String,
    token: String,
    certificate_authority: Vec<u8>,
}

impl CredentialSet {
    /// Decodes the base64 CA. Embedded whitespace (line-wrapped secrets) is ignored.
    pub fn decode(server: &str, token: &str, ca: &str) -> Result<CredentialSet, PluginError> {
        let compact: String = ca.split_whitespace().collect();
        let certificate_authority = STANDARD
            .decode(compact)
            .map_err(PluginError::CredentialDecode)?;

        Ok(CredentialSet {
            server: server.to_string(),
            token: token.to_string(),
            certificate_authority,
        })
    }

    pub fn to_kubeconfig(&self) -> Kubeconfig {
        Kubeconfig {
            clusters: vec![NamedCluster {
                name: CONTEXT_NAME.to_string(),
                cluster: Some(Cluster {
                    server: Some(self.server.clone()),
                    certificate_authority_data: Some(STANDARD.encode(&self.certificate_authority)),
                    ..Default::default()
                }),
            }],
            auth_infos: vec![NamedAuthInfo {
                name: CONTEXT_NAME.to_string(),
                auth_info: Some(AuthInfo {
                    token: Some(self.token.clone().into()),
                    ..Default::default()
                }),
            }],
            contexts: vec![NamedContext {
                name: CONTEXT_NAME.to_string(),
                context: Some(Context {
                    cluster: CONTEXT_NAME.to_string(),
                    user: CONTEXT_NAME.to_string(),
                    namespace: Some(DEFAULT_NAMESPACE.to_string()),
                    ..Default::default()
                }),
            }],
            current_context: Some(CONTEXT_NAME.to_string()),
            kind: Some("Config".to_string()),
            api_version: Some("v1".to_string()),
            ..Default::default()
        }
    }
}

/// Builds an authenticated client from the connection parameters.
pub async fn connect(config: &configuration::Config) -> Result<KubeRsBased, PluginError> {
    let credentials = CredentialSet::decode(&config.server, &config.token, &config.ca)?;
    let kubeconfig = credentials.to_kubeconfig();

    let options = KubeConfigOptions {
        context: Some(CONTEXT_NAME.to_string()),
        ..Default::default()
    };
    let client_config = Config::from_custom_kubeconfig(kubeconfig, &options)
        .await
        .map_err(|e| PluginError::ClientConstruction(Box::new(e)))?;

    let default_namespace = client_config.default_namespace.clone();
    let client =
        Client::try_from(client_config).map_err(|e| PluginError::ClientConstruction(Box::new(e)))?;

    Ok(KubeRsBased::new(client, default_namespace))
}
