mod configuration;
mod error;
mod extensions;
mod kubernetes;
mod manifest;
mod plugin;
mod reconciler;
mod template;

use clap::Parser;
use env_logger::Env;
use log::info;

use crate::configuration::PluginArgs;
use crate::plugin::Plugin;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let plugin: Plugin = PluginArgs::parse().into();
    let outcome = plugin.exec().await?;
    info!("Deployment finished: {outcome:?}");

    Ok(())
}
