use crate::utils::{value_or_ask, TerminalPrompter};
use anyhow::{Context, Result};
use clap::Parser;
use forgerock_sts::settings::{AppConfig, ProviderSettings};
use log::info;

/// Saves where the identity provider lives
#[derive(Parser)]
pub struct Configure {
    #[arg(long)]
    base_uri: Option<String>,
    /// Realm the users log into, `/` for the root realm
    #[arg(long)]
    realm: Option<String>,
    #[arg(long)]
    sp_entity_id: Option<String>,
    /// STS region, us-east-1 when never set
    #[arg(long)]
    region: Option<String>,
}

impl Configure {
    pub fn run(&self) -> Result<()> {
        let prompter = TerminalPrompter;

        let base_uri = value_or_ask(&prompter, &self.base_uri, "Base URI:")?;
        let realm = value_or_ask(&prompter, &self.realm, "Meta Alias/Realm:")?;
        let sp_entity_id = value_or_ask(&prompter, &self.sp_entity_id, "SP Entity ID:")?;

        let provider = ProviderSettings::new(base_uri, realm, sp_entity_id)
            .context("invalid provider settings")?;

        let mut settings = match AppConfig::read_existing()? {
            Some(mut settings) => {
                settings.set_provider(provider);
                settings
            }
            None => AppConfig::new(provider),
        };
        if let Some(region) = &self.region {
            settings.set_region(region.clone());
        }

        settings
            .write_config()
            .context("failed to save configuration")?;
        info!("saved configuration to {}", AppConfig::config_file()?.display());

        Ok(())
    }
}
