use crate::aws::sts::DEFAULT_REGION;
use crate::error::{Error, Result};
use crate::http::api_client::DEFAULT_TIMEOUT;
use crate::openam::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "forgerock-sts";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    provider: ProviderSettings,
    aws: Option<AwsSettings>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    base_uri: String,
    realm: String,
    sp_entity_id: String,
    request_timeout_secs: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AwsSettings {
    region: Option<String>,
    session_duration_secs: Option<i32>,
}

impl AppConfig {
    pub fn new(provider: ProviderSettings) -> Self {
        AppConfig {
            provider,
            aws: None,
        }
    }

    pub fn provider(&self) -> &ProviderSettings {
        &self.provider
    }

    pub fn set_provider(&mut self, provider: ProviderSettings) {
        self.provider = provider;
    }

    pub fn set_region(&mut self, region: String) {
        self.aws.get_or_insert_with(AwsSettings::default).region = Some(region);
    }

    pub fn region(&self) -> String {
        self.aws
            .as_ref()
            .and_then(|aws| aws.region.clone())
            .unwrap_or_else(|| String::from(DEFAULT_REGION))
    }

    pub fn session_duration_secs(&self) -> Option<i32> {
        self.aws.as_ref().and_then(|aws| aws.session_duration_secs)
    }

    pub fn read_config() -> Result<Self> {
        let config_file = AppConfig::config_file()?;
        if !config_file.exists() {
            return Err(Error::Config(String::from(
                "not yet configured - please run the configure sub-command",
            )));
        }

        AppConfig::read_from(&config_file)
    }

    /// The stored configuration, or `None` before the first `configure`.
    pub fn read_existing() -> Result<Option<Self>> {
        let config_file = AppConfig::config_file()?;
        if !config_file.exists() {
            return Ok(None);
        }

        AppConfig::read_from(&config_file).map(Some)
    }

    pub fn write_config(&self) -> Result<()> {
        let config_dir = AppConfig::config_dir()?;
        fs::create_dir_all(config_dir)?;

        self.write_to(&AppConfig::config_file()?)
    }

    fn read_from(path: &Path) -> Result<Self> {
        let config_contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(config_contents.as_str())
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string(&self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, toml)?;

        Ok(())
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config(String::from("could not determine config directory")))?
            .join(APP_NAME);

        Ok(config_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        let config_file = AppConfig::config_dir()?.join("settings.toml");

        Ok(config_file)
    }
}

impl ProviderSettings {
    pub fn new(base_uri: String, realm: String, sp_entity_id: String) -> Result<Self> {
        let mut base_uri = Url::parse(base_uri.trim())?;

        // remove query
        base_uri.set_query(None);

        // remove trailing slash
        base_uri
            .path_segments_mut()
            .map_err(|_| Error::Config(String::from("base uri cannot be a base")))?
            .pop_if_empty();

        let realm = realm.trim().to_string();
        if realm.is_empty() {
            return Err(Error::Config(String::from(
                "cannot specify empty realm, use / for the root realm",
            )));
        }

        let sp_entity_id = sp_entity_id.trim().to_string();
        if sp_entity_id.is_empty() {
            return Err(Error::Config(String::from("cannot specify empty SP entity id")));
        }

        Ok(ProviderSettings {
            base_uri: String::from(base_uri),
            realm,
            sp_entity_id,
            request_timeout_secs: None,
        })
    }

    pub fn base_uri(&self) -> String {
        self.base_uri.clone()
    }

    pub fn realm(&self) -> String {
        self.realm.clone()
    }

    pub fn sp_entity_id(&self) -> String {
        self.sp_entity_id.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn provider_config(&self) -> Result<ProviderConfig> {
        ProviderConfig::new(
            self.base_uri.as_str(),
            self.realm.as_str(),
            self.sp_entity_id.as_str(),
        )
    }
}
