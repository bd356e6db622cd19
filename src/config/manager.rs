use super::{search::SearchConfig, traits::ConfigSection};
use crate::error::SigcomboError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Environment overrides look like `SIGCOMBO_SEARCH__POP_SIZE=80`
pub const ENV_PREFIX: &str = "SIGCOMBO";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), SigcomboError> {
        self.search.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SigcomboError> {
        self.load(Some(path.as_ref()))
    }

    /// Layer defaults, an optional TOML file and `SIGCOMBO_*` variables
    pub fn load(&self, path: Option<&Path>) -> Result<(), SigcomboError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(SigcomboError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder
                .add_source(::config::File::from(path).format(::config::FileFormat::Toml));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        log::debug!(
            "Loaded [{}] configuration: {:?}",
            SearchConfig::section_name(),
            config.search
        );
        *self.write()? = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SigcomboError> {
        let config = self.read()?;
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| SigcomboError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| SigcomboError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> Result<AppConfig, SigcomboError> {
        Ok(self.read()?.clone())
    }

    pub fn update<F>(&self, f: F) -> Result<(), SigcomboError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.write()?;
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, AppConfig>, SigcomboError> {
        self.config
            .read()
            .map_err(|_| SigcomboError::Configuration("Config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AppConfig>, SigcomboError> {
        self.config
            .write()
            .map_err(|_| SigcomboError::Configuration("Config lock poisoned".to_string()))
    }
}
