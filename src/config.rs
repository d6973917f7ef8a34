use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

pub const DEFAULT_CONFIG_FILE: &str = "cpr-coach.toml";
pub const ENV_PREFIX: &str = "CPR_COACH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_address: String,
    pub port: u16,
    pub max_clients: usize,
    pub supervisor_channel_size: usize,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3344,
            max_clients: 16,
            supervisor_channel_size: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional TOML file, then `CPR_COACH_*` variables.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let file = File::new(path.unwrap_or(DEFAULT_CONFIG_FILE), FileFormat::Toml)
            .required(path.is_some());
        Self::build(
            Config::builder()
                .add_source(file)
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.supervisor_channel_size == 0 {
            return Err(AppError::InvalidConfig(
                "supervisor_channel_size must be positive".to_string(),
            ));
        }
        if self.max_clients == 0 {
            return Err(AppError::InvalidConfig(
                "max_clients must be positive".to_string(),
            ));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<Level, AppError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| AppError::InvalidConfig(format!("unknown log level {}", self.log_level)))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
