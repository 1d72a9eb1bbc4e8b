use crate::prelude::*;

use crate::ecu::model::{DispatchKind, DispatchStrategy};

use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    /// How device channel layouts are picked; depends on ECU firmware
    #[serde(default)]
    pub dispatch: DispatchKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: Self::default_loglevel(),
            dispatch: DispatchKind::default(),
        }
    }
}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| file_error_with_source!(err, "error reading {}", file))?;

        Self::from_yaml(&content)
    }

    /// Like [`Config::new`], but a missing file gives the defaults.
    pub fn load_or_default(file: &str) -> Result<Self> {
        if std::path::Path::new(file).exists() {
            Self::new(file.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if log::LevelFilter::from_str(&self.loglevel).is_err() {
            return Err(file_error!("invalid loglevel {:?}", self.loglevel));
        }

        Ok(())
    }

    pub fn log_summary(&self) {
        info!("Configuration:");
        info!("  Log Level: {}", self.loglevel);
        info!("  Dispatch: {:?}", self.dispatch);
    }

    pub fn loglevel(&self) -> &str {
        &self.loglevel
    }

    pub fn dispatch_strategy(&self) -> DispatchStrategy {
        self.dispatch.into()
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }
}
