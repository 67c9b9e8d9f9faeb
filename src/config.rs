use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::{
    Dollar, Error, portfolio::Holdings, strategy::parse_investment, target::AllocationPolicy,
};

/// Defaults read from `config.yml`. Command line flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    pub policy: Option<AllocationPolicy>,
    /// New money to invest when `--invest` isn't given.
    pub invest: Option<Dollar>,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "quotidian", "asset-allocation")
            .map(|pdirs| pdirs.config_dir().join("config.yml"))
    }

    /// Loads `path`, or the default location when no path is given. Only a
    /// missing default file is tolerated.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file {path:?}"))?;
        let settings: Settings = serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse config file {path:?}"))?;
        settings.validate()?;
        debug!(?settings, "loaded config");
        Ok(settings)
    }

    /// Picks the policy and new money for a run. Flags win over the config file;
    /// after that the policy comes from the export's file name and invest is 0.
    pub fn resolve(
        &self,
        policy: Option<AllocationPolicy>,
        invest: Option<&str>,
        holdings: &Holdings,
    ) -> Result<(AllocationPolicy, Dollar), Error> {
        let invest = match invest {
            Some(text) => parse_investment(text)?,
            None => self.invest.unwrap_or(0.0),
        };
        let policy = policy
            .or(self.policy)
            .unwrap_or_else(|| AllocationPolicy::from_filename(&holdings.file_name()));
        debug!(?policy, invest, "resolved run settings");
        Ok((policy, invest))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(invest) = self.invest {
            anyhow::ensure!(
                invest.is_finite() && invest >= 0.0,
                "Invest must be a non-negative amount, got {invest}"
            );
        }
        Ok(())
    }
}
