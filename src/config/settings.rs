use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::estimator::{EstimatorPolicy, MENSTRUAL_EXEMPTION_RATIO, SAFETY_MARGIN};

fn default_exemption_ratio() -> f64 {
    MENSTRUAL_EXEMPTION_RATIO
}
fn default_safety_margin() -> f64 {
    SAFETY_MARGIN
}
fn default_daily_rate() -> f64 {
    5.0
}
fn default_fasting_daily_rate() -> f64 {
    1.0
}

/// Policy multipliers used when estimating debt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Share of prayers exempted for women (menstruation), 0..1
    #[serde(default = "default_exemption_ratio")]
    pub exemption_ratio: f64,
    /// Extra margin when the user opts in, e.g. 0.10 = +10%
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            exemption_ratio: default_exemption_ratio(),
            safety_margin: default_safety_margin(),
        }
    }
}

impl EstimatorConfig {
    /// Out-of-range values fall back to the built-in constants.
    pub fn policy(&self) -> EstimatorPolicy {
        let mut policy = EstimatorPolicy::default();
        if (0.0..1.0).contains(&self.exemption_ratio) {
            policy.exemption_ratio = self.exemption_ratio;
        } else {
            log::warn!("Ignoring exemption_ratio {}", self.exemption_ratio);
        }
        if self.safety_margin.is_finite() && self.safety_margin >= 0.0 {
            policy.safety_margin = self.safety_margin;
        } else {
            log::warn!("Ignoring safety_margin {}", self.safety_margin);
        }
        policy
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchUpConfig {
    /// Qada prayers per day used by `project` when no rate is given
    #[serde(default = "default_daily_rate")]
    pub daily_rate: f64,
    #[serde(default = "default_fasting_daily_rate")]
    pub fasting_daily_rate: f64,
}

impl Default for CatchUpConfig {
    fn default() -> Self {
        Self {
            daily_rate: default_daily_rate(),
            fasting_daily_rate: default_fasting_daily_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub catch_up: CatchUpConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "qada")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("qada.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
