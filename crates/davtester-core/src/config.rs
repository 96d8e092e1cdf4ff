use std::path::PathBuf;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{CONFIG_FILE_STEM, ENV_PREFIX};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub run: RunConfig,
    pub logging: LoggingConfig,
}

/// Observers that can be attached to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverKind {
    /// Renders notifications as tracing events.
    Logging,
    /// Writes a JSON results tree when the run finishes.
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub server_info: PathBuf,
    #[serde(default)]
    pub tests: Vec<PathBuf>,
    pub data_dir: PathBuf,
    pub pretest: Option<PathBuf>,
    pub posttest: Option<PathBuf>,
    pub stop_on_fail: bool,
    pub all: bool,
    pub ssl: bool,
    pub observers: Vec<ObserverKind>,
    pub json_output: Option<PathBuf>,
}

impl RunConfig {
    /// ## Summary
    /// Resolves a configured path against the data directory.
    #[must_use]
    pub fn data_path(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// ## Errors
    /// Returns an error if the `json` observer has no output path or a hook
    /// file is also listed as a test file.
    pub fn validate(&self) -> CoreResult<()> {
        if self.observers.contains(&ObserverKind::Json) && self.json_output.is_none() {
            return Err(CoreError::MissingSetting("run.json_output"));
        }
        for hook in [&self.pretest, &self.posttest].into_iter().flatten() {
            if self.tests.contains(hook) {
                return Err(CoreError::InvalidSetting {
                    name: "run.tests",
                    reason: format!("{} is also a hook file", hook.display()),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file, environment variables and
    /// `davtester.toml` into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it
    /// fails, or the settings are inconsistent.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::with_name(CONFIG_FILE_STEM).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("run.tests")
                    .with_list_parse_key("run.observers"),
            )
            .build()?
            .try_deserialize::<Settings>()?
            .validated()?)
    }

    /// ## Summary
    /// Loads configuration from a TOML string on top of the defaults.
    ///
    /// ## Errors
    /// Returns an error if the TOML is invalid or does not deserialize.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?
            .validated()?)
    }

    fn validated(self) -> CoreResult<Self> {
        self.run.validate()?;
        Ok(self)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("run.server_info", "scripts/server/serverinfo.xml")?
            .set_default("run.tests", Vec::<String>::new())?
            .set_default("run.data_dir", ".")?
            .set_default("run.stop_on_fail", false)?
            .set_default("run.all", false)?
            .set_default("run.ssl", false)?
            .set_default("run.observers", vec!["logging"])?
            .set_default("logging.level", "info")?)
    }
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and `davtester.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
