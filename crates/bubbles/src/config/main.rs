//! All of the user config for Bubbles.

use color_eyre::eyre::ContextCompat as _;
use color_eyre::eyre::Result;

/// A copy of the default config file. It gets copied to the user's config folder the first time
/// they start Bubbles.
static DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// The valid log levels. Based on our `tracing` crate.
#[derive(serde::Deserialize, clap::ValueEnum, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LogLevel {
    /// Error
    Error,
    /// Warnings
    Warn,
    /// Info
    Info,
    /// Debug
    Debug,
    /// Trace
    Trace,
    /// No logging
    Off,
}

/// Managing user config.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: std::path::PathBuf,
    /// Target frame rate
    pub frame_rate: u32,
    /// Where to load the runtime parameters from.
    pub parameters: String,
    /// Logical pixels per terminal cell, `[width, height]`.
    pub cell_size: (f64, f64),
    /// The device pixel ratio reported to the engine.
    pub device_pixel_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        let log_directory = match dirs::state_dir() {
            Some(directory) => directory,
            None => std::path::PathBuf::new().join("./"),
        };
        let log_path = log_directory.join("bubbles").join("bubbles.log");

        Self {
            log_level: LogLevel::Off,
            log_path,
            frame_rate: 30,
            parameters: "parameter.json".into(),
            cell_size: (8.0, 16.0),
            device_pixel_ratio: 1.0,
        }
    }
}

impl Config {
    /// Get the stable location of Bubbles' config directory on the user's system.
    pub fn default_directory() -> Result<std::path::PathBuf> {
        Ok(dirs::config_dir()
            .context("Couldn't get standard config directory")?
            .join("bubbles"))
    }

    /// Figure out where our config is being stored, and create the directory if needed.
    pub fn setup_directory(
        maybe_custom_path: Option<std::path::PathBuf>,
    ) -> Result<std::path::PathBuf> {
        let path = match maybe_custom_path {
            None => Self::default_directory()?,
            Some(custom_path) => custom_path,
        };

        std::fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Load the main config. The default config is written out first if it's the one being asked
    /// for and it doesn't exist yet.
    pub fn load(
        directory: &std::path::Path,
        main_config_file: &std::path::Path,
    ) -> Result<Self> {
        let config_path = directory.join(main_config_file);
        let config_file_name = config_path
            .file_name()
            .context("Couldn't get file name from config path")?;
        let is_default_config = config_file_name == crate::cli_args::DEFAULT_CONFIG_FILE_NAME;
        if is_default_config && !config_path.exists() {
            tracing::debug!("Writing default config to {config_path:?}");
            std::fs::write(&config_path, DEFAULT_CONFIG)?;
        }

        tracing::info!("Loading the main Bubbles config from: {config_path:?}");
        let result = std::fs::read_to_string(&config_path);
        match result {
            Ok(data) => {
                tracing::trace!("Using config file:\n{data}");
                Ok(toml::from_str::<Self>(&data)?)
            }
            Err(err) => {
                color_eyre::eyre::bail!("Couldn't load config at {config_path:?}: {err}");
            }
        }
    }
}
