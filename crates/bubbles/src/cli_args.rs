//! All the CLI arguments for Bubbles

/// The default name of the main config file.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "bubbles.toml";

/// Bubbles floating up your terminal
#[derive(clap::Parser, Debug, Clone, Default)]
#[command(
    version,
    about,
    long_about = "A little particle engine that fills your terminal with bubbles. Press `q`, `Esc` or `Ctrl-C` to quit."
)]
#[non_exhaustive]
pub struct CliArgs {
    /// Use a different config directory.
    #[arg(long)]
    pub config_dir: Option<std::path::PathBuf>,

    /// The name of the main config file, relative to the config directory.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    pub main_config: std::path::PathBuf,

    /// Where to load the runtime parameters from. Either a path, relative paths being relative to
    /// the config directory, or an `http(s)://` URL. Overrides the config file.
    #[arg(short, long)]
    pub parameters: Option<String>,

    /// Seed the random number generator, for reproducible animations.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the log level from the config file.
    #[arg(long, value_enum)]
    pub log_level: Option<crate::config::main::LogLevel>,

    /// Override the log path from the config file.
    #[arg(long)]
    pub log_path: Option<std::path::PathBuf>,
}
