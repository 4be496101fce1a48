//! Main entrypoint for running Bubbles

use clap::Parser as _;
use color_eyre::eyre::{ContextCompat as _, Result};
use rand::SeedableRng as _;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, Layer as _};

use crate::animation::{Animation, Lifecycle};
use crate::cli_args::CliArgs;
use crate::config::main::{Config, LogLevel};
use crate::config::preset::Preset;
use crate::parameters::ParameterSource;
use crate::simulation::engine::Tick;
use crate::terminal::host::{FrameTicker, TerminalHost};
use crate::terminal::raster::RasterCanvas;
use crate::terminal::renderer::Renderer;
use crate::terminal::surface::Surface;

/// Everything worked out before the terminal is taken over.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Settings {
    /// The parsed CLI arguments.
    pub cli_args: CliArgs,
    /// The loaded config file.
    pub config: Config,
    /// Where the config lives. Relative parameter paths are relative to this.
    pub config_directory: std::path::PathBuf,
    /// Whether a log file is being written.
    pub is_logging: bool,
}

impl Settings {
    /// Where the log file is, CLI override included.
    #[must_use]
    pub fn log_path(&self) -> std::path::PathBuf {
        self.cli_args
            .log_path
            .clone()
            .unwrap_or_else(|| self.config.log_path.clone())
    }

    /// Where the runtime parameters come from.
    pub fn parameter_source(&self) -> Result<ParameterSource> {
        let location = self
            .cli_args
            .parameters
            .as_deref()
            .unwrap_or(&self.config.parameters);
        Ok(ParameterSource::resolve(
            location,
            Some(&self.config_directory),
        )?)
    }

    /// A seeded random source when asked for one, otherwise seeded from the OS.
    #[must_use]
    pub fn rng(&self) -> rand::rngs::StdRng {
        match self.cli_args.seed {
            Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
            None => rand::rngs::StdRng::from_entropy(),
        }
    }
}

/// Prepare the application to start.
pub fn setup() -> Result<Settings> {
    let cli_args = CliArgs::parse();
    prepare(cli_args)
}

/// Set up the config directory, the config and logging from already parsed CLI arguments.
pub fn prepare(cli_args: CliArgs) -> Result<Settings> {
    let directory_result = Config::setup_directory(cli_args.config_dir.clone());
    let config_directory = match directory_result {
        Ok(directory) => directory,
        Err(directory_error) => {
            color_eyre::eyre::bail!("Error setting up config directory: {directory_error:?}");
        }
    };

    let config = match Config::load(&config_directory, &cli_args.main_config) {
        Ok(config) => config,
        Err(config_error) => {
            let path = config_directory.join(&cli_args.main_config);
            color_eyre::eyre::bail!(
                "Bad config file: {config_error:?}\n\nConfig path: {}",
                path.display()
            );
        }
    };

    let mut settings = Settings {
        cli_args,
        config,
        config_directory,
        is_logging: false,
    };
    settings.is_logging = setup_logging(&settings)?;

    tracing::info!("Starting Bubbles");
    tracing::debug!("Loaded config: {:?}", settings.config);

    Ok(settings)
}

/// Setup logging. Returns whether anything is being logged at all.
fn setup_logging(settings: &Settings) -> Result<bool> {
    let are_log_filters_manually_set = std::env::var("BUBBLES_LOG").is_ok();
    let path = settings.log_path();

    let mut level = settings.config.log_level.clone();
    if let Some(cli_override_level) = settings.cli_args.log_level.clone() {
        level = cli_override_level;
    }
    let level_as_string = format!("{level:?}").to_lowercase();

    let is_loggable = !matches!(level, LogLevel::Off) || are_log_filters_manually_set;
    if !is_loggable {
        return Ok(false);
    }

    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(path)?;

    let filters = if are_log_filters_manually_set {
        if let Ok(user_filters) = std::env::var("BUBBLES_LOG") {
            std::env::set_var("RUST_LOG", user_filters);
        }

        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("off".parse()?)
            .from_env_lossy()
            .add_directive(format!("bubbles={level_as_string}").parse()?)
            .add_directive(format!("tests={level_as_string}").parse()?)
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);

    tracing_subscriber::registry().with(logfile_layer).try_init()?;

    Ok(true)
}

/// Take over the user's terminal and animate bubbles in it until they quit.
pub async fn run(lifecycle: &Lifecycle, settings: &Settings) -> Result<()> {
    let source = settings.parameter_source()?;

    // The half-block pixels need true colour.
    std::env::set_var("COLORTERM", "truecolor");

    let mut renderer = Renderer::new()?;
    let result = animate(lifecycle, settings, &source, &mut renderer).await;

    // This has to happen whatever the result, otherwise the user is left with a broken terminal.
    let restore_result = renderer.restore();
    result?;
    restore_result?;

    tracing::trace!("Leaving Bubbles' main `run()` function");
    Ok(())
}

/// The render loop.
/// It lives in its own function so that any errors can be caught and the user's terminal is
/// always returned to cooked mode.
async fn animate(
    lifecycle: &Lifecycle,
    settings: &Settings,
    source: &ParameterSource,
    renderer: &mut Renderer,
) -> Result<()> {
    let (columns, rows) = renderer.size();
    let mut host = TerminalHost::new(
        columns,
        rows,
        settings.config.cell_size,
        settings.config.device_pixel_ratio,
    );

    let maybe_animation = Animation::start(
        lifecycle,
        &mut host,
        source,
        Preset::default(),
        settings.rng(),
    )
    .await;
    let Some(mut animation) = maybe_animation else {
        return Ok(());
    };

    let mut ticker = FrameTicker::new(settings.config.frame_rate);
    tracing::debug!("Starting render loop");
    loop {
        ticker.sleep_until_next_frame_tick().await;

        if renderer.is_quit_requested()? {
            break;
        }

        if let Err(error) = frame(&mut animation, &mut host, renderer) {
            tracing::error!("Rendering frame: {error:?}");
        }
    }
    tracing::debug!("Exited render loop");

    Ok(())
}

/// Handle any resize, step the engine and show the result.
fn frame<R: rand::Rng>(
    animation: &mut Animation<RasterCanvas, R>,
    host: &mut TerminalHost,
    renderer: &mut Renderer,
) -> Result<Tick> {
    if let Some((columns, rows)) = renderer.check_for_resize()? {
        host.resize(columns, rows);
        animation
            .surface_mut()
            .canvas_mut()
            .layout(host.client_size());
        animation.resize();
    }

    let tick = animation.frame(tokio::time::Instant::now());
    let surface = Surface::from_raster(animation.surface().canvas(), host.columns, host.rows);
    renderer.render(&surface)?;

    Ok(tick)
}
