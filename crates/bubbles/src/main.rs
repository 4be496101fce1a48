//! Just `main()`. Keep as small as possible.

use color_eyre::eyre::Result;

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "It's our central place for communicating with the user on CLI"
)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let lifecycle = bubbles::animation::Lifecycle::new();
    let settings = bubbles::run::setup()?;
    let result = bubbles::run::run(&lifecycle, &settings).await;

    let logpath = settings.log_path();
    tracing::debug!("Bubbles is exiting");

    match result {
        Ok(()) => {
            if settings.is_logging {
                println!("Logs saved to {}", logpath.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            eprintln!("Error: {error}");
            if settings.is_logging {
                eprintln!("See {} for more details", logpath.display());
            }
        }
    }

    Ok(())
}
