//! Bubbles: a small time-stepped particle engine, and a terminal host to show it off.
//!
//! The engine itself knows nothing about terminals. It draws onto anything that implements
//! [`canvas::Canvas`] and finds that canvas through a [`canvas::Host`]. The `terminal` modules are
//! just one such host.

pub mod animation;
pub mod canvas;
pub mod cli_args;
/// All the configuration: the app's own TOML config and the engine's preset.
pub mod config {
    pub mod main;
    pub mod preset;
}
pub mod parameters;
pub mod run;
/// The particles and everything that moves them.
pub mod simulation {
    pub mod bounds;
    pub mod emitter;
    pub mod engine;
    pub mod particle;
}
/// Hosting the engine inside the user's terminal.
pub mod terminal {
    pub mod host;
    pub mod raster;
    pub mod renderer;
    pub mod surface;
}
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;
