// RustyNES Desktop Application
#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)] // Color conversion from hex
#![allow(clippy::multiple_crate_versions)] // Dependency version conflicts (transitive deps)
#![allow(clippy::doc_markdown)] // README.md formatting

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::{Parser, Subcommand};
use iced::Size;
use rustynes_core::{Console, ConsoleError, RomError};

mod app;
mod audio;
mod config;
mod input;
mod library;
mod message;
mod metrics;
mod theme;
mod view;
mod viewport;
mod views;

/// RustyNES, a cycle-accurate NES emulator.
#[derive(Parser)]
#[command(name = "rustynes-desktop", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Load a ROM and run it in a window.
    Run {
        /// Path to an iNES/NES 2.0 ROM image.
        rom_path: PathBuf,

        /// Integer window scale (window size = 256*N x 240*N).
        #[arg(long, default_value_t = 3)]
        scale: u32,
    },
}

/// ROM path to auto-load at startup, set by the `run` subcommand and
/// consumed once by [`app::RustyNes::new`].
static STARTUP_ROM: OnceLock<PathBuf> = OnceLock::new();

/// Returns the ROM path requested via `rustynes-desktop run <rom-path>`, if any.
pub(crate) fn startup_rom() -> Option<PathBuf> {
    STARTUP_ROM.get().cloned()
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    tracing::info!("Starting RustyNES Desktop v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration to get saved window size
    let mut config = config::AppConfig::load().unwrap_or_default();

    let cli = Cli::parse();
    if let Some(Command::Run { rom_path, scale }) = cli.command {
        match std::fs::read(&rom_path) {
            Ok(rom_data) => match Console::new(&rom_data) {
                Ok(_) => {
                    let _ = STARTUP_ROM.set(rom_path);
                    let dim = scale.max(1) * 256;
                    config.app.window_width = dim;
                    config.app.window_height = (scale.max(1) * 240).max(1);
                }
                Err(ConsoleError::RomError(RomError::UnsupportedMapper(n))) => {
                    tracing::error!("Unsupported mapper: {n}");
                    return ExitCode::from(2);
                }
                Err(e) => {
                    tracing::error!("Failed to load ROM: {e}");
                    return ExitCode::from(1);
                }
            },
            Err(e) => {
                tracing::error!("Failed to read ROM file {}: {e}", rom_path.display());
                return ExitCode::from(1);
            }
        }
    }

    #[allow(clippy::cast_precision_loss)] // u32 to f32 for window size
    let window_size = Size::new(
        config.app.window_width as f32,
        config.app.window_height as f32,
    );

    // Run application using Iced 0.13 API
    let result = iced::application(
        app::RustyNes::title,
        app::RustyNes::update,
        app::RustyNes::view,
    )
    .subscription(app::RustyNes::subscription)
    .theme(app::RustyNes::theme)
    .window_size(window_size)
    .antialiasing(true)
    .run_with(app::RustyNes::new);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            ExitCode::from(1)
        }
    }
}
