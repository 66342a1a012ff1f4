#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Block World
//!
//! A chunked voxel world engine: procedural terrain, visibility-driven chunk
//! streaming and single-voxel editing, independent of any graphics API.
//!
//! ## Key Modules
//!
//! * `config` - World parameters and their JSON loader
//! * `engine_state` - The engine components: voxels, meshing, streaming and editing
//!
//! ## Architecture
//!
//! The engine is split into:
//! * Voxel data management and terrain generation
//! * Mesh building into instanced cube batches
//! * A render surface seam that geometry is attached to and detached from
//! * Frame-driven streaming and synchronous edits
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(err) = block_world::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use log::info;

pub mod config;
mod demo;
pub mod engine_state;

pub use demo::{fly_over, DemoSummary};

use config::{ConfigError, WorldConfig};

/// Number of frames the headless fly-over simulates.
pub const DEMO_FRAMES: u32 = 600;

/// Initializes logging and runs the headless fly-over.
///
/// The first command line argument, if present, is the path of a JSON
/// [`WorldConfig`].
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading world config from {}", path);
            WorldConfig::load(&path)?
        }
        None => WorldConfig::default(),
    };

    let summary = fly_over(config, DEMO_FRAMES);
    info!(
        "Flew {} frames: {} streaming passes, {} chunks with geometry, {} resident chunks, {} instances",
        summary.frames,
        summary.streaming_passes,
        summary.resident_geometry,
        summary.resident_chunks,
        summary.instances
    );
    Ok(())
}
