//! # Block World Entry Point
//!
//! Runs the headless fly-over from the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    if let Err(err) = block_world::run() {
        eprintln!("block-world: {err}");
        std::process::exit(1);
    }
}
