use anyhow::{Context, Result};
use pocketboy_gb::Emulator;

fn main() -> Result<()> {
    env_logger::init();

    let rom_path = std::env::args()
        .nth(1)
        .context("usage: pocketboy <rom-file>")?;
    let image = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM file '{rom_path}'"))?;

    let mut emulator = Emulator::new();
    emulator.load_image(&image);
    log::info!("running '{}' ({} bytes)", rom_path, image.len());

    // The run loop has no successful exit; the first fatal condition ends
    // the process.
    Err(emulator.run().into())
}
