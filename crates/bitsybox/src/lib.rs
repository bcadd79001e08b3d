use std::path::Path;

use anyhow::{Context, Result};
use bitsybox_console::script;
use bitsybox_console::{ConsoleConfig, Host, ScriptEngine, Synth};
use bitsybox_sdl2::{SdlContext, SdlInitInfo};

pub mod demo;

/// Boot `engine` on a fresh console and run it in an SDL window.
pub fn run(
    config: ConsoleConfig,
    engine: &mut dyn ScriptEngine,
    game_data: String,
    font_data: String,
) -> Result<()> {
    let (host, synth) = boot(&config, engine, game_data, font_data)?;
    let init_info = SdlInitInfo::builder().config(config).build();
    SdlContext::run(init_info, host, synth)
}

/// A fresh console with `engine` booted on it. A script error during boot
/// is logged and the console still comes up; only engine faults fail.
pub fn boot(
    config: &ConsoleConfig,
    engine: &mut dyn ScriptEngine,
    game_data: String,
    font_data: String,
) -> Result<(Host, Synth)> {
    let (mut host, synth) = Host::new(config);
    host.load_data(game_data, font_data);
    log::info!("booting {}", engine.name());
    let booted = engine
        .boot(&mut host)
        .with_context(|| format!("boot {}", engine.name()));
    script::recover("boot", booted)?;
    Ok((host, synth))
}

/// Read an optional text blob. A missing path is an empty blob; a path that
/// can't be read is an error.
pub fn load_blob(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };
    if !path.exists() {
        log::info!("'{}' not found, using empty data", path.display());
        return Ok(String::new());
    }
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}
