use std::path::PathBuf;

use bitsybox::demo::DemoCart;
use bitsybox_console::ConsoleConfig;

const DEFAULT_GAME: &str = "boot/boot.bitsy";
const DEFAULT_FONT: &str = "bitsy/font/ascii_small.bitsyfont";

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let game_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_GAME.to_string()));
    let font_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_FONT.to_string()));

    let result = bitsybox::load_blob(Some(&game_path)).and_then(|game_data| {
        let font_data = bitsybox::load_blob(Some(&font_path))?;
        log::info!("Playing game data: '{}'", game_path.display());
        bitsybox::run(ConsoleConfig::default(), &mut DemoCart, game_data, font_data)
    });

    if let Err(e) = result {
        log::error!("*** FATAL ERROR: {:#}", e);
        std::process::exit(1);
    }
}
