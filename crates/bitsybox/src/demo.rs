//! Built-in cartridge used when no script engine is plugged in. It walks
//! through the host API: palette, tiles, maps, the textbox, a pulse-wave
//! player in map mode and a painter in video mode (Menu switches between
//! the two).

use anyhow::Result;

use bitsybox_console::{
    Host, ScriptEngine, SoundArgs, TextboxArgs, BTN_DOWN, BTN_LEFT, BTN_MENU, BTN_OK, BTN_RIGHT,
    BTN_UP, GFX_MAP, GFX_VIDEO, MAP1, MAP_SIZE, PULSE_1_2, PULSE_1_8, SOUND1, SOUND2, TEXTBOX,
    TILE_SIZE, VIDEO, VIDEO_SIZE,
};

const BLACK: i32 = 0;
const RED: i32 = 1;
const GREEN: i32 = 2;
const BLUE: i32 = 3;
const WHITE: i32 = 4;

const TEXTBOX_WIDTH: i32 = 200;
const TEXTBOX_HEIGHT: i32 = 100;
const NOTE_MS: i32 = 2000;
const NOTE_VOLUME: i32 = 7;

#[derive(Debug, Default)]
pub struct DemoCart;

impl ScriptEngine for DemoCart {
    fn name(&self) -> &str {
        "demo"
    }

    fn boot(&mut self, host: &mut Host) -> Result<()> {
        host.graphics_mode(Some(GFX_VIDEO));
        host.color(BLACK, 0, 0, 0);
        host.color(RED, 255, 0, 0);
        host.color(GREEN, 0, 255, 0);
        host.color(BLUE, 0, 0, 255);
        host.color(WHITE, 255, 255, 255);
        host.fill(VIDEO as i32, BLACK);

        host.graphics_mode(Some(GFX_MAP));
        match build_tiles(host) {
            Some(tiles) => draw_map(host, tiles),
            None => host.log("tile table full"),
        }
        draw_textbox(host);

        let mut demo = DemoState::default();
        host.set_loop(Box::new(move |host, delta| demo.frame(host, delta)));
        Ok(())
    }
}

/// Three solid tiles, with one delete in the middle to show handle reuse.
/// `None` once the tile table runs out.
fn build_tiles(host: &mut Host) -> Option<[i32; 3]> {
    let mut solid = |color| {
        let tile = host.tile()?;
        host.fill(tile, color);
        Some(tile)
    };
    let tiles = [solid(RED)?, solid(GREEN)?, solid(BLUE)?];
    host.log(&format!("tiles {}", tiles[2]));

    let extra = host.tile()?;
    host.log(&format!("add tile {}", extra));
    let spare = host.tile()?;
    host.log(&format!("add tile {}", spare));
    host.delete(extra);
    let reused = host.tile()?;
    host.log(&format!("add tile after delete {}", reused));

    let edge = TILE_SIZE as i32;
    for index in [0, edge - 1, edge * edge - 1] {
        host.set(tiles[0], index, WHITE);
    }
    Some(tiles)
}

fn draw_map(host: &mut Host, [first, second, third]: [i32; 3]) {
    let map = MAP1 as i32;
    let edge = MAP_SIZE as i32;
    host.fill(map, 0);
    host.set(map, 0, first);
    host.set(map, edge - 1, second);
    host.set(map, edge * edge - 1, third);
}

fn draw_textbox(host: &mut Host) {
    host.textbox(TextboxArgs::Rect {
        visible: true,
        x: 8,
        y: 0,
        width: TEXTBOX_WIDTH,
        height: TEXTBOX_HEIGHT,
    });
    host.fill(TEXTBOX as i32, WHITE);
    for step in 0..4 {
        host.set(TEXTBOX as i32, TEXTBOX_WIDTH * step + step, BLACK);
    }
}

/// Edge detection for the buttons the demo reacts to once per press.
#[derive(Debug, Default, Clone, Copy)]
struct Held {
    up: bool,
    down: bool,
    ok: bool,
    menu: bool,
}

impl Held {
    fn read(host: &Host) -> Self {
        Self {
            up: host.button(BTN_UP),
            down: host.button(BTN_DOWN),
            ok: host.button(BTN_OK),
            menu: host.button(BTN_MENU),
        }
    }
}

#[derive(Debug)]
struct DemoState {
    painting: bool,
    pixel: i32,
    frequency_dhz: i32,
    channel: i32,
    pulse: i32,
    held: Held,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            painting: false,
            pixel: 0,
            frequency_dhz: 44_000,
            channel: SOUND1,
            pulse: PULSE_1_2,
            held: Held::default(),
        }
    }
}

impl DemoState {
    fn frame(&mut self, host: &mut Host, _delta_ms: u32) -> Result<()> {
        let now = Held::read(host);
        if now.menu && !self.held.menu {
            self.painting = !self.painting;
            host.graphics_mode(Some(if self.painting { GFX_VIDEO } else { GFX_MAP }));
        }

        if self.painting {
            self.paint(host);
        } else {
            self.play(host, now);
        }
        self.held = now;
        Ok(())
    }

    fn paint(&mut self, host: &mut Host) {
        let video = VIDEO as i32;
        let color = [
            (BTN_UP, BLACK),
            (BTN_DOWN, RED),
            (BTN_LEFT, GREEN),
            (BTN_RIGHT, BLUE),
        ]
        .into_iter()
        .find(|&(button, _)| host.button(button));
        if let Some((_, color)) = color {
            host.fill(video, color);
        }

        let mouse = host.mouse();
        if mouse.hover && (mouse.down || mouse.alt) {
            let ink = if mouse.down { WHITE } else { BLACK };
            host.set(video, mouse.y * VIDEO_SIZE as i32 + mouse.x, ink);
        }

        // slow white sweep
        host.set(video, self.pixel, WHITE);
        self.pixel = (self.pixel + 1) % (VIDEO_SIZE * VIDEO_SIZE) as i32;
    }

    fn play(&mut self, host: &mut Host, now: Held) {
        if now.up && !self.held.up {
            self.frequency_dhz = self.frequency_dhz.saturating_mul(2);
        } else if now.down && !self.held.down {
            self.frequency_dhz = (self.frequency_dhz / 2).max(1);
        }

        if host.button(BTN_LEFT) {
            self.channel = SOUND1;
            self.pulse = PULSE_1_2;
        } else if host.button(BTN_RIGHT) {
            self.channel = SOUND2;
            self.pulse = PULSE_1_8;
        }

        if now.ok && !self.held.ok {
            host.log(&format!(
                "note {} dHz on channel {}",
                self.frequency_dhz, self.channel
            ));
            host.sound(
                self.channel,
                SoundArgs::Duty {
                    duration_ms: NOTE_MS,
                    frequency_dhz: self.frequency_dhz,
                    volume: NOTE_VOLUME,
                    duty: self.pulse,
                },
            );
        }
    }
}
