//! The call surface scripts see.
//!
//! Every call validates its arguments and silently does nothing when they
//! are out of range. The only errors that cross this boundary are engine
//! faults raised by the engine's own callbacks.

use anyhow::Result;

use crate::audio::{SampleClock, SoundCommand, SoundController, Synth};
use crate::config::ConsoleConfig;
use crate::input::{InputAggregator, MouseState};
use crate::script;
use crate::state::{ConsoleState, GraphicsMode, TextMode};
use crate::{Button, CHANNEL_COUNT, TILE_START, VIDEO_SIZE};

/// Per-frame entry point, called with the frame delta in milliseconds.
pub type LoopCallback = Box<dyn FnMut(&mut Host, u32) -> Result<()>>;
pub type QuitCallback = Box<dyn FnOnce(&mut Host) -> Result<()>>;

/// Largest textbox edge, in textbox pixels.
pub const TEXTBOX_MAX: i32 = (VIDEO_SIZE * 4) as i32;
const VOLUME_MAX: i32 = 15;
const DUTY_MAX: i32 = 2;

/// `textbox(...)` call shapes. Trailing groups that are left out keep their
/// current values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextboxArgs {
    Unchanged,
    Visible(bool),
    Position {
        visible: bool,
        x: i32,
        y: i32,
    },
    /// Also recreates the textbox block and surface.
    Rect {
        visible: bool,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// `sound(channel, ...)` call shapes after the channel argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundArgs {
    Unchanged,
    Duration {
        duration_ms: i32,
    },
    Frequency {
        duration_ms: i32,
        frequency_dhz: i32,
    },
    Volume {
        duration_ms: i32,
        frequency_dhz: i32,
        volume: i32,
    },
    Duty {
        duration_ms: i32,
        frequency_dhz: i32,
        volume: i32,
        duty: i32,
    },
}

impl SoundArgs {
    /// Arguments following the channel, as passed by a variadic caller.
    /// More than four is not a valid call.
    pub fn from_args(args: &[i32]) -> Option<Self> {
        Some(match *args {
            [] => SoundArgs::Unchanged,
            [duration_ms] => SoundArgs::Duration { duration_ms },
            [duration_ms, frequency_dhz] => SoundArgs::Frequency {
                duration_ms,
                frequency_dhz,
            },
            [duration_ms, frequency_dhz, volume] => SoundArgs::Volume {
                duration_ms,
                frequency_dhz,
                volume,
            },
            [duration_ms, frequency_dhz, volume, duty] => SoundArgs::Duty {
                duration_ms,
                frequency_dhz,
                volume,
                duty,
            },
            _ => return None,
        })
    }

    fn fields(self) -> [Option<i32>; 4] {
        match self {
            SoundArgs::Unchanged => [None; 4],
            SoundArgs::Duration { duration_ms } => [Some(duration_ms), None, None, None],
            SoundArgs::Frequency {
                duration_ms,
                frequency_dhz,
            } => [Some(duration_ms), Some(frequency_dhz), None, None],
            SoundArgs::Volume {
                duration_ms,
                frequency_dhz,
                volume,
            } => [Some(duration_ms), Some(frequency_dhz), Some(volume), None],
            SoundArgs::Duty {
                duration_ms,
                frequency_dhz,
                volume,
                duty,
            } => [
                Some(duration_ms),
                Some(frequency_dhz),
                Some(volume),
                Some(duty),
            ],
        }
    }
}

/// Console state plus everything the script boundary needs around it.
pub struct Host {
    state: ConsoleState,
    input: InputAggregator,
    sound: SoundController,
    game_data: String,
    font_data: String,
    on_loop: Option<LoopCallback>,
    on_quit: Option<QuitCallback>,
}

impl Host {
    /// A freshly reset console and the synthesizer that plays its sound
    /// channels. The synthesizer belongs on the audio thread.
    pub fn new(config: &ConsoleConfig) -> (Self, Synth) {
        let (synth, sound) = Synth::new(
            config.sample_rate,
            config.master_volume,
            config.sound_queue_capacity,
        );
        let window = VIDEO_SIZE as u32 * config.render_scale;
        let host = Self {
            state: ConsoleState::new(config.render_scale),
            input: InputAggregator::new(window, window),
            sound,
            game_data: String::new(),
            font_data: String::new(),
            on_loop: None,
            on_quit: None,
        };
        (host, synth)
    }

    /// Hand over the opaque blobs the loader read for the engine.
    pub fn load_data(&mut self, game_data: String, font_data: String) {
        self.game_data = game_data;
        self.font_data = font_data;
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConsoleState {
        &mut self.state
    }

    pub fn input_mut(&mut self) -> &mut InputAggregator {
        &mut self.input
    }

    /// Back to power-on state. Callbacks are dropped; the palette stays.
    pub fn reset(&mut self) {
        self.state.reset();
        self.on_loop = None;
        self.on_quit = None;
    }

    /// Run one logical frame of the engine. Script errors are logged and
    /// swallowed; only an [`EngineFault`](crate::script::EngineFault) comes
    /// back as `Err`.
    pub fn update(&mut self, delta_ms: u32) -> Result<()> {
        let Some(mut callback) = self.on_loop.take() else {
            return Ok(());
        };
        let result = callback(self, delta_ms);
        // the callback may have registered a replacement
        if self.on_loop.is_none() {
            self.on_loop = Some(callback);
        }
        script::recover("update", result)
    }

    /// Run the quit hook, at most once. Error handling as in `update`.
    pub fn quit(&mut self) -> Result<()> {
        match self.on_quit.take() {
            Some(callback) => script::recover("quit", callback(self)),
            None => Ok(()),
        }
    }

    pub fn log(&self, message: &str) {
        log::info!("bitsy::{}", message);
    }

    pub fn button(&self, code: i32) -> bool {
        Button::from_code(code).is_some_and(|button| self.input.button(button))
    }

    pub fn mouse(&self) -> MouseState {
        self.input.mouse()
    }

    pub fn game_data(&self) -> &str {
        &self.game_data
    }

    pub fn font_data(&self) -> &str {
        &self.font_data
    }

    /// Query (`None`) or switch the graphics mode. Returns the mode in effect.
    pub fn graphics_mode(&mut self, mode: Option<i32>) -> i32 {
        if let Some(mode) = mode {
            match GraphicsMode::try_from(mode) {
                Ok(mode) if mode != self.state.graphics_mode => {
                    self.state.graphics_mode = mode;
                    self.state.mark_dirty();
                }
                Ok(_) => {}
                Err(code) => log::debug!("graphicsMode: unknown mode {}", code),
            }
        }
        self.state.graphics_mode as i32
    }

    /// Query (`None`) or switch the text mode. Returns the mode in effect.
    pub fn text_mode(&mut self, mode: Option<i32>) -> i32 {
        if let Some(mode) = mode {
            match TextMode::try_from(mode) {
                Ok(mode) => self.state.set_text_mode(mode),
                Err(code) => log::debug!("textMode: unknown mode {}", code),
            }
        }
        self.state.text_mode as i32
    }

    pub fn color(&mut self, index: i32, r: i32, g: i32, b: i32) {
        if self.state.palette.set(index, r, g, b) {
            self.state.mark_dirty();
        }
    }

    pub fn reset_colors(&mut self) {
        self.state.palette.reset();
        self.state.mark_dirty();
    }

    /// Allocate the lowest free tile. `None` once the table is full.
    pub fn tile(&mut self) -> Option<i32> {
        let Some(handle) = self.state.memory.first_free(TILE_START) else {
            log::debug!("tile: table exhausted");
            return None;
        };
        let spec = self.state.tile_spec();
        self.state
            .memory
            .allocate(handle, (spec.width * spec.height) as i32);
        self.state.surfaces.insert(handle, spec);
        self.state.mark_dirty();
        Some(handle as i32)
    }

    /// Free a tile's block and surface. Fixed blocks can't be deleted.
    pub fn delete(&mut self, handle: i32) {
        if handle < TILE_START as i32 || !self.state.memory.is_valid(handle) {
            return;
        }
        let handle = handle as usize;
        self.state.memory.free(handle);
        self.state.surfaces.remove(handle);
        self.state.mark_dirty();
    }

    pub fn fill(&mut self, handle: i32, value: i32) {
        if self.state.memory.fill(handle, value) && self.state.surfaces.is_live(handle) {
            self.state.mark_dirty();
        }
    }

    pub fn set(&mut self, handle: i32, index: i32, value: i32) {
        if self.state.memory.set(handle, index, value) && self.state.surfaces.is_live(handle) {
            self.state.mark_dirty();
        }
    }

    pub fn is_valid(&self, handle: i32) -> bool {
        self.state.memory.is_valid(handle)
    }

    pub fn textbox(&mut self, args: TextboxArgs) {
        let textbox = &mut self.state.textbox;
        match args {
            TextboxArgs::Unchanged => {}
            TextboxArgs::Visible(visible) => textbox.visible = visible,
            TextboxArgs::Position { visible, x, y } => {
                textbox.visible = visible;
                textbox.x = x;
                textbox.y = y;
            }
            TextboxArgs::Rect {
                visible,
                x,
                y,
                width,
                height,
            } => {
                let edge = 0..=TEXTBOX_MAX;
                if !edge.contains(&width) || !edge.contains(&height) {
                    log::debug!("textbox: size {}x{} out of range", width, height);
                    return;
                }
                textbox.visible = visible;
                textbox.x = x;
                textbox.y = y;
                textbox.width = width;
                textbox.height = height;
                log::debug!("textbox resized to {}x{}", width, height);
                self.state.allocate_textbox();
            }
        }
    }

    pub fn sound(&mut self, channel: i32, args: SoundArgs) {
        let Some(channel) = Self::channel_index(channel) else {
            return;
        };
        let [duration_ms, frequency_dhz, volume, duty] = args.fields();
        let clock = self.sound.clock();
        let mut command = SoundCommand {
            channel,
            ..Default::default()
        };

        if let Some(duration_ms) = duration_ms {
            let Ok(duration_ms) = u32::try_from(duration_ms) else {
                return;
            };
            command.duration = Some(clock.duration_samples(duration_ms));
        }
        if let Some(frequency_dhz) = frequency_dhz {
            let Some(cycle_length) = Self::cycle_length(clock.sample_rate, frequency_dhz) else {
                return;
            };
            command.cycle_length = Some(cycle_length);
        }
        if let Some(volume) = volume {
            let Some(volume) = Self::volume_fraction(volume) else {
                return;
            };
            command.volume = Some(volume);
        }
        if let Some(duty) = duty {
            if !(0..=DUTY_MAX).contains(&duty) {
                return;
            }
            command.duty = Some(duty as u8);
        }

        if command != (SoundCommand { channel, ..Default::default() }) {
            self.sound.send(command);
        }
    }

    pub fn frequency(&mut self, channel: i32, frequency_dhz: i32) {
        let (Some(channel), Some(cycle_length)) = (
            Self::channel_index(channel),
            Self::cycle_length(self.sound.clock().sample_rate, frequency_dhz),
        ) else {
            return;
        };
        self.sound.send(SoundCommand {
            channel,
            cycle_length: Some(cycle_length),
            ..Default::default()
        });
    }

    pub fn volume(&mut self, channel: i32, volume: i32) {
        let (Some(channel), Some(volume)) =
            (Self::channel_index(channel), Self::volume_fraction(volume))
        else {
            return;
        };
        self.sound.send(SoundCommand {
            channel,
            volume: Some(volume),
            ..Default::default()
        });
    }

    pub fn set_loop(&mut self, callback: LoopCallback) {
        self.on_loop = Some(callback);
    }

    pub fn set_quit(&mut self, callback: QuitCallback) {
        self.on_quit = Some(callback);
    }

    fn channel_index(channel: i32) -> Option<usize> {
        usize::try_from(channel)
            .ok()
            .filter(|&index| index < CHANNEL_COUNT)
    }

    /// Frequency arrives in tenths of a hertz.
    fn cycle_length(sample_rate: u32, frequency_dhz: i32) -> Option<u32> {
        (frequency_dhz > 0).then(|| {
            SampleClock { sample_rate }.cycle_length(frequency_dhz as f64 / 10.0)
        })
    }

    fn volume_fraction(volume: i32) -> Option<f32> {
        (0..=VOLUME_MAX)
            .contains(&volume)
            .then(|| volume as f32 / VOLUME_MAX as f32)
    }
}
