pub mod arena;
pub mod audio;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod host;
pub mod input;
pub mod memory;
pub mod palette;
pub mod script;
pub mod software;
pub mod state;
pub mod surface;

pub use audio::{Channel, SoundCommand, SoundController, Synth};
pub use bitsybox_common::{Button, Color, Key, MouseButton, PadButton};
pub use clock::FrameClock;
pub use compositor::{Compositor, Viewport};
pub use config::ConsoleConfig;
pub use host::{Host, LoopCallback, QuitCallback, SoundArgs, TextboxArgs};
pub use input::{InputAggregator, InputEvent, MouseState, TickOutcome};
pub use memory::MemoryBlockStore;
pub use palette::Palette;
pub use script::{EngineFault, ScriptEngine};
pub use software::{PixelBuffer, SoftwareBackend};
pub use state::{ConsoleState, GraphicsMode, TextMode, TextboxState};
pub use surface::{Backend, DrawCommand, Layer, Rect, SurfaceCache, SurfaceSpec, Target};

/// Memory block holding the 128x128 direct pixel video buffer.
pub const VIDEO: usize = 0;
/// Memory block holding the textbox pixels.
pub const TEXTBOX: usize = 1;
/// Background tilemap.
pub const MAP1: usize = 2;
/// Foreground tilemap, alpha-blended over `MAP1`.
pub const MAP2: usize = 3;
/// First handle handed out by `tile()`.
pub const TILE_START: usize = 6;
/// Total number of memory block (and surface) slots.
pub const BLOCK_MAX: usize = 1024;

/// Native video resolution, both axes.
pub const VIDEO_SIZE: usize = 128;
/// Tile edge length in pixels.
pub const TILE_SIZE: usize = 8;
/// Tilemap edge length in tiles.
pub const MAP_SIZE: usize = 16;

/// Palette entries.
pub const PALETTE_SIZE: usize = 256;
/// Palette index used as background fill and skipped when drawing.
pub const BACKGROUND_INDEX: u8 = 16;

pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNEL_COUNT: usize = 2;

pub const GFX_VIDEO: i32 = 0;
pub const GFX_MAP: i32 = 1;
pub const TXT_HIREZ: i32 = 0;
pub const TXT_LOREZ: i32 = 1;

pub const SOUND1: i32 = 0;
pub const SOUND2: i32 = 1;
pub const PULSE_1_8: i32 = 0;
pub const PULSE_1_4: i32 = 1;
pub const PULSE_1_2: i32 = 2;

pub const BTN_UP: i32 = Button::Up as i32;
pub const BTN_DOWN: i32 = Button::Down as i32;
pub const BTN_LEFT: i32 = Button::Left as i32;
pub const BTN_RIGHT: i32 = Button::Right as i32;
pub const BTN_OK: i32 = Button::Confirm as i32;
pub const BTN_MENU: i32 = Button::Menu as i32;
