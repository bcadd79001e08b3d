use anyhow::Result;

use crate::palette::Palette;
use crate::state::{ConsoleState, GraphicsMode};
use crate::surface::{Backend, DrawCommand, Layer, Rect, SurfaceCache, SurfaceSpec, Target};
use crate::{BACKGROUND_INDEX, MAP1, MAP2, MAP_SIZE, TEXTBOX, TILE_SIZE, TILE_START, VIDEO, VIDEO_SIZE};

/// Largest square centered in the window; the console screen is letterboxed
/// into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub size: u32,
}

impl Viewport {
    pub fn fit(window_width: u32, window_height: u32) -> Self {
        let size = window_width.min(window_height);
        Self {
            x: (window_width / 2) as i32 - (size / 2) as i32,
            y: (window_height / 2) as i32 - (size / 2) as i32,
            size,
        }
    }

    /// Window pixels per console pixel.
    pub fn scale(&self) -> f32 {
        self.size as f32 / VIDEO_SIZE as f32
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }

    /// Window coordinates to console pixel coordinates.
    pub fn to_console(&self, window_x: i32, window_y: i32) -> (i32, i32) {
        if self.size == 0 {
            return (0, 0);
        }
        let scale = self.scale();
        (
            ((window_x - self.x) as f32 / scale).floor() as i32,
            ((window_y - self.y) as f32 / scale).floor() as i32,
        )
    }
}

/// Rebuilds dirty surfaces from memory and layers them into the window.
#[derive(Debug, Default)]
pub struct Compositor {
    viewport: Viewport,
    rebuilds: u64,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of full surface rebuilds performed so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// One logical frame of video: bring backend surfaces in line with the
    /// cache, rebuild everything if the console is dirty, then compose the
    /// window. Presenting is left to the caller.
    pub fn render(&mut self, state: &mut ConsoleState, backend: &mut dyn Backend) -> Result<()> {
        let (width, height) = backend.window_size();
        self.viewport = Viewport::fit(width, height);

        if state.surfaces.sync(backend)? {
            state.mark_dirty();
        }
        if state.is_dirty() {
            self.rebuild(state, backend)?;
            state.clear_dirty();
        }
        self.compose(state, backend)
    }

    fn rebuild(&mut self, state: &ConsoleState, backend: &mut dyn Backend) -> Result<()> {
        self.rebuilds += 1;
        let specs: Vec<(usize, SurfaceSpec)> = state.surfaces.iter().collect();

        // tiles feed the tilemaps, so they go first
        for &(handle, spec) in specs.iter().filter(|(handle, _)| *handle >= TILE_START) {
            if let Some(block) = state.memory.block(handle as i32) {
                let commands = pixel_commands(block, spec, &state.palette);
                backend.draw(Target::Surface(handle), &commands)?;
            }
        }
        for handle in [MAP1, MAP2] {
            if let (Some(spec), Some(block)) = (
                state.surfaces.spec(handle as i32),
                state.memory.block(handle as i32),
            ) {
                let commands = tilemap_commands(block, spec, &state.palette, &state.surfaces);
                backend.draw(Target::Surface(handle), &commands)?;
            }
        }
        for handle in [VIDEO, TEXTBOX] {
            if let (Some(spec), Some(block)) = (
                state.surfaces.spec(handle as i32),
                state.memory.block(handle as i32),
            ) {
                let commands = pixel_commands(block, spec, &state.palette);
                backend.draw(Target::Surface(handle), &commands)?;
            }
        }
        Ok(())
    }

    fn compose(&self, state: &ConsoleState, backend: &mut dyn Backend) -> Result<()> {
        let live = |handle: usize| state.surfaces.is_live(handle as i32);
        let screen = self.viewport.rect();
        let mut commands = vec![DrawCommand::Clear(state.palette.color(0))];

        match state.graphics_mode {
            GraphicsMode::Video => {
                if live(VIDEO) {
                    commands.push(DrawCommand::Blit {
                        source: VIDEO,
                        dst: screen,
                    });
                }
            }
            GraphicsMode::Map => {
                for handle in [MAP1, MAP2] {
                    if live(handle) {
                        commands.push(DrawCommand::Blit {
                            source: handle,
                            dst: screen,
                        });
                    }
                }
                if state.textbox.visible && live(TEXTBOX) {
                    commands.push(DrawCommand::Blit {
                        source: TEXTBOX,
                        dst: self.textbox_rect(state),
                    });
                }
            }
        }

        backend.draw(Target::Window, &commands)
    }

    /// Textbox placement in window space. The offset is in console pixels,
    /// the size in textbox pixels at the textbox's own scale.
    fn textbox_rect(&self, state: &ConsoleState) -> Rect {
        let scale = self.viewport.scale();
        let textbox = state.textbox;
        let pixel = state.textbox_scale() as f32 / state.render_scale() as f32 * scale;
        Rect::new(
            self.viewport.x + (textbox.x as f32 * scale).round() as i32,
            self.viewport.y + (textbox.y as f32 * scale).round() as i32,
            (textbox.width.max(0) as f32 * pixel).round() as u32,
            (textbox.height.max(0) as f32 * pixel).round() as u32,
        )
    }
}

fn clear_color(spec: SurfaceSpec, palette: &Palette) -> DrawCommand {
    let background = palette.background();
    DrawCommand::Clear(match spec.layer {
        Layer::Opaque => background,
        Layer::Blended => background.with_alpha(0),
    })
}

/// One byte per pixel, row-major, background index left as the fill.
fn pixel_commands(block: &[u8], spec: SurfaceSpec, palette: &Palette) -> Vec<DrawCommand> {
    let width = spec.width.max(1) as usize;
    let scale = spec.scale;
    let mut commands = vec![clear_color(spec, palette)];
    for (index, &value) in block.iter().enumerate() {
        if value == BACKGROUND_INDEX {
            continue;
        }
        let (x, y) = (index % width, index / width);
        if y >= spec.height as usize {
            break;
        }
        commands.push(DrawCommand::FillRect(
            Rect::new((x as u32 * scale) as i32, (y as u32 * scale) as i32, scale, scale),
            palette.color(value),
        ));
    }
    commands
}

/// One byte per cell naming a tile handle; cells without a live tile stay
/// background.
fn tilemap_commands(
    block: &[u8],
    spec: SurfaceSpec,
    palette: &Palette,
    surfaces: &SurfaceCache,
) -> Vec<DrawCommand> {
    let cell = TILE_SIZE as u32 * spec.scale;
    let mut commands = vec![clear_color(spec, palette)];
    for (index, &value) in block.iter().enumerate().take(MAP_SIZE * MAP_SIZE) {
        let handle = value as usize;
        if handle < TILE_START || !surfaces.is_live(handle as i32) {
            continue;
        }
        let (x, y) = ((index % MAP_SIZE) as u32, (index / MAP_SIZE) as u32);
        commands.push(DrawCommand::Blit {
            source: handle,
            dst: Rect::new((x * cell) as i32, (y * cell) as i32, cell, cell),
        });
    }
    commands
}
