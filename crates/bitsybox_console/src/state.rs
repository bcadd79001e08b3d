use crate::memory::MemoryBlockStore;
use crate::palette::Palette;
use crate::surface::{Layer, SurfaceCache, SurfaceSpec};
use crate::{MAP1, MAP2, MAP_SIZE, TEXTBOX, TILE_SIZE, VIDEO, VIDEO_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsMode {
    /// The video block drives the screen, one byte per pixel.
    #[default]
    Video = 0,
    /// Two tilemaps of tile handles, plus the textbox overlay.
    Map = 1,
}

impl TryFrom<i32> for GraphicsMode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GraphicsMode::Video),
            1 => Ok(GraphicsMode::Map),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// Textbox pixels at half the console pixel size.
    #[default]
    HiRez = 0,
    /// Textbox pixels at the console pixel size.
    LoRez = 1,
}

impl TryFrom<i32> for TextMode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TextMode::HiRez),
            1 => Ok(TextMode::LoRez),
            other => Err(other),
        }
    }
}

/// Placement of the textbox overlay, in console pixels (`x`, `y`) and
/// textbox pixels (`width`, `height`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextboxState {
    pub visible: bool,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Everything the virtual hardware owns: memory, palette, surfaces and the
/// display registers. One instance per console.
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub memory: MemoryBlockStore,
    pub palette: Palette,
    pub surfaces: SurfaceCache,
    pub graphics_mode: GraphicsMode,
    pub text_mode: TextMode,
    pub textbox: TextboxState,
    render_scale: u32,
    dirty: bool,
}

impl ConsoleState {
    pub fn new(render_scale: u32) -> Self {
        let mut state = Self {
            memory: MemoryBlockStore::new(),
            palette: Palette::new(),
            surfaces: SurfaceCache::new(),
            graphics_mode: GraphicsMode::default(),
            text_mode: TextMode::default(),
            textbox: TextboxState::default(),
            render_scale: render_scale.max(1),
            dirty: true,
        };
        state.reset();
        state
    }

    /// Power-on state: every block freed, then the fixed blocks allocated.
    /// The palette is left alone.
    pub fn reset(&mut self) {
        log::info!("console reset");
        self.memory.clear();
        self.surfaces.clear();
        self.graphics_mode = GraphicsMode::default();
        self.text_mode = TextMode::default();
        self.textbox = TextboxState::default();

        let scale = self.render_scale;
        let screen = VIDEO_SIZE as u32;
        let map_cells = (MAP_SIZE * MAP_SIZE) as i32;

        self.memory.allocate(VIDEO, (VIDEO_SIZE * VIDEO_SIZE) as i32);
        self.surfaces
            .insert(VIDEO, Self::square(screen, scale, Layer::Opaque));
        self.allocate_textbox();
        self.memory.allocate(MAP1, map_cells);
        self.surfaces
            .insert(MAP1, Self::square(screen, scale, Layer::Opaque));
        self.memory.allocate(MAP2, map_cells);
        self.surfaces
            .insert(MAP2, Self::square(screen, scale, Layer::Blended));
        self.dirty = true;
    }

    fn square(size: u32, scale: u32, layer: Layer) -> SurfaceSpec {
        SurfaceSpec {
            width: size,
            height: size,
            scale,
            layer,
        }
    }

    pub fn tile_spec(&self) -> SurfaceSpec {
        Self::square(TILE_SIZE as u32, self.render_scale, Layer::Blended)
    }

    /// (Re)allocate the textbox block and surface from the current
    /// textbox dimensions. Zero-sized textboxes have neither.
    pub fn allocate_textbox(&mut self) {
        let TextboxState { width, height, .. } = self.textbox;
        let size = if width > 0 && height > 0 {
            width.saturating_mul(height)
        } else {
            0
        };
        self.memory.allocate(TEXTBOX, size);
        if self.memory.is_valid(TEXTBOX as i32) {
            self.surfaces.insert(
                TEXTBOX,
                SurfaceSpec {
                    width: width as u32,
                    height: height as u32,
                    scale: self.textbox_scale(),
                    layer: Layer::Opaque,
                },
            );
        } else {
            self.surfaces.remove(TEXTBOX);
        }
        self.dirty = true;
    }

    /// Textbox surface scale for the current text mode.
    pub fn textbox_scale(&self) -> u32 {
        match self.text_mode {
            TextMode::HiRez => (self.render_scale / 2).max(1),
            TextMode::LoRez => self.render_scale,
        }
    }

    pub fn set_text_mode(&mut self, mode: TextMode) {
        if self.text_mode == mode {
            return;
        }
        self.text_mode = mode;
        if let Some(mut spec) = self.surfaces.spec(TEXTBOX as i32) {
            spec.scale = self.textbox_scale();
            self.surfaces.insert(TEXTBOX, spec);
        }
        self.dirty = true;
    }

    pub fn render_scale(&self) -> u32 {
        self.render_scale
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_allocates_fixed_blocks() {
        let state = ConsoleState::new(4);
        assert_eq!(state.memory.size(VIDEO as i32), VIDEO_SIZE * VIDEO_SIZE);
        assert_eq!(state.memory.size(MAP1 as i32), MAP_SIZE * MAP_SIZE);
        assert_eq!(state.memory.size(MAP2 as i32), MAP_SIZE * MAP_SIZE);
        assert!(!state.memory.is_valid(TEXTBOX as i32));
        assert!(state.surfaces.is_live(VIDEO as i32));
        assert!(!state.surfaces.is_live(TEXTBOX as i32));
        assert_eq!(
            state.surfaces.spec(MAP2 as i32).map(|spec| spec.layer),
            Some(Layer::Blended)
        );
        assert!(state.is_dirty());
    }

    #[test]
    fn text_mode_rescales_textbox_surface() {
        let mut state = ConsoleState::new(4);
        state.textbox.width = 20;
        state.textbox.height = 10;
        state.allocate_textbox();
        assert_eq!(state.surfaces.spec(TEXTBOX as i32).unwrap().scale, 2);

        state.set_text_mode(TextMode::LoRez);
        assert_eq!(state.surfaces.spec(TEXTBOX as i32).unwrap().scale, 4);
        assert_eq!(state.memory.size(TEXTBOX as i32), 200);
    }

    #[test]
    fn mode_codes_outside_range_are_rejected() {
        assert_eq!(GraphicsMode::try_from(1), Ok(GraphicsMode::Map));
        assert_eq!(GraphicsMode::try_from(2), Err(2));
        assert_eq!(TextMode::try_from(-1), Err(-1));
    }
}
