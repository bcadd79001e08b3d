use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{BlendMode, Texture, TextureCreator, WindowCanvas};
use sdl2::video::{FullscreenType, WindowContext};

use bitsybox_console::{Backend, Color, DrawCommand, Layer, Rect, Target};

/// Render backend over SDL2 target textures, one per live surface.
pub struct SdlBackend {
    canvas: WindowCanvas,
    creator: TextureCreator<WindowContext>,
    textures: HashMap<usize, Texture>,
}

impl SdlBackend {
    pub fn new(canvas: WindowCanvas) -> Self {
        let creator = canvas.texture_creator();
        Self {
            canvas,
            creator,
            textures: HashMap::new(),
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.canvas.window().fullscreen_state() != FullscreenType::Off
    }

    /// Switch between desktop fullscreen and a `windowed_size` square window.
    pub fn set_fullscreen(&mut self, fullscreen: bool, windowed_size: u32) -> Result<()> {
        let window = self.canvas.window_mut();
        if fullscreen {
            window
                .set_fullscreen(FullscreenType::Desktop)
                .map_err(|e| anyhow!(e))?;
        } else {
            window
                .set_fullscreen(FullscreenType::Off)
                .map_err(|e| anyhow!(e))?;
            window.set_size(windowed_size, windowed_size)?;
        }
        log::info!("fullscreen {}", if fullscreen { "on" } else { "off" });
        Ok(())
    }

    fn destroy_texture(&mut self, handle: usize) {
        if let Some(texture) = self.textures.remove(&handle) {
            // SAFETY: the renderer outlives every texture in the map
            unsafe { texture.destroy() };
        }
    }
}

impl Drop for SdlBackend {
    fn drop(&mut self) {
        for (_, texture) in self.textures.drain() {
            // SAFETY: runs before the canvas field is dropped
            unsafe { texture.destroy() };
        }
    }
}

impl Backend for SdlBackend {
    fn window_size(&self) -> (u32, u32) {
        self.canvas.output_size().unwrap_or((0, 0))
    }

    fn create_surface(&mut self, handle: usize, width: u32, height: u32, layer: Layer) -> Result<()> {
        self.destroy_texture(handle);
        let mut texture = self
            .creator
            .create_texture_target(PixelFormatEnum::RGBA8888, width, height)
            .with_context(|| format!("create {}x{} texture for surface {}", width, height, handle))?;
        texture.set_blend_mode(match layer {
            Layer::Opaque => BlendMode::None,
            Layer::Blended => BlendMode::Blend,
        });
        log::debug!("surface {} created at {}x{}", handle, width, height);
        self.textures.insert(handle, texture);
        Ok(())
    }

    fn destroy_surface(&mut self, handle: usize) {
        self.destroy_texture(handle);
    }

    fn draw(&mut self, target: Target, commands: &[DrawCommand]) -> Result<()> {
        match target {
            Target::Window => execute(&mut self.canvas, &self.textures, commands),
            Target::Surface(handle) => {
                let mut texture = self
                    .textures
                    .remove(&handle)
                    .ok_or_else(|| anyhow!("draw into missing surface {}", handle))?;
                let textures = &self.textures;
                let mut result = Ok(());
                let switched = self.canvas.with_texture_canvas(&mut texture, |canvas| {
                    result = execute(canvas, textures, commands);
                });
                self.textures.insert(handle, texture);
                switched.map_err(|e| anyhow!("render target for surface {}: {}", handle, e))?;
                result
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }
}

fn execute(
    canvas: &mut WindowCanvas,
    textures: &HashMap<usize, Texture>,
    commands: &[DrawCommand],
) -> Result<()> {
    canvas.set_blend_mode(BlendMode::None);
    for command in commands {
        match *command {
            DrawCommand::Clear(color) => {
                canvas.set_draw_color(map_color(color));
                canvas.clear();
            }
            DrawCommand::FillRect(rect, color) => {
                if let Some(rect) = map_rect(rect) {
                    canvas.set_draw_color(map_color(color));
                    canvas.fill_rect(rect).map_err(|e| anyhow!(e))?;
                }
            }
            DrawCommand::Blit { source, dst } => {
                if let (Some(texture), Some(dst)) = (textures.get(&source), map_rect(dst)) {
                    canvas.copy(texture, None, dst).map_err(|e| anyhow!(e))?;
                }
            }
        }
    }
    Ok(())
}

fn map_color(color: Color) -> sdl2::pixels::Color {
    sdl2::pixels::Color::RGBA(color.r, color.g, color.b, color.a)
}

/// SDL rects can't be empty, so zero-sized rects draw nothing.
fn map_rect(rect: Rect) -> Option<sdl2::rect::Rect> {
    (rect.width > 0 && rect.height > 0)
        .then(|| sdl2::rect::Rect::new(rect.x, rect.y, rect.width, rect.height))
}
