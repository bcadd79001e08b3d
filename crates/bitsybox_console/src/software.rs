use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::surface::{Backend, DrawCommand, Layer, Rect, Target};
use crate::Color;

/// RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    fn clip(&self, rect: Rect) -> (u32, u32, u32, u32) {
        let x0 = rect.x.max(0) as i64;
        let y0 = rect.y.max(0) as i64;
        let x1 = (rect.x as i64 + rect.width as i64).min(self.width as i64);
        let y1 = (rect.y as i64 + rect.height as i64).min(self.height as i64);
        if x1 <= x0 || y1 <= y0 {
            return (0, 0, 0, 0);
        }
        (x0 as u32, y0 as u32, x1 as u32, y1 as u32)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x0, y0, x1, y1) = self.clip(rect);
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Nearest-neighbour scaled copy of `source` into `dst`.
    fn blit(&mut self, source: &PixelBuffer, layer: Layer, dst: Rect) {
        if dst.width == 0 || dst.height == 0 || source.width == 0 || source.height == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.clip(dst);
        for y in y0..y1 {
            let sy = ((y as i64 - dst.y as i64) * source.height as i64 / dst.height as i64) as u32;
            for x in x0..x1 {
                let sx =
                    ((x as i64 - dst.x as i64) * source.width as i64 / dst.width as i64) as u32;
                let src = source.pixels[(sy * source.width + sx) as usize];
                let out = &mut self.pixels[(y * self.width + x) as usize];
                *out = match layer {
                    Layer::Opaque => src,
                    Layer::Blended => src.blend_over(*out),
                };
            }
        }
    }
}

struct SoftSurface {
    layer: Layer,
    buffer: PixelBuffer,
}

/// CPU render backend. Used headless (tests, frame capture) and as the
/// reference for what the GPU backend has to produce.
pub struct SoftwareBackend {
    window: PixelBuffer,
    surfaces: HashMap<usize, SoftSurface>,
    presented: u64,
}

impl SoftwareBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window: PixelBuffer::new(width, height),
            surfaces: HashMap::new(),
            presented: 0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.window = PixelBuffer::new(width, height);
    }

    pub fn window(&self) -> &PixelBuffer {
        &self.window
    }

    pub fn surface(&self, handle: usize) -> Option<&PixelBuffer> {
        self.surfaces.get(&handle).map(|surface| &surface.buffer)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    fn execute(&self, target: &mut PixelBuffer, commands: &[DrawCommand]) {
        for command in commands {
            match *command {
                DrawCommand::Clear(color) => target.pixels.fill(color),
                DrawCommand::FillRect(rect, color) => target.fill_rect(rect, color),
                DrawCommand::Blit { source, dst } => {
                    if let Some(surface) = self.surfaces.get(&source) {
                        target.blit(&surface.buffer, surface.layer, dst);
                    }
                }
            }
        }
    }
}

impl Backend for SoftwareBackend {
    fn window_size(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    fn create_surface(&mut self, handle: usize, width: u32, height: u32, layer: Layer) -> Result<()> {
        self.surfaces.insert(
            handle,
            SoftSurface {
                layer,
                buffer: PixelBuffer::new(width, height),
            },
        );
        Ok(())
    }

    fn destroy_surface(&mut self, handle: usize) {
        self.surfaces.remove(&handle);
    }

    fn draw(&mut self, target: Target, commands: &[DrawCommand]) -> Result<()> {
        match target {
            Target::Window => {
                let mut window = std::mem::replace(&mut self.window, PixelBuffer::new(0, 0));
                self.execute(&mut window, commands);
                self.window = window;
            }
            Target::Surface(handle) => {
                let Some(mut surface) = self.surfaces.remove(&handle) else {
                    bail!("draw into missing surface {}", handle);
                };
                self.execute(&mut surface.buffer, commands);
                self.surfaces.insert(handle, surface);
            }
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new_rgb(255, 0, 0);
    const BLUE: Color = Color::new_rgb(0, 0, 255);

    #[test]
    fn fill_rect_is_clipped_to_target() {
        let mut backend = SoftwareBackend::new(4, 4);
        backend
            .draw(
                Target::Window,
                &[
                    DrawCommand::Clear(BLUE),
                    DrawCommand::FillRect(Rect::new(-2, 2, 4, 10), RED),
                ],
            )
            .unwrap();
        let window = backend.window();
        assert_eq!(window.pixel(0, 2), Some(RED));
        assert_eq!(window.pixel(1, 3), Some(RED));
        assert_eq!(window.pixel(2, 2), Some(BLUE));
        assert_eq!(window.pixel(0, 1), Some(BLUE));
    }

    #[test]
    fn blended_blit_keeps_transparent_pixels_underneath() {
        let mut backend = SoftwareBackend::new(4, 4);
        backend.create_surface(9, 2, 2, Layer::Blended).unwrap();
        backend
            .draw(
                Target::Surface(9),
                &[
                    DrawCommand::Clear(Color::TRANSPARENT),
                    DrawCommand::FillRect(Rect::new(0, 0, 1, 1), RED),
                ],
            )
            .unwrap();
        backend
            .draw(
                Target::Window,
                &[
                    DrawCommand::Clear(BLUE),
                    DrawCommand::Blit {
                        source: 9,
                        dst: Rect::new(0, 0, 4, 4),
                    },
                ],
            )
            .unwrap();
        let window = backend.window();
        assert_eq!(window.pixel(0, 0), Some(RED));
        assert_eq!(window.pixel(1, 1), Some(RED));
        assert_eq!(window.pixel(2, 0), Some(BLUE));
        assert_eq!(window.pixel(3, 3), Some(BLUE));
    }

    #[test]
    fn drawing_into_missing_surface_is_an_error() {
        let mut backend = SoftwareBackend::new(1, 1);
        assert!(backend
            .draw(Target::Surface(3), &[DrawCommand::Clear(RED)])
            .is_err());
    }
}
