use anyhow::Result;

use crate::arena::Slots;
use crate::{Color, BLOCK_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// How a surface combines with whatever it is blitted onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Cleared to the opaque background color, copied as-is.
    Opaque,
    /// Cleared to a transparent background, alpha-blended when blitted.
    Blended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Window,
    Surface(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, Color),
    Blit { source: usize, dst: Rect },
}

/// Render resources the compositor draws through.
///
/// Surfaces are addressed by the same handle as their memory block. A
/// backend only needs to honor handles it was asked to create; blits from
/// unknown handles are skipped.
pub trait Backend {
    fn window_size(&self) -> (u32, u32);
    fn create_surface(&mut self, handle: usize, width: u32, height: u32, layer: Layer)
        -> Result<()>;
    fn destroy_surface(&mut self, handle: usize);
    fn draw(&mut self, target: Target, commands: &[DrawCommand]) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}

/// Shape of a surface: native size in console pixels and the scale used to
/// turn one console pixel into backend pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub layer: Layer,
}

impl SurfaceSpec {
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width * self.scale, self.height * self.scale)
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    spec: SurfaceSpec,
    realized: bool,
}

/// Which handles have a surface, and whether the backend resource behind
/// each one is up to date.
#[derive(Debug, Clone)]
pub struct SurfaceCache {
    entries: Slots<Entry>,
    retired: Vec<usize>,
}

impl Default for SurfaceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self {
            entries: Slots::new(BLOCK_MAX),
            retired: Vec::new(),
        }
    }

    /// Register (or replace) the surface for `handle`. The backend resource
    /// is recreated on the next [`SurfaceCache::sync`].
    pub fn insert(&mut self, handle: usize, spec: SurfaceSpec) {
        let entry = Entry {
            spec,
            realized: false,
        };
        match self.entries.insert(handle, entry) {
            Ok(Some(previous)) if previous.realized => self.retired.push(handle),
            Ok(_) => {}
            Err(_) => log::debug!("surface handle {} out of range", handle),
        }
    }

    pub fn remove(&mut self, handle: usize) {
        if let Some(previous) = self.entries.remove(handle) {
            if previous.realized {
                self.retired.push(handle);
            }
        }
    }

    pub fn clear(&mut self) {
        let realized: Vec<usize> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.realized)
            .map(|(handle, _)| handle)
            .collect();
        self.retired.extend(realized);
        self.entries.clear();
    }

    pub fn is_live(&self, handle: i32) -> bool {
        self.entries.contains(handle)
    }

    pub fn spec(&self, handle: i32) -> Option<SurfaceSpec> {
        self.entries.get(handle).map(|entry| entry.spec)
    }

    /// Live surfaces in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, SurfaceSpec)> + '_ {
        self.entries.iter().map(|(handle, entry)| (handle, entry.spec))
    }

    /// Whether any surface still needs its backend resource built.
    pub fn has_pending(&self) -> bool {
        !self.retired.is_empty() || self.entries.iter().any(|(_, entry)| !entry.realized)
    }

    /// Destroy retired backend resources, then create the missing ones.
    /// Returns whether anything was created.
    pub fn sync(&mut self, backend: &mut dyn Backend) -> Result<bool> {
        for handle in self.retired.drain(..) {
            backend.destroy_surface(handle);
        }
        let mut created = false;
        for (handle, entry) in self.entries.iter_mut() {
            if entry.realized {
                continue;
            }
            let (width, height) = entry.spec.pixel_size();
            log::debug!("creating surface {} ({}x{})", handle, width, height);
            backend.create_surface(handle, width, height, entry.spec.layer)?;
            entry.realized = true;
            created = true;
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl Backend for Recorder {
        fn window_size(&self) -> (u32, u32) {
            (0, 0)
        }

        fn create_surface(
            &mut self,
            handle: usize,
            width: u32,
            height: u32,
            _layer: Layer,
        ) -> Result<()> {
            self.log.push(format!("create {handle} {width}x{height}"));
            Ok(())
        }

        fn destroy_surface(&mut self, handle: usize) {
            self.log.push(format!("destroy {handle}"));
        }

        fn draw(&mut self, _target: Target, _commands: &[DrawCommand]) -> Result<()> {
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn spec(width: u32) -> SurfaceSpec {
        SurfaceSpec {
            width,
            height: width,
            scale: 2,
            layer: Layer::Opaque,
        }
    }

    #[test]
    fn replacing_a_realized_surface_destroys_it_first() {
        let mut cache = SurfaceCache::new();
        let mut backend = Recorder::default();

        cache.insert(6, spec(8));
        assert!(cache.sync(&mut backend).unwrap());
        assert!(!cache.sync(&mut backend).unwrap());

        cache.insert(6, spec(4));
        assert!(cache.has_pending());
        cache.sync(&mut backend).unwrap();
        assert_eq!(
            backend.log,
            vec!["create 6 16x16", "destroy 6", "create 6 8x8"]
        );
        assert_eq!(cache.spec(6), Some(spec(4)));
    }

    #[test]
    fn removing_unrealized_surface_needs_no_destroy() {
        let mut cache = SurfaceCache::new();
        let mut backend = Recorder::default();
        cache.insert(7, spec(8));
        cache.remove(7);
        cache.sync(&mut backend).unwrap();
        assert!(backend.log.is_empty());
        assert!(!cache.is_live(7));
    }

    #[test]
    fn churn_between_syncs_retires_each_handle_once() {
        let mut cache = SurfaceCache::new();
        let mut backend = Recorder::default();
        cache.insert(6, spec(8));
        cache.sync(&mut backend).unwrap();

        for _ in 0..1000 {
            cache.insert(6, spec(8));
            cache.remove(6);
        }
        assert_eq!(cache.retired.len(), 1);

        cache.sync(&mut backend).unwrap();
        assert!(cache.retired.is_empty());
        assert_eq!(backend.log, vec!["create 6 16x16", "destroy 6"]);
    }
}
