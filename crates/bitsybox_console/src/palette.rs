use crate::{Color, BACKGROUND_INDEX, PALETTE_SIZE};

/// The console's 256 color palette. Entries persist across frames and only
/// change through [`Palette::set`] or [`Palette::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [Color::BLACK; PALETTE_SIZE],
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one entry. Rejects the whole call if any argument is out of range.
    pub fn set(&mut self, index: i32, r: i32, g: i32, b: i32) -> bool {
        let (Ok(index), Ok(r), Ok(g), Ok(b)) = (
            u8::try_from(index),
            u8::try_from(r),
            u8::try_from(g),
            u8::try_from(b),
        ) else {
            return false;
        };
        self.colors[index as usize] = Color::new_rgb(r, g, b);
        true
    }

    pub fn reset(&mut self) {
        self.colors = [Color::BLACK; PALETTE_SIZE];
    }

    #[inline]
    pub fn color(&self, index: u8) -> Color {
        self.colors[index as usize]
    }

    #[inline]
    pub fn background(&self) -> Color {
        self.color(BACKGROUND_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_every_component() {
        let mut palette = Palette::new();
        assert!(palette.set(255, 1, 2, 3));
        assert_eq!(palette.color(255), Color::new_rgb(1, 2, 3));

        assert!(!palette.set(256, 1, 2, 3));
        assert!(!palette.set(-1, 1, 2, 3));
        assert!(!palette.set(4, 256, 0, 0));
        assert!(!palette.set(4, 0, -1, 0));
        assert_eq!(palette.color(4), Color::BLACK);
    }

    #[test]
    fn background_is_entry_sixteen() {
        let mut palette = Palette::new();
        palette.set(16, 10, 20, 30);
        assert_eq!(palette.background(), Color::new_rgb(10, 20, 30));
        palette.reset();
        assert_eq!(palette.background(), Color::BLACK);
    }
}
