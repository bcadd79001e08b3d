pub mod key;

pub use key::{Button, Key, MouseButton, PadButton};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::new_rgba(0, 0, 0, 0);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    #[inline]
    pub const fn rgba(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    /// Source-over composite of `self` onto `dst`.
    pub fn blend_over(self, dst: Color) -> Color {
        match self.a {
            0xff => self,
            0 => dst,
            a => {
                let sa = a as u32;
                let da = dst.a as u32 * (255 - sa) / 255;
                let out_a = sa + da;
                let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da) / out_a) as u8;
                Color {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: out_a as u8,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_respects_extremes() {
        let red = Color::new_rgb(255, 0, 0);
        let blue = Color::new_rgb(0, 0, 255);
        assert_eq!(red.blend_over(blue), red);
        assert_eq!(red.with_alpha(0).blend_over(blue), blue);
        assert_eq!(
            Color::TRANSPARENT.blend_over(Color::TRANSPARENT),
            Color::TRANSPARENT
        );
    }

    #[test]
    fn blend_over_transparent_target_keeps_source_color() {
        let half = Color::new_rgba(200, 100, 50, 128);
        let out = half.blend_over(Color::TRANSPARENT);
        assert_eq!(out.rgb(), (200, 100, 50));
        assert_eq!(out.a, 128);
    }
}
