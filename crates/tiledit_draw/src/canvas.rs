//! Pixel sink the drawer paints into.

use crate::face::Mask;
use crate::geom::{Point, Rect};
use image::{Rgba, RgbaImage};

pub type Color = Rgba<u8>;

/// Opaque color from components.
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Rgba([r, g, b, 0xff])
}

/// Paint target. Implementations clip to their own bounds.
pub trait Canvas {
    fn bounds(&self) -> Rect;

    /// Fill `r` with `c`, alpha-blending translucent colors.
    fn fill(&mut self, r: Rect, c: Color);

    /// Blend `c` through `mask` into `dest`; `mask_pt` is the mask pixel
    /// aligned with `dest.min`.
    fn draw_mask(&mut self, dest: Rect, mask: &Mask, mask_pt: Point, c: Color);
}

/// `fg` over `bg` at `alpha` coverage.
pub fn blend(bg: Color, fg: Color, alpha: u8) -> Color {
    let a = alpha as u32 * fg[3] as u32 / 255;
    let inv_a = 255 - a;
    let mix = |f: u8, b: u8| ((f as u32 * a + b as u32 * inv_a) / 255) as u8;
    let out_a = (a + bg[3] as u32 * inv_a / 255).min(255) as u8;
    Rgba([mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2]), out_a])
}

impl Canvas for RgbaImage {
    fn bounds(&self) -> Rect {
        let side = |n: u32| i32::try_from(n).unwrap_or(i32::MAX);
        Rect::new(0, 0, side(self.width()), side(self.height()))
    }

    fn fill(&mut self, r: Rect, c: Color) {
        let r = r.intersect(&Canvas::bounds(self));
        for y in r.min.y..r.max.y {
            for x in r.min.x..r.max.x {
                let px = self.get_pixel_mut(x as u32, y as u32);
                *px = if c[3] == 0xff { c } else { blend(*px, c, 0xff) };
            }
        }
    }

    fn draw_mask(&mut self, dest: Rect, mask: &Mask, mask_pt: Point, c: Color) {
        let clip = dest.intersect(&Canvas::bounds(self));
        for y in clip.min.y..clip.max.y {
            for x in clip.min.x..clip.max.x {
                let alpha = mask.alpha_at(
                    mask_pt.x + x - dest.min.x,
                    mask_pt.y + y - dest.min.y,
                );
                if alpha == 0 {
                    continue;
                }
                let px = self.get_pixel_mut(x as u32, y as u32);
                *px = blend(*px, c, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_clips_to_image() {
        let mut img = RgbaImage::new(4, 4);
        img.fill(Rect::new(-2, -2, 2, 2), rgb(255, 0, 0));
        assert_eq!(*img.get_pixel(1, 1), rgb(255, 0, 0));
        assert_eq!(*img.get_pixel(2, 2), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn mask_blends_by_coverage() {
        let mut img = RgbaImage::from_pixel(2, 1, rgb(0, 0, 0));
        let mask = Mask {
            width: 2,
            height: 1,
            pix: vec![255, 0],
        };
        img.draw_mask(Rect::new(0, 0, 2, 1), &mask, Point::default(), rgb(200, 100, 50));
        assert_eq!(*img.get_pixel(0, 0), rgb(200, 100, 50));
        assert_eq!(*img.get_pixel(1, 0), rgb(0, 0, 0));
        assert_eq!(blend(rgb(0, 0, 0), rgb(255, 255, 255), 51), rgb(51, 51, 51));
    }
}
