use crate::color::Color;
use crate::geometry::Rect;
use crate::surface::Surface;

pub const DEFAULT_BANDS: usize = 20;

/// Flat color of each band, bottom band first. The first band is exactly
/// `start`, the last exactly `end`.
pub fn band_colors(start: Color, end: Color, bands: usize) -> Vec<Color> {
    let bands = bands.max(1);
    (0..bands)
        .map(|i| {
            let t = if bands > 1 {
                i as f32 / (bands - 1) as f32
            } else {
                0.0
            };
            start.lerp(end, t)
        })
        .collect()
}

/// Approximate a vertical gradient with `bands` horizontal strips, `start`
/// at the bottom edge of `rect`.
pub fn draw_gradient(
    surface: &mut impl Surface,
    rect: Rect,
    start: Color,
    end: Color,
    bands: usize,
) {
    let colors = band_colors(start, end, bands);
    let step = rect.height / colors.len() as f32;
    for (i, color) in colors.into_iter().enumerate() {
        let band = Rect::new(rect.x, rect.y + i as f32 * step, rect.width, step);
        surface.fill_rect(band, color);
    }
}
