//! # Render / Colorize
//!
//! Maps a grid snapshot to RGB bytes: nearest-neighbor downscale to the output resolution, then a
//! linear lookup into a colormap ramp after clamping to `[min, max]`.

/// Downscales `grid` (row-major, `src_width x src_height`) to `(dst_width, dst_height)` via
/// nearest-neighbor sampling, then colorizes each sample through `colormap` after clamping to
/// `[min, max]`. Returns a row-major `dst_width * dst_height * 3` RGB byte buffer.
pub fn render_frame(
    grid: &[f64],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
    colormap: &[(u8, u8, u8)],
    min: f64,
    max: f64,
) -> Vec<u8> {
    assert_eq!(grid.len(), src_width * src_height);
    assert!(!colormap.is_empty(), "colormap must have at least one entry");

    let range = (max - min).max(f64::EPSILON);
    let mut out = Vec::with_capacity(dst_width * dst_height * 3);

    for dy in 0..dst_height {
        let sy = (dy * src_height / dst_height).min(src_height - 1);
        for dx in 0..dst_width {
            let sx = (dx * src_width / dst_width).min(src_width - 1);
            let value = grid[sy * src_width + sx].clamp(min, max);
            let fraction = (value - min) / range;
            let idx = ((fraction * (colormap.len() - 1) as f64).round() as usize)
                .min(colormap.len() - 1);
            let (r, g, b) = colormap[idx];
            out.push(r);
            out.push(g);
            out.push(b);
        }
    }

    out
}
