use raylib::prelude::*;

use crate::ffmpeg::FrameGeometry;

/// Part of a `tex_width` x `tex_height` texture that covers a canvas of the
/// given size without distortion (centered crop).
pub fn cover_source(tex_width: f32, tex_height: f32, canvas_width: f32, canvas_height: f32) -> Rectangle {
    if tex_width <= 0.0 || tex_height <= 0.0 || canvas_width <= 0.0 || canvas_height <= 0.0 {
        return Rectangle::new(0.0, 0.0, tex_width.max(0.0), tex_height.max(0.0));
    }
    let canvas_ratio = canvas_width / canvas_height;
    if tex_width / tex_height > canvas_ratio {
        // Too wide: crop the sides
        let width = tex_height * canvas_ratio;
        Rectangle::new((tex_width - width) * 0.5, 0.0, width, tex_height)
    } else {
        let height = tex_width / canvas_ratio;
        Rectangle::new(0.0, (tex_height - height) * 0.5, tex_width, height)
    }
}

/// Narrows a covering source rectangle down to one vertical strip of the canvas.
pub fn strip_source(cover: Rectangle, canvas_width: f32, strip_x: f32, strip_width: f32) -> Rectangle {
    let scale = cover.width / canvas_width;
    Rectangle::new(cover.x + strip_x * scale, cover.y, strip_width * scale, cover.height)
}

/// Column `index` of `region` split into `cells` columns. The last column
/// takes the rounding remainder.
pub fn cell_rect(region: Rectangle, cells: usize, index: usize) -> Rectangle {
    let cells = cells.max(1);
    let width = (region.width / cells as f32).floor();
    let x = region.x + width * index as f32;
    let width = if index + 1 == cells { region.x + region.width - x } else { width };
    Rectangle::new(x, region.y, width, region.height)
}

/// Decode geometry of every column of `region`, in region-local pixels.
pub fn cell_geometries(region: Rectangle, cells: usize) -> Vec<FrameGeometry> {
    (0..cells.max(1))
        .map(|i| {
            let cell = cell_rect(region, cells, i);
            FrameGeometry {
                canvas_width: region.width as i32,
                canvas_height: region.height as i32,
                strip_x: (cell.x - region.x) as i32,
                strip_width: cell.width as i32,
            }
        })
        .collect()
}

/// Content filling `region` through `source`, shifted horizontally by
/// `offset` region widths, clipped to the region.
///
/// Returns the visible `(source, destination)` pair, or `None` when the
/// content is entirely outside.
pub fn shifted_clip(region: Rectangle, source: Rectangle, offset: f32) -> Option<(Rectangle, Rectangle)> {
    let shift = offset * region.width;
    let left = (region.x + shift).max(region.x);
    let right = (region.x + region.width + shift).min(region.x + region.width);
    if right - left <= 0.5 {
        return None;
    }

    let scale = source.width / region.width;
    let src_x = source.x + (left - (region.x + shift)) * scale;
    Some((
        Rectangle::new(src_x, source.y, (right - left) * scale, source.height),
        Rectangle::new(left, region.y, right - left, region.height),
    ))
}

/// How much of cell `cell` the flip overlay covers, from 0 to 1, `elapsed`
/// seconds into a transition lasting `duration`. Cells start `stagger` apart
/// and the last one closes again right when the transition completes. With
/// many cells the stagger shrinks so that it never takes more than three
/// quarters of the transition.
pub fn flip_coverage(elapsed: f32, cell: usize, cells: usize, stagger: f32, duration: f32) -> f32 {
    let gaps = cells.saturating_sub(1) as f32;
    let stagger = if gaps > 0.0 { stagger.min(0.75 * duration / gaps) } else { stagger };
    let span = (duration - stagger * gaps).max(f32::EPSILON);
    let t = (elapsed - stagger * cell as f32) / span;
    if t <= 0.0 || t >= 1.0 {
        return 0.0;
    }
    (std::f32::consts::PI * t).sin()
}

/// Greedy word wrap on a character budget.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_cover_crops_wide_texture_sides() {
        let src = cover_source(1920.0, 1080.0, 960.0, 1080.0);
        assert!(approx(src.width, 960.0));
        assert!(approx(src.height, 1080.0));
        assert!(approx(src.x, 480.0));
        assert!(approx(src.y, 0.0));
    }

    #[test]
    fn test_cover_crops_tall_texture_top_and_bottom() {
        let src = cover_source(1000.0, 2000.0, 1000.0, 1000.0);
        assert!(approx(src.width, 1000.0));
        assert!(approx(src.height, 1000.0));
        assert!(approx(src.y, 500.0));
    }

    #[test]
    fn test_strip_source_maps_column() {
        let cover = Rectangle::new(100.0, 0.0, 800.0, 900.0);
        let strip = strip_source(cover, 400.0, 100.0, 50.0);
        assert!(approx(strip.x, 300.0));
        assert!(approx(strip.width, 100.0));
        assert!(approx(strip.height, 900.0));
    }

    #[test]
    fn test_cells_tile_the_region() {
        let region = Rectangle::new(960.0, 0.0, 965.0, 1080.0);
        let cells: Vec<_> = (0..8).map(|i| cell_rect(region, 8, i)).collect();
        assert!(approx(cells[0].x, 960.0));
        assert!(approx(cells[0].width, 120.0));
        assert!(approx(cells[7].x, 960.0 + 7.0 * 120.0));
        assert!(approx(cells[7].x + cells[7].width, 960.0 + 965.0));
        for pair in cells.windows(2) {
            assert!(approx(pair[0].x + pair[0].width, pair[1].x));
        }
    }

    #[test]
    fn test_unshifted_clip_is_identity() {
        let region = Rectangle::new(0.0, 0.0, 960.0, 1080.0);
        let source = Rectangle::new(10.0, 0.0, 480.0, 540.0);
        let (src, dst) = shifted_clip(region, source, 0.0).unwrap();
        assert!(approx(src.x, 10.0) && approx(src.width, 480.0));
        assert!(approx(dst.x, 0.0) && approx(dst.width, 960.0));
    }

    #[test]
    fn test_half_shifted_clip_keeps_visible_half() {
        let region = Rectangle::new(0.0, 0.0, 960.0, 1080.0);
        let source = Rectangle::new(0.0, 0.0, 480.0, 540.0);

        // Moving out to the left: right half of the content remains, on the left
        let (src, dst) = shifted_clip(region, source, -0.5).unwrap();
        assert!(approx(src.x, 240.0) && approx(src.width, 240.0));
        assert!(approx(dst.x, 0.0) && approx(dst.width, 480.0));

        // Coming in from the right: left half of the content, on the right
        let (src, dst) = shifted_clip(region, source, 0.5).unwrap();
        assert!(approx(src.x, 0.0) && approx(src.width, 240.0));
        assert!(approx(dst.x, 480.0) && approx(dst.width, 480.0));
    }

    #[test]
    fn test_cell_geometries_tile_the_canvas() {
        let region = Rectangle::new(960.0, 0.0, 960.0, 1080.0);
        let strips = cell_geometries(region, 7);
        assert_eq!(strips.len(), 7);
        assert_eq!(strips[0].strip_x, 0);
        assert!(strips.iter().all(|g| g.canvas_width == 960 && g.canvas_height == 1080));
        let last = strips[6];
        assert_eq!(last.strip_x + last.strip_width, 960);
        for pair in strips.windows(2) {
            assert_eq!(pair[0].strip_x + pair[0].strip_width, pair[1].strip_x);
        }

        // A single cell is the full frame
        assert_eq!(cell_geometries(region, 1), vec![FrameGeometry::full(960, 1080)]);
    }

    #[test]
    fn test_fully_shifted_clip_is_hidden() {
        let region = Rectangle::new(0.0, 0.0, 960.0, 1080.0);
        let source = Rectangle::new(0.0, 0.0, 480.0, 540.0);
        assert!(shifted_clip(region, source, 1.0).is_none());
        assert!(shifted_clip(region, source, -1.0).is_none());
    }

    #[test]
    fn test_flip_coverage_is_staggered() {
        // 8 cells, 50ms apart, 600ms transition: each cell sweeps for 250ms
        assert_eq!(flip_coverage(0.0, 0, 8, 0.05, 0.6), 0.0);
        assert!(approx(flip_coverage(0.125, 0, 8, 0.05, 0.6), 1.0));
        assert_eq!(flip_coverage(0.125, 3, 8, 0.05, 0.6), 0.0);
        assert!(approx(flip_coverage(0.475, 7, 8, 0.05, 0.6), 1.0));
        assert_eq!(flip_coverage(0.6, 7, 8, 0.05, 0.6), 0.0);
    }

    #[test]
    fn test_flip_coverage_with_many_cells_still_sweeps() {
        // 20 cells at 50 ms apart would outlast the whole transition
        for cell in [0, 10, 19] {
            let peak = (0..=60)
                .map(|i| flip_coverage(i as f32 * 0.01, cell, 20, 0.05, 0.6))
                .fold(0.0f32, f32::max);
            assert!(peak > 0.9, "cell {cell} peaked at {peak}");
        }
        assert!(flip_coverage(0.6, 19, 20, 0.05, 0.6) < 1e-3);
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("When the tech improves every week, what is timeless?", 20);
        assert_eq!(lines, vec!["When the tech", "improves every week,", "what is timeless?"]);
        assert!(wrap_text("   ", 10).is_empty());
        assert_eq!(wrap_text("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }
}
