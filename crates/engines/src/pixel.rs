//! Pure-computation RGBA rendering of an engine frame.
//!
//! This module is always available (no feature gate); the `png` snapshot path
//! only encodes what is drawn here.

use comfort_field_core::color::{comfort_hue, hsb_to_srgb, Hsb};
use comfort_field_core::{Engine, EngineError, Field, Srgb};
use glam::DVec2;

/// Saturation of heatmap cells.
pub const CELL_SATURATION: f64 = 0.8;
/// Brightness of heatmap cells.
pub const CELL_BRIGHTNESS: f64 = 0.9;
/// Radius of an agent dot, in pixels.
pub const AGENT_RADIUS: f64 = 3.0;

const TRAIL_COLOR: [u8; 4] = [255, 255, 255, 140];
const AGENT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Color of one heatmap cell.
///
/// `hue` is the stored hue field value (degrees / 360); without one the hue
/// is derived from `comfort` directly.
pub fn cell_color(comfort: f64, hue: Option<f64>) -> Srgb {
    let h = hue.map_or_else(|| comfort_hue(comfort), |h| h * 360.0);
    hsb_to_srgb(Hsb {
        h,
        s: CELL_SATURATION,
        b: CELL_BRIGHTNESS,
    })
}

/// Maps a field to an RGBA8 buffer, one pixel per cell.
///
/// Uses `hue` when given and its dimensions match; otherwise each cell's hue
/// comes from its own value. The buffer length is `width * height * 4`.
pub fn field_to_rgba(field: &Field, hue: Option<&Field>) -> Vec<u8> {
    let hue = hue.filter(|h| h.width() == field.width() && h.height() == field.height());
    field
        .data()
        .iter()
        .enumerate()
        .flat_map(|(i, &c)| cell_color(c, hue.map(|h| h.data()[i])).to_rgba8())
        .collect()
}

/// An RGBA8 pixel buffer with simple drawing primitives.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Creates an opaque black canvas.
    ///
    /// Returns `EngineError::InvalidDimensions` if either side is 0.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let pixels = Srgb::BLACK
            .to_rgba8()
            .into_iter()
            .cycle()
            .take(width * height * 4)
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(px)
    }

    /// Alpha-blends `color` over the pixel at `(x, y)`. Off-canvas writes are
    /// ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        let a = f64::from(color[3]) / 255.0;
        for c in 0..3 {
            let dst = f64::from(self.pixels[i + c]);
            let src = f64::from(color[c]);
            self.pixels[i + c] = (src * a + dst * (1.0 - a)).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }

    /// Nearest-neighbor upscale of a `cols x rows` RGBA8 buffer onto the whole
    /// canvas.
    pub fn blit_cells(&mut self, cells: &[u8], cols: usize, rows: usize) {
        if cols == 0 || rows == 0 || cells.len() != cols * rows * 4 {
            return;
        }
        for y in 0..self.height {
            let row = (y * rows / self.height).min(rows - 1);
            for x in 0..self.width {
                let col = (x * cols / self.width).min(cols - 1);
                let src = (row * cols + col) * 4;
                let dst = (y * self.width + x) * 4;
                self.pixels[dst..dst + 4].copy_from_slice(&cells[src..src + 4]);
            }
        }
    }

    /// Draws a one-pixel line from `a` to `b` (Bresenham).
    pub fn line(&mut self, a: DVec2, b: DVec2, color: [u8; 4]) {
        let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
        let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fills a disc of `radius` pixels around `center`.
    pub fn dot(&mut self, center: DVec2, radius: f64, color: [u8; 4]) {
        let r = radius.max(0.0);
        let (x0, x1) = ((center.x - r).floor() as i64, (center.x + r).ceil() as i64);
        let (y0, y1) = ((center.y - r).floor() as i64, (center.y + r).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = DVec2::new(x as f64, y as f64) - center;
                if d.length_squared() <= r * r {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

/// Renders the engine's current frame onto a `width x height` canvas whose
/// pixels are playfield units: heatmap first, then trails, then agents.
pub fn render_frame(
    engine: &dyn Engine,
    width: usize,
    height: usize,
) -> Result<Canvas, EngineError> {
    let mut canvas = Canvas::new(width, height)?;
    let field = engine.field();
    let cells = field_to_rgba(field, engine.hue_field());
    canvas.blit_cells(&cells, field.width(), field.height());

    let agents = engine.agents();
    for agent in &agents {
        for pair in agent.trail.windows(2) {
            canvas.line(pair[0], pair[1], TRAIL_COLOR);
        }
    }
    for agent in &agents {
        canvas.dot(agent.position, AGENT_RADIUS, AGENT_COLOR);
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comfort_field_core::AgentView;
    use serde_json::{json, Value};

    #[test]
    fn field_to_rgba_correct_length() {
        let field = Field::new(8, 4).unwrap();
        assert_eq!(field_to_rgba(&field, None).len(), 8 * 4 * 4);
    }

    #[test]
    fn field_to_rgba_alpha_always_255() {
        let field = Field::filled(4, 4, 0.5).unwrap();
        let buf = field_to_rgba(&field, None);
        for (i, &byte) in buf.iter().enumerate() {
            if i % 4 == 3 {
                assert_eq!(byte, 255, "alpha at pixel {} should be 255", i / 4);
            }
        }
    }

    #[test]
    fn low_comfort_is_red_high_comfort_is_blue() {
        let field = Field::from_data(2, 1, vec![0.0, 1.0]).unwrap();
        let buf = field_to_rgba(&field, None);
        // Hue 0: red dominates.
        assert!(buf[0] > buf[1] && buf[0] > buf[2]);
        // Hue 210: blue dominates.
        assert!(buf[6] > buf[4] && buf[6] > buf[5]);
    }

    #[test]
    fn hue_field_takes_precedence() {
        let comfort = Field::filled(1, 1, 0.0).unwrap();
        let hue = Field::filled(1, 1, 120.0 / 360.0).unwrap();
        let buf = field_to_rgba(&comfort, Some(&hue));
        // Hue 120: green dominates even though comfort alone would be red.
        assert!(buf[1] > buf[0] && buf[1] > buf[2]);
    }

    #[test]
    fn mismatched_hue_field_is_ignored() {
        let comfort = Field::filled(2, 2, 0.0).unwrap();
        let hue = Field::filled(3, 3, 0.5).unwrap();
        assert_eq!(
            field_to_rgba(&comfort, Some(&hue)),
            field_to_rgba(&comfort, None)
        );
    }

    #[test]
    fn canvas_rejects_zero_size() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn blit_upscales_nearest_neighbor() {
        let mut canvas = Canvas::new(4, 2).unwrap();
        let cells = [255, 0, 0, 255, 0, 0, 255, 255];
        canvas.blit_cells(&cells, 2, 1);
        assert_eq!(canvas.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 0), Some([0, 0, 255, 255]));
        assert_eq!(canvas.pixel(3, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.line(DVec2::new(1.0, 1.0), DVec2::new(8.0, 5.0), AGENT_COLOR);
        assert_eq!(canvas.pixel(1, 1), Some(AGENT_COLOR));
        assert_eq!(canvas.pixel(8, 5), Some(AGENT_COLOR));
    }

    #[test]
    fn drawing_off_canvas_is_ignored() {
        let mut canvas = Canvas::new(5, 5).unwrap();
        canvas.dot(DVec2::new(-50.0, -50.0), 3.0, AGENT_COLOR);
        canvas.line(DVec2::new(-10.0, 2.0), DVec2::new(-1.0, 2.0), AGENT_COLOR);
        assert!(canvas.pixels().chunks(4).all(|p| p == [0, 0, 0, 255]));
    }

    struct Fixed {
        field: Field,
    }

    impl Engine for Fixed {
        fn step(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn field(&self) -> &Field {
            &self.field
        }
        fn params(&self) -> Value {
            json!({})
        }
        fn param_schema(&self) -> Value {
            json!({})
        }
        fn frame(&self) -> u64 {
            0
        }
        fn agents(&self) -> Vec<AgentView> {
            vec![AgentView {
                position: DVec2::new(10.0, 10.0),
                trail: vec![DVec2::new(2.0, 18.0), DVec2::new(10.0, 10.0)],
            }]
        }
    }

    #[test]
    fn render_frame_draws_heatmap_trail_and_agent() {
        let engine = Fixed {
            field: Field::filled(2, 2, 0.0).unwrap(),
        };
        let canvas = render_frame(&engine, 20, 20).unwrap();
        assert_eq!(canvas.pixels().len(), 20 * 20 * 4);
        let red = cell_color(0.0, None).to_rgba8();
        assert_eq!(canvas.pixel(19, 0), Some(red));
        assert_eq!(canvas.pixel(10, 10), Some(AGENT_COLOR));
        let trail = canvas.pixel(2, 18).unwrap();
        assert_ne!(trail, red);
        assert!(trail[1] > red[1], "trail should lighten the heatmap");
    }

    #[test]
    fn render_frame_of_a_live_engine() {
        let mut engine = crate::EngineKind::from_name("comfort", 120, 80, 7, &json!({})).unwrap();
        for _ in 0..5 {
            engine.step().unwrap();
        }
        let canvas = render_frame(&engine, 120, 80).unwrap();
        assert_eq!(canvas.width(), 120);
        assert_eq!(canvas.height(), 80);
        assert!(canvas.pixels().chunks(4).all(|p| p[3] == 255));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn line_endpoints_are_always_drawn(
                x0 in 0_usize..32, y0 in 0_usize..32,
                x1 in 0_usize..32, y1 in 0_usize..32,
            ) {
                let mut canvas = Canvas::new(32, 32).unwrap();
                let a = DVec2::new(x0 as f64, y0 as f64);
                let b = DVec2::new(x1 as f64, y1 as f64);
                canvas.line(a, b, AGENT_COLOR);
                prop_assert_eq!(canvas.pixel(x0, y0), Some(AGENT_COLOR));
                prop_assert_eq!(canvas.pixel(x1, y1), Some(AGENT_COLOR));
            }

            #[test]
            fn any_comfort_renders_opaque(c in -1.0_f64..2.0) {
                let field = Field::filled(1, 1, c).unwrap();
                prop_assert_eq!(field_to_rgba(&field, None)[3], 255);
            }
        }
    }
}
