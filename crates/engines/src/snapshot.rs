//! PNG output of rendered frames.
//!
//! Feature-gated behind `png` (default on) so the registry can be used without
//! pulling in the `image` crate. Drawing lives in [`crate::pixel`].

use comfort_field_core::{Engine, EngineError};
use std::path::Path;

use crate::pixel::{render_frame, Canvas};

/// Encodes a canvas as a PNG file.
///
/// Returns `EngineError::InvalidDimensions` if the canvas dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(canvas: &Canvas, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(canvas.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(canvas.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, canvas.pixels().to_vec())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

/// Renders the engine's current frame and writes it to `path`.
pub fn write_frame_png(
    engine: &dyn Engine,
    width: usize,
    height: usize,
    path: &Path,
) -> Result<(), EngineError> {
    write_png(&render_frame(engine, width, height)?, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineKind;
    use serde_json::json;

    #[test]
    fn write_png_round_trip() {
        let mut canvas = Canvas::new(16, 12).unwrap();
        canvas.blend(3, 4, [10, 200, 30, 255]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.png");

        write_png(&canvas, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 12);
        assert_eq!(img.get_pixel(3, 4).0, [10, 200, 30, 255]);
    }

    #[test]
    fn write_frame_png_of_a_running_sim() {
        let mut engine = EngineKind::from_name("comfort", 100, 60, 3, &json!({})).unwrap();
        engine.step().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_frame_png(&engine, 100, 60, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (100, 60));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let canvas = Canvas::new(4, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(
            write_png(&canvas, &path),
            Err(EngineError::Io(_))
        ));
    }
}
