//! Fit-to-canvas scaling.
//!
//! An oriented image is scaled uniformly so its limiting dimension fills 85%
//! of the canvas, then centered.

use serde::{Deserialize, Serialize};

/// Output canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1920;
/// Output canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1080;
/// Share of the canvas the image may occupy along its limiting axis.
pub const MARGIN_FACTOR: f64 = 0.85;

/// Placement of a scaled image on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Uniform scale factor applied to both axes.
    pub scale: f64,
    /// Scaled width in pixels (1..=CANVAS_WIDTH).
    pub scaled_width: u32,
    /// Scaled height in pixels (1..=CANVAS_HEIGHT).
    pub scaled_height: u32,
    /// Left edge of the image on the canvas.
    pub offset_x: u32,
    /// Top edge of the image on the canvas.
    pub offset_y: u32,
}

/// Compute the scale and centered placement for a `width` x `height` image.
///
/// `scale = min(CANVAS_WIDTH / width, CANVAS_HEIGHT / height) * MARGIN_FACTOR`.
/// Scaled dimensions are floored and kept in `1..=canvas`, so extremely thin
/// images still produce at least one pixel.
///
/// Both dimensions must be positive; the decoder rejects empty images before
/// they get here.
pub fn fit_to_canvas(width: u32, height: u32) -> FitResult {
    debug_assert!(width > 0 && height > 0, "cannot fit an empty image");
    let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));

    let scale = (f64::from(CANVAS_WIDTH) / w).min(f64::from(CANVAS_HEIGHT) / h) * MARGIN_FACTOR;

    let scaled_width = ((w * scale).floor() as u32).clamp(1, CANVAS_WIDTH);
    let scaled_height = ((h * scale).floor() as u32).clamp(1, CANVAS_HEIGHT);

    FitResult {
        scale,
        scaled_width,
        scaled_height,
        offset_x: (CANVAS_WIDTH - scaled_width) / 2,
        offset_y: (CANVAS_HEIGHT - scaled_height) / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_landscape_4_3_is_height_limited() {
        let fit = fit_to_canvas(4000, 3000);

        assert!((fit.scale - 0.306).abs() < 1e-9);
        assert!((917..=918).contains(&fit.scaled_height));
        assert!((1223..=1224).contains(&fit.scaled_width));
        assert_eq!(fit.offset_x, (CANVAS_WIDTH - fit.scaled_width) / 2);
        assert_eq!(fit.offset_y, (CANVAS_HEIGHT - fit.scaled_height) / 2);
    }

    #[test]
    fn test_fit_wide_panorama_is_width_limited() {
        let fit = fit_to_canvas(8000, 1000);

        assert!((1631..=1632).contains(&fit.scaled_width));
        assert!((203..=204).contains(&fit.scaled_height));
    }

    #[test]
    fn test_fit_portrait() {
        let fit = fit_to_canvas(3000, 4000);

        assert!((917..=918).contains(&fit.scaled_height));
        assert!((688..=689).contains(&fit.scaled_width));
        assert!(fit.offset_x > fit.offset_y);
    }

    #[test]
    fn test_fit_upscales_small_images() {
        let fit = fit_to_canvas(16, 9);

        assert!(fit.scale > 1.0);
        assert!((1631..=1632).contains(&fit.scaled_width));
        assert!((917..=918).contains(&fit.scaled_height));
    }

    #[test]
    fn test_fit_canvas_sized_image() {
        let fit = fit_to_canvas(CANVAS_WIDTH, CANVAS_HEIGHT);

        assert!((fit.scale - MARGIN_FACTOR).abs() < 1e-12);
        assert_eq!(fit.scaled_width, 1632);
        assert_eq!(fit.scaled_height, 918);
        assert_eq!(fit.offset_x, 144);
        assert_eq!(fit.offset_y, 81);
    }

    #[test]
    fn test_fit_one_pixel_line_stays_visible() {
        let fit = fit_to_canvas(100_000, 1);
        assert_eq!(fit.scaled_height, 1);
        assert!(fit.scaled_width <= CANVAS_WIDTH);
    }
}
