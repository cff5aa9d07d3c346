//! Layered compositing onto the fixed output canvas.
//!
//! Drawing order is: transparent canvas, then a half-transparent black
//! shadow rectangle nudged one pixel right and down, then the resampled
//! image at its centered position. Every layer is blended source-over.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use thiserror::Error;

use crate::decode::SourceImage;
use crate::fit::{FitResult, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Shadow displacement from the image footprint, in pixels.
pub const SHADOW_OFFSET: i64 = 1;
/// Black at 50% opacity.
pub const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 128]);
/// Bicubic resampling for the scaled image.
pub const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Errors that can occur while compositing.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// The source pixel buffer does not match its declared dimensions.
    #[error("Invalid pixel data for {width}x{height} image: got {actual} bytes")]
    InvalidBuffer {
        width: u32,
        height: u32,
        actual: usize,
    },
}

/// The fixed-size RGBA output buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// A fully transparent `CANVAS_WIDTH` x `CANVAS_HEIGHT` canvas.
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Blend a solid rectangle over the canvas, clipped to its bounds.
    pub fn fill_rect_over(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(width)).min(i64::from(self.width()));
        let y1 = (y + i64::from(height)).min(i64::from(self.height()));

        for py in y0..y1 {
            for px in x0..x1 {
                self.image.get_pixel_mut(px as u32, py as u32).blend(&color);
            }
        }
    }

    /// Blend `top` over the canvas with its top-left corner at (x, y).
    pub fn draw_image_over(&mut self, top: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(&mut self.image, top, x, y);
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Render an oriented image onto a fresh canvas at the placement in `fit`.
///
/// The source is consumed; only the canvas outlives this call.
///
/// # Errors
///
/// Returns `CompositeError::InvalidBuffer` if the source pixel buffer is
/// inconsistent with its dimensions.
pub fn compose(source: SourceImage, fit: &FitResult) -> Result<Canvas, CompositeError> {
    let (width, height, actual) = (source.width, source.height, source.pixels.len());
    let rgba = source
        .into_rgba_image()
        .ok_or(CompositeError::InvalidBuffer {
            width,
            height,
            actual,
        })?;

    let scaled = if rgba.dimensions() == (fit.scaled_width, fit.scaled_height) {
        rgba
    } else {
        imageops::resize(&rgba, fit.scaled_width, fit.scaled_height, RESAMPLE_FILTER)
    };

    let (x, y) = (i64::from(fit.offset_x), i64::from(fit.offset_y));

    let mut canvas = Canvas::new();
    canvas.fill_rect_over(
        x + SHADOW_OFFSET,
        y + SHADOW_OFFSET,
        fit.scaled_width,
        fit.scaled_height,
        SHADOW_COLOR,
    );
    canvas.draw_image_over(&scaled, x, y);

    tracing::debug!(
        "composited {}x{} image at ({}, {})",
        fit.scaled_width,
        fit.scaled_height,
        x,
        y
    );

    Ok(canvas)
}
