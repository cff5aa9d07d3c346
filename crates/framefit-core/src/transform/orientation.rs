//! Orientation codes to pixel transforms.
//!
//! Each EXIF orientation is expressed as the sequence of scale, translate and
//! quarter-turn steps the legacy renderer used. Those sequences translate by
//! the image *width* on both axes, which only lands the content at the origin
//! for square images. [`TransformMode::Corrected`] re-anchors the result on
//! the transformed bounding box; [`TransformMode::Legacy`] keeps the original
//! placement, clipping whatever ends up at negative coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::affine::Affine;
use crate::decode::{Orientation, SourceImage};

/// Errors that can occur while resolving an orientation transform.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The transformed image would have no pixels.
    #[error("Orientation {code} leaves an empty {width}x{height} destination")]
    EmptyDestination { code: u32, width: u32, height: u32 },
}

/// How transform translations are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Content is moved so its bounding box starts at the origin. Never clips.
    #[default]
    Corrected,
    /// Reproduces the width-only translations of the original tool.
    Legacy,
}

/// A resolved orientation transform together with its destination size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Affine,
    width: u32,
    height: u32,
}

/// The step sequence for an orientation, translating by `width` only.
fn legacy_matrix(orientation: Orientation, width: f64) -> Affine {
    let m = Affine::identity();
    match orientation {
        Orientation::Normal => m,
        Orientation::FlipHorizontal => m.scale(-1.0, 1.0).translate(-width, 0.0),
        Orientation::Rotate180 => m.translate(width, width).rotate_quarters(2),
        Orientation::FlipVertical => m.scale(1.0, -1.0).translate(0.0, -width),
        Orientation::Transpose => m.rotate_quarters(-1).scale(-1.0, 1.0),
        Orientation::Rotate90CW => m.translate(width, 0.0).rotate_quarters(1),
        Orientation::Transverse => m
            .scale(-1.0, 1.0)
            .translate(-width, 0.0)
            .translate(0.0, width)
            .rotate_quarters(3),
        Orientation::Rotate270CW => m.translate(0.0, width).rotate_quarters(3),
    }
}

impl Transform {
    /// Resolve an orientation code for a `width` x `height` source.
    ///
    /// Codes 0, 1 and anything outside 1-8 resolve to the identity.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::EmptyDestination` if the destination has a
    /// zero dimension (zero-sized sources, or legacy placement that pushes
    /// everything off-canvas).
    pub fn resolve(
        code: u32,
        width: u32,
        height: u32,
        mode: TransformMode,
    ) -> Result<Transform, TransformError> {
        let orientation = Orientation::from(code);
        let legacy = legacy_matrix(orientation, f64::from(width));
        let bounds = legacy.bounds(f64::from(width), f64::from(height));

        let (matrix, dst_w, dst_h) = match mode {
            TransformMode::Corrected => (
                Affine::translation(-bounds.min_x, -bounds.min_y).concat(&legacy),
                bounds.max_x - bounds.min_x,
                bounds.max_y - bounds.min_y,
            ),
            TransformMode::Legacy => (legacy, bounds.max_x.ceil(), bounds.max_y.ceil()),
        };

        let dst_w = dst_w.max(0.0).round() as u32;
        let dst_h = dst_h.max(0.0).round() as u32;
        if dst_w == 0 || dst_h == 0 {
            return Err(TransformError::EmptyDestination {
                code,
                width: dst_w,
                height: dst_h,
            });
        }

        Ok(Transform {
            matrix,
            width: dst_w,
            height: dst_h,
        })
    }

    /// Destination size as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Map a continuous source coordinate into destination space.
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        self.matrix.map_point(x, y)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix.is_identity()
    }

    /// Apply the transform, producing a new image of the destination size.
    ///
    /// Every destination pixel centre is mapped back into the source and the
    /// pixel it lands in is copied. For quarter-turn transforms this is an
    /// exact permutation. Destination pixels with no source pixel stay
    /// transparent.
    pub fn apply(&self, image: &SourceImage) -> SourceImage {
        if self.is_identity() && image.dimensions() == self.dimensions() {
            return image.clone();
        }

        let mut output = SourceImage::transparent(self.width, self.height);
        let Some(inverse) = self.matrix.inverse() else {
            return output;
        };

        let (src_w, src_h) = (image.width as usize, image.height as usize);
        let dst_w = self.width as usize;

        for dst_y in 0..self.height as usize {
            for dst_x in 0..dst_w {
                let (sx, sy) = inverse.map_point(dst_x as f64 + 0.5, dst_y as f64 + 0.5);
                let (sx, sy) = (sx.floor(), sy.floor());
                if sx < 0.0 || sy < 0.0 || sx >= src_w as f64 || sy >= src_h as f64 {
                    continue;
                }

                let src_idx = (sy as usize * src_w + sx as usize) * 4;
                let dst_idx = (dst_y * dst_w + dst_x) * 4;
                output.pixels[dst_idx..dst_idx + 4]
                    .copy_from_slice(&image.pixels[src_idx..src_idx + 4]);
            }
        }

        output
    }
}

/// Resolve and apply the orientation for `code` in one step.
pub fn apply_orientation(
    image: &SourceImage,
    code: u32,
    mode: TransformMode,
) -> Result<SourceImage, TransformError> {
    let transform = Transform::resolve(code, image.width, image.height, mode)?;
    Ok(transform.apply(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Image where every pixel encodes its own coordinates.
    fn coord_image(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 7, 255]);
            }
        }
        SourceImage::new(width, height, pixels)
    }

    fn corrected(img: &SourceImage, code: u32) -> SourceImage {
        apply_orientation(img, code, TransformMode::Corrected).unwrap()
    }

    #[test]
    fn test_identity_codes() {
        let img = coord_image(5, 3);
        for code in [0, 1, 9, 255] {
            let t = Transform::resolve(code, 5, 3, TransformMode::Corrected).unwrap();
            assert!(t.is_identity(), "code {} should be identity", code);
            assert_eq!(t.apply(&img), img);
        }
    }

    #[test]
    fn test_flip_horizontal() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 2);

        assert_eq!(out.dimensions(), (w, h));
        for y in 0..h {
            for x in 0..w {
                assert_eq!(out.pixel(x, y), img.pixel(w - 1 - x, y));
            }
        }
    }

    #[test]
    fn test_rotate_180() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 3);

        assert_eq!(out.dimensions(), (w, h));
        for y in 0..h {
            for x in 0..w {
                assert_eq!(out.pixel(x, y), img.pixel(w - 1 - x, h - 1 - y));
            }
        }
    }

    #[test]
    fn test_flip_vertical() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 4);

        assert_eq!(out.dimensions(), (w, h));
        for y in 0..h {
            for x in 0..w {
                assert_eq!(out.pixel(x, y), img.pixel(x, h - 1 - y));
            }
        }
    }

    #[test]
    fn test_transpose() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 5);

        assert_eq!(out.dimensions(), (h, w));
        for y in 0..w {
            for x in 0..h {
                assert_eq!(out.pixel(x, y), img.pixel(y, x));
            }
        }
    }

    #[test]
    fn test_rotate_90_cw() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 6);

        assert_eq!(out.dimensions(), (h, w));
        for y in 0..w {
            for x in 0..h {
                assert_eq!(out.pixel(x, y), img.pixel(y, h - 1 - x));
            }
        }
    }

    #[test]
    fn test_transverse() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 7);

        assert_eq!(out.dimensions(), (h, w));
        for y in 0..w {
            for x in 0..h {
                assert_eq!(out.pixel(x, y), img.pixel(w - 1 - y, h - 1 - x));
            }
        }
    }

    #[test]
    fn test_rotate_270_cw() {
        let (w, h) = (5, 3);
        let img = coord_image(w, h);
        let out = corrected(&img, 8);

        assert_eq!(out.dimensions(), (h, w));
        for y in 0..w {
            for x in 0..h {
                assert_eq!(out.pixel(x, y), img.pixel(w - 1 - y, x));
            }
        }
    }

    #[test]
    fn test_square_image_modes_agree() {
        // With width == height the legacy translations are already right.
        let img = coord_image(4, 4);
        for code in 0..=8 {
            let legacy = apply_orientation(&img, code, TransformMode::Legacy).unwrap();
            assert_eq!(legacy, corrected(&img, code), "code {}", code);
        }
    }

    #[test]
    fn test_legacy_rotate_180_landscape_leaves_gap() {
        // Translating by width on the y axis pushes a 4x2 image down by 2.
        let img = coord_image(4, 2);
        let t = Transform::resolve(3, 4, 2, TransformMode::Legacy).unwrap();
        assert_eq!(t.dimensions(), (4, 4));

        let out = t.apply(&img);
        assert_eq!(out.pixel(0, 0)[3], 0);
        assert_eq!(out.pixel(3, 1)[3], 0);
        assert_eq!(out.pixel(0, 2), img.pixel(3, 1));
        assert_eq!(out.pixel(3, 3), img.pixel(0, 0));
    }

    #[test]
    fn test_legacy_flip_vertical_portrait_clips() {
        // 2x4 source: translating by width (2) leaves the bottom half at y < 0.
        let img = coord_image(2, 4);
        let t = Transform::resolve(4, 2, 4, TransformMode::Legacy).unwrap();
        assert_eq!(t.dimensions(), (2, 2));

        let out = t.apply(&img);
        assert_eq!(out.pixel(0, 0), img.pixel(0, 1));
        assert_eq!(out.pixel(1, 1), img.pixel(1, 0));
    }

    #[test]
    fn test_legacy_rotate_90_landscape_offsets_content() {
        let img = coord_image(4, 2);
        let t = Transform::resolve(6, 4, 2, TransformMode::Legacy).unwrap();
        assert_eq!(t.dimensions(), (4, 4));

        let out = t.apply(&img);
        // content occupies x in [2, 4)
        assert_eq!(out.pixel(0, 0)[3], 0);
        assert_eq!(out.pixel(2, 0), img.pixel(0, 1));
        assert_eq!(out.pixel(3, 3), img.pixel(3, 0));
    }

    #[test]
    fn test_zero_sized_source_is_rejected() {
        let err = Transform::resolve(1, 0, 5, TransformMode::Corrected).unwrap_err();
        assert!(matches!(err, TransformError::EmptyDestination { .. }));

        let err = Transform::resolve(6, 0, 5, TransformMode::Legacy).unwrap_err();
        assert_eq!(
            err,
            TransformError::EmptyDestination {
                code: 6,
                width: 0,
                height: 0
            }
        );
    }

    #[test]
    fn test_map_point_matches_dimensions() {
        let t = Transform::resolve(6, 40, 30, TransformMode::Corrected).unwrap();
        assert_eq!(t.dimensions(), (30, 40));
        assert_eq!(t.map_point(0.0, 0.0), (30.0, 0.0));
        assert_eq!(t.map_point(40.0, 30.0), (0.0, 40.0));
    }

    #[test]
    fn test_transform_mode_default() {
        assert_eq!(TransformMode::default(), TransformMode::Corrected);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = SourceImage> {
        (1u32..=12, 1u32..=12).prop_map(|(w, h)| {
            let mut pixels = Vec::with_capacity((w * h * 4) as usize);
            for y in 0..h {
                for x in 0..w {
                    pixels.extend_from_slice(&[x as u8, y as u8, (x * y) as u8, 255]);
                }
            }
            SourceImage::new(w, h, pixels)
        })
    }

    proptest! {
        /// Property: corrected transforms never clip, only permute pixels.
        #[test]
        fn prop_corrected_is_permutation(img in image_strategy(), code in 0u32..=10) {
            let out = apply_orientation(&img, code, TransformMode::Corrected).unwrap();

            let expected = if Orientation::from(code).swaps_dimensions() {
                (img.height, img.width)
            } else {
                (img.width, img.height)
            };
            prop_assert_eq!(out.dimensions(), expected);

            let mut a: Vec<_> = img.pixels.chunks_exact(4).map(|p| p.to_vec()).collect();
            let mut b: Vec<_> = out.pixels.chunks_exact(4).map(|p| p.to_vec()).collect();
            a.sort();
            b.sort();
            prop_assert_eq!(a, b);
        }

        /// Property: the destination is always non-empty for non-empty sources.
        #[test]
        fn prop_legacy_destination_non_empty(img in image_strategy(), code in 0u32..=10) {
            let t = Transform::resolve(code, img.width, img.height, TransformMode::Legacy).unwrap();
            let (w, h) = t.dimensions();
            prop_assert!(w >= 1 && h >= 1);
        }
    }
}
