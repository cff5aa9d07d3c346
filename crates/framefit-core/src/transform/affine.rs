//! A minimal 2D affine matrix restricted to what orientation needs.
//!
//! Steps are concatenated the way a graphics context accumulates them: each
//! new step is applied to points *before* the ones already in the matrix.
//! So `Affine::identity().translate(w, 0.0).rotate_quarters(1)` first rotates
//! a point and then translates it.

/// Row-major 2x3 affine matrix.
///
/// ```text
/// | m00 m01 m02 |
/// | m10 m11 m12 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
}

/// Axis-aligned bounds of a transformed rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    pub const fn identity() -> Self {
        Self {
            m00: 1.0,
            m01: 0.0,
            m02: 0.0,
            m10: 0.0,
            m11: 1.0,
            m12: 0.0,
        }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m02: tx,
            m12: ty,
            ..Self::identity()
        }
    }

    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            m00: sx,
            m11: sy,
            ..Self::identity()
        }
    }

    /// Rotation by `quarters * 90` degrees, clockwise on screen (y points down).
    ///
    /// Uses exact sine/cosine values so composed matrices stay integral.
    pub fn quarter_turn(quarters: i32) -> Self {
        let (cos, sin) = match quarters.rem_euclid(4) {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        Self {
            m00: cos,
            m01: -sin,
            m02: 0.0,
            m10: sin,
            m11: cos,
            m12: 0.0,
        }
    }

    /// `self * other`: `other` is applied to points first.
    pub fn concat(&self, other: &Affine) -> Affine {
        Affine {
            m00: self.m00 * other.m00 + self.m01 * other.m10,
            m01: self.m00 * other.m01 + self.m01 * other.m11,
            m02: self.m00 * other.m02 + self.m01 * other.m12 + self.m02,
            m10: self.m10 * other.m00 + self.m11 * other.m10,
            m11: self.m10 * other.m01 + self.m11 * other.m11,
            m12: self.m10 * other.m02 + self.m11 * other.m12 + self.m12,
        }
    }

    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.concat(&Self::translation(tx, ty))
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.concat(&Self::scaling(sx, sy))
    }

    pub fn rotate_quarters(self, quarters: i32) -> Self {
        self.concat(&Self::quarter_turn(quarters))
    }

    #[inline]
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m00 * x + self.m01 * y + self.m02,
            self.m10 * x + self.m11 * y + self.m12,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// Inverse matrix, or None when the matrix is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let m00 = self.m11 / det;
        let m01 = -self.m01 / det;
        let m10 = -self.m10 / det;
        let m11 = self.m00 / det;
        Some(Affine {
            m00,
            m01,
            m02: -(m00 * self.m02 + m01 * self.m12),
            m10,
            m11,
            m12: -(m10 * self.m02 + m11 * self.m12),
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Bounds of the rectangle `[0, width] x [0, height]` after mapping.
    pub fn bounds(&self, width: f64, height: f64) -> Bounds {
        let corners = [
            self.map_point(0.0, 0.0),
            self.map_point(width, 0.0),
            self.map_point(0.0, height),
            self.map_point(width, height),
        ];

        corners.iter().fold(
            Bounds {
                min_x: f64::INFINITY,
                min_y: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, &(x, y)| Bounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        )
    }
}
