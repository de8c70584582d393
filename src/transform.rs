/// A 2D affine transformation matrix stored in row-major order.
///
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// | 0  0  1  |
/// ```
///
/// Used for the bitmap shader matrix and for canvas rotation about a pivot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// `[a, b, tx, c, d, ty]`
    pub data: [f32; 6],
}

impl Transform {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            data: [1.0, 0.0, x, 0.0, 1.0, y],
        }
    }

    /// Rotation in radians. Positive angles turn clockwise on a y-down canvas.
    pub fn rotate(angle_radians: f32) -> Self {
        let cos = angle_radians.cos();
        let sin = angle_radians.sin();
        Self {
            data: [cos, -sin, 0.0, sin, cos, 0.0],
        }
    }

    pub fn rotate_degrees(angle_degrees: f32) -> Self {
        Self::rotate(angle_degrees.to_radians())
    }

    /// Rotation by `angle_degrees` around the pivot `(px, py)`.
    pub fn rotate_about(angle_degrees: f32, px: f32, py: f32) -> Self {
        Self::translate(px, py)
            .then(&Self::rotate_degrees(angle_degrees))
            .then(&Self::translate(-px, -py))
    }

    pub fn scale(s: f32) -> Self {
        Self::scale_xy(s, s)
    }

    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self {
            data: [sx, 0.0, 0.0, 0.0, sy, 0.0],
        }
    }

    /// Compose this transform with another: self * other
    /// Applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [a0, b0, tx0, c0, d0, ty0] = self.data;
        let [a1, b1, tx1, c1, d1, ty1] = other.data;

        Transform {
            data: [
                a0 * a1 + b0 * c1,
                a0 * b1 + b0 * d1,
                a0 * tx1 + b0 * ty1 + tx0,
                c0 * a1 + d0 * c1,
                c0 * b1 + d0 * d1,
                c0 * tx1 + d0 * ty1 + ty0,
            ],
        }
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, tx, c, d, ty] = self.data;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Convert into the raster backend's column-oriented representation.
    pub fn to_skia(&self) -> resvg::tiny_skia::Transform {
        let [a, b, tx, c, d, ty] = self.data;
        resvg::tiny_skia::Transform::from_row(a, c, b, d, tx, ty)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
