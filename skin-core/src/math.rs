//! Math kernel for CPU skinning
//!
//! POD vector and matrix types with the small set of operations the skinning
//! engine needs. Matrices are column-major (`m[col * 4 + row]`), matching the
//! bone pose documents, so no transposition happens anywhere on the load path.

use bytemuck::{Pod, Zeroable};
use std::ops::{Add, AddAssign, Mul};

/// Threshold below which a homogeneous `w` is treated as zero
pub const W_EPSILON: f32 = 1.0e-6;

/// 3-component position
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// 4-component homogeneous vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Homogeneous point `(x, y, z, 1)`
    pub const fn point(p: Vec3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    pub fn to_glam(self) -> glam::Vec4 {
        glam::Vec4::new(self.x, self.y, self.z, self.w)
    }

    pub fn from_glam(v: glam::Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl Add for Vec4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl AddAssign for Vec4 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

/// 4x4 matrix, column-major storage
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// `m[col * 4 + row]`
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Pure translation matrix
    pub const fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY.m;
        m[12] = x;
        m[13] = y;
        m[14] = z;
        Self { m }
    }

    /// Uniform scale matrix (no translation)
    pub const fn from_scale(s: f32) -> Self {
        let mut m = Self::IDENTITY.m;
        m[0] = s;
        m[5] = s;
        m[10] = s;
        Self { m }
    }

    #[inline]
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            y: m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            z: m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            w: m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        }
    }

    /// `self · rhs`: `rhs` is applied first when transforming a vector
    pub fn mul_mat4(&self, rhs: &Mat4) -> Mat4 {
        let mut m = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0f32;
                for k in 0..4 {
                    sum += self.m[k * 4 + row] * rhs.m[col * 4 + k];
                }
                m[col * 4 + row] = sum;
            }
        }
        Mat4 { m }
    }

    pub fn to_glam(&self) -> glam::Mat4 {
        glam::Mat4::from_cols_array(&self.m)
    }

    pub fn from_glam(m: &glam::Mat4) -> Self {
        Self {
            m: m.to_cols_array(),
        }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        self.mul_vec4(v)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.mul_mat4(&rhs)
    }
}

/// Homogeneous divide
///
/// A `w` with magnitude below [`W_EPSILON`] is treated as already describing
/// the 3D point, so `x, y, z` are returned unchanged.
#[inline]
pub fn divide_by_w(v: Vec4) -> Vec3 {
    if v.w.abs() < W_EPSILON {
        return Vec3::new(v.x, v.y, v.z);
    }
    Vec3::new(v.x / v.w, v.y / v.w, v.z / v.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn test_identity_mul_vec4() {
        let v = Vec4::new(1.0, -2.0, 3.5, 1.0);
        assert_eq!(Mat4::IDENTITY * v, v);
    }

    #[test]
    fn test_translation_moves_points_not_directions() {
        let t = Mat4::from_translation(1.0, 2.0, 3.0);
        assert_eq!(t * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(t * Vec4::new(1.0, 0.0, 0.0, 0.0), Vec4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_mul_mat4_order() {
        // scale then translate: T · S
        let t = Mat4::from_translation(10.0, 0.0, 0.0);
        let s = Mat4::from_scale(2.0);
        let p = Vec4::new(1.0, 1.0, 1.0, 1.0);

        assert_eq!((t * s) * p, Vec4::new(12.0, 2.0, 2.0, 1.0));
        assert_eq!((s * t) * p, Vec4::new(22.0, 2.0, 2.0, 1.0));
    }

    #[test]
    fn test_mul_mat4_matches_glam() {
        let a = Mat4::from_cols_array([
            1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0, 1.5, -2.5, 3.5, 1.0,
        ]);
        let b = Mat4::from_cols_array([
            0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 3.0, 2.0, 1.0, 1.0,
        ]);

        let ours = a * b;
        let reference = Mat4::from_glam(&(a.to_glam() * b.to_glam()));
        for (x, y) in ours.m.iter().zip(reference.m.iter()) {
            assert_close(*x, *y);
        }
    }

    #[test]
    fn test_divide_by_w() {
        let p = divide_by_w(Vec4::new(2.0, 4.0, 6.0, 2.0));
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_divide_by_near_zero_w_is_skipped() {
        let p = divide_by_w(Vec4::new(2.0, 4.0, 6.0, 1.0e-7));
        assert_eq!(p, Vec3::new(2.0, 4.0, 6.0));

        let p = divide_by_w(Vec4::new(2.0, 4.0, 6.0, -1.0e-7));
        assert_eq!(p, Vec3::new(2.0, 4.0, 6.0));
    }
}
