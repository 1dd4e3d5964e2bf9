//! Trilinear free-form deformation.
//!
//! The eight control points are treated as the corners of a (possibly
//! twisted) box. A parametric point is interpolated along X on the four X
//! edges, then along Y between the resulting pairs, then along Z. The order
//! matters: the index layout of [`crate::CornerConvention`] ties each pair to
//! one axis, and permuting it twists the cube.

use glam::Vec3;

use crate::CORNER_COUNT;

/// Linear interpolation `a + (b - a) * t`, component-wise.
///
/// Evaluated as `a * (1 - t) + b * t`, which returns `a` at `t == 0` and `b`
/// at `t == 1` bit for bit, so corners of the cube land exactly on their
/// control points.
#[inline]
#[must_use]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Deformed image of parametric point `p` under control points `points`.
///
/// Components of `p` outside `[0,1]` extrapolate linearly.
#[must_use]
pub fn deform(points: &[Vec3; CORNER_COUNT], p: Vec3) -> Vec3 {
    let far_bottom_x = lerp(points[0], points[1], p.x);
    let far_top_x = lerp(points[2], points[3], p.x);
    let near_bottom_x = lerp(points[4], points[5], p.x);
    let near_top_x = lerp(points[6], points[7], p.x);

    let far_y = lerp(far_bottom_x, far_top_x, p.y);
    let near_y = lerp(near_bottom_x, near_top_x, p.y);

    lerp(far_y, near_y, p.z)
}

/// Applies [`deform`] to every vertex of `base`.
#[must_use]
pub fn deform_positions(points: &[Vec3; CORNER_COUNT], base: &[Vec3]) -> Vec<Vec3> {
    base.iter().map(|&p| deform(points, p)).collect()
}

/// Like [`deform_positions`], writing into an existing buffer.
///
/// `out` is cleared first; its allocation is reused across frames.
pub fn deform_into(points: &[Vec3; CORNER_COUNT], base: &[Vec3], out: &mut Vec<Vec3>) {
    out.clear();
    out.extend(base.iter().map(|&p| deform(points, p)));
}
