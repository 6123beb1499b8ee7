//! Pure vector math for overlay projection
//!
//! Everything here operates in pixel space on [`DVec2`]. Addition,
//! subtraction and scaling come straight from the vector operators; the
//! functions below cover what the projection engine needs beyond them.
//! No shared state.

use chart_studies_shared::Point;
use nalgebra_glm as glm;
use nalgebra_glm::DVec2;

/// Denominator clamp for near-degenerate geometry.
pub const EPSILON: f64 = 1e-6;

/// Pixel-space vector of a chart point.
pub fn vec(p: &Point) -> DVec2 {
    glm::vec2(p.x, p.y)
}

pub fn length(v: DVec2) -> f64 {
    glm::length(&v)
}

pub fn midpoint(a: DVec2, b: DVec2) -> DVec2 {
    (a + b) * 0.5
}

/// Unit vector along `v`. The length is clamped at [`EPSILON`] so a
/// zero-length input yields a finite result instead of NaN.
pub fn normalize(v: DVec2) -> DVec2 {
    v / length(v).max(EPSILON)
}

/// 90° rotation of `v`.
pub fn perpendicular(v: DVec2) -> DVec2 {
    glm::vec2(-v.y, v.x)
}

/// Rotate `p` around `center` by `angle` radians.
pub fn rotate_around(p: DVec2, center: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    let d = p - center;
    glm::vec2(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + center
}

/// Signed angle from `a` to `b`.
pub fn angle_between(a: DVec2, b: DVec2) -> f64 {
    (a.x * b.y - a.y * b.x).atan2(glm::dot(&a, &b))
}

/// Perpendicular projection of `p` onto the normal of the segment
/// `(base_start, base_end)`: the signed height of `p` over the base line.
pub fn signed_height(p: DVec2, base_start: DVec2, base_end: DVec2) -> f64 {
    let normal = perpendicular(normalize(base_end - base_start));
    glm::dot(&(p - base_start), &normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: DVec2, b: DVec2) {
        assert!(
            (a - b).norm() < 1e-9,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn test_perpendicular_is_quarter_turn() {
        assert_close(perpendicular(glm::vec2(1.0, 0.0)), glm::vec2(0.0, 1.0));
        assert_close(perpendicular(glm::vec2(0.0, 1.0)), glm::vec2(-1.0, 0.0));
    }

    #[test]
    fn test_normalize_clamps_zero_vector() {
        let n = normalize(glm::vec2(0.0, 0.0));
        assert!(n.x.is_finite() && n.y.is_finite());
    }

    #[test]
    fn test_rotate_around() {
        let rotated = rotate_around(
            glm::vec2(2.0, 1.0),
            glm::vec2(1.0, 1.0),
            std::f64::consts::FRAC_PI_2,
        );
        assert_close(rotated, glm::vec2(1.0, 2.0));
    }

    #[test]
    fn test_signed_height_sign_follows_side() {
        let a = glm::vec2(0.0, 0.0);
        let b = glm::vec2(10.0, 0.0);
        assert!((signed_height(glm::vec2(5.0, 4.0), a, b) - 4.0).abs() < 1e-9);
        assert!((signed_height(glm::vec2(5.0, -4.0), a, b) + 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_between_signed() {
        let a = glm::vec2(1.0, 0.0);
        let b = glm::vec2(0.0, 1.0);
        assert!((angle_between(a, b) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((angle_between(b, a) + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
