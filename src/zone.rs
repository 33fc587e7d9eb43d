//! # Zone
//!
//! One spherical triangle of a [`crate::level::Level`]: a center, two
//! in-plane axes, and (owned by the level) a contiguous range of packed
//! star records. See §3/§4.2 of the design.

use geo_nd::Vector;

use crate::Vec3;

fn north() -> Vec3 {
    [0.0, 0.0, 1.0].into()
}

/// One triangular cell of a [`crate::level::Level`].
///
/// `axis0`/`axis1` start as unit vectors and are rescaled in place once the
/// level-wide `positionScale` is known (see `Level::load_from_reader`), so
/// that `center + x0*axis0 + x1*axis1` (for packed integers `x0, x1`)
/// lands close to the unit sphere.
#[derive(Debug, Clone)]
pub struct Zone {
    pub center: Vec3,
    pub axis0: Vec3,
    pub axis1: Vec3,
    /// Range into the owning level's flat record array.
    pub range: std::ops::Range<usize>,
}

impl Zone {
    /// Build a zone from a spherical triangle's three corners, per §4.2's
    /// `initTriangle`. Returns the zone (with unit-length axes, `range`
    /// left empty for the caller to fill in) and this triangle's
    /// contribution to the level-wide `positionScale` candidate.
    pub fn init_triangle(c0: Vec3, c1: Vec3, c2: Vec3) -> (Self, f32) {
        let center: Vec3 = [
            c0[0] + c1[0] + c2[0],
            c0[1] + c1[1] + c2[1],
            c0[2] + c1[2] + c2[2],
        ]
        .into();
        let center = center.normalize();

        let north_cross_center = north().cross_product(center);
        let axis0 = if north_cross_center.length_sq() < 1e-12 {
            // Center coincides with a pole: fall back to an arbitrary
            // in-plane axis, since north x center is degenerate there.
            let fallback: Vec3 = [1.0, 0.0, 0.0].into();
            fallback.cross_product(center).normalize()
        } else {
            north_cross_center.normalize()
        };
        let axis1 = center.cross_product(axis0);

        let mut scale: f32 = 0.0;
        for c in [c0, c1, c2] {
            let d: Vec3 = [c[0] - center[0], c[1] - center[1], c[2] - center[2]].into();
            let mu0 = d.dot(axis0);
            let mu1 = d.dot(axis1);
            let denom = (1.0 - mu0 * mu0 - mu1 * mu1).max(1e-9).sqrt();
            let candidate = mu0.abs().max(mu1.abs()) / denom;
            scale = scale.max(candidate);
        }

        (
            Zone {
                center,
                axis0,
                axis1,
                range: 0..0,
            },
            scale,
        )
    }

    pub fn star_count(&self) -> usize {
        self.range.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_orthogonal_to_axes() {
        let (zone, scale) = Zone::init_triangle(
            [1.0, 0.0, 0.0].into(),
            [0.0, 1.0, 0.0].into(),
            [0.0, 0.0, 1.0].into(),
        );
        assert!(zone.center.dot(zone.axis0).abs() < 1e-5);
        assert!(zone.center.dot(zone.axis1).abs() < 1e-5);
        assert!((zone.axis0.length() - 1.0).abs() < 1e-5);
        assert!((zone.axis1.length() - 1.0).abs() < 1e-5);
        assert!(scale > 0.0);
    }

    #[test]
    fn handles_pole_centered_triangle() {
        let (zone, _scale) = Zone::init_triangle(
            [0.001, 0.0, 0.999_999].into(),
            [-0.0005, 0.000_9, 0.999_999].into(),
            [-0.0005, -0.000_9, 0.999_999].into(),
        );
        assert!(zone.axis0.length().is_finite());
        assert!((zone.axis0.length() - 1.0).abs() < 1e-3);
    }
}
