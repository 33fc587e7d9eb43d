//! # SpatialSearch
//!
//! Cone query over a [`crate::catalog::Catalogue`] (§4.5 of the design):
//! given a direction and angular radius, build a bounding quadrilateral,
//! ask the geodesic grid which cells it touches at each level, apply
//! proper motion, and keep exact survivors.

use geo_nd::Vector;

use crate::catalog::{Catalogue, StarHandle};
use crate::config::RenderConfig;
use crate::geodesic_grid;
use crate::Vec3;

/// Pick the in-plane helper axes `h0, h1` for building the search quad:
/// the component of `v` with smallest absolute value selects the initial
/// helper, for numerical conditioning (§4.5).
fn helper_axes(v: &Vec3) -> (Vec3, Vec3) {
    let abs = [v[0].abs(), v[1].abs(), v[2].abs()];
    let min_axis = if abs[0] <= abs[1] && abs[0] <= abs[2] {
        [1.0, 0.0, 0.0]
    } else if abs[1] <= abs[0] && abs[1] <= abs[2] {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    let min_axis: Vec3 = min_axis.into();
    let h0 = v.cross_product(min_axis).normalize();
    let h1 = v.cross_product(h0).normalize();
    (h0, h1)
}

/// The four corner unit vectors of a cone query's bounding quadrilateral
/// (§4.5's `e0..e3`).
pub fn search_quad(v: &Vec3, theta: f32) -> [Vec3; 4] {
    let (h0, h1) = helper_axes(v);
    let scale = std::f32::consts::SQRT_2 * theta.tan();
    let e = |h: Vec3, sign: f32| -> Vec3 {
        let p: Vec3 = [
            v[0] + sign * scale * h[0],
            v[1] + sign * scale * h[1],
            v[2] + sign * scale * h[2],
        ]
        .into();
        p.normalize()
    };
    [e(h0, 1.0), e(h0, -1.0), e(h1, 1.0), e(h1, -1.0)]
}

/// Cone query (`searchAround`): every star whose current J2000 position
/// satisfies `pos . v >= cos(theta)`, for `theta` in radians.
///
/// `jd` is the caller-supplied Julian date used to evaluate proper motion.
/// Returns no stars at all when `config.flag_stars` is unset, mirroring
/// upstream's master on/off gate (`if (!getFlagStars()) return result;`).
pub fn search_around(
    catalogue: &Catalogue,
    config: &RenderConfig,
    v: Vec3,
    theta: f32,
    jd: f64,
) -> Vec<StarHandle> {
    if !config.flag_stars {
        return Vec::new();
    }
    let v = v.normalize();
    let cos_theta = theta.cos();
    let quad = search_quad(&v, theta);
    let mut out = Vec::new();

    for level in catalogue.levels() {
        let (cap_center, cap_cos) = geodesic_grid::bounding_cap(&quad, &v);
        let partition = geodesic_grid::zones_in_cap(level.level, &cap_center, cap_cos);
        for &zone_id in partition.inside.iter().chain(partition.border.iter()) {
            let Some(zone) = level.zones.get(zone_id) else {
                continue;
            };
            let k = crate::motion::motion_k(jd, level.position_scale);
            for star_idx in 0..zone.star_count() {
                let pos = catalogue.star_position_in(level, zone, star_idx, k);
                if pos.dot(v) >= cos_theta {
                    out.push(StarHandle {
                        level: level.level,
                        zone: zone_id,
                        star: star_idx,
                    });
                }
            }
        }
    }
    out
}

/// `searchNearest`: the single closest survivor of [`search_around`], tie
/// broken by largest dot product (§4.5).
pub fn search_nearest(
    catalogue: &Catalogue,
    config: &RenderConfig,
    v: Vec3,
    theta: f32,
    jd: f64,
) -> Option<StarHandle> {
    let v = v.normalize();
    let candidates = search_around(catalogue, config, v, theta, jd);
    candidates.into_iter().max_by(|a, b| {
        let pa = catalogue.position_of(*a, jd).dot(v);
        let pb = catalogue.position_of(*b, jd).dot(v);
        pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_axes_are_orthogonal_to_v_and_each_other() {
        let v: Vec3 = [0.2, 0.9, 0.1].into();
        let v = v.normalize();
        let (h0, h1) = helper_axes(&v);
        assert!(h0.dot(v).abs() < 1e-5);
        assert!(h1.dot(v).abs() < 1e-5);
        assert!(h0.dot(h1).abs() < 1e-5);
    }

    #[test]
    fn search_quad_corners_are_near_v_for_small_theta() {
        let v: Vec3 = [0.0, 0.0, 1.0].into();
        let quad = search_quad(&v, 0.01);
        for c in quad {
            assert!(c.dot(v) > 0.99);
        }
    }
}
