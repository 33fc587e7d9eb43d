//! # ProperMotion
//!
//! Time-dependent position kernel applied inside every position query
//! (§3/§4.4 of the design). `k` depends only on the Julian date and the
//! owning [`crate::level::Level`]'s `position_scale`, so it is recomputed
//! once per query/draw call rather than cached on the star.

use geo_nd::Vector;

use crate::record::{CompactStar, FullStar, MediumStar};
use crate::zone::Zone;
use crate::Vec3;

/// Julian date of the J2000.0 reference epoch.
pub const J2000: f64 = 2_451_545.0;

const AU_METRES: f64 = 1.495_978_707e11;
const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;
const JULIAN_YEAR_DAYS: f64 = 365.25;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Per-query proper-motion constant, per §3: depends on the caller's
/// Julian date and the owning level's `position_scale`.
pub fn motion_k(jd: f64, position_scale: f32) -> f32 {
    let years = (jd - J2000) / JULIAN_YEAR_DAYS;
    ((std::f64::consts::PI / 180.0) * (0.0001 / 3600.0) * years / position_scale as f64) as f32
}

fn decode_pos(center: Vec3, axis0: Vec3, axis1: Vec3, x0: f32, x1: f32) -> Vec3 {
    let p: Vec3 = [
        center[0] + x0 * axis0[0] + x1 * axis1[0],
        center[1] + x0 * axis0[1] + x1 * axis1[1],
        center[2] + x0 * axis0[2] + x1 * axis1[2],
    ]
    .into();
    p.normalize()
}

/// Current J2000-frame position of a Compact-variant star: no motion term.
pub fn compact_position(zone: &Zone, star: &CompactStar) -> Vec3 {
    decode_pos(zone.center, zone.axis0, zone.axis1, star.x0 as f32, star.x1 as f32)
}

/// Current position of a Medium-variant star, advanced by `k*dx`.
pub fn medium_position(zone: &Zone, star: &MediumStar, k: f32) -> Vec3 {
    decode_pos(
        zone.center,
        zone.axis0,
        zone.axis1,
        star.x0 as f32 + k * star.dx0 as f32,
        star.x1 as f32 + k * star.dx1 as f32,
    )
}

/// Current position of a Full-variant star, advanced by `k*dx`.
pub fn full_position(zone: &Zone, star: &FullStar, k: f32) -> Vec3 {
    decode_pos(
        zone.center,
        zone.axis0,
        zone.axis1,
        star.x0 as f32 + k * star.dx0 as f32,
        star.x1 as f32 + k * star.dx1 as f32,
    )
}

/// Distance in light-years from a Full-variant star's packed parallax
/// (1e-5 arcseconds). Not used to perturb position — info-panel only, per
/// §4.4.
pub fn distance_ly(plx: i32) -> f64 {
    if plx == 0 {
        return f64::INFINITY;
    }
    let parallax_radians = (plx as f64) * 1e-5 * (std::f64::consts::PI / 180.0) / 3600.0;
    let au_per_year = SPEED_OF_LIGHT * SECONDS_PER_DAY * JULIAN_YEAR_DAYS / AU_METRES;
    (1.0 / parallax_radians) / au_per_year
}
