//! # RenderPlanner
//!
//! Per-frame magnitude→radius table, LOD cutoff, and per-star draw
//! parameters (§4.7 of the design). The sprite drawer, projector, and
//! tone reproducer stay external collaborators (§1); this module only
//! ever computes radii, colours, and brightness factors and hands them to
//! a caller-supplied drawer.

use geo_nd::Vector;

use crate::catalog::{Catalogue, StarHandle};
use crate::config::RenderConfig;
use crate::geodesic_grid;
use crate::level::Level;
use crate::name_index::NameIndex;
use crate::Vec3;

/// Maps scene luminance to display luminance given eye adaptation state.
/// An external collaborator per §1; [`LinearTone`] is a pass-through
/// implementation for tests and the CLI.
pub trait ToneReproducer {
    fn adapt(&self, luminance: f32) -> f32;
}

pub struct LinearTone;

impl ToneReproducer for LinearTone {
    fn adapt(&self, luminance: f32) -> f32 {
        luminance
    }
}

/// A source of independent `[0, 1)` samples, one per star per frame, so
/// twinkle is reproducible in tests (§9: "parameterise over a pluggable
/// random source").
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

/// Small xorshift PRNG; not `rand`, since nothing else in this crate needs
/// a general-purpose RNG dependency for one cosmetic jitter term.
pub struct XorShiftRandom {
    state: u32,
}

impl XorShiftRandom {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9e37_79b9 } else { seed },
        }
    }
}

impl RandomSource for XorShiftRandom {
    fn next_unit(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Number of entries in the compiled-in B-V → RGB colour table.
pub const COLOR_TABLE_SIZE: usize = 128;

/// Build the 128-entry B-V → RGB lookup table: index 0 is the hottest
/// (blue-white) end, index 127 the coolest (deep red/orange) end, cooling
/// through white in between, approximating a black-body colour ramp.
pub fn build_color_table() -> [[f32; 3]; COLOR_TABLE_SIZE] {
    let mut table = [[0.0f32; 3]; COLOR_TABLE_SIZE];
    for (i, entry) in table.iter_mut().enumerate() {
        let t = i as f32 / (COLOR_TABLE_SIZE - 1) as f32;
        *entry = if t < 0.5 {
            let u = t / 0.5;
            [0.6 + 0.4 * u, 0.7 + 0.3 * u, 1.0]
        } else {
            let u = (t - 0.5) / 0.5;
            [1.0, 1.0 - 0.5 * u, 1.0 - 0.9 * u]
        };
    }
    table
}

/// `1/fov^2` with `fov` (degrees) clamped to `[0.1, 60]`, per §4.7 step 1.
pub fn fov_q(fov_degrees: f32) -> f32 {
    let fov = fov_degrees.clamp(0.1, 60.0);
    1.0 / (fov * fov)
}

/// Radius, in pixels, of a star of true apparent `magnitude` at this
/// `fov_q`, per §4.7 step 2.
pub fn radius_for_magnitude(magnitude: f32, fov_q: f32, tone: &impl ToneReproducer) -> f32 {
    let luminance = (-0.921_03 * (magnitude + 12.123_31)).exp() * 108_064.73 * fov_q;
    30.0 * tone.adapt(luminance).sqrt()
}

/// One level's contribution to a frame: its index and the per-bin radius
/// table used to decide which of its stars are worth drawing.
#[derive(Debug, Clone)]
pub struct LevelPlan {
    pub level: u32,
    pub radii: Vec<f32>,
}

/// Build the per-level radius tables and the terminating level (§4.7 steps
/// 2-4): levels are visited coarsest-first; the first level whose
/// brightest bin fails the visibility test stops the walk, and no finer
/// level is visited either.
pub fn build_level_plans(
    catalogue: &Catalogue,
    fov_degrees: f32,
    config: &RenderConfig,
    tone: &impl ToneReproducer,
) -> Vec<LevelPlan> {
    let fq = fov_q(fov_degrees);
    let mut plans = Vec::new();
    for level in catalogue.levels() {
        let radii = level_radius_table(level, fq, tone);
        let Some(&brightest) = radii.first() else {
            continue;
        };
        if terminates(brightest, config) {
            break;
        }
        plans.push(LevelPlan {
            level: level.level,
            radii,
        });
    }
    plans
}

fn level_radius_table(level: &Level, fq: f32, tone: &impl ToneReproducer) -> Vec<f32> {
    (0..level.mag_steps.max(0) as u32)
        .map(|bin| radius_for_magnitude(level.true_magnitude(bin), fq, tone))
        .collect()
}

fn terminates(brightest_radius: f32, config: &RenderConfig) -> bool {
    if brightest_radius >= 1.2 {
        return false;
    }
    let c = brightest_radius * brightest_radius / 1.44;
    let passes = brightest_radius >= 0.1 * config.star_scale || c * config.star_mag_scale >= 0.1;
    !passes
}

/// Final drawn radius and brightness multiplier for one star, given its
/// true (unclamped) radius (§4.7 per-star draw rules).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarDrawParams {
    pub radius: f32,
    pub brightness: f32,
}

/// `twinkle_u` is one `[0, 1)` sample from a [`RandomSource`], already
/// drawn by the caller (so the same source can also supply the per-star
/// random phase mentioned in §4.7).
pub fn draw_params(true_radius: f32, config: &RenderConfig, twinkle_u: f32) -> StarDrawParams {
    let mut brightness = 1.0;
    let radius = if true_radius < 1.2 {
        // True radius is below the smallest drawable sprite: keep the
        // sprite at the minimum size but dim it, so total flux is
        // preserved rather than every faint star looking equally bright.
        brightness = true_radius * true_radius / 1.44;
        1.2
    } else if true_radius > 8.0 {
        8.0 + 2.0 * (1.0 + true_radius - 8.0).sqrt() - 2.0
    } else {
        true_radius
    };
    if config.flag_star_twinkle {
        brightness *= 1.0 - config.star_twinkle_amount * twinkle_u;
    }
    StarDrawParams { radius, brightness }
}

/// Whether a star's label should be drawn, per §4.7: `mag < maxMagStarName`
/// and it has a non-empty localised name. Per §9's Open Question, the
/// comparison is against the star's *quantised magnitude bin* (`mag_bin`),
/// not its true magnitude — preserved verbatim from the original, which
/// compares `s->mag` (an integer bin index) against the configured cutoff
/// directly. `config.max_mag_star_name` is therefore itself a bin-index
/// threshold, which callers precompute from a true magnitude via
/// [`crate::level::Level::mag_bin_of`].
pub fn should_draw_label(mag_bin: u32, name: Option<&str>, config: &RenderConfig) -> bool {
    config.flag_star_name
        && (mag_bin as f32) < config.max_mag_star_name
        && name.is_some_and(|n| !n.is_empty())
}

/// Forward projection, field-of-view query, and frustum test (§1: "a
/// projector/camera that supplies forward projection sky-unit-vector ->
/// screen-pixel plus a FOV query and frustum-inclusion test"). External
/// collaborator; not implemented in this crate.
pub trait Projector {
    /// Sky-unit-vector to screen-pixel coordinates.
    fn project(&self, v: Vec3) -> (f32, f32);
    /// Current field of view, in degrees.
    fn fov_degrees(&self) -> f32;
    /// Whether a sky direction currently falls inside the view frustum.
    fn in_frustum(&self, v: Vec3) -> bool;
}

/// Current view direction and Julian date (§3: "pass the JD explicitly into
/// every query and draw"). External collaborator.
pub trait Navigator {
    fn view_direction(&self) -> Vec3;
    fn julian_date(&self) -> f64;
}

/// Sprite/label drawer (§1): the core only ever hands it pixel coordinates,
/// a radius, a colour, and (for labels) a string. External collaborator.
pub trait StarDrawer {
    fn draw_star(&mut self, x: f32, y: f32, radius: f32, color: [f32; 3], point_mode: bool);
    fn draw_label(&mut self, x: f32, y: f32, text: &str, color: [f32; 3], alpha: f32);
}

/// `draw(prj, nav, tone)`: the full per-frame cell-visit orchestration of
/// §4.7. Levels are visited coarsest-first, same termination rule as
/// [`build_level_plans`]; each surviving level's zones are partitioned into
/// inside/border via [`geodesic_grid::zones_in_cap`] against a cap built
/// around the navigator's view direction, the same pattern
/// [`crate::search::search_around`] uses for cone queries. Every star in a
/// visited zone that both passes the projector's frustum test and is
/// brighter than `config.star_limiting_mag` gets `draw_params`/label
/// computed and handed to `drawer`. Returns wall-clock elapsed seconds.
///
/// Returns `0.0` immediately, without touching `drawer`, when
/// `config.flag_stars` is unset — the same master on/off gate
/// `search_around` honours.
///
/// `names_brightness` is the label alpha (§4.7: "a separate
/// `namesBrightness` alpha"). It isn't one of §6's config keys, so it's
/// taken as a parameter here rather than a `RenderConfig` field.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    catalogue: &Catalogue,
    names: &NameIndex,
    config: &RenderConfig,
    prj: &impl Projector,
    nav: &impl Navigator,
    tone: &impl ToneReproducer,
    rng: &mut impl RandomSource,
    names_brightness: f32,
    drawer: &mut impl StarDrawer,
) -> f64 {
    let start = std::time::Instant::now();
    if !config.flag_stars {
        return start.elapsed().as_secs_f64();
    }

    let fov_degrees = prj.fov_degrees();
    let fq = fov_q(fov_degrees);
    let jd = nav.julian_date();
    let view = nav.view_direction().normalize();
    // A cap wide enough to cover the whole view frustum; the exact cutoff
    // is the per-star `prj.in_frustum` test below, so over-inclusion here
    // only costs extra (rejected) candidates, never a missed star.
    let cap_cos = (fov_degrees.to_radians()).cos();
    let color_table = build_color_table();

    for level in catalogue.levels() {
        let radii = level_radius_table(level, fq, tone);
        let Some(&brightest) = radii.first() else {
            continue;
        };
        if terminates(brightest, config) {
            break;
        }
        let k = crate::motion::motion_k(jd, level.position_scale);
        let partition = geodesic_grid::zones_in_cap(level.level, &view, cap_cos);

        for &zone_id in partition.inside.iter().chain(partition.border.iter()) {
            let Some(zone) = level.zones.get(zone_id) else {
                continue;
            };
            for star_idx in 0..zone.star_count() {
                let pos = catalogue.star_position_in(level, zone, star_idx, k);
                if !prj.in_frustum(pos) {
                    continue;
                }
                let handle = StarHandle {
                    level: level.level,
                    zone: zone_id,
                    star: star_idx,
                };
                let Some(mag_bin) = catalogue.mag_bin_of(handle) else {
                    continue;
                };
                let magnitude = level.true_magnitude(mag_bin);
                if magnitude > config.star_limiting_mag {
                    continue;
                }
                let true_radius = radii.get(mag_bin as usize).copied().unwrap_or(0.0);
                let params = draw_params(true_radius, config, rng.next_unit());
                let bv_index = (catalogue.bv_bin_of(handle).unwrap_or(0) as usize)
                    .min(COLOR_TABLE_SIZE - 1);
                let [r, g, b] = color_table[bv_index];
                let color = [
                    r * params.brightness,
                    g * params.brightness,
                    b * params.brightness,
                ];
                let (x, y) = prj.project(pos);
                drawer.draw_star(x, y, params.radius, color, config.flag_point_star);

                let name = catalogue.hip_of(handle).and_then(|hip| names.common_name(hip));
                if should_draw_label(mag_bin, name, config) {
                    let label_color = [r * 0.75, g * 0.75, b * 0.75];
                    drawer.draw_label(x, y, name.unwrap_or(""), label_color, names_brightness);
                }
            }
        }
    }
    start.elapsed().as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_monotonic_decreasing_in_magnitude() {
        let tone = LinearTone;
        let fq = fov_q(45.0);
        let r_bright = radius_for_magnitude(-1.0, fq, &tone);
        let r_dim = radius_for_magnitude(6.0, fq, &tone);
        assert!(r_bright > r_dim);
    }

    #[test]
    fn narrow_fov_eventually_terminates_a_level() {
        let config = RenderConfig {
            star_scale: 1.0,
            star_mag_scale: 1.0,
            ..RenderConfig::default()
        };
        // A very small, very dim "brightest bin" radius must terminate.
        assert!(terminates(0.01, &config));
        assert!(!terminates(5.0, &config));
    }

    #[test]
    fn draw_params_clamps_small_and_large_radii() {
        let config = RenderConfig::default();
        let small = draw_params(0.3, &config, 0.0);
        assert_eq!(small.radius, 1.2);
        assert!(small.brightness < 1.0);

        let large = draw_params(20.0, &config, 0.0);
        assert!(large.radius < 20.0);
        assert!(large.radius > 8.0);
    }

    #[test]
    fn xor_shift_random_produces_values_in_unit_range() {
        let mut rng = XorShiftRandom::new(42);
        for _ in 0..100 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn label_requires_name_and_magnitude_bin_cutoff() {
        let config = RenderConfig::default();
        assert!(should_draw_label(0, Some("Polaris"), &config));
        assert!(!should_draw_label(0, None, &config));
        assert!(!should_draw_label(10, Some("Polaris"), &config));
    }
}
