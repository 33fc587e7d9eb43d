//! End-to-end `draw()` scenario over a synthetic catalogue: a single bright
//! star at the navigator's view direction must reach a stub `StarDrawer`.

use star_catalog_engine::geodesic_grid;
use star_catalog_engine::render::{LinearTone, Navigator, Projector, StarDrawer, XorShiftRandom};
use star_catalog_engine::{Engine, Vec3};

const MAGIC: u32 = 0x835f_040a;

fn pack_full_record(hip: u32, mag: u32, bv: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; 28];
    let fields: [(u64, usize, usize); 3] = [(mag as u64, 160, 8), (bv as u64, 168, 7), (hip as u64, 175, 24)];
    for (value, offset, width) in fields {
        for bit in 0..width {
            if (value >> bit) & 1 == 1 {
                let abs = offset + bit;
                bytes[abs / 8] |= 1 << (abs % 8);
            }
        }
    }
    bytes
}

fn synthetic_catalogue_bytes() -> Vec<u8> {
    let n_zones = geodesic_grid::zone_count(0);
    let mut buf = Vec::new();
    buf.extend_from_slice(&MAGIC.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // type = Full
    buf.extend_from_slice(&0u32.to_le_bytes()); // major
    buf.extend_from_slice(&0u32.to_le_bytes()); // minor
    buf.extend_from_slice(&0u32.to_le_bytes()); // level 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&12000i32.to_le_bytes());
    buf.extend_from_slice(&256i32.to_le_bytes());
    for zone in 0..n_zones {
        buf.extend_from_slice(&(if zone == 0 { 1i32 } else { 0i32 }).to_le_bytes());
    }
    buf.extend_from_slice(&pack_full_record(1, 50, 30));
    buf
}

fn zone0_center() -> Vec3 {
    let corners = geodesic_grid::zone_corners(0, 0);
    [
        corners[0][0] + corners[1][0] + corners[2][0],
        corners[0][1] + corners[1][1] + corners[2][1],
        corners[0][2] + corners[1][2] + corners[2][2],
    ]
    .into()
}

struct StubProjector {
    fov_degrees: f32,
}

impl Projector for StubProjector {
    fn project(&self, _v: Vec3) -> (f32, f32) {
        (0.0, 0.0)
    }
    fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }
    fn in_frustum(&self, _v: Vec3) -> bool {
        true
    }
}

struct StubNavigator {
    view: Vec3,
    jd: f64,
}

impl Navigator for StubNavigator {
    fn view_direction(&self) -> Vec3 {
        self.view
    }
    fn julian_date(&self) -> f64 {
        self.jd
    }
}

#[derive(Default)]
struct RecordingDrawer {
    stars: usize,
    labels: usize,
}

impl StarDrawer for RecordingDrawer {
    fn draw_star(&mut self, _x: f32, _y: f32, _radius: f32, _color: [f32; 3], _point_mode: bool) {
        self.stars += 1;
    }
    fn draw_label(&mut self, _x: f32, _y: f32, _text: &str, _color: [f32; 3], _alpha: f32) {
        self.labels += 1;
    }
}

#[test]
fn draw_reaches_the_one_visible_star() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level0.cat");
    std::fs::write(&path, synthetic_catalogue_bytes()).unwrap();

    let mut engine = Engine::new();
    engine.catalogue.load(&[path], &|_| {}).unwrap();

    let prj = StubProjector { fov_degrees: 45.0 };
    let nav = StubNavigator {
        view: zone0_center(),
        jd: star_catalog_engine::motion::J2000,
    };
    let mut rng = XorShiftRandom::new(7);
    let mut drawer = RecordingDrawer::default();

    let elapsed = engine.draw(&prj, &nav, &LinearTone, &mut rng, 1.0, &mut drawer);
    assert!(elapsed >= 0.0);
    assert_eq!(drawer.stars, 1);
}

#[test]
fn draw_skips_everything_when_stars_are_flagged_off() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level0.cat");
    std::fs::write(&path, synthetic_catalogue_bytes()).unwrap();

    let mut engine = Engine::new();
    engine.catalogue.load(&[path], &|_| {}).unwrap();
    engine.config.flag_stars = false;

    let prj = StubProjector { fov_degrees: 45.0 };
    let nav = StubNavigator {
        view: zone0_center(),
        jd: star_catalog_engine::motion::J2000,
    };
    let mut rng = XorShiftRandom::new(7);
    let mut drawer = RecordingDrawer::default();

    engine.draw(&prj, &nav, &LinearTone, &mut rng, 1.0, &mut drawer);
    assert_eq!(drawer.stars, 0);
}
