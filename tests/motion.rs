//! End-to-end proper-motion scenario: a Medium-variant star loaded from a
//! real catalogue file drifts along its zone's axis0 over a thousand years.

use star_catalog_engine::motion::J2000;
use star_catalog_engine::Engine;

fn pack_medium_record(x0: i32, x1: i32, dx0: i32, dx1: i32, mag: u32, bv: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; 10];
    let fields: [(i64, usize, usize); 6] = [
        (x0 as i64, 0, 20),
        (x1 as i64, 20, 20),
        (dx0 as i64, 40, 14),
        (dx1 as i64, 54, 14),
        (mag as i64, 68, 5),
        (bv as i64, 73, 7),
    ];
    for (value, offset, width) in fields {
        let value = (value as u64) & ((1u64 << width) - 1);
        for bit in 0..width {
            if (value >> bit) & 1 == 1 {
                let abs = offset + bit;
                bytes[abs / 8] |= 1 << (abs % 8);
            }
        }
    }
    bytes
}

fn synthetic_medium_catalogue() -> Vec<u8> {
    let n_zones = star_catalog_engine::geodesic_grid::zone_count(0);
    let mut buf = Vec::new();
    buf.extend_from_slice(&0x835f_040au32.to_le_bytes());
    buf.extend_from_slice(&1u32.to_le_bytes()); // type = Medium
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // level 0
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&12000i32.to_le_bytes());
    buf.extend_from_slice(&256i32.to_le_bytes());
    for zone in 0..n_zones {
        let count: i32 = if zone == 0 { 1 } else { 0 };
        buf.extend_from_slice(&count.to_le_bytes());
    }
    buf.extend_from_slice(&pack_medium_record(0, 0, 1000, 0, 5, 20));
    buf
}

#[test]
fn a_thousand_years_of_proper_motion_moves_the_star_along_axis0() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level0.cat");
    std::fs::write(&path, synthetic_medium_catalogue()).unwrap();

    let mut engine = Engine::new();
    engine.catalogue.load(&[path], &|_| {}).unwrap();

    let level = engine.catalogue.level(0).unwrap();
    let jd_plus_1000_years = J2000 + 365_250.0;
    let k = star_catalog_engine::motion::motion_k(jd_plus_1000_years, level.position_scale);
    assert!(k > 0.0);

    let handle = star_catalog_engine::StarHandle {
        level: 0,
        zone: 0,
        star: 0,
    };
    let at_epoch = engine.catalogue.position_of(handle, J2000);
    let later = engine.catalogue.position_of(handle, jd_plus_1000_years);

    assert_ne!(at_epoch, later);
}
