//! # Level
//!
//! A fixed-subdivision collection of [`Zone`]s sharing one record layout and
//! one magnitude quantisation (§3/§4.2/§4.3 of the design).

use std::io::Read;

use log::warn;

use crate::error::CatalogueError;
use crate::geodesic_grid;
use crate::record::{CompactStar, FullStar, MediumStar, RecordVariant};
use crate::zone::Zone;
use crate::Vec3;

const MAGIC: u32 = 0x835f_040a;
const MAX_MAJOR_FILE_VERSION: u32 = 0;

/// Which packed record array a [`Level`] holds, one [`RecordVariant`] per
/// level (the header's `type` field is level-wide, not per-star).
#[derive(Debug, Clone)]
pub enum LevelRecords {
    Full(Vec<FullStar>),
    Medium(Vec<MediumStar>),
    Compact(Vec<CompactStar>),
}

impl LevelRecords {
    pub fn len(&self) -> usize {
        match self {
            Self::Full(v) => v.len(),
            Self::Medium(v) => v.len(),
            Self::Compact(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fixed geodesic subdivision depth: its zones, their shared record
/// layout, and the milli-magnitude quantisation used by every star in it.
#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    pub variant: RecordVariant,
    pub mag_min: i32,
    pub mag_range: i32,
    pub mag_steps: i32,
    pub position_scale: f32,
    pub zones: Vec<Zone>,
    pub records: LevelRecords,
}

fn read_u32_le<R: Read>(r: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32_le<R: Read>(r: &mut R) -> std::io::Result<i32> {
    Ok(read_u32_le(r)? as i32)
}

impl Level {
    /// True apparent magnitude of a star whose quantised bin is `mag_bin`.
    pub fn true_magnitude(&self, mag_bin: u32) -> f32 {
        (self.mag_min as f32 + mag_bin as f32 * self.mag_range as f32 / self.mag_steps as f32)
            / 1000.0
    }

    /// Inverse of [`Level::true_magnitude`]: the quantised bin a given true
    /// magnitude falls into, for precomputing `max_mag_star_name` cutoffs
    /// (§9 Open Question).
    pub fn mag_bin_of(&self, magnitude: f32) -> i32 {
        ((magnitude * 1000.0 - self.mag_min as f32) * self.mag_steps as f32 / self.mag_range as f32)
            .round() as i32
    }

    /// Parse a catalogue file's header, zone-size table, and packed record
    /// stream (§4.3/§6), build this level's zone geometry via the geodesic
    /// grid, and run `scaleAxis`.
    pub fn load_from_reader<R: Read>(mut r: R, path: &str) -> Result<Self, CatalogueError> {
        let magic = read_u32_le(&mut r)?;
        if magic != MAGIC {
            return Err(CatalogueError::BadMagic {
                path: path.to_string(),
                found: magic,
            });
        }
        let ty = read_u32_le(&mut r)?;
        let major = read_u32_le(&mut r)?;
        let _minor = read_u32_le(&mut r)?;
        let level = read_u32_le(&mut r)?;
        let mag_min = read_i32_le(&mut r)?;
        let mag_range = read_i32_le(&mut r)?;
        let mag_steps = read_i32_le(&mut r)?;

        if major > MAX_MAJOR_FILE_VERSION {
            return Err(CatalogueError::VersionTooNew {
                path: path.to_string(),
                major,
            });
        }
        let variant = RecordVariant::from_type_field(ty).ok_or_else(|| CatalogueError::UnknownType {
            path: path.to_string(),
            ty,
        })?;

        let n_zones = geodesic_grid::zone_count(level);
        let mut zone_sizes = Vec::with_capacity(n_zones);
        for _ in 0..n_zones {
            zone_sizes.push(read_i32_le(&mut r)? as usize);
        }
        let total: usize = zone_sizes.iter().sum();

        let record_bytes = variant.record_bytes();
        let mut raw = vec![0u8; total * record_bytes];
        let read = match r.read(&mut raw) {
            Ok(n) => n,
            Err(e) => return Err(CatalogueError::Io(e)),
        };
        // read() may return short on a single call; keep pulling until EOF
        // or the buffer is full.
        let mut filled = read;
        while filled < raw.len() {
            match r.read(&mut raw[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) => return Err(CatalogueError::Io(e)),
            }
        }
        if filled < raw.len() {
            return Err(CatalogueError::ShortRead {
                path: path.to_string(),
                expected: total,
                read: filled / record_bytes,
            });
        }

        let mut zone_corners = Vec::with_capacity(n_zones);
        let mut zones = Vec::with_capacity(n_zones);
        let mut max_scale: f32 = 0.0;
        for id in 0..n_zones {
            let corners = geodesic_grid::zone_corners(level, id);
            let (zone, scale) = Zone::init_triangle(corners[0], corners[1], corners[2]);
            max_scale = max_scale.max(scale);
            zone_corners.push(corners);
            zones.push(zone);
        }
        let mut offset = 0usize;
        for (zone, &size) in zones.iter_mut().zip(zone_sizes.iter()) {
            zone.range = offset..(offset + size);
            offset += size;
        }

        let records = match variant {
            RecordVariant::Full => {
                let mut stars = Vec::with_capacity(total);
                for (zone_idx, &size) in zone_sizes.iter().enumerate() {
                    let base = zones[zone_idx].range.start;
                    for star_idx in 0..size {
                        let i = base + star_idx;
                        let bytes = &raw[i * record_bytes..(i + 1) * record_bytes];
                        stars.push(FullStar::decode(bytes, path, zone_idx, star_idx)?);
                    }
                }
                LevelRecords::Full(stars)
            }
            RecordVariant::Medium => {
                let mut stars = Vec::with_capacity(total);
                for i in 0..total {
                    let bytes = &raw[i * record_bytes..(i + 1) * record_bytes];
                    stars.push(MediumStar::decode(bytes));
                }
                LevelRecords::Medium(stars)
            }
            RecordVariant::Compact => {
                let mut stars = Vec::with_capacity(total);
                for i in 0..total {
                    let bytes = &raw[i * record_bytes..(i + 1) * record_bytes];
                    stars.push(CompactStar::decode(bytes));
                }
                LevelRecords::Compact(stars)
            }
        };

        let position_scale = if max_scale > 0.0 {
            max_scale / variant.max_pos_val() as f32
        } else {
            1.0 / variant.max_pos_val() as f32
        };
        for zone in &mut zones {
            zone.axis0 = scale_vec(zone.axis0, position_scale);
            zone.axis1 = scale_vec(zone.axis1, position_scale);
        }

        if zones.len() != n_zones {
            warn!("level {level} in {path}: built {} zones, expected {n_zones}", zones.len());
        }

        Ok(Level {
            level,
            variant,
            mag_min,
            mag_range,
            mag_steps,
            position_scale,
            zones,
            records,
        })
    }
}

fn scale_vec(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s].into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_header(out: &mut Vec<u8>, ty: u32, major: u32, minor: u32, level: u32, mag_min: i32, mag_range: i32, mag_steps: i32) {
        out.extend_from_slice(&MAGIC.to_le_bytes());
        out.extend_from_slice(&ty.to_le_bytes());
        out.extend_from_slice(&major.to_le_bytes());
        out.extend_from_slice(&minor.to_le_bytes());
        out.extend_from_slice(&level.to_le_bytes());
        out.extend_from_slice(&mag_min.to_le_bytes());
        out.extend_from_slice(&mag_range.to_le_bytes());
        out.extend_from_slice(&mag_steps.to_le_bytes());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 28]);
        let err = Level::load_from_reader(&buf[..], "bad.cat").unwrap_err();
        assert!(matches!(err, CatalogueError::BadMagic { .. }));
    }

    #[test]
    fn rejects_version_too_new() {
        let mut buf = Vec::new();
        write_header(&mut buf, 2, 1, 0, 0, 0, 12000, 256);
        let err = Level::load_from_reader(&buf[..], "new.cat").unwrap_err();
        assert!(matches!(err, CatalogueError::VersionTooNew { .. }));
    }

    #[test]
    fn loads_one_compact_zone_of_zero_stars_per_level_geometry() {
        // Level 0 has 20 zones; declare all-zero sizes, so there are no
        // records to read but the header/geometry path must still work.
        let mut buf = Vec::new();
        write_header(&mut buf, 2, 0, 0, 0, 0, 12000, 256);
        for _ in 0..geodesic_grid::zone_count(0) {
            buf.extend_from_slice(&0i32.to_le_bytes());
        }
        let level = Level::load_from_reader(&buf[..], "empty.cat").unwrap();
        assert_eq!(level.zones.len(), 20);
        assert_eq!(level.records.len(), 0);
        assert!(level.position_scale > 0.0);
    }
}
