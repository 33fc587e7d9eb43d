//! # Catalogue
//!
//! Ordered set of [`Level`]s (coarsest to finest); owns the Hipparcos
//! back-index; orchestrates loading (§3/§4.3/§5 of the design).

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;

use log::{info, warn};

use crate::error::CatalogueError;
use crate::level::{Level, LevelRecords};
use crate::motion;
use crate::record::RecordVariant;
use crate::zone::Zone;
use crate::Vec3;

/// Number of valid Hipparcos numbers, `[1, NR_OF_HIP]`.
pub const NR_OF_HIP: usize = 120_416;

/// A lightweight, non-owning reference to one star inside a loaded
/// [`Catalogue`] (§9: "express as index triples rather than raw
/// pointers").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StarHandle {
    pub level: u32,
    pub zone: usize,
    pub star: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CatalogueState {
    #[default]
    Uninitialised,
    Loading,
    Ready,
}

/// The top-level star catalogue: an ordered map of subdivision level to
/// [`Level`], plus the Hipparcos-number back-index.
///
/// Loading takes `&mut self`; queries take `&self`. Rust's ownership rules
/// make these mutually exclusive on one thread, which is the state
/// machine's "Loading is atomic with respect to queries" guarantee without
/// any lock (§5).
#[derive(Debug, Default)]
pub struct Catalogue {
    levels: BTreeMap<u32, Level>,
    hip_index: Vec<Option<StarHandle>>,
    state: CatalogueState,
}

/// Progress callback invoked once per catalogue file attempted, per §5/§6.
pub type LoadProgress<'a> = dyn Fn(&str) + 'a;

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.state == CatalogueState::Ready
    }

    /// Levels in ascending (coarsest-first) order.
    pub fn levels(&self) -> impl Iterator<Item = &Level> {
        self.levels.values()
    }

    pub fn level(&self, level: u32) -> Option<&Level> {
        self.levels.get(&level)
    }

    /// Load every catalogue file in `paths`, in order. `FileMissing` and
    /// `DuplicateLevel` are logged warnings that do not stop the load;
    /// every other error rejects only the offending file's Level (§7).
    pub fn load(
        &mut self,
        paths: &[impl AsRef<Path>],
        progress: &LoadProgress,
    ) -> Result<(), CatalogueError> {
        self.state = CatalogueState::Loading;
        for path in paths {
            let path = path.as_ref();
            let path_str = path.to_string_lossy().to_string();
            progress(&path_str);
            info!("loading catalogue file {path_str}");

            if !path.exists() {
                let err = CatalogueError::FileMissing(path_str.clone());
                warn!("{err}");
                continue;
            }
            let file = match std::fs::File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    warn!("could not open {path_str}: {e}");
                    continue;
                }
            };
            let level = match Level::load_from_reader(BufReader::new(file), &path_str) {
                Ok(level) => level,
                Err(e) => {
                    warn!("rejecting level from {path_str}: {e}");
                    continue;
                }
            };
            if self.levels.contains_key(&level.level) {
                let err = CatalogueError::DuplicateLevel {
                    path: path_str.clone(),
                    level: level.level,
                };
                warn!("{err}");
                continue;
            }
            self.levels.insert(level.level, level);
        }
        self.rebuild_hip_index();
        self.state = CatalogueState::Ready;
        Ok(())
    }

    fn rebuild_hip_index(&mut self) {
        let mut hip_index = vec![None; NR_OF_HIP + 1];
        for level in self.levels.values() {
            let LevelRecords::Full(stars) = &level.records else {
                continue;
            };
            for (zone_idx, zone) in level.zones.iter().enumerate() {
                for star_idx in 0..zone.star_count() {
                    let star = &stars[zone.range.start + star_idx];
                    if star.hip != 0 && (star.hip as usize) <= NR_OF_HIP {
                        hip_index[star.hip as usize] = Some(StarHandle {
                            level: level.level,
                            zone: zone_idx,
                            star: star_idx,
                        });
                    }
                }
            }
        }
        self.hip_index = hip_index;
    }

    /// `searchHip`: look up a star by Hipparcos number.
    pub fn search_hip(&self, hip: u32) -> Option<StarHandle> {
        if !self.is_ready() {
            return None;
        }
        self.hip_index.get(hip as usize).copied().flatten()
    }

    fn zone_of(&self, handle: StarHandle) -> Option<(&Level, &Zone)> {
        let level = self.levels.get(&handle.level)?;
        let zone = level.zones.get(handle.zone)?;
        Some((level, zone))
    }

    pub(crate) fn star_position_in(&self, level: &Level, zone: &Zone, star_idx: usize, k: f32) -> Vec3 {
        let idx = zone.range.start + star_idx;
        match &level.records {
            LevelRecords::Full(stars) => motion::full_position(zone, &stars[idx], k),
            LevelRecords::Medium(stars) => motion::medium_position(zone, &stars[idx], k),
            LevelRecords::Compact(stars) => motion::compact_position(zone, &stars[idx]),
        }
    }

    /// Current J2000-frame position of a star, per §4.4.
    pub fn position_of(&self, handle: StarHandle, jd: f64) -> Vec3 {
        match self.zone_of(handle) {
            Some((level, zone)) => {
                let k = motion::motion_k(jd, level.position_scale);
                self.star_position_in(level, zone, handle.star, k)
            }
            None => [0.0, 0.0, 0.0].into(),
        }
    }

    /// Quantised magnitude bin of a star (raw packed `mag` field).
    pub fn mag_bin_of(&self, handle: StarHandle) -> Option<u32> {
        let (level, zone) = self.zone_of(handle)?;
        let idx = zone.range.start + handle.star;
        Some(match &level.records {
            LevelRecords::Full(stars) => stars.get(idx)?.mag,
            LevelRecords::Medium(stars) => stars.get(idx)?.mag,
            LevelRecords::Compact(stars) => stars.get(idx)?.mag,
        })
    }

    /// True apparent magnitude of a star.
    pub fn magnitude_of(&self, handle: StarHandle) -> Option<f32> {
        let (level, _) = self.zone_of(handle)?;
        let bin = self.mag_bin_of(handle)?;
        Some(level.true_magnitude(bin))
    }

    /// Quantised B-V colour index bin of a star.
    pub fn bv_bin_of(&self, handle: StarHandle) -> Option<u32> {
        let (level, zone) = self.zone_of(handle)?;
        let idx = zone.range.start + handle.star;
        Some(match &level.records {
            LevelRecords::Full(stars) => stars.get(idx)?.bv,
            LevelRecords::Medium(stars) => stars.get(idx)?.bv,
            LevelRecords::Compact(stars) => stars.get(idx)?.bv,
        })
    }

    /// Hipparcos number of a star, if its variant carries identity (Full
    /// only — Compact/Medium stars never resolve a name, per §3).
    pub fn hip_of(&self, handle: StarHandle) -> Option<u32> {
        let (level, zone) = self.zone_of(handle)?;
        let idx = zone.range.start + handle.star;
        match &level.records {
            LevelRecords::Full(stars) => stars.get(idx).map(|s| s.hip).filter(|&h| h != 0),
            _ => None,
        }
    }

    pub fn variant_of(&self, handle: StarHandle) -> Option<RecordVariant> {
        self.levels.get(&handle.level).map(|l| l.variant)
    }
}
