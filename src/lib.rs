//! Hierarchical star catalogue engine: packed binary catalogues, geodesic
//! indexing, proper motion, cone search, name resolution and render
//! planning for a desktop planetarium.
//!
//! The sprite drawer, projector, and tone reproducer stay external
//! collaborators; this crate hands them pixel coordinates, radii, and
//! colours rather than drawing anything itself.

pub mod catalog;
pub mod config;
pub mod error;
pub mod geodesic_grid;
pub mod level;
pub mod motion;
pub mod name_index;
pub mod record;
pub mod render;
pub mod search;
pub mod zone;

pub use catalog::{Catalogue, LoadProgress, StarHandle, NR_OF_HIP};
pub use config::RenderConfig;
pub use error::CatalogueError;
pub use name_index::NameIndex;
pub use record::RecordVariant;
pub use render::{LevelPlan, Navigator, Projector, RandomSource, StarDrawParams, StarDrawer, ToneReproducer};

/// A point or direction on the unit sphere.
pub type Vec3 = geo_nd::FArray<f32, 3>;

/// Everything a single frame's worth of querying and drawing needs: the
/// catalogue, its name index, the render config, and the current Julian
/// date (§3's "pass the JD explicitly into every query and draw").
pub struct Engine {
    pub catalogue: Catalogue,
    pub names: NameIndex,
    pub config: RenderConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            catalogue: Catalogue::new(),
            names: NameIndex::from_builtin(),
            config: RenderConfig::default(),
        }
    }

    /// `searchAround(v, limitFovDegrees, nav, prj)`: every star within
    /// `radius_degrees` of `v`, evaluated at Julian date `jd`. `nav`/`prj`
    /// (navigation/projector) are out of scope per §1 — callers project
    /// the returned handles themselves. Honours `config.flag_stars` as a
    /// master on/off gate, per §6.
    pub fn search_around(&self, v: Vec3, radius_degrees: f32, jd: f64) -> Vec<StarHandle> {
        if !self.catalogue.is_ready() {
            return Vec::new();
        }
        search::search_around(&self.catalogue, &self.config, v, radius_degrees.to_radians(), jd)
    }

    /// `searchByName` ("English / catalogue designation"): resolve a name
    /// to a star handle via the scientific-designation index only, never
    /// consulting common names.
    pub fn search_by_name(&self, name: &str) -> Option<StarHandle> {
        if !self.catalogue.is_ready() {
            return None;
        }
        self.names.resolve(name).and_then(|hip| self.catalogue.search_hip(hip))
    }

    /// `searchByNameI18n`: resolve a name to a star handle, preferring the
    /// localised common-name index and falling back to the
    /// scientific-designation index.
    pub fn search_by_name_i18n(&self, name: &str) -> Option<StarHandle> {
        if !self.catalogue.is_ready() {
            return None;
        }
        self.names.resolve_i18n(name).and_then(|hip| self.catalogue.search_hip(hip))
    }

    /// `searchHip`.
    pub fn search_hip(&self, hip: u32) -> Option<StarHandle> {
        self.catalogue.search_hip(hip)
    }

    /// `listMatching(prefix, maxItems, useStartOfWords, inEnglish)`.
    pub fn list_matching(
        &self,
        prefix: &str,
        max_items: usize,
        use_start_of_words: bool,
        in_english: bool,
    ) -> Vec<String> {
        self.names.list_matching(prefix, max_items, use_start_of_words, in_english)
    }

    /// Localised display name of a star, if its variant carries identity
    /// and a name is registered for its Hipparcos number.
    pub fn name_of(&self, handle: StarHandle) -> Option<&str> {
        let hip = self.catalogue.hip_of(handle)?;
        self.names.common_name(hip)
    }

    /// Build this frame's level render plans (§4.7); the caller walks
    /// each [`LevelPlan`]'s cells (inside then border) and calls
    /// [`render::draw_params`] per star.
    pub fn build_level_plans(&self, fov_degrees: f32, tone: &impl ToneReproducer) -> Vec<LevelPlan> {
        if !self.catalogue.is_ready() {
            return Vec::new();
        }
        render::build_level_plans(&self.catalogue, fov_degrees, &self.config, tone)
    }

    /// `draw(prj, nav, tone)`: walk every visible level/zone/star and hand
    /// sprite/label draw calls to `drawer` (§4.7). Returns elapsed seconds;
    /// returns `0.0` immediately, without touching `drawer`, if the
    /// catalogue isn't loaded or `config.flag_stars` is unset.
    ///
    /// `names_brightness` is the label alpha; it isn't one of §6's config
    /// keys, so callers supply it directly (e.g. from their own UI
    /// brightness setting).
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        prj: &impl Projector,
        nav: &impl Navigator,
        tone: &impl ToneReproducer,
        rng: &mut impl RandomSource,
        names_brightness: f32,
        drawer: &mut impl StarDrawer,
    ) -> f64 {
        if !self.catalogue.is_ready() {
            return 0.0;
        }
        render::draw(
            &self.catalogue,
            &self.names,
            &self.config,
            prj,
            nav,
            tone,
            rng,
            names_brightness,
            drawer,
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
