//! # NameIndex
//!
//! Common-name and scientific-name tables, case-folded and swappable on
//! locale change (§3/§4.6 of the design). Seed data is the teacher's
//! Hipparcos common-name alias table (`HIP_ALIASES`); scientific
//! designations have no analogue in the retrieval pack's data so that
//! table starts empty but is fully wired up.

use std::collections::BTreeMap;

/// Common English names for a handful of well-known Hipparcos stars.
///
/// Source: <https://www.cosmos.esa.int/web/hipparcos/common-star-names>
pub const HIP_ALIASES: &[(u32, &str)] = &[
    (677, "Alpheratz"),
    (746, "Caph"),
    (1067, "Algenib"),
    (2081, "Ankaa"),
    (3179, "Shedir"),
    (3419, "Diphda"),
    (5447, "Mirach"),
    (7588, "Achernar"),
    (9640, "Almaak"),
    (9884, "Hamal"),
    (10826, "Mira"),
    (11767, "Polaris"),
    (13847, "Acamar"),
    (14135, "Menkar"),
    (14576, "Algol"),
    (15863, "Mirphak"),
    (17702, "Alcyone"),
    (21421, "Aldebaran"),
    (24436, "Rigel"),
    (24608, "Capella"),
    (25336, "Bellatrix"),
    (27989, "Betelgeuse"),
    (30438, "Canopus"),
    (32349, "Sirius"),
    (36850, "Castor"),
    (37279, "Procyon"),
    (37826, "Pollux"),
    (49669, "Regulus"),
    (54061, "Dubhe"),
    (60718, "Acrux"),
    (65474, "Spica"),
    (69673, "Arcturus"),
    (91262, "Vega"),
    (97649, "Altair"),
    (102098, "Deneb"),
    (113368, "Fomalhaut"),
];

/// Parsed form of a name lookup, per §9 ("replace exception-for-control-flow
/// in name parsing with explicit parse-result variants").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    HipNumber(u32),
    Name(String),
}

/// `HP<spaces><digits>` (case-insensitive, `_` already folded to space by
/// the caller) parses to a Hipparcos number; anything else is a plain name.
pub fn parse_name(upper: &str) -> ParsedName {
    if let Some(rest) = upper.strip_prefix("HP") {
        let digits = rest.trim_start();
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = digits.parse::<u32>() {
                return ParsedName::HipNumber(n);
            }
        }
    }
    ParsedName::Name(upper.to_string())
}

/// Normalise a raw name for lookup: upper-case, `_` -> space (§4.6 step 1).
pub fn fold(s: &str) -> String {
    s.to_uppercase().replace('_', " ")
}

/// Common-name and scientific-name tables for one locale/sky-culture.
///
/// Rebuilt wholesale and swapped on locale change (§5); never mutated
/// in place.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    common_english: BTreeMap<u32, String>,
    common_translated: BTreeMap<u32, String>,
    common_by_cap_translated: BTreeMap<String, u32>,
    sci_translated: BTreeMap<u32, String>,
    sci_by_cap_translated: BTreeMap<String, u32>,
}

impl NameIndex {
    /// Build a `NameIndex` from the built-in common-name table, with no
    /// translation applied (translated == english).
    pub fn from_builtin() -> Self {
        let mut index = Self::default();
        for &(hip, name) in HIP_ALIASES {
            index.insert_common(hip, name, name);
        }
        index
    }

    /// Insert a common-name record parsed from a `hip|english_name` line
    /// (§6 common-name file format); `_` in `name` is rendered as space.
    pub fn insert_common(&mut self, hip: u32, english: &str, translated: &str) {
        let translated = translated.replace('_', " ");
        self.common_by_cap_translated
            .insert(fold(&translated), hip);
        self.common_english.insert(hip, english.replace('_', " "));
        self.common_translated.insert(hip, translated);
    }

    /// Insert a scientific-designation record (§6 scientific-name file
    /// format): the underscored designation before the terminating `_`.
    pub fn insert_scientific(&mut self, hip: u32, designation: &str) {
        let designation = designation.replace('_', " ");
        self.sci_by_cap_translated
            .insert(fold(&designation), hip);
        self.sci_translated.insert(hip, designation);
    }

    pub fn common_name(&self, hip: u32) -> Option<&str> {
        self.common_translated.get(&hip).map(String::as_str)
    }

    pub fn scientific_name(&self, hip: u32) -> Option<&str> {
        self.sci_translated.get(&hip).map(String::as_str)
    }

    /// `searchByNameI18n` resolution per §4.6: HP-number parse, then the
    /// localised common-name reverse index, falling back to the
    /// scientific-designation index. Returns the resolved Hipparcos
    /// number, leaving the caller to map it to a star handle via the
    /// catalogue's `hipIndex`.
    pub fn resolve_i18n(&self, raw: &str) -> Option<u32> {
        match parse_name(&fold(raw)) {
            ParsedName::HipNumber(n) => Some(n),
            ParsedName::Name(name) => self
                .common_by_cap_translated
                .get(&name)
                .or_else(|| self.sci_by_cap_translated.get(&name))
                .copied(),
        }
    }

    /// `searchByName` resolution per §4.6 ("English / catalogue
    /// designation"): HP-number parse, then the scientific-designation
    /// index only. Common names are deliberately not consulted here —
    /// upstream's non-i18n search path has that lookup commented out, only
    /// `searchByNameI18n` scans common names.
    pub fn resolve(&self, raw: &str) -> Option<u32> {
        match parse_name(&fold(raw)) {
            ParsedName::HipNumber(n) => Some(n),
            ParsedName::Name(name) => self.sci_by_cap_translated.get(&name).copied(),
        }
    }

    /// `listMatching(prefix, maxItems, useStartOfWords, inEnglish)`:
    /// case-folded prefix scan over the common-name (English or localised,
    /// per `in_english`) and scientific-name tables, returning
    /// case-preserved display names in lexicographic order, capped at
    /// `max_items`. When `use_start_of_words` is set, the prefix may match
    /// the start of any word in the display name, not just the start of
    /// the whole string.
    pub fn list_matching(
        &self,
        prefix: &str,
        max_items: usize,
        use_start_of_words: bool,
        in_english: bool,
    ) -> Vec<String> {
        if max_items == 0 {
            return Vec::new();
        }
        let prefix = fold(prefix);
        let matches = |display: &str| -> bool {
            if use_start_of_words {
                fold(display).split(' ').any(|word| word.starts_with(&prefix))
            } else {
                fold(display).starts_with(&prefix)
            }
        };

        let common = if in_english {
            self.common_english.values()
        } else {
            self.common_translated.values()
        };
        let mut names: Vec<String> = common
            .filter(|name| matches(name))
            .cloned()
            .chain(self.sci_translated.values().filter(|name| matches(name)).cloned())
            .collect();
        names.sort();
        names.dedup();
        names.truncate(max_items);
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polaris_resolves_via_i18n_three_ways() {
        let index = NameIndex::from_builtin();
        assert_eq!(index.resolve_i18n("Polaris"), Some(11767));
        assert_eq!(index.resolve_i18n("HP 11767"), Some(11767));
        assert_eq!(index.resolve_i18n("hp_11767"), Some(11767));
    }

    #[test]
    fn hip_number_parses_the_same_via_either_resolver() {
        let index = NameIndex::from_builtin();
        assert_eq!(index.resolve("HP 11767"), Some(11767));
        assert_eq!(index.resolve("hp_11767"), Some(11767));
    }

    #[test]
    fn plain_resolve_does_not_consult_common_names() {
        let index = NameIndex::from_builtin();
        assert_eq!(index.resolve("Polaris"), None);
        assert_eq!(index.resolve_i18n("Polaris"), Some(11767));
    }

    #[test]
    fn plain_resolve_matches_scientific_designations() {
        let mut index = NameIndex::from_builtin();
        index.insert_scientific(11767, "Alpha_UMi");
        assert_eq!(index.resolve("Alpha UMi"), Some(11767));
        assert_eq!(index.resolve_i18n("Alpha UMi"), Some(11767));
    }

    #[test]
    fn list_matching_returns_display_names_sorted_and_capped() {
        let mut index = NameIndex::default();
        for (hip, name) in [
            (1u32, "Albireo"),
            (2, "Alcyone"),
            (3, "Aldebaran"),
            (4, "Algol"),
            (5, "Altair"),
            (6, "Vega"),
        ] {
            index.insert_common(hip, name, name);
        }
        let matches = index.list_matching("Al", 3, false, false);
        assert_eq!(matches, vec!["Albireo", "Alcyone", "Aldebaran"]);
    }

    #[test]
    fn list_matching_start_of_words_matches_mid_string_words() {
        let mut index = NameIndex::default();
        index.insert_common(1, "Beta Centauri", "Beta Centauri");
        index.insert_common(2, "Alpha Centauri", "Alpha Centauri");
        assert_eq!(index.list_matching("Cent", 10, false, false), Vec::<String>::new());
        assert_eq!(
            index.list_matching("Cent", 10, true, false),
            vec!["Alpha Centauri", "Beta Centauri"]
        );
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let index = NameIndex::from_builtin();
        assert_eq!(index.resolve_i18n("Not A Star"), None);
    }
}
