pub mod clipboard;
mod data;
pub mod view;

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use tracing::debug;

pub use data::{CatalogError, Dua, Gloss};

/// Synthetic category value meaning "no category restriction". Always the first
/// entry of the derived category list.
pub const CATEGORY_ALL: &str = "Semua";

/// Minimum rapidfuzz partial-ratio score (0..=100) for a fuzzy suggestion.
const SUGGEST_THRESHOLD: f64 = 55.0;

static BUNDLED_JSON: &str = include_str!("../data/duas.json");
static BUNDLED: Lazy<Catalog> =
    Lazy::new(|| Catalog::from_json_str(BUNDLED_JSON).expect("bundled dua catalog is valid"));

/// A validated, immutable collection of duas plus its derived category list.
#[derive(Debug)]
pub struct Catalog {
    duas: Vec<Dua>,
    categories: Vec<String>,
}

impl Catalog {
    /// The catalog compiled into the binary, parsed on first access.
    pub fn bundled() -> &'static Catalog {
        &BUNDLED
    }

    /// Parses and validates a catalog from its JSON representation.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let duas: Vec<Dua> = serde_json::from_str(raw)?;
        data::validate(&duas)?;
        let categories = derive_categories(&duas);
        debug!(
            duas = duas.len(),
            categories = categories.len() - 1,
            "catalog loaded"
        );
        Ok(Self { duas, categories })
    }

    /// All records in authored order.
    pub fn duas(&self) -> &[Dua] {
        &self.duas
    }

    pub fn len(&self) -> usize {
        self.duas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.duas.is_empty()
    }

    pub fn by_id(&self, id: u32) -> Option<&Dua> {
        self.duas.iter().find(|dua| dua.id == id)
    }

    /// Distinct categories in first-seen order, with [`CATEGORY_ALL`] prepended.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_known_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// The ordered subsequence of records matching both the free-text query and
    /// the selected category. Pure: same inputs always yield the same rows, and
    /// catalog order is preserved.
    pub fn filter(&self, query: &str, category: &str) -> Vec<&Dua> {
        self.duas
            .iter()
            .filter(|dua| category_matches(dua, category) && dua.matches_query(query))
            .collect()
    }

    /// Fuzzy fallback for queries with no substring match: scores every record
    /// against the query with rapidfuzz and returns the closest ones, best first.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<(&Dua, f64)> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }
        let mut scored: Vec<(&Dua, f64)> = self
            .duas
            .iter()
            .filter_map(|dua| {
                let transliteration = dua.transliteration.to_lowercase();
                let translation = dua.translation.to_lowercase();
                let score = rapidfuzz::fuzz::partial_ratio(needle.chars(), transliteration.chars())
                    .max(rapidfuzz::fuzz::partial_ratio(
                        needle.chars(),
                        translation.chars(),
                    ));
                (score >= SUGGEST_THRESHOLD).then_some((dua, score))
            })
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        scored.truncate(limit);
        scored
    }
}

fn category_matches(dua: &Dua, category: &str) -> bool {
    category == CATEGORY_ALL || dua.category == category
}

fn derive_categories(duas: &[Dua]) -> Vec<String> {
    let mut categories = vec![CATEGORY_ALL.to_string()];
    for dua in duas {
        if !categories.iter().any(|c| c == &dua.category) {
            categories.push(dua.category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> Catalog {
        Catalog::from_json_str(
            r#"[
                {"id": 1, "arabic": "ا", "transliteration": "alpha", "translation": "satu",
                 "category": "Ibadah", "source": "Bukhari", "word_by_word": []},
                {"id": 2, "arabic": "ب", "transliteration": "beta", "translation": "dua",
                 "category": "Ilmu", "source": "Muslim", "word_by_word": []},
                {"id": 3, "arabic": "ت", "transliteration": "gamma", "translation": "tiga",
                 "category": "Ibadah", "source": "Tirmizi", "word_by_word": []}
            ]"#,
        )
        .expect("small catalog parses")
    }

    #[test]
    fn bundled_catalog_has_forty_records() {
        let catalog = Catalog::bundled();
        assert_eq!(catalog.len(), 40);
        assert_eq!(catalog.categories().len(), 27);
        assert_eq!(catalog.categories()[0], CATEGORY_ALL);
    }

    #[test]
    fn bundled_ids_are_ordinal() {
        let catalog = Catalog::bundled();
        for (index, dua) in catalog.duas().iter().enumerate() {
            assert_eq!(dua.id as usize, index + 1);
        }
    }

    #[test]
    fn glosses_reconstruct_the_arabic_text() {
        for dua in Catalog::bundled().duas() {
            if dua.has_glosses() {
                let joined: Vec<&str> = dua.word_by_word.iter().map(|g| g.arabic.as_str()).collect();
                assert_eq!(joined.join(" "), dua.arabic, "dua {} glosses diverge", dua.id);
            }
        }
    }

    #[test]
    fn identity_filter_returns_whole_catalog_in_order() {
        let catalog = Catalog::bundled();
        let rows = catalog.filter("", CATEGORY_ALL);
        assert_eq!(rows.len(), catalog.len());
        let ids: Vec<u32> = rows.iter().map(|dua| dua.id).collect();
        let expected: Vec<u32> = catalog.duas().iter().map(|dua| dua.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn filter_results_are_exactly_the_matching_records() {
        let catalog = Catalog::bundled();
        let rows = catalog.filter("Rabbana", CATEGORY_ALL);
        assert!(!rows.is_empty());
        let result_ids: Vec<u32> = rows.iter().map(|dua| dua.id).collect();
        for dua in catalog.duas() {
            let matches = dua.matches_query("Rabbana");
            assert_eq!(result_ids.contains(&dua.id), matches, "dua {}", dua.id);
        }
    }

    #[test]
    fn query_is_case_insensitive_for_latin_fields() {
        let catalog = Catalog::bundled();
        assert_eq!(
            catalog.filter("rabbana", CATEGORY_ALL).len(),
            catalog.filter("RABBANA", CATEGORY_ALL).len()
        );
    }

    #[test]
    fn arabic_query_matches_verbatim() {
        let catalog = Catalog::bundled();
        let rows = catalog.filter("رَبَّنَا", CATEGORY_ALL);
        assert!(!rows.is_empty());
        for dua in &rows {
            assert!(dua.arabic.contains("رَبَّنَا"));
        }
    }

    #[test]
    fn category_filter_preserves_order_and_exactness() {
        let catalog = Catalog::bundled();
        let rows = catalog.filter("", "Ibadah");
        let ids: Vec<u32> = rows.iter().map(|dua| dua.id).collect();
        let expected: Vec<u32> = catalog
            .duas()
            .iter()
            .filter(|dua| dua.category == "Ibadah")
            .map(|dua| dua.id)
            .collect();
        assert_eq!(ids, expected);
        assert!(!ids.is_empty());
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let catalog = Catalog::bundled();
        assert!(catalog.filter("", "ibadah").is_empty());
    }

    #[test]
    fn unmatched_query_yields_empty_result() {
        let catalog = Catalog::bundled();
        assert!(catalog.filter("zzz-no-match", CATEGORY_ALL).is_empty());
        assert!(catalog.filter("zzz-no-match", "Ibadah").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let catalog = Catalog::bundled();
        let once = catalog.filter("Rabbana", "Perlindungan");
        let twice: Vec<&Dua> = once
            .iter()
            .copied()
            .filter(|dua| dua.category == "Perlindungan" && dua.matches_query("Rabbana"))
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn categories_are_first_seen_order_plus_sentinel() {
        let catalog = small_catalog();
        assert_eq!(catalog.categories(), &["Semua", "Ibadah", "Ilmu"]);
    }

    #[test]
    fn category_count_matches_distinct_values() {
        let catalog = Catalog::bundled();
        let distinct: std::collections::HashSet<&str> = catalog
            .duas()
            .iter()
            .map(|dua| dua.category.as_str())
            .collect();
        assert_eq!(catalog.categories().len(), distinct.len() + 1);
    }

    #[test]
    fn by_id_finds_records_and_rejects_unknown_ids() {
        let catalog = small_catalog();
        assert_eq!(catalog.by_id(2).map(|dua| dua.transliteration.as_str()), Some("beta"));
        assert!(catalog.by_id(99).is_none());
    }

    #[test]
    fn suggest_recovers_from_a_near_miss() {
        let catalog = Catalog::bundled();
        // One 'b' short of "Rabbana"; substring search finds nothing.
        assert!(catalog.filter("Rabana atina", CATEGORY_ALL).is_empty());
        let suggestions = catalog.suggest("Rabana atina", 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 3);
        assert!(
            suggestions
                .iter()
                .any(|(dua, _)| dua.transliteration.contains("Rabbana"))
        );
        for window in suggestions.windows(2) {
            assert!(window[0].1 >= window[1].1);
        }
    }

    #[test]
    fn suggest_ignores_blank_queries() {
        assert!(Catalog::bundled().suggest("   ", 5).is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::from_json_str(
            r#"[
                {"id": 1, "arabic": "ا", "transliteration": "a", "translation": "x",
                 "category": "Ilmu", "source": "s"},
                {"id": 1, "arabic": "ب", "transliteration": "b", "translation": "y",
                 "category": "Ilmu", "source": "s"}
            ]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id: 1 }));
    }

    #[test]
    fn rejects_zero_ids() {
        let err = Catalog::from_json_str(
            r#"[{"id": 0, "arabic": "ا", "transliteration": "a", "translation": "x",
                 "category": "Ilmu", "source": "s"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ZeroId));
    }

    #[test]
    fn rejects_empty_fields() {
        let err = Catalog::from_json_str(
            r#"[{"id": 1, "arabic": "ا", "transliteration": " ", "translation": "x",
                 "category": "Ilmu", "source": "s"}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::EmptyField {
                id: 1,
                field: "transliteration"
            }
        ));
    }

    #[test]
    fn rejects_the_sentinel_as_a_record_category() {
        let err = Catalog::from_json_str(
            r#"[{"id": 1, "arabic": "ا", "transliteration": "a", "translation": "x",
                 "category": "Semua", "source": "s"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::ReservedCategory { id: 1 }));
    }

    #[test]
    fn rejects_empty_catalogs_and_bad_json() {
        assert!(matches!(
            Catalog::from_json_str("[]").unwrap_err(),
            CatalogError::Empty
        ));
        assert!(matches!(
            Catalog::from_json_str("not json").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }
}
