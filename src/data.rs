use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

/// One word-by-word fragment: an Arabic substring paired with its standalone meaning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gloss {
    pub arabic: String,
    pub meaning: String,
}

/// One supplication record from the catalog.
///
/// Records are authored once in `data/duas.json` and never mutated at runtime.
/// `word_by_word` may be empty, in which case the Arabic text is displayed as a
/// single unsegmented block with no per-word hover targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dua {
    pub id: u32,
    pub arabic: String,
    pub transliteration: String,
    pub translation: String,
    pub category: String,
    pub source: String,
    #[serde(default)]
    pub word_by_word: Vec<Gloss>,
}

impl Dua {
    /// Clipboard payload: Arabic, transliteration, and translation separated by
    /// blank lines.
    pub fn copy_text(&self) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.arabic, self.transliteration, self.translation
        )
    }

    /// Substring match across the three text fields. Arabic is compared verbatim
    /// (the script has no case); transliteration and translation fold case.
    /// An empty query matches every record.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        if self.arabic.contains(query) {
            return true;
        }
        let needle = query.to_lowercase();
        self.transliteration.to_lowercase().contains(&needle)
            || self.translation.to_lowercase().contains(&needle)
    }

    pub fn has_glosses(&self) -> bool {
        !self.word_by_word.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no records")]
    Empty,
    #[error("dua IDs must be positive")]
    ZeroId,
    #[error("dua {id} reuses an existing ID")]
    DuplicateId { id: u32 },
    #[error("dua {id} has an empty {field}")]
    EmptyField { id: u32, field: &'static str },
    #[error("dua {id} uses the reserved category \"Semua\"")]
    ReservedCategory { id: u32 },
}

pub(crate) fn validate(duas: &[Dua]) -> Result<(), CatalogError> {
    if duas.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::with_capacity(duas.len());
    for dua in duas {
        if dua.id == 0 {
            return Err(CatalogError::ZeroId);
        }
        if !seen.insert(dua.id) {
            return Err(CatalogError::DuplicateId { id: dua.id });
        }
        required(dua.id, "arabic text", &dua.arabic)?;
        required(dua.id, "transliteration", &dua.transliteration)?;
        required(dua.id, "translation", &dua.translation)?;
        required(dua.id, "category", &dua.category)?;
        required(dua.id, "source", &dua.source)?;
        if dua.category == crate::CATEGORY_ALL {
            return Err(CatalogError::ReservedCategory { id: dua.id });
        }
        for gloss in &dua.word_by_word {
            required(dua.id, "gloss fragment", &gloss.arabic)?;
            required(dua.id, "gloss meaning", &gloss.meaning)?;
        }
    }
    Ok(())
}

fn required(id: u32, field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        Err(CatalogError::EmptyField { id, field })
    } else {
        Ok(())
    }
}
