//! Ephemeral interaction state for a catalog view.
//!
//! The state owns the two filter inputs (query, category) and the two hover
//! targets (card, gloss fragment). All reads derive pure views over the
//! catalog; all writes go through the transition methods below, so impossible
//! states such as two simultaneously hovered fragments cannot be represented.

use crate::{CATEGORY_ALL, Catalog, Dua};

/// Identifies the single gloss fragment currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoveredWord {
    pub dua_id: u32,
    pub word_index: usize,
}

#[derive(Debug)]
pub struct ViewState<'a> {
    catalog: &'a Catalog,
    query: String,
    category: String,
    hovered_dua: Option<u32>,
    hovered_word: Option<HoveredWord>,
}

impl<'a> ViewState<'a> {
    /// Fresh state: empty query, sentinel category, nothing hovered.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            query: String::new(),
            category: CATEGORY_ALL.to_string(),
            hovered_dua: None,
            hovered_word: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Selects a category. Values outside the derived category list leave the
    /// state unchanged and return `false`.
    pub fn set_category(&mut self, category: &str) -> bool {
        if self.catalog.is_known_category(category) {
            self.category = category.to_string();
            true
        } else {
            false
        }
    }

    /// Pointer entered a card. A new card implicitly replaces the previous one.
    pub fn enter_dua(&mut self, dua_id: u32) -> bool {
        if self.catalog.by_id(dua_id).is_some() {
            self.hovered_dua = Some(dua_id);
            true
        } else {
            false
        }
    }

    pub fn leave_dua(&mut self) {
        self.hovered_dua = None;
    }

    /// Pointer entered a gloss fragment. Only records with glosses expose
    /// fragment hover targets; out-of-range indices are rejected. An accepted
    /// hover replaces whatever fragment was hovered before, anywhere in the
    /// catalog.
    pub fn enter_word(&mut self, dua_id: u32, word_index: usize) -> bool {
        let valid = self
            .catalog
            .by_id(dua_id)
            .is_some_and(|dua| word_index < dua.word_by_word.len());
        if valid {
            self.hovered_word = Some(HoveredWord { dua_id, word_index });
        }
        valid
    }

    pub fn leave_word(&mut self) {
        self.hovered_word = None;
    }

    pub fn hovered_dua(&self) -> Option<u32> {
        self.hovered_dua
    }

    pub fn hovered_word(&self) -> Option<HoveredWord> {
        self.hovered_word
    }

    /// The records currently visible under (query, category), in catalog order.
    pub fn visible(&self) -> Vec<&'a Dua> {
        self.catalog.filter(&self.query, &self.category)
    }

    pub fn match_count(&self) -> usize {
        self.visible().len()
    }

    /// The meaning of the hovered gloss fragment, if any.
    pub fn tooltip(&self) -> Option<&'a str> {
        let hover = self.hovered_word?;
        let dua = self.catalog.by_id(hover.dua_id)?;
        dua.word_by_word
            .get(hover.word_index)
            .map(|gloss| gloss.meaning.as_str())
    }
}
