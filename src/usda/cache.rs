use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::Ingredient;

/// Ingredients already fetched in this process, keyed by FDC id.
///
/// Unbounded and never persisted. One instance is created at startup and
/// handed to the client by reference.
#[derive(Debug, Default)]
pub struct IngredientCache {
    entries: RwLock<HashMap<u64, Ingredient>>,
}

impl IngredientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fdc_id: u64) -> Option<Ingredient> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&fdc_id)
            .cloned()
    }

    pub fn insert(&self, ingredient: Ingredient) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ingredient.fdc_id, ingredient);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
