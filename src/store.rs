//! Persistence boundary.
//!
//! The production store is a relational database owned by the API layer; this
//! crate only defines the contract it must honour and an in-memory version.

use crate::error::ScrapeError;
use crate::model::Recipe;
use log::debug;
use uuid::Uuid;

/// Storage for extracted recipes.
///
/// `save` is an upsert keyed on the recipe's source URL: saving a recipe whose
/// URL is already stored overwrites every field of the existing row and keeps
/// its durable id.
pub trait RecipeStore {
    /// Store the recipe and return its durable id
    fn save(&mut self, recipe: &Recipe) -> Result<String, ScrapeError>;

    fn list(&self) -> Vec<StoredRecipe>;

    /// Returns false when no recipe had that id
    fn delete(&mut self, id: &str) -> bool;

    /// Recipes whose name, ingredients or instructions contain every term of `query`
    fn search(&self, query: &str) -> Vec<StoredRecipe>;
}

/// A recipe as held by a store, with the store's own identity
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecipe {
    pub db_id: String,
    pub source_url: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}

impl StoredRecipe {
    fn matches(&self, terms: &[String]) -> bool {
        let haystack = format!(
            "{}\n{}\n{}",
            self.recipe.name,
            self.recipe.ingredients.join("\n"),
            self.recipe.instructions
        )
        .to_lowercase();
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// Source key for recipes saved without an origin URL (entered by hand)
fn manual_source_key() -> String {
    format!("manual-{}", Uuid::new_v4())
}

/// Insertion-ordered store kept in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: Vec<StoredRecipe>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeStore for MemoryStore {
    fn save(&mut self, recipe: &Recipe) -> Result<String, ScrapeError> {
        if recipe.name.trim().is_empty() {
            return Err(ScrapeError::Storage("Name is required".to_string()));
        }

        let source_url = recipe
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(manual_source_key);

        if let Some(existing) = self
            .recipes
            .iter_mut()
            .find(|stored| stored.source_url == source_url)
        {
            debug!("MemoryStore: overwriting {}", source_url);
            existing.recipe = recipe.clone();
            return Ok(existing.db_id.clone());
        }

        let db_id = Uuid::new_v4().to_string();
        self.recipes.push(StoredRecipe {
            db_id: db_id.clone(),
            source_url,
            recipe: recipe.clone(),
        });
        Ok(db_id)
    }

    fn list(&self) -> Vec<StoredRecipe> {
        self.recipes.clone()
    }

    fn delete(&mut self, id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|stored| stored.db_id != id);
        self.recipes.len() != before
    }

    fn search(&self, query: &str) -> Vec<StoredRecipe> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Vec::new();
        }
        self.recipes
            .iter()
            .filter(|stored| stored.matches(&terms))
            .cloned()
            .collect()
    }
}
