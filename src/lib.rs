pub mod config;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod importer;
pub mod model;
pub mod navigation;
pub mod store;

pub use config::ScraperConfig;
pub use error::{ErrorBody, ScrapeError};
pub use importer::{ImportedRecipe, RecipeScraper, RecipeScraperBuilder};
pub use model::{ItemType, NavigationItem, Recipe};
pub use store::{MemoryStore, RecipeStore, StoredRecipe};

/// Extract a recipe with configuration from `config.toml` / `KM0__*` variables
pub fn extract_recipe(url: &str) -> Result<Recipe, ScrapeError> {
    RecipeScraper::new(ScraperConfig::load()?)?.extract(url)
}

/// Scan the main menu; `None` uses the configured root URL
pub fn scan_root_categories(url: Option<&str>) -> Result<Vec<NavigationItem>, ScrapeError> {
    RecipeScraper::new(ScraperConfig::load()?)?.scan_root(url)
}

pub fn scan_category(url: &str) -> Result<Vec<NavigationItem>, ScrapeError> {
    RecipeScraper::new(ScraperConfig::load()?)?.scan_category(url)
}
