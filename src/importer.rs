use std::time::Duration;

use log::{debug, info};
use scraper::Html;
use url::Url;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extractors::{Extractor, JsonLdExtractor, Kilometre0Extractor, ParsingContext};
use crate::fetchers::RequestFetcher;
use crate::model::{NavigationItem, Recipe};
use crate::navigation;
use crate::store::RecipeStore;

/// Entry point for scans and extractions.
///
/// Holds only immutable state, so one instance can serve concurrent callers.
pub struct RecipeScraper {
    fetcher: RequestFetcher,
    config: ScraperConfig,
    extractors: Vec<Box<dyn Extractor + Send + Sync>>,
}

/// A recipe together with the id the store assigned to it
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub db_id: String,
}

impl RecipeScraper {
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let fetcher = RequestFetcher::new(&config.fetch)?;
        // Site heuristics first, schema.org second
        let extractors: Vec<Box<dyn Extractor + Send + Sync>> = vec![
            Box::new(Kilometre0Extractor::new(&config.site)),
            Box::new(JsonLdExtractor),
        ];

        Ok(Self {
            fetcher,
            config,
            extractors,
        })
    }

    /// Creates a new builder seeded with default configuration
    pub fn builder() -> RecipeScraperBuilder {
        RecipeScraperBuilder::default()
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch `url` and run the extraction strategies in order.
    ///
    /// The returned recipe carries `url` as its source URL.
    pub fn extract(&self, url: &str) -> Result<Recipe, ScrapeError> {
        let context = ParsingContext {
            url: url.to_string(),
            document: self.fetch_document(url)?,
        };

        let recipe = self.extract_from(&context)?;
        Ok(recipe.with_source_url(url))
    }

    /// Run the strategy chain over an already parsed page
    pub fn extract_from(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        for extractor in &self.extractors {
            if !extractor.can_parse(context) {
                debug!("{} does not apply to {}", extractor.name(), context.url);
                continue;
            }
            match extractor.parse(context) {
                Ok(recipe) => {
                    info!(
                        "Extracted {:?} from {} with {}",
                        recipe.name,
                        context.url,
                        extractor.name()
                    );
                    return Ok(recipe);
                }
                Err(e) => debug!("{} found nothing on {}: {}", extractor.name(), context.url, e),
            }
        }

        Err(ScrapeError::NoStructuredData)
    }

    /// Top-level categories; `None` scans the configured site root
    pub fn scan_root(&self, url: Option<&str>) -> Result<Vec<NavigationItem>, ScrapeError> {
        let url = url.unwrap_or(&self.config.site.root_url);
        let document = self.fetch_document(url)?;
        let items = navigation::scan_root(&document, url)?;
        info!("Found {} categories on {}", items.len(), url);
        Ok(items)
    }

    /// Subcategories and recipes of one category page
    pub fn scan_category(&self, url: &str) -> Result<Vec<NavigationItem>, ScrapeError> {
        let document = self.fetch_document(url)?;
        let items = navigation::scan_category(&document, url)?;
        info!("Found {} items on {}", items.len(), url);
        Ok(items)
    }

    /// Extract `url` and persist the result
    pub fn import<S: RecipeStore>(
        &self,
        url: &str,
        store: &mut S,
    ) -> Result<ImportedRecipe, ScrapeError> {
        let recipe = self.extract(url)?;
        let db_id = store.save(&recipe)?;
        info!("Saved recipe {:?} with id {}", recipe.name, db_id);
        Ok(ImportedRecipe { recipe, db_id })
    }

    fn fetch_document(&self, url: &str) -> Result<Html, ScrapeError> {
        Url::parse(url)?;
        let body = self.fetcher.fetch(url)?;
        if body.trim().is_empty() {
            return Err(ScrapeError::ParseError(format!("empty document at {url}")));
        }
        Ok(Html::parse_document(&body))
    }
}

/// Builder for configuring a [`RecipeScraper`]
#[derive(Debug, Default)]
pub struct RecipeScraperBuilder {
    config: ScraperConfig,
}

impl RecipeScraperBuilder {
    /// Start from an explicit configuration (e.g. [`ScraperConfig::load`])
    pub fn config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use kilometre0_scraper::RecipeScraper;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeScraper::builder().timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        // Whole milliseconds, never zero
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.config.fetch.timeout_ms = millis.max(1);
        self
    }

    /// Domain whose pages go through the site-specific extractor
    pub fn site_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.site.domain = domain.into();
        self
    }

    /// Base URL used to absolutize image paths
    pub fn site_root(mut self, root: impl Into<String>) -> Self {
        self.config.site.root = root.into();
        self
    }

    /// Page used by `scan_root(None)`
    pub fn root_url(mut self, url: impl Into<String>) -> Self {
        self.config.site.root_url = url.into();
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.fetch.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<RecipeScraper, ScrapeError> {
        RecipeScraper::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_sub_second_timeout() {
        let scraper = RecipeScraper::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        assert_eq!(scraper.config().fetch.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_builder_never_disables_timeout() {
        let builder = RecipeScraper::builder().timeout(Duration::from_micros(10));
        assert_eq!(builder.config.fetch.timeout(), Duration::from_millis(1));
    }
}
