use crate::error::ScrapeError;
use crate::model::Recipe;
use scraper::Html;

mod json_ld;
mod kilometre0;

pub use json_ld::JsonLdExtractor;
pub use kilometre0::{Kilometre0Extractor, Section};

/// A fetched page, parsed once and shared by every strategy
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

/// One recipe extraction strategy.
///
/// `parse` returns `Err(ScrapeError::NoStructuredData)` for the ordinary
/// "nothing here" case so strategies can be chained.
pub trait Extractor {
    fn name(&self) -> &'static str;

    /// Whether this strategy applies to the page at all
    fn can_parse(&self, _context: &ParsingContext) -> bool {
        true
    }

    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError>;
}
