//! Heuristic extractor for kilometre0.cat recipe pages.
//!
//! The site is a Joomla install whose recipe articles are free prose: section
//! titles ("Ingredients", "Preparació", ...) are sometimes headings, sometimes a
//! bold run inside a paragraph, and occasionally split across tags. The article
//! body is scanned forward once, assigning every block of text to the section
//! named by the last header seen.

use super::{Extractor, ParsingContext};
use crate::config::SiteConfig;
use crate::dom::{
    descendants, direct_children, normalized_text, resolve_url, select_first,
    text_with_line_breaks,
};
use crate::error::ScrapeError;
use crate::model::{Recipe, UNTITLED_SITE};
use log::{debug, warn};
use scraper::{ElementRef, Html};
use url::Url;

/// Block elements considered by the section scan
const BLOCK_TAGS: &[&str] = &["p", "h3", "h4", "h5", "ul", "ol", "div"];
const HEADING_TAGS: &[&str] = &["h3", "h4", "h5"];
/// Fewer direct children than this means the markup is flat and is rescanned recursively
const MIN_DIRECT_BLOCKS: usize = 3;

const INGREDIENTS_KEYWORD: &str = "gredients";

/// Substrings marking decorative images (logos, share buttons, tracking pixels)
const IMAGE_NOISE: &[&str] = &[
    "logo", "icon", "print", "email", "spacer", "pixel", "facebook", "twitter",
];

/// Section of a recipe article a block of text belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Intro,
    Ingredients,
    Instructions,
    /// Guarnició
    Garnish,
    /// Estris
    Utensils,
    /// Ampliació
    Extension,
}

impl Section {
    /// Classify lowercased header text; first matching keyword wins
    pub fn from_header(text: &str) -> Option<Section> {
        if text.contains(INGREDIENTS_KEYWORD) {
            Some(Section::Ingredients)
        } else if text.contains("preparaci") || text.contains("elaboraci") {
            Some(Section::Instructions)
        } else if text.contains("guarnici") {
            Some(Section::Garnish)
        } else if text.contains("estris") {
            Some(Section::Utensils)
        } else if text.contains("ampliaci") {
            Some(Section::Extension)
        } else {
            None
        }
    }

    /// Label used when a supplementary section is appended to the instructions
    fn label(self) -> Option<&'static str> {
        match self {
            Section::Garnish => Some("GUARNICIÓ"),
            Section::Utensils => Some("ESTRIS"),
            Section::Extension => Some("AMPLIACIÓ"),
            Section::Intro | Section::Ingredients | Section::Instructions => None,
        }
    }
}

/// Text blocks collected per section, in document order
#[derive(Debug, Default)]
struct SectionBlocks {
    intro: Vec<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    garnish: Vec<String>,
    utensils: Vec<String>,
    extension: Vec<String>,
}

impl SectionBlocks {
    fn get_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Intro => &mut self.intro,
            Section::Ingredients => &mut self.ingredients,
            Section::Instructions => &mut self.instructions,
            Section::Garnish => &mut self.garnish,
            Section::Utensils => &mut self.utensils,
            Section::Extension => &mut self.extension,
        }
    }

    fn get(&self, section: Section) -> &[String] {
        match section {
            Section::Intro => &self.intro,
            Section::Ingredients => &self.ingredients,
            Section::Instructions => &self.instructions,
            Section::Garnish => &self.garnish,
            Section::Utensils => &self.utensils,
            Section::Extension => &self.extension,
        }
    }

    /// One ingredient per line, minus blank lines and leaked header fragments
    fn ingredients(&self) -> Vec<String> {
        self.ingredients
            .join("\n")
            .split('\n')
            .map(str::trim)
            .filter(|line| line.chars().count() >= 2)
            .filter(|line| !line.to_lowercase().contains(INGREDIENTS_KEYWORD))
            .map(String::from)
            .collect()
    }

    /// Main instructions followed by labelled garnish, utensils and extension blocks
    fn instructions(&self) -> String {
        let mut parts = self.instructions.clone();
        for section in [Section::Garnish, Section::Utensils, Section::Extension] {
            let Some(label) = section.label() else {
                continue;
            };
            let blocks = self.get(section);
            if !blocks.is_empty() {
                parts.push(format!("\n--- {label} ---\n{}", blocks.join("\n")));
            }
        }
        parts.join("\n")
    }
}

/// Forward-scanning section classifier for kilometre0.cat articles
pub struct Kilometre0Extractor {
    domain: String,
    site_root: String,
}

impl Kilometre0Extractor {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            domain: site.domain.to_lowercase(),
            site_root: site.root.clone(),
        }
    }

    /// Whether `url` is served by the configured domain or one of its subdomains
    pub fn matches_url(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        parsed
            .host_str()
            .map(|host| {
                let host = host.to_lowercase();
                host == self.domain || host.ends_with(&format!(".{}", self.domain))
            })
            .unwrap_or(false)
    }

    fn extract(&self, document: &Html) -> Recipe {
        let root = document.root_element();
        let mut recipe = Recipe::untitled(UNTITLED_SITE);

        if let Some(title) = find_title(root) {
            let text = normalized_text(title);
            if !text.is_empty() {
                recipe.name = text;
            }
        }

        let container = select_first(root, "[itemprop='articleBody']")
            .or_else(|| select_first(root, "div.item-page"));

        if let Some(container) = container {
            let blocks = scan_sections(container);
            recipe.ingredients = blocks.ingredients();
            recipe.instructions = blocks.instructions();
        } else {
            debug!("Kilometre0Extractor: No article body found");
        }

        recipe.image_url = self.find_image(root, container);
        recipe
    }

    fn find_image<'a>(
        &self,
        root: ElementRef<'a>,
        container: Option<ElementRef<'a>>,
    ) -> Option<String> {
        let og_image = select_first(root, "meta[property='og:image']")
            .and_then(|meta| meta.value().attr("content"))
            .filter(|content| !content.is_empty());
        if let Some(content) = og_image {
            return self.image_url(content);
        }

        let mut images = container
            .map(|container| descendants(container, &["img"]))
            .unwrap_or_default();
        if images.is_empty() {
            let fallback_area =
                select_first(root, "div.item-page").or_else(|| select_first(root, "main"));
            if let Some(area) = fallback_area {
                images = descendants(area, &["img"]);
            }
        }

        images
            .iter()
            .filter_map(|img| img.value().attr("src"))
            .find(|src| is_content_image(src))
            .and_then(|src| self.image_url(src))
    }

    /// An image that cannot be made absolute leaves the recipe without one
    fn image_url(&self, src: &str) -> Option<String> {
        match resolve_url(&self.site_root, src) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Kilometre0Extractor: dropping image {:?}: {}", src, e);
                None
            }
        }
    }
}

/// `itemprop="headline"`, else the `h2` in the page header, else the schema name heading
fn find_title(root: ElementRef) -> Option<ElementRef> {
    select_first(root, "[itemprop='headline']")
        .or_else(|| {
            select_first(root, "div.page-header").and_then(|header| select_first(header, "h2"))
        })
        .or_else(|| select_first(root, "h2[itemprop='name']"))
}

fn scan_sections(container: ElementRef) -> SectionBlocks {
    let mut elements = direct_children(container, BLOCK_TAGS);
    if elements.len() < MIN_DIRECT_BLOCKS {
        debug!(
            "Kilometre0Extractor: {} direct blocks, rescanning recursively",
            elements.len()
        );
        elements = descendants(container, BLOCK_TAGS);
    }

    let mut blocks = SectionBlocks::default();
    let mut current = Section::Intro;

    for element in elements {
        let text = normalized_text(element);
        if text.is_empty() {
            continue;
        }

        if let Some(section) = header_section(element, &text) {
            debug!("Kilometre0Extractor: {:?} -> {:?} at {:?}", current, section, text);
            current = section;
            continue;
        }

        let content = text_with_line_breaks(element);
        if !content.is_empty() {
            blocks.get_mut(current).push(content);
        }
    }

    blocks
}

/// Headings are classified by their own text, other blocks by their first bold run
fn header_section(element: ElementRef, text: &str) -> Option<Section> {
    if HEADING_TAGS.contains(&element.value().name()) {
        return Section::from_header(&text.to_lowercase());
    }

    let strong = select_first(element, "strong, b")?;
    let strong_text = normalized_text(strong).to_lowercase();
    // Short bold runs are emphasis, not titles
    if strong_text.chars().count() > 3 {
        Section::from_header(&strong_text)
    } else {
        None
    }
}

fn is_content_image(src: &str) -> bool {
    let src = src.to_lowercase();
    !IMAGE_NOISE.iter().any(|noise| src.contains(noise)) && src.contains("images/")
}

impl Extractor for Kilometre0Extractor {
    fn name(&self) -> &'static str {
        "kilometre0"
    }

    fn can_parse(&self, context: &ParsingContext) -> bool {
        self.matches_url(&context.url)
    }

    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        debug!("Kilometre0Extractor: Starting parse for URL: {}", context.url);
        Ok(self.extract(&context.document))
    }
}
