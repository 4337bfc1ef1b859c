use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder name used by the site-specific extractor
pub const UNTITLED_SITE: &str = "Sense títol";
/// Placeholder name used by the JSON-LD extractor
pub const UNTITLED_STRUCTURED: &str = "Recepta sense títol";

/// Canonical recipe shape shared by every extraction strategy.
///
/// `url` is left empty by extractors; the orchestrator attaches the source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Recipe {
    /// Empty recipe with a fresh id and the given placeholder name
    pub fn untitled(placeholder: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: placeholder.to_string(),
            ingredients: Vec::new(),
            instructions: String::new(),
            image_url: None,
            url: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Category,
    Recipe,
}

/// A link discovered while walking the site's menus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
}

impl NavigationItem {
    pub fn category(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            kind: ItemType::Category,
        }
    }

    pub fn recipe(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            kind: ItemType::Recipe,
        }
    }
}
