use super::{Extractor, ParsingContext};
use crate::dom::selector;
use crate::error::ScrapeError;
use crate::model::{Recipe, UNTITLED_STRUCTURED};
use log::debug;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Schema.org `Recipe` objects embedded as `application/ld+json` scripts
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_recipe(&self, json_ld_recipe: JsonLdRecipe) -> Recipe {
        let mut recipe = Recipe::untitled(UNTITLED_STRUCTURED);

        if let Some(TextValue::Text(name)) = json_ld_recipe.name {
            if !name.is_empty() {
                recipe.name = name;
            }
        }

        recipe.ingredients = match json_ld_recipe.recipe_ingredient {
            Some(RecipeIngredients::Single(ingredient)) => vec![ingredient],
            Some(RecipeIngredients::Multiple(ingredients)) => ingredients
                .into_iter()
                .filter_map(|ingredient| match ingredient {
                    TextValue::Text(text) => Some(text),
                    TextValue::Other(_) => None,
                })
                .collect(),
            Some(RecipeIngredients::Other(_)) | None => Vec::new(),
        };

        recipe.instructions = match json_ld_recipe.recipe_instructions {
            Some(RecipeInstructions::Text(text)) => text,
            Some(RecipeInstructions::Steps(steps)) => steps
                .into_iter()
                .filter_map(InstructionStep::into_text)
                .collect::<Vec<String>>()
                .join("\n"),
            Some(RecipeInstructions::Other(_)) | None => String::new(),
        };

        recipe.image_url = match json_ld_recipe.image {
            Some(ImageType::Url(url)) => Some(url),
            Some(ImageType::Multiple(images)) => {
                images.into_iter().next().and_then(|image| match image {
                    ImageEntry::Url(url) => Some(url),
                    ImageEntry::Object(object) => image_object_url(&object),
                    ImageEntry::Other(_) => None,
                })
            }
            Some(ImageType::Object(object)) => image_object_url(&object),
            Some(ImageType::Other(_)) | None => None,
        };

        recipe
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    #[serde(default)]
    name: Option<TextValue>,
    #[serde(default, rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(default, rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(default)]
    image: Option<ImageType>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Text(String),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Single(String),
    Multiple(Vec<TextValue>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    Text(String),
    Steps(Vec<InstructionStep>),
    Other(IgnoredAny),
}

/// Shapes a single instruction step can take.
///
/// Objects decode through `Map` so that nested arrays never pass for a step.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionStep {
    Text(String),
    Object(Map<String, Value>),
    Other(IgnoredAny),
}

impl InstructionStep {
    fn into_text(self) -> Option<String> {
        match self {
            InstructionStep::Text(text) => Some(text),
            // `text` wins over `name` only when it is a string
            InstructionStep::Object(step) => string_field(&step, "text")
                .or_else(|| string_field(&step, "name"))
                .map(str::to_string),
            InstructionStep::Other(_) => None,
        }
    }
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    Url(String),
    Multiple(Vec<ImageEntry>),
    Object(Map<String, Value>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageEntry {
    Url(String),
    Object(Map<String, Value>),
    Other(IgnoredAny),
}

impl TryFrom<&Value> for JsonLdRecipe {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

fn image_object_url(object: &Map<String, Value>) -> Option<String> {
    string_field(object, "url").map(str::to_string)
}

fn decode_block(raw: &str) -> Result<Value, ScrapeError> {
    Ok(serde_json::from_str(raw)?)
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

/// `@graph` items first, then the payload itself, then top-level array items
fn find_recipe(json_ld: &Value) -> Option<&Value> {
    if let Some(graph) = json_ld.get("@graph").and_then(Value::as_array) {
        if let Some(recipe) = graph.iter().find(|item| is_recipe_type(item)) {
            debug!("JsonLdExtractor: Found Recipe in @graph");
            return Some(recipe);
        }
    }

    if is_recipe_type(json_ld) {
        debug!("JsonLdExtractor: Found Recipe type in root");
        return Some(json_ld);
    }

    json_ld
        .as_array()
        .and_then(|items| items.iter().find(|item| is_recipe_type(item)))
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = selector("script[type='application/ld+json']");
        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.text().collect::<String>();
            let raw_json = raw_json.trim();
            if raw_json.is_empty() {
                continue;
            }

            let json_ld = match decode_block(raw_json) {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: Skipping script {}: {}", index, e);
                    continue;
                }
            };

            let Some(recipe_json) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe in script {}", index);
                continue;
            };

            match JsonLdRecipe::try_from(recipe_json) {
                Ok(recipe) => return Ok(self.convert_to_recipe(recipe)),
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to convert script {}: {}", index, e);
                }
            }
        }

        debug!("JsonLdExtractor: No valid recipe found in any JSON-LD script");
        Err(ScrapeError::NoStructuredData)
    }
}
