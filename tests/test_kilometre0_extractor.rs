use kilometre0_scraper::config::SiteConfig;
use kilometre0_scraper::extractors::{Extractor, Kilometre0Extractor, ParsingContext};
use kilometre0_scraper::Recipe;

const RECIPE_URL: &str = "https://www.kilometre0.cat/carns/123-fricando-de-vedella";

fn extractor() -> Kilometre0Extractor {
    Kilometre0Extractor::new(&SiteConfig::default())
}

fn extract(html: &str) -> Recipe {
    let context = ParsingContext::new(RECIPE_URL, html);
    extractor().parse(&context).unwrap()
}

fn page(head: &str, body: &str) -> String {
    format!("<!DOCTYPE html><html><head>{head}</head><body>{body}</body></html>")
}

#[test]
fn test_full_joomla_article() {
    let html = page(
        r#"<meta property="og:image" content="/images/receptes/fricando.jpg">"#,
        r#"
        <div class="item-page">
            <div class="page-header"><h2 itemprop="headline"> Fricandó de vedella </h2></div>
            <div itemprop="articleBody">
                <p>Un clàssic de la cuina catalana de tardor.</p>
                <h3>INGREDIENTS</h3>
                <p>800 g de vedella<br>200 g de moixernons<br>1 ceba</p>
                <ul><li>farina</li><li>oli d'oliva</li></ul>
                <h3>Preparació</h3>
                <p>Enfarinar la carn i daurar-la.</p>
                <p>Afegir la ceba i els bolets.</p>
                <p><strong>Guarnició</strong></p>
                <p>Patates fregides</p>
                <h4>Estris</h4>
                <p>Cassola de fang</p>
                <p><b>Ampliació</b></p>
                <p>Es pot fer amb rovellons.</p>
            </div>
        </div>
        "#,
    );

    let recipe = extract(&html);

    assert_eq!(recipe.name, "Fricandó de vedella");
    assert_eq!(
        recipe.ingredients,
        vec![
            "800 g de vedella",
            "200 g de moixernons",
            "1 ceba",
            "farina",
            "oli d'oliva"
        ]
    );
    assert_eq!(
        recipe.instructions,
        "Enfarinar la carn i daurar-la.\nAfegir la ceba i els bolets.\n\n--- GUARNICIÓ ---\nPatates fregides\n\n--- ESTRIS ---\nCassola de fang\n\n--- AMPLIACIÓ ---\nEs pot fer amb rovellons."
    );
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://www.kilometre0.cat/images/receptes/fricando.jpg")
    );
    assert!(recipe.url.is_none());
}

#[test]
fn test_header_then_empty_paragraph() {
    let html = page(
        "",
        r#"<div itemprop="articleBody"><h3>INGREDIENTS</h3><p>200g flour</p><p></p></div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.ingredients, vec!["200g flour"]);
}

#[test]
fn test_garnish_appended_to_instructions() {
    let html = page(
        "",
        r#"<div itemprop="articleBody">
            <h3>Preparació</h3><p>Boil water.</p>
            <h3>Guarnició</h3><p>mint leaves</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(
        recipe.instructions,
        "Boil water.\n\n--- GUARNICIÓ ---\nmint leaves"
    );
    assert!(recipe.ingredients.is_empty());
}

#[test]
fn test_elaboracio_header_in_bold_run() {
    let html = page(
        "",
        r#"<div itemprop="articleBody">
            <p><strong>Ingredients:</strong></p>
            <p>4 ous<br>sal</p>
            <p><strong>Elaboració:</strong></p>
            <p>Batre els ous.</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.ingredients, vec!["4 ous", "sal"]);
    assert_eq!(recipe.instructions, "Batre els ous.");
}

#[test]
fn test_short_bold_text_is_not_a_header() {
    let html = page(
        "",
        r#"<div itemprop="articleBody">
            <h3>Ingredients</h3>
            <p><b>1</b> pebrot vermell</p>
            <p><strong>Sal</strong> i pebre</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.ingredients, vec!["1 pebrot vermell", "Sal i pebre"]);
}

#[test]
fn test_intro_text_is_not_ingredients_or_instructions() {
    let html = page(
        "",
        r#"<div itemprop="articleBody">
            <p>Recepta de l'àvia.</p>
            <p>Per a 4 persones.</p>
            <p>Temps: 1 hora.</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert!(recipe.ingredients.is_empty());
    assert_eq!(recipe.instructions, "");
}

#[test]
fn test_flat_markup_is_scanned_recursively() {
    // Only one direct block child: the scan has to descend into the wrapper
    let html = page(
        "",
        r#"<div itemprop="articleBody">
            <div class="wrapper">
                <h4>Ingredients</h4>
                <p>1 kg de musclos</p>
                <h4>Preparació</h4>
                <p>Obrir els musclos al vapor.</p>
            </div>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.ingredients, vec!["1 kg de musclos"]);
    assert_eq!(recipe.instructions, "Obrir els musclos al vapor.");
}

#[test]
fn test_fragmented_header_does_not_leak_into_ingredients() {
    let html = page(
        "",
        r#"<div itemprop="articleBody">
            <h3>Ingredients</h3>
            <p>IN<br>GREDIENTS<br>3 carxofes</p>
            <p>1 llimona</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.ingredients, vec!["IN", "3 carxofes", "1 llimona"]);
}

#[test]
fn test_title_fallbacks() {
    let from_page_header = page(
        "",
        r#"<div class="page-header"><h2>Coca de recapte</h2></div><div itemprop="articleBody"></div>"#,
    );
    assert_eq!(extract(&from_page_header).name, "Coca de recapte");

    let from_schema_name = page(
        "",
        r#"<h2 itemprop="name">Calçots amb romesco</h2><div itemprop="articleBody"></div>"#,
    );
    assert_eq!(extract(&from_schema_name).name, "Calçots amb romesco");

    let untitled = page("", r#"<div itemprop="articleBody"><p>Res</p></div>"#);
    assert_eq!(extract(&untitled).name, "Sense títol");
}

#[test]
fn test_item_page_container_fallback() {
    let html = page(
        "",
        r#"<div class="item-page">
            <h3>Ingredients</h3>
            <p>2 carbassons</p>
            <h3>Preparació</h3>
            <p>Tallar a daus.</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.ingredients, vec!["2 carbassons"]);
    assert_eq!(recipe.instructions, "Tallar a daus.");
}

#[test]
fn test_image_filter_ignores_noise_regardless_of_order() {
    for images in [
        r#"<img src="/icons/logo.png"><img src="/images/plat.jpg">"#,
        r#"<img src="/images/plat.jpg"><img src="/icons/logo.png">"#,
    ] {
        let html = page(
            "",
            &format!(r#"<div itemprop="articleBody"><p>Text</p>{images}</div>"#),
        );
        assert_eq!(
            extract(&html).image_url.as_deref(),
            Some("https://www.kilometre0.cat/images/plat.jpg")
        );
    }
}

#[test]
fn test_image_fallback_area_and_absence() {
    let fallback = page(
        "",
        r#"<main>
            <img src="/images/print.png">
            <img src="/images/receptes/coca.jpg">
        </main>
        <div itemprop="articleBody"><p>Sense fotos</p></div>"#,
    );
    assert_eq!(
        extract(&fallback).image_url.as_deref(),
        Some("https://www.kilometre0.cat/images/receptes/coca.jpg")
    );

    let none = page(
        r#"<meta property="og:image" content="">"#,
        r#"<div itemprop="articleBody"><img src="/media/foto.jpg"></div>"#,
    );
    assert!(extract(&none).image_url.is_none());
}

#[test]
fn test_idempotent_apart_from_id() {
    let html = page(
        r#"<meta property="og:image" content="https://cdn.kilometre0.cat/images/x.jpg">"#,
        r#"<div itemprop="articleBody">
            <h3>Ingredients</h3><p>arròs</p>
            <h3>Preparació</h3><p>Sofregir.</p>
        </div>"#,
    );

    let first = extract(&html);
    let second = extract(&html);

    assert_ne!(first.id, second.id);
    assert_eq!(
        Recipe {
            id: String::new(),
            ..first
        },
        Recipe {
            id: String::new(),
            ..second
        }
    );
}

#[test]
fn test_only_applies_to_site_domain() {
    let extractor = extractor();
    let html = page("", "<div itemprop=\"articleBody\"></div>");

    assert!(extractor.can_parse(&ParsingContext::new(RECIPE_URL, &html)));
    assert!(!extractor.can_parse(&ParsingContext::new("https://example.com/recepta", &html)));
}

#[test]
fn test_unresolvable_image_keeps_the_rest_of_the_recipe() {
    let html = page(
        r#"<meta property="og:image" content="http://[bad/images/x.jpg">"#,
        r#"<h2 itemprop="headline">Crema catalana</h2>
        <div itemprop="articleBody">
            <h3>Ingredients</h3><p>1 l de llet</p>
            <h3>Preparació</h3><p>Bullir la llet.</p>
        </div>"#,
    );

    let recipe = extract(&html);
    assert_eq!(recipe.name, "Crema catalana");
    assert_eq!(recipe.ingredients, vec!["1 l de llet"]);
    assert_eq!(recipe.instructions, "Bullir la llet.");
    assert!(recipe.image_url.is_none());
}

#[test]
fn test_invalid_site_root_only_drops_relative_images() {
    let site = SiteConfig {
        root: "not a base url".to_string(),
        ..SiteConfig::default()
    };
    let html = page(
        r#"<meta property="og:image" content="/images/a.jpg">"#,
        r#"<div itemprop="articleBody"><h3>Ingredients</h3><p>sal</p></div>"#,
    );

    let recipe = Kilometre0Extractor::new(&site)
        .parse(&ParsingContext::new(RECIPE_URL, &html))
        .unwrap();
    assert_eq!(recipe.ingredients, vec!["sal"]);
    assert!(recipe.image_url.is_none());
}
