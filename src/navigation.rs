//! Category and recipe discovery from the site's Joomla menus.

use crate::dom::{
    direct_children, has_exact_class, normalized_text, resolve_url, select_first, selector,
};
use crate::error::ScrapeError;
use crate::model::NavigationItem;
use log::debug;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// Class attribute of the top-level menu list
const ROOT_MENU_CLASS: &str = "nav menu nav-pills mod-list";

/// Menu labels that are not recipe categories (home, contact, about us)
const EXCLUDED_LABELS: &[&str] = &["inici", "contactar", "qui som"];

/// Navigation items in discovery order, first URL wins
#[derive(Debug, Default)]
struct ItemCollector {
    seen: HashSet<String>,
    items: Vec<NavigationItem>,
}

impl ItemCollector {
    fn push(&mut self, item: NavigationItem) {
        if self.seen.insert(item.url.clone()) {
            self.items.push(item);
        } else {
            debug!("navigation: skipping duplicate {}", item.url);
        }
    }

    fn into_items(self) -> Vec<NavigationItem> {
        self.items
    }
}

/// Top-level categories from the main menu.
///
/// Only direct `li` children of the menu are considered, so submenu entries are
/// ignored; home/contact/about links and in-page anchors are dropped.
pub fn scan_root(document: &Html, page_url: &str) -> Result<Vec<NavigationItem>, ScrapeError> {
    Url::parse(page_url)?;
    let root = document.root_element();
    let mut collector = ItemCollector::default();

    let lists = selector("ul");
    let Some(menu) = root
        .select(&lists)
        .find(|ul| has_exact_class(*ul, ROOT_MENU_CLASS))
    else {
        debug!("navigation: no main menu on {}", page_url);
        return Ok(Vec::new());
    };

    for li in direct_children(menu, &["li"]) {
        let Some(link) = direct_children(li, &["a"]).into_iter().next() else {
            continue;
        };
        let href = link.value().attr("href").unwrap_or_default();
        let title = normalized_text(link);

        if href.is_empty() || href.starts_with('#') || title.is_empty() {
            continue;
        }
        if EXCLUDED_LABELS.contains(&title.to_lowercase().as_str()) {
            continue;
        }

        if let Some(url) = item_url(page_url, href) {
            collector.push(NavigationItem::category(title, url));
        }
    }

    Ok(collector.into_items())
}

/// Subcategories of the active menu entry plus the recipes listed on the page
pub fn scan_category(document: &Html, page_url: &str) -> Result<Vec<NavigationItem>, ScrapeError> {
    Url::parse(page_url)?;
    let root = document.root_element();
    let mut collector = ItemCollector::default();

    if let Some(submenu) = select_first(root, "li.current.active")
        .and_then(|active| select_first(active, "ul.nav-child"))
    {
        for li in direct_children(submenu, &["li"]) {
            if let Some((title, href)) = link_in(li, "a") {
                if let Some(url) = item_url(page_url, href) {
                    collector.push(NavigationItem::category(title, url));
                }
            }
        }
    }

    // Joomla category blog: <h2 itemprop="name"><a itemprop="url" href=...>
    let headings = selector("h2[itemprop='name']");
    for heading in root.select(&headings) {
        if let Some((title, href)) = link_in(heading, "a[itemprop='url']") {
            if let Some(url) = item_url(page_url, href) {
                collector.push(NavigationItem::recipe(title, url));
            }
        }
    }

    Ok(collector.into_items())
}

/// Absolute URL of a menu link; links that cannot be joined are skipped
fn item_url(page_url: &str, href: &str) -> Option<String> {
    match resolve_url(page_url, href) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!("navigation: skipping unresolvable link {:?}: {}", href, e);
            None
        }
    }
}

/// Text and non-empty href of the first link matching `css` under `element`
fn link_in<'a>(element: ElementRef<'a>, css: &str) -> Option<(String, &'a str)> {
    let link = select_first(element, css)?;
    let href = link.value().attr("href").filter(|href| !href.trim().is_empty())?;
    Some((normalized_text(link), href))
}
