//! HTML parser for page metadata, content signatures and links
//!
//! This module extracts from an HTML document:
//! - Title, meta description, meta robots, canonical and first H1/H2
//! - hreflang alternates and JSON-LD structured data types
//! - Visible text (word count and body hash)
//! - Images with alt text, filename and mixed-content flag
//! - Outbound `<a href>` links with anchor text and rel tokens

use crate::state::ImageInfo;
use crate::url::{path_slug, resolve_url};
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use url::Url;

/// Maximum anchor text length kept on an edge (characters)
pub const MAX_ANCHOR_CHARS: usize = 200;

/// Elements whose text is never visible content
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A link found on a page, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Raw href attribute
    pub href: String,
    /// Whitespace-normalized anchor text, truncated
    pub anchor: String,
    /// Comma-joined rel tokens
    pub rel: String,
}

/// Everything extracted from one HTML document
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub title: String,
    pub meta_description: String,
    pub meta_robots: String,
    /// Absolute canonical URL, empty when absent or unresolvable
    pub canonical: String,
    pub h1: String,
    pub h2: String,

    /// (lang, absolute href) pairs
    pub hreflang: Vec<(String, String)>,
    /// Sorted, deduplicated JSON-LD `@type` values
    pub structured_data_types: Vec<String>,

    pub word_count: usize,
    /// SHA-256 hex digest of the normalized visible text
    pub body_hash: String,

    pub images: Vec<ImageInfo>,
    pub images_missing_alt: usize,
    pub mixed_content: usize,

    pub links: Vec<DiscoveredLink>,
}

/// Parses an HTML document fetched from `page_url`
///
/// `page_url` is the final URL after redirects; relative hrefs, image
/// sources and the canonical are resolved against it.
///
/// # Example
///
/// ```
/// use site_auditor::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &page_url);
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links[0].href, "/page");
/// ```
pub fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let visible = visible_text(&document);
    let (images, images_missing_alt, mixed_content) = extract_images(&document, page_url);

    ParsedPage {
        title: first_text(&document, "title"),
        meta_description: meta_content(&document, "description"),
        meta_robots: meta_content(&document, "robots"),
        canonical: extract_canonical(&document, page_url),
        h1: first_text(&document, "h1"),
        h2: first_text(&document, "h2"),
        hreflang: extract_hreflang(&document, page_url),
        structured_data_types: extract_structured_data_types(&document),
        word_count: visible.split(' ').filter(|word| !word.is_empty()).count(),
        body_hash: hash_text(&visible),
        images,
        images_missing_alt,
        mixed_content,
        links: extract_links(&document),
    }
}

/// SHA-256 hex digest of already-normalized text
pub fn hash_text(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Collapses every whitespace run to one space and trims the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn first_text(document: &Html, css: &str) -> String {
    selector(css)
        .and_then(|sel| document.select(&sel).next().map(|el| element_text(&el)))
        .unwrap_or_default()
}

/// Content of the first `<meta name=...>` whose name matches, ignoring case
fn meta_content(document: &Html, name: &str) -> String {
    let Some(sel) = selector("meta[name]") else {
        return String::new();
    };

    document
        .select(&sel)
        .find(|el| {
            el.value()
                .attr("name")
                .map(|n| n.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn rel_tokens<'a>(element: &'a ElementRef) -> impl Iterator<Item = &'a str> {
    element.value().attr("rel").unwrap_or("").split_whitespace()
}

fn extract_canonical(document: &Html, page_url: &Url) -> String {
    let Some(sel) = selector("link[rel][href]") else {
        return String::new();
    };

    document
        .select(&sel)
        .find(|el| rel_tokens(el).any(|token| token.eq_ignore_ascii_case("canonical")))
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| resolve_url(href, page_url))
        .map(|url| url.to_string())
        .unwrap_or_default()
}

/// `<link rel="alternate">` entries carrying `hreflang` (or `lang`)
fn extract_hreflang(document: &Html, page_url: &Url) -> Vec<(String, String)> {
    let Some(sel) = selector("link[rel][href]") else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for element in document.select(&sel) {
        let alternate = rel_tokens(&element).any(|token| token.to_lowercase().contains("alternate"));
        if !alternate {
            continue;
        }

        let attrs = element.value();
        let lang = attrs
            .attr("hreflang")
            .or_else(|| attrs.attr("lang"))
            .unwrap_or("")
            .trim();
        if lang.is_empty() {
            continue;
        }

        if let Some(href) = attrs.attr("href").and_then(|h| resolve_url(h, page_url)) {
            pairs.push((lang.to_string(), href.to_string()));
        }
    }
    pairs
}

fn extract_structured_data_types(document: &Html) -> Vec<String> {
    let Some(sel) = selector(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut types = BTreeSet::new();
    for script in document.select(&sel) {
        let raw: String = script.text().collect();
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => collect_types(&value, &mut types),
            Err(e) => tracing::trace!("Skipping invalid JSON-LD block: {}", e),
        }
    }
    types.into_iter().collect()
}

/// Walks objects and arrays collecting string `@type` values
fn collect_types(value: &Value, types: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => {
                    types.insert(t.clone());
                }
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Value::String(t) = item {
                            types.insert(t.clone());
                        }
                    }
                }
                _ => {}
            }
            for child in map.values() {
                collect_types(child, types);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        _ => {}
    }
}

/// Text of every node outside script/style/noscript/template, whitespace-normalized
fn visible_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ")
}

/// Returns (images, missing alt count, mixed content count)
fn extract_images(document: &Html, page_url: &Url) -> (Vec<ImageInfo>, usize, usize) {
    let mut images = Vec::new();
    let mut missing_alt = 0;
    let mut mixed = 0;

    let Some(sel) = selector("img") else {
        return (images, missing_alt, mixed);
    };

    let page_is_https = page_url.scheme() == "https";

    for img in document.select(&sel) {
        let attrs = img.value();
        let src = ["src", "data-src", "data-image"]
            .iter()
            .filter_map(|name| attrs.attr(name))
            .map(str::trim)
            .find(|value| !value.is_empty());

        let Some(absolute) = src.and_then(|s| resolve_url(s, page_url)) else {
            continue;
        };

        if page_is_https && absolute.scheme() == "http" {
            mixed += 1;
        }

        let alt = attrs.attr("alt").unwrap_or("").trim().to_string();
        if alt.is_empty() {
            missing_alt += 1;
        }

        images.push(ImageInfo {
            filename: path_slug(&absolute),
            src: absolute.to_string(),
            alt,
        });
    }

    (images, missing_alt, mixed)
}

/// Every `<a>` with a non-empty href, in document order
fn extract_links(document: &Html) -> Vec<DiscoveredLink> {
    let Some(sel) = selector("a[href]") else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            if href.is_empty() {
                return None;
            }
            Some(DiscoveredLink {
                href: href.to_string(),
                anchor: element_text(&anchor).chars().take(MAX_ANCHOR_CHARS).collect(),
                rel: rel_tokens(&anchor).collect::<Vec<_>>().join(","),
            })
        })
        .collect()
}
