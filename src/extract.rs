//! Turns one page of search-results markup into structured catalog entries.
//!
//! The search endpoint ships its listing rows as an HTML fragment inside a
//! JSON envelope. Extraction is DOM-query based; the storefront's exact
//! markup shape stays an implementation detail of this module.

use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// One discovered storefront item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Numeric catalog identifier; unique key within a run.
    pub id: String,
    pub name: String,
    /// Final price in minor currency units (cents). Always > 0.
    pub price_minor: i64,
    /// Absolute discount percentage; populated only when a discount floor
    /// is configured.
    pub discount_percent: Option<f64>,
    /// Populated only when positive-review filtering is on.
    pub positive_review: Option<bool>,
}

/// Per-entry filters applied during extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub skip_owned: bool,
    pub min_discount: Option<f64>,
    pub reviewed_only: bool,
}

fn app_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/app/(\d{1,10})").expect("app id pattern"))
}

/// Extract every catalog entry from one page of raw markup.
///
/// Pure function of its inputs: per-entry parse failures (missing name,
/// missing or zero price, unparseable discount) drop that entry and move on.
/// Entries in `owned_ids` are skipped when `options.skip_owned` is set.
pub fn extract(
    page_markup: &str,
    owned_ids: &HashSet<String>,
    options: &ExtractOptions,
) -> IndexMap<String, CatalogEntry> {
    let normalized = normalize_markup(page_markup);
    let fragment = Html::parse_fragment(&normalized);

    let anchor_sel = Selector::parse(r#"a[href*="/app/"]"#).expect("anchor selector");
    let title_sel = Selector::parse("span.title").expect("title selector");
    let discount_sel =
        Selector::parse(".search_discount span, .discount_pct").expect("discount selector");
    let review_sel =
        Selector::parse(".search_review_summary.positive").expect("review selector");
    let price_sel = Selector::parse("[data-price-final]").expect("price selector");

    // The first anchor seen for an id is that id's listing block; duplicate
    // references within a page collapse onto it.
    let mut blocks: IndexMap<String, ElementRef> = IndexMap::new();
    for anchor in fragment.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(caps) = app_id_re().captures(href) else {
            continue;
        };
        blocks.entry(caps[1].to_string()).or_insert(anchor);
    }

    let mut entries = IndexMap::new();
    for (id, block) in blocks {
        if options.skip_owned && owned_ids.contains(&id) {
            continue;
        }

        let name = match block.select(&title_sel).next().map(collect_text) {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };

        let discount_percent = match options.min_discount {
            Some(floor) => {
                let parsed = block
                    .select(&discount_sel)
                    .next()
                    .and_then(|el| parse_discount(&collect_text(el)));
                match parsed {
                    Some(pct) if pct >= floor => Some(pct),
                    _ => continue,
                }
            }
            None => None,
        };

        let positive_review = if options.reviewed_only {
            if block.select(&review_sel).next().is_none() {
                continue;
            }
            Some(true)
        } else {
            None
        };

        // data-price-final sits on the price element inside the block, but
        // tolerate it on the anchor itself.
        let price_attr = block.value().attr("data-price-final").or_else(|| {
            block
                .select(&price_sel)
                .next()
                .and_then(|el| el.value().attr("data-price-final"))
        });
        let Some(price_minor) = price_attr.and_then(parse_price_minor) else {
            continue;
        };

        entries.insert(
            id.clone(),
            CatalogEntry {
                id,
                name,
                price_minor,
                discount_percent,
                positive_review,
            },
        );
    }
    entries
}

/// Structural normalization only; content is untouched.
fn normalize_markup(markup: &str) -> String {
    markup.replace(['\n', '\t', '\r'], "")
}

fn collect_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// "-75%" → 75.0. Sign and percent glyphs are stripped, so the result is
/// always the absolute value.
fn parse_discount(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok()
}

fn parse_price_minor(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<i64>().ok().filter(|p| *p > 0)
}
