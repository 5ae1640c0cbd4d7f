//! Tag-filter catalog scraped from the search landing page.
//!
//! The storefront filters by internal tag ids, not labels, so a run that
//! asks for labels must first load the label → id mapping from the landing
//! page's filter widget. The catalog is a plain value handed to whoever
//! needs it; nothing here is process-global.

use std::collections::HashMap;

use scraper::{Html, Selector};
use tracing::debug;

use crate::client::StoreClient;
use crate::error::ScanError;

pub const SEARCH_LANDING_URL: &str = "https://store.steampowered.com/search/";

/// Fetch and parse the label → tag-id catalog.
///
/// Fatal when the filter container is missing: either the page structure
/// changed or the fetch came back as an error page, and resolving labels
/// against a partial catalog would silently widen the search.
pub async fn load(client: &StoreClient) -> Result<HashMap<String, String>, ScanError> {
    let body = client.get_text(SEARCH_LANDING_URL).await?;
    let catalog = parse_tag_catalog(&body)?;
    debug!(tags = catalog.len(), "tag catalog loaded");
    Ok(catalog)
}

pub fn parse_tag_catalog(markup: &str) -> Result<HashMap<String, String>, ScanError> {
    let document = Html::parse_document(markup);
    let container_sel = Selector::parse("#TagFilter_Container").expect("container selector");
    let row_sel =
        Selector::parse(r#".tab_filter_control[data-param="tags"]"#).expect("row selector");

    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| ScanError::upstream_format("tag catalog", "tag filter container not found"))?;

    let mut catalog = HashMap::new();
    for row in container.select(&row_sel) {
        let (Some(label), Some(tag_id)) =
            (row.value().attr("data-loc"), row.value().attr("data-value"))
        else {
            continue;
        };
        catalog.insert(label.trim().to_lowercase(), tag_id.trim().to_string());
    }
    Ok(catalog)
}

/// Resolve a comma-separated label list into the outbound `tags` parameter.
///
/// Lookup is case-insensitive; unknown labels are dropped silently. `None`
/// means "no tag filter".
pub fn resolve(catalog: &HashMap<String, String>, requested: &str) -> Option<String> {
    let ids: Vec<&str> = requested
        .split(',')
        .map(|label| label.trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .filter_map(|label| catalog.get(&label))
        .map(String::as_str)
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(","))
    }
}
