//! Paginated specials search against the storefront.

use futures::{stream, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::StoreClient;

pub const SEARCH_RESULTS_URL: &str = "https://store.steampowered.com/search/results/";

/// Page fetches in flight at once.
const PAGE_FETCH_CONCURRENCY: usize = 8;

/// Resolved query surface for one search run.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub start_index: u32,
    pub page_count: u32,
    pub page_size: u32,
    /// Forwarded as the storefront's `maxprice` parameter.
    pub max_price: u32,
    /// Comma-joined internal tag ids, already resolved from labels.
    pub tags: Option<String>,
    pub country: Option<String>,
}

/// Offsets the driver will request, one per page.
pub fn page_offsets(params: &SearchParams) -> Vec<u32> {
    (0..params.page_count)
        .map(|i| params.start_index + i * params.page_size)
        .collect()
}

/// Fetch all configured pages, dropping unusable ones.
///
/// Fetches run concurrently but results come back in index order, so the
/// downstream last-write-wins fold is deterministic run to run. A page that
/// fails at the HTTP layer or reports an unsuccessful response is logged and
/// dropped, never retried; remaining pages can still yield a valid report.
pub async fn fetch_pages(client: &StoreClient, params: &SearchParams) -> Vec<String> {
    let pages: Vec<Option<String>> = stream::iter(page_offsets(params).into_iter().enumerate())
        .map(|(page_index, offset)| fetch_page(client, params, page_index, offset))
        .buffered(PAGE_FETCH_CONCURRENCY)
        .collect()
        .await;
    pages.into_iter().flatten().collect()
}

async fn fetch_page(
    client: &StoreClient,
    params: &SearchParams,
    page_index: usize,
    offset: u32,
) -> Option<String> {
    let mut query: Vec<(&str, String)> = vec![
        ("query", String::new()),
        ("start", offset.to_string()),
        ("count", params.page_size.to_string()),
        ("maxprice", params.max_price.to_string()),
        ("specials", "1".to_string()),
        ("infinite", "1".to_string()),
    ];
    if let Some(tags) = &params.tags {
        query.push(("tags", tags.clone()));
    }
    if let Some(cc) = &params.country {
        query.push(("cc", cc.clone()));
    }

    match client.get_json(SEARCH_RESULTS_URL, &query).await {
        Ok(body) => match page_markup(&body) {
            Some(markup) => {
                debug!(page = page_index, offset, "page fetched");
                Some(markup)
            }
            None => {
                warn!(page = page_index, offset, "page response unusable; dropping it");
                None
            }
        },
        Err(err) => {
            warn!(page = page_index, offset, error = %err, "page fetch failed; dropping it");
            None
        }
    }
}

/// A page is usable only when its `success` indicator is truthy and the
/// markup payload is present.
pub fn page_markup(body: &Value) -> Option<String> {
    if !is_truthy(body.get("success")) {
        return None;
    }
    body.get("results_html")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offsets_step_by_page_size() {
        let params = SearchParams {
            page_count: 3,
            page_size: 100,
            ..Default::default()
        };
        assert_eq!(page_offsets(&params), [0, 100, 200]);
    }

    #[test]
    fn offsets_honor_the_start_index() {
        let params = SearchParams {
            start_index: 50,
            page_count: 2,
            page_size: 25,
            ..Default::default()
        };
        assert_eq!(page_offsets(&params), [50, 75]);
    }

    #[test]
    fn numeric_and_boolean_success_flags_gate_the_page() {
        assert_eq!(
            page_markup(&json!({"success": 1, "results_html": "<a/>"})).as_deref(),
            Some("<a/>")
        );
        assert_eq!(
            page_markup(&json!({"success": true, "results_html": "<a/>"})).as_deref(),
            Some("<a/>")
        );
        assert_eq!(page_markup(&json!({"success": 0, "results_html": "<a/>"})), None);
        assert_eq!(page_markup(&json!({"success": false, "results_html": "<a/>"})), None);
        assert_eq!(page_markup(&json!({"results_html": "<a/>"})), None);
    }

    #[test]
    fn missing_markup_is_unusable_even_on_success() {
        assert_eq!(page_markup(&json!({"success": 1})), None);
    }
}
