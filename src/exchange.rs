//! Badge-price feed from the card exchange, and the intersection against
//! discovered entries.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::client::StoreClient;
use crate::error::ScanError;
use crate::extract::CatalogEntry;
use crate::report::ReportCandidate;

pub const BADGE_PRICES_URL: &str =
    "https://www.steamcardexchange.net/api/request.php?GetBadgePrices_Guest";

/// One row of the exchange feed. Reference data, fetched once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRecord {
    pub id: String,
    pub display_name: String,
    /// Kept as the feed's raw JSON value (string or number) and passed
    /// through to the report untouched.
    pub badge_price: Value,
}

/// Fetch the full badge-price feed.
///
/// An absent or empty `data` field is zero records, not an error: the
/// intersection is simply empty.
pub async fn fetch_all(client: &StoreClient) -> Result<Vec<ExchangeRecord>, ScanError> {
    let body = client.get_json(BADGE_PRICES_URL, &[]).await?;
    let records = parse_feed(&body);
    debug!(records = records.len(), "exchange feed loaded");
    Ok(records)
}

pub fn parse_feed(body: &Value) -> Vec<ExchangeRecord> {
    let Some(rows) = body.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };
    rows.iter().filter_map(parse_row).collect()
}

/// Feed rows are positional: `[[id, name], _, badge_price]`. Rows that don't
/// match the shape are dropped.
fn parse_row(row: &Value) -> Option<ExchangeRecord> {
    let cells = row.as_array()?;
    let head = cells.first()?.as_array()?;
    let id = match head.first()? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let display_name = head.get(1)?.as_str()?.to_string();
    let badge_price = cells.get(2)?.clone();
    Some(ExchangeRecord {
        id,
        display_name,
        badge_price,
    })
}

/// Intersect the feed with the discovered entries by id.
///
/// A match takes the exchange's display name and badge price; price and
/// discount come from the catalog entry. Entries without a feed row are
/// dropped (this is exchange-only mode's whole point).
pub fn match_entries(
    entries: &IndexMap<String, CatalogEntry>,
    records: &[ExchangeRecord],
) -> Vec<ReportCandidate> {
    records
        .iter()
        .filter_map(|record| {
            let entry = entries.get(&record.id)?;
            Some(ReportCandidate {
                id: record.id.clone(),
                name: record.display_name.clone(),
                price_minor: entry.price_minor,
                discount_percent: entry.discount_percent,
                badge_price: Some(record.badge_price.clone()),
            })
        })
        .collect()
}

/// Every entry passes through when exchange matching is off: links will be
/// synthesized from the id alone, no badge price attached.
pub fn passthrough(entries: &IndexMap<String, CatalogEntry>) -> Vec<ReportCandidate> {
    entries
        .values()
        .map(|entry| ReportCandidate {
            id: entry.id.clone(),
            name: entry.name.clone(),
            price_minor: entry.price_minor,
            discount_percent: entry.discount_percent,
            badge_price: None,
        })
        .collect()
}
