//! Report assembly: folding page results, sorting, price formatting, and the
//! JSON file write.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::extract::CatalogEntry;

pub const STORE_APP_URL: &str = "https://store.steampowered.com/app";
pub const MARKET_SEARCH_URL: &str = "https://steamcommunity.com/market/search";
pub const EXCHANGE_GAMEPAGE_URL: &str = "https://www.steamcardexchange.net/index.php?gamepage-appid-";

/// Sort direction for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PriceOrder {
    Asc,
    Desc,
}

/// A record on its way into the report: price still numeric so it can be
/// sorted, badge price attached when the exchange matched.
#[derive(Debug, Clone)]
pub struct ReportCandidate {
    pub id: String,
    pub name: String,
    pub price_minor: i64,
    pub discount_percent: Option<f64>,
    pub badge_price: Option<Value>,
}

/// Final serialized report row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: String,
    pub name: String,
    /// Formatted decimal string, e.g. "19.99".
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    pub link: String,
    pub market: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_price: Option<Value>,
}

/// Fold per-page entry maps into one id-keyed mapping.
///
/// Pages fold in index order; a later page replaces an earlier entry for the
/// same id. The first-seen position is kept, so the pre-sort order is
/// deterministic regardless of how the replacement happened.
pub fn assemble(per_page: Vec<IndexMap<String, CatalogEntry>>) -> IndexMap<String, CatalogEntry> {
    let mut all = IndexMap::new();
    for page in per_page {
        for (id, entry) in page {
            all.insert(id, entry);
        }
    }
    all
}

/// Sort and format the surviving candidates into final records.
///
/// The sort is stable with no secondary key: equal prices keep their
/// pre-sort relative order.
pub fn finalize(mut candidates: Vec<ReportCandidate>, order: PriceOrder) -> Vec<ReportRecord> {
    match order {
        PriceOrder::Asc => candidates.sort_by_key(|c| c.price_minor),
        PriceOrder::Desc => candidates.sort_by_key(|c| std::cmp::Reverse(c.price_minor)),
    }
    candidates
        .into_iter()
        .map(|c| ReportRecord {
            link: format!("{STORE_APP_URL}/{}", c.id),
            market: format!("{MARKET_SEARCH_URL}?appid={}", c.id),
            exchange: c
                .badge_price
                .is_some()
                .then(|| format!("{EXCHANGE_GAMEPAGE_URL}{}", c.id)),
            price: format_price(c.price_minor),
            id: c.id,
            name: c.name,
            discount_percent: c.discount_percent,
            badge_price: c.badge_price,
        })
        .collect()
}

/// Minor units to a decimal string: the last two digits become the decimals.
/// Amounts under 100 are zero-padded so the result always carries a units
/// digit ("0.99", never ".99").
pub fn format_price(minor: i64) -> String {
    let digits = format!("{minor:03}");
    let (units, cents) = digits.split_at(digits.len() - 2);
    format!("{units}.{cents}")
}

/// Serialize the record list as indented JSON to a timestamp-named file in
/// the working directory.
pub fn write_report(records: &[ReportRecord]) -> anyhow::Result<PathBuf> {
    let file_name = format!("report-{}.json", Local::now().format("%H-%M-%S-%d-%m-%Y"));
    let path = PathBuf::from(file_name);
    fs::write(&path, serde_json::to_string_pretty(records)?)?;
    info!(path = %path.display(), records = records.len(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, price_minor: i64) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: format!("Game {id}"),
            price_minor,
            discount_percent: None,
            positive_review: None,
        }
    }

    fn page(entries: Vec<CatalogEntry>) -> IndexMap<String, CatalogEntry> {
        entries.into_iter().map(|e| (e.id.clone(), e)).collect()
    }

    fn candidate(id: &str, price_minor: i64) -> ReportCandidate {
        ReportCandidate {
            id: id.to_string(),
            name: format!("Game {id}"),
            price_minor,
            discount_percent: None,
            badge_price: None,
        }
    }

    #[test]
    fn later_page_wins_on_id_collision() {
        let a = page(vec![entry("1", 100), entry("2", 200)]);
        let b = page(vec![entry("2", 150)]);
        let all = assemble(vec![a, b]);
        assert_eq!(all.len(), 2);
        assert_eq!(all["2"].price_minor, 150);
        // First-seen positions survive the overwrite.
        assert_eq!(all.keys().collect::<Vec<_>>(), ["1", "2"]);
    }

    #[test]
    fn ascending_sort_is_total_and_default_direction_first() {
        let records = finalize(
            vec![candidate("a", 300), candidate("b", 100), candidate("c", 200)],
            PriceOrder::Asc,
        );
        let prices: Vec<&str> = records.iter().map(|r| r.price.as_str()).collect();
        assert_eq!(prices, ["1.00", "2.00", "3.00"]);
    }

    #[test]
    fn descending_sort_reverses() {
        let records = finalize(
            vec![candidate("a", 300), candidate("b", 100), candidate("c", 200)],
            PriceOrder::Desc,
        );
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
    }

    #[test]
    fn equal_prices_keep_pre_sort_order() {
        let records = finalize(
            vec![
                candidate("first", 500),
                candidate("second", 500),
                candidate("cheap", 100),
                candidate("third", 500),
            ],
            PriceOrder::Asc,
        );
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["cheap", "first", "second", "third"]);
    }

    #[test]
    fn formats_prices_with_two_decimals() {
        assert_eq!(format_price(1999), "19.99");
        assert_eq!(format_price(123456), "1234.56");
        assert_eq!(format_price(100), "1.00");
        assert_eq!(format_price(99), "0.99");
        assert_eq!(format_price(5), "0.05");
    }

    #[test]
    fn format_round_trips_for_amounts_with_a_units_digit() {
        for p in [100i64, 101, 999, 1000, 1999, 70000, 123456] {
            let formatted = format_price(p);
            let rebuilt: i64 = formatted
                .replace('.', "")
                .trim_start_matches('0')
                .parse()
                .unwrap();
            assert_eq!(rebuilt, p);
        }
    }

    #[test]
    fn links_derive_from_the_id() {
        let mut c = candidate("440", 1999);
        c.badge_price = Some(Value::from("5.00"));
        let record = &finalize(vec![c], PriceOrder::Asc)[0];
        assert_eq!(record.link, "https://store.steampowered.com/app/440");
        assert_eq!(
            record.market,
            "https://steamcommunity.com/market/search?appid=440"
        );
        assert_eq!(
            record.exchange.as_deref(),
            Some("https://www.steamcardexchange.net/index.php?gamepage-appid-440")
        );
    }

    #[test]
    fn unmatched_candidates_carry_no_exchange_fields() {
        let record = &finalize(vec![candidate("10", 100)], PriceOrder::Asc)[0];
        assert_eq!(record.exchange, None);
        assert_eq!(record.badge_price, None);

        let json = serde_json::to_value(record).unwrap();
        assert!(json.get("exchange").is_none());
        assert!(json.get("badgePrice").is_none());
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(finalize(Vec::new(), PriceOrder::Asc).is_empty());
        assert!(assemble(Vec::new()).is_empty());
    }

    #[test]
    fn records_serialize_camel_case() {
        let mut c = candidate("10", 1999);
        c.discount_percent = Some(75.0);
        c.badge_price = Some(Value::from("5.00"));
        let json = serde_json::to_value(&finalize(vec![c], PriceOrder::Asc)[0]).unwrap();
        assert_eq!(json["discountPercent"], 75.0);
        assert_eq!(json["badgePrice"], "5.00");
        assert_eq!(json["price"], "19.99");
    }
}
