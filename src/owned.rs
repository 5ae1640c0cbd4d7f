//! Owned-games lookup for a community profile.
//!
//! The profile's games page embeds its full list as a script assignment
//! rather than anything queryable in the DOM, so this is the one place a
//! pattern match against raw markup is the right tool.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::client::StoreClient;
use crate::error::ScanError;

pub const COMMUNITY_URL: &str = "https://steamcommunity.com";

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: i64,
}

fn games_assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"var rgGames\s*=\s*(\[.*?\]);").expect("games pattern"))
}

/// Fetch the full owned-game id set for a profile.
///
/// Fatal when the embedded assignment is missing (private profile, invalid
/// id, or page-format drift): proceeding would leak owned items into the
/// report.
pub async fn fetch_owned_ids(
    client: &StoreClient,
    profile_id: &str,
) -> Result<HashSet<String>, ScanError> {
    let url = format!("{COMMUNITY_URL}/id/{profile_id}/games/?tab=all");
    let body = client.get_text(&url).await?;
    let ids = parse_owned_ids(&body)?;
    info!(profile = profile_id, owned = ids.len(), "owned games loaded; they will be skipped");
    Ok(ids)
}

/// Ids come back as strings so membership tests against catalog entries stay
/// type-consistent.
pub fn parse_owned_ids(markup: &str) -> Result<HashSet<String>, ScanError> {
    let raw = games_assignment_re()
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            ScanError::upstream_format("owned games", "embedded games assignment not found")
        })?;

    let games: Vec<OwnedGame> = serde_json::from_str(raw.as_str()).map_err(|e| {
        ScanError::upstream_format("owned games", format!("games assignment unparseable: {e}"))
    })?;

    Ok(games.into_iter().map(|g| g.appid.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embedded_games_assignment() {
        let page = r#"<html><script language="javascript">
            var rgGames = [{"appid":10,"name":"Counter-Strike","hours_forever":"1,024"},{"appid":440,"name":"Team Fortress 2"}];
            var rgChangingGames = [];
        </script></html>"#;
        let ids = parse_owned_ids(page).unwrap();
        assert_eq!(
            ids,
            ["10".to_string(), "440".to_string()].into_iter().collect()
        );
    }

    #[test]
    fn lazy_match_stops_at_first_array() {
        // Minified pages can put several assignments on one line.
        let page = r#"var rgGames = [{"appid":730,"name":"CS2"}]; var rgOther = [1,2];"#;
        let ids = parse_owned_ids(page).unwrap();
        assert_eq!(ids, ["730".to_string()].into_iter().collect());
    }

    #[test]
    fn missing_assignment_is_a_format_error() {
        let err = parse_owned_ids("<html><body>This profile is private.</body></html>")
            .unwrap_err();
        assert!(matches!(err, ScanError::UpstreamFormat { .. }));
    }

    #[test]
    fn unparseable_payload_is_a_format_error() {
        let err = parse_owned_ids(r#"var rgGames = [{"appid":}];"#).unwrap_err();
        assert!(matches!(err, ScanError::UpstreamFormat { .. }));
    }

    #[test]
    fn empty_library_yields_empty_set() {
        let ids = parse_owned_ids("var rgGames = [];").unwrap();
        assert!(ids.is_empty());
    }
}
