use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use tracing::{info, warn};

use cardhunt::cli::Cli;
use cardhunt::client::StoreClient;
use cardhunt::exchange;
use cardhunt::extract::{self, ExtractOptions};
use cardhunt::owned;
use cardhunt::report;
use cardhunt::search::{self, SearchParams};
use cardhunt::tags;
use cardhunt::util::env as env_util;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_util::init_env();
    cardhunt::logging::init_tracing("cardhunt=info,info")?;

    // Validate up front so a bad combination fails before any fetch.
    let profile = if cli.omit_owned_games {
        match cli.steam_id.as_deref() {
            Some(p) if !p.trim().is_empty() => Some(p.trim().to_string()),
            _ => anyhow::bail!("--steam-id is required when --omit-owned-games is on"),
        }
    } else {
        None
    };

    let client = StoreClient::new();

    // Tag labels resolve against the landing-page catalog before pagination,
    // since the result feeds the outbound query.
    let tag_param = match cli.tags.as_deref() {
        Some(labels) => {
            let catalog = tags::load(&client)
                .await
                .context("tag catalog fetch failed")?;
            let resolved = tags::resolve(&catalog, labels);
            if resolved.is_none() {
                warn!(
                    requested = labels,
                    "no requested tag resolved; searching without a tag filter"
                );
            }
            resolved
        }
        None => None,
    };

    let params = SearchParams {
        start_index: 0,
        page_count: cli.iterations,
        page_size: cli.results_per_page,
        max_price: cli.min_price,
        tags: tag_param,
        country: cli.country.clone(),
    };

    info!(
        pages = params.page_count,
        page_size = params.page_size,
        "starting to check out the sales pages"
    );

    // Owned games and search pages are independent reads; extraction waits
    // on both.
    let (pages, owned_result) = tokio::join!(search::fetch_pages(&client, &params), async {
        match &profile {
            Some(p) => {
                info!(profile = %p, "fetching owned games");
                owned::fetch_owned_ids(&client, p).await
            }
            None => Ok(HashSet::new()),
        }
    });
    let owned_ids = owned_result.context("owned games fetch failed")?;

    info!(pages = pages.len(), "usable search pages fetched");

    let options = ExtractOptions {
        skip_owned: cli.omit_owned_games,
        min_discount: cli.min_discount,
        reviewed_only: cli.reviewed_only,
    };
    let per_page: Vec<_> = pages
        .iter()
        .map(|markup| extract::extract(markup, &owned_ids, &options))
        .collect();
    let entries = report::assemble(per_page);
    info!(count = entries.len(), "games on sale discovered");

    if entries.is_empty() {
        info!("nothing on sale survived the filters; no report");
        return Ok(());
    }

    let candidates = if cli.cards_only {
        info!("checking which of them have cards");
        let feed = exchange::fetch_all(&client)
            .await
            .context("exchange feed fetch failed")?;
        exchange::match_entries(&entries, &feed)
    } else {
        exchange::passthrough(&entries)
    };

    let records = report::finalize(candidates, cli.price_order);
    info!(
        count = records.len(),
        cards_only = cli.cards_only,
        "records ready"
    );

    if !cli.generate_report || records.is_empty() {
        return Ok(());
    }

    let path = report::write_report(&records).context("couldn't write report file")?;
    info!(path = %path.display(), "report generated successfully");
    Ok(())
}
