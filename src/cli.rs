//! Command-line surface.

use clap::Parser;

use crate::report::PriceOrder;

#[derive(Parser, Debug)]
#[command(
    name = "cardhunt",
    version,
    about = "Steam sale scanner cross-referencing the card-exchange badge feed"
)]
pub struct Cli {
    /// Number of search pages to fetch
    #[arg(long, default_value_t = 30)]
    pub iterations: u32,

    /// Results requested per page
    #[arg(long, default_value_t = 100)]
    pub results_per_page: u32,

    /// Price cutoff forwarded to the storefront's maxprice parameter
    #[arg(long, default_value_t = 70)]
    pub min_price: u32,

    /// Keep only entries discounted at least this percentage
    #[arg(long)]
    pub min_discount: Option<f64>,

    /// Sort order for the final report
    #[arg(long, value_enum, default_value_t = PriceOrder::Asc)]
    pub price_order: PriceOrder,

    /// Storefront country code (cc parameter)
    #[arg(long)]
    pub country: Option<String>,

    /// Comma-separated tag labels, resolved against the storefront's filter widget
    #[arg(long)]
    pub tags: Option<String>,

    /// Community profile id whose owned games are excluded
    #[arg(long)]
    pub steam_id: Option<String>,

    /// Exclude games already owned by --steam-id
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub omit_owned_games: bool,

    /// Keep only games with a badge-price entry on the card exchange
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub cards_only: bool,

    /// Keep only games carrying a positive review summary
    #[arg(long)]
    pub reviewed_only: bool,

    /// Write the JSON report file
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub generate_report: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::try_parse_from(["cardhunt"]).unwrap();
        assert_eq!(cli.iterations, 30);
        assert_eq!(cli.results_per_page, 100);
        assert_eq!(cli.min_price, 70);
        assert_eq!(cli.min_discount, None);
        assert_eq!(cli.price_order, PriceOrder::Asc);
        assert!(cli.omit_owned_games);
        assert!(cli.cards_only);
        assert!(!cli.reviewed_only);
        assert!(cli.generate_report);
    }

    #[test]
    fn boolean_switches_take_explicit_values() {
        let cli = Cli::try_parse_from([
            "cardhunt",
            "--omit-owned-games",
            "false",
            "--cards-only",
            "false",
            "--generate-report",
            "false",
            "--reviewed-only",
        ])
        .unwrap();
        assert!(!cli.omit_owned_games);
        assert!(!cli.cards_only);
        assert!(!cli.generate_report);
        assert!(cli.reviewed_only);
    }

    #[test]
    fn price_order_parses_both_directions() {
        let cli = Cli::try_parse_from(["cardhunt", "--price-order", "desc"]).unwrap();
        assert_eq!(cli.price_order, PriceOrder::Desc);
    }
}
