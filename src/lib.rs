pub mod cli;
pub mod client;
pub mod error;
pub mod exchange;
pub mod extract;
pub mod logging;
pub mod owned;
pub mod report;
pub mod search;
pub mod tags;

pub mod util {
    pub mod env;
}

pub use client::StoreClient;
pub use error::ScanError;
pub use extract::{CatalogEntry, ExtractOptions};
pub use report::{PriceOrder, ReportRecord};
