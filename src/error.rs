use thiserror::Error;

/// Failures that terminate a run.
///
/// Only required reference fetches surface here: the tag catalog, the
/// owned-games list, and the exchange feed. Per-page problems are logged and
/// the page dropped; per-entry parse problems are skipped silently during
/// extraction. Neither is ever represented as an error value.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An expected structural marker was missing from a fetched page,
    /// meaning the upstream layout changed or the fetch returned an error
    /// page. Proceeding would silently produce a wrong filter set.
    #[error("{context}: {detail}")]
    UpstreamFormat {
        context: &'static str,
        detail: String,
    },

    /// The HTTP layer failed for a required fetch.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ScanError {
    pub fn upstream_format(context: &'static str, detail: impl Into<String>) -> Self {
        ScanError::UpstreamFormat {
            context,
            detail: detail.into(),
        }
    }
}
