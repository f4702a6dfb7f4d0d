use thiserror::Error;

/// Failures observed while collecting the publication catalogue.
///
/// Only the listing variants abort a run; the rest are reported per entry and skipped.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("error ({status}) while reading '{url}'")]
    ListingFetch { url: String, status: u16 },

    #[error("failed to read listing '{url}'")]
    ListingTransport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("malformed entry: {0}")]
    MalformedEntry(#[from] MalformedEntry),

    #[error("document returns an error ({status}) for '{url}'")]
    DocumentFetch { url: String, status: u16 },

    #[error("document '{url}' returned an empty page")]
    EmptyDocument { url: String },

    #[error("document could not be read for '{url}': {reason}")]
    DocumentTransport { url: String, reason: String },
}

/// Why a listing line could not be turned into a publication entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEntry {
    #[error("no anchor tag")]
    MissingAnchor,
    #[error("anchor tag is never closed with '>'")]
    UnterminatedAnchor,
    #[error("no '</a>' after the anchor tag")]
    MissingAnchorClose,
    #[error("anchor has no quoted href")]
    MissingHref,
}
