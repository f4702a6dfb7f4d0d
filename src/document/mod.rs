use crate::{error::ScrapeError, fetch::Fetcher};

pub mod image;
pub mod redirect;

/// Statuses whose body is worth scanning. Publishers often answer 403 to scripted clients but
/// still send the landing page.
pub const READABLE_STATUSES: [u16; 2] = [200, 403];

/// Fetch a document page once, applying the readable-status policy.
pub fn read_document<F: Fetcher>(fetcher: &F, url: &str) -> Result<String, ScrapeError> {
    let res = fetcher
        .fetch(url)
        .map_err(|e| ScrapeError::DocumentTransport {
            url: url.to_string(),
            reason: format!("{e:#}"),
        })?;
    if READABLE_STATUSES.contains(&res.status) {
        Ok(res.body)
    } else {
        Err(ScrapeError::DocumentFetch {
            url: url.to_string(),
            status: res.status,
        })
    }
}
