use std::{fs, io::Write};

use anyhow::Context;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::{
    cli::Source,
    document::{image::ImageResolver, read_document, redirect},
    error::ScrapeError,
    fetch::Fetcher,
    listing::{
        Listing,
        entry::{EntryParser, YearOverrides},
    },
    output::{OutputRow, RowWriter},
};

pub const DEFAULT_MAX_ENTRIES: usize = 500;

pub struct Settings {
    /// Candidate lines past this count are ignored.
    pub max_entries: usize,
    pub overrides: YearOverrides,
    pub default_image: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_entries: DEFAULT_MAX_ENTRIES,
            overrides: YearOverrides::builtin(),
            default_image: crate::document::image::DEFAULT_IMAGE.to_string(),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    /// Entries whose document could not be fetched or came back empty.
    pub skipped: usize,
    pub malformed: usize,
    /// Entries beyond the ceiling.
    pub ignored: usize,
}

impl Summary {
    pub fn failed(&self) -> usize {
        self.skipped + self.malformed
    }
}

/// Drives listing → entries → documents → rows, one entry at a time.
pub struct Pipeline<F: Fetcher> {
    fetcher: F,
    parser: EntryParser,
    images: ImageResolver,
    max_entries: usize,
    progress: ProgressBar,
}

impl<F: Fetcher> Pipeline<F> {
    pub fn new(fetcher: F, settings: Settings) -> Self {
        Pipeline {
            fetcher,
            parser: EntryParser::new(settings.overrides),
            images: ImageResolver::new(settings.default_image),
            max_entries: settings.max_entries,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch the listing page. Anything but a 200 is fatal for the run.
    pub fn fetch_listing(&self, url: &str) -> Result<Listing, ScrapeError> {
        let res = self
            .fetcher
            .fetch(url)
            .map_err(|e| ScrapeError::ListingTransport {
                url: url.to_string(),
                source: e.into(),
            })?;
        if res.status != 200 {
            return Err(ScrapeError::ListingFetch {
                url: url.to_string(),
                status: res.status,
            });
        }
        Ok(Listing::from_payload(&res.body))
    }

    pub fn listing(&self, source: &Source) -> anyhow::Result<Listing> {
        match source {
            Source::Url(url) => {
                let mut url = url.clone();
                url.set_fragment(None);
                Ok(self.fetch_listing(url.as_str())?)
            }
            Source::File(path) => {
                let payload = fs::read_to_string(path)
                    .with_context(|| format!("failed to read listing {}", path.display()))?;
                Ok(Listing::from_payload(&payload))
            }
        }
    }

    /// Load the listing, then open the sink and process every entry.
    ///
    /// `open` is only called once the listing is known to be good, so a fatal listing error
    /// leaves no output behind.
    pub fn collect<W: Write>(
        &self,
        source: &Source,
        open: impl FnOnce() -> std::io::Result<W>,
    ) -> anyhow::Result<Summary> {
        let listing = self.listing(source)?;
        let out = open().context("failed to create output")?;
        let (summary, _) = self.process(&listing, out)?;
        Ok(summary)
    }

    /// Write the header and one row per resolved entry to `out`.
    pub fn process<W: Write>(&self, listing: &Listing, out: W) -> anyhow::Result<(Summary, W)> {
        let mut writer = RowWriter::new(out).context("failed to write header")?;
        let mut summary = Summary::default();

        let total = listing.entries().take(self.max_entries).count();
        self.progress.set_length(total as u64);
        info!(entries = total, "scanning listing");

        for (index, line) in listing.entries().enumerate() {
            let index = index + 1;
            if index > self.max_entries {
                summary.ignored += 1;
                continue;
            }
            self.progress.inc(1);
            match self.enrich(line) {
                Ok(row) => {
                    debug!(entry = index, url = %row.document_url, image = %row.image_url, "resolved");
                    writer.write(&row).context("failed to write row")?;
                    summary.written += 1;
                }
                Err(ScrapeError::MalformedEntry(reason)) => {
                    warn!(entry = index, %reason, line, "skipped malformed entry");
                    summary.malformed += 1;
                }
                Err(e) => {
                    warn!(entry = index, error = %e, "skipped document");
                    summary.skipped += 1;
                }
            }
        }
        self.progress.finish_and_clear();

        if summary.ignored > 0 {
            debug!(ignored = summary.ignored, limit = self.max_entries, "entry ceiling reached");
        }
        let out = writer.finish().context("failed to flush output")?;
        Ok((summary, out))
    }

    fn enrich(&self, line: &str) -> Result<OutputRow, ScrapeError> {
        let entry = self.parser.parse(line)?;
        let body = read_document(&self.fetcher, &entry.document_url)?;
        if body.is_empty() {
            return Err(ScrapeError::EmptyDocument {
                url: entry.document_url,
            });
        }
        let body = redirect::resolve(&self.fetcher, Some(body));
        let image_url = self.images.resolve(body.as_deref());
        Ok(OutputRow::new(entry, image_url))
    }
}
