use std::{fmt, fs, path::PathBuf, str::FromStr};

use clap::Parser;
use url::Url;

use crate::{document::image::DEFAULT_IMAGE, pipeline::DEFAULT_MAX_ENTRIES};

pub const DEFAULT_LISTING: &str = "https://parflow.org/#publications";
pub const DEFAULT_OUTPUT: &str = "paper_doi_entries.csv";

/// Build a CSV catalogue of publications, with a representative image for each.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Listing page to scan: a URL, or a saved copy of the page
    #[arg(value_name = "SRC", default_value = DEFAULT_LISTING)]
    pub source: Source,

    /// Where to write the catalogue (overwritten)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Stop after this many listing entries
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_MAX_ENTRIES)]
    pub max_entries: usize,

    /// Image used when a document has no usable one
    #[arg(long, value_name = "URL", default_value = DEFAULT_IMAGE)]
    pub default_image: Url,

    /// JSON object mapping document URLs to the year to use when the listing has none
    #[arg(long, value_name = "FILE")]
    pub year_overrides: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors and hide progress
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Debug)]
/// Where the listing page comes from: the live site, or a page saved to disk.
pub enum Source {
    Url(Url),
    File(PathBuf),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Existing paths win, so a saved page named like a URL still reads from disk.
        if let Ok(path) = fs::canonicalize(s) {
            return Ok(Source::File(path));
        }
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Source::Url(url)),
            Ok(url) => Err(format!("unsupported scheme '{}' in {s}", url.scheme())),
            Err(e) => Err(format!("'{s}' is neither an existing file nor a URL ({e})")),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn from_str_identifies_existing_file() {
        let tmp = NamedTempFile::new().expect("tmp file");
        let path = tmp.path().to_path_buf();
        let src = Source::from_str(path.to_str().unwrap()).expect("parse");
        match src {
            Source::File(p) => {
                let can = std::fs::canonicalize(&path).unwrap();
                assert_eq!(p, can);
            }
            _ => panic!("expected file source"),
        }
    }

    #[test]
    fn from_str_accepts_http_urls() {
        match Source::from_str(DEFAULT_LISTING).expect("parse") {
            Source::Url(url) => assert_eq!(url.host_str(), Some("parflow.org")),
            _ => panic!("expected url source"),
        }
    }

    #[test]
    fn from_str_rejects_other_schemes() {
        let err = Source::from_str("ftp://example.org/list.html").unwrap_err();
        assert!(err.contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn from_str_rejects_missing_paths() {
        proptest::proptest!(|(s in "[A-Za-z0-9._-]{1,32}")| {
            let path = PathBuf::from(&s);
            proptest::prop_assume!(!path.exists());
            let err = Source::from_str(&s).unwrap_err();
            proptest::prop_assert!(err.contains("neither an existing file nor a URL"));
        })
    }

    #[test]
    fn defaults_need_no_arguments() {
        let cli = Cli::try_parse_from(["pubscan"]).expect("defaults parse");
        assert!(matches!(cli.source, Source::Url(_)));
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cli.max_entries, 500);
        assert_eq!(cli.default_image.as_str(), DEFAULT_IMAGE);
        assert_eq!(cli.timeout, 30);
        assert!(cli.year_overrides.is_none());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["pubscan", "-v", "-q"]).is_err());
    }
}
