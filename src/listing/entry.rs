use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;

use crate::{error::MalformedEntry, listing::ITEM_OPEN};

const ITEM_CLOSE: &str = "</li>";
const ANCHOR_OPEN: &str = "<a";
const ANCHOR_CLOSE: &str = "</a>";

/// Known documents whose listing line carries no parsable year.
const BUILTIN_YEARS: &[(&str, &str)] = &[
    ("https://doi.org/10.1007/s10596-021-10051-4", "2021"),
    (
        "https://www.sciencedirect.com/science/article/abs/pii/S0309170813001322",
        "2013",
    ),
];

/// One publication as listed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationEntry {
    pub document_url: String,
    pub title: String,
    pub author: String,
    /// Empty when the listing gives no year and no override applies.
    pub year: String,
}

/// Year to use for a document URL when the listing line has none.
#[derive(Debug, Clone, Default)]
pub struct YearOverrides {
    years: HashMap<String, String>,
}

impl YearOverrides {
    pub fn builtin() -> Self {
        let mut overrides = Self::default();
        for (url, year) in BUILTIN_YEARS {
            overrides.insert(url, year);
        }
        overrides
    }

    pub fn insert(&mut self, url: &str, year: &str) {
        self.years.insert(url.trim().to_string(), year.to_string());
    }

    /// Merge a JSON object of `{"<document url>": "<year>"}` over the current table.
    pub fn merge_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read year overrides {}", path.display()))?;
        let years: HashMap<String, String> = serde_json::from_str(&text)
            .with_context(|| format!("year overrides {} is not a JSON object of strings", path.display()))?;
        for (url, year) in years {
            self.insert(&url, &year);
        }
        Ok(())
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.years.get(url.trim()).map(String::as_str)
    }
}

/// Turns one `<li>` listing line into a [`PublicationEntry`].
pub struct EntryParser {
    overrides: YearOverrides,
}

impl EntryParser {
    pub fn new(overrides: YearOverrides) -> Self {
        EntryParser { overrides }
    }

    /// Parse `<li>AUTHORS (YEAR) <a href="URL">TITLE</a></li>`.
    ///
    /// Only the first anchor is used. The href is whatever follows the first `"` in the anchor's
    /// opening tag, minus the tag's last character.
    pub fn parse(&self, line: &str) -> Result<PublicationEntry, MalformedEntry> {
        let line = line.trim_end();
        let line = line.strip_prefix(ITEM_OPEN).unwrap_or(line);
        let line = line.strip_suffix(ITEM_CLOSE).unwrap_or(line);

        let a_start = line.find(ANCHOR_OPEN).ok_or(MalformedEntry::MissingAnchor)?;
        let a_body_end = line[a_start..]
            .find('>')
            .map(|i| a_start + i)
            .ok_or(MalformedEntry::UnterminatedAnchor)?;
        let a_end = line[a_body_end..]
            .find(ANCHOR_CLOSE)
            .map(|i| a_body_end + i)
            .ok_or(MalformedEntry::MissingAnchorClose)?;

        let document_url = href(&line[a_start..a_body_end]).ok_or(MalformedEntry::MissingHref)?;
        let title = &line[a_body_end + 1..a_end];
        let (author, year) = split_author_year(line[..a_start].trim());

        let year = match year {
            Some(year) => year.to_string(),
            None => self
                .overrides
                .get(document_url)
                .unwrap_or_default()
                .to_string(),
        };

        Ok(PublicationEntry {
            document_url: document_url.to_string(),
            title: title.to_string(),
            author: author.replace(" and ", "").replace(",,", ""),
            year,
        })
    }
}

fn href(anchor_tag: &str) -> Option<&str> {
    let quote = anchor_tag.find('"')?;
    let mut rest = anchor_tag[quote + 1..].chars();
    rest.next_back();
    let url = rest.as_str();
    (!url.trim().is_empty()).then_some(url)
}

/// Split `Author, A. (2020)` into the text before `(` and the text between the parentheses.
///
/// The year is `None` when there is no `(` past the first character or no `)` at all; a `)`
/// that comes before the `(` gives an empty year.
fn split_author_year(text: &str) -> (&str, Option<&str>) {
    match (text.find('('), text.find(')')) {
        (Some(open), Some(close)) if open > 0 && close > 0 => {
            (&text[..open], Some(text.get(open + 1..close).unwrap_or_default()))
        }
        _ => (text, None),
    }
}
