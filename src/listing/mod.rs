use std::str::Lines;

pub mod entry;

/// Line that switches the scanner into the publication list.
pub const MARKER: &str = "List of publications";
/// Candidate entry lines start with this tag.
pub const ITEM_OPEN: &str = "<li>";

/// A fetched listing page, with escaped newlines already expanded.
#[derive(Debug, Clone)]
pub struct Listing {
    text: String,
}

impl Listing {
    /// Wrap a raw listing payload. The page embeds its markup with literal `\n` escapes, which
    /// are turned into real line breaks here.
    pub fn from_payload(payload: &str) -> Self {
        Listing {
            text: payload.replace("\\n", "\n"),
        }
    }

    /// Candidate entry lines, in page order.
    ///
    /// Every call starts a fresh scan over the same text.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            lines: self.text.lines(),
            in_listing: false,
        }
    }
}

/// Lazy scan over a listing page.
///
/// Nothing is yielded until a line containing [`MARKER`] has been seen; from then on, every line
/// starting with [`ITEM_OPEN`] is yielded, including the marker line itself.
pub struct Entries<'a> {
    lines: Lines<'a>,
    in_listing: bool,
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if !self.in_listing && line.contains(MARKER) {
                self.in_listing = true;
            }
            if self.in_listing && line.starts_with(ITEM_OPEN) {
                return Some(line);
            }
        }
        None
    }
}
