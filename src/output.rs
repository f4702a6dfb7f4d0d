use std::io::{self, Write};

use crate::listing::entry::PublicationEntry;

pub const HEADER: &str = "paper_doi_url,image_url,title,author,year";

/// One enriched publication, as written to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub document_url: String,
    pub image_url: String,
    pub title: String,
    pub author: String,
    pub year: String,
}

impl OutputRow {
    pub fn new(entry: PublicationEntry, image_url: String) -> Self {
        OutputRow {
            document_url: entry.document_url,
            image_url,
            title: entry.title,
            author: entry.author,
            year: entry.year,
        }
    }
}

/// CSV sink for the catalogue. The header goes out as soon as the writer exists.
pub struct RowWriter<W: Write> {
    out: W,
}

impl<W: Write> RowWriter<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{HEADER}")?;
        Ok(RowWriter { out })
    }

    /// Title and author are always quoted; URLs and year are written bare.
    pub fn write(&mut self, row: &OutputRow) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{},{}",
            row.document_url,
            row.image_url,
            quoted(&row.title),
            quoted(&row.author),
            row.year
        )
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
