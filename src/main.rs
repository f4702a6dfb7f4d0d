use std::{
    fs::File,
    io::{self, BufWriter, IsTerminal},
    time::Duration,
};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, info};

use crate::{
    cli::Cli,
    fetch::HttpFetcher,
    listing::entry::YearOverrides,
    pipeline::{Pipeline, Settings, Summary},
};

mod attribute;
mod cli;
mod document;
mod error;
mod fetch;
mod listing;
mod output;
mod pipeline;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // RUST_LOG > --quiet > --verbose > info
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    debug!(?args, "CLI arguments parsed");

    let mut overrides = YearOverrides::builtin();
    if let Some(path) = &args.year_overrides {
        overrides.merge_file(path)?;
    }
    let settings = Settings {
        max_entries: args.max_entries,
        overrides,
        default_image: args.default_image.to_string(),
    };

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} entries") {
            bar.set_style(style);
        }
        bar
    };
    let pipeline = Pipeline::new(HttpFetcher::new(Duration::from_secs(args.timeout)), settings)
        .with_progress(progress);

    info!(source = %args.source, "collecting publications");
    let summary = pipeline.collect(&args.source, || File::create(&args.output).map(BufWriter::new))?;
    info!(
        output = %args.output.display(),
        written = summary.written,
        ignored = summary.ignored,
        "catalogue written"
    );
    eprintln!("{}", report(&summary));
    Ok(())
}

fn report(summary: &Summary) -> String {
    let ok = format!("✓ {}", summary.written);
    let failed = format!("✗ {}", summary.failed());
    if std::env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal() {
        format!("{}  {}", ok.green(), failed.red())
    } else {
        format!("{ok}  {failed}")
    }
}
