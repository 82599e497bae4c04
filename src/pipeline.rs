//! One scrape run, start to finish.
//!
//! The run moves through [`Phase`]s in a fixed order and never goes back:
//!
//! ```text
//! Init -> Searching -> Collecting -> Writing -> Closed
//! ```
//!
//! A failure inside a phase is logged and the run moves on. Writing always
//! happens, so every run leaves a workbook behind, empty if nothing was
//! collected.

use crate::browser::Browser;
use crate::config::Config;
use crate::error::BrowserError;
use crate::images::Downloader;
use crate::models::ArticleRecord;
use crate::outputs::xlsx;
use crate::scrapers::apnews;
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Searching,
    Collecting,
    Writing,
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Searching => "searching",
            Phase::Collecting => "collecting",
            Phase::Writing => "writing",
            Phase::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub records_written: usize,
    /// `None` when the workbook could not be saved.
    pub output_file: Option<PathBuf>,
    pub phase: Phase,
}

struct Progress {
    phase: Phase,
}

impl Progress {
    fn advance(&mut self, next: Phase) {
        info!(from = %self.phase, to = %next, "Run phase");
        self.phase = next;
    }
}

/// Search, collect, write and close.
///
/// `browser` is the outcome of opening the session; if that failed the run
/// skips straight to writing an empty workbook.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn run<B: Browser, D: Downloader>(
    browser: Result<B, BrowserError>,
    downloader: &D,
    config: &Config,
    output_dir: &Path,
) -> RunSummary {
    let mut progress = Progress { phase: Phase::Init };
    let mut records: Vec<ArticleRecord> = Vec::new();

    let browser = match browser {
        Ok(browser) => Some(browser),
        Err(e) => {
            error!(error = %e, "Could not open browser session");
            None
        }
    };

    if let Some(browser) = &browser {
        progress.advance(Phase::Searching);
        match apnews::submit_search(browser, config).await {
            Ok(()) => {
                apnews::dismiss_overlays(browser).await;
                progress.advance(Phase::Collecting);
                let now = Utc::now().naive_utc();
                let collected = apnews::collect_articles(
                    browser,
                    downloader,
                    config,
                    output_dir,
                    now,
                    &mut records,
                )
                .await;
                if let Err(e) = collected {
                    error!(error = %e, "Error processing the news search");
                }
            }
            Err(e) => error!(error = %e, "Error processing the news search"),
        }
    }

    progress.advance(Phase::Writing);
    let output_file = match xlsx::save_news(output_dir, &records) {
        Ok(path) => Some(path),
        Err(e) => {
            error!(error = %e, "Error saving data to Excel");
            None
        }
    };

    progress.advance(Phase::Closed);
    if let Some(browser) = browser {
        match browser.close().await {
            Ok(()) => info!("Browser closed"),
            Err(e) => error!(error = %e, "Error closing browser"),
        }
    }

    RunSummary {
        records_written: records.len(),
        output_file,
        phase: progress.phase,
    }
}
