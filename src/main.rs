//! # News Scraper
//!
//! Searches a news site through a real browser, keeps the articles published
//! within the last few (30-day) months, downloads their promo images and
//! exports everything to an Excel workbook.
//!
//! ## Usage
//!
//! ```sh
//! # needs a WebDriver server, e.g. `chromedriver --port=4444`
//! news_scraper --config config/config.json --output-dir output
//! ```
//!
//! ## Architecture
//!
//! The run is strictly sequential:
//! 1. **Config**: load and validate `config/config.json` (the only fatal step)
//! 2. **Searching**: open the source, submit the phrase, dismiss the consent banner
//! 3. **Collecting**: read every result card, filter by date, clean the text,
//!    count phrase hits, flag money mentions, download the image
//! 4. **Writing**: save `news_data.xlsx`
//! 5. **Closed**: end the browser session

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::info;

mod browser;
mod cli;
mod config;
mod error;
mod images;
mod logging;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use browser::webdriver::WebDriverBrowser;
use cli::Cli;
use config::Config;
use images::HttpDownloader;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    ensure_writable_dir(&args.output_dir).await?;
    let log_path = logging::init(&args.output_dir)?;

    let start_time = Instant::now();
    info!(log = %log_path.display(), "NewsScraper initialized");

    let config = Config::load(&args.config)?;

    let browser = WebDriverBrowser::connect(&args.webdriver_url, args.headless).await;
    let downloader = HttpDownloader::new();
    let summary = pipeline::run(browser, &downloader, &config, &args.output_dir).await;

    let elapsed = start_time.elapsed();
    info!(
        records = summary.records_written,
        output = ?summary.output_file,
        phase = %summary.phase,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
