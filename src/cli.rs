//! Command-line interface definitions.
//!
//! Every flag has a default, so running the binary with no arguments reads
//! `config/config.json`, writes into `output/` and talks to a WebDriver
//! server on `localhost:4444`.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the news scraper.
///
/// # Examples
///
/// ```sh
/// # Defaults: config/config.json, output/, http://localhost:4444
/// news_scraper
///
/// # Headless Chrome through a remote chromedriver
/// news_scraper --webdriver-url http://10.0.0.5:9515 --headless
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON run configuration
    #[arg(short, long, default_value = "config/config.json")]
    pub config: PathBuf,

    /// Directory for the workbook, the log file and downloaded images
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// WebDriver server to open the browser session on
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:4444")]
    pub webdriver_url: String,

    /// Ask the browser to run without a window
    #[arg(long)]
    pub headless: bool,
}
