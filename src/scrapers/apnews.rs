//! AP News search scraper.
//!
//! Searches [AP News](https://apnews.com) through its search overlay and
//! reads the promo cards on the results page. Each card carries a headline,
//! a `<bsp-timestamp>` with an ISO `datetime` attribute, a teaser and a
//! promo image.

use crate::browser::{Browser, Locator};
use crate::config::Config;
use crate::error::{ArticleError, BrowserError, SearchError};
use crate::images::{Downloader, download_image};
use crate::models::{ArticleRecord, Candidate};
use crate::utils::{
    clean_text, contains_money, count_search_phrases, is_within_months, parse_article_date,
    truncate_for_log,
};
use chrono::NaiveDateTime;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const SEARCH_BUTTON: Locator = Locator::ClassName("SearchOverlay-search-button");
const SEARCH_INPUT: Locator = Locator::Name("q");
const SEARCH_SUBMIT: Locator = Locator::ClassName("SearchOverlay-search-submit");
const RESULTS_MARKER: &str = "Results for";
const CONSENT_CLOSE: Locator = Locator::Css(".onetrust-close-btn-handler");
const RESULTS_CONTAINER: Locator = Locator::ClassName("SearchResultsModule-results");
const RESULT_ITEM: Locator = Locator::ClassName("PageList-items-item");

const TITLE: Locator = Locator::Css(".PagePromoContentIcons-text");
const TIMESTAMP: Locator = Locator::Css(".Timestamp-template");
const DESCRIPTION: Locator = Locator::Css(".PagePromo-description");
const DESCRIPTION_TEXT: Locator = Locator::Css(".PagePromoContentIcons-text");
const MEDIA: Locator = Locator::Css(".PagePromo-media");
const IMAGE: Locator = Locator::Css(".Image");

const SEARCH_INPUT_WAIT: Duration = Duration::from_secs(5);
const RESULTS_WAIT: Duration = Duration::from_secs(10);
const CONSENT_WAIT: Duration = Duration::from_secs(10);

/// Open the site and submit the configured search phrase.
///
/// # Errors
///
/// Returns a [`SearchError`] naming the step that failed, e.g. when the
/// search box never appears or the results page never loads.
#[instrument(level = "info", skip_all, fields(source = %config.source))]
pub async fn submit_search<B: Browser>(browser: &B, config: &Config) -> Result<(), SearchError> {
    info!(
        search_phrase = %config.search_phrase,
        category = %config.category,
        source = %config.source,
        "Searching news"
    );

    browser
        .open(config.source.as_str())
        .await
        .map_err(SearchError::at("open source"))?;
    browser
        .click(SEARCH_BUTTON)
        .await
        .map_err(SearchError::at("open search overlay"))?;
    browser
        .wait_until_visible(SEARCH_INPUT, SEARCH_INPUT_WAIT)
        .await
        .map_err(SearchError::at("wait for search input"))?;
    browser
        .input_text(SEARCH_INPUT, &config.search_phrase)
        .await
        .map_err(SearchError::at("type search phrase"))?;
    browser
        .click(SEARCH_SUBMIT)
        .await
        .map_err(SearchError::at("submit search"))?;
    browser
        .wait_until_page_contains(RESULTS_MARKER, RESULTS_WAIT)
        .await
        .map_err(SearchError::at("wait for results"))?;
    Ok(())
}

/// Close the cookie consent banner if one shows up. Absence is not an error.
pub async fn dismiss_overlays<B: Browser>(browser: &B) {
    let dismissed = match browser.wait_until_visible(CONSENT_CLOSE, CONSENT_WAIT).await {
        Ok(()) => browser.click(CONSENT_CLOSE).await,
        Err(e) => Err(e),
    };
    match dismissed {
        Ok(()) => info!("Dismissed consent overlay"),
        Err(e) => info!(error = %e, "No overlay to dismiss"),
    }
}

/// Read the results page and append every article inside the recency
/// window to `records`, in page order.
///
/// `now` is both the upper bound of the window and the date given to
/// results without a timestamp. Records pushed before a batch-level
/// failure stay in `records`.
///
/// # Errors
///
/// Returns a [`SearchError`] if the results container or its items cannot
/// be located. Per-result failures are logged and skipped.
#[instrument(level = "info", skip_all, fields(months = config.months))]
pub async fn collect_articles<B: Browser, D: Downloader>(
    browser: &B,
    downloader: &D,
    config: &Config,
    output_dir: &Path,
    now: NaiveDateTime,
    records: &mut Vec<ArticleRecord>,
) -> Result<(), SearchError> {
    let results = browser
        .find(RESULTS_CONTAINER)
        .await
        .map_err(SearchError::at("locate results"))?;
    let items = browser
        .find_all_within(&results, RESULT_ITEM)
        .await
        .map_err(SearchError::at("list results"))?;
    info!(count = items.len(), "Found search results");

    for (index, item) in items.iter().enumerate() {
        let candidate = match read_candidate(browser, item, now).await {
            Ok(candidate) => candidate,
            Err(e) => {
                error!(index, error = %e, "Error processing article");
                continue;
            }
        };

        if !is_within_months(candidate.date, now, config.months) {
            debug!(index, date = %candidate.date, "Article outside recency window");
            continue;
        }

        let record = enrich(candidate, downloader, &config.search_phrase, output_dir).await;
        info!(
            index,
            title = %record.title,
            date = %record.date,
            description = %truncate_for_log(&record.description, 120),
            image_filename = %record.image_filename,
            search_phrase_count = record.search_phrase_count,
            contains_money = record.contains_money,
            "News article found"
        );
        records.push(record);
    }

    info!(kept = records.len(), "News search completed successfully");
    Ok(())
}

/// Pull the raw fields out of one result element.
async fn read_candidate<B: Browser>(
    browser: &B,
    item: &B::Element,
    now: NaiveDateTime,
) -> Result<Candidate, ArticleError> {
    let missing = |field: &'static str| {
        move |source: BrowserError| ArticleError::MissingElement { field, source }
    };

    let title = browser
        .find_within(item, TITLE)
        .await
        .map_err(missing("title"))?;
    let timestamp = browser
        .find_within(item, TIMESTAMP)
        .await
        .map_err(missing("timestamp"))?;
    let description_block = browser
        .find_within(item, DESCRIPTION)
        .await
        .map_err(missing("description"))?;
    let description = browser
        .find_within(&description_block, DESCRIPTION_TEXT)
        .await
        .map_err(missing("description text"))?;
    let media = browser
        .find_within(item, MEDIA)
        .await
        .map_err(missing("media"))?;
    let image = browser
        .find_within(&media, IMAGE)
        .await
        .map_err(missing("image"))?;

    let title = browser.text(&title).await.map_err(missing("title text"))?;
    let raw_date = browser
        .attribute(&timestamp, "datetime")
        .await
        .map_err(missing("timestamp datetime"))?;
    let description = browser
        .text(&description)
        .await
        .map_err(missing("description text"))?;
    let image_url = browser
        .attribute(&image, "src")
        .await
        .map_err(missing("image src"))?
        .unwrap_or_default();

    let date = match parse_article_date(raw_date.as_deref(), now) {
        Ok(date) => date,
        Err(source) => {
            return Err(ArticleError::Date {
                value: raw_date.unwrap_or_default(),
                source,
            });
        }
    };

    Ok(Candidate {
        title,
        date,
        description,
        image_url,
    })
}

/// Download the image and derive the cleaned, counted record.
///
/// Counting and money detection look at the text as it appeared on the page.
async fn enrich<D: Downloader>(
    candidate: Candidate,
    downloader: &D,
    search_phrase: &str,
    output_dir: &Path,
) -> ArticleRecord {
    let image_filename = download_image(downloader, &candidate.image_url, output_dir).await;
    ArticleRecord {
        search_phrase_count: count_search_phrases(
            &candidate.title,
            &candidate.description,
            search_phrase,
        ),
        contains_money: contains_money(&candidate.title, &candidate.description),
        title: clean_text(&candidate.title),
        date: candidate.date,
        description: clean_text(&candidate.description),
        image_filename,
    }
}
