//! News site scrapers.
//!
//! Each scraper drives a [`crate::browser::Browser`] in two phases:
//!
//! 1. **Searching**: open the site, submit the search phrase and wait for
//!    the results page
//! 2. **Collecting**: walk the result elements in page order, keep the ones
//!    inside the recency window and enrich them into
//!    [`crate::models::ArticleRecord`]s
//!
//! A result that cannot be parsed is logged and skipped; it never aborts
//! the batch.
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | AP News | [`apnews`] | Site search through a WebDriver session |

pub mod apnews;
