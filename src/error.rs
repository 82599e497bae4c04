//! Error kinds for each stage of a scrape run.
//!
//! Only [`ConfigError`] is meant to abort a run. The remaining kinds are
//! logged where they occur and turned into an empty or skipped result.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to load the run configuration. Fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Failure reported by a browser session.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("could not start WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("no element matches {0}")]
    NotFound(String),

    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },
}

/// Batch-level failure while driving the search page.
#[derive(Debug, Error)]
#[error("search step `{step}` failed: {source}")]
pub struct SearchError {
    pub step: &'static str,
    #[source]
    pub source: BrowserError,
}

impl SearchError {
    /// Adapter for `map_err` that tags a browser failure with the step it broke.
    pub fn at(step: &'static str) -> impl FnOnce(BrowserError) -> SearchError {
        move |source| SearchError { step, source }
    }
}

/// A single search result that could not be turned into an article.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("missing {field}: {source}")]
    MissingElement {
        field: &'static str,
        #[source]
        source: BrowserError,
    },

    #[error("unparsable date {value:?}: {source}")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Why an article image could not be saved locally.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("image url is empty")]
    EmptyUrl,

    #[error("image url {0:?} has no file name")]
    NoFileName(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} answered with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("cannot write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to build or save the output workbook.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_names_step() {
        let err = SearchError::at("open source")(BrowserError::NotFound("class:x".to_string()));
        assert_eq!(err.step, "open source");
        assert_eq!(
            err.to_string(),
            "search step `open source` failed: no element matches class:x"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = BrowserError::Timeout {
            what: "name:q".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "timed out after 5s waiting for name:q");
    }
}
