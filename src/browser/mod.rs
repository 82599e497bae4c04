//! Browser capability surface used by the scrapers.
//!
//! The scrapers only need a handful of operations: navigate, look elements
//! up (optionally inside a parent), read text and attributes, wait for
//! something to show up, click and type. [`Browser`] captures exactly that,
//! so the extraction logic runs the same against a real WebDriver session
//! ([`webdriver::WebDriverBrowser`]) or a canned HTML page in tests.

use crate::error::BrowserError;
use std::fmt;
use std::time::Duration;

#[cfg(test)]
pub mod static_page;
pub mod webdriver;

/// How to find an element. Every variant renders to a CSS selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// A single class name, without the leading dot.
    ClassName(&'static str),
    /// A raw CSS selector.
    Css(&'static str),
    /// The `name` attribute of a form control.
    Name(&'static str),
}

impl Locator {
    pub fn to_css(&self) -> String {
        match self {
            Locator::ClassName(class) => format!(".{class}"),
            Locator::Css(selector) => (*selector).to_string(),
            Locator::Name(name) => format!("[name=\"{name}\"]"),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::ClassName(class) => write!(f, "class:{class}"),
            Locator::Css(selector) => write!(f, "css:{selector}"),
            Locator::Name(name) => write!(f, "name:{name}"),
        }
    }
}

/// A live page that can be queried and driven.
///
/// Lookups that match nothing fail with [`BrowserError::NotFound`]; bounded
/// waits fail with [`BrowserError::Timeout`] once their deadline passes.
pub trait Browser {
    /// Handle to an element on the current page.
    type Element;

    /// Navigate to `url`.
    async fn open(&self, url: &str) -> Result<(), BrowserError>;

    /// First element on the page matching `locator`.
    async fn find(&self, locator: Locator) -> Result<Self::Element, BrowserError>;

    /// First descendant of `parent` matching `locator`.
    async fn find_within(
        &self,
        parent: &Self::Element,
        locator: Locator,
    ) -> Result<Self::Element, BrowserError>;

    /// All descendants of `parent` matching `locator`, in document order.
    async fn find_all_within(
        &self,
        parent: &Self::Element,
        locator: Locator,
    ) -> Result<Vec<Self::Element>, BrowserError>;

    /// Rendered text of `element`.
    async fn text(&self, element: &Self::Element) -> Result<String, BrowserError>;

    /// Value of attribute `name`, `None` if the element does not carry it.
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Wait until an element matching `locator` is displayed.
    async fn wait_until_visible(
        &self,
        locator: Locator,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Wait until the page source contains `text`.
    async fn wait_until_page_contains(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Click the first element matching `locator`.
    async fn click(&self, locator: Locator) -> Result<(), BrowserError>;

    /// Clear the first element matching `locator` and type `text` into it.
    async fn input_text(&self, locator: Locator, text: &str) -> Result<(), BrowserError>;

    /// End the session.
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}
