//! A [`Browser`] over a fixed HTML document, for tests.
//!
//! Every URL opens the same document. Waits resolve immediately: they pass
//! if the target is already in the document and time out otherwise.
//! Clicks and typed text are recorded so tests can assert on them.

use super::{Browser, Locator};
use crate::error::BrowserError;
use scraper::{ElementRef, Html, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StaticElement {
    html: String,
    text: String,
    attrs: HashMap<String, String>,
}

impl StaticElement {
    fn from_ref(element: ElementRef<'_>) -> Self {
        Self {
            html: element.html(),
            text: element.text().collect::<String>().trim().to_string(),
            attrs: element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct StaticPage {
    html: String,
    pub opened: RefCell<Vec<String>>,
    pub clicked: RefCell<Vec<String>>,
    pub typed: RefCell<Vec<(String, String)>>,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            opened: RefCell::new(Vec::new()),
            clicked: RefCell::new(Vec::new()),
            typed: RefCell::new(Vec::new()),
        }
    }

    fn select_first(html: &Html, locator: Locator) -> Result<StaticElement, BrowserError> {
        let selector = parse(locator)?;
        html.select(&selector)
            .next()
            .map(StaticElement::from_ref)
            .ok_or_else(|| BrowserError::NotFound(locator.to_string()))
    }
}

fn parse(locator: Locator) -> Result<Selector, BrowserError> {
    Selector::parse(&locator.to_css())
        .map_err(|e| BrowserError::NotFound(format!("{locator} ({e})")))
}

impl Browser for StaticPage {
    type Element = StaticElement;

    async fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn find(&self, locator: Locator) -> Result<StaticElement, BrowserError> {
        Self::select_first(&Html::parse_document(&self.html), locator)
    }

    async fn find_within(
        &self,
        parent: &StaticElement,
        locator: Locator,
    ) -> Result<StaticElement, BrowserError> {
        Self::select_first(&Html::parse_fragment(&parent.html), locator)
    }

    async fn find_all_within(
        &self,
        parent: &StaticElement,
        locator: Locator,
    ) -> Result<Vec<StaticElement>, BrowserError> {
        let selector = parse(locator)?;
        let fragment = Html::parse_fragment(&parent.html);
        Ok(fragment.select(&selector).map(StaticElement::from_ref).collect())
    }

    async fn text(&self, element: &StaticElement) -> Result<String, BrowserError> {
        Ok(element.text.clone())
    }

    async fn attribute(
        &self,
        element: &StaticElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(element.attrs.get(name).cloned())
    }

    async fn wait_until_visible(
        &self,
        locator: Locator,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.find(locator)
            .await
            .map(|_| ())
            .map_err(|_| BrowserError::Timeout {
                what: locator.to_string(),
                timeout,
            })
    }

    async fn wait_until_page_contains(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        if self.html.contains(text) {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: format!("text {text:?}"),
                timeout,
            })
        }
    }

    async fn click(&self, locator: Locator) -> Result<(), BrowserError> {
        self.find(locator).await?;
        self.clicked.borrow_mut().push(locator.to_string());
        Ok(())
    }

    async fn input_text(&self, locator: Locator, text: &str) -> Result<(), BrowserError> {
        self.find(locator).await?;
        self.typed
            .borrow_mut()
            .push((locator.to_string(), text.to_string()));
        Ok(())
    }

    async fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}

/// Markup of one AP-style search result.
pub fn result_item(
    title: &str,
    datetime: Option<&str>,
    description: &str,
    image: &str,
) -> String {
    let timestamp = match datetime {
        Some(datetime) => format!(
            r#"<bsp-timestamp class="Timestamp-template" datetime="{datetime}"></bsp-timestamp>"#
        ),
        None => r#"<bsp-timestamp class="Timestamp-template"></bsp-timestamp>"#.to_string(),
    };
    format!(
        r#"<div class="PageList-items-item">
  <div class="PagePromo">
    <div class="PagePromo-media"><img class="Image" src="{image}" alt=""></div>
    <div class="PagePromo-title"><span class="PagePromoContentIcons-text">{title}</span></div>
    <div class="PagePromo-description"><span class="PagePromoContentIcons-text">{description}</span></div>
    <div class="PagePromo-date">{timestamp}</div>
  </div>
</div>"#
    )
}

/// A search results page with the search overlay, an optional consent
/// banner and the given result items.
pub fn results_page(items: &[String], with_consent_banner: bool) -> String {
    let banner = if with_consent_banner {
        r#"<div id="onetrust-banner-sdk"><button class="onetrust-close-btn-handler">Close</button></div>"#
    } else {
        ""
    };
    format!(
        r#"<!DOCTYPE html>
<html><body>
{banner}
<div class="SearchOverlay">
  <button class="SearchOverlay-search-button">Search</button>
  <form><input type="text" name="q"><button class="SearchOverlay-search-submit">Go</button></form>
</div>
<h1 class="SearchResultsModule-query">Results for economy</h1>
<div class="SearchResultsModule-results">
  <div class="PageList-items">
{}
  </div>
</div>
</body></html>"#,
        items.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scoped_lookup_and_attributes() {
        let items = vec![result_item(
            "Title one",
            Some("2024-06-03T14:22:05Z"),
            "Teaser one",
            "https://img.example/a.png",
        )];
        let page = StaticPage::new(results_page(&items, false));

        let results = page
            .find(Locator::ClassName("SearchResultsModule-results"))
            .await
            .unwrap();
        let found = page
            .find_all_within(&results, Locator::ClassName("PageList-items-item"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let title = page
            .find_within(&found[0], Locator::Css(".PagePromoContentIcons-text"))
            .await
            .unwrap();
        assert_eq!(page.text(&title).await.unwrap(), "Title one");

        let stamp = page
            .find_within(&found[0], Locator::Css(".Timestamp-template"))
            .await
            .unwrap();
        assert_eq!(
            page.attribute(&stamp, "datetime").await.unwrap().as_deref(),
            Some("2024-06-03T14:22:05Z")
        );
    }

    #[tokio::test]
    async fn test_missing_element_is_not_found() {
        let page = StaticPage::new(results_page(&[], false));
        let err = page
            .find(Locator::Css(".onetrust-close-btn-handler"))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::NotFound(_)));
    }
}
