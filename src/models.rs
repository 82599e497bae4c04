//! Data models for search results and the articles kept from them.
//!
//! - [`Candidate`]: the raw fields read off one search result element
//! - [`ArticleRecord`]: a filtered, cleaned and enriched article, one
//!   spreadsheet row

use chrono::NaiveDateTime;

/// The raw fields of one search result, before filtering and cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Headline text as rendered.
    pub title: String,
    /// Publication time (UTC), or the extraction time when the page had none.
    pub date: NaiveDateTime,
    /// Teaser text as rendered.
    pub description: String,
    /// `src` of the promo image; empty when the element carried none.
    pub image_url: String,
}

/// An article that passed the recency window.
///
/// Records are built once and never changed; they live until the
/// spreadsheet has been written.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    /// Headline with everything but ASCII letters, digits and whitespace removed.
    pub title: String,
    /// Publication time (UTC).
    pub date: NaiveDateTime,
    /// Teaser with everything but ASCII letters, digits and whitespace removed.
    pub description: String,
    /// Local path of the downloaded image, or empty if the download failed.
    pub image_filename: String,
    /// Case-insensitive occurrences of the search phrase in title plus description.
    pub search_phrase_count: usize,
    /// Whether title or description mentions an amount of money.
    pub contains_money: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_article_record_creation() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(14, 22, 5)
            .unwrap();
        let record = ArticleRecord {
            title: "Markets rally".to_string(),
            date,
            description: "Stocks rose 2 percent".to_string(),
            image_filename: String::new(),
            search_phrase_count: 1,
            contains_money: false,
        };

        assert_eq!(record.title, "Markets rally");
        assert_eq!(record.date, date);
        assert!(record.image_filename.is_empty());
    }
}
