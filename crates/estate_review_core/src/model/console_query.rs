//! Addressable console view state.
//!
//! # Responsibility
//! - Map the console's `tab`, `ward`, `hours`, `page` URL parameters to a typed value.
//! - Keep shared links short by omitting parameters equal to their default.
//!
//! # Invariants
//! - `page >= 1` and `hours >= 1` after parsing.
//! - Parsing never fails; unknown keys are ignored and bad values fall back to defaults.

use reqwest::Url;

pub const DEFAULT_HOURS: u32 = 24;
pub const DEFAULT_PAGE: u32 = 1;

/// Top-level console tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTab {
    #[default]
    Properties,
    Buildings,
    History,
    Scraping,
}

impl ConsoleTab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Buildings => "buildings",
            Self::History => "history",
            Self::Scraping => "scraping",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "properties" => Some(Self::Properties),
            "buildings" => Some(Self::Buildings),
            "history" => Some(Self::History),
            "scraping" => Some(Self::Scraping),
            _ => None,
        }
    }
}

/// Typed view of the console URL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleQuery {
    pub tab: ConsoleTab,
    /// Ward filter; `None` means all wards.
    pub ward: Option<String>,
    /// Look-back window for recently updated listings.
    pub hours: u32,
    pub page: u32,
}

impl Default for ConsoleQuery {
    fn default() -> Self {
        Self {
            tab: ConsoleTab::default(),
            ward: None,
            hours: DEFAULT_HOURS,
            page: DEFAULT_PAGE,
        }
    }
}

impl ConsoleQuery {
    /// Returns query pairs, skipping every value equal to its default.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.tab != ConsoleTab::default() {
            pairs.push(("tab", self.tab.as_str().to_string()));
        }
        if let Some(ward) = self.ward.as_deref().filter(|ward| !ward.trim().is_empty()) {
            pairs.push(("ward", ward.trim().to_string()));
        }
        if self.hours != DEFAULT_HOURS {
            pairs.push(("hours", self.hours.to_string()));
        }
        if self.page != DEFAULT_PAGE {
            pairs.push(("page", self.page.to_string()));
        }
        pairs
    }

    /// Parses query pairs leniently.
    pub fn from_query_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "tab" => query.tab = ConsoleTab::parse(value).unwrap_or_default(),
                "ward" => {
                    let trimmed = value.trim();
                    query.ward = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
                "hours" => query.hours = parse_positive(value).unwrap_or(DEFAULT_HOURS),
                "page" => query.page = parse_positive(value).unwrap_or(DEFAULT_PAGE),
                _ => {}
            }
        }
        query
    }

    /// Replaces the query of `base` with this state.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        let pairs = self.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    /// Reads state from the query of `url`.
    pub fn from_url(url: &Url) -> Self {
        Self::from_query_pairs(url.query_pairs())
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|parsed| *parsed >= 1)
}

#[cfg(test)]
mod tests {
    use super::{ConsoleQuery, ConsoleTab};
    use reqwest::Url;

    #[test]
    fn default_state_produces_no_query() {
        let base = Url::parse("https://console.example/admin?stale=1").unwrap();
        let url = ConsoleQuery::default().to_url(&base);
        assert_eq!(url.as_str(), "https://console.example/admin");
    }

    #[test]
    fn non_default_values_roundtrip_through_url() {
        let state = ConsoleQuery {
            tab: ConsoleTab::Buildings,
            ward: Some("Shibuya-ku".to_string()),
            hours: 72,
            page: 3,
        };
        let base = Url::parse("https://console.example/admin").unwrap();
        let url = state.to_url(&base);

        assert_eq!(
            url.query(),
            Some("tab=buildings&ward=Shibuya-ku&hours=72&page=3")
        );
        assert_eq!(ConsoleQuery::from_url(&url), state);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let state = ConsoleQuery::from_query_pairs([
            ("tab", "unknown"),
            ("hours", "0"),
            ("page", "-2"),
            ("ward", "  "),
            ("extra", "ignored"),
        ]);
        assert_eq!(state, ConsoleQuery::default());
    }
}
