// ABOUTME: Selector profile data model: ordered fallback chains for every listing field.
// ABOUTME: Profiles are plain serde structs so a site redesign only needs a new JSON file.

//! Site profiles for listing extraction.
//!
//! A [`ListingProfile`] describes one platform: where its search page lives,
//! which selectors find listing items, and for each record field an ordered
//! chain of [`SelectorSpec`]s. Chains are evaluated first-to-last and the
//! first usable value wins.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};
use crate::page::compiled::precompile_selectors;

/// Placeholder replaced by the URL-encoded keyword in [`ListingProfile::search_url`].
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";

/// Specifies how to read one value relative to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorSpec {
    /// Text of the first descendant matching the selector, e.g. ".title"
    Css(String),
    /// An attribute of the first matching descendant, e.g. ["time", "datetime"]
    CssAttr(Vec<String>),
}

impl Default for SelectorSpec {
    fn default() -> Self {
        SelectorSpec::Css(String::new())
    }
}

/// Parses a selector spec into a CSS selector string and optional attribute name.
///
/// Returns (css_selector, optional_attribute).
pub fn parse_selector(selector: &SelectorSpec) -> (&str, Option<&str>) {
    match selector {
        SelectorSpec::Css(css) => (css.as_str(), None),
        SelectorSpec::CssAttr(parts) => match parts.as_slice() {
            [css, attr, ..] => (css.as_str(), Some(attr.as_str())),
            [css] => (css.as_str(), None),
            [] => ("", None),
        },
    }
}

/// Extraction rules for one platform's search listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListingProfile {
    /// Short platform name used in logs
    pub name: String,
    /// Landing page opened for the login gate
    #[serde(default)]
    pub home_url: String,
    /// Search page template; must contain `{keyword}`
    pub search_url: String,
    /// Selectors whose presence means the listing has rendered
    #[serde(default)]
    pub wait_selectors: Vec<String>,
    /// Item discovery selectors, in priority order
    pub item_selectors: Vec<String>,
    /// Permalink substrings that mark a link as a note URL
    #[serde(default)]
    pub permalink_markers: Vec<String>,
    #[serde(default)]
    pub title: Vec<SelectorSpec>,
    #[serde(default)]
    pub author: Vec<SelectorSpec>,
    #[serde(default)]
    pub likes: Vec<SelectorSpec>,
    #[serde(default)]
    pub comments: Vec<SelectorSpec>,
    #[serde(default)]
    pub publish_date: Vec<SelectorSpec>,
    #[serde(default)]
    pub tags: Vec<SelectorSpec>,
    /// Selectors that only appear for a logged-in session
    #[serde(default)]
    pub login_selectors: Vec<String>,
    /// Selector that only appears for a logged-out session
    #[serde(default)]
    pub logged_out_selector: Option<String>,
}

impl ListingProfile {
    /// Search page URL for `keyword`, with the keyword form-urlencoded.
    pub fn search_url_for(&self, keyword: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(keyword.as_bytes()).collect();
        self.search_url.replace(KEYWORD_PLACEHOLDER, &encoded)
    }

    /// Every CSS selector the profile references.
    pub fn all_selectors(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        out.extend(self.wait_selectors.iter().map(String::as_str));
        out.extend(self.item_selectors.iter().map(String::as_str));
        for chain in [
            &self.title,
            &self.author,
            &self.likes,
            &self.comments,
            &self.publish_date,
            &self.tags,
        ] {
            out.extend(chain.iter().map(|spec| parse_selector(spec).0));
        }
        out.extend(self.login_selectors.iter().map(String::as_str));
        out.extend(self.logged_out_selector.as_deref());
        out
    }

    /// Checks that the profile is usable and that every selector compiles.
    pub fn validate(&self) -> Result<()> {
        if self.item_selectors.is_empty() {
            return Err(ScoutError::profile(
                &self.name,
                "validate",
                Some(anyhow::anyhow!("item_selectors is empty")),
            ));
        }
        if !self.search_url.contains(KEYWORD_PLACEHOLDER) {
            return Err(ScoutError::profile(
                &self.name,
                "validate",
                Some(anyhow::anyhow!(
                    "search_url {:?} has no {} placeholder",
                    self.search_url,
                    KEYWORD_PLACEHOLDER
                )),
            ));
        }
        if self.all_selectors().iter().any(|css| css.is_empty()) {
            return Err(ScoutError::profile(
                &self.name,
                "validate",
                Some(anyhow::anyhow!("empty selector in profile")),
            ));
        }
        precompile_selectors(self.all_selectors()).map_err(|e| {
            ScoutError::profile(&self.name, "validate", Some(anyhow::Error::new(e)))
        })
    }
}
