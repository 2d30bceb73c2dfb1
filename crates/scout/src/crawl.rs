// ABOUTME: Per-keyword crawl loop: open the search page, settle, scroll, wait, extract.
// ABOUTME: Also checks login state for the manual login gate and paces requests between keywords.

use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Result, ScoutError};
use crate::extractors::listing::extract_listing;
use crate::extractors::profile::ListingProfile;
use crate::options::CrawlOptions;
use crate::page::{Page, WaitCondition};
use crate::record::KeywordOutcome;

/// What the login check found on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    /// A logged-in marker matched; holds the selector.
    Detected(String),
    /// Only the logged-out marker matched.
    LoggedOut,
    /// Neither kind of marker matched.
    Unknown,
}

/// Drives one page through a sequence of keyword searches.
pub struct Crawler<P: Page> {
    page: P,
    profile: ListingProfile,
    options: CrawlOptions,
}

fn pause(d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}

impl<P: Page> Crawler<P> {
    pub fn new(page: P, profile: ListingProfile, options: CrawlOptions) -> Self {
        Self {
            page,
            profile,
            options,
        }
    }

    /// Gives the page back, e.g. to close a browser session.
    pub fn into_page(self) -> P {
        self.page
    }

    /// Opens the profile's landing page.
    pub fn open_home(&mut self) -> Result<()> {
        if self.profile.home_url.is_empty() {
            return Err(ScoutError::profile(
                &self.profile.name,
                "open home",
                Some(anyhow::anyhow!("profile has no home_url")),
            ));
        }
        let url = self.profile.home_url.clone();
        self.page.navigate(&url)
    }

    /// Looks for logged-in markers, then the logged-out marker, on the current page.
    pub fn check_login(&self) -> LoginState {
        let present = |sel: &str| {
            self.page
                .query_all(sel)
                .map(|found| !found.is_empty())
                .unwrap_or(false)
        };

        if let Some(sel) = self.profile.login_selectors.iter().find(|s| present(s.as_str())) {
            info!(selector = %sel, "login marker detected");
            return LoginState::Detected(sel.clone());
        }
        match self.profile.logged_out_selector.as_deref() {
            Some(sel) if present(sel) => {
                warn!(selector = %sel, "logged-out marker detected, continuing anyway");
                LoginState::LoggedOut
            }
            _ => {
                info!("no login marker found, continuing");
                LoginState::Unknown
            }
        }
    }

    /// Searches for `keyword` and extracts the rendered listing.
    ///
    /// A listing that never renders, or that no item selector recognizes,
    /// produces an empty outcome rather than an error. Navigation failures are
    /// returned to the caller.
    pub fn crawl_keyword(&mut self, keyword: &str) -> Result<KeywordOutcome> {
        info!(keyword = %keyword, "crawling keyword");

        if self.options.navigate {
            let url = self.profile.search_url_for(keyword);
            self.page.navigate(&url)?;
            pause(self.options.settle_delay);
            self.scroll();
        }

        let selectors = if self.profile.wait_selectors.is_empty() {
            self.profile.item_selectors.clone()
        } else {
            self.profile.wait_selectors.clone()
        };
        let condition = WaitCondition::AnyPresent(selectors);
        if !self.page.wait_for(&condition, self.options.wait_timeout) {
            warn!(keyword = %keyword, "note list did not appear, page structure may have changed");
            return Ok(KeywordOutcome::empty(keyword));
        }

        let listing = extract_listing(&self.page, &self.profile, self.options.max_posts);
        match &listing.item_selector {
            Some(selector) => info!(
                keyword = %keyword,
                selector = %selector,
                candidates = listing.candidates,
                "matched listing items"
            ),
            None => warn!(keyword = %keyword, "no item selector matched"),
        }
        info!(keyword = %keyword, records = listing.records.len(), "extracted notes");

        Ok(KeywordOutcome {
            keyword: keyword.to_string(),
            item_selector: listing.item_selector,
            candidates: listing.candidates,
            crawled_at: Utc::now(),
            records: listing.records,
        })
    }

    fn scroll(&mut self) {
        let total = self.options.scroll_times;
        if total > 0 && !self.page.can_scroll() {
            debug!("page cannot scroll, skipping scroll passes");
            return;
        }
        for pass in 1..=total {
            if let Err(e) = self.page.scroll_to_bottom() {
                warn!(error = %e, "scroll failed, extracting what has loaded");
                return;
            }
            pause(self.options.scroll_pause.sample());
            debug!(pass = pass, total = total, "scrolled");
        }
    }

    /// Crawls every keyword in order, pausing between them.
    ///
    /// Returns one outcome per keyword; failed keywords yield empty outcomes.
    pub fn run(&mut self, keywords: &[String]) -> Vec<KeywordOutcome> {
        let mut outcomes = Vec::with_capacity(keywords.len());
        for (i, keyword) in keywords.iter().enumerate() {
            if i > 0 {
                pause(self.options.keyword_pause.sample());
            }
            match self.crawl_keyword(keyword) {
                Ok(outcome) => {
                    if outcome.is_empty() {
                        warn!(keyword = %keyword, "no notes for keyword");
                    }
                    outcomes.push(outcome);
                }
                Err(e) => {
                    warn!(keyword = %keyword, error = %e, "keyword failed, skipping");
                    outcomes.push(KeywordOutcome::empty(keyword.as_str()));
                }
            }
        }
        outcomes
    }
}
