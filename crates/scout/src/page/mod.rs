// ABOUTME: Browser capability interface used by the crawler and the listing extractor.
// ABOUTME: Backends: a static HTML snapshot page and, behind the `webdriver` feature, a live browser.

//! Page abstraction.
//!
//! Extraction code only talks to a [`Page`]: navigate, wait, query, read text
//! and attributes. Handles are opaque to callers and are only valid until the
//! next navigation.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::Result;

pub mod compiled;
pub mod html;
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use html::HtmlPage;
#[cfg(feature = "webdriver")]
pub use webdriver::WebDriverPage;

/// Interval between condition checks in the default [`Page::wait_for`].
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A condition a page can be waited on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// At least one element matches any of the selectors.
    AnyPresent(Vec<String>),
}

/// A rendered page that can be navigated and queried.
pub trait Page {
    /// Opaque reference to one element on the current page.
    type Handle: Clone;

    /// Loads `url`, replacing the current document.
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// All elements in the document matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Handle>>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_within(&self, scope: &Self::Handle, selector: &str) -> Result<Vec<Self::Handle>>;

    /// First descendant of `scope` matching `selector`.
    fn query_one(&self, scope: &Self::Handle, selector: &str) -> Result<Option<Self::Handle>>;

    /// Text content of `handle`, whitespace-trimmed.
    fn text(&self, handle: &Self::Handle) -> Result<String>;

    /// Value of attribute `name` on `handle`.
    fn attribute(&self, handle: &Self::Handle, name: &str) -> Result<Option<String>>;

    /// Whether [`Page::scroll_to_bottom`] can load more content.
    fn can_scroll(&self) -> bool {
        false
    }

    /// Scrolls to the bottom of the page so lazily loaded items render.
    fn scroll_to_bottom(&mut self) -> Result<()> {
        Ok(())
    }

    /// Blocks until `condition` holds or `timeout` elapses; returns whether it held.
    ///
    /// Query errors count as "not yet".
    fn wait_for(&self, condition: &WaitCondition, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.condition_holds(condition) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep(WAIT_POLL_INTERVAL.min(deadline - now));
        }
    }

    /// Evaluates `condition` once against the current document.
    fn condition_holds(&self, condition: &WaitCondition) -> bool {
        match condition {
            WaitCondition::AnyPresent(selectors) => selectors.iter().any(|sel| {
                self.query_all(sel)
                    .map(|found| !found.is_empty())
                    .unwrap_or(false)
            }),
        }
    }
}
