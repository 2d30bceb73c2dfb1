// ABOUTME: Main library entry point for the notescout listing extractor.
// ABOUTME: Re-exports the public API: Crawler, Page backends, ListingProfile, records, and output writers.

//! Notescout - keyword search listing extraction for note-sharing platforms.
//!
//! A [`Crawler`] drives a [`Page`] through one search per keyword, locates
//! listing items with the first matching selector of a [`ListingProfile`],
//! and builds an [`ExtractedRecord`] per item. Results are written as one
//! spreadsheet sheet per keyword.
//!
//! # Example
//!
//! ```no_run
//! use notescout::{load_builtin_profile, write_workbook, CrawlOptions, Crawler, HtmlPage};
//! use std::path::Path;
//!
//! fn main() -> notescout::Result<()> {
//!     let page = HtmlPage::new();
//!     let mut crawler = Crawler::new(page, load_builtin_profile()?, CrawlOptions::default());
//!     let outcomes = crawler.run(&["口红".to_string()]);
//!     write_workbook(Path::new("xiaohongshu_data.xlsx"), &outcomes)?;
//!     Ok(())
//! }
//! ```

pub mod counts;
pub mod crawl;
pub mod error;
pub mod extractors;
pub mod keywords;
pub mod options;
pub mod page;
pub mod record;
pub mod workbook;

pub use crate::counts::parse_count;
pub use crate::crawl::{Crawler, LoginState};
pub use crate::error::{ErrorCode, Result, ScoutError};
pub use crate::extractors::listing::{discover_items, extract, extract_listing, Listing};
pub use crate::extractors::loader::{load_builtin_profile, load_profile_file};
pub use crate::extractors::profile::{ListingProfile, SelectorSpec};
pub use crate::keywords::{load_keywords, parse_keywords};
pub use crate::options::{CrawlOptions, CrawlOptionsBuilder, PauseRange};
pub use crate::page::{HtmlPage, Page, WaitCondition};
#[cfg(feature = "webdriver")]
pub use crate::page::WebDriverPage;
pub use crate::record::{ExtractedRecord, KeywordOutcome};
pub use crate::workbook::{to_json, write_json, write_workbook};
