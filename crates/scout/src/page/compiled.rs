// ABOUTME: Pre-compiled CSS selector cache shared by the static HTML page backend.
// ABOUTME: Each selector string is parsed once; parse failures are cached as errors too.

//! Selector caching for repeated DOM queries.
//!
//! The same dozen-or-so profile selectors are evaluated against every listing
//! item, so they are compiled once and cloned out of a process-wide cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use scraper::Selector;

use crate::error::{Result, ScoutError};

/// Compiled selectors keyed by their source text; `Err` holds the parse message.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, std::result::Result<Selector, String>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn compile(css: &str) -> std::result::Result<Selector, String> {
    Selector::parse(css).map_err(|e| e.to_string())
}

fn into_result(css: &str, entry: &std::result::Result<Selector, String>) -> Result<Selector> {
    entry.clone().map_err(|msg| {
        ScoutError::selector(css, "compile", Some(anyhow::anyhow!(msg)))
    })
}

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns a `Selector` error if `css` does not parse.
pub fn get_or_compile(css: &str) -> Result<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(css) {
            return into_result(css, cached);
        }
    }

    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    let entry = cache
        .entry(css.to_string())
        .or_insert_with(|| compile(css));
    into_result(css, entry)
}

/// Compiles every selector in `selectors`, failing on the first invalid one.
pub fn precompile_selectors<I, S>(selectors: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for css in selectors {
        get_or_compile(css.as_ref())?;
    }
    Ok(())
}
