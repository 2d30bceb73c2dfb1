// ABOUTME: Listing extractor: discovers item elements on a page and builds one record per item.
// ABOUTME: Fields are read independently through profile fallback chains; untitled items are dropped.

//! Listing extraction.
//!
//! [`discover_items`] picks the candidate items with the first item selector
//! that matches anything. [`extract`] walks at most `limit` of them in page
//! order and keeps every item that yields a real title.
//!
//! A field that cannot be read takes its default. Only a failure to read the
//! item handle itself skips the item, and nothing here aborts the pass.

use tracing::{debug, warn};

use crate::counts::parse_count;
use crate::error::Result;
use crate::extractors::profile::{ListingProfile, SelectorSpec};
use crate::extractors::select::{chain_values, first_matching_all, first_text};
use crate::page::Page;
use crate::record::{
    placeholder_title, positional_id, ExtractedRecord, MAX_TAGS, NONE, TITLE_FALLBACK_CHARS,
    UNKNOWN,
};

/// Items found by the first item selector that matched.
#[derive(Debug, Clone)]
pub struct Discovery<H> {
    pub selector: String,
    pub items: Vec<H>,
}

/// Outcome of discovery plus extraction over one page.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// `None` when no item selector matched (page structure not recognized).
    pub item_selector: Option<String>,
    pub candidates: usize,
    pub records: Vec<ExtractedRecord>,
}

/// Tries `selectors` in order and returns the full match set of the first one
/// with at least one match.
pub fn discover_items<P: Page>(page: &P, selectors: &[String]) -> Option<Discovery<P::Handle>> {
    for selector in selectors {
        match page.query_all(selector) {
            Ok(items) if !items.is_empty() => {
                return Some(Discovery {
                    selector: selector.clone(),
                    items,
                });
            }
            Ok(_) => {}
            Err(e) => debug!(selector = %selector, error = %e, "item selector failed"),
        }
    }
    None
}

/// Builds records for at most `limit` of `items`, preserving page order.
pub fn extract<P: Page>(
    page: &P,
    items: &[P::Handle],
    limit: usize,
    profile: &ListingProfile,
) -> Vec<ExtractedRecord> {
    let mut records = Vec::new();
    for (position, item) in items.iter().take(limit).enumerate() {
        match build_record(page, item, position, profile) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => debug!(position = position + 1, "item has no title, skipped"),
            Err(e) => warn!(position = position + 1, error = %e, "failed to extract item, skipped"),
        }
    }
    records
}

/// Discovery followed by extraction. An unrecognized page yields an empty listing.
pub fn extract_listing<P: Page>(page: &P, profile: &ListingProfile, limit: usize) -> Listing {
    let Some(discovery) = discover_items(page, &profile.item_selectors) else {
        return Listing::default();
    };
    let records = extract(page, &discovery.items, limit, profile);
    Listing {
        item_selector: Some(discovery.selector),
        candidates: discovery.items.len(),
        records,
    }
}

fn build_record<P: Page>(
    page: &P,
    item: &P::Handle,
    position: usize,
    profile: &ListingProfile,
) -> Result<Option<ExtractedRecord>> {
    let permalink = permalink_of(page, item);
    let id = note_id(&permalink, &profile.permalink_markers, position);

    let title = match first_text(page, item, &profile.title) {
        Some(title) => title,
        None => page
            .text(item)?
            .trim()
            .chars()
            .take(TITLE_FALLBACK_CHARS)
            .collect(),
    };

    let author = first_text(page, item, &profile.author).unwrap_or_else(|| UNKNOWN.to_string());
    let likes = first_positive_count(page, item, &profile.likes);
    let comments = first_positive_count(page, item, &profile.comments);
    let publish_date =
        first_text(page, item, &profile.publish_date).unwrap_or_else(|| UNKNOWN.to_string());
    let tags = first_matching_all(page, item, &profile.tags, MAX_TAGS);

    if title.is_empty() || title == placeholder_title(position) {
        return Ok(None);
    }

    Ok(Some(ExtractedRecord {
        id,
        title,
        author,
        publish_date,
        likes,
        comments,
        tags,
        permalink: if permalink.is_empty() {
            NONE.to_string()
        } else {
            permalink
        },
    }))
}

/// The item's own `href`, else the first descendant anchor's, else empty.
fn permalink_of<P: Page>(page: &P, item: &P::Handle) -> String {
    let own = page.attribute(item, "href").ok().flatten();
    let link = match own.filter(|href| !href.is_empty()) {
        Some(href) => Some(href),
        None => page
            .query_one(item, "a")
            .ok()
            .flatten()
            .and_then(|a| page.attribute(&a, "href").ok().flatten()),
    };
    link.unwrap_or_default()
}

/// Id for a note: the last path segment of a recognized permalink, else positional.
pub fn note_id(permalink: &str, markers: &[String], position: usize) -> String {
    let recognized =
        !permalink.is_empty() && markers.iter().any(|m| permalink.contains(m.as_str()));
    if !recognized {
        return positional_id(position);
    }
    let last = permalink.rsplit('/').next().unwrap_or_default();
    last.split('?').next().unwrap_or_default().to_string()
}

fn first_positive_count<P: Page>(
    page: &P,
    item: &P::Handle,
    chain: &[SelectorSpec],
) -> u64 {
    chain_values(page, item, chain)
        .map(|text| parse_count(&text))
        .find(|&count| count > 0)
        .unwrap_or(0)
}
