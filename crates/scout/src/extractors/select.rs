// ABOUTME: Ordered evaluation of selector chains against one item handle.
// ABOUTME: First usable value wins; lookup failures are logged and treated as misses.

//! Selector-chain evaluation.
//!
//! Key behaviors:
//! - Specs are tried in order; a spec that errors or matches nothing is skipped.
//! - `Css` reads the first match's text, `CssAttr` reads an attribute from it.
//! - Values are trimmed; empty values count as misses.

use tracing::debug;

use crate::error::Result;
use crate::extractors::profile::{parse_selector, SelectorSpec};
use crate::page::Page;

/// Reads one value from the first descendant of `scope` matching `spec`.
pub fn lookup_value<P: Page>(page: &P, scope: &P::Handle, spec: &SelectorSpec) -> Result<Option<String>> {
    let (css, attr) = parse_selector(spec);
    let Some(found) = page.query_one(scope, css)? else {
        return Ok(None);
    };
    read_value(page, &found, attr)
}

fn read_value<P: Page>(page: &P, handle: &P::Handle, attr: Option<&str>) -> Result<Option<String>> {
    let value = match attr {
        Some(name) => page.attribute(handle, name)?.unwrap_or_default(),
        None => page.text(handle)?,
    };
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Non-empty values produced by each spec of `chain`, in chain order.
///
/// Lazy: later specs are only queried when the caller keeps iterating.
pub fn chain_values<'a, P: Page>(
    page: &'a P,
    scope: &'a P::Handle,
    chain: &'a [SelectorSpec],
) -> impl Iterator<Item = String> + 'a {
    chain.iter().filter_map(move |spec| match lookup_value(page, scope, spec) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "selector lookup failed");
            None
        }
    })
}

/// First non-empty value in `chain`.
pub fn first_text<P: Page>(page: &P, scope: &P::Handle, chain: &[SelectorSpec]) -> Option<String> {
    chain_values(page, scope, chain).next()
}

/// Values of up to `cap` matches of the first spec in `chain` that matches anything.
///
/// Empty values are dropped before the cap applies. A spec that matches only
/// empty elements still ends the search.
pub fn first_matching_all<P: Page>(
    page: &P,
    scope: &P::Handle,
    chain: &[SelectorSpec],
    cap: usize,
) -> Vec<String> {
    for spec in chain {
        let (css, attr) = parse_selector(spec);
        let matches = match page.query_within(scope, css) {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "selector lookup failed");
                continue;
            }
        };
        if matches.is_empty() {
            continue;
        }
        return matches
            .iter()
            .filter_map(|h| read_value(page, h, attr).ok().flatten())
            .take(cap)
            .collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HtmlPage;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"
        <html><body>
          <section class="note-item">
            <div class="empty"></div>
            <h3 class="title">  Main   Title </h3>
            <time datetime="2024-05-01">5 days ago</time>
            <span class="tag">a</span>
            <span class="tag"></span>
            <span class="tag">b</span>
            <span class="label"></span>
          </section>
        </body></html>
    "#;

    fn page_and_item() -> (HtmlPage, ego_tree::NodeId) {
        let page = HtmlPage::from_html(SAMPLE_HTML, None);
        let item = page.query_all("section.note-item").unwrap()[0];
        (page, item)
    }

    fn css(s: &str) -> SelectorSpec {
        SelectorSpec::Css(s.to_string())
    }

    #[test]
    fn first_text_skips_missing_and_empty() {
        let (page, item) = page_and_item();
        let chain = vec![css(".nope"), css("div.empty"), css(".title")];
        assert_eq!(first_text(&page, &item, &chain).as_deref(), Some("Main Title"));
    }

    #[test]
    fn first_text_reads_attributes() {
        let (page, item) = page_and_item();
        let chain = vec![SelectorSpec::CssAttr(vec!["time".into(), "datetime".into()])];
        assert_eq!(first_text(&page, &item, &chain).as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn first_text_skips_invalid_selectors() {
        let (page, item) = page_and_item();
        let chain = vec![css("[[["), css("time")];
        assert_eq!(first_text(&page, &item, &chain).as_deref(), Some("5 days ago"));
    }

    #[test]
    fn first_text_none_when_chain_exhausted() {
        let (page, item) = page_and_item();
        assert_eq!(first_text(&page, &item, &[css("article")]), None);
        assert_eq!(first_text(&page, &item, &[]), None);
    }

    #[test]
    fn first_matching_all_uses_first_matching_spec() {
        let (page, item) = page_and_item();
        let chain = vec![css(".missing"), css(".tag"), css("time")];
        assert_eq!(first_matching_all(&page, &item, &chain, 5), vec!["a", "b"]);
    }

    #[test]
    fn first_matching_all_respects_cap() {
        let (page, item) = page_and_item();
        assert_eq!(first_matching_all(&page, &item, &[css(".tag")], 1), vec!["a"]);
    }

    #[test]
    fn first_matching_all_stops_at_empty_matches() {
        let (page, item) = page_and_item();
        let chain = vec![css(".label"), css(".tag")];
        assert!(first_matching_all(&page, &item, &chain, 5).is_empty());
    }
}
