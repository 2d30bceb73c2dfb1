// ABOUTME: Static HTML page backend built on scraper, with node ids as element handles.
// ABOUTME: Loads snapshots from strings, files, or a blocking HTTP fetch; resolves href like a browser.

use std::fs;
use std::path::Path;
use std::time::Duration;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::debug;
use url::Url;

use crate::error::{Result, ScoutError};
use crate::page::compiled::get_or_compile;
use crate::page::{Page, WaitCondition};

/// Default timeout for HTTP fetches made by [`HtmlPage::navigate`].
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent for HTTP fetches.
pub const DEFAULT_USER_AGENT: &str = "notescout/0.1";

/// Collapses runs of whitespace into single spaces and trims.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A parsed HTML document that never changes after load.
///
/// Scrolling is a no-op and waits are evaluated once, since nothing renders
/// after the snapshot is taken.
pub struct HtmlPage {
    document: Html,
    base_url: Option<Url>,
    client: Option<reqwest::blocking::Client>,
    timeout: Duration,
}

impl HtmlPage {
    /// An empty page; call [`Page::navigate`] to load something.
    pub fn new() -> Self {
        Self {
            document: Html::new_document(),
            base_url: None,
            client: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Parses `html` as the current document. `base_url` is used to resolve `href`.
    pub fn from_html(html: &str, base_url: Option<&str>) -> Self {
        let mut page = Self::new();
        page.load(html, base_url.and_then(|u| Url::parse(u).ok()));
        page
    }

    /// Reads and parses a snapshot file.
    pub fn from_file(path: &Path, base_url: Option<&str>) -> Result<Self> {
        let html = read_snapshot(path)?;
        Ok(Self::from_html(&html, base_url))
    }

    /// Sets the timeout used for HTTP fetches.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = None;
        self
    }

    /// Base URL of the current document, if known.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn load(&mut self, html: &str, base_url: Option<Url>) {
        self.document = Html::parse_document(html);
        self.base_url = base_url;
    }

    fn client(&mut self) -> Result<&reqwest::blocking::Client> {
        if self.client.is_none() {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(DEFAULT_USER_AGENT)
                .build()
                .map_err(|e| {
                    ScoutError::navigate("", "build http client", Some(anyhow::Error::new(e)))
                })?;
            self.client = Some(client);
        }
        match self.client.as_ref() {
            Some(client) => Ok(client),
            None => Err(ScoutError::navigate("", "build http client", None)),
        }
    }

    fn fetch(&mut self, url: &Url) -> Result<String> {
        let client = self.client()?;
        let response = client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScoutError::navigate(url.as_str(), "fetch", Some(anyhow::Error::new(e))))?;
        response
            .text()
            .map_err(|e| ScoutError::navigate(url.as_str(), "read body", Some(anyhow::Error::new(e))))
    }

    fn element(&self, id: &NodeId) -> Result<ElementRef<'_>> {
        self.document
            .tree
            .get(*id)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| ScoutError::element(format!("{:?}", id), "resolve handle", None))
    }

    fn resolve_href(&self, raw: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(raw)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| raw.to_string()),
            None => raw.to_string(),
        }
    }
}

impl Default for HtmlPage {
    fn default() -> Self {
        Self::new()
    }
}

fn read_snapshot(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ScoutError::input(path.display().to_string(), "read snapshot", Some(anyhow::Error::new(e)))
    })
}

impl Page for HtmlPage {
    type Handle = NodeId;

    /// `http(s)://` URLs are fetched, `file://` URLs and bare paths are read from disk.
    fn navigate(&mut self, url: &str) -> Result<()> {
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {
                debug!(url = %url, "fetching page");
                let html = self.fetch(&parsed)?;
                self.load(&html, Some(parsed));
            }
            Ok(parsed) if parsed.scheme() == "file" => {
                let path = parsed.to_file_path().map_err(|_| {
                    ScoutError::navigate(url, "file url to path", None)
                })?;
                let html = read_snapshot(&path)?;
                self.load(&html, Some(parsed));
            }
            _ => {
                let path = Path::new(url);
                let html = read_snapshot(path)?;
                let base = fs::canonicalize(path)
                    .ok()
                    .and_then(|p| Url::from_file_path(p).ok());
                self.load(&html, base);
            }
        }
        Ok(())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let sel = get_or_compile(selector)?;
        Ok(self.document.select(&sel).map(|el| el.id()).collect())
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let sel = get_or_compile(selector)?;
        let scope = self.element(scope)?;
        Ok(scope.select(&sel).map(|el| el.id()).collect())
    }

    fn query_one(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>> {
        let sel = get_or_compile(selector)?;
        let scope = self.element(scope)?;
        Ok(scope.select(&sel).next().map(|el| el.id()))
    }

    fn text(&self, handle: &NodeId) -> Result<String> {
        let el = self.element(handle)?;
        Ok(normalize_whitespace(&el.text().collect::<String>()))
    }

    fn attribute(&self, handle: &NodeId, name: &str) -> Result<Option<String>> {
        let el = self.element(handle)?;
        Ok(el.value().attr(name).map(|raw| {
            let raw = raw.trim();
            if name == "href" {
                self.resolve_href(raw)
            } else {
                raw.to_string()
            }
        }))
    }

    fn wait_for(&self, condition: &WaitCondition, _timeout: Duration) -> bool {
        self.condition_holds(condition)
    }
}
