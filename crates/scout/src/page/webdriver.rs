// ABOUTME: Live browser backend speaking the WebDriver protocol through thirtyfour.
// ABOUTME: Owns a current-thread tokio runtime so the synchronous Page calls block on each request.

use std::future::Future;

use thirtyfour::error::WebDriverError;
use thirtyfour::{By, DesiredCapabilities, WebDriver, WebElement};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use crate::error::{Result, ScoutError};
use crate::page::Page;

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// A Chrome session driven through a WebDriver server such as chromedriver.
pub struct WebDriverPage {
    runtime: Runtime,
    driver: WebDriver,
}

fn browser_error(target: &str, op: &str, e: WebDriverError) -> ScoutError {
    ScoutError::browser(target, op, Some(anyhow::anyhow!(e.to_string())))
}

impl WebDriverPage {
    /// Starts a browser session on the WebDriver server at `server_url`.
    pub fn connect(server_url: &str) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ScoutError::browser(server_url, "start runtime", Some(anyhow::Error::new(e)))
            })?;
        let caps = DesiredCapabilities::chrome();
        let driver = runtime
            .block_on(WebDriver::new(server_url, caps))
            .map_err(|e| browser_error(server_url, "connect", e))?;
        info!(server = %server_url, "browser session started");
        Ok(Self { runtime, driver })
    }

    /// Ends the browser session.
    pub fn quit(self) -> Result<()> {
        let Self { runtime, driver } = self;
        runtime
            .block_on(driver.quit())
            .map_err(|e| browser_error("session", "quit", e))
    }

    fn block<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}

impl Page for WebDriverPage {
    type Handle = WebElement;

    fn navigate(&mut self, url: &str) -> Result<()> {
        debug!(url = %url, "navigating");
        self.block(self.driver.goto(url))
            .map_err(|e| ScoutError::navigate(url, "goto", Some(anyhow::anyhow!(e.to_string()))))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<WebElement>> {
        self.block(self.driver.find_all(By::Css(selector)))
            .map_err(|e| browser_error(selector, "find", e))
    }

    fn query_within(&self, scope: &WebElement, selector: &str) -> Result<Vec<WebElement>> {
        self.block(scope.find_all(By::Css(selector)))
            .map_err(|e| ScoutError::element(selector, "find within", Some(anyhow::anyhow!(e.to_string()))))
    }

    fn query_one(&self, scope: &WebElement, selector: &str) -> Result<Option<WebElement>> {
        Ok(self.query_within(scope, selector)?.into_iter().next())
    }

    fn text(&self, handle: &WebElement) -> Result<String> {
        self.block(handle.text())
            .map(|t| t.trim().to_string())
            .map_err(|e| ScoutError::element("element", "text", Some(anyhow::anyhow!(e.to_string()))))
    }

    fn attribute(&self, handle: &WebElement, name: &str) -> Result<Option<String>> {
        // Properties carry resolved values, e.g. absolute hrefs.
        let prop = self
            .block(handle.prop(name))
            .map_err(|e| ScoutError::element(name, "property", Some(anyhow::anyhow!(e.to_string()))))?;
        if prop.is_some() {
            return Ok(prop);
        }
        self.block(handle.attr(name))
            .map_err(|e| ScoutError::element(name, "attribute", Some(anyhow::anyhow!(e.to_string()))))
    }

    fn can_scroll(&self) -> bool {
        true
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        self.block(self.driver.execute(SCROLL_SCRIPT, Vec::new()))
            .map(|_| ())
            .map_err(|e| browser_error("window", "scroll", e))
    }
}
