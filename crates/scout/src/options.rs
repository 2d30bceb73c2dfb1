// ABOUTME: Crawl configuration: item limits, scroll passes, waits, and pacing delays.
// ABOUTME: CrawlOptionsBuilder provides a fluent API mirroring the CLI flags.

use std::time::Duration;

/// Inclusive range a randomized pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseRange {
    pub min: Duration,
    pub max: Duration,
}

impl PauseRange {
    pub const ZERO: PauseRange = PauseRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// A fixed pause.
    pub fn fixed(d: Duration) -> Self {
        Self { min: d, max: d }
    }

    /// Draws a uniformly distributed duration from the range.
    pub fn sample(&self) -> Duration {
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        if hi <= lo {
            return self.min;
        }
        Duration::from_millis(fastrand::u64(lo..=hi))
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }
}

/// Configuration options for a crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Maximum number of listing items processed per keyword
    pub max_posts: usize,
    /// Number of scroll-to-bottom passes after the search page loads
    pub scroll_times: usize,
    /// Pause after each scroll pass
    pub scroll_pause: PauseRange,
    /// Pause after navigation, before the first scroll
    pub settle_delay: Duration,
    /// Bound on waiting for the listing to render
    pub wait_timeout: Duration,
    /// Pause between consecutive keywords
    pub keyword_pause: PauseRange,
    /// When false, the current document is extracted as-is for every keyword
    pub navigate: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_posts: 100,
            scroll_times: 15,
            scroll_pause: PauseRange::new(Duration::from_secs(2), Duration::from_secs(3)),
            settle_delay: Duration::from_secs(3),
            wait_timeout: Duration::from_secs(10),
            keyword_pause: PauseRange::new(Duration::from_secs(2), Duration::from_secs(4)),
            navigate: true,
        }
    }
}

impl CrawlOptions {
    pub fn builder() -> CrawlOptionsBuilder {
        CrawlOptionsBuilder::new()
    }
}

/// Builder for constructing CrawlOptions.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptionsBuilder {
    opts: CrawlOptions,
}

impl CrawlOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-keyword item limit.
    pub fn max_posts(mut self, max_posts: usize) -> Self {
        self.opts.max_posts = max_posts;
        self
    }

    /// Set the number of scroll passes.
    pub fn scroll_times(mut self, scroll_times: usize) -> Self {
        self.opts.scroll_times = scroll_times;
        self
    }

    /// Set the pause after each scroll pass.
    pub fn scroll_pause(mut self, pause: PauseRange) -> Self {
        self.opts.scroll_pause = pause;
        self
    }

    /// Set the pause after navigation.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.opts.settle_delay = delay;
        self
    }

    /// Set the listing wait timeout.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.opts.wait_timeout = timeout;
        self
    }

    /// Set the pause between keywords.
    pub fn keyword_pause(mut self, pause: PauseRange) -> Self {
        self.opts.keyword_pause = pause;
        self
    }

    /// Enable or disable navigation to the search page for each keyword.
    pub fn navigate(mut self, navigate: bool) -> Self {
        self.opts.navigate = navigate;
        self
    }

    /// Remove every sleep: settle, scroll and keyword pauses.
    pub fn no_delay(mut self) -> Self {
        self.opts.scroll_pause = PauseRange::ZERO;
        self.opts.settle_delay = Duration::ZERO;
        self.opts.keyword_pause = PauseRange::ZERO;
        self
    }

    /// Build the options.
    pub fn build(self) -> CrawlOptions {
        self.opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_crawler_constants() {
        let opts = CrawlOptions::default();
        assert_eq!(opts.max_posts, 100);
        assert_eq!(opts.scroll_times, 15);
        assert_eq!(opts.wait_timeout, Duration::from_secs(10));
        assert!(opts.navigate);
    }

    #[test]
    fn builder_no_delay_zeroes_pauses() {
        let opts = CrawlOptions::builder().max_posts(5).no_delay().build();
        assert_eq!(opts.max_posts, 5);
        assert!(opts.scroll_pause.is_zero());
        assert!(opts.keyword_pause.is_zero());
        assert_eq!(opts.settle_delay, Duration::ZERO);
    }

    #[test]
    fn pause_range_samples_within_bounds() {
        let range = PauseRange::new(Duration::from_millis(30), Duration::from_millis(10));
        assert_eq!(range.min, Duration::from_millis(10));
        for _ in 0..50 {
            let d = range.sample();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(30));
        }
        assert_eq!(PauseRange::fixed(Duration::from_millis(7)).sample(), Duration::from_millis(7));
    }
}
