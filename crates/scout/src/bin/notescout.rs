// ABOUTME: CLI binary for the notescout listing extractor.
// ABOUTME: Crawls keyword searches from a live browser, plain fetches, or a saved snapshot, then writes xlsx or JSON.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use notescout::{
    load_builtin_profile, load_keywords, load_profile_file, to_json, write_json, write_workbook,
    CrawlOptions, Crawler, HtmlPage, KeywordOutcome, ListingProfile, Page,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "xiaohongshu_data.xlsx";

#[derive(Parser, Debug)]
#[command(name = "notescout")]
#[command(about = "Extract note listings for keyword searches into a spreadsheet")]
struct Args {
    /// Keyword list file, one keyword per line
    #[arg(long = "keywords", default_value = "keywords.txt")]
    keywords: PathBuf,

    /// Keyword to crawl (repeatable); replaces the keyword file
    #[arg(long = "keyword")]
    keyword: Vec<String>,

    /// Saved search page to extract from instead of navigating
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Base URL for resolving links in the --html snapshot
    #[arg(long = "url")]
    url: Option<String>,

    /// WebDriver server URL (e.g. http://localhost:9515) for a live browser session
    #[cfg(feature = "webdriver")]
    #[arg(long = "webdriver")]
    webdriver: Option<String>,

    /// Selector profile JSON overriding the builtin one
    #[arg(long = "profile")]
    profile: Option<PathBuf>,

    /// Maximum listing items processed per keyword
    #[arg(long = "max-posts", default_value_t = 100)]
    max_posts: usize,

    /// Scroll passes after each search page loads
    #[arg(long = "scroll-times", default_value_t = 15)]
    scroll_times: usize,

    /// Seconds to wait for the listing to render
    #[arg(long = "wait-timeout-secs", default_value_t = 10)]
    wait_timeout_secs: u64,

    /// Seconds before a plain HTTP fetch of a search page gives up
    #[arg(long = "fetch-timeout-secs", default_value_t = 30)]
    fetch_timeout_secs: u64,

    /// Output file path (default: xiaohongshu_data.xlsx, or stdout with --json)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Write JSON instead of a workbook
    #[arg(long = "json")]
    json_output: bool,

    /// Disable settle, scroll and between-keyword pauses
    #[arg(long = "no-delay")]
    no_delay: bool,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notescout=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn crawl_options(args: &Args, navigate: bool) -> CrawlOptions {
    let builder = CrawlOptions::builder()
        .max_posts(args.max_posts)
        .scroll_times(args.scroll_times)
        .wait_timeout(Duration::from_secs(args.wait_timeout_secs))
        .navigate(navigate);
    if args.no_delay {
        builder.no_delay().build()
    } else {
        builder.build()
    }
}

fn resolve_keywords(args: &Args) -> anyhow::Result<Vec<String>> {
    let keywords: Vec<String> = if args.keyword.is_empty() {
        load_keywords(&args.keywords)?
    } else {
        args.keyword
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    };
    if keywords.is_empty() {
        bail!("no keywords to crawl");
    }
    Ok(keywords)
}

fn resolve_profile(args: &Args) -> anyhow::Result<ListingProfile> {
    let profile = match &args.profile {
        Some(path) => load_profile_file(path)?,
        None => load_builtin_profile()?,
    };
    Ok(profile)
}

#[cfg(feature = "webdriver")]
fn wait_for_operator() -> anyhow::Result<()> {
    use anyhow::Context;
    use std::io::{BufRead, Write};

    eprint!("Log in in the browser window, then press Enter to continue...");
    io::stderr().flush().context("flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read operator confirmation")?;
    Ok(())
}

fn crawl<P: Page>(
    page: P,
    profile: ListingProfile,
    options: CrawlOptions,
    keywords: &[String],
) -> Vec<KeywordOutcome> {
    Crawler::new(page, profile, options).run(keywords)
}

#[cfg(feature = "webdriver")]
fn crawl_live(
    server: &str,
    profile: ListingProfile,
    options: CrawlOptions,
    keywords: &[String],
) -> anyhow::Result<Vec<KeywordOutcome>> {
    let page = notescout::WebDriverPage::connect(server)?;
    let mut crawler = Crawler::new(page, profile, options);
    crawler.open_home()?;
    wait_for_operator()?;
    crawler.check_login();
    let outcomes = crawler.run(keywords);
    if let Err(e) = crawler.into_page().quit() {
        warn!(error = %e, "browser session did not close cleanly");
    }
    Ok(outcomes)
}

fn collect(
    args: &Args,
    keywords: &[String],
    profile: ListingProfile,
) -> anyhow::Result<Vec<KeywordOutcome>> {
    #[cfg(feature = "webdriver")]
    if let Some(server) = &args.webdriver {
        return crawl_live(server, profile, crawl_options(args, true), keywords);
    }

    match &args.html {
        Some(path) => {
            let page = HtmlPage::from_file(path, args.url.as_deref())?;
            info!(file = %path.display(), "extracting from snapshot");
            Ok(crawl(page, profile, crawl_options(args, false), keywords))
        }
        None => {
            if !profile.home_url.is_empty() {
                info!(home = %profile.home_url, "fetch mode, pages are not rendered or logged in");
            }
            let page = HtmlPage::new().with_timeout(Duration::from_secs(args.fetch_timeout_secs));
            Ok(crawl(page, profile, crawl_options(args, true), keywords))
        }
    }
}

fn write_output(args: &Args, outcomes: &[KeywordOutcome]) -> anyhow::Result<()> {
    if outcomes.iter().all(KeywordOutcome::is_empty) {
        warn!("no notes collected, nothing written");
        return Ok(());
    }

    if args.json_output {
        match &args.output {
            Some(path) => {
                write_json(path, outcomes)?;
                info!(path = %path.display(), "JSON written");
            }
            None => println!("{}", to_json(outcomes)?),
        }
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let sheets = write_workbook(&path, outcomes)?;
    info!(path = %path.display(), sheets = sheets, "workbook saved");
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.url.is_some() && args.html.is_none() {
        bail!("--url only applies together with --html");
    }
    let keywords = resolve_keywords(args)?;
    let profile = resolve_profile(args)?;
    info!(keywords = keywords.len(), profile = %profile.name, "starting crawl");

    let outcomes = collect(args, &keywords, profile)?;
    let records: usize = outcomes.iter().map(|o| o.records.len()).sum();
    info!(records = records, "crawl finished");
    write_output(args, &outcomes)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
