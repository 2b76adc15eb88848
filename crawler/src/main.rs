use anyhow::Result;
use clap::Parser;
use crawler::{crawl, CrawlConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Download numbered pages listed in a links file, respecting robots.txt")]
struct Cli {
    /// File with one URL per line, optionally prefixed with its number
    #[arg(long, default_value = "links.txt")]
    links: PathBuf,
    /// Directory for page_N.html files
    #[arg(long, default_value = "./web_pages")]
    output: PathBuf,
    /// Listing of fetched pages, `N<TAB>url` per line
    #[arg(long, default_value = "./index.txt")]
    index_file: PathBuf,
    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
    /// Request timeout seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
    /// User-Agent string to use for robots.txt and crawling
    #[arg(long, default_value = "boolsearch-bot/0.1")]
    user_agent: String,
    /// Fetch pages even when robots.txt disallows them
    #[arg(long, default_value_t = false)]
    ignore_robots: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();
    let config = CrawlConfig {
        links: args.links,
        output_dir: args.output,
        index_file: args.index_file,
        delay: Duration::from_millis(args.delay_ms),
        timeout: Duration::from_secs(args.timeout_secs),
        user_agent: args.user_agent,
        respect_robots: !args.ignore_robots,
    };
    crawl(&config).await?;
    Ok(())
}
