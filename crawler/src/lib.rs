//! Downloads a numbered list of pages for the indexer.
//!
//! Every link gets the number of its position in the links file. A fetched
//! page is stored as `page_N.html` and listed as `N<TAB>url` in the index
//! file. Failed or disallowed links keep their number and leave a gap.

use anyhow::{bail, Context, Result};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

pub struct CrawlConfig {
    /// One link per line, optionally prefixed with its number.
    pub links: PathBuf,
    pub output_dir: PathBuf,
    pub index_file: PathBuf,
    /// Pause between consecutive requests.
    pub delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub respect_robots: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    pub fetched: usize,
    pub failed: usize,
    pub disallowed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Robots {
    allows: Vec<String>,
    disallows: Vec<String>,
    crawl_delay_ms: Option<u64>,
}

/// Links in file order. A leading numeric column (`12 https://...`) is dropped.
pub fn parse_links(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| match l.split_once(char::is_whitespace) {
            Some((num, rest)) if num.chars().all(|c| c.is_ascii_digit()) => rest.trim().to_string(),
            _ => l.to_string(),
        })
        .collect()
}

pub async fn crawl(config: &CrawlConfig) -> Result<CrawlReport> {
    let text = fs::read_to_string(&config.links)
        .with_context(|| format!("reading links from {}", config.links.display()))?;
    let links = parse_links(&text);
    if links.is_empty() {
        bail!("no links in {}", config.links.display());
    }
    fs::create_dir_all(&config.output_dir)?;
    if let Some(dir) = config.index_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(config.timeout)
        .build()?;
    let mut index = BufWriter::new(
        File::create(&config.index_file).with_context(|| format!("creating {}", config.index_file.display()))?,
    );
    let mut robots_cache: HashMap<String, Robots> = HashMap::new();
    let mut report = CrawlReport::default();
    let mut requested = false;

    for (i, link) in links.iter().enumerate() {
        let num = i + 1;
        let url = match Url::parse(link) {
            Ok(u) => u,
            Err(err) => {
                tracing::warn!(num, link = %link, error = %err, "invalid link");
                report.failed += 1;
                continue;
            }
        };

        let mut pause = config.delay;
        if config.respect_robots {
            let rules = robots_for(&client, &mut robots_cache, &url).await;
            if !path_allowed(url.path(), rules) {
                tracing::info!(num, url = %url, "disallowed by robots.txt");
                report.disallowed += 1;
                continue;
            }
            if let Some(ms) = rules.crawl_delay_ms {
                pause = pause.max(Duration::from_millis(ms));
            }
        }
        if requested && !pause.is_zero() {
            sleep(pause).await;
        }
        requested = true;

        match fetch_page(&client, &url).await {
            Ok(body) => {
                let path = config.output_dir.join(format!("page_{num}.html"));
                fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
                writeln!(index, "{num}\t{link}")?;
                report.fetched += 1;
                tracing::info!(num, url = %url, "fetched");
            }
            Err(err) => {
                tracing::warn!(num, url = %url, error = %err, "fetch failed");
                report.failed += 1;
            }
        }
    }
    index.flush()?;

    tracing::info!(
        fetched = report.fetched,
        failed = report.failed,
        disallowed = report.disallowed,
        output = %config.output_dir.display(),
        "crawl complete"
    );
    Ok(report)
}

async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    let resp = client.get(url.clone()).send().await?.error_for_status()?;
    Ok(resp.text().await?)
}

// cached per origin; an unreachable robots.txt allows everything
async fn robots_for<'a>(client: &Client, cache: &'a mut HashMap<String, Robots>, url: &Url) -> &'a Robots {
    let key = url.origin().ascii_serialization();
    if !cache.contains_key(&key) {
        let txt = match url.join("/robots.txt") {
            Ok(robots_url) => match client.get(robots_url).send().await {
                Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_default(),
                _ => String::new(),
            },
            Err(_) => String::new(),
        };
        cache.insert(key.clone(), parse_robots(&txt));
    }
    &cache[&key]
}

/// Rules of the `*` user-agent group.
pub fn parse_robots(txt: &str) -> Robots {
    let mut active = false;
    let mut rules = Robots::default();
    for line in txt.lines() {
        let l = line.trim();
        if l.is_empty() || l.starts_with('#') { continue; }
        if let Some((k, v)) = l.split_once(':') {
            let key = k.trim().to_lowercase();
            let val = v.trim();
            match key.as_str() {
                "user-agent" => active = val == "*",
                "allow" if active => rules.allows.push(val.to_string()),
                "disallow" if active && !val.is_empty() => rules.disallows.push(val.to_string()),
                "crawl-delay" if active => {
                    if let Ok(n) = val.parse::<f64>() { rules.crawl_delay_ms = Some((n * 1000.0) as u64); }
                }
                _ => {}
            }
        }
    }
    rules
}

/// Longest matching rule wins; ties go to Allow.
pub fn path_allowed(path: &str, rules: &Robots) -> bool {
    let longest = |prefixes: &[String]| prefixes.iter().filter(|p| path.starts_with(p.as_str())).map(String::len).max();
    match (longest(&rules.allows), longest(&rules.disallows)) {
        (Some(a), Some(d)) => a >= d,
        (_, None) => true,
        (None, Some(_)) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numbering_column() {
        let links = parse_links("1 https://a.example/x\n\n# comment\nhttps://b.example/y\n3\thttps://c.example\nnot a url\n");
        assert_eq!(links, vec!["https://a.example/x", "https://b.example/y", "https://c.example", "not a url"]);
    }

    #[test]
    fn robots_star_group_only() {
        let rules = parse_robots("User-agent: other\nDisallow: /\n\nUser-agent: *\nDisallow: /private\nAllow: /private/open\nCrawl-delay: 0.5\n");
        assert!(path_allowed("/wiki/page", &rules));
        assert!(!path_allowed("/private/x", &rules));
        assert!(path_allowed("/private/open/y", &rules));
        assert_eq!(rules.crawl_delay_ms, Some(500));
    }

    #[test]
    fn empty_robots_allows_everything() {
        let rules = parse_robots("");
        assert!(path_allowed("/", &rules));
        assert!(path_allowed("/anything", &parse_robots("User-agent: *\nDisallow:\n")));
    }
}
