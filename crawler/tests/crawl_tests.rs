use axum::{response::Html, routing::get, Router};
use boolsearch_core::persist::load_doc_urls;
use crawler::{crawl, CrawlConfig, CrawlReport};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;
use tokio::net::TcpListener;

async fn serve_site() -> SocketAddr {
    let app = Router::new()
        .route("/robots.txt", get(|| async { "User-agent: *\nDisallow: /private\n" }))
        .route("/caesar", get(|| async { Html("<html><body><p>Цезарь и Клеопатра</p></body></html>") }))
        .route("/pompey", get(|| async { Html("<p>Помпей</p>") }))
        .route("/private/notes", get(|| async { "hidden" }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

fn config(dir: &Path, links: String, respect_robots: bool) -> CrawlConfig {
    let path = dir.join("links.txt");
    fs::write(&path, links).unwrap();
    CrawlConfig {
        links: path,
        output_dir: dir.join("web_pages"),
        index_file: dir.join("index.txt"),
        delay: Duration::ZERO,
        timeout: Duration::from_secs(5),
        user_agent: "boolsearch-test".into(),
        respect_robots,
    }
}

#[tokio::test]
async fn saves_numbered_pages_and_listing() {
    let addr = serve_site().await;
    let dir = tempdir().unwrap();
    let links = format!(
        "1 http://{addr}/caesar\nhttp://{addr}/missing\n\n3 http://{addr}/private/notes\nnot a url\nhttp://{addr}/pompey\n"
    );
    let cfg = config(dir.path(), links, true);

    let report = crawl(&cfg).await.unwrap();
    assert_eq!(report, CrawlReport { fetched: 2, failed: 2, disallowed: 1 });

    let page_one = fs::read_to_string(cfg.output_dir.join("page_1.html")).unwrap();
    assert!(page_one.contains("Цезарь"));
    assert!(cfg.output_dir.join("page_5.html").exists());
    assert!(!cfg.output_dir.join("page_2.html").exists());
    assert!(!cfg.output_dir.join("page_3.html").exists());

    let urls = load_doc_urls(&cfg.index_file).unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[&1], format!("http://{addr}/caesar"));
    assert_eq!(urls[&5], format!("http://{addr}/pompey"));
}

#[tokio::test]
async fn ignoring_robots_fetches_everything_reachable() {
    let addr = serve_site().await;
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), format!("http://{addr}/private/notes\n"), false);

    let report = crawl(&cfg).await.unwrap();
    assert_eq!(report.fetched, 1);
    assert_eq!(fs::read_to_string(cfg.output_dir.join("page_1.html")).unwrap(), "hidden");
}

#[tokio::test]
async fn empty_links_file_fails() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path(), "\n# nothing here\n".into(), true);
    assert!(crawl(&cfg).await.is_err());
}
