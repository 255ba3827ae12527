//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site and run the full crawl
//! cycle end-to-end through the plain HTTP renderer.

use site2md::config::{Config, RendererBackend};
use site2md::crawler::{aggregate_only, crawl};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `root`
fn create_test_config(root: &TempDir) -> Config {
    let mut config = Config::default();
    config.renderer.backend = RendererBackend::Http;
    config.crawler.use_sitemaps = false;
    config.crawler.settle_delay_ms = 0;
    config.crawler.navigation_timeout_ms = 5_000;
    config.crawler.sitemap_timeout_ms = 2_000;
    config.output.pages_root = root.path().join("dl").to_string_lossy().into_owned();
    config.output.aggregate_root = root.path().join("websites").to_string_lossy().into_owned();
    config
}

/// An HTML response with a navigation bar and a main region
fn html_page(nav: &str, main: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>Test</title></head><body><nav>{}</nav><main>{}</main><footer>Footer text</footer></body></html>",
            nav, main
        ),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(hits)
        .mount(server)
        .await;
}

fn start_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("Failed to parse base URL")
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        html_page(
            r#"<a href="/about">About</a>
               <a href="/contact?ref=footer">Contact</a>
               <a href="https://other.com/x">Elsewhere</a>"#,
            "<h1>Home</h1><p>Welcome home</p>",
        ),
        1,
    )
    .await;
    mount_page(&server, "/about", html_page("", "<p>About us</p>"), 1).await;
    mount_page(&server, "/contact", html_page("", "<p>Write to us</p>"), 1).await;

    let report = crawl(create_test_config(&root), &start_url(&server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.attempted, 3);
    assert_eq!(report.stats.saved, 3);
    assert_eq!(report.stats.failed, 0);
    assert!(report.pages_dir.ends_with("127.0.0-website"));

    let pages = &report.pages_dir;
    assert!(pages.join("index.md").is_file());
    assert!(pages.join("about/index.md").is_file());
    assert!(pages.join("contact/index.md").is_file());

    let home = std::fs::read_to_string(pages.join("index.md")).unwrap();
    assert!(home.starts_with(&format!("<!-- Source: {}/ -->\n\n", base_url)));
    assert!(home.contains("Welcome home"));
    assert!(!home.contains("Footer text"));
    assert!(!home.contains("Elsewhere"));
}

#[tokio::test]
async fn test_cycle_fetched_once() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(&server, "/", html_page(r#"<a href="/a">A</a>"#, "<p>root</p>"), 1).await;
    mount_page(&server, "/a", html_page(r#"<a href="/b">B</a>"#, "<p>a</p>"), 1).await;
    mount_page(
        &server,
        "/b",
        html_page(r#"<a href="/a">A</a><a href="/">Home</a><a href="/a#top">A again</a>"#, "<p>b</p>"),
        1,
    )
    .await;

    let report = crawl(create_test_config(&root), &start_url(&server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.attempted, 3);
    assert_eq!(report.stats.saved, 3);
    // Wiremock verifies expect(1) on every route when the server drops
}

#[tokio::test]
async fn test_page_ceiling() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", html_page(&links, "<p>index</p>"), 1).await;
    for i in 0..10 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(html_page("", "<p>child</p>"))
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&root);
    config.crawler.max_pages = 4;

    let report = crawl(config, &start_url(&server)).await.expect("Crawl failed");

    assert_eq!(report.stats.attempted, 4);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);

    // Breadth-first: the first three children in document order
    assert!(report.pages_dir.join("p0/index.md").is_file());
    assert!(report.pages_dir.join("p2/index.md").is_file());
    assert!(!report.pages_dir.join("p3/index.md").exists());
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        html_page(r#"<a href="/missing">Gone</a><a href="/ok">Fine</a>"#, "<p>index</p>"),
        1,
    )
    .await;
    mount_page(&server, "/missing", ResponseTemplate::new(404), 1).await;
    mount_page(&server, "/ok", html_page("", "<p>still here</p>"), 1).await;

    let report = crawl(create_test_config(&root), &start_url(&server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.attempted, 3);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.saved, 2);
    assert!(!report.pages_dir.join("missing").exists());
    assert!(report.pages_dir.join("ok/index.md").is_file());
}

#[tokio::test]
async fn test_content_type_handling() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        html_page(
            r#"<a href="/feed">Feed</a><a href="/brochure.pdf">Brochure</a>"#,
            "<p>index</p>",
        ),
        1,
    )
    .await;
    mount_page(
        &server,
        "/feed",
        ResponseTemplate::new(200).set_body_raw(r#"{"items":[]}"#, "application/json"),
        1,
    )
    .await;
    // Resource links never reach the renderer
    mount_page(&server, "/brochure.pdf", ResponseTemplate::new(200), 0).await;

    let report = crawl(create_test_config(&root), &start_url(&server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.attempted, 2);
    assert_eq!(report.stats.failed, 1);
    assert!(!report.pages_dir.join("feed").exists());
}

#[tokio::test]
async fn test_page_without_content_is_empty() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        ResponseTemplate::new(200).set_body_raw(
            "<html><body><nav><a href=\"/x\">x</a></nav></body></html>",
            "text/html",
        ),
        1,
    )
    .await;
    mount_page(&server, "/x", html_page("", "<p>x</p>"), 1).await;

    let report = crawl(create_test_config(&root), &start_url(&server))
        .await
        .expect("Crawl failed");

    assert_eq!(report.stats.empty, 1);
    assert_eq!(report.stats.saved, 1);

    let home = std::fs::read_to_string(report.pages_dir.join("index.md")).unwrap();
    assert_eq!(home.trim_end(), format!("<!-- Source: {}/ -->", server.uri()));
}

#[tokio::test]
async fn test_sitemap_seeding() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let root = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/</loc></url>
  <url><loc>{base}/orphan</loc></url>
  <url><loc>https://other.com/y</loc></url>
  <url><loc>{base}/report.pdf</loc></url>
</urlset>"#,
                base = base_url
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    mount_page(&server, "/", html_page("", "<p>no links</p>"), 1).await;
    mount_page(&server, "/orphan", html_page("", "<p>only in the sitemap</p>"), 1).await;

    let mut config = create_test_config(&root);
    config.crawler.use_sitemaps = true;

    let report = crawl(config, &start_url(&server)).await.expect("Crawl failed");

    assert_eq!(report.stats.attempted, 2);
    assert!(report.pages_dir.join("orphan/index.md").is_file());
}

#[tokio::test]
async fn test_sitemap_index_followed() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let root = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{}/sitemap-pages.xml</loc></sitemap>
</sitemapindex>"#,
                base_url
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<urlset><url><loc>{}/deep/page</loc></url></urlset>"#,
                base_url
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    mount_page(&server, "/", html_page("", "<p>index</p>"), 1).await;
    mount_page(&server, "/deep/page", html_page("", "<p>deep</p>"), 1).await;

    let mut config = create_test_config(&root);
    config.crawler.use_sitemaps = true;

    let report = crawl(config, &start_url(&server)).await.expect("Crawl failed");

    assert_eq!(report.stats.saved, 2);
    assert!(report.pages_dir.join("deep/page/index.md").is_file());
}

#[tokio::test]
async fn test_aggregate_document() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let root = TempDir::new().unwrap();

    mount_page(&server, "/", html_page(r#"<a href="/about">About</a>"#, "<p>Home body</p>"), 1).await;
    mount_page(&server, "/about", html_page("", "<p>About body</p>"), 1).await;

    let report = crawl(create_test_config(&root), &start_url(&server))
        .await
        .expect("Crawl failed");

    let (aggregate_path, count) = report.aggregate.expect("aggregate should be written");
    assert_eq!(count, 2);
    assert_eq!(aggregate_path, root.path().join("websites").join("127.0.0.md"));

    let aggregate = std::fs::read_to_string(&aggregate_path).unwrap();
    assert!(aggregate.contains(&format!("## Source: {}/\n", base_url)));
    assert!(aggregate.contains(&format!("## Source: {}/about\n", base_url)));
    assert!(aggregate.contains("Home body"));
    assert!(aggregate.contains("About body"));
    assert!(!aggregate.contains("<!-- Source:"));
}

#[tokio::test]
async fn test_aggregate_disabled_then_rebuilt() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(&server, "/", html_page(r#"<a href="/about">About</a>"#, "<p>Home</p>"), 1).await;
    mount_page(&server, "/about", html_page("", "<p>About</p>"), 1).await;

    let mut config = create_test_config(&root);
    config.output.aggregate = false;

    let start = start_url(&server);
    let report = crawl(config.clone(), &start).await.expect("Crawl failed");
    assert!(report.aggregate.is_none());
    assert!(!root.path().join("websites").exists());

    let (path, count) = aggregate_only(&config, &start).expect("Aggregation failed");
    assert_eq!(count, 2);
    assert!(path.is_file());
}

#[tokio::test]
async fn test_invalid_start_url_rejected() {
    let root = TempDir::new().unwrap();
    let start = Url::parse("mailto:someone@example.com").unwrap();

    let result = crawl(create_test_config(&root), &start).await;
    assert!(result.is_err());
    assert!(!root.path().join("dl").exists());
}
