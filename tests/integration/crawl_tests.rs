//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and exercise each
//! discovery strategy and the extraction pass end-to-end.

use blogdex_crawl::config::{Config, UserAgentConfig};
use blogdex_crawl::crawler::{
    BatchScheduler, CancelFlag, CandidateUrl, CrawlTarget, DiscoverySource, DiscoveryStrategy,
    FetchError, Fetcher, Harvester, HomepageCrawler, PlatformCrawler, SitemapResolver,
};
use blogdex_crawl::url::UrlFilter;
use blogdex_crawl::{DiscoveryState, HarvestError};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short delays and timeouts
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.batch_delay_ms = 10;
    config.crawler.fetch_timeout_secs = 5;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
        contact_email: Some("test@example.com".to_string()),
    };
    config.platform.page_delay_ms = 10;
    config.platform.fetch_timeout_secs = 5;
    config
}

/// Points the platform crawler at a mock server
fn create_platform_config(mock_server: &MockServer) -> Config {
    let mut config = create_test_config();
    config.platform.hosts = vec!["127.0.0.1".to_string()];
    config.platform.api_base = mock_server.uri();
    config
}

fn test_fetcher(config: &Config) -> Fetcher {
    Fetcher::from_config(&config.user_agent, &config.crawler).expect("Failed to build fetcher")
}

fn sitemap_resolver(config: &Config) -> SitemapResolver {
    SitemapResolver::new(
        test_fetcher(config),
        &config.sitemap,
        UrlFilter::new(&config.filter),
    )
}

fn html_page(title: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body><p>Content</p></body></html>"#,
        title
    )
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("  <sitemap><loc>{}</loc></sitemap>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>",
        entries
    )
}

async fn mount_page(mock_server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;
}

async fn mount_xml(mock_server: &MockServer, xml_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(xml_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(mock_server)
        .await;
}

fn target(url: &str, max_items: usize, config: &Config) -> CrawlTarget {
    CrawlTarget::new(url, max_items, &config.platform).expect("Failed to build target")
}

// ===== Fetcher =====

#[tokio::test]
async fn test_fetch_success_and_status_errors() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/ok", html_page("Fine")).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(&create_test_config());

    let body = fetcher.fetch(&format!("{}/ok", base_url)).await.unwrap();
    assert!(body.contains("<title>Fine</title>"));

    let missing = fetcher.fetch(&format!("{}/missing", base_url)).await;
    assert!(matches!(missing, Err(FetchError::HttpStatus { status: 404, .. })));

    let broken = fetcher.fetch(&format!("{}/broken", base_url)).await;
    assert!(matches!(broken, Err(FetchError::HttpStatus { status: 503, .. })));
}

#[tokio::test]
async fn test_fetch_follows_redirects_and_sends_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(&create_test_config());
    let body = fetcher.fetch(&format!("{}/old", base_url)).await.unwrap();
    assert_eq!(body, "moved here");
}

#[tokio::test]
async fn test_fetch_redirect_loop_is_malformed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(&create_test_config());
    let result = fetcher.fetch(&format!("{}/loop", base_url)).await;
    assert!(matches!(result, Err(FetchError::Malformed { .. })));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(&create_test_config()).with_timeout(Duration::from_millis(200));
    let result = fetcher.fetch(&format!("{}/slow", base_url)).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_fetch_sends_referer() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(header("referer", "https://blog.example/someone"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(&create_test_config());
    let body = fetcher
        .fetch_with_referer(
            &format!("{}/listing", base_url),
            Some("https://blog.example/someone"),
        )
        .await
        .unwrap();
    assert_eq!(body, "{}");
}

// ===== Sitemap resolution =====

#[tokio::test]
async fn test_sitemap_index_follows_only_post_sitemaps() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/post-sitemap.xml", base_url),
            format!("{}/page-sitemap.xml", base_url),
            format!("{}/category-sitemap.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/post-sitemap.xml",
        urlset(&[
            format!("{}/hello-world", base_url),
            format!("{}/second-post", base_url),
            format!("{}/category/news", base_url),
            format!("{}/", base_url),
        ]),
    )
    .await;

    // Non-post children must never be fetched
    Mock::given(method("GET"))
        .and(path("/page-sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[format!(
            "{}/about",
            base_url
        )])))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/category-sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[format!(
            "{}/category/news",
            base_url
        )])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let candidates = sitemap_resolver(&config)
        .resolve(&target(&base_url, 10, &config))
        .await;

    assert_eq!(
        candidates,
        vec![
            CandidateUrl {
                url: format!("{}/hello-world", base_url),
                discovered_via: DiscoverySource::SitemapIndex,
            },
            CandidateUrl {
                url: format!("{}/second-post", base_url),
                discovered_via: DiscoverySource::SitemapIndex,
            },
        ]
    );
}

#[tokio::test]
async fn test_nested_sitemap_index_is_resolved() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/sitemap-posts-index.xml", base_url)]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap-posts-index.xml",
        sitemap_index(&[
            format!("{}/sitemap-posts-2023.xml", base_url),
            format!("{}/sitemap-posts-index.xml", base_url),
        ]),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap-posts-2023.xml",
        urlset(&[format!("{}/2023/deep-post", base_url)]),
    )
    .await;

    let config = create_test_config();
    let candidates = sitemap_resolver(&config)
        .resolve(&target(&base_url, 10, &config))
        .await;

    let urls: Vec<_> = candidates.iter().map(|c| c.url.clone()).collect();
    assert_eq!(urls, vec![format!("{}/2023/deep-post", base_url)]);
}

#[tokio::test]
async fn test_flat_sitemap_is_filtered_and_deduplicated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/post-a", base_url),
            format!("{}/tag/rust", base_url),
            format!("{}/images/photo.jpg", base_url),
            format!("{}/", base_url),
            format!("{}/index.php", base_url),
            format!("{}/another-sitemap.xml", base_url),
            format!("{}/post-a?utm_source=feed", base_url),
            "https://elsewhere.example/post".to_string(),
            format!("{}/post-b", base_url),
        ]),
    )
    .await;

    let config = create_test_config();
    let candidates = sitemap_resolver(&config)
        .resolve(&target(&base_url, 10, &config))
        .await;

    assert_eq!(
        candidates,
        vec![
            CandidateUrl {
                url: format!("{}/post-a", base_url),
                discovered_via: DiscoverySource::Sitemap,
            },
            CandidateUrl {
                url: format!("{}/post-b", base_url),
                discovered_via: DiscoverySource::Sitemap,
            },
        ]
    );
}

#[tokio::test]
async fn test_sitemap_probe_order_and_xml_check() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // /sitemap.xml is not mounted and answers 404
    mount_page(&mock_server, "/wp-sitemap.xml", html_page("Not a sitemap")).await;
    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        urlset(&[format!("{}/found-via-third-probe", base_url)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/post-sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let candidates = sitemap_resolver(&config)
        .resolve(&target(&base_url, 10, &config))
        .await;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].url, format!("{}/found-via-third-probe", base_url));
}

#[tokio::test]
async fn test_no_sitemap_yields_nothing() {
    let mock_server = MockServer::start().await;
    let config = create_test_config();
    let candidates = sitemap_resolver(&config)
        .resolve(&target(&mock_server.uri(), 10, &config))
        .await;
    assert!(candidates.is_empty());
}

// ===== Homepage crawl =====

#[tokio::test]
async fn test_homepage_crawl_keeps_only_same_site_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <a href="/first-post">1</a>
            <a href="/second-post?ref=home">2</a>
            <a href="third-post">3</a>
            <a href="/fourth-post#comments">4</a>
            <a href="/fifth-post">5</a>
            <a href="https://external.example/one">External</a>
            <a href="https://another.example/two">External</a>
            <a href="/category/misc">Category</a>
            <a href="/logo.png">Logo</a>
            <a href="mailto:me@example.com">Mail</a>
            <a href="/first-post">Duplicate</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    for (page, title) in [
        ("/first-post", "First Post Title"),
        ("/second-post", "Second Post Title"),
        ("/third-post", "Third Post Title"),
        ("/fourth-post", "Fourth Post Title"),
        ("/fifth-post", "Fifth Post Title"),
    ] {
        mount_page(&mock_server, page, html_page(title)).await;
    }

    let config = create_test_config();
    let mut harvester = Harvester::new(config.clone()).unwrap();
    let report = harvester
        .run(&target(&base_url, 10, &config))
        .await
        .expect("Harvest failed");

    assert_eq!(report.strategy, DiscoveryStrategy::HomepageCrawl);
    assert_eq!(report.total_candidates, 5);
    assert_eq!(report.extracted_count, 5);
    assert_eq!(harvester.state(), DiscoveryState::Done);

    let urls: Vec<_> = report.titles.iter().map(|t| t.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/first-post", base_url),
            format!("{}/second-post", base_url),
            format!("{}/third-post", base_url),
            format!("{}/fourth-post", base_url),
            format!("{}/fifth-post", base_url),
        ]
    );
    assert_eq!(report.titles[0].title, "First Post Title");
    assert_eq!(report.titles[4].sequence, 5);
}

#[tokio::test]
async fn test_homepage_crawl_does_not_expand_final_depth() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/level-one">1</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/level-one",
        r#"<html><body><a href="/level-two">2</a></body></html>"#.to_string(),
    )
    .await;
    // Found on the final depth, so never fetched by the crawl
    Mock::given(method("GET"))
        .and(path("/level-two"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/level-three">3</a></body></html>"#,
        ))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let crawler = HomepageCrawler::new(
        test_fetcher(&config),
        BatchScheduler::from_config(&config.crawler, CancelFlag::new()),
        UrlFilter::new(&config.filter),
        &config.crawler,
    );
    let candidates = crawler.crawl(&target(&base_url, 10, &config)).await;

    let urls: Vec<_> = candidates.iter().map(|c| c.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/level-one", base_url),
            format!("{}/level-two", base_url),
        ]
    );
    assert!(candidates
        .iter()
        .all(|c| c.discovered_via == DiscoverySource::HomepageCrawl));
}

// ===== Extraction =====

#[tokio::test]
async fn test_batch_with_connection_failures_still_succeeds() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let mut candidates = Vec::new();
    let mut expected = Vec::new();
    for i in 1..=10 {
        let url = if i % 3 == 0 {
            // Port 1 refuses connections
            format!("http://127.0.0.1:1/dead-{}", i)
        } else {
            let page = format!("/post-{}", i);
            mount_page(&mock_server, &page, html_page(&format!("Working Post {}", i))).await;
            let url = format!("{}{}", base_url, page);
            expected.push(url.clone());
            url
        };
        candidates.push(CandidateUrl {
            url,
            discovered_via: DiscoverySource::Sitemap,
        });
    }

    let harvester = Harvester::new(create_test_config()).unwrap();
    let titles = harvester.extract_titles(&candidates, 10).await;

    assert_eq!(titles.len(), 7);
    let urls: Vec<_> = titles.iter().map(|t| t.url.clone()).collect();
    assert_eq!(urls, expected);
    let sequences: Vec<_> = titles.iter().map(|t| t.sequence).collect();
    assert_eq!(sequences, (1..=7).collect::<Vec<_>>());
    assert_eq!(titles[0].title, "Working Post 1");
}

#[tokio::test]
async fn test_max_items_caps_titles_and_candidates_considered() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let posts: Vec<String> = (1..=8).map(|i| format!("{}/article-{}", base_url, i)).collect();
    mount_xml(&mock_server, "/sitemap.xml", urlset(&posts)).await;

    for i in 1..=6 {
        mount_page(
            &mock_server,
            &format!("/article-{}", i),
            html_page(&format!("Article Number {} - Test Blog", i)),
        )
        .await;
    }
    // Beyond max_items * candidate-multiplier
    for i in 7..=8 {
        Mock::given(method("GET"))
            .and(path(format!("/article-{}", i)))
            .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Never")))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config();
    let mut harvester = Harvester::new(config.clone()).unwrap();
    let report = harvester
        .run(&target(&base_url, 3, &config))
        .await
        .expect("Harvest failed");

    assert_eq!(report.strategy, DiscoveryStrategy::Sitemap);
    assert_eq!(report.total_candidates, 8);
    assert_eq!(report.extracted_count, 3);
    let titles: Vec<_> = report.titles.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Article Number 1", "Article Number 2", "Article Number 3"]
    );
}

#[tokio::test]
async fn test_skip_patterns_never_reach_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/category/foo", base_url),
            format!("{}/image.jpg", base_url),
            format!("{}/feed", base_url),
            format!("{}/real-article", base_url),
        ]),
    )
    .await;
    mount_page(&mock_server, "/real-article", html_page("Real Article")).await;
    for skipped in ["/category/foo", "/image.jpg", "/feed"] {
        Mock::given(method("GET"))
            .and(path(skipped))
            .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Skipped Page")))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config();
    let mut harvester = Harvester::new(config.clone()).unwrap();
    let report = harvester.run(&target(&base_url, 10, &config)).await.unwrap();

    assert_eq!(report.total_candidates, 1);
    assert_eq!(report.titles.len(), 1);
    assert_eq!(report.titles[0].url, format!("{}/real-article", base_url));
}

#[tokio::test]
async fn test_no_content_found() {
    let mock_server = MockServer::start().await;
    let config = create_test_config();

    let mut harvester = Harvester::new(config.clone()).unwrap();
    let result = harvester.run(&target(&mock_server.uri(), 10, &config)).await;

    assert!(matches!(result, Err(HarvestError::NoContentFound { .. })));
    assert_eq!(harvester.state(), DiscoveryState::Failed);
}

#[tokio::test]
async fn test_cancelled_run_returns_partial_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_xml(
        &mock_server,
        "/sitemap.xml",
        urlset(&[format!("{}/some-post", base_url)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/some-post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Some Post")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let mut harvester = Harvester::new(config.clone()).unwrap();
    harvester.cancel_flag().cancel();

    let report = harvester.run(&target(&base_url, 10, &config)).await.unwrap();
    assert!(report.cancelled);
    assert_eq!(report.total_candidates, 1);
    assert!(report.titles.is_empty());
}

// ===== Platform listing =====

#[tokio::test]
async fn test_platform_listing_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let referer = format!("{}/someone", base_url);

    // Total probe
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("blogId", "someone"))
        .and(query_param("currentPage", "1"))
        .and(query_param("countPerPage", "1"))
        .and(header("referer", referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"postList":[{"logNo":"123","title":"x"}],"totalCount":"45"}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "1"))
        .and(query_param("countPerPage", "30"))
        .and(header("referer", referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"postList":[
                {"logNo":"123","title":"Caf%C3%A9+Review","addDate":"2024. 5. 1."},
                {"logNo":124,"title":"It\'s+a+fine+day"}
            ],"totalCount":"45"}"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "2"))
        .and(query_param("countPerPage", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"postList":[
                {"logNo":"123","title":"Duplicate+Entry"},
                {"logNo":"","title":"No+Log+Number"},
                {"logNo":"126","title":"ab"},
                {"logNo":"125","title":"Tom+%26amp%3B+Jerry"}
            ]}"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "3"))
        .and(query_param("countPerPage", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"postList":[]}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"postList":[]}"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_platform_config(&mock_server);
    let mut harvester = Harvester::new(config.clone()).unwrap();
    let report = harvester
        .run(&target(&format!("{}/someone", base_url), 100, &config))
        .await
        .expect("Harvest failed");

    assert_eq!(report.strategy, DiscoveryStrategy::PlatformApi);
    assert_eq!(report.source, referer);
    assert_eq!(report.total_candidates, 45);
    assert_eq!(report.extracted_count, 3);
    assert_eq!(harvester.state(), DiscoveryState::Done);

    let first = &report.titles[0];
    assert_eq!(first.title, "Café Review");
    assert!(first.url.ends_with("/123"));
    assert_eq!(first.published.as_deref(), Some("2024. 5. 1."));

    assert_eq!(report.titles[1].title, "It's a fine day");
    assert_eq!(report.titles[1].url, format!("{}/someone/124", base_url));
    assert_eq!(report.titles[2].title, "Tom & Jerry");
    assert_eq!(report.titles[2].sequence, 3);
}

#[tokio::test]
async fn test_platform_stops_on_error_and_keeps_partial_results() {
    let mock_server = MockServer::start().await;

    // Total probe returns garbage, so the total falls back to the title count
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("countPerPage", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "1"))
        .and(query_param("countPerPage", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"postList":[{"logNo":"1","title":"First+Entry"},{"logNo":"2","title":"Second+Entry"}]}"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "2"))
        .and(query_param("countPerPage", "30"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("currentPage", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"postList":[]}"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_platform_config(&mock_server);
    let fetcher = test_fetcher(&config);
    let crawler = PlatformCrawler::new(
        &fetcher,
        &config.platform,
        config.title.min_length,
        CancelFlag::new(),
    );
    let harvest = crawler.crawl("someone", 100).await;

    assert_eq!(harvest.titles.len(), 2);
    assert_eq!(harvest.total_count, 2);
    assert_eq!(harvest.pages_fetched, 1);
}

#[tokio::test]
async fn test_platform_respects_max_items_and_page_ceiling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("countPerPage", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"postList":[],"totalCount":500}"#),
        )
        .mount(&mock_server)
        .await;
    // Every page repeats the same entries; two pages for the first crawl,
    // one for the capped crawl
    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .and(query_param("countPerPage", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"postList":[{"logNo":"1","title":"Entry+One"},{"logNo":"2","title":"Entry+Two"}]}"#,
        ))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_platform_config(&mock_server);
    config.platform.max_pages = 2;
    let fetcher = test_fetcher(&config);
    let crawler = PlatformCrawler::new(
        &fetcher,
        &config.platform,
        config.title.min_length,
        CancelFlag::new(),
    );

    let harvest = crawler.crawl("someone", 100).await;
    assert_eq!(harvest.total_count, 500);
    assert_eq!(harvest.pages_fetched, 2);
    assert_eq!(harvest.titles.len(), 2);

    let capped = crawler.crawl("someone", 1).await;
    assert_eq!(capped.titles.len(), 1);
    assert_eq!(capped.titles[0].title, "Entry One");
}

#[tokio::test]
async fn test_platform_without_titles_fails() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/PostTitleListAsync.naver"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"postList":[]}"#))
        .mount(&mock_server)
        .await;

    let config = create_platform_config(&mock_server);
    let mut harvester = Harvester::new(config.clone()).unwrap();
    let result = harvester
        .run(&target(&format!("{}/someone", base_url), 10, &config))
        .await;

    assert!(matches!(result, Err(HarvestError::NoContentFound { .. })));
    assert_eq!(harvester.state(), DiscoveryState::Failed);
}
