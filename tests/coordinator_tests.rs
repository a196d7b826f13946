//! Full runs against a mock listing site
//!
//! These tests use wiremock to serve the listing pages and exercise the
//! category loop, checkpoint resumption and consolidated output end-to-end.

mod common;

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use venuz_scraper::config::Config;
use venuz_scraper::crawler::{default_categories, Coordinator, HttpSession, LinkResolver};
use venuz_scraper::extract::ExtractionRules;
use venuz_scraper::output::JsonOutput;
use venuz_scraper::sink::{Sink, SinkOutcome, SinkReport};
use venuz_scraper::state::RunState;
use venuz_scraper::{CandidateRecord, Checkpoint, CheckpointStore, ScrapeError};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME_HTML: &str = r#"<html><body>
    <nav><a href="/live-cams">Live Cam Sites</a></nav>
    <a href="/go/alpha">Alpha Cams</a>
    <a href="/go/alpha">Alpha Cams Again</a>
    <a href="/out/beta">Beta Tube</a>
</body></html>"#;

const LIVE_CAMS_HTML: &str = r#"<html><body>
    <a href="/go/gamma">Gamma Live</a>
    <a href="/go/delta">Delta Live</a>
</body></html>"#;

const TUBES_HTML: &str = r#"<html><body>
    <a href="/visit/tube-one">Tube One</a>
</body></html>"#;

/// Accepts every write and reports it as a single clean batch
struct AcceptAllSink;

impl Sink for AcceptAllSink {
    async fn write(&self, records: &[CandidateRecord]) -> SinkOutcome {
        SinkOutcome::Written(SinkReport {
            batches_ok: 1,
            rows_written: records.len(),
            ..SinkReport::default()
        })
    }
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer) {
    mount_page(server, "/", HOME_HTML).await;
    mount_page(server, "/live-cams", LIVE_CAMS_HTML).await;
    mount_page(server, "/best-porn-sites", TUBES_HTML).await;
}

fn coordinator(config: &Config) -> Coordinator<HttpSession, AcceptAllSink> {
    let categories =
        default_categories(&config.listing.base_url, &ExtractionRules::default()).unwrap();
    let session = HttpSession::from_config(&config.http).unwrap();
    let resolver = config
        .listing
        .resolve_redirects
        .then(|| LinkResolver::from_config(&config.http, config.listing.domain()).unwrap());

    Coordinator::new(config, session, AcceptAllSink, categories).with_resolver(resolver)
}

fn load_checkpoint(data_dir: &Path) -> Checkpoint {
    let content = fs::read_to_string(data_dir.join("checkpoint.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_full_run_writes_all_outputs() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    Mock::given(method("HEAD"))
        .and(path("/go/gamma"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "https://gamma.example/?ref=listing"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), &server.uri(), &[]);

    let summary = coordinator(&config).run().await.unwrap();

    let counts: Vec<_> = summary
        .categories
        .iter()
        .map(|c| (c.name.as_str(), c.records))
        .collect();
    assert_eq!(
        counts,
        vec![("webcams", 2), ("general", 2), ("tubes", 1), ("camsoda", 20)]
    );
    assert_eq!(summary.total_unique, 25);
    assert_eq!(summary.sink.rows_written(), 25);

    let output = JsonOutput::new(dir.path());
    let webcams = output.read_category(1, "webcams").unwrap().unwrap();
    assert_eq!(webcams[0].title, "Gamma Live");
    assert_eq!(webcams[0].source_url, format!("{}/go/gamma", server.uri()));
    assert_eq!(webcams[0].affiliate_url, "https://gamma.example");
    assert_eq!(webcams[0].subcategory.as_deref(), Some("live"));
    assert_eq!(webcams[1].affiliate_url, webcams[1].source_url);

    let general = output.read_category(2, "general").unwrap().unwrap();
    let urls: Vec<_> = general.iter().map(|r| r.source_url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/go/alpha", server.uri()),
            format!("{}/out/beta", server.uri())
        ]
    );

    let consolidated: Vec<CandidateRecord> =
        serde_json::from_str(&fs::read_to_string(dir.path().join("final_data.json")).unwrap())
            .unwrap();
    assert_eq!(consolidated.len(), 25);
    assert!(dir.path().join("raw_page.html").exists());
    assert!(dir.path().join("004_camsoda.json").exists());

    let checkpoint = load_checkpoint(dir.path());
    assert_eq!(checkpoint.state, RunState::COMPLETED);
    assert_eq!(checkpoint.completed_categories.len(), 4);
    assert_eq!(checkpoint.completed_categories.get("webcams"), Some(&2));
    assert_eq!(checkpoint.total_records_scraped, 25);
    assert!(checkpoint.next_category.is_none());
}

#[tokio::test]
async fn test_completed_run_is_not_fetched_again() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), &server.uri(), &[("RESOLVE_REDIRECTS", "false")]);

    let first = coordinator(&config).run().await.unwrap();
    assert_eq!(first.total_unique, 25);

    server.reset().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let second = coordinator(&config).run().await.unwrap();

    assert!(second.categories.iter().all(|c| c.carried_forward));
    assert_eq!(second.scraped_count(), 0);
    assert_eq!(second.total_unique, 25);
    assert_eq!(second.sink.rows_written(), 25);
}

#[tokio::test]
async fn test_completed_category_is_skipped_and_carried_forward() {
    let server = MockServer::start().await;
    mount_page(&server, "/", HOME_HTML).await;
    mount_page(&server, "/best-porn-sites", TUBES_HTML).await;
    Mock::given(method("GET"))
        .and(path("/live-cams"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LIVE_CAMS_HTML))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), &server.uri(), &[("RESOLVE_REDIRECTS", "false")]);

    let previous = vec![common::record("https://earlier.example/")];
    JsonOutput::new(dir.path())
        .write_category(1, "webcams", &previous)
        .unwrap();
    let store = CheckpointStore::new(config.checkpoint_path(), Some("webcams"));
    let mut checkpoint = store.fresh();
    checkpoint.mark_completed("webcams", 1);
    assert!(store.save(&mut checkpoint));

    let summary = coordinator(&config).run().await.unwrap();

    let webcams = summary.find("webcams").unwrap();
    assert!(webcams.carried_forward);
    assert_eq!(webcams.records, 1);
    assert_eq!(summary.scraped_count(), 3);
    assert_eq!(summary.total_unique, 24);

    let checkpoint = load_checkpoint(dir.path());
    assert_eq!(checkpoint.completed_categories.get("webcams"), Some(&1));
    assert_eq!(checkpoint.completed_categories.len(), 4);
}

#[tokio::test]
async fn test_fresh_run_ignores_checkpoint() {
    let server = MockServer::start().await;
    mount_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), &server.uri(), &[("RESOLVE_REDIRECTS", "false")]);

    let store = CheckpointStore::new(config.checkpoint_path(), Some("webcams"));
    let mut checkpoint = store.fresh();
    checkpoint.mark_completed("webcams", 7);
    assert!(store.save(&mut checkpoint));

    let summary = coordinator(&config).fresh(true).run().await.unwrap();

    let webcams = summary.find("webcams").unwrap();
    assert!(!webcams.carried_forward);
    assert_eq!(webcams.records, 2);
    assert_eq!(
        load_checkpoint(dir.path()).completed_categories.get("webcams"),
        Some(&2)
    );
}

#[tokio::test]
async fn test_failed_page_leaves_category_pending() {
    let server = MockServer::start().await;
    mount_page(&server, "/", HOME_HTML).await;
    mount_page(&server, "/live-cams", LIVE_CAMS_HTML).await;
    Mock::given(method("GET"))
        .and(path("/best-porn-sites"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), &server.uri(), &[("RESOLVE_REDIRECTS", "false")]);

    let summary = coordinator(&config).run().await.unwrap();

    assert_eq!(summary.find("tubes").map(|c| c.records), Some(0));
    assert_eq!(summary.total_unique, 24);
    assert!(summary
        .errors
        .iter()
        .any(|e| e.category.as_deref() == Some("tubes") && e.stage == "fetch"));

    let checkpoint = load_checkpoint(dir.path());
    assert!(!checkpoint.is_completed("tubes"));
    assert!(checkpoint.is_completed("camsoda"));
    assert_eq!(checkpoint.state, RunState::COMPLETED);
    assert!(!dir.path().join("003_tubes.json").exists());
}

#[tokio::test]
async fn test_missing_section_link_falls_back_to_home_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/go/alpha">Alpha Cams</a><a href="/out/beta">Beta Tube</a>"#,
    )
    .await;
    mount_page(&server, "/best-porn-sites", TUBES_HTML).await;

    let dir = TempDir::new().unwrap();
    let config = common::test_config(dir.path(), &server.uri(), &[("RESOLVE_REDIRECTS", "false")]);

    let summary = coordinator(&config).run().await.unwrap();

    assert_eq!(summary.find("webcams").map(|c| c.records), Some(2));
    assert_eq!(summary.find("general").map(|c| c.records), Some(2));
    // webcams and general read the same page, so they share records
    assert_eq!(summary.total_unique, 2 + 1 + 20);
}

#[tokio::test]
async fn test_unusable_data_dir_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let file = tempfile::NamedTempFile::new().unwrap();
    let config = common::test_config(&file.path().join("data"), &server.uri(), &[]);

    let result = coordinator(&config).run().await;

    assert!(matches!(result, Err(ScrapeError::Io(_))));
}
