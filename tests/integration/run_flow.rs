//! End-to-end runs against a local catalog stub

use crate::support::{bind, serve, StubResponse};
use earthcare_downloader::catalog::{Baseline, Collection, ProductCode};
use earthcare_downloader::config::{Credentials, RunConfig};
use earthcare_downloader::downloader::{ProgressEvent, ProgressSink};
use earthcare_downloader::records::{ColumnMapping, OverpassRecord};
use earthcare_downloader::runner::DownloadRunner;
use earthcare_downloader::search::CatalogClient;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

const FILE_BA: &str = "ECA_EXAE_ATL_ALD_2A_20241117T101530Z_20241117T102030Z_02481E_BA0801A.ZIP";
const FILE_AC: &str = "ECA_EXAE_ATL_ALD_2A_20241117T101530Z_20241117T102030Z_02481E_AC0802B.ZIP";

fn config(output_dir: &Path) -> RunConfig {
    RunConfig::new(
        Collection::L2InstChecked,
        vec![ProductCode::from_str("ATL_ALD_2A").unwrap()],
        Baseline::Ba,
        output_dir,
        Credentials::new("user", "secret").unwrap(),
    )
    .unwrap()
    .with_max_retries(1)
}

fn record(row: usize, date: &str, time: &str) -> OverpassRecord {
    OverpassRecord {
        row,
        date: date.to_string(),
        time: Some(time.to_string()),
        orbit: Some(2481),
        station: None,
    }
}

fn descriptor(addr: SocketAddr) -> String {
    format!(
        r#"<OpenSearchDescription xmlns="http://a9.com/-/spec/opensearch/1.1/">
  <Url type="application/atom+xml"
       template="http://{addr}/search?pt={{productType}}&amp;start={{startDate}}&amp;end={{endDate}}&amp;rows={{maximumRecords}}&amp;orbit={{orbitNumber}}&amp;bbox={{boundingBox}}"/>
</OpenSearchDescription>"#
    )
}

fn feed(addr: SocketAddr, titles: &[&str]) -> String {
    let entries: String = titles
        .iter()
        .map(|title| {
            format!(
                r#"  <entry>
    <title>{title}</title>
    <link rel="enclosure" href="http://{addr}/products/{title}"/>
    <dc:date>2024-11-17T12:00:00Z</dc:date>
  </entry>
"#
            )
        })
        .collect();
    format!(
        r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:dc="http://purl.org/dc/elements/1.1/">
{entries}</feed>"#
    )
}

/// Sink recording event discriminants in order
#[derive(Default)]
struct RecordingSink(Vec<&'static str>);

impl ProgressSink for RecordingSink {
    fn on_event(&mut self, event: &ProgressEvent) {
        self.0.push(match event {
            ProgressEvent::Searching { .. } => "searching",
            ProgressEvent::SearchFailed { .. } => "search_failed",
            ProgressEvent::NoMatch { .. } => "no_match",
            ProgressEvent::Found { .. } => "found",
            ProgressEvent::NoBaselineMatch { .. } => "no_baseline_match",
            ProgressEvent::Downloading { .. } => "downloading",
            ProgressEvent::Finished { .. } => "finished",
        });
    }
}

#[tokio::test]
async fn test_full_run_downloads_matching_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok(feed(addr, &[FILE_BA, FILE_AC])),
            StubResponse::ok("zip-data"),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(&[record(0, "2024-11-17", "10:15:30")], &mut sink)
        .await;

    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_downloads, 1);
    assert_eq!(stats.failed_downloads, 0);
    assert_eq!(stats.skipped_existing, 0);
    assert!(stats.errors.is_empty());

    // Only the BA candidate survives the baseline filter
    let destination = dir.path().join("downloads").join("ATL_ALD_2A").join(FILE_BA);
    assert_eq!(std::fs::read(destination).unwrap(), b"zip-data");
    assert!(!dir.path().join("downloads").join("ATL_ALD_2A").join(FILE_AC).exists());

    assert_eq!(
        sink.0,
        ["searching", "found", "downloading", "finished"]
    );

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 3);
    // Descriptor request for the configured collection
    assert!(requests[0].contains("/collections/EarthCAREL2InstChecked/describe"));
    // Substituted query: remapped search code, window bounds, page size,
    // orbit filter; the unsupplied {boundingBox} placeholder is stripped
    assert!(requests[1].contains("pt=AALD"));
    assert!(requests[1].contains("start=2024-11-17T10:04:30.000Z"));
    assert!(requests[1].contains("end=2024-11-17T10:26:30.000Z"));
    assert!(requests[1].contains("rows=100"));
    assert!(requests[1].contains("orbit=2481"));
    assert!(requests[1].contains("bbox=&") || requests[1].contains("bbox= "));
}

#[tokio::test]
async fn test_template_fetched_once_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    // One descriptor, then one search per record; empty feeds keep the
    // flow short
    let empty = feed(addr, &[]);
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok(empty.clone()),
            StubResponse::ok(empty),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(
            &[
                record(0, "2024-11-17", "10:15:30"),
                record(1, "2024-11-18", "11:00:00"),
            ],
            &mut sink,
        )
        .await;

    assert_eq!(stats.total_requests, 2);
    assert_eq!(sink.0, ["searching", "no_match", "searching", "no_match"]);

    let requests = server.await.unwrap();
    let descriptor_fetches = requests
        .iter()
        .filter(|r| r.contains("/describe"))
        .count();
    assert_eq!(descriptor_fetches, 1);
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_search_failure_is_recorded_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::status(503),
            StubResponse::ok(feed(addr, &[])),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(
            &[
                record(0, "2024-11-17", "10:15:30"),
                record(1, "2024-11-18", "11:00:00"),
            ],
            &mut sink,
        )
        .await;

    // The failed unit is recorded and the next unit still runs
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.failed_downloads, 0);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("row 0"));
    assert_eq!(sink.0, ["searching", "search_failed", "searching", "no_match"]);

    assert_eq!(server.await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_unparseable_feed_treated_as_no_products() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok("<feed><entry></title></feed>"),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(&[record(0, "2024-11-17", "10:15:30")], &mut sink)
        .await;

    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_downloads, 0);
    assert_eq!(stats.failed_downloads, 0);
    assert_eq!(stats.errors.len(), 1);
    assert_eq!(sink.0, ["searching", "no_match"]);

    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_no_baseline_match_downloads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok(feed(addr, &[FILE_AC])),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(&[record(0, "2024-11-17", "10:15:30")], &mut sink)
        .await;

    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_downloads, 0);
    assert!(stats.errors.is_empty());
    assert_eq!(sink.0, ["searching", "found", "no_baseline_match"]);

    // Descriptor + search only; no transfer request was issued
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_exhausted_transfer_adds_one_error_entry() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok(feed(addr, &[FILE_BA])),
            StubResponse::status(503),
        ],
    );

    // max_retries = 1, so the single 503 exhausts the attempts
    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(&[record(0, "2024-11-17", "10:15:30")], &mut sink)
        .await;

    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.failed_downloads, 1);
    assert_eq!(stats.successful_downloads, 0);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("ATL_ALD_2A"));
    assert_eq!(sink.0, ["searching", "found", "downloading", "finished"]);

    assert_eq!(server.await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_run_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("overpasses.csv");
    std::fs::write(
        &csv_path,
        "yyyy-mm-dd,hh:mm:ss.sss,Absolute_Orbit,Zone\n\
         2024-11-17,10:15:30,2481,Leipzig\n",
    )
    .unwrap();

    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok(feed(addr, &[FILE_BA])),
            StubResponse::ok("zip-data"),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&dir.path().join("downloads")),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run_csv(&csv_path, &ColumnMapping::default(), &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_downloads, 1);
    assert_eq!(server.await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_skipped_existing_counted_in_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("downloads");
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![
            StubResponse::ok(descriptor(addr)),
            StubResponse::ok(feed(addr, &[FILE_BA])),
        ],
    );

    let runner = DownloadRunner::with_client(
        config(&output),
        CatalogClient::with_base_url(format!("http://{addr}")),
    )
    .unwrap();
    // The runner prepared the product directory; pre-seed the destination
    std::fs::write(output.join("ATL_ALD_2A").join(FILE_BA), b"existing").unwrap();

    let mut sink = RecordingSink::default();
    let stats = runner
        .run(&[record(0, "2024-11-17", "10:15:30")], &mut sink)
        .await;

    assert_eq!(stats.skipped_existing, 1);
    assert_eq!(stats.successful_downloads, 0);
    assert_eq!(sink.0, ["searching", "found", "downloading", "finished"]);

    // Descriptor + search; the transfer was skipped before any request
    assert_eq!(server.await.unwrap().len(), 2);
    assert_eq!(
        std::fs::read(output.join("ATL_ALD_2A").join(FILE_BA)).unwrap(),
        b"existing"
    );
}
