//! Transfer-path tests against a local HTTP stub

use crate::support::{bind, serve, StubResponse};
use earthcare_downloader::catalog::{Baseline, Collection, ProductCode};
use earthcare_downloader::config::{Credentials, RunConfig};
use earthcare_downloader::downloader::{DownloadExecutor, DownloadOutcome};
use earthcare_downloader::search::{CandidateProduct, CatalogClient, ProductLink};
use std::path::Path;
use std::str::FromStr;

const FILE_NAME: &str = "ECA_EXAE_ATL_ALD_2A_20241117T101530Z_20241117T102030Z_02481E_BA0801A.ZIP";

fn config(output_dir: &Path, max_retries: u32, override_existing: bool) -> RunConfig {
    RunConfig::new(
        Collection::L2InstChecked,
        vec![ProductCode::from_str("ATL_ALD_2A").unwrap()],
        Baseline::Ba,
        output_dir,
        Credentials::new("user", "secret").unwrap(),
    )
    .unwrap()
    .with_max_retries(max_retries)
    .with_override_existing(override_existing)
}

fn candidate(href: String) -> CandidateProduct {
    CandidateProduct {
        title: FILE_NAME.to_string(),
        links: vec![ProductLink {
            rel: "enclosure".to_string(),
            href,
            media_type: "application/zip".to_string(),
        }],
        date: String::new(),
    }
}

#[tokio::test]
async fn test_successful_transfer_writes_destination() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(listener, vec![StubResponse::ok("zip-bytes")]);

    let executor = DownloadExecutor::new(
        CatalogClient::with_base_url(format!("http://{addr}")),
        &config(dir.path(), 3, false),
    );
    let product = ProductCode::from_str("ATL_ALD_2A").unwrap();
    std::fs::create_dir_all(dir.path().join("ATL_ALD_2A")).unwrap();

    let outcome = executor
        .download_candidate(&candidate(format!("http://{addr}/products/{FILE_NAME}")), &product)
        .await;
    assert_eq!(outcome, Some(DownloadOutcome::Success));

    let destination = dir.path().join("ATL_ALD_2A").join(FILE_NAME);
    assert_eq!(std::fs::read(&destination).unwrap(), b"zip-bytes");
    // No partial file left behind
    assert!(!dir.path().join("ATL_ALD_2A").join(format!("{FILE_NAME}.part")).exists());

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 1);
    // HTTP Basic authentication with the configured pair
    assert!(requests[0].contains("Basic dXNlcjpzZWNyZXQ="));
}

#[tokio::test]
async fn test_failed_attempt_then_success_retries() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(
        listener,
        vec![StubResponse::status(500), StubResponse::ok("recovered")],
    );

    let executor = DownloadExecutor::new(
        CatalogClient::with_base_url(format!("http://{addr}")),
        &config(dir.path(), 2, false),
    );
    let product = ProductCode::from_str("ATL_ALD_2A").unwrap();
    std::fs::create_dir_all(dir.path().join("ATL_ALD_2A")).unwrap();

    let outcome = executor
        .download_candidate(&candidate(format!("http://{addr}/products/{FILE_NAME}")), &product)
        .await;
    assert_eq!(outcome, Some(DownloadOutcome::Success));

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 2);

    let destination = dir.path().join("ATL_ALD_2A").join(FILE_NAME);
    assert_eq!(std::fs::read(destination).unwrap(), b"recovered");
}

#[tokio::test]
async fn test_exhausted_retries_yield_failed_and_no_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(listener, vec![StubResponse::status(503)]);

    // max_retries = 1: a single attempt, no backoff sleep
    let executor = DownloadExecutor::new(
        CatalogClient::with_base_url(format!("http://{addr}")),
        &config(dir.path(), 1, false),
    );
    let product = ProductCode::from_str("ATL_ALD_2A").unwrap();
    let product_dir = dir.path().join("ATL_ALD_2A");
    std::fs::create_dir_all(&product_dir).unwrap();

    let outcome = executor
        .download_candidate(&candidate(format!("http://{addr}/products/{FILE_NAME}")), &product)
        .await;
    assert!(matches!(outcome, Some(DownloadOutcome::Failed(_))));

    // Attempt count never exceeds max_retries
    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 1);

    // The failed transfer must not leave anything a future skip-check
    // could mistake for an existing download
    let leftovers: Vec<_> = std::fs::read_dir(&product_dir).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_override_existing_forces_transfer() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, addr) = bind().await;
    let server = serve(listener, vec![StubResponse::ok("fresh")]);

    let executor = DownloadExecutor::new(
        CatalogClient::with_base_url(format!("http://{addr}")),
        &config(dir.path(), 3, true),
    );
    let product = ProductCode::from_str("ATL_ALD_2A").unwrap();
    let product_dir = dir.path().join("ATL_ALD_2A");
    std::fs::create_dir_all(&product_dir).unwrap();
    std::fs::write(product_dir.join(FILE_NAME), b"stale").unwrap();

    let outcome = executor
        .download_candidate(&candidate(format!("http://{addr}/products/{FILE_NAME}")), &product)
        .await;
    assert_eq!(outcome, Some(DownloadOutcome::Success));
    assert_eq!(std::fs::read(product_dir.join(FILE_NAME)).unwrap(), b"fresh");

    // The transfer really went over the network
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_colliding_destinations_skip_then_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let product = ProductCode::from_str("ATL_ALD_2A").unwrap();
    let product_dir = dir.path().join("ATL_ALD_2A");
    std::fs::create_dir_all(&product_dir).unwrap();

    // Two candidates resolving to the same destination filename. Without
    // override-existing, the second becomes SkippedExisting.
    {
        let (listener, addr) = bind().await;
        let server = serve(listener, vec![StubResponse::ok("first")]);
        let executor = DownloadExecutor::new(
            CatalogClient::with_base_url(format!("http://{addr}")),
            &config(dir.path(), 3, false),
        );
        let href = format!("http://{addr}/products/{FILE_NAME}");

        let first = executor.download_candidate(&candidate(href.clone()), &product).await;
        let second = executor.download_candidate(&candidate(href), &product).await;
        assert_eq!(first, Some(DownloadOutcome::Success));
        assert_eq!(second, Some(DownloadOutcome::SkippedExisting));
        assert_eq!(std::fs::read(product_dir.join(FILE_NAME)).unwrap(), b"first");
        assert_eq!(server.await.unwrap().len(), 1);
    }

    // With override-existing, both transfer and the last write wins.
    {
        let (listener, addr) = bind().await;
        let server = serve(
            listener,
            vec![StubResponse::ok("first"), StubResponse::ok("second")],
        );
        let executor = DownloadExecutor::new(
            CatalogClient::with_base_url(format!("http://{addr}")),
            &config(dir.path(), 3, true),
        );
        let href = format!("http://{addr}/products/{FILE_NAME}");

        let first = executor.download_candidate(&candidate(href.clone()), &product).await;
        let second = executor.download_candidate(&candidate(href), &product).await;
        assert_eq!(first, Some(DownloadOutcome::Success));
        assert_eq!(second, Some(DownloadOutcome::Success));
        assert_eq!(std::fs::read(product_dir.join(FILE_NAME)).unwrap(), b"second");
        assert_eq!(server.await.unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_skip_existing_counts_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let product = ProductCode::from_str("ATL_ALD_2A").unwrap();
    let product_dir = dir.path().join("ATL_ALD_2A");
    std::fs::create_dir_all(&product_dir).unwrap();
    std::fs::write(product_dir.join(FILE_NAME), b"existing").unwrap();

    // Unroutable client: any network attempt would error, so the
    // SkippedExisting outcome proves none was made.
    let executor = DownloadExecutor::new(
        CatalogClient::with_base_url("http://127.0.0.1:9"),
        &config(dir.path(), 3, false),
    );
    let outcome = executor
        .download_candidate(
            &candidate(format!("http://127.0.0.1:9/products/{FILE_NAME}")),
            &product,
        )
        .await;
    assert_eq!(outcome, Some(DownloadOutcome::SkippedExisting));
}
