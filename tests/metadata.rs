//! ruTorrent label/directory selection against a mock seedbox.

use std::sync::Arc;

use axum::http::Method;
use seedbox_upload::config::SeedboxConfig;
use seedbox_upload::metadata::{PresetChooser, ROOT_SENTINEL};
use seedbox_upload::notification::Theme;
use seedbox_upload::torrent::ClientType;
use seedbox_upload::upload::{Phase, UploadFailure};

mod common;
use common::{CountingFetcher, MockResponse, MockSeedbox, RecordingReporter};

const LISTING: &str =
    "{ basedir: '/home/alice/data/', dirlist: ['..', '.', 'movies', 'tv'], labels: ['tv', 'linux isos'] }";

fn capture_both() -> SeedboxConfig {
    let mut config = SeedboxConfig::default();
    config.upload.capture_labels = true;
    config.upload.capture_directories = true;
    config
}

async fn rutorrent_with_getdir() -> MockSeedbox {
    MockSeedbox::start(|req| {
        if req.path() == "/plugins/_getdir/info.php" {
            MockResponse::ok(LISTING)
        } else {
            MockResponse::ok("")
        }
    })
    .await
}

#[tokio::test]
async fn test_label_and_directory_reach_the_submission() {
    let seedbox = rutorrent_with_getdir().await;
    let reporter = Arc::new(RecordingReporter::default());
    let uploader = common::uploader(capture_both(), reporter.clone(), Some(Arc::new(CountingFetcher::default())));

    let chooser = PresetChooser::new(Some("linux isos".to_string()), Some("movies".to_string()));
    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::RutorrentV3),
            &chooser,
        )
        .await;
    assert!(report.is_success(), "{:?}", report.result);

    let requests = seedbox.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].target, "/plugins/_getdir/info.php?mode=dirlist;labels");
    assert!(requests[0].header("authorization").is_some());

    assert_eq!(requests[1].target, "/php/addtorrent.php?label=linux+isos");
    let body = requests[1].body_text();
    assert!(body.contains("name=\"dir_edit\"\r\n\r\n/home/alice/data/movies\r\n"));
    assert!(body.contains("name=\"tadd_label\"\r\n\r\nlinux isos\r\n"));

    assert_eq!(reporter.messages(), vec!["Torrent uploaded successfully."]);
}

#[tokio::test]
async fn test_root_choice_uses_base_dir() {
    let seedbox = rutorrent_with_getdir().await;
    let mut config = SeedboxConfig::default();
    config.upload.capture_directories = true;
    let uploader = common::uploader(
        config,
        Arc::new(RecordingReporter::default()),
        Some(Arc::new(CountingFetcher::default())),
    );

    let chooser = PresetChooser::new(None, Some(ROOT_SENTINEL.to_string()));
    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::RutorrentV2),
            &chooser,
        )
        .await;
    assert!(report.is_success());

    let requests = seedbox.requests();
    assert_eq!(requests[0].target, "/plugins/_getdir/info.php?mode=dirlist");
    assert_eq!(requests[1].target, "/addtorrent.php?");
    assert!(requests[1]
        .body_text()
        .contains("name=\"dir_edit\"\r\n\r\n/home/alice/data/\r\n"));
}

#[tokio::test]
async fn test_lookup_failure_degrades_to_plain_upload() {
    let seedbox = MockSeedbox::start(|req| {
        if req.path() == "/plugins/_getdir/info.php" {
            MockResponse::status(500)
        } else {
            MockResponse::ok("")
        }
    })
    .await;
    let reporter = Arc::new(RecordingReporter::default());
    let uploader = common::uploader(capture_both(), reporter.clone(), Some(Arc::new(CountingFetcher::default())));

    let chooser = PresetChooser::new(Some("tv".to_string()), Some("tv".to_string()));
    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::RutorrentV3),
            &chooser,
        )
        .await;
    assert!(report.is_success());

    let requests = seedbox.requests();
    assert_eq!(requests[1].target, "/php/addtorrent.php?");
    assert!(requests[1].body_text().contains("name=\"tadd_label\"\r\n\r\n\r\n"));

    let notifications = reporter.notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].theme, Theme::Failure);
    assert_eq!(
        notifications[0].message,
        "Label info download failed because of seedbox error (HTTP 500)."
    );
    assert_eq!(notifications[1].message, "Torrent uploaded successfully.");
}

#[tokio::test]
async fn test_malformed_listing_degrades() {
    let seedbox = MockSeedbox::start(|req| {
        if req.path() == "/plugins/_getdir/info.php" {
            MockResponse::ok("<html>login</html>")
        } else {
            MockResponse::ok("")
        }
    })
    .await;
    let reporter = Arc::new(RecordingReporter::default());
    let uploader = common::uploader(capture_both(), reporter.clone(), Some(Arc::new(CountingFetcher::default())));

    let report = uploader
        .upload(
            common::magnet_link(),
            common::server(seedbox.host(), ClientType::RutorrentV3),
            &PresetChooser::new(Some("tv".to_string()), None),
        )
        .await;

    assert!(report.is_success());
    assert_eq!(
        reporter.messages(),
        vec!["Label info from seedbox could not be parsed.", "Torrent uploaded successfully."]
    );
}

#[tokio::test]
async fn test_dismissed_prompt_uploads_nothing() {
    let seedbox = rutorrent_with_getdir().await;
    let reporter = Arc::new(RecordingReporter::default());
    let fetcher = Arc::new(CountingFetcher::default());
    let uploader = common::uploader(capture_both(), reporter.clone(), Some(fetcher.clone()));

    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::RutorrentV3),
            &PresetChooser::dismiss(),
        )
        .await;

    let err = report.result.as_ref().unwrap_err();
    assert_eq!(err.phase, Phase::Metadata);
    assert!(matches!(err.failure, UploadFailure::Cancelled));
    assert_eq!(report.outcome_label(), "cancelled");
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(seedbox.requests().len(), 1);
    assert!(reporter.notifications().is_empty());
}

#[tokio::test]
async fn test_no_lookup_for_other_backends() {
    let seedbox = rutorrent_with_getdir().await;
    let uploader = common::uploader(
        capture_both(),
        Arc::new(RecordingReporter::default()),
        Some(Arc::new(CountingFetcher::default())),
    );

    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::UTorrent),
            &PresetChooser::dismiss(),
        )
        .await;

    assert!(report.is_success());
    let requests = seedbox.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].target, "/?action=add-file");
}

async fn rutorrent_with_slow_getdir() -> MockSeedbox {
    MockSeedbox::start(|req| {
        if req.path() == "/plugins/_getdir/info.php" {
            MockResponse::ok(LISTING).delayed(std::time::Duration::from_secs(3))
        } else {
            MockResponse::ok("")
        }
    })
    .await
}

#[tokio::test]
async fn test_lookup_timeout_degrades_to_plain_upload() {
    let seedbox = rutorrent_with_slow_getdir().await;
    let reporter = Arc::new(RecordingReporter::default());
    let mut config = capture_both();
    config.upload.timeout_secs = 1;
    let uploader = common::uploader(config, reporter.clone(), Some(Arc::new(CountingFetcher::default())));

    let chooser = PresetChooser::new(Some("tv".to_string()), Some("movies".to_string()));
    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::RutorrentV3),
            &chooser,
        )
        .await;
    assert!(report.is_success(), "{:?}", report.result);

    let requests = seedbox.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].target, "/php/addtorrent.php?");
    let body = requests[1].body_text();
    assert!(body.contains("name=\"tadd_label\"\r\n\r\n\r\n"));
    assert!(!body.contains("movies"));

    let notifications = reporter.notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].theme, Theme::Timeout);
    assert_eq!(
        notifications[0].message,
        "Label info download failed because of seedbox timeout."
    );
    assert_eq!(notifications[1].message, "Torrent uploaded successfully.");
}

#[tokio::test]
async fn test_lookup_timeout_follows_timeout_switch() {
    let seedbox = rutorrent_with_slow_getdir().await;
    let reporter = Arc::new(RecordingReporter::default());
    let mut config = capture_both();
    config.upload.timeout_secs = 1;
    config.notifications.timeout = false;
    config.notifications.auth_failure = true;
    let uploader = common::uploader(config, reporter.clone(), Some(Arc::new(CountingFetcher::default())));

    let report = uploader
        .upload(
            common::torrent_link(),
            common::server(seedbox.host(), ClientType::RutorrentV2),
            &PresetChooser::new(None, None),
        )
        .await;

    assert!(report.is_success(), "{:?}", report.result);
    assert_eq!(reporter.messages(), vec!["Torrent uploaded successfully."]);
}
