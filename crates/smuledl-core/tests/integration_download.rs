//! Integration test: streamed download into the library directory.
//!
//! Serves a media body from a local server, downloads it via the blocking
//! downloader on a tokio blocking thread and checks file contents, naming,
//! progress reporting, retries and cleanup of partial files.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::mock_site::{MockSite, Reply};
use smuledl_core::downloader::{self, ProgressStats};
use smuledl_core::http::HttpClient;
use smuledl_core::library;
use smuledl_core::resolver::{MediaKind, ResolvedMedia};
use smuledl_core::retry::RetryPolicy;
use tempfile::tempdir;

fn client(max_attempts: u32) -> HttpClient {
    HttpClient::new("smuledl-test/1.0", "en")
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
        .with_retry(RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
        })
}

fn body() -> Vec<u8> {
    (0u8..251).cycle().take(96 * 1024).collect()
}

#[tokio::test]
async fn download_lands_in_library_with_progress() {
    let site = MockSite::start();
    let payload = body();
    site.route("/cdn/song.m4a", Reply::bytes("audio/mp4", payload.clone()));
    let dir = tempdir().unwrap();

    let media = ResolvedMedia::new(
        Some("Golden Hour!".to_string()),
        site.url("/cdn/song.m4a"),
        MediaKind::Audio,
    );
    let (tx, mut rx) = tokio::sync::mpsc::channel::<ProgressStats>(64);
    let dest = dir.path().to_path_buf();
    let handle = tokio::task::spawn_blocking(move || {
        downloader::download_media(&client(1), &media, &dest, "Smule", None, Some(&tx))
    });

    let mut last: Option<ProgressStats> = None;
    while let Some(stats) = rx.recv().await {
        last = Some(stats);
    }
    let outcome = handle.await.unwrap().expect("download");

    assert_eq!(outcome.bytes, payload.len() as u64);
    assert_eq!(
        outcome.path.file_name().unwrap().to_str().unwrap(),
        "Smule_Golden Hour_.m4a"
    );
    assert_eq!(std::fs::read(&outcome.path).unwrap(), payload);

    let last = last.expect("at least one progress report");
    assert_eq!(last.bytes_done, payload.len() as u64);
    assert_eq!(last.total_bytes, Some(payload.len() as u64));
    assert!(last.is_complete());

    let files = library::scan(dir.path(), "Smule").unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].kind(), MediaKind::Audio);
    assert_eq!(files[0].size, payload.len() as u64);
}

#[test]
fn completion_report_survives_full_channel() {
    let site = MockSite::start();
    site.route("/cdn/full.m4a", Reply::bytes("audio/mp4", b"0123456789".to_vec()));
    let dir = tempdir().unwrap();
    let dest = dir.path().join("Smule_full.m4a");

    let (tx, mut rx) = tokio::sync::mpsc::channel::<ProgressStats>(1);
    let stale = ProgressStats {
        bytes_done: 0,
        total_bytes: None,
        elapsed_secs: 0.0,
        attempt: 0,
    };
    tx.try_send(stale).unwrap();
    // Slow consumer: nothing is read until well after the transfer finished.
    let reader = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        let mut got = Vec::new();
        while let Some(stats) = rx.blocking_recv() {
            got.push(stats);
        }
        got
    });

    let c = client(1);
    downloader::download(&c, &site.url("/cdn/full.m4a"), &dest, c.retry_policy(), Some(&tx))
        .unwrap();
    drop(tx);

    let got = reader.join().unwrap();
    let last = got.last().expect("reports");
    assert_eq!(last.bytes_done, 10);
    assert_eq!(last.total_bytes, Some(10));
    assert!(last.is_complete());
}

#[test]
fn existing_file_gets_numbered_name() {
    let site = MockSite::start();
    site.route("/cdn/v.mp4", Reply::bytes("video/mp4", b"video".to_vec()));
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Smule_Duet.mp4"), b"older").unwrap();

    let media = ResolvedMedia::new(
        Some("Smule_Duet".to_string()),
        site.url("/cdn/v.mp4"),
        MediaKind::Video,
    );
    let outcome =
        downloader::download_media(&client(1), &media, dir.path(), "Smule", None, None).unwrap();

    assert_eq!(outcome.path, dir.path().join("Smule_Duet (1).mp4"));
    assert_eq!(std::fs::read(dir.path().join("Smule_Duet.mp4")).unwrap(), b"older");
    assert_eq!(std::fs::read(&outcome.path).unwrap(), b"video");
}

#[test]
fn custom_name_and_missing_dir() {
    let site = MockSite::start();
    site.route("/cdn/a", Reply::bytes("audio/mp4", b"abc".to_vec()));
    let root = tempdir().unwrap();
    let dir = root.path().join("nested").join("downloads");

    let media = ResolvedMedia::new(None, site.url("/cdn/a"), MediaKind::Audio);
    let outcome =
        downloader::download_media(&client(1), &media, &dir, "Smule", Some("my take"), None)
            .unwrap();
    assert_eq!(outcome.path, dir.join("Smule_my take.m4a"));
    assert_eq!(outcome.bytes, 3);
}

#[test]
fn custom_named_download_is_listed_in_library() {
    let site = MockSite::start();
    site.route("/cdn/b", Reply::bytes("video/mp4", b"clip".to_vec()));
    let dir = tempdir().unwrap();

    let media = ResolvedMedia::new(None, site.url("/cdn/b"), MediaKind::Video);
    let outcome = downloader::download_media(
        &client(1),
        &media,
        dir.path(),
        "Smule",
        Some("birthday duet"),
        None,
    )
    .unwrap();

    let files = library::scan(dir.path(), "Smule").unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, outcome.path);
    assert_eq!(files[0].name, "Smule_birthday duet.mp4");
}

#[test]
fn transient_server_error_is_retried() {
    let site = MockSite::start();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    site.route_fn("/cdn/flaky.mp4", move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Reply::status(503)
        } else {
            Reply::bytes("video/mp4", b"finally".to_vec())
        }
    });
    let dir = tempdir().unwrap();
    let dest = dir.path().join("Smule_flaky.mp4");

    let c = client(3);
    let outcome =
        downloader::download(&c, &site.url("/cdn/flaky.mp4"), &dest, c.retry_policy(), None)
            .unwrap();
    assert_eq!(outcome.bytes, 7);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(std::fs::read(&dest).unwrap(), b"finally");
}

#[test]
fn truncated_body_fails_and_leaves_no_part_file() {
    let site = MockSite::start();
    let mut reply = Reply::bytes("video/mp4", vec![7u8; 100]);
    reply.content_length = Some(1000);
    site.route("/cdn/short.mp4", reply);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("Smule_short.mp4");

    let c = client(2);
    let err = downloader::download(&c, &site.url("/cdn/short.mp4"), &dest, c.retry_policy(), None)
        .expect_err("truncated transfer must fail");
    assert!(format!("{:#}", err).contains("/cdn/short.mp4"));
    assert!(!dest.exists());
    assert!(!downloader::part_path(&dest).exists());
    assert_eq!(site.requests_to("/cdn/short.mp4").len(), 2);
}

#[test]
fn not_found_is_not_retried() {
    let site = MockSite::start();
    let dir = tempdir().unwrap();
    let dest = dir.path().join("Smule_missing.m4a");

    let c = client(3);
    assert!(downloader::download(&c, &site.url("/cdn/none"), &dest, c.retry_policy(), None).is_err());
    assert_eq!(site.requests_to("/cdn/none").len(), 1);
    assert!(!downloader::part_path(&dest).exists());
}
