//! Runs the load generator against an in-process server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use loadtest::{LoadTest, Outcome, StatusKey};
use observatory_server::config::{Config, Endpoints};
use observatory_server::random::SeededRandom;
use observatory_test::server::TestServer;

#[tokio::test]
async fn test_health_run() -> Result<()> {
    let server = TestServer::new().await;
    let dir = tempfile::tempdir()?;

    let report = LoadTest::builder(server.url("/health"))
        .requests(20)
        .delay(Duration::from_millis(1))
        .output_dir(dir.path())
        .build()
        .run()
        .await?;

    assert_eq!(report.records.len(), 20);
    assert!(report.records.iter().all(|r| matches!(
        r.outcome,
        Outcome::Success { status: 200, .. }
    )));

    let summary = report.summary.expect("summary for a non-empty run");
    assert_eq!(summary.tally.get(&StatusKey::Code(200)), Some(&20));
    assert!(summary.min_ms >= 0.0);
    assert!(summary.min_ms <= summary.mean_ms && summary.mean_ms <= summary.max_ms);

    let contents = std::fs::read_to_string(&report.path)?;
    assert_eq!(contents.lines().count(), 21);

    Ok(())
}

#[tokio::test]
async fn test_answered_requests_are_delayed() -> Result<()> {
    let server = TestServer::new().await;
    let dir = tempfile::tempdir()?;
    let delay = Duration::from_millis(200);

    let start = Instant::now();
    let report = LoadTest::builder(server.url("/health"))
        .requests(3)
        .delay(delay)
        .output_dir(dir.path())
        .build()
        .run()
        .await?;

    assert!(report.records.iter().all(|r| r.outcome.is_success()));
    assert!(start.elapsed() >= delay * 3);

    Ok(())
}

#[tokio::test]
async fn test_unstable_run_tally() -> Result<()> {
    let server = TestServer::with_random(Config::default(), Arc::new(SeededRandom::new(3))).await;
    let dir = tempfile::tempdir()?;

    let report = LoadTest::builder(server.url("/unstable"))
        .requests(50)
        .delay(Duration::ZERO)
        .output_dir(dir.path())
        .build()
        .run()
        .await?;

    let summary = report.summary.expect("summary for a non-empty run");
    assert_eq!(summary.tally.values().sum::<u64>(), 50);
    assert!(summary.tally.keys().all(|key| matches!(
        key,
        StatusKey::Code(200) | StatusKey::Code(500)
    )));

    Ok(())
}

#[tokio::test]
async fn test_timeouts_are_recorded() -> Result<()> {
    let server = TestServer::with_config(Config {
        endpoints: Endpoints {
            slow_delay: Duration::from_secs(2),
            ..Default::default()
        },
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir()?;

    let report = LoadTest::builder(server.url("/slow"))
        .requests(2)
        .timeout(Duration::from_millis(200))
        .output_dir(dir.path())
        .build()
        .run()
        .await?;

    assert_eq!(report.records.len(), 2);
    for record in &report.records {
        let Outcome::Failure { kind, latency } = record.outcome else {
            panic!("expected a timeout, got {:?}", record.outcome);
        };
        assert_eq!(kind, loadtest::FailureKind::Timeout);
        assert!(latency >= Duration::from_millis(200));
    }

    let contents = std::fs::read_to_string(&report.path)?;
    assert_eq!(contents.lines().filter(|l| l.ends_with(",ERROR")).count(), 2);

    Ok(())
}
