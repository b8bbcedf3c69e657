use std::sync::Arc;
use std::time::Duration;

use crate::error::Error;
use crate::limiter::RequestWindow;

use super::FakeClock;

fn window(quota: usize, clock: Arc<FakeClock>) -> RequestWindow {
    RequestWindow::new(clock)
        .with_quota(quota, Duration::from_secs(60))
}

#[test]
fn test_quota_admits_instantly() {
    let clock = Arc::new(FakeClock::new());
    let mut window = window(100, clock.clone());

    for _ in 0..100 {
        window.admit().unwrap();
        window.record();
    }

    assert_eq!(window.len(), 100);
    assert_eq!(clock.sleeps(), 0);
}

#[test]
fn test_full_window_blocks_until_oldest_expires() {
    let clock = Arc::new(FakeClock::new());
    let mut window = window(2, clock.clone());

    // Call A at t=0, call B at t=0.1: the window is now full
    window.admit().unwrap();
    window.record();

    clock.advance(Duration::from_millis(100));

    window.admit().unwrap();
    window.record();

    clock.advance(Duration::from_millis(100));

    // Call C at t=0.2 blocks until call A ages past 60 seconds
    window.admit().unwrap();
    window.record();

    assert!(clock.now.get() >= 60.0 && clock.now.get() < 62.0);
    assert_eq!(clock.sleeps(), 60);
}

#[test]
fn test_purge_is_monotonic() {
    let clock = Arc::new(FakeClock::new());
    let mut window = window(5, clock.clone());

    for _ in 0..5 {
        window.admit().unwrap();
        window.record();

        clock.advance(Duration::from_secs(20));
    }

    window.admit().unwrap();

    // After any admission check nothing in the window
    // is older than the window length
    let cutoff = clock.now.get() - 60.0;

    assert!(window.oldest().unwrap() >= cutoff);
}

#[test]
fn test_wait_timeout_bounds_the_wait() {
    let clock = Arc::new(FakeClock::new());

    let mut window = window(1, clock.clone())
        .with_wait_timeout(Duration::from_secs(5));

    window.admit().unwrap();
    window.record();

    match window.admit() {
        Err(Error::ThrottleTimeout(timeout)) => assert_eq!(timeout, Duration::from_secs(5)),
        result => panic!("Expected throttle timeout, got {result:?}")
    }
}

#[test]
fn test_snapshot_restores_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("window.json");

    let clock = Arc::new(FakeClock::new());
    clock.advance(Duration::from_secs(1000));

    {
        let mut window = window(10, clock.clone())
            .with_snapshot(&path);

        window.admit().unwrap();
        window.record();

        clock.advance(Duration::from_secs(1));

        window.admit().unwrap();
        window.record();
    }

    let restored = RequestWindow::new(clock.clone())
        .with_quota(10, Duration::from_secs(60))
        .with_snapshot(&path);

    assert_eq!(restored.len(), 2);
    assert_eq!(restored.oldest(), Some(1000.0));
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("window.json");

    std::fs::write(&path, "not json at all").unwrap();

    let clock = Arc::new(FakeClock::new());

    let window = RequestWindow::new(clock)
        .with_snapshot(&path);

    assert!(window.is_empty());
}

#[test]
fn test_missing_snapshot_starts_empty() {
    let clock = Arc::new(FakeClock::new());

    let window = RequestWindow::new(clock)
        .with_snapshot("/nonexistent/window.json");

    assert!(window.is_empty());
}
