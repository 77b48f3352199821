//! Integration tests for the archive client using wiremock
//!
//! These tests validate caching, forced refresh, rate limiting, and error
//! classification against a mock archive server.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    archive_config, contest_json, failed_envelope, mount_contest_list, ok_envelope,
    submission_json,
};
use ilgwa::archive::{ArchiveClient, ArchiveError};

fn client(server: &MockServer, min_interval_ms: u64) -> ArchiveClient {
    ArchiveClient::new(&archive_config(&server.uri(), min_interval_ms)).unwrap()
}

#[tokio::test]
async fn test_recent_contests_filters_and_sorts() {
    let server = MockServer::start().await;

    // One running contest and one outside the recency window
    let mut running = contest_json(102, 0);
    running["phase"] = json!("CODING");
    let stale = contest_json(99, 365);

    mount_contest_list(
        &server,
        json!([contest_json(100, 30), contest_json(101, 5), running, stale]),
    )
    .await;

    let client = client(&server, 10);
    let contests = client.recent_contests(10, 180).await.unwrap();

    let ids: Vec<i64> = contests.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![101, 100]);
}

#[tokio::test]
async fn test_cache_hit_issues_no_second_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!([submission_json(1, 100, "A", "OK")]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 10);

    let first = client.user_submissions("alice", 1, 1000, false).await.unwrap();
    let second = client.user_submissions("alice", 1, 1000, false).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    // expect(1) verifies the second read came from cache
}

#[tokio::test]
async fn test_force_refresh_issues_fresh_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, 10);

    client.user_submissions("alice", 1, 1000, false).await.unwrap();
    client.user_submissions("alice", 1, 1000, true).await.unwrap();
}

#[tokio::test]
async fn test_expired_entry_triggers_one_fresh_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = archive_config(&server.uri(), 10);
    config.cache_ttl_secs = 1;
    let client = ArchiveClient::new(&config).unwrap();

    client.user_submissions("alice", 1, 1000, false).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    client.user_submissions("alice", 1, 1000, false).await.unwrap();
}

#[tokio::test]
async fn test_invalidate_user_purges_cached_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, 10);

    client.user_submissions("alice", 1, 1000, false).await.unwrap();
    let cleared = client.invalidate_user("alice");
    assert_eq!(cleared, 1);

    // Cache entry is gone, so this goes back on the wire
    client.user_submissions("alice", 1, 1000, false).await.unwrap();
}

#[tokio::test]
async fn test_distinct_params_are_distinct_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, 10);

    client.user_submissions("alice", 1, 1000, false).await.unwrap();
    client.user_submissions("bob", 1, 1000, false).await.unwrap();
}

#[tokio::test]
async fn test_remote_rejection_carries_archive_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(failed_envelope("handle: User with handle nobody not found")),
        )
        .mount(&server)
        .await;

    let client = client(&server, 10);
    let err = client
        .user_submissions("nobody", 1, 1000, false)
        .await
        .unwrap_err();

    match err {
        ArchiveError::Remote(message) => assert!(message.contains("nobody")),
        other => panic!("Expected Remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bare_server_error_maps_to_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contest.list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server, 10);
    let err = client.recent_contests(10, 180).await.unwrap_err();

    assert!(matches!(err, ArchiveError::Server(503)));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contest.list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!([])))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    // request_timeout_secs is 2 in the fixture config
    let client = client(&server, 10);
    let err = client.recent_contests(10, 180).await.unwrap_err();

    assert!(matches!(err, ArchiveError::Timeout));
}

// Wall-clock assertion; keep other tests from competing for the runtime
#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn test_concurrent_misses_are_spaced_by_min_interval() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(3)
        .mount(&server)
        .await;

    let min_interval = Duration::from_millis(150);
    let client = Arc::new(client(&server, min_interval.as_millis() as u64));

    let started = Instant::now();
    let handles: Vec<_> = ["alice", "bob", "carol"]
        .into_iter()
        .map(|handle| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.user_submissions(handle, 1, 1000, false).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Three cache-missing fetches: the last waits at least two intervals
    let elapsed = started.elapsed();
    assert!(
        elapsed >= min_interval * 2,
        "calls were not spaced: {elapsed:?}"
    );
}

#[tokio::test]
#[serial]
async fn test_cache_hits_skip_the_rate_gate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    // A long interval would make any second outbound call visible
    let client = client(&server, 60_000);
    client.user_submissions("alice", 1, 1000, false).await.unwrap();

    let started = Instant::now();
    for _ in 0..5 {
        client.user_submissions("alice", 1, 1000, false).await.unwrap();
    }
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_validate_handle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user.info"))
        .and(query_param("handles", "alice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_envelope(json!([{"handle": "alice"}]))),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user.info"))
        .and(query_param("handles", "nobody"))
        .respond_with(ResponseTemplate::new(400).set_body_json(failed_envelope("not found")))
        .mount(&server)
        .await;

    let client = client(&server, 10);

    assert!(client.validate_handle("alice").await.unwrap());
    assert!(!client.validate_handle("nobody").await.unwrap());
}
