//! Common test utilities
//!
//! Fixture builders for archive payloads and a mock archive server built on
//! wiremock, shared by the client and generator integration tests.

#![allow(dead_code)]

use chrono::Utc;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ilgwa::config::{ArchiveConfig, GeneratorConfig};

/// Archive config pointing at a mock server, with a short rate interval
pub fn archive_config(base_url: &str, min_interval_ms: u64) -> ArchiveConfig {
    ArchiveConfig {
        base_url: base_url.to_string(),
        min_interval_ms,
        cache_ttl_secs: 300,
        request_timeout_secs: 2,
        user_agent: String::from("ilgwa-test"),
    }
}

/// Generator config with a given contest window
pub fn generator_config(contest_window: usize) -> GeneratorConfig {
    GeneratorConfig {
        contest_window,
        recency_days: 180,
        submission_page_size: 1000,
    }
}

/// Successful archive envelope wrapping `result`
pub fn ok_envelope(result: Value) -> Value {
    json!({ "status": "OK", "result": result })
}

/// Archive rejection envelope with a comment
pub fn failed_envelope(comment: &str) -> Value {
    json!({ "status": "FAILED", "comment": comment })
}

/// A finished contest that started `days_ago` days in the past
pub fn contest_json(id: i64, days_ago: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Test Round {id}"),
        "phase": "FINISHED",
        "startTimeSeconds": Utc::now().timestamp() - days_ago * 86_400,
    })
}

/// A problem entry as returned inside contest standings
pub fn problem_json(contest_id: i64, index: &str, rating: u32) -> Value {
    json!({
        "contestId": contest_id,
        "index": index,
        "name": format!("Problem {index}"),
        "rating": rating,
    })
}

/// A problem set covering all three bands, as standings problems
pub fn full_band_problems(contest_id: i64) -> Value {
    json!([
        problem_json(contest_id, "A", 900),
        problem_json(contest_id, "B", 1200),
        problem_json(contest_id, "C", 1550),
    ])
}

/// A submission history entry
pub fn submission_json(id: i64, contest_id: i64, index: &str, verdict: &str) -> Value {
    json!({
        "id": id,
        "contestId": contest_id,
        "problem": { "contestId": contest_id, "index": index, "name": format!("Problem {index}") },
        "verdict": verdict,
    })
}

/// Mount the contest listing endpoint
pub async fn mount_contest_list(server: &MockServer, contests: Value) {
    Mock::given(method("GET"))
        .and(path("/contest.list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(contests)))
        .mount(server)
        .await;
}

/// Mount the standings endpoint for one contest
pub async fn mount_standings(server: &MockServer, contest_id: i64, problems: Value) {
    Mock::given(method("GET"))
        .and(path("/contest.standings"))
        .and(query_param("contestId", contest_id.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!({ "problems": problems }))),
        )
        .mount(server)
        .await;
}

/// Mount a failing standings endpoint for one contest
pub async fn mount_standings_failure(server: &MockServer, contest_id: i64, status: u16) {
    Mock::given(method("GET"))
        .and(path("/contest.standings"))
        .and(query_param("contestId", contest_id.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount the submission history endpoint for a handle
pub async fn mount_submissions(server: &MockServer, handle: &str, submissions: Value) {
    Mock::given(method("GET"))
        .and(path("/user.status"))
        .and(query_param("handle", handle))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(submissions)))
        .mount(server)
        .await;
}
