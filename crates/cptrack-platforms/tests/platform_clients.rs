//! Integration tests for the four platform clients.
//!
//! Each test stands up a `wiremock` server and points one client at it, so no
//! real network traffic is made.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cptrack_platforms::atcoder::AtcoderClient;
use cptrack_platforms::codechef::CodechefClient;
use cptrack_platforms::codeforces::CodeforcesClient;
use cptrack_platforms::leetcode::LeetcodeClient;
use cptrack_platforms::{ErrorKind, PlatformError};

fn http() -> Client {
    Client::builder()
        .user_agent("cptrack-test/0.1")
        .build()
        .expect("failed to build test client")
}

// ---------------------------------------------------------------------------
// Codeforces
// ---------------------------------------------------------------------------

#[tokio::test]
async fn codeforces_fetch_normalizes_user_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .and(query_param("handles", "tourist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{
                "handle": "tourist",
                "rating": 3757,
                "maxRating": 4229,
                "rank": "legendary grandmaster",
                "maxRank": "tourist"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CodeforcesClient::new(http(), &server.uri()).expect("client");
    let stats = client.fetch("tourist").await.expect("fetch");

    assert_eq!(stats.username, "tourist");
    assert_eq!(stats.rating, 3757);
    assert_eq!(stats.max_rating, 4229);
    assert_eq!(stats.rank, "legendary grandmaster");
    assert_eq!(stats.max_rank, "tourist");
    assert_eq!(stats.problems_solved, 0);
    assert_eq!(stats.contests_participated, 0);
}

#[tokio::test]
async fn codeforces_unrated_user_gets_sentinels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": [{"handle": "newbie_123"}]
        })))
        .mount(&server)
        .await;

    let client = CodeforcesClient::new(http(), &server.uri()).expect("client");
    let stats = client.fetch("newbie_123").await.expect("fetch");

    assert_eq!(stats.rating, 0);
    assert_eq!(stats.max_rating, 0);
    assert_eq!(stats.rank, "unrated");
    assert_eq!(stats.max_rank, "unrated");
}

#[tokio::test]
async fn codeforces_failed_envelope_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "FAILED",
            "comment": "handles: User with handle ghost_zz not found"
        })))
        .mount(&server)
        .await;

    let client = CodeforcesClient::new(http(), &server.uri()).expect("client");
    let err = client.fetch("ghost_zz").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound, "got: {err:?}");
}

#[tokio::test]
async fn codeforces_server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user.info"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = CodeforcesClient::new(http(), &server.uri()).expect("client");
    let err = client.fetch("tourist").await.unwrap_err();

    assert!(
        matches!(err, PlatformError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// CodeChef
// ---------------------------------------------------------------------------

#[tokio::test]
async fn codechef_fetch_coerces_string_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/handle/gennady"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "currentRating": "2012",
            "globalRank": "153",
            "countryRank": 12,
            "stars": "5★"
        })))
        .mount(&server)
        .await;

    let client = CodechefClient::new(http(), &server.uri()).expect("client");
    let stats = client.fetch("gennady").await.expect("fetch");

    assert_eq!(stats.username, "gennady");
    assert_eq!(stats.rating, 2012);
    assert_eq!(stats.global_rank, 153);
    assert_eq!(stats.country_rank, 12);
    assert_eq!(stats.stars, "5★");
    assert_eq!(stats.problems_solved, 0);
}

#[tokio::test]
async fn codechef_failed_status_surfaces_upstream_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/handle/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "message": "Invalid username"
        })))
        .mount(&server)
        .await;

    let client = CodechefClient::new(http(), &server.uri()).expect("client");
    let err = client.fetch("ghost").await.unwrap_err();

    assert!(
        matches!(err, PlatformError::UpstreamFailure { message: Some(ref m) } if m == "Invalid username"),
        "got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// AtCoder
// ---------------------------------------------------------------------------

const PROFILE_HTML: &str = r#"
<html><body>
  <a class="username" href="/users/chokudai"><span class="user-orange">chokudai</span></a>
  <table class="dl-table">
    <tr><th>Rank</th><td>842nd</td></tr>
    <tr><th>Rating</th><td><span class="user-orange">2105</span></td></tr>
  </table>
</body></html>
"#;

async fn mount_atcoder_profile(server: &MockServer, handle: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{handle}")))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

#[tokio::test]
async fn atcoder_fetch_combines_page_history_and_accepted_count() {
    let server = MockServer::start().await;
    mount_atcoder_profile(&server, "chokudai", PROFILE_HTML).await;
    Mock::given(method("GET"))
        .and(path("/users/chokudai/history/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"IsRated": true, "NewRating": 2000, "ContestName": "ABC 300"},
            {"IsRated": true, "NewRating": 2105, "ContestName": "ARC 160"},
            {"IsRated": false, "NewRating": 2105, "ContestName": "AHC 020"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/problems/atcoder-api/v3/user/ac_rank"))
        .and(query_param("user", "chokudai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1234, "rank": 50})))
        .mount(&server)
        .await;

    let client = AtcoderClient::new(
        http(),
        &server.uri(),
        &format!("{}/problems", server.uri()),
    )
    .expect("client");
    let stats = client.fetch("chokudai").await.expect("fetch");

    assert_eq!(stats.username, "chokudai");
    assert_eq!(stats.rating, 2105);
    assert_eq!(stats.rank, "842nd");
    assert_eq!(stats.contests_participated, 3);
    assert_eq!(stats.problems_solved, 1234);
}

#[tokio::test]
async fn atcoder_secondary_reads_degrade_to_zero() {
    let server = MockServer::start().await;
    mount_atcoder_profile(&server, "chokudai", PROFILE_HTML).await;
    // History and ac_rank are left unmounted, so wiremock answers 404.

    let client = AtcoderClient::new(
        http(),
        &server.uri(),
        &format!("{}/problems", server.uri()),
    )
    .expect("client");
    let stats = client.fetch("chokudai").await.expect("fetch");

    assert_eq!(stats.rating, 2105);
    assert_eq!(stats.contests_participated, 0);
    assert_eq!(stats.problems_solved, 0);
}

#[tokio::test]
async fn atcoder_profile_page_is_requested_in_english() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/chokudai"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let client = AtcoderClient::new(
        http(),
        &server.uri(),
        &format!("{}/problems", server.uri()),
    )
    .expect("client");
    let stats = client.fetch("chokudai").await.expect("fetch");

    assert_eq!(stats.rank, "842nd");
}

#[tokio::test]
async fn atcoder_missing_profile_does_not_wait_for_secondary_reads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/ghost/history/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = AtcoderClient::new(
        http(),
        &server.uri(),
        &format!("{}/problems", server.uri()),
    )
    .expect("client");
    let started = Instant::now();
    let err = client.fetch("ghost").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound, "got: {err:?}");
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn atcoder_missing_profile_is_not_found() {
    let server = MockServer::start().await;

    let client = AtcoderClient::new(
        http(),
        &server.uri(),
        &format!("{}/problems", server.uri()),
    )
    .expect("client");
    let err = client.fetch("ghost").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound, "got: {err:?}");
}

// ---------------------------------------------------------------------------
// LeetCode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn leetcode_fetch_posts_query_with_username_variable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({"variables": {"username": "neal_wu"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "matchedUser": {
                    "username": "neal_wu",
                    "profile": {"realName": "Neal Wu", "ranking": 1, "reputation": 0, "starRating": 3},
                    "submitStats": {"acSubmissionNum": [
                        {"difficulty": "All", "count": 17},
                        {"difficulty": "Easy", "count": 10},
                        {"difficulty": "Medium", "count": 5},
                        {"difficulty": "Hard", "count": 2}
                    ]},
                    "contestBadge": null
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        LeetcodeClient::new(http(), &format!("{}/graphql", server.uri())).expect("client");
    let stats = client.fetch("neal_wu").await.expect("fetch");

    assert_eq!(stats.username, "neal_wu");
    assert_eq!(stats.problems_solved, 17);
    assert_eq!(stats.easy_solved, 10);
    assert_eq!(stats.medium_solved, 5);
    assert_eq!(stats.hard_solved, 2);
    assert_eq!(stats.rating, 300);
    assert_eq!(stats.max_rating, 300);
    assert_eq!(stats.contests_attended, 0);
}

#[tokio::test]
async fn leetcode_null_matched_user_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"matchedUser": null}})),
        )
        .mount(&server)
        .await;

    let client =
        LeetcodeClient::new(http(), &format!("{}/graphql", server.uri())).expect("client");
    let err = client.fetch("ghost").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound, "got: {err:?}");
}

#[tokio::test]
async fn leetcode_response_without_data_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "rate limited"}]
        })))
        .mount(&server)
        .await;

    let client =
        LeetcodeClient::new(http(), &format!("{}/graphql", server.uri())).expect("client");
    let err = client.fetch("neal_wu").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedUpstreamResponse, "got: {err:?}");
}
