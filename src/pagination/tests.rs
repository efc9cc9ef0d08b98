//! Tests for pagination module

use super::*;
use crate::config::ClientSettings;
use crate::error::Error;
use crate::http::{FetcherConfig, RecordingSleeper, RetryPolicy, RetryingFetcher};
use crate::types::Cursor;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn without_cursor(req: &Request) -> bool {
    !req.url.query_pairs().any(|(key, _)| key == "before")
}

fn paginator_for(server: &MockServer, max_attempts: u32) -> (CursorPaginator, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let fetcher_config = FetcherConfig::builder()
        .retry(RetryPolicy::new(max_attempts, Duration::from_millis(10), 2.0))
        .build();
    let fetcher = RetryingFetcher::with_config(fetcher_config)
        .unwrap()
        .with_sleeper(Arc::new(sleeper.clone()));
    let config = PaginatorConfig {
        base_url: format!("{}/v4/users", server.uri()),
        ..PaginatorConfig::default()
    };
    (CursorPaginator::new(fetcher, config), sleeper)
}

// ============================================================================
// Item Extraction
// ============================================================================

#[test_case(json!({"wishes": [{"id": 1}]}), "wishes", 1; "endpoint key")]
#[test_case(json!({"ratings": [{"id": 1}, {"id": 2}]}), "marks", 2; "other known key")]
#[test_case(json!({"data": [{"id": 1}], "meta": {}}), "wishes", 1; "data key")]
#[test_case(json!({"meta": {"page": {"items": [{"id": 1}]}}}), "wishes", 1; "nested first array")]
#[test_case(json!([{"id": 1}, {"id": 2}, {"id": 3}]), "wishes", 3; "top level array")]
#[test_case(json!({"wishes": []}), "wishes", 0; "empty list")]
#[test_case(json!({"total": 0}), "wishes", 0; "no list")]
#[test_case(json!("nope"), "wishes", 0; "scalar body")]
fn test_extract_items(body: serde_json::Value, endpoint: &str, expected: usize) {
    assert_eq!(extract_items(&body, endpoint).len(), expected);
}

#[test]
fn test_extract_items_prefers_endpoint_key() {
    let body = json!({"ratings": [{"id": 1}], "reviews": [{"id": 7}, {"id": 8}]});
    let items = extract_items(&body, "reviews");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 7);
}

#[test]
fn test_extract_items_skips_non_array_key() {
    let body = json!({"wishes": {"count": 2}, "data": [{"id": 5}]});
    assert_eq!(extract_items(&body, "wishes")[0]["id"], 5);
}

// ============================================================================
// Cursor Extraction
// ============================================================================

#[test_case(json!({"id": 999, "film": {"id": 1}}), Some(Cursor::Numeric(999)); "direct id")]
#[test_case(json!({"wish": {"id": "55"}, "film": {"id": 1}}), Some(Cursor::Numeric(55)); "wish id")]
#[test_case(json!({"film": {"id": 77}}), Some(Cursor::Numeric(77)); "film id")]
#[test_case(json!({"meta": [{"x": 1}, {"id": "abc"}]}), Some(Cursor::Raw("abc".into())); "deep id in array")]
#[test_case(json!({"id": null, "film": {"id": 3}}), Some(Cursor::Numeric(3)); "null id skipped")]
#[test_case(json!({"title": "no ids"}), None; "no id")]
#[test_case(json!(42), None; "scalar item")]
fn test_extract_cursor(item: serde_json::Value, expected: Option<Cursor>) {
    assert_eq!(extract_cursor(&item), expected);
}

// ============================================================================
// URL & Headers
// ============================================================================

#[test]
fn test_build_collection_url() {
    assert_eq!(
        build_collection_url("https://api.mubi.com/v4/users", "123", "wishes").unwrap(),
        "https://api.mubi.com/v4/users/123/wishes"
    );
    assert_eq!(
        build_collection_url("https://api.mubi.com/v4/users/", "123", "ratings").unwrap(),
        "https://api.mubi.com/v4/users/123/ratings"
    );
    assert_eq!(
        build_collection_url("https://api.mubi.com/v4/users", "a b/c", "wishes").unwrap(),
        "https://api.mubi.com/v4/users/a%20b%2Fc/wishes"
    );
    assert!(matches!(
        build_collection_url("not a url", "1", "wishes"),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_client_profile_headers() {
    let sweep = SweepRequest::new("1", "wishes")
        .country("US")
        .token(Some("secret".to_string()));
    let profile = ClientProfile::for_sweep(&ClientSettings::default(), "agent/1", &sweep);
    let headers = profile.headers();
    let get = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("client"), Some("web"));
    assert_eq!(get("client-country"), Some("US"));
    assert_eq!(get("User-Agent"), Some("agent/1"));
    assert_eq!(get("Authorization"), Some("Bearer secret"));
    assert_eq!(get("client-accept-video-codecs"), Some("h265,vp9,h264"));
    assert_eq!(
        get("anonymous_user_id"),
        Some(profile.anonymous_user_id().to_string().as_str())
    );
}

#[test]
fn test_client_profile_omits_empty_codecs_and_token() {
    let settings = ClientSettings {
        audio_codecs: String::new(),
        ..ClientSettings::default()
    };
    let sweep = SweepRequest::new("1", "wishes").token(Some("  ".to_string()));
    let headers = ClientProfile::for_sweep(&settings, "agent/1", &sweep).headers();

    assert!(!headers.iter().any(|(k, _)| k == "client-accept-audio-codecs"));
    assert!(!headers.iter().any(|(k, _)| k == "Authorization"));
}

#[test]
fn test_anonymous_user_id_differs_per_sweep() {
    let sweep = SweepRequest::new("1", "wishes");
    let a = ClientProfile::for_sweep(&ClientSettings::default(), "ua", &sweep);
    let b = ClientProfile::for_sweep(&ClientSettings::default(), "ua", &sweep);
    assert_ne!(a.anonymous_user_id(), b.anonymous_user_id());
}

// ============================================================================
// Page Processing
// ============================================================================

#[test]
fn test_process_page_continue() {
    let mut state = PaginationState::new();
    let page = vec![json!({"id": 1}), json!({"id": 2})];

    let next = CursorPaginator::process_page(&page, &mut state);
    assert_eq!(next, NextPage::Continue(Cursor::Numeric(2)));
    assert_eq!(state.cursor, Some(Cursor::Numeric(2)));
    assert_eq!(state.pages_fetched, 1);
    assert_eq!(state.total_fetched, 2);
    assert!(!state.done);
}

#[test]
fn test_process_page_empty() {
    let mut state = PaginationState::new();
    let next = CursorPaginator::process_page(&[], &mut state);
    assert_eq!(next, NextPage::Done(StopReason::EmptyPage));
    assert!(state.done);
}

#[test]
fn test_process_page_no_cursor() {
    let mut state = PaginationState::new();
    let next = CursorPaginator::process_page(&[json!({"title": "x"})], &mut state);
    assert_eq!(next, NextPage::Done(StopReason::NoCursor));
    assert_eq!(state.total_fetched, 1);
}

#[test]
fn test_process_page_cursor_unchanged() {
    let mut state = PaginationState::new();
    state.set_cursor(Cursor::Numeric(5));
    let next = CursorPaginator::process_page(&[json!({"id": 5})], &mut state);
    assert!(next.is_done());
    assert_eq!(next, NextPage::Done(StopReason::CursorUnchanged));
}

// ============================================================================
// Sweeps Against a Mock Server
// ============================================================================

#[tokio::test]
async fn test_paginate_propagates_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(query_param("per_page", "2"))
        .and(without_cursor)
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"wishes": [{"id": 1000}, {"id": 999}]})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(query_param("before", "999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wishes": [{"id": 998}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(query_param("before", "998"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wishes": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (paginator, sleeper) = paginator_for(&mock_server, 2);
    let items = paginator
        .paginate(&SweepRequest::new("42", "wishes").per_page(2))
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|i| i["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1000, 999, 998]);
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::from_millis(50), Duration::from_millis(50)]
    );
}

#[tokio::test]
async fn test_paginate_stops_without_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (paginator, sleeper) = paginator_for(&mock_server, 2);
    let items = paginator
        .paginate(&SweepRequest::new("42", "ratings"))
        .await
        .unwrap();

    assert!(items.is_empty());
    assert!(sleeper.recorded().is_empty());
}

#[tokio::test]
async fn test_paginate_stops_on_repeated_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wishes": [{"id": 7}]})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (paginator, _) = paginator_for(&mock_server, 2);
    let items = paginator
        .paginate(&SweepRequest::new("42", "wishes"))
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_paginate_sends_client_headers_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(header("client", "web"))
        .and(header("client-country", "DE"))
        .and(header("Referer", "https://mubi.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wishes": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (paginator, _) = paginator_for(&mock_server, 1);
    paginator
        .paginate(&SweepRequest::new("42", "wishes").country("DE"))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert!(requests[0].headers.contains_key("anonymous_user_id"));
}

#[tokio::test]
async fn test_paginate_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wishes": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (paginator, _) = paginator_for(&mock_server, 1);
    paginator
        .paginate(&SweepRequest::new("42", "wishes").token(Some("tok".to_string())))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_paginate_failure_wrapped_with_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/ratings"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let (paginator, _) = paginator_for(&mock_server, 3);
    let err = paginator
        .paginate(&SweepRequest::new("42", "ratings"))
        .await
        .unwrap_err();

    match &err {
        Error::Pagination { endpoint, .. } => assert_eq!(endpoint, "ratings"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(err.root(), Error::Client { status: 404, .. }));
}

#[tokio::test]
async fn test_paginate_second_page_failure_discards_items() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(without_cursor)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"wishes": [{"id": 3}]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v4/users/42/wishes"))
        .and(query_param("before", "3"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (paginator, _) = paginator_for(&mock_server, 2);
    let err = paginator
        .paginate(&SweepRequest::new("42", "wishes"))
        .await
        .unwrap_err();

    assert!(matches!(err.root(), Error::Server { status: 500, .. }));
}
