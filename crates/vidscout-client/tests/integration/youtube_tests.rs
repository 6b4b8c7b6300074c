use std::time::Duration;

use serde_json::json;
use vidscout_core::error::AppError;
use vidscout_core::models::ItemId;
use vidscout_core::traits::{DetailFetcher, SearchProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn search_maps_hits_and_keeps_idless_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("part", "snippet"))
        .and(query_param("type", "video"))
        .and(query_param("q", "rust async"))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "vid1"},
                    "snippet": {"title": "Tokio", "channelTitle": "Rustaceans", "publishedAt": "2024-01-02T00:00:00Z"}
                },
                {
                    "id": {"kind": "youtube#channel", "channelId": "UCabc"},
                    "snippet": {"title": "Some channel"}
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = youtube_client(&server).search("rust async", 10).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, Some(ItemId::from("vid1")));
    assert_eq!(results[0].title.as_deref(), Some("Tokio"));
    assert_eq!(results[0].channel.as_deref(), Some("Rustaceans"));
    assert_eq!(results[0].published_at.as_deref(), Some("2024-01-02T00:00:00Z"));
    assert!(results[1].id.is_none());
}

#[tokio::test]
async fn search_clamps_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["a"])))
        .expect(1)
        .mount(&server)
        .await;

    let results = youtube_client(&server).search("q", 500).await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn search_without_items_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "youtube#searchListResponse"})))
        .mount(&server)
        .await;

    let results = youtube_client(&server).search("q", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn rejected_key_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid.", "errors": [{"reason": "badRequest"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Forbidden", "errors": [{"reason": "forbidden"}]}
        })))
        .mount(&server)
        .await;

    let client = youtube_client(&server);

    let err = client.search("q", 5).await.unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)), "{err:?}");
    assert!(!err.to_string().contains(TEST_API_KEY));

    let err = client.fetch(&ItemId::from("x")).await.unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)), "{err:?}");
}

#[tokio::test]
async fn fetch_returns_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("part", "statistics,snippet"))
        .and(query_param("id", "vid1"))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(video_body("Tokio", "Rustaceans", "1500", "120", "7")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let detail = youtube_client(&server)
        .fetch(&ItemId::from("vid1"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(detail.title.as_deref(), Some("Tokio"));
    assert_eq!(detail.channel.as_deref(), Some("Rustaceans"));
    assert_eq!(detail.views, Some(1500));
    assert_eq!(detail.likes, Some(120));
    assert_eq!(detail.comments, Some(7));
}

#[tokio::test]
async fn fetch_with_empty_items_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let detail = youtube_client(&server)
        .fetch(&ItemId::from("deleted"))
        .await
        .unwrap();
    assert!(detail.is_none());
}

#[tokio::test]
async fn fetch_server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = youtube_client(&server)
        .fetch(&ItemId::from("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::HttpError(ref m) if m.contains("500")), "{err:?}");
}

#[tokio::test]
async fn fetch_malformed_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = youtube_client(&server)
        .fetch(&ItemId::from("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SerializationError(_)), "{err:?}");
}

#[tokio::test]
async fn fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(video_body("slow", "c", "1", "1", "1"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = youtube_client_with_timeout(&server, Duration::from_secs(1));
    let err = client.fetch(&ItemId::from("x")).await.unwrap_err();
    assert!(matches!(err, AppError::Timeout(1)), "{err:?}");
}
