use std::time::Duration;

use serde_json::{Value, json};
use vidscout_client::{DriveConfig, DriveUploader, YouTubeClient, YouTubeConfig};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_DRIVE_TOKEN: &str = "test-drive-token";

pub fn youtube_client(server: &MockServer) -> YouTubeClient {
    youtube_client_with_timeout(server, Duration::from_secs(5))
}

pub fn youtube_client_with_timeout(server: &MockServer, timeout: Duration) -> YouTubeClient {
    let config = YouTubeConfig::new(TEST_API_KEY)
        .unwrap()
        .with_base_url(format!("{}/youtube/v3", server.uri()))
        .with_timeout(timeout);
    YouTubeClient::new(config).unwrap()
}

pub fn drive_uploader(server: &MockServer) -> DriveUploader {
    let config = DriveConfig::new(TEST_DRIVE_TOKEN)
        .with_upload_url(format!("{}/upload/drive/v3/files", server.uri()));
    DriveUploader::new(config).unwrap()
}

/// A `videos.list` response body holding one video.
pub fn video_body(title: &str, channel: &str, views: &str, likes: &str, comments: &str) -> Value {
    json!({
        "kind": "youtube#videoListResponse",
        "items": [{
            "kind": "youtube#video",
            "snippet": {"title": title, "channelTitle": channel},
            "statistics": {
                "viewCount": views,
                "likeCount": likes,
                "commentCount": comments
            }
        }]
    })
}

/// A `search.list` response body with one hit per id.
pub fn search_body(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "kind": "youtube#searchResult",
                "id": {"kind": "youtube#video", "videoId": id},
                "snippet": {
                    "title": format!("Video {id}"),
                    "channelTitle": "Test Channel",
                    "publishedAt": "2024-05-01T12:00:00Z"
                }
            })
        })
        .collect();
    json!({ "kind": "youtube#searchListResponse", "items": items })
}
