use serde_json::json;
use vidscout_core::aggregate::AggregatorConfig;
use vidscout_core::export::ExportOutcome;
use vidscout_core::pipeline::ReportService;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::*;

async fn mount_video(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("id", id))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn failed_lookup_is_dropped_and_the_rest_is_uploaded() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["A", "B", "C"])))
        .expect(1)
        .mount(&server)
        .await;
    mount_video(
        &server,
        "A",
        ResponseTemplate::new(200).set_body_json(video_body("Alpha", "Chan", "10", "2", "1")),
    )
    .await;
    mount_video(&server, "B", ResponseTemplate::new(503)).await;
    mount_video(
        &server,
        "C",
        ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"snippet": {"title": "Gamma"}, "statistics": {"viewCount": "30"}}]
        })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "drive-42"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = youtube_client(&server);
    let svc = ReportService::with_uploader(
        client.clone(),
        client,
        AggregatorConfig::default(),
        drive_uploader(&server),
    );

    let report = svc
        .run("anything", 50, &dir.path().join("videos"))
        .await
        .unwrap();

    assert_eq!(report.found, 3);
    assert_eq!(report.fetched, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.remote_id.as_deref(), Some("drive-42"));

    let written = dir.path().join("videos.csv");
    assert_eq!(
        report.export,
        ExportOutcome::Written {
            path: written.clone(),
            rows: 2
        }
    );
    let contents = std::fs::read_to_string(&written).unwrap();
    assert_eq!(
        contents,
        "Title,Channel,Views,Likes,Comments\nAlpha,Chan,10,2,1\nGamma,N/A,30,0,0\n"
    );
}
