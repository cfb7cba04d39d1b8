mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, mp4_bytes, setup_test_app, upload_form, vtt_bytes};
use serde_json::json;

fn vtt_form(kind: &str, filename: &str) -> MultipartForm {
    MultipartForm::new().add_text("kind", kind).add_part(
        "file",
        Part::bytes(vtt_bytes()).file_name(filename).mime_type("text/vtt"),
    )
}

#[tokio::test]
async fn test_upload_video_sets_size_to_byte_length() {
    let app = setup_test_app().await;
    let client = app.client();

    let payload = mp4_bytes();
    let response = client
        .post(&api_path("/videos"))
        .multipart(upload_form(
            "Oral history interview",
            "vhs-0042",
            "interview.mp4",
            "video/mp4",
            payload.clone(),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["file_size"], json!(payload.len()));
    let id = body["id"].as_str().unwrap();
    assert_eq!(
        body["url"],
        json!(format!("http://localhost:3000/videos/{}", id))
    );
}

#[tokio::test]
async fn test_upload_video_rejects_non_mp4() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/videos"))
        .multipart(upload_form(
            "Not a video",
            "x",
            "fake.mp4",
            "video/mp4",
            b"%PDF-1.4 nope".to_vec(),
        ))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_vtt_track_lifecycle() {
    let app = setup_test_app().await;
    let client = app.client();

    let video: serde_json::Value = client
        .post(&api_path("/videos"))
        .multipart(upload_form(
            "Captioned",
            "vtt-1",
            "captioned.mp4",
            "video/mp4",
            mp4_bytes(),
        ))
        .await
        .json();
    let video_id = video["id"].as_str().unwrap().to_string();

    let response = client
        .post(&api_path(&format!("/videos/{}/vtt-tracks", video_id)))
        .multipart(vtt_form("captions", "captions_en.vtt"))
        .await;
    assert_eq!(response.status_code(), 200);
    let track: serde_json::Value = response.json();
    assert_eq!(track["kind"], json!("captions"));
    assert_eq!(track["video_id"], json!(video_id));

    let listed: serde_json::Value = client
        .get(&api_path(&format!("/videos/{}/vtt-tracks", video_id)))
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let track_id = track["id"].as_str().unwrap();
    let response = client
        .delete(&api_path(&format!("/vtt-tracks/{}", track_id)))
        .await;
    assert_eq!(response.status_code(), 204);

    let listed: serde_json::Value = client
        .get(&api_path(&format!("/videos/{}/vtt-tracks", video_id)))
        .await
        .json();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_vtt_track_requires_known_kind() {
    let app = setup_test_app().await;
    let client = app.client();

    let video: serde_json::Value = client
        .post(&api_path("/videos"))
        .multipart(upload_form("V", "vtt-2", "v.mp4", "video/mp4", mp4_bytes()))
        .await
        .json();
    let video_id = video["id"].as_str().unwrap();

    let response = client
        .post(&api_path(&format!("/videos/{}/vtt-tracks", video_id)))
        .multipart(vtt_form("karaoke", "k.vtt"))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_vtt_track_for_missing_video_is_404() {
    let app = setup_test_app().await;
    let client = app.client();

    let fake_id = uuid::Uuid::new_v4();
    let response = client
        .post(&api_path(&format!("/videos/{}/vtt-tracks", fake_id)))
        .multipart(vtt_form("subtitles", "s.vtt"))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_video_cascades_to_vtt_tracks() {
    let app = setup_test_app().await;
    let client = app.client();

    let video: serde_json::Value = client
        .post(&api_path("/videos"))
        .multipart(upload_form(
            "Cascade target",
            "vtt-3",
            "cascade.mp4",
            "video/mp4",
            mp4_bytes(),
        ))
        .await
        .json();
    let video_id: uuid::Uuid = video["id"].as_str().unwrap().parse().unwrap();

    for kind in ["captions", "subtitles", "descriptions"] {
        let response = client
            .post(&api_path(&format!("/videos/{}/vtt-tracks", video_id)))
            .multipart(vtt_form(kind, &format!("{}.vtt", kind)))
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let key = helpers::upload_storage_key(&app, video_id).await;
    assert!(app.storage.exists(&key).await.unwrap());

    let response = client
        .delete(&api_path(&format!("/videos/{}", video_id)))
        .await;
    assert_eq!(response.status_code(), 204);

    // Video file cleaned up, child rows cascade-deleted
    assert!(!app.storage.exists(&key).await.unwrap());
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM video_vtt_tracks WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}
