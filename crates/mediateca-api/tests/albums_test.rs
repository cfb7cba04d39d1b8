mod helpers;

use helpers::{api_path, mp3_bytes, setup_test_app, upload_form};
use serde_json::json;

async fn create_album(app: &helpers::TestApp, title: &str, identifier: &str) -> uuid::Uuid {
    let response = app
        .client()
        .post(&api_path("/audio-albums"))
        .json(&json!({ "title": title, "identifier": identifier }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_create_album_has_no_file_and_no_size() {
    let app = setup_test_app().await;

    let album_id = create_album(&app, "Concert 1978", "lp-0012").await;

    let body: serde_json::Value = app
        .client()
        .get(&api_path(&format!("/audio-albums/{}", album_id)))
        .await
        .json();
    assert_eq!(body["title"], json!("Concert 1978"));
    assert!(body["tracks"].as_array().unwrap().is_empty());

    let storage_key: Option<String> =
        sqlx::query_scalar("SELECT storage_key FROM uploads WHERE id = $1")
            .bind(album_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert!(storage_key.is_none());
}

#[tokio::test]
async fn test_upload_track_into_album() {
    let app = setup_test_app().await;
    let client = app.client();

    let album_id = create_album(&app, "Concert 1978", "lp-0012").await;

    let response = client
        .post(&api_path(&format!("/audio-albums/{}/tracks", album_id)))
        .multipart(upload_form(
            "Opening",
            "lp-0012-a1",
            "opening.mp3",
            "audio/mpeg",
            mp3_bytes(),
        ))
        .await;
    assert_eq!(response.status_code(), 200);
    let track: serde_json::Value = response.json();
    assert_eq!(track["album_id"], json!(album_id.to_string()));
    // Track sizes are not captured
    assert!(track.get("file_size").is_none());

    let album: serde_json::Value = client
        .get(&api_path(&format!("/audio-albums/{}", album_id)))
        .await
        .json();
    assert_eq!(album["tracks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_track_to_missing_album_is_404() {
    let app = setup_test_app().await;
    let client = app.client();

    let fake_id = uuid::Uuid::new_v4();
    let response = client
        .post(&api_path(&format!("/audio-albums/{}/tracks", fake_id)))
        .multipart(upload_form("T", "t-1", "t.mp3", "audio/mpeg", mp3_bytes()))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_album_cascades_to_tracks() {
    let app = setup_test_app().await;
    let client = app.client();

    let album_id = create_album(&app, "Cascade", "lp-0013").await;

    let mut track_ids = Vec::new();
    for (n, name) in ["one.mp3", "two.mp3"].iter().enumerate() {
        let track: serde_json::Value = client
            .post(&api_path(&format!("/audio-albums/{}/tracks", album_id)))
            .multipart(upload_form(
                &format!("Track {}", n + 1),
                &format!("lp-0013-a{}", n + 1),
                name,
                "audio/mpeg",
                mp3_bytes(),
            ))
            .await
            .json();
        let id: uuid::Uuid = track["id"].as_str().unwrap().parse().unwrap();
        track_ids.push(id);
    }

    let track_key = helpers::upload_storage_key(&app, track_ids[0]).await;

    let response = client
        .delete(&api_path(&format!("/audio-albums/{}", album_id)))
        .await;
    assert_eq!(response.status_code(), 204);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM uploads WHERE album_id = $1")
        .bind(album_id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    // Cascaded children do not get file cleanup; the track file stays on disk
    assert!(app.storage.exists(&track_key).await.unwrap());
}

#[tokio::test]
async fn test_delete_single_track() {
    let app = setup_test_app().await;
    let client = app.client();

    let album_id = create_album(&app, "Single", "lp-0014").await;
    let track: serde_json::Value = client
        .post(&api_path(&format!("/audio-albums/{}/tracks", album_id)))
        .multipart(upload_form(
            "Only track",
            "lp-0014-a1",
            "only.mp3",
            "audio/mpeg",
            mp3_bytes(),
        ))
        .await
        .json();
    let track_id = track["id"].as_str().unwrap();

    let response = client.delete(&api_path(&format!("/tracks/{}", track_id))).await;
    assert_eq!(response.status_code(), 204);

    let album: serde_json::Value = client
        .get(&api_path(&format!("/audio-albums/{}", album_id)))
        .await
        .json();
    assert!(album["tracks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_album_rejects_blank_title() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post(&api_path("/audio-albums"))
        .json(&json!({ "title": "", "identifier": "lp-0015" }))
        .await;
    assert_eq!(response.status_code(), 400);
}
