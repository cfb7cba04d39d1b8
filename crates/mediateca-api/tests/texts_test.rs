mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, pdf_bytes, setup_test_app, upload_form};
use serde_json::json;

#[tokio::test]
async fn test_upload_text_sets_size_to_byte_length() {
    let app = setup_test_app().await;
    let client = app.client();

    let payload = pdf_bytes();
    let response = client
        .post(&api_path("/texts"))
        .multipart(upload_form(
            "A study of stacks",
            "978-0-00-000000-2",
            "study.pdf",
            "application/pdf",
            payload.clone(),
        ))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["file_size"], json!(payload.len()));
    assert_eq!(body["category"], json!("article"));
    assert_eq!(body["filename"], json!("study.pdf"));
    // Default category places the file under articles/
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("http://localhost:3000/texts/articles/"));
}

#[tokio::test]
async fn test_upload_text_category_picks_subdirectory() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = upload_form(
        "Whole book scan",
        "31197231668866",
        "tome.pdf",
        "application/pdf",
        pdf_bytes(),
    )
    .add_text("text_type", "book_whole");

    let response = client.post(&api_path("/texts")).multipart(form).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["category"], json!("book_whole"));
    assert_eq!(
        body["url"],
        json!("http://localhost:3000/texts/books-whole/tome.pdf")
    );
}

#[tokio::test]
async fn test_colliding_filenames_resolve_to_distinct_paths() {
    let app = setup_test_app().await;
    let client = app.client();

    let mut urls = Vec::new();
    for identifier in ["copy-1", "copy-2", "copy-3"] {
        let response = client
            .post(&api_path("/texts"))
            .multipart(upload_form(
                "Colliding",
                identifier,
                "report.pdf",
                "application/pdf",
                pdf_bytes(),
            ))
            .await;
        assert_eq!(response.status_code(), 200);
        let body: serde_json::Value = response.json();
        urls.push(body["url"].as_str().unwrap().to_string());
    }

    assert_eq!(urls[0], "http://localhost:3000/texts/articles/report.pdf");
    assert_eq!(urls[1], "http://localhost:3000/texts/articles/report-1.pdf");
    assert_eq!(urls[2], "http://localhost:3000/texts/articles/report-2.pdf");
}

#[tokio::test]
async fn test_upload_text_rejects_masquerading_payload() {
    let app = setup_test_app().await;
    let client = app.client();

    // mp3 bytes with a pdf name and content type
    let response = client
        .post(&api_path("/texts"))
        .multipart(upload_form(
            "Not a pdf",
            "x",
            "fake.pdf",
            "application/pdf",
            b"ID3\x04\x00\x00".to_vec(),
        ))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_text_requires_title() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = MultipartForm::new().add_text("identifier", "no-title").add_part(
        "file",
        Part::bytes(pdf_bytes())
            .file_name("orphan.pdf")
            .mime_type("application/pdf"),
    );
    let response = client.post(&api_path("/texts")).multipart(form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_text_category_is_immutable() {
    let app = setup_test_app().await;
    let client = app.client();

    let form = upload_form(
        "Fixed category",
        "imm-1",
        "fixed.pdf",
        "application/pdf",
        pdf_bytes(),
    )
    .add_text("text_type", "book_excerpt");
    let created: serde_json::Value = client
        .post(&api_path("/texts"))
        .multipart(form)
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    // Changing the category is rejected
    let response = client
        .patch(&api_path(&format!("/texts/{}", id)))
        .json(&json!({
            "title": "Fixed category",
            "identifier": "imm-1",
            "category": "article"
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Metadata updates that keep (or restate) the category are fine
    let response = client
        .patch(&api_path(&format!("/texts/{}", id)))
        .json(&json!({
            "title": "Renamed",
            "identifier": "imm-1",
            "category": "book_excerpt"
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], json!("Renamed"));
    assert_eq!(body["category"], json!("book_excerpt"));
}

#[tokio::test]
async fn test_delete_text_removes_stored_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let created: serde_json::Value = client
        .post(&api_path("/texts"))
        .multipart(upload_form(
            "Ephemeral",
            "del-1",
            "gone.pdf",
            "application/pdf",
            pdf_bytes(),
        ))
        .await
        .json();
    let id: uuid::Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let key = helpers::upload_storage_key(&app, id).await;
    assert!(app.storage.exists(&key).await.unwrap());

    let response = client.delete(&api_path(&format!("/texts/{}", id))).await;
    assert_eq!(response.status_code(), 204);

    assert!(!app.storage.exists(&key).await.unwrap());
    let response = client.get(&api_path(&format!("/texts/{}", id))).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_get_text_not_found() {
    let app = setup_test_app().await;
    let client = app.client();

    let fake_id = uuid::Uuid::new_v4();
    let response = client.get(&api_path(&format!("/texts/{}", fake_id))).await;
    assert_eq!(response.status_code(), 404);
}
