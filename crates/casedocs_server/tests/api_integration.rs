//! Integration tests for the folder HTTP API.

mod support;

use axum::http::{header, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use casedocs_server::models::document::Classification;
use casedocs_server::models::folder::Folder;
use serde_json::json;
use support::{
    authorized, setup_db_server, setup_mock_server, with_service_token, with_user,
    PROBATE_TOKEN, USER_ID,
};
use uuid::Uuid;

const RANDOM_UUID: &str = "11111111-1111-1111-1111-111111111111";

fn random_uuid() -> Uuid {
    Uuid::parse_str(RANDOM_UUID).expect("uuid")
}

fn stored_folder(id: Uuid) -> Folder {
    let mut folder = Folder::new(Some("Case bundle".to_string()), Some(USER_ID.to_string()));
    folder.id = id;
    folder
}

fn test_file_form() -> MultipartForm {
    MultipartForm::new()
        .add_part(
            "files",
            Part::bytes(b"hello world".as_slice())
                .file_name("test.txt")
                .mime_type("text/plain"),
        )
        .add_text("classification", "PUBLIC")
}

#[tokio::test]
async fn get_existing_folder_returns_ok_with_body() {
    let (server, service) = setup_mock_server();
    let folder = stored_folder(random_uuid());
    service.insert(folder.clone());

    let response = authorized(server.get(&format!("/folders/{}", RANDOM_UUID))).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], RANDOM_UUID);
    assert_eq!(body["name"], "Case bundle");
    assert_eq!(service.find_calls(), vec![random_uuid()]);
}

#[tokio::test]
async fn get_missing_folder_returns_not_found_without_body() {
    let (server, service) = setup_mock_server();

    let response = authorized(server.get(&format!("/folders/{}", RANDOM_UUID))).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().is_empty());
    assert_eq!(service.find_calls(), vec![random_uuid()]);
}

#[tokio::test]
async fn get_with_non_uuid_id_returns_not_found() {
    let (server, service) = setup_mock_server();

    let response = authorized(server.get("/folders/not-a-uuid")).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(service.find_calls().is_empty());
}

#[tokio::test]
async fn post_folder_returns_ok_and_delegates_create() {
    let (server, service) = setup_mock_server();

    let response = authorized(server.post("/folders/"))
        .json(&json!({ "name": "Evidence" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Evidence");
    assert_eq!(body["createdBy"], USER_ID);

    let calls = service.create_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name.as_deref(), Some("Evidence"));
    assert_eq!(body["id"], calls[0].id.to_string());
}

#[tokio::test]
async fn post_folder_accepts_any_representation_shape() {
    let (server, service) = setup_mock_server();
    let bodies = [
        json!({}),
        json!({ "name": "   " }),
        json!({ "name": "x", "documents": [], "unexpected": 1 }),
    ];

    for body in bodies {
        let response = authorized(server.post("/folders")).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::OK, "body: {}", body);
    }
    let calls = service.create_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].name, None);
}

#[tokio::test]
async fn post_folder_coerces_or_ignores_non_text_names() {
    let (server, service) = setup_mock_server();
    let bodies = [
        json!({ "name": 42 }),
        json!({ "name": ["a"] }),
        json!([]),
        json!("folder"),
    ];

    for body in bodies {
        let response = authorized(server.post("/folders/")).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::OK, "body: {}", body);
    }
    let calls = service.create_calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].name.as_deref(), Some("42"));
    assert!(calls[1..].iter().all(|folder| folder.name.is_none()));
}

#[tokio::test]
async fn post_folder_never_binds_admin_flag() {
    let (server, service) = setup_mock_server();

    let response = authorized(server.post("/folders/"))
        .json(&json!({ "name": "Evidence", "isAdmin": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body.get("isAdmin").is_none());
    assert_eq!(service.create_calls().len(), 1);
}

#[tokio::test]
async fn post_folder_service_failure_surfaces_as_server_error() {
    let (server, service) = setup_mock_server();
    service.fail_all();

    let response = authorized(server.post("/folders/"))
        .json(&json!({ "name": "Evidence" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn post_documents_to_existing_folder_returns_no_content() {
    let (server, service) = setup_mock_server();
    service.insert(stored_folder(random_uuid()));

    let response = authorized(server.post(&format!("/folders/{}/documents", RANDOM_UUID)))
        .multipart(test_file_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let calls = service.attach_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].folder_id, random_uuid());
    assert_eq!(calls[0].classification, Classification::Public);
    assert_eq!(calls[0].files.len(), 1);
    assert_eq!(calls[0].files[0].file_name, "test.txt");
    assert_eq!(calls[0].files[0].mime_type, "text/plain");
    assert_eq!(calls[0].files[0].content, b"hello world");
    assert!(calls[0].metadata.metadata.is_empty());
    assert_eq!(calls[0].metadata.uploaded_by.as_deref(), Some(USER_ID));
}

#[tokio::test]
async fn post_documents_to_missing_folder_returns_not_found_and_never_attaches() {
    let (server, service) = setup_mock_server();

    let response = authorized(server.post(&format!("/folders/{}/documents", RANDOM_UUID)))
        .multipart(test_file_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(service.attach_calls().is_empty());
    assert_eq!(service.find_calls(), vec![random_uuid()]);
}

#[tokio::test]
async fn post_documents_passes_roles_and_filtered_metadata() {
    let (server, service) = setup_mock_server();
    service.insert(stored_folder(random_uuid()));

    let form = test_file_form()
        .add_part(
            "files",
            Part::bytes(b"second".as_slice())
                .file_name("second.pdf")
                .mime_type("application/pdf"),
        )
        .add_text("roles", "caseworker, judge")
        .add_text("metadata[case_id]", "1234")
        .add_text("metadata[isAdmin]", "true")
        .add_text("isAdmin", "true");

    let response = authorized(server.post(&format!("/folders/{}/documents", RANDOM_UUID)))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let calls = service.attach_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].files.len(), 2);
    assert_eq!(calls[0].metadata.roles, vec!["caseworker", "judge"]);
    assert_eq!(
        calls[0].metadata.metadata.get("case_id").map(String::as_str),
        Some("1234")
    );
    assert!(!calls[0].metadata.metadata.contains_key("isAdmin"));
}

#[tokio::test]
async fn post_documents_rejects_invalid_uploads() {
    let (server, service) = setup_mock_server();
    service.insert(stored_folder(random_uuid()));

    let no_files = MultipartForm::new().add_text("classification", "PUBLIC");
    let no_classification = MultipartForm::new().add_part(
        "files",
        Part::bytes(b"x".as_slice()).file_name("x.txt"),
    );
    let bad_classification = MultipartForm::new()
        .add_part("files", Part::bytes(b"x".as_slice()).file_name("x.txt"))
        .add_text("classification", "TOP_SECRET");

    for form in [no_files, no_classification, bad_classification] {
        let response = authorized(server.post(&format!("/folders/{}/documents", RANDOM_UUID)))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
    assert!(service.attach_calls().is_empty());
}

#[tokio::test]
async fn post_documents_service_failure_surfaces_as_server_error() {
    let (server, service) = setup_mock_server();
    service.insert(stored_folder(random_uuid()));
    service.fail_all();

    let response = authorized(server.post(&format!("/folders/{}/documents", RANDOM_UUID)))
        .multipart(test_file_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn delete_folder_is_withdrawn() {
    let (server, service) = setup_mock_server();
    service.insert(stored_folder(random_uuid()));

    for id in [RANDOM_UUID.to_string(), Uuid::new_v4().to_string()] {
        let response = authorized(server.delete(&format!("/folders/{}", id))).await;
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        response.assert_header(header::ALLOW, "GET");
    }
    assert!(service.find_calls().is_empty());

    let still_there = authorized(server.get(&format!("/folders/{}", RANDOM_UUID))).await;
    assert_eq!(still_there.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn unauthorized_requests_never_reach_the_service() {
    let (server, service) = setup_mock_server();
    service.insert(stored_folder(random_uuid()));
    let path = format!("/folders/{}", RANDOM_UUID);

    let no_headers = server.get(&path).await;
    assert_eq!(no_headers.status_code(), StatusCode::FORBIDDEN);

    let user_only = with_user(server.get(&path), USER_ID).await;
    assert_eq!(user_only.status_code(), StatusCode::UNAUTHORIZED);

    let bad_token = with_service_token(with_user(server.get(&path), USER_ID), "forged").await;
    assert_eq!(bad_token.status_code(), StatusCode::UNAUTHORIZED);

    let other_service =
        with_service_token(with_user(server.get(&path), USER_ID), PROBATE_TOKEN).await;
    assert_eq!(other_service.status_code(), StatusCode::FORBIDDEN);

    let create = with_service_token(server.post("/folders/"), PROBATE_TOKEN)
        .json(&json!({ "name": "x" }))
        .await;
    assert_eq!(create.status_code(), StatusCode::FORBIDDEN);

    assert!(service.find_calls().is_empty());
    assert!(service.create_calls().is_empty());
    assert!(service.attach_calls().is_empty());
}

#[tokio::test]
async fn health_is_open() {
    let (server, _service) = setup_mock_server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn folder_lifecycle_against_stored_service() {
    let (server, _temp) = setup_db_server();

    let create_response = authorized(server.post("/folders/"))
        .json(&json!({ "name": "Decree nisi" }))
        .await;
    assert_eq!(create_response.status_code(), StatusCode::OK);
    let folder: serde_json::Value = create_response.json();
    let folder_id = folder["id"].as_str().expect("id").to_string();

    let attach = authorized(server.post(&format!("/folders/{}/documents", folder_id)))
        .multipart(test_file_form())
        .await;
    assert_eq!(attach.status_code(), StatusCode::NO_CONTENT);

    let get_response = authorized(server.get(&format!("/folders/{}", folder_id))).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    let reloaded: serde_json::Value = get_response.json();
    let documents = reloaded["documents"].as_array().expect("documents");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["originalDocumentName"], "test.txt");
    assert_eq!(documents[0]["classification"], "PUBLIC");
    assert_eq!(documents[0]["size"], 11);

    let missing = authorized(server.post(&format!("/folders/{}/documents", RANDOM_UUID)))
        .multipart(test_file_form())
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    let still_missing = authorized(server.get(&format!("/folders/{}", RANDOM_UUID))).await;
    assert_eq!(still_missing.status_code(), StatusCode::NOT_FOUND);
}
