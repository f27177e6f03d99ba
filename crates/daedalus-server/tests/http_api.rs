//! End-to-end tests of the HTTP API, driven through the server's
//! request dispatch so the full routing, handler, and engine stack is
//! exercised without a TCP listener.

use bytes::Bytes;
use daedalus_server::{Server, ServerConfig};
use http::{HeaderMap, Method, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn zip_bytes(entries: &[(&str, &str)]) -> Bytes {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    Bytes::from(writer.finish().unwrap().into_inner())
}

fn sample_project() -> Bytes {
    zip_bytes(&[
        (
            "src/main/java/app/Main.java",
            "public class Main extends Service implements Runnable {}",
        ),
        ("src/main/java/app/Service.java", "public abstract class Service {}"),
        ("src/main/java/app/Mode.java", "public enum Mode { ON, OFF }"),
    ])
}

fn test_server(workspace: &tempfile::TempDir) -> Server {
    let config = ServerConfig::builder()
        .http_addr("127.0.0.1:0")
        .workspace_dir(workspace.path())
        .build();
    Server::new(config)
}

async fn body_json(response: http::Response<http_body_util::Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: http::Response<http_body_util::Full<Bytes>>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn upload(server: &Server, archive: Bytes) -> (StatusCode, Value) {
    let mut headers = HeaderMap::new();
    headers.insert("x-project-name", "demo.zip".parse().unwrap());
    let response = server
        .dispatch(&Method::POST, "/api/projects", &headers, archive)
        .await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn upload_returns_created_resource_with_links() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);

    let (status, body) = upload(&server, sample_project()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "demo.zip");
    assert_eq!(body["state"], "PARSED");
    let id = body["id"].as_str().unwrap();
    assert_eq!(
        body["_links"]["self"]["href"],
        format!("/api/projects/{id}")
    );
    assert_eq!(
        body["_links"]["umlText"]["href"],
        format!("/api/uml/plant-uml-code/{id}")
    );
    assert_eq!(body["_links"]["umlSvg"]["href"], format!("/api/uml/svg/{id}"));
}

#[tokio::test]
async fn project_resource_is_retrievable_after_upload() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);
    let (_, created) = upload(&server, sample_project()).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .dispatch(
            &Method::GET,
            &format!("/api/projects/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], *id);
    assert_eq!(body["state"], "PARSED");
}

#[tokio::test]
async fn text_artifact_carries_plantuml_markers() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);
    let (_, created) = upload(&server, sample_project()).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .dispatch(
            &Method::GET,
            &format!("/api/uml/plant-uml-code/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with("@startuml"));
    assert!(content.trim_end().ends_with("@enduml"));
    assert!(content.contains("class Main"));
    assert!(content.contains("Main --|> Service"));
    assert_eq!(
        body["_links"]["projectInfo"]["href"],
        format!("/api/projects/{id}")
    );
}

#[tokio::test]
async fn svg_artifact_has_content_type_and_disposition() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);
    let (_, created) = upload(&server, sample_project()).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = server
        .dispatch(
            &Method::GET,
            &format!("/api/uml/svg/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[http::header::CONTENT_TYPE],
        "image/svg+xml"
    );
    assert_eq!(
        response.headers()[http::header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{id}.svg\"")
    );

    let svg = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<desc>@startuml"));
}

#[tokio::test]
async fn first_artifact_fetch_promotes_to_artifacts_ready() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);
    let (_, created) = upload(&server, sample_project()).await;
    let id = created["id"].as_str().unwrap();

    let first = server
        .dispatch(
            &Method::GET,
            &format!("/api/uml/plant-uml-code/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_json(first).await;

    let project = server
        .dispatch(
            &Method::GET,
            &format!("/api/projects/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;
    assert_eq!(body_json(project).await["state"], "ARTIFACTS_READY");

    // Retrieval is repeatable and stable.
    let second = server
        .dispatch(
            &Method::GET,
            &format!("/api/uml/plant-uml-code/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["content"], first_body["content"]);
}

#[tokio::test]
async fn unknown_project_yields_404_for_both_artifacts() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);
    let id = uuid::Uuid::now_v7();

    for path in [
        format!("/api/uml/plant-uml-code/{id}"),
        format!("/api/uml/svg/{id}"),
        format!("/api/projects/{id}"),
    ] {
        let response = server
            .dispatch(&Method::GET, &path, &HeaderMap::new(), Bytes::new())
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(
            body["errors"][0],
            format!("ProjectInfo not found with id: {id}")
        );
        assert_eq!(body["status"], 404);
    }
}

#[tokio::test]
async fn deleted_parsed_representation_yields_500_for_both_artifacts() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);
    let (_, created) = upload(&server, sample_project()).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .dispatch(
            &Method::DELETE,
            &format!("/api/projects/{id}/parsed"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for path in [
        format!("/api/uml/plant-uml-code/{id}"),
        format!("/api/uml/svg/{id}"),
    ] {
        let response = server
            .dispatch(&Method::GET, &path, &HeaderMap::new(), Bytes::new())
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0], "Unable to find requested ParsedComponent.");
    }

    // The project record itself survives deletion.
    let project = server
        .dispatch(
            &Method::GET,
            &format!("/api/projects/{id}"),
            &HeaderMap::new(),
            Bytes::new(),
        )
        .await;
    assert_eq!(project.status(), StatusCode::OK);
    assert_eq!(body_json(project).await["state"], "DELETED");
}

#[tokio::test]
async fn traversal_archive_is_rejected_and_project_is_failed() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);

    let (status, body) = upload(&server, zip_bytes(&[("../../evil.txt", "boom")])).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let message = body["errors"][0].as_str().unwrap();
    assert!(message.contains("evil.txt"));

    // Nothing escaped the workspace.
    assert!(!workspace.path().parent().unwrap().join("evil.txt").exists());
}

#[tokio::test]
async fn garbage_upload_is_rejected_as_invalid_archive() {
    let workspace = tempfile::tempdir().unwrap();
    let server = test_server(&workspace);

    let (status, body) = upload(&server, Bytes::from_static(b"definitely not a zip")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"][0].as_str().unwrap().contains("invalid archive"));
}
