//! API integration tests
//!
//! Tests for the model and profile REST endpoints, including ownership
//! and public/private visibility rules.

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use netsketch::database::connection::setup_database;
use netsketch::server::app::create_app;
use sea_orm::Database;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// Create a test server backed by a throwaway sqlite file
async fn setup_test_server() -> Result<(TestServer, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    let app = create_app(db, None).await?;
    let server = TestServer::new(app)?;

    Ok((server, temp_file))
}

fn user_header(user_id: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(user_id).unwrap(),
    )
}

fn sample_layers() -> Value {
    json!([
        {
            "id": "input-1",
            "type": "input",
            "name": "Input Layer",
            "position": { "x": 100.0, "y": 100.0 },
            "params": { "input_shape": [28, 28, 1] },
            "connections": ["dense-1"]
        },
        {
            "id": "dense-1",
            "type": "dense",
            "name": "Dense Layer",
            "position": { "x": 250.0, "y": 100.0 },
            "params": { "units": 64, "activation": "relu" },
            "connections": []
        }
    ])
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "netsketch-server");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_models_require_user_header() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;

    let response = server.get("/api/v1/models").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/v1/models")
        .json(&json!({ "name": "No owner", "layers": [] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_models_crud_api() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;
    let (name, value) = user_header("alice");

    // Create
    let create_payload = json!({
        "name": "MNIST Classifier",
        "description": "Two layer starter",
        "layers": sample_layers(),
        "is_public": false
    });

    let response = server
        .post("/api/v1/models")
        .add_header(name.clone(), value.clone())
        .json(&create_payload)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let model: Value = response.json();
    let model_id = model["id"].as_str().unwrap().to_string();
    assert_eq!(model["name"], "MNIST Classifier");
    assert_eq!(model["user_id"], "alice");
    assert_eq!(model["is_public"], false);
    assert_eq!(model["model_data"]["layers"].as_array().unwrap().len(), 2);

    // List the caller's models
    let response = server
        .get("/api/v1/models")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let models: Vec<Value> = response.json();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["id"].as_str().unwrap(), model_id);

    // Fetch single
    let response = server
        .get(&format!("/api/v1/models/{}", model_id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Partial update: rename and flip to public
    let response = server
        .put(&format!("/api/v1/models/{}", model_id))
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "MNIST Classifier v2", "is_public": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let updated: Value = response.json();
    assert_eq!(updated["name"], "MNIST Classifier v2");
    assert_eq!(updated["is_public"], true);
    assert_eq!(updated["description"], "Two layer starter");
    assert_eq!(updated["model_data"]["layers"].as_array().unwrap().len(), 2);

    // Delete
    let response = server
        .delete(&format!("/api/v1/models/{}", model_id))
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/v1/models/{}", model_id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_private_models_hidden_from_other_users() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;
    let (name, alice) = user_header("alice");
    let (_, bob) = user_header("bob");

    let response = server
        .post("/api/v1/models")
        .add_header(name.clone(), alice.clone())
        .json(&json!({
            "name": "Secret Net",
            "layers": sample_layers(),
            "is_public": false
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let model_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    // Bob cannot see it directly, in his list, or in the public gallery
    let response = server
        .get(&format!("/api/v1/models/{}", model_id))
        .add_header(name.clone(), bob.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .get("/api/v1/models")
        .add_header(name.clone(), bob.clone())
        .await;
    assert_eq!(response.json::<Vec<Value>>().len(), 0);

    let response = server.get("/api/v1/models/public").await;
    assert_eq!(response.json::<Vec<Value>>().len(), 0);

    // Bob cannot update or delete it either
    let response = server
        .put(&format!("/api/v1/models/{}", model_id))
        .add_header(name.clone(), bob.clone())
        .json(&json!({ "name": "Hijacked" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .delete(&format!("/api/v1/models/{}", model_id))
        .add_header(name.clone(), bob)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // The owner still sees it
    let response = server
        .get(&format!("/api/v1/models/{}", model_id))
        .add_header(name, alice)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_public_gallery_visible_without_auth() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;
    let (name, alice) = user_header("alice");

    let response = server
        .post("/api/v1/models")
        .add_header(name.clone(), alice.clone())
        .json(&json!({
            "name": "Shared Net",
            "layers": sample_layers()
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    // is_public defaults to true
    assert_eq!(response.json::<Value>()["is_public"], true);
    let model_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    // Anonymous callers can browse the gallery and open the model
    let response = server.get("/api/v1/models/public").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let gallery: Vec<Value> = response.json();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0]["id"].as_str().unwrap(), model_id);

    let response = server.get(&format!("/api/v1/models/{}", model_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_profile_api() -> Result<()> {
    let (server, _temp_file) = setup_test_server().await?;
    let (name, alice) = user_header("alice");

    let response = server
        .post("/api/v1/profiles")
        .add_header(name.clone(), alice.clone())
        .json(&json!({
            "display_name": "Alice",
            "bio": "Builds convnets"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let profile: Value = response.json();
    assert_eq!(profile["user_id"], "alice");
    assert_eq!(profile["display_name"], "Alice");

    // One profile per user
    let response = server
        .post("/api/v1/profiles")
        .add_header(name.clone(), alice.clone())
        .json(&json!({ "display_name": "Alice again" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // The caller can fetch their own profile without knowing the id
    let response = server.get("/api/v1/profiles").add_header(name, alice).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["display_name"], "Alice");

    let response = server.get("/api/v1/profiles/alice").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["bio"], "Builds convnets");

    let response = server.get("/api/v1/profiles/nobody").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}
