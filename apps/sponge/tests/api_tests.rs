//! Integration tests for a bootstrapped Sponge application.
//!
//! Uses axum-test to drive the mounted router without binding a socket.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use image::{Rgb, RgbImage};
use sponge::bootstrap::{ControllerRegistry, SpongeApp};
use sponge::controller::{Controller, SpongeRequest, SpongeResponse};
use sponge_core::{Settings, SpongeError};
use std::path::Path;
use std::sync::Arc;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

const SETTINGS: &str = "\
run-as: standalone
host: 127.0.0.1
port: 4000
autoreload: false
application:
    classes:
        HelloWorldController: /
        AjaxController: /ajax
        ImageHandler: /img
    template-dir: templates
    image-dir: media/img
static:
    /media: media
";

/// Lay out a complete application root in a tempdir.
fn scaffold_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::create_dir_all(root.join("templates")).unwrap();
    std::fs::create_dir_all(root.join("media/css")).unwrap();
    std::fs::create_dir_all(root.join("media/img")).unwrap();

    std::fs::write(
        root.join("templates/index.html.hbs"),
        "<h1>Hello, {{name}}!</h1><link href=\"{{make_url \"/media/css/style.css\"}}\" />",
    )
    .unwrap();
    std::fs::write(root.join("media/css/style.css"), "body { margin: 0 }").unwrap();

    let photo = RgbImage::from_pixel(8, 6, Rgb([120, 130, 140]));
    photo.save(root.join("media/img/dot.jpg")).unwrap();

    dir
}

/// Build the app over a scaffolded root and wrap it in a test server.
fn create_test_server(root: &Path) -> TestServer {
    let settings = Settings::from_yaml(SETTINGS).unwrap();
    let registry = ControllerRegistry::with_builtins();
    let app = SpongeApp::build(settings, &registry, root.to_path_buf()).unwrap();
    TestServer::new(app.router()).unwrap()
}

// =============================================================================
// TEMPLATED CONTROLLER
// =============================================================================

#[tokio::test]
async fn index_renders_the_template() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Hello, world!"));
}

#[tokio::test]
async fn make_url_builds_an_absolute_asset_path() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let body = server.get("/").await.text();
    assert!(body.contains("http://"));
    assert!(body.contains("/media/css/style.css"));
}

// =============================================================================
// JSON CONTROLLER + PAGINATION
// =============================================================================

#[tokio::test]
async fn ajax_index_answers_json() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/ajax").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "success": true }));
}

#[tokio::test]
async fn ajax_greet_reads_the_path_parameter() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/ajax/greet/Alice").await;
    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "greeting": "Hello, Alice!" }));
}

#[tokio::test]
async fn ajax_items_defaults_to_the_first_page() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let body: serde_json::Value = server.get("/ajax/items").await.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["num_pages"], 6);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["has_previous"], false);
    assert_eq!(body["has_next"], true);
}

#[tokio::test]
async fn ajax_items_serves_the_requested_page() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let body: serde_json::Value = server.get("/ajax/items?page=6").await.json();
    assert_eq!(body["page"], 6);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["end_index"], 53);
}

#[tokio::test]
async fn ajax_items_rejects_pages_past_the_end() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/ajax/items?page=99").await;
    response.assert_status_not_found();
    assert_eq!(response.text(), "That page contains no results");
}

#[tokio::test]
async fn ajax_items_rejects_non_integer_pages() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/ajax/items?page=two").await;
    response.assert_status_not_found();
    assert_eq!(response.text(), "That page number is not an integer");
}

// =============================================================================
// STATIC FILES
// =============================================================================

#[tokio::test]
async fn static_mounts_serve_files() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/media/css/style.css").await;
    response.assert_status_ok();
    assert!(response.text().contains("margin"));
}

// =============================================================================
// IMAGE HANDLER
// =============================================================================

#[tokio::test]
async fn image_handler_serves_a_jpeg() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/img/dot.jpg").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/jpeg");
    let decoded = image::load_from_memory(response.as_bytes().as_ref()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
}

#[tokio::test]
async fn image_handler_crops_to_the_requested_size() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/img/crop/4x4/dot.jpg").await;
    response.assert_status_ok();
    let decoded = image::load_from_memory(response.as_bytes().as_ref()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 4));
}

#[tokio::test]
async fn missing_images_come_back_as_404() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/img/no-such.jpg").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn image_handler_root_is_404() {
    let root = scaffold_root();
    let server = create_test_server(root.path());

    let response = server.get("/img").await;
    response.assert_status_not_found();
    assert_eq!(response.text(), "not found");
}

// =============================================================================
// PLAIN-MOUNTED CONTROLLERS
// =============================================================================

/// A controller in the original style: no routes, actions picked by path.
struct EchoController;

impl Controller for EchoController {
    fn dispatch(
        &self,
        action: &str,
        request: &SpongeRequest,
    ) -> Result<SpongeResponse, SpongeError> {
        let args = request.param("args").unwrap_or("");
        Ok(SpongeResponse::text(format!("{action}:{args}")))
    }
}

#[tokio::test]
async fn plain_mounts_dispatch_by_path_segment() {
    let root = scaffold_root();
    let yaml = SETTINGS.replace("AjaxController: /ajax", "EchoController: /echo");
    let settings = Settings::from_yaml(&yaml).unwrap();

    let mut registry = ControllerRegistry::with_builtins();
    registry.register("EchoController", |_ctx| Ok(Arc::new(EchoController)));

    let app = SpongeApp::build(settings, &registry, root.path().to_path_buf()).unwrap();
    let server = TestServer::new(app.router()).unwrap();

    let response = server.get("/echo").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "index:");

    let response = server.get("/echo/shout/a/b").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "shout:a/b");
}
