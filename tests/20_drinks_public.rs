mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::TestApp::new().await?;

    let (status, body) = app.request(Method::GET, "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn empty_menu_is_404() -> Result<()> {
    let app = common::TestApp::new().await?;

    let (status, body) = app.request(Method::GET, "/drinks", None, None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);
    assert_eq!(body["message"], "resource not found");
    Ok(())
}

#[tokio::test]
async fn public_list_uses_short_view() -> Result<()> {
    let app = common::TestApp::new().await?;
    let water = app.seed("Water").await?;

    let (status, body) = app.request(Method::GET, "/drinks", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "drinks": [{
                "id": water.id,
                "title": "Water",
                "recipe": [{"color": "blue", "parts": 1}]
            }]
        })
    );
    Ok(())
}

#[tokio::test]
async fn public_list_ignores_tokens() -> Result<()> {
    let app = common::TestApp::new().await?;
    app.seed("Water").await?;

    let (status, _) = app
        .request(Method::GET, "/drinks", Some("definitely-not-a-jwt"), None)
        .await?;

    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_json_404() -> Result<()> {
    let app = common::TestApp::new().await?;

    let (status, body) = app.request(Method::GET, "/coffee", None, None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "resource not found");
    Ok(())
}

#[tokio::test]
async fn wrong_method_is_json_405() -> Result<()> {
    let app = common::TestApp::new().await?;

    let (status, body) = app.request(Method::PUT, "/drinks", None, None).await?;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": 405, "message": "method not allowed", "code": "METHOD_NOT_ALLOWED"}));
    Ok(())
}
