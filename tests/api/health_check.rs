use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_reports_ok_and_the_domain() {
    // Arrange
    let test_app = spawn_app().await;
    // Act
    let response = test_app.get("/health").await;
    // Assert
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["domain"], test_app.domain.as_str());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let test_app = spawn_app().await;

    let response = test_app.get("/api/openapi.json").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["paths"]["/api/subscribe"].is_object());
    assert!(body["paths"]["/api/cron/report"].is_object());
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let test_app = spawn_app().await;

    let response = test_app
        .api_client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/subscribe", test_app.address),
        )
        .header("Origin", "https://example.org")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
