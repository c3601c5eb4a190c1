use crate::helpers::{UnavailableStore, spawn_app, spawn_app_with, spawn_app_without_api_key};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{any, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn report_covers_todays_signups_in_order() {
    // Arrange
    let test_app = spawn_app().await;
    for email in ["a@x.com", "b@x.com"] {
        test_app.post_subscribe(&json!({ "email": email })).await;
    }
    Mock::given(path("/emails"))
        .and(method("POST"))
        .and(header_regex("Authorization", "^Bearer .+$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    // Act
    let response = test_app.post_report(false).await;
    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Daily report sent",
            "stats": { "total": 2, "today": 2 }
        })
    );

    let emails = test_app.sent_emails().await;
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(
        emails[0]["subject"],
        format!("📊 Qosmos Daily Report - {}", today)
    );
    let html = emails[0]["html"].as_str().unwrap();
    assert!(html.find("a@x.com").unwrap() < html.find("b@x.com").unwrap());
    assert_eq!(
        test_app
            .store
            .get("reports:lastSent")
            .await
            .unwrap()
            .as_deref(),
        Some(today.as_str())
    );
}

#[tokio::test]
async fn report_with_no_signups_today_sends_the_placeholder() {
    // Arrange
    let test_app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    // Act
    let response = test_app.post_report(false).await;
    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["stats"], json!({ "total": 0, "today": 0 }));
    let emails = test_app.sent_emails().await;
    assert!(
        emails[0]["html"]
            .as_str()
            .unwrap()
            .contains("No new subscribers today")
    );
}

#[tokio::test]
async fn provider_failure_returns_a_500_and_can_be_retried() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.post_subscribe(&json!({ "email": "a@x.com" })).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    // Act - Part 1 - The provider rejects the email
    let response = test_app.post_report(false).await;
    // Assert - Part 1
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to send email");
    assert_eq!(test_app.store.get("reports:lastSent").await.unwrap(), None);

    // Act - Part 2 - The next trigger tries again
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    let response = test_app.post_report(false).await;
    // Assert - Part 2
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Daily report sent");
}

#[tokio::test]
async fn second_trigger_on_the_same_day_does_not_send_unless_forced() {
    // Arrange
    let test_app = spawn_app().await;
    test_app.post_subscribe(&json!({ "email": "a@x.com" })).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&test_app.email_server)
        .await;
    // Act
    let first = test_app.post_report(false).await;
    let second = test_app.post_report(false).await;
    let forced = test_app.post_report(true).await;
    // Assert
    assert_eq!(200, first.status().as_u16());
    let second: serde_json::Value = second.json().await.unwrap();
    assert_eq!(second["message"], "Daily report already sent today");
    assert_eq!(second["stats"], json!({ "total": 1, "today": 1 }));
    let forced: serde_json::Value = forced.json().await.unwrap();
    assert_eq!(forced["message"], "Daily report sent");
}

#[tokio::test]
async fn send_report_alias_triggers_the_report() {
    let test_app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_send_report().await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn report_without_api_key_is_logged_instead_of_sent() {
    // Arrange
    let test_app = spawn_app_without_api_key().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;
    // Act
    let response = test_app.post_report(false).await;
    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn report_fails_with_a_500_when_the_store_is_unavailable() {
    // Arrange
    let test_app = spawn_app_with(|_| {}, Arc::new(UnavailableStore)).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;
    // Act
    let response = test_app.post_report(false).await;
    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to generate report");
}
