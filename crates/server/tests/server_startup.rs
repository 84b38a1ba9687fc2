mod common;

use reqwest::Client;
use serde_json::Value;

use common::start_test_server;

#[tokio::test]
async fn test_health_endpoint() {
    let server = start_test_server("").await;

    let response = Client::new()
        .get(server.url("/api/v1/health"))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(response.status(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_config_endpoint_redacts_secrets() {
    let server = start_test_server(
        r#"
[llm]
api_base = "https://api.deepseek.com"
model = "deepseek-chat"
api_key = "sk-secret-key"

[notifier]
webhook_url = "https://hooks.example.com/T0/B0/very-secret"
"#,
    )
    .await;

    let response = Client::new()
        .get(server.url("/api/v1/config"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    assert!(!body.contains("sk-secret-key"));
    assert!(!body.contains("very-secret"));

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["llm"]["api_key_configured"], true);
    assert_eq!(json["llm"]["model"], "deepseek-chat");
    assert_eq!(json["notifier"]["webhook_configured"], true);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let server = start_test_server("").await;
    let client = Client::new();

    // Drive one step so at least one counter exists.
    let created: Value = client
        .post(server.url("/api/v1/tickets"))
        .json(&serde_json::json!({
            "customer_email": "x@example.com",
            "description": "broken"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(created["ticket_id"].is_i64());

    let response = client.get(server.url("/metrics")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("supportflow_pipeline_steps_total"));
}
