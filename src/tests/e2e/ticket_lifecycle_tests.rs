use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::shell::http::{ENGINEER_HEADER, router};
use crate::tests::fixtures::app_state;

async fn send(app: &Router, method: &str, uri: &str, engineer: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .header(ENGINEER_HEADER, engineer)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json_of(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn open_manual_ticket(app: &Router) -> String {
    let response = send(
        app,
        "POST",
        "/subscribers",
        "eng-1",
        json!({ "name": "Dana Lee", "phone": "+60100000000", "building_name": "Skyline Towers" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let subscriber_id = json_of(response).await["id"].as_str().unwrap().to_string();

    let response = send(
        app,
        "POST",
        "/tickets",
        "eng-2",
        json!({
            "subscriber_id": subscriber_id,
            "subject": "Intermittent drops",
            "description": "Connection drops every evening",
            "priority": "Medium"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ticket = json_of(response).await;
    assert_eq!(ticket["channel"], "Manual");
    assert_eq!(ticket["status"], "Open");
    ticket["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn walks_a_manual_ticket_from_open_to_resolved() {
    let app = router(app_state());
    let ticket_id = open_manual_ticket(&app).await;

    for status in ["In-Progress", "Resolved"] {
        let response = send(
            &app,
            "POST",
            &format!("/tickets/{ticket_id}/status"),
            "eng-1",
            json!({ "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "move to {status}");
    }

    let detail = json_of(
        app.clone()
            .oneshot(
                Request::get(format!("/tickets/{ticket_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(detail["status"], "Resolved");
    assert_eq!(detail["assigned_engineer_id"], "eng-1");
    assert_eq!(detail["subscriber_name"], "Dana Lee");
    let created_at = detail["created_at"].as_i64().unwrap();
    let resolved_at = detail["resolved_at"].as_i64().unwrap();
    assert!(resolved_at >= created_at);

    let system_log: Vec<&str> = detail["comments"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["author_type"] == "System")
        .map(|c| c["message"].as_str().unwrap())
        .collect();
    assert_eq!(
        system_log,
        vec![
            "Status changed from Open to In-Progress by Zack Wilson",
            "Status changed from In-Progress to Resolved by Zack Wilson",
        ]
    );
}

#[tokio::test]
async fn keeps_the_status_when_a_site_visit_names_no_hardware() {
    let app = router(app_state());
    let ticket_id = open_manual_ticket(&app).await;

    let response = send(
        &app,
        "POST",
        &format!("/tickets/{ticket_id}/status"),
        "eng-1",
        json!({ "status": "Pending Site Visit", "hardware_replacement": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let listed = json_of(
        app.clone()
            .oneshot(Request::get("/tickets?status=Open").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert!(
        listed
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t["id"] == ticket_id.as_str())
    );
}
