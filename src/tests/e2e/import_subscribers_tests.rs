use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::shell::http::{ENGINEER_HEADER, router};
use crate::tests::fixtures::app_state;

const SHEET: &str = "Name,Phone,Email,Condo,Unit,SN\nJane,+6011,j@x.com,Tower A,1-1,SN1";

#[tokio::test]
async fn imports_a_new_subscriber_as_active() {
    let app = router(app_state());

    let response = app
        .clone()
        .oneshot(
            Request::post("/subscribers/import")
                .header("content-type", "text/plain")
                .header(ENGINEER_HEADER, "eng-1")
                .body(Body::from(SHEET))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/subscribers?q=jane").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let found: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Jane");
    assert_eq!(found[0]["status"], "Active");
    assert_eq!(found[0]["phone"], "+6011");
}

#[tokio::test]
async fn importing_the_same_sheet_twice_updates_in_place() {
    let app = router(app_state());
    let mut ids = Vec::new();

    for _ in 0..2 {
        app.clone()
            .oneshot(
                Request::post("/subscribers/import")
                    .header(ENGINEER_HEADER, "eng-1")
                    .body(Body::from(SHEET))
                    .unwrap(),
            )
            .await
            .unwrap();
        let response = app
            .clone()
            .oneshot(Request::get("/subscribers?q=jane").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let found: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(found.as_array().unwrap().len(), 1);
        ids.push(found[0]["id"].as_str().unwrap().to_string());
    }

    assert_eq!(ids[0], ids[1]);
}
