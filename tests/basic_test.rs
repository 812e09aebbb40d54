use std::time::Duration;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use result_analyzer::api;
use result_analyzer::store::SessionStore;

const REPLY_DELAY: Duration = Duration::from_millis(20);
const SESSION_TTL: Duration = Duration::from_secs(60);

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(SessionStore::new(REPLY_DELAY, SESSION_TTL)))
                .configure(api::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, web::Bytes::from_static(b"Result Analyzer is running!"));
}

#[actix_web::test]
async fn test_dashboard_json() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let data: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(data["kpis"][0]["value"], "156");
    assert_eq!(data["kpis"][1]["value"], "87.2%");
    assert_eq!(data["charts"]["grade_distribution"].as_array().unwrap().len(), 6);
    assert_eq!(data["subjects"][3]["code"], "MA301");
    assert_eq!(data["subjects"][3]["difficulty"], "Tough");
    assert_eq!(data["filters"]["departments"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_section_endpoints() {
    let app = app!();
    for (uri, len) in [
        ("/api/kpis", 5),
        ("/api/insights", 3),
        ("/api/subjects", 6),
        ("/api/chat/suggestions", 4),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let data: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data.as_array().map(Vec::len), Some(len), "{uri}");
    }

    let req = test::TestRequest::get().uri("/api/charts").to_request();
    let charts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(charts["pass_fail"][0]["value"], 136);
}

#[actix_web::test]
async fn test_classify_endpoint() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/classify")
        .set_json(json!({ "query": "Which students got 10 SGPA?" }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(reply["intent"], "perfect_sgpa");
    let rows = reply["table"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "Anjali Thomas");
    assert_eq!(rows[1]["roll_no"], "CSE21023");
    assert_eq!(rows[2]["sgpa"], "10.0");

    let req = test::TestRequest::post()
        .uri("/api/classify")
        .set_json(json!({ "query": "" }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["intent"], "fallback");
}

macro_rules! create_session {
    ($app:expr) => {{
        let req = test::TestRequest::post().uri("/api/sessions").to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["view"]["theme"], "light");
        created["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn test_chat_round_trip() {
    let app = app!();
    let id = create_session!(&app);
    let messages_uri = format!("/api/sessions/{id}/messages");

    let req = test::TestRequest::get().uri(&messages_uri).to_request();
    let seeded: Value = test::call_and_read_body_json(&app, req).await;
    let before = seeded["messages"].as_array().unwrap().len();
    assert_eq!(before, 3);

    let req = test::TestRequest::post()
        .uri(&messages_uri)
        .set_json(json!({ "text": "Show failed students" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let mut snapshot = Value::Null;
    for _ in 0..200 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let req = test::TestRequest::get().uri(&messages_uri).to_request();
        snapshot = test::call_and_read_body_json(&app, req).await;
        if snapshot["messages"].as_array().unwrap().len() == before + 2 {
            break;
        }
    }

    let messages = snapshot["messages"].as_array().unwrap();
    assert_eq!(messages.len(), before + 2);
    assert_eq!(messages[before]["role"], "user");
    assert_eq!(messages[before]["text"], "Show failed students");
    assert_eq!(messages[before + 1]["role"], "bot");
    assert_eq!(messages[before + 1]["table"][0]["name"], "Rahul Krishnan");
    assert_eq!(snapshot["status"]["state"], "idle");
}

#[actix_web::test]
async fn test_blank_message_rejected() {
    let app = app!();
    let id = create_session!(&app);
    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/messages"))
        .set_json(json!({ "text": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Message text is empty");
}

#[actix_web::test]
async fn test_message_flood_refused() {
    let app = app!();
    let id = create_session!(&app);
    let messages_uri = format!("/api/sessions/{id}/messages");

    let mut refused = None;
    for attempt in 0..20 {
        let req = test::TestRequest::post()
            .uri(&messages_uri)
            .set_json(json!({ "text": "sgpa" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            refused = Some(attempt);
            break;
        }
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }
    assert!(refused.is_some(), "queue never filled");
}

#[actix_web::test]
async fn test_view_actions() {
    let app = app!();
    let id = create_session!(&app);
    let view_uri = format!("/api/sessions/{id}/view");

    let req = test::TestRequest::post()
        .uri(&view_uri)
        .set_json(json!({ "action": "toggle_theme" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["theme"], "dark");

    let req = test::TestRequest::post()
        .uri(&view_uri)
        .set_json(json!({ "action": "select_department", "value": "Mechanical Engineering" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["department"], "Mechanical Engineering");
    assert_eq!(view["theme"], "dark");

    let req = test::TestRequest::post()
        .uri(&view_uri)
        .set_json(json!({ "action": "select_semester", "value": "Semester 0" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{id}"))
        .to_request();
    let info: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(info["view"]["semester"], "Semester 3");
    assert_eq!(info["status"]["queued"], 0);
}

#[actix_web::test]
async fn test_delete_session() {
    let app = app!();
    let id = create_session!(&app);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{id}/messages"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_sgpa_endpoint() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/sgpa")
        .set_json(json!({ "courses": [
            { "grade": "A+", "credits": 4 },
            { "grade": "b", "credits": 3 }
        ]}))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["sgpa"], 7.71);
    assert_eq!(summary["passed"], 2);

    let req = test::TestRequest::post()
        .uri("/api/sgpa")
        .set_json(json!({ "courses": [{ "grade": "Q", "credits": 3 }] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/sgpa")
        .set_json(json!({ "courses": [
            { "grade": "A", "credits": 1e308 },
            { "grade": "B", "credits": 1e308 }
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_csv_exports() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/api/reports/subjects.csv")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.contains("subjects.csv"));
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("Subject Code,Subject Name"));

    let req = test::TestRequest::get()
        .uri("/api/reports/summary.csv")
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Fail Percentage,12.8%"));
}

#[actix_web::test]
async fn test_homepage_renders_session_view() {
    let app = app!();
    let id = create_session!(&app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{id}/view"))
        .set_json(json!({ "action": "open_chat" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/?session={id}"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Result Analysis Dashboard"));
    assert!(html.contains("AI Academic Assistant"));
    assert!(html.contains(&format!("const sessionId = '{id}';")));

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("const sessionId = '';"));
}
