use serde_json::json;
use fitness_admin::config::ClientOptions;
use fitness_admin::error::{ErrorKind, NoticeLevel};
use fitness_admin::issues::IssueLookup;
use fitness_admin::AdminConsole;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn console(server: &MockServer) -> AdminConsole {
    AdminConsole::new(ClientOptions::new(&server.uri(), "owner-1")).unwrap()
}

#[tokio::test]
async fn test_short_request_id_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut lookup = IssueLookup::new();
    let notice = lookup
        .search(&console(&mock_server).issues(), "req_123456789")
        .await
        .unwrap_err();

    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.kind, Some(ErrorKind::Validation));
    assert!(lookup.results().is_empty());
}

#[tokio::test]
async fn test_matches_select_the_first_row() {
    let mock_server = MockServer::start().await;
    let request_id = uuid::Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path(format!("/admin/{}/issues", request_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "i1",
                    "requestId": request_id,
                    "url": "/users/42/posts",
                    "method": "POST",
                    "headers": { "content-type": "application/json" },
                    "error": { "message": "title is required" },
                    "requestBody": { "body": "B" },
                    "response": { "statusCode": 400 },
                    "timestamp": "2024-05-01T12:00:00Z"
                },
                {
                    "id": "i2",
                    "requestId": request_id,
                    "url": "/users/42/posts",
                    "method": "POST",
                    "error": "upstream timeout",
                    "response": { "status": 504 },
                    "timestamp": "2024-05-01T12:00:05Z"
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut lookup = IssueLookup::new();
    let count = lookup
        .search(&console(&mock_server).issues(), &request_id)
        .await
        .unwrap();

    assert_eq!(count, 2);
    let selected = lookup.selected().unwrap();
    assert_eq!(selected.id, "i1");
    assert_eq!(selected.status_code(), Some(400));

    assert!(lookup.select(1));
    assert_eq!(lookup.selected().unwrap().error_text(), "upstream timeout");
    assert!(!lookup.select(2));
}

#[tokio::test]
async fn test_zero_matches_leave_results_empty() {
    let mock_server = MockServer::start().await;
    let request_id = uuid::Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path(format!("/admin/{}/issues", request_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&mock_server)
        .await;

    let mut lookup = IssueLookup::new();
    let count = lookup
        .search(&console(&mock_server).issues(), &request_id)
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert!(lookup.results().is_empty());
    assert!(lookup.selected().is_none());
}

#[tokio::test]
async fn test_server_failure_is_an_error_notice() {
    let mock_server = MockServer::start().await;
    let request_id = uuid::Uuid::new_v4().to_string();

    Mock::given(method("GET"))
        .and(path(format!("/admin/{}/issues", request_id)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut lookup = IssueLookup::new();
    let notice = lookup
        .search(&console(&mock_server).issues(), &request_id)
        .await
        .unwrap_err();

    assert!(notice.is_error());
    assert_eq!(notice.message, "Failed to fetch issues");
}

#[tokio::test]
async fn test_request_id_is_encoded_in_path() {
    let mock_server = MockServer::start().await;
    let request_id = "9b2f0e4c-1d6a-4c0e-9f7b-3e5d2a1c8b40#x";

    Mock::given(method("GET"))
        .and(path("/admin/9b2f0e4c-1d6a-4c0e-9f7b-3e5d2a1c8b40%23x/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut lookup = IssueLookup::new();
    let count = lookup
        .search(&console(&mock_server).issues(), request_id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
