use serde_json::json;
use std::sync::Arc;
use fitness_admin::auth::{FileTokenStore, LoginCredentials, MemoryTokenStore};
use fitness_admin::config::ClientOptions;
use fitness_admin::AdminConsole;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn console(server: &MockServer) -> AdminConsole {
    AdminConsole::new(ClientOptions::new(&server.uri(), "owner-1")).unwrap()
}

#[tokio::test]
async fn test_login_token_is_sent_on_later_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "admin@x.com",
            "password": "secret",
            "role": "admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": "abc123" },
            "message": "Login successful"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/getUsers"))
        .and(query_param("page", "1"))
        .and(query_param("role", "user"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "pagination": { "page": 1, "limit": 10, "total": 0 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console(&mock_server);
    assert!(!console.session().is_authenticated());

    let token = console
        .auth()
        .login(&LoginCredentials::admin("admin@x.com", "secret"))
        .await
        .unwrap();
    assert_eq!(token, "abc123");
    assert_eq!(console.session().token().as_deref(), Some("abc123"));

    let page = console.users().list(1).await.unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {},
            "message": "Account pending approval"
        })))
        .mount(&mock_server)
        .await;

    let console = console(&mock_server);
    let err = console
        .auth()
        .login(&LoginCredentials::admin("admin@x.com", "secret"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Account pending approval"));
    assert!(!console.session().is_authenticated());
}

#[tokio::test]
async fn test_rejected_credentials_carry_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials"
        })))
        .mount(&mock_server)
        .await;

    let console = console(&mock_server);
    let err = console
        .auth()
        .login(&LoginCredentials::admin("admin@x.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Invalid credentials"));
    assert!(!console.session().is_authenticated());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("session.json");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "token": "persisted" }
        })))
        .mount(&mock_server)
        .await;

    let options = ClientOptions::new(&mock_server.uri(), "owner-1");

    let first = AdminConsole::with_token_store(options.clone(), Arc::new(FileTokenStore::new(&token_file))).unwrap();
    first
        .auth()
        .login(&LoginCredentials::admin("admin@x.com", "secret"))
        .await
        .unwrap();

    let second = AdminConsole::with_token_store(options.clone(), Arc::new(FileTokenStore::new(&token_file))).unwrap();
    assert_eq!(second.session().token().as_deref(), Some("persisted"));

    second.auth().logout().unwrap();
    assert!(!second.session().is_authenticated());

    let third = AdminConsole::with_token_store(options, Arc::new(FileTokenStore::new(&token_file))).unwrap();
    assert!(!third.session().is_authenticated());
}

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/getUsers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "jwt expired"
        })))
        .mount(&mock_server)
        .await;

    let options = ClientOptions::new(&mock_server.uri(), "owner-1");
    let console = AdminConsole::with_token_store(options, Arc::new(MemoryTokenStore::with_token("stale"))).unwrap();
    assert!(console.session().is_authenticated());

    let err = console.users().list(1).await.unwrap_err();
    assert!(console.handle_unauthorized(&err).unwrap());
    assert!(!console.session().is_authenticated());
}

#[tokio::test]
async fn test_other_errors_keep_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/getUsers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let options = ClientOptions::new(&mock_server.uri(), "owner-1");
    let console = AdminConsole::with_token_store(options, Arc::new(MemoryTokenStore::with_token("valid"))).unwrap();

    let err = console.users().list(1).await.unwrap_err();
    assert!(!console.handle_unauthorized(&err).unwrap());
    assert!(console.session().is_authenticated());
}

#[tokio::test]
async fn test_no_authorization_header_without_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/getUsers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console(&mock_server);
    assert!(console.session().token().is_none());
    console.users().list(1).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0]
        .headers
        .keys()
        .any(|name| name.as_str().eq_ignore_ascii_case("authorization")));
}
