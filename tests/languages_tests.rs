use serde_json::json;
use std::sync::Arc;
use fitness_admin::config::ClientOptions;
use fitness_admin::error::LogNotifier;
use fitness_admin::languages::Language;
use fitness_admin::AdminConsole;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn console(server: &MockServer) -> AdminConsole {
    AdminConsole::new(ClientOptions::new(&server.uri(), "owner-1")).unwrap()
}

async fn mount_registry(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/admin/language/getAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "locale": "en", "language": "English", "status": true },
                { "id": 3, "locale": "es", "language": "Spanish", "isActive": false }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_registry_is_a_single_page() {
    let mock_server = MockServer::start().await;
    mount_registry(&mock_server).await;

    let mut manager = console(&mock_server).language_manager(Arc::new(LogNotifier));
    manager.load().await;

    assert_eq!(manager.items().len(), 2);
    assert!(!manager.items()[1].status);
    assert!(!manager.page_info().has_next());

    manager.set_search("span");
    assert_eq!(manager.visible()[0].locale, "es");
}

#[tokio::test]
async fn test_add_sends_locale_and_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/language/add"))
        .and(body_json(json!({ "locale": "fr", "language": "French" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Language added" })))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_registry(&mock_server).await;

    let mut manager = console(&mock_server).language_manager(Arc::new(LogNotifier));
    assert!(manager.open_create());
    manager.form_mut().unwrap().record = Language::new("fr", "French");

    let notice = manager.submit().await.unwrap();
    assert_eq!(notice.message, "Language added");
    assert_eq!(manager.fetch_count(), 1);
}

#[tokio::test]
async fn test_edit_and_delete_address_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/language/edit/3"))
        .and(body_json(json!({ "locale": "es", "language": "Español" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/language/delete/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_registry(&mock_server).await;

    let mut manager = console(&mock_server).language_manager(Arc::new(LogNotifier));
    manager.load().await;

    let spanish = manager.items()[1].clone();
    manager.open_edit(&spanish);
    manager.form_mut().unwrap().record.language = "Español".to_string();
    assert!(!manager.submit().await.unwrap().is_error());

    let notice = manager.delete(&spanish).await;
    assert!(!notice.is_error());
}

#[tokio::test]
async fn test_unsaved_language_cannot_be_deleted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = console(&mock_server).languages();
    assert!(api.delete(&Language::new("fr", "French")).await.is_err());
}
