use serde_json::{json, Value};
use std::sync::Arc;
use fitness_admin::articles::{Article, ArticleStatus};
use fitness_admin::config::ClientOptions;
use fitness_admin::error::{ErrorKind, LogNotifier};
use fitness_admin::manager::{FormMode, ListFilter};
use fitness_admin::AdminConsole;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn console(server: &MockServer) -> AdminConsole {
    AdminConsole::new(ClientOptions::new(&server.uri(), "owner-1").with_page_size_hint(8)).unwrap()
}

fn article_json(id: &str, title: &str, locale: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "body": "Stretch for ten minutes every morning.",
        "imageUrl": null,
        "topic": "mobility",
        "type": "tip",
        "locale": locale,
        "status": "Published",
        "createdAt": "2024-03-01T09:00:00Z",
        "updatedAt": "2024-03-02T09:00:00Z",
        "userId": "owner-1"
    })
}

fn listing(items: Vec<Value>) -> Value {
    json!({
        "data": items,
        "currentPageNumber": 1,
        "pageSize": 8,
        "totalPages": 1
    })
}

#[tokio::test]
async fn test_create_adds_a_row_after_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/owner-1/posts"))
        .and(body_json(json!({
            "title": "T",
            "body": "B",
            "imageUrl": null,
            "type": "",
            "topic": "",
            "locale": "en",
            "category": null,
            "source": null,
            "status": "Draft"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![article_json("a1", "T", "en")])))
        .mount(&mock_server)
        .await;

    let mut manager = console(&mock_server).article_manager(Arc::new(LogNotifier));
    manager.load().await;
    assert!(manager.items().is_empty());

    assert!(manager.open_create());
    {
        let form = manager.form_mut().unwrap();
        assert_eq!(form.mode, FormMode::Create);
        form.record.title = "T".to_string();
        form.record.body = "B".to_string();
    }

    let notice = manager.submit().await.unwrap();
    assert_eq!(notice.message, "Article Created Successfully");
    assert_eq!(manager.items().len(), 1);
    assert_eq!(manager.items()[0].title, "T");
}

#[tokio::test]
async fn test_locale_filter_is_applied_server_side() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .and(query_param("locale", "es"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![article_json("a2", "Hola", "es")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut manager = console(&mock_server).article_manager(Arc::new(LogNotifier));
    assert!(manager.set_locale(Some("es")).await);

    assert_eq!(manager.filter().locale.as_deref(), Some("es"));
    assert_eq!(manager.items().len(), 1);
    assert_eq!(manager.items()[0].locale, "es");
    assert_eq!(manager.page_info().page, 1);
}

#[tokio::test]
async fn test_legacy_locale_maps_are_collapsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts/a3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "a3",
                "title": { "es": "Hola", "en": "Hello" },
                "body": { "es": "Cuerpo" },
                "locale": "en",
                "status": "draft"
            }
        })))
        .mount(&mock_server)
        .await;

    let article = console(&mock_server).articles().get("a3").await.unwrap();
    assert_eq!(article.title, "Hello");
    assert_eq!(article.body, "Cuerpo");
    assert_eq!(article.status, ArticleStatus::Draft);
}

#[tokio::test]
async fn test_change_status_and_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/admin/article/changeStatus"))
        .and(body_json(json!({ "id": "a1", "status": "Unpublished" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Status changed" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let article: Article = serde_json::from_value(article_json("a1", "Stretch", "en")).unwrap();
    let mut manager = console(&mock_server).article_manager(Arc::new(LogNotifier));

    let notice = manager.change_status(&article, ArticleStatus::Unpublished).await;
    assert_eq!(notice.message, "Status changed");
}

#[tokio::test]
async fn test_delete_uses_owner_scoped_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/owner-1/posts/a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let article: Article = serde_json::from_value(article_json("a1", "Stretch", "en")).unwrap();
    let mut manager = console(&mock_server).article_manager(Arc::new(LogNotifier));

    let notice = manager.delete(&article).await;
    assert_eq!(notice.message, "Article Deleted Successfully");
}

#[tokio::test]
async fn test_liked_articles() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/liked-articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [article_json("a1", "Stretch", "en")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/owner-1/liked-articles"))
        .and(body_json(json!({ "articleId": "a9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Added" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = console(&mock_server).articles();
    let liked = api.liked_articles().await.unwrap();
    assert_eq!(liked[0].id, "a1");

    assert_eq!(api.add_liked("a9").await.unwrap().as_deref(), Some("Added"));
}

#[tokio::test]
async fn test_missing_owner_is_a_config_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let console = AdminConsole::new(ClientOptions::new(&mock_server.uri(), "")).unwrap();
    let err = console.articles().list(1, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Client);
}

#[tokio::test]
async fn test_filter_and_page_in_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .and(query_param("locale", "es"))
        .and(query_param("pageNumber", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [article_json("a7", "Hola", "es")],
            "currentPageNumber": 3,
            "pageSize": 8,
            "totalPages": 4
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut manager = console(&mock_server).article_manager(Arc::new(LogNotifier));
    assert!(manager.set_filter_at(ListFilter::locale("es"), 3).await);

    assert_eq!(manager.fetch_count(), 1);
    assert_eq!(manager.page_info().page, 3);
    assert_eq!(manager.items()[0].id, "a7");
}

#[tokio::test]
async fn test_title_search_filters_fetched_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/owner-1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
            article_json("a1", "Morning Stretch", "en"),
            article_json("a2", "Hydration basics", "en"),
            article_json("a3", "Stretching after runs", "en"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut manager = console(&mock_server).article_manager(Arc::new(LogNotifier));
    manager.load().await;

    manager.set_search("STRETCH");
    let ids: Vec<&str> = manager.visible().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a3"]);

    manager.set_search("yoga");
    assert!(manager.visible().is_empty());

    manager.set_search("");
    assert_eq!(manager.visible().len(), 3);
}
