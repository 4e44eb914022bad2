//! End-to-end tests of the page state machines against a mock backend.

use flowdesk_core::config::UiConfig;
use flowdesk_core::models::{Agent, SECRET_MASK, Step, Workflow};
use flowdesk_core::views::{EntityListView, ExecutionsView, FormTarget, StepsView};
use flowdesk_core::{ApiClient, ApiConfig, ConsoleError};
use mockito::{Matcher, Server};
use serde_json::json;

fn client(server: &Server) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: Some(server.url()),
        token: Some("integration-token".to_string()),
    })
    .unwrap()
}

#[tokio::test]
async fn test_add_agent_posts_once_and_shows_masked_row() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/agents")
        .match_header("authorization", "Bearer integration-token")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let post = server
        .mock("POST", "/agents")
        .match_header("authorization", "Bearer integration-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"Provider": "openai", "Secret": "sk-test"})))
        .with_status(201)
        .with_body(r#"{"ID": 12, "Provider": "openai", "Secret": "sk-test"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut view = EntityListView::<Agent>::new(client(&server));
    view.load().await.unwrap();
    view.start_create().unwrap();
    view.set_field(FormTarget::Create, "Provider", "openai").unwrap();
    view.set_field(FormTarget::Create, "Secret", "sk-test").unwrap();
    view.save_create().await.unwrap();

    let row = view.row(12).unwrap();
    assert_eq!(row.provider, "openai");
    assert_eq!(row.masked_secret(), SECRET_MASK);
    list.assert_async().await;
    post.assert_async().await;
}

#[tokio::test]
async fn test_workflow_without_name_never_reaches_backend() {
    let mut server = Server::new_async().await;
    let post = server.mock("POST", "/workflows").expect(0).create_async().await;

    let mut view = EntityListView::<Workflow>::new(client(&server));
    view.start_create().unwrap();
    view.set_field(FormTarget::Create, "Description", "no name").unwrap();

    let err = view.save_create().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    assert_eq!(view.error(), Some("Name is required"));
    post.assert_async().await;
}

#[tokio::test]
async fn test_update_then_delete_workflow() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/workflows")
        .with_status(200)
        .with_body(
            r#"[{"ID": 1, "Name": "Digest", "Description": "Daily"},
                {"ID": 2, "Name": "Weekly", "Description": "Mondays"}]"#,
        )
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/workflows/1")
        .match_body(Matcher::Json(json!({"Name": "Digest v2", "Description": "Daily"})))
        .with_status(200)
        .with_body(r#"{"ID": 1, "Name": "Digest v2", "Description": "Daily"}"#)
        .create_async()
        .await;
    let delete = server.mock("DELETE", "/workflows/2").with_status(204).create_async().await;

    let mut view = EntityListView::<Workflow>::new(client(&server));
    view.load().await.unwrap();

    view.start_edit(1).unwrap();
    view.set_field(FormTarget::Edit, "Name", "Digest v2").unwrap();
    view.save_edit().await.unwrap();
    let updated = view.row(1).unwrap();
    assert_eq!(updated.name, "Digest v2");
    assert_eq!(updated.description, "Daily");

    view.request_delete(2);
    view.confirm_delete().await.unwrap();
    assert!(view.row(2).is_none());
    assert_eq!(view.rows().len(), 1);

    put.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_failed_delete_keeps_row() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/workflows")
        .with_status(200)
        .with_body(r#"[{"ID": 1, "Name": "Digest"}, {"ID": 2, "Name": "Weekly"}]"#)
        .create_async()
        .await;
    server
        .mock("DELETE", "/workflows/1")
        .with_status(409)
        .with_body(r#"{"error": "workflow has steps"}"#)
        .create_async()
        .await;

    let mut view = EntityListView::<Workflow>::new(client(&server));
    view.load().await.unwrap();
    view.request_delete(1);

    let err = view.confirm_delete().await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(view.rows()[0].id, 1);
    assert_eq!(view.error(), Some("Request failed (409): workflow has steps"));
}

#[tokio::test]
async fn test_steps_page_loads_steps_and_agents() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/steps")
        .with_status(200)
        .with_body(
            r#"[{"id": 1, "name": "Fetch", "orderIndex": 1, "operationType": "HTTP",
                 "workflow": {"id": 3, "name": "Digest"}, "agent": null}]"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/agents")
        .with_status(200)
        .with_body(r#"[{"ID": 5, "Provider": "anthropic", "Secret": "x"}]"#)
        .create_async()
        .await;

    let mut view = StepsView::new(EntityListView::<Step>::new(client(&server)));
    view.load().await.unwrap();

    assert_eq!(view.visible_rows().len(), 1);
    assert_eq!(view.agents()[0].provider, "anthropic");
    assert_eq!(view.workflow_options()[0].name, "Digest");
}

#[tokio::test]
async fn test_executions_filters_and_paging() {
    let mut server = Server::new_async().await;
    let filtered = server
        .mock("GET", "/step-executions-grouped")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("to".into(), "2024-01-01T23:59:59Z".into()),
            Matcher::UrlEncoded("status".into(), "ERROR".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("pageSize".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"data": [{"execution": {"id": 8, "status": "ERROR", "workflow": {"name": "Digest"}},
                          "steps": [{"id": 80, "status": "ERROR", "output": "boom"}]}],
                "pagination": {"totalPages": 3}}"#,
        )
        .create_async()
        .await;

    let mut view = ExecutionsView::new(client(&server), &UiConfig::default());
    view.draft_filters_mut().set("to", "2024-01-01");
    view.draft_filters_mut().set("status", "ERROR");
    view.apply_filters().unwrap();
    view.load().await.unwrap();

    let pagination = view.pagination();
    assert_eq!(pagination.total_pages, 3);
    assert!(!pagination.can_prev());
    assert!(pagination.can_next());
    assert_eq!(view.groups()[0].steps[0].output, "boom");
    filtered.assert_async().await;
}
