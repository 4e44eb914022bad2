//! Drives the console through key presses against a mock backend.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use flowdesk_core::{ApiClient, ApiConfig, UiConfig};
use flowdesk_tui::app::App;
use flowdesk_tui::navigation::Route;
use flowdesk_tui::state::CrudPage;
use flowdesk_tui::views;
use mockito::{Matcher, Server};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::json;

fn app(server: &Server) -> App {
    let config = ApiConfig { base_url: Some(server.url()), token: Some("t".to_string()) };
    App::new(ApiClient::new(&config).unwrap(), &UiConfig::default(), server.url())
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(140, 40)).unwrap()
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) {
    terminal.draw(|frame| views::render(frame, app)).unwrap();
}

async fn press(app: &mut App, key: KeyCode) {
    app.handle_key(key, KeyModifiers::NONE).await.unwrap();
}

async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

/// Waits for outstanding execution loads to land.
async fn settle(app: &mut App) {
    for _ in 0..200 {
        app.poll_loads();
        if !app.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("execution load never finished");
}

#[tokio::test]
async fn test_add_agent_from_the_keyboard() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/agents").with_body("[]").create_async().await;
    let post = server
        .mock("POST", "/agents")
        .match_body(Matcher::Json(json!({"Provider": "openai", "Secret": "sk-test"})))
        .with_status(201)
        .with_body(r#"{"ID": 5, "Provider": "openai", "Secret": "sk-test"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut app = app(&server);
    let mut terminal = terminal();
    press(&mut app, KeyCode::Char('3')).await;
    assert_eq!(app.current_route(), Route::Agents);
    draw(&mut terminal, &mut app);

    press(&mut app, KeyCode::Char('n')).await;
    assert!(app.overlays.form.is_some());
    type_text(&mut app, "openai").await;
    press(&mut app, KeyCode::Tab).await;
    type_text(&mut app, "sk-test").await;
    draw(&mut terminal, &mut app);
    app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL).await.unwrap();

    post.assert_async().await;
    assert!(app.overlays.form.is_none());
    assert_eq!(app.agents.list().rows().len(), 1);
    assert_eq!(app.agents.list().rows()[0].provider, "openai");

    draw(&mut terminal, &mut app);
    let screen = format!("{:?}", terminal.backend().buffer());
    assert!(screen.contains("openai"));
    assert!(!screen.contains("sk-test"));
}

#[tokio::test]
async fn test_invalid_create_keeps_form_open() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/workflows").with_body("[]").create_async().await;
    let post = server.mock("POST", "/workflows").expect(0).create_async().await;

    let mut app = app(&server);
    press(&mut app, KeyCode::Char('2')).await;
    press(&mut app, KeyCode::Char('n')).await;
    app.handle_key(KeyCode::Char('s'), KeyModifiers::CONTROL).await.unwrap();

    assert!(app.overlays.form.is_some());
    assert_eq!(app.workflows.list().error(), Some("Name is required"));
    post.assert_async().await;
}

#[tokio::test]
async fn test_delete_asks_first() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/workflows")
        .with_body(r#"[{"ID": 1, "Name": "a"}, {"ID": 2, "Name": "b"}]"#)
        .create_async()
        .await;
    let delete = server.mock("DELETE", "/workflows/2").with_status(204).expect(1).create_async().await;

    let mut app = app(&server);
    let mut terminal = terminal();
    press(&mut app, KeyCode::Char('2')).await;
    draw(&mut terminal, &mut app);
    press(&mut app, KeyCode::Down).await;

    // Cancel is preselected
    press(&mut app, KeyCode::Char('d')).await;
    assert!(app.overlays.dialog_manager.is_open());
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.workflows.list().rows().len(), 2);
    assert_eq!(app.workflows.list().pending_delete(), None);

    press(&mut app, KeyCode::Char('d')).await;
    press(&mut app, KeyCode::Char('y')).await;

    delete.assert_async().await;
    let ids: Vec<i64> = app.workflows.list().rows().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_steps_filter_preselects_workflow() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/steps")
        .with_body(
            json!([
                {"ID": 1, "name": "Draft", "orderIndex": 1, "workflow": {"ID": 7, "Name": "Newsletter"}},
                {"ID": 2, "name": "Send", "orderIndex": 2, "workflow": {"ID": 8, "Name": "Digest"}}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server.mock("GET", "/agents").with_body(r#"[{"ID": 3, "Provider": "openai"}]"#).create_async().await;
    server
        .mock("GET", "/workflows")
        .with_body(r#"[{"ID": 7, "Name": "Newsletter"}, {"ID": 8, "Name": "Digest"}]"#)
        .create_async()
        .await;

    let mut app = app(&server);
    press(&mut app, KeyCode::Char('4')).await;
    assert_eq!(app.steps.list().rows().len(), 2);

    press(&mut app, KeyCode::Char('w')).await;
    assert_eq!(app.steps.visible().len(), 1);

    press(&mut app, KeyCode::Char('n')).await;
    let form = app.overlays.form.as_ref().unwrap();
    assert_eq!(form.value("WorkflowID"), Some("7"));
    assert_eq!(form.value("OperationType"), Some("AI_CLIENT_CALL"));

    press(&mut app, KeyCode::Esc).await;
    assert!(app.overlays.form.is_none());
    assert!(!app.steps.list().is_creating());
}

#[tokio::test]
async fn test_server_scoped_steps_reload() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/steps")
        .with_body(
            json!([
                {"ID": 1, "name": "Draft", "workflow": {"ID": 7, "Name": "Newsletter"}},
                {"ID": 2, "name": "Send", "workflow": {"ID": 8, "Name": "Digest"}}
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server.mock("GET", "/agents").with_body("[]").create_async().await;
    server.mock("GET", "/workflows").with_body("[]").create_async().await;
    let scoped = server
        .mock("GET", "/steps/by-workflow/7")
        .with_body(r#"[{"ID": 1, "name": "Draft", "workflow": {"ID": 7, "Name": "Newsletter"}}]"#)
        .expect(1)
        .create_async()
        .await;

    let mut app = app(&server);
    press(&mut app, KeyCode::Char('4')).await;
    press(&mut app, KeyCode::Char('w')).await;
    press(&mut app, KeyCode::Char('W')).await;

    scoped.assert_async().await;
    assert_eq!(app.steps.list().rows().len(), 1);
    assert_eq!(app.steps.visible().len(), 1);
    assert!(app.overlays.toast_manager.toasts().is_empty());
}

#[tokio::test]
async fn test_execution_paging_reloads() {
    let mut server = Server::new_async().await;
    let page = |n: u32| {
        json!({
            "data": [{"execution": {"id": n, "status": "DONE", "workflow": {"name": "wf"}}, "steps": []}],
            "pagination": {"totalPages": 3}
        })
        .to_string()
    };
    let first = server
        .mock("GET", "/step-executions-grouped")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("pageSize".into(), "10".into()),
        ]))
        .with_body(page(1))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/step-executions-grouped")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_body(page(2))
        .create_async()
        .await;
    let larger = server
        .mock("GET", "/step-executions-grouped")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("pageSize".into(), "20".into()),
        ]))
        .with_body(page(1))
        .create_async()
        .await;

    let mut app = app(&server);
    press(&mut app, KeyCode::Char('5')).await;
    settle(&mut app).await;
    first.assert_async().await;
    let pagination = app.executions.view().pagination();
    assert_eq!((pagination.page, pagination.total_pages), (1, 3));
    assert!(!pagination.can_prev());

    press(&mut app, KeyCode::Char('[')).await;
    assert!(!app.is_loading());

    press(&mut app, KeyCode::Char(']')).await;
    settle(&mut app).await;
    second.assert_async().await;
    assert_eq!(app.executions.view().groups()[0].execution.id, 2);

    press(&mut app, KeyCode::Char('+')).await;
    settle(&mut app).await;
    larger.assert_async().await;
    assert_eq!(app.executions.view().pagination().page, 1);
    assert_eq!(app.executions.view().pagination().page_size, 20);
}

#[tokio::test]
async fn test_unreachable_backend_raises_toast() {
    let config = ApiConfig { base_url: Some("http://127.0.0.1:9".to_string()), token: None };
    let mut app = App::new(ApiClient::new(&config).unwrap(), &UiConfig::default(), "http://127.0.0.1:9");

    press(&mut app, KeyCode::Char('2')).await;
    assert!(app.workflows.list().error().is_some());
    assert_eq!(app.overlays.toast_manager.toasts().len(), 1);
}

#[tokio::test]
async fn test_every_page_renders() {
    let mut server = Server::new_async().await;
    for path in ["/workflows", "/agents", "/steps", "/content-reviews"] {
        server.mock("GET", path).with_body("[]").create_async().await;
    }
    server
        .mock("GET", "/step-executions-grouped")
        .match_query(Matcher::Any)
        .with_body(r#"{"data": [], "pagination": {"totalPages": 1}}"#)
        .create_async()
        .await;

    let mut app = app(&server);
    let mut terminal = terminal();
    for route in Route::ALL {
        app.navigate(route).await;
        settle(&mut app).await;
        draw(&mut terminal, &mut app);
        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains(route.title()), "{} not on screen", route.title());
    }
}
