//! End-to-end tests: the service on an ephemeral port, driven over HTTP.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tasklane::{
    Board, BoardEditor, BoardError, BoardId, Column, FileGateway, HttpGateway, LoadState,
    MemoryGateway, PersistenceGateway, SaveStatus, Task,
};
use tasklane_server::start_server;
use tempfile::TempDir;

async fn spawn_memory() -> SocketAddr {
    let (addr, _handle) = start_server(Arc::new(MemoryGateway::new()), "127.0.0.1:0")
        .await
        .unwrap();
    addr
}

fn boards_url(addr: SocketAddr) -> String {
    format!("http://{}/api/boards", addr)
}

#[test_log::test(tokio::test)]
async fn test_http_gateway_against_file_storage() {
    let temp = TempDir::new().unwrap();
    let storage = Arc::new(FileGateway::new(temp.path().join("boards")));
    let (addr, handle) = start_server(storage, "127.0.0.1:0").await.unwrap();
    let gateway = HttpGateway::new(boards_url(addr));

    let mut board = Board::with_id("b1", "Roadmap");
    board.add_column(Column::with_id("todo", "To Do")).unwrap();
    board.add_task("todo", Task::with_id("t1", "Plan")).unwrap();

    let created = gateway.create(&board).await.unwrap();
    assert!(created.created_at.is_some());
    assert!(temp.path().join("boards").join("b1.json").exists());

    board.title = "Roadmap 2025".into();
    let replaced = gateway.replace(&board.id, &board).await.unwrap();
    assert_eq!(replaced.title, "Roadmap 2025");
    assert_eq!(replaced.created_at, created.created_at);

    let listed = gateway.list_all().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].column_of("t1").unwrap(), "todo");

    let missing = gateway
        .replace(&BoardId::from("ghost"), &Board::with_id("ghost", "x"))
        .await;
    assert!(matches!(missing, Err(BoardError::BoardNotFound { .. })));

    let duplicate = gateway.create(&board).await;
    assert!(matches!(duplicate, Err(BoardError::Http { status: 400, .. })));

    gateway.delete(&board.id).await.unwrap();
    assert!(gateway.list_all().await.unwrap().is_empty());

    handle.abort();
}

#[test_log::test(tokio::test)]
async fn test_status_codes_and_messages() {
    let addr = spawn_memory().await;
    let client = reqwest::Client::new();
    let url = boards_url(addr);

    let health = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status().as_u16(), 200);

    let created = client
        .post(&url)
        .json(&json!({ "id": "b1", "title": "T", "columnOrder": [], "columns": {}, "tasks": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201);

    let missing = client
        .put(format!("{}/nope", url))
        .json(&json!({ "id": "nope", "title": "T" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Board not found" }));

    let garbage = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status().as_u16(), 400);
    let body: Value = garbage.json().await.unwrap();
    assert!(body["message"].is_string());

    let dangling = client
        .post(&url)
        .json(&json!({
            "id": "b2",
            "title": "Broken",
            "columnOrder": ["c"],
            "columns": { "c": { "id": "c", "title": "C", "taskIds": ["ghost"] } },
            "tasks": {}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(dangling.status().as_u16(), 400);

    let deleted = client.delete(format!("{}/b1", url)).send().await.unwrap();
    assert_eq!(deleted.status().as_u16(), 200);
    let body: Value = deleted.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Board deleted" }));
}

#[test_log::test(tokio::test)]
async fn test_list_is_most_recent_first() {
    let addr = spawn_memory().await;
    let gateway = HttpGateway::new(boards_url(addr));
    for id in ["a", "b", "c"] {
        gateway.create(&Board::with_id(id, id)).await.unwrap();
    }
    gateway
        .replace(&BoardId::from("a"), &Board::with_id("a", "touched"))
        .await
        .unwrap();

    let ids: Vec<String> = gateway
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
}

#[test_log::test(tokio::test)]
async fn test_editor_drag_is_persisted_through_service() {
    let addr = spawn_memory().await;
    let gateway = Arc::new(HttpGateway::new(boards_url(addr)));
    let mut editor = BoardEditor::new(gateway.clone(), Duration::from_secs(3));
    assert_eq!(editor.load().await, &LoadState::Ready);

    let board_id = editor.create_board(Some("Sprint"));
    let x = editor.add_column("X").unwrap();
    let y = editor.add_column("Y").unwrap();
    let t1 = editor.add_task(x.as_str(), "one").unwrap();
    let t2 = editor.add_task(x.as_str(), "two").unwrap();
    let t3 = editor.add_task(y.as_str(), "three").unwrap();

    assert!(editor.drag_start(t1.as_str()));
    assert!(editor.drag_over(t1.as_str(), Some(t3.as_str()), Some(1)));
    assert!(editor.drag_end(t1.as_str(), Some(y.as_str())));
    editor.flush().await;
    assert_eq!(editor.save_status(), SaveStatus::Saved);

    // A second client sees the committed order
    let mut reader = BoardEditor::new(gateway, Duration::from_secs(3));
    reader.load().await;
    assert!(reader.select_board(board_id.as_str()));
    let stored = reader.current_board().unwrap();
    assert_eq!(stored.column(x.as_str()).unwrap().task_ids, vec![t2]);
    assert_eq!(stored.column(y.as_str()).unwrap().task_ids, vec![t3, t1]);
}

#[test_log::test(tokio::test)]
async fn test_editor_reports_unreachable_service() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = Arc::new(HttpGateway::new(boards_url(addr)));
    let mut editor = BoardEditor::new(gateway, Duration::from_secs(3));
    assert!(matches!(editor.load().await, LoadState::Failed(_)));
}
