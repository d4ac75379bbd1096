//! Commands parsed from argument lists and run against a live editor.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tasklane::{BoardEditor, HttpGateway, MemoryGateway, PersistenceGateway};
use tasklane_cli::{execute, Cli};

async fn editor_with(gateway: Arc<dyn PersistenceGateway>) -> BoardEditor {
    let mut editor = BoardEditor::new(gateway, Duration::from_secs(3));
    editor.load().await;
    editor
}

fn run(editor: &mut BoardEditor, args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["tasklane"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    execute(editor, cli.command, cli.format)
}

/// Board with columns X [one, two] and Y [three]; returns ids
fn seed(editor: &mut BoardEditor) -> (String, String, String, Vec<String>) {
    run(editor, &["boards", "create", "Sprint"]).unwrap();
    let board = editor.current_board().unwrap().id.to_string();
    run(editor, &["column", "add", &board, "X"]).unwrap();
    run(editor, &["column", "add", &board, "Y"]).unwrap();
    let order = editor.current_board().unwrap().column_order().to_vec();
    let (x, y) = (order[0].to_string(), order[1].to_string());
    for (column, content) in [(&x, "one"), (&x, "two"), (&y, "three")] {
        run(editor, &["task", "add", &board, column, content]).unwrap();
    }
    let tasks = editor
        .current_board()
        .unwrap()
        .tasks
        .keys()
        .map(|t| t.to_string())
        .collect();
    (board, x, y, tasks)
}

fn lane(editor: &BoardEditor, column: &str) -> Vec<String> {
    editor
        .current_board()
        .unwrap()
        .column(column)
        .unwrap()
        .task_ids
        .iter()
        .map(|t| t.to_string())
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_board_lifecycle() {
    let gateway = Arc::new(MemoryGateway::new());
    let mut editor = editor_with(gateway.clone()).await;

    let out = run(&mut editor, &["boards", "create"]).unwrap();
    assert!(out.contains("Project 1"));
    let id = editor.current_board().unwrap().id.to_string();

    run(&mut editor, &["boards", "rename", &id, "Launch"]).unwrap();
    assert!(run(&mut editor, &["boards", "rename", &id, "  "]).is_err());

    let json = run(&mut editor, &["--format", "json", "boards", "list"]).unwrap();
    let listed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(listed[0]["title"], "Launch");

    run(&mut editor, &["boards", "delete", &id]).unwrap();
    assert!(run(&mut editor, &["show", &id]).is_err());
    editor.flush().await;
    assert!(gateway.is_empty().await);
}

#[test_log::test(tokio::test)]
async fn test_drag_across_columns_with_index() {
    let mut editor = editor_with(Arc::new(MemoryGateway::new())).await;
    let (board, x, y, tasks) = seed(&mut editor);
    let (one, two, three) = (&tasks[0], &tasks[1], &tasks[2]);

    let over = format!("{}:0", three);
    run(&mut editor, &["drag", &board, one, "--over", &over, "--release", &y]).unwrap();
    assert_eq!(lane(&editor, &x), vec![two.clone()]);
    assert_eq!(lane(&editor, &y), vec![one.clone(), three.clone()]);
}

#[test_log::test(tokio::test)]
async fn test_drag_reorders_within_column_and_moves_columns() {
    let mut editor = editor_with(Arc::new(MemoryGateway::new())).await;
    let (board, x, y, tasks) = seed(&mut editor);

    // Released over the last hover target when --release is omitted
    run(&mut editor, &["drag", &board, &tasks[0], "--over", &tasks[1]]).unwrap();
    assert_eq!(lane(&editor, &x), vec![tasks[1].clone(), tasks[0].clone()]);

    run(&mut editor, &["drag", &board, &y, "--release", &x]).unwrap();
    let order: Vec<String> = editor
        .current_board()
        .unwrap()
        .column_order()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(order, vec![y, x]);
}

#[test_log::test(tokio::test)]
async fn test_cancelled_drag_leaves_board_unchanged() {
    let mut editor = editor_with(Arc::new(MemoryGateway::new())).await;
    let (board, _x, y, tasks) = seed(&mut editor);
    let before = editor.current_board().unwrap().clone();

    run(&mut editor, &["drag", &board, &tasks[0], "--over", &y, "--cancel"]).unwrap();
    assert_eq!(editor.current_board().unwrap(), &before);
    assert!(run(&mut editor, &["drag", &board, "ghost"]).is_err());
}

#[test_log::test(tokio::test)]
async fn test_task_details_and_checklist() {
    let mut editor = editor_with(Arc::new(MemoryGateway::new())).await;
    let (board, _x, _y, tasks) = seed(&mut editor);
    let task = &tasks[0];

    run(&mut editor, &["task", "describe", &board, task, "Details here"]).unwrap();
    run(&mut editor, &["task", "label", &board, task, "urgent"]).unwrap();
    run(&mut editor, &["task", "check", "add", &board, task, "write tests"]).unwrap();
    run(&mut editor, &["task", "check", "add", &board, task, "write docs"]).unwrap();

    let subtask = editor.current_board().unwrap().task(task).unwrap().subtasks()[0]
        .id
        .to_string();
    let out = run(&mut editor, &["task", "check", "toggle", &board, task, &subtask]).unwrap();
    assert!(out.contains("[x] write tests"));
    assert!(run(&mut editor, &["task", "check", "toggle", &board, task, "nope"]).is_err());

    run(&mut editor, &["task", "check", "clear", &board, task]).unwrap();
    let value = editor.current_board().unwrap().task(task).unwrap().clone();
    assert_eq!(value.description.as_deref(), Some("Details here"));
    assert_eq!(value.labels(), ["urgent".to_string()]);
    assert_eq!(value.subtasks().len(), 1);
    assert_eq!(value.progress().percent, 0);

    run(&mut editor, &["task", "label", &board, task, "urgent", "--remove"]).unwrap();
    assert!(editor.current_board().unwrap().task(task).unwrap().labels().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_show_filters_and_column_delete() {
    let mut editor = editor_with(Arc::new(MemoryGateway::new())).await;
    let (board, x, _y, _tasks) = seed(&mut editor);

    let out = run(&mut editor, &["show", &board, "--query", "thr"]).unwrap();
    assert!(out.contains("three"));
    assert!(!out.contains("two"));

    run(&mut editor, &["column", "delete", &board, &x]).unwrap();
    let current = editor.current_board().unwrap();
    assert_eq!(current.columns.len(), 1);
    assert_eq!(current.tasks.len(), 1);
    assert!(run(&mut editor, &["column", "delete", &board, &x]).is_err());
}

#[test_log::test(tokio::test)]
async fn test_commands_persist_through_service() {
    let (addr, handle) =
        tasklane_server::start_server(Arc::new(MemoryGateway::new()), "127.0.0.1:0")
            .await
            .unwrap();
    let url = format!("http://{}/api/boards", addr);

    let mut editor = editor_with(Arc::new(HttpGateway::new(&url))).await;
    let (board, _x, y, tasks) = seed(&mut editor);
    run(&mut editor, &["drag", &board, &tasks[0], "--over", &y]).unwrap();
    editor.flush().await;

    let mut fresh = editor_with(Arc::new(HttpGateway::new(&url))).await;
    let out = run(&mut fresh, &["--format", "json", "show", &board]).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        stored["columns"][y.as_str()]["taskIds"],
        serde_json::json!([tasks[2], tasks[0]])
    );

    handle.abort();
}
