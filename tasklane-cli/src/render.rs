//! Table and JSON output

use crate::cli::OutputFormat;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::Serialize;
use tasklane::{Board, Task};

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Board summaries: id, title, sizes and last update
pub fn boards(boards: &[Board], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(boards);
    }
    if boards.is_empty() {
        return Ok("No boards yet. Create one with `tasklane boards create`.".to_string());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Columns", "Tasks", "Updated"]);
    for board in boards {
        table.add_row(vec![
            Cell::new(&board.id),
            Cell::new(&board.title),
            Cell::new(board.columns.len()),
            Cell::new(board.tasks.len()),
            Cell::new(
                board
                    .updated_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    Ok(table.to_string())
}

/// One board laid out as lanes: a table column per board column, tasks
/// top to bottom, filtered by `query`
pub fn board(board: &Board, query: &str, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(board);
    }

    let lanes: Vec<Vec<&Task>> = board
        .column_order()
        .into_iter()
        .map(|id| board.filtered_tasks(id.as_str(), query))
        .collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(board.columns.values().zip(&lanes).map(|(column, tasks)| {
        format!("{} ({})\n{}", column.title, tasks.len(), column.id)
    }));

    let depth = lanes.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..depth {
        table.add_row(
            lanes
                .iter()
                .map(|tasks| tasks.get(row).map(|t| card(t)).unwrap_or_default()),
        );
    }

    Ok(format!("{} [{}]\n{}", board.title, board.id, table))
}

/// A single task with its details
pub fn task(task: &Task, column: Option<&str>, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return to_json(task);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec!["ID", task.id.as_str()]);
    table.add_row(vec!["Content", task.content.as_str()]);
    table.add_row(vec!["Column", column.unwrap_or("-")]);
    if let Some(description) = &task.description {
        table.add_row(vec!["Description", description.as_str()]);
    }
    if !task.labels().is_empty() {
        table.add_row(vec!["Labels".to_string(), task.labels().join(", ")]);
    }
    for subtask in task.subtasks() {
        let mark = if subtask.completed { "[x]" } else { "[ ]" };
        table.add_row(vec![
            subtask.id.to_string(),
            format!("{} {}", mark, subtask.content),
        ]);
    }
    Ok(table.to_string())
}

fn card(task: &Task) -> String {
    let mut text = format!("{}\n{}", task.content, task.id);
    if !task.labels().is_empty() {
        text.push_str(&format!("\n#{}", task.labels().join(" #")));
    }
    let progress = task.progress();
    if progress.total > 0 {
        text.push_str(&format!(
            "\n{}/{} done ({}%)",
            progress.completed, progress.total, progress.percent
        ));
    }
    text
}
