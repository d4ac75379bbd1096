//! Command execution against a loaded editor

use crate::cli::{BoardAction, CheckAction, ColumnAction, Commands, OutputFormat, TaskAction};
use crate::render;
use anyhow::{anyhow, bail, Result};
use tasklane::types::SubtaskId;
use tasklane::{Board, BoardEditor, Task};
use tracing::debug;

/// Run one command and return what should be printed
pub fn execute(
    editor: &mut BoardEditor,
    command: Commands,
    format: OutputFormat,
) -> Result<String> {
    match command {
        Commands::Boards { action } => boards(editor, action, format),
        Commands::Show { board, query } => {
            let board = select(editor, &board)?;
            render::board(board, query.as_deref().unwrap_or(""), format)
        }
        Commands::Column { action } => column(editor, action, format),
        Commands::Task { action } => task(editor, action, format),
        Commands::Drag {
            board,
            active,
            over,
            release,
            cancel,
        } => {
            select(editor, &board)?;
            if !editor.drag_start(&active) {
                bail!("nothing to drag with id {}", active);
            }
            for hover in &over {
                let moved = editor.drag_over(&active, Some(&hover.id), hover.index);
                debug!(over = %hover.id, moved, "hover");
            }
            if cancel {
                editor.drag_cancel();
            } else {
                let target = release.or_else(|| over.last().map(|h| h.id.clone()));
                let queued = editor.drag_end(&active, target.as_deref());
                debug!(queued, "released");
            }
            render::board(current(editor)?, "", format)
        }
    }
}

fn boards(editor: &mut BoardEditor, action: BoardAction, format: OutputFormat) -> Result<String> {
    match action {
        BoardAction::List => render::boards(editor.boards(), format),
        BoardAction::Create { title } => {
            editor.create_board(title.as_deref());
            render::boards(std::slice::from_ref(current(editor)?), format)
        }
        BoardAction::Rename { board, title } => {
            select(editor, &board)?;
            if !editor.rename_board(&board, &title) {
                bail!("board title cannot be blank");
            }
            render::boards(std::slice::from_ref(current(editor)?), format)
        }
        BoardAction::Delete { board } => {
            if !editor.delete_board(&board) {
                bail!("board not found: {}", board);
            }
            Ok(format!("Deleted board {}", board))
        }
    }
}

fn column(editor: &mut BoardEditor, action: ColumnAction, format: OutputFormat) -> Result<String> {
    match action {
        ColumnAction::Add { board, title } => {
            select(editor, &board)?;
            editor
                .add_column(&title)
                .ok_or_else(|| anyhow!("column title cannot be blank"))?;
        }
        ColumnAction::Delete { board, column } => {
            select(editor, &board)?;
            if !editor.delete_column(&column) {
                bail!("column not found: {}", column);
            }
        }
    }
    render::board(current(editor)?, "", format)
}

fn task(editor: &mut BoardEditor, action: TaskAction, format: OutputFormat) -> Result<String> {
    match action {
        TaskAction::Add {
            board,
            column,
            content,
        } => {
            select(editor, &board)?;
            if content.trim().is_empty() {
                bail!("task content cannot be blank");
            }
            let id = editor
                .add_task(&column, &content)
                .ok_or_else(|| anyhow!("column not found: {}", column))?;
            show_task(editor, id.as_str(), format)
        }
        TaskAction::Describe {
            board,
            task,
            description,
        } => edit_task(editor, &board, &task, format, |t| {
            t.description = Some(description).filter(|d| !d.trim().is_empty());
            Ok(())
        }),
        TaskAction::Label {
            board,
            task,
            label,
            remove,
        } => edit_task(editor, &board, &task, format, |t| {
            let changed = if remove {
                t.remove_label(&label)
            } else {
                t.add_label(&label)
            };
            debug!(label = %label, changed, "label");
            Ok(())
        }),
        TaskAction::Check { action } => checklist(editor, action, format),
    }
}

fn checklist(
    editor: &mut BoardEditor,
    action: CheckAction,
    format: OutputFormat,
) -> Result<String> {
    match action {
        CheckAction::Add {
            board,
            task,
            content,
        } => edit_task(editor, &board, &task, format, |t| {
            t.add_subtask(&content)?;
            Ok(())
        }),
        CheckAction::Toggle {
            board,
            task,
            subtask,
        } => edit_task(editor, &board, &task, format, |t| {
            t.toggle_subtask(&SubtaskId::from(subtask.as_str()))
                .ok_or_else(|| anyhow!("checklist item not found: {}", subtask))?;
            Ok(())
        }),
        CheckAction::Remove {
            board,
            task,
            subtask,
        } => edit_task(editor, &board, &task, format, |t| {
            if !t.remove_subtask(&SubtaskId::from(subtask.as_str())) {
                bail!("checklist item not found: {}", subtask);
            }
            Ok(())
        }),
        CheckAction::Clear { board, task } => edit_task(editor, &board, &task, format, |t| {
            let removed = t.clear_completed();
            debug!(removed, "cleared completed items");
            Ok(())
        }),
    }
}

/// Apply `edit` to a copy of the task and write it back through the editor
fn edit_task(
    editor: &mut BoardEditor,
    board: &str,
    task_id: &str,
    format: OutputFormat,
    edit: impl FnOnce(&mut Task) -> Result<()>,
) -> Result<String> {
    let mut task = select(editor, board)?
        .task(task_id)
        .cloned()
        .ok_or_else(|| anyhow!("task not found: {}", task_id))?;
    edit(&mut task)?;
    editor.update_task(task);
    show_task(editor, task_id, format)
}

fn show_task(editor: &BoardEditor, task_id: &str, format: OutputFormat) -> Result<String> {
    let task = current(editor)?
        .task(task_id)
        .ok_or_else(|| anyhow!("task not found: {}", task_id))?;
    render::task(task, editor.column_title_for_task(task_id), format)
}

fn select<'a>(editor: &'a mut BoardEditor, id: &str) -> Result<&'a Board> {
    if !editor.select_board(id) {
        bail!("board not found: {}", id);
    }
    current(editor)
}

fn current(editor: &BoardEditor) -> Result<&Board> {
    editor
        .current_board()
        .ok_or_else(|| anyhow!("no board selected"))
}
