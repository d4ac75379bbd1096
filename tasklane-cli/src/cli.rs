use clap::{Parser, Subcommand, ValueEnum};
use std::str::FromStr;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tasklane")]
#[command(version)]
#[command(about = "Kanban boards in the terminal")]
#[command(long_about = "
tasklane edits kanban boards stored by a tasklane-server instance.

Global arguments can be used with any command:
  --verbose     Show detailed information and trace output
  --debug       Enable debug logging
  --quiet       Suppress all output except errors
  --format      Output format (table, json)
  --api-url     Board service URL, overriding tasklane.toml and TASKLANE_API_URL

Example usage:
  tasklane boards create \"Roadmap\"
  tasklane column add <BOARD> \"To Do\"
  tasklane task add <BOARD> <COLUMN> \"Write the docs\"
  tasklane drag <BOARD> <TASK> --over <OTHER_TASK>:0 --release <COLUMN>
  tasklane --format=json show <BOARD>
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Board service URL, e.g. http://localhost:5000/api/boards
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage boards
    Boards {
        #[command(subcommand)]
        action: BoardAction,
    },
    /// Print a board, one table column per board column
    Show {
        board: String,
        /// Only show tasks whose content contains this text
        #[arg(long)]
        query: Option<String>,
    },
    /// Manage columns of a board
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },
    /// Manage tasks of a board
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Drag a column or task the way a pointer would
    #[command(long_about = "
Runs one drag gesture: start on ACTIVE, hover each --over target in turn,
then release. Hover targets are column or task ids; a task target may carry
an insertion index as ID:INDEX.

The gesture is released over --release when given, otherwise over the last
hover target, otherwise outside any target. --cancel abandons the gesture
instead, restoring the board.
")]
    Drag {
        board: String,
        /// Column or task to pick up
        active: String,
        /// Hover target, in order (ID or ID:INDEX)
        #[arg(long = "over", value_name = "ID[:INDEX]")]
        over: Vec<HoverTarget>,
        /// Target to release over
        #[arg(long, value_name = "ID", conflicts_with = "cancel")]
        release: Option<String>,
        /// Cancel the gesture instead of releasing it
        #[arg(long)]
        cancel: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardAction {
    /// List boards, most recently updated first
    List,
    /// Create a board
    Create {
        /// Defaults to "Project N"
        title: Option<String>,
    },
    Rename {
        board: String,
        title: String,
    },
    Delete {
        board: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Append a column
    Add { board: String, title: String },
    /// Delete a column and its tasks
    Delete { board: String, column: String },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Append a task to a column
    Add {
        board: String,
        column: String,
        content: String,
    },
    /// Set a task's description
    Describe {
        board: String,
        task: String,
        description: String,
    },
    /// Add or remove a label
    Label {
        board: String,
        task: String,
        label: String,
        #[arg(long)]
        remove: bool,
    },
    /// Edit a task's checklist
    Check {
        #[command(subcommand)]
        action: CheckAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CheckAction {
    Add {
        board: String,
        task: String,
        content: String,
    },
    Toggle {
        board: String,
        task: String,
        subtask: String,
    },
    Remove {
        board: String,
        task: String,
        subtask: String,
    },
    /// Remove every completed item
    Clear { board: String, task: String },
}

/// A hover step of a scripted drag: a target id and an optional index
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTarget {
    pub id: String,
    pub index: Option<usize>,
}

impl FromStr for HoverTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, index) = match s.rsplit_once(':') {
            Some((id, index)) => {
                let index = index
                    .parse::<usize>()
                    .map_err(|_| format!("invalid index in '{}'", s))?;
                (id, Some(index))
            }
            None => (s, None),
        };
        if id.is_empty() {
            return Err("hover target id cannot be empty".to_string());
        }
        Ok(Self {
            id: id.to_string(),
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_target_parsing() {
        assert_eq!(
            "t3:1".parse::<HoverTarget>().unwrap(),
            HoverTarget {
                id: "t3".into(),
                index: Some(1)
            }
        );
        assert_eq!("col".parse::<HoverTarget>().unwrap().index, None);
        assert!("t3:x".parse::<HoverTarget>().is_err());
        assert!(":2".parse::<HoverTarget>().is_err());
    }

    #[test]
    fn test_drag_arguments() {
        let cli = Cli::try_parse_from([
            "tasklane", "drag", "b1", "t1", "--over", "Y", "--over", "t3:0", "--release", "Y",
        ])
        .unwrap();
        match cli.command {
            Commands::Drag {
                over, release, cancel, ..
            } => {
                assert_eq!(over.len(), 2);
                assert_eq!(over[1].index, Some(0));
                assert_eq!(release.as_deref(), Some("Y"));
                assert!(!cancel);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_release_conflicts_with_cancel() {
        let result =
            Cli::try_parse_from(["tasklane", "drag", "b1", "t1", "--release", "Y", "--cancel"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tasklane", "boards", "list", "--format", "json", "-q"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
    }
}
