//! Command-line entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and a store backend into `TodoService`.
//! - Render service outcomes as plain text lines.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use todos_core::db::open_pool;
use todos_core::{
    init_logging_from_config, register_user, CoreConfig, ListId, ServiceError, SessionData,
    SessionTodoStore, SqliteTodoStore, TodoService, TodoStore,
};

/// Multi-user todo lists.
#[derive(Parser, Debug)]
#[command(name = "todos", version, about = "Multi-user todo lists")]
struct Cli {
    /// Path to the SQLite database (overrides `TODOS_DATABASE_PATH`).
    #[arg(long)]
    db: Option<PathBuf>,

    /// User the store is bound to.
    #[arg(long, default_value = "admin")]
    user: String,

    /// Use the in-memory backend persisted as JSON at this path.
    #[arg(long, value_name = "FILE", conflicts_with = "db")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core liveness and version.
    Ping,
    /// Register a user in the database.
    AddUser { username: String, password: String },
    /// Check a username/password pair.
    SignIn { username: String, password: String },
    /// Show every list with completion counts.
    Lists,
    /// Show one list with its items.
    Show { list_id: ListId },
    NewList { title: String },
    RenameList { list_id: ListId, title: String },
    DeleteList { list_id: ListId },
    /// Add an item to a list.
    Add { list_id: ListId, title: String },
    /// Flip an item between done and not done.
    Toggle { list_id: ListId, item_id: i64 },
    Delete { list_id: ListId, item_id: i64 },
    /// Mark every item of a list done.
    CompleteAll { list_id: ListId },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env().context("Failed to read configuration")?;
    if let Some(db) = cli.db.clone() {
        config.database_path = db;
    }
    init_logging_from_config(&config).context("Failed to initialize logging")?;

    if let Command::Ping = cli.command {
        println!("todos_core ping={}", todos_core::ping());
        println!("todos_core version={}", todos_core::core_version());
        return Ok(());
    }

    let outcome = match cli.session.as_deref() {
        Some(path) => run_in_session(path, &cli),
        None => run_in_database(&config, &cli),
    };
    if let Err(err) = &outcome {
        error!("event=cli_command module=cli status=error error={err:#}");
    }
    outcome
}

fn run_in_database(config: &CoreConfig, cli: &Cli) -> Result<()> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    let pool = open_pool(&config.database_path, &config.pool).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.database_path.display()
        )
    })?;

    if let Command::AddUser { username, password } = &cli.command {
        register_user(&pool, username.trim(), password)
            .with_context(|| format!("Failed to register user {}", username.trim()))?;
        info!("event=user_register module=cli status=ok");
        println!("Registered {}.", username.trim());
        return Ok(());
    }

    let mut service = TodoService::new(SqliteTodoStore::new(pool, cli.user.as_str()));
    run_command(&mut service, &cli.command)
}

fn run_in_session(path: &Path, cli: &Cli) -> Result<()> {
    if let Command::AddUser { .. } = cli.command {
        bail!("add-user needs the database backend");
    }

    let mut session = load_session(path)?;
    {
        let mut service = TodoService::new(SessionTodoStore::new(&mut session)?);
        run_command(&mut service, &cli.command)?;
    }
    save_session(path, &session)
}

fn load_session(path: &Path) -> Result<SessionData> {
    if !path.exists() {
        return Ok(SessionData::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse session file: {}", path.display()))
}

fn save_session(path: &Path, session: &SessionData) -> Result<()> {
    let raw = serde_json::to_string_pretty(session)?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write session file: {}", path.display()))
}

fn run_command<S: TodoStore>(service: &mut TodoService<S>, command: &Command) -> Result<()> {
    match command {
        Command::Ping | Command::AddUser { .. } => {}
        Command::SignIn { username, password } => match service.sign_in(username, password) {
            Ok(()) => println!("Welcome!"),
            Err(ServiceError::InvalidCredentials) => bail!("Invalid credentials."),
            Err(err) => return Err(err.into()),
        },
        Command::Lists => {
            for summary in service.overview()? {
                let marker = if summary.is_done { "x" } else { " " };
                println!(
                    "[{marker}] {:>4}  {}  ({}/{})",
                    summary.list.id, summary.list.title, summary.count_done, summary.count_all
                );
            }
        }
        Command::Show { list_id } => {
            let detail = service.list_detail(*list_id).map_err(not_found("list"))?;
            println!("{}", detail.list.title);
            for item in &detail.list.items {
                let marker = if item.done { "x" } else { " " };
                println!("  [{marker}] {:>4}  {}", item.id, item.title);
            }
        }
        Command::NewList { title } => {
            service.create_list(title).map_err(user_message)?;
            println!("The list has been created.");
        }
        Command::RenameList { list_id, title } => {
            service
                .rename_list(*list_id, title)
                .map_err(not_found("list"))
                .map_err(user_message)?;
            println!("List updated.");
        }
        Command::DeleteList { list_id } => {
            service.destroy_list(*list_id).map_err(not_found("list"))?;
            println!("The list has been deleted.");
        }
        Command::Add { list_id, title } => {
            service
                .add_item(*list_id, title)
                .map_err(not_found("list"))
                .map_err(user_message)?;
            println!("The todo was added.");
        }
        Command::Toggle { list_id, item_id } => {
            let item = service
                .toggle_item(*list_id, *item_id)
                .map_err(not_found("todo"))?;
            if item.done {
                println!("\"{}\" marked done.", item.title);
            } else {
                println!("\"{}\" marked as NOT done!", item.title);
            }
        }
        Command::Delete { list_id, item_id } => {
            service
                .delete_item(*list_id, *item_id)
                .map_err(not_found("todo"))?;
            println!("The todo has been deleted.");
        }
        Command::CompleteAll { list_id } => {
            service
                .complete_all(*list_id)
                .map_err(not_found("list"))?;
            println!("All todos have been marked as done.");
        }
    }
    Ok(())
}

/// Replaces `NotFound` with an error naming what was missing.
fn not_found(what: &'static str) -> impl Fn(ServiceError) -> anyhow::Error {
    move |err| match err {
        ServiceError::NotFound => anyhow::anyhow!("{what} not found"),
        other => other.into(),
    }
}

/// Validation and duplicate-title failures are already user-facing text.
fn user_message(err: impl Into<anyhow::Error>) -> anyhow::Error {
    let err = err.into();
    match err.downcast_ref::<ServiceError>() {
        Some(ServiceError::DuplicateTitle(_)) => anyhow::anyhow!("The list title must be unique."),
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run(session: &mut SessionData, command: Command) -> Result<()> {
        let mut service = TodoService::new(SessionTodoStore::new(session)?);
        run_command(&mut service, &command)
    }

    fn empty_session() -> SessionData {
        SessionData::with_lists(Vec::new())
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn session_conflicts_with_db() {
        let parsed = Cli::try_parse_from([
            "todos",
            "--db",
            "todos.db",
            "--session",
            "session.json",
            "lists",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_targets_name_what_was_not_found() {
        let mut session = empty_session();

        let err = run(&mut session, Command::Show { list_id: 1 }).unwrap_err();
        assert_eq!(err.to_string(), "list not found");

        let err = run(
            &mut session,
            Command::Toggle {
                list_id: 1,
                item_id: 2,
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "todo not found");

        let err = run(
            &mut session,
            Command::RenameList {
                list_id: 1,
                title: "Garden".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "list not found");
    }

    #[test]
    fn title_failures_use_user_facing_messages() {
        let mut session = empty_session();
        run(
            &mut session,
            Command::NewList {
                title: "Home".to_string(),
            },
        )
        .unwrap();

        let err = run(
            &mut session,
            Command::NewList {
                title: "HOME".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "The list title must be unique.");

        let err = run(
            &mut session,
            Command::NewList {
                title: "  ".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "The list title is required.");

        let err = run(
            &mut session,
            Command::Add {
                list_id: 1,
                title: String::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "The todo title is required.");
    }

    #[test]
    fn session_file_round_trips_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = load_session(&path).unwrap();
        assert!(!session.has_lists());
        run(
            &mut session,
            Command::NewList {
                title: "Errands".to_string(),
            },
        )
        .unwrap();
        save_session(&path, &session).unwrap();

        let mut restored = load_session(&path).unwrap();
        assert_eq!(restored, session);
        let store = SessionTodoStore::new(&mut restored).unwrap();
        assert!(store.list_title_exists("Errands").unwrap());
        assert!(store.list_title_exists("Work Todos").unwrap());
    }

    #[test]
    fn corrupt_session_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = load_session(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse session file"));
    }
}
