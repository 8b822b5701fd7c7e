use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use day_cli::cli::{Cli, Command, collect_overrides};
use day_core::autosave::NotesAutoSave;
use day_core::config::{Config, load_config_with_fallback, merge_overrides};
use day_core::display::{
    context_banner, distance_label, map_notice, reached_notice, removed_notice, share_notice,
    shows_status_controls, status_label,
};
use day_core::error::AppError;
use day_core::model::{DayContext, InsertPosition, Location, Task, TaskDraft, TaskStatus};
use day_core::poller::{ProximityPoller, SharedStore, shared};
use day_core::store::TaskStore;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

struct Session {
    store: SharedStore,
    autosave: NotesAutoSave,
    context: DayContext,
    interactive: bool,
}

impl Session {
    fn new(config: &Config, interactive: bool) -> Self {
        let store = shared(TaskStore::seeded().with_reach_threshold(config.reach_threshold_meters));
        let autosave = NotesAutoSave::new(store.clone(), config.autosave_delay());
        Self {
            store,
            autosave,
            context: config.day_context,
            interactive,
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Task")]
    title: String,
    #[tabled(rename = "Place")]
    place: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn status_text(task: &Task) -> String {
    match task.reached_at.as_deref() {
        Some(stamp) => format!("{} at {}", status_label(task.status), stamp),
        None => status_label(task.status).to_string(),
    }
}

fn task_row(task: &Task, current_task_id: Option<&str>, reach_threshold: u32) -> TaskRow {
    TaskRow {
        marker: if current_task_id == Some(task.id.as_str()) {
            ">"
        } else {
            ""
        },
        id: task.id.clone(),
        time: task.scheduled_time.clone(),
        title: task.title.clone(),
        place: task.location.name.clone(),
        distance: distance_label(task.distance, reach_threshold),
        status: status_text(task),
    }
}

fn print_day(store: &TaskStore, context: DayContext, json: bool) {
    if json {
        let payload = serde_json::json!({
            "day_context": context,
            "current_task_id": store.current_task_id(),
            "tasks": store.tasks(),
        });
        println!("{payload}");
        return;
    }

    println!("{}", context_banner(context));
    if store.tasks().is_empty() {
        println!("No tasks planned");
        return;
    }

    let rows: Vec<TaskRow> = store
        .tasks()
        .iter()
        .map(|task| task_row(task, store.current_task_id(), store.reach_threshold()))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");

    if shows_status_controls(context) {
        println!("Mark a task with: status <id> reached|pending|skipped");
    }
}

fn print_task_json(task: &Task) {
    println!("{}", serde_json::json!(task));
}

fn print_notice_json(notice: &str, task: &Task) {
    let json = serde_json::json!({
        "notice": notice,
        "task_id": task.id,
    });
    println!("{json}");
}

async fn execute(session: &Session, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::List => {
            let store = session.store.lock().await;
            print_day(&store, session.context, json);
        }
        Command::Current => {
            let store = session.store.lock().await;
            match (store.current_task(), json) {
                (Some(task), true) => print_task_json(task),
                (Some(task), false) => println!(
                    "Current task: {} ({}) at {}",
                    task.title, task.id, task.scheduled_time
                ),
                (None, true) => println!("null"),
                (None, false) => println!("No pending tasks"),
            }
        }
        Command::Check => {
            let mut store = session.store.lock().await;
            let reached = store.check_proximity()?;
            if json {
                let payload = serde_json::json!({
                    "reached": reached,
                    "current_task_id": store.current_task_id(),
                });
                println!("{payload}");
            } else if reached.is_empty() {
                println!("No pending tasks in range");
            } else {
                for id in &reached {
                    let task = store.task(id)?;
                    println!("Reached task: {} ({})", task.title, task.id);
                }
            }
        }
        Command::Status { id, status } => {
            let status: TaskStatus = status.parse()?;
            let task = session.store.lock().await.set_status(&id, status)?;
            if json {
                print_task_json(&task);
            } else {
                println!(
                    "Updated task: {} ({}) is {}",
                    task.title,
                    task.id,
                    status_label(task.status)
                );
                if let Some(notice) = reached_notice(&task) {
                    println!("{notice}");
                }
            }
        }
        Command::Notes { id, text } => {
            if session.interactive {
                let scheduled = session.autosave.edit(&id, &text).await?;
                if scheduled {
                    println!("Saving notes for {id}...");
                } else {
                    println!("Notes unchanged for {id}");
                }
            } else {
                let task = session.store.lock().await.set_notes(&id, &text)?;
                if json {
                    print_task_json(&task);
                } else {
                    println!("Notes saved: {} ({})", task.title, task.id);
                }
            }
        }
        Command::Save => {
            let saved = session.autosave.flush().await;
            if json {
                println!("{}", serde_json::json!(saved));
            } else if saved.is_empty() {
                println!("Nothing to save");
            } else {
                for task in &saved {
                    println!("Notes saved: {} ({})", task.title, task.id);
                }
            }
        }
        Command::Delete { id } => {
            let removed = session.store.lock().await.delete_task(&id)?;
            if json {
                print_task_json(&removed);
            } else {
                println!("{}: {} ({})", removed_notice(), removed.title, removed.id);
            }
        }
        Command::Distance { id, meters } => {
            let mut store = session.store.lock().await;
            let task = store.update_distance(&id, meters)?;
            if json {
                print_task_json(&task);
            } else {
                println!(
                    "Updated distance: {} ({}) is {}",
                    task.title,
                    task.id,
                    distance_label(task.distance, store.reach_threshold())
                );
            }
        }
        Command::Add {
            reference,
            title,
            before,
            time,
            place,
            lat,
            lng,
            distance,
        } => {
            let mut store = session.store.lock().await;
            let anchor = store.task(&reference)?.location.clone();
            let draft = TaskDraft {
                location: Location {
                    name: place.unwrap_or_else(|| title.trim().to_string()),
                    lat: lat.unwrap_or(anchor.lat),
                    lng: lng.unwrap_or(anchor.lng),
                },
                title,
                scheduled_time: time,
                distance,
            };
            let position = if before {
                InsertPosition::Before
            } else {
                InsertPosition::After
            };
            let task = store.insert_task(&reference, position, draft)?;
            if json {
                print_task_json(&task);
            } else {
                let side = if before { "before" } else { "after" };
                println!("Added task: {} ({}) {} {}", task.title, task.id, side, reference);
            }
        }
        Command::Map { id } => {
            let store = session.store.lock().await;
            let task = store.task(&id)?;
            let notice = map_notice(task);
            if json {
                print_notice_json(&notice, task);
            } else {
                println!("{notice}");
            }
        }
        Command::Share { id } => {
            let store = session.store.lock().await;
            let task = store.task(&id)?;
            if json {
                print_notice_json(share_notice(), task);
            } else {
                println!("{}", share_notice());
            }
        }
        Command::Summary => {
            let summary = session.store.lock().await.summary();
            if json {
                println!("{}", serde_json::json!(summary));
            } else {
                println!(
                    "{} tasks: {} on the way, {} reached, {} skipped",
                    summary.total, summary.pending, summary.reached, summary.skipped
                );
            }
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: using default config: {err}");
    }

    let mut overrides =
        collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    if let Some(raw) = cli.context.as_deref() {
        overrides.day_context = Some(raw.parse()?);
    }

    let config = merge_overrides(&loaded.config, &overrides);
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

async fn announce_reached(session: &Session, reached: &[String]) {
    let store = session.store.lock().await;
    for id in reached {
        if let Ok(task) = store.task(id)
            && let Some(notice) = reached_notice(task)
        {
            println!("{}: {notice}", task.title);
        }
    }
}

async fn handle_line(session: &mut Session, line: &str) -> Result<(), AppError> {
    let args = split_command_line(line)?;
    if args.is_empty() {
        return Ok(());
    }

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("day_tasks".to_string());
    argv.extend(args);

    let cli = Cli::try_parse_from(argv).map_err(normalize_parse_error)?;
    if !cli.config_override.is_empty() {
        return Err(AppError::invalid_input(
            "config overrides are only read at startup",
        ));
    }
    if let Some(raw) = cli.context.as_deref() {
        session.context = raw.parse()?;
    }

    match cli.command {
        Some(command) => execute(session, command, cli.json).await,
        None => {
            println!("{}", context_banner(session.context));
            Ok(())
        }
    }
}

async fn run_interactive(cli: &Cli) -> Result<(), AppError> {
    let config = resolve_config(cli)?;
    let mut session = Session::new(&config, true);

    let startup = session.store.lock().await.check_proximity()?;
    println!("{}", context_banner(session.context));
    announce_reached(&session, &startup).await;

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let poller =
        ProximityPoller::spawn_with_listener(session.store.clone(), config.poll_interval(), events_tx);
    info!(context = session.context.as_str(), "session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(reached) = events.recv() => announce_reached(&session, &reached).await,
            line = lines.next_line() => {
                let Some(line) = line.map_err(|err| AppError::io(err.to_string()))? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                    break;
                }
                if line == "help" || line == "?" {
                    print_help();
                    continue;
                }
                if let Err(err) = handle_line(&mut session, line).await {
                    eprintln!("ERROR: {err}");
                }
            }
        }
    }

    let saved = session.autosave.flush().await;
    if !saved.is_empty() {
        info!(count = saved.len(), "pending notes saved on exit");
    }
    poller.stop().await;
    info!("session ended");
    Ok(())
}

async fn run_once(cli: &Cli, command: Command) -> Result<(), AppError> {
    let config = resolve_config(cli)?;
    let session = Session::new(&config, false);
    session.store.lock().await.check_proximity()?;
    execute(&session, command, cli.json).await
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let result = match cli.command.take() {
        Some(command) => run_once(&cli, command).await,
        None => run_interactive(&cli).await,
    };

    if let Err(err) = result {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
