use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use checkwright::app::{Action, AppState, Config, Dialog, FetchSource};
use checkwright::checklist::ChecklistKind;
use checkwright::ui::AppWidget;
use checkwright::workflow::WorkflowClient;

/// Terminal editor for workflow inspection checklists
#[derive(Parser)]
#[command(name = "checkwright")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Admin API base URL (actors and workflows)
    #[arg(long, global = true, env = "CHECKWRIGHT_API_URL")]
    api_url: Option<String>,

    /// Admin API base URL for entity data and updates
    #[arg(long, global = true, env = "CHECKWRIGHT_ENTITY_API_URL")]
    entity_api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Edit one checklist step of a workflow
    Edit {
        /// Checklist kind: MEQ, DRM or RMQ
        kind: ChecklistKind,
        /// Workflow identifier
        workflow_id: String,
    },
    /// Run the workflow step lookup proxy
    Serve {
        /// Address to listen on (default from config, 127.0.0.1:3000)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()
        .unwrap_or_default()
        .with_overrides(cli.api_url.clone(), cli.entity_api_url.clone());

    let directive = if cli.verbose {
        "checkwright=debug".to_string()
    } else {
        config.global.log_level.directive()
    };

    match cli.command {
        Command::Edit { kind, workflow_id } => {
            init_file_tracing(&directive);
            run_editor(config, kind, workflow_id).await
        }
        Command::Serve { bind } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(directive.parse()?),
                )
                .with_writer(std::io::stderr)
                .init();

            let bind = bind.unwrap_or_else(|| config.proxy.bind.clone());
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("Invalid bind address '{}'", bind))?;
            checkwright::proxy::serve(addr, &config.api.base_url).await
        }
    }
}

/// The terminal belongs to the UI, so editor logs go to a file.
fn init_file_tracing(directive: &str) {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/checkwright-debug.log")
        .ok();

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| "checkwright=info".parse().unwrap()),
    );

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run_editor(config: Config, kind: ChecklistKind, workflow_id: String) -> Result<()> {
    tracing::info!("=== checkwright starting: {} / {} ===", kind, workflow_id);

    let client = Arc::new(WorkflowClient::new(
        &config.api.base_url,
        &config.api.entity_base_url,
    )?);
    let tick_interval = Duration::from_millis(config.ui.tick_rate_ms.max(16));

    let mut state = AppState::new(config, kind, workflow_id);
    state.log_info(format!("Editing {}", kind.checklist_name()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut state, &client, tick_interval).await;

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("=== checkwright exiting ===");
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    client: &Arc<WorkflowClient>,
    tick_interval: Duration,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    spawn_fetches(state, client, &action_tx);

    let poll_timeout = Duration::from_millis(50);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| AppWidget::new(&*state).render(f))?;

        // Poll for keyboard input (non-blocking with timeout)
        if poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, state) {
                        action_tx.send(action)?;
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_interval {
            action_tx.send(Action::Tick)?;
            last_tick = std::time::Instant::now();
        }

        // Process any pending actions from background tasks
        while let Ok(action) = action_rx.try_recv() {
            match process_action(action, state, client, &action_tx).await {
                Ok(should_quit) => {
                    if should_quit {
                        state.running = false;
                    }
                }
                Err(e) => {
                    state.log_error(format!("Action error: {}", e));
                }
            }
        }

        if !state.running {
            return Ok(());
        }
    }
}

/// Convert key events to actions.
fn handle_key_event(key: KeyEvent, state: &AppState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if let Some(dialog) = &state.dialog {
        return handle_dialog_key(key.code, dialog);
    }

    if state.show_help {
        return Some(Action::ToggleHelp);
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::NextSection),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Enter => Some(Action::EditCell),
        KeyCode::Char(' ') => Some(Action::ToggleCell),
        KeyCode::Char('a') => Some(Action::AddRow),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteRow),
        KeyCode::Char('c') => Some(Action::OpenColumns),
        KeyCode::Char('t') => Some(Action::OpenFieldType),
        KeyCode::Char('x') => Some(Action::OpenCustomCell),
        KeyCode::Char('p') => Some(Action::RequestPublish),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Char('L') => Some(Action::ToggleLogs),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}

fn handle_dialog_key(key: KeyCode, dialog: &Dialog) -> Option<Action> {
    if matches!(dialog, Dialog::ConfirmPublish) {
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmPublish),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::DialogCancel),
            _ => None,
        };
    }

    if dialog.accepts_text() {
        return match key {
            KeyCode::Esc => Some(Action::DialogCancel),
            KeyCode::Enter => Some(Action::DialogSubmit),
            KeyCode::Tab => Some(Action::DialogNextField),
            KeyCode::Backspace => Some(Action::DialogBackspace),
            KeyCode::Char(c) => Some(Action::DialogInput(c)),
            _ => None,
        };
    }

    match key {
        KeyCode::Esc => Some(Action::DialogCancel),
        KeyCode::Enter => Some(Action::DialogSubmit),
        KeyCode::Tab => Some(Action::DialogNextField),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::DialogDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::DialogUp),
        KeyCode::Char(' ') => Some(Action::DialogToggle),
        KeyCode::Char('a') => Some(Action::DialogBeginInput),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DialogDelete),
        _ => None,
    }
}

async fn process_action(
    action: Action,
    state: &mut AppState,
    client: &Arc<WorkflowClient>,
    action_tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    match action {
        Action::Quit => {
            state.running = false;
            return Ok(true);
        }
        Action::Tick => state.tick(),

        Action::NextSection => state.next_section(),
        Action::MoveUp => state.move_up(),
        Action::MoveDown => state.move_down(),
        Action::MoveLeft => state.move_left(),
        Action::MoveRight => state.move_right(),

        Action::EditCell => state.edit_selected_cell(),
        Action::ToggleCell => state.toggle_selected_cell(),
        Action::AddRow => state.add_row(),
        Action::DeleteRow => state.delete_row(),
        Action::OpenColumns => state.open_columns_dialog(),
        Action::OpenFieldType => state.open_field_type_dialog(),
        Action::OpenCustomCell => state.open_custom_cell_dialog(),

        Action::DialogUp => state.dialog_up(),
        Action::DialogDown => state.dialog_down(),
        Action::DialogToggle => state.dialog_toggle(),
        Action::DialogNextField => state.dialog_next_field(),
        Action::DialogBeginInput => state.dialog_begin_input(),
        Action::DialogInput(c) => state.dialog_input(c),
        Action::DialogBackspace => state.dialog_backspace(),
        Action::DialogDelete => state.dialog_delete(),
        Action::DialogSubmit => state.submit_dialog(),
        Action::DialogCancel => state.cancel_dialog(),

        Action::RequestPublish => state.request_publish(),
        Action::ConfirmPublish => {
            state.dialog = None;
            if let Some(payload) = state.prepare_publish(chrono::Utc::now()) {
                let client = Arc::clone(client);
                let tx = action_tx.clone();
                let workflow = state.workflow_id.clone();
                let endpoint = state.update_endpoint();
                spawn_guarded("publish", async move {
                    let action = match client.publish(&workflow, &payload, endpoint).await {
                        Ok(()) => Action::PublishSucceeded,
                        Err(e) => Action::PublishFailed {
                            error: format!("{:#}", e),
                        },
                    };
                    let _ = tx.send(action);
                });
            }
        }
        Action::Reload => {
            if state.loading.any() {
                state.show_info("Already loading");
            } else {
                spawn_fetches(state, client, action_tx);
            }
        }

        Action::ToggleHelp => state.show_help = !state.show_help,
        Action::ToggleLogs => state.show_logs = !state.show_logs,

        Action::ActorsLoaded(actors) => state.on_actors_loaded(actors),
        Action::EntitiesLoaded(taxonomy) => state.on_entities_loaded(taxonomy),
        Action::StepLoaded(step) => state.on_step_loaded(step),
        Action::FetchFailed { source, error } => state.on_fetch_failed(source, &error),
        Action::PublishSucceeded => state.on_publish_succeeded(),
        Action::PublishFailed { error } => state.on_publish_failed(&error),
    }

    Ok(false)
}

/// Start the actor, entity and saved-step fetches. Each reports back on its own.
fn spawn_fetches(
    state: &mut AppState,
    client: &Arc<WorkflowClient>,
    action_tx: &mpsc::UnboundedSender<Action>,
) {
    state.begin_fetch();
    let workflow = state.workflow_id.clone();
    let step_key = state.kind.step_key();

    let (c, tx) = (Arc::clone(client), action_tx.clone());
    spawn_guarded("fetch actors", async move {
        let action = match c.fetch_actors().await {
            Ok(actors) => Action::ActorsLoaded(actors),
            Err(e) => fetch_failed(FetchSource::Actors, e),
        };
        let _ = tx.send(action);
    });

    let (c, tx, wf) = (Arc::clone(client), action_tx.clone(), workflow.clone());
    spawn_guarded("fetch entities", async move {
        let action = match c.fetch_entities(&wf, step_key).await {
            Ok(taxonomy) => Action::EntitiesLoaded(taxonomy),
            Err(e) => fetch_failed(FetchSource::Entities, e),
        };
        let _ = tx.send(action);
    });

    let (c, tx) = (Arc::clone(client), action_tx.clone());
    spawn_guarded("fetch step", async move {
        let action = match c.fetch_step(&workflow, step_key).await {
            Ok(step) => Action::StepLoaded(step),
            Err(e) => fetch_failed(FetchSource::Step, e),
        };
        let _ = tx.send(action);
    });
}

fn fetch_failed(source: FetchSource, error: anyhow::Error) -> Action {
    tracing::error!("Failed to load {}: {:#}", source.label(), error);
    Action::FetchFailed {
        source,
        error: format!("{:#}", error),
    }
}

/// Spawn a background task, logging instead of losing a panic.
fn spawn_guarded<F>(name: &'static str, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        use futures::future::FutureExt;
        use std::panic::AssertUnwindSafe;

        if let Err(e) = AssertUnwindSafe(task).catch_unwind().await {
            if let Some(msg) = e.downcast_ref::<&str>() {
                tracing::error!("{} task panicked: {}", name, msg);
            } else if let Some(msg) = e.downcast_ref::<String>() {
                tracing::error!("{} task panicked: {}", name, msg);
            } else {
                tracing::error!("{} task panicked", name);
            }
        }
    });
}
