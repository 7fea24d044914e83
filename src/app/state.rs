use chrono::{DateTime, Utc};
use serde_json::Value;

use super::action::FetchSource;
use super::config::Config;
use super::dialog::Dialog;
use crate::checklist::{
    hydrate, serialize, ActorRecord, ActorRow, ChecklistKind, ChecklistModel, Edit,
    EntityTaxonomy, TaskRow, CUSTOM_CELLS_COLUMN,
};
use crate::workflow::UpdateEndpoint;

pub const ACTOR_COLUMNS: &[&str] = &["Actions", "Main Actor", "Team", "Designation"];


const MAX_LOGS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Actors,
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingState {
    pub actors: bool,
    pub entities: bool,
    pub step: bool,
}

impl LoadingState {
    pub fn any(&self) -> bool {
        self.actors || self.entities || self.step
    }

    pub fn set(&mut self, source: FetchSource, loading: bool) {
        match source {
            FetchSource::Actors => self.actors = loading,
            FetchSource::Entities => self.entities = loading,
            FetchSource::Step => self.step = loading,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: std::time::Instant,
    pub duration_secs: u64,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        let duration_secs = match level {
            ToastLevel::Success => 3,
            ToastLevel::Info => 3,
            ToastLevel::Warning => 4,
            ToastLevel::Error => 5,
        };
        Self {
            message,
            level,
            created_at: std::time::Instant::now(),
            duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.duration_secs
    }
}

pub struct AppState {
    pub config: Config,
    pub kind: ChecklistKind,
    pub workflow_id: String,
    pub model: ChecklistModel,
    pub taxonomy: EntityTaxonomy,
    /// Actor directory from `GET /Actors`.
    pub directory: Vec<ActorRecord>,
    pub loading: LoadingState,
    pub publishing: bool,
    pub section: Section,
    pub actor_cursor: Cursor,
    pub task_cursor: Cursor,
    pub dialog: Option<Dialog>,
    pub running: bool,
    pub toast: Option<Toast>,
    pub show_help: bool,
    pub show_logs: bool,
    pub logs: Vec<LogEntry>,
    pub animation_frame: usize,
}

impl AppState {
    pub fn new(config: Config, kind: ChecklistKind, workflow_id: String) -> Self {
        let show_logs = config.ui.show_logs;
        Self {
            config,
            kind,
            workflow_id,
            model: ChecklistModel::new(),
            taxonomy: EntityTaxonomy::default(),
            directory: Vec::new(),
            loading: LoadingState::default(),
            publishing: false,
            section: Section::default(),
            actor_cursor: Cursor::default(),
            task_cursor: Cursor::default(),
            dialog: None,
            running: true,
            toast: None,
            show_help: false,
            show_logs,
            logs: Vec::new(),
            animation_frame: 0,
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        };
        self.logs.push(entry);
        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn log_debug(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn show_error(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Error));
    }

    pub fn show_success(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Success));
    }

    pub fn show_info(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Info));
    }

    pub fn show_warning(&mut self, msg: impl Into<String>) {
        self.toast = Some(Toast::new(msg.into(), ToastLevel::Warning));
    }

    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    pub fn update_endpoint(&self) -> UpdateEndpoint {
        if self.config.api.legacy_update {
            UpdateEndpoint::Legacy
        } else {
            UpdateEndpoint::Current
        }
    }

    /// Visible model columns followed by the custom cells column.
    pub fn task_columns(&self) -> Vec<String> {
        self.model
            .visible_columns()
            .map(|c| c.name.clone())
            .chain(std::iter::once(CUSTOM_CELLS_COLUMN.to_string()))
            .collect()
    }

    pub fn selected_actor(&self) -> Option<&ActorRow> {
        self.model.actors.get(self.actor_cursor.row)
    }

    pub fn selected_task(&self) -> Option<&TaskRow> {
        self.model.tasks.get(self.task_cursor.row)
    }

    pub fn selected_task_column(&self) -> Option<String> {
        self.task_columns().get(self.task_cursor.col).cloned()
    }

    pub fn next_section(&mut self) {
        self.section = match self.section {
            Section::Actors => Section::Tasks,
            Section::Tasks => Section::Actors,
        };
    }

    pub fn move_up(&mut self) {
        let cursor = self.cursor_mut();
        cursor.row = cursor.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let rows = self.row_count();
        let cursor = self.cursor_mut();
        if cursor.row + 1 < rows {
            cursor.row += 1;
        }
    }

    pub fn move_left(&mut self) {
        let cursor = self.cursor_mut();
        cursor.col = cursor.col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let cols = self.column_count();
        let cursor = self.cursor_mut();
        if cursor.col + 1 < cols {
            cursor.col += 1;
        }
    }

    fn row_count(&self) -> usize {
        match self.section {
            Section::Actors => self.model.actors.len(),
            Section::Tasks => self.model.tasks.len(),
        }
    }

    fn column_count(&self) -> usize {
        match self.section {
            Section::Actors => ACTOR_COLUMNS.len(),
            Section::Tasks => self.task_columns().len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        match self.section {
            Section::Actors => &mut self.actor_cursor,
            Section::Tasks => &mut self.task_cursor,
        }
    }

    /// Keep both cursors inside their tables after rows or columns change.
    pub fn clamp_cursors(&mut self) {
        let actor_rows = self.model.actors.len();
        let task_rows = self.model.tasks.len();
        let task_cols = self.task_columns().len();
        self.actor_cursor.row = self.actor_cursor.row.min(actor_rows.saturating_sub(1));
        self.actor_cursor.col = self.actor_cursor.col.min(ACTOR_COLUMNS.len() - 1);
        self.task_cursor.row = self.task_cursor.row.min(task_rows.saturating_sub(1));
        self.task_cursor.col = self.task_cursor.col.min(task_cols.saturating_sub(1));
    }

    /// Run an edit through the model; failures become a warning toast.
    pub fn apply_edit(&mut self, edit: Edit) -> bool {
        tracing::debug!("Applying edit: {:?}", edit);
        match self.model.apply(edit) {
            Ok(()) => {
                self.clamp_cursors();
                true
            }
            Err(e) => {
                self.log_warn(e.to_string());
                self.show_warning(e.to_string());
                false
            }
        }
    }

    pub fn add_row(&mut self) {
        match self.section {
            Section::Actors => {
                if self.apply_edit(Edit::AddActor) {
                    self.actor_cursor.row = self.model.actors.len() - 1;
                }
            }
            Section::Tasks => {
                if self.apply_edit(Edit::AddTask) {
                    self.task_cursor.row = self.model.tasks.len() - 1;
                }
            }
        }
    }

    pub fn delete_row(&mut self) {
        let edit = match self.section {
            Section::Actors => self.selected_actor().map(|a| Edit::DeleteActor(a.id)),
            Section::Tasks => self.selected_task().map(|t| Edit::DeleteTask(t.id)),
        };
        if let Some(edit) = edit {
            self.apply_edit(edit);
        }
    }

    pub fn begin_fetch(&mut self) {
        self.loading = LoadingState {
            actors: true,
            entities: true,
            step: true,
        };
        self.log_info(format!(
            "Loading {} checklist for workflow {}",
            self.kind, self.workflow_id
        ));
    }

    pub fn on_actors_loaded(&mut self, actors: Vec<ActorRecord>) {
        self.loading.actors = false;
        self.log_info(format!("Loaded {} actors", actors.len()));
        self.directory = actors;
    }

    pub fn on_entities_loaded(&mut self, taxonomy: EntityTaxonomy) {
        self.loading.entities = false;
        self.log_info(format!("Loaded {} entity types", taxonomy.types.len()));
        self.taxonomy = taxonomy;
    }

    pub fn on_step_loaded(&mut self, step: Option<Value>) {
        self.loading.step = false;
        let Some(step) = step else {
            self.log_info(format!(
                "No saved {} for workflow {}, starting empty",
                self.kind.step_key(),
                self.workflow_id
            ));
            return;
        };

        let hydrated = hydrate(&step);
        self.log_info(format!(
            "Loaded {} actor rows and {} tasks",
            hydrated.model.actors.len(),
            hydrated.model.tasks.len()
        ));
        self.model = hydrated.model;
        if self.taxonomy.is_empty() {
            self.taxonomy = hydrated.taxonomy;
        } else {
            self.log_debug("Keeping fetched entity taxonomy over the saved copy");
        }
        self.dialog = None;
        self.clamp_cursors();
    }

    pub fn on_fetch_failed(&mut self, source: FetchSource, error: &str) {
        self.loading.set(source, false);
        let message = format!("Failed to load {}: {}", source.label(), error);
        self.log_error(&message);
        self.show_error(message);
    }

    /// Validate and serialize for publishing. `None` when nothing may be sent.
    pub fn prepare_publish(&mut self, now: DateTime<Utc>) -> Option<Value> {
        if self.publishing {
            self.show_info("Publish already in progress");
            return None;
        }
        if let Err(e) = self.model.validate_for_publish() {
            self.log_warn(e.to_string());
            self.show_error(e.to_string());
            return None;
        }
        self.publishing = true;
        self.log_info(format!("Publishing {} checklist", self.kind));
        Some(serialize(&self.model, &self.taxonomy, self.kind, now))
    }

    pub fn on_publish_succeeded(&mut self) {
        self.publishing = false;
        self.log_info("Changes published");
        self.show_success("Changes published successfully");
    }

    pub fn on_publish_failed(&mut self, error: &str) {
        self.publishing = false;
        self.log_error(format!("Publish failed: {}", error));
        self.show_error(format!("Error publishing changes: {}", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::ActorField;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(Config::default(), ChecklistKind::Meq, "wf-1".to_string())
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = state();
        state.move_up();
        state.move_left();
        assert_eq!(state.actor_cursor, Cursor::default());

        for _ in 0..10 {
            state.move_right();
        }
        assert_eq!(state.actor_cursor.col, ACTOR_COLUMNS.len() - 1);

        state.next_section();
        for _ in 0..20 {
            state.move_right();
        }
        // Seven built-ins plus the custom cells column.
        assert_eq!(state.task_cursor.col, 7);
        assert_eq!(
            state.selected_task_column().as_deref(),
            Some(CUSTOM_CELLS_COLUMN)
        );
    }

    #[test]
    fn test_delete_last_row_clamps_cursor() {
        let mut state = state();
        state.next_section();
        state.add_row();
        state.add_row();
        assert_eq!(state.task_cursor.row, 2);
        state.delete_row();
        assert_eq!(state.model.tasks.len(), 2);
        assert_eq!(state.task_cursor.row, 1);
        assert_eq!(state.model.tasks[1].task_number, "02.");
    }

    #[test]
    fn test_fetch_flags() {
        let mut state = state();
        state.begin_fetch();
        assert!(state.loading.any());
        state.on_actors_loaded(vec![ActorRecord::default()]);
        state.on_fetch_failed(FetchSource::Entities, "boom");
        assert!(state.loading.step);
        assert!(!state.loading.entities);
        assert_eq!(state.toast.as_ref().unwrap().level, ToastLevel::Error);
        state.on_step_loaded(None);
        assert!(!state.loading.any());
    }

    #[test]
    fn test_step_load_replaces_model() {
        let mut state = state();
        state.on_step_loaded(Some(json!({
            "actors": { "actor1": { "action": "Inspect", "name": "Jane" } },
            "tasks": {
                "task1": { "taskLabel": "A" },
                "task2": { "taskLabel": "B" }
            },
            "entities": { "machine": { "m1": { "name": "Machine 1" } } }
        })));
        assert_eq!(state.model.tasks.len(), 2);
        assert_eq!(state.model.actors[0].main_actor, "Jane");
        assert!(!state.taxonomy.is_empty());
    }

    #[test]
    fn test_step_load_keeps_fetched_taxonomy() {
        let mut state = state();
        state.on_entities_loaded(EntityTaxonomy::from_json(&json!({
            "pump": { "p1": { "name": "Pump 1" } }
        })));
        state.on_step_loaded(Some(json!({
            "tasks": { "task1": { "taskLabel": "A" } },
            "entities": { "machine": { "m1": { "name": "Machine 1" } } }
        })));
        assert_eq!(state.taxonomy.types.len(), 1);
        assert_eq!(state.taxonomy.types[0].key, "pump");
        assert!(state.logs.iter().any(|l| l.level == LogLevel::Debug));
    }

    #[test]
    fn test_invalid_publish_sends_nothing() {
        let mut state = state();
        assert!(state.prepare_publish(Utc::now()).is_none());
        assert!(!state.publishing);
        assert_eq!(state.toast.as_ref().unwrap().level, ToastLevel::Error);
    }

    #[test]
    fn test_publish_lifecycle() {
        let mut state = state();
        let actor = state.model.actors[0].id;
        let task = state.model.tasks[0].id;
        state.apply_edit(Edit::SetActorField {
            row: actor,
            field: ActorField::Actions,
            value: "Inspect".into(),
        });
        state.apply_edit(Edit::SetActorField {
            row: actor,
            field: ActorField::MainActor,
            value: "Jane".into(),
        });
        state.apply_edit(Edit::SetTaskName {
            row: task,
            name: "Check valve".into(),
        });
        state.apply_edit(Edit::SetTaskAction {
            row: task,
            actor: Some(actor),
        });

        let payload = state.prepare_publish(Utc::now()).unwrap();
        assert_eq!(payload["step1"]["name"], "MEQ Checklist");
        assert!(state.publishing);
        assert!(state.prepare_publish(Utc::now()).is_none());

        let before = state.model.clone();
        state.on_publish_failed("500");
        assert!(!state.publishing);
        assert_eq!(state.model, before);
    }

    #[test]
    fn test_failed_edit_shows_warning() {
        let mut state = state();
        let actor = state.model.actors[0].id;
        state.apply_edit(Edit::SetActorField {
            row: actor,
            field: ActorField::MainActor,
            value: "realtime".into(),
        });
        assert!(!state.apply_edit(Edit::SetActorField {
            row: actor,
            field: ActorField::Team,
            value: "QA".into(),
        }));
        assert_eq!(state.toast.as_ref().unwrap().level, ToastLevel::Warning);
    }

    #[test]
    fn test_custom_cells_column_name_is_taken() {
        let mut state = state();
        assert!(!state.apply_edit(Edit::AddColumn {
            name: "Custom Cells".into(),
            cell_type: None,
            options: vec![],
        }));
        let columns = state.task_columns();
        assert_eq!(
            columns.iter().filter(|c| c.as_str() == CUSTOM_CELLS_COLUMN).count(),
            1
        );
        assert_eq!(columns.last().map(String::as_str), Some(CUSTOM_CELLS_COLUMN));
    }

    #[test]
    fn test_update_endpoint_follows_config() {
        let mut state = state();
        assert_eq!(state.update_endpoint(), UpdateEndpoint::Current);
        state.config.api.legacy_update = true;
        assert_eq!(state.update_endpoint(), UpdateEndpoint::Legacy);
    }
}
