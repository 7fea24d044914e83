use std::collections::HashMap;

use uuid::Uuid;

use super::error::ChecklistError;
use super::types::{
    is_reserved_column, task_number, ActorRecord, ActorRow, CellConfig, CellType, CellValue,
    Column, CustomCell, TaskRow,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row: Uuid,
    pub column: String,
}

impl CellKey {
    pub fn new(row: Uuid, column: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorField {
    Actions,
    MainActor,
    Team,
    Designation,
    Person,
}

/// Every mutation of a checklist goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    AddActor,
    DeleteActor(Uuid),
    SetActorField {
        row: Uuid,
        field: ActorField,
        value: String,
    },
    /// Pick an actor from the directory; fills team and designation too.
    AssignDirectoryActor { row: Uuid, record: ActorRecord },

    AddTask,
    DeleteTask(Uuid),
    SetTaskName { row: Uuid, name: String },
    SetTaskAction { row: Uuid, actor: Option<Uuid> },
    SetRemark { row: Uuid, remark: bool },
    SetEntityTypes { row: Uuid, types: Vec<String> },
    SetEntityObjects { row: Uuid, objects: Vec<String> },
    SetRoute { row: Uuid, route: String },

    AddColumn {
        name: String,
        cell_type: Option<CellType>,
        options: Vec<String>,
    },
    ToggleColumn(String),
    SetCellConfig {
        row: Uuid,
        column: String,
        config: CellConfig,
    },
    SetCellValue {
        row: Uuid,
        column: String,
        value: CellValue,
    },

    AddCustomCell {
        row: Uuid,
        tag: String,
        cell_type: CellType,
    },
    SetCustomCellValue {
        row: Uuid,
        index: usize,
        value: CellValue,
    },
    RemoveCustomCell { row: Uuid, index: usize },
}

/// Editable state of one checklist step.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistModel {
    pub actors: Vec<ActorRow>,
    pub tasks: Vec<TaskRow>,
    pub columns: Vec<Column>,
    cell_values: HashMap<CellKey, CellValue>,
}

impl Default for ChecklistModel {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            tasks: Vec::new(),
            columns: Column::default_columns(),
            cell_values: HashMap::new(),
        }
    }
}

impl ChecklistModel {
    /// A fresh checklist with one empty actor row and one empty task row.
    pub fn new() -> Self {
        let mut model = Self::default();
        model.actors.push(ActorRow::new());
        model.tasks.push(TaskRow::new(0));
        model
    }

    pub fn from_parts(
        actors: Vec<ActorRow>,
        tasks: Vec<TaskRow>,
        columns: Vec<Column>,
        cell_values: HashMap<CellKey, CellValue>,
    ) -> Self {
        let mut model = Self {
            actors,
            tasks,
            columns,
            cell_values,
        };
        model.renumber_tasks();
        model
    }

    pub fn apply(&mut self, edit: Edit) -> Result<(), ChecklistError> {
        match edit {
            Edit::AddActor => {
                self.actors.push(ActorRow::new());
            }
            Edit::DeleteActor(row) => {
                let index = self.actor_index(row)?;
                self.actors.remove(index);
                for task in &mut self.tasks {
                    if task.action_actor == Some(row) {
                        task.action_actor = None;
                    }
                }
            }
            Edit::SetActorField { row, field, value } => {
                let actor = self.actor_mut(row)?;
                match field {
                    ActorField::Actions => actor.actions = value,
                    ActorField::MainActor => {
                        actor.main_actor = value;
                        actor.clear_if_realtime();
                    }
                    ActorField::Team | ActorField::Designation if actor.is_realtime() => {
                        return Err(ChecklistError::RealtimeActor);
                    }
                    ActorField::Team => actor.team = value,
                    ActorField::Designation => actor.designation = value,
                    ActorField::Person => actor.person = value,
                }
            }
            Edit::AssignDirectoryActor { row, record } => {
                let actor = self.actor_mut(row)?;
                actor.main_actor = record.designated_actor;
                actor.team = record.field;
                actor.designation = record.designation;
                actor.person = record.person;
                actor.clear_if_realtime();
            }

            Edit::AddTask => {
                self.tasks.push(TaskRow::new(self.tasks.len()));
            }
            Edit::DeleteTask(row) => {
                let index = self.task_index(row)?;
                self.tasks.remove(index);
                self.cell_values.retain(|key, _| key.row != row);
                self.renumber_tasks();
            }
            Edit::SetTaskName { row, name } => {
                self.task_mut(row)?.task_name = name;
            }
            Edit::SetTaskAction { row, actor } => {
                if let Some(actor) = actor {
                    self.actor_index(actor)?;
                }
                self.task_mut(row)?.action_actor = actor;
            }
            Edit::SetRemark { row, remark } => {
                self.task_mut(row)?.remark = remark;
            }
            Edit::SetEntityTypes { row, types } => {
                let task = self.task_mut(row)?;
                let types = dedup_trimmed(types);
                if task.entity_types != types {
                    task.entity_objects.clear();
                }
                task.entity_types = types;
            }
            Edit::SetEntityObjects { row, objects } => {
                let task = self.task_mut(row)?;
                let objects = dedup_trimmed(objects);
                if task.entity_types.is_empty() && !objects.is_empty() {
                    return Err(ChecklistError::NoEntityType);
                }
                task.entity_objects = objects;
            }
            Edit::SetRoute { row, route } => {
                self.task_mut(row)?.route = route;
            }

            Edit::AddColumn {
                name,
                cell_type,
                options,
            } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(ChecklistError::EmptyColumnName);
                }
                if is_reserved_column(&name)
                    || self
                        .columns
                        .iter()
                        .any(|c| c.name.eq_ignore_ascii_case(&name))
                {
                    return Err(ChecklistError::DuplicateColumn(name));
                }
                let options = match cell_type {
                    Some(t) if t.has_options() => dedup_trimmed(options),
                    _ => Vec::new(),
                };
                tracing::debug!("Adding custom column '{}' ({:?})", name, cell_type);
                self.columns.push(Column::custom(name, cell_type, options));
            }
            Edit::ToggleColumn(name) => {
                let column = self
                    .columns
                    .iter_mut()
                    .find(|c| c.name == name)
                    .ok_or(ChecklistError::UnknownColumn(name))?;
                column.visible = !column.visible;
            }
            Edit::SetCellConfig {
                row,
                column,
                config,
            } => {
                self.column(&column)?;
                self.task(row)?;
                let config = CellConfig::with_options(config.cell_type, dedup_trimmed(config.options));
                let key = CellKey::new(row, column.clone());
                match config.cell_type.zero_value() {
                    Some(zero) => {
                        self.cell_values.insert(key, zero);
                    }
                    None => {
                        self.cell_values.remove(&key);
                    }
                }
                self.task_mut(row)?.cell_configs.insert(column, config);
            }
            Edit::SetCellValue { row, column, value } => {
                let task = self.task(row)?;
                let cell_type = self.effective_cell_type(task, self.column(&column)?);
                check_value_type(cell_type, &value)?;
                self.cell_values.insert(CellKey::new(row, column), value);
            }

            Edit::AddCustomCell {
                row,
                tag,
                cell_type,
            } => {
                let tag = tag.trim().to_string();
                if tag.is_empty() {
                    return Err(ChecklistError::EmptyTag);
                }
                self.task_mut(row)?
                    .custom_cells
                    .push(CustomCell::new(tag, cell_type));
            }
            Edit::SetCustomCellValue { row, index, value } => {
                let cell = self
                    .task_mut(row)?
                    .custom_cells
                    .get_mut(index)
                    .ok_or(ChecklistError::UnknownCustomCell(index))?;
                check_value_type(cell.cell_type, &value)?;
                cell.value = Some(value);
            }
            Edit::RemoveCustomCell { row, index } => {
                let cells = &mut self.task_mut(row)?.custom_cells;
                if index >= cells.len() {
                    return Err(ChecklistError::UnknownCustomCell(index));
                }
                cells.remove(index);
            }
        }
        Ok(())
    }

    pub fn actor(&self, id: Uuid) -> Option<&ActorRow> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn task(&self, id: Uuid) -> Result<&TaskRow, ChecklistError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(ChecklistError::UnknownTaskRow(id))
    }

    pub fn column(&self, name: &str) -> Result<&Column, ChecklistError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ChecklistError::UnknownColumn(name.to_string()))
    }

    pub fn custom_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.builtin)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Row override first, then the column's declared type, else blank.
    pub fn effective_cell_type(&self, task: &TaskRow, column: &Column) -> CellType {
        task.cell_configs
            .get(&column.name)
            .map(|config| config.cell_type)
            .or(column.cell_type)
            .unwrap_or(CellType::Blank)
    }

    pub fn effective_options<'a>(&'a self, task: &'a TaskRow, column: &'a Column) -> &'a [String] {
        match task.cell_configs.get(&column.name) {
            Some(config) => &config.options,
            None => &column.options,
        }
    }

    /// Stored value, or the zero value of the cell's resolved type.
    pub fn cell_value(&self, task: &TaskRow, column: &Column) -> Option<CellValue> {
        let cell_type = self.effective_cell_type(task, column);
        match self.cell_values.get(&CellKey::new(task.id, column.name.clone())) {
            Some(value) if value.cell_type() == cell_type => Some(value.clone()),
            _ => cell_type.zero_value(),
        }
    }

    pub fn stored_cell_value(&self, row: Uuid, column: &str) -> Option<&CellValue> {
        self.cell_values.get(&CellKey::new(row, column))
    }

    /// Actor rows a task can point its action at.
    pub fn action_choices(&self) -> impl Iterator<Item = &ActorRow> {
        self.actors.iter().filter(|a| !a.actions.trim().is_empty())
    }

    /// `actorN` keys for the rows that will be published, numbered in row order.
    pub fn emitted_actor_keys(&self) -> Vec<(Uuid, String)> {
        self.actors
            .iter()
            .filter(|a| a.is_publishable())
            .enumerate()
            .map(|(i, a)| (a.id, format!("actor{}", i + 1)))
            .collect()
    }

    pub fn validate_for_publish(&self) -> Result<(), ChecklistError> {
        let emitted = self.emitted_actor_keys();
        let publishable = self.tasks.iter().any(|task| {
            !task.task_name.trim().is_empty()
                && task
                    .action_actor
                    .is_some_and(|actor| emitted.iter().any(|(id, _)| *id == actor))
        });
        if publishable {
            Ok(())
        } else {
            Err(ChecklistError::NoPublishableTasks)
        }
    }

    fn renumber_tasks(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.task_number = task_number(index);
        }
    }

    fn actor_index(&self, id: Uuid) -> Result<usize, ChecklistError> {
        self.actors
            .iter()
            .position(|a| a.id == id)
            .ok_or(ChecklistError::UnknownActorRow(id))
    }

    fn actor_mut(&mut self, id: Uuid) -> Result<&mut ActorRow, ChecklistError> {
        self.actors
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ChecklistError::UnknownActorRow(id))
    }

    fn task_index(&self, id: Uuid) -> Result<usize, ChecklistError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(ChecklistError::UnknownTaskRow(id))
    }

    fn task_mut(&mut self, id: Uuid) -> Result<&mut TaskRow, ChecklistError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ChecklistError::UnknownTaskRow(id))
    }
}

fn check_value_type(cell_type: CellType, value: &CellValue) -> Result<(), ChecklistError> {
    if cell_type.is_blank() {
        return Err(ChecklistError::BlankCell);
    }
    if value.cell_type() != cell_type {
        return Err(ChecklistError::CellTypeMismatch {
            expected: cell_type.as_str(),
            actual: value.cell_type().as_str(),
        });
    }
    Ok(())
}

fn dedup_trimmed(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_column(name: &str, cell_type: Option<CellType>) -> ChecklistModel {
        let mut model = ChecklistModel::new();
        model
            .apply(Edit::AddColumn {
                name: name.to_string(),
                cell_type,
                options: vec![],
            })
            .unwrap();
        model
    }

    #[test]
    fn test_new_model_has_one_row_each() {
        let model = ChecklistModel::new();
        assert_eq!(model.actors.len(), 1);
        assert_eq!(model.tasks.len(), 1);
        assert_eq!(model.tasks[0].task_number, "01.");
        assert_eq!(model.columns.len(), 7);
    }

    #[test]
    fn test_changing_cell_type_resets_value() {
        let mut model = model_with_column("Batch", Some(CellType::Text));
        let row = model.tasks[0].id;
        model
            .apply(Edit::SetCellValue {
                row,
                column: "Batch".to_string(),
                value: CellValue::Text("B-17".to_string()),
            })
            .unwrap();

        for (cell_type, zero) in [
            (CellType::Number, CellValue::Number(None)),
            (CellType::Checkbox, CellValue::Checkbox(false)),
            (CellType::MultiSelect, CellValue::MultiSelect(vec![])),
            (CellType::Text, CellValue::Text(String::new())),
        ] {
            model
                .apply(Edit::SetCellConfig {
                    row,
                    column: "Batch".to_string(),
                    config: CellConfig::new(cell_type),
                })
                .unwrap();
            assert_eq!(model.stored_cell_value(row, "Batch"), Some(&zero));
        }
    }

    #[test]
    fn test_blank_config_drops_value() {
        let mut model = model_with_column("Batch", Some(CellType::Text));
        let row = model.tasks[0].id;
        model
            .apply(Edit::SetCellConfig {
                row,
                column: "Batch".to_string(),
                config: CellConfig::new(CellType::Blank),
            })
            .unwrap();
        assert_eq!(model.stored_cell_value(row, "Batch"), None);
        let task = &model.tasks[0];
        let column = model.column("Batch").unwrap();
        assert_eq!(model.effective_cell_type(task, column), CellType::Blank);
        assert_eq!(model.cell_value(task, column), None);
    }

    #[test]
    fn test_row_override_wins_over_column_type() {
        let mut model = model_with_column("Reading", Some(CellType::Number));
        model.apply(Edit::AddTask).unwrap();
        let second = model.tasks[1].id;
        model
            .apply(Edit::SetCellConfig {
                row: second,
                column: "Reading".to_string(),
                config: CellConfig::with_options(
                    CellType::Select,
                    vec!["low".into(), "high".into(), "low".into()],
                ),
            })
            .unwrap();

        let column = model.column("Reading").unwrap();
        assert_eq!(
            model.effective_cell_type(&model.tasks[0], column),
            CellType::Number
        );
        assert_eq!(
            model.effective_cell_type(&model.tasks[1], column),
            CellType::Select
        );
        assert_eq!(
            model.effective_options(&model.tasks[1], column),
            &["low".to_string(), "high".to_string()]
        );
    }

    #[test]
    fn test_value_of_wrong_type_is_rejected() {
        let mut model = model_with_column("Reading", Some(CellType::Number));
        let row = model.tasks[0].id;
        let err = model
            .apply(Edit::SetCellValue {
                row,
                column: "Reading".to_string(),
                value: CellValue::Text("x".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, ChecklistError::CellTypeMismatch { .. }));
    }

    #[test]
    fn test_value_without_field_type_is_rejected() {
        let mut model = model_with_column("Notes", None);
        let row = model.tasks[0].id;
        assert_eq!(
            model.apply(Edit::SetCellValue {
                row,
                column: "Notes".to_string(),
                value: CellValue::Text("x".to_string()),
            }),
            Err(ChecklistError::BlankCell)
        );
    }

    #[test]
    fn test_realtime_clears_team_and_designation() {
        let mut model = ChecklistModel::new();
        let row = model.actors[0].id;
        model
            .apply(Edit::AssignDirectoryActor {
                row,
                record: ActorRecord {
                    designated_actor: "Jane".into(),
                    field: "QA".into(),
                    designation: "Manager".into(),
                    id: "a1".into(),
                    person: "Jane Doe".into(),
                },
            })
            .unwrap();
        assert_eq!(model.actors[0].team, "QA");

        model
            .apply(Edit::SetActorField {
                row,
                field: ActorField::MainActor,
                value: "Realtime".into(),
            })
            .unwrap();
        assert_eq!(model.actors[0].team, "");
        assert_eq!(model.actors[0].designation, "");

        assert_eq!(
            model.apply(Edit::SetActorField {
                row,
                field: ActorField::Team,
                value: "QA".into(),
            }),
            Err(ChecklistError::RealtimeActor)
        );
    }

    #[test]
    fn test_realtime_directory_record_drops_team() {
        let mut model = ChecklistModel::new();
        let row = model.actors[0].id;
        model
            .apply(Edit::AssignDirectoryActor {
                row,
                record: ActorRecord {
                    designated_actor: "Realtime".into(),
                    field: "QA".into(),
                    designation: "Manager".into(),
                    id: "a2".into(),
                    person: "Nobody".into(),
                },
            })
            .unwrap();
        let actor = &model.actors[0];
        assert!(actor.is_realtime());
        assert_eq!(actor.team, "");
        assert_eq!(actor.designation, "");
        assert_eq!(actor.person, "");
    }

    #[test]
    fn test_delete_task_renumbers() {
        let mut model = ChecklistModel::new();
        model.apply(Edit::AddTask).unwrap();
        model.apply(Edit::AddTask).unwrap();
        assert_eq!(model.tasks[2].task_number, "03.");

        let first = model.tasks[0].id;
        model.apply(Edit::DeleteTask(first)).unwrap();
        let numbers: Vec<_> = model.tasks.iter().map(|t| t.task_number.as_str()).collect();
        assert_eq!(numbers, vec!["01.", "02."]);
    }

    #[test]
    fn test_delete_actor_unlinks_tasks() {
        let mut model = ChecklistModel::new();
        let actor = model.actors[0].id;
        let task = model.tasks[0].id;
        model
            .apply(Edit::SetTaskAction {
                row: task,
                actor: Some(actor),
            })
            .unwrap();
        model.apply(Edit::DeleteActor(actor)).unwrap();
        assert_eq!(model.tasks[0].action_actor, None);
    }

    #[test]
    fn test_task_action_must_reference_existing_actor() {
        let mut model = ChecklistModel::new();
        let task = model.tasks[0].id;
        let ghost = Uuid::new_v4();
        assert_eq!(
            model.apply(Edit::SetTaskAction {
                row: task,
                actor: Some(ghost),
            }),
            Err(ChecklistError::UnknownActorRow(ghost))
        );
    }

    #[test]
    fn test_entity_type_change_clears_objects() {
        let mut model = ChecklistModel::new();
        let row = model.tasks[0].id;
        assert_eq!(
            model.apply(Edit::SetEntityObjects {
                row,
                objects: vec!["m1".into()],
            }),
            Err(ChecklistError::NoEntityType)
        );

        model
            .apply(Edit::SetEntityTypes {
                row,
                types: vec!["machine".into()],
            })
            .unwrap();
        model
            .apply(Edit::SetEntityObjects {
                row,
                objects: vec!["m1".into(), "m1".into()],
            })
            .unwrap();
        assert_eq!(model.tasks[0].entity_objects, vec!["m1".to_string()]);

        model
            .apply(Edit::SetEntityTypes {
                row,
                types: vec!["machine".into(), "lot".into()],
            })
            .unwrap();
        assert!(model.tasks[0].entity_objects.is_empty());
    }

    #[test]
    fn test_custom_column_names() {
        let mut model = model_with_column("Batch", None);
        assert_eq!(
            model.apply(Edit::AddColumn {
                name: "  ".into(),
                cell_type: None,
                options: vec![],
            }),
            Err(ChecklistError::EmptyColumnName)
        );
        assert_eq!(
            model.apply(Edit::AddColumn {
                name: "batch".into(),
                cell_type: None,
                options: vec![],
            }),
            Err(ChecklistError::DuplicateColumn("batch".into()))
        );
        assert_eq!(
            model.apply(Edit::AddColumn {
                name: "route".into(),
                cell_type: None,
                options: vec![],
            }),
            Err(ChecklistError::DuplicateColumn("route".into()))
        );
        assert_eq!(
            model.apply(Edit::AddColumn {
                name: "custom cells".into(),
                cell_type: None,
                options: vec![],
            }),
            Err(ChecklistError::DuplicateColumn("custom cells".into()))
        );
        assert_eq!(model.custom_columns().count(), 1);
    }

    #[test]
    fn test_toggle_column_visibility() {
        let mut model = ChecklistModel::new();
        model.apply(Edit::ToggleColumn("Route".into())).unwrap();
        assert!(!model.column("Route").unwrap().visible);
        assert_eq!(model.visible_columns().count(), 6);
        assert!(model.apply(Edit::ToggleColumn("Nope".into())).is_err());
    }

    #[test]
    fn test_custom_cells() {
        let mut model = ChecklistModel::new();
        let row = model.tasks[0].id;
        model
            .apply(Edit::AddCustomCell {
                row,
                tag: "Serial No".into(),
                cell_type: CellType::Number,
            })
            .unwrap();
        model
            .apply(Edit::SetCustomCellValue {
                row,
                index: 0,
                value: CellValue::Number(Some(7.0)),
            })
            .unwrap();
        assert_eq!(
            model.tasks[0].custom_cells[0].value,
            Some(CellValue::Number(Some(7.0)))
        );
        assert_eq!(
            model.apply(Edit::RemoveCustomCell { row, index: 3 }),
            Err(ChecklistError::UnknownCustomCell(3))
        );
        model.apply(Edit::RemoveCustomCell { row, index: 0 }).unwrap();
        assert!(model.tasks[0].custom_cells.is_empty());
    }

    #[test]
    fn test_publish_requires_named_task_with_emitted_actor() {
        let mut model = ChecklistModel::new();
        assert_eq!(
            model.validate_for_publish(),
            Err(ChecklistError::NoPublishableTasks)
        );

        let actor = model.actors[0].id;
        let task = model.tasks[0].id;
        model
            .apply(Edit::SetActorField {
                row: actor,
                field: ActorField::Actions,
                value: "Inspect".into(),
            })
            .unwrap();
        model
            .apply(Edit::SetTaskName {
                row: task,
                name: "Check valve".into(),
            })
            .unwrap();
        model
            .apply(Edit::SetTaskAction {
                row: task,
                actor: Some(actor),
            })
            .unwrap();
        // Actor has no main actor yet, so it is never emitted.
        assert_eq!(
            model.validate_for_publish(),
            Err(ChecklistError::NoPublishableTasks)
        );

        model
            .apply(Edit::SetActorField {
                row: actor,
                field: ActorField::MainActor,
                value: "Jane".into(),
            })
            .unwrap();
        assert_eq!(model.validate_for_publish(), Ok(()));
    }

    #[test]
    fn test_emitted_actor_keys_skip_incomplete_rows() {
        let mut model = ChecklistModel::new();
        model.apply(Edit::AddActor).unwrap();
        let second = model.actors[1].id;
        model
            .apply(Edit::SetActorField {
                row: second,
                field: ActorField::Actions,
                value: "Sign".into(),
            })
            .unwrap();
        model
            .apply(Edit::SetActorField {
                row: second,
                field: ActorField::MainActor,
                value: "realtime".into(),
            })
            .unwrap();
        assert_eq!(
            model.emitted_actor_keys(),
            vec![(second, "actor1".to_string())]
        );
    }
}
