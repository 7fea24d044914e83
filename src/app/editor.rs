//! Cell editing: which dialog a cell opens and what a submitted dialog does.

use uuid::Uuid;

use super::dialog::{
    ColumnDialogState, CustomCellDialogState, Dialog, EditTarget, FieldTypeDialogState,
    FieldTypeFocus, MultiPickerState, PickerOption, PickerState, TextInputState, TYPE_IN_VALUE,
};
use super::state::{AppState, Section, ACTOR_COLUMNS};
use crate::checklist::{
    ActorField, CellConfig, CellType, CellValue, ChecklistError, Edit, COLUMN_ACTIONS,
    COLUMN_ENTITY_OBJECT, COLUMN_ENTITY_TYPE, COLUMN_REMARK, COLUMN_ROUTE, COLUMN_TASK_NAME,
    COLUMN_TASK_NUMBER, CUSTOM_CELLS_COLUMN, REALTIME_ACTOR, ROUTES,
};

const REALTIME_LABEL: &str = "Check on Realtime";
const NONE_VALUE: &str = "";

impl AppState {
    /// Enter on the selected cell.
    pub fn edit_selected_cell(&mut self) {
        match self.section {
            Section::Actors => self.edit_actor_cell(),
            Section::Tasks => self.edit_task_cell(),
        }
    }

    fn edit_actor_cell(&mut self) {
        let Some(actor) = self.selected_actor().cloned() else {
            return;
        };
        let column = ACTOR_COLUMNS[self.actor_cursor.col.min(ACTOR_COLUMNS.len() - 1)];
        match column {
            "Actions" => self.open_text_input(
                "Action",
                "Action performed by this actor",
                EditTarget::ActorAction(actor.id),
                &actor.actions,
            ),
            "Main Actor" => {
                let mut options = vec![PickerOption::new(REALTIME_LABEL, REALTIME_ACTOR)];
                options.extend(self.directory.iter().enumerate().map(|(i, record)| {
                    let mut label = record.designated_actor.clone();
                    if !record.field.is_empty() || !record.designation.is_empty() {
                        label = format!("{} ({}, {})", label, record.field, record.designation);
                    }
                    PickerOption::new(label, i.to_string())
                }));
                options.push(PickerOption::new("Type a name...", TYPE_IN_VALUE));
                self.open_picker("Main Actor", EditTarget::MainActor(actor.id), options, None);
            }
            "Team" | "Designation" => {
                if actor.is_realtime() {
                    self.show_info(ChecklistError::RealtimeActor.to_string());
                    return;
                }
                let is_team = column == "Team";
                let mut values: Vec<&str> = self
                    .directory
                    .iter()
                    .map(|r| {
                        if is_team {
                            r.field.as_str()
                        } else {
                            r.designation.as_str()
                        }
                    })
                    .filter(|v| !v.trim().is_empty())
                    .collect();
                values.sort_unstable();
                values.dedup();
                let mut options: Vec<PickerOption> =
                    values.into_iter().map(PickerOption::plain).collect();
                options.push(PickerOption::new("Type a value...", TYPE_IN_VALUE));
                let (target, current) = if is_team {
                    (EditTarget::Team(actor.id), actor.team.as_str())
                } else {
                    (EditTarget::Designation(actor.id), actor.designation.as_str())
                };
                self.open_picker(column, target, options, Some(current));
            }
            _ => {}
        }
    }

    fn edit_task_cell(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        let Some(column) = self.selected_task_column() else {
            return;
        };

        match column.as_str() {
            COLUMN_TASK_NUMBER => {}
            COLUMN_TASK_NAME => self.open_text_input(
                "Task Name",
                "Name of this task",
                EditTarget::TaskName(task.id),
                &task.task_name,
            ),
            COLUMN_ACTIONS => {
                let choices: Vec<PickerOption> = self
                    .model
                    .action_choices()
                    .map(|a| {
                        let label = if a.main_actor.is_empty() {
                            a.actions.clone()
                        } else {
                            format!("{} ({})", a.actions, a.main_actor)
                        };
                        PickerOption::new(label, a.id.to_string())
                    })
                    .collect();
                if choices.is_empty() {
                    self.show_warning("Add an action in the main actor table first");
                    return;
                }
                let mut options = vec![PickerOption::new("(none)", NONE_VALUE)];
                options.extend(choices);
                let current = task.action_actor.map(|id| id.to_string());
                self.open_picker(
                    "Action",
                    EditTarget::TaskAction(task.id),
                    options,
                    current.as_deref().or(Some(NONE_VALUE)),
                );
            }
            COLUMN_REMARK => self.toggle_selected_cell(),
            COLUMN_ENTITY_TYPE => {
                if self.taxonomy.is_empty() {
                    self.show_warning("No entity data loaded");
                    return;
                }
                let options = self
                    .taxonomy
                    .types
                    .iter()
                    .map(|t| PickerOption::plain(t.key.clone()))
                    .collect();
                self.dialog = Some(Dialog::MultiPicker(MultiPickerState::new(
                    "Entity Type",
                    EditTarget::EntityTypes(task.id),
                    options,
                    &task.entity_types,
                )));
            }
            COLUMN_ENTITY_OBJECT => {
                if task.entity_types.is_empty() {
                    self.show_warning(ChecklistError::NoEntityType.to_string());
                    return;
                }
                let options: Vec<PickerOption> = task
                    .entity_types
                    .iter()
                    .filter_map(|t| self.taxonomy.get(t))
                    .flat_map(|entry| {
                        entry.objects.iter().map(move |o| {
                            PickerOption::new(format!("{} [{}]", o.label(), entry.key), o.key.clone())
                        })
                    })
                    .collect();
                if options.is_empty() {
                    self.show_warning("Selected entity types have no objects");
                    return;
                }
                self.dialog = Some(Dialog::MultiPicker(MultiPickerState::new(
                    "Entity Object (none selected = all)",
                    EditTarget::EntityObjects(task.id),
                    options,
                    &task.entity_objects,
                )));
            }
            COLUMN_ROUTE => {
                let mut options = vec![PickerOption::new("(none)", NONE_VALUE)];
                options.extend(
                    ROUTES
                        .iter()
                        .map(|(route, label)| PickerOption::new(format!("{} ({})", label, route), *route)),
                );
                self.open_picker(
                    "Route",
                    EditTarget::Route(task.id),
                    options,
                    Some(task.route.as_str()),
                );
            }
            CUSTOM_CELLS_COLUMN => {
                if task.custom_cells.is_empty() {
                    self.open_custom_cell_dialog();
                    return;
                }
                let mut options: Vec<PickerOption> = task
                    .custom_cells
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| {
                        let value = cell.value.as_ref().map(|v| v.display()).unwrap_or_default();
                        PickerOption::new(format!("{}: {}", cell.tag, value), i.to_string())
                    })
                    .collect();
                options.push(PickerOption::new("Add custom cell...", TYPE_IN_VALUE));
                self.open_picker(
                    "Custom Cells",
                    EditTarget::CustomCellList(task.id),
                    options,
                    None,
                );
            }
            _ => self.edit_custom_column_cell(task.id, &column),
        }
    }

    fn edit_custom_column_cell(&mut self, row: Uuid, column: &str) {
        let (cell_type, options, value) = {
            let (Ok(task), Ok(col)) = (self.model.task(row), self.model.column(column)) else {
                return;
            };
            (
                self.model.effective_cell_type(task, col),
                self.model.effective_options(task, col).to_vec(),
                self.model.cell_value(task, col),
            )
        };
        let target = EditTarget::Cell {
            row,
            column: column.to_string(),
        };

        match cell_type {
            CellType::Blank => self.open_field_type_dialog(),
            CellType::Text | CellType::Number => self.open_text_input(
                column,
                &format!("{} value", cell_type.display_name()),
                target,
                &value.map(|v| v.display()).unwrap_or_default(),
            ),
            CellType::Checkbox => self.toggle_selected_cell(),
            CellType::Select => {
                if options.is_empty() {
                    self.show_warning("No options yet, press 't' to add some");
                    return;
                }
                let current = match value {
                    Some(CellValue::Select(s)) => s,
                    _ => String::new(),
                };
                let mut choices = vec![PickerOption::new("(none)", NONE_VALUE)];
                choices.extend(options.into_iter().map(PickerOption::plain));
                self.open_picker(column, target, choices, Some(current.as_str()));
            }
            CellType::MultiSelect => {
                if options.is_empty() {
                    self.show_warning("No options yet, press 't' to add some");
                    return;
                }
                let current = match value {
                    Some(CellValue::MultiSelect(items)) => items,
                    _ => Vec::new(),
                };
                self.dialog = Some(Dialog::MultiPicker(MultiPickerState::new(
                    column,
                    target,
                    options.into_iter().map(PickerOption::plain).collect(),
                    &current,
                )));
            }
        }
    }

    /// Space on the selected cell: flips remark and checkbox cells.
    pub fn toggle_selected_cell(&mut self) {
        if self.section != Section::Tasks {
            return;
        }
        let (Some(task), Some(column)) = (self.selected_task().cloned(), self.selected_task_column())
        else {
            return;
        };

        if column == COLUMN_REMARK {
            self.apply_edit(Edit::SetRemark {
                row: task.id,
                remark: !task.remark,
            });
            return;
        }

        let Ok(col) = self.model.column(&column) else {
            return;
        };
        if self.model.effective_cell_type(&task, col) != CellType::Checkbox {
            return;
        }
        let checked = matches!(
            self.model.cell_value(&task, col),
            Some(CellValue::Checkbox(true))
        );
        self.apply_edit(Edit::SetCellValue {
            row: task.id,
            column,
            value: CellValue::Checkbox(!checked),
        });
    }

    pub fn open_columns_dialog(&mut self) {
        self.dialog = Some(Dialog::Columns(ColumnDialogState::default()));
    }

    /// Field type dialog for the selected custom column cell.
    pub fn open_field_type_dialog(&mut self) {
        if self.section != Section::Tasks {
            self.show_info("Field types apply to task cells");
            return;
        }
        let (Some(task), Some(column)) = (self.selected_task(), self.selected_task_column()) else {
            return;
        };
        let Ok(col) = self.model.column(&column) else {
            self.show_info("Field types apply to custom columns");
            return;
        };
        if col.builtin {
            self.show_info("Field types apply to custom columns");
            return;
        }

        let cell_type = self.model.effective_cell_type(task, col);
        let type_index = CellType::selectable()
            .iter()
            .position(|t| *t == cell_type)
            .unwrap_or(0);
        self.dialog = Some(Dialog::FieldType(FieldTypeDialogState {
            row: task.id,
            column,
            type_index,
            options: self.model.effective_options(task, col).to_vec(),
            option_buffer: String::new(),
            focus: FieldTypeFocus::Type,
        }));
    }

    pub fn open_custom_cell_dialog(&mut self) {
        if self.section != Section::Tasks {
            self.show_info("Custom cells belong to task rows");
            return;
        }
        let Some(task) = self.selected_task() else {
            return;
        };
        self.dialog = Some(Dialog::CustomCell(CustomCellDialogState {
            row: task.id,
            tag_buffer: String::new(),
            type_index: 0,
        }));
    }

    fn open_text_input(&mut self, title: &str, prompt: &str, target: EditTarget, current: &str) {
        self.dialog = Some(Dialog::TextInput(TextInputState {
            title: title.to_string(),
            prompt: prompt.to_string(),
            target,
            buffer: current.to_string(),
        }));
    }

    fn open_picker(
        &mut self,
        title: &str,
        target: EditTarget,
        options: Vec<PickerOption>,
        current: Option<&str>,
    ) {
        let selected = current
            .and_then(|c| options.iter().position(|o| o.value == c))
            .unwrap_or(0);
        self.dialog = Some(Dialog::Picker(PickerState {
            title: title.to_string(),
            target,
            options,
            selected,
        }));
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = match self.dialog.take() {
            Some(Dialog::Columns(state)) if state.editing_name => {
                Some(Dialog::Columns(ColumnDialogState {
                    editing_name: false,
                    name_buffer: String::new(),
                    ..state
                }))
            }
            Some(Dialog::FieldType(state)) if state.focus == FieldTypeFocus::Options => {
                Some(Dialog::FieldType(FieldTypeDialogState {
                    focus: FieldTypeFocus::Type,
                    option_buffer: String::new(),
                    ..state
                }))
            }
            _ => None,
        };
    }

    pub fn dialog_up(&mut self) {
        match &mut self.dialog {
            Some(Dialog::Picker(p)) => p.selected = p.selected.saturating_sub(1),
            Some(Dialog::MultiPicker(p)) => p.selected = p.selected.saturating_sub(1),
            Some(Dialog::Columns(c)) if !c.editing_name => c.selected = c.selected.saturating_sub(1),
            Some(Dialog::FieldType(f)) if f.focus == FieldTypeFocus::Type => {
                f.type_index = f.type_index.saturating_sub(1)
            }
            _ => {}
        }
    }

    pub fn dialog_down(&mut self) {
        let column_count = self.model.columns.len();
        match &mut self.dialog {
            Some(Dialog::Picker(p)) => {
                if p.selected + 1 < p.options.len() {
                    p.selected += 1;
                }
            }
            Some(Dialog::MultiPicker(p)) => {
                if p.selected + 1 < p.options.len() {
                    p.selected += 1;
                }
            }
            Some(Dialog::Columns(c)) if !c.editing_name => {
                if c.selected + 1 < column_count {
                    c.selected += 1;
                }
            }
            Some(Dialog::FieldType(f)) if f.focus == FieldTypeFocus::Type => {
                if f.type_index + 1 < CellType::selectable().len() {
                    f.type_index += 1;
                }
            }
            _ => {}
        }
    }

    pub fn dialog_toggle(&mut self) {
        let column = match &mut self.dialog {
            Some(Dialog::MultiPicker(p)) => {
                if let Some(checked) = p.checked.get_mut(p.selected) {
                    *checked = !*checked;
                }
                None
            }
            Some(Dialog::Columns(c)) if !c.editing_name => Some(c.selected),
            _ => None,
        };
        if let Some(index) = column {
            if let Some(name) = self.model.columns.get(index).map(|c| c.name.clone()) {
                self.apply_edit(Edit::ToggleColumn(name));
            }
        }
    }

    /// Tab inside a dialog.
    pub fn dialog_next_field(&mut self) {
        match &mut self.dialog {
            Some(Dialog::Columns(c)) if c.editing_name => {
                c.type_index = (c.type_index + 1) % ColumnDialogState::TYPE_CHOICES.len();
            }
            Some(Dialog::FieldType(f)) => {
                f.focus = match f.focus {
                    FieldTypeFocus::Type if f.cell_type().has_options() => FieldTypeFocus::Options,
                    _ => FieldTypeFocus::Type,
                };
            }
            Some(Dialog::CustomCell(c)) => {
                c.type_index = (c.type_index + 1) % CustomCellDialogState::TYPE_CHOICES.len();
            }
            _ => {}
        }
    }

    pub fn dialog_begin_input(&mut self) {
        if let Some(Dialog::Columns(c)) = &mut self.dialog {
            c.editing_name = true;
            c.name_buffer.clear();
        }
    }

    pub fn dialog_input(&mut self, ch: char) {
        match &mut self.dialog {
            Some(Dialog::TextInput(t)) => t.buffer.push(ch),
            Some(Dialog::Columns(c)) if c.editing_name => c.name_buffer.push(ch),
            Some(Dialog::FieldType(f)) if f.focus == FieldTypeFocus::Options => {
                f.option_buffer.push(ch)
            }
            Some(Dialog::CustomCell(c)) => c.tag_buffer.push(ch),
            _ => {}
        }
    }

    pub fn dialog_backspace(&mut self) {
        match &mut self.dialog {
            Some(Dialog::TextInput(t)) => {
                t.buffer.pop();
            }
            Some(Dialog::Columns(c)) if c.editing_name => {
                c.name_buffer.pop();
            }
            Some(Dialog::FieldType(f)) if f.focus == FieldTypeFocus::Options => {
                if f.option_buffer.pop().is_none() {
                    f.options.pop();
                }
            }
            Some(Dialog::CustomCell(c)) => {
                c.tag_buffer.pop();
            }
            _ => {}
        }
    }

    /// Delete inside the custom cell list removes that cell.
    pub fn dialog_delete(&mut self) {
        let Some(Dialog::Picker(picker)) = &self.dialog else {
            return;
        };
        let EditTarget::CustomCellList(row) = picker.target else {
            return;
        };
        let Some(index) = picker
            .selected_option()
            .and_then(|o| o.value.parse::<usize>().ok())
        else {
            return;
        };
        if self.apply_edit(Edit::RemoveCustomCell { row, index }) {
            self.dialog = None;
        }
    }

    pub fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog {
            Dialog::Picker(picker) => self.submit_picker(picker),
            Dialog::MultiPicker(picker) => {
                let values = picker.checked_values();
                let edit = match picker.target {
                    EditTarget::EntityTypes(row) => Edit::SetEntityTypes { row, types: values },
                    EditTarget::EntityObjects(row) => Edit::SetEntityObjects { row, objects: values },
                    EditTarget::Cell { row, column } => Edit::SetCellValue {
                        row,
                        column,
                        value: CellValue::MultiSelect(values),
                    },
                    _ => return,
                };
                self.apply_edit(edit);
            }
            Dialog::TextInput(input) => self.submit_text(input),
            Dialog::Columns(mut state) => {
                if !state.editing_name {
                    return;
                }
                let added = self.apply_edit(Edit::AddColumn {
                    name: state.name_buffer.clone(),
                    cell_type: state.new_column_type(),
                    options: Vec::new(),
                });
                if added {
                    self.log_info(format!("Added column '{}'", state.name_buffer.trim()));
                    state.editing_name = false;
                    state.name_buffer.clear();
                    state.selected = self.model.columns.len() - 1;
                }
                self.dialog = Some(Dialog::Columns(state));
            }
            Dialog::FieldType(mut state) => {
                if state.focus == FieldTypeFocus::Options && !state.option_buffer.trim().is_empty()
                {
                    state.push_option();
                    self.dialog = Some(Dialog::FieldType(state));
                    return;
                }
                let cell_type = state.cell_type();
                if cell_type.has_options() && state.options.is_empty() {
                    self.show_warning("Add at least one option");
                    state.focus = FieldTypeFocus::Options;
                    self.dialog = Some(Dialog::FieldType(state));
                    return;
                }
                self.apply_edit(Edit::SetCellConfig {
                    row: state.row,
                    column: state.column,
                    config: CellConfig::with_options(cell_type, state.options),
                });
            }
            Dialog::CustomCell(state) => {
                let cell_type = state.cell_type();
                if !self.apply_edit(Edit::AddCustomCell {
                    row: state.row,
                    tag: state.tag_buffer.clone(),
                    cell_type,
                }) {
                    self.dialog = Some(Dialog::CustomCell(state));
                }
            }
            Dialog::ConfirmPublish => {}
        }
    }

    fn submit_picker(&mut self, picker: PickerState) {
        let Some(option) = picker.selected_option().cloned() else {
            return;
        };
        let type_in = option.value == TYPE_IN_VALUE;

        match picker.target {
            EditTarget::MainActor(row) => {
                if type_in {
                    let current = self.model.actor(row).map(|a| a.main_actor.clone());
                    self.open_text_input(
                        "Main Actor",
                        "Actor name",
                        EditTarget::MainActor(row),
                        &current.unwrap_or_default(),
                    );
                } else if option.value == REALTIME_ACTOR {
                    self.apply_edit(Edit::SetActorField {
                        row,
                        field: ActorField::MainActor,
                        value: REALTIME_ACTOR.to_string(),
                    });
                } else if let Some(record) = option
                    .value
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.directory.get(i))
                    .cloned()
                {
                    self.apply_edit(Edit::AssignDirectoryActor { row, record });
                }
            }
            EditTarget::Team(row) | EditTarget::Designation(row) if type_in => {
                let team = matches!(picker.target, EditTarget::Team(_));
                let current = self
                    .model
                    .actor(row)
                    .map(|a| if team { a.team.clone() } else { a.designation.clone() })
                    .unwrap_or_default();
                self.open_text_input(&picker.title, &picker.title, picker.target, &current);
            }
            EditTarget::Team(row) => {
                self.apply_edit(Edit::SetActorField {
                    row,
                    field: ActorField::Team,
                    value: option.value,
                });
            }
            EditTarget::Designation(row) => {
                self.apply_edit(Edit::SetActorField {
                    row,
                    field: ActorField::Designation,
                    value: option.value,
                });
            }
            EditTarget::TaskAction(row) => {
                let actor = option.value.parse::<Uuid>().ok();
                self.apply_edit(Edit::SetTaskAction { row, actor });
            }
            EditTarget::Route(row) => {
                self.apply_edit(Edit::SetRoute {
                    row,
                    route: option.value,
                });
            }
            EditTarget::Cell { row, column } => {
                self.apply_edit(Edit::SetCellValue {
                    row,
                    column,
                    value: CellValue::Select(option.value),
                });
            }
            EditTarget::CustomCellList(row) => {
                if type_in {
                    self.open_custom_cell_dialog();
                    return;
                }
                let Ok(index) = option.value.parse::<usize>() else {
                    return;
                };
                self.edit_custom_cell(row, index);
            }
            _ => {}
        }
    }

    fn edit_custom_cell(&mut self, row: Uuid, index: usize) {
        let Some(cell) = self
            .model
            .task(row)
            .ok()
            .and_then(|t| t.custom_cells.get(index))
            .cloned()
        else {
            return;
        };
        match cell.cell_type {
            CellType::Checkbox => {
                let checked = matches!(cell.value, Some(CellValue::Checkbox(true)));
                self.apply_edit(Edit::SetCustomCellValue {
                    row,
                    index,
                    value: CellValue::Checkbox(!checked),
                });
            }
            cell_type => self.open_text_input(
                &cell.tag,
                &format!("{} value", cell_type.display_name()),
                EditTarget::CustomCell { row, index },
                &cell.value.map(|v| v.display()).unwrap_or_default(),
            ),
        }
    }

    fn submit_text(&mut self, input: TextInputState) {
        let value = input.buffer;
        let edit = match input.target {
            EditTarget::ActorAction(row) => Edit::SetActorField {
                row,
                field: ActorField::Actions,
                value,
            },
            EditTarget::MainActor(row) => Edit::SetActorField {
                row,
                field: ActorField::MainActor,
                value,
            },
            EditTarget::Team(row) => Edit::SetActorField {
                row,
                field: ActorField::Team,
                value,
            },
            EditTarget::Designation(row) => Edit::SetActorField {
                row,
                field: ActorField::Designation,
                value,
            },
            EditTarget::TaskName(row) => Edit::SetTaskName { row, name: value },
            EditTarget::Cell { row, column } => {
                let cell_type = match (self.model.task(row), self.model.column(&column)) {
                    (Ok(task), Ok(col)) => self.model.effective_cell_type(task, col),
                    _ => return,
                };
                match CellValue::parse(cell_type, &value) {
                    Ok(value) => Edit::SetCellValue { row, column, value },
                    Err(e) => {
                        self.show_warning(e.to_string());
                        return;
                    }
                }
            }
            EditTarget::CustomCell { row, index } => {
                let cell_type = match self
                    .model
                    .task(row)
                    .ok()
                    .and_then(|t| t.custom_cells.get(index))
                {
                    Some(cell) => cell.cell_type,
                    None => return,
                };
                match CellValue::parse(cell_type, &value) {
                    Ok(value) => Edit::SetCustomCellValue { row, index, value },
                    Err(e) => {
                        self.show_warning(e.to_string());
                        return;
                    }
                }
            }
            _ => return,
        };
        self.apply_edit(edit);
    }

    pub fn request_publish(&mut self) {
        if self.publishing {
            self.show_info("Publish already in progress");
            return;
        }
        self.dialog = Some(Dialog::ConfirmPublish);
    }
}
