use uuid::Uuid;

use crate::checklist::CellType;

/// What a submitted dialog writes to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    ActorAction(Uuid),
    MainActor(Uuid),
    Team(Uuid),
    Designation(Uuid),
    TaskName(Uuid),
    TaskAction(Uuid),
    EntityTypes(Uuid),
    EntityObjects(Uuid),
    Route(Uuid),
    Cell { row: Uuid, column: String },
    CustomCell { row: Uuid, index: usize },
    /// Choosing which custom cell of a row to edit.
    CustomCellList(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerOption {
    pub label: String,
    pub value: String,
}

impl PickerOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is also its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Picker entry value that switches to free-text entry.
pub const TYPE_IN_VALUE: &str = "__type_in__";

#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    pub title: String,
    pub target: EditTarget,
    pub options: Vec<PickerOption>,
    pub selected: usize,
}

impl PickerState {
    pub fn selected_option(&self) -> Option<&PickerOption> {
        self.options.get(self.selected)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPickerState {
    pub title: String,
    pub target: EditTarget,
    pub options: Vec<PickerOption>,
    pub checked: Vec<bool>,
    pub selected: usize,
}

impl MultiPickerState {
    pub fn new(
        title: impl Into<String>,
        target: EditTarget,
        options: Vec<PickerOption>,
        current: &[String],
    ) -> Self {
        let checked = options
            .iter()
            .map(|o| current.iter().any(|c| c == &o.value))
            .collect();
        Self {
            title: title.into(),
            target,
            options,
            checked,
            selected: 0,
        }
    }

    pub fn checked_values(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(o, _)| o.value.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextInputState {
    pub title: String,
    pub prompt: String,
    pub target: EditTarget,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnDialogState {
    pub selected: usize,
    pub editing_name: bool,
    pub name_buffer: String,
    /// Index into `ColumnDialogState::TYPE_CHOICES`.
    pub type_index: usize,
}

impl ColumnDialogState {
    pub const TYPE_CHOICES: &'static [Option<CellType>] = &[
        None,
        Some(CellType::Text),
        Some(CellType::Number),
        Some(CellType::Select),
        Some(CellType::MultiSelect),
        Some(CellType::Checkbox),
    ];

    pub fn new_column_type(&self) -> Option<CellType> {
        Self::TYPE_CHOICES
            .get(self.type_index)
            .copied()
            .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldTypeFocus {
    #[default]
    Type,
    Options,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldTypeDialogState {
    pub row: Uuid,
    pub column: String,
    /// Index into `CellType::selectable()`.
    pub type_index: usize,
    pub options: Vec<String>,
    pub option_buffer: String,
    pub focus: FieldTypeFocus,
}

impl FieldTypeDialogState {
    pub fn cell_type(&self) -> CellType {
        CellType::selectable()
            .get(self.type_index)
            .copied()
            .unwrap_or(CellType::Text)
    }

    /// Adds the buffered option unless it is empty or already listed.
    pub fn push_option(&mut self) -> bool {
        let option = self.option_buffer.trim().to_string();
        self.option_buffer.clear();
        if option.is_empty() || self.options.contains(&option) {
            return false;
        }
        self.options.push(option);
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomCellDialogState {
    pub row: Uuid,
    pub tag_buffer: String,
    /// Index into `CustomCellDialogState::TYPE_CHOICES`.
    pub type_index: usize,
}

impl CustomCellDialogState {
    pub const TYPE_CHOICES: &'static [CellType] =
        &[CellType::Text, CellType::Number, CellType::Checkbox];

    pub fn cell_type(&self) -> CellType {
        Self::TYPE_CHOICES
            .get(self.type_index)
            .copied()
            .unwrap_or(CellType::Text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Picker(PickerState),
    MultiPicker(MultiPickerState),
    TextInput(TextInputState),
    Columns(ColumnDialogState),
    FieldType(FieldTypeDialogState),
    CustomCell(CustomCellDialogState),
    ConfirmPublish,
}

impl Dialog {
    /// Whether printable keys go into a text buffer.
    pub fn accepts_text(&self) -> bool {
        match self {
            Dialog::TextInput(_) | Dialog::CustomCell(_) => true,
            Dialog::Columns(state) => state.editing_name,
            Dialog::FieldType(state) => state.focus == FieldTypeFocus::Options,
            Dialog::Picker(_) | Dialog::MultiPicker(_) | Dialog::ConfirmPublish => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_picker_checks_current_values() {
        let picker = MultiPickerState::new(
            "Entity Type",
            EditTarget::EntityTypes(Uuid::new_v4()),
            vec![PickerOption::plain("machine"), PickerOption::plain("lot")],
            &["lot".to_string()],
        );
        assert_eq!(picker.checked, vec![false, true]);
        assert_eq!(picker.checked_values(), vec!["lot".to_string()]);
    }

    #[test]
    fn test_field_type_options_are_deduplicated() {
        let mut state = FieldTypeDialogState {
            row: Uuid::new_v4(),
            column: "Grade".into(),
            type_index: 2,
            options: vec![],
            option_buffer: " A ".into(),
            focus: FieldTypeFocus::Options,
        };
        assert!(state.push_option());
        state.option_buffer = "A".into();
        assert!(!state.push_option());
        assert_eq!(state.options, vec!["A".to_string()]);
        assert_eq!(state.cell_type(), CellType::Select);
    }

    #[test]
    fn test_accepts_text() {
        assert!(Dialog::CustomCell(CustomCellDialogState {
            row: Uuid::new_v4(),
            tag_buffer: String::new(),
            type_index: 0,
        })
        .accepts_text());
        assert!(!Dialog::Columns(ColumnDialogState::default()).accepts_text());
        assert!(!Dialog::ConfirmPublish.accepts_text());
    }
}
