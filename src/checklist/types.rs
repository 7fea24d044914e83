use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ChecklistError;

/// Main-actor value that defers actor resolution to execution time.
pub const REALTIME_ACTOR: &str = "realtime";

pub const COLUMN_TASK_NUMBER: &str = "Task Number";
pub const COLUMN_TASK_NAME: &str = "Task Name";
pub const COLUMN_ACTIONS: &str = "Actions";
pub const COLUMN_REMARK: &str = "Remark";
pub const COLUMN_ENTITY_TYPE: &str = "Entity Type";
pub const COLUMN_ENTITY_OBJECT: &str = "Entity Object";
pub const COLUMN_ROUTE: &str = "Route";

pub const BUILTIN_COLUMNS: &[&str] = &[
    COLUMN_TASK_NUMBER,
    COLUMN_TASK_NAME,
    COLUMN_ACTIONS,
    COLUMN_REMARK,
    COLUMN_ENTITY_TYPE,
    COLUMN_ENTITY_OBJECT,
    COLUMN_ROUTE,
];

/// Trailing pseudo-column of the task table listing a row's custom cells.
pub const CUSTOM_CELLS_COLUMN: &str = "Custom Cells";

/// Verification flows a task can be routed to: (route, label).
pub const ROUTES: &[(&str, &str)] = &[
    ("/image", "Image Verification"),
    ("/invoice", "Document Scan"),
];

/// The three checklist kinds a workflow is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChecklistKind {
    Meq,
    Drm,
    Rmq,
}

impl ChecklistKind {
    pub fn code(&self) -> &'static str {
        match self {
            ChecklistKind::Meq => "MEQ",
            ChecklistKind::Drm => "DRM",
            ChecklistKind::Rmq => "RMQ",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChecklistKind::Meq => "Manufacturing Equipments",
            ChecklistKind::Drm => "Dispensing of Raw Materials",
            ChecklistKind::Rmq => "Raw material Requisition",
        }
    }

    /// Key of this kind's step inside a workflow document.
    pub fn step_key(&self) -> &'static str {
        match self {
            ChecklistKind::Meq => "step1",
            ChecklistKind::Drm => "step2",
            ChecklistKind::Rmq => "step3",
        }
    }

    pub fn step_order(&self) -> u32 {
        match self {
            ChecklistKind::Meq => 1,
            ChecklistKind::Drm => 2,
            ChecklistKind::Rmq => 3,
        }
    }

    pub fn checklist_name(&self) -> String {
        format!("{} Checklist", self.code())
    }
}

impl fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChecklistKind {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MEQ" => Ok(ChecklistKind::Meq),
            "DRM" => Ok(ChecklistKind::Drm),
            "RMQ" => Ok(ChecklistKind::Rmq),
            other => Err(ChecklistError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CellType {
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    #[default]
    Blank,
}

impl CellType {
    /// Types a user can pick in the field type dialog.
    pub fn selectable() -> &'static [CellType] {
        &[
            CellType::Text,
            CellType::Number,
            CellType::Select,
            CellType::MultiSelect,
            CellType::Checkbox,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Text => "text",
            CellType::Number => "number",
            CellType::Checkbox => "checkbox",
            CellType::Select => "select",
            CellType::MultiSelect => "multi-select",
            CellType::Blank => "blank",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CellType::Text => "Text",
            CellType::Number => "Number",
            CellType::Checkbox => "Checkbox",
            CellType::Select => "Select",
            CellType::MultiSelect => "Multi Select",
            CellType::Blank => "Blank",
        }
    }

    pub fn has_options(&self) -> bool {
        matches!(self, CellType::Select | CellType::MultiSelect)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellType::Blank)
    }

    /// Value a cell holds right after its type is set. Blank cells hold nothing.
    pub fn zero_value(&self) -> Option<CellValue> {
        match self {
            CellType::Text => Some(CellValue::Text(String::new())),
            CellType::Number => Some(CellValue::Number(None)),
            CellType::Checkbox => Some(CellValue::Checkbox(false)),
            CellType::Select => Some(CellValue::Select(String::new())),
            CellType::MultiSelect => Some(CellValue::MultiSelect(Vec::new())),
            CellType::Blank => None,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = ChecklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(CellType::Text),
            "number" => Ok(CellType::Number),
            "checkbox" => Ok(CellType::Checkbox),
            "select" => Ok(CellType::Select),
            "multi-select" => Ok(CellType::MultiSelect),
            "blank" | "" => Ok(CellType::Blank),
            other => Err(ChecklistError::UnknownCellType(other.to_string())),
        }
    }
}

/// Per-row, per-column override of a column's type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellConfig {
    #[serde(rename = "type")]
    pub cell_type: CellType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl CellConfig {
    pub fn new(cell_type: CellType) -> Self {
        Self {
            cell_type,
            options: Vec::new(),
        }
    }

    pub fn with_options(cell_type: CellType, options: Vec<String>) -> Self {
        let options = if cell_type.has_options() {
            options
        } else {
            Vec::new()
        };
        Self { cell_type, options }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(Option<f64>),
    Checkbox(bool),
    Select(String),
    MultiSelect(Vec<String>),
}

impl CellValue {
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Text(_) => CellType::Text,
            CellValue::Number(_) => CellType::Number,
            CellValue::Checkbox(_) => CellType::Checkbox,
            CellValue::Select(_) => CellType::Select,
            CellValue::MultiSelect(_) => CellType::MultiSelect,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Text(s) | CellValue::Select(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_none(),
            CellValue::Checkbox(_) => false,
            CellValue::MultiSelect(v) => v.is_empty(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Select(s) => s.clone(),
            CellValue::Number(Some(n)) => format_number(*n),
            CellValue::Number(None) => String::new(),
            CellValue::Checkbox(true) => "[x]".to_string(),
            CellValue::Checkbox(false) => "[ ]".to_string(),
            CellValue::MultiSelect(v) => v.join(", "),
        }
    }

    /// Parse user-typed text into a value of the given type.
    pub fn parse(cell_type: CellType, input: &str) -> Result<CellValue, ChecklistError> {
        let trimmed = input.trim();
        match cell_type {
            CellType::Text => Ok(CellValue::Text(input.to_string())),
            CellType::Number if trimmed.is_empty() => Ok(CellValue::Number(None)),
            CellType::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| CellValue::Number(Some(n)))
                .ok_or_else(|| ChecklistError::InvalidNumber(trimmed.to_string())),
            CellType::Checkbox => Ok(CellValue::Checkbox(matches!(
                trimmed.to_lowercase().as_str(),
                "true" | "yes" | "1" | "x"
            ))),
            CellType::Select => Ok(CellValue::Select(trimmed.to_string())),
            CellType::MultiSelect => Ok(CellValue::MultiSelect(
                trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            CellType::Blank => Err(ChecklistError::BlankCell),
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Table-wide column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub visible: bool,
    pub cell_type: Option<CellType>,
    pub options: Vec<String>,
    pub builtin: bool,
}

impl Column {
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visible: true,
            cell_type: None,
            options: Vec::new(),
            builtin: true,
        }
    }

    pub fn custom(name: impl Into<String>, cell_type: Option<CellType>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            cell_type,
            options,
            builtin: false,
        }
    }

    pub fn default_columns() -> Vec<Column> {
        BUILTIN_COLUMNS.iter().map(|name| Column::builtin(name)).collect()
    }
}

/// Names a custom column may not take: the built-ins and the custom cells
/// list shown after them.
pub fn is_reserved_column(name: &str) -> bool {
    let name = name.trim();
    BUILTIN_COLUMNS
        .iter()
        .chain(std::iter::once(&CUSTOM_CELLS_COLUMN))
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// One row of the main actor grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRow {
    pub id: Uuid,
    pub actions: String,
    pub main_actor: String,
    pub team: String,
    pub designation: String,
    pub person: String,
}

impl ActorRow {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            actions: String::new(),
            main_actor: String::new(),
            team: String::new(),
            designation: String::new(),
            person: String::new(),
        }
    }

    pub fn is_realtime(&self) -> bool {
        self.main_actor.trim().eq_ignore_ascii_case(REALTIME_ACTOR)
    }

    /// A realtime actor is resolved at execution time, so it carries no
    /// team, designation or person.
    pub fn clear_if_realtime(&mut self) {
        if self.is_realtime() {
            self.team.clear();
            self.designation.clear();
            self.person.clear();
        }
    }

    /// Rows without an action label or actor never reach the wire.
    pub fn is_publishable(&self) -> bool {
        !self.actions.trim().is_empty() && !self.main_actor.trim().is_empty()
    }
}

impl Default for ActorRow {
    fn default() -> Self {
        Self::new()
    }
}

/// List-based ad-hoc field attached to one task row.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomCell {
    pub tag: String,
    pub cell_type: CellType,
    pub value: Option<CellValue>,
}

impl CustomCell {
    pub fn new(tag: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            tag: tag.into(),
            cell_type,
            value: cell_type.zero_value(),
        }
    }
}

/// One task of the checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: Uuid,
    pub task_number: String,
    pub task_name: String,
    /// Actor row whose action this task performs.
    pub action_actor: Option<Uuid>,
    pub remark: bool,
    pub entity_types: Vec<String>,
    pub entity_objects: Vec<String>,
    pub route: String,
    pub cell_configs: std::collections::BTreeMap<String, CellConfig>,
    pub custom_cells: Vec<CustomCell>,
}

impl TaskRow {
    pub fn new(index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_number: task_number(index),
            task_name: String::new(),
            action_actor: None,
            remark: false,
            entity_types: Vec::new(),
            entity_objects: Vec::new(),
            route: String::new(),
            cell_configs: Default::default(),
            custom_cells: Vec::new(),
        }
    }
}

/// `01.`, `02.`, ... for the row at `index`.
pub fn task_number(index: usize) -> String {
    format!("{:02}.", index + 1)
}

/// Directory entry returned by `GET /Actors`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActorRecord {
    #[serde(rename = "Designated_Actor", default)]
    pub designated_actor: String,
    /// Team the actor belongs to.
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub person: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityObject {
    pub key: String,
    pub id: String,
    pub name: String,
}

impl EntityObject {
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.key
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityTypeEntry {
    pub key: String,
    pub objects: Vec<EntityObject>,
}

/// Entity types and their objects, in the order the API returned them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityTaxonomy {
    pub types: Vec<EntityTypeEntry>,
}

impl EntityTaxonomy {
    /// Build from `{ typeKey: { objectKey: { ID, name } } }`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(types) = value.as_object() else {
            return Self::default();
        };

        let types = types
            .iter()
            .map(|(type_key, objects)| {
                let objects = objects
                    .as_object()
                    .map(|objects| {
                        objects
                            .iter()
                            .map(|(object_key, object)| EntityObject {
                                key: object_key.clone(),
                                id: string_field(object, "ID"),
                                name: {
                                    let name = string_field(object, "name");
                                    if name.is_empty() {
                                        string_field(object, "Name")
                                    } else {
                                        name
                                    }
                                },
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                EntityTypeEntry {
                    key: type_key.trim().to_string(),
                    objects,
                }
            })
            .collect();

        Self { types }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut types = serde_json::Map::new();
        for entry in &self.types {
            let mut objects = serde_json::Map::new();
            for object in &entry.objects {
                objects.insert(
                    object.key.clone(),
                    serde_json::json!({ "ID": object.id, "name": object.name }),
                );
            }
            types.insert(entry.key.clone(), serde_json::Value::Object(objects));
        }
        serde_json::Value::Object(types)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, type_key: &str) -> Option<&EntityTypeEntry> {
        let type_key = type_key.trim();
        self.types.iter().find(|entry| entry.key == type_key)
    }

    pub fn contains_object(&self, type_key: &str, object_key: &str) -> bool {
        self.get(type_key)
            .map(|entry| entry.objects.iter().any(|o| o.key == object_key.trim()))
            .unwrap_or(false)
    }
}

pub(crate) fn string_field(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_step_mapping() {
        assert_eq!(ChecklistKind::Meq.step_key(), "step1");
        assert_eq!(ChecklistKind::Drm.step_key(), "step2");
        assert_eq!(ChecklistKind::Rmq.step_key(), "step3");
        assert_eq!(ChecklistKind::Drm.step_order(), 2);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert_eq!(
            "XYZ".parse::<ChecklistKind>(),
            Err(ChecklistError::UnknownKind("XYZ".to_string()))
        );
        assert_eq!("RMQ".parse::<ChecklistKind>(), Ok(ChecklistKind::Rmq));
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(
            CellType::Text.zero_value(),
            Some(CellValue::Text(String::new()))
        );
        assert_eq!(CellType::Number.zero_value(), Some(CellValue::Number(None)));
        assert_eq!(
            CellType::Checkbox.zero_value(),
            Some(CellValue::Checkbox(false))
        );
        assert_eq!(
            CellType::MultiSelect.zero_value(),
            Some(CellValue::MultiSelect(Vec::new()))
        );
        assert_eq!(CellType::Blank.zero_value(), None);
    }

    #[test]
    fn test_cell_type_serde_names() {
        let json = serde_json::to_string(&CellType::MultiSelect).unwrap();
        assert_eq!(json, "\"multi-select\"");
        assert_eq!("".parse::<CellType>(), Ok(CellType::Blank));
    }

    #[test]
    fn test_parse_number_cell() {
        assert_eq!(
            CellValue::parse(CellType::Number, " 42 "),
            Ok(CellValue::Number(Some(42.0)))
        );
        assert_eq!(
            CellValue::parse(CellType::Number, ""),
            Ok(CellValue::Number(None))
        );
        assert!(CellValue::parse(CellType::Number, "abc").is_err());
        assert_eq!(
            CellValue::parse(CellType::Number, "inf"),
            Err(ChecklistError::InvalidNumber("inf".to_string()))
        );
        assert!(CellValue::parse(CellType::Number, "NaN").is_err());
    }

    #[test]
    fn test_parse_multi_select_cell() {
        assert_eq!(
            CellValue::parse(CellType::MultiSelect, "a, b,,c"),
            Ok(CellValue::MultiSelect(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string()
            ]))
        );
    }

    #[test]
    fn test_task_number_padding() {
        assert_eq!(task_number(0), "01.");
        assert_eq!(task_number(9), "10.");
    }

    #[test]
    fn test_realtime_is_case_insensitive() {
        let mut row = ActorRow::new();
        row.main_actor = "RealTime".to_string();
        assert!(row.is_realtime());
    }

    #[test]
    fn test_taxonomy_keeps_api_order() {
        let json = serde_json::json!({
            "machine": {
                "m2": { "ID": "2", "name": "Machine 2" },
                "m1": { "ID": "1", "name": "Machine 1" }
            },
            "lots": {}
        });
        let taxonomy = EntityTaxonomy::from_json(&json);
        assert_eq!(taxonomy.types.len(), 2);
        assert_eq!(taxonomy.types[0].key, "machine");
        assert_eq!(taxonomy.types[0].objects[0].key, "m2");
        assert!(taxonomy.contains_object("machine", "m1"));
        assert!(!taxonomy.contains_object("lots", "m1"));
    }

    #[test]
    fn test_taxonomy_from_non_object_is_empty() {
        assert!(EntityTaxonomy::from_json(&serde_json::json!([1, 2])).is_empty());
    }
}
